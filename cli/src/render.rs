//! Plain-text rendering of dashboard state

use chrono::{DateTime, Utc};
use gamelayer_core::{
    Achievement, AchievementStatus, AvatarOption, Mission, MissionPager, Player, PlayerPrize,
    PlayerRecord, Prize, RankMovement, Reward, Streak, StreakSlot, Survey,
};
use gamelayer_engine::{LeaderboardBoard, PlayerSnapshot};

const HIDDEN_MISSION_NAME: &str = "Hidden mission";

pub fn player_header(player: &Player) -> String {
    let mut line = format!("{} ({})", player.name, player.id);
    if let Some(level) = &player.level {
        line.push_str(&format!("  level {}", level));
    }
    if let Some(team) = &player.team {
        line.push_str(&format!("  team {}", team.display()));
    }
    line.push_str(&format!(
        "\n{} points, {} credits",
        player.points.unwrap_or(0),
        player.credits.unwrap_or(0)
    ));
    line
}

fn reward_label(reward: &Reward) -> String {
    match (reward.points, reward.credits) {
        (Some(p), Some(c)) => format!("+{} pts +{} cr", p, c),
        (Some(p), None) => format!("+{} pts", p),
        (None, Some(c)) => format!("+{} cr", c),
        (None, None) => String::new(),
    }
}

pub fn mission_line(mission: &Mission, now: DateTime<Utc>) -> String {
    let name = if mission.is_hidden() {
        HIDDEN_MISSION_NAME
    } else {
        mission.name.as_str()
    };
    let mark = if mission.completed { "x" } else { " " };
    let mut line = format!("[{}] {:<28} {}", mark, name, reward_label(&mission.reward));
    if let Some(left) = mission.time_remaining(now) {
        line.push_str(&format!("  ({})", left));
    }
    if !mission.is_completable() {
        line.push_str("  -");
    } else {
        line.push_str(&format!("  id={}", mission.id));
    }
    line
}

/// Visible missions plus a "more" hint
pub fn mission_lines(missions: &[Mission], pager: MissionPager, now: DateTime<Utc>) -> Vec<String> {
    let mut lines: Vec<String> = pager
        .visible(missions)
        .iter()
        .map(|m| mission_line(m, now))
        .collect();
    if pager.has_more(missions.len()) {
        let hidden = missions.len() - pager.visible(missions).len();
        lines.push(format!("... {} more (use --all)", hidden));
    }
    lines
}

pub fn streak_line(streak: &Streak) -> String {
    let dots: String = streak
        .progress_slots()
        .iter()
        .map(|slot| match slot {
            StreakSlot::Completed => '#',
            StreakSlot::Current => '>',
            StreakSlot::Pending => '.',
        })
        .collect();
    let action = if streak.is_actionable() {
        format!("id={}", streak.id)
    } else {
        "-".to_string()
    };
    format!("{:<24} [{}] {}/{}  {}", streak.name, dots, streak.current, streak.target, action)
}

pub fn achievement_line(achievement: &Achievement) -> String {
    let state = match achievement.status {
        Some(AchievementStatus::Granted) => "done",
        Some(AchievementStatus::Unlocked) => "open",
        None => "    ",
    };
    format!(
        "{} {:<28} {:>3.0}%  ({}/{})",
        state,
        achievement.name,
        achievement.progress_percent(),
        achievement.steps_completed,
        achievement.steps
    )
}

pub fn snapshot(snapshot: &PlayerSnapshot, show_all: bool, now: DateTime<Utc>) -> String {
    let mut out = vec![player_header(&snapshot.player), String::new()];

    out.push("Missions".to_string());
    let mut pager = MissionPager::default();
    while show_all && pager.has_more(snapshot.missions.len()) {
        pager.expand();
    }
    if snapshot.missions.is_empty() {
        out.push("  none available".to_string());
    }
    out.extend(mission_lines(&snapshot.missions, pager, now).into_iter().map(|l| format!("  {}", l)));

    out.push(String::new());
    out.push("Streaks".to_string());
    out.extend(snapshot.streaks.iter().map(|s| format!("  {}", streak_line(s))));

    out.push(String::new());
    out.push("Achievements".to_string());
    out.extend(snapshot.achievements.iter().map(|a| format!("  {}", achievement_line(a))));

    if !snapshot.failures.is_empty() {
        out.push(String::new());
        for failure in &snapshot.failures {
            out.push(format!("! {} unavailable: {}", failure.slice, failure.message));
        }
    }
    out.join("\n")
}

pub fn movement_label(movement: RankMovement) -> String {
    match movement {
        RankMovement::Up(n) => format!("+{}", n),
        RankMovement::Down(n) => format!("-{}", n),
        RankMovement::Unchanged => "=".to_string(),
        RankMovement::New => "new".to_string(),
    }
}

pub fn leaderboard(board: &LeaderboardBoard) -> String {
    let title = board
        .leaderboard
        .as_ref()
        .map(|l| l.name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("Leaderboard");
    let mut out = vec![format!(
        "{} ({} players, {})",
        title,
        board.total_players,
        board.updated_at.format("%H:%M:%S")
    )];
    for entry in &board.entries {
        let delta = match entry.points_delta() {
            Some(d) if d != 0 => format!("{:+}", d),
            _ => String::new(),
        };
        out.push(format!(
            "{:>3}. {:<24} {:>8} {:>4} {}",
            entry.rank,
            entry.player.name,
            entry.points,
            movement_label(entry.rank_movement()),
            delta
        ));
    }
    out.join("\n")
}

pub fn players(players: &[PlayerRecord]) -> String {
    players
        .iter()
        .map(|p| format!("{:<20} {:<24} {:>6} pts", p.id, p.name, p.points.unwrap_or(0)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn avatars(options: &[AvatarOption]) -> String {
    options
        .iter()
        .map(|o| format!("{:>2}  {}", o.seed, o.url))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn survey(survey: &Survey) -> String {
    let mut out = vec![format!("{} ({})", survey.name, survey.id)];
    for question in &survey.questions {
        out.push(format!("  {}: {}", question.id, question.text));
        for answer in &question.answers {
            out.push(format!("      {} = {}", answer.id, answer.text));
        }
    }
    out.join("\n")
}

pub fn wheel(prizes: &[&Prize]) -> String {
    prizes
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:>2}. {:<24} stock {}", i, p.name, p.stock))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn player_prizes(prizes: &[PlayerPrize]) -> String {
    if prizes.is_empty() {
        return "No prizes yet".to_string();
    }
    prizes
        .iter()
        .map(|p| match &p.claimed_at {
            Some(at) => format!("{:<24} {}", p.name, at),
            None => p.name.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
