//! Mission models and the display rules applied to them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category that hides a mission's details until it is completed
pub const HIDDEN_CATEGORY: &str = "Hidden";

/// Missions shown per page before "show more"
pub const MISSIONS_PAGE_SIZE: usize = 3;

/// Mission record from `GET /missions` and `GET /missions/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub objectives: Option<MissionObjectives>,
    #[serde(default)]
    pub reward: Option<Reward>,
    #[serde(default)]
    pub active: Option<ActiveWindow>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub is_available: bool,
}

/// What has to happen for a mission to count as done
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionObjectives {
    #[serde(default)]
    pub events: Vec<EventRef>,
    #[serde(default)]
    pub quizz_id: Option<String>,
    #[serde(default)]
    pub survey_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRef {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub credits: Option<i64>,
}

/// Availability window; timestamps stay raw so a malformed one cannot sink the record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveWindow {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl ActiveWindow {
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.to
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl MissionRecord {
    /// Event ids from the objectives, in server order, blanks dropped
    pub fn event_ids(&self) -> Vec<String> {
        self.objectives
            .as_ref()
            .map(|o| {
                o.events
                    .iter()
                    .filter_map(|e| e.id.as_deref())
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The event whose completion advances this mission
    pub fn primary_event_id(&self) -> Option<String> {
        self.event_ids().into_iter().next()
    }

    pub fn into_mission(self) -> Mission {
        let event_ids = self.event_ids();
        Mission {
            id: self.id,
            name: self.name,
            description: self.description,
            img_url: self.img_url,
            category: self.category,
            event_ids,
            reward: self.reward.unwrap_or_default(),
            active: self.active.unwrap_or_default(),
            priority: self.priority.unwrap_or(0),
            completed: self.completed.unwrap_or(false),
            is_available: self.is_available,
        }
    }
}

/// Mission card view model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: String,
    pub name: String,
    pub description: String,
    pub img_url: Option<String>,
    pub category: Option<String>,
    pub event_ids: Vec<String>,
    pub reward: Reward,
    pub active: ActiveWindow,
    /// 0 means "no priority" and sorts last
    pub priority: i64,
    pub completed: bool,
    pub is_available: bool,
}

impl Mission {
    pub fn primary_event_id(&self) -> Option<&str> {
        self.event_ids.first().map(String::as_str)
    }

    /// Only available missions with at least one event can be completed
    pub fn is_completable(&self) -> bool {
        self.is_available && !self.event_ids.is_empty()
    }

    pub fn is_hidden(&self) -> bool {
        self.category.as_deref() == Some(HIDDEN_CATEGORY)
    }

    /// Countdown to the end of the active window, if it has one
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<String> {
        self.active.ends_at().map(|end| format_time_remaining(end, now))
    }
}

/// Filter to available missions, then order by priority.
///
/// Priorities ascend (1 before 2); priority 0 means unset and goes last.
/// The sort is stable so equal priorities keep the server's order.
pub fn display_missions(records: Vec<MissionRecord>) -> Vec<Mission> {
    let mut missions: Vec<Mission> = records
        .into_iter()
        .filter(|r| r.is_available)
        .map(MissionRecord::into_mission)
        .collect();
    missions.sort_by_key(|m| priority_key(m.priority));
    missions
}

fn priority_key(priority: i64) -> (bool, i64) {
    (priority == 0, priority)
}

/// "2d 5h", "3h 12m", "45m" or "Expired"
pub fn format_time_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = end - now;
    if diff.num_milliseconds() <= 0 {
        return "Expired".to_string();
    }

    let days = diff.num_days();
    let hours = diff.num_hours() % 24;
    let minutes = diff.num_minutes() % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// "Show more / show less" paging over a mission list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionPager {
    visible: usize,
}

impl Default for MissionPager {
    fn default() -> Self {
        Self {
            visible: MISSIONS_PAGE_SIZE,
        }
    }
}

impl MissionPager {
    pub fn visible<'a>(&self, missions: &'a [Mission]) -> &'a [Mission] {
        &missions[..self.visible.min(missions.len())]
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible < total
    }

    pub fn can_reduce(&self) -> bool {
        self.visible > MISSIONS_PAGE_SIZE
    }

    pub fn expand(&mut self) {
        self.visible += MISSIONS_PAGE_SIZE;
    }

    pub fn reduce(&mut self) {
        self.visible = MISSIONS_PAGE_SIZE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record(id: &str, priority: Option<i64>, available: bool) -> MissionRecord {
        MissionRecord {
            id: id.to_string(),
            name: format!("Mission {}", id),
            priority,
            is_available: available,
            objectives: Some(MissionObjectives {
                events: vec![EventRef {
                    id: Some(format!("evt-{}", id)),
                }],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_priority_order_zero_last_stable() {
        let missions = display_missions(vec![
            record("a", Some(0), true),
            record("b", Some(2), true),
            record("c", Some(0), true),
            record("d", Some(1), true),
        ]);
        let ids: Vec<&str> = missions.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_missing_priority_counts_as_zero() {
        let missions = display_missions(vec![record("x", None, true), record("y", Some(5), true)]);
        assert_eq!(missions[0].id, "y");
        assert_eq!(missions[1].priority, 0);
    }

    #[test]
    fn test_unavailable_missions_never_displayed() {
        let mut generous = record("gold", Some(1), false);
        generous.reward = Some(Reward {
            points: Some(10_000),
            credits: Some(500),
        });
        let missions = display_missions(vec![generous, record("plain", Some(0), true)]);
        assert_eq!(missions.len(), 1);
        assert_eq!(missions[0].id, "plain");
    }

    #[test]
    fn test_completable_requires_event() {
        let mut no_events = record("n", Some(1), true);
        no_events.objectives = Some(MissionObjectives {
            events: vec![EventRef { id: None }, EventRef { id: Some(String::new()) }],
            ..Default::default()
        });
        let mission = no_events.into_mission();
        assert!(mission.event_ids.is_empty());
        assert!(!mission.is_completable());

        let mission = record("ok", Some(1), true).into_mission();
        assert!(mission.is_completable());
        assert_eq!(mission.primary_event_id(), Some("evt-ok"));
    }

    #[test]
    fn test_mission_from_wire_json() {
        let raw = r#"{
            "id": "m-1",
            "name": "Daily check-in",
            "description": "Open the app",
            "category": "Hidden",
            "objectives": {"quizzId": "", "surveyId": "", "events": [{"id": "checkin"}], "missions": []},
            "reward": {"points": 25, "credits": 5, "achievements": []},
            "active": {"from": "2024-01-01T00:00:00Z", "to": "2024-02-01T00:00:00Z"},
            "priority": 2,
            "isAvailable": true
        }"#;
        let mission = serde_json::from_str::<MissionRecord>(raw).unwrap().into_mission();
        assert_eq!(mission.event_ids, vec!["checkin".to_string()]);
        assert_eq!(mission.reward.points, Some(25));
        assert!(mission.is_hidden());
        assert!(!mission.completed);

        let now = Utc.with_ymd_and_hms(2024, 1, 31, 22, 30, 0).unwrap();
        assert_eq!(mission.time_remaining(now).as_deref(), Some("1h 30m"));
    }

    #[test]
    fn test_time_remaining_format() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_time_remaining(now + Duration::hours(53), now), "2d 5h");
        assert_eq!(format_time_remaining(now + Duration::minutes(192), now), "3h 12m");
        assert_eq!(format_time_remaining(now + Duration::minutes(45), now), "45m");
        assert_eq!(format_time_remaining(now - Duration::minutes(1), now), "Expired");
    }

    #[test]
    fn test_pager() {
        let missions: Vec<Mission> = (0..7)
            .map(|i| record(&i.to_string(), Some(1), true).into_mission())
            .collect();
        let mut pager = MissionPager::default();
        assert_eq!(pager.visible(&missions).len(), 3);
        assert!(pager.has_more(missions.len()));
        assert!(!pager.can_reduce());

        pager.expand();
        pager.expand();
        assert_eq!(pager.visible(&missions).len(), 7);
        assert!(!pager.has_more(missions.len()));

        pager.reduce();
        assert_eq!(pager.visible(&missions).len(), 3);
    }
}
