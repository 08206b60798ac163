//! Command line parsing and the command handlers

use crate::render;
use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use gamelayer_core::{avatar_options, AnswerSelection, ClientConfig, Credentials, Error};
use gamelayer_engine::mystery::segment_at;
use gamelayer_engine::{Dashboard, LeaderboardPoller};
use gamelayer_networking::api::{find_player, register_player};
use gamelayer_networking::GameLayerClient;
use gamelayer_persistence::{CredentialStore, PlayerDirectoryCache, SqliteCredentialStore};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

pub const USAGE: &str = "\
usage: gamelayer-dash <command>

  login <account> <api-key>         store credentials for this machine
  logout                            forget stored credentials
  whoami                            show the stored account
  players                           list players of the account
  add-player <id> <name> [avatar]   create a player (avatar 1-30)
  avatars                           list the avatar choices
  show <player> [--all]             profile, missions, streaks, achievements
  complete <player> <id>            complete a mission or today's streak step
  survey <player> [q=a ...]         show the survey, or submit answers
  spin <player>                     claim the mystery box and spin the wheel
  prizes [<player>]                 wheel prizes, or the prizes a player won
  event <player> <event-id>         complete an event by id
  leaderboard [--watch]             show the leaderboard, optionally live
  help                              this text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { account: String, api_key: String },
    Logout,
    Whoami,
    Players,
    AddPlayer { id: String, name: String, avatar: Option<u32> },
    Avatars,
    Show { player: String, all: bool },
    Complete { player: String, id: String },
    Survey { player: String, answers: Vec<(String, String)> },
    Spin { player: String },
    Prizes { player: Option<String> },
    Event { player: String, event_id: String },
    Leaderboard { watch: bool },
    Help,
}

fn arg(args: &[String], index: usize, what: &str) -> Result<String> {
    args.get(index)
        .cloned()
        .ok_or_else(|| anyhow!("missing {}", what))
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some(name) = args.first() else {
            return Ok(Command::Help);
        };
        let command = match name.as_str() {
            "login" => Command::Login {
                account: arg(args, 1, "account name")?,
                api_key: arg(args, 2, "API key")?,
            },
            "logout" => Command::Logout,
            "whoami" => Command::Whoami,
            "players" => Command::Players,
            "add-player" => Command::AddPlayer {
                id: arg(args, 1, "player id")?,
                name: arg(args, 2, "player name")?,
                avatar: args
                    .get(3)
                    .map(|s| s.parse::<u32>())
                    .transpose()
                    .context("avatar must be a number between 1 and 30")?,
            },
            "avatars" => Command::Avatars,
            "show" => Command::Show {
                player: arg(args, 1, "player")?,
                all: args[2..].iter().any(|a| a == "--all"),
            },
            "complete" => Command::Complete {
                player: arg(args, 1, "player")?,
                id: arg(args, 2, "mission or streak id")?,
            },
            "survey" => {
                let player = arg(args, 1, "player")?;
                let answers = args[2..]
                    .iter()
                    .map(|pair| {
                        pair.split_once('=')
                            .map(|(q, a)| (q.to_string(), a.to_string()))
                            .ok_or_else(|| anyhow!("expected <question>=<answer>, got {}", pair))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Command::Survey { player, answers }
            }
            "spin" => Command::Spin {
                player: arg(args, 1, "player")?,
            },
            "prizes" => Command::Prizes {
                player: args.get(1).cloned(),
            },
            "event" => Command::Event {
                player: arg(args, 1, "player")?,
                event_id: arg(args, 2, "event id")?,
            },
            "leaderboard" => Command::Leaderboard {
                watch: args[1..].iter().any(|a| a == "--watch"),
            },
            "help" | "-h" | "--help" => Command::Help,
            other => bail!("unknown command: {}", other),
        };
        Ok(command)
    }
}

/// Everything a command handler may need
pub struct App {
    pub config: ClientConfig,
    pub store: SqliteCredentialStore,
}

impl App {
    async fn client(&self) -> Result<Arc<GameLayerClient>> {
        let credentials = self
            .store
            .load()
            .await?
            .ok_or_else(|| Error::MissingCredentials("run `gamelayer-dash login` first".to_string()))?;
        Ok(Arc::new(GameLayerClient::new(&self.config, credentials)?))
    }

    async fn dashboard(&self) -> Result<Dashboard<GameLayerClient>> {
        Ok(Dashboard::new(self.client().await?, self.config.clone()))
    }

    /// Accept a player id or a name
    async fn resolve_player(&self, api: &GameLayerClient, query: &str) -> Result<String> {
        match find_player(api, query).await? {
            Some(record) => Ok(record.id),
            None => bail!("no player matches {}", query),
        }
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Help => println!("{}", USAGE),
            Command::Login { account, api_key } => self.login(account, api_key).await?,
            Command::Logout => {
                self.store.clear().await?;
                println!("Credentials removed");
            }
            Command::Whoami => self.whoami().await?,
            Command::Players => {
                let api = self.client().await?;
                println!("{}", render::players(&api.list_players().await?));
            }
            Command::AddPlayer { id, name, avatar } => {
                let api = self.client().await?;
                let record = register_player(api.as_ref(), &id, &name, avatar).await?;
                println!("Created player {} ({})", record.name, record.id);
            }
            Command::Avatars => println!("{}", render::avatars(&avatar_options())),
            Command::Show { player, all } => self.show(&player, all).await?,
            Command::Complete { player, id } => self.complete(&player, &id).await?,
            Command::Survey { player, answers } => self.survey(&player, answers).await?,
            Command::Spin { player } => self.spin(&player).await?,
            Command::Prizes { player } => self.prizes(player.as_deref()).await?,
            Command::Event { player, event_id } => self.event(&player, &event_id).await?,
            Command::Leaderboard { watch } => self.leaderboard(watch).await?,
        }
        Ok(())
    }

    async fn login(&self, account: String, api_key: String) -> Result<()> {
        let credentials = Credentials::new(account, api_key);
        if !credentials.is_complete() {
            bail!("account name and API key are both required");
        }
        self.store.save(&credentials).await?;
        info!("Stored credentials for {}", credentials.account_name);
        println!("Logged in as {}", credentials.account_name);
        Ok(())
    }

    async fn whoami(&self) -> Result<()> {
        match self.store.load().await? {
            Some(c) if c.is_complete() => println!("{} (API key stored)", c.account_name),
            Some(c) => println!("{} (API key missing, run login again)", c.account_name),
            None => println!("Not logged in"),
        }
        Ok(())
    }

    async fn show(&self, query: &str, all: bool) -> Result<()> {
        let dashboard = self.dashboard().await?;
        let player_id = self.resolve_player(dashboard.api(), query).await?;
        let snapshot = dashboard.select_player(&player_id).await?;
        println!("{}", render::snapshot(&snapshot, all, Utc::now()));
        Ok(())
    }

    async fn complete(&self, query: &str, id: &str) -> Result<()> {
        let dashboard = self.dashboard().await?;
        let player_id = self.resolve_player(dashboard.api(), query).await?;
        let snapshot = dashboard.select_player(&player_id).await?;

        let receipt = if snapshot.mission(id).is_some() {
            dashboard.complete_mission(id).await?
        } else if snapshot.streak(id).is_some() {
            dashboard.complete_streak(id).await?
        } else {
            bail!("{} is neither a mission nor a streak of {}", id, player_id);
        };

        println!("{}", receipt.message.as_deref().unwrap_or("Completed"));
        if let Some(snapshot) = dashboard.view().snapshot() {
            println!("\n{}", render::player_header(&snapshot.player));
        }
        Ok(())
    }

    async fn survey(&self, query: &str, answers: Vec<(String, String)>) -> Result<()> {
        let dashboard = self.dashboard().await?;
        let survey = dashboard.survey().await?;
        if answers.is_empty() {
            println!("{}", render::survey(&survey));
            return Ok(());
        }

        let mut selection = AnswerSelection::new();
        for (question, answer) in &answers {
            selection.select(question, answer);
        }
        let player_id = self.resolve_player(dashboard.api(), query).await?;
        dashboard.select_player(&player_id).await?;
        dashboard.submit_survey(&survey, &selection).await?;
        println!("Survey {} submitted", survey.name);
        Ok(())
    }

    async fn spin(&self, query: &str) -> Result<()> {
        let dashboard = self.dashboard().await?;
        let player_id = self.resolve_player(dashboard.api(), query).await?;
        dashboard.select_player(&player_id).await?;
        let mut session = dashboard.mystery_box().await?;
        println!(
            "{} costs {} credits\n{}",
            session.mystery_box().name,
            session.mystery_box().credits,
            render::wheel(&session.offered_prizes())
        );

        let animation = dashboard.spin_mystery_box(&mut session).await?;
        let segments = session.offered_prizes().len();
        let started = Instant::now();
        let mut frame = tokio::time::interval(Duration::from_millis(80));
        while !animation.is_finished(started.elapsed()) {
            frame.tick().await;
            let angle = animation.rotation_at(started.elapsed());
            eprint!("\rspinning... {:>2}", segment_at(angle, segments));
        }
        eprintln!();

        if let Some(prize) = dashboard.finish_spin(&mut session).await {
            println!("You won {}!", prize.name);
        }
        if let Some(snapshot) = dashboard.view().snapshot() {
            println!("\n{}", render::player_header(&snapshot.player));
        }
        Ok(())
    }

    async fn prizes(&self, query: Option<&str>) -> Result<()> {
        match query {
            Some(query) => {
                let api = self.client().await?;
                let player_id = self.resolve_player(&api, query).await?;
                println!("{}", render::player_prizes(&api.list_player_prizes(&player_id).await?));
            }
            None => {
                let session = self.dashboard().await?.mystery_box().await?;
                println!("{}", render::wheel(&session.offered_prizes()));
            }
        }
        Ok(())
    }

    async fn event(&self, query: &str, event_id: &str) -> Result<()> {
        let dashboard = self.dashboard().await?;
        let player_id = self.resolve_player(dashboard.api(), query).await?;
        let event = dashboard.api().get_event(event_id, Some(&player_id)).await?;
        dashboard.select_player(&player_id).await?;
        let receipt = dashboard.complete_event(&event.id).await?;
        println!(
            "{}: {}",
            event.name,
            receipt.message.as_deref().unwrap_or("Completed")
        );
        Ok(())
    }

    async fn leaderboard(&self, watch: bool) -> Result<()> {
        let dashboard = self.dashboard().await?;
        if !watch {
            let mut poller = LeaderboardPoller::new(
                Arc::clone(dashboard.api()),
                self.config.leaderboard_id.clone(),
                Arc::new(PlayerDirectoryCache::new()),
            );
            println!("{}", render::leaderboard(&poller.poll_once().await?));
            return Ok(());
        }

        let handle = dashboard.watch_leaderboard();
        let mut updates = handle.subscribe();
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = updates.borrow_and_update().clone();
                    if let Some(board) = &state.board {
                        println!("{}\n", render::leaderboard(board));
                    }
                    if let Some(message) = &state.last_error {
                        eprintln!("! {}", message);
                    }
                }
            }
        }
        handle.shutdown().await;
        Ok(())
    }
}
