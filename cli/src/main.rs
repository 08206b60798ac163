//! GameLayer dashboard - command line entry point

mod commands;
mod render;

use anyhow::{Context, Result};
use commands::{App, Command, USAGE};
use gamelayer_core::ClientConfig;
use gamelayer_persistence::sqlite::DATABASE_FILE;
use gamelayer_persistence::{Database, SqliteCredentialStore};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DATA_DIR_NAME: &str = "GameLayerDash";

fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("GAMELAYER_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs_next::data_local_dir()
        .map(|p| p.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

async fn open_app() -> Result<App> {
    let config = ClientConfig::from_env().context("invalid configuration")?;
    let db_path = data_dir().join(DATABASE_FILE);
    let db = Database::connect(&db_path)
        .await
        .with_context(|| format!("could not open {}", db_path.display()))?;
    let store = SqliteCredentialStore::machine_bound(db)
        .context("could not derive the machine key")?;
    Ok(App { config, store })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gamelayer_cli=info,gamelayer_engine=info,gamelayer_networking=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    if command == Command::Help {
        println!("{}", USAGE);
        return;
    }

    let result = match open_app().await {
        Ok(app) => app.run(command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        // platform messages are shown as-is, everything else with its context chain
        match e.downcast_ref::<gamelayer_core::Error>() {
            Some(err) => eprintln!("Error: {}", err.user_message()),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}
