//! SQLite database management

mod connection;
mod settings;

pub use connection::{Database, DATABASE_FILE};
pub use settings::*;
