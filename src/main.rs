mod alerts;
mod config;
mod db;
mod error;
mod export;
mod finance;
mod models;
mod prefs;
mod report;
mod run;
mod session;
mod ui;

use anyhow::Result;

use crate::config::Config;
use crate::prefs::Prefs;
use crate::session::Session;

fn main() -> Result<()> {
    let raw_args: Vec<String> = std::env::args().collect();
    let config = Config::load(&raw_args)?;
    let args = config::strip_user_flag(&raw_args);

    let db = db::Database::open(&config.db_path)?;
    let session = match config.user.clone() {
        Some(user) => Session::authenticated(user),
        None => Session::anonymous(),
    };

    match args.len() {
        1 => run::as_tui(&db, session, Prefs::open(&config.prefs_path)),
        _ => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
                .init();
            run::as_cli(&args, &db, session)
        }
    }
}
