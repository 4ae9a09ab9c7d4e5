pub mod api;
pub mod auth;
pub mod config;
pub mod db;

pub use db::DbPool;

use config::Config;
use std::path::PathBuf;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        let upload_dir = config.server.data_dir.join("uploads");
        Self {
            config,
            db,
            upload_dir,
        }
    }
}
