use envconfig::Envconfig;
use std::path::PathBuf;

/// Runtime configuration, read from the environment at startup
#[derive(Envconfig, Debug, Clone)]
pub struct Config {
    /// Base URL of the photo API; endpoint paths are appended to it
    #[envconfig(from = "PHOTO_SHARE_API_URL", default = "http://localhost:5000/api")]
    pub api_url: String,

    /// Where the session database lives (defaults to the user data directory)
    #[envconfig(from = "PHOTO_SHARE_SESSION_DB")]
    pub session_db: Option<PathBuf>,

    #[envconfig(from = "RUST_LOG", default = "info")]
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, envconfig::Error> {
        Self::init_from_env()
    }
}
