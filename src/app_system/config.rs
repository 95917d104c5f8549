use std::path::PathBuf;

use clap::Args;

use crate::api::UsersPath;

/// Connection and storage settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Backend base address, e.g. `https://shop.example.com`
    #[arg(long, env = "API_URL")]
    pub api_url: Option<String>,

    /// Where the local session is kept
    #[arg(long, env = "SESSION_FILE", default_value = ".durian-session.json")]
    pub session_file: PathBuf,

    /// Roster routes: `admin` (/admin/users) or `user` (legacy /user/users)
    #[arg(long, env = "USERS_PATH", default_value = "admin")]
    pub users_path: UsersPath,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// The backend address, required by every command that talks to it.
    pub fn api_url(&self) -> Result<&str, String> {
        self.api_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| "API_URL is not set (use --api-url or the API_URL variable)".to_string())
    }
}
