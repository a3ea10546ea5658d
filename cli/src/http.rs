use crate::config::LauncherConfig;
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub const USER_AGENT: &str = concat!("agentmap-launcher/", env!("CARGO_PKG_VERSION"));

/// Shared blocking client. Redirects are followed by [`crate::fetch`] itself.
pub fn build_client(cfg: &LauncherConfig) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(cfg.timeout())
        .redirect(Policy::none())
        .build()
        .map_err(|e| Error::network("<client setup>", e))
}
