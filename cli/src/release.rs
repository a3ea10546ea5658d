use crate::config::LauncherConfig;
use crate::error::{Error, Result};
use log::debug;
use reqwest::blocking::Client;
use std::fmt;

/// Opaque release tag. Compared for equality only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that can name the version to install.
pub trait VersionSource {
    fn latest_version(&self) -> Result<ReleaseVersion>;
}

/// GitHub-style `releases/latest` endpoint.
pub struct ReleaseIndex<'a> {
    client: &'a Client,
    url: String,
}

impl<'a> ReleaseIndex<'a> {
    pub fn new(client: &'a Client, cfg: &LauncherConfig) -> Self {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            cfg.api_base.trim_end_matches('/'),
            cfg.owner,
            cfg.repo
        );
        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl VersionSource for ReleaseIndex<'_> {
    fn latest_version(&self) -> Result<ReleaseVersion> {
        debug!("querying release index {}", self.url);
        let resp = self
            .client
            .get(&self.url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(|e| Error::network(&self.url, e))?;
        let status = resp.status();
        let body = resp.text().map_err(|e| Error::network(&self.url, e))?;
        if !status.is_success() {
            return Err(Error::MalformedResponse(format!(
                "release index returned HTTP {} for {}",
                status.as_u16(),
                self.url
            )));
        }
        let version = parse_latest_tag(&body)?;
        debug!("latest release is {version}");
        Ok(version)
    }
}

/// A version fixed up front, e.g. from `AGENTMAP_VERSION`.
pub struct PinnedVersion(pub ReleaseVersion);

impl VersionSource for PinnedVersion {
    fn latest_version(&self) -> Result<ReleaseVersion> {
        Ok(self.0.clone())
    }
}

fn parse_latest_tag(body: &str) -> Result<ReleaseVersion> {
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(format!("invalid JSON: {e}")))?;
    match json.get("tag_name").and_then(|v| v.as_str()) {
        Some(tag) if !tag.trim().is_empty() => Ok(ReleaseVersion::new(tag.trim())),
        Some(_) => Err(Error::MalformedResponse("empty 'tag_name'".to_string())),
        None => Err(Error::MalformedResponse("missing 'tag_name' field".to_string())),
    }
}
