use crate::config::LauncherConfig;
use crate::error::{Error, Result};
use crate::platform::PlatformIdentifier;
use crate::release::ReleaseVersion;
use log::{debug, info};
use reqwest::blocking::{Client, Response};
use reqwest::header::LOCATION;
use reqwest::Url;
use std::io::Read;

const MAX_REDIRECTS: usize = 10;

/// Where to get one release artifact and which archive entry to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub expected_entry_name: String,
}

impl DownloadTarget {
    pub fn new(cfg: &LauncherConfig, version: &ReleaseVersion, platform: PlatformIdentifier) -> Self {
        let url = format!(
            "{}/{}/{}/releases/download/{}/{}",
            cfg.download_base.trim_end_matches('/'),
            cfg.owner,
            cfg.repo,
            version,
            platform.archive_name(&cfg.binary)
        );
        Self {
            url,
            expected_entry_name: platform.binary_name(&cfg.binary),
        }
    }
}

/// Live response body of a successful download.
pub struct Download {
    resp: Response,
}

impl Download {
    pub fn url(&self) -> &str {
        self.resp.url().as_str()
    }

    pub fn content_length(&self) -> Option<u64> {
        self.resp.content_length()
    }
}

impl Read for Download {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.resp.read(buf)
    }
}

pub struct ArtifactFetcher<'a> {
    client: &'a Client,
}

impl<'a> ArtifactFetcher<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET `target.url`, chasing 3xx `Location` headers until a 2xx arrives.
    pub fn fetch(&self, target: &DownloadTarget) -> Result<Download> {
        let mut url = Url::parse(&target.url)
            .map_err(|e| Error::Config(format!("bad download url {}: {e}", target.url)))?;
        for hop in 0..=MAX_REDIRECTS {
            debug!("GET {url} (hop {hop})");
            let resp = self
                .client
                .get(url.clone())
                .send()
                .map_err(|e| Error::network(url.as_str(), e))?;
            let status = resp.status();
            if status.is_success() {
                info!("downloading {url}");
                return Ok(Download { resp });
            }
            if status.is_redirection() {
                if let Some(next) = redirect_target(&url, &resp) {
                    url = next;
                    continue;
                }
            }
            return Err(Error::DownloadFailed {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Err(Error::TooManyRedirects {
            hops: MAX_REDIRECTS,
            url: target.url.clone(),
        })
    }
}

fn redirect_target(current: &Url, resp: &Response) -> Option<Url> {
    let location = resp.headers().get(LOCATION)?.to_str().ok()?;
    current.join(location).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::build_client;

    fn linux() -> PlatformIdentifier {
        PlatformIdentifier::from_parts("linux", "x86_64").unwrap()
    }

    #[test]
    fn target_url_shape() {
        let cfg = LauncherConfig::default();
        let t = DownloadTarget::new(&cfg, &ReleaseVersion::new("v1.2.0"), linux());
        assert_eq!(
            t.url,
            "https://github.com/nguyenphutrong/agentmap/releases/download/v1.2.0/agentmap-linux-x86_64.tar.gz"
        );
        assert_eq!(t.expected_entry_name, "agentmap");

        let win = PlatformIdentifier::from_parts("windows", "x86_64").unwrap();
        let t = DownloadTarget::new(&cfg, &ReleaseVersion::new("v1.2.0"), win);
        assert!(t.url.ends_with("/agentmap-windows-x86_64.tar.gz"));
        assert_eq!(t.expected_entry_name, "agentmap.exe");
    }

    #[test]
    fn follows_redirect_chain() {
        let mut server = mockito::Server::new();
        let base = server.url();
        let first = server
            .mock("GET", "/start")
            .with_status(302)
            .with_header("location", &format!("{base}/middle"))
            .expect(1)
            .create();
        // relative location
        let second = server
            .mock("GET", "/middle")
            .with_status(302)
            .with_header("location", "/final")
            .expect(1)
            .create();
        let last = server
            .mock("GET", "/final")
            .with_status(200)
            .with_body("archive bytes")
            .expect(1)
            .create();

        let client = build_client(&LauncherConfig::default()).unwrap();
        let target = DownloadTarget {
            url: format!("{base}/start"),
            expected_entry_name: "agentmap".to_string(),
        };
        let mut dl = ArtifactFetcher::new(&client).fetch(&target).unwrap();
        assert!(dl.url().ends_with("/final"));
        let mut body = String::new();
        dl.read_to_string(&mut body).unwrap();
        assert_eq!(body, "archive bytes");
        first.assert();
        second.assert();
        last.assert();
    }

    #[test]
    fn not_found_is_download_failed() {
        let mut server = mockito::Server::new();
        let _m = server.mock("GET", "/missing.tar.gz").with_status(404).create();
        let client = build_client(&LauncherConfig::default()).unwrap();
        let target = DownloadTarget {
            url: format!("{}/missing.tar.gz", server.url()),
            expected_entry_name: "agentmap".to_string(),
        };
        let err = ArtifactFetcher::new(&client).fetch(&target).err().unwrap();
        assert!(matches!(err, Error::DownloadFailed { status: 404, .. }), "{err:?}");
    }

    #[test]
    fn redirect_without_location_is_download_failed() {
        let mut server = mockito::Server::new();
        let _m = server.mock("GET", "/moved").with_status(301).create();
        let client = build_client(&LauncherConfig::default()).unwrap();
        let target = DownloadTarget {
            url: format!("{}/moved", server.url()),
            expected_entry_name: "agentmap".to_string(),
        };
        let err = ArtifactFetcher::new(&client).fetch(&target).err().unwrap();
        assert!(matches!(err, Error::DownloadFailed { status: 301, .. }), "{err:?}");
    }

    #[test]
    fn redirect_loop_is_bounded() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/loop")
            .with_status(302)
            .with_header("location", "/loop")
            .expect(MAX_REDIRECTS + 1)
            .create();
        let client = build_client(&LauncherConfig::default()).unwrap();
        let target = DownloadTarget {
            url: format!("{}/loop", server.url()),
            expected_entry_name: "agentmap".to_string(),
        };
        let err = ArtifactFetcher::new(&client).fetch(&target).err().unwrap();
        assert!(matches!(err, Error::TooManyRedirects { hops: MAX_REDIRECTS, .. }), "{err:?}");
    }
}
