use std::fmt;
use std::path::PathBuf;

/// Alternate ways to get agentmap when the launcher cannot.
pub const REMEDIATION: &str = "You can install manually:
  cargo install agentmap
  brew install nguyenphutrong/tap/agentmap

Or download from:
  https://github.com/nguyenphutrong/agentmap/releases";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
    #[error("unsupported architecture: {0}")]
    UnsupportedArchitecture(String),
    #[error("network error talking to {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("malformed release index response: {0}")]
    MalformedResponse(String),
    #[error("download failed with HTTP {status} for {url}")]
    DownloadFailed { status: u16, url: String },
    #[error("gave up after {hops} redirects starting at {url}")]
    TooManyRedirects { hops: usize, url: String },
    #[error("failed to extract archive")]
    ExtractionFailed(#[source] std::io::Error),
    #[error("archive has no entry named '{0}'")]
    EntryNotFound(String),
    #[error("could not make {path:?} executable")]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("agentmap binary not found (looked in: {})\n{}", display_paths(.searched), REMEDIATION)]
    BinaryNotFound { searched: Vec<PathBuf> },
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn network(url: &str, source: reqwest::Error) -> Self {
        Error::Network {
            url: url.to_string(),
            source,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Step of a reconcile cycle, reported alongside the underlying failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lock,
    VersionDiscovery,
    Download,
    Extraction,
    Permissions,
    Ledger,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Lock => "locking the install directory",
            Phase::VersionDiscovery => "version discovery",
            Phase::Download => "download",
            Phase::Extraction => "extraction",
            Phase::Permissions => "permission setting",
            Phase::Ledger => "recording the installed version",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{phase} failed: {source}")]
pub struct ReconcileError {
    pub phase: Phase,
    #[source]
    pub source: Error,
}

impl ReconcileError {
    pub(crate) fn new(phase: Phase, source: Error) -> Self {
        Self { phase, source }
    }
}
