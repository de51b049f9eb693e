//! Error types for relcut.

use thiserror::Error;

use crate::orchestrator::Phase;

/// Main error type for relcut operations.
#[derive(Error, Debug)]
pub enum ReleaseError {
    // Precondition errors
    #[error("{0} not set: required to publish the release")]
    MissingCredential(String),

    #[error("tag {0:?} already exists: nothing to release")]
    TagExists(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid version {0:?}: expected <major>.<minor>[.<patch>][suffix]")]
    InvalidVersion(String),

    // History errors
    #[error(
        "malformed log entry #{index}: expected 4 fields (hash, email, subject, body): {entry:?}"
    )]
    MalformedLogEntry { index: usize, entry: String },

    // External process errors
    #[error("{command} {} failed: {status}: {output}", .args.join(" "))]
    CommandFailed {
        command: String,
        args: Vec<String>,
        status: String,
        output: String,
    },

    #[error("Version bump failed: {0}")]
    VersionBump(String),

    #[error("release aborted during {phase}: {source}")]
    Aborted {
        phase: Phase,
        #[source]
        source: Box<ReleaseError>,
    },

    // Network/API errors
    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("Remote lookup failed with status {status}: {body}")]
    LookupFailed { status: u16, body: String },

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Git URL parse error: {0}")]
    GitUrlError(#[from] git_url_parse::GitUrlParseError),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using ReleaseError
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a version bump error
    pub fn version_bump(msg: impl Into<String>) -> Self {
        Self::VersionBump(msg.into())
    }

    /// Attach the phase a release run was in when this error occurred.
    pub fn during(self, phase: Phase) -> Self {
        match self {
            already @ Self::Aborted { .. } => already,
            other => Self::Aborted {
                phase,
                source: Box::new(other),
            },
        }
    }

    /// The phase a release run stopped in, if the error came from one.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Aborted { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for ReleaseError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for ReleaseError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status()
            && (status.as_u16() == 401 || status.as_u16() == 403)
        {
            return Self::AuthenticationError(err.to_string());
        }
        Self::NetworkError(err.to_string())
    }
}

// Implement From for reqwest header errors (needs custom message)
impl From<reqwest::header::InvalidHeaderValue> for ReleaseError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::AuthenticationError(format!("Invalid header value: {}", err))
    }
}
