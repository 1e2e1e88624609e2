// Error types for the branding document and the onboarding run
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BrandingError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed branding document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required section [{0}]")]
    MissingSection(&'static str),

    #[error("missing required field `{field}` in [{section}]")]
    MissingField {
        section: &'static str,
        field: &'static str,
    },

    #[error("invalid value {value:?} for `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("`{field}` points to {}, which is not an installed file", .path.display())]
    MissingAsset { field: &'static str, path: PathBuf },

    #[error("`{field}` points to {}, which is outside the served asset directory {}", .path.display(), .asset_dir.display())]
    AssetNotServed {
        field: &'static str,
        path: PathBuf,
        asset_dir: PathBuf,
    },

    #[error("cockpit target {target} is unreachable: {reason}")]
    Unreachable { target: String, reason: String },
}

impl BrandingError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("request to {procedure} failed: {source}")]
    Http {
        procedure: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{procedure} returned status {status}: {body}")]
    Status {
        procedure: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response from {procedure}: {reason}")]
    Response { procedure: String, reason: String },

    #[error("onboarding step {step} failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<OnboardingError>,
    },

    #[error("homepage refers to board {0:?}, which was not created in this run")]
    UnknownBoard(String),

    #[error("{} is not inside the served asset directory", .0.display())]
    AssetNotServed(PathBuf),

    #[error("invalid API key: {0}")]
    InvalidApiKey(String),
}
