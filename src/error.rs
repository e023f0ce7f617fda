use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolCrewError>;

#[derive(Debug, Error)]
pub enum ToolCrewError {
    #[error("tool server `{server}` unavailable: {reason}")]
    ToolUnavailable { server: String, reason: String },
    #[error("credential `{0}` is missing or empty")]
    CredentialMissing(&'static str),
    #[error("remote API error: {0}")]
    RemoteApi(String),
    #[error("filesystem error at `{path}`: {source}")]
    Filesystem {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: String, reason: String },
    #[error("tool `{0}` not registered")]
    ToolNotRegistered(String),
    #[error("{kind} manifest does not match `{name}`")]
    ManifestMismatch { kind: &'static str, name: String },
    #[error("task `{task}` consumes `{artifact}` which no earlier task produces")]
    UnsatisfiedDependency { task: String, artifact: String },
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for ToolCrewError {
    fn from(err: serde_json::Error) -> Self {
        ToolCrewError::Serialization(err.to_string())
    }
}
