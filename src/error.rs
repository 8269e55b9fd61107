use thiserror::Error;

pub type Result<T> = std::result::Result<T, GravatarError>;

#[derive(Debug, Error)]
pub enum GravatarError {
    #[error("bad user for gravatar: {0}")]
    UserNotFound(String),
    #[error("gravatar service error: {0}")]
    ExternalService(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("unknown gravatar tag: {0}")]
    UnknownTag(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<reqwest::Error> for GravatarError {
    fn from(err: reqwest::Error) -> Self {
        Self::ExternalService(Box::new(err))
    }
}

impl From<serde_json::Error> for GravatarError {
    fn from(err: serde_json::Error) -> Self {
        Self::ExternalService(Box::new(err))
    }
}
