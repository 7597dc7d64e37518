use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutscanError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("HTTP {status} - {reason}, Message {body}")]
    Transport {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("{body}\nCheck that your token is valid")]
    Application { body: String },

    #[error("Response is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response has no 'data' array")]
    MissingData,

    #[error("Invalid user record at index {index}: {message}")]
    InvalidRecord { index: usize, message: String },
}

impl OutscanError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            OutscanError::Http(_) | OutscanError::Transport { .. } => "transport",
            OutscanError::Application { .. } => "application",
            OutscanError::Encoding(_)
            | OutscanError::Parse(_)
            | OutscanError::MissingData
            | OutscanError::InvalidRecord { .. } => "parse",
        }
    }
}

pub type Result<T> = std::result::Result<T, OutscanError>;
