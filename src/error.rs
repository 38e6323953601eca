use thiserror::Error;

pub type BbResult<T> = Result<T, BbError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BbError {
    /// A whitelisted element for which neither the provider nor the fallback
    /// path produced an attribute mapping. Signals a host integration bug.
    #[error("Missing style for element '{tag}' at {start}..{end}: provider returned no attributes")]
    MissingStyle {
        tag: String,
        start: usize,
        end: usize,
    },

    #[error("Invalid tag '{tag}' in supported tags: expected a letter or '*', then letters, digits, '_', '-' or '*'")]
    InvalidTag { tag: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_yaml::Error> for BbError {
    fn from(err: serde_yaml::Error) -> Self {
        BbError::Config(err.to_string())
    }
}

impl From<std::io::Error> for BbError {
    fn from(err: std::io::Error) -> Self {
        BbError::Io(err.to_string())
    }
}
