use std::{error::Error, fmt, io};

#[derive(Debug)]
pub enum StoreError {
    /// No record of the given kind carries the id.
    NotFound { kind: &'static str, id: String },
    /// An import document had a recognized key with a value of the wrong
    /// shape. The state was left untouched.
    InvalidImport { key: &'static str, why: serde_json::Error },
    Serialization(serde_json::Error),
    Io(io::Error),
    /// The store actor is gone or dropped the reply.
    Unavailable,
    Other(Box<dyn Error + Send + Sync>),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{} {} not found", kind, id),
            Self::InvalidImport { key, why } => write!(f, "invalid value for `{}`: {}", key, why),
            Self::Serialization(why) => write!(f, "serialization failed: {}", why),
            Self::Io(why) => write!(f, "storage io failed: {}", why),
            Self::Unavailable => write!(f, "store is not running"),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidImport { why, .. } | Self::Serialization(why) => Some(why),
            Self::Io(why) => Some(why),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(why: serde_json::Error) -> Self {
        Self::Serialization(why)
    }
}

impl From<io::Error> for StoreError {
    fn from(why: io::Error) -> Self {
        Self::Io(why)
    }
}

impl From<Box<dyn Error + Send + Sync>> for StoreError {
    fn from(value: Box<dyn Error + Send + Sync>) -> Self {
        Self::Other(value)
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
