use std::{error::Error, fmt};

use device::{LocationError, MediaError};
use store::StoreError;

/// Why a session could not start or commit. Too few points is not an error,
/// see [`StopOutcome::InsufficientData`](crate::StopOutcome::InsufficientData).
#[derive(Debug)]
pub enum SessionError {
    PermissionDenied,
    /// The hardware is missing, busy or refused the request.
    DeviceUnavailable(String),
    Timeout,
    Store(StoreError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "permission denied, check the device settings"),
            Self::DeviceUnavailable(why) => write!(f, "device unavailable: {}", why),
            Self::Timeout => write!(f, "no position within the time limit"),
            Self::Store(why) => write!(f, "could not save the result: {}", why),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(why) => Some(why),
            _ => None,
        }
    }
}

impl From<LocationError> for SessionError {
    fn from(why: LocationError) -> Self {
        match why {
            LocationError::PermissionDenied => Self::PermissionDenied,
            LocationError::Timeout => Self::Timeout,
            other => Self::DeviceUnavailable(other.to_string()),
        }
    }
}

impl From<MediaError> for SessionError {
    fn from(why: MediaError) -> Self {
        match why {
            MediaError::PermissionDenied => Self::PermissionDenied,
            other => Self::DeviceUnavailable(other.to_string()),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(why: StoreError) -> Self {
        Self::Store(why)
    }
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
