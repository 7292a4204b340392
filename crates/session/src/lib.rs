//! Measuring and marking sessions: capture points from the location
//! provider or from screen taps, then file the result in the store.

use std::fmt;

use utility::id::{HasId, Id};

pub mod capture;
pub mod config;
pub mod error;
pub mod marking;
pub mod measurement;

pub use capture::{Capture, SessionState, StartOutcome, MIN_POINTS};
pub use config::{ConfigError, SessionConfig};
pub use error::SessionError;
pub use marking::MarkingSession;
pub use measurement::{MeasurementSession, MeasurementTarget};

/// How a stop ended. Only `Committed` wrote to the store.
pub enum StopOutcome<T: HasId> {
    Committed { id: Id<T>, record: T },
    /// Fewer than [`MIN_POINTS`] points were captured.
    InsufficientData { points: usize },
    NotCapturing,
}

impl<T> fmt::Debug for StopOutcome<T>
where
    T: HasId + fmt::Debug,
    T::IdType: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Committed { id, record } => f
                .debug_struct("Committed")
                .field("id", id)
                .field("record", record)
                .finish(),
            Self::InsufficientData { points } => f
                .debug_struct("InsufficientData")
                .field("points", points)
                .finish(),
            Self::NotCapturing => write!(f, "NotCapturing"),
        }
    }
}

impl<T> PartialEq for StopOutcome<T>
where
    T: HasId + PartialEq,
    T::IdType: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Committed { id, record },
                Self::Committed {
                    id: other_id,
                    record: other_record,
                },
            ) => id == other_id && record == other_record,
            (
                Self::InsufficientData { points },
                Self::InsufficientData {
                    points: other_points,
                },
            ) => points == other_points,
            (Self::NotCapturing, Self::NotCapturing) => true,
            _ => false,
        }
    }
}
