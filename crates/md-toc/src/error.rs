use thiserror::Error;

use crate::device::DeviceError;

#[derive(Debug, Error)]
pub enum TocError {
    #[error("Grouped tracks must be sequential")]
    NotSequential,

    #[error("A track cannot be in two groups")]
    TrackInTwoGroups,

    #[error("No tracks selected")]
    EmptySelection,

    #[error("Track {index} out of range, disc has {count} tracks")]
    TrackOutOfRange { index: usize, count: usize },

    #[error("No group starts at track {0}")]
    GroupNotFound(usize),

    #[error("Track at position {position} is numbered {index}")]
    InvalidTrackIndex { position: usize, index: usize },

    #[error("Group {first}-{last} overlaps another group")]
    OverlappingGroups { first: usize, last: usize },

    #[error("Group {first}-{last} does not fit a disc with {count} tracks")]
    GroupOutOfRange {
        first: usize,
        last: usize,
        count: usize,
    },

    #[error("Not enough space left in the title table")]
    TitleTableFull,

    #[error("Corrupt title table: {0}")]
    CorruptTitleTable(String),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("Device lock poisoned")]
    DeviceLockPoisoned,
}

pub type TocResult<T> = Result<T, TocError>;
