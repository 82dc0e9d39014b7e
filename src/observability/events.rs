//! Observable store events
//!
//! Events are explicit and typed. Each maps to a stable upper-case name
//! and a log level.

use std::fmt;

use log::Level;

/// Observable events in diskstore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A store was built from its roots
    StoreOpened,
    /// Configuration file loaded and validated
    ConfigLoaded,
    /// A value or byte buffer replaced a file
    FileSaved,
    /// A file was read and decoded
    FileRetrieved,
    /// Elements were appended to a stored collection
    FileAppended,
    /// A file was removed
    FileDeleted,
    /// A file was moved or renamed
    FileMoved,
    /// Every file under a location root was removed
    LocationCleared,
    /// An atomic write failed and its temporary artifact was discarded
    WriteAborted,
    /// Stored bytes did not decode as the requested type
    DecodeFailed,
    /// A write was committed but its directory could not be fsynced
    DirSyncFailed,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StoreOpened => "STORE_OPENED",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::FileSaved => "FILE_SAVED",
            Event::FileRetrieved => "FILE_RETRIEVED",
            Event::FileAppended => "FILE_APPENDED",
            Event::FileDeleted => "FILE_DELETED",
            Event::FileMoved => "FILE_MOVED",
            Event::LocationCleared => "LOCATION_CLEARED",
            Event::WriteAborted => "WRITE_ABORTED",
            Event::DecodeFailed => "DECODE_FAILED",
            Event::DirSyncFailed => "DIR_SYNC_FAILED",
        }
    }

    /// Failure events are logged at WARN, routine events at DEBUG
    pub fn level(&self) -> Level {
        match self {
            Event::WriteAborted | Event::DecodeFailed | Event::DirSyncFailed => Level::Warn,
            Event::StoreOpened | Event::ConfigLoaded => Level::Info,
            _ => Level::Debug,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
