//! Exit codes for the CLI tool.

use wadex::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Container format error
pub const BAD_ARCHIVE: i32 = 3;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    FatalError,
    BadArchive,
    IoError,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::FatalError => FATAL_ERROR,
            Self::BadArchive => BAD_ARCHIVE,
            Self::IoError => IO_ERROR,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a wadex error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) => ExitCode::IoError,
        Error::InvalidFormat(_) => ExitCode::BadArchive,
        Error::CorruptEntry { .. } => ExitCode::BadArchive,
        Error::DuplicateName { .. } => ExitCode::BadArgs,
        Error::IndexOutOfRange { .. } => ExitCode::BadArgs,
        Error::EntryRemoved { .. } => ExitCode::BadArgs,
        Error::EntryNotFound { .. } => ExitCode::BadArgs,
        Error::InvalidEntryName(_) => ExitCode::BadArgs,
        Error::Decode(_) => ExitCode::BadArchive,
        Error::Parse { .. } => ExitCode::BadArchive,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
