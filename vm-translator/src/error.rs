//! Error types for VM translation.
//!
//! Every parse error carries its source filename and 1-based line number.

use thiserror::Error;

/// VM translation error with full context.
#[derive(Error, Debug)]
pub enum VmError {
    #[error("{file}:{line}: invalid command \"{command}\"")]
    InvalidCommand {
        line: usize,
        file: String,
        command: String,
    },

    #[error("{file}:{line}: missing argument for \"{command}\"")]
    MissingArgument {
        line: usize,
        file: String,
        command: String,
    },

    #[error("{file}:{line}: invalid memory segment \"{segment}\"")]
    InvalidSegment {
        line: usize,
        file: String,
        segment: String,
    },

    #[error("{file}:{line}: invalid number \"{value}\"")]
    InvalidNumber {
        line: usize,
        file: String,
        value: String,
    },

    #[error("{file}:{line}: cannot pop to constant segment")]
    PopToConstant { line: usize, file: String },

    #[error("{file}:{line}: invalid pointer index {index} (must be 0 or 1)")]
    InvalidPointerIndex {
        line: usize,
        file: String,
        index: u16,
    },

    #[error("{file}:{line}: invalid temp index {index} (must be 0-7)")]
    InvalidTempIndex {
        line: usize,
        file: String,
        index: u16,
    },

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no .vm files in {path}")]
    NoVmFiles { path: String },

    #[error("not a directory: {path}")]
    NotADirectory { path: String },
}

/// Result type alias for translator operations.
pub type Result<T> = std::result::Result<T, VmError>;
