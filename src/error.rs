// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Error types shared by the directory-processing components.
//!
//! Each variant names one condition a component can report. None of them stop
//! a batch run on their own: the task driver logs the error against the
//! directory being processed and moves on to the next one. Only the setup
//! steps in `main` turn an error into a non-zero exit.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("{} is not a file", .0.display())]
    NotAFile(PathBuf),

    #[error("unexpected output from {tool}: expected {expected} lines, got {actual}")]
    UnexpectedExternalOutput {
        tool: String,
        expected: usize,
        actual: usize,
    },

    #[error("expected tag prefix {expected:?}, but line is {line:?}")]
    InvalidTagFormat { expected: String, line: String },

    #[error("invalid {field} value {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{tool} failed: {reason}")]
    ToolFailed { tool: String, reason: String },

    #[error("{} has folders nested inside CD folders", .0.display())]
    SkipDirectory(PathBuf),

    #[error("no tracks found")]
    EmptyAlbum,

    #[error("info file does not match the expected layout")]
    InfoFileLayout,

    #[error("track list line {line:?}: {reason}")]
    InvalidTrackLine { line: String, reason: &'static str },

    #[error("tour file does not contain tour {0:?}")]
    TourNotFound(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
