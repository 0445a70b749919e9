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

//! Finding recordings whose info files still need editing.

use std::{fs, io, path::Path};

use crate::{
    error::Result,
    generate::info_file_path,
    wiki::parse::InfoPattern,
};

/// State of the info file of one recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InfoStatus {
    Missing,
    /// The file does not match the info file layout.
    Unreadable(String),
    NotesUnfilled,
    Complete,
}

/// Checks whether the info file of a recording is present and edited.
pub(crate) fn check_info_file(pattern: &InfoPattern, dir: &Path, name: &str) -> Result<InfoStatus> {
    let bytes = match fs::read(info_file_path(dir, name)) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(InfoStatus::Missing),
        Err(e) => return Err(e.into()),
    };

    let sections = match pattern.extract(&String::from_utf8_lossy(&bytes)) {
        Ok(sections) => sections,
        Err(e) => return Ok(InfoStatus::Unreadable(e.to_string())),
    };

    if sections.notes.is_empty() {
        Ok(InfoStatus::NotesUnfilled)
    } else {
        Ok(InfoStatus::Complete)
    }
}
