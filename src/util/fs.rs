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

//! Filesystem helpers shared by every command.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// A validated command target.
#[derive(Debug, Clone)]
pub(crate) struct Target {
    /// Absolute, normalized path.
    pub(crate) path: PathBuf,
    /// Final path component.
    pub(crate) name: String,
}

/// Resolves `path` and checks that it names a directory.
pub(crate) fn check_directory(path: &Path) -> Result<Target> {
    check_target(path, true)
}

/// Resolves `path` and checks that it names a regular file.
pub(crate) fn check_file(path: &Path) -> Result<Target> {
    check_target(path, false)
}

fn check_target(path: &Path, want_directory: bool) -> Result<Target> {
    let mismatch = || {
        if want_directory {
            Error::NotADirectory(path.to_path_buf())
        } else {
            Error::NotAFile(path.to_path_buf())
        }
    };

    let resolved = fs::canonicalize(path).map_err(|_| mismatch())?;
    let metadata = fs::metadata(&resolved).map_err(|_| mismatch())?;
    if metadata.is_dir() != want_directory {
        return Err(mismatch());
    }

    let name = resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Target {
        path: resolved,
        name,
    })
}

/// What happened when removing a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Removal {
    Removed,
    Missing,
}

/// Removes `path`, printing the outcome on one line.
///
/// A file that does not exist is reported but is not an error.
pub(crate) fn remove_file(path: &Path) -> Result<Removal> {
    print!("Removing {}...", path.display());

    match fs::remove_file(path) {
        Ok(()) => {
            println!(" success!");
            Ok(Removal::Removed)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            println!(" does not exist!");
            Ok(Removal::Missing)
        }
        Err(e) => {
            println!(" {}", file_error_reason(&e));
            Err(e.into())
        }
    }
}

/// Short, user-facing description of a file error.
pub(crate) fn file_error_reason(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "doesn't exist".to_string(),
        io::ErrorKind::PermissionDenied => "permission error".to_string(),
        _ => err.to_string(),
    }
}

/// Total size in bytes of every file below `path`.
pub(crate) fn directory_size(path: &Path) -> Result<u64> {
    let mut total = 0;

    for entry in WalkDir::new(path) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            total += entry.metadata().map_err(io::Error::from)?.len();
        }
    }

    Ok(total)
}

/// Path of `path` below `root`, always with `/` separators.
pub(crate) fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
