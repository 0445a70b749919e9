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

//! Checksum sidecar generation.
//!
//! Every recording directory gets two sidecar files named after it:
//!
//! * `<name>.md5` lists `<md5> *<relative path>` for every file below the
//!   directory, followed by an entry for the fingerprint sidecar itself.
//! * `<name>.ffp` lists `<relative path>:<fingerprint>` for every audio
//!   file, where the fingerprint is the MD5 of the decoded audio stream as
//!   reported by the tag utility.
//!
//! Lines end in CRLF so the files compare equal on every platform. Entries
//! are ordered by file name, which makes re-runs over unchanged files produce
//! identical bytes.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use md5::{Digest, Md5};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    error::Result,
    tags::{TagReader, is_audio_file},
    util::fs::{Removal, relative_name, remove_file},
};

pub(crate) const HASH_EXTENSION: &str = "md5";
pub(crate) const FINGERPRINT_EXTENSION: &str = "ffp";

pub(crate) const LINE_END: &str = "\r\n";

/// Locations of the two sidecar files of a recording directory.
#[derive(Debug, Clone)]
pub(crate) struct Sidecars {
    pub(crate) hashes: PathBuf,
    pub(crate) fingerprints: PathBuf,
}

impl Sidecars {
    pub(crate) fn new(dir: &Path, name: &str) -> Self {
        Self {
            hashes: dir.join(format!("{}.{}", name, HASH_EXTENSION)),
            fingerprints: dir.join(format!("{}.{}", name, FINGERPRINT_EXTENSION)),
        }
    }

    fn contains(&self, path: &Path) -> bool {
        path == self.hashes || path == self.fingerprints
    }
}

/// Sidecar contents computed for one directory.
#[derive(Debug, Default)]
pub(crate) struct Manifests {
    pub(crate) hashes: String,
    /// `None` when the directory holds no audio files.
    pub(crate) fingerprints: Option<String>,
    /// Files that could not be read and were left out of the hash manifest.
    pub(crate) unreadable: Vec<String>,
}

/// Lowercase hex MD5 of the file at `path`.
pub(crate) fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    io::copy(&mut file, &mut hasher)?;

    Ok(format!("{:x}", hasher.finalize()))
}

fn hash_line(hash: &str, name: &str) -> String {
    format!("{} *{}{}", hash, name, LINE_END)
}

/// Walks `dir` and computes both manifests without writing anything.
pub(crate) fn build_manifests(reader: &dyn TagReader, dir: &Path, name: &str) -> Result<Manifests> {
    let sidecars = Sidecars::new(dir, name);
    let mut manifests = Manifests::default();
    let mut queue: Vec<String> = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_dir() || sidecars.contains(path) {
            continue;
        }

        let relative = relative_name(dir, path);
        match hash_file(path) {
            Ok(hash) => {
                debug!(file = %relative, %hash, "hashed");
                manifests.hashes.push_str(&hash_line(&hash, &relative));
                if is_audio_file(path) {
                    queue.push(relative);
                }
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "could not hash file");
                manifests.unreadable.push(relative);
            }
        }
    }

    if !queue.is_empty() {
        let fingerprints = reader.fingerprints(dir, &queue)?;
        let document = queue
            .iter()
            .zip(&fingerprints)
            .map(|(file, fingerprint)| format!("{}:{}", file, fingerprint))
            .collect::<Vec<_>>()
            .join(LINE_END);

        let own_name = format!("{}.{}", name, FINGERPRINT_EXTENSION);
        let hash = format!("{:x}", Md5::digest(document.as_bytes()));
        manifests.hashes.push_str(&hash_line(&hash, &own_name));
        manifests.fingerprints = Some(document);
    }

    Ok(manifests)
}

/// Writes the manifests, replacing any previous sidecar files.
///
/// The fingerprint file is written first so that a hash manifest never
/// refers to a fingerprint file that was not created.
pub(crate) fn write_manifests(sidecars: &Sidecars, manifests: &Manifests) -> Result<()> {
    if let Some(fingerprints) = &manifests.fingerprints {
        println!("Creating {}...", sidecars.fingerprints.display());
        fs::write(&sidecars.fingerprints, fingerprints)?;
    }

    if !manifests.hashes.is_empty() {
        println!("Creating {}...", sidecars.hashes.display());
        fs::write(&sidecars.hashes, &manifests.hashes)?;
    }

    Ok(())
}

/// Removes both sidecar files. Missing files are reported, not errors.
pub(crate) fn delete_manifests(sidecars: &Sidecars) -> Result<(Removal, Removal)> {
    let fingerprints = remove_file(&sidecars.fingerprints)?;
    let hashes = remove_file(&sidecars.hashes)?;
    Ok((fingerprints, hashes))
}

/// Creates, or in delete mode removes, the sidecars of one directory.
pub(crate) fn checksum_directory(
    reader: &dyn TagReader,
    dir: &Path,
    name: &str,
    delete_mode: bool,
) -> Result<()> {
    let sidecars = Sidecars::new(dir, name);

    if delete_mode {
        delete_manifests(&sidecars)?;
        return Ok(());
    }

    let manifests = build_manifests(reader, dir, name)?;
    write_manifests(&sidecars, &manifests)?;

    for file in &manifests.unreadable {
        println!("> could not read {}", file);
    }
    println!("Done with {}", dir.display());

    Ok(())
}
