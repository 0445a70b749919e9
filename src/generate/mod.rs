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

//! Info file generation.
//!
//! An info file is a plain-text summary of one recording: album fields, empty
//! lineage and notes sections for a human to fill in, and the track list with
//! durations. Everything comes from the tags of the audio files.
//!
//! A recording either holds its audio files directly or splits them across
//! `CD1`, `CD2`, ... folders. CD folders must hold audio files only; a folder
//! nested inside a CD folder abandons the whole recording, since its track
//! order can no longer be trusted.

pub(crate) mod template;
pub(crate) mod tour;

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    error::{Error, Result},
    generate::template::InfoTemplate,
    model::{Album, Tour, Track},
    tags::{TagReader, is_audio_file},
    util::fs::remove_file,
};

pub(crate) const CD_PREFIX: &str = "CD";
pub(crate) const INFO_EXTENSION: &str = "txt";

const TRACK_TAGS: [&str; 2] = ["title", "tracknumber"];
const ALBUM_TAGS: [&str; 5] = ["title", "tracknumber", "artist", "date", "album"];

/// Where the info file of a recording directory lives.
pub(crate) fn info_file_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, INFO_EXTENSION))
}

/// An audio file to read, with the CD folder it was found in.
#[derive(Debug, Clone, PartialEq)]
struct AudioFile {
    path: PathBuf,
    cd_folder: Option<CdFolder>,
}

/// A `CD<n>` folder of a multi-disc recording.
#[derive(Debug, Clone, PartialEq)]
struct CdFolder {
    name: String,
    disc: u32,
}

impl CdFolder {
    /// Recognises `CD` followed by a disc number, e.g. `CD2` or `CD02`.
    fn parse(name: &str) -> Option<Self> {
        let number = name.strip_prefix(CD_PREFIX)?;
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            disc: number.parse().ok()?,
        })
    }

    /// The disc label as written after the prefix.
    fn label(&self) -> &str {
        &self.name[CD_PREFIX.len()..]
    }
}

/// Lists the entries directly inside `dir`, ordered by name.
fn list_dir(dir: &Path) -> Result<Vec<(String, bool)>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        entries.push((name, entry.file_type().is_dir()));
    }

    Ok(entries)
}

/// Collects the audio files of a recording in track order.
fn collect_audio_files(dir: &Path) -> Result<Vec<AudioFile>> {
    let mut cd_folders = Vec::new();
    let mut extra_folders = Vec::new();
    let mut loose_files = Vec::new();

    for (name, is_dir) in list_dir(dir)? {
        if is_dir {
            match CdFolder::parse(&name) {
                Some(folder) => cd_folders.push(folder),
                None => extra_folders.push(name),
            }
        } else if is_audio_file(Path::new(&name)) {
            loose_files.push(AudioFile {
                path: dir.join(&name),
                cd_folder: None,
            });
        }
    }

    if !extra_folders.is_empty() {
        warn!(dir = %dir.display(), folders = ?extra_folders, "extra non-CD folders are not processed");
    }

    if cd_folders.is_empty() {
        return Ok(loose_files);
    }

    if !loose_files.is_empty() {
        warn!(dir = %dir.display(), "audio files outside CD folders are not processed");
    }

    // Name order would put CD10 before CD2.
    cd_folders.sort_by_key(|folder| folder.disc);

    let mut files = Vec::new();
    for folder in cd_folders {
        let folder_path = dir.join(&folder.name);

        for (name, is_dir) in list_dir(&folder_path)? {
            if is_dir {
                return Err(Error::SkipDirectory(dir.to_path_buf()));
            }
            if is_audio_file(Path::new(&name)) {
                files.push(AudioFile {
                    path: folder_path.join(&name),
                    cd_folder: Some(folder.clone()),
                });
            }
        }
    }

    Ok(files)
}

// Album tags are sometimes written as "2011-05-06 Venue"; keep the venue.
fn strip_date_prefix(album: &str) -> &str {
    let bytes = album.as_bytes();
    let is_date = bytes.len() > 11
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
        && bytes[10] == b' ';

    if is_date { &album[11..] } else { album }
}

fn parse_track_number(value: &str) -> Result<u32> {
    let number = value.split('/').next().unwrap_or_default().trim();
    number.parse().map_err(|_| Error::InvalidNumber {
        field: "track number",
        value: value.to_string(),
    })
}

/// Reads every audio file of a recording into an [`Album`].
///
/// Album-level fields come from the first file only.
pub(crate) fn read_album(reader: &dyn TagReader, dir: &Path, tour: &Tour) -> Result<Album> {
    let files = collect_audio_files(dir)?;

    let mut album = Album {
        tour: tour.name.clone(),
        ..Album::default()
    };

    for (i, file) in files.iter().enumerate() {
        let first = i == 0;
        let requested: &[&str] = if first { &ALBUM_TAGS } else { &TRACK_TAGS };

        debug!(file = %file.path.display(), "reading tags");
        let tags = reader.read_tags(&file.path, requested)?;

        if first {
            album.artist = tags.get("artist").unwrap_or_default().to_string();
            album.date = tags.get("date").unwrap_or_default().to_string();
            album.album = strip_date_prefix(tags.get("album").unwrap_or_default()).to_string();
        }

        let title = tags.get("title").unwrap_or_default().trim().to_string();
        let mut track = Track {
            index: parse_track_number(tags.get("tracknumber").unwrap_or_default())?,
            duration: tags.duration(),
            alternate_vocalist: tour.has_alternate_vocalist(&title),
            title,
            ..Track::default()
        };

        if let Some(folder) = &file.cd_folder {
            track.disc = folder.disc;
            track.prefix = format!("{}.", folder.label());
        }

        debug!(title = %track.title, disc = track.disc, index = track.index, "read track");
        album.duration += track.duration;
        album.tracks.push(track);
    }

    if album.tracks.is_empty() {
        return Err(Error::EmptyAlbum);
    }

    Ok(album)
}

/// Writes, or in delete mode removes, the info file of one recording.
pub(crate) fn generate_info_file(
    reader: &dyn TagReader,
    template: &InfoTemplate,
    tour: &Tour,
    dir: &Path,
    name: &str,
    delete_mode: bool,
) -> Result<()> {
    let output = info_file_path(dir, name);

    if delete_mode {
        remove_file(&output)?;
        return Ok(());
    }

    let album = read_album(reader, dir, tour)?;

    println!("Creating {}...", output.display());
    fs::write(&output, template.render(&album))?;

    Ok(())
}
