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

//! Domain models and core data structures.
//!
//! This module defines the records that flow between the directory walkers
//! and the templates: the [`Album`] and [`Track`] built from embedded tags,
//! the [`Tour`] used to flag alternate lead vocalists, and the [`WikiAlbum`]
//! and [`WikiTrack`] built from an edited info file.

use std::collections::HashSet;

/// One audio file of a recording, as read from its tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Track {
    pub(crate) title: String,
    pub(crate) index: u32,
    /// Length in whole seconds.
    pub(crate) duration: u64,
    /// Disc number, 0 for a single-disc recording.
    pub(crate) disc: u32,
    pub(crate) alternate_vocalist: bool,
    /// Rendered in front of the track number, e.g. `"2."` for the second CD.
    pub(crate) prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Album {
    pub(crate) artist: String,
    pub(crate) date: String,
    pub(crate) album: String,
    pub(crate) tour: String,
    pub(crate) tracks: Vec<Track>,
    /// Sum of the track durations, in seconds.
    pub(crate) duration: u64,
}

/// A touring era and the songs that had an alternate lead vocalist on it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tour {
    pub(crate) name: String,
    pub(crate) tracks: HashSet<String>,
}

impl Tour {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: HashSet::new(),
        }
    }

    pub(crate) fn has_alternate_vocalist(&self, title: &str) -> bool {
        self.tracks.contains(title.trim())
    }
}

/// A track parsed back out of the track list of an info file.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct WikiTrack {
    pub(crate) title: String,
    /// Position within its disc, starting at 1.
    pub(crate) index: u32,
    pub(crate) duration: String,
    pub(crate) disc: u32,
    pub(crate) alternate_vocalist: bool,
    /// Folder holding the audio, relative to the library root.
    pub(crate) folder: String,
    /// Set on the first track of each disc.
    pub(crate) starts_disc: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct WikiAlbum {
    pub(crate) folder_name: String,
    pub(crate) notes: String,
    pub(crate) lineage: String,
    pub(crate) size: String,
    pub(crate) sample_rate: String,
    pub(crate) bits_per_sample: String,
    pub(crate) duration: String,
    pub(crate) tracks: Vec<WikiTrack>,
}
