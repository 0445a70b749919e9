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

//! Tour definition files.
//!
//! A tour file lists, one tour per line, the songs that had an alternate lead
//! vocalist on that tour:
//!
//! ```text
//! Summer 2011: Song One, Song Two
//! Winter 2012: Song Three
//! ```

use std::{fs, path::Path};

use crate::{
    error::{Error, Result},
    model::Tour,
};

/// Loads the tour called `name` from the tour file at `path`.
pub(crate) fn load_tour(path: &Path, name: &str) -> Result<Tour> {
    let text = fs::read_to_string(path)?;
    parse_tour(&text, name)
}

/// Finds the first line for `name` and collects its track titles.
pub(crate) fn parse_tour(text: &str, name: &str) -> Result<Tour> {
    let prefix = format!("{}:", name);

    let line = text
        .lines()
        .find_map(|line| line.strip_prefix(&prefix))
        .ok_or_else(|| Error::TourNotFound(name.to_string()))?;

    let mut tour = Tour::new(name);
    tour.tracks = line
        .split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect();

    Ok(tour)
}
