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

//! The info file template.
//!
//! The wording of the section headers is shared with the wiki parser, which
//! reads edited info files back with a fixed pattern.

use crate::{
    config::AppConfig,
    model::{Album, Track},
    util::format::{format_duration, wiki_escape},
};

pub(crate) const LINEAGE_HEADER: &str = "Lineage:";
pub(crate) const NOTES_HEADER: &str = "Notes:";
pub(crate) const SOURCE_SENTENCE_START: &str = "This source is considered Source ";
pub(crate) const SOURCE_SENTENCE_END: &str = " for this date:";
pub(crate) const TRACK_LIST_HEADER: &str = "Track list:";
pub(crate) const TOTAL_TIME_HEADER: &str = "Total time:";

pub(crate) const ALTERNATE_VOCALIST_MARK: &str = " (*)";

/// Renders [`Album`]s as info files, with CRLF line endings.
#[derive(Debug, Clone)]
pub(crate) struct InfoTemplate {
    wiki_path: String,
    footer: String,
}

impl InfoTemplate {
    pub(crate) fn new(config: &AppConfig) -> Self {
        Self {
            wiki_path: config.wiki_path.trim_end_matches('/').to_string(),
            footer: config.footer.replace("\r\n", "\n").trim_end().to_string(),
        }
    }

    pub(crate) fn render(&self, album: &Album) -> String {
        let page = wiki_escape(&format!("{} {}", album.date, album.album));

        let mut lines = vec![
            album.artist.clone(),
            album.date.clone(),
            album.album.clone(),
            format!("Tour: {}", album.tour),
            String::new(),
            format!("{} ", LINEAGE_HEADER),
            String::new(),
            format!("{} ", NOTES_HEADER),
            String::new(),
            format!("{}1{}", SOURCE_SENTENCE_START, SOURCE_SENTENCE_END),
            format!("{}/{}/Source_1", self.wiki_path, page),
            String::new(),
            TRACK_LIST_HEADER.to_string(),
            String::new(),
        ];
        lines.extend(album.tracks.iter().map(track_line));
        lines.push(String::new());
        lines.push(format!("{} {}", TOTAL_TIME_HEADER, format_duration(album.duration)));
        lines.push(String::new());
        lines.push(self.footer.clone());

        // The footer may span several lines.
        format!("{}\n", lines.join("\n")).replace('\n', "\r\n")
    }
}

fn track_line(track: &Track) -> String {
    format!(
        "{}{:02} [{}] {}{}",
        track.prefix,
        track.index,
        format_duration(track.duration),
        track.title,
        if track.alternate_vocalist {
            ALTERNATE_VOCALIST_MARK
        } else {
            ""
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            base_domain: "https://live.example.org".to_string(),
            wiki_path: "https://live.example.org/wiki/".to_string(),
            stream_path: "https://live.example.org/stream".to_string(),
            download_path: "https://live.example.org/downloads".to_string(),
            footer: "Visit us!\r\nThanks".to_string(),
        }
    }

    #[test]
    fn test_track_line() {
        let track = Track {
            title: "Track Two".to_string(),
            index: 2,
            duration: 252,
            disc: 1,
            alternate_vocalist: true,
            prefix: "1.".to_string(),
        };

        assert_eq!(track_line(&track), "1.02 [4:12] Track Two (*)");
    }

    #[test]
    fn test_render() {
        let album = Album {
            artist: "The Band".to_string(),
            date: "2011-05-06".to_string(),
            album: "Gorge, WA".to_string(),
            tour: "Summer 2011".to_string(),
            tracks: vec![Track {
                title: "Intro".to_string(),
                index: 1,
                duration: 45,
                ..Track::default()
            }],
            duration: 45,
        };

        let expected = "The Band\r\n\
            2011-05-06\r\n\
            Gorge, WA\r\n\
            Tour: Summer 2011\r\n\
            \r\n\
            Lineage: \r\n\
            \r\n\
            Notes: \r\n\
            \r\n\
            This source is considered Source 1 for this date:\r\n\
            https://live.example.org/wiki/2011-05-06_Gorge%2C_WA/Source_1\r\n\
            \r\n\
            Track list:\r\n\
            \r\n\
            01 [0:45] Intro\r\n\
            \r\n\
            Total time: 0:45\r\n\
            \r\n\
            Visit us!\r\n\
            Thanks\r\n";

        assert_eq!(InfoTemplate::new(&config()).render(&album), expected);
    }
}
