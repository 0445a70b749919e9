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

//! Reading edited info files back in.
//!
//! An info file is matched as a whole against one pattern built from the
//! section headers the info template writes. The track list section is then
//! read line by line:
//!
//! ```text
//! 1.01 [3:45] Track One
//! 1.02 [4:12] Track Two (*)
//! 2.01 [2:00] Track Three
//! ```
//!
//! The part before `.` is the disc. Track numbers are recounted from 1
//! whenever the disc changes, and ` (*)` marks an alternate lead vocalist.
//! A purely numeric position (`01`) is a single-disc track. Anything else,
//! such as `Bonus`, is rejected.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{
    error::{Error, Result},
    generate::{
        CD_PREFIX,
        template::{
            ALTERNATE_VOCALIST_MARK, LINEAGE_HEADER, NOTES_HEADER, SOURCE_SENTENCE_END,
            SOURCE_SENTENCE_START, TOTAL_TIME_HEADER, TRACK_LIST_HEADER,
        },
    },
    model::{WikiAlbum, WikiTrack},
};

const SECTION_COUNT: usize = 5;

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(.*?)""#).expect("quoted span pattern"));

/// The sections of an info file.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct InfoSections {
    pub(crate) lineage: String,
    pub(crate) notes: String,
    /// Wiki page path of the source, still URL-escaped.
    pub(crate) source: String,
    pub(crate) track_list: String,
    pub(crate) total_time: String,
}

/// The compiled info file pattern.
pub(crate) struct InfoPattern {
    regex: Regex,
}

impl InfoPattern {
    /// Builds the pattern for info files that link to pages below `wiki_path`.
    pub(crate) fn new(wiki_path: &str) -> std::result::Result<Self, regex::Error> {
        let pattern = format!(
            r"(?s)\A.*?\r?\n{lineage}(.*?)\r?\n\r?\n{notes}(.*?)\r?\n\r?\n{start}\d+{end}\r?\n{wiki}/(\S+)\r?\n\r?\n{tracks}\r?\n\r?\n(.*?)\r?\n\r?\n{total} ?(\S+)",
            lineage = regex::escape(LINEAGE_HEADER),
            notes = regex::escape(NOTES_HEADER),
            start = regex::escape(SOURCE_SENTENCE_START),
            end = regex::escape(SOURCE_SENTENCE_END),
            wiki = regex::escape(wiki_path.trim_end_matches('/')),
            tracks = regex::escape(TRACK_LIST_HEADER),
            total = regex::escape(TOTAL_TIME_HEADER),
        );

        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    /// Splits an info file into its sections.
    pub(crate) fn extract(&self, text: &str) -> Result<InfoSections> {
        let captures = self.regex.captures(text).ok_or(Error::InfoFileLayout)?;
        if captures.len() != SECTION_COUNT + 1 {
            return Err(Error::InfoFileLayout);
        }

        let section = |i: usize| {
            captures
                .get(i)
                .map(|m| m.as_str().trim().to_string())
                .ok_or(Error::InfoFileLayout)
        };

        Ok(InfoSections {
            lineage: section(1)?,
            notes: section(2)?,
            source: section(3)?,
            track_list: section(4)?,
            total_time: section(5)?,
        })
    }
}

/// One line of the track list, before disc numbering.
#[derive(Debug, PartialEq)]
struct TrackLine<'a> {
    /// Disc label as written, `None` for a single-disc track.
    disc: Option<&'a str>,
    duration: &'a str,
    title: &'a str,
    alternate_vocalist: bool,
}

fn parse_track_line(line: &str) -> Result<TrackLine<'_>> {
    let invalid = |reason| Error::InvalidTrackLine {
        line: line.to_string(),
        reason,
    };
    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    let open = line.find('[').ok_or_else(|| invalid("missing '['"))?;
    let close = line[open..]
        .find(']')
        .map(|i| i + open)
        .ok_or_else(|| invalid("missing ']'"))?;

    let position = line[..open].trim();
    let disc = match position.split_once('.') {
        Some((disc, _)) if is_number(disc) => Some(disc),
        Some(_) => return Err(invalid("disc number is not numeric")),
        None if is_number(position) => None,
        None if position.is_empty() => return Err(invalid("missing track position")),
        None => return Err(invalid("unsupported track position")),
    };

    let name = line[close + 1..].trim();
    let (title, alternate_vocalist) = match name.strip_suffix(ALTERNATE_VOCALIST_MARK) {
        Some(title) => (title.trim_end(), true),
        None => (name, false),
    };
    if title.is_empty() {
        return Err(invalid("missing title"));
    }

    Ok(TrackLine {
        disc,
        duration: line[open + 1..close].trim(),
        title,
        alternate_vocalist,
    })
}

/// Reads the track list section into numbered tracks.
///
/// `folder` is the recording folder; tracks on a disc live in its `CD<n>`
/// subfolder.
pub(crate) fn parse_track_list(track_list: &str, folder: &str) -> Result<Vec<WikiTrack>> {
    let mut tracks = Vec::new();
    let mut last_disc = 0;
    let mut index = 0;

    for line in track_list.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let parsed = parse_track_line(line)?;

        let disc = match parsed.disc {
            Some(label) => label.parse().map_err(|_| Error::InvalidTrackLine {
                line: line.to_string(),
                reason: "disc number is out of range",
            })?,
            None => 0,
        };

        let starts_disc = disc != last_disc;
        if starts_disc {
            index = 0;
        }
        index += 1;
        last_disc = disc;

        let folder = match parsed.disc {
            Some(label) => format!("{}/{}{}", folder, CD_PREFIX, label),
            None => folder.to_string(),
        };

        tracks.push(WikiTrack {
            title: parsed.title.to_string(),
            index,
            duration: parsed.duration.to_string(),
            disc,
            alternate_vocalist: parsed.alternate_vocalist,
            folder,
            starts_disc,
        });
    }

    Ok(tracks)
}

/// Turns each non-empty lineage line into a bullet.
pub(crate) fn bullet_lineage(lineage: &str) -> String {
    lineage
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("* {}", line))
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Links quoted track titles in the notes to their tracks.
pub(crate) fn link_track_titles(notes: &str, tracks: &[WikiTrack]) -> String {
    QUOTED
        .replace_all(notes, |caps: &Captures| {
            let quoted = &caps[1];
            if tracks.iter().any(|track| track.title == quoted) {
                format!("\"[[{}]]\"", quoted)
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Builds the parts of a [`WikiAlbum`] that come from the info file.
pub(crate) fn album_from_sections(sections: &InfoSections, folder_name: &str) -> Result<WikiAlbum> {
    let tracks = parse_track_list(&sections.track_list, folder_name)?;

    Ok(WikiAlbum {
        folder_name: folder_name.to_string(),
        notes: link_track_titles(&sections.notes, &tracks),
        lineage: bullet_lineage(&sections.lineage),
        duration: sections.total_time.clone(),
        tracks,
        ..WikiAlbum::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIKI: &str = "https://live.example.org/wiki";

    fn info_file() -> String {
        [
            "The Band",
            "2011-05-06",
            "Gorge, WA",
            "Tour: Summer 2011",
            "",
            "Lineage: ",
            "Schoeps MK4 > Sound Devices 722",
            "  > Audacity > FLAC",
            "",
            "Notes: Great \"Track Two\" and a \"Jam\".",
            "Second line.",
            "",
            "This source is considered Source 2 for this date:",
            "https://live.example.org/wiki/2011-05-06_Gorge%2C_WA/Source_2",
            "",
            "Track list:",
            "",
            "1.01 [3:45] Track One",
            "1.02 [4:12] Track Two (*)",
            "2.01 [2:00] Track Three",
            "",
            "Total time: 9:57",
            "",
            "Thanks",
            "",
        ]
        .join("\r\n")
    }

    #[test]
    fn test_extract_sections() {
        let pattern = InfoPattern::new(WIKI).unwrap();
        let sections = pattern.extract(&info_file()).unwrap();

        assert_eq!(
            sections.lineage,
            "Schoeps MK4 > Sound Devices 722\r\n  > Audacity > FLAC"
        );
        assert_eq!(sections.notes, "Great \"Track Two\" and a \"Jam\".\r\nSecond line.");
        assert_eq!(sections.source, "2011-05-06_Gorge%2C_WA/Source_2");
        assert_eq!(sections.track_list.lines().count(), 3);
        assert_eq!(sections.total_time, "9:57");
    }

    #[test]
    fn test_extract_accepts_lf_line_endings() {
        let pattern = InfoPattern::new(WIKI).unwrap();
        let text = info_file().replace("\r\n", "\n");

        assert_eq!(pattern.extract(&text).unwrap().total_time, "9:57");
    }

    #[test]
    fn test_extract_requires_total_time() {
        let pattern = InfoPattern::new(WIKI).unwrap();
        let text = info_file().replace("Total time: 9:57", "9:57");

        assert!(matches!(pattern.extract(&text), Err(Error::InfoFileLayout)));
    }

    #[test]
    fn test_extract_requires_matching_wiki_path() {
        let pattern = InfoPattern::new("https://other.example.org/wiki/").unwrap();

        assert!(pattern.extract(&info_file()).is_err());
    }

    #[test]
    fn test_track_list_renumbers_across_discs() {
        let list = "1.01 [3:45] Track One\r\n1.02 [4:12] Track Two (*)\r\n2.01 [2:00] Track Three";
        let tracks = parse_track_list(list, "show").unwrap();

        let summary: Vec<(&str, u32, u32, bool, bool)> = tracks
            .iter()
            .map(|t| (t.title.as_str(), t.disc, t.index, t.alternate_vocalist, t.starts_disc))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Track One", 1, 1, false, true),
                ("Track Two", 1, 2, true, false),
                ("Track Three", 2, 1, false, true),
            ]
        );
        assert_eq!(tracks[0].duration, "3:45");
        assert_eq!(tracks[0].folder, "show/CD1");
        assert_eq!(tracks[2].folder, "show/CD2");
    }

    #[test]
    fn test_track_list_single_disc() {
        let tracks = parse_track_list("01 [0:45] Intro\n02 [5:01] Song", "show").unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].index, 2);
        assert_eq!(tracks[1].disc, 0);
        assert_eq!(tracks[1].folder, "show");
        assert!(!tracks[0].starts_disc);
    }

    #[test]
    fn test_track_list_rejects_bonus_position() {
        let result = parse_track_list("1.01 [3:45] One\nBonus [2:00] Extra", "show");

        assert!(matches!(
            result,
            Err(Error::InvalidTrackLine { reason: "unsupported track position", .. })
        ));
    }

    #[test]
    fn test_track_line_requires_brackets() {
        assert!(matches!(
            parse_track_line("1.01 3:45 Track One"),
            Err(Error::InvalidTrackLine { reason: "missing '['", .. })
        ));
        assert!(matches!(
            parse_track_line("1.01 [3:45 Track One"),
            Err(Error::InvalidTrackLine { reason: "missing ']'", .. })
        ));
        assert!(matches!(
            parse_track_line("[3:45] Track One"),
            Err(Error::InvalidTrackLine { reason: "missing track position", .. })
        ));
    }

    #[test]
    fn test_link_track_titles() {
        let tracks = parse_track_list("01 [3:45] Track Two", "show").unwrap();
        let notes = link_track_titles("Great \"Track Two\" and a \"Jam\".", &tracks);

        assert_eq!(notes, "Great \"[[Track Two]]\" and a \"Jam\".");
    }

    #[test]
    fn test_bullet_lineage() {
        assert_eq!(
            bullet_lineage(" Mics > DAT\r\n\r\n  > FLAC "),
            "* Mics > DAT\r\n* > FLAC"
        );
    }

    #[test]
    fn test_album_from_sections() {
        let pattern = InfoPattern::new(WIKI).unwrap();
        let sections = pattern.extract(&info_file()).unwrap();
        let album = album_from_sections(&sections, "show").unwrap();

        assert_eq!(album.folder_name, "show");
        assert_eq!(album.duration, "9:57");
        assert_eq!(album.tracks.len(), 3);
        assert!(album.notes.contains("\"[[Track Two]]\""));
        assert!(album.notes.contains("\"Jam\""));
        assert!(album.lineage.starts_with("* Schoeps"));
    }
}
