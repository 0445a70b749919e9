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

//! The wiki page template.

use crate::{
    config::AppConfig,
    generate::CD_PREFIX,
    model::{WikiAlbum, WikiTrack},
};

/// Renders [`WikiAlbum`]s as wiki markup, with CRLF line endings.
#[derive(Debug, Clone)]
pub(crate) struct WikiTemplate {
    stream_path: String,
    download_path: String,
}

impl WikiTemplate {
    pub(crate) fn new(config: &AppConfig) -> Self {
        Self {
            stream_path: config.stream_path.trim_end_matches('/').to_string(),
            download_path: config.download_path.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn render(&self, album: &WikiAlbum) -> String {
        let mut lines = vec![
            "{{Source".to_string(),
            format!("|folder={}", album.folder_name),
            format!("|size={}", album.size),
            format!("|samplerate={}", album.sample_rate),
            format!("|bitdepth={}", album.bits_per_sample),
            format!("|length={}", album.duration),
            format!("|download={}/{}", self.download_path, url_path(&album.folder_name)),
            "}}".to_string(),
            String::new(),
            "== Lineage ==".to_string(),
            album.lineage.clone(),
            String::new(),
            "== Notes ==".to_string(),
            album.notes.clone(),
            String::new(),
            "== Track list ==".to_string(),
        ];

        for track in &album.tracks {
            if track.starts_disc && track.disc > 0 {
                lines.push(format!("'''{}{}'''", CD_PREFIX, track.disc));
            }
            lines.push(self.track_row(track));
        }

        // Notes and lineage keep the line endings they were edited with.
        format!("{}\n", lines.join("\n"))
            .replace("\r\n", "\n")
            .replace('\n', "\r\n")
    }

    fn track_row(&self, track: &WikiTrack) -> String {
        format!(
            "{{{{Track|num={:02}|title={}|length={}|stream={}/{}{}}}}}",
            track.index,
            track.title,
            track.duration,
            self.stream_path,
            url_path(&track.folder),
            if track.alternate_vocalist { "|alt=yes" } else { "" }
        )
    }
}

/// Percent-encodes each segment of a `/`-separated folder path.
fn url_path(folder: &str) -> String {
    folder
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> WikiTemplate {
        WikiTemplate::new(&AppConfig {
            base_domain: "https://live.example.org".to_string(),
            wiki_path: "https://live.example.org/wiki".to_string(),
            stream_path: "https://live.example.org/stream/".to_string(),
            download_path: "https://live.example.org/downloads".to_string(),
            footer: "Thanks".to_string(),
        })
    }

    fn track(title: &str, index: u32, disc: u32, starts_disc: bool) -> WikiTrack {
        WikiTrack {
            title: title.to_string(),
            index,
            duration: "3:45".to_string(),
            disc,
            alternate_vocalist: false,
            folder: if disc > 0 {
                format!("gd 1977/CD{}", disc)
            } else {
                "gd 1977".to_string()
            },
            starts_disc,
        }
    }

    #[test]
    fn test_url_path_keeps_separators() {
        assert_eq!(url_path("gd 1977/CD1"), "gd%201977/CD1");
    }

    #[test]
    fn test_track_row() {
        let mut row = track("Scarlet Begonias", 3, 1, false);
        row.alternate_vocalist = true;

        assert_eq!(
            template().track_row(&row),
            "{{Track|num=03|title=Scarlet Begonias|length=3:45|stream=https://live.example.org/stream/gd%201977/CD1|alt=yes}}"
        );
    }

    #[test]
    fn test_render() {
        let album = WikiAlbum {
            folder_name: "gd 1977".to_string(),
            notes: "Great \"[[Two]]\".\r\nMore.".to_string(),
            lineage: "* Mics\r\n* FLAC".to_string(),
            size: "1.50GB".to_string(),
            sample_rate: "44.1KHz".to_string(),
            bits_per_sample: "16".to_string(),
            duration: "9:57".to_string(),
            tracks: vec![
                track("One", 1, 1, true),
                track("Two", 2, 1, false),
                track("Three", 1, 2, true),
            ],
        };

        let expected = [
            "{{Source",
            "|folder=gd 1977",
            "|size=1.50GB",
            "|samplerate=44.1KHz",
            "|bitdepth=16",
            "|length=9:57",
            "|download=https://live.example.org/downloads/gd%201977",
            "}}",
            "",
            "== Lineage ==",
            "* Mics",
            "* FLAC",
            "",
            "== Notes ==",
            "Great \"[[Two]]\".",
            "More.",
            "",
            "== Track list ==",
            "'''CD1'''",
            "{{Track|num=01|title=One|length=3:45|stream=https://live.example.org/stream/gd%201977/CD1}}",
            "{{Track|num=02|title=Two|length=3:45|stream=https://live.example.org/stream/gd%201977/CD1}}",
            "'''CD2'''",
            "{{Track|num=01|title=Three|length=3:45|stream=https://live.example.org/stream/gd%201977/CD2}}",
            "",
        ]
        .join("\r\n");

        assert_eq!(template().render(&album), expected);
    }

    #[test]
    fn test_render_single_disc_has_no_disc_headers() {
        let album = WikiAlbum {
            tracks: vec![track("One", 1, 0, false), track("Two", 2, 0, false)],
            ..WikiAlbum::default()
        };

        assert!(!template().render(&album).contains("'''CD"));
    }
}
