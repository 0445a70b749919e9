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

//! Wiki page generation from edited info files.

pub(crate) mod parse;
pub(crate) mod render;

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    error::Result,
    generate::info_file_path,
    tags::{StreamFormat, TagReader, is_audio_file},
    util::{
        format::{format_sample_rate, format_size, wiki_file_stem},
        fs::{directory_size, remove_file},
    },
    wiki::{
        parse::{InfoPattern, album_from_sections},
        render::WikiTemplate,
    },
};

pub(crate) const WIKI_EXTENSION: &str = "wiki";

/// Folder below the library root that collects wiki files in batch mode.
pub(crate) const WIKI_OUTPUT_DIR: &str = "__wikifiles";

/// Where the wiki file for the source page `source` is written.
pub(crate) fn wiki_file_path(output_dir: &Path, source: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", wiki_file_stem(source), WIKI_EXTENSION))
}

/// Reads the stream format of the first audio file below `dir`.
fn first_stream_format(reader: &dyn TagReader, dir: &Path) -> Result<Option<StreamFormat>> {
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_audio_file(entry.path()) {
            debug!(path = %entry.path().display(), "reading stream format");
            return reader.stream_format(entry.path()).map(Some);
        }
    }

    Ok(None)
}

/// Writes, or in delete mode removes, the wiki file of one recording.
///
/// The file goes into `output_dir` when given, otherwise next to the info
/// file.
pub(crate) fn generate_wiki_file(
    reader: &dyn TagReader,
    pattern: &InfoPattern,
    template: &WikiTemplate,
    dir: &Path,
    name: &str,
    output_dir: Option<&Path>,
    delete_mode: bool,
) -> Result<()> {
    let info_path = info_file_path(dir, name);
    let text = String::from_utf8_lossy(&fs::read(&info_path)?).into_owned();

    let sections = pattern.extract(&text)?;
    let output = wiki_file_path(output_dir.unwrap_or(dir), &sections.source);

    if delete_mode {
        remove_file(&output)?;
        return Ok(());
    }

    let mut album = album_from_sections(&sections, name)?;
    album.size = format_size(directory_size(dir)?);

    match first_stream_format(reader, dir)? {
        Some(format) => {
            album.sample_rate = format_sample_rate(format.sample_rate);
            album.bits_per_sample = format.bits_per_sample.to_string();
        }
        None => warn!(dir = %dir.display(), "no audio file to read the stream format from"),
    }

    if output.exists() {
        println!("Overwriting {}...", output.display());
        fs::remove_file(&output)?;
    } else {
        println!("Creating {}...", output.display());
    }
    fs::write(&output, template.render(&album))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        error::Error,
        tags::testing::{FakeReader, write_fake_flac},
    };

    const WIKI: &str = "https://live.example.org/wiki";

    fn config() -> AppConfig {
        AppConfig {
            base_domain: "https://live.example.org".to_string(),
            wiki_path: WIKI.to_string(),
            stream_path: "https://live.example.org/stream".to_string(),
            download_path: "https://live.example.org/downloads".to_string(),
            footer: "Thanks".to_string(),
        }
    }

    fn info_text(track_list: &str) -> String {
        format!(
            "The Band\r\n2011-05-06\r\nGorge, WA\r\nTour: Summer 2011\r\n\r\n\
             Lineage: Mics > FLAC\r\n\r\nNotes: A fine \"Track Two\".\r\n\r\n\
             This source is considered Source 1 for this date:\r\n\
             {}/2011-05-06_Gorge%2C_WA/Source_1\r\n\r\nTrack list:\r\n\r\n{}\r\n\r\n\
             Total time: 9:57\r\n\r\nThanks\r\n",
            WIKI, track_list
        )
    }

    fn recording(root: &Path, track_list: &str) -> PathBuf {
        let dir = root.join("show");
        write_fake_flac(
            &dir.join("CD1").join("01.flac"),
            &[("RATE", "48000"), ("BPS", "24")],
        );
        fs::write(dir.join("show.txt"), info_text(track_list)).unwrap();
        dir
    }

    fn run(dir: &Path, output_dir: Option<&Path>, delete_mode: bool) -> Result<()> {
        let config = config();
        generate_wiki_file(
            &FakeReader,
            &InfoPattern::new(&config.wiki_path).unwrap(),
            &WikiTemplate::new(&config),
            dir,
            "show",
            output_dir,
            delete_mode,
        )
    }

    #[test]
    fn test_wiki_file_path() {
        let path = wiki_file_path(Path::new("/out"), "2011-05-06_Gorge%2C_WA/Source_1");

        assert_eq!(path, Path::new("/out/2011-05-06 Gorge, WA_Source 1.wiki"));
    }

    #[test]
    fn test_generate_wiki_file() {
        let root = tempfile::tempdir().unwrap();
        let dir = recording(
            root.path(),
            "1.01 [3:45] Track One\r\n1.02 [4:12] Track Two (*)\r\n2.01 [2:00] Track Three",
        );

        run(&dir, None, false).unwrap();

        let output = wiki_file_path(&dir, "2011-05-06_Gorge%2C_WA/Source_1");
        let wiki = fs::read_to_string(output).unwrap();
        assert!(wiki.contains("|samplerate=48KHz\r\n"));
        assert!(wiki.contains("|bitdepth=24\r\n"));
        assert!(wiki.contains("|length=9:57\r\n"));
        assert!(wiki.contains("* Mics > FLAC\r\n"));
        assert!(wiki.contains("A fine \"[[Track Two]]\"."));
        assert!(wiki.contains("'''CD2'''\r\n{{Track|num=01|title=Track Three|"));
        assert!(wiki.contains("title=Track Two|length=4:12|stream=https://live.example.org/stream/show/CD1|alt=yes}}"));
    }

    #[test]
    fn test_generate_wiki_file_overwrites_into_output_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = recording(root.path(), "01 [9:57] Only Track");
        let out = root.path().join(WIKI_OUTPUT_DIR);
        fs::create_dir(&out).unwrap();
        let output = wiki_file_path(&out, "2011-05-06_Gorge%2C_WA/Source_1");
        fs::write(&output, "stale").unwrap();

        run(&dir, Some(out.as_path()), false).unwrap();

        let wiki = fs::read_to_string(&output).unwrap();
        assert!(wiki.contains("title=Only Track"));
        assert!(!wiki.contains("'''CD"));
    }

    #[test]
    fn test_generate_wiki_file_rejects_bonus_tracks() {
        let root = tempfile::tempdir().unwrap();
        let dir = recording(root.path(), "1.01 [3:45] Track One\r\nBonus [2:00] Extra");

        let result = run(&dir, None, false);

        assert!(matches!(result, Err(Error::InvalidTrackLine { .. })));
        assert!(!wiki_file_path(&dir, "2011-05-06_Gorge%2C_WA/Source_1").exists());
    }

    #[test]
    fn test_generate_wiki_file_requires_info_file() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("empty");
        fs::create_dir(&dir).unwrap();

        assert!(matches!(run(&dir, None, false), Err(Error::Io(_))));
    }

    #[test]
    fn test_delete_mode_removes_wiki_file() {
        let root = tempfile::tempdir().unwrap();
        let dir = recording(root.path(), "01 [9:57] Only Track");
        run(&dir, None, false).unwrap();
        let output = wiki_file_path(&dir, "2011-05-06_Gorge%2C_WA/Source_1");
        assert!(output.exists());

        run(&dir, None, true).unwrap();

        assert!(!output.exists());
        assert!(dir.join("show.txt").exists());
    }
}
