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

//! Command execution over one or many recording directories.
//!
//! A [`Task`] is run once per recording directory. In batch mode those are
//! the directories directly inside the target, in name order; in single mode
//! the target itself. A directory that fails is reported and skipped, and the
//! run carries on with the next one.

mod handlers;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::{
    error,
    find::InfoStatus,
    generate::template::InfoTemplate,
    model::Tour,
    tags::TagReader,
    util::fs::Target,
    wiki::{WIKI_OUTPUT_DIR, parse::InfoPattern, render::WikiTemplate},
};

pub(crate) enum Task {
    Checksum,
    Verify,
    Generate {
        tour: Tour,
        template: InfoTemplate,
    },
    Wiki {
        pattern: InfoPattern,
        template: WikiTemplate,
    },
    Find {
        pattern: InfoPattern,
    },
}

/// Bundles shared resources required by task handlers to simplify resource
/// passing when invoking those handler functions.
struct TaskContext<'a> {
    reader: &'a dyn TagReader,
    delete_mode: bool,
    /// Where wiki files are collected, `None` to write them per recording.
    wiki_dir: Option<PathBuf>,
}

/// Lists the recording directories a run covers.
pub(crate) fn recording_dirs(target: &Target, single: bool) -> Result<Vec<Target>> {
    if single {
        return Ok(vec![target.clone()]);
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(&target.path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to read {}", target.path.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().is_dir() && name != WIKI_OUTPUT_DIR {
            dirs.push(Target {
                path: entry.into_path(),
                name,
            });
        }
    }

    Ok(dirs)
}

/// Runs `task` over the target, returning how many directories failed.
pub(crate) fn run_task(
    task: &Task,
    reader: &dyn TagReader,
    target: &Target,
    single: bool,
    delete_mode: bool,
) -> Result<usize> {
    let wiki_dir = match task {
        Task::Wiki { .. } if !single => {
            let dir = target.path.join(WIKI_OUTPUT_DIR);
            if !delete_mode {
                fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
            Some(dir)
        }
        _ => None,
    };

    let ctx = TaskContext {
        reader,
        delete_mode,
        wiki_dir,
    };

    let dirs = recording_dirs(target, single)?;
    info!(count = dirs.len(), root = %target.path.display(), "processing recordings");

    let mut failures = 0;
    for dir in &dirs {
        if let Err(e) = handle_task(task, &ctx, dir) {
            warn!(dir = %dir.path.display(), error = %e, "skipping directory");
            println!("> skipping {}: {}", dir.path.display(), e);
            failures += 1;
        }
    }

    Ok(failures)
}

/// Orchestrates the execution of a single task for one recording.
fn handle_task(task: &Task, ctx: &TaskContext, dir: &Target) -> error::Result<()> {
    match task {
        Task::Checksum => handlers::checksum(ctx, dir),
        Task::Verify => handlers::verify(ctx, dir),
        Task::Generate { tour, template } => handlers::generate(ctx, dir, tour, template),
        Task::Wiki { pattern, template } => handlers::wiki(ctx, dir, pattern, template),
        Task::Find { pattern } => handlers::find(ctx, dir, pattern).map(|status| {
            if let Some(message) = find_message(&status, &dir.path) {
                println!("{}", message);
            }
        }),
    }
}

fn find_message(status: &InfoStatus, dir: &Path) -> Option<String> {
    match status {
        InfoStatus::Missing => Some(format!("No infofile for {}", dir.display())),
        InfoStatus::Unreadable(reason) => Some(format!(
            "Unparseable infofile for {} ({})",
            dir.display(),
            reason
        )),
        InfoStatus::NotesUnfilled => Some(format!("Notes unfilled for {}", dir.display())),
        InfoStatus::Complete => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        tags::testing::{FakeReader, write_fake_flac},
        util::fs::check_directory,
    };

    fn config() -> AppConfig {
        AppConfig {
            base_domain: "https://live.example.org".to_string(),
            wiki_path: "https://live.example.org/wiki".to_string(),
            stream_path: "https://live.example.org/stream".to_string(),
            download_path: "https://live.example.org/downloads".to_string(),
            footer: "Thanks".to_string(),
        }
    }

    fn recording(root: &Path, name: &str) {
        write_fake_flac(
            &root.join(name).join("01.flac"),
            &[
                ("TITLE", "Intro"),
                ("TRACKNUMBER", "1"),
                ("ARTIST", "The Band"),
                ("DATE", "2011-05-06"),
                ("ALBUM", name),
                ("SAMPLES", "441000"),
                ("RATE", "44100"),
                ("BPS", "16"),
            ],
        );
    }

    #[test]
    fn test_recording_dirs_batch_skips_wiki_output() {
        let root = tempfile::tempdir().unwrap();
        recording(root.path(), "b");
        recording(root.path(), "a");
        fs::create_dir(root.path().join(WIKI_OUTPUT_DIR)).unwrap();
        fs::write(root.path().join("notes.txt"), "loose").unwrap();
        let target = check_directory(root.path()).unwrap();

        let names: Vec<String> = recording_dirs(&target, false)
            .unwrap()
            .into_iter()
            .map(|dir| dir.name)
            .collect();

        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_recording_dirs_single() {
        let root = tempfile::tempdir().unwrap();
        let target = check_directory(root.path()).unwrap();

        let dirs = recording_dirs(&target, true).unwrap();

        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].path, target.path);
    }

    #[test]
    fn test_checksum_batch() {
        let root = tempfile::tempdir().unwrap();
        recording(root.path(), "a");
        recording(root.path(), "b");
        let target = check_directory(root.path()).unwrap();

        let failures = run_task(&Task::Checksum, &FakeReader, &target, false, false).unwrap();

        assert_eq!(failures, 0);
        assert!(root.path().join("a").join("a.md5").exists());
        assert!(root.path().join("b").join("b.ffp").exists());
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("a")).unwrap();
        recording(root.path(), "b");
        let target = check_directory(root.path()).unwrap();
        let task = Task::Generate {
            tour: Tour::new("Summer 2011"),
            template: InfoTemplate::new(&config()),
        };

        let failures = run_task(&task, &FakeReader, &target, false, false).unwrap();

        assert_eq!(failures, 1);
        assert!(!root.path().join("a").join("a.txt").exists());
        assert!(root.path().join("b").join("b.txt").exists());
    }

    #[test]
    fn test_generate_then_wiki_batch() {
        let root = tempfile::tempdir().unwrap();
        recording(root.path(), "a");
        let target = check_directory(root.path()).unwrap();
        let config = config();

        let generate = Task::Generate {
            tour: Tour::new("Summer 2011"),
            template: InfoTemplate::new(&config),
        };
        let wiki = Task::Wiki {
            pattern: InfoPattern::new(&config.wiki_path).unwrap(),
            template: WikiTemplate::new(&config),
        };
        assert_eq!(run_task(&generate, &FakeReader, &target, false, false).unwrap(), 0);
        assert_eq!(run_task(&wiki, &FakeReader, &target, false, false).unwrap(), 0);

        let output = target.path.join(WIKI_OUTPUT_DIR).join("2011-05-06 a_Source 1.wiki");
        let wiki = fs::read_to_string(output).unwrap();
        assert!(wiki.contains("{{Track|num=01|title=Intro|length=0:10|"));
    }

    #[test]
    fn test_find_messages() {
        let dir = Path::new("/music/show");

        assert_eq!(
            find_message(&InfoStatus::Missing, dir).as_deref(),
            Some("No infofile for /music/show")
        );
        assert_eq!(
            find_message(&InfoStatus::NotesUnfilled, dir).as_deref(),
            Some("Notes unfilled for /music/show")
        );
        assert_eq!(find_message(&InfoStatus::Complete, dir), None);
    }
}
