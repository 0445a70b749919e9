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

//! # Live recording library tool.
//!
//! Maintains the metadata that accompanies a library of live concert
//! recordings kept as FLAC files, one directory per recording.
//!
//! * `checksum` writes `.md5` and `.ffp` sidecars for each recording.
//! * `verify` checks those sidecars against the files on disk.
//! * `generate` writes an info file from the embedded tags.
//! * `wiki` turns an edited info file into a wiki page.
//! * `find` lists recordings whose info files still need editing.
//!
//! Each command runs over every recording directory inside the given path, or
//! with `--single` over the given directory alone. Embedded tags are read
//! through the external `metaflac` utility.

mod checksum;
mod config;
mod error;
mod find;
mod generate;
mod model;
mod tags;
mod tasks;
mod util;
mod verify;
mod wiki;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{AppConfig, load_config},
    generate::{template::InfoTemplate, tour::load_tour},
    model::Tour,
    tags::metaflac::Metaflac,
    tasks::{Task, run_task},
    util::{
        fs::{check_directory, check_file},
        term::{notify_delete_mode, should_continue},
    },
    wiki::{parse::InfoPattern, render::WikiTemplate},
};

#[derive(Parser, Debug)]
#[command(name = "livewiki")]
#[command(about = "Checksums, info files and wiki pages for a live recording library")]
#[command(version)]
struct Cli {
    /// Skip the confirmation prompt
    #[arg(short, long, global = true)]
    force: bool,

    /// Remove the files the command would otherwise create
    #[arg(long, global = true)]
    delete: bool,

    /// Process the given directory instead of each directory inside it
    #[arg(short, long, global = true)]
    single: bool,

    /// Configuration file
    #[arg(long, global = true, env = "LIVEWIKI_CONFIG")]
    config: Option<PathBuf>,

    /// The metaflac binary used to read tags
    #[arg(long, global = true, env = "LIVEWIKI_METAFLAC", default_value = "metaflac")]
    metaflac: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write md5 and ffp sidecar files
    Checksum { path: PathBuf },

    /// Check recordings against their sidecar files
    Verify { path: PathBuf },

    /// Write info files from the embedded tags
    Generate {
        path: PathBuf,

        /// Name of the tour the recordings belong to
        #[arg(long)]
        tour: String,

        /// File listing the songs with an alternate lead vocalist per tour
        #[arg(long)]
        tour_file: Option<PathBuf>,
    },

    /// Write wiki pages from edited info files
    Wiki { path: PathBuf },

    /// List recordings whose info files still need editing
    Find { path: PathBuf },
}

impl Command {
    fn path(&self) -> &PathBuf {
        match self {
            Command::Checksum { path }
            | Command::Verify { path }
            | Command::Generate { path, .. }
            | Command::Wiki { path }
            | Command::Find { path } => path,
        }
    }
}

/// The entry point of the application.
///
/// Validates the target, asks for confirmation, then runs the command over
/// every recording directory. Failures in one recording are reported and the
/// run continues; only setup failures end the process with an error.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.delete && matches!(cli.command, Command::Verify { .. } | Command::Find { .. }) {
        println!("Delete mode doesn't apply to this command");
        return Ok(());
    }

    let target = check_directory(cli.command.path())?;
    let Some(task) = build_task(&cli)? else {
        return Ok(());
    };

    let mode = if cli.single { "single" } else { "batch" };
    println!(
        "The following filepath ({} mode) will be processed: {}",
        mode,
        target.path.display()
    );
    notify_delete_mode(cli.delete);

    if !should_continue(cli.force) {
        return Ok(());
    }

    let reader = Metaflac::new(cli.metaflac.clone());
    let failures = run_task(&task, &reader, &target, cli.single, cli.delete)?;

    if failures > 0 {
        error!(failures, "some recordings were skipped");
    } else {
        info!("all recordings processed");
    }

    Ok(())
}

/// Prepares the task for the command, or `None` if the user backed out.
fn build_task(cli: &Cli) -> Result<Option<Task>> {
    let task = match &cli.command {
        Command::Checksum { .. } => Task::Checksum,
        Command::Verify { .. } => Task::Verify,
        Command::Generate {
            tour, tour_file, ..
        } => {
            let config = config(cli)?;
            let Some(tour) = tour_for(tour, tour_file.as_deref(), cli.force)? else {
                return Ok(None);
            };
            Task::Generate {
                tour,
                template: InfoTemplate::new(&config),
            }
        }
        Command::Wiki { .. } => {
            let config = config(cli)?;
            Task::Wiki {
                pattern: info_pattern(&config)?,
                template: WikiTemplate::new(&config),
            }
        }
        Command::Find { .. } => Task::Find {
            pattern: info_pattern(&config(cli)?)?,
        },
    };

    Ok(Some(task))
}

fn config(cli: &Cli) -> Result<AppConfig> {
    load_config(cli.config.as_deref())
}

fn info_pattern(config: &AppConfig) -> Result<InfoPattern> {
    InfoPattern::new(&config.wiki_path).context("Failed to compile the info file pattern")
}

/// Loads the alternate vocalist list of `name`.
///
/// A tour missing from the file is reported, and the user may go on without
/// alternate vocalist marks.
fn tour_for(name: &str, tour_file: Option<&Path>, force: bool) -> Result<Option<Tour>> {
    let Some(tour_file) = tour_file else {
        println!("{}", tour_banner(name, None));
        return Ok(Some(Tour::new(name)));
    };

    let tour_file = check_file(tour_file)?;
    println!("{}", tour_banner(name, Some(&tour_file.path)));

    match load_tour(&tour_file.path, name) {
        Ok(tour) => Ok(Some(tour)),
        Err(e) => {
            println!("{}", e);
            println!("Alternate vocalists will not be marked.");
            Ok(should_continue(force).then(|| Tour::new(name)))
        }
    }
}

fn tour_banner(name: &str, tour_file: Option<&Path>) -> String {
    match tour_file {
        Some(file) => format!(
            "Processing tours from: {}\nThe current tour is: {}",
            file.display(),
            name
        ),
        None => format!("The current tour is: {}", name),
    }
}
