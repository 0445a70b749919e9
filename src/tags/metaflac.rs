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

//! [`TagReader`] implementation that runs the `metaflac` program.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use tracing::debug;

use crate::{
    error::{Error, Result},
    tags::{
        StreamFormat, TOOL_NAME, TagReader, TagSet, ToolOutput, parse_fingerprints,
        parse_stream_format, parse_tag_output,
    },
};

const SHOW_TOTAL_SAMPLES: &str = "--show-total-samples";
const SHOW_SAMPLE_RATE: &str = "--show-sample-rate";
const SHOW_BPS: &str = "--show-bps";
const SHOW_MD5SUM: &str = "--show-md5sum";
const NO_FILENAME: &str = "--no-filename";
const WITH_FILENAME: &str = "--with-filename";

pub(crate) struct Metaflac {
    program: PathBuf,
}

impl Metaflac {
    pub(crate) fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, dir: Option<&Path>, args: &[OsString]) -> Result<ToolOutput> {
        debug!(program = %self.program.display(), ?args, ?dir, "running tag utility");

        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| Error::ToolFailed {
            tool: self.program.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        })
    }

    // Runs the program and treats a non-zero exit as a failure.
    fn run_checked(&self, dir: Option<&Path>, args: &[OsString]) -> Result<String> {
        let output = self.run(dir, args)?;
        if !output.success {
            return Err(Error::ToolFailed {
                tool: TOOL_NAME.to_string(),
                reason: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

fn tag_args(path: &Path, tags: &[&str]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        SHOW_TOTAL_SAMPLES.into(),
        SHOW_SAMPLE_RATE.into(),
        path.into(),
    ];
    args.extend(tags.iter().map(|tag| OsString::from(format!("--show-tag={}", tag))));
    args
}

fn fingerprint_args(flag: &str, files: &[String]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![SHOW_MD5SUM.into(), flag.into()];
    args.extend(files.iter().map(OsString::from));
    args
}

impl TagReader for Metaflac {
    fn read_tags(&self, path: &Path, tags: &[&str]) -> Result<TagSet> {
        let stdout = self.run_checked(None, &tag_args(path, tags))?;
        parse_tag_output(&stdout, tags)
    }

    fn stream_format(&self, path: &Path) -> Result<StreamFormat> {
        let args: [OsString; 3] = [SHOW_SAMPLE_RATE.into(), SHOW_BPS.into(), path.into()];
        let stdout = self.run_checked(None, &args)?;
        parse_stream_format(&stdout)
    }

    fn fingerprints(&self, dir: &Path, files: &[String]) -> Result<Vec<String>> {
        let stdout = self.run_checked(Some(dir), &fingerprint_args(NO_FILENAME, files))?;
        parse_fingerprints(&stdout, files.len())
    }

    fn named_fingerprints(&self, dir: &Path, files: &[String]) -> Result<ToolOutput> {
        self.run(Some(dir), &fingerprint_args(WITH_FILENAME, files))
    }
}
