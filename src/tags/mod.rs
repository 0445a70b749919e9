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

//! Access to the tags and stream properties of audio files.
//!
//! Everything the commands know about an audio file comes from an external
//! tag utility. The [`TagReader`] trait is the seam between the commands and
//! that utility: [`metaflac::Metaflac`] runs the real program, and tests use
//! a fake that reads plain text files.
//!
//! The parsers in this module turn the utility's line-oriented output into
//! typed values. Output with the wrong number of lines means the utility is a
//! version we do not understand, so it is reported as
//! [`Error::UnexpectedExternalOutput`] and the directory is abandoned.

pub(crate) mod metaflac;

use std::{path::Path, str::FromStr};

use crate::error::{Error, Result};

/// Name used when reporting errors from the tag utility.
pub(crate) const TOOL_NAME: &str = "metaflac";

const AUDIO_EXTENSION: &str = "flac";

/// Returns `true` for files the tag utility can read.
pub(crate) fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(AUDIO_EXTENSION))
}

/// Sample count, sample rate and requested tags of one audio file.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TagSet {
    pub(crate) samples: u64,
    pub(crate) sample_rate: u64,
    values: Vec<(String, String)>,
}

impl TagSet {
    /// Value of a requested tag, looked up by the name it was requested with.
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(tag, _)| tag == name)
            .map(|(_, value)| value.as_str())
    }

    /// Length of the audio in whole seconds, rounded down.
    pub(crate) fn duration(&self) -> u64 {
        self.samples / self.sample_rate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StreamFormat {
    pub(crate) sample_rate: u32,
    pub(crate) bits_per_sample: u32,
}

/// Raw result of a tool run that is allowed to partly fail.
#[derive(Debug, Clone, Default)]
pub(crate) struct ToolOutput {
    pub(crate) stdout: String,
    pub(crate) stderr: String,
    pub(crate) success: bool,
}

pub(crate) trait TagReader {
    /// Reads the total sample count, the sample rate and each of `tags`.
    fn read_tags(&self, path: &Path, tags: &[&str]) -> Result<TagSet>;

    /// Reads the sample rate and bit depth.
    fn stream_format(&self, path: &Path) -> Result<StreamFormat>;

    /// Audio fingerprints of `files` (relative to `dir`), in input order.
    fn fingerprints(&self, dir: &Path, files: &[String]) -> Result<Vec<String>>;

    /// Lists `name:fingerprint` for `files`, relative to `dir`.
    ///
    /// The output is returned as-is, even when the tool reports errors for
    /// some of the files, so the caller can decide what is usable.
    fn named_fingerprints(&self, dir: &Path, files: &[String]) -> Result<ToolOutput>;
}

fn output_lines(output: &str) -> Vec<&str> {
    output.lines().map(|line| line.trim_end_matches('\r')).collect()
}

fn expect_lines<'a>(output: &'a str, expected: usize) -> Result<Vec<&'a str>> {
    let lines = output_lines(output);
    if lines.len() != expected {
        return Err(Error::UnexpectedExternalOutput {
            tool: TOOL_NAME.to_string(),
            expected,
            actual: lines.len(),
        });
    }
    Ok(lines)
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Parses the output of a tag read: the sample count, the sample rate, then
/// one `NAME=value` line per requested tag in request order.
pub(crate) fn parse_tag_output(output: &str, tags: &[&str]) -> Result<TagSet> {
    let lines = expect_lines(output, 2 + tags.len())?;

    let samples = parse_number("total samples", lines[0])?;
    let sample_rate: u64 = parse_number("sample rate", lines[1])?;
    if sample_rate == 0 {
        return Err(Error::InvalidNumber {
            field: "sample rate",
            value: lines[1].to_string(),
        });
    }

    let mut values = Vec::with_capacity(tags.len());
    for (tag, line) in tags.iter().zip(&lines[2..]) {
        let line = line.trim();
        let prefix = format!("{}=", tag);

        let matches = line
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&prefix));
        if !matches {
            return Err(Error::InvalidTagFormat {
                expected: prefix,
                line: line.to_string(),
            });
        }

        values.push((tag.to_string(), line[prefix.len()..].to_string()));
    }

    Ok(TagSet {
        samples,
        sample_rate,
        values,
    })
}

/// Parses the sample rate and bits-per-sample lines of a format read.
pub(crate) fn parse_stream_format(output: &str) -> Result<StreamFormat> {
    let lines = expect_lines(output, 2)?;

    Ok(StreamFormat {
        sample_rate: parse_number("sample rate", lines[0])?,
        bits_per_sample: parse_number("bits per sample", lines[1])?,
    })
}

/// Parses one fingerprint per line, expecting one line per input file.
pub(crate) fn parse_fingerprints(output: &str, expected: usize) -> Result<Vec<String>> {
    let lines = expect_lines(output, expected)?;
    Ok(lines.into_iter().map(|line| line.trim().to_string()).collect())
}
