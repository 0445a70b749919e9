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

//! Verification of checksum sidecar files.
//!
//! The hash manifest is checked first. If any file it lists cannot be read,
//! the directory no longer matches what was checksummed and the fingerprint
//! check is skipped. Fingerprints are matched by file name because the tag
//! utility does not promise to answer in the order it was asked.
//!
//! A sidecar that does not exist is reported as absent, not as a failure: a
//! directory without audio files never gets an `.ffp` file.

use std::{fs, io, path::Path};

use tracing::warn;

use crate::{
    checksum::{Sidecars, hash_file},
    tags::TagReader,
    util::fs::file_error_reason,
};

pub(crate) const PASS: &str = "✔";
pub(crate) const FAIL: &str = "✖";
pub(crate) const ABSENT: &str = "-";

const CHECKSUM_LEN: usize = 32;
const SEPARATOR_LEN: usize = 2;

/// Result of checking one sidecar file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Outcome {
    #[default]
    Failed,
    Passed,
    /// The sidecar does not exist, which is reported but is not a failure.
    Absent,
}

impl Outcome {
    fn mark(self) -> &'static str {
        match self {
            Outcome::Passed => PASS,
            Outcome::Failed => FAIL,
            Outcome::Absent => ABSENT,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct VerifyReport {
    pub(crate) hashes: Outcome,
    pub(crate) fingerprints: Outcome,
    pub(crate) issues: Vec<String>,
}

impl VerifyReport {
    pub(crate) fn passed(&self) -> bool {
        self.hashes != Outcome::Failed && self.fingerprints != Outcome::Failed
    }

    /// The text printed after the directory name.
    pub(crate) fn summary(&self) -> String {
        if self.hashes == Outcome::Passed && self.fingerprints == Outcome::Passed {
            return PASS.to_string();
        }

        let mut out = String::new();
        for issue in &self.issues {
            out.push_str("\n> ");
            out.push_str(issue);
        }
        out.push_str(&format!(
            "\n> done! ffp({}) md5({})\n",
            self.fingerprints.mark(),
            self.hashes.mark()
        ));
        out
    }
}

#[derive(Debug, Default)]
struct HashCheck {
    success: bool,
    /// A listed file could not be read.
    read_error: bool,
}

/// Checks both sidecar files of one recording directory.
pub(crate) fn verify_directory(reader: &dyn TagReader, dir: &Path, name: &str) -> VerifyReport {
    let sidecars = Sidecars::new(dir, name);
    let mut report = VerifyReport::default();

    let fingerprints = presence(&sidecars.fingerprints, "ffp", &mut report.issues);
    let hashes = presence(&sidecars.hashes, "md5", &mut report.issues);

    let mut read_error = false;
    report.hashes = match hashes {
        Presence::Present => {
            let check = verify_hashes(&sidecars.hashes, dir, &mut report.issues);
            read_error = check.read_error;
            outcome(check.success)
        }
        Presence::Absent => Outcome::Absent,
        Presence::Unreadable => Outcome::Failed,
    };

    report.fingerprints = if read_error {
        report
            .issues
            .push("skipping ffp check because of md5 file errors".to_string());
        Outcome::Failed
    } else {
        match fingerprints {
            Presence::Present => outcome(verify_fingerprints(
                reader,
                &sidecars.fingerprints,
                dir,
                &mut report.issues,
            )),
            Presence::Absent => Outcome::Absent,
            Presence::Unreadable => Outcome::Failed,
        }
    };

    report
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Present,
    Absent,
    Unreadable,
}

fn presence(path: &Path, kind: &str, issues: &mut Vec<String>) -> Presence {
    match fs::metadata(path) {
        Ok(_) => Presence::Present,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            issues.push(format!("no {} file", kind));
            Presence::Absent
        }
        Err(e) => {
            issues.push(format!("error with {} ({})", kind, file_error_reason(&e)));
            Presence::Unreadable
        }
    }
}

fn outcome(success: bool) -> Outcome {
    if success {
        Outcome::Passed
    } else {
        Outcome::Failed
    }
}

fn verify_hashes(manifest: &Path, dir: &Path, issues: &mut Vec<String>) -> HashCheck {
    let mut check = HashCheck::default();

    let text = match fs::read_to_string(manifest) {
        Ok(text) => text,
        Err(e) => {
            issues.push(format!("md5 read error ({})", file_error_reason(&e)));
            return check;
        }
    };

    check.success = true;
    for line in text.lines().map(|l| l.trim_end_matches('\r')) {
        if line.is_empty() {
            continue;
        }

        let Some((checksum, filename)) = split_hash_line(line) else {
            issues.push(format!("md5 has an incorrect line {:?}", line));
            check.success = false;
            continue;
        };

        match hash_file(&dir.join(filename)) {
            Ok(actual) if actual.eq_ignore_ascii_case(checksum) => {}
            Ok(_) => {
                issues.push(format!("md5 mismatch for \"{}\"", filename));
                check.success = false;
            }
            Err(e) => {
                issues.push(format!(
                    "md5 read error with {} ({})",
                    filename,
                    file_error_reason(&e)
                ));
                check.success = false;
                check.read_error = true;
            }
        }
    }

    check
}

// `<32 hex> *<name>`: fixed-width checksum, two separator characters, name.
fn split_hash_line(line: &str) -> Option<(&str, &str)> {
    let checksum = line.get(..CHECKSUM_LEN)?;
    let filename = line.get(CHECKSUM_LEN + SEPARATOR_LEN..)?;
    (!filename.is_empty()).then_some((checksum, filename))
}

// `<name>:<32 hex>`: the checksum is always the last 32 characters.
fn split_fingerprint_line(line: &str) -> Option<(&str, &str)> {
    let split = line.len().checked_sub(CHECKSUM_LEN)?;
    let name = line.get(..split)?.strip_suffix(':')?;
    let checksum = line.get(split..)?;
    (!name.is_empty()).then_some((name, checksum))
}

fn verify_fingerprints(
    reader: &dyn TagReader,
    manifest: &Path,
    dir: &Path,
    issues: &mut Vec<String>,
) -> bool {
    let text = match fs::read_to_string(manifest) {
        Ok(text) => text,
        Err(e) => {
            issues.push(format!("ffp read error ({})", file_error_reason(&e)));
            return false;
        }
    };

    let mut expected: Vec<(String, String)> = Vec::new();
    for line in text.lines().map(|l| l.trim_end_matches('\r')) {
        if line.is_empty() {
            continue;
        }
        match split_fingerprint_line(line) {
            Some((name, checksum)) => expected.push((name.to_string(), checksum.to_string())),
            None => {
                issues.push("ffp has an incorrect format".to_string());
                return false;
            }
        }
    }

    if expected.is_empty() {
        issues.push("ffp is empty".to_string());
        return false;
    }

    let files: Vec<String> = expected.iter().map(|(name, _)| name.clone()).collect();
    let output = match reader.named_fingerprints(dir, &files) {
        Ok(output) => output,
        Err(e) => {
            issues.push(format!("ffp metaflac error: {}", e));
            return false;
        }
    };

    if !output.stderr.trim().is_empty() {
        warn!(dir = %dir.display(), stderr = %output.stderr.trim(), "tag utility reported errors");
        issues.push(format!("metaflac: {}", output.stderr.trim()));
    }

    if output.stdout.trim().is_empty() {
        issues.push("ffp metaflac produced no output".to_string());
        return false;
    }

    let mut success = true;
    for line in output.stdout.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        let Some((name, checksum)) = split_fingerprint_line(line) else {
            issues.push(format!("unexpected metaflac output {:?}", line));
            success = false;
            continue;
        };

        match expected.iter().position(|(file, _)| file == name) {
            Some(i) => {
                let (_, recorded) = expected.remove(i);
                if !recorded.eq_ignore_ascii_case(checksum) {
                    issues.push(format!("ffp mismatch for \"{}\"", name));
                    success = false;
                }
            }
            None => {
                issues.push(format!("ffp has no entry for \"{}\"", name));
                success = false;
            }
        }
    }

    for (name, _) in expected {
        issues.push(format!("no fingerprint produced for \"{}\"", name));
        success = false;
    }

    success
}
