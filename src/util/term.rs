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

//! Terminal prompts.
//!
//! A batch run can rewrite or delete sidecar files across a whole library, so
//! it asks the user to confirm before starting unless `--force` is given.

use std::io::{self, BufRead, Write};

/// Prints a warning when the run will delete files instead of creating them.
pub(crate) fn notify_delete_mode(delete_mode: bool) {
    if delete_mode {
        println!("You are running in **DELETE MODE** - data will be permanently lost");
    }
}

/// Asks the user whether to continue, returning `true` for `y` or `Y`.
///
/// With `force` set the prompt is skipped and the answer is always yes. Any
/// failure to read the answer counts as a no.
pub(crate) fn should_continue(force: bool) -> bool {
    if force {
        println!();
        return true;
    }

    print!("Continue? (y/n): ");
    io::stdout().flush().ok();

    let answer = read_answer(io::stdin().lock()).unwrap_or_default();
    println!();

    is_yes(&answer)
}

fn read_answer(mut input: impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}
