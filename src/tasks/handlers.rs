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

use tracing::debug;

use super::TaskContext;
use crate::{
    checksum::checksum_directory,
    error::Result,
    find::{InfoStatus, check_info_file},
    generate::{generate_info_file, template::InfoTemplate},
    model::Tour,
    util::fs::Target,
    verify::verify_directory,
    wiki::{generate_wiki_file, parse::InfoPattern, render::WikiTemplate},
};

pub(super) fn checksum(ctx: &TaskContext, dir: &Target) -> Result<()> {
    debug!(dir = %dir.path.display(), "checksum");
    checksum_directory(ctx.reader, &dir.path, &dir.name, ctx.delete_mode)
}

pub(super) fn verify(ctx: &TaskContext, dir: &Target) -> Result<()> {
    debug!(dir = %dir.path.display(), "verify");
    let report = verify_directory(ctx.reader, &dir.path, &dir.name);
    println!("{}... {}", dir.path.display(), report.summary());

    Ok(())
}

pub(super) fn generate(
    ctx: &TaskContext,
    dir: &Target,
    tour: &Tour,
    template: &InfoTemplate,
) -> Result<()> {
    debug!(dir = %dir.path.display(), tour = %tour.name, "generate");
    generate_info_file(
        ctx.reader,
        template,
        tour,
        &dir.path,
        &dir.name,
        ctx.delete_mode,
    )
}

pub(super) fn wiki(
    ctx: &TaskContext,
    dir: &Target,
    pattern: &InfoPattern,
    template: &WikiTemplate,
) -> Result<()> {
    debug!(dir = %dir.path.display(), "wiki");
    generate_wiki_file(
        ctx.reader,
        pattern,
        template,
        &dir.path,
        &dir.name,
        ctx.wiki_dir.as_deref(),
        ctx.delete_mode,
    )
}

pub(super) fn find(_ctx: &TaskContext, dir: &Target, pattern: &InfoPattern) -> Result<InfoStatus> {
    check_info_file(pattern, &dir.path, &dir.name)
}
