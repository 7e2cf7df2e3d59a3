//! List-versions command - print the rule catalog

use std::io::Write;

use apivet_core::{Outcome, render_version_list};

use crate::GlobalArgs;
use crate::commands::build_config;
use crate::error::Result;

pub fn run(global: &GlobalArgs) -> Result<Outcome> {
    let config = build_config(global)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render_version_list(
        config.table(),
        &config.options().renderer,
        config.options().no_headers,
        &mut out,
    )?;
    out.flush()?;

    Ok(Outcome::Clean)
}
