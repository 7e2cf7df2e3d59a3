//! Detect-files command - walk a directory tree

use std::path::Path;

use apivet_core::Outcome;

use crate::GlobalArgs;
use crate::commands::{build_config, report};
use crate::error::Result;
use crate::finder::Finder;

pub fn run(global: &GlobalArgs, directory: Option<&Path>) -> Result<Outcome> {
    let config = build_config(global)?;
    let finder = Finder::new(directory)?;
    let findings = finder.find(config.table());
    report(&config, findings)
}
