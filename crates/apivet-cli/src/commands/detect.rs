//! Detect command - check one file or stdin

use std::path::Path;

use apivet_core::{CoreError, Outcome};

use crate::GlobalArgs;
use crate::commands::{build_config, report};
use crate::error::{CliError, Result};
use crate::finder::{scan_file, scan_reader};

/// Run the detect command; `-` reads from stdin
pub fn run(global: &GlobalArgs, file: &str) -> Result<Outcome> {
    let config = build_config(global)?;

    let findings = if file == "-" {
        scan_reader(std::io::stdin().lock(), config.table())?
    } else {
        let path = Path::new(file);
        scan_file(path, config.table()).map_err(|e| match e {
            CoreError::Io(io) => CliError::io_at(path, io),
            e => e.into(),
        })?
    };

    report(&config, findings)
}
