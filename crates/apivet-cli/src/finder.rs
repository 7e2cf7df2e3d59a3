//! File and directory acquisition
//!
//! Every non-directory entry below the root is read and decoded. Files that are not Kubernetes
//! manifests are expected in a checkout, so their errors only show up at debug verbosity.

use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use apivet_core::{CoreError, Finding, RuleTable, detect};

use crate::error::{CliError, Result};

pub struct Finder {
    root: PathBuf,
}

impl Finder {
    /// Finder rooted at `root`, or at the current directory when none is given
    pub fn new(root: Option<&Path>) -> Result<Self> {
        let root = match root {
            Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
            _ => std::env::current_dir()?,
        };
        if !root.exists() {
            return Err(CliError::Io {
                message: format!("specified path does not exist: {}", root.display()),
            });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files below the root in a stable order
    fn files(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| !entry.file_type().is_dir())
            .map(walkdir::DirEntry::into_path)
            .collect()
    }

    /// Scan every file, skipping those that cannot be read or decoded
    pub fn find(&self, table: &RuleTable) -> Vec<Finding> {
        let files = self.files();
        tracing::info!(root = %self.root().display(), files = files.len(), "scanning files");

        let mut findings = Vec::new();
        for path in files {
            tracing::trace!(file = %path.display(), "processing file");
            match scan_file(&path, table) {
                Ok(found) => findings.extend(found),
                Err(e) => {
                    tracing::debug!(file = %path.display(), error = %e, "error scanning file");
                }
            }
        }
        findings
    }
}

/// Findings for one file, each tagged with the file's path
pub fn scan_file(path: &Path, table: &RuleTable) -> std::result::Result<Vec<Finding>, CoreError> {
    let data = std::fs::read(path)?;
    let file_path = path.display().to_string();
    Ok(detect(&data, table)?
        .into_iter()
        .map(|finding| finding.with_file_path(file_path.clone()))
        .collect())
}

/// Findings for everything readable from `reader`
pub fn scan_reader<R: Read>(
    mut reader: R,
    table: &RuleTable,
) -> std::result::Result<Vec<Finding>, CoreError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    detect(&data, table)
}
