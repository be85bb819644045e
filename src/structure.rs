//! Cross-check of the module layout the architecture docs describe against
//! the directories that actually exist.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{DocguardError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureReport {
    /// The modules directory does not exist yet
    NotBuilt,
    /// The directory exists; `missing` lists documented modules not found.
    /// Missing modules are advisory and never fail the check.
    Checked {
        observed: BTreeSet<String>,
        missing: BTreeSet<String>,
    },
}

impl StructureReport {
    pub fn advisory(&self) -> Option<String> {
        match self {
            StructureReport::Checked { missing, .. } if !missing.is_empty() => {
                let names: Vec<&str> = missing.iter().map(String::as_str).collect();
                Some(format!("Documented modules not found: {}", names.join(", ")))
            }
            _ => None,
        }
    }
}

/// Names of the immediate subdirectories of `dir`
pub fn observe_modules(dir: &Path) -> Result<BTreeSet<String>> {
    let mut observed = BTreeSet::new();
    let entries = fs::read_dir(dir).map_err(|e| DocguardError::io("list", dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| DocguardError::io("list", dir, e))?;
        let path = entry.path();
        if path.is_dir()
            && let Some(name) = path.file_name().and_then(|n| n.to_str())
        {
            observed.insert(name.to_string());
        }
    }
    Ok(observed)
}

/// Compare `expected` module names against the subdirectories of `modules_dir`
pub fn cross_check<S: AsRef<str>>(expected: &[S], modules_dir: &Path) -> Result<StructureReport> {
    if !modules_dir.is_dir() {
        debug!("{} does not exist, nothing to compare", modules_dir.display());
        return Ok(StructureReport::NotBuilt);
    }

    let observed = observe_modules(modules_dir)?;
    let missing: BTreeSet<String> = expected
        .iter()
        .map(|name| AsRef::<str>::as_ref(name).to_string())
        .filter(|name| !observed.contains(name))
        .collect();

    if !missing.is_empty() {
        warn!(
            "{} documented module(s) missing from {}",
            missing.len(),
            modules_dir.display()
        );
    }

    Ok(StructureReport::Checked { observed, missing })
}
