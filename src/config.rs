//! Scan configuration. Roots, extra locations, and the output path are
//! explicit here so nothing is hardcoded inside the scan logic itself.

use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "applications.json";

/// Everything the `apps` subcommand needs to produce an inventory.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directories to walk recursively.
    pub roots: Vec<PathBuf>,
    /// Locations included as-is, without walking. Finder lives outside the
    /// application directories and is the stock entry here.
    pub extra_locations: Vec<PathBuf>,
    /// Where the JSON inventory is written.
    pub output: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            roots: default_roots(),
            extra_locations: default_extra_locations(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl ScanConfig {
    /// Roots that actually exist, in configuration order. Missing
    /// directories are normal (not every machine has a per-user
    /// Applications folder) and are skipped rather than reported.
    pub fn existing_roots(&self) -> Vec<PathBuf> {
        self.roots.iter().filter(|p| p.exists()).cloned().collect()
    }

    pub fn existing_extra_locations(&self) -> Vec<PathBuf> {
        self.extra_locations
            .iter()
            .filter(|p| p.exists())
            .cloned()
            .collect()
    }
}

/// The local, system, and per-user application directories.
pub fn default_roots() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/Applications"),
        PathBuf::from("/System/Applications"),
    ];
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join("Applications"));
    }
    roots
}

pub fn default_extra_locations() -> Vec<PathBuf> {
    vec![PathBuf::from("/System/Library/CoreServices/Finder.app")]
}
