//! Recursive discovery of application bundles under a set of root
//! directories.
//!
//! A bundle is a leaf: discovery never descends into one, no matter what it
//! contains. Ordinary directories contribute only their descendants. Every
//! call returns its own contribution, so enumeration failures stay local to
//! the branch they happened in and are reported instead of dropped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory suffix that marks a self-contained application bundle.
pub const BUNDLE_SUFFIX: &str = "app";

/// Result of one discovery pass: leaf locations in listing order, plus the
/// directories whose enumeration failed.
#[derive(Debug, Default)]
pub struct Scan {
    pub locations: Vec<PathBuf>,
    pub failures: Vec<ScanFailure>,
}

#[derive(Debug)]
pub struct ScanFailure {
    pub dir: PathBuf,
    pub error: io::Error,
}

impl Scan {
    pub fn merge(&mut self, other: Scan) {
        self.locations.extend(other.locations);
        self.failures.extend(other.failures);
    }
}

/// Walk `root` and collect leaf locations.
///
/// Base case: a bundle-marked location, or anything that is not a directory,
/// is returned as the sole result. Otherwise the immediate children are
/// listed and each child's own contribution is concatenated. A directory
/// that cannot be listed contributes nothing except a failure entry; sibling
/// branches are unaffected.
pub fn discover(root: &Path) -> Scan {
    if is_bundle(root) || !root.is_dir() {
        return Scan {
            locations: vec![root.to_path_buf()],
            failures: Vec::new(),
        };
    }

    let mut scan = Scan::default();
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(error) => {
            scan.failures.push(ScanFailure {
                dir: root.to_path_buf(),
                error,
            });
            return scan;
        }
    };

    for entry in entries {
        match entry {
            Ok(entry) => scan.merge(discover(&entry.path())),
            Err(error) => scan.failures.push(ScanFailure {
                dir: root.to_path_buf(),
                error,
            }),
        }
    }
    scan
}

/// Walk every root in order, concatenating results. Overlapping roots can
/// produce duplicates; they are preserved.
pub fn discover_all<'a>(roots: impl IntoIterator<Item = &'a PathBuf>) -> Scan {
    let mut scan = Scan::default();
    for root in roots {
        scan.merge(discover(root));
    }
    scan
}

pub fn is_bundle(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(BUNDLE_SUFFIX))
        .unwrap_or(false)
}
