//! Turns discovered locations into the JSON inventory.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use url::Url;

use crate::config::ScanConfig;
use crate::discover::{self, ScanFailure};
use crate::error::{AppdexError, Result};

/// One installed application, as it appears in the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    pub name: String,
    pub url: String,
    pub is_running: bool,
}

impl AppRecord {
    fn from_location(location: &Path, running_urls: &HashSet<String>) -> Self {
        let url = file_url(location);
        AppRecord {
            name: record_name(location),
            is_running: running_urls.contains(&url),
            url,
        }
    }
}

#[derive(Debug, Default)]
pub struct Catalog {
    pub records: Vec<AppRecord>,
    pub failures: Vec<ScanFailure>,
}

/// Scan the configured roots, append the extra locations, and keep every
/// leaf that passes the executability check. Locations are not deduplicated
/// and keep their listing order. Enumeration failures ride along in the
/// catalog; an attribute lookup failure on a surviving location aborts the
/// build.
pub fn build(config: &ScanConfig, running_urls: &HashSet<String>) -> Result<Catalog> {
    let mut scan = discover::discover_all(&config.existing_roots());
    scan.locations.extend(config.existing_extra_locations());

    let mut records = Vec::new();
    for location in &scan.locations {
        let executable =
            is_executable(location).map_err(|e| AppdexError::io(location.clone(), e))?;
        if executable {
            records.push(AppRecord::from_location(location, running_urls));
        }
    }

    Ok(Catalog {
        records,
        failures: scan.failures,
    })
}

pub fn to_pretty_json(records: &[AppRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn write_json(records: &[AppRecord], path: &Path) -> Result<()> {
    let json = to_pretty_json(records)?;
    fs::write(path, json).map_err(|source| AppdexError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// `file://` URL for a location, mirroring how the running-application side
/// reports bundle locations so the two compare by plain string equality.
pub fn file_url(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    Url::from_file_path(&absolute)
        .map(String::from)
        .unwrap_or_else(|_| absolute.display().to_string())
}

fn record_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> io::Result<bool> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = fs::metadata(path)?;
    Ok(metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> io::Result<bool> {
    fs::metadata(path).map(|_| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config_for(root: &Path) -> ScanConfig {
        ScanConfig {
            roots: vec![root.to_path_buf()],
            extra_locations: Vec::new(),
            output: PathBuf::from("applications.json"),
        }
    }

    #[test]
    fn serializes_with_original_key_names() {
        let record = AppRecord {
            name: "Finder".to_string(),
            url: "file:///System/Library/CoreServices/Finder.app".to_string(),
            is_running: true,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"name\""));
        assert!(json.contains("\"url\""));
        assert!(json.contains("\"isRunning\":true"));
    }

    #[test]
    fn file_url_is_absolute() {
        let url = file_url(Path::new("/Applications/Safari.app"));
        assert_eq!(url, "file:///Applications/Safari.app");
    }

    #[test]
    fn file_url_percent_encodes_spaces() {
        let url = file_url(Path::new("/Applications/Visual Studio Code.app"));
        assert_eq!(url, "file:///Applications/Visual%20Studio%20Code.app");
    }

    #[test]
    fn bundles_survive_the_filter_plain_files_do_not() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("A.app")).unwrap();
        fs::create_dir_all(tmp.path().join("sub/B.app")).unwrap();
        fs::write(tmp.path().join("README"), "not a program").unwrap();

        let catalog = build(&config_for(tmp.path()), &HashSet::new()).unwrap();
        let names: BTreeSet<_> = catalog.records.iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, BTreeSet::from(["A".to_string(), "B".to_string()]));
        assert!(catalog.records.iter().all(|r| !r.is_running));
    }

    #[cfg(unix)]
    #[test]
    fn executable_plain_files_are_kept() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let tool = tmp.path().join("tool");
        fs::write(&tool, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let catalog = build(&config_for(tmp.path()), &HashSet::new()).unwrap();
        assert_eq!(catalog.records.len(), 1);
        assert_eq!(catalog.records[0].name, "tool");
    }

    #[test]
    fn running_set_marks_records() {
        let tmp = TempDir::new().unwrap();
        let bundle = tmp.path().join("A.app");
        fs::create_dir(&bundle).unwrap();

        let running = HashSet::from([file_url(&bundle)]);
        let catalog = build(&config_for(tmp.path()), &running).unwrap();
        assert_eq!(catalog.records.len(), 1);
        assert!(catalog.records[0].is_running);
    }

    #[test]
    fn extra_locations_are_appended_without_walking() {
        let tmp = TempDir::new().unwrap();
        let extra = tmp.path().join("Fixed.app");
        fs::create_dir(&extra).unwrap();

        let empty_root = tmp.path().join("root");
        fs::create_dir(&empty_root).unwrap();
        let config = ScanConfig {
            roots: vec![empty_root],
            extra_locations: vec![extra.clone(), tmp.path().join("missing.app")],
            output: PathBuf::from("applications.json"),
        };

        let catalog = build(&config, &HashSet::new()).unwrap();
        assert_eq!(catalog.records.len(), 1);
        assert_eq!(catalog.records[0].url, file_url(&extra));
    }

    #[test]
    fn written_inventory_parses_back() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("A.app")).unwrap();

        let catalog = build(&config_for(tmp.path()), &HashSet::new()).unwrap();
        let out = tmp.path().join("applications.json");
        write_json(&catalog.records, &out).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        let parsed: Vec<AppRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, catalog.records);
    }
}
