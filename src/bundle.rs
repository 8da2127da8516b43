//! Application bundle layout and `Info.plist` access.
//!
//! Mac bundles keep their property list at `Contents/Info.plist`. iOS apps
//! running on Apple Silicon are wrapped one level deeper, in
//! `Wrapper/<name>.app/Info.plist`, and have no `Contents` directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppdexError, Result};

/// The `Info.plist` keys this tool reads.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoPlist {
    #[serde(skip_serializing_if = "Option::is_none", rename = "CFBundleIdentifier")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "CFBundleName")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "CFBundleDisplayName")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "CFBundleExecutable")]
    pub executable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "CFBundleShortVersionString")]
    pub short_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "CFBundleVersion")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "CFBundleIconFile")]
    pub icon_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "CFBundleIconName")]
    pub icon_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "CFBundlePackageType")]
    pub package_type: Option<String>,
}

impl InfoPlist {
    /// Read and deserialize a property list. Some shipped plists carry
    /// duplicate keys, which the direct deserializer rejects; those go
    /// through a `plist::Value` round-trip instead.
    pub fn from_file(path: &Path) -> Result<InfoPlist> {
        match plist::from_file(path) {
            Ok(info) => Ok(info),
            Err(_) => {
                let value = Self::raw_value(path)?;
                plist::from_value(&value).map_err(|source| AppdexError::PlistParseFailed {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    pub fn raw_value(path: &Path) -> Result<plist::Value> {
        plist::Value::from_file(path).map_err(|source| AppdexError::PlistParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Path helpers over one application bundle directory.
#[derive(Debug, Clone)]
pub struct AppBundle {
    path: PathBuf,
}

impl AppBundle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AppBundle { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bundle name without the `.app` suffix.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// A bundle counts as an application when it exists and carries an
    /// `Info.plist` in one of the known layouts.
    pub fn is_app(&self) -> bool {
        self.path.exists() && self.info_plist_path().is_some()
    }

    pub fn contents_dir(&self) -> PathBuf {
        self.path.join("Contents")
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.contents_dir().join("Resources")
    }

    pub fn info_plist_path(&self) -> Option<PathBuf> {
        if let Some(inner) = self.wrapped_app() {
            // iOS layout: no Contents directory inside the inner bundle
            let path = inner.join("Info.plist");
            return path.exists().then_some(path);
        }
        let path = self.contents_dir().join("Info.plist");
        path.exists().then_some(path)
    }

    /// First `.app` entry inside `Wrapper/`, when present.
    fn wrapped_app(&self) -> Option<PathBuf> {
        let wrapper = self.path.join("Wrapper");
        let entries = fs::read_dir(&wrapper).ok()?;
        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| crate::discover::is_bundle(path))
    }

    pub fn info(&self) -> Result<InfoPlist> {
        let plist_path = self.info_plist_path().ok_or_else(|| AppdexError::NotABundle {
            path: self.path.clone(),
        })?;
        InfoPlist::from_file(&plist_path)
    }

    /// `Contents/MacOS/<CFBundleExecutable>`, when it exists on disk.
    pub fn executable_path(&self, info: &InfoPlist) -> Option<PathBuf> {
        let executable = info.executable.as_ref()?;
        let path = self.contents_dir().join("MacOS").join(executable);
        path.exists().then_some(path)
    }

    pub fn summary(&self, icon: Option<PathBuf>) -> Result<BundleSummary> {
        let info = self.info()?;
        Ok(BundleSummary {
            name: self.name(),
            path: self.path.display().to_string(),
            identifier: info.identifier.clone(),
            version: info.short_version.clone().or_else(|| info.version.clone()),
            executable: self
                .executable_path(&info)
                .map(|p| p.display().to_string()),
            icon: icon.map(|p| p.display().to_string()),
        })
    }
}

/// What `inspect` prints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleSummary {
    pub name: String,
    pub path: String,
    pub identifier: Option<String>,
    pub version: Option<String>,
    pub executable: Option<String>,
    pub icon: Option<String>,
}
