//! Process introspection: which applications are running, and which one has
//! input focus. macOS-only; other platforms report the operation as
//! unsupported rather than pretending to know.

use std::path::PathBuf;

#[path = "platforms/macos.rs"]
#[cfg(target_os = "macos")]
mod macos;

use crate::error::Result;
#[cfg(not(target_os = "macos"))]
use crate::error::AppdexError;

/// One running application instance, as reported by the workspace.
#[derive(Debug, Clone)]
pub struct RunningApp {
    /// Human-facing name.
    pub name: String,
    /// Location of the backing bundle, when the process has one.
    pub bundle_path: Option<PathBuf>,
    /// Stable identifier (bundle id).
    pub bundle_id: Option<String>,
    pub executable: Option<PathBuf>,
    pub pid: i32,
}

pub fn running_applications() -> Result<Vec<RunningApp>> {
    #[cfg(target_os = "macos")]
    {
        macos::running_applications()
    }

    #[cfg(not(target_os = "macos"))]
    {
        Err(AppdexError::UnsupportedPlatform {
            operation: "running application listing",
        })
    }
}

pub fn frontmost_application() -> Result<RunningApp> {
    #[cfg(target_os = "macos")]
    {
        macos::frontmost_application()
    }

    #[cfg(not(target_os = "macos"))]
    {
        Err(AppdexError::UnsupportedPlatform {
            operation: "frontmost application lookup",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn unsupported_platform_says_so() {
        let err = running_applications().unwrap_err();
        assert!(err.to_string().contains("not supported"));
        assert!(frontmost_application().is_err());
    }
}
