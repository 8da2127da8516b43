//! NSWorkspace queries, via raw message sends.

use cocoa::base::{id, nil};
use objc::{class, msg_send, sel, sel_impl};
use std::path::PathBuf;

use crate::error::{AppdexError, Result};
use crate::platform::RunningApp;

pub fn running_applications() -> Result<Vec<RunningApp>> {
    let mut apps = Vec::new();
    unsafe {
        let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
        let running: id = msg_send![workspace, runningApplications];
        let count: usize = msg_send![running, count];

        for index in 0..count {
            let app: id = msg_send![running, objectAtIndex: index];
            apps.push(running_app(app));
        }
    }
    Ok(apps)
}

pub fn frontmost_application() -> Result<RunningApp> {
    unsafe {
        let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
        let app: id = msg_send![workspace, frontmostApplication];
        if app == nil {
            return Err(AppdexError::NoFrontmostApp);
        }
        Ok(running_app(app))
    }
}

fn running_app(app: id) -> RunningApp {
    let (name, bundle_id, pid, bundle_path, executable) = unsafe {
        let name: id = msg_send![app, localizedName];
        let bundle_id: id = msg_send![app, bundleIdentifier];
        let pid: i32 = msg_send![app, processIdentifier];
        let bundle_url: id = msg_send![app, bundleURL];
        let executable_url: id = msg_send![app, executableURL];
        (
            nsstring_to_string(name),
            nsstring_to_string(bundle_id),
            pid,
            url_path(bundle_url),
            url_path(executable_url),
        )
    };

    RunningApp {
        name: name
            .or_else(|| bundle_path.as_ref().map(|p| stem_of(p)))
            .unwrap_or_else(|| "Unknown".to_string()),
        bundle_path,
        bundle_id,
        executable,
        pid,
    }
}

fn url_path(url: id) -> Option<PathBuf> {
    if url == nil {
        return None;
    }
    let path: id = unsafe { msg_send![url, path] };
    nsstring_to_string(path).map(PathBuf::from)
}

fn nsstring_to_string(nsstring: id) -> Option<String> {
    if nsstring == nil {
        return None;
    }
    unsafe {
        let cstr: *const std::os::raw::c_char = msg_send![nsstring, UTF8String];
        if cstr.is_null() {
            return None;
        }
        Some(
            std::ffi::CStr::from_ptr(cstr)
                .to_string_lossy()
                .into_owned(),
        )
    }
}

fn stem_of(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
