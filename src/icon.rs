//! Icon lookup inside a bundle and `.icns` to PNG re-encoding.

use icns::{IconFamily, IconType};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::bundle::AppBundle;
use crate::error::{AppdexError, Result};

/// Locate the bundle's `.icns` file: conventional names under
/// `Contents/Resources` first, the property list as a last resort.
pub fn bundle_icon_path(bundle: &AppBundle) -> Option<PathBuf> {
    find_icon_by_patterns(bundle).or_else(|| icon_from_plist(bundle))
}

/// Re-encode the best available size from an `.icns` file as PNG bytes.
pub fn extract_png(icns_path: &Path) -> Result<Vec<u8>> {
    let file = File::open(icns_path)
        .map_err(|source| AppdexError::io(icns_path.to_path_buf(), source))?;
    let icon_family = IconFamily::read(BufReader::new(file))
        .map_err(|source| AppdexError::io(icns_path.to_path_buf(), source))?;

    let image = [
        IconType::RGBA32_256x256,
        IconType::RGBA32_128x128,
        IconType::RGBA32_64x64,
        IconType::RGB24_48x48,
        IconType::RGB24_32x32,
        IconType::RGBA32_512x512,
    ]
    .iter()
    .find_map(|&icon_type| icon_family.get_icon_with_type(icon_type).ok())
    .ok_or_else(|| AppdexError::NoUsableIcon {
        path: icns_path.to_path_buf(),
    })?;

    let mut png_data = Vec::new();
    image
        .write_png(&mut png_data)
        .map_err(|source| AppdexError::io(icns_path.to_path_buf(), source))?;
    Ok(png_data)
}

fn find_icon_by_patterns(bundle: &AppBundle) -> Option<PathBuf> {
    let resources_dir = bundle.resources_dir();
    let name = bundle.name();

    let candidates = [
        format!("{name}.icns"),
        format!("{}.icns", name.to_lowercase()),
        format!("{}.icns", name.to_uppercase()),
        "AppIcon.icns".to_string(),
        "appicon.icns".to_string(),
        "app.icns".to_string(),
        "icon.icns".to_string(),
    ];

    candidates
        .iter()
        .map(|candidate| resources_dir.join(candidate))
        .find(|path| is_readable_icns(path))
}

fn icon_from_plist(bundle: &AppBundle) -> Option<PathBuf> {
    let info = bundle.info().ok()?;
    let resources_dir = bundle.resources_dir();

    [info.icon_name.as_ref(), info.icon_file.as_ref()]
        .into_iter()
        .flatten()
        .find_map(|icon_name| {
            let file_name = if icon_name.ends_with(".icns") {
                icon_name.clone()
            } else {
                format!("{icon_name}.icns")
            };
            let path = resources_dir.join(file_name);
            is_readable_icns(&path).then_some(path)
        })
}

/// An icon candidate only counts when it parses as an icns family.
fn is_readable_icns(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("icns"))
        && File::open(path)
            .ok()
            .and_then(|file| IconFamily::read(BufReader::new(file)).ok())
            .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::InfoPlist;
    use icns::{Image, PixelFormat};
    use std::fs;
    use std::io::BufWriter;
    use tempfile::TempDir;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    fn write_icns(path: &Path) {
        let image = Image::new(PixelFormat::RGBA, 256, 256);
        let mut family = IconFamily::new();
        family
            .add_icon_with_type(&image, IconType::RGBA32_256x256)
            .unwrap();
        let file = BufWriter::new(File::create(path).unwrap());
        family.write(file).unwrap();
    }

    fn make_bundle(root: &Path, name: &str) -> AppBundle {
        let bundle_path = root.join(format!("{name}.app"));
        fs::create_dir_all(bundle_path.join("Contents/Resources")).unwrap();
        plist::to_file_xml(
            bundle_path.join("Contents/Info.plist"),
            &InfoPlist::default(),
        )
        .unwrap();
        AppBundle::new(bundle_path)
    }

    #[test]
    fn extracts_png_from_icns() {
        let tmp = TempDir::new().unwrap();
        let icns_path = tmp.path().join("AppIcon.icns");
        write_icns(&icns_path);

        let png = extract_png(&icns_path).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
    }

    #[test]
    fn empty_icns_has_no_usable_icon() {
        let tmp = TempDir::new().unwrap();
        let icns_path = tmp.path().join("empty.icns");
        let file = BufWriter::new(File::create(&icns_path).unwrap());
        IconFamily::new().write(file).unwrap();

        assert!(matches!(
            extract_png(&icns_path),
            Err(AppdexError::NoUsableIcon { .. })
        ));
    }

    #[test]
    fn finds_conventionally_named_icon() {
        let tmp = TempDir::new().unwrap();
        let bundle = make_bundle(tmp.path(), "Notes");
        let icon = bundle.resources_dir().join("AppIcon.icns");
        write_icns(&icon);

        assert_eq!(bundle_icon_path(&bundle), Some(icon));
    }

    #[test]
    fn bundle_name_beats_generic_names() {
        let tmp = TempDir::new().unwrap();
        let bundle = make_bundle(tmp.path(), "Notes");
        write_icns(&bundle.resources_dir().join("AppIcon.icns"));
        let named = bundle.resources_dir().join("Notes.icns");
        write_icns(&named);

        assert_eq!(bundle_icon_path(&bundle), Some(named));
    }

    #[test]
    fn falls_back_to_plist_icon_file() {
        let tmp = TempDir::new().unwrap();
        let bundle_path = tmp.path().join("Odd.app");
        fs::create_dir_all(bundle_path.join("Contents/Resources")).unwrap();
        let info = InfoPlist {
            icon_file: Some("Weird".to_string()),
            ..InfoPlist::default()
        };
        plist::to_file_xml(bundle_path.join("Contents/Info.plist"), &info).unwrap();
        let bundle = AppBundle::new(&bundle_path);

        let icon = bundle.resources_dir().join("Weird.icns");
        write_icns(&icon);

        assert_eq!(bundle_icon_path(&bundle), Some(icon));
    }

    #[test]
    fn truncated_icon_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let bundle = make_bundle(tmp.path(), "Notes");
        fs::write(bundle.resources_dir().join("AppIcon.icns"), b"junk").unwrap();

        assert_eq!(bundle_icon_path(&bundle), None);
    }
}
