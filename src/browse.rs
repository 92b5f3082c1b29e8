//! Output folder browsing.
//!
//! A toolkit-independent replacement for a breadcrumb folder picker: the
//! presentation layer asks for the children of a folder when the user
//! expands it, and validates the final choice before a batch is built.

use directories::UserDirs;
use docbatch_common::{Error, Result};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// One folder shown by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderEntry {
    pub name: String,
    pub path: PathBuf,
    /// The folder has no sub-folders, so there is nothing to expand.
    pub is_leaf: bool,
}

impl FolderEntry {
    fn from_path(name: impl Into<String>, path: PathBuf) -> Self {
        let is_leaf = !has_subfolder(&path);
        Self {
            name: name.into(),
            path,
            is_leaf,
        }
    }
}

/// List the sub-folders of `path`, sorted by name (case-insensitive).
///
/// Files are not listed. Entries that cannot be read are skipped.
pub fn list_children(path: &Path) -> Result<Vec<FolderEntry>> {
    let dir = validate_output_dir(path)?;

    let mut children: Vec<FolderEntry> = std::fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            FolderEntry::from_path(name, entry.path())
        })
        .collect();

    children.sort_by_key(|e| e.name.to_lowercase());
    Ok(children)
}

/// Top-level entries: well-known user folders that exist, then drives.
pub fn root_locations() -> Vec<FolderEntry> {
    let mut roots = Vec::new();

    if let Some(dirs) = UserDirs::new() {
        roots.push(FolderEntry::from_path("Home", dirs.home_dir().to_path_buf()));

        let known = [
            ("Desktop", dirs.desktop_dir()),
            ("Documents", dirs.document_dir()),
            ("Downloads", dirs.download_dir()),
            ("Music", dirs.audio_dir()),
            ("Pictures", dirs.picture_dir()),
            ("Videos", dirs.video_dir()),
        ];
        for (name, dir) in known {
            if let Some(dir) = dir.filter(|d| d.is_dir()) {
                roots.push(FolderEntry::from_path(name, dir.to_path_buf()));
            }
        }
    }

    for drive in drives() {
        let name = drive.display().to_string();
        roots.push(FolderEntry::from_path(name, drive));
    }

    roots
}

/// Filesystem roots: drive letters on Windows, `/` elsewhere.
pub fn drives() -> Vec<PathBuf> {
    #[cfg(windows)]
    {
        (b'A'..=b'Z')
            .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
            .filter(|p| p.is_dir())
            .collect()
    }

    #[cfg(not(windows))]
    {
        vec![PathBuf::from("/")]
    }
}

/// The ancestors of `path` from the root down, one crumb per component.
pub fn breadcrumbs(path: &Path) -> Vec<(String, PathBuf)> {
    let mut crumbs: Vec<(String, PathBuf)> = Vec::new();
    let mut current = PathBuf::new();

    for component in path.components() {
        current.push(component.as_os_str());
        let name = match component {
            Component::Prefix(prefix) => prefix.as_os_str().to_string_lossy().into_owned(),
            Component::RootDir => {
                // On Windows the drive prefix already has a crumb.
                if let Some(last) = crumbs.last_mut() {
                    last.1 = current.clone();
                    continue;
                }
                std::path::MAIN_SEPARATOR.to_string()
            }
            Component::Normal(name) => name.to_string_lossy().into_owned(),
            Component::CurDir | Component::ParentDir => continue,
        };
        crumbs.push((name, current.clone()));
    }

    crumbs
}

/// Accept `path` as an output directory only if it is an existing directory.
///
/// Returns the absolute form of the path.
pub fn validate_output_dir(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }
    if !path.is_dir() {
        return Err(Error::not_a_directory(path));
    }
    Ok(std::path::absolute(path)?)
}

/// Default output directory: the desktop, else home, else the current directory.
pub fn default_output_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| {
            dirs.desktop_dir()
                .filter(|d| d.is_dir())
                .map(Path::to_path_buf)
                .or_else(|| Some(dirs.home_dir().to_path_buf()))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

fn has_subfolder(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .any(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        })
        .unwrap_or(false)
}
