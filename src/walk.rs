use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;

/// A regular file found below the input root.
pub(crate) struct Found {
    pub(crate) path: PathBuf,
    /// Path relative to the input root.
    pub(crate) rel: PathBuf,
}

/// Lazily lists every regular file below `root`.
///
/// Siblings are visited in file name order. Symbolic links are not followed
/// and, like directories, are not reported. Entries that cannot be read are
/// yielded as errors so that the caller can skip them.
pub(crate) fn files(root: &Path) -> Result<impl Iterator<Item = Result<Found>>> {
    if !root.is_dir() {
        bail!("input directory {} does not exist", root.display());
    }

    let root = root.to_path_buf();
    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    Ok(walker.filter_map(move |entry| {
        let entry = match entry.context("failed to read directory entry") {
            Ok(entry) => entry,
            Err(err) => return Some(Err(err)),
        };
        if !entry.file_type().is_file() {
            return None;
        }
        let path = entry.into_path();
        // Every yielded path lies below the root.
        let rel = path.strip_prefix(&root).ok()?.to_path_buf();
        Some(Ok(Found { path, rel }))
    }))
}

/// Forward-slash, `/`-rooted path under which a web server requests `rel`.
pub(crate) fn web_path(rel: &Path) -> String {
    let mut web = String::new();
    for component in rel.components() {
        web.push('/');
        web.push_str(&component.as_os_str().to_string_lossy());
    }
    if web.is_empty() {
        web.push('/');
    }
    web
}
