use std::path::Path;

use serde::Serialize;

pub(crate) const FALLBACK: &str = "application/octet-stream";

/// Known extensions (lower case, without dot) and their content types.
///
/// The generated C `get_content_type` is rendered from this table as well.
pub(crate) const CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("ico", "image/x-icon"),
    ("svg", "image/svg+xml"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
];

/// Resolves by the text after the last dot of the file name, like the
/// generated C code does. Dotfiles such as `.html` therefore count as HTML.
pub(crate) fn content_type(path: &Path) -> &'static str {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('.'))
        .map_or(FALLBACK, |(_, ext)| for_extension(ext))
}

pub(crate) fn for_extension(ext: &str) -> &'static str {
    CONTENT_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map_or(FALLBACK, |&(_, typ)| typ)
}

#[derive(Serialize)]
pub(crate) struct Mapping {
    pub(crate) ext: &'static str,
    pub(crate) content_type: &'static str,
}

/// Template view of [`CONTENT_TYPES`].
pub(crate) fn mappings() -> Vec<Mapping> {
    CONTENT_TYPES
        .iter()
        .map(|&(ext, content_type)| Mapping { ext, content_type })
        .collect()
}
