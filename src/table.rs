use std::path::{Path, PathBuf};

use crate::{encode::Encoded, mime, walk::web_path};

const INDEX: &str = "index.html";

/// One converted file.
pub(crate) struct Asset {
    /// C symbol stem, see [`crate::encode::identifier`].
    pub(crate) id: String,
    pub(crate) rel: PathBuf,
    pub(crate) content_type: &'static str,
    pub(crate) encoded: Encoded,
}

/// One row of the lookup table.
pub(crate) struct Entry {
    pub(crate) path: String,
    /// Index into [`Table::assets`].
    pub(crate) asset: usize,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Totals {
    pub(crate) files: usize,
    pub(crate) original: usize,
    pub(crate) embedded: usize,
}

impl Totals {
    pub(crate) fn ratio(&self) -> Option<f64> {
        (self.original > 0 && self.embedded > 0)
            .then(|| self.original as f64 / self.embedded as f64)
    }

    /// Bytes saved as a percentage of the original total.
    pub(crate) fn saved_percent(&self) -> Option<f64> {
        (self.original > 0)
            .then(|| (1.0 - self.embedded as f64 / self.original as f64) * 100.0)
    }
}

/// Append-only lookup table, in walk order.
#[derive(Default)]
pub(crate) struct Table {
    pub(crate) assets: Vec<Asset>,
    pub(crate) entries: Vec<Entry>,
    pub(crate) totals: Totals,
}

impl Table {
    /// Adds `encoded` under its web path and, for `index.html`, under the
    /// path of its directory as well.
    pub(crate) fn push(&mut self, id: String, rel: &Path, encoded: Encoded) -> &Asset {
        let index = self.assets.len();
        let path = web_path(rel);
        let alias = directory_alias(rel, &path);

        self.totals.files += 1;
        self.totals.original += encoded.original_size;
        self.totals.embedded += encoded.size();

        self.entries.push(Entry { path, asset: index });
        if let Some(alias) = alias {
            self.entries.push(Entry { path: alias, asset: index });
        }
        self.assets.push(Asset {
            id,
            rel: rel.to_path_buf(),
            content_type: mime::content_type(rel),
            encoded,
        });
        &self.assets[index]
    }

    pub(crate) fn asset(&self, entry: &Entry) -> &Asset {
        &self.assets[entry.asset]
    }
}

/// `/docs/index.html` is also served as `/docs/`, the root one as `/`.
fn directory_alias(rel: &Path, path: &str) -> Option<String> {
    if rel.file_name()? != INDEX {
        return None;
    }
    path.strip_suffix(INDEX).map(str::to_string)
}
