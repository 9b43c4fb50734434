use std::{
    ffi::OsString,
    fmt::Write,
    fs::write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

use crate::{encode::identifier, mime, render, table::Table, Ctx};

#[derive(Serialize)]
struct AssetView<'t> {
    id: &'t str,
    comment: String,
    array: String,
    size: usize,
    original_size: usize,
    compressed: bool,
}

#[derive(Serialize)]
struct EntryView<'t> {
    /// Quoted and escaped C string literal.
    path: String,
    content_type: &'t str,
    id: &'t str,
    size: usize,
    original_size: usize,
    compressed: bool,
}

/// The two generated files.
pub(crate) struct Outputs {
    pub(crate) header: PathBuf,
    pub(crate) source: PathBuf,
}

impl Outputs {
    pub(crate) fn for_prefix(prefix: &Path) -> Self {
        Self {
            header: with_suffix(prefix, ".h"),
            source: with_suffix(prefix, ".c"),
        }
    }
}

/// Appends rather than replaces, so `out/web.v2` becomes `out/web.v2.h`.
fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(prefix.as_os_str());
    path.push(suffix);
    path.into()
}

/// Renders the table and writes the header, then the source file.
///
/// A failed write leaves whatever was already written in place.
pub(crate) fn write_outputs(ctx: &Ctx) -> Result<Outputs> {
    let outputs = Outputs::for_prefix(&ctx.dest);
    let (header, source) = render_outputs(ctx, &outputs)?;

    write(&outputs.header, header)
        .with_context(|| format!("failed to write {}", outputs.header.display()))?;
    write(&outputs.source, source)
        .with_context(|| format!("failed to write {}", outputs.source.display()))?;

    Ok(outputs)
}

pub(crate) fn render_outputs(ctx: &Ctx, outputs: &Outputs) -> Result<(String, String)> {
    let header_name = outputs
        .header
        .file_name()
        .context("output prefix has no file name")?
        .to_string_lossy();
    let guard = header_guard(&ctx.dest);
    let assets = asset_views(&ctx.table);
    let entries = entry_views(&ctx.table);

    let header = render(
        &ctx.reg,
        "header",
        &json!({"guard": guard, "assets": assets}),
    )?;
    let source = render(
        &ctx.reg,
        "source",
        &json!({
            "header": c_escape(&header_name),
            "assets": assets,
            "entries": entries,
            "count": entries.len(),
            "content_types": mime::mappings(),
            "fallback": mime::FALLBACK,
        }),
    )?;
    Ok((header, source))
}

fn asset_views(table: &Table) -> Vec<AssetView<'_>> {
    table
        .assets
        .iter()
        .map(|asset| AssetView {
            id: &asset.id,
            comment: asset.encoded.comment(),
            array: asset.encoded.array(),
            size: asset.encoded.size(),
            original_size: asset.encoded.original_size,
            compressed: asset.encoded.compressed,
        })
        .collect()
}

fn entry_views(table: &Table) -> Vec<EntryView<'_>> {
    table
        .entries
        .iter()
        .map(|entry| {
            let asset = table.asset(entry);
            EntryView {
                path: format!("\"{}\"", c_escape(&entry.path)),
                content_type: asset.content_type,
                id: &asset.id,
                size: asset.encoded.size(),
                original_size: asset.encoded.original_size,
                compressed: asset.encoded.compressed,
            }
        })
        .collect()
}

/// `static_files` becomes `STATIC_FILES_H`.
fn header_guard(prefix: &Path) -> String {
    let name = prefix.file_name().map(Path::new).unwrap_or(prefix);
    let mut guard = identifier(name).to_ascii_uppercase();
    guard.push_str("_H");
    guard
}

/// Escapes `text` for use between the quotes of a C string literal.
///
/// Non-ASCII and control bytes become three-digit octal escapes so that a
/// following digit can never extend them.
fn c_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'"' => escaped.push_str("\\\""),
            b'\\' => escaped.push_str("\\\\"),
            b'?' => escaped.push_str("\\?"),
            0x20..=0x7e => escaped.push(byte as char),
            _ => {
                let _ = write!(escaped, "\\{byte:03o}");
            }
        }
    }
    escaped
}
