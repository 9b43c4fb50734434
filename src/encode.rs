use std::{io::Write, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use flate2::{write::GzEncoder, Compression};
use regex::Regex;

/// Byte literals per line of a rendered array.
const PER_LINE: usize = 12;

/// An asset after the compression decision.
pub(crate) struct Encoded {
    /// Bytes to embed: gzip stream if `compressed`, the file itself otherwise.
    pub(crate) data: Vec<u8>,
    pub(crate) original_size: usize,
    pub(crate) compressed: bool,
}

impl Encoded {
    /// Keeps the gzip form of `original` only if it is strictly smaller.
    pub(crate) fn new(original: Vec<u8>, gzip: bool) -> Result<Self> {
        let original_size = original.len();
        if gzip && !original.is_empty() {
            let compressed = compress(&original)?;
            if compressed.len() < original_size {
                return Ok(Self {
                    data: compressed,
                    original_size,
                    compressed: true,
                });
            }
        }
        Ok(Self {
            data: original,
            original_size,
            compressed: false,
        })
    }

    pub(crate) fn size(&self) -> usize {
        self.data.len()
    }

    /// Original size divided by embedded size.
    pub(crate) fn ratio(&self) -> f64 {
        if self.data.is_empty() {
            1.0
        } else {
            self.original_size as f64 / self.data.len() as f64
        }
    }

    /// One-line comment placed above the array in the generated source.
    pub(crate) fn comment(&self) -> String {
        if self.compressed {
            format!(
                "// Original size: {} bytes, Compressed size: {} bytes (ratio: {:.2}x)",
                self.original_size,
                self.size(),
                self.ratio()
            )
        } else {
            format!(
                "// Original size: {} bytes (not compressed)",
                self.original_size
            )
        }
    }

    /// Array body: indented lines of hex literals, no surrounding braces.
    pub(crate) fn array(&self) -> String {
        hex_lines(&self.data)
    }
}

fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).context("failed to compress")?;
    encoder.finish().context("failed to finish gzip stream")
}

pub(crate) fn hex_lines(data: &[u8]) -> String {
    data.chunks(PER_LINE)
        .map(|chunk| {
            let literals = chunk
                .iter()
                .map(|b| format!("0x{b:02X}"))
                .collect::<Vec<_>>();
            format!("    {}", literals.join(", "))
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

/// C symbol stem for a path relative to the input root.
///
/// Every character that may not appear in a C identifier becomes `_`. Two
/// distinct paths can map to the same identifier; that is not detected.
pub(crate) fn identifier(rel: &Path) -> String {
    static INVALID: OnceLock<Regex> = OnceLock::new();
    let invalid = INVALID.get_or_init(|| {
        Regex::new(r"[^0-9A-Za-z_]").expect("failed to compile identifier regex")
    });

    let rel = rel.to_string_lossy();
    let id = invalid.replace_all(&rel, "_");
    if id.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{id}")
    } else {
        id.into_owned()
    }
}

/// Reads and encodes one file.
pub(crate) fn encode_file(path: &Path, gzip: bool) -> Result<Encoded> {
    let original =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Encoded::new(original, gzip).with_context(|| format!("failed to encode {}", path.display()))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Read;

    use flate2::read::GzDecoder;
    use rstest::rstest;

    use super::*;

    /// Parses an array body produced by [`hex_lines`] back into bytes.
    pub(crate) fn parse_hex(body: &str) -> Vec<u8> {
        body.split(',')
            .map(str::trim)
            .filter(|lit| !lit.is_empty())
            .map(|lit| u8::from_str_radix(lit.strip_prefix("0x").unwrap(), 16).unwrap())
            .collect()
    }

    pub(crate) fn decode(data: &[u8], compressed: bool) -> Vec<u8> {
        if !compressed {
            return data.to_vec();
        }
        let mut out = Vec::new();
        GzDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    pub(crate) fn repetitive(len: usize) -> Vec<u8> {
        b"<p>hello embedded world</p>\n"
            .iter()
            .copied()
            .cycle()
            .take(len)
            .collect()
    }

    /// Deterministic bytes that deflate cannot shrink.
    pub(crate) fn noise(len: usize) -> Vec<u8> {
        let mut state = 0x2545_f491_u32;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u8
            })
            .collect()
    }

    #[test]
    fn compresses_repetitive_text() {
        let original = repetitive(500);
        let encoded = Encoded::new(original.clone(), true).unwrap();
        assert!(encoded.compressed);
        assert!(encoded.size() < 500);
        assert_eq!(encoded.original_size, 500);
        assert_eq!(decode(&encoded.data, true), original);
    }

    #[test]
    fn keeps_incompressible_data() {
        let original = noise(2000);
        let encoded = Encoded::new(original.clone(), true).unwrap();
        assert!(!encoded.compressed);
        assert_eq!(encoded.size(), 2000);
        assert_eq!(encoded.data, original);
    }

    #[test]
    fn larger_output_is_not_compressed() {
        // gzip framing alone is larger than a single byte.
        let encoded = Encoded::new(vec![b'a'], true).unwrap();
        assert!(!encoded.compressed);
        assert_eq!(encoded.data, b"a");
    }

    #[test]
    fn gzip_disabled() {
        let original = repetitive(500);
        let encoded = Encoded::new(original.clone(), false).unwrap();
        assert!(!encoded.compressed);
        assert_eq!(encoded.data, original);
        assert_eq!(encoded.ratio(), 1.0);
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn empty_file(#[case] gzip: bool) {
        let encoded = Encoded::new(Vec::new(), gzip).unwrap();
        assert!(!encoded.compressed);
        assert_eq!(encoded.size(), 0);
        assert_eq!(encoded.array(), "");
    }

    #[rstest]
    #[case(repetitive(1000))]
    #[case(noise(777))]
    #[case(Vec::new())]
    #[case((0..=255).collect())]
    fn array_round_trip(#[case] original: Vec<u8>) {
        let encoded = Encoded::new(original.clone(), true).unwrap();
        let parsed = parse_hex(&encoded.array());
        assert_eq!(parsed.len(), encoded.size());
        assert_eq!(decode(&parsed, encoded.compressed), original);
    }

    #[test]
    fn twelve_per_line() {
        let lines = hex_lines(&(0..25).collect::<Vec<u8>>());
        let lines = lines.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,"
        );
        assert_eq!(lines[2], "    0x18");
    }

    #[test]
    fn comments() {
        let plain = Encoded::new(noise(64), true).unwrap();
        assert_eq!(plain.comment(), "// Original size: 64 bytes (not compressed)");

        let packed = Encoded::new(repetitive(500), true).unwrap();
        let expected = format!(
            "// Original size: 500 bytes, Compressed size: {} bytes (ratio: {:.2}x)",
            packed.size(),
            500.0 / packed.size() as f64
        );
        assert_eq!(packed.comment(), expected);
    }

    #[rstest]
    #[case("index.html", "index_html")]
    #[case("assets/index-CTlEZb20.js", "assets_index_CTlEZb20_js")]
    #[case("icons/favicon-128x128.png", "icons_favicon_128x128_png")]
    #[case("my file.v2.css", "my_file_v2_css")]
    #[case("404.html", "_404_html")]
    #[case("QBtn-C5AIbVA_.js", "QBtn_C5AIbVA__js")]
    fn identifiers(#[case] rel: &str, #[case] expected: &str) {
        assert_eq!(identifier(Path::new(rel)), expected);
    }

    #[test]
    fn unreadable_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = encode_file(&dir.path().join("missing.js"), true)
            .err()
            .unwrap();
        assert!(format!("{err:#}").contains("failed to read"));
    }
}
