//! Resource records: compiled bytes plus cache-validation metadata.

use serde::{Deserialize, Serialize};

/// A compiled asset ready to be served: raw bytes, a content-derived etag,
/// the MIME type of its logical filename, and a gzip copy of the bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Compiled bytes.
    pub data: Vec<u8>,
    /// Deterministic content hash of `data` (blake3, lowercase hex).
    pub etag: String,
    /// MIME type derived from the record's logical filename.
    pub mime: String,
    /// Gzip-compressed copy of `data`.
    pub gzip: Vec<u8>,
}

/// A compiled asset that has not been compressed yet.
///
/// Sub-compilers only ever produce pending records; the compression
/// annotator is the sole way to turn them into [`ResourceRecord`]s, so a
/// cache with an unpopulated `gzip` field cannot be constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRecord {
    /// Compiled bytes.
    pub data: Vec<u8>,
    /// Deterministic content hash of `data` (blake3, lowercase hex).
    pub etag: String,
    /// MIME type derived from the record's logical filename.
    pub mime: String,
}

impl PendingRecord {
    /// Wraps compiled bytes, deriving the etag from the content and the
    /// MIME type from the logical filename `name`.
    pub fn new(name: &str, data: Vec<u8>) -> Self {
        Self {
            etag: etag_of(&data),
            mime: mime_for(name),
            data,
        }
    }

    /// Attaches the compressed copy, completing the record.
    pub fn into_record(self, gzip: Vec<u8>) -> ResourceRecord {
        ResourceRecord {
            data: self.data,
            etag: self.etag,
            mime: self.mime,
            gzip,
        }
    }
}

/// Content-derived identifier used for conditional requests.
pub fn etag_of(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// MIME type for a logical filename. Never sniffs content.
pub fn mime_for(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn etag_is_stable_and_content_derived() {
        let a = etag_of(b"a{}\nb{}\n");
        let b = etag_of(b"a{}\nb{}\n");
        assert_eq!(a, b);
        assert_ne!(a, etag_of(b"a{}\n"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn mime_comes_from_the_filename() {
        assert_eq!(mime_for("style.css"), "text/css");
        assert_eq!(mime_for("main.html"), "text/html");
        // Content is never sniffed: an unknown extension is an octet stream
        // even if the bytes look like something else.
        assert_eq!(mime_for("sprites.pak"), "application/octet-stream");
    }

    #[test]
    fn pending_record_derives_metadata() {
        let rec = PendingRecord::new("style.css", b"a{}".to_vec());
        assert_eq!(rec.mime, "text/css");
        assert_eq!(rec.etag, etag_of(b"a{}"));
    }

    #[test]
    fn into_record_keeps_data_and_metadata() {
        let pending = PendingRecord::new("logo.svg", b"<svg/>".to_vec());
        let etag = pending.etag.clone();
        let rec = pending.into_record(vec![1, 2, 3]);
        assert_eq!(rec.data, b"<svg/>");
        assert_eq!(rec.etag, etag);
        assert_eq!(rec.gzip, vec![1, 2, 3]);
    }
}
