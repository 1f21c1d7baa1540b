//! Locating public key armor inside arbitrary text.
//!
//! [`scan`] finds every `-----BEGIN PUBLIC KEY----- … -----END PUBLIC KEY-----`
//! block in a document. The document may hold anything around the keys:
//! log output, certificates, prose. Only the generic `PUBLIC KEY` label is
//! recognized here.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

// `(?s)` lets `.` cross line breaks, the lazy `+?` stops at the first END.
static PUBLIC_KEY_ARMOR: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?s)(-----BEGIN PUBLIC KEY-----.+?-----END PUBLIC KEY-----)").ok()
});

/// A span of the scanned document holding one armored public key,
/// boundary lines included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PemBlock<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

impl<'a> PemBlock<'a> {
    /// Byte offset of the `-----BEGIN` marker.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset just past the closing `-----`.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The full armored text of the block.
    pub fn as_str(&self) -> &'a str {
        self.text
    }
}

/// Returns every public key block in `document`, in document order.
///
/// Never fails: empty input, input without armor and blocks whose markers
/// do not pair up all simply contribute no spans.
///
/// # Example
/// ```
/// let doc = "junk\n-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n";
/// let blocks = pem::scan(doc);
/// assert_eq!(blocks.len(), 1);
/// assert!(blocks[0].as_str().starts_with("-----BEGIN PUBLIC KEY-----"));
/// ```
pub fn scan(document: &str) -> Vec<PemBlock<'_>> {
    let Some(re) = PUBLIC_KEY_ARMOR.as_ref() else {
        return Vec::new();
    };

    re.captures_iter(document)
        .filter_map(|captured| captured.get(1))
        .map(|m| PemBlock {
            start: m.start(),
            end: m.end(),
            text: m.as_str(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::scan;

    const BLOCK_A: &str = "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----";
    const BLOCK_B: &str = "-----BEGIN PUBLIC KEY-----\nBBBB\nCCCC\n-----END PUBLIC KEY-----";

    #[rstest]
    #[case::empty("")]
    #[case::spaces("    ")]
    #[case::newlines("\n\n\r\n\t")]
    #[case::prose("no keys in here")]
    #[case::begin_only("-----BEGIN PUBLIC KEY-----\nAAAA\n")]
    #[case::end_only("AAAA\n-----END PUBLIC KEY-----\n")]
    #[case::mismatched("-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PRIVATE KEY-----\n")]
    #[case::rsa_label("-----BEGIN RSA PUBLIC KEY-----\nAAAA\n-----END RSA PUBLIC KEY-----\n")]
    fn test_scan_finds_nothing(#[case] input: &str) {
        assert!(scan(input).is_empty());
    }

    #[test]
    fn test_scan_two_blocks_in_order() {
        let doc = format!("header text\n{BLOCK_A}\nbetween\n{BLOCK_B}\ntrailer");
        let blocks = scan(&doc);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].as_str(), BLOCK_A);
        assert_eq!(blocks[1].as_str(), BLOCK_B);
        assert!(blocks[0].end() <= blocks[1].start());
        assert_eq!(&doc[blocks[0].range()], BLOCK_A);
        assert_eq!(blocks[0].start(), "header text\n".len());
    }

    #[test]
    fn test_scan_adjacent_blocks() {
        let doc = format!("{BLOCK_A}{BLOCK_B}");
        let blocks = scan(&doc);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].end(), blocks[1].start());
    }

    #[test]
    fn test_scan_crlf() {
        let doc = "-----BEGIN PUBLIC KEY-----\r\nAAAA\r\n-----END PUBLIC KEY-----\r\n";
        let blocks = scan(doc);

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].as_str().ends_with("-----END PUBLIC KEY-----"));
    }

    #[test]
    fn test_scan_unterminated_block_joins_next_end() {
        // A dangling BEGIN extends to the next END marker.
        let doc = format!("-----BEGIN PUBLIC KEY-----\nbroken\n{BLOCK_B}");
        let blocks = scan(&doc);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start(), 0);
        assert_eq!(blocks[0].end(), doc.len());
    }
}
