//! Divider text and the bytes it becomes in the output.
//!
//! The divider is encoded once while the configuration is resolved. A
//! non-empty divider requires an explicit encoding label; there is no
//! platform-dependent fallback.

use crate::app::error::ConcatError;
use encoding_rs::{Encoding, REPLACEMENT, UTF_16BE, UTF_16LE, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divider {
    encoding: &'static str,
    bytes: Vec<u8>,
}

impl Default for Divider {
    fn default() -> Self {
        Self {
            encoding: UTF_8.name(),
            bytes: Vec::new(),
        }
    }
}

impl Divider {
    /// Encodes `text` with the encoding named by `label`.
    ///
    /// Labels are WHATWG encoding labels (`utf-8`, `windows-1252`,
    /// `utf-16le`, ...), matched case-insensitively. An empty label or an
    /// unresolved `${...}` placeholder counts as unset.
    pub fn resolve(text: &str, label: Option<&str>) -> Result<Self, ConcatError> {
        let label = label.map(str::trim).filter(|l| !is_placeholder(l));

        let Some(label) = label else {
            if text.is_empty() {
                return Ok(Self::default());
            }
            return Err(ConcatError::Configuration(format!(
                "divider {:?} is set but no divider encoding is configured; set divider_encoding (e.g. \"UTF-8\")",
                text
            )));
        };

        let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
            ConcatError::Configuration(format!("unknown divider encoding: {}", label))
        })?;

        Ok(Self {
            encoding: encoding.name(),
            bytes: encode(text, encoding)?,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn encoding(&self) -> &'static str {
        self.encoding
    }
}

fn is_placeholder(label: &str) -> bool {
    label.is_empty() || (label.starts_with("${") && label.ends_with('}'))
}

fn encode(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>, ConcatError> {
    // encoding_rs only encodes to ASCII-compatible encodings; UTF-16 is done by hand.
    if encoding == UTF_16LE {
        return Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }
    if encoding == REPLACEMENT {
        return Err(ConcatError::Configuration(format!(
            "{} cannot be used as a divider encoding",
            encoding.name()
        )));
    }

    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(ConcatError::Configuration(format!(
            "divider {:?} cannot be represented in {}",
            text,
            encoding.name()
        )));
    }
    Ok(bytes.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_divider_needs_no_encoding() {
        let divider = Divider::resolve("", None).unwrap();
        assert!(divider.bytes().is_empty());
        assert_eq!(divider.encoding(), "UTF-8");
    }

    #[test]
    fn non_empty_divider_without_encoding_is_rejected() {
        let err = Divider::resolve("\n", None).unwrap_err();
        assert!(matches!(err, ConcatError::Configuration(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn placeholder_label_counts_as_unset() {
        assert!(Divider::resolve("", Some("${project.build.sourceEncoding}")).is_ok());
        assert!(Divider::resolve("X", Some("${project.build.sourceEncoding}")).is_err());
        assert!(Divider::resolve("X", Some("  ")).is_err());
    }

    #[test]
    fn utf8_divider() {
        let divider = Divider::resolve("é\n", Some("utf-8")).unwrap();
        assert_eq!(divider.bytes(), "é\n".as_bytes());
    }

    #[test]
    fn single_byte_encoding() {
        let divider = Divider::resolve("é", Some("ISO-8859-1")).unwrap();
        assert_eq!(divider.encoding(), "windows-1252");
        assert_eq!(divider.bytes(), &[0xE9]);
    }

    #[test]
    fn utf16_dividers() {
        let le = Divider::resolve("A", Some("UTF-16LE")).unwrap();
        assert_eq!(le.bytes(), &[0x41, 0x00]);
        let be = Divider::resolve("A", Some("utf-16be")).unwrap();
        assert_eq!(be.bytes(), &[0x00, 0x41]);
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = Divider::resolve("X", Some("klingon")).unwrap_err();
        assert!(err.to_string().contains("klingon"));
    }

    #[test]
    fn unmappable_character_is_rejected() {
        let err = Divider::resolve("\u{2603}", Some("windows-1252")).unwrap_err();
        assert!(matches!(err, ConcatError::Configuration(_)));
    }
}
