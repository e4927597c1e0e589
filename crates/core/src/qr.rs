//! QR payload parsing.
//!
//! QR labels carry a few `Label: value` lines, one per field. Two
//! kinds circulate: login labels (`Code client: ABC123`) and article
//! labels (`Référence: ...` / `Désignation: ...`). The parser only
//! extracts fields; it never decides which kind a payload is - the
//! login path reads `client_code`, the scan path reads `reference`,
//! and a payload carrying both is arbitrated by the caller.
//!
//! Extraction is deliberately isolated behind [`QrScheme`] so an
//! alternate label format can be introduced without touching session
//! or cart logic.

use serde::{Deserialize, Serialize};

/// Structured fields extracted from a scanned QR text.
///
/// An empty string means the field was absent from the payload; a
/// missing field is never a parse error, only the absence of that
/// capability (e.g. no `client_code` means "not a login QR").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    /// Value of the `Code client:` line, if any.
    pub client_code: String,
    /// Value of the `Référence:` line, if any.
    pub reference: String,
    /// Value of the `Désignation:` line, if any.
    pub designation: String,
}

impl QrPayload {
    /// Whether this payload can drive a login.
    #[must_use]
    pub fn is_login(&self) -> bool {
        !self.client_code.is_empty()
    }

    /// Whether this payload can drive an article scan.
    #[must_use]
    pub fn is_article(&self) -> bool {
        !self.reference.is_empty()
    }
}

/// A strategy for extracting a [`QrPayload`] from raw scanned text.
///
/// Implementations must be pure and deterministic: parsing the same
/// string twice yields identical payloads, and parsing performs no
/// I/O.
pub trait QrScheme {
    /// Extract structured fields from the raw scan text.
    fn parse(&self, raw: &str) -> QrPayload;
}

/// The production label format: one `Label: value` field per line.
///
/// - Strips byte-order-mark (U+FEFF) and zero-width-space (U+200B)
///   characters anywhere in the input.
/// - Normalizes `\r\n` and bare `\r` line endings to `\n`.
/// - Matches line prefixes case-insensitively (`code client`,
///   `référence`, `désignation`); the value is the text after the
///   first `:` on the line, trimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabeledLineScheme;

impl QrScheme for LabeledLineScheme {
    fn parse(&self, raw: &str) -> QrPayload {
        let cleaned: String = raw
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .chars()
            .filter(|c| *c != '\u{FEFF}' && *c != '\u{200B}')
            .collect();

        let mut payload = QrPayload::default();
        for line in cleaned.trim().lines().map(str::trim) {
            if payload.client_code.is_empty()
                && let Some(value) = field_value(line, "code client")
            {
                payload.client_code = value;
            } else if payload.reference.is_empty()
                && let Some(value) = field_value(line, "référence")
            {
                payload.reference = value;
            } else if payload.designation.is_empty()
                && let Some(value) = field_value(line, "désignation")
            {
                payload.designation = value;
            }
        }
        payload
    }
}

/// Extract the value of a `Label: value` line when `line` starts with
/// `label` (case-insensitive). Returns the trimmed text after the
/// first colon, or an empty value when the colon is missing.
fn field_value(line: &str, label: &str) -> Option<String> {
    if !line.to_lowercase().starts_with(label) {
        return None;
    }
    let value = line
        .split_once(':')
        .map_or("", |(_, rest)| rest)
        .trim()
        .to_owned();
    Some(value)
}

/// Parse a raw QR text with the production [`LabeledLineScheme`].
#[must_use]
pub fn parse_qr(raw: &str) -> QrPayload {
    LabeledLineScheme.parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_login_payload() {
        let payload = parse_qr("Code client: ABC123");
        assert_eq!(payload.client_code, "ABC123");
        assert!(payload.is_login());
        assert!(!payload.is_article());
    }

    #[test]
    fn parses_article_payload() {
        let raw = "Référence: REF-42\nDésignation: Gants nitrile T9";
        let payload = parse_qr(raw);
        assert_eq!(payload.reference, "REF-42");
        assert_eq!(payload.designation, "Gants nitrile T9");
        assert!(payload.is_article());
        assert!(!payload.is_login());
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let payload = parse_qr("CODE CLIENT : xyz");
        assert_eq!(payload.client_code, "xyz");

        let payload = parse_qr("référence:REF-1\nDÉSIGNATION: Visserie");
        assert_eq!(payload.reference, "REF-1");
        assert_eq!(payload.designation, "Visserie");
    }

    #[test]
    fn strips_bom_and_zero_width_and_crlf() {
        let raw = "\u{FEFF}Code client\u{200B}: AB\u{200B}C1\r\nRéférence: R1\r";
        let payload = parse_qr(raw);
        assert_eq!(payload.client_code, "ABC1");
        assert_eq!(payload.reference, "R1");
    }

    #[test]
    fn missing_fields_yield_empty_strings() {
        let payload = parse_qr("just some text\nwithout labels");
        assert_eq!(payload, QrPayload::default());
        assert!(!payload.is_login());
        assert!(!payload.is_article());
    }

    #[test]
    fn empty_input_never_errors() {
        assert_eq!(parse_qr(""), QrPayload::default());
        assert_eq!(parse_qr("   \n \r\n "), QrPayload::default());
    }

    #[test]
    fn value_is_text_after_first_colon() {
        let payload = parse_qr("Désignation: Câble 3x1.5 : 50m");
        assert_eq!(payload.designation, "Câble 3x1.5 : 50m");
    }

    #[test]
    fn parse_is_deterministic() {
        let raw = "Code client: ABC123\nRéférence: R1";
        assert_eq!(parse_qr(raw), parse_qr(raw));
    }

    #[test]
    fn mixed_payload_keeps_both_fields() {
        // Caller decides precedence; the parser does not arbitrate.
        let payload = parse_qr("Code client: C1\nRéférence: R1");
        assert!(payload.is_login());
        assert!(payload.is_article());
    }

    #[test]
    fn first_occurrence_wins() {
        let payload = parse_qr("Code client: FIRST\nCode client: SECOND");
        assert_eq!(payload.client_code, "FIRST");
    }
}
