//! Semicolon-delimited quarantine record decoder.
//!
//! Layout: `flags;hex-timestamp;application[;event-uuid]`. The
//! timestamp is seconds since the epoch in base 16; the application
//! name may contain `\xNN` escapes; the optional UUID keys into the
//! quarantine events store.

use std::num::IntErrorKind;

use crate::cache::UrlLookup;
use crate::error::ErrorCode;
use crate::model::{Attributes, Field};
use crate::split;

/// Undo `\xNN` escaping in an application name.
///
/// Malformed escape sequences are left verbatim rather than treated as
/// an error.
#[must_use]
pub fn unescape_app_name(s: &str) -> String {
    fn hex_val(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() && bytes[i + 1] == b'x' {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 2]), hex_val(bytes[i + 3])) {
                out.push(hi * 16 + lo);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Decode one quarantine record into `attrs`.
///
/// The events store is consulted for the optional UUID only when URL
/// and referrer are not already both populated from another source.
pub fn parse(attrs: &mut Attributes, raw: &str, lookup: &mut dyn UrlLookup) -> ErrorCode {
    let fields = split::split_keep(raw, ';');
    if fields.len() < 3 {
        attrs.record_error(format!(
            "Expected at least 3 fields in quarantine attribute, but got {}",
            fields.len()
        ));
        return ErrorCode::Other;
    }

    let hex = fields[1];
    match u64::from_str_radix(hex, 16) {
        Ok(seconds) => attrs.fill_date_seconds(seconds as i64),
        Err(e) => {
            let message = match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => e.to_string(),
                _ => format!("\"{hex}\" is not a valid hex number"),
            };
            attrs.record_error(message);
            return ErrorCode::Other;
        }
    }

    let application = unescape_app_name(fields[2]);
    if !application.is_empty() {
        attrs.fill(Field::Application, application);
    }

    if let Some(uuid) = fields.get(3) {
        if !uuid.is_empty() && !attrs.has_url_pair() {
            let pair = lookup.lookup(uuid);
            if let Some(url) = pair.url {
                attrs.fill(Field::Url, url);
            }
            if let Some(referrer) = pair.referrer {
                attrs.fill(Field::Referrer, referrer);
            }
        }
    }

    ErrorCode::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::UrlPair;

    #[derive(Default)]
    struct Recording {
        looked_up: Vec<String>,
        pair: UrlPair,
    }

    impl UrlLookup for Recording {
        fn lookup(&mut self, key: &str) -> UrlPair {
            self.looked_up.push(key.to_string());
            self.pair.clone()
        }
    }

    #[test]
    fn test_basic_record() {
        let mut attrs = Attributes::new();
        let mut lookup = Recording::default();
        let ec = parse(&mut attrs, "0;5F1A2B3C;Safari;ABCD", &mut lookup);
        assert_eq!(ec, ErrorCode::Ok);
        assert_eq!(attrs.date.seconds, 0x5F1A_2B3C);
        assert!(attrs.date.seconds_valid);
        assert!(!attrs.date.millis_valid);
        assert_eq!(attrs.get(Field::Application), Some("Safari"));
        assert_eq!(lookup.looked_up, vec!["ABCD".to_string()]);
    }

    #[test]
    fn test_lookup_skipped_when_urls_already_known() {
        let mut attrs = Attributes::new();
        attrs.fill(Field::Url, "http://already/");
        attrs.fill(Field::Referrer, "http://there/");
        let mut lookup = Recording::default();
        parse(&mut attrs, "0;5F1A2B3C;Safari;ABCD", &mut lookup);
        assert!(lookup.looked_up.is_empty());
    }

    #[test]
    fn test_lookup_fills_urls() {
        let mut attrs = Attributes::new();
        let mut lookup = Recording {
            pair: UrlPair {
                url: Some("http://dl/".into()),
                referrer: Some("http://ref/".into()),
            },
            ..Recording::default()
        };
        parse(&mut attrs, "0;1;App;UUID-1", &mut lookup);
        assert_eq!(attrs.get(Field::Url), Some("http://dl/"));
        assert_eq!(attrs.get(Field::Referrer), Some("http://ref/"));
    }

    #[test]
    fn test_empty_uuid_is_not_looked_up() {
        let mut attrs = Attributes::new();
        let mut lookup = Recording::default();
        parse(&mut attrs, "0;1;App;", &mut lookup);
        assert!(lookup.looked_up.is_empty());
    }

    #[test]
    fn test_too_few_fields() {
        let mut attrs = Attributes::new();
        let mut lookup = Recording::default();
        let ec = parse(&mut attrs, "0;5F1A2B3C", &mut lookup);
        assert_eq!(ec, ErrorCode::Other);
        assert_eq!(
            attrs.error(),
            Some("Expected at least 3 fields in quarantine attribute, but got 2")
        );
    }

    #[test]
    fn test_invalid_hex_is_a_hard_error() {
        let mut attrs = Attributes::new();
        let mut lookup = Recording::default();
        let ec = parse(&mut attrs, "0;xyzzy;App", &mut lookup);
        assert_eq!(ec, ErrorCode::Other);
        assert_eq!(attrs.error(), Some("\"xyzzy\" is not a valid hex number"));
        assert!(!attrs.date.seconds_valid);
    }

    #[test]
    fn test_empty_hex_is_rejected() {
        let mut attrs = Attributes::new();
        let mut lookup = Recording::default();
        assert_eq!(parse(&mut attrs, "0;;App", &mut lookup), ErrorCode::Other);
        assert_eq!(attrs.error(), Some("\"\" is not a valid hex number"));
    }

    #[test]
    fn test_hex_overflow_keeps_system_message() {
        let mut attrs = Attributes::new();
        let mut lookup = Recording::default();
        let ec = parse(&mut attrs, "0;FFFFFFFFFFFFFFFFF;App", &mut lookup);
        assert_eq!(ec, ErrorCode::Other);
        let msg = attrs.error().unwrap();
        assert!(!msg.contains("hex"), "overflow keeps the parse error: {msg}");
    }

    #[test]
    fn test_unescape_decodes_hex_sequences() {
        assert_eq!(unescape_app_name(r"Fire\x66ox"), "Firefox");
        assert_eq!(unescape_app_name(r"\x41\x42"), "AB");
    }

    #[test]
    fn test_unescape_leaves_malformed_sequences_verbatim() {
        assert_eq!(unescape_app_name(r"bad\xZZesc"), r"bad\xZZesc");
        assert_eq!(unescape_app_name(r"tail\x4"), r"tail\x4");
        assert_eq!(unescape_app_name(r"lone\"), r"lone\");
    }

    #[test]
    fn test_unescape_plain_name_untouched() {
        assert_eq!(unescape_app_name("Safari"), "Safari");
    }
}
