//! `Zone.Identifier` key/value line decoder.
//!
//! The alternate data stream holds `Key=Value` lines. Three keys are
//! recognized; everything else (including the `[ZoneTransfer]` section
//! header) is ignored. The zone id is resolved to a display name
//! through the zone cache before it is stored.

use crate::cache::ZoneCache;
use crate::model::{Attributes, Field};
use crate::split;

/// Decode a `Zone.Identifier` blob into `attrs`.
///
/// Lines are processed in textual order; the first `=` on each line
/// separates key from value. Returns the number of recognized
/// key/value pairs — the caller maps zero to the attribute-absent
/// outcome.
pub fn parse(attrs: &mut Attributes, text: &str, zones: &mut ZoneCache) -> usize {
    let mut count = 0;
    for line in split::split_tokens(text, &['\r', '\n']) {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key {
            "ReferrerUrl" => {
                attrs.fill(Field::Referrer, value);
                count += 1;
            }
            "HostUrl" => {
                attrs.fill(Field::Url, value);
                count += 1;
            }
            "ZoneId" => {
                let name = zones.resolve(value);
                attrs.fill(Field::Zone, name);
                count += 1;
            }
            _ => {}
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DisplayNameSource;

    struct Fixed;

    impl DisplayNameSource for Fixed {
        fn display_name(&self, zone: &str) -> Option<String> {
            (zone == "3").then(|| "Internet".to_string())
        }
    }

    fn cache() -> ZoneCache {
        ZoneCache::with_source(Box::new(Fixed))
    }

    #[test]
    fn test_recognized_keys_populate_fields() {
        let mut attrs = Attributes::new();
        let mut zones = cache();
        let n = parse(
            &mut attrs,
            "[ZoneTransfer]\r\nZoneId=3\r\nReferrerUrl=http://r/\r\nHostUrl=http://h/\r\n",
            &mut zones,
        );
        assert_eq!(n, 3);
        assert_eq!(attrs.get(Field::Zone), Some("Internet"));
        assert_eq!(attrs.get(Field::Referrer), Some("http://r/"));
        assert_eq!(attrs.get(Field::Url), Some("http://h/"));
    }

    #[test]
    fn test_unrecognized_keys_are_ignored() {
        let mut attrs = Attributes::new();
        let mut zones = cache();
        let n = parse(
            &mut attrs,
            "ReferrerUrl=http://a\nZoneId=3\nJunk=ignored\n",
            &mut zones,
        );
        assert_eq!(n, 2);
        assert_eq!(attrs.get(Field::Referrer), Some("http://a"));
        assert_eq!(attrs.get(Field::Zone), Some("Internet"));
        assert_eq!(attrs.get(Field::Url), None);
    }

    #[test]
    fn test_unknown_zone_falls_back_to_the_id() {
        let mut attrs = Attributes::new();
        let mut zones = cache();
        parse(&mut attrs, "ZoneId=9\n", &mut zones);
        assert_eq!(attrs.get(Field::Zone), Some("9"));
    }

    #[test]
    fn test_no_recognized_keys() {
        let mut attrs = Attributes::new();
        let mut zones = cache();
        assert_eq!(parse(&mut attrs, "[ZoneTransfer]\r\nFoo=bar\r\n", &mut zones), 0);
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_value_may_contain_equals() {
        let mut attrs = Attributes::new();
        let mut zones = cache();
        parse(&mut attrs, "HostUrl=http://h/?a=b&c=d\n", &mut zones);
        assert_eq!(attrs.get(Field::Url), Some("http://h/?a=b&c=d"));
    }
}
