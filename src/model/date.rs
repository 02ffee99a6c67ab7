//! Download timestamp with independent second and millisecond validity.

use chrono::{DateTime, Local, Utc};

/// A download timestamp.
///
/// Some sources give only second resolution (the quarantine record's
/// hex timestamp), some give sub-second resolution (the property-list
/// download date), so the two precisions carry independent flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileDate {
    /// Seconds since the UNIX epoch, UTC.
    pub seconds: i64,
    /// Milliseconds past `seconds`; meaningful only when
    /// `millis_valid`.
    pub millis: u16,
    /// Whether `seconds` holds a real value.
    pub seconds_valid: bool,
    /// Whether `millis` holds a real value.
    pub millis_valid: bool,
}

impl FileDate {
    /// Reset to the pristine, nothing-valid state.
    pub fn clear(&mut self) {
        *self = FileDate::default();
    }

    /// Set from a whole-second timestamp. Millisecond precision is
    /// marked invalid.
    pub fn set_integer(&mut self, seconds: i64) {
        self.seconds = seconds;
        self.millis = 0;
        self.seconds_valid = true;
        self.millis_valid = false;
    }

    /// Set from a timestamp with sub-second precision.
    pub fn set_fractional(&mut self, seconds: i64, millis: u16) {
        self.seconds = seconds;
        self.millis = millis.min(999);
        self.seconds_valid = true;
        self.millis_valid = true;
    }

    /// The timestamp as a UTC datetime, if one is set.
    #[must_use]
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        if !self.seconds_valid {
            return None;
        }
        let nanos = if self.millis_valid {
            u32::from(self.millis) * 1_000_000
        } else {
            0
        };
        DateTime::<Utc>::from_timestamp(self.seconds, nanos)
    }

    /// Locale-style local rendering for human output.
    #[must_use]
    pub fn format_human(&self) -> Option<String> {
        self.to_utc()
            .map(|dt| dt.with_timezone(&Local).format("%c").to_string())
    }

    /// ISO-8601 UTC rendering; milliseconds appear only when valid.
    #[must_use]
    pub fn format_iso8601(&self) -> Option<String> {
        let dt = self.to_utc()?;
        if self.millis_valid {
            Some(format!("{}.{:03}Z", dt.format("%Y-%m-%dT%H:%M:%S"), self.millis))
        } else {
            Some(format!("{}Z", dt.format("%Y-%m-%dT%H:%M:%S")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_invalid() {
        let d = FileDate::default();
        assert!(!d.seconds_valid);
        assert!(!d.millis_valid);
        assert!(d.to_utc().is_none());
        assert!(d.format_iso8601().is_none());
    }

    #[test]
    fn test_integer_has_no_millis() {
        let mut d = FileDate::default();
        d.set_integer(0x5F1A_2B3C);
        assert!(d.seconds_valid);
        assert!(!d.millis_valid);
        assert_eq!(d.format_iso8601().unwrap(), "2020-07-24T00:28:44Z");
    }

    #[test]
    fn test_fractional_keeps_millis() {
        let mut d = FileDate::default();
        d.set_fractional(1_595_555_628, 250);
        assert!(d.millis_valid);
        assert_eq!(d.format_iso8601().unwrap(), "2020-07-24T01:53:48.250Z");
    }

    #[test]
    fn test_clear_restores_pristine_state() {
        let mut d = FileDate::default();
        d.set_fractional(42, 7);
        d.clear();
        assert_eq!(d, FileDate::default());
    }
}
