//! The merged provenance record for one inspected file.

use super::date::FileDate;

/// A string-valued slot in [`Attributes`].
///
/// Slots exist so the first-writer-wins rule is enforced in one place
/// ([`Attributes::fill`]) instead of at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The URL the file was downloaded from.
    Url,
    /// The page the download was linked from.
    Referrer,
    /// Sender of the originating e-mail.
    From,
    /// Subject of the originating e-mail.
    Subject,
    /// Message-ID of the originating e-mail.
    MessageId,
    /// The application that performed the download.
    Application,
    /// Resolved security-zone name.
    Zone,
}

impl Field {
    /// All slots, in the order they are rendered.
    pub const ALL: [Field; 7] = [
        Field::Url,
        Field::Referrer,
        Field::From,
        Field::Subject,
        Field::MessageId,
        Field::Application,
        Field::Zone,
    ];

    /// Human-output label for this slot.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Field::Url => "URL",
            Field::Referrer => "Referrer",
            Field::From => "From",
            Field::Subject => "Subject",
            Field::MessageId => "Message-ID",
            Field::Application => "Application",
            Field::Zone => "Zone",
        }
    }

    /// JSON key for this slot.
    #[must_use]
    pub fn json_key(self) -> &'static str {
        match self {
            Field::Url => "url",
            Field::Referrer => "referrer",
            Field::From => "from",
            Field::Subject => "subject",
            Field::MessageId => "message-id",
            Field::Application => "application",
            Field::Zone => "zone",
        }
    }
}

/// Everything known about where one file came from.
///
/// Created empty for each file, populated by zero or more decode
/// steps, handed to the renderer, then dropped. A record can carry
/// partial data *and* an error when only some attribute reads failed.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    url: Option<String>,
    referrer: Option<String>,
    from: Option<String>,
    subject: Option<String>,
    message_id: Option<String>,
    application: Option<String>,
    zone: Option<String>,

    /// Download timestamp, with its own first-writer guard.
    pub date: FileDate,

    error: Option<String>,
}

impl Attributes {
    /// A fresh, all-fields-absent record.
    #[must_use]
    pub fn new() -> Self {
        Attributes::default()
    }

    /// Reset every field to the all-absent initial state.
    pub fn clear(&mut self) {
        *self = Attributes::default();
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Url => &mut self.url,
            Field::Referrer => &mut self.referrer,
            Field::From => &mut self.from,
            Field::Subject => &mut self.subject,
            Field::MessageId => &mut self.message_id,
            Field::Application => &mut self.application,
            Field::Zone => &mut self.zone,
        }
    }

    /// Populate a slot, unless an earlier decode path already did.
    ///
    /// First writer wins: a richer primary source probed earlier is
    /// never overwritten by a looser secondary one.
    pub fn fill(&mut self, field: Field, value: impl Into<String>) {
        let slot = self.slot_mut(field);
        if slot.is_none() {
            *slot = Some(value.into());
        }
    }

    /// The current value of a slot.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Url => self.url.as_deref(),
            Field::Referrer => self.referrer.as_deref(),
            Field::From => self.from.as_deref(),
            Field::Subject => self.subject.as_deref(),
            Field::MessageId => self.message_id.as_deref(),
            Field::Application => self.application.as_deref(),
            Field::Zone => self.zone.as_deref(),
        }
    }

    /// Whether both URL and referrer are already populated.
    ///
    /// Gates the quarantine UUID side-lookup: no point querying the
    /// events store for values that would be discarded anyway.
    #[must_use]
    pub fn has_url_pair(&self) -> bool {
        self.url.is_some() && self.referrer.is_some()
    }

    /// Record a diagnostic message. The first error wins; later
    /// failures on the same file do not replace it.
    pub fn record_error(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }

    /// The recorded diagnostic, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Guarded variant of [`FileDate::set_integer`]: a date set by an
    /// earlier decode path is kept.
    pub fn fill_date_seconds(&mut self, seconds: i64) {
        if !self.date.seconds_valid {
            self.date.set_integer(seconds);
        }
    }

    /// Guarded variant of [`FileDate::set_fractional`].
    pub fn fill_date_millis(&mut self, seconds: i64, millis: u16) {
        if !self.date.seconds_valid {
            self.date.set_fractional(seconds, millis);
        }
    }

    /// True when no field, date, or error is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_none())
            && !self.date.seconds_valid
            && self.error.is_none()
    }
}
