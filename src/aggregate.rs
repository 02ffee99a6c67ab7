//! Attribute aggregation: per-platform probe plans and the collection
//! engine that merges every decode into one record per file.

use std::path::Path;

use tracing::debug;

use crate::attr::{self, AttrSource};
use crate::cache::Caches;
use crate::decode::{self, props, quarantine, zone};
use crate::error::ErrorCode;
use crate::model::{Attributes, Field};

/// How one attribute's payload is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// Plain-text download URL (freedesktop).
    OriginUrl,
    /// Plain-text referrer URL (freedesktop).
    ReferrerUrl,
    /// Semicolon-delimited quarantine record.
    Quarantine,
    /// Property-list array of "where from" strings.
    WhereFroms,
    /// Property-list array holding one download date.
    DownloadDate,
    /// `Key=Value` alternate-data-stream lines.
    ZoneIdentifier,
}

/// One attribute to read and the decoder it routes to.
pub struct Probe {
    /// Platform attribute name.
    pub attr: &'static str,
    /// Payload interpretation.
    pub kind: ProbeKind,
}

/// macOS probes, richest source first: the quarantine record carries
/// the application, date and event UUID, so it must win ties under
/// first-writer-wins.
pub const MACOS_PLAN: &[Probe] = &[
    Probe {
        attr: "com.apple.quarantine",
        kind: ProbeKind::Quarantine,
    },
    Probe {
        attr: "com.apple.metadata:kMDItemWhereFroms",
        kind: ProbeKind::WhereFroms,
    },
    Probe {
        attr: "com.apple.metadata:kMDItemDownloadedDate",
        kind: ProbeKind::DownloadDate,
    },
];

/// Freedesktop probes (Linux and the BSDs).
pub const FREEDESKTOP_PLAN: &[Probe] = &[
    Probe {
        attr: "user.xdg.origin.url",
        kind: ProbeKind::OriginUrl,
    },
    Probe {
        attr: "user.xdg.referrer.url",
        kind: ProbeKind::ReferrerUrl,
    },
];

/// Windows probes.
pub const WINDOWS_PLAN: &[Probe] = &[Probe {
    attr: "Zone.Identifier",
    kind: ProbeKind::ZoneIdentifier,
}];

/// The plan compiled in for this target.
#[must_use]
pub fn platform_plan() -> &'static [Probe] {
    #[cfg(target_os = "macos")]
    {
        MACOS_PLAN
    }
    #[cfg(windows)]
    {
        WINDOWS_PLAN
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        FREEDESKTOP_PLAN
    }
}

/// Read this platform's attributes of one file.
pub fn get_attributes(path: &Path, caches: &mut Caches) -> (Attributes, ErrorCode) {
    collect(&attr::PlatformSource, path, platform_plan(), caches)
}

/// Run a probe plan against one file.
///
/// Probes run in plan order, which is observable: first writer wins
/// for every field. A missing attribute is benign for that probe; a
/// missing file short-circuits the remaining probes; any other failure
/// records its message (first error wins) and moves on so one bad
/// attribute cannot suppress a good one. No probe is ever retried.
pub fn collect(
    source: &dyn AttrSource,
    path: &Path,
    plan: &[Probe],
    caches: &mut Caches,
) -> (Attributes, ErrorCode) {
    let mut attrs = Attributes::new();
    let mut combined: Option<ErrorCode> = None;

    for probe in plan {
        let ec = run_probe(source, path, probe, &mut attrs, caches);
        debug!(path = %path.display(), attr = probe.attr, outcome = ?ec, "Probed attribute");

        combined = Some(match combined {
            None => ec,
            Some(acc) => acc.combine(ec),
        });

        if ec == ErrorCode::FileAbsent {
            break;
        }
    }

    (attrs, combined.unwrap_or(ErrorCode::Ok))
}

fn run_probe(
    source: &dyn AttrSource,
    path: &Path,
    probe: &Probe,
    attrs: &mut Attributes,
    caches: &mut Caches,
) -> ErrorCode {
    match attr::read_attribute(source, path, probe.attr) {
        Ok(bytes) => decode_payload(probe.kind, &bytes, attrs, caches),
        Err(err) => {
            let ec = err.code();
            if ec != ErrorCode::AttrAbsent {
                attrs.record_error(err.message());
            }
            ec
        }
    }
}

fn decode_payload(
    kind: ProbeKind,
    bytes: &[u8],
    attrs: &mut Attributes,
    caches: &mut Caches,
) -> ErrorCode {
    match kind {
        ProbeKind::OriginUrl => {
            if let Some(value) = decode::text_value(bytes) {
                attrs.fill(Field::Url, value);
            }
            ErrorCode::Ok
        }
        ProbeKind::ReferrerUrl => {
            if let Some(value) = decode::text_value(bytes) {
                attrs.fill(Field::Referrer, value);
            }
            ErrorCode::Ok
        }
        ProbeKind::Quarantine => {
            let text = String::from_utf8_lossy(bytes);
            quarantine::parse(attrs, &text, &mut caches.events)
        }
        ProbeKind::WhereFroms => match props::decode_string_list(bytes) {
            Ok(list) => merge_where_froms(attrs, &list),
            Err(message) => {
                attrs.record_error(message);
                ErrorCode::Other
            }
        },
        ProbeKind::DownloadDate => match props::decode_single_date(bytes) {
            Ok((seconds, millis)) => {
                attrs.fill_date_millis(seconds, millis);
                ErrorCode::Ok
            }
            Err(message) => {
                attrs.record_error(message);
                ErrorCode::Other
            }
        },
        ProbeKind::ZoneIdentifier => {
            let text = String::from_utf8_lossy(bytes);
            if zone::parse(attrs, &text, &mut caches.zones) == 0 {
                ErrorCode::AttrAbsent
            } else {
                ErrorCode::Ok
            }
        }
    }
}

/// Length-dependent dispatch for the "where froms" list: one or two
/// entries describe a website download (URL, then referrer); three
/// describe a file saved from an e-mail (sender, subject, message id).
fn merge_where_froms(attrs: &mut Attributes, list: &[String]) -> ErrorCode {
    match list.len() {
        1 => {
            attrs.fill(Field::Url, list[0].as_str());
            ErrorCode::Ok
        }
        2 => {
            attrs.fill(Field::Url, list[0].as_str());
            attrs.fill(Field::Referrer, list[1].as_str());
            ErrorCode::Ok
        }
        3 => {
            attrs.fill(Field::From, list[0].as_str());
            attrs.fill(Field::Subject, list[1].as_str());
            attrs.fill(Field::MessageId, list[2].as_str());
            ErrorCode::Ok
        }
        n => {
            attrs.record_error(format!("Expected array of length 1-3, but got {n}"));
            ErrorCode::Other
        }
    }
}
