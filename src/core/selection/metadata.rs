//! Metadata carried in sequence headers
//!
//! The grouping engine only sees a resolved date and state per sequence.
//! How those are pulled out of a header is up to a `MetadataExtractor`.
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISO_DATE: Regex =
        Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("ISO date pattern is valid");
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceMetadata {
    pub date: Option<NaiveDate>,
    pub state: Option<String>,
}

pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, header: &str) -> SequenceMetadata;
}

/// First `YYYY-MM-DD` substring of `s` that names a real calendar day.
pub fn parse_out_date(s: &str) -> Option<NaiveDate> {
    ISO_DATE.captures_iter(s).find_map(|caps| {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// Headers of the form `name|state|date`.
///
/// The date is searched for anywhere in the header; the state is read from a
/// fixed pipe-delimited field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeHeaderExtractor {
    state_field: Option<usize>,
}

impl Default for PipeHeaderExtractor {
    fn default() -> Self {
        Self {
            state_field: Some(1),
        }
    }
}

impl PipeHeaderExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-based field holding the state; `None` disables state extraction.
    pub fn with_state_field(mut self, field: Option<usize>) -> Self {
        self.state_field = field;
        self
    }
}

impl MetadataExtractor for PipeHeaderExtractor {
    fn extract(&self, header: &str) -> SequenceMetadata {
        let state = self.state_field.and_then(|field| {
            header
                .split('|')
                .nth(field)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        });

        SequenceMetadata {
            date: parse_out_date(header),
            state,
        }
    }
}
