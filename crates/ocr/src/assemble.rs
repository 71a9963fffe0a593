use std::sync::OnceLock;

use jobshot_core::{ExtractedFields, JobRecord, ListingId, PayPolicy};
use regex::Regex;

use crate::employment::classify_employment;
use crate::pay::PayExtractor;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_employer,
    r"(?i)\b(?:hospital|health|clinic|inc|llc|company|systems|medical|care|university)\b");
re!(re_remote,
    r"(?i)\b(?:remote|work from home)\b");
re!(re_city_state,
    r"([A-Za-z .]+,\s*[A-Z]{2,3}\b)");

/// Lines after the title that may hold the employer name.
const EMPLOYER_WINDOW: usize = 3;
/// Comma-bearing lines at least this long are prose, not an address.
const MAX_LOCATION_LEN: usize = 50;

// ── Public assembly API ──────────────────────────────────────────────────────

/// Turns the OCR text of one listing into a [`JobRecord`].
pub struct RecordAssembler {
    pay: PayExtractor,
}

impl RecordAssembler {
    pub fn new(policy: PayPolicy) -> Self {
        Self { pay: PayExtractor::new(policy) }
    }

    pub fn assemble(&self, raw_text: &str, id: ListingId) -> JobRecord {
        JobRecord::new(id, raw_text, self.extract_fields(raw_text))
    }

    pub fn extract_fields(&self, raw_text: &str) -> ExtractedFields {
        let lines: Vec<&str> = raw_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        if lines.is_empty() {
            return ExtractedFields::default();
        }

        ExtractedFields {
            title: lines.first().map(|l| l.to_string()),
            employer: extract_employer(&lines),
            location: extract_location(&lines),
            pay: self.pay.extract(raw_text),
            employment_type: classify_employment(raw_text),
        }
    }
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new(PayPolicy::default())
    }
}

// ── Employer ─────────────────────────────────────────────────────────────────

fn extract_employer(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .skip(1)
        .take(EMPLOYER_WINDOW)
        .find(|l| re_employer().is_match(l))
        .or_else(|| lines.get(1))
        .map(|l| l.to_string())
}

// ── Location ─────────────────────────────────────────────────────────────────

fn extract_location(lines: &[&str]) -> Option<String> {
    if let Some(l) = lines.iter().find(|l| re_remote().is_match(l)) {
        return Some(l.to_string());
    }

    let city_state = lines.iter().find_map(|l| {
        let m = re_city_state().captures(l)?.get(1)?;
        Some(m.as_str().trim().to_string())
    });
    if city_state.is_some() {
        return city_state;
    }

    lines
        .iter()
        .rev()
        .find(|l| l.contains(',') && l.chars().count() < MAX_LOCATION_LEN)
        .map(|l| l.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
