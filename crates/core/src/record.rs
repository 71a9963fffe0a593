use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::pay::{Pay, PayUnit};

/// Work-time commitment of a position. Contract, temporary and per-diem
/// listings are folded into `Casual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Casual,
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmploymentType::FullTime => write!(f, "full_time"),
            EmploymentType::PartTime => write!(f, "part_time"),
            EmploymentType::Casual => write!(f, "casual"),
        }
    }
}

impl std::str::FromStr for EmploymentType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_time" => Ok(EmploymentType::FullTime),
            "part_time" => Ok(EmploymentType::PartTime),
            "casual" => Ok(EmploymentType::Casual),
            other => Err(format!("Unknown employment type: '{other}'")),
        }
    }
}

/// Identifies one captured listing within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingId {
    pub index: u32,
    pub page: u32,
    pub screenshot: PathBuf,
}

/// Fields derived from the OCR text of a listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub employer: Option<String>,
    pub location: Option<String>,
    pub pay: Option<Pay>,
    pub employment_type: Option<EmploymentType>,
}

/// One structured job listing. Built once from OCR output and never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    index: u32,
    page: u32,
    title: Option<String>,
    employer: Option<String>,
    location: Option<String>,
    pay: Option<Pay>,
    employment_type: Option<EmploymentType>,
    screenshot: PathBuf,
    raw_text: String,
}

impl JobRecord {
    pub fn new(id: ListingId, raw_text: impl Into<String>, fields: ExtractedFields) -> Self {
        JobRecord {
            index: id.index,
            page: id.page,
            title: fields.title,
            employer: fields.employer,
            location: fields.location,
            pay: fields.pay,
            employment_type: fields.employment_type,
            screenshot: id.screenshot,
            raw_text: raw_text.into(),
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn employer(&self) -> Option<&str> {
        self.employer.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn pay(&self) -> Option<&Pay> {
        self.pay.as_ref()
    }

    /// Formatted figure, e.g. `$51.6` or `$75,000`.
    pub fn pay_text(&self) -> Option<String> {
        self.pay.map(|p| p.to_string())
    }

    pub fn pay_unit(&self) -> Option<PayUnit> {
        self.pay.map(|p| p.unit)
    }

    pub fn employment_type(&self) -> Option<EmploymentType> {
        self.employment_type
    }

    pub fn screenshot(&self) -> &Path {
        &self.screenshot
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

/// Serialized shape of a record: pay as its formatted text plus a separate
/// `pay_unit`, matching the exported columns.
#[derive(Serialize)]
struct RecordView<'a> {
    index: u32,
    page: u32,
    title: Option<&'a str>,
    employer: Option<&'a str>,
    location: Option<&'a str>,
    pay: Option<String>,
    pay_unit: Option<PayUnit>,
    employment_type: Option<EmploymentType>,
    screenshot: &'a Path,
    raw_text: &'a str,
}

impl Serialize for JobRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RecordView {
            index: self.index,
            page: self.page,
            title: self.title(),
            employer: self.employer(),
            location: self.location(),
            pay: self.pay_text(),
            pay_unit: self.pay_unit(),
            employment_type: self.employment_type,
            screenshot: &self.screenshot,
            raw_text: &self.raw_text,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn id() -> ListingId {
        ListingId { index: 7, page: 2, screenshot: PathBuf::from("screenshots/job_0007.png") }
    }

    #[test]
    fn employment_type_roundtrip() {
        for t in [EmploymentType::FullTime, EmploymentType::PartTime, EmploymentType::Casual] {
            assert_eq!(EmploymentType::from_str(&t.to_string()).unwrap(), t);
        }
        assert!(EmploymentType::from_str("contract").is_err());
    }

    #[test]
    fn pay_unit_follows_pay() {
        let with_pay = JobRecord::new(
            id(),
            "RN\n$45 per hour",
            ExtractedFields {
                pay: Some(Pay::hourly(Decimal::from(45))),
                ..Default::default()
            },
        );
        assert_eq!(with_pay.pay_text().as_deref(), Some("$45"));
        assert_eq!(with_pay.pay_unit(), Some(PayUnit::Hourly));

        let without = JobRecord::new(id(), "RN", ExtractedFields::default());
        assert!(without.pay_text().is_none());
        assert!(without.pay_unit().is_none());
    }

    #[test]
    fn identifiers_and_raw_text_preserved() {
        let r = JobRecord::new(id(), "  raw\n", ExtractedFields::default());
        assert_eq!(r.index(), 7);
        assert_eq!(r.page(), 2);
        assert_eq!(r.screenshot(), Path::new("screenshots/job_0007.png"));
        assert_eq!(r.raw_text(), "  raw\n");
    }

    #[test]
    fn serializes_with_snake_case_enums() {
        let r = JobRecord::new(
            id(),
            "",
            ExtractedFields {
                employment_type: Some(EmploymentType::FullTime),
                pay: Some(Pay::annual(Decimal::from(75000))),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["employment_type"], "full_time");
        assert_eq!(json["pay"], "$75,000");
        assert_eq!(json["pay_unit"], "annual");
        assert!(json["title"].is_null());
    }

    #[test]
    fn serialized_pay_is_formatted_text() {
        let r = JobRecord::new(
            id(),
            "RN",
            ExtractedFields {
                pay: Some(Pay::hourly(Decimal::from_str("51.60").unwrap())),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["pay"], "$51.6");
        assert_eq!(json["pay_unit"], "hourly");
        assert_eq!(json["screenshot"], "screenshots/job_0007.png");

        let none = serde_json::to_value(JobRecord::new(id(), "RN", ExtractedFields::default())).unwrap();
        assert!(none["pay"].is_null());
        assert!(none["pay_unit"].is_null());
    }
}
