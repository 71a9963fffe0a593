use jobshot_core::JobRecord;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Column order of the exported sheet.
pub const COLUMNS: [&str; 10] = [
    "index",
    "page",
    "title",
    "employer",
    "location",
    "pay",
    "pay_unit",
    "full_time",
    "screenshot",
    "raw_text",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
}

/// Write `records` in order, header first. Absent fields become empty cells.
pub fn write_csv<W: Write>(writer: W, records: &[JobRecord]) -> Result<(), ExportError> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(COLUMNS)?;

    for r in records {
        wtr.write_record(row(r))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Export to a file, creating its parent directory if needed.
pub fn export_csv(path: &Path, records: &[JobRecord]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_csv(file, records)?;
    tracing::info!(path = %path.display(), rows = records.len(), "CSV written");
    Ok(())
}

fn row(r: &JobRecord) -> [String; 10] {
    [
        r.index().to_string(),
        r.page().to_string(),
        r.title().unwrap_or_default().to_string(),
        r.employer().unwrap_or_default().to_string(),
        r.location().unwrap_or_default().to_string(),
        r.pay_text().unwrap_or_default(),
        r.pay_unit().map(|u| u.to_string()).unwrap_or_default(),
        r.employment_type().map(|e| e.to_string()).unwrap_or_default(),
        r.screenshot().display().to_string(),
        r.raw_text().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobshot_core::{EmploymentType, ExtractedFields, ListingId, Pay};
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    fn record(index: u32, fields: ExtractedFields, raw: &str) -> JobRecord {
        let id = ListingId {
            index,
            page: 1,
            screenshot: PathBuf::from(format!("screenshots/job_{index:04}.png")),
        };
        JobRecord::new(id, raw, fields)
    }

    fn to_string(records: &[JobRecord]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_only_for_no_records() {
        assert_eq!(
            to_string(&[]),
            "index,page,title,employer,location,pay,pay_unit,full_time,screenshot,raw_text\n"
        );
    }

    #[test]
    fn full_row_in_column_order() {
        let fields = ExtractedFields {
            title: Some("RN - PACU".into()),
            employer: Some("St. Mary's Hospital".into()),
            location: Some("Sydney, NSW".into()),
            pay: Some(Pay::hourly(Decimal::new(516, 1))),
            employment_type: Some(EmploymentType::Casual),
        };
        let out = to_string(&[record(1, fields, "RN - PACU")]);
        let row = out.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "1,1,RN - PACU,St. Mary's Hospital,\"Sydney, NSW\",$51.6,hourly,casual,screenshots/job_0001.png,RN - PACU"
        );
    }

    #[test]
    fn missing_fields_are_empty_cells() {
        let out = to_string(&[record(7, ExtractedFields::default(), "")]);
        let row = out.lines().nth(1).unwrap();
        assert_eq!(row, "7,1,,,,,,,screenshots/job_0007.png,");
    }

    #[test]
    fn multiline_raw_text_is_quoted() {
        let fields = ExtractedFields {
            title: Some("Scrub Nurse".into()),
            ..Default::default()
        };
        let out = to_string(&[record(2, fields, "Scrub Nurse\nAcme Health")]);

        let mut rdr = ::csv::Reader::from_reader(out.as_bytes());
        let rows: Vec<::csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][9], "Scrub Nurse\nAcme Health");
        assert_eq!(&rows[0][2], "Scrub Nurse");
    }

    #[test]
    fn annual_pay_keeps_grouping() {
        let fields = ExtractedFields {
            pay: Some(Pay::annual(Decimal::from(75_000))),
            employment_type: Some(EmploymentType::FullTime),
            ..Default::default()
        };
        let out = to_string(&[record(3, fields, "")]);
        let mut rdr = ::csv::Reader::from_reader(out.as_bytes());
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(&row[5], "$75,000");
        assert_eq!(&row[6], "annual");
        assert_eq!(&row[7], "full_time");
    }

    #[test]
    fn export_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("jobs.csv");
        export_csv(&path, &[record(1, ExtractedFields::default(), "x")]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
