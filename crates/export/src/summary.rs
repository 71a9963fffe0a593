use jobshot_core::JobRecord;
use std::collections::BTreeMap;
use std::fmt;

/// Totals logged at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub with_pay: usize,
    pub with_employment: usize,
    /// Pay unit → count; records without pay are counted under "none".
    pub pay_units: BTreeMap<String, usize>,
    /// Employment type → count; unclassified records under "none".
    pub employment_types: BTreeMap<String, usize>,
}

impl RunSummary {
    pub fn from_records(records: &[JobRecord]) -> Self {
        let mut s = RunSummary { total: records.len(), ..Default::default() };
        for r in records {
            let unit = r.pay_unit().map(|u| u.to_string());
            let kind = r.employment_type().map(|e| e.to_string());
            if unit.is_some() {
                s.with_pay += 1;
            }
            if kind.is_some() {
                s.with_employment += 1;
            }
            *s.pay_units.entry(unit.unwrap_or_else(|| "none".into())).or_default() += 1;
            *s.employment_types.entry(kind.unwrap_or_else(|| "none".into())).or_default() += 1;
        }
        s
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Listings:          {}", self.total)?;
        writeln!(f, "Pay extracted:     {}/{}", self.with_pay, self.total)?;
        writeln!(f, "Employment type:   {}/{}", self.with_employment, self.total)?;
        write!(f, "Pay units:        ")?;
        for (k, v) in &self.pay_units {
            write!(f, " {k}={v}")?;
        }
        writeln!(f)?;
        write!(f, "Employment types: ")?;
        for (k, v) in &self.employment_types {
            write!(f, " {k}={v}")?;
        }
        Ok(())
    }
}
