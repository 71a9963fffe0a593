use std::sync::OnceLock;

use jobshot_core::EmploymentType;
use regex::Regex;

// Checked in order; the first hit wins, so "full-time" outranks "casual" when
// a listing mentions both.
const RULES: &[(&str, EmploymentType)] = &[
    (r"\bfull[-\s]?time\b", EmploymentType::FullTime),
    (r"\bpart[-\s]?time\b", EmploymentType::PartTime),
    (r"\bcasual\b", EmploymentType::Casual),
    (r"\bcontract\b", EmploymentType::Casual),
    (r"\btemporary\b", EmploymentType::Casual),
    (r"\b(?:per\s+diem|prn)\b", EmploymentType::Casual),
];

fn rules() -> &'static [(Regex, EmploymentType)] {
    static R: OnceLock<Vec<(Regex, EmploymentType)>> = OnceLock::new();
    R.get_or_init(|| {
        RULES
            .iter()
            .map(|&(pat, kind)| (Regex::new(pat).expect("invalid regex"), kind))
            .collect()
    })
}

/// Map listing text to one of the three employment types.
pub fn classify_employment(text: &str) -> Option<EmploymentType> {
    let text = text.to_lowercase();
    rules()
        .iter()
        .find(|(re, _)| re.is_match(&text))
        .map(|&(_, kind)| kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_time_spellings() {
        assert_eq!(classify_employment("Full-Time"), Some(EmploymentType::FullTime));
        assert_eq!(classify_employment("full time"), Some(EmploymentType::FullTime));
        assert_eq!(classify_employment("FULLTIME"), Some(EmploymentType::FullTime));
    }

    #[test]
    fn part_time_spellings() {
        assert_eq!(classify_employment("Part-time"), Some(EmploymentType::PartTime));
        assert_eq!(classify_employment("Part Time role"), Some(EmploymentType::PartTime));
    }

    #[test]
    fn casual_family_folds_to_casual() {
        for text in ["Casual", "Contract/Temp", "Temporary cover", "Per Diem", "PRN shifts"] {
            assert_eq!(classify_employment(text), Some(EmploymentType::Casual), "{text}");
        }
    }

    #[test]
    fn full_time_outranks_casual() {
        let text = "RN - PACU\nFull-Time\nCasual pool also available";
        assert_eq!(classify_employment(text), Some(EmploymentType::FullTime));
    }

    #[test]
    fn part_time_outranks_contract() {
        assert_eq!(
            classify_employment("Contract\nPart time"),
            Some(EmploymentType::PartTime)
        );
    }

    #[test]
    fn whole_words_only() {
        assert_eq!(classify_employment("Contractor liaison\nImprint Health"), None);
        assert_eq!(classify_employment("Sprint planning"), None);
    }

    #[test]
    fn no_match_is_none() {
        assert_eq!(classify_employment(""), None);
        assert_eq!(classify_employment("Registered Nurse\nSydney, NSW"), None);
    }
}
