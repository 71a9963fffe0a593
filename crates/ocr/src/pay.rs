use std::sync::OnceLock;

use jobshot_core::{Pay, PayPolicy, PayUnit};
use regex::Regex;
use rust_decimal::Decimal;

use crate::numeric::normalize_number;

/// Which cascade rule produced a pay figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayCategory {
    Hourly,
    HourlyRange,
    Annual,
    AnnualRange,
    /// Bare currency amount; unit decided by the policy threshold.
    Generic,
    /// Largest currency token anywhere in the text.
    Fallback,
}

impl PayCategory {
    fn explicit_unit(self) -> Option<PayUnit> {
        match self {
            PayCategory::Hourly | PayCategory::HourlyRange => Some(PayUnit::Hourly),
            PayCategory::Annual | PayCategory::AnnualRange => Some(PayUnit::Annual),
            PayCategory::Generic | PayCategory::Fallback => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Single,
    /// Two captured bounds, reduced by the policy's range resolution.
    Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayMatch {
    pub category: PayCategory,
    pub pay: Pay,
}

// ── Cascade table ────────────────────────────────────────────────────────────
//
// Evaluated top to bottom against lower-cased text; the first rule that yields
// a usable figure wins. Single-value rules ignore a figure that is the upper
// half of a range so the range rules below them see it whole. A `$` figure is
// only a range tail when another `$` figure leads it, so "Level 3 - $45 per
// hour" is still a plain hourly rate.

const CASCADE: &[(&str, PayCategory, Shape)] = &[
    // $51.60 + super, $45 per hour, $45/hr, $45/hour, 45.50 p.h.
    (r"\$(\d+\.?\d*)\s*\+\s*super", PayCategory::Hourly, Shape::Single),
    (r"\$(\d+\.?\d*)\s*per\s*hour", PayCategory::Hourly, Shape::Single),
    (r"\$(\d+\.?\d*)\s*/\s*hr", PayCategory::Hourly, Shape::Single),
    (r"\$(\d+\.?\d*)\s*/\s*hour", PayCategory::Hourly, Shape::Single),
    (r"\b(\d+\.?\d*)\s*p\.?h\b\.?", PayCategory::Hourly, Shape::Single),
    // $45 - $51.6 + super, $45 - $51.6 per hour, $45 to $51.6 per hour
    (r"\$(\d+\.?\d*)\s*[-–]\s*\$(\d+\.?\d*)\s*\+\s*super", PayCategory::HourlyRange, Shape::Range),
    (r"\$(\d+\.?\d*)\s*[-–]\s*\$(\d+\.?\d*)\s*per\s*hour", PayCategory::HourlyRange, Shape::Range),
    (r"\$(\d+\.?\d*)\s*to\s*\$(\d+\.?\d*)\s*per\s*hour", PayCategory::HourlyRange, Shape::Range),
    (r"\$(\d+\.?\d*)\s*[-–]\s*\$(\d+\.?\d*)\s*/\s*(?:hr|hour)", PayCategory::HourlyRange, Shape::Range),
    (r"\$?(\d+\.?\d*)\s*[-–]\s*\$?(\d+\.?\d*)\s*p\.?h\b\.?", PayCategory::HourlyRange, Shape::Range),
    // $75,000 + super, $75,000 per annum, $75,000 p.a., 75,000 per annum
    (r"\$(\d{1,3}(?:,\d{3})+|\d+)\s*\+\s*super", PayCategory::Annual, Shape::Single),
    (r"\$(\d{1,3}(?:,\d{3})+|\d+)\s*per\s*annum", PayCategory::Annual, Shape::Single),
    (r"\$(\d{1,3}(?:,\d{3})+|\d+)\s*p\.?a\b\.?", PayCategory::Annual, Shape::Single),
    (r"\b(\d{1,3}(?:,\d{3})+|\d+)\s*per\s*annum", PayCategory::Annual, Shape::Single),
    // $70,000 - $85,000 + super, ... per annum, ... p.a., $70,000 to $85,000 per annum
    (
        r"\$(\d{1,3}(?:,\d{3})+|\d+)\s*[-–]\s*\$(\d{1,3}(?:,\d{3})+|\d+)\s*\+\s*super",
        PayCategory::AnnualRange,
        Shape::Range,
    ),
    (
        r"\$(\d{1,3}(?:,\d{3})+|\d+)\s*[-–]\s*\$(\d{1,3}(?:,\d{3})+|\d+)\s*per\s*annum",
        PayCategory::AnnualRange,
        Shape::Range,
    ),
    (
        r"\$(\d{1,3}(?:,\d{3})+|\d+)\s*[-–]\s*\$(\d{1,3}(?:,\d{3})+|\d+)\s*p\.?a\b\.?",
        PayCategory::AnnualRange,
        Shape::Range,
    ),
    (
        r"\$(\d{1,3}(?:,\d{3})+|\d+)\s*to\s*\$(\d{1,3}(?:,\d{3})+|\d+)\s*per\s*annum",
        PayCategory::AnnualRange,
        Shape::Range,
    ),
    // $45 - $55, $75,000, $350
    (
        r"\$(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s*[-–]\s*\$(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)",
        PayCategory::Generic,
        Shape::Range,
    ),
    (r"\$(\d{1,3}(?:,\d{3})+(?:\.\d+)?)", PayCategory::Generic, Shape::Single),
    (r"\$(\d+\.?\d*)", PayCategory::Generic, Shape::Single),
];

struct CompiledRule {
    regex: Regex,
    category: PayCategory,
    shape: Shape,
}

fn cascade() -> &'static [CompiledRule] {
    static RULES: OnceLock<Vec<CompiledRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        CASCADE
            .iter()
            .map(|&(pat, category, shape)| CompiledRule {
                regex: Regex::new(pat).expect("invalid pay regex"),
                category,
                shape,
            })
            .collect()
    })
}

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_currency_token, r"\$(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)");
re!(re_currency_range_lead, r"\$\s*\d[\d,.]*\s*(?:-|–|to)\s*$");
re!(re_bare_range_lead, r"\d[\d,.]*\s*(?:-|–|to)\s*\$?\s*$");

// ── Extractor ────────────────────────────────────────────────────────────────

pub struct PayExtractor {
    policy: PayPolicy,
}

impl PayExtractor {
    pub fn new(policy: PayPolicy) -> Self {
        Self { policy }
    }

    pub fn extract(&self, text: &str) -> Option<Pay> {
        self.classify(text).map(|m| m.pay)
    }

    /// Run the cascade and report which rule decided the figure.
    pub fn classify(&self, text: &str) -> Option<PayMatch> {
        let text = text.to_lowercase();

        for rule in cascade() {
            let unit = rule.category.explicit_unit();
            if unit.is_none() && !self.policy.classify_unit {
                continue;
            }
            let Some(amount) = self.apply(rule, &text) else {
                continue;
            };
            let pay = match unit {
                Some(unit) => Pay { amount, unit },
                None => Pay::by_threshold(amount, self.policy.threshold),
            };
            tracing::debug!(category = ?rule.category, %pay, "pay rule matched");
            return Some(PayMatch { category: rule.category, pay });
        }

        if !self.policy.classify_unit {
            return None;
        }

        let largest = re_currency_token()
            .captures_iter(&text)
            .filter_map(|c| figure(c.get(1)?.as_str()))
            .max()?;
        let pay = Pay::by_threshold(largest, self.policy.threshold);
        tracing::debug!(%pay, "pay taken from largest currency token");
        Some(PayMatch { category: PayCategory::Fallback, pay })
    }

    fn apply(&self, rule: &CompiledRule, text: &str) -> Option<Decimal> {
        match rule.shape {
            Shape::Single => {
                let caps = rule
                    .regex
                    .captures_iter(text)
                    .find(|c| c.get(0).is_some_and(|m| !is_range_tail(text, m)))?;
                figure(caps.get(1)?.as_str())
            }
            Shape::Range => {
                let caps = rule.regex.captures(text)?;
                let low = figure(caps.get(1)?.as_str())?;
                let high = figure(caps.get(2)?.as_str())?;
                Some(self.policy.range.resolve(low, high))
            }
        }
    }
}

impl Default for PayExtractor {
    fn default() -> Self {
        Self::new(PayPolicy::default())
    }
}

fn is_range_tail(text: &str, m: regex::Match<'_>) -> bool {
    let prefix = &text[..m.start()];
    if m.as_str().starts_with('$') {
        re_currency_range_lead().is_match(prefix)
    } else {
        re_bare_range_lead().is_match(prefix)
    }
}

/// A usable pay figure: parses, and is not a `$0` placeholder.
fn figure(token: &str) -> Option<Decimal> {
    normalize_number(token).filter(|d| *d > Decimal::ZERO)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
