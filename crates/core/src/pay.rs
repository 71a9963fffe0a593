use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayUnit {
    Hourly,
    Annual,
}

impl fmt::Display for PayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayUnit::Hourly => write!(f, "hourly"),
            PayUnit::Annual => write!(f, "annual"),
        }
    }
}

impl std::str::FromStr for PayUnit {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(PayUnit::Hourly),
            "annual" => Ok(PayUnit::Annual),
            other => Err(format!("Unknown pay unit: '{other}'")),
        }
    }
}

/// A single resolved pay figure. The unit always travels with the amount,
/// so a record can never carry one without the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pay {
    pub amount: Decimal,
    pub unit: PayUnit,
}

impl Pay {
    pub fn hourly(amount: Decimal) -> Self {
        Pay { amount, unit: PayUnit::Hourly }
    }

    pub fn annual(amount: Decimal) -> Self {
        Pay { amount, unit: PayUnit::Annual }
    }

    /// Classify a bare figure: above `threshold` is a salary, anything else a rate.
    pub fn by_threshold(amount: Decimal, threshold: Decimal) -> Self {
        if amount > threshold {
            Pay::annual(amount)
        } else {
            Pay::hourly(amount)
        }
    }
}

/// Annual figures render as whole dollars with thousands separators
/// (`$75,000`); hourly figures keep their precision minus trailing zeros
/// (`$51.6`).
impl fmt::Display for Pay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            PayUnit::Annual => write!(f, "${}", group_thousands(self.amount)),
            PayUnit::Hourly => write!(f, "${}", self.amount.normalize()),
        }
    }
}

fn group_thousands(amount: Decimal) -> String {
    // round_dp uses banker's rounding.
    let digits = amount.round_dp(0).trunc().abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
