//! Shared stat plumbing: the value type carried by undo records, the
//! 3-decimal formatter used by every derived-average path, and the
//! deterministic name hash behind league/team/player identifiers.

use std::fmt;

/// A snapshotted stat value.
///
/// Counters are integers, derived averages are floats, and a handful of
/// fields (manager names) are text. Undo records store one of these as the
/// prior value to restore.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl StatValue {
    /// Integer view; floats truncate, text yields 0.
    pub fn as_int(&self) -> i64 {
        match self {
            Self::Int(v) => *v,
            Self::Float(v) => *v as i64,
            Self::Text(_) => 0,
        }
    }

    /// Float view; text yields 0.0.
    pub fn as_float(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::Float(v) => *v,
            Self::Text(_) => 0.0,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Format a derived average the way every summary path does: three decimals.
pub fn format_decimal(num: f64) -> String {
    format!("{:.3}", num)
}

/// Render an aggregate total in the immediate style used by the league-wide
/// ERA reader: whole-number float totals keep a trailing `.0`, fractional
/// totals print as-is. This intentionally differs from [`format_decimal`];
/// the two paths coexist at the aggregate call sites.
pub fn aggregate_float_text(total: f64) -> String {
    if total.fract() == 0.0 {
        format!("{:.1}", total)
    } else {
        format!("{}", total)
    }
}

/// Round to the 3-decimal precision that derived stats are stored at.
/// Matches the legacy format-then-store behavior, so cached averages compare
/// equal to their displayed text.
pub fn round3(num: f64) -> f64 {
    format_decimal(num).parse().unwrap_or(0.0)
}

/// Deterministic integer identifier derived from a display name.
///
/// Each character's code point is weighted by the index of that character's
/// first occurrence in the name, with index 0 substituted by 2, then summed.
/// Identical names always hash identically, so duplicate-named entities
/// share an id.
pub fn name_hash(name: &str) -> i64 {
    let chars: Vec<char> = name.chars().collect();
    chars
        .iter()
        .map(|&c| {
            let first = chars.iter().position(|&x| x == c).unwrap_or(0);
            let weight = if first == 0 { 2 } else { first as i64 };
            (c as i64) * weight
        })
        .sum()
}
