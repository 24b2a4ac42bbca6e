//! Validated sample size
//!
//! Every path that can change how many items a batch holds goes through
//! [`SampleCount`], so a NaN, zero, negative, fractional or oversized count
//! can never reach the store or its persisted record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Why a sample count was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CountError {
    #[error("count is empty")]
    Empty,
    #[error("count is not a number")]
    NotANumber,
    #[error("count must be at least 1")]
    NotPositive,
    #[error("count must be a whole number")]
    Fractional,
    #[error("count must not exceed {}", SampleCount::MAX)]
    TooLarge,
}

/// Number of independent draws per batch; always in `1..=SampleCount::MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SampleCount(NonZeroU32);

impl SampleCount {
    pub const ONE: SampleCount = SampleCount(NonZeroU32::MIN);

    /// Largest batch a single draw may ask for
    pub const MAX: u32 = 10_000;

    pub fn new(n: u32) -> Option<Self> {
        if n > Self::MAX {
            return None;
        }
        NonZeroU32::new(n).map(SampleCount)
    }

    /// Validate an already-numeric input, such as a number field's value
    pub fn from_f64(n: f64) -> Result<Self, CountError> {
        if n.is_nan() {
            return Err(CountError::NotANumber);
        }
        if n <= 0.0 {
            return Err(CountError::NotPositive);
        }
        if n.is_infinite() || n > f64::from(Self::MAX) {
            return Err(CountError::TooLarge);
        }
        if n.fract() != 0.0 {
            return Err(CountError::Fractional);
        }
        SampleCount::new(n as u32).ok_or(CountError::NotPositive)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn as_usize(self) -> usize {
        self.0.get() as usize
    }
}

impl Default for SampleCount {
    fn default() -> Self {
        SampleCount::ONE
    }
}

impl fmt::Display for SampleCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for SampleCount {
    type Error = CountError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        if n > SampleCount::MAX {
            return Err(CountError::TooLarge);
        }
        SampleCount::new(n).ok_or(CountError::NotPositive)
    }
}

impl From<SampleCount> for u32 {
    fn from(count: SampleCount) -> Self {
        count.get()
    }
}

impl FromStr for SampleCount {
    type Err = CountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_sample_count(s)
    }
}

/// Parse raw user text (a form field or a query parameter) into a count
///
/// Surrounding whitespace is ignored and any decimal notation is accepted
/// (`"3"`, `"3.0"`, `"1e1"`), but the value must be a whole number in
/// `1..=SampleCount::MAX`.
///
/// # Example
/// ```
/// use list_selector::count::{parse_sample_count, CountError};
///
/// assert_eq!(parse_sample_count(" 3 ").unwrap().get(), 3);
/// assert_eq!(parse_sample_count("0"), Err(CountError::NotPositive));
/// assert_eq!(parse_sample_count("abc"), Err(CountError::NotANumber));
/// ```
pub fn parse_sample_count(raw: &str) -> Result<SampleCount, CountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CountError::Empty);
    }

    let n: f64 = trimmed.parse().map_err(|_| CountError::NotANumber)?;
    SampleCount::from_f64(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_integers() {
        assert_eq!(parse_sample_count("1").unwrap(), SampleCount::ONE);
        assert_eq!(parse_sample_count("42").unwrap().get(), 42);
        assert_eq!(parse_sample_count("\t7\n").unwrap().get(), 7);
    }

    #[test]
    fn test_parse_numeric_notations() {
        assert_eq!(parse_sample_count("3.0").unwrap().get(), 3);
        assert_eq!(parse_sample_count("1e1").unwrap().get(), 10);
        assert_eq!(parse_sample_count("+5").unwrap().get(), 5);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(parse_sample_count(""), Err(CountError::Empty));
        assert_eq!(parse_sample_count("   "), Err(CountError::Empty));
        assert_eq!(parse_sample_count("two"), Err(CountError::NotANumber));
        assert_eq!(parse_sample_count("NaN"), Err(CountError::NotANumber));
        assert_eq!(parse_sample_count("0"), Err(CountError::NotPositive));
        assert_eq!(parse_sample_count("-2"), Err(CountError::NotPositive));
        assert_eq!(parse_sample_count("2.5"), Err(CountError::Fractional));
        assert_eq!(parse_sample_count("inf"), Err(CountError::TooLarge));
        assert_eq!(parse_sample_count("5000000000"), Err(CountError::TooLarge));
    }

    #[test]
    fn test_upper_bound() {
        assert_eq!(parse_sample_count("10000").unwrap().get(), SampleCount::MAX);
        assert_eq!(parse_sample_count("10001"), Err(CountError::TooLarge));
        assert_eq!(parse_sample_count("4294967295"), Err(CountError::TooLarge));
        assert_eq!(SampleCount::from_f64(1e5), Err(CountError::TooLarge));
        assert_eq!(SampleCount::new(SampleCount::MAX + 1), None);
        assert_eq!(SampleCount::try_from(u32::MAX), Err(CountError::TooLarge));
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(SampleCount::from_f64(f64::NAN), Err(CountError::NotANumber));
        assert_eq!(SampleCount::from_f64(-0.0), Err(CountError::NotPositive));
        assert_eq!(SampleCount::from_f64(0.5), Err(CountError::Fractional));
        assert_eq!(SampleCount::from_f64(4.0).unwrap().get(), 4);
    }

    #[test]
    fn test_serde_rejects_zero() {
        let count: SampleCount = serde_json::from_str("3").unwrap();
        assert_eq!(count.get(), 3);
        assert!(serde_json::from_str::<SampleCount>("0").is_err());
        assert!(serde_json::from_str::<SampleCount>("-1").is_err());
        assert!(serde_json::from_str::<SampleCount>("4294967295").is_err());
        assert_eq!(serde_json::to_string(&count).unwrap(), "3");
    }
}
