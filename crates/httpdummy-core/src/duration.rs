//! Human-readable signed durations (`100ms`, `1m30s`, `-2.5h`).
//!
//! `/slow/:duration` and `/post/:duration` take their pacing from a path
//! segment in this grammar. Values are kept as signed nanoseconds so that
//! zero and negative inputs parse successfully and simply mean "no wait".

use std::fmt;
use std::ops::Div;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

/// Largest magnitude a negative interval may carry (`i64::MIN` in nanos).
const NEG_LIMIT: u64 = 1 << 63;

/// Upper bound on the gap between keep-alive chunks of a slow response.
pub const MAX_PACING: Interval = Interval::from_secs(10);

/// Reasons a duration string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
}

/// Signed span of time with nanosecond resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval(i64);

impl Interval {
    pub const ZERO: Interval = Interval(0);

    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(SECOND as i64))
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Convert to a sleepable duration; zero and negative intervals map to zero.
    pub fn to_std(self) -> Duration {
        if self.0 <= 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.0 as u64)
        }
    }

    /// Parse `[+-]<decimal><unit>...`, e.g. `300ms`, `-1.5h`, `2h45m`.
    ///
    /// Valid units are `ns`, `us` (or `µs`/`μs`), `ms`, `s`, `m`, `h`. A lone
    /// `0` needs no unit.
    pub fn parse(input: &str) -> Result<Self, DurationError> {
        let invalid = || DurationError::Invalid(input.to_string());

        let mut s = input;
        let mut neg = false;
        if let Some(rest) = s.strip_prefix('-') {
            neg = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('+') {
            s = rest;
        }

        if s == "0" {
            return Ok(Interval::ZERO);
        }
        if s.is_empty() {
            return Err(invalid());
        }

        let mut total: u64 = 0;
        while !s.is_empty() {
            let first = s.as_bytes()[0];
            if !(first == b'.' || first.is_ascii_digit()) {
                return Err(invalid());
            }

            let int_len = leading_digits(s);
            let (int_part, rest) = s.split_at(int_len);
            let whole = if int_part.is_empty() {
                0
            } else {
                int_part.parse::<u64>().map_err(|_| invalid())?
            };
            s = rest;

            let mut frac: u64 = 0;
            let mut scale: f64 = 1.0;
            let mut frac_len = 0;
            if let Some(rest) = s.strip_prefix('.') {
                frac_len = leading_digits(rest);
                let (frac_part, rest) = rest.split_at(frac_len);
                (frac, scale) = leading_fraction(frac_part);
                s = rest;
            }
            if int_len == 0 && frac_len == 0 {
                // "." or ".s"
                return Err(invalid());
            }

            let unit_len = s
                .find(|c: char| c == '.' || c.is_ascii_digit())
                .unwrap_or(s.len());
            if unit_len == 0 {
                return Err(DurationError::MissingUnit(input.to_string()));
            }
            let (unit_str, rest) = s.split_at(unit_len);
            s = rest;
            let unit = unit_nanos(unit_str).ok_or_else(|| DurationError::UnknownUnit {
                unit: unit_str.to_string(),
                input: input.to_string(),
            })?;

            let mut v = whole.checked_mul(unit).ok_or_else(invalid)?;
            if frac > 0 {
                let extra = (frac as f64 * (unit as f64 / scale)) as u64;
                v = v.checked_add(extra).ok_or_else(invalid)?;
            }
            total = total.checked_add(v).ok_or_else(invalid)?;
            if total > NEG_LIMIT {
                return Err(invalid());
            }
        }

        if neg {
            return Ok(Interval((total as i64).wrapping_neg()));
        }
        if total > i64::MAX as u64 {
            return Err(invalid());
        }
        Ok(Interval(total as i64))
    }
}

impl FromStr for Interval {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::parse(s)
    }
}

impl Div<i64> for Interval {
    type Output = Interval;

    fn div(self, rhs: i64) -> Interval {
        Interval(self.0 / rhs)
    }
}

impl fmt::Display for Interval {
    /// `0s`, `750µs`, `1.5ms`, `2.5s`, `1m30s`, `1h0m0s`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = self.0.unsigned_abs();
        if u == 0 {
            return f.write_str("0s");
        }
        if self.0 < 0 {
            f.write_str("-")?;
        }

        if u < SECOND {
            let (prec, unit) = if u < MICROSECOND {
                (0, "ns")
            } else if u < MILLISECOND {
                (3, "µs")
            } else {
                (6, "ms")
            };
            let (whole, frac) = split_frac(u, prec);
            return write!(f, "{whole}{frac}{unit}");
        }

        let (secs, frac) = split_frac(u, 9);
        let mins = secs / 60;
        if mins > 0 {
            let hours = mins / 60;
            if hours > 0 {
                write!(f, "{hours}h")?;
            }
            write!(f, "{}m", mins % 60)?;
        }
        write!(f, "{}{frac}s", secs % 60)
    }
}

/// Gap between keep-alive chunks for a slow response of total length `total`.
///
/// At most [`MAX_PACING`]; shorter totals (below `100 * MAX_PACING`) are split
/// into ten equal waits so the client sees at least ten chunks.
pub fn pacing_interval(total: Interval) -> Interval {
    if total < Interval(MAX_PACING.0.saturating_mul(100)) {
        total / 10
    } else {
        MAX_PACING
    }
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Accumulate fraction digits until the value would overflow; remaining
/// digits are ignored. Returns the value and its decimal scale.
fn leading_fraction(digits: &str) -> (u64, f64) {
    let mut x: u64 = 0;
    let mut scale = 1.0;
    for b in digits.bytes() {
        if x > (NEG_LIMIT - 1) / 10 {
            break;
        }
        let y = x * 10 + u64::from(b - b'0');
        if y > NEG_LIMIT {
            break;
        }
        x = y;
        scale *= 10.0;
    }
    (x, scale)
}

fn unit_nanos(unit: &str) -> Option<u64> {
    let n = match unit {
        "ns" => NANOSECOND,
        "us" | "\u{00b5}s" | "\u{03bc}s" => MICROSECOND,
        "ms" => MILLISECOND,
        "s" => SECOND,
        "m" => MINUTE,
        "h" => HOUR,
        _ => return None,
    };
    Some(n)
}

/// Split `v` into `v / 10^prec` and a `.ddd` suffix with trailing zeros
/// trimmed (empty when the fractional part is zero).
fn split_frac(v: u64, prec: u32) -> (u64, String) {
    if prec == 0 {
        return (v, String::new());
    }
    let base = 10u64.pow(prec);
    let digits = v % base;
    if digits == 0 {
        return (v / base, String::new());
    }
    let mut frac = format!(".{:0width$}", digits, width = prec as usize);
    while frac.ends_with('0') {
        frac.pop();
    }
    (v / base, frac)
}
