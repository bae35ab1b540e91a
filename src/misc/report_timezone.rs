use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use regex::Regex;
use std::sync::LazyLock;

static OFFSET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:UTC|GMT)?([+-])(\d{1,2})(?::?(\d{2}))?$").expect("offset pattern should compile"));

/// The timezone in which activity is bucketed by hour, weekday and day.
///
/// Accepts an IANA name (`Asia/Shanghai`) or a fixed UTC offset (`+8`, `-05:30`, `UTC+2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTimezone {
    Named(Tz),
    Offset(FixedOffset),
}

impl ReportTimezone {
    #[must_use]
    pub fn utc() -> Self {
        Self::Named(Tz::UTC)
    }

    /// Converts a UTC instant into local time for this timezone.
    #[must_use]
    pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Named(tz) => instant.with_timezone(tz).fixed_offset(),
            Self::Offset(offset) => instant.with_timezone(offset),
        }
    }
}

impl Default for ReportTimezone {
    fn default() -> Self {
        Self::utc()
    }
}

impl FromStr for ReportTimezone {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(tz) = s.parse::<Tz>() {
            return Ok(Self::Named(tz));
        }

        let captures = OFFSET_PATTERN
            .captures(s)
            .ok_or_else(|| anyhow!("'{s}' is neither an IANA timezone name nor a UTC offset"))?;

        let hours: i32 = captures[2].parse().context("parsing offset hours")?;
        let minutes: i32 = captures.get(3).map_or(Ok(0), |m| m.as_str().parse()).context("parsing offset minutes")?;
        if hours > 14 || minutes > 59 {
            return Err(anyhow!("UTC offset '{s}' is out of range"));
        }

        let seconds = (hours * 3600 + minutes * 60) * if &captures[1] == "-" { -1 } else { 1 };
        let offset = FixedOffset::east_opt(seconds).ok_or_else(|| anyhow!("UTC offset '{s}' is out of range"))?;

        Ok(Self::Offset(offset))
    }
}

impl Display for ReportTimezone {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Named(tz) => write!(f, "{}", tz.name()),
            Self::Offset(offset) => write!(f, "{offset}"),
        }
    }
}
