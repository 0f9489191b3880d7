//! Actual/365 time-to-expiry normalization.
//!
//! Downstream formulas divide by √T and T, so a year fraction is never zero
//! or negative: anything at or past expiry is clamped to a positive floor
//! (one minute by default).

use super::error::{PricingError, PricingResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Days per year under the Actual/365 Fixed convention.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// One minute expressed in Actual/365 years.
pub const MINUTE_FLOOR: f64 = 1.0 / (365.0 * 24.0 * 60.0);

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Converts expiry and reference instants into year fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBasis {
    floor: f64,
}

impl Default for TimeBasis {
    fn default() -> Self {
        Self {
            floor: MINUTE_FLOOR,
        }
    }
}

impl TimeBasis {
    /// Creates a time basis with the one-minute floor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a time basis with a custom positive floor (in years).
    pub fn with_floor(floor: f64) -> PricingResult<Self> {
        if floor.is_finite() && floor > 0.0 {
            Ok(Self { floor })
        } else {
            Err(PricingError::invalid_config(format!(
                "time floor must be positive and finite, got {floor}"
            )))
        }
    }

    /// The smallest year fraction this basis will return.
    #[must_use]
    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Year fraction between `reference` and `expiry`, Actual/365.
    ///
    /// Sub-day precision is kept (an expiry six hours away is 0.25/365).
    /// Results at or below the floor are clamped to it.
    #[must_use]
    pub fn year_fraction<Tz: TimeZone>(&self, expiry: &DateTime<Tz>, reference: &DateTime<Tz>) -> f64 {
        let elapsed = expiry.clone().signed_duration_since(reference.clone());
        let days = elapsed.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY;
        self.clamp(days / DAYS_PER_YEAR)
    }

    /// Year fraction between two calendar dates (whole days), Actual/365.
    #[must_use]
    pub fn year_fraction_dates(&self, expiry: NaiveDate, reference: NaiveDate) -> f64 {
        let days = (expiry - reference).num_days() as f64;
        self.clamp(days / DAYS_PER_YEAR)
    }

    /// Returns true if `years` is at (or below) the floor, i.e. the
    /// contract is on or past its expiry instant.
    #[must_use]
    pub fn is_at_floor(&self, years: f64) -> bool {
        years <= self.floor
    }

    fn clamp(&self, years: f64) -> f64 {
        if years.is_nan() || years <= self.floor {
            self.floor
        } else {
            years
        }
    }
}

/// Exchange session close used to turn an expiry date into an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirySession {
    /// Local time of the session close.
    pub close: NaiveTime,
    /// Exchange offset from UTC in seconds.
    pub utc_offset_seconds: i32,
}

impl Default for ExpirySession {
    /// 15:30 at UTC+05:30.
    fn default() -> Self {
        Self {
            close: NaiveTime::from_hms_opt(15, 30, 0).unwrap_or(NaiveTime::MIN),
            utc_offset_seconds: 5 * 3600 + 30 * 60,
        }
    }
}

impl ExpirySession {
    /// The UTC instant at which a contract expiring on `date` stops trading.
    pub fn expiry_instant(&self, date: NaiveDate) -> PricingResult<DateTime<Utc>> {
        let offset = FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
            PricingError::invalid_config(format!(
                "utc offset {}s is out of range",
                self.utc_offset_seconds
            ))
        })?;
        offset
            .from_local_datetime(&date.and_time(self.close))
            .single()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| {
                PricingError::invalid_input(format!("no unique close instant on {date}"))
            })
    }
}
