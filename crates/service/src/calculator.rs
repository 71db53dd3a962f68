//! Calculator record and accrual arithmetic.
//!
//! The record is fixed at deployment time (from `[calculator]` config). The
//! accrued amount is `elapsed_seconds * annual_salary / SECONDS_PER_YEAR`,
//! using a 365-day year. It is not clamped, so instants before the start
//! date yield a negative figure.

use chrono::{DateTime, SecondsFormat, Utc};
use common::types::{AccrualSnapshot, CalculatorData};
use configs::CalculatorConfig;

use crate::errors::ServiceError;

pub const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 60.0 * 60.0;
pub const HOURS_PER_YEAR: f64 = 365.0 * 24.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Annual salary broken down into smaller periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryRate {
    pub per_second: f64,
    pub per_hour: f64,
    pub per_day: f64,
}

impl SalaryRate {
    pub fn from_annual(annual: f64) -> Self {
        Self {
            per_second: annual / SECONDS_PER_YEAR,
            per_hour: annual / HOURS_PER_YEAR,
            per_day: annual / DAYS_PER_YEAR,
        }
    }

    /// Amount accrued between `start` and `now`.
    pub fn accrued_at(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        elapsed_seconds(start, now) * self.per_second
    }
}

/// Fractional seconds from `start` to `now` at millisecond resolution.
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - start).num_milliseconds() as f64 / 1000.0
}

/// Render `amount` as US dollars with thousands separators and exactly
/// `decimals` fractional digits, e.g. `-$1,234.50`.
pub fn format_usd(amount: f64, decimals: u8) -> String {
    let fixed = format!("{:.*}", decimals as usize, amount.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // avoid "-$0.00" for tiny negatives that round to zero
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if amount.is_sign_negative() && !is_zero { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}

/// Serves the calculator record and derived accrual figures.
#[derive(Debug, Clone)]
pub struct CalculatorService {
    data: CalculatorData,
    start: DateTime<Utc>,
    rate: SalaryRate,
    display_decimals: u8,
}

impl CalculatorService {
    pub fn from_config(cfg: &CalculatorConfig) -> Result<Self, ServiceError> {
        cfg.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
        let start = cfg.start_instant().map_err(|e| ServiceError::Validation(e.to_string()))?;
        Ok(Self {
            data: CalculatorData {
                annual_salary: cfg.annual_salary,
                start_date: cfg.start_date.clone(),
                person_name: cfg.person_name.clone(),
                image_url: cfg.image_url.clone(),
                context_text: cfg.context_text.clone(),
            },
            start,
            rate: SalaryRate::from_annual(cfg.annual_salary),
            display_decimals: cfg.display_decimals,
        })
    }

    /// The configured record, verbatim.
    pub fn data(&self) -> &CalculatorData {
        &self.data
    }

    pub fn rate(&self) -> SalaryRate {
        self.rate
    }

    pub fn snapshot_at(&self, now: DateTime<Utc>) -> AccrualSnapshot {
        let accrued = self.rate.accrued_at(self.start, now);
        AccrualSnapshot {
            as_of: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            elapsed_seconds: elapsed_seconds(self.start, now),
            per_second: self.rate.per_second,
            per_hour: self.rate.per_hour,
            per_day: self.rate.per_day,
            accrued,
            accrued_display: format_usd(accrued, self.display_decimals),
        }
    }

    pub fn snapshot(&self) -> AccrualSnapshot {
        self.snapshot_at(Utc::now())
    }
}
