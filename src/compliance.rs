// src/compliance.rs
use thiserror::Error;

// --- Compliance Classification ---

// A check-in time that could not be parsed. The report aborts on the first
// malformed time; no partial file is ever produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed time-of-day value '{value}' (expected HH:MM)")]
pub struct MalformedTimeError {
    pub value: String,
}

/// Convert an `HH:MM` wall-clock time to minutes since midnight.
///
/// Times are local wall-clock values as reported by the check-in service;
/// no timezone conversion is involved.
pub fn time_to_minutes(time: &str) -> Result<u32, MalformedTimeError> {
    let malformed = || MalformedTimeError {
        value: time.to_string(),
    };

    let (hours, minutes) = time.split_once(':').ok_or_else(malformed)?;
    let hours: u32 = hours.parse().map_err(|_| malformed())?;
    let minutes: u32 = minutes.parse().map_err(|_| malformed())?;
    if hours > 23 || minutes > 59 {
        return Err(malformed());
    }

    Ok(hours * 60 + minutes)
}

// The two configurable cutoffs a day is judged against, held as
// minutes-since-midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceThresholds {
    pub first_checkin_cutoff: u32,
    pub last_checkin_cutoff: u32,
}

impl ComplianceThresholds {
    pub fn from_times(first: &str, last: &str) -> Result<Self, MalformedTimeError> {
        Ok(Self {
            first_checkin_cutoff: time_to_minutes(first)?,
            last_checkin_cutoff: time_to_minutes(last)?,
        })
    }
}

// Per-day classification result. Each flag marks a non-compliant field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// First check-in at or after the first cutoff minute.
    pub late_arrival: bool,
    /// Last check-in strictly before the last cutoff minute.
    pub early_departure: bool,
}

impl Classification {
    /// A day is compliant only when neither field is flagged.
    pub fn is_compliant(&self) -> bool {
        !(self.late_arrival || self.early_departure)
    }

    /// Whether either field is flagged. Used for whole-day calendar
    /// highlighting, which is looser than per-field table highlighting.
    pub fn is_flagged(&self) -> bool {
        self.late_arrival || self.early_departure
    }
}

/// Classify one day's first/last check-in pair against the cutoffs.
///
/// The first cutoff is an exclusive lower bound: arriving AT the cutoff
/// minute counts as late. The last cutoff is inclusive: leaving AT the
/// cutoff minute counts as compliant.
pub fn classify(
    first_checkin: &str,
    last_checkin: &str,
    thresholds: &ComplianceThresholds,
) -> Result<Classification, MalformedTimeError> {
    let first = time_to_minutes(first_checkin)?;
    let last = time_to_minutes(last_checkin)?;

    Ok(Classification {
        late_arrival: first >= thresholds.first_checkin_cutoff,
        early_departure: last < thresholds.last_checkin_cutoff,
    })
}
