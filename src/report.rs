// src/report.rs
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;
use thiserror::Error;

use crate::compliance::{classify, ComplianceThresholds, MalformedTimeError};
use crate::vnface_client::AttendanceRecord;

// --- Report Grid Structures ---

// Cell background. The flag red marks a non-compliant field or day, the
// header gray is only used on the calendar's weekday row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Neutral,
    Flag,
    Header,
}

impl Fill {
    pub fn rgb(self) -> u32 {
        match self {
            Fill::Neutral => 0xFFFFFF,
            Fill::Flag => 0xFF2C2C,
            Fill::Header => 0xCCCCCC,
        }
    }
}

// Presentation attributes of one cell. Every cell carries a uniform thin
// black border; calendar cells additionally wrap and center their text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub font_size: u8,
    pub bold: bool,
    pub fill: Fill,
    pub wrap_and_center: bool,
}

impl CellStyle {
    pub fn table(font_size: u8, bold: bool, fill: Fill) -> Self {
        Self {
            font_size,
            bold,
            fill,
            wrap_and_center: false,
        }
    }

    pub fn calendar(font_size: u8, bold: bool, fill: Fill) -> Self {
        Self {
            font_size,
            bold,
            fill,
            wrap_and_center: true,
        }
    }
}

// A value plus its presentation, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCell {
    pub value: String,
    pub style: CellStyle,
}

impl ReportCell {
    pub fn new(value: impl Into<String>, style: CellStyle) -> Self {
        Self {
            value: value.into(),
            style,
        }
    }
}

// Rows of cells plus the layout hints the spreadsheet writer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportGrid {
    pub rows: Vec<Vec<ReportCell>>,
    /// Column widths in character units, one per column.
    pub column_widths: Vec<u32>,
    /// Uniform row height hint; only the calendar grid carries one.
    pub row_height: Option<u32>,
}

// --- Error Type ---

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    MalformedTime(#[from] MalformedTimeError),

    #[error("invalid report period {month:02}/{year}")]
    InvalidPeriod { month: u32, year: i32 },
}

// --- Date Helpers ---

/// First and last calendar day of a month in the proleptic Gregorian
/// calendar (the last day is day 0 of the next month).
pub fn month_span(month: u32, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next - Duration::days(1)))
}

// --- Tabular View ---

/// Build the chronological log: a header row, one row per record in source
/// order, and a closing summary row counting compliant days.
pub fn build_table(
    records: &[AttendanceRecord],
    thresholds: &ComplianceThresholds,
) -> Result<ReportGrid, ReportError> {
    let header_style = CellStyle::table(14, true, Fill::Neutral);
    let body_style = CellStyle::table(12, false, Fill::Neutral);

    let mut rows: Vec<Vec<ReportCell>> = Vec::with_capacity(records.len() + 2);
    rows.push(
        ["Date", "First check-in", "Last check-in", "Check-in count"]
            .into_iter()
            .map(|label| ReportCell::new(label, header_style))
            .collect(),
    );

    let flagged_or_neutral = |flagged: bool| {
        if flagged {
            CellStyle::table(12, false, Fill::Flag)
        } else {
            body_style
        }
    };

    let mut compliant_days = 0usize;
    for record in records {
        let flags = classify(&record.first_checkin, &record.last_checkin, thresholds)?;
        if flags.is_compliant() {
            compliant_days += 1;
        }

        rows.push(vec![
            ReportCell::new(record.date_checkin.as_str(), body_style),
            ReportCell::new(
                record.first_checkin.as_str(),
                flagged_or_neutral(flags.late_arrival),
            ),
            ReportCell::new(
                record.last_checkin.as_str(),
                flagged_or_neutral(flags.early_departure),
            ),
            ReportCell::new(record.total_checkin.to_string(), body_style),
        ]);
    }

    let summary_style = CellStyle::table(12, true, Fill::Neutral);
    let mut summary = vec![ReportCell::new(
        format!("Compliance: {}/{}", compliant_days, records.len()),
        summary_style,
    )];
    summary.extend((0..3).map(|_| ReportCell::new("", summary_style)));
    rows.push(summary);

    Ok(ReportGrid {
        rows,
        column_widths: vec![20, 25, 25, 22],
        row_height: None,
    })
}

// --- Calendar View ---

const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Lay the month onto a Monday-first 7-column grid. Days without a record
/// show the bare date; days with one show date, first and last check-in on
/// three lines and turn red when either field is flagged.
pub fn build_calendar(
    records: &[AttendanceRecord],
    month: u32,
    year: i32,
    thresholds: &ComplianceThresholds,
) -> Result<ReportGrid, ReportError> {
    let (first_day, last_day) =
        month_span(month, year).ok_or(ReportError::InvalidPeriod { month, year })?;
    let total_days = last_day.day();

    let mut by_day: HashMap<u32, &AttendanceRecord> = HashMap::new();
    for record in records {
        if let Some(day) = record.day_of_month() {
            by_day.insert(day, record);
        }
    }

    let header_style = CellStyle::calendar(12, true, Fill::Header);
    let empty_cell = ReportCell::new("", CellStyle::calendar(11, false, Fill::Neutral));

    let mut rows: Vec<Vec<ReportCell>> = vec![WEEKDAY_LABELS
        .into_iter()
        .map(|label| ReportCell::new(label, header_style))
        .collect()];

    // Pre-filled empty cells are the only padding a partial week gets.
    let mut current_week = vec![empty_cell.clone(); 7];
    let mut weekday = first_day.weekday().num_days_from_monday() as usize;

    for day in 1..=total_days {
        let (content, fill) = match by_day.get(&day) {
            Some(record) => {
                let flags = classify(&record.first_checkin, &record.last_checkin, thresholds)?;
                let content = format!(
                    "{}\n{}\n{}",
                    record.date_checkin, record.first_checkin, record.last_checkin
                );
                let fill = if flags.is_flagged() {
                    Fill::Flag
                } else {
                    Fill::Neutral
                };
                (content, fill)
            }
            None => (format!("{:02}/{:02}/{:04}", day, month, year), Fill::Neutral),
        };

        current_week[weekday] = ReportCell::new(content, CellStyle::calendar(11, false, fill));

        if weekday == 6 || day == total_days {
            rows.push(std::mem::replace(
                &mut current_week,
                vec![empty_cell.clone(); 7],
            ));
        }
        weekday = (weekday + 1) % 7;
    }

    Ok(ReportGrid {
        rows,
        column_widths: vec![25; 7],
        row_height: Some(60),
    })
}
