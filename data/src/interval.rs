//! Resolves a [`TimeRangeSelector`] into a concrete window of calendar days.
//!
//! Named ranges are anchored on the caller's `today`, never on the system
//! clock, so resolution is a pure function of its inputs:
//!
//! | Range         | Window                                                        |
//! |---------------|---------------------------------------------------------------|
//! | `Weekly`      | seven days ending on `today + 7 * offset`                     |
//! | `Monthly`     | the calendar month `offset` months from today, clamped to today when current |
//! | `ThreeMonths` | first of the month two months back, through today (no offset) |
//!
//! A valid custom pair wins over all of the above.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::selector::{RangeKind, TimeRangeSelector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Named(RangeKind),
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInterval {
    pub mode: Mode,
    /// `None` when calendar arithmetic left the representable range.
    pub bounds: Option<(NaiveDate, NaiveDate)>,
    /// Every day from start to end inclusive; empty when the bounds are unusable.
    pub days: Vec<NaiveDate>,
    pub label: String,
}

impl ResolvedInterval {
    pub fn start(&self) -> Option<NaiveDate> {
        self.bounds.map(|(start, _)| start)
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.bounds.map(|(_, end)| end)
    }

    pub fn is_custom(&self) -> bool {
        self.mode == Mode::Custom
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self.bounds {
            Some((start, end)) => !self.days.is_empty() && start <= date && date <= end,
            None => false,
        }
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start().map(|start| start.and_time(NaiveTime::MIN))
    }

    /// Custom windows close at the last millisecond of their end day; named
    /// windows are plain dates at midnight.
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        let end = self.end()?;

        match self.mode {
            Mode::Custom => NaiveTime::from_hms_milli_opt(23, 59, 59, 999).map(|t| end.and_time(t)),
            Mode::Named(_) => Some(end.and_time(NaiveTime::MIN)),
        }
    }

    /// X-axis labels, one per day.
    pub fn day_labels(&self) -> Vec<String> {
        let format = match self.mode {
            Mode::Named(RangeKind::Weekly) => "%a %-d",
            Mode::Named(_) | Mode::Custom => "%b %-d",
        };

        self.days
            .iter()
            .map(|day| day.format(format).to_string())
            .collect()
    }
}

pub fn resolve(selector: &TimeRangeSelector, today: NaiveDate) -> ResolvedInterval {
    let (mode, bounds) = match selector.custom_range() {
        Some(range) => (Mode::Custom, Some(range)),
        None => (
            Mode::Named(selector.kind),
            named_bounds(selector.kind, selector.offset, today),
        ),
    };

    let days = match bounds {
        Some((start, end)) if start <= end => days_inclusive(start, end),
        _ => Vec::new(),
    };

    let label = match bounds {
        Some((start, end)) if !days.is_empty() => label(mode, start, end),
        _ => "No dates in range".to_string(),
    };

    ResolvedInterval {
        mode,
        bounds,
        days,
        label,
    }
}

/// Window of a named range, ignoring any custom dates.
pub fn named_bounds(kind: RangeKind, offset: i32, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    match kind {
        RangeKind::Weekly => {
            let end = shift_days(today, i64::from(offset) * 7)?;
            let start = end.checked_sub_days(Days::new(6))?;
            Some((start, end))
        }
        RangeKind::Monthly => {
            let target = shift_months(today, offset)?;
            let mut start = first_of_month(target)?;
            let month_end = last_of_month(target)?;

            let end = if offset == 0 {
                month_end.min(today)
            } else {
                month_end
            };

            // Only reachable if month arithmetic ever lands outside the
            // target month; chrono clamps the day, so it shouldn't.
            if offset != 0 && end < start {
                start = first_of_month(end)?;
            }

            Some((start, end))
        }
        RangeKind::ThreeMonths => {
            let start = first_of_month(shift_months(today, -2)?)?;
            let end = last_of_month(today)?.min(today);
            Some((start, end))
        }
    }
}

fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let delta = Days::new(days.unsigned_abs());

    if days >= 0 {
        date.checked_add_days(delta)
    } else {
        date.checked_sub_days(delta)
    }
}

fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let delta = Months::new(months.unsigned_abs());

    if months >= 0 {
        date.checked_add_months(delta)
    } else {
        date.checked_sub_months(delta)
    }
}

pub fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

pub fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    first_of_month(date)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

fn days_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

fn label(mode: Mode, start: NaiveDate, end: NaiveDate) -> String {
    match mode {
        Mode::Custom => format!(
            "Range: {} - {}",
            start.format("%b %-d, %Y"),
            end.format("%b %-d, %Y")
        ),
        Mode::Named(RangeKind::Weekly) if start.year() == end.year() => format!(
            "Week: {} - {}",
            start.format("%b %-d"),
            end.format("%b %-d, %Y")
        ),
        Mode::Named(RangeKind::Weekly) => format!(
            "Week: {} - {}",
            start.format("%b %-d, %Y"),
            end.format("%b %-d, %Y")
        ),
        Mode::Named(RangeKind::Monthly) => {
            let month = start.format("%B %Y");
            match last_of_month(start) {
                Some(month_end) if end < month_end => {
                    format!("Month: {month} (through {})", end.format("%b %-d"))
                }
                _ => format!("Month: {month}"),
            }
        }
        Mode::Named(RangeKind::ThreeMonths) => format!(
            "Last 3 Months: {} - {}",
            start.format("%b %Y"),
            end.format("%b %Y")
        ),
    }
}
