use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use std::{fmt, str::FromStr};

use crate::nav::NavState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum RangeKind {
    #[default]
    Weekly,
    Monthly,
    ThreeMonths,
}

impl RangeKind {
    pub const ALL: [RangeKind; 3] = [RangeKind::Weekly, RangeKind::Monthly, RangeKind::ThreeMonths];

    /// Whether the range has a defined previous/next step.
    pub fn is_paginated(self) -> bool {
        match self {
            RangeKind::Weekly | RangeKind::Monthly => true,
            RangeKind::ThreeMonths => false,
        }
    }
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeKind::Weekly => write!(f, "Weekly"),
            RangeKind::Monthly => write!(f, "Monthly"),
            RangeKind::ThreeMonths => write!(f, "3 Months"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown range {0:?}, expected weekly, monthly or 3 months")]
pub struct ParseRangeKindError(String);

impl FromStr for RangeKind {
    type Err = ParseRangeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");

        match normalized.as_str() {
            "weekly" | "week" | "1 week" => Ok(RangeKind::Weekly),
            "monthly" | "month" | "1 month" => Ok(RangeKind::Monthly),
            "3 months" | "three months" | "3months" | "quarter" => Ok(RangeKind::ThreeMonths),
            _ => Err(ParseRangeKindError(s.to_string())),
        }
    }
}

/// What a trend card's range controls currently say.
///
/// `offset` counts whole periods back from the one containing today; a valid
/// custom pair overrides both `kind` and `offset` when resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct TimeRangeSelector {
    pub kind: RangeKind,
    pub offset: i32,
    pub custom_start: Option<NaiveDate>,
    pub custom_end: Option<NaiveDate>,
}

impl TimeRangeSelector {
    pub fn new(kind: RangeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            custom_start: Some(start),
            custom_end: Some(end),
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    /// The custom pair, only when both ends are set and ordered.
    pub fn custom_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.custom_start, self.custom_end) {
            (Some(start), Some(end)) if end >= start => Some((start, end)),
            _ => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.custom_range().is_some()
    }

    pub fn set_kind(&mut self, kind: RangeKind) {
        self.kind = kind;
        self.offset = 0;
    }

    pub fn set_custom_start(&mut self, start: Option<NaiveDate>) {
        self.custom_start = start;
        if let (Some(start), Some(end)) = (start, self.custom_end) {
            if start > end {
                self.custom_end = None;
            }
        }
        self.offset = 0;
    }

    pub fn set_custom_end(&mut self, end: Option<NaiveDate>) {
        self.custom_end = end;
        if let (Some(start), Some(end)) = (self.custom_start, end) {
            if end < start {
                self.custom_start = None;
            }
        }
        self.offset = 0;
    }

    /// Same as [`Self::set_custom_start`] for raw text input; unparsable text
    /// clears the field.
    pub fn set_custom_start_input(&mut self, input: &str) {
        self.set_custom_start(parse_date_input(input));
    }

    pub fn set_custom_end_input(&mut self, input: &str) {
        self.set_custom_end(parse_date_input(input));
    }

    pub fn clear_custom(&mut self) {
        self.custom_start = None;
        self.custom_end = None;
        self.offset = 0;
    }

    /// Steps one period back if `gate` allows it.
    pub fn previous(&mut self, gate: NavState) -> bool {
        if gate.prev_enabled {
            self.offset = self.offset.saturating_sub(1);
        }
        gate.prev_enabled
    }

    /// Steps one period forward if `gate` allows it.
    pub fn next(&mut self, gate: NavState) -> bool {
        if gate.next_enabled {
            self.offset = self.offset.saturating_add(1);
        }
        gate.next_enabled
    }
}

const INPUT_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parses a date typed into a range field. Anything unparsable is treated
/// as an absent date.
pub fn parse_date_input(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_kind_from_labels() {
        assert_eq!("Weekly".parse(), Ok(RangeKind::Weekly));
        assert_eq!("1 Month".parse(), Ok(RangeKind::Monthly));
        assert_eq!("3 Months".parse(), Ok(RangeKind::ThreeMonths));
        assert_eq!("three-months".parse(), Ok(RangeKind::ThreeMonths));
        assert!("fortnight".parse::<RangeKind>().is_err());
    }

    #[test]
    fn switching_kind_resets_offset() {
        let mut selector = TimeRangeSelector::new(RangeKind::Weekly).with_offset(-3);
        selector.set_kind(RangeKind::Monthly);

        assert_eq!(selector.kind, RangeKind::Monthly);
        assert_eq!(selector.offset, 0);
    }

    #[test]
    fn start_after_end_clears_end() {
        let mut selector = TimeRangeSelector::custom(day(2024, 1, 1), day(2024, 1, 10));
        selector.offset = -2;

        selector.set_custom_start(Some(day(2024, 1, 15)));

        assert_eq!(selector.custom_start, Some(day(2024, 1, 15)));
        assert_eq!(selector.custom_end, None);
        assert_eq!(selector.offset, 0);
        assert!(!selector.is_custom());
    }

    #[test]
    fn end_before_start_clears_start() {
        let mut selector = TimeRangeSelector::custom(day(2024, 1, 5), day(2024, 1, 10));

        selector.set_custom_end(Some(day(2024, 1, 2)));

        assert_eq!(selector.custom_start, None);
        assert_eq!(selector.custom_end, Some(day(2024, 1, 2)));
    }

    #[test]
    fn consistent_edits_keep_both_ends() {
        let mut selector = TimeRangeSelector::default();
        selector.set_custom_start_input("2024-01-01");
        selector.set_custom_end_input("01/03/2024");

        assert_eq!(selector.custom_range(), Some((day(2024, 1, 1), day(2024, 1, 3))));

        selector.clear_custom();
        assert_eq!(selector.custom_range(), None);
    }

    #[test]
    fn single_day_custom_range_is_valid() {
        let selector = TimeRangeSelector::custom(day(2024, 2, 29), day(2024, 2, 29));
        assert!(selector.is_custom());
    }

    #[test]
    fn unparsable_input_is_absent() {
        assert_eq!(parse_date_input(""), None);
        assert_eq!(parse_date_input("2024-13-01"), None);
        assert_eq!(parse_date_input("tomorrow"), None);
        assert_eq!(parse_date_input(" 2024-06-15 "), Some(day(2024, 6, 15)));
    }

    #[test]
    fn stepping_respects_the_gate() {
        let mut selector = TimeRangeSelector::new(RangeKind::Weekly);
        let closed = NavState::default();
        let open = NavState {
            prev_enabled: true,
            next_enabled: true,
        };

        assert!(!selector.next(closed));
        assert_eq!(selector.offset, 0);

        assert!(selector.previous(open));
        assert!(selector.previous(open));
        assert_eq!(selector.offset, -2);

        assert!(selector.next(open));
        assert_eq!(selector.offset, -1);
    }
}
