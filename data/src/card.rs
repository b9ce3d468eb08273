use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use source::{DatedRecord, Resource};

use std::fmt;

use crate::InternalError;
use crate::bucket::{FuturePolicy, GroupSeries, Summary, bucketize, bucketize_groups, summarize};
use crate::interval::{ResolvedInterval, resolve};
use crate::nav::{NavState, can_navigate};
use crate::selector::{RangeKind, TimeRangeSelector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, enum_map::Enum)]
pub enum CardKind {
    Honey,
    Milk,
    Finance,
    WaterQuality,
}

impl CardKind {
    pub const ALL: [CardKind; 4] = [
        CardKind::Honey,
        CardKind::Milk,
        CardKind::Finance,
        CardKind::WaterQuality,
    ];

    pub fn config(self) -> CardConfig {
        match self {
            CardKind::Honey => CardConfig {
                ranges: &RangeKind::ALL,
                future_is_gap: true,
                groupable: false,
                tracks_earliest: true,
                unit: "kg",
                month_label: "Monthly",
            },
            CardKind::Milk => CardConfig {
                ranges: &RangeKind::ALL,
                future_is_gap: false,
                groupable: true,
                tracks_earliest: true,
                unit: "L",
                month_label: "1 Month",
            },
            CardKind::Finance => CardConfig {
                ranges: &RangeKind::ALL,
                future_is_gap: true,
                groupable: true,
                tracks_earliest: false,
                unit: "",
                month_label: "Monthly",
            },
            CardKind::WaterQuality => CardConfig {
                ranges: &[RangeKind::Weekly, RangeKind::Monthly],
                future_is_gap: true,
                groupable: true,
                tracks_earliest: false,
                unit: "",
                month_label: "Monthly",
            },
        }
    }

    pub fn resource(self) -> Resource {
        match self {
            CardKind::Honey => Resource::HoneyHarvests,
            CardKind::Milk => Resource::MilkCollections,
            CardKind::Finance => Resource::FinancialEntries,
            CardKind::WaterQuality => Resource::WaterQuality,
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardKind::Honey => write!(f, "Honey Production"),
            CardKind::Milk => write!(f, "Milk Production"),
            CardKind::Finance => write!(f, "Financial Trend"),
            CardKind::WaterQuality => write!(f, "Water Quality"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardConfig {
    pub ranges: &'static [RangeKind],
    /// Named ranges leave days after today blank instead of zero.
    pub future_is_gap: bool,
    pub groupable: bool,
    /// "Previous" stops at the earliest record.
    pub tracks_earliest: bool,
    pub unit: &'static str,
    pub month_label: &'static str,
}

impl CardConfig {
    pub fn offers(&self, kind: RangeKind) -> bool {
        self.ranges.contains(&kind)
    }

    pub fn range_label(&self, kind: RangeKind) -> &'static str {
        match kind {
            RangeKind::Weekly => "Weekly",
            RangeKind::Monthly => self.month_label,
            RangeKind::ThreeMonths => "3 Months",
        }
    }
}

/// A trend card: which records it shows and how its range controls are set.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub kind: CardKind,
    pub selector: TimeRangeSelector,
    pub group: Option<String>,
}

impl Card {
    pub fn new(kind: CardKind) -> Self {
        let range = kind
            .config()
            .ranges
            .first()
            .copied()
            .unwrap_or_default();

        Self {
            kind,
            selector: TimeRangeSelector::new(range),
            group: None,
        }
    }

    pub fn set_range(&mut self, range: RangeKind) -> Result<(), InternalError> {
        if !self.kind.config().offers(range) {
            return Err(InternalError::UnsupportedRange {
                card: self.kind,
                range,
            });
        }

        self.selector.set_kind(range);
        Ok(())
    }

    pub fn set_group(&mut self, group: Option<String>) {
        if group.is_some() && !self.kind.config().groupable {
            log::warn!("{} has no groups, ignoring group filter", self.kind);
            return;
        }

        self.group = group;
    }

    pub fn nav(&self, records: &[DatedRecord], today: NaiveDate) -> NavState {
        let earliest = if self.kind.config().tracks_earliest {
            source::earliest_date(records)
        } else {
            None
        };

        can_navigate(&self.selector, today, earliest)
    }

    pub fn previous(&mut self, records: &[DatedRecord], today: NaiveDate) -> bool {
        let gate = self.nav(records, today);
        self.selector.previous(gate)
    }

    pub fn next(&mut self, records: &[DatedRecord], today: NaiveDate) -> bool {
        let gate = self.nav(records, today);
        self.selector.next(gate)
    }

    /// Everything a chart needs for the current selection.
    pub fn view(&self, records: &[DatedRecord], today: NaiveDate) -> CardView {
        let config = self.kind.config();
        let interval = resolve(&self.selector, today);

        let policy = if config.future_is_gap && !interval.is_custom() {
            FuturePolicy::Gap { today }
        } else {
            FuturePolicy::Zero
        };

        let values = bucketize(&interval.days, records, self.group.as_deref(), policy);
        let breakdown = if config.groupable && self.group.is_none() {
            bucketize_groups(&interval.days, records, policy)
        } else {
            Vec::new()
        };
        let summary = summarize(&interval.days, &values);

        log::debug!(
            "{}: {} ({} days, {} of {} records in window)",
            self.kind,
            interval.label,
            interval.days.len(),
            records.iter().filter(|r| interval.contains(r.date)).count(),
            records.len()
        );

        CardView {
            kind: self.kind,
            group: self.group.clone(),
            labels: interval.day_labels(),
            nav: self.nav(records, today),
            interval,
            values,
            breakdown,
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub kind: CardKind,
    /// The group filter the values were computed with.
    pub group: Option<String>,
    pub interval: ResolvedInterval,
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
    /// Per-group series when the card is groupable and unfiltered.
    pub breakdown: Vec<GroupSeries>,
    pub nav: NavState,
    pub summary: Summary,
}
