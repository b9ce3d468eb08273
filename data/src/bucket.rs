use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::Serialize;
use source::DatedRecord;

/// What to emit for days after `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FuturePolicy {
    /// Every day gets its sum, zero included.
    #[default]
    Zero,
    /// Days strictly after `today` become gaps so charts don't draw zero bars.
    Gap { today: NaiveDate },
}

impl FuturePolicy {
    fn is_gap(self, day: NaiveDate) -> bool {
        match self {
            FuturePolicy::Zero => false,
            FuturePolicy::Gap { today } => day > today,
        }
    }
}

/// Sums record values per day of `days`, in the same order.
///
/// With a `group` filter only records carrying that group key count. Days
/// with nothing to sum are `Some(0.0)`; `None` only ever comes from
/// [`FuturePolicy::Gap`].
pub fn bucketize(
    days: &[NaiveDate],
    records: &[DatedRecord],
    group: Option<&str>,
    policy: FuturePolicy,
) -> Vec<Option<f64>> {
    let totals = daily_totals(records.iter().filter(|r| r.matches_group(group)));

    fill(days, &totals, policy)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSeries {
    pub key: String,
    pub values: Vec<Option<f64>>,
}

/// One series per distinct group key, sorted by key. Records without a key
/// are left out.
pub fn bucketize_groups(
    days: &[NaiveDate],
    records: &[DatedRecord],
    policy: FuturePolicy,
) -> Vec<GroupSeries> {
    let mut by_group: FxHashMap<&str, Vec<&DatedRecord>> = FxHashMap::default();

    for record in records {
        if let Some(key) = record.group_key.as_deref() {
            by_group.entry(key).or_default().push(record);
        }
    }

    let mut series = by_group
        .into_iter()
        .map(|(key, group)| GroupSeries {
            key: key.to_string(),
            values: fill(days, &daily_totals(group.into_iter()), policy),
        })
        .collect::<Vec<_>>();

    series.sort_by(|a, b| a.key.cmp(&b.key));
    series
}

fn daily_totals<'a>(records: impl Iterator<Item = &'a DatedRecord>) -> FxHashMap<NaiveDate, f64> {
    let mut totals = FxHashMap::default();

    for record in records {
        *totals.entry(record.date).or_insert(0.0) += record.value;
    }

    totals
}

fn fill(days: &[NaiveDate], totals: &FxHashMap<NaiveDate, f64>, policy: FuturePolicy) -> Vec<Option<f64>> {
    days.iter()
        .map(|day| {
            if policy.is_gap(*day) {
                None
            } else {
                Some(totals.get(day).copied().unwrap_or(0.0))
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub total: f64,
    /// Mean over the days that aren't gaps.
    pub average: f64,
    pub peak: Option<(NaiveDate, f64)>,
}

pub fn summarize(days: &[NaiveDate], values: &[Option<f64>]) -> Summary {
    let mut total = 0.0;
    let mut counted = 0usize;
    let mut peak: Option<(NaiveDate, f64)> = None;

    for (day, value) in days.iter().zip(values) {
        let Some(value) = *value else {
            continue;
        };

        total += value;
        counted += 1;

        if peak.is_none_or(|(_, best)| value > best) {
            peak = Some((*day, value));
        }
    }

    Summary {
        total,
        average: if counted == 0 {
            0.0
        } else {
            total / counted as f64
        },
        peak,
    }
}
