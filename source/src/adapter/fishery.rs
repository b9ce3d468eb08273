use crate::{DatedRecord, de_calendar_day, de_string_to_f64};

use chrono::NaiveDate;
use serde::Deserialize;

/// One reading from a pond; `parameter` names what was measured
/// (`ph`, `dissolved_oxygen`, `ammonia`, ...).
#[derive(Debug, Deserialize)]
pub struct WaterSample {
    #[serde(alias = "sampleDate", alias = "date", deserialize_with = "de_calendar_day")]
    pub sample_date: NaiveDate,
    pub parameter: String,
    #[serde(alias = "reading", deserialize_with = "de_string_to_f64")]
    pub value: f64,
}

impl From<WaterSample> for DatedRecord {
    fn from(sample: WaterSample) -> Self {
        DatedRecord {
            date: sample.sample_date,
            value: sample.value,
            group_key: Some(sample.parameter),
        }
    }
}
