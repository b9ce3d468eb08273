use crate::{DatedRecord, de_calendar_day, de_string_to_f64};

use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Harvest {
    #[serde(alias = "harvestDate", deserialize_with = "de_calendar_day")]
    pub harvest_date: NaiveDate,
    /// Kilograms.
    #[serde(alias = "weight", deserialize_with = "de_string_to_f64")]
    pub quantity: f64,
    #[serde(alias = "hiveName", alias = "hive")]
    pub hive_name: Option<String>,
}

impl From<Harvest> for DatedRecord {
    fn from(harvest: Harvest) -> Self {
        DatedRecord {
            date: harvest.harvest_date,
            value: harvest.quantity,
            group_key: harvest.hive_name,
        }
    }
}
