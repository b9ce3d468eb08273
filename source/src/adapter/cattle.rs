use crate::{DatedRecord, de_calendar_day, de_string_to_f64};

use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MilkCollection {
    #[serde(alias = "collectionDate", deserialize_with = "de_calendar_day")]
    pub collection_date: NaiveDate,
    /// Litres.
    #[serde(alias = "volume", deserialize_with = "de_string_to_f64")]
    pub quantity: f64,
    #[serde(alias = "animalName", alias = "animal")]
    pub animal_name: Option<String>,
}

impl From<MilkCollection> for DatedRecord {
    fn from(collection: MilkCollection) -> Self {
        DatedRecord {
            date: collection.collection_date,
            value: collection.quantity,
            group_key: collection.animal_name,
        }
    }
}
