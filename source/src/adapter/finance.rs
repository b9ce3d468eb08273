use crate::{DatedRecord, de_calendar_day, de_string_to_f64};

use chrono::NaiveDate;
use serde::Deserialize;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[serde(alias = "Income", alias = "revenue")]
    Income,
    #[serde(alias = "Expense", alias = "expenditure")]
    Expense,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Income => write!(f, "Income"),
            EntryType::Expense => write!(f, "Expense"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FinancialEntry {
    #[serde(alias = "entryDate", alias = "date", deserialize_with = "de_calendar_day")]
    pub entry_date: NaiveDate,
    #[serde(deserialize_with = "de_string_to_f64")]
    pub amount: f64,
    #[serde(alias = "entryType", alias = "type")]
    pub entry_type: EntryType,
}

impl From<FinancialEntry> for DatedRecord {
    fn from(entry: FinancialEntry) -> Self {
        DatedRecord {
            date: entry.entry_date,
            value: entry.amount,
            group_key: Some(entry.entry_type.to_string()),
        }
    }
}
