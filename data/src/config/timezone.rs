use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which calendar "today" is read from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum UserTimezone {
    Utc,
    #[default]
    Local,
}

impl UserTimezone {
    /// The current calendar day. Callers read this once per render and pass
    /// it down, so every card in one pass agrees on the date.
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }

    /// Calendar day of `instant` in this timezone.
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            UserTimezone::Utc => instant.date_naive(),
            UserTimezone::Local => instant.with_timezone(&chrono::Local).date_naive(),
        }
    }
}

impl fmt::Display for UserTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserTimezone::Utc => write!(f, "UTC"),
            UserTimezone::Local => {
                let local_offset = chrono::Local::now().offset().local_minus_utc();
                let hours = local_offset / 3600;
                let minutes = (local_offset % 3600).abs() / 60;
                write!(f, "Local (UTC {hours:+03}:{minutes:02})")
            }
        }
    }
}

impl<'de> Deserialize<'de> for UserTimezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let timezone_str = String::deserialize(deserializer)?;
        match timezone_str.to_lowercase().as_str() {
            "utc" => Ok(UserTimezone::Utc),
            "local" => Ok(UserTimezone::Local),
            _ => Err(serde::de::Error::custom("Invalid UserTimezone")),
        }
    }
}

impl Serialize for UserTimezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            UserTimezone::Utc => serializer.serialize_str("UTC"),
            UserTimezone::Local => serializer.serialize_str("Local"),
        }
    }
}
