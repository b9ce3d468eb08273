pub mod apiculture;
pub mod cattle;
pub mod finance;
pub mod fishery;

use crate::{DatedRecord, client};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use std::fmt;

#[derive(thiserror::Error, Debug)]
pub enum AdapterError {
    #[error("{0}")]
    FetchError(#[from] reqwest::Error),
    #[error("Parsing: {0}")]
    ParseError(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Backend returned {status} for {url}")]
    Status { status: u16, url: String },
}

impl AdapterError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AdapterError::FetchError(err) => err.is_timeout() || err.is_connect(),
            AdapterError::Status { status, .. } => *status == 429 || *status >= 500,
            AdapterError::ParseError(_) | AdapterError::InvalidRequest(_) => false,
        }
    }
}

/// Backend collections that feed a trend card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Resource {
    HoneyHarvests,
    MilkCollections,
    FinancialEntries,
    WaterQuality,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::HoneyHarvests,
        Resource::MilkCollections,
        Resource::FinancialEntries,
        Resource::WaterQuality,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Resource::HoneyHarvests => "apiculture/harvests",
            Resource::MilkCollections => "cattle/milk-collections",
            Resource::FinancialEntries => "finance/entries",
            Resource::WaterQuality => "fishery/water-quality",
        }
    }

    pub fn endpoint(self, base: &Url) -> Result<Url, AdapterError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base.join(self.path())
            .map_err(|e| AdapterError::InvalidRequest(format!("{base} + {}: {e}", self.path())))
    }

    fn parse_row(self, row: Value) -> Result<DatedRecord, serde_json::Error> {
        match self {
            Resource::HoneyHarvests => {
                serde_json::from_value::<apiculture::Harvest>(row).map(DatedRecord::from)
            }
            Resource::MilkCollections => {
                serde_json::from_value::<cattle::MilkCollection>(row).map(DatedRecord::from)
            }
            Resource::FinancialEntries => {
                serde_json::from_value::<finance::FinancialEntry>(row).map(DatedRecord::from)
            }
            Resource::WaterQuality => {
                serde_json::from_value::<fishery::WaterSample>(row).map(DatedRecord::from)
            }
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::HoneyHarvests => write!(f, "honey harvests"),
            Resource::MilkCollections => write!(f, "milk collections"),
            Resource::FinancialEntries => write!(f, "financial entries"),
            Resource::WaterQuality => write!(f, "water quality samples"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<Value>),
    Wrapped {
        #[serde(alias = "results")]
        data: Vec<Value>,
    },
}

/// Parses a response body into records, skipping rows that don't fit the
/// resource's shape.
pub fn parse_records(resource: Resource, body: &str) -> Result<Vec<DatedRecord>, AdapterError> {
    let payload: Payload = serde_json::from_str(body)
        .map_err(|e| AdapterError::ParseError(format!("{resource}: {e}")))?;

    let rows = match payload {
        Payload::List(rows) | Payload::Wrapped { data: rows } => rows,
    };
    let total = rows.len();

    let records = rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match resource.parse_row(row) {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!("Skipping malformed {resource} row {idx}: {err}");
                None
            }
        })
        .collect::<Vec<_>>();

    if records.len() < total {
        log::info!(
            "Parsed {} of {total} {resource} rows",
            records.len()
        );
    }

    Ok(records)
}

pub async fn fetch_records(base: &Url, resource: Resource) -> Result<Vec<DatedRecord>, AdapterError> {
    let url = resource.endpoint(base)?;
    let body = client::http_request(&url).await?;

    parse_records(resource, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bare_and_wrapped_bodies() {
        let bare = r#"[{"harvest_date": "2024-06-10", "quantity": "4.5"}]"#;
        let wrapped = r#"{"results": [{"harvest_date": "2024-06-10", "quantity": 4.5}]}"#;

        let expected = vec![DatedRecord::new(day(2024, 6, 10), 4.5)];
        assert_eq!(parse_records(Resource::HoneyHarvests, bare).unwrap(), expected);
        assert_eq!(
            parse_records(Resource::HoneyHarvests, wrapped).unwrap(),
            expected
        );
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let body = r#"{"data": [
            {"collection_date": "2024-06-10", "quantity": "12.5", "animal_name": "Bella"},
            {"collection_date": "not a date", "quantity": "3"},
            {"collection_date": "2024-06-11", "quantity": "lots"},
            {"collection_date": "2024-06-11T06:15:00Z", "quantity": 9}
        ]}"#;

        let records = parse_records(Resource::MilkCollections, body).unwrap();

        assert_eq!(
            records,
            vec![
                DatedRecord::new(day(2024, 6, 10), 12.5).with_group("Bella"),
                DatedRecord::new(day(2024, 6, 11), 9.0),
            ]
        );
    }

    #[test]
    fn non_finite_quantities_are_malformed() {
        let body = r#"[
            {"harvest_date": "2024-06-10", "quantity": "NaN"},
            {"harvest_date": "2024-06-10", "quantity": "4"},
            {"harvest_date": "2024-06-11", "quantity": "inf"},
            {"harvest_date": "2024-06-12", "quantity": "-Infinity"}
        ]"#;

        let records = parse_records(Resource::HoneyHarvests, body).unwrap();

        assert_eq!(records, vec![DatedRecord::new(day(2024, 6, 10), 4.0)]);
    }

    #[test]
    fn non_array_body_is_a_parse_error() {
        let err = parse_records(Resource::WaterQuality, r#"{"detail": "nope"}"#).unwrap_err();
        assert!(matches!(err, AdapterError::ParseError(_)));
        assert!(!err.is_transient());

        let err = parse_records(Resource::WaterQuality, "<html>").unwrap_err();
        assert!(matches!(err, AdapterError::ParseError(_)));
    }

    #[test]
    fn endpoints_extend_the_base_path() {
        let base = Url::parse("https://farm.example/api/v1").unwrap();

        assert_eq!(
            Resource::FinancialEntries.endpoint(&base).unwrap().as_str(),
            "https://farm.example/api/v1/finance/entries"
        );

        let base = Url::parse("https://farm.example/api/").unwrap();
        assert_eq!(
            Resource::HoneyHarvests.endpoint(&base).unwrap().as_str(),
            "https://farm.example/api/apiculture/harvests"
        );
    }

    #[test]
    fn every_resource_endpoint() {
        let base = Url::parse("http://localhost:8000/api/").unwrap();
        let listing = Resource::ALL
            .iter()
            .map(|resource| format!("{resource}: {}", resource.endpoint(&base).unwrap()))
            .collect::<Vec<_>>()
            .join("\n");

        insta::assert_snapshot!(listing, @r"
        honey harvests: http://localhost:8000/api/apiculture/harvests
        milk collections: http://localhost:8000/api/cattle/milk-collections
        financial entries: http://localhost:8000/api/finance/entries
        water quality samples: http://localhost:8000/api/fishery/water-quality
        ");
    }

    #[test]
    fn status_transience() {
        let status = |status| AdapterError::Status {
            status,
            url: String::new(),
        };

        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(404).is_transient());
        assert!(!status(401).is_transient());
    }

    #[tokio::test]
    async fn unjoinable_base_fails_before_any_request() {
        let base = Url::parse("mailto:farm@example.com").unwrap();

        let err = fetch_records(&base, Resource::MilkCollections)
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::InvalidRequest(_)));
    }
}
