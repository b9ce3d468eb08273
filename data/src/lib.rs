pub mod bucket;
pub mod card;
pub mod config;
pub mod interval;
pub mod log;
pub mod nav;
pub mod selector;

pub use bucket::{FuturePolicy, GroupSeries, Summary, bucketize, bucketize_groups, summarize};
pub use card::{Card, CardConfig, CardKind, CardView};
pub use config::state::State;
pub use config::timezone::UserTimezone;
pub use interval::{Mode, ResolvedInterval, resolve};
pub use nav::{NavState, can_navigate};
pub use selector::{RangeKind, TimeRangeSelector, parse_date_input};

use std::path::PathBuf;

const APP_DIR: &str = "farmboard";
const DATA_PATH_ENV: &str = "FARMBOARD_DATA_PATH";

#[derive(thiserror::Error, Debug, Clone)]
pub enum InternalError {
    #[error("Fetch error: {0}")]
    Fetch(String),
    #[error("State error: {0}")]
    State(String),
    #[error("{card} has no {range} range")]
    UnsupportedRange { card: CardKind, range: RangeKind },
}

/// Location of app files; `FARMBOARD_DATA_PATH` overrides the platform data
/// directory.
pub fn data_path(path_name: Option<&str>) -> PathBuf {
    let base = match std::env::var_os(DATA_PATH_ENV) {
        Some(path) => PathBuf::from(path),
        None => dirs_next::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR),
    };

    match path_name {
        Some(name) => base.join(name),
        None => base,
    }
}
