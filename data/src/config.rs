pub mod state;
pub mod timezone;

pub use state::{SavedCard, State};
pub use timezone::UserTimezone;
