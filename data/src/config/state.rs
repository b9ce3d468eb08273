use std::{fs, io, path::Path};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::card::{Card, CardKind};
use crate::selector::{RangeKind, TimeRangeSelector};
use crate::{InternalError, data_path};

pub use super::timezone::UserTimezone;

pub const SAVED_STATE_FILE: &str = "saved-state.json";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/api/";

/// What survives between runs. Offsets are deliberately absent: a reloaded
/// card always opens on the current period.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct State {
    pub backend_url: String,
    pub timezone: UserTimezone,
    pub cards: Vec<SavedCard>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timezone: UserTimezone::default(),
            cards: CardKind::ALL
                .iter()
                .map(|kind| SavedCard::from(&Card::new(*kind)))
                .collect(),
        }
    }
}

impl State {
    pub fn load() -> Self {
        Self::read_from(&data_path(Some(SAVED_STATE_FILE)))
    }

    pub fn read_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(state) => state,
                Err(err) => {
                    log::warn!("Ignoring unreadable state at {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No saved state at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!("Failed to read state at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), InternalError> {
        self.write_to(&data_path(Some(SAVED_STATE_FILE)))
    }

    pub fn write_to(&self, path: &Path) -> Result<(), InternalError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| InternalError::State(e.to_string()))?;
        }

        let json =
            serde_json::to_string_pretty(self).map_err(|e| InternalError::State(e.to_string()))?;
        fs::write(path, json).map_err(|e| InternalError::State(e.to_string()))?;

        log::info!("Saved state to {}", path.display());
        Ok(())
    }

    /// The saved card of `kind`, or a fresh one.
    pub fn card(&self, kind: CardKind) -> Card {
        self.cards
            .iter()
            .find(|saved| saved.kind == kind)
            .map_or_else(|| Card::new(kind), SavedCard::to_card)
    }

    pub fn store(&mut self, card: &Card) {
        let saved = SavedCard::from(card);

        match self.cards.iter_mut().find(|c| c.kind == card.kind) {
            Some(existing) => *existing = saved,
            None => self.cards.push(saved),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SavedCard {
    pub kind: CardKind,
    pub range: RangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl SavedCard {
    pub fn to_card(&self) -> Card {
        let mut card = Card::new(self.kind);

        if let Err(err) = card.set_range(self.range) {
            log::warn!("Saved state: {err}");
        }
        card.set_group(self.group.clone());
        card.selector = TimeRangeSelector {
            custom_start: self.custom_start,
            custom_end: self.custom_end,
            ..card.selector
        };

        card
    }
}

impl From<&Card> for SavedCard {
    fn from(card: &Card) -> Self {
        SavedCard {
            kind: card.kind,
            range: card.selector.kind,
            custom_start: card.selector.custom_start,
            custom_end: card.selector.custom_end,
            group: card.group.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn cards_survive_a_save_without_their_offset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SAVED_STATE_FILE);

        let mut card = Card::new(CardKind::Milk);
        card.set_range(RangeKind::ThreeMonths).unwrap();
        card.set_group(Some("Bella".to_string()));
        card.selector.offset = -3;

        let mut state = State::default();
        state.store(&card);
        state.write_to(&path).unwrap();

        let restored = State::read_from(&path).card(CardKind::Milk);
        assert_eq!(restored.selector.kind, RangeKind::ThreeMonths);
        assert_eq!(restored.selector.offset, 0);
        assert_eq!(restored.group.as_deref(), Some("Bella"));
    }

    #[test]
    fn unsupported_saved_range_falls_back() {
        let saved = SavedCard {
            kind: CardKind::WaterQuality,
            range: RangeKind::ThreeMonths,
            custom_start: Some(day(2024, 1, 1)),
            custom_end: Some(day(2024, 1, 7)),
            group: None,
        };

        let card = saved.to_card();
        assert_eq!(card.selector.kind, RangeKind::Weekly);
        assert!(card.selector.is_custom());
    }

    #[test]
    fn missing_or_corrupt_state_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert_eq!(State::read_from(&missing), State::default());

        let corrupt = dir.path().join("corrupt.json");
        fs::write(&corrupt, "{ not json").unwrap();
        assert_eq!(State::read_from(&corrupt), State::default());
    }

    #[test]
    fn partial_state_fills_in_defaults() {
        let state: State = serde_json::from_str(r#"{"timezone": "UTC"}"#).unwrap();

        assert_eq!(state.timezone, UserTimezone::Utc);
        assert_eq!(state.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(state.cards.len(), CardKind::ALL.len());
        assert_eq!(state.card(CardKind::Finance), Card::new(CardKind::Finance));
    }
}
