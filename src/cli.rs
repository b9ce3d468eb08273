use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use data::{Card, CardKind, RangeKind};
use source::DatedRecord;
use url::Url;

use crate::chart::Format;

#[derive(Debug, Parser)]
#[command(name = "farmboard", version, about = "Trend charts for farm production and finance records")]
pub struct Cli {
    /// Card to render; all cards when omitted
    #[arg(long, value_enum)]
    pub card: Option<CardArg>,

    /// weekly, monthly (or "1 month"), "3 months"
    #[arg(long, value_parser = parse_range)]
    pub range: Option<RangeKind>,

    /// Step this many periods back from the current one
    #[arg(long, default_value_t = 0)]
    pub back: u32,

    /// Custom range start (YYYY-MM-DD or MM/DD/YYYY)
    #[arg(long)]
    pub from: Option<String>,

    /// Custom range end (YYYY-MM-DD or MM/DD/YYYY)
    #[arg(long)]
    pub to: Option<String>,

    /// Drop any saved custom range
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub clear_custom: bool,

    /// Only count records of this group (animal, entry type, parameter)
    #[arg(long)]
    pub group: Option<String>,

    /// Remove a saved group filter
    #[arg(long, conflicts_with = "group")]
    pub all_groups: bool,

    /// Read records from a JSON file instead of the backend (needs --card)
    #[arg(long, requires = "card")]
    pub input: Option<PathBuf>,

    /// Backend base URL; remembered for later runs
    #[arg(long)]
    pub backend: Option<Url>,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Pretend today is this date
    #[arg(long, value_parser = parse_today)]
    pub today: Option<NaiveDate>,

    /// Don't write the selection back to saved state
    #[arg(long)]
    pub no_save: bool,

    /// Verbose logging, mirrored to stderr
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CardArg {
    Honey,
    Milk,
    Finance,
    WaterQuality,
}

impl From<CardArg> for CardKind {
    fn from(arg: CardArg) -> Self {
        match arg {
            CardArg::Honey => CardKind::Honey,
            CardArg::Milk => CardKind::Milk,
            CardArg::Finance => CardKind::Finance,
            CardArg::WaterQuality => CardKind::WaterQuality,
        }
    }
}

fn parse_range(value: &str) -> Result<RangeKind, String> {
    value.parse().map_err(|err: data::selector::ParseRangeKindError| err.to_string())
}

fn parse_today(value: &str) -> Result<NaiveDate, String> {
    data::parse_date_input(value).ok_or_else(|| format!("invalid date {value:?}"))
}

impl Cli {
    pub fn cards(&self) -> Vec<CardKind> {
        match self.card {
            Some(card) => vec![card.into()],
            None => CardKind::ALL.to_vec(),
        }
    }

    /// Applies the selector flags to `card` the way the card's own controls
    /// would, in order: range, custom dates, group, then stepping back.
    pub fn apply(
        &self,
        card: &mut Card,
        records: &[DatedRecord],
        today: NaiveDate,
    ) -> Result<(), data::InternalError> {
        if let Some(range) = self.range {
            match card.set_range(range) {
                Ok(()) => {}
                // with every card on screen, one card lacking the range isn't fatal
                Err(err) if self.card.is_none() => log::warn!("{err}"),
                Err(err) => return Err(err),
            }
        }

        if self.clear_custom {
            card.selector.clear_custom();
        }
        if let Some(from) = &self.from {
            card.selector.set_custom_start_input(from);
            if card.selector.custom_start.is_none() {
                log::warn!("Ignoring unreadable start date {from:?}");
            }
        }
        if let Some(to) = &self.to {
            card.selector.set_custom_end_input(to);
            if card.selector.custom_end.is_none() {
                log::warn!("Ignoring unreadable end date {to:?}");
            }
        }

        if self.all_groups {
            card.set_group(None);
        } else if let Some(group) = &self.group {
            let known = source::group_keys(records);
            if !records.is_empty() && !known.contains(group) {
                log::warn!(
                    "{}: no records for group {group:?}, known groups: {}",
                    card.kind,
                    known.join(", ")
                );
            }
            card.set_group(Some(group.clone()));
        }

        for step in 0..self.back {
            if !card.previous(records, today) {
                log::info!("{}: no earlier period after {step} step(s)", card.kind);
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("farmboard").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn back_stops_at_the_navigation_gate() {
        let records = vec![DatedRecord::new(day(2024, 5, 20), 3.0)];
        let mut card = Card::new(CardKind::Honey);

        cli(&["--card", "honey", "--back", "10"])
            .apply(&mut card, &records, day(2024, 6, 15))
            .unwrap();

        // weeks ending Jun 8, Jun 1, May 25 still reach May 20
        assert_eq!(card.selector.offset, -3);
    }

    #[test]
    fn three_month_range_never_steps() {
        let mut card = Card::new(CardKind::Milk);

        cli(&["--card", "milk", "--range", "3 months", "--back", "2"])
            .apply(&mut card, &[], day(2024, 6, 15))
            .unwrap();

        assert_eq!(card.selector.kind, RangeKind::ThreeMonths);
        assert_eq!(card.selector.offset, 0);
    }

    #[test]
    fn unsupported_range_fails_only_for_a_single_card() {
        let mut card = Card::new(CardKind::WaterQuality);
        let single = cli(&["--card", "water-quality", "--range", "3-months"]);
        assert!(single.apply(&mut card, &[], day(2024, 6, 15)).is_err());

        let all = cli(&["--range", "3-months"]);
        assert!(all.apply(&mut card, &[], day(2024, 6, 15)).is_ok());
        assert_eq!(card.selector.kind, RangeKind::Weekly);
    }

    #[test]
    fn custom_dates_from_flags() {
        let mut card = Card::new(CardKind::Finance);

        cli(&["--from", "2024-01-01", "--to", "01/03/2024"])
            .apply(&mut card, &[], day(2024, 6, 15))
            .unwrap();
        assert_eq!(
            card.selector.custom_range(),
            Some((day(2024, 1, 1), day(2024, 1, 3)))
        );

        cli(&["--clear-custom"])
            .apply(&mut card, &[], day(2024, 6, 15))
            .unwrap();
        assert!(!card.selector.is_custom());
    }

    #[test]
    fn unreadable_custom_date_is_absent() {
        let mut card = Card::new(CardKind::Finance);

        cli(&["--from", "someday", "--to", "2024-01-03"])
            .apply(&mut card, &[], day(2024, 6, 15))
            .unwrap();

        assert_eq!(card.selector.custom_start, None);
        assert!(!card.selector.is_custom());
    }

    #[test]
    fn input_requires_a_card() {
        let args = ["farmboard", "--input", "records.json"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn group_flags() {
        let mut card = Card::new(CardKind::Milk);

        cli(&["--group", "Bella"])
            .apply(&mut card, &[], day(2024, 6, 15))
            .unwrap();
        assert_eq!(card.group.as_deref(), Some("Bella"));

        cli(&["--all-groups"])
            .apply(&mut card, &[], day(2024, 6, 15))
            .unwrap();
        assert_eq!(card.group, None);
    }

    #[test]
    fn unknown_group_still_filters() {
        let records = vec![DatedRecord::new(day(2024, 6, 14), 12.0).with_group("Bella")];
        let mut card = Card::new(CardKind::Milk);

        cli(&["--group", "Clover"])
            .apply(&mut card, &records, day(2024, 6, 15))
            .unwrap();

        assert_eq!(card.group.as_deref(), Some("Clover"));
        assert!(card.view(&records, day(2024, 6, 15)).values.iter().all(|v| *v == Some(0.0)));
    }
}
