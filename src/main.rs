mod chart;
mod cli;
mod logger;

use std::io::{self, Write};

use clap::Parser;
use data::{CardKind, InternalError, State};
use enum_map::EnumMap;
use source::adapter::{self, AdapterError};
use source::DatedRecord;
use url::Url;

use chart::ChartPayload;
use cli::Cli;

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error("{0}")]
    Adapter(#[from] AdapterError),
    #[error("{0}")]
    Internal(#[from] InternalError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = logger::setup(cli.debug) {
        eprintln!("Failed to initialize logger: {err}");
    }

    if let Err(err) = run(&cli) {
        log::error!("{err}");
        eprintln!("farmboard: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let mut state = State::load();

    if let Some(backend) = &cli.backend {
        state.backend_url = backend.to_string();
    }

    // read once so every card in this pass agrees on the date
    let today = cli.today.unwrap_or_else(|| state.timezone.today());
    let kinds = cli.cards();
    log::info!(
        "Rendering {} card(s) for {today} ({})",
        kinds.len(),
        state.timezone
    );

    let (records, failures) = match &cli.input {
        Some(path) => (read_input(path, &kinds)?, EnumMap::default()),
        None => fetch_all(&Url::parse(&state.backend_url)?, &kinds)?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for kind in kinds {
        let mut card = state.card(kind);
        let records = &records[kind];

        cli.apply(&mut card, records, today)?;

        let error: Option<String> = failures[kind].as_ref().map(ToString::to_string);
        let payload = ChartPayload::from(&card.view(records, today)).with_error(error);
        chart::render(&payload, cli.format, &mut out)?;

        state.store(&card);
    }
    out.flush()?;

    if !cli.no_save {
        state.save()?;
    }

    Ok(())
}

/// Records for a single card from a JSON file shaped like a backend response.
fn read_input(
    path: &std::path::Path,
    kinds: &[CardKind],
) -> Result<EnumMap<CardKind, Vec<DatedRecord>>, Error> {
    let body = std::fs::read_to_string(path)?;
    let mut records = EnumMap::default();

    for kind in kinds {
        records[*kind] = adapter::parse_records(kind.resource(), &body)?;
    }

    Ok(records)
}

type Fetched = (
    EnumMap<CardKind, Vec<DatedRecord>>,
    EnumMap<CardKind, Option<InternalError>>,
);

/// Fetches every card's resource. A card whose fetch fails renders empty with
/// the failure attached instead of aborting the others.
fn fetch_all(base: &Url, kinds: &[CardKind]) -> Result<Fetched, Error> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut records: EnumMap<CardKind, Vec<DatedRecord>> = EnumMap::default();
    let mut failures: EnumMap<CardKind, Option<InternalError>> = EnumMap::default();

    runtime.block_on(async {
        for kind in kinds {
            match adapter::fetch_records(base, kind.resource()).await {
                Ok(fetched) => {
                    log::info!("{kind}: fetched {} records", fetched.len());
                    records[*kind] = fetched;
                }
                Err(err) => {
                    log::error!("{kind}: {err}");
                    failures[*kind] = Some(InternalError::Fetch(err.to_string()));
                }
            }
        }
    });

    Ok((records, failures))
}
