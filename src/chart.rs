use std::io::{self, Write};

use data::{CardKind, CardView, Mode, NavState, Summary};
use palette::{FromColor, Hsl, Srgb};
use serde::Serialize;

const BAR_WIDTH: f64 = 30.0;
/// Golden angle, keeps neighbouring series apart on the hue wheel.
const HUE_STEP: f32 = 137.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub name: String,
    /// `null` marks a gap, not a zero.
    pub values: Vec<Option<f64>>,
    pub color: String,
}

/// What gets handed to a chart renderer: one x-axis and any number of series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub title: String,
    /// The range control's wording, e.g. "1 Month" on the milk card.
    pub range: &'static str,
    pub subtitle: String,
    pub unit: &'static str,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub nav: NavState,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChartPayload {
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}

impl From<&CardView> for ChartPayload {
    fn from(view: &CardView) -> Self {
        let base_hue = base_hue(view.kind);

        let primary = Dataset {
            name: view.group.clone().unwrap_or_else(|| "Total".to_string()),
            values: view.values.clone(),
            color: series_color(base_hue, 0),
        };

        let datasets = std::iter::once(primary)
            .chain(view.breakdown.iter().enumerate().map(|(idx, series)| Dataset {
                name: series.key.clone(),
                values: series.values.clone(),
                color: series_color(base_hue, idx + 1),
            }))
            .collect();

        let range = match view.interval.mode {
            Mode::Named(kind) => view.kind.config().range_label(kind),
            Mode::Custom => "Custom",
        };

        ChartPayload {
            title: view.kind.to_string(),
            range,
            subtitle: view.interval.label.clone(),
            unit: view.kind.config().unit,
            labels: view.labels.clone(),
            datasets,
            nav: view.nav,
            summary: view.summary,
            error: None,
        }
    }
}

fn base_hue(kind: CardKind) -> f32 {
    match kind {
        CardKind::Honey => 40.0,
        CardKind::Milk => 210.0,
        CardKind::Finance => 130.0,
        CardKind::WaterQuality => 185.0,
    }
}

fn series_color(base_hue: f32, index: usize) -> String {
    let hue = (base_hue + index as f32 * HUE_STEP) % 360.0;
    let hsl: Hsl = Hsl::new(hue, 0.65, 0.5);
    let rgb: Srgb = Srgb::from_color(hsl);

    format!("#{:x}", rgb.into_format::<u8>())
}

pub fn render(payload: &ChartPayload, format: Format, out: &mut impl Write) -> io::Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, payload)?;
            writeln!(out)
        }
        Format::Table => render_table(payload, out),
    }
}

fn render_table(payload: &ChartPayload, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{} | {} | {}", payload.title, payload.range, payload.subtitle)?;

    if let Some(error) = &payload.error {
        writeln!(out, "  unavailable: {error}")?;
    }

    if payload.labels.is_empty() {
        writeln!(out, "  (nothing to show)")?;
        return writeln!(out);
    }

    let label_width = payload.labels.iter().map(String::len).max().unwrap_or(0);
    let peak = payload
        .datasets
        .first()
        .map(|primary| {
            primary
                .values
                .iter()
                .flatten()
                .fold(0.0_f64, |acc, v| acc.max(v.abs()))
        })
        .unwrap_or(0.0);

    write!(out, "  {:label_width$}", "")?;
    for dataset in &payload.datasets {
        write!(out, " {:>10}", truncate(&dataset.name, 10))?;
    }
    writeln!(out)?;

    for (row, label) in payload.labels.iter().enumerate() {
        write!(out, "  {label:label_width$}")?;

        for dataset in &payload.datasets {
            match dataset.values.get(row).copied().flatten() {
                Some(value) => write!(out, " {value:>10.2}")?,
                None => write!(out, " {:>10}", "-")?,
            }
        }

        if let Some(Some(value)) = payload.datasets.first().and_then(|d| d.values.get(row)) {
            write!(out, "  {}", bar(*value, peak))?;
        }
        writeln!(out)?;
    }

    let unit = if payload.unit.is_empty() {
        String::new()
    } else {
        format!(" {}", payload.unit)
    };
    writeln!(
        out,
        "  total {:.2}{unit}, daily average {:.2}{unit}",
        payload.summary.total, payload.summary.average
    )?;
    if let Some((day, value)) = payload.summary.peak {
        writeln!(out, "  peak {value:.2}{unit} on {}", day.format("%b %-d, %Y"))?;
    }

    writeln!(
        out,
        "  [{}prev] [{}next]",
        if payload.nav.prev_enabled { "" } else { "x " },
        if payload.nav.next_enabled { "" } else { "x " },
    )?;
    writeln!(out)
}

fn bar(value: f64, peak: f64) -> String {
    if peak <= 0.0 {
        return String::new();
    }

    let width = (value.abs() / peak * BAR_WIDTH).round() as usize;
    "#".repeat(width)
}

fn truncate(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}
