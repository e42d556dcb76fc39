//! Shared table rendering for sensor readings.

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use jaalee_core::{Metric, SensorState};

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "Sensor")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Reading")]
    reading: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&SensorState> for SensorRow {
    fn from(state: &SensorState) -> Self {
        Self {
            name: state.name.clone(),
            mac: state.mac.clone(),
            model: state.model.clone().unwrap_or_else(|| "-".into()),
            reading: format_reading(state),
            status: if state.available {
                "available".green().to_string()
            } else {
                "unavailable".red().to_string()
            },
        }
    }
}

/// Format a normalized value with its unit, matching the metric's
/// display precision (temperature one decimal, humidity whole percent).
fn format_reading(state: &SensorState) -> String {
    let Some(value) = state.value else {
        return "-".into();
    };
    match state.metric {
        Metric::Temperature => format!("{value:.1} {}", state.unit),
        Metric::Humidity => format!("{value:.0} {}", state.unit),
        Metric::Power => format!("{value} {}", state.unit),
    }
}

/// Render sensor states as a table, or a placeholder note when the
/// account has no entities yet.
pub fn render_states(states: &[SensorState]) -> String {
    if states.is_empty() {
        return "no sensors reported yet".dimmed().to_string();
    }
    let rows: Vec<SensorRow> = states.iter().map(SensorRow::from).collect();
    Table::new(rows).with(Style::sharp()).to_string()
}
