//! Output formatting for designs, reports and catalog listings.
//!
//! Text renderers write to any [`Write`] so they can be unit tested; the
//! command handlers pass a locked stdout.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use shipyard_lib::systems::FuelConsumerKind;
use shipyard_lib::{DesignSummary, Severity, ValidationReport};

use crate::terminal::{format_cost, ColorPalette};

/// Output format for every command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Render any serializable value as pretty JSON followed by a newline.
pub fn render_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}

/// One validation message per line, errors in red and warnings in yellow.
pub fn render_report(
    out: &mut impl Write,
    report: &ValidationReport,
    palette: &ColorPalette,
) -> io::Result<()> {
    for issue in report.issues() {
        let (color, tag) = match issue.severity() {
            Severity::Error => (palette.red, "error"),
            Severity::Warning => (palette.yellow, "warning"),
        };
        writeln!(out, "{color}{tag}{}: {issue}", palette.reset)?;
    }
    Ok(())
}

/// A catalog listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRow {
    pub id: String,
    pub name: String,
    pub progress_level: u8,
    pub tracks: String,
    pub detail: String,
}

pub fn render_catalog(
    out: &mut impl Write,
    kind: &str,
    rows: &[CatalogRow],
    palette: &ColorPalette,
) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No {kind} available.");
    }
    writeln!(out, "Available {kind} ({}):", rows.len())?;
    writeln!(
        out,
        "{:<20} {:<24} {:>3} {:<8} {}",
        "ID", "Name", "PL", "Tracks", "Details"
    )?;
    for row in rows {
        writeln!(
            out,
            "{gray}{:<20}{reset} {white}{:<24}{reset} {:>3} {:<8} {}",
            row.id,
            row.name,
            row.progress_level,
            row.tracks,
            row.detail,
            gray = palette.gray,
            white = palette.white_bold,
            reset = palette.reset,
        )?;
    }
    Ok(())
}

/// Multi-section design summary.
pub fn render_summary(
    out: &mut impl Write,
    summary: &DesignSummary,
    palette: &ColorPalette,
) -> io::Result<()> {
    let p = palette;
    let budget = &summary.budget;

    writeln!(
        out,
        "{}{}{} ({}, {} hull, {} HP)",
        p.white_bold, summary.name, p.reset, summary.hull.name, summary.hull.ship_class,
        summary.hull.hull_points
    )?;
    writeln!(
        out,
        "Progress level {}{}",
        summary.constraints.progress_level,
        if summary.constraints.tech_tracks.is_empty() {
            String::new()
        } else {
            format!(
                ", tech tracks {}",
                shipyard_lib::catalog::format_tracks(&summary.constraints.tech_tracks)
            )
        }
    )?;

    let power_color = if summary.power_remaining < 0 { p.red } else { p.green };
    writeln!(
        out,
        "Hull points: {}/{} used ({} free)",
        budget.hull_points_used, budget.hull_points_total, summary.hull_points_remaining
    )?;
    writeln!(
        out,
        "Power: {} generated, {} used ({power_color}{}{} spare)",
        budget.power_generated, budget.power_used, summary.power_remaining, p.reset
    )?;
    writeln!(out, "Total cost: {}", format_cost(summary.total_cost))?;
    writeln!(out, "Acceleration: {}", summary.acceleration)?;

    for fuel in &summary.fuel {
        let kind = match fuel.kind {
            FuelConsumerKind::Engine => "engine",
            FuelConsumerKind::PowerPlant => "power plant",
        };
        writeln!(
            out,
            "Fuel ({kind} {}): {} HP of tanks, endurance {:.2}",
            fuel.name, fuel.fuel_hull_points, fuel.endurance
        )?;
    }

    let sensors = &summary.sensors;
    writeln!(
        out,
        "Sensors: {} installed, tracking {}, arcs [{}]{}",
        sensors.count,
        sensors.tracking,
        sensors
            .arcs_covered
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        if sensors.has_active_sensor { "" } else { " (no active sensor)" }
    )?;
    writeln!(
        out,
        "Weapons: {} installations, {} guns",
        summary.weapons.installations, summary.weapons.guns
    )?;
    let ordnance = &summary.ordnance;
    writeln!(
        out,
        "Ordnance: {} launchers, capacity {}/{} used, {} designs, {} rounds",
        ordnance.launchers,
        ordnance.used_capacity,
        ordnance.total_capacity,
        ordnance.designs,
        ordnance.rounds_loaded
    )?;

    let support = &summary.support;
    writeln!(
        out,
        "Life support: covers {} of {} HP",
        support.life_support_coverage, support.life_support_required
    )?;
    writeln!(
        out,
        "Quarters: crew {}/{}, troops {}, passengers {}, suspended {}",
        support.accommodations.crew,
        support.crew_required,
        support.accommodations.troop,
        support.accommodations.passenger,
        support.accommodations.suspended
    )?;
    writeln!(
        out,
        "Consumption: {} aboard, {} fed by stores, {} recycled, {} on supplies",
        support.consumption.population,
        support.consumption.fed,
        support.consumption.recycled,
        support.consumption.effective
    )?;
    if let Some(gravity) = &support.gravity {
        writeln!(out, "Gravity: {gravity}")?;
    }

    if !summary.installations.is_empty() {
        writeln!(out)?;
        writeln!(out, "Installations:")?;
        for line in &summary.installations {
            let power = if line.generates_power {
                format!("+{}", line.footprint.power)
            } else {
                line.footprint.power.to_string()
            };
            writeln!(
                out,
                " - {}{}{} {} [{}] {} HP, {} power, {}",
                p.gray,
                line.id,
                p.reset,
                line.name,
                line.category,
                line.footprint.hull_points,
                power,
                format_cost(line.footprint.cost)
            )?;
        }
    }
    Ok(())
}
