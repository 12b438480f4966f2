// Subcommand handlers.
//
// main.rs parses arguments and dispatches to these modules; each handler loads
// what it needs through `Session` and writes its result in the chosen format.

pub mod catalog;
pub mod design;
pub mod install;
pub mod ordnance;

use std::io::{self, StdoutLock, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use shipyard_cli::output::{render_json, render_report, OutputFormat};
use shipyard_cli::terminal::ColorPalette;
use shipyard_lib::{load_catalog, Catalog, CatalogOrigin, ShipDesign, ValidationReport};

/// Per-invocation state: the resolved catalog and output settings.
pub struct Session {
    pub catalog: Catalog,
    pub format: OutputFormat,
    pub palette: ColorPalette,
}

impl Session {
    pub fn open(catalog_path: Option<&Path>, format: OutputFormat) -> Result<Self> {
        let (catalog, origin) =
            load_catalog(catalog_path).context("failed to load the equipment catalog")?;
        if let CatalogOrigin::File(path) = &origin {
            tracing::debug!(path = %path.display(), "catalog ready");
        }
        Ok(Self {
            catalog,
            format,
            palette: ColorPalette::detect(),
        })
    }

    /// Write `value` as JSON, or call `text` with stdout.
    pub fn emit<T, F>(&self, value: &T, text: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&mut StdoutLock<'static>, &ColorPalette) -> io::Result<()>,
    {
        let mut out = io::stdout().lock();
        match self.format {
            OutputFormat::Json => render_json(&mut out, value)?,
            OutputFormat::Text => text(&mut out, &self.palette)?,
        }
        out.flush()?;
        Ok(())
    }

    /// Print the report and fail when it holds a blocking error.
    pub fn reject_blocking(&self, action: &str, report: &ValidationReport) -> Result<()> {
        if !report.has_blocking_errors() {
            return Ok(());
        }
        self.emit(&report.outcome(), |out, palette| {
            render_report(out, report, palette)
        })?;
        bail!("{action} rejected");
    }
}

pub fn load_design(path: &Path) -> Result<ShipDesign> {
    ShipDesign::load(path).with_context(|| format!("failed to load design from {}", path.display()))
}

pub fn save_design(design: &ShipDesign, path: &Path) -> Result<()> {
    design
        .save(path)
        .with_context(|| format!("failed to save design to {}", path.display()))
}

/// JSON shape of a successful change to a design.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeOutcome<'a> {
    pub action: &'a str,
    pub id: &'a str,
    pub name: &'a str,
    pub warnings: Vec<String>,
}

/// Save `design` and report the change with any non-blocking warnings.
pub fn commit(
    session: &Session,
    design: &ShipDesign,
    path: &Path,
    outcome: ChangeOutcome<'_>,
    report: &ValidationReport,
) -> Result<()> {
    save_design(design, path)?;
    session.emit(&outcome, |out, palette| {
        writeln!(
            out,
            "{} {}{}{} ({}{}{})",
            outcome.action,
            palette.white_bold,
            outcome.name,
            palette.reset,
            palette.gray,
            outcome.id,
            palette.reset
        )?;
        render_report(out, report, palette)
    })
}
