//! Whole-design commands: create, summarize, check, remove and retarget.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use shipyard_cli::output::{render_report, render_summary};
use shipyard_lib::catalog::format_tracks;
use shipyard_lib::{
    audit_technology, DesignConstraints, ProgressLevel, ResolvedDesign, ShipDesign,
    TechTrack, ValidationIssue, ValidationOutcome, ValidationReport,
};

use super::{commit, load_design, save_design, ChangeOutcome, Session};

pub struct NewDesign<'a> {
    pub name: &'a str,
    pub hull: &'a str,
    pub progress_level: ProgressLevel,
    pub tech_tracks: Vec<TechTrack>,
    pub force: bool,
}

pub fn handle_new(session: &Session, path: &Path, request: NewDesign<'_>) -> Result<()> {
    if path.exists() && !request.force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    let hull = session.catalog.hull(request.hull)?;
    let constraints = DesignConstraints::new(request.progress_level, request.tech_tracks);
    if !constraints.allows(hull) {
        let report = ValidationReport::from(ValidationIssue::UnavailableTechnology {
            name: hull.name.clone(),
            progress_level: hull.progress_level,
            tracks: format_tracks(&hull.tech_tracks),
        });
        session.reject_blocking("design creation", &report)?;
    }

    let design = ShipDesign::new(request.name, hull, constraints);
    save_design(&design, path)?;
    session.emit(&design, |out, palette| {
        writeln!(
            out,
            "Created {}{}{} on a {} hull at {}",
            palette.white_bold,
            design.name,
            palette.reset,
            hull.name,
            path.display()
        )
    })
}

pub fn handle_summary(session: &Session, path: &Path) -> Result<()> {
    let design = load_design(path)?;
    let resolved = ResolvedDesign::resolve(&design, &session.catalog)?;
    let summary = resolved.summary();
    session.emit(&summary, |out, palette| render_summary(out, &summary, palette))
}

#[derive(Debug, Serialize)]
struct CheckOutcome {
    #[serde(flatten)]
    outcome: ValidationOutcome,
    warnings_only: bool,
}

/// Exits non-zero only for blocking errors; warnings are listed but pass.
pub fn handle_check(session: &Session, path: &Path) -> Result<()> {
    let design = load_design(path)?;
    let resolved = ResolvedDesign::resolve(&design, &session.catalog)?;
    let report = resolved.check();

    let outcome = CheckOutcome {
        outcome: report.outcome(),
        warnings_only: !report.is_valid() && !report.has_blocking_errors(),
    };
    session.emit(&outcome, |out, palette| {
        if report.is_valid() {
            writeln!(out, "{}No issues found.{}", palette.green, palette.reset)
        } else {
            render_report(out, &report, palette)
        }
    })?;

    if report.has_blocking_errors() {
        bail!("design {} has blocking errors", design.name);
    }
    Ok(())
}

pub fn handle_remove(session: &Session, path: &Path, id: &str) -> Result<()> {
    let mut design = load_design(path)?;
    design.remove_installation(id)?;
    commit(
        session,
        &design,
        path,
        ChangeOutcome {
            action: "Removed",
            id,
            name: id,
            warnings: Vec::new(),
        },
        &ValidationReport::new(),
    )
}

/// Change the design's technology constraints.
///
/// Installed items the new constraints exclude stay installed and are listed
/// as warnings.
pub fn handle_constraints(
    session: &Session,
    path: &Path,
    progress_level: Option<ProgressLevel>,
    tech_tracks: Option<Vec<TechTrack>>,
) -> Result<()> {
    let mut design = load_design(path)?;
    if let Some(level) = progress_level {
        design.constraints.progress_level = level;
    }
    if let Some(tracks) = tech_tracks {
        design.constraints.tech_tracks = tracks;
    }

    let report = audit_technology(&ResolvedDesign::resolve(&design, &session.catalog)?);
    let label = format!(
        "PL {} [{}]",
        design.constraints.progress_level,
        format_tracks(&design.constraints.tech_tracks)
    );
    commit(
        session,
        &design,
        path,
        ChangeOutcome {
            action: "Constraints set to",
            id: &design.hull_id,
            name: &label,
            warnings: report.messages(),
        },
        &report,
    )
}
