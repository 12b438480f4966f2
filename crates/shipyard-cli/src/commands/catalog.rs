//! Catalog browsing.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use shipyard_cli::output::{render_catalog, CatalogRow};
use shipyard_cli::terminal::format_cost;
use shipyard_lib::catalog::{
    filter_available, filter_for_ship_class, format_tracks, sort_by_progress_level, StoreEffect,
};
use shipyard_lib::{CatalogEntry, ProgressLevel, ShipClass, TechTrack};

use super::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogKind {
    Hulls,
    Engines,
    PowerPlants,
    Sensors,
    Weapons,
    Mounts,
    Launchers,
    Propulsion,
    Warheads,
    Guidance,
    LifeSupport,
    Accommodations,
    Stores,
    Gravity,
}

/// Optional browse restrictions. Without a progress level every entry is listed.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub progress_level: Option<ProgressLevel>,
    pub tech_tracks: Vec<TechTrack>,
    pub ship_class: Option<ShipClass>,
}

pub fn handle_catalog(session: &Session, kind: CatalogKind, filter: &CatalogFilter) -> Result<()> {
    let catalog = &session.catalog;
    match kind {
        CatalogKind::Hulls => list(session, "hulls", &catalog.hulls, filter, |h| {
            format!(
                "{}, {} HP, crew {}, {}",
                h.ship_class,
                h.hull_points,
                h.crew,
                format_cost(h.cost)
            )
        }),
        CatalogKind::Engines => list(session, "engines", &catalog.engines, filter, |e| {
            format!(
                "min {} HP, {} power/HP, {}/HP{}",
                e.sizing.min_size,
                e.sizing.power_per_hull_point,
                format_cost(e.sizing.cost_per_hull_point),
                if e.sizing.requires_fuel() { ", fuel" } else { "" }
            )
        }),
        CatalogKind::PowerPlants => {
            list(session, "power plants", &catalog.power_plants, filter, |p| {
                format!(
                    "min {} HP, generates {}/HP, {}/HP{}",
                    p.sizing.min_size,
                    p.sizing.power_per_hull_point,
                    format_cost(p.sizing.cost_per_hull_point),
                    if p.sizing.requires_fuel() { ", fuel" } else { "" }
                )
            })
        }
        CatalogKind::Sensors => list(session, "sensors", &catalog.sensors, filter, |s| {
            format!(
                "{:?}, {} HP, {} power, {} arc(s), {}",
                s.category,
                s.unit.hull_points,
                s.unit.power_required,
                s.arcs_covered,
                format_cost(s.unit.cost)
            )
            .to_lowercase()
        }),
        CatalogKind::Weapons => list(session, "weapons", &catalog.weapons, filter, |w| {
            format!(
                "{} {:?}, {} HP, {} power, {}",
                w.category,
                w.firepower,
                w.unit.hull_points,
                w.unit.power_required,
                format_cost(w.unit.cost)
            )
        }),
        CatalogKind::Mounts => list_mounts(session),
        CatalogKind::Launchers => {
            list(session, "launch systems", &catalog.launch_systems, filter, |l| {
                format!(
                    "capacity {}, {} HP, {}, carries {}",
                    l.capacity,
                    l.unit.hull_points,
                    format_cost(l.unit.cost),
                    l.ordnance
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("/")
                )
            })
        }
        CatalogKind::Propulsion => {
            list(session, "propulsion", &catalog.propulsion, filter, |p| {
                format!(
                    "{:?} size, accuracy {:+}, {}",
                    p.size,
                    p.accuracy_modifier,
                    format_cost(p.cost)
                )
            })
        }
        CatalogKind::Warheads => list(session, "warheads", &catalog.warheads, filter, |w| {
            format!("accuracy {:+}, {}", w.accuracy_modifier, format_cost(w.cost))
        }),
        CatalogKind::Guidance => list(session, "guidance", &catalog.guidance, filter, |g| {
            format!("accuracy {:+}, {}", g.accuracy_modifier, format_cost(g.cost))
        }),
        CatalogKind::LifeSupport => {
            list(session, "life support", &catalog.life_support, filter, |l| {
                format!(
                    "covers {} HP per unit, {} HP, {}",
                    l.coverage_hull_points,
                    l.unit.hull_points,
                    format_cost(l.unit.cost)
                )
            })
        }
        CatalogKind::Accommodations => {
            list(session, "accommodations", &catalog.accommodations, filter, |a| {
                format!(
                    "{:?} x{}, {} HP, {}",
                    a.category,
                    a.capacity,
                    a.unit.hull_points,
                    format_cost(a.unit.cost)
                )
                .to_lowercase()
            })
        }
        CatalogKind::Stores => list(session, "store systems", &catalog.store_systems, filter, |s| {
            let effect = match s.effect {
                StoreEffect::FeedsPeople { people } => format!("feeds {people}"),
                StoreEffect::ReducesConsumption { people } => format!("recycles for {people}"),
                StoreEffect::AddsStoreDays { days } => format!("+{days} store days"),
            };
            format!(
                "{effect}, {} HP, {}",
                s.unit.hull_points,
                format_cost(s.unit.cost)
            )
        }),
        CatalogKind::Gravity => {
            list(session, "gravity systems", &catalog.gravity_systems, filter, |g| {
                format!("{:?}, {}% of hull", g.kind, g.hull_percentage).to_lowercase()
            })
        }
    }
}

fn list<T, F>(
    session: &Session,
    label: &str,
    entries: &[T],
    filter: &CatalogFilter,
    detail: F,
) -> Result<()>
where
    T: CatalogEntry + Serialize,
    F: Fn(&T) -> String,
{
    let mut selected: Vec<&T> = match filter.progress_level {
        Some(level) => filter_available(entries, level, &filter.tech_tracks),
        None => entries.iter().collect(),
    };
    if let Some(class) = filter.ship_class {
        selected = filter_for_ship_class(selected, class);
    }
    sort_by_progress_level(&mut selected);

    let rows: Vec<CatalogRow> = selected
        .iter()
        .map(|entry| CatalogRow {
            id: entry.id().to_string(),
            name: entry.name().to_string(),
            progress_level: entry.progress_level(),
            tracks: format_tracks(entry.tech_tracks()),
            detail: detail(*entry),
        })
        .collect();

    session.emit(&selected, |out, palette| {
        render_catalog(out, label, &rows, palette)
    })
}

fn list_mounts(session: &Session) -> Result<()> {
    let mounts = &session.catalog.weapon_mounts;
    session.emit(mounts, |out, _| {
        use std::io::Write;

        writeln!(out, "Weapon mounts ({}):", mounts.len())?;
        for rule in mounts {
            writeln!(
                out,
                "{:<10} HP x{}, cost x{}, {} arc(s){}{}",
                rule.mount.label(),
                rule.hp_multiplier,
                rule.cost_multiplier,
                rule.standard_arcs,
                if rule.allows_zero_arcs {
                    format!(" + {} zero", rule.zero_arcs)
                } else {
                    String::new()
                },
                rule.min_progress_level
                    .map(|pl| format!(", PL {pl}+"))
                    .unwrap_or_default()
            )?;
        }
        Ok(())
    })
}
