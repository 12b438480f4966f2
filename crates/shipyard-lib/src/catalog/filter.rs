//! Progress-level, tech-track and ship-class filtering of catalog lists.

use serde::{Deserialize, Serialize};

use super::types::{CatalogEntry, ProgressLevel, ShipClass, TechTrack};

/// Technology constraints a design is built under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignConstraints {
    pub progress_level: ProgressLevel,
    /// Enabled tech tracks. An empty list places no track restriction.
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
}

impl DesignConstraints {
    pub fn new(progress_level: ProgressLevel, tech_tracks: Vec<TechTrack>) -> Self {
        Self {
            progress_level,
            tech_tracks,
        }
    }

    pub fn allows<T: CatalogEntry>(&self, entry: &T) -> bool {
        is_available(entry, self.progress_level, &self.tech_tracks)
    }
}

/// `true` when `entry` is at or below `progress_level` and every required
/// track is enabled (or no tracks are enabled at all).
pub fn is_available<T: CatalogEntry>(
    entry: &T,
    progress_level: ProgressLevel,
    tech_tracks: &[TechTrack],
) -> bool {
    entry.progress_level() <= progress_level
        && (tech_tracks.is_empty()
            || entry
                .tech_tracks()
                .iter()
                .all(|required| tech_tracks.contains(required)))
}

/// Keep the entries available under the given constraints, preserving order.
pub fn filter_available<'a, T: CatalogEntry>(
    types: &'a [T],
    progress_level: ProgressLevel,
    tech_tracks: &[TechTrack],
) -> Vec<&'a T> {
    types
        .iter()
        .filter(|entry| is_available(*entry, progress_level, tech_tracks))
        .collect()
}

/// Keep the entries a hull of `ship_class` may mount.
pub fn filter_for_ship_class<'a, T: CatalogEntry>(
    types: impl IntoIterator<Item = &'a T>,
    ship_class: ShipClass,
) -> Vec<&'a T> {
    types
        .into_iter()
        .filter(|entry| allows_ship_class(*entry, ship_class))
        .collect()
}

pub fn allows_ship_class<T: CatalogEntry>(entry: &T, ship_class: ShipClass) -> bool {
    entry.ship_classes().is_empty() || entry.ship_classes().contains(&ship_class)
}

/// Stable ascending sort by progress level.
pub fn sort_by_progress_level<T: CatalogEntry>(types: &mut [&T]) {
    types.sort_by_key(|entry| entry.progress_level());
}

/// Catalog browse list for a design: filtered, class-restricted and sorted.
pub fn available_for_design<'a, T: CatalogEntry>(
    types: &'a [T],
    constraints: &DesignConstraints,
    ship_class: ShipClass,
) -> Vec<&'a T> {
    let available = filter_available(types, constraints.progress_level, &constraints.tech_tracks);
    let mut entries = filter_for_ship_class(available, ship_class);
    sort_by_progress_level(&mut entries);
    entries
}
