#![allow(dead_code)]

use std::path::PathBuf;

use shipyard_lib::{Catalog, DesignConstraints, ShipDesign};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn fixture_catalog() -> Catalog {
    Catalog::from_path(&fixtures_dir().join("catalog.json")).expect("load fixture catalog.json")
}

/// An empty PL 6 design on the 100 HP frigate hull.
pub fn frigate(catalog: &Catalog) -> ShipDesign {
    let hull = catalog.hull("frigate").expect("frigate present in fixtures");
    ShipDesign::new("Lancer", hull, DesignConstraints::new(6, Vec::new()))
}
