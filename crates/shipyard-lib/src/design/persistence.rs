use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

use super::ShipDesign;

/// Version written into every save file.
pub const SAVE_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveFileRef<'a> {
    format_version: u32,
    design: &'a ShipDesign,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveFile {
    format_version: u32,
    design: ShipDesign,
}

impl ShipDesign {
    /// Read a design saved by [`ShipDesign::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let file: SaveFile = serde_json::from_slice(&bytes)?;
        if file.format_version != SAVE_FORMAT_VERSION {
            return Err(Error::DesignValidation {
                message: format!(
                    "unsupported format version {} (expected {})",
                    file.format_version, SAVE_FORMAT_VERSION
                ),
            });
        }
        debug!(path = %path.display(), name = %file.design.name, "loaded design");
        Ok(file.design)
    }

    /// Write the design as pretty JSON, replacing `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(
            &mut tmp,
            &SaveFileRef {
                format_version: SAVE_FORMAT_VERSION,
                design: self,
            },
        )?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(path).map_err(|err| Error::Io(err.error))?;

        debug!(path = %path.display(), name = %self.name, "saved design");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DesignConstraints, TechTrack};
    use crate::systems::InstalledEngine;
    use crate::test_helpers::{engine_type, hull_with_points};
    use tempfile::tempdir;

    #[test]
    fn save_then_load_preserves_the_design() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("ships").join("lancer.json");

        let constraints = DesignConstraints::new(7, vec![TechTrack::new('G').expect("track")]);
        let mut design = ShipDesign::new("Lancer", &hull_with_points(100), constraints);
        design
            .engines
            .push(InstalledEngine::new(&engine_type("ion", 6, 10.0), 10));

        design.save(&path).expect("save");
        let loaded = ShipDesign::load(&path).expect("load");
        assert_eq!(loaded, design);
    }

    #[test]
    fn rejects_unknown_format_versions() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("future.json");
        fs::write(
            &path,
            r#"{"formatVersion": 99, "design": {"name": "X", "hullId": "h",
                "constraints": {"progressLevel": 6}}}"#,
        )
        .expect("write");
        assert!(matches!(
            ShipDesign::load(&path),
            Err(Error::DesignValidation { .. })
        ));
    }
}
