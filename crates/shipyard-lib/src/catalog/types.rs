//! Shared catalog vocabulary: progress levels, tech tracks, ship classes and hulls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Technology tier gate. Equipment is available at or below the design's level.
pub type ProgressLevel = u8;

/// Optional technology branch, written as a single uppercase letter (e.g. `G`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TechTrack(char);

impl TechTrack {
    pub fn new(code: char) -> Result<Self> {
        if code.is_ascii_alphabetic() {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(Error::InvalidTechTrack {
                code: code.to_string(),
            })
        }
    }

    pub fn code(self) -> char {
        self.0
    }

    /// Parse a comma or whitespace separated list such as `"G, X"`.
    pub fn parse_list(value: &str) -> Result<Vec<Self>> {
        let mut tracks = Vec::new();
        for part in value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
        {
            let track: TechTrack = part.parse()?;
            if !tracks.contains(&track) {
                tracks.push(track);
            }
        }
        Ok(tracks)
    }
}

impl FromStr for TechTrack {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Self::new(code),
            _ => Err(Error::InvalidTechTrack {
                code: trimmed.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for TechTrack {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TechTrack> for String {
    fn from(track: TechTrack) -> Self {
        track.0.to_string()
    }
}

impl fmt::Display for TechTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Render a track list as `G, X` for messages.
pub fn format_tracks(tracks: &[TechTrack]) -> String {
    tracks
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Size class of a hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipClass {
    SmallCraft,
    Light,
    Medium,
    Heavy,
    SuperHeavy,
}

impl ShipClass {
    pub const ALL: [ShipClass; 5] = [
        ShipClass::SmallCraft,
        ShipClass::Light,
        ShipClass::Medium,
        ShipClass::Heavy,
        ShipClass::SuperHeavy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShipClass::SmallCraft => "small craft",
            ShipClass::Light => "light",
            ShipClass::Medium => "medium",
            ShipClass::Heavy => "heavy",
            ShipClass::SuperHeavy => "super-heavy",
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the label or the data-file spelling (`small craft`, `small_craft`).
impl FromStr for ShipClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        ShipClass::ALL
            .into_iter()
            .find(|class| class.label().replace('-', " ") == needle)
            .ok_or_else(|| Error::UnknownEquipment {
                kind: "ship class",
                name: s.to_string(),
                suggestions: ShipClass::ALL.iter().map(|c| c.label().to_string()).collect(),
            })
    }
}

/// Base chassis of a design. Read-only input to every calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hull {
    pub id: String,
    pub name: String,
    pub ship_class: ShipClass,
    pub hull_points: u32,
    pub crew: u32,
    pub cost: f64,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Common accessors over every catalog list entry.
pub trait CatalogEntry {
    /// Singular noun used in error messages, e.g. `"engine type"`.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn progress_level(&self) -> ProgressLevel;
    fn tech_tracks(&self) -> &[TechTrack];

    /// Hull classes allowed to mount the entry; empty means every class.
    fn ship_classes(&self) -> &[ShipClass] {
        &[]
    }

    /// Check identifiers and numeric fields after decoding.
    fn validate(&self) -> Result<()>;
}

/// Implement [`CatalogEntry`] for a struct with the standard identity fields.
macro_rules! catalog_entry {
    ($ty:ty, $kind:literal) => {
        impl $crate::catalog::CatalogEntry for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn progress_level(&self) -> $crate::catalog::ProgressLevel {
                self.progress_level
            }

            fn tech_tracks(&self) -> &[$crate::catalog::TechTrack] {
                &self.tech_tracks
            }

            fn validate(&self) -> $crate::error::Result<()> {
                self.validate_fields()
            }
        }
    };
    ($ty:ty, $kind:literal, ship_classes) => {
        impl $crate::catalog::CatalogEntry for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn progress_level(&self) -> $crate::catalog::ProgressLevel {
                self.progress_level
            }

            fn tech_tracks(&self) -> &[$crate::catalog::TechTrack] {
                &self.tech_tracks
            }

            fn ship_classes(&self) -> &[$crate::catalog::ShipClass] {
                &self.ship_classes
            }

            fn validate(&self) -> $crate::error::Result<()> {
                self.validate_fields()
            }
        }
    };
}

pub(crate) use catalog_entry;

/// Reject empty identifiers and non-finite or negative numbers.
pub(crate) fn check_entry(kind: &str, id: &str, name: &str, fields: &[(f64, &str)]) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::CatalogValidation {
            message: format!("{kind} id must not be empty"),
        });
    }
    if name.trim().is_empty() {
        return Err(Error::CatalogValidation {
            message: format!("{kind} '{id}' name must not be empty"),
        });
    }

    for (value, field) in fields {
        if !value.is_finite() || *value < 0.0 {
            return Err(Error::CatalogValidation {
                message: format!("{kind} '{id}': {field} must be a finite non-negative number"),
            });
        }
    }

    Ok(())
}

impl Hull {
    fn validate_fields(&self) -> Result<()> {
        check_entry(Self::KIND, &self.id, &self.name, &[(self.cost, "cost")])?;
        if self.hull_points == 0 {
            return Err(Error::CatalogValidation {
                message: format!("hull '{}': hull_points must be positive", self.id),
            });
        }
        Ok(())
    }
}

catalog_entry!(Hull, "hull");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tech_track_normalizes_case_and_rejects_words() {
        assert_eq!("g".parse::<TechTrack>().expect("letter").code(), 'G');
        assert!("GX".parse::<TechTrack>().is_err());
        assert!("7".parse::<TechTrack>().is_err());
    }

    #[test]
    fn parse_list_deduplicates() {
        let tracks = TechTrack::parse_list("G, x g").expect("valid list");
        assert_eq!(format_tracks(&tracks), "G, X");
    }

    #[test]
    fn tech_track_round_trips_as_string() {
        let json = serde_json::to_string(&TechTrack::new('a').expect("letter")).expect("encode");
        assert_eq!(json, "\"A\"");
        let err = serde_json::from_str::<TechTrack>("\"AB\"");
        assert!(err.is_err());
    }

    #[test]
    fn ship_class_parses_either_spelling() {
        assert_eq!("small_craft".parse::<ShipClass>().expect("class"), ShipClass::SmallCraft);
        assert_eq!("Super-Heavy".parse::<ShipClass>().expect("class"), ShipClass::SuperHeavy);
        assert!("capital".parse::<ShipClass>().is_err());
    }
}
