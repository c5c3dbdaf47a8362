//! Geografische Bounding-Box in WGS84-Koordinaten.

use glam::DVec2;

use super::geojson::{Feature, Geometry};

/// Achsenparallele Bounding-Box (Länge/Breite in Grad).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoBounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl GeoBounds {
    /// Erstellt eine Box aus zwei Eckpunkten `[west, süd]` / `[ost, nord]`.
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Berechnet die Box über alle Koordinaten einer Geometrie.
    pub fn of_geometry(geometry: &Geometry) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        geometry.for_each_coordinate(|c| {
            bounds = Some(match bounds {
                None => Self { min: c, max: c },
                Some(b) => Self {
                    min: b.min.min(c),
                    max: b.max.max(c),
                },
            });
        });
        bounds
    }

    /// Berechnet die gemeinsame Box mehrerer Features.
    pub fn of_features<'a>(features: impl IntoIterator<Item = &'a Feature>) -> Option<Self> {
        features
            .into_iter()
            .filter_map(|f| Self::of_geometry(&f.geometry))
            .reduce(|a, b| a.union(b))
    }

    /// Vereinigt zwei Boxen.
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Mittelpunkt der Box.
    pub fn center(self) -> DVec2 {
        (self.min + self.max) * 0.5
    }
}
