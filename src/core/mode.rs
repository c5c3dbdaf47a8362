//! Verkehrsmodi und Modus-Filter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::color::Color;

/// Verkehrsmodus der Mikrozensus- und MATSim-Daten.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Car,
    CarPassenger,
    Pt,
    Bike,
    Walk,
}

impl Mode {
    /// Alle Modi in stabiler Reihenfolge (entspricht den Plot-Farben).
    pub const ALL: [Self; 5] = [
        Self::Car,
        Self::CarPassenger,
        Self::Pt,
        Self::Bike,
        Self::Walk,
    ];

    /// Attributwert in den Datensätzen (`modes`, `modes_list`, `mode`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::CarPassenger => "car_passenger",
            Self::Pt => "pt",
            Self::Bike => "bike",
            Self::Walk => "walk",
        }
    }

    /// Parst einen Attributwert.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "car" => Some(Self::Car),
            "car_passenger" => Some(Self::CarPassenger),
            "pt" => Some(Self::Pt),
            "bike" => Some(Self::Bike),
            "walk" => Some(Self::Walk),
            _ => None,
        }
    }

    /// Grundfarbe des Modus (identisch zu den Sidebar-Plots).
    pub fn base_color(self) -> Color {
        match self {
            Self::Car => Color::rgb(0x63, 0x6e, 0xfa),
            Self::CarPassenger => Color::rgb(0xef, 0x55, 0x3b),
            Self::Pt => Color::rgb(0x00, 0xcc, 0x96),
            Self::Bike => Color::rgb(0xab, 0x63, 0xfa),
            Self::Walk => Color::rgb(0xff, 0xa1, 0x5a),
        }
    }
}

/// Modus-Einschränkung für Netzwerk- und Transit-Layer.
///
/// `All` ist der Sentinel "keine Einschränkung" und entfernt jeden Filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeFilter {
    All,
    Only(BTreeSet<Mode>),
}

impl ModeFilter {
    /// Erstellt einen Filter auf genau einen Modus.
    pub fn single(mode: Mode) -> Self {
        Self::Only(BTreeSet::from([mode]))
    }

    /// Erstellt einen Filter aus einer Modus-Liste.
    ///
    /// Eine leere Liste fällt auf `All` zurück (entspricht dem Verhalten
    /// der Sidebar, die bei leerer Auswahl auf "all" zurücksetzt).
    pub fn from_modes(modes: impl IntoIterator<Item = Mode>) -> Self {
        let set: BTreeSet<Mode> = modes.into_iter().collect();
        if set.is_empty() {
            Self::All
        } else {
            Self::Only(set)
        }
    }

    /// Gibt `true` zurück, wenn keine Einschränkung aktiv ist.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Prüft, ob ein Modus den Filter passiert.
    pub fn allows(&self, mode: Mode) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(&mode),
        }
    }

    /// Modi in stabiler Reihenfolge; leer bei `All`.
    pub fn modes(&self) -> Vec<Mode> {
        match self {
            Self::All => Vec::new(),
            Self::Only(set) => set.iter().copied().collect(),
        }
    }
}

impl Default for ModeFilter {
    fn default() -> Self {
        Self::All
    }
}
