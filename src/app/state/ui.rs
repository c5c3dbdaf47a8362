//! UI-Indikatoren: Lade- und Verfügbarkeits-Zustand der Datensätze.

use std::collections::BTreeSet;

use crate::data::DatasetKey;

/// Vom Presentation-Layer konsumierte Indikatoren.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Datensätze, auf die die aktuelle Szene wartet (Spinner).
    pub loading_datasets: BTreeSet<DatasetKey>,
    /// Datensätze, die für die aktuelle Szene nicht verfügbar sind
    /// ("keine Daten vorhanden"-Hinweis).
    pub unavailable_datasets: BTreeSet<DatasetKey>,
}

impl UiState {
    /// Erstellt den leeren UI-Zustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gibt `true` zurück, solange die Szene auf Daten wartet.
    pub fn is_loading(&self) -> bool {
        !self.loading_datasets.is_empty()
    }
}
