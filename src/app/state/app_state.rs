//! Hauptzustand der Anwendung.

use serde_json::Map;

use crate::app::CommandLog;
use crate::core::{CantonRegistry, GeoBounds};
use crate::data::{DatasetKey, FetchRequest, GeometryCache};
use crate::shared::DashboardOptions;

use super::selection::SelectionState;
use super::ui::UiState;
use super::view::ViewState;

/// Hauptzustand der Anwendung.
pub struct AppState {
    /// Laufzeit-Optionen (Daten-Root, Paddings, Zeiten).
    pub options: DashboardOptions,
    /// Registry der Kantone (aus dem Grenzen-Datensatz aufgebaut).
    pub registry: CantonRegistry,
    /// Selection-State.
    pub selection: SelectionState,
    /// View-State.
    pub view: ViewState,
    /// UI-Indikatoren.
    pub ui: UiState,
    /// Session-Cache der Datensätze.
    pub cache: GeometryCache,
    /// Outbox der Fetch-Aufträge; der Host entnimmt und führt sie aus.
    pub fetch_outbox: Vec<FetchRequest>,
    /// Verlauf ausgeführter Commands.
    pub command_log: CommandLog,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Erstellt einen neuen, leeren App-State.
    pub fn new() -> Self {
        Self {
            options: DashboardOptions::default(),
            registry: CantonRegistry::default(),
            selection: SelectionState::new(),
            view: ViewState::new(),
            ui: UiState::new(),
            cache: GeometryCache::new(),
            fetch_outbox: Vec::new(),
            command_log: CommandLog::new(),
        }
    }

    /// Erstellt einen App-State mit vorgegebenen Optionen.
    pub fn with_options(options: DashboardOptions) -> Self {
        Self {
            options,
            ..Self::new()
        }
    }

    /// Entnimmt die aufgelaufenen Fetch-Aufträge (Host-Schnittstelle).
    pub fn take_pending_fetches(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.fetch_outbox)
    }

    /// Bounding-Box des aktiven Kantons, falls bekannt.
    pub fn active_canton_bounds(&self) -> Option<GeoBounds> {
        self.selection
            .active_canton
            .as_deref()
            .and_then(|name| self.registry.bounds(name))
    }

    /// Attribute der selektierten Segmente für die Attributtabelle,
    /// aufgelöst aus dem gecachten Netzwerk-Datensatz (Single Source of
    /// Truth statt Rücklesen von der Oberfläche).
    pub fn selected_segment_properties(&self) -> Vec<Map<String, serde_json::Value>> {
        let Some(canton) = self.selection.active_canton.as_deref() else {
            return Vec::new();
        };
        let Some(network) = self
            .cache
            .features(&DatasetKey::Network(canton.to_string()))
        else {
            return Vec::new();
        };
        self.selection
            .selected_segment_ids
            .iter()
            .filter_map(|id| {
                network
                    .features
                    .iter()
                    .find(|f| f.property_text("id").as_deref() == Some(id.as_str()))
                    .map(|f| f.properties.clone())
            })
            .collect()
    }
}
