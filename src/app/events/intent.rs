//! App-Intents: Eingaben aus UI und Host ohne direkte Mutationslogik.

use glam::DVec2;

use crate::app::state::ActiveModule;
use crate::core::{Mode, ModeFilter, SurveyDataset};
use crate::data::DatasetKey;

/// Eingaben aus UI/System; werden rein auf Commands abgebildet.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Anwendung gestartet (erster Sync lädt die Grundszene).
    Started,
    /// Klick auf die Karte (Bildschirmkoordinaten).
    MapClicked { point: DVec2 },
    /// Mausbewegung über der Karte (Hover-Hervorhebung).
    MapPointerMoved { point: DVec2 },
    /// Maus hat die Karte verlassen.
    MapPointerLeft,
    /// Suchbegriff aus der Kantonssuche bestätigt.
    CantonSearchSubmitted { query: String },
    /// Modul im Panel gewählt (`None` = Startansicht).
    ModuleSelected { module: Option<ActiveModule> },
    /// Panel ein-/ausklappen.
    SidebarToggled,
    /// Choropleth-Steuerung geändert.
    ChoroplethSymbologyChanged {
        mode: Option<Mode>,
        dataset: SurveyDataset,
    },
    /// Netzwerk-Modusauswahl geändert.
    NetworkModesChanged { filter: ModeFilter },
    /// Transit-Modusauswahl geändert.
    TransitModesChanged { filter: ModeFilter },
    /// Haltestellen-Volumen-Symbologie umgeschaltet.
    StopVolumeSymbologyToggled { enabled: bool },
    /// Linie im Haltestellen-Panel gewählt.
    TransitLineHighlighted { line_id: String },
    /// Linien-Hervorhebung im Panel aufgehoben.
    TransitLineHighlightCleared,
    /// Route im Panel gehovert (`None` = Hover beendet).
    RouteHovered { route_id: Option<String> },
    /// Segment für die Fluss-Animation gewählt (`None` = aus).
    FlowSegmentSelected { segment_id: Option<String> },
    /// Karte auf die Startansicht zurücksetzen.
    ResetViewRequested,
    /// Daten-Root geändert (Upload-/Server-Umschaltung).
    DataRootChanged { url: String },
    /// Host meldet erfolgreichen Fetch.
    DatasetFetchCompleted { key: DatasetKey, body: String },
    /// Host meldet fehlgeschlagenen Fetch (alle Kandidaten-URLs).
    DatasetFetchFailed { key: DatasetKey, error: String },
}
