//! App-Commands: mutierende Schritte, zentral ausgeführt.

use glam::DVec2;

use crate::app::state::ActiveModule;
use crate::core::{CantonId, Mode, ModeFilter, SurveyDataset};
use crate::data::DatasetKey;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Kanton per Hit-Test am Klickpunkt selektieren.
    SelectCantonAt { point: DVec2 },
    /// Kanton direkt selektieren (Suche).
    SelectCanton { canton: CantonId },
    /// Kanton-Hover per Hit-Test aktualisieren.
    HoverCantonAt { point: DVec2 },
    /// Kanton-Hover aufheben.
    ClearCantonHover,
    /// Segment per Hit-Test am Klickpunkt selektieren.
    SelectSegmentAt { point: DVec2 },
    /// Haltestelle per Hit-Test am Klickpunkt selektieren.
    SelectTransitStopAt { point: DVec2 },
    /// Aktives Modul setzen.
    SetActiveModule { module: Option<ActiveModule> },
    /// Panel-Zustand setzen.
    SetSidebarOpen { open: bool },
    /// Choropleth-Symbologie setzen.
    SetChoroplethSymbology {
        mode: Option<Mode>,
        dataset: SurveyDataset,
    },
    /// Netzwerk-Modusfilter setzen.
    SetNetworkModeFilter { filter: ModeFilter },
    /// Transit-Modusfilter setzen.
    SetTransitModeFilter { filter: ModeFilter },
    /// Haltestellen-Volumen-Symbologie setzen.
    SetStopVolumeSymbology { enabled: bool },
    /// Linie samt Routen-Satz hervorheben.
    HighlightTransitLine {
        line_id: String,
        route_ids: Vec<String>,
    },
    /// Linien-Hervorhebung aufheben.
    ClearTransitLineHighlight,
    /// Gehoverte Route setzen.
    SetHoveredRoute { route_id: Option<String> },
    /// Fluss-Segment setzen.
    SetFlowSegment { segment_id: Option<String> },
    /// Karte auf die Startansicht zurücksetzen.
    ResetView,
    /// Daten-Root setzen.
    SetDataRoot { url: String },
    /// Geladenen Datensatz-Body übernehmen.
    IngestDataset { key: DatasetKey, body: String },
    /// Datensatz als nicht verfügbar markieren.
    MarkDatasetUnavailable { key: DatasetKey, error: String },
}
