//! Auswahlbezogener Anwendungszustand.

use indexmap::IndexSet;

use crate::core::{CantonId, Mode, ModeFilter, SelectedStop, SurveyDataset};

/// Aktives Sidebar-Modul. `None` ist die Startansicht ohne Modul.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ActiveModule {
    /// Modalsplit-Choropleth mit Erhebungs-/Modus-Auswahl.
    Choropleth,
    /// MATSim-Straßennetz.
    Network,
    /// Simulierte Tagesvolumen auf dem Straßennetz.
    Volumes,
    /// Transit-Haltestellen und -Linien.
    Transit,
    /// Zielverkehr des gewählten Kantons.
    Destination,
    /// Durchschnittliche Wegdistanzen.
    AverageDistance,
    /// Distanz-Histogramm.
    DistanceHistogram,
    /// Gestapelter Modalsplit.
    StackedModeShare,
    /// Modalsplit-Linienvergleich.
    ModeShareTrend,
}

impl ActiveModule {
    /// Gibt `true` zurück, wenn das Modul auf dem Straßennetz arbeitet.
    pub fn is_network_family(self) -> bool {
        matches!(self, Self::Network | Self::Volumes)
    }
}

/// Auswahlzustand: eine Momentaufnahme, aus der sich die Szene rein
/// funktional ableitet. Mutationen laufen über die Übergangsfunktionen,
/// damit zusammengehörige Felder nie halb aktualisiert zurückbleiben.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    /// Fokussierter Kanton (Klick, Suche oder Reset).
    pub active_canton: Option<CantonId>,
    /// Aktives Sidebar-Modul.
    pub active_module: Option<ActiveModule>,
    /// Modus-Einschränkung der Netzwerk-Layer.
    pub network_modes: ModeFilter,
    /// Modus-Einschränkung der Transit-Layer.
    pub transit_modes: ModeFilter,
    /// Selektierte Segmente in Klick-Reihenfolge (überlappende Segmente
    /// eines Klicks; geordnet für deterministische Darstellung).
    pub selected_segment_ids: IndexSet<String>,
    /// Selektierte Haltestelle mit aufgelösten Attributen.
    pub selected_stop: Option<SelectedStop>,
    /// Hervorgehobene Transit-Linie.
    pub highlighted_line_id: Option<String>,
    /// Routen der hervorgehobenen Linie an der selektierten Haltestelle.
    pub highlighted_route_ids: Vec<String>,
    /// Im Panel gehoverte Route (übersteuert die Routen-Anzeige).
    pub hovered_route_id: Option<String>,
    /// Segment der Fluss-Animation.
    pub flow_segment_id: Option<String>,
    /// Gehoverter Kanton (weiße Umrandung).
    pub hovered_canton: Option<CantonId>,
    /// Choropleth-Modus; `None` zeigt die neutrale Füllung.
    pub choropleth_mode: Option<Mode>,
    /// Choropleth-Erhebung.
    pub choropleth_dataset: SurveyDataset,
    /// Haltestellen-Radius nach Passagiervolumen skalieren.
    pub stop_volume_symbology: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    /// Erstellt den leeren Auswahlzustand.
    pub fn new() -> Self {
        Self {
            active_canton: None,
            active_module: None,
            network_modes: ModeFilter::All,
            transit_modes: ModeFilter::All,
            selected_segment_ids: IndexSet::new(),
            selected_stop: None,
            highlighted_line_id: None,
            highlighted_route_ids: Vec::new(),
            hovered_route_id: None,
            flow_segment_id: None,
            hovered_canton: None,
            choropleth_mode: None,
            choropleth_dataset: SurveyDataset::Microcensus,
            stop_volume_symbology: false,
        }
    }

    /// Wechselt den fokussierten Kanton.
    ///
    /// Kantonsgebundene Selektionen (Segmente, Fluss, Haltestelle, Linie)
    /// werden im selben Übergang geräumt — es gibt keinen Zwischenzustand
    /// mit alter Segment-Selektion im neuen Kanton.
    pub fn select_canton(&mut self, canton: CantonId) {
        self.active_canton = Some(canton);
        self.clear_segment_selection();
        self.clear_transit_selection();
    }

    /// Wechselt das aktive Modul und räumt modulfremde Selektionen.
    pub fn set_module(&mut self, module: Option<ActiveModule>) {
        let was_network = self
            .active_module
            .map(ActiveModule::is_network_family)
            .unwrap_or(false);
        let is_network = module.map(ActiveModule::is_network_family).unwrap_or(false);

        self.active_module = module;
        // Die Fluss-Animation ist an die Modul-Ansicht gebunden.
        self.flow_segment_id = None;

        if !is_network && was_network {
            self.clear_segment_selection();
        }
        if module != Some(ActiveModule::Transit) {
            self.clear_transit_selection();
        }
        match module {
            // Volumen zeigen nur Auto-Strecken.
            Some(ActiveModule::Volumes) => self.network_modes = ModeFilter::single(Mode::Car),
            _ => self.network_modes = ModeFilter::All,
        }
    }

    /// Ersetzt die Segment-Selektion atomar.
    pub fn select_segments(&mut self, ids: impl IntoIterator<Item = String>) {
        self.selected_segment_ids = ids.into_iter().collect();
        self.flow_segment_id = None;
    }

    /// Räumt Segment-Selektion und Fluss-Animation.
    pub fn clear_segment_selection(&mut self) {
        self.selected_segment_ids.clear();
        self.flow_segment_id = None;
    }

    /// Hebt eine Linie samt Routen-Satz hervor (immer gemeinsam gesetzt).
    pub fn highlight_line(&mut self, line_id: String, route_ids: Vec<String>) {
        self.highlighted_line_id = Some(line_id);
        self.highlighted_route_ids = route_ids;
    }

    /// Räumt Linien- und Routen-Hervorhebung (immer gemeinsam).
    pub fn clear_line_highlight(&mut self) {
        self.highlighted_line_id = None;
        self.highlighted_route_ids.clear();
        self.hovered_route_id = None;
    }

    /// Räumt sämtliche Transit-Selektion.
    pub fn clear_transit_selection(&mut self) {
        self.selected_stop = None;
        self.clear_line_highlight();
    }
}
