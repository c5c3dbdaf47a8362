//! Handler für Modulwechsel und Modul-Steuerungen (Symbologie, Filter).

use crate::app::state::{ActiveModule, AppState};
use crate::core::{Mode, ModeFilter, SurveyDataset};
use crate::data::DatasetKey;

/// Wechselt das aktive Modul.
///
/// Beim Wechsel auf `Volumes` überleben selektierte Segmente nur, wenn sie
/// den Auto-Modus tragen — entschieden aus dem gecachten Netzwerk-Datensatz,
/// nie durch Rücklesen der Oberfläche.
pub fn set_active_module(state: &mut AppState, module: Option<ActiveModule>) {
    log::info!("Modulwechsel: {module:?}");
    state.selection.set_module(module);

    if module == Some(ActiveModule::Volumes) && !state.selection.selected_segment_ids.is_empty() {
        let retained: Vec<String> = state
            .selection
            .selected_segment_ids
            .iter()
            .filter(|id| segment_has_mode(state, id.as_str(), Mode::Car))
            .cloned()
            .collect();
        if retained.len() != state.selection.selected_segment_ids.len() {
            log::info!("Selektion ohne Auto-Modus beim Wechsel auf Volumen verworfen");
            state.selection.select_segments(retained);
        }
    }
}

/// Prüft über den gecachten Netzwerk-Datensatz, ob ein Segment einen Modus trägt.
fn segment_has_mode(state: &AppState, segment_id: &str, mode: Mode) -> bool {
    let Some(canton) = state.selection.active_canton.as_deref() else {
        return false;
    };
    let Some(network) = state.cache.features(&DatasetKey::Network(canton.to_string())) else {
        return false;
    };
    network
        .features
        .iter()
        .find(|f| f.property_text("id").as_deref() == Some(segment_id))
        .map(|f| f.list_property_contains("modes", mode.as_str()))
        .unwrap_or(false)
}

/// Setzt die Choropleth-Symbologie (Modus + Erhebung).
pub fn set_choropleth_symbology(
    state: &mut AppState,
    mode: Option<Mode>,
    dataset: SurveyDataset,
) {
    state.selection.choropleth_mode = mode;
    state.selection.choropleth_dataset = dataset;
}

/// Setzt den Netzwerk-Modusfilter.
pub fn set_network_mode_filter(state: &mut AppState, filter: ModeFilter) {
    state.selection.network_modes = filter;
}

/// Setzt den Transit-Modusfilter. Die Linien-Hervorhebung wird dabei
/// aufgehoben (der Routen-Satz könnte den Filter nicht mehr passieren).
pub fn set_transit_mode_filter(state: &mut AppState, filter: ModeFilter) {
    state.selection.transit_modes = filter;
    state.selection.clear_line_highlight();
}

/// Schaltet die Haltestellen-Volumen-Symbologie um.
pub fn set_stop_volume_symbology(state: &mut AppState, enabled: bool) {
    state.selection.stop_volume_symbology = enabled;
}

/// Hebt eine Linie samt Routen-Satz hervor.
pub fn highlight_transit_line(state: &mut AppState, line_id: String, route_ids: Vec<String>) {
    state.selection.highlight_line(line_id, route_ids);
}

/// Hebt die Linien-Hervorhebung auf.
pub fn clear_transit_line_highlight(state: &mut AppState) {
    state.selection.clear_line_highlight();
}

/// Setzt die im Panel gehoverte Route.
pub fn set_hovered_route(state: &mut AppState, route_id: Option<String>) {
    state.selection.hovered_route_id = route_id;
}

/// Setzt das Segment der Fluss-Animation.
pub fn set_flow_segment(state: &mut AppState, segment_id: Option<String>) {
    state.selection.flow_segment_id = segment_id;
}
