//! Handler für Selektions-Operationen (Kanton, Segment, Haltestelle, Hover).

use glam::DVec2;

use crate::app::state::AppState;
use crate::core::canton::CANTON_NAME_ATTRIBUTE;
use crate::core::{CantonId, SelectedStop};
use crate::shared::scene_spec::{CANTON_FILL, CLICK_NETWORK_LAYER, TRANSIT_STOPS_HITBOX};
use crate::sync::RenderSurface;

/// Selektiert den Kanton unter dem Klickpunkt (Hit-Test über die Oberfläche).
pub fn select_canton_at(state: &mut AppState, surface: &dyn RenderSurface, point: DVec2) {
    let features = surface.query_features_at_point(point, &[CANTON_FILL]);
    let Some(name) = features
        .first()
        .and_then(|f| f.string_property(CANTON_NAME_ATTRIBUTE))
    else {
        return;
    };
    // Erneute Auswahl des aktiven Kantons ist ein No-op — entschieden über
    // den Zustands-Snapshot, nicht über den Oberflächen-Filter.
    if state.selection.active_canton.as_deref() == Some(name) {
        return;
    }
    select_canton(state, name.to_string());
}

/// Selektiert einen Kanton direkt (Klick oder Suche).
pub fn select_canton(state: &mut AppState, canton: CantonId) {
    log::info!("Kanton selektiert: {canton}");
    state.selection.select_canton(canton);
}

/// Aktualisiert die Hover-Hervorhebung unter dem Mauszeiger.
pub fn hover_canton_at(state: &mut AppState, surface: &dyn RenderSurface, point: DVec2) {
    let features = surface.query_features_at_point(point, &[CANTON_FILL]);
    let hovered = features
        .first()
        .and_then(|f| f.string_property(CANTON_NAME_ATTRIBUTE))
        .map(str::to_string);
    if hovered.is_some() {
        state.selection.hovered_canton = hovered;
    }
}

/// Hebt die Hover-Hervorhebung auf.
pub fn clear_canton_hover(state: &mut AppState) {
    state.selection.hovered_canton = None;
}

/// Selektiert die Segmente unter dem Klickpunkt (maximal zwei überlappende).
///
/// Ein Klick auf die bereits selektierten Segmente ist ein No-op; ein Klick
/// auf andere Segmente ersetzt die Selektion atomar.
pub fn select_segment_at(state: &mut AppState, surface: &dyn RenderSurface, point: DVec2) {
    let features = surface.query_features_at_point(point, &[CLICK_NETWORK_LAYER]);
    if features.is_empty() {
        return;
    }
    let ids: Vec<String> = features
        .iter()
        .take(2)
        .filter_map(|f| f.property_text("id"))
        .collect();
    if ids.is_empty() {
        return;
    }
    if state.selection.selected_segment_ids.iter().eq(ids.iter()) {
        return;
    }
    log::info!("Segmente selektiert: {ids:?}");
    state.selection.select_segments(ids);
}

/// Selektiert die Haltestelle unter dem Klickpunkt.
///
/// Liegt die Haltestelle auf der aktuell hervorgehobenen Linie, bleibt die
/// Linien-Hervorhebung bestehen und der Routen-Satz wird auf die Routen an
/// dieser Haltestelle eingeschränkt; andernfalls wird sie aufgehoben.
pub fn select_transit_stop_at(state: &mut AppState, surface: &dyn RenderSurface, point: DVec2) {
    let features = surface.query_features_at_point(point, &[TRANSIT_STOPS_HITBOX]);
    let Some(stop) = features.first().and_then(SelectedStop::from_feature) else {
        return;
    };

    match state.selection.highlighted_line_id.clone() {
        Some(line_id) if stop.line_ids().contains(&line_id.as_str()) => {
            let route_ids = stop.route_ids_of_line(&line_id);
            state.selection.highlight_line(line_id, route_ids);
        }
        Some(_) => state.selection.clear_line_highlight(),
        None => {}
    }

    log::info!("Haltestelle selektiert: {}", stop.name);
    state.selection.selected_stop = Some(stop);
}
