//! Handler für Panel-Layout und Ansichts-Reset.

use crate::app::state::AppState;

/// Setzt den Panel-Zustand (offen/eingeklappt).
pub fn set_sidebar_open(state: &mut AppState, open: bool) {
    state.view.sidebar_open = open;
}

/// Setzt die Karte auf die Startansicht zurück.
///
/// Räumt Kanton-, Segment- und Transit-Selektion; der Viewport-Controller
/// fährt die Kamera im selben Sync-Pass auf den Home-Ausschnitt.
pub fn reset_view(state: &mut AppState) {
    log::info!("Ansicht zurückgesetzt");
    state.selection.active_canton = None;
    state.selection.clear_segment_selection();
    state.selection.clear_transit_selection();
    state.selection.hovered_canton = None;
}
