//! Mapping von UI-Intents auf mutierende App-Commands.
//!
//! Reine Funktion über dem aktuellen Zustands-Snapshot: Idempotenz-Checks
//! (gleicher Kanton, gleiches Modul) entscheiden hier — nie über ein
//! Rücklesen des Oberflächen-Zustands.

use super::state::ActiveModule;
use super::{AppCommand, AppIntent, AppState};

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        // Der erste Sync-Pass fordert die Grundszene ohne Command an.
        AppIntent::Started => vec![],
        AppIntent::MapClicked { point } => {
            // Hit-Test-Priorität je Modul: Segment bzw. Haltestelle zuerst,
            // der Kanton-Pick läuft immer mit (gleicher Kanton = No-op).
            match state.selection.active_module {
                Some(module) if module.is_network_family() => vec![
                    AppCommand::SelectSegmentAt { point },
                    AppCommand::SelectCantonAt { point },
                ],
                Some(ActiveModule::Transit) => vec![
                    AppCommand::SelectTransitStopAt { point },
                    AppCommand::SelectCantonAt { point },
                ],
                _ => vec![AppCommand::SelectCantonAt { point }],
            }
        }
        AppIntent::MapPointerMoved { point } => vec![AppCommand::HoverCantonAt { point }],
        AppIntent::MapPointerLeft => vec![AppCommand::ClearCantonHover],
        AppIntent::CantonSearchSubmitted { query } => {
            match state.registry.resolve_search(&query) {
                // Erneute Auswahl des aktiven Kantons ist ein No-op.
                Some(name) if state.selection.active_canton.as_deref() != Some(name) => {
                    vec![AppCommand::SelectCanton {
                        canton: name.to_string(),
                    }]
                }
                _ => vec![],
            }
        }
        AppIntent::ModuleSelected { module } => {
            if state.selection.active_module == module {
                vec![]
            } else {
                vec![AppCommand::SetActiveModule { module }]
            }
        }
        AppIntent::SidebarToggled => vec![AppCommand::SetSidebarOpen {
            open: !state.view.sidebar_open,
        }],
        AppIntent::ChoroplethSymbologyChanged { mode, dataset } => {
            vec![AppCommand::SetChoroplethSymbology { mode, dataset }]
        }
        AppIntent::NetworkModesChanged { filter } => {
            vec![AppCommand::SetNetworkModeFilter { filter }]
        }
        AppIntent::TransitModesChanged { filter } => {
            vec![AppCommand::SetTransitModeFilter { filter }]
        }
        AppIntent::StopVolumeSymbologyToggled { enabled } => {
            vec![AppCommand::SetStopVolumeSymbology { enabled }]
        }
        AppIntent::TransitLineHighlighted { line_id } => {
            // Routen-Satz kommt aus der selektierten Haltestelle; ohne
            // Haltestelle gibt es nichts hervorzuheben.
            match &state.selection.selected_stop {
                Some(stop) => {
                    let route_ids = stop.route_ids_of_line(&line_id);
                    if route_ids.is_empty() {
                        vec![]
                    } else {
                        vec![AppCommand::HighlightTransitLine { line_id, route_ids }]
                    }
                }
                None => vec![],
            }
        }
        AppIntent::TransitLineHighlightCleared => vec![AppCommand::ClearTransitLineHighlight],
        AppIntent::RouteHovered { route_id } => vec![AppCommand::SetHoveredRoute { route_id }],
        AppIntent::FlowSegmentSelected { segment_id } => {
            // Die Fluss-Animation gibt es nur in den Netzwerk-Modulen.
            let in_network_module = state
                .selection
                .active_module
                .map(ActiveModule::is_network_family)
                .unwrap_or(false);
            if in_network_module || segment_id.is_none() {
                vec![AppCommand::SetFlowSegment { segment_id }]
            } else {
                vec![]
            }
        }
        AppIntent::ResetViewRequested => vec![AppCommand::ResetView],
        AppIntent::DataRootChanged { url } => vec![AppCommand::SetDataRoot { url }],
        AppIntent::DatasetFetchCompleted { key, body } => {
            vec![AppCommand::IngestDataset { key, body }]
        }
        AppIntent::DatasetFetchFailed { key, error } => {
            vec![AppCommand::MarkDatasetUnavailable { key, error }]
        }
    }
}
