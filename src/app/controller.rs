//! Application Controller für zentrale Event-Verarbeitung.

use super::{handlers, intent_mapping, scene};
use super::{AppCommand, AppIntent, AppState};
use crate::sync::{FlowAnimator, LayerReconciler, RenderSurface, SyncReport, ViewportController};

/// Orchestriert Intents, Commands und den Szenen-Abgleich.
///
/// Nach jedem Intent läuft genau ein Sync-Pass: Deskriptor bauen,
/// Reconciler anwenden, Kamera nachführen. Fetch-Ergebnisse des Hosts
/// kommen als gewöhnliche Intents zurück und laufen denselben Weg.
#[derive(Default)]
pub struct AppController {
    reconciler: LayerReconciler,
    viewport: ViewportController,
    flow: FlowAnimator,
}

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping und gleicht
    /// anschließend die Szene ab.
    ///
    /// Command-Fehler (z.B. ein unparsbarer Datensatz) brechen den Batch
    /// nicht ab — die Szene degradiert nur um das betroffene Feature; der
    /// letzte Fehler wird nach dem Sync zurückgegeben.
    pub fn handle_intent(
        &mut self,
        state: &mut AppState,
        surface: &mut dyn RenderSurface,
        intent: AppIntent,
    ) -> anyhow::Result<SyncReport> {
        let commands = intent_mapping::map_intent_to_commands(state, intent);
        let mut failure: Option<anyhow::Error> = None;
        for command in commands {
            if let Err(e) = self.handle_command(state, surface, command) {
                log::warn!("Command fehlgeschlagen: {e:#}");
                failure = Some(e);
            }
        }

        let report = self.sync(state, surface);
        match failure {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        surface: &mut dyn RenderSurface,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(command.clone());

        match command {
            // === Selektion & Hover ===
            AppCommand::SelectCantonAt { point } => {
                handlers::selection::select_canton_at(state, surface, point)
            }
            AppCommand::SelectCanton { canton } => handlers::selection::select_canton(state, canton),
            AppCommand::HoverCantonAt { point } => {
                handlers::selection::hover_canton_at(state, surface, point)
            }
            AppCommand::ClearCantonHover => handlers::selection::clear_canton_hover(state),
            AppCommand::SelectSegmentAt { point } => {
                handlers::selection::select_segment_at(state, surface, point)
            }
            AppCommand::SelectTransitStopAt { point } => {
                handlers::selection::select_transit_stop_at(state, surface, point)
            }

            // === Module & Steuerungen ===
            AppCommand::SetActiveModule { module } => {
                handlers::module::set_active_module(state, module)
            }
            AppCommand::SetChoroplethSymbology { mode, dataset } => {
                handlers::module::set_choropleth_symbology(state, mode, dataset)
            }
            AppCommand::SetNetworkModeFilter { filter } => {
                handlers::module::set_network_mode_filter(state, filter)
            }
            AppCommand::SetTransitModeFilter { filter } => {
                handlers::module::set_transit_mode_filter(state, filter)
            }
            AppCommand::SetStopVolumeSymbology { enabled } => {
                handlers::module::set_stop_volume_symbology(state, enabled)
            }
            AppCommand::HighlightTransitLine { line_id, route_ids } => {
                handlers::module::highlight_transit_line(state, line_id, route_ids)
            }
            AppCommand::ClearTransitLineHighlight => {
                handlers::module::clear_transit_line_highlight(state)
            }
            AppCommand::SetHoveredRoute { route_id } => {
                handlers::module::set_hovered_route(state, route_id)
            }
            AppCommand::SetFlowSegment { segment_id } => {
                handlers::module::set_flow_segment(state, segment_id)
            }

            // === Ansicht ===
            AppCommand::SetSidebarOpen { open } => handlers::view::set_sidebar_open(state, open),
            AppCommand::ResetView => handlers::view::reset_view(state),

            // === Daten ===
            AppCommand::SetDataRoot { url } => handlers::data::set_data_root(state, url),
            AppCommand::IngestDataset { key, body } => {
                handlers::data::ingest_dataset(state, key, &body)?
            }
            AppCommand::MarkDatasetUnavailable { key, error } => {
                self.reconciler.mark_unavailable(key.clone());
                handlers::data::mark_dataset_unavailable(state, key, &error)
            }
        }

        Ok(())
    }

    /// Ein Sync-Pass: Deskriptor bauen, Layer abgleichen, Kamera nachführen.
    pub fn sync(&mut self, state: &mut AppState, surface: &mut dyn RenderSurface) -> SyncReport {
        let descriptor = scene::build(state);
        let report =
            self.reconciler
                .reconcile(descriptor, &mut state.cache, &state.options, surface);

        if !report.skipped {
            state.ui.loading_datasets = report.pending.iter().cloned().collect();
            state.fetch_outbox.extend(report.fetches.iter().cloned());
        }

        self.flow.sync(state.selection.flow_segment_id.as_deref());

        let layout = state.view.panel_layout(state.selection.active_module);
        self.viewport.sync(
            state.active_canton_bounds(),
            layout.right_padding(&state.options),
            &state.options,
            surface,
        );

        report
    }

    /// Zeitbasierter Animations-Tick (nur nötig, solange `flow_active`).
    pub fn tick(
        &mut self,
        state: &AppState,
        surface: &mut dyn RenderSurface,
        now_ms: f64,
    ) -> bool {
        self.flow
            .tick(surface, now_ms, state.options.flow_frame_interval_ms)
    }

    /// Gibt `true` zurück, solange die Fluss-Animation Ticks braucht.
    pub fn flow_active(&self) -> bool {
        self.flow.is_active()
    }

    /// Aktuelle Deskriptor-Generation (Diagnose).
    pub fn generation(&self) -> u64 {
        self.reconciler.generation()
    }
}
