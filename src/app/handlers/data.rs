//! Handler für Datensatz-Lebenszyklus: Ingest, Fehlschläge, Daten-Root.

use crate::app::state::AppState;
use crate::core::CantonRegistry;
use crate::data::{parse_payload, DatasetKey};

/// Übernimmt einen vom Host geladenen Datensatz-Body in den Cache.
///
/// Der Cache wird immer befüllt (auch wenn die auslösende Generation
/// inzwischen überholt ist — der Datensatz bleibt für später nutzbar);
/// ob das Ergebnis noch auf die Oberfläche gehört, entscheidet der
/// nachfolgende Sync-Pass über den aktuellen Deskriptor.
pub fn ingest_dataset(state: &mut AppState, key: DatasetKey, body: &str) -> anyhow::Result<()> {
    let payload = match parse_payload(&key, body) {
        Ok(payload) => payload,
        Err(e) => {
            // Parse-Fehler wirken wie ein Fetch-Fehlschlag: nicht cachen,
            // Feature degradiert, Rest der Szene läuft weiter.
            state.cache.mark_failed(&key);
            state.ui.loading_datasets.remove(&key);
            state.ui.unavailable_datasets.insert(key);
            return Err(e);
        }
    };

    log::info!("Datensatz geladen: {key}");
    state.ui.loading_datasets.remove(&key);
    state.ui.unavailable_datasets.remove(&key);

    // Die Kantons-Registry (Namen + Bounding-Boxen) entsteht aus dem
    // Grenzen-Datensatz.
    if key == DatasetKey::CantonBoundaries {
        if let crate::data::DatasetPayload::Features(fc) = &payload {
            state.registry = CantonRegistry::from_boundaries(fc);
            log::info!("Kantons-Registry aufgebaut: {} Kantone", state.registry.len());
        }
    }

    state.cache.insert(key, payload);
    Ok(())
}

/// Markiert einen Datensatz nach gescheitertem Fetch als nicht verfügbar.
///
/// Planmäßig fehlende Datensätze (Kantone ohne Netz) degradieren leise;
/// alles andere wird als Warnung geloggt. Der Fehlschlag wird nicht
/// gecacht — eine spätere Szene darf erneut laden.
pub fn mark_dataset_unavailable(state: &mut AppState, key: DatasetKey, error: &str) {
    if key.is_optional() {
        log::info!("Kein Datensatz vorhanden: {key} ({error})");
    } else {
        log::warn!("Datensatz nicht ladbar: {key} ({error})");
    }
    state.cache.mark_failed(&key);
    state.ui.loading_datasets.remove(&key);
    state.ui.unavailable_datasets.insert(key);
}

/// Setzt den Daten-Root (Umschaltung auf lokale Uploads oder Spiegel).
pub fn set_data_root(state: &mut AppState, url: String) {
    log::info!("Daten-Root gewechselt: {url}");
    state.options.data_root = url;
}
