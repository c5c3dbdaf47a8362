//! Zentrale Konfiguration des Dashboards.
//!
//! `DashboardOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::core::GeoBounds;

// ── Daten ───────────────────────────────────────────────────────────

/// Standard-Root der publizierten Datensätze.
pub const DEFAULT_DATA_ROOT: &str = "https://matsim-eth.github.io/webmap/data/";

// ── Kamera ──────────────────────────────────────────────────────────

/// Home-Ausschnitt: ganze Schweiz (West/Süd bis Ost/Nord in Grad).
pub const HOME_BOUNDS: [[f64; 2]; 2] = [[5.9559, 45.8180], [10.4921, 47.8084]];
/// Maximaler Zoom beim Einpassen eines Kantons.
pub const FIT_MAX_ZOOM: f64 = 10.0;
/// Dauer der Kamera-Fahrt beim Kantonswechsel in Millisekunden.
pub const FIT_DURATION_MS: u32 = 1000;
/// Dauer der Padding-Anpassung bei Panel-Änderungen in Millisekunden.
pub const EASE_DURATION_MS: u32 = 600;

// ── Viewport-Padding ────────────────────────────────────────────────

/// Grund-Padding an allen Rändern in Pixeln.
pub const PADDING_BASE_PX: f64 = 50.0;
/// Rechtes Padding bei eingeklapptem Panel.
pub const PADDING_COLLAPSED_PX: f64 = 50.0;
/// Rechtes Padding bei offenem Panel ohne breites Modul.
pub const PADDING_STANDARD_PX: f64 = 350.0;
/// Rechtes Padding für mittelbreite Module (600px-Plots).
pub const PADDING_WIDE_PX: f64 = 650.0;
/// Rechtes Padding für die breitesten Module (900px-Plots).
pub const PADDING_EXTRA_WIDE_PX: f64 = 950.0;

// ── Fluss-Animation ─────────────────────────────────────────────────

/// Kadenz der Dash-Animation in Millisekunden (zeitbasiert, nicht framebasiert).
pub const FLOW_FRAME_INTERVAL_MS: f64 = 50.0;

/// Laufzeit-Optionen des Dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardOptions {
    // ── Daten ───────────────────────────────────────────────────
    /// Aktiver Daten-Root (per UI überschreibbar).
    pub data_root: String,

    // ── Kamera ──────────────────────────────────────────────────
    /// Maximaler Zoom beim Einpassen eines Kantons.
    pub fit_max_zoom: f64,
    /// Dauer der Kamera-Fahrt beim Kantonswechsel (ms).
    pub fit_duration_ms: u32,
    /// Dauer der Padding-Anpassung bei Panel-Änderungen (ms).
    pub ease_duration_ms: u32,

    // ── Viewport-Padding ────────────────────────────────────────
    /// Grund-Padding an allen Rändern (px).
    pub padding_base_px: f64,
    /// Rechtes Padding bei eingeklapptem Panel (px).
    pub padding_collapsed_px: f64,
    /// Rechtes Padding bei offenem Panel ohne breites Modul (px).
    pub padding_standard_px: f64,
    /// Rechtes Padding für mittelbreite Module (px).
    pub padding_wide_px: f64,
    /// Rechtes Padding für die breitesten Module (px).
    pub padding_extra_wide_px: f64,

    // ── Fluss-Animation ─────────────────────────────────────────
    /// Kadenz der Dash-Animation (ms).
    pub flow_frame_interval_ms: f64,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            data_root: DEFAULT_DATA_ROOT.to_string(),
            fit_max_zoom: FIT_MAX_ZOOM,
            fit_duration_ms: FIT_DURATION_MS,
            ease_duration_ms: EASE_DURATION_MS,
            padding_base_px: PADDING_BASE_PX,
            padding_collapsed_px: PADDING_COLLAPSED_PX,
            padding_standard_px: PADDING_STANDARD_PX,
            padding_wide_px: PADDING_WIDE_PX,
            padding_extra_wide_px: PADDING_EXTRA_WIDE_PX,
            flow_frame_interval_ms: FLOW_FRAME_INTERVAL_MS,
        }
    }
}

impl DashboardOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Kandidaten-Roots für Fetches in Prioritätsreihenfolge:
    /// konfigurierter Root, danach der Standard-Root als Rückfall.
    pub fn data_root_candidates(&self) -> Vec<&str> {
        let mut candidates = vec![self.data_root.as_str()];
        if self.data_root != DEFAULT_DATA_ROOT {
            candidates.push(DEFAULT_DATA_ROOT);
        }
        candidates
    }

    /// Home-Ausschnitt (ganze Schweiz).
    pub fn home_bounds(&self) -> GeoBounds {
        GeoBounds::new(
            DVec2::new(HOME_BOUNDS[0][0], HOME_BOUNDS[0][1]),
            DVec2::new(HOME_BOUNDS[1][0], HOME_BOUNDS[1][1]),
        )
    }
}
