//! Viewport-Controller: Kamera-Rahmung aus Selektion und Panel-Layout.
//!
//! Je Sync-Pass wird höchstens eine Kamera-Fahrt ausgelöst. Schnelle
//! aufeinanderfolgende Änderungen ersetzen die laufende Fahrt (das SDK
//! unterbricht und zielt neu), es entsteht nie eine Warteschlange.

use crate::core::GeoBounds;
use crate::shared::{CameraPadding, CameraRequest, DashboardOptions};

use super::surface::RenderSurface;

/// Hält die zuletzt ausgelöste Rahmung, um identische Ziele zu verschlucken.
#[derive(Debug, Default)]
pub struct ViewportController {
    last_bounds: Option<GeoBounds>,
    last_padding: Option<CameraPadding>,
}

impl ViewportController {
    /// Erstellt einen Controller ohne Basislinie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zuletzt ausgelöste Rahmung (Bounds), falls vorhanden.
    pub fn last_bounds(&self) -> Option<GeoBounds> {
        self.last_bounds
    }

    /// Gleicht die Kamera mit dem Zielzustand ab.
    ///
    /// `target_bounds`: Box des aktiven Kantons, `None` = Home-Ausschnitt.
    /// `right_padding`: rechtes Padding der aktuellen Panel-Breitenklasse.
    /// Gibt `true` zurück, wenn eine Fahrt ausgelöst wurde.
    pub fn sync(
        &mut self,
        target_bounds: Option<GeoBounds>,
        right_padding: f64,
        options: &DashboardOptions,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        let bounds = target_bounds.unwrap_or_else(|| options.home_bounds());
        let padding = CameraPadding {
            top: options.padding_base_px,
            bottom: options.padding_base_px,
            left: options.padding_base_px,
            right: right_padding,
        };

        let bounds_changed = self.last_bounds != Some(bounds);
        let padding_changed = self.last_padding != Some(padding);
        if !bounds_changed && !padding_changed {
            return false;
        }

        let is_baseline = self.last_bounds.is_none();
        self.last_bounds = Some(bounds);
        self.last_padding = Some(padding);

        // Der Host initialisiert die Karte bereits auf dem Home-Ausschnitt;
        // die allererste Rahmung wird nur als Basislinie übernommen.
        if is_baseline && target_bounds.is_none() {
            return false;
        }

        // Kantonswechsel fahren mit Einpass-Dauer und Zoom-Deckel, reine
        // Padding-Anpassungen mit der kurzen Ease-Dauer.
        let request = if bounds_changed {
            CameraRequest {
                bounds,
                padding,
                max_zoom: target_bounds.map(|_| options.fit_max_zoom),
                duration_ms: options.fit_duration_ms,
            }
        } else {
            CameraRequest {
                bounds,
                padding,
                max_zoom: None,
                duration_ms: options.ease_duration_ms,
            }
        };
        surface.ease_camera(&request);
        true
    }
}
