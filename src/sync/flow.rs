//! Fluss-Animation: wandernde Dash-Sequenz auf dem gewählten Segment.
//!
//! Zeitbasiert (feste Kadenz, unabhängig von der Framerate). Der Animator
//! läuft nur, solange ein Fluss-Segment gewählt ist und der Reconciler den
//! Fluss-Layer materialisiert hat; danach bleibt kein Timer zurück — der
//! Host pollt `is_active` und stellt die Tick-Aufrufe ein.

use crate::shared::scene_spec::FLOW_LINE;
use crate::shared::{PaintKey, PaintValue};

use super::surface::RenderSurface;

/// Dash-Sequenz des Richtungseffekts: der sichtbare Strich wandert pro
/// Schritt um 0.3 Einheiten entlang der Linie.
pub const FLOW_DASH_SEQUENCE: [[f64; 4]; 20] = [
    [0.0, 0.3, 3.0, 2.7],
    [0.0, 0.6, 3.0, 2.4],
    [0.0, 0.9, 3.0, 2.1],
    [0.0, 1.2, 3.0, 1.8],
    [0.0, 1.5, 3.0, 1.5],
    [0.0, 1.8, 3.0, 1.2],
    [0.0, 2.1, 3.0, 0.9],
    [0.0, 2.4, 3.0, 0.6],
    [0.0, 2.7, 3.0, 0.3],
    [0.0, 3.0, 3.0, 0.0],
    [0.3, 3.0, 2.7, 0.0],
    [0.6, 3.0, 2.4, 0.0],
    [0.9, 3.0, 2.1, 0.0],
    [1.2, 3.0, 1.8, 0.0],
    [1.5, 3.0, 1.5, 0.0],
    [1.8, 3.0, 1.2, 0.0],
    [2.1, 3.0, 0.9, 0.0],
    [2.4, 3.0, 0.6, 0.0],
    [2.7, 3.0, 0.3, 0.0],
    [3.0, 3.0, 0.0, 0.0],
];

/// Treiber der Dash-Animation.
#[derive(Debug, Default)]
pub struct FlowAnimator {
    segment: Option<String>,
    step: usize,
    last_advance_ms: Option<f64>,
}

impl FlowAnimator {
    /// Erstellt einen inaktiven Animator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Übernimmt das aktuell gewählte Fluss-Segment aus dem App-Zustand.
    /// Ein Segmentwechsel startet die Sequenz neu.
    pub fn sync(&mut self, segment: Option<&str>) {
        if self.segment.as_deref() != segment {
            self.segment = segment.map(str::to_string);
            self.step = 0;
            self.last_advance_ms = None;
        }
    }

    /// Gibt `true` zurück, solange Ticks gebraucht werden.
    pub fn is_active(&self) -> bool {
        self.segment.is_some()
    }

    /// Schaltet die Animation weiter, wenn die Kadenz erreicht ist.
    ///
    /// Gibt `true` zurück, wenn ein Schritt angewandt wurde. Ohne
    /// materialisierten Fluss-Layer (vom Reconciler entfernt) passiert
    /// nichts.
    pub fn tick(
        &mut self,
        surface: &mut dyn RenderSurface,
        now_ms: f64,
        interval_ms: f64,
    ) -> bool {
        if self.segment.is_none() || !surface.has_layer(FLOW_LINE) {
            return false;
        }
        if let Some(last) = self.last_advance_ms {
            if now_ms - last < interval_ms {
                return false;
            }
        }
        self.step = (self.step + 1) % FLOW_DASH_SEQUENCE.len();
        surface.set_paint_property(
            FLOW_LINE,
            PaintKey::LineDashArray,
            &PaintValue::DashArray(FLOW_DASH_SEQUENCE[self.step].to_vec()),
        );
        self.last_advance_ms = Some(now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{FlowAnimator, FLOW_DASH_SEQUENCE};
    use crate::core::FeatureCollection;
    use crate::shared::scene_spec::{FLOW_LINE, FLOW_SOURCE};
    use crate::shared::{LayerKind, LayerSpec};
    use crate::sync::recording::RecordingSurface;
    use crate::sync::surface::RenderSurface;
    use std::sync::Arc;

    fn surface_with_flow_layer() -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        surface.add_source(FLOW_SOURCE, Arc::new(FeatureCollection::empty()));
        surface.add_layer(&LayerSpec::new(FLOW_LINE, LayerKind::Line, FLOW_SOURCE));
        surface.take_ops();
        surface
    }

    #[test]
    fn advances_at_fixed_cadence_not_per_frame() {
        let mut animator = FlowAnimator::new();
        let mut surface = surface_with_flow_layer();
        animator.sync(Some("42"));

        assert!(animator.tick(&mut surface, 0.0, 50.0));
        // Frames innerhalb der Kadenz schalten nicht weiter.
        assert!(!animator.tick(&mut surface, 16.0, 50.0));
        assert!(!animator.tick(&mut surface, 33.0, 50.0));
        assert!(animator.tick(&mut surface, 51.0, 50.0));
        assert_eq!(surface.ops().len(), 2);
    }

    #[test]
    fn wraps_around_the_sequence() {
        let mut animator = FlowAnimator::new();
        let mut surface = surface_with_flow_layer();
        animator.sync(Some("42"));

        for i in 0..(FLOW_DASH_SEQUENCE.len() + 3) {
            animator.tick(&mut surface, (i as f64) * 50.0, 50.0);
        }
        assert_eq!(surface.ops().len(), FLOW_DASH_SEQUENCE.len() + 3);
    }

    #[test]
    fn stops_without_segment_or_layer() {
        let mut animator = FlowAnimator::new();
        let mut surface = surface_with_flow_layer();

        // Kein Segment gewählt: inaktiv.
        assert!(!animator.is_active());
        assert!(!animator.tick(&mut surface, 0.0, 50.0));

        animator.sync(Some("42"));
        assert!(animator.is_active());
        animator.tick(&mut surface, 0.0, 50.0);

        // Abwahl setzt zurück; ohne Layer passiert ebenfalls nichts.
        animator.sync(None);
        assert!(!animator.is_active());
        assert!(!animator.tick(&mut surface, 100.0, 50.0));

        let mut bare = RecordingSurface::new();
        animator.sync(Some("42"));
        assert!(!animator.tick(&mut bare, 200.0, 50.0));
    }

    #[test]
    fn segment_change_restarts_sequence() {
        let mut animator = FlowAnimator::new();
        let mut surface = surface_with_flow_layer();

        animator.sync(Some("42"));
        animator.tick(&mut surface, 0.0, 50.0);
        animator.tick(&mut surface, 60.0, 50.0);

        animator.sync(Some("43"));
        surface.take_ops();
        // Nach dem Wechsel beginnt die Sequenz wieder bei Schritt 1.
        assert!(animator.tick(&mut surface, 200.0, 50.0));
        match surface.ops().first().unwrap() {
            crate::sync::recording::SurfaceOp::SetPaint { value, .. } => {
                assert_eq!(
                    value,
                    &crate::shared::PaintValue::DashArray(FLOW_DASH_SEQUENCE[1].to_vec())
                );
            }
            other => panic!("Unerwartete Operation: {other:?}"),
        }
    }
}
