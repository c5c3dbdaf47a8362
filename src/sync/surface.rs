//! Abstraktion der Rendering-Oberfläche (Mapping-SDK).
//!
//! Die Oberfläche ist ein externer Kollaborateur mit imperativen
//! Primitiven. Der Reconciler behandelt `has_layer`/`has_source` als
//! Ground Truth für "was ist materialisiert" und hält keine eigene Kopie.

use std::sync::Arc;

use glam::DVec2;

use crate::core::{Feature, FeatureCollection};
use crate::shared::{CameraRequest, FilterExpr, LayerSpec, PaintKey, PaintValue};

/// Imperative Schnittstelle des Mapping-SDKs.
pub trait RenderSurface {
    /// Registriert eine GeoJSON-Quelle unter einem Namen.
    fn add_source(&mut self, name: &str, data: Arc<FeatureCollection>);

    /// Entfernt eine Quelle. Darf erst nach allen abhängigen Layern laufen.
    fn remove_source(&mut self, name: &str);

    /// Fügt einen Layer hinzu; `spec.insert_before` bestimmt die Einfügeposition.
    /// Die Quelle muss bereits existieren.
    fn add_layer(&mut self, spec: &LayerSpec);

    /// Entfernt einen Layer.
    fn remove_layer(&mut self, name: &str);

    /// Setzt oder entfernt den Filter eines Layers.
    fn set_filter(&mut self, layer: &str, filter: Option<&FilterExpr>);

    /// Setzt eine einzelne Paint-Eigenschaft.
    fn set_paint_property(&mut self, layer: &str, key: PaintKey, value: &PaintValue);

    /// Schaltet die Sichtbarkeit eines Layers um.
    fn set_visibility(&mut self, layer: &str, visible: bool);

    fn has_layer(&self, name: &str) -> bool;

    fn has_source(&self, name: &str) -> bool;

    /// Hit-Test an einem Bildschirmpunkt über die genannten Layer.
    fn query_features_at_point(&self, point: DVec2, layers: &[&str]) -> Vec<Feature>;

    /// Startet eine Kamera-Fahrt. Eine laufende Fahrt wird ersetzt,
    /// nie eingereiht.
    fn ease_camera(&mut self, request: &CameraRequest);
}
