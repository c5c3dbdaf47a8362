//! Headless-Oberfläche: protokolliert alle Operationen.
//!
//! Dient den Controller- und Reconciler-Tests als Ersatz für das echte
//! Mapping-SDK. Layer- und Quellenbestand werden mitgeführt, damit
//! `has_layer`/`has_source` wie beim SDK als Ground Truth funktionieren.
//! Hit-Tests liefern vorkonfigurierte Features je Layer.

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::DVec2;
use indexmap::IndexMap;

use crate::core::{Feature, FeatureCollection};
use crate::shared::{CameraRequest, FilterExpr, LayerSpec, PaintKey, PaintValue};

use super::surface::RenderSurface;

/// Eine protokollierte Operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    AddSource {
        name: String,
        feature_count: usize,
    },
    RemoveSource {
        name: String,
    },
    AddLayer {
        name: String,
        insert_before: Option<String>,
    },
    RemoveLayer {
        name: String,
    },
    SetFilter {
        layer: String,
        filter: Option<FilterExpr>,
    },
    SetPaint {
        layer: String,
        key: PaintKey,
        value: PaintValue,
    },
    SetVisibility {
        layer: String,
        visible: bool,
    },
    EaseCamera(CameraRequest),
}

/// Protokollierende Oberfläche für Tests und Diagnose.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    layers: IndexMap<String, LayerSpec>,
    sources: IndexMap<String, Arc<FeatureCollection>>,
    hit_results: BTreeMap<String, Vec<Feature>>,
}

impl RecordingSurface {
    /// Erstellt eine leere Oberfläche.
    pub fn new() -> Self {
        Self::default()
    }

    /// Konfiguriert das Hit-Test-Ergebnis eines Layers.
    pub fn set_hit_result(&mut self, layer: &str, features: Vec<Feature>) {
        self.hit_results.insert(layer.to_string(), features);
    }

    /// Alle protokollierten Operationen.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Entnimmt das Protokoll (für abschnittsweise Assertions).
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Layer-Namen in Einfügereihenfolge.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.keys().map(String::as_str).collect()
    }

    /// Aktuelle Quellen-Daten (für Assertions über aufgelöste Inhalte).
    pub fn source_data(&self, name: &str) -> Option<Arc<FeatureCollection>> {
        self.sources.get(name).cloned()
    }

    /// Aktueller Spec eines materialisierten Layers.
    pub fn layer_spec(&self, name: &str) -> Option<&LayerSpec> {
        self.layers.get(name)
    }
}

impl RenderSurface for RecordingSurface {
    fn add_source(&mut self, name: &str, data: Arc<FeatureCollection>) {
        self.ops.push(SurfaceOp::AddSource {
            name: name.to_string(),
            feature_count: data.features.len(),
        });
        self.sources.insert(name.to_string(), data);
    }

    fn remove_source(&mut self, name: &str) {
        self.ops.push(SurfaceOp::RemoveSource {
            name: name.to_string(),
        });
        self.sources.shift_remove(name);
    }

    fn add_layer(&mut self, spec: &LayerSpec) {
        self.ops.push(SurfaceOp::AddLayer {
            name: spec.name.to_string(),
            insert_before: spec.insert_before.map(str::to_string),
        });
        self.layers.insert(spec.name.to_string(), spec.clone());
    }

    fn remove_layer(&mut self, name: &str) {
        self.ops.push(SurfaceOp::RemoveLayer {
            name: name.to_string(),
        });
        self.layers.shift_remove(name);
    }

    fn set_filter(&mut self, layer: &str, filter: Option<&FilterExpr>) {
        self.ops.push(SurfaceOp::SetFilter {
            layer: layer.to_string(),
            filter: filter.cloned(),
        });
        if let Some(spec) = self.layers.get_mut(layer) {
            spec.filter = filter.cloned();
        }
    }

    fn set_paint_property(&mut self, layer: &str, key: PaintKey, value: &PaintValue) {
        self.ops.push(SurfaceOp::SetPaint {
            layer: layer.to_string(),
            key,
            value: value.clone(),
        });
        if let Some(spec) = self.layers.get_mut(layer) {
            spec.paint.insert(key, value.clone());
        }
    }

    fn set_visibility(&mut self, layer: &str, visible: bool) {
        self.ops.push(SurfaceOp::SetVisibility {
            layer: layer.to_string(),
            visible,
        });
        if let Some(spec) = self.layers.get_mut(layer) {
            spec.visible = visible;
        }
    }

    fn has_layer(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    fn has_source(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    fn query_features_at_point(&self, _point: DVec2, layers: &[&str]) -> Vec<Feature> {
        // Wie beim SDK liefern nur tatsächlich materialisierte Layer Treffer.
        for layer in layers {
            if !self.layers.contains_key(*layer) {
                continue;
            }
            if let Some(features) = self.hit_results.get(*layer) {
                if !features.is_empty() {
                    return features.clone();
                }
            }
        }
        Vec::new()
    }

    fn ease_camera(&mut self, request: &CameraRequest) {
        self.ops.push(SurfaceOp::EaseCamera(request.clone()));
    }
}
