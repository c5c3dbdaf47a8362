//! Layer-Reconciler: gleicht den Szenen-Deskriptor gegen die Oberfläche ab.
//!
//! Ablauf je Deskriptor-Wechsel: Entfernungen zuerst (Overlays vor ihrer
//! Basis, Layer vor ihren Quellen), dann Ergänzungen in Zeichenreihenfolge
//! (Quelle vor Layer), dann punktuelle Updates nur für geänderte
//! Eigenschaften. Ein unveränderter Deskriptor ohne offene Datensätze
//! überspringt den Pass komplett.
//!
//! Ob ein Layer/eine Quelle materialisiert ist, entscheidet ausschließlich
//! die Oberfläche (`has_layer`/`has_source`); der zuletzt angewandte
//! Deskriptor dient nur dem Konfigurations-Diff.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Map;

use crate::core::geojson::{Feature, FeatureCollection, Geometry};
use crate::core::transit::with_injected_volumes;
use crate::data::{DatasetKey, FetchRequest, GeometryCache};
use crate::shared::scene_spec::{FeatureSubset, SourceData, SourceName};
use crate::shared::{DashboardOptions, SceneDescriptor};

use super::surface::RenderSurface;

/// Ergebnis eines Reconcile-Passes.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Generation des angewandten Deskriptors.
    pub generation: u64,
    /// `true`, wenn der Pass mangels Änderung komplett entfiel.
    pub skipped: bool,
    /// Anzahl mutierender Oberflächen-Operationen.
    pub operations: usize,
    /// Datensätze, auf die die Szene noch wartet (Lade-Indikator).
    pub pending: Vec<DatasetKey>,
    /// Neue Fetch-Aufträge für den Host (koalesziert: je Schlüssel einer).
    pub fetches: Vec<FetchRequest>,
    /// Datensätze, die für diese Szene als nicht verfügbar gelten.
    pub unavailable: Vec<DatasetKey>,
}

/// Reconciler mit Generationszähler und letztem angewandten Deskriptor.
#[derive(Debug, Default)]
pub struct LayerReconciler {
    applied: Option<SceneDescriptor>,
    generation: u64,
    pending: BTreeSet<DatasetKey>,
    unavailable: BTreeSet<DatasetKey>,
}

impl LayerReconciler {
    /// Erstellt einen Reconciler ohne angewandten Deskriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aktuelle Deskriptor-Generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Datensätze, auf die die aktuelle Szene wartet.
    pub fn pending(&self) -> impl Iterator<Item = &DatasetKey> {
        self.pending.iter()
    }

    /// Prüft, ob die aktuelle Szene einen Datensatz benötigt (Stale-Check
    /// für verspätet eintreffende Fetch-Ergebnisse).
    pub fn requires(&self, key: &DatasetKey) -> bool {
        self.applied
            .as_ref()
            .map(|d| d.requires_dataset(key))
            .unwrap_or(false)
    }

    /// Markiert einen Datensatz als für diese Szene nicht verfügbar.
    ///
    /// Die Markierung gilt bis zum nächsten Deskriptor-Wechsel; so wird ein
    /// fehlgeschlagener Fetch nicht bei jedem Pass erneut angestoßen.
    pub fn mark_unavailable(&mut self, key: DatasetKey) {
        self.pending.remove(&key);
        self.unavailable.insert(key);
    }

    /// Bringt die Oberfläche mit dem Deskriptor in Übereinstimmung.
    pub fn reconcile(
        &mut self,
        descriptor: SceneDescriptor,
        cache: &mut GeometryCache,
        options: &DashboardOptions,
        surface: &mut dyn RenderSurface,
    ) -> SyncReport {
        // Unverändert und nichts offen: kompletter Pass entfällt.
        if self.pending.is_empty() && self.applied.as_ref() == Some(&descriptor) {
            return SyncReport {
                generation: self.generation,
                skipped: true,
                ..SyncReport::default()
            };
        }

        if self.applied.as_ref() != Some(&descriptor) {
            self.generation += 1;
            // Fehlschlag-Markierungen überleben, solange die Szene den
            // Datensatz weiter braucht (kein Retry durch bloßes Hovern);
            // erst eine Szene ohne diesen Bedarf gibt den Retry frei.
            self.unavailable.retain(|key| descriptor.requires_dataset(key));
        }
        let generation = self.generation;
        let prev = self.applied.take().unwrap_or_default();
        let mut operations = 0usize;

        // Quellen, deren deklarierter Inhalt sich geändert hat, werden samt
        // abhängiger Layer neu aufgebaut (z.B. neue Highlight-Teilmenge).
        // Ist der neue Inhalt noch nicht auflösbar, bleibt der alte Stand
        // materialisiert, bis der Fetch eintrifft (kein leeres Zwischenbild).
        let mut swap_now: BTreeSet<SourceName> = BTreeSet::new();
        let mut swap_deferred: BTreeSet<SourceName> = BTreeSet::new();
        for prev_source in prev.sources.values() {
            let Some(next_source) = descriptor.sources.get(prev_source.name) else {
                continue;
            };
            if next_source.data == prev_source.data {
                continue;
            }
            let resolvable = next_source
                .data
                .required_datasets()
                .iter()
                .all(|key| cache.is_resident(key));
            if resolvable {
                swap_now.insert(prev_source.name);
            } else {
                swap_deferred.insert(prev_source.name);
            }
        }

        // Buchführung über das tatsächlich Materialisierte: für
        // aufgeschobene Swaps bleibt der alte Spec der Bezugspunkt.
        let mut effective = descriptor.clone();

        // 1. Entfernungen: Layer in umgekehrter Zeichenreihenfolge
        //    (Overlays vor ihrer Basis), danach verwaiste Quellen.
        for (name, prev_spec) in prev.layers.iter().rev() {
            let drop = match descriptor.layers.get(name) {
                None => true,
                Some(next_spec) => {
                    swap_now.contains(next_spec.source) || next_spec.source != prev_spec.source
                }
            };
            if drop && surface.has_layer(name) {
                surface.remove_layer(name);
                operations += 1;
            }
        }
        for name in prev.sources.keys().rev() {
            let drop = !descriptor.sources.contains_key(name) || swap_now.contains(name);
            if drop && surface.has_source(name) {
                surface.remove_source(name);
                operations += 1;
            }
        }

        // 2. Datensatz-Bedarf der neuen Szene: fehlende Datensätze anfordern
        //    (koalesziert über den Cache), als nicht verfügbar markierte
        //    überspringen.
        let mut pending: BTreeSet<DatasetKey> = BTreeSet::new();
        let mut unavailable_now: Vec<DatasetKey> = Vec::new();
        let mut fetches: Vec<FetchRequest> = Vec::new();
        for key in descriptor.required_datasets() {
            if cache.is_resident(key) {
                continue;
            }
            if self.unavailable.contains(key) {
                unavailable_now.push(key.clone());
                continue;
            }
            pending.insert(key.clone());
            if cache.begin_fetch(key.clone(), generation) {
                fetches.push(FetchRequest::new(key.clone(), options, generation));
            }
        }

        // 3. Ergänzungen und Updates in Zeichenreihenfolge.
        for (name, spec) in &descriptor.layers {
            let Some(source) = descriptor.sources.get(spec.source) else {
                // Per Konstruktion hat jeder Layer eine Quelle; ein Verstoß
                // ist ein Builder-Fehler und darf die Szene nicht reißen.
                log::warn!("Layer {name} ohne Quelle {} im Deskriptor", spec.source);
                continue;
            };

            if swap_deferred.contains(spec.source) {
                // Alter Quellen-Stand bleibt stehen; der nächste Pass nach
                // Eintreffen der Daten führt den Austausch durch.
                if let Some(prev_source) = prev.sources.get(spec.source) {
                    effective
                        .sources
                        .insert(spec.source, prev_source.clone());
                }
                if let Some(prev_spec) = prev.layers.get(name) {
                    effective.layers.insert(prev_spec.name, prev_spec.clone());
                } else if surface.has_source(spec.source) && !surface.has_layer(name) {
                    // Neuer Layer über der alten Quelle ist unbedenklich.
                    surface.add_layer(spec);
                    operations += 1;
                }
                continue;
            }

            if surface.has_layer(name) {
                // Update-Pfad: nie entfernen-und-neu-anlegen, nur geänderte
                // Eigenschaften anfassen.
                if let Some(prev_spec) = prev.layers.get(name) {
                    for (key, value) in &spec.paint {
                        if prev_spec.paint.get(key) != Some(value) {
                            surface.set_paint_property(name, *key, value);
                            operations += 1;
                        }
                    }
                    if prev_spec.filter != spec.filter {
                        surface.set_filter(name, spec.filter.as_ref());
                        operations += 1;
                    }
                    if prev_spec.visible != spec.visible {
                        surface.set_visibility(name, spec.visible);
                        operations += 1;
                    }
                } else {
                    // Ohne bekannte Vorkonfiguration: alles setzen.
                    for (key, value) in &spec.paint {
                        surface.set_paint_property(name, *key, value);
                        operations += 1;
                    }
                    surface.set_filter(name, spec.filter.as_ref());
                    surface.set_visibility(name, spec.visible);
                    operations += 2;
                }
                continue;
            }

            // Additionspfad: erst die Quelle, dann der Layer.
            let source_keys = source.data.required_datasets();
            if source_keys.iter().any(|k| self.unavailable.contains(*k)) {
                // Degradiert: dieser Layer bleibt weg, der Rest der Szene nicht.
                continue;
            }
            if source_keys.iter().any(|k| !cache.is_resident(k)) {
                // Aufgeschoben bis der Fetch eintrifft; ein inzwischen
                // gewechselter Deskriptor verwirft den Aufschub implizit.
                continue;
            }
            if !surface.has_source(spec.source) {
                let data = resolve_source(&source.data, cache);
                surface.add_source(spec.source, data);
                operations += 1;
            }
            surface.add_layer(spec);
            operations += 1;
        }

        self.pending = pending.clone();
        self.applied = Some(effective);

        SyncReport {
            generation,
            skipped: false,
            operations,
            pending: pending.into_iter().collect(),
            fetches,
            unavailable: unavailable_now,
        }
    }
}

/// Löst eine deklarative Quelle gegen den Cache auf.
///
/// Darf nur mit vollständig residenten Datensätzen aufgerufen werden;
/// fehlende Daten ergeben eine leere Collection statt einer Panik.
fn resolve_source(data: &SourceData, cache: &GeometryCache) -> Arc<FeatureCollection> {
    match data {
        SourceData::Dataset(key) => cache
            .features(key)
            .unwrap_or_else(|| Arc::new(FeatureCollection::empty())),
        SourceData::Subset { dataset, subset } => {
            let Some(features) = cache.features(dataset) else {
                return Arc::new(FeatureCollection::empty());
            };
            Arc::new(apply_subset(&features, subset))
        }
        SourceData::FlowPath {
            dataset,
            segment_id,
        } => {
            let Some(features) = cache.features(dataset) else {
                return Arc::new(FeatureCollection::empty());
            };
            Arc::new(flow_path_collection(&features, segment_id))
        }
        SourceData::StopsWithVolume {
            stops,
            counts,
            subset,
        } => {
            let Some(stop_features) = cache.features(stops) else {
                return Arc::new(FeatureCollection::empty());
            };
            let enriched = match counts {
                Some(DatasetKey::TransitPassengerCounts(canton)) => cache
                    .passenger_counts(canton)
                    .map(|counts| with_injected_volumes(&stop_features, &counts))
                    .unwrap_or_else(|| (*stop_features).clone()),
                _ => (*stop_features).clone(),
            };
            match subset {
                Some(subset) => Arc::new(apply_subset(&enriched, subset)),
                None => Arc::new(enriched),
            }
        }
    }
}

fn apply_subset(features: &FeatureCollection, subset: &FeatureSubset) -> FeatureCollection {
    let selected = features
        .features
        .iter()
        .filter(|f| match subset {
            FeatureSubset::ByPropertyValue { attribute, values } => f
                .property_text(attribute)
                .map(|v| values.contains(&v))
                .unwrap_or(false),
            FeatureSubset::ByLineRoutes { line_id, route_ids } => {
                f.property_text("line_id").as_deref() == Some(line_id.as_str())
                    && f.property_text("route_id")
                        .map(|r| route_ids.contains(&r))
                        .unwrap_or(false)
            }
        })
        .cloned()
        .collect();
    FeatureCollection::from_features(selected)
}

/// Baut die durchgehende Linie eines Segments für die Fluss-Animation.
fn flow_path_collection(features: &FeatureCollection, segment_id: &str) -> FeatureCollection {
    let Some(feature) = features
        .features
        .iter()
        .find(|f| f.property_text("id").as_deref() == Some(segment_id))
    else {
        return FeatureCollection::empty();
    };
    let merged = feature.geometry.merged_line_coordinates();
    if merged.len() < 2 {
        return FeatureCollection::empty();
    }
    FeatureCollection::from_features(vec![Feature::new(
        Geometry::LineString(merged),
        Map::new(),
    )])
}

#[cfg(test)]
mod tests {
    use super::{resolve_source, LayerReconciler};
    use crate::core::geojson::{Feature, FeatureCollection, Geometry};
    use crate::data::{DatasetKey, DatasetPayload, GeometryCache};
    use crate::shared::scene_spec::{
        FeatureSubset, LayerKind, LayerSpec, SourceData, CANTON_FILL, CANTON_SOURCE,
    };
    use crate::shared::{DashboardOptions, SceneDescriptor};
    use crate::sync::recording::RecordingSurface;
    use crate::sync::surface::RenderSurface;
    use serde_json::{json, Map};
    use std::sync::Arc;

    fn segment(id: &str) -> Feature {
        let mut properties = Map::new();
        properties.insert("id".to_string(), json!(id));
        Feature::new(
            Geometry::MultiLineString(vec![
                vec![[8.5, 47.3], [8.6, 47.3]],
                vec![[8.7, 47.3], [8.8, 47.3]],
            ]),
            properties,
        )
    }

    fn cache_with_network() -> GeometryCache {
        let mut cache = GeometryCache::new();
        cache.insert(
            DatasetKey::Network("Zürich".to_string()),
            DatasetPayload::Features(Arc::new(FeatureCollection::from_features(vec![
                segment("41"),
                segment("42"),
            ]))),
        );
        cache
    }

    fn base_descriptor() -> SceneDescriptor {
        let mut d = SceneDescriptor::default();
        d.add_source(CANTON_SOURCE, SourceData::Dataset(DatasetKey::CantonBoundaries));
        d.add_layer(LayerSpec::new(CANTON_FILL, LayerKind::Fill, CANTON_SOURCE));
        d
    }

    #[test]
    fn missing_dataset_defers_layer_and_requests_fetch() {
        let mut reconciler = LayerReconciler::new();
        let mut cache = GeometryCache::new();
        let mut surface = RecordingSurface::new();
        let options = DashboardOptions::default();

        let report = reconciler.reconcile(base_descriptor(), &mut cache, &options, &mut surface);
        assert!(!report.skipped);
        assert_eq!(report.fetches.len(), 1);
        assert_eq!(report.pending, vec![DatasetKey::CantonBoundaries]);
        assert!(!surface.has_layer(CANTON_FILL));

        // Zweiter Pass mit identischem Deskriptor: kein zweiter Fetch-Auftrag.
        let report = reconciler.reconcile(base_descriptor(), &mut cache, &options, &mut surface);
        assert!(!report.skipped);
        assert!(report.fetches.is_empty());
    }

    #[test]
    fn resident_dataset_materializes_deferred_layer() {
        let mut reconciler = LayerReconciler::new();
        let mut cache = GeometryCache::new();
        let mut surface = RecordingSurface::new();
        let options = DashboardOptions::default();

        reconciler.reconcile(base_descriptor(), &mut cache, &options, &mut surface);
        cache.insert(
            DatasetKey::CantonBoundaries,
            DatasetPayload::Features(Arc::new(FeatureCollection::empty())),
        );
        let report = reconciler.reconcile(base_descriptor(), &mut cache, &options, &mut surface);
        assert!(surface.has_source(CANTON_SOURCE));
        assert!(surface.has_layer(CANTON_FILL));
        assert!(report.pending.is_empty());

        // Jetzt erst greift die Idempotenz.
        let report = reconciler.reconcile(base_descriptor(), &mut cache, &options, &mut surface);
        assert!(report.skipped);
    }

    #[test]
    fn unavailable_dataset_degrades_silently_until_scene_changes() {
        let mut reconciler = LayerReconciler::new();
        let mut cache = GeometryCache::new();
        let mut surface = RecordingSurface::new();
        let options = DashboardOptions::default();

        reconciler.reconcile(base_descriptor(), &mut cache, &options, &mut surface);
        cache.mark_failed(&DatasetKey::CantonBoundaries);
        reconciler.mark_unavailable(DatasetKey::CantonBoundaries);

        // Unveränderter Deskriptor ohne offene Datensätze: Pass entfällt,
        // insbesondere ohne neuen Fetch-Versuch.
        let report = reconciler.reconcile(base_descriptor(), &mut cache, &options, &mut surface);
        assert!(report.skipped);

        // Auch eine geänderte Szene, die den Datensatz weiter braucht,
        // stößt keinen Retry an — sie degradiert nur um diesen Layer.
        let mut changed = base_descriptor();
        changed
            .layers
            .get_mut(CANTON_FILL)
            .unwrap()
            .paint
            .insert(
                crate::shared::PaintKey::FillOpacity,
                crate::shared::PaintValue::Number(0.5),
            );
        let report = reconciler.reconcile(changed, &mut cache, &options, &mut surface);
        assert!(!report.skipped);
        assert!(report.fetches.is_empty());
        assert_eq!(report.unavailable, vec![DatasetKey::CantonBoundaries]);
    }

    #[test]
    fn subset_resolution_filters_by_property() {
        let cache = cache_with_network();
        let data = SourceData::Subset {
            dataset: DatasetKey::Network("Zürich".to_string()),
            subset: FeatureSubset::ByPropertyValue {
                attribute: "id",
                values: vec!["42".to_string()],
            },
        };
        let resolved = resolve_source(&data, &cache);
        assert_eq!(resolved.features.len(), 1);
        assert_eq!(resolved.features[0].property_text("id").as_deref(), Some("42"));
    }

    #[test]
    fn flow_path_merges_discontinuous_segments() {
        let cache = cache_with_network();
        let data = SourceData::FlowPath {
            dataset: DatasetKey::Network("Zürich".to_string()),
            segment_id: "41".to_string(),
        };
        let resolved = resolve_source(&data, &cache);
        assert_eq!(resolved.features.len(), 1);
        match &resolved.features[0].geometry {
            Geometry::LineString(coords) => assert_eq!(coords.len(), 4),
            other => panic!("Unerwartete Geometrie: {other:?}"),
        }
    }
}
