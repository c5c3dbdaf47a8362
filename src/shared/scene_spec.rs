//! Szenen-Deskriptor: deklarative Beschreibung der sichtbaren Map-Layer.
//!
//! Der Deskriptor ist reiner Zustand — eine geordnete Menge benannter
//! Quellen und Layer mit Paint, Filter und Sichtbarkeit. Er wird
//! deterministisch aus `AppState` + Cache-Snapshot berechnet und vom
//! Reconciler gegen die Rendering-Oberfläche diffgeglichen. Alle Typen
//! haben billige strukturelle Gleichheit.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::core::{Color, GeoBounds};
use crate::data::DatasetKey;

/// Layer- und Quellennamen sind der öffentliche Vertrag mit dem Host.
pub type LayerName = &'static str;
/// Siehe [`LayerName`].
pub type SourceName = &'static str;

// ── Namen ───────────────────────────────────────────────────────────

pub const CANTON_SOURCE: SourceName = "cantons";
pub const CANTON_FILL: LayerName = "canton-fill";
pub const CANTON_BORDERS: LayerName = "canton-borders";
pub const SELECTED_CANTON_BORDER: LayerName = "selected-canton-border";
pub const CANTON_HIGHLIGHT: LayerName = "canton-highlight";

pub const NETWORK_SOURCE: SourceName = "network-source";
pub const NETWORK_LAYER: LayerName = "network-layer";
pub const CLICK_NETWORK_LAYER: LayerName = "click-network-layer";
pub const NETWORK_HIGHLIGHT: LayerName = "network-highlight";

pub const FLOW_SOURCE: SourceName = "flow-path";
pub const FLOW_LINE: LayerName = "flow-line";

pub const TRANSIT_STOPS_SOURCE: SourceName = "transit-stops";
pub const TRANSIT_STOPS_LAYER: LayerName = "transit-stops-layer";
pub const TRANSIT_STOPS_LABEL: LayerName = "transit-stops-label";
pub const TRANSIT_STOPS_HITBOX: LayerName = "transit-stops-hitbox";
pub const TRANSIT_HIGHLIGHT_SOURCE: SourceName = "transit-highlight";
pub const TRANSIT_HIGHLIGHT_LAYER: LayerName = "transit-highlight-layer";
pub const TRANSIT_LINE_HIGHLIGHT: LayerName = "transit-line-highlight";

// ── Layer-Konfiguration ─────────────────────────────────────────────

/// Darstellungsart eines Layers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerKind {
    Fill,
    Line,
    Circle,
    Symbol,
}

/// Paint-Eigenschaftsschlüssel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PaintKey {
    FillColor,
    FillOpacity,
    LineColor,
    LineWidth,
    LineOpacity,
    LineDashArray,
    CircleColor,
    CircleRadius,
    CircleStrokeColor,
    CircleStrokeWidth,
    CircleOpacity,
    TextColor,
    TextHaloColor,
    TextHaloWidth,
}

/// Paint-Wert: Konstante oder reine Funktion über Feature-Attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintValue {
    Number(f64),
    Color(Color),
    DashArray(Vec<f64>),
    /// Lineare Interpolation eines Zahlenwerts über ein Attribut.
    NumberRamp {
        attribute: &'static str,
        stops: Vec<(f64, f64)>,
    },
    /// Lineare Interpolation einer Farbe über ein Attribut.
    ColorRamp {
        attribute: &'static str,
        stops: Vec<(f64, Color)>,
    },
    /// Kategoriale Farbzuordnung über einen Attributwert (Choropleth).
    ColorByCategory {
        attribute: &'static str,
        cases: Vec<(String, Color)>,
        fallback: Color,
    },
}

/// Boolescher Filterausdruck über Feature-Attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// Attribut gleich Wert. Der leere Wert matcht nie und dient als
    /// "Layer vorhanden, aber nichts hervorgehoben"-Zustand.
    Equals {
        attribute: &'static str,
        value: String,
    },
    /// Kommagetrenntes Listen-Attribut enthält den Wert.
    ListContains {
        attribute: &'static str,
        value: String,
    },
    /// Mindestens ein Teilausdruck trifft zu.
    AnyOf(Vec<FilterExpr>),
}

/// Textdarstellung eines Symbol-Layers.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Attribut, aus dem der Text kommt.
    pub attribute: &'static str,
    pub size: f64,
    pub offset: [f64; 2],
    pub anchor: &'static str,
}

/// Vollständige Konfiguration eines benannten Layers.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub name: LayerName,
    pub kind: LayerKind,
    pub source: SourceName,
    pub paint: BTreeMap<PaintKey, PaintValue>,
    pub filter: Option<FilterExpr>,
    pub visible: bool,
    /// Einfügeanker: dieser Layer liegt unmittelbar unter dem genannten
    /// (Overlay-vor-Basis-Garantie des Reconcilers).
    pub insert_before: Option<LayerName>,
    /// Minimale Zoomstufe, ab der der Layer gezeichnet wird.
    pub min_zoom: Option<f64>,
    pub text: Option<TextStyle>,
    /// Runde Linienverbindungen und -enden.
    pub rounded_line_joins: bool,
}

impl LayerSpec {
    /// Erstellt einen Layer mit leerem Paint und ohne Filter.
    pub fn new(name: LayerName, kind: LayerKind, source: SourceName) -> Self {
        Self {
            name,
            kind,
            source,
            paint: BTreeMap::new(),
            filter: None,
            visible: true,
            insert_before: None,
            min_zoom: None,
            text: None,
            rounded_line_joins: false,
        }
    }

    /// Setzt eine Paint-Eigenschaft (Builder-Stil).
    pub fn paint(mut self, key: PaintKey, value: PaintValue) -> Self {
        self.paint.insert(key, value);
        self
    }

    /// Setzt den Filter (Builder-Stil).
    pub fn filter(mut self, filter: FilterExpr) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Setzt den Einfügeanker (Builder-Stil).
    pub fn before(mut self, anchor: LayerName) -> Self {
        self.insert_before = Some(anchor);
        self
    }
}

// ── Quellen ─────────────────────────────────────────────────────────

/// Teilmengen-Auswahl für abgeleitete Quellen (Highlights).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureSubset {
    /// Features, deren Attribut einen der genannten Werte trägt.
    ByPropertyValue {
        attribute: &'static str,
        values: Vec<String>,
    },
    /// Routen-Features einer Linie.
    ByLineRoutes {
        line_id: String,
        route_ids: Vec<String>,
    },
}

/// Deklarative Beschreibung des Quelleninhalts.
///
/// Die Auflösung auf konkrete FeatureCollections übernimmt der Reconciler
/// gegen den Geometrie-Cache; der Deskriptor bleibt reiner Zustand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceData {
    /// Kompletter Datensatz.
    Dataset(DatasetKey),
    /// Teilmenge eines Datensatzes (Highlight-Quellen).
    Subset {
        dataset: DatasetKey,
        subset: FeatureSubset,
    },
    /// Durchgehende Linie eines Segments für die Fluss-Animation.
    FlowPath {
        dataset: DatasetKey,
        segment_id: String,
    },
    /// Haltestellen, optional mit injiziertem Passagiervolumen und
    /// optionaler Teilmengen-Auswahl (Highlight).
    StopsWithVolume {
        stops: DatasetKey,
        counts: Option<DatasetKey>,
        subset: Option<FeatureSubset>,
    },
}

impl SourceData {
    /// Alle Datensätze, die zur Auflösung geladen sein müssen.
    pub fn required_datasets(&self) -> Vec<&DatasetKey> {
        match self {
            Self::Dataset(key) | Self::Subset { dataset: key, .. } | Self::FlowPath { dataset: key, .. } => {
                vec![key]
            }
            Self::StopsWithVolume { stops, counts, .. } => {
                let mut keys = vec![stops];
                if let Some(counts) = counts {
                    keys.push(counts);
                }
                keys
            }
        }
    }
}

/// Benannte Quelle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub name: SourceName,
    pub data: SourceData,
}

// ── Deskriptor ──────────────────────────────────────────────────────

/// Vollständige Beschreibung der gewünschten Szene.
///
/// `layers` ist in Zeichenreihenfolge geordnet; Overlays folgen direkt auf
/// ihre Basis-Layer. Entfernungen laufen in umgekehrter Reihenfolge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneDescriptor {
    pub sources: IndexMap<SourceName, SourceSpec>,
    pub layers: IndexMap<LayerName, LayerSpec>,
    /// Datensätze, die nicht als Quelle, aber als Styling- oder Panel-Input
    /// gebraucht werden (Modalsplit-Tabelle, Zielverkehr).
    pub extra_datasets: Vec<DatasetKey>,
}

impl SceneDescriptor {
    /// Fügt eine Quelle hinzu.
    pub fn add_source(&mut self, name: SourceName, data: SourceData) {
        self.sources.insert(name, SourceSpec { name, data });
    }

    /// Fügt einen Layer hinzu (Reihenfolge = Zeichenreihenfolge).
    pub fn add_layer(&mut self, spec: LayerSpec) {
        self.layers.insert(spec.name, spec);
    }

    /// Meldet einen zusätzlichen Datensatz-Bedarf an.
    pub fn require_dataset(&mut self, key: DatasetKey) {
        if !self.extra_datasets.contains(&key) {
            self.extra_datasets.push(key);
        }
    }

    /// Alle Datensätze, die diese Szene benötigt.
    pub fn required_datasets(&self) -> Vec<&DatasetKey> {
        let mut keys: Vec<&DatasetKey> = Vec::new();
        for source in self.sources.values() {
            for key in source.data.required_datasets() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        for key in &self.extra_datasets {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Prüft, ob die Szene einen Datensatz benötigt (Stale-Check).
    pub fn requires_dataset(&self, key: &DatasetKey) -> bool {
        self.extra_datasets.contains(key)
            || self
                .sources
                .values()
                .any(|s| s.data.required_datasets().contains(&key))
    }

    /// Layer eines Quellennamens in Zeichenreihenfolge.
    pub fn layers_of_source(&self, source: SourceName) -> Vec<&LayerSpec> {
        self.layers.values().filter(|l| l.source == source).collect()
    }
}

// ── Kamera ──────────────────────────────────────────────────────────

/// Viewport-Padding in Pixeln.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPadding {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Eine Kamera-Fahrt. Neuere Requests ersetzen laufende Fahrten,
/// es wird nie eine Warteschlange gebildet.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRequest {
    pub bounds: GeoBounds,
    pub padding: CameraPadding,
    pub max_zoom: Option<f64>,
    pub duration_ms: u32,
}
