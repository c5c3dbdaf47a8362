//! Minimales GeoJSON-Datenmodell für die Dashboard-Datensätze.
//!
//! Nur die tatsächlich gelieferten Geometrietypen werden abgebildet;
//! Attribute bleiben als generische JSON-Objekte erhalten, weil jeder
//! Datensatz eigene Spalten mitbringt (`capacity`, `freespeed`, `modes`,
//! `stop_id`, `lines`, ...).

use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// GeoJSON-FeatureCollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Erstellt eine leere Collection.
    pub fn empty() -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Erstellt eine Collection aus einzelnen Features.
    pub fn from_features(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    /// Sucht ein Feature über dessen `id`-Attribut.
    pub fn find_by_id(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id_property() == Some(id))
    }
}

/// Einzelnes GeoJSON-Feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

fn feature_type() -> String {
    "Feature".to_string()
}

impl Feature {
    /// Erstellt ein Feature aus Geometrie und Attributen.
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            kind: "Feature".to_string(),
            properties,
            geometry,
        }
    }

    /// Liest das `id`-Attribut (Segment-IDs der Netzwerk-Datensätze).
    pub fn id_property(&self) -> Option<&str> {
        self.properties.get("id").and_then(Value::as_str)
    }

    /// Liest ein String-Attribut.
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Liest ein numerisches Attribut.
    pub fn number_property(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }

    /// Liest ein Attribut als Text; Zahlen werden formatiert
    /// (Segment-IDs kommen je nach Datensatz als String oder Zahl).
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Prüft, ob ein kommagetrenntes Listen-Attribut einen Wert enthält
    /// (z.B. `modes = "car,bike"`).
    pub fn list_property_contains(&self, key: &str, value: &str) -> bool {
        self.string_property(key)
            .map(|raw| raw.split(',').any(|entry| entry.trim() == value))
            .unwrap_or(false)
    }
}

/// Geometrie-Varianten der gelieferten Datensätze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point([f64; 2]),
    LineString(Vec<[f64; 2]>),
    MultiLineString(Vec<Vec<[f64; 2]>>),
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

impl Geometry {
    /// Ruft `visit` für jede Koordinate der Geometrie auf.
    pub fn for_each_coordinate(&self, mut visit: impl FnMut(DVec2)) {
        let mut emit = |c: &[f64; 2]| visit(DVec2::new(c[0], c[1]));
        match self {
            Self::Point(c) => emit(c),
            Self::LineString(line) => line.iter().for_each(&mut emit),
            Self::MultiLineString(lines) => {
                lines.iter().flatten().for_each(&mut emit);
            }
            Self::Polygon(rings) => rings.iter().flatten().for_each(&mut emit),
            Self::MultiPolygon(polygons) => {
                polygons.iter().flatten().flatten().for_each(&mut emit);
            }
        }
    }

    /// Verbindet Linien-Geometrie zu einer durchgehenden Koordinatenfolge.
    ///
    /// Unterbrochene `MultiLineString`-Teile werden aneinandergehängt, damit
    /// die Fluss-Animation eine kontinuierliche Linie bekommt. Andere
    /// Geometrietypen liefern eine leere Folge.
    pub fn merged_line_coordinates(&self) -> Vec<[f64; 2]> {
        match self {
            Self::LineString(line) => line.clone(),
            Self::MultiLineString(lines) => lines.iter().flatten().copied().collect(),
            _ => Vec::new(),
        }
    }
}
