//! Transit-Datensätze: Haltestellen, Linien und Passagierzahlen.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::geojson::{Feature, FeatureCollection};

/// Attributschlüssel des injizierten Gesamtvolumens einer Haltestelle.
pub const STOP_VOLUME_ATTRIBUTE: &str = "volume";

/// Passagierzahlen einer Haltestelle in Zeit-Bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopCountEntry {
    pub stop_id: String,
    pub data: Vec<PassengerTimeBin>,
}

/// Ein Zeit-Bin mit Ein- und Aussteigern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerTimeBin {
    #[serde(default)]
    pub time: Option<String>,
    pub boardings: f64,
    pub alightings: f64,
}

/// Kompletter Passagierzahlen-Datensatz eines Kantons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopPassengerCounts {
    pub entries: Vec<StopCountEntry>,
}

impl StopPassengerCounts {
    /// Summiert Ein- plus Aussteiger je Stop-ID über alle Zeit-Bins.
    pub fn total_volume_by_stop(&self) -> BTreeMap<&str, f64> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for entry in &self.entries {
            let total: f64 = entry
                .data
                .iter()
                .map(|bin| bin.boardings + bin.alightings)
                .sum();
            *totals.entry(entry.stop_id.as_str()).or_insert(0.0) += total;
        }
        totals
    }
}

/// Linien-/Routen-Referenz, wie sie im `lines`-Attribut einer
/// Haltestelle steht (JSON-String mit einer Objektliste).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitLineRef {
    pub line_id: String,
    pub route_id: String,
}

/// Ausgewählte Haltestelle mit aufgelösten Attributen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedStop {
    pub name: String,
    /// Zusammengefasste Stop-IDs (eine Haltestelle bündelt mehrere
    /// MATSim-Stops).
    pub stop_ids: Vec<String>,
    pub lines: Vec<TransitLineRef>,
    pub modes: Vec<String>,
}

impl SelectedStop {
    /// Löst die Attribute eines angeklickten Haltestellen-Features auf.
    ///
    /// `lines` und `modes_list` liegen als JSON-Strings vor, `stop_id`
    /// wahlweise als Liste, JSON-String oder kommagetrennter String.
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        let name = feature.string_property("name")?.to_string();
        let lines: Vec<TransitLineRef> = feature
            .string_property("lines")
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();
        let modes: Vec<String> = feature
            .string_property("modes_list")
            .map(|raw| {
                // JSON-Liste oder kommagetrennter String, je nach Datensatz.
                serde_json::from_str(raw).unwrap_or_else(|_| {
                    raw.split(',')
                        .map(|m| m.trim().to_string())
                        .filter(|m| !m.is_empty())
                        .collect()
                })
            })
            .unwrap_or_default();
        Some(Self {
            name,
            stop_ids: stop_ids_of_feature(feature),
            lines,
            modes,
        })
    }

    /// Alle Linien-IDs an dieser Haltestelle.
    pub fn line_ids(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.line_id.as_str()).collect()
    }

    /// Routen-IDs einer bestimmten Linie an dieser Haltestelle.
    pub fn route_ids_of_line(&self, line_id: &str) -> Vec<String> {
        self.lines
            .iter()
            .filter(|l| l.line_id == line_id)
            .map(|l| l.route_id.clone())
            .collect()
    }
}

/// Extrahiert die Stop-IDs eines Haltestellen-Features.
pub fn stop_ids_of_feature(feature: &Feature) -> Vec<String> {
    match feature.properties.get("stop_id") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(raw)) => {
            // Erst als JSON-Liste versuchen, sonst kommagetrennt aufteilen.
            if let Ok(ids) = serde_json::from_str::<Vec<String>>(raw) {
                ids
            } else {
                raw.split(',')
                    .map(|id| id.trim().to_string())
                    .filter(|id| !id.is_empty())
                    .collect()
            }
        }
        Some(other) => vec![other.to_string()],
        None => Vec::new(),
    }
}

/// Injiziert das aggregierte Passagiervolumen in die Haltestellen-Features.
///
/// Jedes Feature erhält ein `volume`-Attribut: die Summe der Volumina aller
/// zugehörigen Stop-IDs. Fehlende Zählungen zählen als 0.
pub fn with_injected_volumes(
    stops: &FeatureCollection,
    counts: &StopPassengerCounts,
) -> FeatureCollection {
    let totals = counts.total_volume_by_stop();
    let features = stops
        .features
        .iter()
        .map(|feature| {
            let volume: f64 = stop_ids_of_feature(feature)
                .iter()
                .map(|id| totals.get(id.as_str()).copied().unwrap_or(0.0))
                .sum();
            let mut enriched = feature.clone();
            enriched
                .properties
                .insert(STOP_VOLUME_ATTRIBUTE.to_string(), json!(volume));
            enriched
        })
        .collect();
    FeatureCollection::from_features(features)
}
