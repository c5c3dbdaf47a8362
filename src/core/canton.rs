//! Kantons-Registry: Namen, Bounding-Boxen und Suche.
//!
//! Die Registry wird einmalig aus dem Kantonsgrenzen-Datensatz aufgebaut
//! (`TLM_KANTONSGEBIET`). Die Bounding-Boxen ersetzen den vorberechneten
//! BBox-Cache des ursprünglichen Frontends.

use std::collections::BTreeMap;

use super::bounds::GeoBounds;
use super::geojson::FeatureCollection;

/// Kantonsname, wie er im `NAME`-Attribut des Grenzen-Datensatzes steht.
pub type CantonId = String;

/// Attributschlüssel des Kantonsnamens im Grenzen-Datensatz.
pub const CANTON_NAME_ATTRIBUTE: &str = "NAME";

/// Registry aller bekannten Kantone.
#[derive(Debug, Default, Clone)]
pub struct CantonRegistry {
    bounds_by_name: BTreeMap<CantonId, GeoBounds>,
}

impl CantonRegistry {
    /// Baut die Registry aus dem Grenzen-Datensatz auf.
    ///
    /// Features ohne `NAME` oder ohne Geometrie-Koordinaten werden
    /// übersprungen; mehrteilige Kantone (mehrere Features mit gleichem
    /// Namen) werden zu einer gemeinsamen Box vereinigt.
    pub fn from_boundaries(boundaries: &FeatureCollection) -> Self {
        let mut bounds_by_name: BTreeMap<CantonId, GeoBounds> = BTreeMap::new();
        for feature in &boundaries.features {
            let Some(name) = feature.string_property(CANTON_NAME_ATTRIBUTE) else {
                continue;
            };
            let Some(bounds) = GeoBounds::of_geometry(&feature.geometry) else {
                continue;
            };
            bounds_by_name
                .entry(name.to_string())
                .and_modify(|b| *b = b.union(bounds))
                .or_insert(bounds);
        }
        Self { bounds_by_name }
    }

    /// Gibt `true` zurück, wenn noch keine Grenzen geladen wurden.
    pub fn is_empty(&self) -> bool {
        self.bounds_by_name.is_empty()
    }

    /// Anzahl bekannter Kantone.
    pub fn len(&self) -> usize {
        self.bounds_by_name.len()
    }

    /// Alle Kantonsnamen in stabiler Reihenfolge.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bounds_by_name.keys().map(String::as_str)
    }

    /// Prüft, ob der Name ein bekannter Kanton ist.
    pub fn contains(&self, name: &str) -> bool {
        self.bounds_by_name.contains_key(name)
    }

    /// Bounding-Box eines Kantons.
    pub fn bounds(&self, name: &str) -> Option<GeoBounds> {
        self.bounds_by_name.get(name).copied()
    }

    /// Löst eine Sucheingabe auf einen Kanton auf.
    ///
    /// Exakte Treffer (nach Normalisierung) gewinnen, danach Präfix-Treffer,
    /// danach Enthaltensein — in der stabilen Namensreihenfolge. Entspricht
    /// dem Ranking der Suchbox des ursprünglichen Frontends.
    pub fn resolve_search(&self, query: &str) -> Option<&str> {
        let needle = normalize_for_search(query);
        if needle.is_empty() {
            return None;
        }

        let mut prefix_match: Option<&str> = None;
        let mut contains_match: Option<&str> = None;
        for name in self.names() {
            let normalized = normalize_for_search(name);
            if normalized == needle {
                return Some(name);
            }
            if prefix_match.is_none() && normalized.starts_with(&needle) {
                prefix_match = Some(name);
            } else if contains_match.is_none() && normalized.contains(&needle) {
                contains_match = Some(name);
            }
        }
        prefix_match.or(contains_match)
    }
}

/// Normalisiert einen Namen für die Suche: Kleinschreibung, Akzente entfernt.
///
/// Deckt die in Kantonsnamen vorkommenden diakritischen Zeichen ab
/// (Zürich, Genève, Graubünden, Neuchâtel, ...).
pub fn normalize_for_search(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(|c| match c {
            'ä' | 'à' | 'â' | 'á' => vec!['a'],
            'ö' | 'ô' | 'ò' | 'ó' => vec!['o'],
            'ü' | 'û' | 'ù' | 'ú' => vec!['u'],
            'é' | 'è' | 'ê' | 'ë' => vec!['e'],
            'î' | 'ï' | 'ì' => vec!['i'],
            'ç' => vec!['c'],
            _ => c.to_lowercase().collect(),
        })
        .collect()
}
