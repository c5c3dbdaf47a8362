//! Geometrie-Cache: einmal geladene Datensätze für die Session.
//!
//! Einträge sind nach dem Laden unveränderlich (`Arc`), es gibt keine
//! Verdrängung — der Cache wächst mit den besuchten Kantonen. Fehlschläge
//! werden nicht gecacht; ein späterer Bedarf löst einen neuen Fetch aus.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::{DestinationFlows, FeatureCollection, ModeShareTable, StopPassengerCounts};

use super::dataset::DatasetKey;

/// Geladener Datensatz-Inhalt.
#[derive(Debug, Clone)]
pub enum DatasetPayload {
    Features(Arc<FeatureCollection>),
    ModeShare(Arc<ModeShareTable>),
    PassengerCounts(Arc<StopPassengerCounts>),
    DestinationFlows(Arc<DestinationFlows>),
}

#[derive(Debug, Clone)]
enum CacheEntry {
    /// Fetch läuft; `generation` ist die auslösende Deskriptor-Generation.
    InFlight { generation: u64 },
    Resident(DatasetPayload),
}

/// Ergebnis einer Cache-Abfrage.
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// Datensatz liegt vor.
    Resident(DatasetPayload),
    /// Fetch läuft bereits — kein zweiter Auftrag nötig (Koaleszierung).
    InFlight,
    /// Noch nie angefordert.
    Missing,
}

/// Session-Cache aller Datensätze.
#[derive(Debug, Default)]
pub struct GeometryCache {
    entries: BTreeMap<DatasetKey, CacheEntry>,
}

impl GeometryCache {
    /// Erstellt einen leeren Cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragt den Zustand eines Schlüssels ab.
    pub fn lookup(&self, key: &DatasetKey) -> CacheLookup {
        match self.entries.get(key) {
            Some(CacheEntry::Resident(payload)) => CacheLookup::Resident(payload.clone()),
            Some(CacheEntry::InFlight { .. }) => CacheLookup::InFlight,
            None => CacheLookup::Missing,
        }
    }

    /// Gibt `true` zurück, wenn der Datensatz geladen vorliegt.
    pub fn is_resident(&self, key: &DatasetKey) -> bool {
        matches!(self.entries.get(key), Some(CacheEntry::Resident(_)))
    }

    /// Markiert einen Schlüssel als "Fetch läuft".
    ///
    /// Gibt `false` zurück, wenn bereits ein Fetch läuft oder der Datensatz
    /// vorliegt — genau dann darf kein weiterer Auftrag erzeugt werden.
    pub fn begin_fetch(&mut self, key: DatasetKey, generation: u64) -> bool {
        match self.entries.get(&key) {
            Some(_) => false,
            None => {
                self.entries.insert(key, CacheEntry::InFlight { generation });
                true
            }
        }
    }

    /// Generation des laufenden Fetches, falls einer läuft.
    pub fn in_flight_generation(&self, key: &DatasetKey) -> Option<u64> {
        match self.entries.get(key) {
            Some(CacheEntry::InFlight { generation }) => Some(*generation),
            _ => None,
        }
    }

    /// Legt einen geladenen Datensatz ab (ersetzt eine InFlight-Markierung).
    pub fn insert(&mut self, key: DatasetKey, payload: DatasetPayload) {
        self.entries.insert(key, CacheEntry::Resident(payload));
    }

    /// Entfernt die InFlight-Markierung nach einem Fehlschlag, damit ein
    /// späterer Bedarf erneut laden kann. Bereits geladene Daten bleiben.
    pub fn mark_failed(&mut self, key: &DatasetKey) {
        if let Some(CacheEntry::InFlight { .. }) = self.entries.get(key) {
            self.entries.remove(key);
        }
    }

    /// FeatureCollection eines geladenen Geodatensatzes.
    pub fn features(&self, key: &DatasetKey) -> Option<Arc<FeatureCollection>> {
        match self.entries.get(key) {
            Some(CacheEntry::Resident(DatasetPayload::Features(fc))) => Some(fc.clone()),
            _ => None,
        }
    }

    /// Geladene Modalsplit-Tabelle.
    pub fn mode_share(&self) -> Option<Arc<ModeShareTable>> {
        match self.entries.get(&DatasetKey::ModeShare) {
            Some(CacheEntry::Resident(DatasetPayload::ModeShare(table))) => Some(table.clone()),
            _ => None,
        }
    }

    /// Geladene Passagierzahlen eines Kantons.
    pub fn passenger_counts(&self, canton: &str) -> Option<Arc<StopPassengerCounts>> {
        let key = DatasetKey::TransitPassengerCounts(canton.to_string());
        match self.entries.get(&key) {
            Some(CacheEntry::Resident(DatasetPayload::PassengerCounts(counts))) => {
                Some(counts.clone())
            }
            _ => None,
        }
    }

    /// Geladener Zielverkehr eines Kantons.
    pub fn destination_flows(&self, canton: &str) -> Option<Arc<DestinationFlows>> {
        let key = DatasetKey::DestinationFlows(canton.to_string());
        match self.entries.get(&key) {
            Some(CacheEntry::Resident(DatasetPayload::DestinationFlows(flows))) => {
                Some(flows.clone())
            }
            _ => None,
        }
    }
}
