//! Zielverkehr eines Kantons: Abflüsse je Zielkanton, Modus und Zweck.
//!
//! Der Datensatz (`plot_data/{kanton}.json`) liefert je Kombination aus
//! Zielkanton, Modus und Wegzweck die Wegezahlen in 15-Minuten-Bins.
//! Das Panel rendert daraus selbst; hier liegt nur die Aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::mode::Mode;

/// Anzahl 15-Minuten-Slots eines Tages.
pub const TIME_SLOTS_PER_DAY: u16 = 96;

/// Eine Zeile des Zielverkehr-Datensatzes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationFlowRecord {
    pub destination: String,
    pub mode: String,
    pub purpose: String,
    /// Wegezahlen je Startzeit im Format `HH:MM`.
    pub time_bins: BTreeMap<String, f64>,
}

/// Kompletter Zielverkehr-Datensatz eines Quellkantons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationFlows {
    pub records: Vec<DestinationFlowRecord>,
}

/// Filter über den Zielverkehr; `None` bedeutet keine Einschränkung.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowQuery {
    pub destination: Option<String>,
    pub mode: Option<Mode>,
    pub purpose: Option<String>,
    /// Zeitfenster als inklusives Slot-Intervall (0..=96).
    pub time_window: Option<(u16, u16)>,
}

/// Aggregierte Abflüsse: Gesamtwerte je Modus und je Zielkanton.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutflowSummary {
    pub total: f64,
    pub per_mode: BTreeMap<String, f64>,
    pub per_destination: BTreeMap<String, f64>,
}

/// Übersetzt `HH:MM` in den 15-Minuten-Slot-Index.
pub fn time_to_slot(time: &str) -> Option<u16> {
    let (hours, minutes) = time.split_once(':')?;
    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    if hours > 24 || minutes > 59 {
        return None;
    }
    Some(hours * 4 + minutes / 15)
}

impl DestinationFlows {
    /// Aggregiert die gefilterten Zeit-Bins zu einer sortierten Zeitreihe
    /// `(HH:MM, Wegezahl)`.
    pub fn aggregate_time_series(&self, query: &FlowQuery) -> Vec<(String, f64)> {
        let mut bins: BTreeMap<&str, f64> = BTreeMap::new();
        for record in self.filtered(query) {
            for (time, count) in &record.time_bins {
                if !Self::in_window(time, query.time_window) {
                    continue;
                }
                *bins.entry(time.as_str()).or_insert(0.0) += count;
            }
        }
        bins.into_iter()
            .map(|(time, count)| (time.to_string(), count))
            .collect()
    }

    /// Summiert Abflüsse je Modus und Zielkanton innerhalb des Zeitfensters.
    ///
    /// Der Zielkanton-Filter der Query greift hier bewusst nicht: die
    /// Übersicht zeigt immer alle Ziele, nur Zweck und Zeitfenster wirken.
    pub fn outflow_summary(&self, query: &FlowQuery) -> OutflowSummary {
        let mut summary = OutflowSummary::default();
        for record in &self.records {
            if let Some(purpose) = &query.purpose {
                if &record.purpose != purpose {
                    continue;
                }
            }
            for (time, count) in &record.time_bins {
                if !Self::in_window(time, query.time_window) {
                    continue;
                }
                summary.total += count;
                *summary
                    .per_mode
                    .entry(record.mode.clone())
                    .or_insert(0.0) += count;
                *summary
                    .per_destination
                    .entry(record.destination.clone())
                    .or_insert(0.0) += count;
            }
        }
        summary
    }

    fn filtered<'a>(&'a self, query: &'a FlowQuery) -> impl Iterator<Item = &'a DestinationFlowRecord> {
        self.records.iter().filter(move |record| {
            if let Some(destination) = &query.destination {
                if &record.destination != destination {
                    return false;
                }
            }
            if let Some(mode) = query.mode {
                if record.mode != mode.as_str() {
                    return false;
                }
            }
            if let Some(purpose) = &query.purpose {
                if &record.purpose != purpose {
                    return false;
                }
            }
            true
        })
    }

    fn in_window(time: &str, window: Option<(u16, u16)>) -> bool {
        let Some((from, to)) = window else {
            return true;
        };
        match time_to_slot(time) {
            Some(slot) => slot >= from && slot <= to,
            None => false,
        }
    }
}
