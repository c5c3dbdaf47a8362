//! Deserialisierung der vom Host gelieferten Datensatz-Bodies.

use std::sync::Arc;

use anyhow::Context;

use crate::core::{DestinationFlows, FeatureCollection, ModeShareTable, StopPassengerCounts};

use super::cache::DatasetPayload;
use super::dataset::{DatasetKey, DatasetKind};

/// Parst einen Response-Body entsprechend dem Datensatz-Typ.
pub fn parse_payload(key: &DatasetKey, body: &str) -> anyhow::Result<DatasetPayload> {
    let payload = match key.kind() {
        DatasetKind::Features => {
            let fc: FeatureCollection = serde_json::from_str(body)
                .with_context(|| format!("GeoJSON-Parse fehlgeschlagen: {key}"))?;
            DatasetPayload::Features(Arc::new(fc))
        }
        DatasetKind::ModeShare => {
            let table: ModeShareTable = serde_json::from_str(body)
                .with_context(|| format!("Modalsplit-Parse fehlgeschlagen: {key}"))?;
            DatasetPayload::ModeShare(Arc::new(table))
        }
        DatasetKind::PassengerCounts => {
            let counts: StopPassengerCounts = serde_json::from_str(body)
                .with_context(|| format!("Passagierzahlen-Parse fehlgeschlagen: {key}"))?;
            DatasetPayload::PassengerCounts(Arc::new(counts))
        }
        DatasetKind::DestinationFlows => {
            let flows: DestinationFlows = serde_json::from_str(body)
                .with_context(|| format!("Zielverkehr-Parse fehlgeschlagen: {key}"))?;
            DatasetPayload::DestinationFlows(Arc::new(flows))
        }
    };
    Ok(payload)
}
