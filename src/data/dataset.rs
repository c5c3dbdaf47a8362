//! Datensatz-Schlüssel und deren URL-Auflösung.
//!
//! Jeder Datensatz liegt als statisches JSON/GeoJSON unter einem Daten-Root.
//! Die Pfad-Konventionen entsprechen dem publizierten Datenlayout
//! (`matsim/...`, `plot_data/...`).

use crate::core::CantonId;
use crate::shared::DashboardOptions;

/// Eindeutiger Schlüssel eines ladbaren Datensatzes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetKey {
    /// Kantonsgrenzen (landesweit).
    CantonBoundaries,
    /// Modalsplit-Tabelle (landesweit).
    ModeShare,
    /// MATSim-Straßennetz eines Kantons.
    Network(CantonId),
    /// Transit-Haltestellen eines Kantons.
    TransitStops(CantonId),
    /// Passagierzahlen je Haltestelle eines Kantons.
    TransitPassengerCounts(CantonId),
    /// Transit-Routen (landesweit).
    TransitRoutes,
    /// Zielverkehr eines Quellkantons.
    DestinationFlows(CantonId),
}

/// Deserialisierungs-Ziel eines Datensatzes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DatasetKind {
    /// GeoJSON-FeatureCollection.
    Features,
    /// Tabellarische Modalsplit-Werte.
    ModeShare,
    /// Passagierzahlen in Zeit-Bins.
    PassengerCounts,
    /// Zielverkehr in Zeit-Bins.
    DestinationFlows,
}

impl DatasetKey {
    /// Deserialisierungs-Ziel dieses Schlüssels.
    pub fn kind(&self) -> DatasetKind {
        match self {
            Self::CantonBoundaries | Self::Network(_) | Self::TransitStops(_) | Self::TransitRoutes => {
                DatasetKind::Features
            }
            Self::ModeShare => DatasetKind::ModeShare,
            Self::TransitPassengerCounts(_) => DatasetKind::PassengerCounts,
            Self::DestinationFlows(_) => DatasetKind::DestinationFlows,
        }
    }

    /// Relativer Pfad unterhalb des Daten-Roots.
    pub fn relative_path(&self) -> String {
        match self {
            Self::CantonBoundaries => "TLM_KANTONSGEBIET.geojson".to_string(),
            Self::ModeShare => "mode_share.json".to_string(),
            Self::Network(canton) => format!("matsim/matsim_network_{canton}.geojson"),
            Self::TransitStops(canton) => format!("matsim/transit/{canton}_stops.geojson"),
            Self::TransitPassengerCounts(canton) => {
                format!("matsim/transit/{canton}_pt_passenger_counts.json")
            }
            Self::TransitRoutes => "matsim/transit/transit_routes.geojson".to_string(),
            Self::DestinationFlows(canton) => format!("plot_data/{canton}.json"),
        }
    }

    /// Gibt `true` zurück, wenn der Datensatz planmäßig fehlen darf
    /// (z.B. Kantone ohne simuliertes Straßennetz: 404 ist kein Fehlerfall).
    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::TransitStops(_) | Self::TransitPassengerCounts(_)
        )
    }
}

impl std::fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.relative_path())
    }
}

/// Fetch-Auftrag an den Host: Kandidaten-URLs in Prioritätsreihenfolge.
///
/// Der Host probiert die Kandidaten der Reihe nach (konfigurierter Root,
/// dann Standard-Root) und meldet Erfolg oder Misserfolg als Intent zurück.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub key: DatasetKey,
    pub candidates: Vec<String>,
    /// Deskriptor-Generation, die den Fetch ausgelöst hat.
    pub generation: u64,
}

impl FetchRequest {
    /// Baut den Auftrag aus den Options (Root-Override + Standard-Root).
    pub fn new(key: DatasetKey, options: &DashboardOptions, generation: u64) -> Self {
        let path = key.relative_path();
        let mut candidates: Vec<String> = Vec::new();
        for root in options.data_root_candidates() {
            let url = format!("{}{}", root, path);
            if !candidates.contains(&url) {
                candidates.push(url);
            }
        }
        Self {
            key,
            candidates,
            generation,
        }
    }
}
