//! Modalsplit-Tabelle (`mode_share.json`): Mikrozensus vs. Synthetik.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::mode::Mode;

/// Herkunft der Modalsplit-Werte für die Choroplethen-Darstellung.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurveyDataset {
    /// Mikrozensus-Erhebung.
    Microcensus,
    /// Synthetische MATSim-Population.
    Synthetic,
    /// Absolute Differenz Synthetik − Mikrozensus.
    Difference,
}

/// Obergrenze der Differenz-Normalisierung: 10 Prozentpunkte.
pub const DIFFERENCE_CEILING: f64 = 0.1;

/// Eine Zeile der Modalsplit-Tabelle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeShareRecord {
    pub canton_name: String,
    pub mode: Mode,
    pub share: f64,
}

/// Komplette Modalsplit-Tabelle mit vorberechneten Maxima je Modus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeShareTable {
    #[serde(rename = "Microcensus")]
    pub microcensus: Vec<ModeShareRecord>,
    #[serde(rename = "Synthetic")]
    pub synthetic: Vec<ModeShareRecord>,
    /// Maximaler Anteil je Modus über alle Kantone (für die Normalisierung).
    pub max_share_per_mode: BTreeMap<Mode, f64>,
}

impl ModeShareTable {
    /// Anteile eines Modus je Kanton aus einer der beiden Erhebungen.
    fn shares<'a>(&self, records: &'a [ModeShareRecord], mode: Mode) -> BTreeMap<&'a str, f64> {
        records
            .iter()
            .filter(|r| r.mode == mode)
            .map(|r| (r.canton_name.as_str(), r.share))
            .collect()
    }

    /// Maximaler Anteil eines Modus; 1.0 als Rückfallwert, damit die
    /// Normalisierung nie durch 0 teilt.
    pub fn max_share(&self, mode: Mode) -> f64 {
        let max = self.max_share_per_mode.get(&mode).copied().unwrap_or(1.0);
        if max > 0.0 {
            max
        } else {
            1.0
        }
    }

    /// Normalisierte Interpolations-Faktoren je Kanton für einen Modus.
    ///
    /// `Microcensus`/`Synthetic`: Anteil geteilt durch das Modus-Maximum.
    /// `Difference`: |Synthetik − Mikrozensus|, gedeckelt auf
    /// [`DIFFERENCE_CEILING`] und dagegen normalisiert.
    pub fn normalized_factors(&self, dataset: SurveyDataset, mode: Mode) -> BTreeMap<&str, f64> {
        match dataset {
            SurveyDataset::Microcensus => {
                let max = self.max_share(mode);
                self.shares(&self.microcensus, mode)
                    .into_iter()
                    .map(|(canton, share)| (canton, share / max))
                    .collect()
            }
            SurveyDataset::Synthetic => {
                let max = self.max_share(mode);
                self.shares(&self.synthetic, mode)
                    .into_iter()
                    .map(|(canton, share)| (canton, share / max))
                    .collect()
            }
            SurveyDataset::Difference => {
                let micro = self.shares(&self.microcensus, mode);
                let synthetic = self.shares(&self.synthetic, mode);
                micro
                    .iter()
                    .map(|(&canton, &micro_share)| {
                        let synthetic_share = synthetic.get(canton).copied().unwrap_or(0.0);
                        let diff = (synthetic_share - micro_share).abs().min(DIFFERENCE_CEILING);
                        (canton, diff / DIFFERENCE_CEILING)
                    })
                    .collect()
            }
        }
    }
}
