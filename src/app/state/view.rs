//! View-bezogener Anwendungszustand: Panel-Layout.

use crate::shared::DashboardOptions;

use super::selection::ActiveModule;

/// Breitenklasse des Seiten-Panels; bestimmt nur das Viewport-Padding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanelLayout {
    /// Panel eingeklappt.
    Collapsed,
    /// Panel offen ohne breites Modul.
    Standard,
    /// Mittelbreite Module (600px-Plots).
    Wide,
    /// Breiteste Module (900px-Plots).
    ExtraWide,
}

impl PanelLayout {
    /// Leitet die Breitenklasse aus Panel-Zustand und Modul ab.
    pub fn derive(sidebar_open: bool, module: Option<ActiveModule>) -> Self {
        if !sidebar_open {
            return Self::Collapsed;
        }
        match module {
            Some(
                ActiveModule::StackedModeShare | ActiveModule::ModeShareTrend,
            ) => Self::ExtraWide,
            Some(
                ActiveModule::AverageDistance
                | ActiveModule::DistanceHistogram
                | ActiveModule::Volumes
                | ActiveModule::Transit
                | ActiveModule::Destination,
            ) => Self::Wide,
            _ => Self::Standard,
        }
    }

    /// Rechtes Viewport-Padding dieser Breitenklasse.
    pub fn right_padding(self, options: &DashboardOptions) -> f64 {
        match self {
            Self::Collapsed => options.padding_collapsed_px,
            Self::Standard => options.padding_standard_px,
            Self::Wide => options.padding_wide_px,
            Self::ExtraWide => options.padding_extra_wide_px,
        }
    }
}

/// View-bezogener Anwendungszustand.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Ob das Seiten-Panel offen ist.
    pub sidebar_open: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Erstellt den Standard-View-Zustand (Panel offen).
    pub fn new() -> Self {
        Self { sidebar_open: true }
    }

    /// Aktuelle Breitenklasse des Panels.
    pub fn panel_layout(&self, module: Option<ActiveModule>) -> PanelLayout {
        PanelLayout::derive(self.sidebar_open, module)
    }
}
