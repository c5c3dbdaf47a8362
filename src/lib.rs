//! MATSim Webmap — Szenen-Synchronisation für das Kantons-Dashboard.
//! Kernfunktionalität als Library exportiert für Hosts und Tests.

pub mod app;
pub mod core;
pub mod data;
pub mod shared;
pub mod sync;

pub use app::{
    ActiveModule, AppCommand, AppController, AppIntent, AppState, PanelLayout, SelectionState,
    UiState, ViewState,
};
pub use core::{
    CantonRegistry, Color, DestinationFlows, FeatureCollection, GeoBounds, Mode, ModeFilter,
    ModeShareTable, SelectedStop, StopPassengerCounts, SurveyDataset,
};
pub use data::{DatasetKey, FetchRequest, GeometryCache};
pub use shared::{CameraRequest, DashboardOptions, SceneDescriptor};
pub use sync::{
    FlowAnimator, LayerReconciler, RecordingSurface, RenderSurface, SurfaceOp, SyncReport,
    ViewportController,
};
