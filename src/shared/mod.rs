//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Typen, die zwischen `app` und `sync` geteilt werden,
//! um direkte Abhängigkeiten zu vermeiden.

pub mod options;
pub mod scene_spec;

pub use options::{DashboardOptions, DEFAULT_DATA_ROOT};
pub use scene_spec::{
    CameraPadding, CameraRequest, FeatureSubset, FilterExpr, LayerKind, LayerName, LayerSpec,
    PaintKey, PaintValue, SceneDescriptor, SourceData, SourceName, SourceSpec, TextStyle,
};
