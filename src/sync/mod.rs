//! Abgleich mit der Rendering-Oberfläche: Reconciler, Viewport, Animation.

pub mod flow;
pub mod reconciler;
pub mod recording;
pub mod surface;
pub mod viewport;

pub use flow::{FlowAnimator, FLOW_DASH_SEQUENCE};
pub use reconciler::{LayerReconciler, SyncReport};
pub use recording::{RecordingSurface, SurfaceOp};
pub use surface::RenderSurface;
pub use viewport::ViewportController;
