//! Domänen-Typen des Dashboards: Kantone, Modi, Farben, Geodaten.

pub mod bounds;
pub mod canton;
pub mod color;
pub mod destination;
pub mod geojson;
pub mod mode;
pub mod mode_share;
pub mod transit;

pub use bounds::GeoBounds;
pub use canton::{CantonId, CantonRegistry, CANTON_NAME_ATTRIBUTE};
pub use color::Color;
pub use destination::{DestinationFlows, FlowQuery, OutflowSummary};
pub use geojson::{Feature, FeatureCollection, Geometry};
pub use mode::{Mode, ModeFilter};
pub use mode_share::{ModeShareTable, SurveyDataset, DIFFERENCE_CEILING};
pub use transit::{SelectedStop, StopPassengerCounts, TransitLineRef};
