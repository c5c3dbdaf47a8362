//! Application State — zentrale Datenhaltung.

mod app_state;
mod selection;
mod ui;
mod view;

pub use app_state::AppState;
pub use selection::{ActiveModule, SelectionState};
pub use ui::UiState;
pub use view::{PanelLayout, ViewState};
