//! Scraper panel core: pure control state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{CommandOutcome, Msg};
pub use state::{AppState, ClientIntent, JobStatus, ModeChange, RemoteStatus};
pub use update::update;
pub use view_model::{JobLabel, ModeLabel, PanelViewModel};
