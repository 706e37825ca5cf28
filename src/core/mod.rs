pub mod config;
pub mod constants;
pub mod controller;
pub mod geo;
pub mod mode;
pub mod viewport;

pub use controller::{InteractionOutcome, ModeController};
pub use mode::{DemoSpec, Mode, ModeSpec, ViewState};
