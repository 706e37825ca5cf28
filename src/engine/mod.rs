pub mod headless;

pub use headless::{CameraMove, HeadlessEngine};
