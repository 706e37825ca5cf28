pub mod events;
pub mod handler;

pub use events::{Cursor, InteractionEvent, InteractionKind};
pub use handler::HandlerRegistry;
