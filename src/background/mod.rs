pub mod tasks;

pub use tasks::{Completion, CompletionQueue, CompletionSender, Ticket};
