pub mod base;
pub mod manager;
pub mod style;
