pub mod error;
pub mod rule;
pub mod settings;
