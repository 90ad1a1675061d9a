pub mod app;
pub mod defaults;
