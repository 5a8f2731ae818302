pub mod app;
pub mod config;
pub mod events;
pub mod macros;
pub mod menu;
pub mod profile;
pub mod sys;
