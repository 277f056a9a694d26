pub mod api;
pub mod commands;
pub mod config;
pub mod runtime;
pub mod state;
pub mod validate;
