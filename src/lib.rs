#[macro_use]
pub mod dialog;

pub mod command;
pub mod config;
pub mod date;
pub mod error;
pub mod interpreter;
pub mod navigator;
pub mod prompt;
pub mod render;
pub mod store;
