pub mod clear;
pub mod config;
pub mod fetch;
pub mod generate;

mod context;
mod display;
mod progress_ui;
mod prompts;
