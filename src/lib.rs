pub mod app;
pub mod catalog;
pub mod config;
pub mod logging;
