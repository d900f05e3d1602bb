pub mod action;
pub mod alert;
pub mod app;
pub mod config;
pub mod event;
pub mod format;
pub mod logging;
pub mod monitor;
pub mod system;
pub mod ui;
