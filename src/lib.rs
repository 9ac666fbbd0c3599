//! CRLauncher library root
//!
//! Launcher services, configuration and the egui front end.

pub mod cli;
pub mod config;
pub mod core;
pub mod gui;
pub mod util;

pub use config::{Config, SettingsStore};
