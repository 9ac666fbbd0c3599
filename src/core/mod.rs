//! Core module
//!
//! Launcher services used by the GUI and CLI.

pub mod icon;
pub mod instance;
pub mod screenshot;
pub mod task;
pub mod version;
