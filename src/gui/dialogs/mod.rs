//! Dialog windows

pub mod add_instance;
pub mod instance_settings;

pub use add_instance::{AddInstanceDialog, AddInstanceServices, ValidationError};
pub use instance_settings::InstanceSettingsDialog;
