//! CLI module
//!
//! Command-line interface for CRLauncher.

mod args;

pub use args::{Args, Commands};

use crate::config::SettingsStore;
use crate::core::instance::{InstanceError, InstanceManager};
use crate::core::screenshot;
use anyhow::{Context, Result};

/// Run a subcommand
pub fn handle_command(command: Commands, settings: &SettingsStore) -> Result<()> {
    let manager = InstanceManager::new();
    match command {
        Commands::Create {
            name,
            version,
            group,
            auto_update,
        } => create_instance(
            &manager,
            &name,
            &group,
            &version,
            auto_update || settings.update_to_latest(),
        ),
        Commands::Screenshots { instance } => list_screenshots(&manager, &instance),
    }
}

/// List all available instances
pub fn list_instances(manager: &InstanceManager) -> Result<()> {
    let instances = manager.list()?;

    if instances.is_empty() {
        println!("📦 No instances found.");
        println!("   Use 'crlauncher create <name> --version <ver>' to create one.");
        return Ok(());
    }

    println!("📦 Instances ({}):", instances.len());
    println!();

    for instance in &instances {
        let group = if instance.group.is_empty() {
            String::new()
        } else {
            format!(" [{}]", instance.group)
        };
        println!("   {} - {}{}", instance.name, instance.version, group);
    }

    Ok(())
}

/// Create a new instance from CLI
pub fn create_instance(
    manager: &InstanceManager,
    name: &str,
    group: &str,
    version: &str,
    auto_update: bool,
) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Instance name cannot be empty");
    }

    println!("📦 Creating instance '{}'...", name);
    println!("   Version: {}", version);

    match manager.create(name, group, version, auto_update) {
        Ok(_) => {
            println!("✅ Instance '{}' created successfully!", name);
            Ok(())
        }
        Err(e @ InstanceError::AlreadyExists(_)) => {
            tracing::warn!("{}", e);
            Err(e.into())
        }
        Err(e) => Err(anyhow::Error::new(e).context("Unable to create new instance")),
    }
}

/// Print the screenshots the GUI would show for an instance
pub fn list_screenshots(manager: &InstanceManager, name: &str) -> Result<()> {
    manager
        .load(name)
        .with_context(|| format!("Instance '{}' not found", name))?;

    let dir = manager.screenshots_dir(name);
    let images = match screenshot::list_images(&dir) {
        Ok(images) => images,
        Err(e) => {
            tracing::debug!("{}", e);
            Vec::new()
        }
    };

    if images.is_empty() {
        println!("🖼 No screenshots in {}", dir.display());
        return Ok(());
    }

    println!("🖼 Screenshots ({}):", images.len());
    for path in images {
        println!("   {}", path.display());
    }
    Ok(())
}
