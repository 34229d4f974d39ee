//! Preset management commands.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use hallverb_config::{
    Preset, factory_presets, list_user_presets, preset_name_from_path, user_presets_dir,
};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List factory and user presets
    List,

    /// Show the parameters of a preset
    Show {
        /// Preset name or path
        name: String,
    },

    /// Write a preset to a TOML file for editing
    Export {
        /// Preset name or path
        name: String,

        /// Destination file
        path: PathBuf,
    },

    /// Show the user preset directory
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List => list(),
        PresetsCommand::Show { name } => show(&name),
        PresetsCommand::Export { name, path } => export(&name, &path),
        PresetsCommand::Paths => {
            println!("User presets: {}", user_presets_dir().display());
            Ok(())
        }
    }
}

fn list() -> anyhow::Result<()> {
    println!("Factory presets:");
    for preset in factory_presets() {
        println!(
            "  {:16}  {}",
            preset.name,
            preset.description.as_deref().unwrap_or("")
        );
    }

    let user = list_user_presets();
    println!();
    if user.is_empty() {
        println!("No user presets in {}", user_presets_dir().display());
    } else {
        println!("User presets:");
        for path in user {
            if let Some(name) = preset_name_from_path(&path) {
                println!("  {name}");
            }
        }
    }
    Ok(())
}

fn show(name: &str) -> anyhow::Result<()> {
    let preset = Preset::resolve(name)?;
    println!("{}", preset.name);
    println!("{}", "=".repeat(preset.name.len()));
    if let Some(description) = &preset.description {
        println!("{description}");
    }
    if let Some(rate) = preset.sample_rate {
        println!("Sample rate: {rate} Hz");
    }
    println!();
    for (param, value) in preset.validated()? {
        println!("  {:26}  {value}{}", param.key(), param.descriptor().unit.suffix());
    }
    Ok(())
}

fn export(name: &str, path: &Path) -> anyhow::Result<()> {
    let preset = Preset::resolve(name)?;
    preset.save(path)?;
    println!("Exported '{}' to {}", preset.name, path.display());
    Ok(())
}
