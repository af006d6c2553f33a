//! Analysis profile management commands.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use timbre_config::{
    AnalysisConfig, BUILTIN_PROFILES, default_config_path, ensure_user_config_dir,
    list_user_profiles, profile_name_from_path, user_profiles_dir,
};

#[derive(Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    command: ProfilesCommand,
}

#[derive(Subcommand)]
enum ProfilesCommand {
    /// List built-in and saved profiles
    List,

    /// Print the active profile (or a named one) as TOML
    Show {
        /// Built-in profile name; defaults to the active profile
        name: Option<String>,
    },

    /// Save the active profile
    Save {
        /// Profile name, stored in the user profiles directory
        #[arg(conflicts_with = "path")]
        name: Option<String>,

        /// Explicit destination file
        #[arg(long)]
        path: Option<PathBuf>,

        /// Write the default config file instead
        #[arg(long, conflicts_with_all = ["name", "path"])]
        default: bool,
    },
}

pub fn run(args: ProfilesArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    match args.command {
        ProfilesCommand::List => {
            println!("Built-in profiles:");
            for name in BUILTIN_PROFILES {
                println!("  {name}");
            }

            let saved = list_user_profiles();
            println!("\nSaved profiles ({}):", user_profiles_dir().display());
            if saved.is_empty() {
                println!("  (none)");
            }
            for path in saved {
                if let Some(name) = profile_name_from_path(&path) {
                    println!("  {name}");
                }
            }

            let default = default_config_path();
            if default.is_file() {
                println!("\nDefault config: {}", default.display());
            }
        }

        ProfilesCommand::Show { name } => {
            let profile = match name {
                Some(name) => AnalysisConfig::profile(&name)?,
                None => config.clone(),
            };
            print!("{}", profile.to_toml()?);
        }

        ProfilesCommand::Save {
            name,
            path,
            default,
        } => {
            let path = if default {
                ensure_user_config_dir()?;
                default_config_path()
            } else if let Some(path) = path {
                path
            } else {
                let name = name.unwrap_or_else(|| config.name.clone());
                user_profiles_dir().join(format!("{name}.toml"))
            };
            config.save(&path)?;
            tracing::info!(path = %path.display(), profile = %config.name, "saved profile");
            println!("Saved profile '{}' to {}", config.name, path.display());
        }
    }

    Ok(())
}
