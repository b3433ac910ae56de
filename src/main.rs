//! partcfg - command-line front end
//!
//! Loads a partition module configuration the way the installer does and shows
//! what ends up in global storage.

use anyhow::{bail, Result};
use std::rc::Rc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use partcfg::cli::{Cli, Commands};
use partcfg::{
    Config, ConfigurationMap, FixedFirmware, GlobalStorage, INSTALL_CHOICE_NAMES,
    SWAP_CHOICE_NAMES,
};

/// Initialize logging to stderr; `RUST_LOG` overrides the default level
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    match cli.command {
        Commands::Resolve {
            config,
            firmware,
            install,
            swap,
            store_out,
        } => {
            info!("Resolving partition configuration {:?}", config);
            let map = ConfigurationMap::load_from_file(&config)?;

            let gs = GlobalStorage::shared();
            let mut part_config = Config::new(Some(Rc::clone(&gs)));
            if let Some(mode) = firmware {
                part_config = part_config.with_firmware_detector(FixedFirmware(mode));
            }
            part_config.set_configuration_map(&map);

            if let Some(name) = install {
                let Some(choice) = INSTALL_CHOICE_NAMES.find(&name) else {
                    bail!("Unknown install choice '{}'", name);
                };
                part_config.set_install_choice(choice);
            }
            if let Some(name) = swap {
                let Some(choice) = SWAP_CHOICE_NAMES.find(&name) else {
                    bail!("Unknown swap choice '{}'", name);
                };
                if !part_config.swap_choices().contains(choice) {
                    bail!(
                        "Swap choice '{}' is not offered by this configuration (offered: {})",
                        name,
                        part_config.swap_choices()
                    );
                }
                part_config.set_swap_choice(choice);
            }
            part_config.fill_gs_secondary_configuration();

            let json = gs.borrow().to_json_pretty()?;
            println!("{}", json);

            if let Some(path) = store_out {
                gs.borrow().save_to_file(&path)?;
                info!("Global storage written to {:?}", path);
            }
        }
        Commands::Validate { config, strict } => {
            info!("Validating partition configuration {:?}", config);
            let map = ConfigurationMap::load_from_file(&config)?;

            let mut part_config = Config::new(None);
            part_config.set_configuration_map(&map);

            let warnings = part_config.warnings();
            if warnings.is_empty() {
                println!("✓ Configuration is valid: {:?}", config);
            } else {
                for w in warnings {
                    println!("! {}", w);
                }
                println!(
                    "Resolved to install={} swap={} offered={}",
                    part_config.install_choice(),
                    part_config.swap_choice(),
                    part_config.swap_choices()
                );
                if strict {
                    error!("{} warning(s) in strict mode", warnings.len());
                    eprintln!("✗ Configuration has {} warning(s)", warnings.len());
                    std::process::exit(1);
                }
            }
        }
        Commands::Names => {
            println!("Install choices:");
            for (name, choice) in INSTALL_CHOICE_NAMES.entries() {
                println!("  {:<10} {:?}", name, choice);
            }
            println!("Swap choices:");
            for (name, choice) in SWAP_CHOICE_NAMES.entries() {
                println!("  {:<10} {:?}", name, choice);
            }
        }
    }

    Ok(())
}
