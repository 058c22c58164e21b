extern crate tracing as log;

use anyhow::Context;
use shortcode::ShortCodec;

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

use cli::CliOptions;
use config::Config;

fn load_config(args: &CliOptions) -> anyhow::Result<Config> {
    let path = args.config_path();

    log::info!("Loading config from: {}", path.display());
    let (missing, mut config) =
        config::load(path).with_context(|| format!("Failed to load config from {}", path.display()))?;

    if missing {
        if args.write_config {
            log::warn!("Config file not found, writing defaults to {}", path.display());
            config::save(path, &config)?;
        } else {
            log::debug!("Config file not found, using reference parameters");
        }
    }

    log::debug!("Applying environment overrides to configuration");
    config.apply_overrides();

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args = CliOptions::parse()?;

    log::dispatcher::set_global_default(logging::generate(args.verbose)?)?;
    log::debug!("Arguments: {:?}", args);

    let config = load_config(&args)?;

    let codec = ShortCodec::new(&config.codec.to_codec_config()).context("Invalid codec configuration")?;
    log::debug!("Codec: {:?}", codec);

    let Some(ref command) = args.command else {
        if args.write_config {
            return Ok(());
        }

        anyhow::bail!("No command given, see --help");
    };

    let stdout = std::io::stdout();
    commands::run(&codec, command, &mut stdout.lock())
}

pub mod built {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
