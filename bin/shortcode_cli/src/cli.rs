use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "shortcode.toml";

/// Reversible short codes for sequential counters
#[derive(Debug, argh::FromArgs)]
pub struct CliOptions {
    /// print version information and exit
    #[argh(switch, short = 'V')]
    pub version: bool,

    /// logging level (0 = Info, 1 = Debug, 2 = Trace) [env SHORTCODE_VERBOSE]
    #[argh(option, short = 'v')]
    pub verbose: Option<u8>,

    /// path to the configuration file, TOML or JSON [env SHORTCODE_CONFIG]
    #[argh(option, short = 'c')]
    pub config_path: Option<PathBuf>,

    /// write the default configuration to the config path if none exists
    #[argh(switch)]
    pub write_config: bool,

    #[argh(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, argh::FromArgs)]
#[argh(subcommand)]
pub enum Command {
    Encode(EncodeCommand),
    Decode(DecodeCommand),
    Verify(VerifyCommand),
    Info(InfoCommand),
}

/// encode counters into short codes, one per line
#[derive(Debug, argh::FromArgs)]
#[argh(subcommand, name = "encode")]
pub struct EncodeCommand {
    /// counters to encode (use `--` before negative values)
    #[argh(positional)]
    pub counters: Vec<i128>,
}

/// decode short codes back into counters, one per line
#[derive(Debug, argh::FromArgs)]
#[argh(subcommand, name = "decode")]
pub struct DecodeCommand {
    /// codes to decode
    #[argh(positional)]
    pub codes: Vec<String>,
}

/// check that a range of counters round-trips without collisions
#[derive(Debug, argh::FromArgs)]
#[argh(subcommand, name = "verify")]
pub struct VerifyCommand {
    /// first counter to check
    #[argh(option, default = "0")]
    pub start: u64,

    /// number of counters to check, defaults to the rest of the domain
    #[argh(option)]
    pub count: Option<u64>,
}

/// print the validated codec parameters
#[derive(Debug, argh::FromArgs)]
#[argh(subcommand, name = "info")]
pub struct InfoCommand {}

impl CliOptions {
    pub fn parse() -> Result<Self, anyhow::Error> {
        let mut args: CliOptions = argh::from_env();

        if args.version {
            println!("shortcode {}", crate::built::PKG_VERSION);
            std::process::exit(0);
        }

        if args.verbose.is_none() {
            if let Ok(verbose) = std::env::var("SHORTCODE_VERBOSE") {
                args.verbose = verbose.parse().ok();
            }
        }

        if args.config_path.is_none() {
            args.config_path = std::env::var_os("SHORTCODE_CONFIG").map(PathBuf::from);
        }

        Ok(args)
    }

    pub fn config_path(&self) -> &Path {
        self.config_path.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG_PATH))
    }
}
