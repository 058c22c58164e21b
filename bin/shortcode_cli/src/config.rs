use std::io::{self, ErrorKind};
use std::path::Path;

use serde::{Deserialize, Serialize};
use shortcode::config::{REFERENCE_GENERATOR, REFERENCE_MODULUS, REFERENCE_OFFSET, REFERENCE_WIDTH};
use shortcode::CodecConfig;

pub mod util {
    use std::str::FromStr;

    pub fn parse<T: FromStr>(s: &str, default: T) -> T {
        s.parse().unwrap_or(default)
    }

    pub fn parse_bool(s: &str, default: bool) -> bool {
        if s.eq_ignore_ascii_case("true") || s == "1" {
            true
        } else if s.eq_ignore_ascii_case("false") || s == "0" {
            false
        } else {
            default
        }
    }
}

macro_rules! section {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {$(
            $(#[$field_meta:meta])*
            $field_vis:vis $field_name:ident : $field_ty:ty = $field_default:expr
                $(=> $field_env:literal
                    $(| $func:path
                        $([  $($param:expr),* ])?
                    )?
                )?
        ),*$(,)?}
    ) => {
        $(#[$meta])*
        $vis struct $name {$(
            $(#[$field_meta])*
            $field_vis $field_name: $field_ty,
        )*}

        impl Default for $name {
            fn default() -> Self {
                $name {$(
                    $field_name: $field_default,
                )*}
            }
        }

        impl $name {
            pub fn apply_overrides(&mut self) {
                self.apply_overrides_from(|key| std::env::var(key).ok());
            }

            /// Applies overrides looked up by environment variable name
            pub fn apply_overrides_from(&mut self, var: impl Fn(&str) -> Option<String>) {$($(
                if let Some(value) = var($field_env) {
                    log::debug!("Applying environment overwrite for {}.{}=>{}", stringify!($name), stringify!($field_name), $field_env);
                    self.$field_name = ($($func(&value $( $(,$param)* )? ),)? value , ).0.into();
                }
            )?)*}
        }
    };
}

section! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    pub struct Codec {
        /// Prime modulus, counters are in `[0, modulus - 1)`
        pub modulus: u64 = REFERENCE_MODULUS => "SHORTCODE_MODULUS" | util::parse[REFERENCE_MODULUS],
        /// Primitive root modulo `modulus`
        pub generator: u64 = REFERENCE_GENERATOR => "SHORTCODE_GENERATOR" | util::parse[REFERENCE_GENERATOR],
        pub offset: u64 = REFERENCE_OFFSET => "SHORTCODE_OFFSET" | util::parse[REFERENCE_OFFSET],
        pub alphabet: String = shortcode::alphabet::REFERENCE.to_owned() => "SHORTCODE_ALPHABET",
        pub width: usize = REFERENCE_WIDTH => "SHORTCODE_WIDTH" | util::parse[REFERENCE_WIDTH],
        pub case_insensitive: bool = true => "SHORTCODE_CASE_INSENSITIVE" | util::parse_bool[true],
        /// Limit on discrete log table entries per prime factor of `modulus - 1`
        pub max_table: usize = shortcode::group::DEFAULT_MAX_TABLE => "SHORTCODE_MAX_TABLE" | util::parse[shortcode::group::DEFAULT_MAX_TABLE],
    }
}

impl Codec {
    pub fn to_codec_config(&self) -> CodecConfig {
        CodecConfig {
            modulus: self.modulus,
            generator: self.generator,
            offset: self.offset,
            alphabet: self.alphabet.as_str().into(),
            width: self.width,
            case_insensitive: self.case_insensitive,
            max_table: self.max_table,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub codec: Codec,
}

impl Config {
    pub fn apply_overrides(&mut self) {
        self.codec.apply_overrides();
    }
}

enum Format {
    TOML,
    JSON,
}

fn get_format(path: &Path) -> Format {
    let mut format = Format::TOML;
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case("json") {
            format = Format::JSON;
        }
    }
    format
}

fn parse(path: &Path, file: &str) -> io::Result<Config> {
    match get_format(path) {
        Format::TOML => toml::from_str(file).map_err(|e| io::Error::new(ErrorKind::InvalidData, e)),
        Format::JSON => serde_json::from_str(file).map_err(|e| io::Error::new(ErrorKind::InvalidData, e)),
    }
}

/// Returns the parsed config, or `(true, default)` if the file does not exist
pub fn load(path: impl AsRef<Path>) -> io::Result<(bool, Config)> {
    let path = path.as_ref();

    let file = match std::fs::read_to_string(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok((true, Config::default())),
        Err(e) => return Err(e),
    };

    parse(path, &file).map(|config| (false, config))
}

pub fn save(path: impl AsRef<Path>, config: &Config) -> io::Result<()> {
    let path = path.as_ref();

    let file = match get_format(path) {
        Format::TOML => toml::to_string(config).map_err(|e| io::Error::new(ErrorKind::InvalidData, e)),
        Format::JSON => serde_json::to_string_pretty(config).map_err(|e| io::Error::new(ErrorKind::InvalidData, e)),
    }?;

    std::fs::write(path, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let config = parse(
            Path::new("shortcode.toml"),
            r#"
            [codec]
            modulus = 997
            generator = 7
            alphabet = "0123456789"
            width = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.codec.modulus, 997);
        assert_eq!(config.codec.generator, 7);
        assert_eq!(config.codec.offset, REFERENCE_OFFSET);
        assert_eq!(config.codec.width, 3);
        assert!(config.codec.case_insensitive);

        let codec = shortcode::ShortCodec::new(&config.codec.to_codec_config()).unwrap();
        assert_eq!(codec.capacity(), 996);
    }

    #[test]
    fn test_parse_json() {
        let config = parse(Path::new("shortcode.json"), r#"{"codec": {"offset": 0}}"#).unwrap();

        assert_eq!(config.codec.offset, 0);
        assert_eq!(config.codec.modulus, REFERENCE_MODULUS);
    }

    #[test]
    fn test_reject_unknown_field() {
        let err = parse(Path::new("shortcode.toml"), "[codec]\nprime = 7\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_default_matches_library() {
        assert_eq!(Config::default().codec.to_codec_config(), CodecConfig::default());
    }

    #[test]
    fn test_roundtrip_file() {
        let dir = std::env::temp_dir().join(format!("shortcode-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        for name in ["config.toml", "config.json"] {
            let path = dir.join(name);
            let mut config = Config::default();
            config.codec.offset = 12;

            save(&path, &config).unwrap();
            assert_eq!(load(&path).unwrap(), (false, config));
        }

        assert_eq!(load(dir.join("missing.toml")).unwrap(), (true, Config::default()));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_env_overrides() {
        let vars: hashbrown::HashMap<&str, &str> = hashbrown::HashMap::from([
            ("SHORTCODE_OFFSET", "7"),
            ("SHORTCODE_CASE_INSENSITIVE", "false"),
            ("SHORTCODE_WIDTH", "not a number"),
        ]);

        let mut config = Config::default();
        config.codec.apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.codec.offset, 7);
        assert!(!config.codec.case_insensitive);
        assert_eq!(config.codec.width, REFERENCE_WIDTH);
        assert_eq!(config.codec.modulus, REFERENCE_MODULUS);
    }
}
