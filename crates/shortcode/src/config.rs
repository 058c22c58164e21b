use smol_str::SmolStr;

use crate::{alphabet, group};

/// 25-bit prime, `p - 1 = 2 * 3 * 5 * 7 * 11 * 17 * 19 * 23`
pub const REFERENCE_MODULUS: u64 = 17160991;
/// Smallest prime primitive root of `REFERENCE_MODULUS`
pub const REFERENCE_GENERATOR: u64 = 61;
/// Keeps counter 0 away from 1 and counter 1 away from the generator itself
pub const REFERENCE_OFFSET: u64 = 30;
pub const REFERENCE_WIDTH: usize = 5;

/// Unvalidated codec parameters. See [`ShortCodec::new`](crate::ShortCodec::new).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct CodecConfig {
    /// Prime modulus `p`, counters are in `[0, p - 1)`
    pub modulus: u64,
    /// Primitive root modulo `p`
    pub generator: u64,
    /// Added to the counter before exponentiation
    pub offset: u64,
    pub alphabet: SmolStr,
    /// Symbols per code
    pub width: usize,
    /// Accept input symbols in either ASCII case
    pub case_insensitive: bool,
    /// Upper bound on baby-step table entries per prime factor of `p - 1`
    pub max_table: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            modulus: REFERENCE_MODULUS,
            generator: REFERENCE_GENERATOR,
            offset: REFERENCE_OFFSET,
            alphabet: SmolStr::new(alphabet::REFERENCE),
            width: REFERENCE_WIDTH,
            case_insensitive: true,
            max_table: group::DEFAULT_MAX_TABLE,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial() {
        let config: CodecConfig = serde_json::from_str(r#"{"modulus": 997, "generator": 7, "width": 2}"#).unwrap();

        assert_eq!(config.modulus, 997);
        assert_eq!(config.generator, 7);
        assert_eq!(config.width, 2);
        assert_eq!(config.alphabet, alphabet::REFERENCE);
        assert_eq!(config.offset, REFERENCE_OFFSET);
    }

    #[test]
    fn test_deny_unknown() {
        assert!(serde_json::from_str::<CodecConfig>(r#"{"radix": 32}"#).is_err());
    }
}
