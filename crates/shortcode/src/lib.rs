//! Reversible short codes for sequential counters.
//!
//! A counter is permuted by exponentiation in `(Z/pZ)*` and rendered as a fixed-width
//! string, so adjacent counters produce unrelated codes and no lookup table is needed.
//!
//! ```
//! let codec = shortcode::ShortCodec::reference();
//!
//! assert_eq!(codec.encode(123).unwrap(), "K8$PN");
//! assert_eq!(codec.decode("K8$PN").unwrap(), 123);
//! ```

pub mod alphabet;
pub mod arith;
pub mod config;
pub mod error;
pub mod group;
pub mod radix;

pub use alphabet::Alphabet;
pub use config::CodecConfig;
pub use error::{ConfigError, Error};
pub use group::CyclicGroup;
pub use radix::Radix;

pub use smol_str::SmolStr;

/// Validated, immutable encoder/decoder.
#[derive(Debug, Clone)]
pub struct ShortCodec {
    group: CyclicGroup,
    radix: Radix,
}

static_assertions::assert_impl_all!(ShortCodec: Send, Sync);

impl ShortCodec {
    /// Validates `config` and precomputes the inverse tables.
    ///
    /// Fails if `p` is not prime, `g` is not a primitive root modulo `p`,
    /// the alphabet is malformed, or `radix^width < p`.
    pub fn new(config: &CodecConfig) -> Result<ShortCodec, ConfigError> {
        let alphabet = Alphabet::new(&config.alphabet, config.case_insensitive)?;
        let radix = Radix::new(alphabet, config.width)?;

        if config.modulus as u128 > radix.capacity() {
            return Err(ConfigError::WidthTooSmall {
                modulus: config.modulus,
                radix: radix.alphabet().radix(),
                width: config.width,
            });
        }

        let group = CyclicGroup::new(config.modulus, config.generator, config.offset, config.max_table)?;

        tracing::debug!(
            "Short codes cover {} counters with {} symbols of radix {}",
            group.capacity(),
            radix.width(),
            radix.alphabet().radix()
        );

        Ok(ShortCodec { group, radix })
    }

    /// Codec with the default parameters, see [`CodecConfig::default`]
    pub fn reference() -> ShortCodec {
        match ShortCodec::new(&CodecConfig::default()) {
            Ok(codec) => codec,
            Err(e) => unreachable!("reference configuration is invalid: {e}"),
        }
    }

    pub fn encode(&self, counter: u64) -> Result<SmolStr, Error> {
        self.radix.to_string(self.group.scramble(counter)? as u128)
    }

    /// Like [`encode`](Self::encode), rejecting negative counters as out of range.
    pub fn encode_signed(&self, counter: i64) -> Result<SmolStr, Error> {
        match u64::try_from(counter) {
            Ok(counter) => self.encode(counter),
            Err(_) => Err(Error::OutOfRange {
                counter: counter as i128,
                capacity: self.capacity(),
            }),
        }
    }

    pub fn decode(&self, code: &str) -> Result<u64, Error> {
        let value = self.radix.from_string(code)?;

        match u64::try_from(value) {
            Ok(value) => self.group.unscramble(value),
            Err(_) => Err(Error::InvalidCode(value)),
        }
    }

    #[inline]
    pub fn group(&self) -> &CyclicGroup {
        &self.group
    }

    #[inline]
    pub fn radix(&self) -> &Radix {
        &self.radix
    }

    #[inline]
    pub fn modulus(&self) -> u64 {
        self.group.modulus()
    }

    #[inline]
    pub fn generator(&self) -> u64 {
        self.group.generator()
    }

    #[inline]
    pub fn offset(&self) -> u64 {
        self.group.offset()
    }

    /// Number of encodable counters, `p - 1`
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.group.capacity()
    }

    #[inline]
    pub fn alphabet(&self) -> &Alphabet {
        self.radix.alphabet()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.radix.width()
    }
}
