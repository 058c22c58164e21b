use smol_str::SmolStr;

use crate::alphabet::Alphabet;
use crate::error::{ConfigError, Error};

// radix >= 2 and radix^width <= u128::MAX, so width < 128
const MAX_WIDTH: usize = 128;

/// Fixed-width positional notation over an [`Alphabet`], most significant digit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Radix {
    alphabet: Alphabet,
    width: usize,
    capacity: u128,
}

impl Radix {
    pub fn new(alphabet: Alphabet, width: usize) -> Result<Radix, ConfigError> {
        let radix = alphabet.radix();

        let capacity = u32::try_from(width)
            .ok()
            .and_then(|w| (radix as u128).checked_pow(w))
            .ok_or(ConfigError::WidthTooLarge { radix, width })?;

        Ok(Radix {
            alphabet,
            width,
            capacity,
        })
    }

    #[inline]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of distinct codes, `radix^width`
    #[inline]
    pub fn capacity(&self) -> u128 {
        self.capacity
    }

    /// Renders `value` as exactly `width` symbols, left-padded with the zero symbol.
    pub fn to_string(&self, mut value: u128) -> Result<SmolStr, Error> {
        if value >= self.capacity {
            return Err(Error::Overflow {
                value,
                width: self.width,
            });
        }

        let radix = self.alphabet.radix() as u128;

        let mut buf = [0u8; MAX_WIDTH];
        let out = &mut buf[..self.width];
        out.fill(self.alphabet.zero());

        for c in out.iter_mut().rev() {
            if value == 0 {
                break;
            }

            *c = self.alphabet.symbol((value % radix) as usize);
            value /= radix;
        }

        // SAFETY: alphabet symbols are always ASCII
        Ok(SmolStr::new(unsafe { std::str::from_utf8_unchecked(out) }))
    }

    /// Parses exactly `width` symbols back into their value.
    pub fn from_string(&self, code: &str) -> Result<u128, Error> {
        let found = code.chars().count();

        if found != self.width {
            return Err(Error::InvalidLength {
                expected: self.width,
                found,
            });
        }

        let radix = self.alphabet.radix() as u128;
        let mut value = 0;

        for (position, character) in code.chars().enumerate() {
            let digit = self.alphabet.index_of(character).ok_or(Error::InvalidCharacter { character, position })?;

            // cannot overflow, the result is below capacity
            value = value * radix + digit as u128;
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Radix {
        Radix::new(Alphabet::reference(), 5).unwrap()
    }

    #[test]
    fn test_reference_vectors() {
        let r = reference();

        assert_eq!(r.capacity(), 33554432);

        assert_eq!(r.to_string(0).unwrap(), "BBBBB");
        assert_eq!(r.to_string(1).unwrap(), "BBBBC");
        assert_eq!(r.to_string(1499879).unwrap(), "CR54K");
        assert_eq!(r.to_string(8256874).unwrap(), "K8$PN");
        assert_eq!(r.to_string(33554431).unwrap(), "$$$$$");

        assert_eq!(r.from_string("BBBBB"), Ok(0));
        assert_eq!(r.from_string("BBBBC"), Ok(1));
        assert_eq!(r.from_string("CR54K"), Ok(1499879));
        assert_eq!(r.from_string("$$$$$"), Ok(33554431));
    }

    #[test]
    fn test_case_folding() {
        let r = reference();
        assert_eq!(r.from_string("cr54k"), Ok(1499879));
        assert_eq!(r.from_string("k8$pn"), Ok(8256874));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            reference().to_string(33554432),
            Err(Error::Overflow {
                value: 33554432,
                width: 5
            })
        );
    }

    #[test]
    fn test_malformed() {
        let r = reference();

        assert_eq!(r.from_string(""), Err(Error::InvalidLength { expected: 5, found: 0 }));
        assert_eq!(r.from_string("BBBBBB"), Err(Error::InvalidLength { expected: 5, found: 6 }));
        assert_eq!(r.from_string("BBBB"), Err(Error::InvalidLength { expected: 5, found: 4 }));
        assert_eq!(
            r.from_string("BBABB"),
            Err(Error::InvalidCharacter {
                character: 'A',
                position: 2
            })
        );
        assert_eq!(
            r.from_string("BBBBé"),
            Err(Error::InvalidCharacter {
                character: 'é',
                position: 4
            })
        );
    }

    #[test]
    fn test_beyond_u64() {
        let b62 = Alphabet::new("0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ", false).unwrap();
        let r = Radix::new(b62, 11).unwrap();

        assert_eq!(r.capacity(), 52036560683837093888);
        assert_eq!(r.to_string(u64::MAX as u128).unwrap(), "lYGhA16ahyf");
        assert_eq!(r.from_string("lYGhA16ahyf"), Ok(u64::MAX as u128));
        assert_eq!(r.from_string("ZZZZZZZZZZZ"), Ok(52036560683837093887));
    }

    #[test]
    fn test_width_limits() {
        let binary = Alphabet::new("01", false).unwrap();

        assert!(Radix::new(binary.clone(), 127).is_ok());
        assert_eq!(
            Radix::new(binary, 128),
            Err(ConfigError::WidthTooLarge { radix: 2, width: 128 })
        );

        let r = Radix::new(Alphabet::reference(), 0).unwrap();
        assert_eq!(r.to_string(0).unwrap(), "");
        assert_eq!(r.from_string(""), Ok(0));
    }
}
