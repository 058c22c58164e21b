use std::fmt;

use smol_str::SmolStr;

use crate::error::ConfigError;

/// Base32 without vowels or lookalikes, so codes don't spell words.
pub const REFERENCE: &str = "BCDFGHJKLMNPQRSTVWXYZ23456789@*$";

const INVALID: u8 = 0xFF;

/// Ordered set of printable ASCII symbols. Position 0 is the padding symbol.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: SmolStr,
    lookup: [u8; 128],
    case_insensitive: bool,
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alphabet")
            .field("symbols", &self.symbols)
            .field("case_insensitive", &self.case_insensitive)
            .finish()
    }
}

impl Alphabet {
    /// Builds an alphabet from `symbols`, in order.
    ///
    /// With `case_insensitive`, an input character missing from the alphabet is retried
    /// with its ASCII case swapped, so two symbols may not differ only by case.
    pub fn new(symbols: &str, case_insensitive: bool) -> Result<Alphabet, ConfigError> {
        let mut lookup = [INVALID; 128];
        let mut radix = 0;

        for c in symbols.chars() {
            if !c.is_ascii_graphic() {
                return Err(ConfigError::NonAsciiSymbol(c));
            }

            let b = c as u8;

            if lookup[b as usize] != INVALID {
                return Err(ConfigError::DuplicateSymbol(c));
            }

            lookup[b as usize] = radix as u8;
            radix += 1;
        }

        if radix < 2 {
            return Err(ConfigError::AlphabetTooSmall(radix));
        }

        if case_insensitive {
            for (idx, b) in symbols.bytes().enumerate() {
                let swapped = swap_case(b);

                if swapped == b {
                    continue;
                }

                match lookup[swapped as usize] {
                    INVALID => lookup[swapped as usize] = idx as u8,
                    other if other as usize == idx => {}
                    _ => return Err(ConfigError::DuplicateSymbol(swapped as char)),
                }
            }
        }

        Ok(Alphabet {
            symbols: SmolStr::new(symbols),
            lookup,
            case_insensitive,
        })
    }

    /// The default 32-symbol alphabet, folding lowercase input to uppercase.
    pub fn reference() -> Alphabet {
        match Alphabet::new(REFERENCE, true) {
            Ok(alphabet) => alphabet,
            Err(e) => unreachable!("reference alphabet is invalid: {e}"),
        }
    }

    #[inline]
    pub fn radix(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.symbols
    }

    #[inline]
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// The padding symbol
    #[inline]
    pub fn zero(&self) -> u8 {
        self.symbols.as_bytes()[0]
    }

    /// Symbol for digit `d`, `d < radix`
    #[inline]
    pub fn symbol(&self, d: usize) -> u8 {
        self.symbols.as_bytes()[d]
    }

    /// Digit value of `c`, if it belongs to the alphabet
    #[inline]
    pub fn index_of(&self, c: char) -> Option<usize> {
        if !c.is_ascii() {
            return None;
        }

        match self.lookup[c as usize] {
            INVALID => None,
            d => Some(d as usize),
        }
    }
}

#[inline]
fn swap_case(b: u8) -> u8 {
    match b {
        b'a'..=b'z' => b.to_ascii_uppercase(),
        b'A'..=b'Z' => b.to_ascii_lowercase(),
        _ => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference() {
        let a = Alphabet::reference();

        assert_eq!(a.radix(), 32);
        assert_eq!(a.zero(), b'B');
        assert_eq!(a.index_of('B'), Some(0));
        assert_eq!(a.index_of('$'), Some(31));
        assert_eq!(a.index_of('k'), a.index_of('K'));
        assert_eq!(a.index_of('A'), None);
        assert_eq!(a.index_of('0'), None);
        assert_eq!(a.index_of('é'), None);
    }

    #[test]
    fn test_case_sensitive() {
        let a = Alphabet::new("0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ", false).unwrap();

        assert_eq!(a.radix(), 62);
        assert_eq!(a.index_of('a'), Some(10));
        assert_eq!(a.index_of('A'), Some(36));
    }

    #[test]
    fn test_case_collision() {
        assert_eq!(Alphabet::new("abcA", true), Err(ConfigError::DuplicateSymbol('A')));
        assert!(Alphabet::new("abcA", false).is_ok());
    }

    #[test]
    fn test_invalid() {
        assert_eq!(Alphabet::new("a", false), Err(ConfigError::AlphabetTooSmall(1)));
        assert_eq!(Alphabet::new("", false), Err(ConfigError::AlphabetTooSmall(0)));
        assert_eq!(Alphabet::new("abca", false), Err(ConfigError::DuplicateSymbol('a')));
        assert_eq!(Alphabet::new("ab c", false), Err(ConfigError::NonAsciiSymbol(' ')));
        assert_eq!(Alphabet::new("abç", false), Err(ConfigError::NonAsciiSymbol('ç')));
    }
}
