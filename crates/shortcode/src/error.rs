#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Counter {counter} out of range, must be in [0, {capacity})")]
    OutOfRange { counter: i128, capacity: u64 },

    #[error("Invalid length {found}, expected {expected}")]
    InvalidLength { expected: usize, found: usize },

    #[error("Invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("Invalid code, {0} does not correspond to any counter")]
    InvalidCode(u128),

    /// The scrambled value cannot be written in the configured width.
    ///
    /// Construction rules this out, so it indicates a broken configuration.
    #[error("Value {value} does not fit in {width} digits")]
    Overflow { value: u128, width: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Modulus {0} is too small, must be at least 3")]
    ModulusTooSmall(u64),

    #[error("Modulus {0} is not prime")]
    NotPrime(u64),

    #[error("Generator {generator} must be in [2, {modulus})")]
    InvalidGenerator { generator: u64, modulus: u64 },

    #[error("Generator {generator} is not a primitive root, its order divides {order}")]
    NotPrimitiveRoot { generator: u64, order: u64 },

    #[error("Offset {offset} must be less than {capacity}")]
    InvalidOffset { offset: u64, capacity: u64 },

    #[error("Alphabet must have at least 2 symbols, found {0}")]
    AlphabetTooSmall(usize),

    #[error("Alphabet symbol {0:?} is not printable ASCII")]
    NonAsciiSymbol(char),

    #[error("Alphabet symbol {0:?} appears more than once")]
    DuplicateSymbol(char),

    #[error("Width {width} with radix {radix} cannot represent every residue of modulus {modulus}")]
    WidthTooSmall { modulus: u64, radix: usize, width: usize },

    #[error("Width {width} with radix {radix} exceeds 128 bits")]
    WidthTooLarge { radix: usize, width: usize },

    #[error("Prime factor {factor} of the group order needs a table larger than {limit} entries")]
    FactorTooLarge { factor: u64, limit: usize },
}
