//! Permutation of `[0, p - 1)` by exponentiation in the multiplicative group `(Z/pZ)*`.
//!
//! A counter `c` maps to `g^(c + offset) mod p`. Since `g` is a primitive root, its powers
//! enumerate every nonzero residue exactly once, so the map is a bijection onto `[1, p - 1]`.
//! The inverse is a discrete logarithm, computed with Pohlig-Hellman over the factorization
//! of the group order and baby-step giant-step within each prime-order subgroup.

use std::fmt;

use hashbrown::HashMap;

use crate::arith::{add_mod, factorize, is_prime, mod_inverse, mul_mod, pow_mod};
use crate::error::{ConfigError, Error};

/// Default limit on baby-step table entries per prime factor of the group order.
pub const DEFAULT_MAX_TABLE: usize = 1 << 20;

/// Smallest `r` such that `r * r >= n`
fn ceil_sqrt(n: u64) -> u64 {
    let n = n as u128;
    let mut r = (n as f64).sqrt() as u128;

    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }

    (if r * r == n { r } else { r + 1 }) as u64
}

/// Discrete log tables for the Sylow subgroup of order `prime^exponent`
#[derive(Clone)]
struct Subgroup {
    prime: u64,
    exponent: u32,

    /// Inverse of `g^(n / prime^exponent)`, which generates the subgroup of order `prime^exponent`
    generator_inv: u64,

    /// Multiplier taking a residue mod `prime^exponent` into its CRT contribution mod `n`
    crt: u64,

    /// `gamma^j -> j` for `gamma` of order `prime`, `j < step`
    baby: HashMap<u64, u64>,
    step: u64,
    /// `gamma^-step`
    giant: u64,
}

impl Subgroup {
    fn new(modulus: u64, generator: u64, prime: u64, exponent: u32) -> Subgroup {
        let order = modulus - 1;
        let size = prime.pow(exponent);
        let cofactor = order / size;

        let sub_gen = pow_mod(generator, cofactor, modulus);
        let gamma = pow_mod(sub_gen, prime.pow(exponent - 1), modulus);

        // cofactor is coprime to size by construction
        let crt = match mod_inverse(cofactor % size, size) {
            Some(inv) => mul_mod(cofactor, inv, order),
            None => unreachable!("cofactor {cofactor} not invertible mod {size}"),
        };

        let step = ceil_sqrt(prime);
        let mut baby = HashMap::with_capacity(step as usize);

        let mut x = 1;
        for j in 0..step {
            baby.entry(x).or_insert(j);
            x = mul_mod(x, gamma, modulus);
        }

        Subgroup {
            prime,
            exponent,
            generator_inv: pow_mod(sub_gen, modulus - 2, modulus),
            crt,
            baby,
            step,
            giant: pow_mod(gamma, prime - step, modulus),
        }
    }

    /// Solves `gamma^x == h` for `x < prime`
    fn prime_log(&self, h: u64, modulus: u64) -> Option<u64> {
        let mut y = h;

        for i in 0..self.step {
            if let Some(j) = self.baby.get(&y) {
                return Some(i * self.step + j);
            }
            y = mul_mod(y, self.giant, modulus);
        }

        None
    }

    /// Solves `g^(n / prime^exponent * x) == h` for `x < prime^exponent`, one base-`prime` digit at a time
    fn log(&self, h: u64, modulus: u64) -> Option<u64> {
        let mut x = 0;
        let mut place = 1;

        for k in 0..self.exponent {
            let t = mul_mod(h, pow_mod(self.generator_inv, x, modulus), modulus);
            let digit = self.prime_log(pow_mod(t, self.prime.pow(self.exponent - 1 - k), modulus), modulus)?;

            x += digit * place;
            place *= self.prime;
        }

        Some(x)
    }
}

/// Validated `(p, g, offset)` with precomputed inverse tables.
#[derive(Clone)]
pub struct CyclicGroup {
    modulus: u64,
    generator: u64,
    offset: u64,
    subgroups: Vec<Subgroup>,
}

impl fmt::Debug for CyclicGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CyclicGroup")
            .field("modulus", &self.modulus)
            .field("generator", &self.generator)
            .field("offset", &self.offset)
            .field("factors", &self.factors().collect::<Vec<_>>())
            .finish()
    }
}

impl CyclicGroup {
    /// Checks that `modulus` is prime and `generator` is a primitive root modulo it,
    /// then builds the discrete log tables.
    ///
    /// Fails if any prime factor `q` of `modulus - 1` would need more than
    /// `max_table` baby steps (`ceil(sqrt(q))`).
    pub fn new(modulus: u64, generator: u64, offset: u64, max_table: usize) -> Result<CyclicGroup, ConfigError> {
        if modulus < 3 {
            return Err(ConfigError::ModulusTooSmall(modulus));
        }

        if !is_prime(modulus) {
            return Err(ConfigError::NotPrime(modulus));
        }

        if generator < 2 || generator >= modulus {
            return Err(ConfigError::InvalidGenerator { generator, modulus });
        }

        let order = modulus - 1;

        if offset >= order {
            return Err(ConfigError::InvalidOffset {
                offset,
                capacity: order,
            });
        }

        let factors = factorize(order);

        tracing::debug!("Group order {order} factors as {factors:?}");

        if let Some(&(q, _)) = factors.iter().find(|(q, _)| ceil_sqrt(*q) > max_table as u64) {
            return Err(ConfigError::FactorTooLarge {
                factor: q,
                limit: max_table,
            });
        }

        for &(q, _) in &factors {
            if pow_mod(generator, order / q, modulus) == 1 {
                return Err(ConfigError::NotPrimitiveRoot {
                    generator,
                    order: order / q,
                });
            }
        }

        let subgroups: Vec<_> = factors.into_iter().map(|(q, e)| Subgroup::new(modulus, generator, q, e)).collect();

        tracing::trace!(
            "Built {} discrete log tables with {} entries total",
            subgroups.len(),
            subgroups.iter().map(|s| s.baby.len()).sum::<usize>()
        );

        Ok(CyclicGroup {
            modulus,
            generator,
            offset,
            subgroups,
        })
    }

    #[inline]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    #[inline]
    pub fn generator(&self) -> u64 {
        self.generator
    }

    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of counters in the domain, `p - 1`
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.modulus - 1
    }

    /// Prime factorization of the group order
    pub fn factors(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.subgroups.iter().map(|s| (s.prime, s.exponent))
    }

    /// Total baby-step entries held across all subgroups
    pub fn table_entries(&self) -> usize {
        self.subgroups.iter().map(|s| s.baby.len()).sum()
    }

    /// Maps `counter` in `[0, p - 1)` to `g^(counter + offset) mod p`, in `[1, p - 1]`.
    pub fn scramble(&self, counter: u64) -> Result<u64, Error> {
        let order = self.capacity();

        if counter >= order {
            return Err(Error::OutOfRange {
                counter: counter as i128,
                capacity: order,
            });
        }

        Ok(pow_mod(self.generator, add_mod(counter, self.offset, order), self.modulus))
    }

    /// Inverse of [`scramble`](Self::scramble).
    pub fn unscramble(&self, value: u64) -> Result<u64, Error> {
        let order = self.capacity();

        let exp = self.log(value).ok_or(Error::InvalidCode(value as u128))?;

        Ok(add_mod(exp, order - self.offset, order))
    }

    /// Discrete logarithm of `value` to base `g`, in `[0, p - 1)`.
    ///
    /// Returns `None` if `value` is not a nonzero residue.
    pub fn log(&self, value: u64) -> Option<u64> {
        if value == 0 || value >= self.modulus {
            return None;
        }

        let order = self.capacity();
        let mut x = 0;

        for sub in &self.subgroups {
            let h = pow_mod(value, order / sub.prime.pow(sub.exponent), self.modulus);
            let r = sub.log(h, self.modulus)?;

            x = add_mod(x, mul_mod(r, sub.crt, order), order);
        }

        Some(x)
    }
}
