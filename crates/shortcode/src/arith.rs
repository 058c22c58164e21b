//! Modular arithmetic over `u64` residues.
//!
//! Every multiply-reduce widens to `u128`, so any modulus below `2^64` is safe.

#[inline]
pub const fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

#[inline]
pub const fn add_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 + b as u128) % m as u128) as u64
}

/// Computes `base^exp mod m` by repeated squaring.
pub const fn pow_mod(base: u64, mut exp: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }

    let mut result = 1;
    let mut base = base % m;

    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }

    result
}

pub const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Returns `y` such that `x * y ≡ 1 (mod m)`, if `x` is invertible.
///
/// Works for any modulus, not only primes, since the CRT moduli are prime powers.
pub fn mod_inverse(x: u64, m: u64) -> Option<u64> {
    if m == 0 {
        return None;
    }

    let (mut old_r, mut r) = (x as i128 % m as i128, m as i128);
    let (mut old_s, mut s) = (1i128, 0i128);

    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }

    if old_r != 1 {
        return None;
    }

    Some(old_s.rem_euclid(m as i128) as u64)
}

// first twelve primes make Miller-Rabin deterministic for every u64
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Deterministic Miller-Rabin primality test.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }

    for p in WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }

    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;

    'witness: for a in WITNESSES {
        let mut x = pow_mod(a, d, n);

        if x == 1 || x == n - 1 {
            continue;
        }

        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

const TRIAL_LIMIT: u64 = 1000;

/// Finds a non-trivial divisor of an odd composite `n` (Pollard's rho, Floyd cycle detection).
fn pollard_rho(n: u64) -> u64 {
    if n % 2 == 0 {
        return 2;
    }

    for c in 1..n {
        let f = |x: u64| add_mod(mul_mod(x, x, n), c, n);

        let (mut x, mut y, mut d) = (2, 2, 1);

        while d == 1 {
            x = f(x);
            y = f(f(y));
            d = gcd(x.abs_diff(y), n);
        }

        if d != n {
            return d;
        }
    }

    n
}

/// Prime factorization of `n`, as `(prime, exponent)` pairs in ascending order of prime.
///
/// `factorize(1)` and `factorize(0)` are empty.
pub fn factorize(mut n: u64) -> Vec<(u64, u32)> {
    if n == 0 {
        return Vec::new();
    }

    let mut primes: Vec<u64> = Vec::new();

    let mut d = 2;
    while d <= TRIAL_LIMIT && d * d <= n {
        while n % d == 0 {
            primes.push(d);
            n /= d;
        }
        d += if d == 2 { 1 } else { 2 };
    }

    let mut stack = Vec::new();
    if n > 1 {
        stack.push(n);
    }

    while let Some(m) = stack.pop() {
        if is_prime(m) {
            primes.push(m);
        } else {
            let d = pollard_rho(m);
            stack.push(d);
            stack.push(m / d);
        }
    }

    primes.sort_unstable();

    let mut factors: Vec<(u64, u32)> = Vec::new();
    for p in primes {
        match factors.last_mut() {
            Some((q, e)) if *q == p => *e += 1,
            _ => factors.push((p, 1)),
        }
    }

    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_mod_wide() {
        let m = u64::MAX - 58; // 2^64 - 59, prime
        assert_eq!(mul_mod(m - 1, m - 1, m), 1);
        assert_eq!(mul_mod(u64::MAX, u64::MAX, m), 58 * 58);
        assert_eq!(add_mod(m - 1, m - 1, m), m - 2);
    }

    #[test]
    fn test_pow_mod() {
        assert_eq!(pow_mod(61, 30, 17160991), 4244504);
        assert_eq!(pow_mod(61, 31, 17160991), 1499879);
        assert_eq!(pow_mod(2, 0, 7), 1);
        assert_eq!(pow_mod(5, 3, 1), 0);

        // Fermat
        let p = (1u64 << 61) - 1;
        assert_eq!(pow_mod(37, p - 1, p), 1);
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(2, 5), Some(3));
        assert_eq!(mod_inverse(3, 5), Some(2));
        assert_eq!(mod_inverse(3, 65537), Some(21846));
        assert_eq!(mod_inverse(3, 8), Some(3));
        assert_eq!(mod_inverse(4, 8), None);
        assert_eq!(mod_inverse(0, 7), None);
    }

    #[test]
    fn test_is_prime() {
        let primes = [2, 3, 5, 37, 41, 997, 17160991, (1u64 << 61) - 1, u64::MAX - 58];
        let composites = [0, 1, 4, 9, 561, 1105, 17160990, 3215031751, u64::MAX];

        for p in primes {
            assert!(is_prime(p), "{p} should be prime");
        }

        for c in composites {
            assert!(!is_prime(c), "{c} should be composite");
        }
    }

    #[test]
    fn test_factorize() {
        assert!(factorize(0).is_empty());
        assert!(factorize(1).is_empty());
        assert_eq!(factorize(996), [(2, 2), (3, 1), (83, 1)]);
        assert_eq!(
            factorize(17160990),
            [(2, 1), (3, 1), (5, 1), (7, 1), (11, 1), (17, 1), (19, 1), (23, 1)]
        );
        assert_eq!(
            factorize((1u64 << 61) - 2),
            [(2, 1), (3, 2), (5, 2), (7, 1), (11, 1), (13, 1), (31, 1), (41, 1), (61, 1), (151, 1), (331, 1), (1321, 1)]
        );
        assert_eq!(factorize(u64::MAX - 59), [(2, 2), (11, 1), (137, 1), (547, 1), (5594472617641, 1)]);
    }

    #[test]
    fn test_factorize_semiprime() {
        // two primes past the trial division limit
        let (p, q) = (1_000_003u64, 998_244_353u64);
        assert_eq!(factorize(p * q), [(p, 1), (q, 1)]);
    }
}
