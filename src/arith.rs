// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Fixed width multiprecision arithmetic modulo a composite integer.
//!
//! Residues are stored in 1024-bit words and moduli are limited to
//! 512 bits so that a product of two reduced residues never overflows.
//!
//! Because the modulus is composite, not every residue is invertible:
//! `inv_mod` reports the offending GCD instead of an inverse, which is
//! the primitive the whole factorization method is built on.

use bnum::{BInt, BUint};
use rand::Rng;

pub type U1024 = BUint<16>;
type I1024 = BInt<16>;

pub fn addmod(x: U1024, y: U1024, n: U1024) -> U1024 {
    // x, y are reduced: the sum fits in 513 bits.
    (x % n + y % n) % n
}

pub fn submod(x: U1024, y: U1024, n: U1024) -> U1024 {
    (x % n + (n - y % n)) % n
}

pub fn mulmod(x: U1024, y: U1024, n: U1024) -> U1024 {
    assert!(2 * n.bits() <= U1024::BITS);
    ((x % n) * (y % n)) % n
}

/// Modular inverse of x modulo n, by the extended Euclid algorithm.
///
/// Returns Ok(y) with xy = 1 mod n when x is a unit, Err(g) with
/// g = gcd(x, n) > 1 otherwise. The Err value is exactly the
/// information Lenstra's method wants: a nontrivial divisor of n
/// whenever 1 < g < n.
pub fn inv_mod(x: U1024, n: U1024) -> Result<U1024, U1024> {
    assert!(!n.is_zero());
    let x = x % n;
    if x.is_zero() {
        return Err(n);
    }
    // Invariants: r0 = s0 x mod n, r1 = s1 x mod n
    let (mut r0, mut r1) = (n, x);
    let (mut s0, mut s1) = (I1024::ZERO, I1024::ONE);
    while !r1.is_zero() {
        let q = r0 / r1;
        (r0, r1) = (r1, r0 - q * r1);
        let q = I1024::from_bits(q);
        (s0, s1) = (s1, s0 - q * s1);
    }
    if r0 != U1024::ONE {
        return Err(r0);
    }
    if s0.is_negative() {
        Ok(n - s0.abs().to_bits() % n)
    } else {
        Ok(s0.to_bits() % n)
    }
}

/// An integer in [0, n), built like BigInteger(nbits, rng):
/// a string of random bits reduced modulo n.
pub fn random_mod<R: Rng>(n: U1024, rng: &mut R) -> U1024 {
    let words = (n.bits() as usize + 63) / 64;
    let mut digits = *U1024::ZERO.digits();
    for d in digits.iter_mut().take(words) {
        *d = rng.gen();
    }
    U1024::from_digits(digits) % n
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_integer::Integer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_inv_mod() {
        let n = U1024::from(97_u64);
        for x in 1..97_u64 {
            let x = U1024::from(x);
            let y = inv_mod(x, n).unwrap();
            assert_eq!(mulmod(x, y, n), U1024::ONE);
        }
        // 2^16+1 is prime: every nonzero residue is invertible.
        let n = U1024::from(65537_u64);
        for x in [2_u64, 3, 12345, 65535] {
            let x = U1024::from(x);
            let y = inv_mod(x, n).unwrap();
            assert_eq!(mulmod(x, y, n), U1024::ONE);
        }
    }

    #[test]
    fn test_inv_mod_nonunit() {
        let n = U1024::from(35_u64);
        assert_eq!(inv_mod(U1024::from(5_u64), n), Err(U1024::from(5_u64)));
        assert_eq!(inv_mod(U1024::from(21_u64), n), Err(U1024::from(7_u64)));
        assert_eq!(inv_mod(U1024::ZERO, n), Err(n));
        // Units of Z/35Z are still invertible.
        let y = inv_mod(U1024::from(4_u64), n).unwrap();
        assert_eq!(mulmod(U1024::from(4_u64), y, n), U1024::ONE);
    }

    #[test]
    fn test_inv_mod_random() {
        let mut rng = StdRng::seed_from_u64(42);
        // A 128-bit semiprime: 2^64-59 times 2^64-83.
        let p = U1024::from(0xffffffffffffffc5_u64);
        let q = U1024::from(0xffffffffffffffad_u64);
        let n = p * q;
        for _ in 0..200 {
            let x = random_mod(n, &mut rng);
            match inv_mod(x, n) {
                Ok(y) => assert_eq!(mulmod(x, y, n), U1024::ONE),
                Err(g) => assert_eq!(g, Integer::gcd(&x, &n)),
            }
        }
    }

    #[test]
    fn test_random_mod() {
        let mut rng = StdRng::seed_from_u64(1234);
        let n = (U1024::ONE << 200) + U1024::from(12345_u64);
        for _ in 0..100 {
            assert!(random_mod(n, &mut rng) < n);
        }
        let small = U1024::from(7_u64);
        for _ in 0..100 {
            assert!(random_mod(small, &mut rng) < small);
        }
    }

    #[test]
    fn test_submod() {
        let n = U1024::from(101_u64);
        let x = U1024::from(17_u64);
        let y = U1024::from(59_u64);
        assert_eq!(addmod(submod(x, y, n), y, n), x);
        assert_eq!(submod(x, x, n), U1024::ZERO);
        assert_eq!(submod(U1024::ZERO, U1024::ONE, n), n - U1024::ONE);
    }
}
