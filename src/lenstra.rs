// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Implementation of Lenstra's elliptic curve method (stage 1 only).
//!
//! A random curve y² = x³ + Ax + B over Z/NZ is drawn through a random
//! point P, and P is multiplied by 1, 2, ..., B1 extending a cumulative
//! multiple [i!]P. Whenever the group law meets a denominator sharing a
//! factor with N, that factor is extracted with a GCD: this happens as
//! soon as the curve order modulo some prime p | N divides i!, i.e. for
//! curves whose order is B1-smooth-ish. Curve attempts are independent
//! so they can run on a thread pool.
//!
//! Scalar multiplication inside one step uses double-and-add rather
//! than repeated additions: a collapse can only be detected at an
//! earlier internal multiple, never missed, and a GCD is still
//! inspected after every integer step i.
//!
//! References:
//! H. W. Lenstra, Factoring integers with elliptic curves,
//! Annals of Mathematics 126, 1987
//! https://en.wikipedia.org/wiki/Lenstra_elliptic-curve_factorization

use num_integer::Integer;
use rand::Rng;
use rayon::prelude::*;

use crate::curve::{Curve, Point, Sum};
use crate::{arith, Uint, Verbosity};

/// Runs the elliptic curve method with parameters chosen for the size
/// of n. The goal is to find factors of roughly half the size of n
/// with reasonable probability, n being a few machine words at most.
pub fn lenstra_auto(
    n: &Uint,
    tpool: Option<&rayon::ThreadPool>,
    v: Verbosity,
) -> Option<(Uint, Uint)> {
    match n.bits() {
        // Factors under ~12 bits: group orders are tiny.
        0..=24 => lenstra(n, 100, 400, tpool, v),
        // Factors under ~24 bits.
        25..=48 => lenstra(n, 500, 4000, tpool, v),
        // Factors under ~40 bits.
        49..=80 => lenstra(n, 3000, 40_000, tpool, v),
        // The bounds of the historical driver.
        81.. => lenstra(n, 1000, 1_000_000, tpool, v),
    }
}

/// A random point on a random curve modulo n.
///
/// x, y and A are sampled uniformly in [0, n) and B is derived as
/// y² - x³ - Ax so that the point lies on the curve by construction,
/// without any search.
pub fn random_point<R: Rng>(n: &Uint, rng: &mut R) -> Point {
    let x = arith::random_mod(*n, rng);
    let y = arith::random_mod(*n, rng);
    let a = arith::random_mod(*n, rng);
    let x3 = arith::mulmod(arith::mulmod(x, x, *n), x, *n);
    let b = arith::submod(
        arith::submod(arith::mulmod(y, y, *n), x3, *n),
        arith::mulmod(a, x, *n),
        *n,
    );
    Curve::new(a, b, *n).point(x, y)
}

/// One curve attempt: extends the cumulative multiple [i!]P for
/// i = 1 .. b1-1, watching for a non invertible denominator.
///
/// Returns a divisor of n strictly between 1 and n, or None when the
/// bound is exhausted (not an error: the curve order was not smooth
/// enough). Panics if the point does not live modulo n.
pub fn lenstra_step(n: &Uint, b1: u64, p: &Point) -> Option<Uint> {
    assert_eq!(
        p.curve().n,
        *n,
        "modulus mismatch: point does not live modulo the number to factor"
    );
    let mut q = *p;
    for i in 1..b1 {
        match q.multiply(i) {
            Sum::Point(qi) => q = qi,
            Sum::NonUnit(d) => {
                let g = Integer::gcd(&d, n);
                // g > 1 since d is not a unit, g <= d < n.
                if Uint::ONE < g && g < *n {
                    return Some(g);
                }
                // The curve collapsed modulo every prime factor of n
                // at once: nothing to extract, arithmetic cannot
                // continue on this curve.
                return None;
            }
        }
    }
    None
}

/// Searches a factor of n with up to `tries` independent curves.
///
/// Returns the first factor found together with its cofactor, or None
/// once the budget is exhausted, which is an expected outcome (for
/// example when n is prime).
pub fn lenstra(
    n: &Uint,
    b1: u64,
    tries: u64,
    tpool: Option<&rayon::ThreadPool>,
    v: Verbosity,
) -> Option<(Uint, Uint)> {
    let start = std::time::Instant::now();
    let found = if let Some(pool) = tpool {
        pool.install(|| {
            (0..tries).into_par_iter().find_map_any(|_| {
                let mut rng = rand::thread_rng();
                let p = random_point(n, &mut rng);
                lenstra_step(n, b1, &p)
            })
        })
    } else {
        let mut rng = rand::thread_rng();
        let mut found = None;
        for i in 0..tries {
            let p = random_point(n, &mut rng);
            if let Some(f) = lenstra_step(n, b1, &p) {
                if v >= Verbosity::Info {
                    eprintln!("ECM success after {} curves", i + 1);
                }
                found = Some(f);
                break;
            }
            if v >= Verbosity::Verbose && (i + 1) % 64 == 0 {
                eprintln!("{} curves tried", i + 1);
            }
        }
        found
    };
    match found {
        Some(f) => {
            if v >= Verbosity::Info {
                eprintln!(
                    "Found factor {} with ECM (B1={}) in {:.3}s",
                    f,
                    b1,
                    start.elapsed().as_secs_f64()
                );
            }
            Some((f, *n / f))
        }
        None => {
            if v >= Verbosity::Info {
                eprintln!(
                    "ECM failure after {} curves (B1={}) in {:.3}s",
                    tries,
                    b1,
                    start.elapsed().as_secs_f64()
                );
            }
            None
        }
    }
}

#[test]
fn test_random_point() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    let mut rng = StdRng::seed_from_u64(7);
    for &n in &[120_u64, 5959, 1081] {
        let n = Uint::from(n);
        for _ in 0..50 {
            let p = random_point(&n, &mut rng);
            assert!(p.curve().contains(&p), "{:?}", p);
        }
    }
    // A larger composite modulus.
    let n = Uint::from(602768606663711_u64) * Uint::from(957629686686973_u64);
    for _ in 0..20 {
        let p = random_point(&n, &mut rng);
        assert!(p.curve().contains(&p));
    }
}

#[test]
fn test_lenstra_small_composite() {
    // N = 120: doubling any point with 2y != 0 mod 120 already meets
    // an even denominator, so almost every curve succeeds.
    let n = Uint::from(120_u64);
    let (f, c) = lenstra(&n, 20, 500, None, Verbosity::Silent).expect("120 must factor");
    assert!(Uint::ONE < f && f < n);
    assert_eq!(f * c, n);
    assert_eq!(n % f, Uint::ZERO);
}

#[test]
fn test_lenstra_semiprime() {
    // N = 59 * 101: every curve order modulo 59 is at most 75 and
    // divides 99!, so each attempt fails only when both primes
    // collapse at the very same step.
    let n = Uint::from(5959_u64);
    let (f, c) = lenstra(&n, 100, 100, None, Verbosity::Silent).expect("5959 must factor");
    assert_eq!(f * c, n);
    assert!(f == Uint::from(59_u64) || f == Uint::from(101_u64));
}

#[test]
fn test_lenstra_prime() {
    // Modulo a prime every nonzero denominator is invertible:
    // no curve can ever report a factor.
    let n = Uint::from(97_u64);
    assert_eq!(lenstra(&n, 50, 200, None, Verbosity::Silent), None);
}

#[test]
fn test_lenstra_parallel() {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(2)
        .build()
        .unwrap();
    let n = Uint::from(5959_u64);
    let (f, c) = lenstra(&n, 100, 100, Some(&pool), Verbosity::Silent).expect("5959 must factor");
    assert_eq!(f * c, n);
}

#[test]
fn test_lenstra_step_proper_factor() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    let mut rng = StdRng::seed_from_u64(999);
    let n = Uint::from(1081_u64); // 23 * 47
    let mut found = 0;
    for _ in 0..200 {
        let p = random_point(&n, &mut rng);
        if let Some(f) = lenstra_step(&n, 60, &p) {
            assert!(Uint::ONE < f && f < n);
            assert_eq!(n % f, Uint::ZERO);
            found += 1;
        }
    }
    // Orders modulo 23 are at most 33 <= 59, so most curves succeed.
    assert!(found > 100, "only {found} curves out of 200 succeeded");
}
