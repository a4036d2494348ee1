// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Elliptic curve arithmetic over Z/NZ for a composite modulus N.
//!
//! Since N is not prime the chord-and-tangent formulas may require
//! inverting a zero divisor. This is the event Lenstra's method is
//! waiting for, so instead of failing, the addition law hands back the
//! offending denominator (`Sum::NonUnit`) whose GCD with N is a
//! nontrivial divisor. A denominator that is exactly zero is an
//! ordinary vertical line: the sum is the point at infinity and
//! gcd(0, N) = N would carry no information.
//!
//! Curves and points are plain immutable values: every operation
//! builds new points.

use crate::arith::{addmod, inv_mod, mulmod, submod};
use crate::Uint;

/// A curve y² = x³ + Ax + B with coefficients modulo N.
///
/// N is composite so this is not a group: the addition law is partial
/// and its failures are reported through [`Sum::NonUnit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Curve {
    pub a: Uint,
    pub b: Uint,
    pub n: Uint,
}

/// A point of a [`Curve`], or the point at infinity.
///
/// The owning curve travels with the point so that operations mixing
/// points of curves over different moduli are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    curve: Curve,
    // None encodes the point at infinity.
    xy: Option<(Uint, Uint)>,
}

/// Result of a point operation modulo a composite N.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sum {
    Point(Point),
    /// The operation required inverting this residue, which shares a
    /// nontrivial factor with N. The sum does not exist but gcd of the
    /// value with N is a divisor of N.
    NonUnit(Uint),
}

impl Curve {
    pub fn new(a: Uint, b: Uint, n: Uint) -> Curve {
        assert!(n > Uint::ONE);
        assert!(
            2 * n.bits() <= Uint::BITS,
            "modulus must be under {} bits",
            Uint::BITS / 2
        );
        Curve { a: a % n, b: b % n, n }
    }

    pub fn point(&self, x: Uint, y: Uint) -> Point {
        Point {
            curve: *self,
            xy: Some((x % self.n, y % self.n)),
        }
    }

    pub fn infinity(&self) -> Point {
        Point {
            curve: *self,
            xy: None,
        }
    }

    /// Whether p satisfies the curve equation.
    pub fn contains(&self, p: &Point) -> bool {
        match p.xy {
            None => true,
            Some((x, y)) => {
                let y2 = mulmod(y, y, self.n);
                let x3 = mulmod(mulmod(x, x, self.n), x, self.n);
                let ax = mulmod(self.a, x, self.n);
                y2 == addmod(addmod(x3, ax, self.n), self.b, self.n)
            }
        }
    }
}

impl Point {
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn is_infinity(&self) -> bool {
        self.xy.is_none()
    }

    /// Affine coordinates, or None for the point at infinity.
    pub fn coordinates(&self) -> Option<(Uint, Uint)> {
        self.xy
    }

    /// Chord-and-tangent addition.
    ///
    /// Panics if the two points live over different moduli.
    pub fn add(&self, q: &Point) -> Sum {
        assert_eq!(
            self.curve.n, q.curve.n,
            "modulus mismatch: cannot add points modulo different N"
        );
        let n = self.curve.n;
        let (x1, y1) = match self.xy {
            None => return Sum::Point(*q),
            Some(xy) => xy,
        };
        let (x2, y2) = match q.xy {
            None => return Sum::Point(*self),
            Some(xy) => xy,
        };
        let (num, den) = if x1 == x2 && y1 == y2 {
            // Tangent slope (3x² + a) / 2y
            let xx = mulmod(x1, x1, n);
            let num = addmod(
                mulmod(Uint::from(3_u64), xx, n),
                self.curve.a,
                n,
            );
            (num, addmod(y1, y1, n))
        } else {
            // Chord slope (y2 - y1) / (x2 - x1)
            (submod(y2, y1, n), submod(x2, x1, n))
        };
        if den.is_zero() {
            // Vertical line: P + (-P) or a tangent with 2y = 0 mod N.
            return Sum::Point(self.curve.infinity());
        }
        let slope = match inv_mod(den, n) {
            Ok(inv) => mulmod(num, inv, n),
            Err(_) => return Sum::NonUnit(den),
        };
        let x3 = submod(submod(mulmod(slope, slope, n), x1, n), x2, n);
        let y3 = submod(mulmod(slope, submod(x1, x3, n), n), y1, n);
        Sum::Point(self.curve.point(x3, y3))
    }

    pub fn double(&self) -> Sum {
        self.add(self)
    }

    /// Scalar multiplication [k]P by double-and-add.
    ///
    /// The first non invertible denominator met along the way is
    /// reported immediately. multiply(0) is the point at infinity.
    pub fn multiply(&self, k: u64) -> Sum {
        let mut res = self.curve.infinity();
        let mut sq = *self;
        let mut k = k;
        while k > 0 {
            if k & 1 == 1 {
                res = match res.add(&sq) {
                    Sum::Point(p) => p,
                    nu => return nu,
                };
            }
            k >>= 1;
            if k > 0 {
                sq = match sq.double() {
                    Sum::Point(p) => p,
                    nu => return nu,
                };
            }
        }
        Sum::Point(res)
    }
}

#[test]
fn test_neutral_element() {
    let n = Uint::from(1081_u64); // 23 * 47
    let c = Curve::new(Uint::from(5_u64), Uint::from(7_u64), n);
    let p = c.point(Uint::from(11_u64), Uint::from(17_u64));
    let inf = c.infinity();
    assert_eq!(inf.add(&p), Sum::Point(p));
    assert_eq!(p.add(&inf), Sum::Point(p));
    assert_eq!(inf.add(&inf), Sum::Point(inf));
    assert_eq!(inf.double(), Sum::Point(inf));
    assert_eq!(p.multiply(1), Sum::Point(p));
}

#[test]
fn test_vertical_lines() {
    let n = Uint::from(1081_u64);
    let c = Curve::new(Uint::from(5_u64), Uint::from(7_u64), n);
    // P + (-P) is the point at infinity, not a NonUnit.
    let p = c.point(Uint::from(11_u64), Uint::from(17_u64));
    let q = c.point(Uint::from(11_u64), n - Uint::from(17_u64));
    assert_eq!(p.add(&q), Sum::Point(c.infinity()));
    // Doubling a point with y = 0 is a vertical tangent.
    let p = c.point(Uint::from(3_u64), Uint::ZERO);
    assert_eq!(p.double(), Sum::Point(c.infinity()));
    // With an even modulus, 2y = 0 mod N can happen with y != 0.
    let n = Uint::from(120_u64);
    let c = Curve::new(Uint::from(1_u64), Uint::from(1_u64), n);
    let p = c.point(Uint::from(14_u64), Uint::from(60_u64));
    assert_eq!(p.double(), Sum::Point(c.infinity()));
}

#[test]
fn test_nonunit_denominator() {
    // N = 5 * 7: a chord with x2 - x1 = 5 cannot be inverted and
    // the denominator itself must be reported.
    let n = Uint::from(35_u64);
    let c = Curve::new(Uint::from(2_u64), Uint::from(3_u64), n);
    let p = c.point(Uint::from(2_u64), Uint::from(9_u64));
    let q = c.point(Uint::from(7_u64), Uint::from(22_u64));
    assert_eq!(p.add(&q), Sum::NonUnit(Uint::from(5_u64)));
    // Tangent denominator 2y = 14 shares the factor 7 with N.
    let p = c.point(Uint::from(4_u64), Uint::from(7_u64));
    assert_eq!(p.double(), Sum::NonUnit(Uint::from(14_u64)));
}

#[test]
fn test_multiply_matches_additions() {
    // Over a prime modulus the addition law never fails and
    // double-and-add must agree with repeated additions.
    let n = Uint::from(10007_u64);
    // Curve through (2, 3): b = y² - x³ - ax = 9 - 8 - 90 mod n.
    let c = Curve::new(
        Uint::from(45_u64),
        submod(Uint::from(9_u64), Uint::from(98_u64), n),
        n,
    );
    let p = c.point(Uint::from(2_u64), Uint::from(3_u64));
    assert!(c.contains(&p));
    let mut q = p;
    for k in 2..60_u64 {
        q = match q.add(&p) {
            Sum::Point(q) => q,
            Sum::NonUnit(d) => panic!("unexpected non unit {d}"),
        };
        assert!(c.contains(&q));
        assert_eq!(p.multiply(k), Sum::Point(q));
    }
}

#[test]
#[should_panic(expected = "modulus mismatch")]
fn test_modulus_mismatch() {
    let c1 = Curve::new(Uint::from(2_u64), Uint::from(3_u64), Uint::from(35_u64));
    let c2 = Curve::new(Uint::from(2_u64), Uint::from(3_u64), Uint::from(39_u64));
    let p = c1.point(Uint::from(1_u64), Uint::from(5_u64));
    let q = c2.point(Uint::from(1_u64), Uint::from(5_u64));
    let _ = p.add(&q);
}
