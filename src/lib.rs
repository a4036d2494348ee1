// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! A toy implementation of Lenstra's elliptic curve factorization method.
//!
//! Given a composite integer N, random elliptic curves over Z/NZ are
//! drawn and a random point is multiplied by small scalars. Since N is
//! not prime the addition law may require inverting a zero divisor:
//! this "failure" is precisely how a factor of N is found.
//!
//! Like the rest of the arithmetic here, it only supports numbers
//! under 512 bits.

pub mod arith;
pub mod curve;
pub mod lenstra;

// We need to perform modular arithmetic modulo the input number.
pub type Uint = arith::U1024;

/// Amount of diagnostics printed on stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent,
    Info,
    Verbose,
}
