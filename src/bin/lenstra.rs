// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Bibliography:
//!
//! H. W. Lenstra, Factoring integers with elliptic curves
//! Annals of Mathematics 126, 1987
//! https://www.jstor.org/stable/1971363
//!
//! https://en.wikipedia.org/wiki/Lenstra_elliptic-curve_factorization

use std::str::FromStr;

use lenstra::lenstra::{lenstra, lenstra_auto};
use lenstra::{Uint, Verbosity};

fn main() {
    let arg = arguments::parse(std::env::args()).unwrap();
    if arg.orphans.len() != 1 {
        println!("Usage: lenstra [--b1 B] [--curves N] [--threads N] [--v silent|info|verbose] NUMBER");
        return;
    }
    let number = &arg.orphans[0];
    let n = Uint::from_str(number).expect("could not read decimal number");
    const MAXBITS: u32 = Uint::BITS / 2;
    if n.bits() > MAXBITS {
        panic!(
            "Number size ({} bits) exceeds {} bits limit",
            n.bits(),
            MAXBITS
        )
    }
    if n.is_one() {
        return;
    }
    let b1 = arg.get::<u64>("b1");
    let curves = arg.get::<u64>("curves");
    let threads = arg.get::<usize>("threads");
    let v = match arg.get::<String>("v").as_deref() {
        Some("silent") => Verbosity::Silent,
        Some("verbose") => Verbosity::Verbose,
        _ => Verbosity::Info,
    };
    eprintln!("Input number {}", n);

    let tpool: Option<rayon::ThreadPool> = threads.map(|t| {
        eprintln!("Using a pool of {} threads", t);
        rayon::ThreadPoolBuilder::new()
            .num_threads(t)
            .build()
            .expect("cannot create thread pool")
    });
    let tpool = tpool.as_ref();

    // The historical defaults are B1=1000 and a million curves.
    let res = match (b1, curves) {
        (None, None) => lenstra_auto(&n, tpool, v),
        (b1, curves) => lenstra(
            &n,
            b1.unwrap_or(1000),
            curves.unwrap_or(1_000_000),
            tpool,
            v,
        ),
    };
    match res {
        Some((p, q)) => {
            println!("{}", p);
            println!("{}", q);
        }
        None => eprintln!("Factor not found."),
    }
}
