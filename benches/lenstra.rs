// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::str::FromStr;
use std::time::Duration;

use brunch::Bench;
use rand::rngs::StdRng;
use rand::SeedableRng;

use lenstra::lenstra::{lenstra_step, random_point};
use lenstra::Uint;

fn main() {
    // A 255-bit prime: no curve can ever succeed, so timings are stable.
    let p = Uint::from_str(
        "57896044618658097711785492504343953926634992332820282019728792003956564819949",
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let g = random_point(&p, &mut rng);

    brunch::benches! {
        inline:
        {
            let mut rng = StdRng::seed_from_u64(2);
            Bench::new("random point (p255)")
                .with_timeout(Duration::from_secs(3))
                .run_seeded((), |_| random_point(&p, &mut rng))
        },
        {
            Bench::new("scalar mul [100000]G (p255)")
                .with_timeout(Duration::from_secs(3))
                .run_seeded((), |_| g.multiply(100_000))
        },
        {
            Bench::new("one curve B1=100 (p255)")
                .with_timeout(Duration::from_secs(10))
                .run_seeded((), |_| lenstra_step(&p, 100, &g))
        },
    }
}
