// Copyright 2020 Developers of the Rand project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{criterion_group, criterion_main, Criterion};
use rand_exact::discrete_normal::Params;
use rand_exact::{DiscreteNormal, RandDigit, UnitExponential, UnitNormal, UnitUniform};

const B32: u64 = 1 << 32;
const B16: u64 = 1 << 16;

fn bench_distributions(c: &mut Criterion) {
    let mut g = c.benchmark_group("exact");

    g.bench_function("unit_uniform_f64", |b| {
        let mut rng = rand_pcg::Pcg64Mcg::new(0xcafef00dd15ea5e5);
        let mut dg = RandDigit::<B32, _>::new(&mut rng);
        let mut dist = UnitUniform::new();
        b.iter(|| -> f64 { dist.sample(&mut dg).unwrap() });
    });

    g.bench_function("unit_exponential_f64", |b| {
        let mut rng = rand_pcg::Pcg64Mcg::new(0xcafef00dd15ea5e5);
        let mut dg = RandDigit::<B32, _>::new(&mut rng);
        let mut dist = UnitExponential::<B32>::new();
        b.iter(|| -> f64 { dist.sample(&mut dg).unwrap() });
    });

    g.bench_function("unit_normal_f64", |b| {
        let mut rng = rand_pcg::Pcg64Mcg::new(0xcafef00dd15ea5e5);
        let mut dg = RandDigit::<B32, _>::new(&mut rng);
        let mut dist = UnitNormal::new();
        b.iter(|| -> f64 { dist.sample(&mut dg).unwrap() });
    });

    g.bench_function("discrete_normal", |b| {
        let mut rng = rand_pcg::Pcg64Mcg::new(0xcafef00dd15ea5e5);
        let mut dg = RandDigit::<B16, _>::new(&mut rng);
        let mut dist = DiscreteNormal::new(Params::new(1, 3, 129, 2).unwrap()).unwrap();
        b.iter(|| dist.sample(&mut dg).unwrap());
    });

    g.finish();
}

criterion_group!(benches, bench_distributions);
criterion_main!(benches);
