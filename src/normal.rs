// Copyright 2020 Developers of the Rand project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The unit normal distribution.

use crate::digit::{digit_bits, DigitGen, Exhausted};
use crate::float::Float;
use crate::urand::URand;
use core::mem;

// True with probability exp(-1/2) (algorithm H of Karney 2016): y < 1/2
// accepts outright, otherwise accept when a fresh alternating chain
// z < y, y < z, ... breaks on an even step.
pub(crate) fn bernoulli_exp_half<const B: u64, D: DigitGen<B>>(
    g: &mut D,
    y: &mut URand<B>,
    z: &mut URand<B>,
) -> Result<bool, Exhausted> {
    if !y.init().less_than_half(g)? {
        return Ok(true);
    }
    loop {
        if !z.init().less_than(g, y)? {
            return Ok(false);
        }
        if !y.init().less_than(g, z)? {
            return Ok(true);
        }
    }
}

// k >= 0 with probability exp(-k/2) (1 - exp(-1/2)).
pub(crate) fn geometric_exp_half<const B: u64, D: DigitGen<B>>(
    g: &mut D,
    y: &mut URand<B>,
    z: &mut URand<B>,
) -> Result<i32, Exhausted> {
    let mut n = 0;
    while bernoulli_exp_half(g, y, z)? {
        n += 1;
    }
    Ok(n)
}

// True with probability exp(-n/2).
pub(crate) fn bernoulli_exp_half_pow<const B: u64, D: DigitGen<B>>(
    g: &mut D,
    y: &mut URand<B>,
    z: &mut URand<B>,
    n: i32,
) -> Result<bool, Exhausted> {
    let mut n = n;
    while n > 0 && bernoulli_exp_half(g, y, z)? {
        n -= 1;
    }
    Ok(n == 0)
}

/// Samples u-rands exactly from the unit normal distribution
/// `P(x) = exp(-x^2/2) / sqrt(2 pi)`.
///
/// This implements algorithm N of Karney, *Sampling exactly from the
/// normal distribution* ([arXiv:1303.6257]): the integer part `k` is drawn
/// with probability proportional to `exp(-k/2)`, thinned to `exp(-k^2/2)`,
/// and the fraction is accepted against the residual tail density, all
/// through digit-level comparisons of uniform deviates. The result is a
/// u-rand that can be rounded to any precision; the whole procedure
/// consumes an expected O(1) digits per deviate and never evaluates a
/// transcendental function.
///
/// The base must be less than 2^15 or a power of two.
///
/// [arXiv:1303.6257]: https://arxiv.org/abs/1303.6257
///
/// ```
/// use rand_exact::{RandDigit, UnitNormal};
///
/// let mut rng = rand::thread_rng();
/// let mut dg = RandDigit::<{ 1 << 32 }, _>::new(&mut rng);
/// let mut dist = UnitNormal::new();
/// let n: f64 = dist.sample(&mut dg).unwrap();
/// assert!(n.is_finite());
/// ```
#[derive(Clone, Debug)]
pub struct UnitNormal<const B: u64> {
    y: URand<B>,
    z: URand<B>,
    x: URand<B>,
}

impl<const B: u64> Default for UnitNormal<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const B: u64> UnitNormal<B> {
    const BASE_OK: () = assert!(
        B - 1 < (1 << 15) || B.is_power_of_two(),
        "base must be less than 2^15 or a power of two"
    );

    /// Constructs the sampler.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::BASE_OK;
        UnitNormal {
            y: URand::new(),
            z: URand::new(),
            x: URand::new(),
        }
    }

    /// Generates the next deviate into `x`.
    pub fn generate<D: DigitGen<B>>(
        &mut self,
        g: &mut D,
        x: &mut URand<B>,
    ) -> Result<(), Exhausted> {
        loop {
            let k = geometric_exp_half(g, &mut self.y, &mut self.z)?;
            if !bernoulli_exp_half_pow(g, &mut self.y, &mut self.z, k * (k - 1))? {
                continue;
            }
            x.init();
            let mut j = k + 1;
            while j > 0 && self.tail_accepted(g, k, x)? {
                j -= 1;
            }
            if j > 0 {
                continue;
            }
            x.set_integer(k as u32);
            if self.y.init().less_than_half(g)? {
                x.negate();
            }
            return Ok(());
        }
    }

    /// Generates a deviate rounded to nearest in `F`.
    pub fn sample<F: Float, D: DigitGen<B>>(&mut self, g: &mut D) -> Result<F, Exhausted> {
        let mut x = mem::take(&mut self.x);
        self.generate(g, &mut x)?;
        let r = x.value(g);
        self.x = x;
        r
    }

    // -1, 0, +1 with probabilities 1/m, 1/m, 1 - 2/m (algorithm C),
    // decided on raw digits without touching any u-rand.
    fn trichotomy<D: DigitGen<B>>(g: &mut D, m: i32) -> Result<i32, Exhausted> {
        // Wide power-of-two bases truncate to 15 bits per step to keep
        // the products in range.
        const MAXBITS: u32 = 15;
        let bits = digit_bits(B);
        let wide = B.is_power_of_two() && bits > MAXBITS;
        let shift = if wide { bits - MAXBITS } else { 0 };
        let tbase = if wide { 1 << MAXBITS } else { B as i32 };
        let mut n1 = 1i32;
        let mut n2 = 2i32;
        loop {
            let d = (g.try_digit()? >> shift) as i32;
            n1 = 0.max(n1 * tbase - d * m);
            if n1 >= m {
                return Ok(-1);
            }
            n2 = m.min(n2 * tbase - d * m);
            if n2 <= 0 {
                return Ok(1);
            }
            if n1 <= 0 && n2 >= m {
                return Ok(0);
            }
        }
    }

    // True with probability exp(-x (2k + x) / (2k + 2)) (algorithm B).
    // The chain of comparisons survives n rounds with probability h^n/n!
    // for h = x (2k + x) / (2k + 2), so an even stopping count has
    // probability exp(-h).
    fn tail_accepted<D: DigitGen<B>>(
        &mut self,
        g: &mut D,
        k: i32,
        x: &mut URand<B>,
    ) -> Result<bool, Exhausted> {
        let m = 2 * k + 2;
        let mut n = 0u32;
        loop {
            let mut f = if k != 0 { 0 } else { Self::trichotomy(g, m)? };
            if f < 0 {
                break;
            }
            let prev = if n != 0 { &mut self.y } else { &mut *x };
            if !self.z.init().less_than(g, prev)? {
                break;
            }
            if k != 0 {
                f = Self::trichotomy(g, m)?;
            }
            if f < 0 {
                break;
            }
            if f == 0 && !self.y.init().less_than(g, x)? {
                break;
            }
            mem::swap(&mut self.y, &mut self.z);
            n += 1;
        }
        Ok(n % 2 == 0)
    }
}
