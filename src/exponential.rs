// Copyright 2020 Developers of the Rand project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The unit exponential distribution.

use crate::digit::{DigitGen, Exhausted};
use crate::float::Float;
use crate::urand::URand;
use core::mem;

/// Samples u-rands exactly from the exponential distribution
/// `P(x) = exp(-x)` for `x > 0`.
///
/// The core is von Neumann's comparison method[^1]: draw a tentative
/// fraction `p` and test whether a run of fresh uniforms starting below it
/// has even length; each rejection adds one to the integer part. No
/// logarithm is ever evaluated, all decisions are digit comparisons.
///
/// With `BIT_OPTIMIZED` (the default, requiring an even base) a deviate
/// `p >= 1/2` is rejected up front, so the comparison runs only on
/// `[0, 1/2)`; the parity of the rejection count then supplies the high
/// digit and the integer part becomes half the count. This trims the
/// expected digit consumption from about 9.3 to about 7.2 bits per
/// deviate. Setting `BIT_OPTIMIZED = false` gives the plain method, which
/// works for any base.
///
/// [^1]: J. von Neumann, Various techniques used in connection with
///       random digits, Nat. Bureau Stand. Appl. Math. Ser. 12, 36 (1951).
///
/// ```
/// use rand_exact::{RandDigit, UnitExponential};
///
/// let mut rng = rand::thread_rng();
/// let mut dg = RandDigit::<{ 1 << 32 }, _>::new(&mut rng);
/// let mut dist = UnitExponential::<{ 1 << 32 }>::new();
/// let e: f64 = dist.sample(&mut dg).unwrap();
/// assert!(e > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct UnitExponential<const B: u64, const BIT_OPTIMIZED: bool = true> {
    v: URand<B>,
    w: URand<B>,
    x: URand<B>,
}

impl<const B: u64, const BIT_OPTIMIZED: bool> Default for UnitExponential<B, BIT_OPTIMIZED> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const B: u64, const BIT_OPTIMIZED: bool> UnitExponential<B, BIT_OPTIMIZED> {
    const BASE_OK: () = assert!(
        !BIT_OPTIMIZED || B % 2 == 0,
        "the bit-optimized exponential requires an even base"
    );

    /// Constructs the sampler.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::BASE_OK;
        UnitExponential {
            v: URand::new(),
            w: URand::new(),
            x: URand::new(),
        }
    }

    /// Generates the next deviate into `x`.
    pub fn generate<D: DigitGen<B>>(
        &mut self,
        g: &mut D,
        x: &mut URand<B>,
    ) -> Result<(), Exhausted> {
        // Each round of the comparison test accepts a fraction in [0, 1)
        // (or [0, 1/2)); the number of rejected rounds supplies the
        // integer part.
        let mut k = 0u32;
        while !self.fraction_accepted(g, x)? {
            k += 1;
        }
        if BIT_OPTIMIZED {
            if k % 2 != 0 {
                // Odd count: the deviate sits in the upper half, so add
                // 1/2 to the fraction.
                *x.rawdigit_mut(0) += (URand::<B>::MAX_DIGIT - 1) / 2 + 1;
            }
            x.set_integer(k / 2);
        } else {
            x.set_integer(k);
        }
        Ok(())
    }

    /// Generates a deviate rounded to nearest in `F`.
    pub fn sample<F: Float, D: DigitGen<B>>(&mut self, g: &mut D) -> Result<F, Exhausted> {
        let mut x = mem::take(&mut self.x);
        self.generate(g, &mut x)?;
        let r = x.value(g);
        self.x = x;
        r
    }

    // One round of von Neumann's test: true with probability
    // (1 - exp(-1)), or (1 - exp(-1/2)) when restricted to [0, 1/2).
    fn fraction_accepted<D: DigitGen<B>>(
        &mut self,
        g: &mut D,
        p: &mut URand<B>,
    ) -> Result<bool, Exhausted> {
        p.init();
        if BIT_OPTIMIZED && !p.less_than_half(g)? {
            return Ok(false);
        }
        if !self.w.init().less_than(g, p)? {
            return Ok(true);
        }
        loop {
            if !self.v.init().less_than(g, &mut self.w)? {
                return Ok(false);
            }
            if !self.w.init().less_than(g, &mut self.v)? {
                return Ok(true);
            }
        }
    }
}
