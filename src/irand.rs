// Copyright 2020 Developers of the Rand project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Lazily refined uniform integers.

use crate::digit::{DigitGen, Exhausted};
use core::fmt;

/// A partially sampled integer, uniform on `[0, m)`.
///
/// The sampling method is Lumbroso's (2013, [arXiv:1304.1916]) generalized
/// to digits in an arbitrary base `B`, with one important addition: only
/// enough digits are drawn to narrow the value down to an interval whose
/// width is a power of `B`. For `B = 2` and `m = 9`, [`init`](IRand::init)
/// leaves one of
///
/// ```text
/// range prob
/// [0,8) 32/63
/// [0,2)  2/21
/// [2,6)  4/21
/// [6,8)  2/21
/// [8,9)  1/9
/// ```
///
/// [`min`](IRand::min) and [`max`](IRand::max) give the current closed
/// range and [`entropy`](IRand::entropy) the number of digits still needed
/// to pin the value down. Comparisons against rationals draw digits only
/// while the answer is undetermined; [`value`](IRand::value) draws the
/// rest.
///
/// [arXiv:1304.1916]: https://arxiv.org/abs/1304.1916
#[derive(Clone, Debug)]
pub struct IRand<const B: u64> {
    // Current range is a + [0, d) with d = B^l.
    a: i32,
    d: i32,
    l: u32,
}

impl<const B: u64> Default for IRand<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const B: u64> IRand<B> {
    const BASE_OK: () = assert!(B >= 2 && B <= 1 << 32, "base must lie in [2, 2^32]");

    /// A new i-rand fixed at 0, i.e. uniform on `[0, 1)`.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::BASE_OK;
        IRand { a: 0, d: 1, l: 0 }
    }

    /// Restarts as a uniform integer in `[0, m)`.
    ///
    /// `m < 1` is treated as 1. Returns `self` so a comparison can be
    /// chained onto the call.
    pub fn init<D: DigitGen<B>>(&mut self, g: &mut D, m: i32) -> Result<&mut Self, Exhausted> {
        let m = if m <= 0 { 1 } else { i64::from(m) };
        let b = B as i64;
        let mut v = 1i64;
        let mut c = 0i64;
        loop {
            self.l = 0;
            // Play out the sampling loop without drawing digits, with w in
            // the role of v and c represented by the range [a, a + d).
            // Accept when both ends of the range qualify as return values
            // at the same time; otherwise draw another digit and retry.
            let mut w = v;
            let mut a = c;
            let mut d = 1i64;
            loop {
                if w >= m {
                    let j = (a / m) * m;
                    a -= j;
                    w -= j;
                    if w >= m {
                        if a + d <= m {
                            self.a = a as i32;
                            self.d = d as i32;
                            return Ok(self);
                        }
                        break;
                    }
                }
                w *= b;
                a *= b;
                d *= b;
                self.l += 1;
            }
            let j = (v / m) * m;
            v -= j;
            c -= j;
            v *= b;
            c = c * b + i64::from(g.try_digit()?);
        }
    }

    /// Draws the remaining digits and returns the now-fixed value.
    pub fn value<D: DigitGen<B>>(&mut self, g: &mut D) -> Result<i32, Exhausted> {
        while self.l > 0 {
            self.refine(g)?;
        }
        Ok(self.a)
    }

    /// Current lower end of the range.
    pub fn min(&self) -> i32 {
        self.a
    }

    /// Current upper end of the range (inclusive).
    pub fn max(&self) -> i32 {
        self.a + self.d - 1
    }

    /// Number of digits still needed to fix the value.
    pub fn entropy(&self) -> u32 {
        self.l
    }

    /// Negates the range.
    pub fn negate(&mut self) {
        self.a = -self.max();
    }

    /// Shifts the range by `c`.
    pub fn add(&mut self, c: i32) {
        self.a += c;
    }

    /// Tests `self < m/n`, drawing digits until determined. Requires
    /// `n > 0`.
    pub fn less_than<D: DigitGen<B>>(
        &mut self,
        g: &mut D,
        m: i64,
        n: i64,
    ) -> Result<bool, Exhausted> {
        loop {
            if n * i64::from(self.max()) < m {
                return Ok(true);
            }
            if n * i64::from(self.min()) >= m {
                return Ok(false);
            }
            self.refine(g)?;
        }
    }

    /// Tests `self <= m/n`. Requires `n > 0`.
    pub fn less_than_equal<D: DigitGen<B>>(
        &mut self,
        g: &mut D,
        m: i64,
        n: i64,
    ) -> Result<bool, Exhausted> {
        self.less_than(g, m + 1, n)
    }

    /// Tests `self > m/n`. Requires `n > 0`.
    pub fn greater_than<D: DigitGen<B>>(
        &mut self,
        g: &mut D,
        m: i64,
        n: i64,
    ) -> Result<bool, Exhausted> {
        Ok(!self.less_than_equal(g, m, n)?)
    }

    /// Tests `self >= m/n`. Requires `n > 0`.
    pub fn greater_than_equal<D: DigitGen<B>>(
        &mut self,
        g: &mut D,
        m: i64,
        n: i64,
    ) -> Result<bool, Exhausted> {
        Ok(!self.less_than(g, m, n)?)
    }

    /// Narrows the range by one digit, dividing its width by `B`.
    pub fn refine<D: DigitGen<B>>(&mut self, g: &mut D) -> Result<(), Exhausted> {
        if self.l > 0 {
            self.l -= 1;
            self.d = (i64::from(self.d) / B as i64) as i32;
            self.a += g.try_digit()? as i32 * self.d;
        }
        Ok(())
    }
}

impl<const B: u64> fmt::Display for IRand<B> {
    /// Formats as `min+[0,width)`, or just the value once it is fixed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.l > 0 {
            write!(f, "{}+[0,{})", self.min(), self.max() - self.min() + 1)
        } else {
            write!(f, "{}", self.min())
        }
    }
}
