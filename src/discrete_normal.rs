// Copyright 2020 Developers of the Rand project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The discrete normal distribution.

use crate::digit::{DigitGen, Exhausted};
use crate::irand::IRand;
use crate::normal::{bernoulli_exp_half_pow, geometric_exp_half};
use crate::urand::URand;
use core::fmt;
use core::mem;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error type returned from the discrete normal constructors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// `sigma <= 0`, a denominator `<= 0`, or `mu_num == i32::MIN`.
    BadParams,
    /// The derived integers would overflow 64-bit intermediates.
    Overflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::BadParams => "sigma > 0 required in discrete normal distribution",
            Error::Overflow => "overflow possible in discrete normal distribution",
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

// Knuth, TAOCP, vol 2, 4.5.2, Algorithm A.
fn gcd(u: i32, v: i32) -> i32 {
    let mut u = u.abs();
    let mut v = v.abs();
    while v > 0 {
        let r = u % v;
        u = v;
        v = r;
    }
    u
}

// ceil(n/d) for d > 0.
fn iceil(n: i64, d: i64) -> i64 {
    let k = n / d;
    k + i64::from(k * d < n)
}

/// Parameters of the discrete normal distribution: `mu = mu_num/mu_den`
/// and `sigma = sigma_num/sigma_den`, stored in lowest terms.
///
/// Two parameter sets compare equal exactly when they describe the same
/// rational pair. The text form is the four integers separated by single
/// spaces, which [`FromStr`] accepts back:
///
/// ```
/// use rand_exact::discrete_normal::Params;
///
/// let p = Params::new(2, 4, 6, 4).unwrap();
/// assert_eq!(p, Params::new(1, 2, 3, 2).unwrap());
/// assert_eq!(p.to_string(), "1 2 3 2");
/// assert_eq!("1 2 3 2".parse::<Params>().unwrap(), p);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Params {
    mu_num: i32,
    mu_den: i32,
    sigma_num: i32,
    sigma_den: i32,
}

impl Params {
    /// Constructs parameters from the two ratios.
    pub fn new(mu_num: i32, mu_den: i32, sigma_num: i32, sigma_den: i32) -> Result<Self, Error> {
        if !(sigma_num > 0 && sigma_den > 0 && mu_den > 0 && mu_num > i32::MIN) {
            return Err(Error::BadParams);
        }
        let l = gcd(mu_num, mu_den);
        let (mu_num, mu_den) = (mu_num / l, mu_den / l);
        let l = gcd(sigma_num, sigma_den);
        let (sigma_num, sigma_den) = (sigma_num / l, sigma_den / l);
        Ok(Params {
            mu_num,
            mu_den,
            sigma_num,
            sigma_den,
        })
    }

    /// Constructs parameters from integer `mu` and `sigma`.
    pub fn from_ints(mu: i32, sigma: i32) -> Result<Self, Error> {
        Self::new(mu, 1, sigma, 1)
    }

    /// Constructs parameters from numerators over a common denominator.
    pub fn with_den(mu_num: i32, sigma_num: i32, den: i32) -> Result<Self, Error> {
        Self::new(mu_num, den, sigma_num, den)
    }

    /// Numerator of `mu`.
    pub fn mu_num(&self) -> i32 {
        self.mu_num
    }

    /// Denominator of `mu`.
    pub fn mu_den(&self) -> i32 {
        self.mu_den
    }

    /// Numerator of `sigma`.
    pub fn sigma_num(&self) -> i32 {
        self.sigma_num
    }

    /// Denominator of `sigma`.
    pub fn sigma_den(&self) -> i32 {
        self.sigma_den
    }
}

impl Default for Params {
    /// `mu = 0`, `sigma = 1`.
    fn default() -> Self {
        Params {
            mu_num: 0,
            mu_den: 1,
            sigma_num: 1,
            sigma_den: 1,
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.mu_num, self.mu_den, self.sigma_num, self.sigma_den
        )
    }
}

impl FromStr for Params {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let mut it = s.split_whitespace().map(|w| w.parse::<i32>());
        let mut next = || it.next().ok_or(Error::BadParams)?.map_err(|_| Error::BadParams);
        let p = Self::new(next()?, next()?, next()?, next()?)?;
        Ok(p)
    }
}

/// Samples exactly from the discrete normal distribution
/// `P(i) ∝ exp(-((i - mu)/sigma)^2 / 2)` over the integers.
///
/// This implements algorithm D of Karney ([arXiv:1303.6257]): the shell
/// index `k` and its thinning are shared with the continuous normal
/// sampler, while the fraction is replaced by a lazily refined integer
/// residue `h` modulo `ceil(sigma)`, so every acceptance decision is an
/// integer comparison. The candidate `x = (xn0 + h*den)/sig` is rejected
/// when it reaches 1 (possible when `sigma` is not an integer) and, for
/// `k = 0` with negative sign, when `x = 0`, so the mirror image of the
/// mode is not counted twice.
///
/// All comparisons run in 64-bit integers; the constructor verifies up
/// front that no intermediate can overflow for shells up to `k = 51` (the
/// probability of ever reaching that shell is about 10^-543) and fails
/// with [`Error::Overflow`] otherwise. The base must be at most 2^24.
///
/// [arXiv:1303.6257]: https://arxiv.org/abs/1303.6257
///
/// ```
/// use rand_exact::{DiscreteNormal, RandDigit};
/// use rand_exact::discrete_normal::Params;
///
/// let mut rng = rand::thread_rng();
/// let mut dg = RandDigit::<{ 1 << 16 }, _>::new(&mut rng);
/// let mut dist = DiscreteNormal::new(Params::new(1, 3, 129, 2).unwrap()).unwrap();
/// let i: i32 = dist.sample(&mut dg).unwrap();
/// # let _ = i;
/// ```
#[derive(Clone, Debug)]
pub struct DiscreteNormal<const B: u64> {
    param: Params,
    // sigma = sig/den, mu = imu + mu/den, isig = ceil(sigma).
    sig: i64,
    mu: i64,
    den: i64,
    imu: i32,
    isig: i32,
    y: URand<B>,
    z: URand<B>,
    j: IRand<B>,
}

impl<const B: u64> DiscreteNormal<B> {
    const BASE_OK: () = assert!(B <= 1 << 24, "base must be in [2, 2^24]");
    const KMAX: i64 = 51;

    /// Constructs the sampler for a parameter set.
    pub fn new(param: Params) -> Result<Self, Error> {
        #[allow(clippy::let_unit_value)]
        let () = Self::BASE_OK;
        let imu = param.mu_num() / param.mu_den();
        let fmu_num = param.mu_num() - imu * param.mu_den();
        let isig = iceil(i64::from(param.sigma_num()), i64::from(param.sigma_den())) as i32;
        let l = gcd(param.sigma_den(), param.mu_den());
        let (mu_den_l, sigma_den_l) = (
            i64::from(param.mu_den() / l),
            i64::from(param.sigma_den() / l),
        );
        if !(mu_den_l <= i64::MAX / i64::from(param.sigma_num())
            && i64::from(fmu_num.abs()) <= i64::MAX / sigma_den_l
            && mu_den_l <= i64::MAX / i64::from(param.sigma_den()))
        {
            return Err(Error::Overflow);
        }
        let sig = i64::from(param.sigma_num()) * mu_den_l;
        let mu = i64::from(fmu_num) * sigma_den_l;
        let den = i64::from(param.sigma_den()) * mu_den_l;
        // isig * den shows up in the i-rand comparisons.
        if i64::from(isig) > i64::MAX / den {
            return Err(Error::Overflow);
        }
        // The largest plausible result must fit an i32 ...
        if !(i64::from(isig) <= i64::from(i32::MAX) / Self::KMAX
            && i64::from(imu.abs()) <= i64::from(i32::MAX) - i64::from(isig) * Self::KMAX)
        {
            return Err(Error::Overflow);
        }
        // ... and every comparison intermediate an i64: sig * k, 2m * base,
        // isig * base and sig * k * base all bound by max(2, sig) * base
        // * KMAX.
        if 2.max(sig) > i64::MAX / (B as i64 * Self::KMAX) {
            return Err(Error::Overflow);
        }
        Ok(DiscreteNormal {
            param,
            sig,
            mu,
            den,
            imu,
            isig,
            y: URand::new(),
            z: URand::new(),
            j: IRand::new(),
        })
    }

    /// The parameter set.
    pub fn param(&self) -> &Params {
        &self.param
    }

    /// Generates the next deviate into the i-rand `j`.
    ///
    /// On return `j` holds the deviate, possibly still spread over a
    /// power-of-base range; [`IRand::value`] pins it down.
    pub fn generate<D: DigitGen<B>>(
        &mut self,
        g: &mut D,
        j: &mut IRand<B>,
    ) -> Result<(), Exhausted> {
        loop {
            let k = geometric_exp_half(g, &mut self.y, &mut self.z)?;
            if !bernoulli_exp_half_pow(g, &mut self.y, &mut self.z, k * (k - 1))? {
                continue;
            }
            // The continuous sampler would now accept a fraction x in
            // [0, 1) and return s*(k + x). Here s*(k + x) = (i - mu)/sigma
            // must hold at an integer i, so x ranges over
            // xn0/sig + h * den/sig with h uniform below ceil(sigma) and
            // i0 the first candidate integer of the shell.
            let s = if j.init(g, 2)?.value(g)? != 0 { -1 } else { 1 };
            let xn = self.sig * i64::from(k) + i64::from(s) * self.mu;
            let i0 = iceil(xn, self.den);
            let xn0 = i0 * self.den - xn;
            j.init(g, self.isig)?;
            // A non-integer sigma can push x to 1 or beyond; and the pair
            // (s = -1, k = 0, x = 0) mirrors the mode, which the positive
            // sign already covers. Reject both.
            if !j.less_than(g, self.sig - xn0, self.den)?
                || (k == 0 && s < 0 && !j.greater_than(g, -xn0, self.den)?)
            {
                continue;
            }
            let mut h = k + 1;
            while h > 0 && self.tail_accepted(g, k, xn0, j)? {
                h -= 1;
            }
            if h > 0 {
                continue;
            }
            j.add((i0 as i32) + s * self.imu);
            if s < 0 {
                j.negate();
            }
            return Ok(());
        }
    }

    /// Generates a deviate and materializes it.
    pub fn sample<D: DigitGen<B>>(&mut self, g: &mut D) -> Result<i32, Exhausted> {
        let mut j = mem::take(&mut self.j);
        let r = self.generate(g, &mut j).and_then(|()| j.value(g));
        self.j = j;
        r
    }

    // True with probability exp(-x (2k + x) / (2k + 2)) where
    // x = (xn0 + den * j) / sig; the discrete counterpart of the normal
    // sampler's tail acceptance, with the candidate compared through the
    // i-rand and the 1/m trichotomy read off a scratch u-rand.
    fn tail_accepted<D: DigitGen<B>>(
        &mut self,
        g: &mut D,
        k: i32,
        xn0: i64,
        j: &mut IRand<B>,
    ) -> Result<bool, Exhausted> {
        let m = i64::from(2 * k + 2);
        let mut n = 0u32;
        loop {
            let mut f = if k > 0 {
                0
            } else {
                self.z.init().compare(g, 1, 2, m)?
            };
            if f < 0 {
                break;
            }
            self.z.init();
            let below = if n != 0 {
                self.z.less_than(g, &mut self.y)?
            } else {
                self.z.less_than_frac(g, xn0, self.den, self.sig, j)?
            };
            if !below {
                break;
            }
            if k > 0 {
                f = self.y.init().compare(g, 1, 2, m)?;
            }
            if f < 0 {
                break;
            }
            if f == 0 && !self.y.init().less_than_frac(g, xn0, self.den, self.sig, j)? {
                break;
            }
            mem::swap(&mut self.y, &mut self.z);
            n += 1;
        }
        Ok(n % 2 == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RandDigit;
    use alloc::string::ToString;

    #[test]
    fn params_reduce_and_compare() {
        let p = Params::new(2, 4, 6, 4).unwrap();
        assert_eq!(
            (p.mu_num(), p.mu_den(), p.sigma_num(), p.sigma_den()),
            (1, 2, 3, 2)
        );
        let q = Params::new(-2, 4, 6, 4).unwrap();
        assert_eq!((q.mu_num(), q.mu_den()), (-1, 2));

        assert_eq!(Params::from_ints(3, 2).unwrap(), Params::new(3, 1, 2, 1).unwrap());
        assert_eq!(Params::with_den(1, 3, 2).unwrap(), Params::new(1, 2, 3, 2).unwrap());
        assert_eq!(Params::default(), Params::from_ints(0, 1).unwrap());
    }

    #[test]
    fn params_reject_bad_input() {
        assert_eq!(Params::new(0, 1, 0, 1), Err(Error::BadParams));
        assert_eq!(Params::new(0, 1, -1, 1), Err(Error::BadParams));
        assert_eq!(Params::new(0, 1, 1, -1), Err(Error::BadParams));
        assert_eq!(Params::new(0, 0, 1, 1), Err(Error::BadParams));
        assert_eq!(Params::new(i32::MIN, 1, 1, 1), Err(Error::BadParams));
    }

    #[test]
    fn params_text_round_trip() {
        for s in ["0 1 1 1", "1 3 129 2", "-7 2 15 4"] {
            let p: Params = s.parse().unwrap();
            assert_eq!(p.to_string(), s);
        }
        assert_eq!("1 2 3".parse::<Params>(), Err(Error::BadParams));
        assert_eq!("a b c d".parse::<Params>(), Err(Error::BadParams));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn params_serde_round_trip() {
        let p = Params::new(1, 3, 129, 2).unwrap();
        let de: Params = bincode::deserialize(&bincode::serialize(&p).unwrap()).unwrap();
        assert_eq!(p, de);
    }

    #[test]
    fn constructor_overflow_guards() {
        // ceil(sigma) * KMAX does not fit an i32.
        assert_eq!(
            DiscreteNormal::<{ 1 << 16 }>::new(Params::from_ints(0, i32::MAX).unwrap())
                .unwrap_err(),
            Error::Overflow
        );
        // sigma is barely above 1 but sig = sigma_num * mu_den is large
        // enough that sig * base * KMAX does not fit an i64.
        assert_eq!(
            DiscreteNormal::<{ 1 << 24 }>::new(
                Params::new(1, 97, 1_073_741_825, 1_073_741_824).unwrap()
            )
            .unwrap_err(),
            Error::Overflow
        );
        assert!(DiscreteNormal::<{ 1 << 16 }>::new(Params::from_ints(0, 1 << 20).unwrap()).is_ok());
    }

    #[test]
    fn unit_sigma_hits_the_usual_values() {
        let mut rng = crate::test::rng(224);
        let mut dg = RandDigit::<{ 1 << 16 }, _>::new(&mut rng);
        let mut dist = DiscreteNormal::new(Params::default()).unwrap();
        let mut counts = [0u32; 9];
        for _ in 0..10_000 {
            let i = dist.sample(&mut dg).unwrap();
            counts[(i + 4).clamp(0, 8) as usize] += 1;
        }
        // P(0) ~ 0.4, P(+-1) ~ 0.24, P(+-2) ~ 0.054.
        assert!(counts[4] > 3500 && counts[4] < 4500);
        assert!(counts[3] > 2000 && counts[5] > 2000);
        assert!(counts[0] < 20);
    }

    #[test]
    fn mean_tracks_mu() {
        let mut rng = crate::test::rng(225);
        let mut dg = RandDigit::<{ 1 << 16 }, _>::new(&mut rng);
        let mut dist = DiscreteNormal::new(Params::new(7, 1, 4, 1).unwrap()).unwrap();
        let mut sum = 0i64;
        for _ in 0..10_000 {
            sum += i64::from(dist.sample(&mut dg).unwrap());
        }
        let mean = sum as f64 / 10_000.0;
        assert!((mean - 7.0).abs() < 0.2, "{}", mean);
    }

    #[test]
    fn generate_can_leave_entropy() {
        // With sigma = 256 in base 2 the residue h often stays spread
        // over a power-of-two range after acceptance.
        let mut rng = crate::test::rng(226);
        let mut dg = RandDigit::<2, _>::new(&mut rng);
        let mut dist = DiscreteNormal::new(Params::from_ints(0, 256).unwrap()).unwrap();
        let mut j = IRand::new();
        let mut spread = 0;
        for _ in 0..100 {
            dist.generate(&mut dg, &mut j).unwrap();
            if j.entropy() > 0 {
                spread += 1;
            }
            let v = j.value(&mut dg).unwrap();
            assert!(v.abs() < 3000);
        }
        assert!(spread > 0);
    }

    #[test]
    fn deterministic_for_a_seed() {
        let mut rng = crate::test::rng(227);
        let mut dg = RandDigit::<{ 1 << 16 }, _>::new(&mut rng);
        let mut dist = DiscreteNormal::new(Params::new(1, 3, 129, 2).unwrap()).unwrap();
        let mut a = [0i32; 8];
        for v in &mut a {
            *v = dist.sample(&mut dg).unwrap();
        }

        let mut rng = crate::test::rng(227);
        let mut dg = RandDigit::<{ 1 << 16 }, _>::new(&mut rng);
        let mut dist = DiscreteNormal::new(Params::new(1, 3, 129, 2).unwrap()).unwrap();
        for v in &a {
            assert_eq!(*v, dist.sample(&mut dg).unwrap());
        }
    }
}
