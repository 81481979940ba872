// Copyright 2020 Developers of the Rand project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Exact sampling from continuous and discrete distributions.
//!
//! The samplers in this crate draw from the unit uniform, unit
//! exponential, unit normal and discrete normal distributions *exactly*:
//! the output is distributed as if a real number had been sampled from
//! the true distribution and then rounded to the chosen floating point
//! format. There are no lookup tables, truncated series or floating point
//! transcendentals anywhere in the decision paths; every accept/reject
//! decision is an exact integer comparison on lazily drawn random digits.
//! The algorithms are Karney's ([arXiv:1303.6257]), built on von
//! Neumann's comparison technique.
//!
//! The building blocks are public: [`URand`] is a random real
//! materialized digit by digit, [`IRand`] a lazily refined uniform
//! integer, and [`DigitGen`] the digit-source contract tying either to a
//! word generator from [`rand_core`]. Samplers can hand back the deviate
//! in this lazy form, so the *same* deviate can be inspected, compared,
//! or rounded to any precision and rounding mode with an MPFR-style
//! inexact flag.
//!
//! ```
//! use rand_exact::{RandDigit, UnitNormal};
//!
//! let mut rng = rand::thread_rng();
//! // Base 2^32: one generator word per digit.
//! let mut dg = RandDigit::<{ 1 << 32 }, _>::new(&mut rng);
//! let mut dist = UnitNormal::new();
//! for _ in 0..16 {
//!     let x: f64 = dist.sample(&mut dg).unwrap();
//!     println!("{}", x);
//! }
//! ```
//!
//! # Digit sources
//!
//! All randomness flows through one base-`B` digit source per sampling
//! pipeline. Deviates sharing a digit source observe a single monotonic
//! digit stream, which is what makes runs reproducible: a seeded word
//! generator yields the same deviates on every platform. The digit source
//! is owned by the caller and passed by `&mut` into each call; samplers
//! keep no reference to it.
//!
//! Sampling only fails when the digit source does: the tabulated
//! [`TableGen`] reports [`Exhausted`] when it runs out, while sources
//! backed by a real generator never fail and their users can safely
//! unwrap.
//!
//! [arXiv:1303.6257]: https://arxiv.org/abs/1303.6257

#![doc(
    html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128-blk.png",
    html_favicon_url = "https://www.rust-lang.org/favicon.ico"
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod digit;
pub mod discrete_normal;
mod exponential;
mod float;
mod irand;
mod normal;
mod table;
mod uniform;
mod urand;

pub use digit::{inv_base, DigitGen, Exhausted, RandDigit};
pub use discrete_normal::{DiscreteNormal, Error as DiscreteNormalError, Params};
pub use exponential::UnitExponential;
pub use float::{Float, Round};
pub use irand::IRand;
pub use normal::UnitNormal;
pub use table::TableGen;
pub use uniform::UnitUniform;
pub use urand::URand;
