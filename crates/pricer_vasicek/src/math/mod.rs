//! Mathematical building blocks.
//!
//! - `moments`: Decay-integral weight, pairwise coupling and the cross integral
//!   `∫₀^τ B_i B_j dx`

pub mod moments;

pub use moments::{cross_integral, cross_multiply, decay_integral, decay_integral_limit};
