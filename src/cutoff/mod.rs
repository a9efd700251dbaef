//! Smooth radial cutoff functions
//!
//! Every interatomic distance entering a kernel is windowed by a cutoff
//! function so that contributions vanish continuously at the cutoff radius.
//! The cutoff is a pluggable strategy passed explicitly through every kernel
//! call; nothing in the kernel core hardcodes a particular window.

use std::f64::consts::PI;

/// Smooth radial window applied to every interatomic distance.
///
/// `evaluate` returns the weight together with its derivative with respect
/// to the displacement of the central atom along the Cartesian axis whose
/// direction cosine is `direction_cosine`. Since the distance shrinks by
/// `direction_cosine` per unit displacement, that derivative is
/// `-f'(r) * direction_cosine`.
///
/// Implementations must satisfy: weight exactly 1 at `r = 0`, exactly 0 at
/// `r >= r_cut`, smooth in between, with a derivative continuous at the
/// cutoff radius.
pub trait CutoffFunction: Send + Sync {
    /// Compute `(weight, weight_derivative)` at distance `r`.
    fn evaluate(&self, r_cut: f64, r: f64, direction_cosine: f64) -> (f64, f64);
}

/// Quadratic window `f(r) = (1 - r/r_cut)^2`, clamped to 0 beyond the
/// cutoff. Both the weight and its derivative vanish at `r = r_cut`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticCutoff;

impl CutoffFunction for QuadraticCutoff {
    fn evaluate(&self, r_cut: f64, r: f64, direction_cosine: f64) -> (f64, f64) {
        if r >= r_cut {
            return (0.0, 0.0);
        }
        let rdiff = 1.0 - r / r_cut;
        let weight = rdiff * rdiff;
        let derivative = 2.0 * rdiff / r_cut * direction_cosine;
        (weight, derivative)
    }
}

/// Cosine window `f(r) = (1 + cos(pi r / r_cut)) / 2`, clamped to 0 beyond
/// the cutoff.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineCutoff;

impl CutoffFunction for CosineCutoff {
    fn evaluate(&self, r_cut: f64, r: f64, direction_cosine: f64) -> (f64, f64) {
        if r >= r_cut {
            return (0.0, 0.0);
        }
        let x = PI * r / r_cut;
        let weight = 0.5 * (1.0 + x.cos());
        let derivative = 0.5 * PI / r_cut * x.sin() * direction_cosine;
        (weight, derivative)
    }
}

/// No windowing: weight 1 and zero derivative everywhere inside the cutoff.
///
/// Useful for exercising the bare kernel algebra in tests; it deliberately
/// violates the smoothness contract at `r = r_cut`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardCutoff;

impl CutoffFunction for HardCutoff {
    fn evaluate(&self, r_cut: f64, r: f64, _direction_cosine: f64) -> (f64, f64) {
        if r >= r_cut {
            return (0.0, 0.0);
        }
        (1.0, 0.0)
    }
}
