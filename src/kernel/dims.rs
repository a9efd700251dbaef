//! Call-time validation of hyperparameter and cutoff vector shapes
//!
//! Each kernel family owns a disjoint, position-indexed slice of the
//! flattened hyperparameter vector (two entries per body order) and one
//! cutoff radius per body order. A caller may append one trailing noise
//! hyperparameter, which the kernel core ignores. Anything else is a
//! configuration error and fails fast before any bond is touched.

use crate::core::{KernelError, Result};

pub(crate) fn check_dimensions(
    family: &'static str,
    body_orders: usize,
    hyps: &[f64],
    cutoffs: &[f64],
) -> Result<()> {
    let expected = 2 * body_orders;
    if hyps.len() != expected && hyps.len() != expected + 1 {
        log::debug!(
            "{} kernel called with {} hyperparameters, expected {}",
            family,
            hyps.len(),
            expected
        );
        return Err(KernelError::HyperparameterMismatch {
            family,
            expected,
            actual: hyps.len(),
        });
    }
    if cutoffs.len() != body_orders {
        log::debug!(
            "{} kernel called with {} cutoff radii, expected {}",
            family,
            cutoffs.len(),
            body_orders
        );
        return Err(KernelError::CutoffMismatch {
            family,
            expected: body_orders,
            actual: cutoffs.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_component(d: usize) -> Result<()> {
    if (1..=3).contains(&d) {
        Ok(())
    } else {
        Err(KernelError::InvalidForceComponent { component: d })
    }
}
