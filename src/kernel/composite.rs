//! Composite kernels summing independently-hyperparameterized body orders
//!
//! Each body order owns a disjoint, position-indexed slice of the flattened
//! hyperparameter vector (`[sig2, ls2, sig3, ls3, sigm, lsm]`) and one
//! entry of the cutoff-radii vector (`[r2, r3, rm]`). The composite value
//! is the plain sum of the per-order kernels with their usual
//! double/triple-counting normalizations.

use crate::core::{LocalEnvironment, Result};
use crate::cutoff::CutoffFunction;
use crate::kernel::dims;
use crate::kernel::{many_body, three_body, two_body};

const FAMILY_23: &str = "2+3-body";
const FAMILY_23M: &str = "2+3+many-body";

/// 2+3-body kernel between two force components.
pub fn two_plus_three_force(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    d2: usize,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<f64> {
    dims::check_dimensions(FAMILY_23, 2, hyps, cutoffs)?;
    dims::check_component(d1)?;
    dims::check_component(d2)?;

    let two_term = two_body::force_raw(
        &env1.bonds_2,
        &env2.bonds_2,
        d1,
        d2,
        hyps[0],
        hyps[1],
        cutoffs[0],
        cutoff,
    );
    let three_term = three_body::force_raw(env1, env2, d1, d2, hyps[2], hyps[3], cutoffs[1], cutoff);
    Ok(two_term + three_term)
}

/// 2+3-body force kernel and its gradient `[dsig2, dls2, dsig3, dls3]`.
pub fn two_plus_three_grad(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    d2: usize,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<(f64, Vec<f64>)> {
    dims::check_dimensions(FAMILY_23, 2, hyps, cutoffs)?;
    dims::check_component(d1)?;
    dims::check_component(d2)?;

    let (kern2, sig2_derv, ls2_derv) = two_body::grad_raw(
        &env1.bonds_2,
        &env2.bonds_2,
        d1,
        d2,
        hyps[0],
        hyps[1],
        cutoffs[0],
        cutoff,
    );
    let (kern3, sig3_derv, ls3_derv) =
        three_body::grad_raw(env1, env2, d1, d2, hyps[2], hyps[3], cutoffs[1], cutoff);

    Ok((
        kern2 + kern3,
        vec![sig2_derv, ls2_derv, sig3_derv, ls3_derv],
    ))
}

/// 2+3-body kernel between two local energies.
pub fn two_plus_three_energy(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<f64> {
    dims::check_dimensions(FAMILY_23, 2, hyps, cutoffs)?;

    let two_term = two_body::energy_raw(
        &env1.bonds_2,
        &env2.bonds_2,
        hyps[0],
        hyps[1],
        cutoffs[0],
        cutoff,
    ) / 4.0;
    let three_term =
        three_body::energy_raw(env1, env2, hyps[2], hyps[3], cutoffs[1], cutoff) / 9.0;
    Ok(two_term + three_term)
}

/// 2+3-body kernel between a force component and a local energy.
pub fn two_plus_three_force_energy(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<f64> {
    dims::check_dimensions(FAMILY_23, 2, hyps, cutoffs)?;
    dims::check_component(d1)?;

    let two_term = two_body::force_energy_raw(
        &env1.bonds_2,
        &env2.bonds_2,
        d1,
        hyps[0],
        hyps[1],
        cutoffs[0],
        cutoff,
    ) / 2.0;
    let three_term =
        three_body::force_energy_raw(env1, env2, d1, hyps[2], hyps[3], cutoffs[1], cutoff) / 3.0;
    Ok(two_term + three_term)
}

/// 2+3+many-body kernel between two force components.
pub fn two_plus_three_plus_many_force(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    d2: usize,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<f64> {
    dims::check_dimensions(FAMILY_23M, 3, hyps, cutoffs)?;
    dims::check_component(d1)?;
    dims::check_component(d2)?;

    let two_term = two_body::force_raw(
        &env1.bonds_2,
        &env2.bonds_2,
        d1,
        d2,
        hyps[0],
        hyps[1],
        cutoffs[0],
        cutoff,
    );
    let three_term = three_body::force_raw(env1, env2, d1, d2, hyps[2], hyps[3], cutoffs[1], cutoff);
    let many_term = many_body::force_raw(env1, env2, d1, d2, hyps[4], hyps[5], cutoffs[2], cutoff);
    Ok(two_term + three_term + many_term)
}

/// 2+3+many-body force kernel and its gradient
/// `[dsig2, dls2, dsig3, dls3, dsigm, dlsm]`.
pub fn two_plus_three_plus_many_grad(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    d2: usize,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<(f64, Vec<f64>)> {
    dims::check_dimensions(FAMILY_23M, 3, hyps, cutoffs)?;
    dims::check_component(d1)?;
    dims::check_component(d2)?;

    let (kern2, sig2_derv, ls2_derv) = two_body::grad_raw(
        &env1.bonds_2,
        &env2.bonds_2,
        d1,
        d2,
        hyps[0],
        hyps[1],
        cutoffs[0],
        cutoff,
    );
    let (kern3, sig3_derv, ls3_derv) =
        three_body::grad_raw(env1, env2, d1, d2, hyps[2], hyps[3], cutoffs[1], cutoff);
    let (kern_m, sigm_derv, lsm_derv) =
        many_body::grad_raw(env1, env2, d1, d2, hyps[4], hyps[5], cutoffs[2], cutoff);

    Ok((
        kern2 + kern3 + kern_m,
        vec![
            sig2_derv, ls2_derv, sig3_derv, ls3_derv, sigm_derv, lsm_derv,
        ],
    ))
}

/// 2+3+many-body kernel between two local energies.
pub fn two_plus_three_plus_many_energy(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<f64> {
    dims::check_dimensions(FAMILY_23M, 3, hyps, cutoffs)?;

    let two_term = two_body::energy_raw(
        &env1.bonds_2,
        &env2.bonds_2,
        hyps[0],
        hyps[1],
        cutoffs[0],
        cutoff,
    ) / 4.0;
    let three_term =
        three_body::energy_raw(env1, env2, hyps[2], hyps[3], cutoffs[1], cutoff) / 9.0;
    let many_term = many_body::energy_raw(env1, env2, hyps[4], hyps[5], cutoffs[2], cutoff);
    Ok(two_term + three_term + many_term)
}

/// 2+3+many-body kernel between a force component and a local energy.
pub fn two_plus_three_plus_many_force_energy(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<f64> {
    dims::check_dimensions(FAMILY_23M, 3, hyps, cutoffs)?;
    dims::check_component(d1)?;

    let two_term = two_body::force_energy_raw(
        &env1.bonds_2,
        &env2.bonds_2,
        d1,
        hyps[0],
        hyps[1],
        cutoffs[0],
        cutoff,
    ) / 2.0;
    let three_term =
        three_body::force_energy_raw(env1, env2, d1, hyps[2], hyps[3], cutoffs[1], cutoff) / 3.0;
    let many_term =
        many_body::force_energy_raw(env1, env2, d1, hyps[4], hyps[5], cutoffs[2], cutoff);
    Ok(two_term + three_term + many_term)
}
