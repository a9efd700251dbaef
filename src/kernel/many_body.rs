//! Many-body kernel family
//!
//! The variable-size neighbor environment is reduced to a scalar
//! coordination descriptor `q`: the sum of cutoff weights over all
//! neighbors of an atom. Because the descriptor enters the displacement
//! chain rule linearly, the force/force kernel needs the second directional
//! derivative of the squared-exponential kernel on `q`, evaluated in closed
//! form over the four combinations of central and neighbor descriptors.

use crate::core::{Bond, LocalEnvironment, Result};
use crate::cutoff::CutoffFunction;
use crate::kernel::dims;

const FAMILY: &str = "many-body";
const BODY_ORDERS: usize = 1;

/// Coordination descriptor: sum of cutoff weights over a list of neighbor
/// distances. Additive over concatenated lists.
pub fn q_value(distances: &[f64], r_cut: f64, cutoff: &dyn CutoffFunction) -> f64 {
    distances
        .iter()
        .map(|&r| cutoff.evaluate(r_cut, r, 0.0).0)
        .sum()
}

/// Pairwise contribution of one neighbor to the coordination descriptor and
/// its derivative with respect to the central-atom displacement along the
/// axis whose direction cosine is `c`.
pub fn coordination_number(r: f64, c: f64, r_cut: f64, cutoff: &dyn CutoffFunction) -> (f64, f64) {
    cutoff.evaluate(r_cut, r, c)
}

fn q_of_bonds(bonds: &[Bond], r_cut: f64, cutoff: &dyn CutoffFunction) -> f64 {
    bonds
        .iter()
        .map(|bond| cutoff.evaluate(r_cut, bond.r, 0.0).0)
        .sum()
}

/// Second directional derivative of the squared-exponential kernel on two
/// scalar descriptors: `sig^2 exp(-dq^2 / 2 ls^2) / ls^2 (1 - dq^2 / ls^2)`.
pub(crate) fn sq_exp_double_derivative(q1: f64, q2: f64, sig: f64, ls: f64) -> f64 {
    let qdiffsq = (q1 - q2) * (q1 - q2);
    let ls2 = ls * ls;
    sig * sig * (-qdiffsq / (2.0 * ls2)).exp() / ls2 * (1.0 - qdiffsq / ls2)
}

/// First derivative of the squared-exponential kernel on two scalar
/// descriptors: `-sig^2 exp(-dq^2 / 2 ls^2) dq / ls^2`.
pub(crate) fn sq_exp_derivative(q1: f64, q2: f64, sig: f64, ls: f64) -> f64 {
    let qdiff = q1 - q2;
    let ls2 = ls * ls;
    -sig * sig * (-qdiff * qdiff / (2.0 * ls2)).exp() / ls2 * qdiff
}

/// Length-scale derivative of one force/force descriptor term.
fn ls_gradient_term(qdiffsq: f64, sig: f64, ls: f64) -> f64 {
    let ls2 = ls * ls;
    let prefact = (-qdiffsq / (2.0 * ls2)).exp() * sig * sig / ls.powi(5);
    -prefact * (qdiffsq * qdiffsq / ls2 - 5.0 * qdiffsq + 2.0 * ls2)
}

/// Length-scale derivative collected over the four descriptor-pair
/// combinations entering one neighbor-pair term.
fn ls_gradient(q1: f64, q2: f64, qi: f64, qj: f64, sig: f64, ls: f64) -> f64 {
    let d12 = (q1 - q2) * (q1 - q2);
    let dij = (qi - qj) * (qi - qj);
    let di2 = (qi - q2) * (qi - q2);
    let d1j = (q1 - qj) * (q1 - qj);

    ls_gradient_term(d12, sig, ls)
        + ls_gradient_term(dij, sig, ls)
        + ls_gradient_term(di2, sig, ls)
        + ls_gradient_term(d1j, sig, ls)
}

/// Many-body kernel between force components `d1` of `env1` and `d2` of
/// `env2`. Hyperparameters are `[sig, ls]`; `cutoffs` holds the single
/// many-body radius.
pub fn force(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    d2: usize,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<f64> {
    dims::check_dimensions(FAMILY, BODY_ORDERS, hyps, cutoffs)?;
    dims::check_component(d1)?;
    dims::check_component(d2)?;
    Ok(force_raw(
        env1, env2, d1, d2, hyps[0], hyps[1], cutoffs[0], cutoff,
    ))
}

/// Many-body force kernel and its gradient `[d/dsig, d/dls]`.
pub fn grad(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    d2: usize,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<(f64, Vec<f64>)> {
    dims::check_dimensions(FAMILY, BODY_ORDERS, hyps, cutoffs)?;
    dims::check_component(d1)?;
    dims::check_component(d2)?;
    let (kern, sig_derv, ls_derv) =
        grad_raw(env1, env2, d1, d2, hyps[0], hyps[1], cutoffs[0], cutoff);
    Ok((kern, vec![sig_derv, ls_derv]))
}

/// Many-body kernel between the local energies of the two environments:
/// the plain squared-exponential on the two central descriptors.
pub fn energy(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<f64> {
    dims::check_dimensions(FAMILY, BODY_ORDERS, hyps, cutoffs)?;
    Ok(energy_raw(env1, env2, hyps[0], hyps[1], cutoffs[0], cutoff))
}

/// Many-body kernel between force component `d1` of `env1` and the local
/// energy of `env2`.
pub fn force_energy(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<f64> {
    dims::check_dimensions(FAMILY, BODY_ORDERS, hyps, cutoffs)?;
    dims::check_component(d1)?;
    Ok(force_energy_raw(
        env1, env2, d1, hyps[0], hyps[1], cutoffs[0], cutoff,
    ))
}

pub(crate) fn force_raw(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    d2: usize,
    sig: f64,
    ls: f64,
    r_cut: f64,
    cutoff: &dyn CutoffFunction,
) -> f64 {
    let q1 = q_of_bonds(&env1.bonds_mb, r_cut, cutoff);
    let q2 = q_of_bonds(&env2.bonds_mb, r_cut, cutoff);
    let k12 = sq_exp_double_derivative(q1, q2, sig, ls);

    let n1 = env1.bonds_mb.len();
    let n2 = env2.bonds_mb.len();

    // Per-neighbor descriptors, descriptor gradients along the requested
    // force component, and the mixed central/neighbor kernel terms.
    let mut qis = vec![0.0; n1];
    let mut qi_grads = vec![0.0; n1];
    let mut ki2s = vec![0.0; n1];
    for (i, bond) in env1.bonds_mb.iter().enumerate() {
        let (_, dq) = coordination_number(bond.r, bond.component(d1), r_cut, cutoff);
        qi_grads[i] = dq;
        qis[i] = q_value(&env1.neigh_dists_mb[i], r_cut, cutoff);
        ki2s[i] = sq_exp_double_derivative(qis[i], q2, sig, ls);
    }

    let mut qjs = vec![0.0; n2];
    let mut qj_grads = vec![0.0; n2];
    let mut k1js = vec![0.0; n2];
    for (j, bond) in env2.bonds_mb.iter().enumerate() {
        let (_, dq) = coordination_number(bond.r, bond.component(d2), r_cut, cutoff);
        qj_grads[j] = dq;
        qjs[j] = q_value(&env2.neigh_dists_mb[j], r_cut, cutoff);
        k1js[j] = sq_exp_double_derivative(q1, qjs[j], sig, ls);
    }

    let mut kern = 0.0;
    for i in 0..n1 {
        for j in 0..n2 {
            let kij = sq_exp_double_derivative(qis[i], qjs[j], sig, ls);
            kern += qi_grads[i] * qj_grads[j] * (k12 + ki2s[i] + k1js[j] + kij);
        }
    }

    kern
}

pub(crate) fn grad_raw(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    d2: usize,
    sig: f64,
    ls: f64,
    r_cut: f64,
    cutoff: &dyn CutoffFunction,
) -> (f64, f64, f64) {
    let q1 = q_of_bonds(&env1.bonds_mb, r_cut, cutoff);
    let q2 = q_of_bonds(&env2.bonds_mb, r_cut, cutoff);
    let k12 = sq_exp_double_derivative(q1, q2, sig, ls);

    let n1 = env1.bonds_mb.len();
    let n2 = env2.bonds_mb.len();

    let mut qis = vec![0.0; n1];
    let mut qi_grads = vec![0.0; n1];
    let mut ki2s = vec![0.0; n1];
    for (i, bond) in env1.bonds_mb.iter().enumerate() {
        let (_, dq) = coordination_number(bond.r, bond.component(d1), r_cut, cutoff);
        qi_grads[i] = dq;
        qis[i] = q_value(&env1.neigh_dists_mb[i], r_cut, cutoff);
        ki2s[i] = sq_exp_double_derivative(qis[i], q2, sig, ls);
    }

    let mut qjs = vec![0.0; n2];
    let mut qj_grads = vec![0.0; n2];
    let mut k1js = vec![0.0; n2];
    for (j, bond) in env2.bonds_mb.iter().enumerate() {
        let (_, dq) = coordination_number(bond.r, bond.component(d2), r_cut, cutoff);
        qj_grads[j] = dq;
        qjs[j] = q_value(&env2.neigh_dists_mb[j], r_cut, cutoff);
        k1js[j] = sq_exp_double_derivative(q1, qjs[j], sig, ls);
    }

    let mut kern = 0.0;
    let mut sig_derv = 0.0;
    let mut ls_derv = 0.0;
    for i in 0..n1 {
        for j in 0..n2 {
            let kij = sq_exp_double_derivative(qis[i], qjs[j], sig, ls);
            let pair_grad = qi_grads[i] * qj_grads[j];
            let kern_term = pair_grad * (k12 + ki2s[i] + k1js[j] + kij);

            kern += kern_term;
            sig_derv += 2.0 / sig * kern_term;
            ls_derv += pair_grad * ls_gradient(q1, q2, qis[i], qjs[j], sig, ls);
        }
    }

    (kern, sig_derv, ls_derv)
}

/// Force/energy variant: the derivative acts on `env1` only, so only
/// env1's neighbor descriptors and descriptor gradients enter the sum.
pub(crate) fn force_energy_raw(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    sig: f64,
    ls: f64,
    r_cut: f64,
    cutoff: &dyn CutoffFunction,
) -> f64 {
    let q1 = q_of_bonds(&env1.bonds_mb, r_cut, cutoff);
    let q2 = q_of_bonds(&env2.bonds_mb, r_cut, cutoff);
    let k12 = sq_exp_derivative(q1, q2, sig, ls);

    let mut kern = 0.0;
    for (i, bond) in env1.bonds_mb.iter().enumerate() {
        let (_, qi_grad) = coordination_number(bond.r, bond.component(d1), r_cut, cutoff);
        let qi = q_value(&env1.neigh_dists_mb[i], r_cut, cutoff);
        let ki2 = sq_exp_derivative(qi, q2, sig, ls);
        kern -= qi_grad * (k12 + ki2);
    }

    kern
}

pub(crate) fn energy_raw(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    sig: f64,
    ls: f64,
    r_cut: f64,
    cutoff: &dyn CutoffFunction,
) -> f64 {
    let q1 = q_of_bonds(&env1.bonds_mb, r_cut, cutoff);
    let q2 = q_of_bonds(&env2.bonds_mb, r_cut, cutoff);
    let qdiff = q1 - q2;

    sig * sig * (-qdiff * qdiff / (2.0 * ls * ls)).exp()
}
