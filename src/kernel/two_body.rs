//! Two-body kernel family
//!
//! Covariance between pairs of local environments built from their two-body
//! neighbor lists: every (neighbor of env1, neighbor of env2) pair
//! contributes one exponentiated-quadratic term on the two bond lengths,
//! windowed by the cutoff on both sides. Cost is O(|bonds1| * |bonds2|)
//! with closed-form algebra per pair.

use crate::core::{Bond, LocalEnvironment, Result};
use crate::cutoff::CutoffFunction;
use crate::kernel::dims;
use crate::kernel::helpers::{self, GradConstants, KernelConstants};

const FAMILY: &str = "two-body";
const BODY_ORDERS: usize = 1;

/// Two-body kernel between force components `d1` of `env1` and `d2` of
/// `env2`. Hyperparameters are `[sig, ls]`; `cutoffs` holds the single
/// two-body radius.
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
        &env1.bonds_2,
        &env2.bonds_2,
        d1,
        d2,
        hyps[0],
        hyps[1],
        cutoffs[0],
        cutoff,
    ))
}

/// Two-body force kernel and its gradient `[d/dsig, d/dls]`.
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
    let (kern, sig_derv, ls_derv) = grad_raw(
        &env1.bonds_2,
        &env2.bonds_2,
        d1,
        d2,
        hyps[0],
        hyps[1],
        cutoffs[0],
        cutoff,
    );
    Ok((kern, vec![sig_derv, ls_derv]))
}

/// Two-body kernel between the local energies of the two environments.
/// Divided by 4: each bond is counted once per atom, for both environments.
pub fn energy(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<f64> {
    dims::check_dimensions(FAMILY, BODY_ORDERS, hyps, cutoffs)?;
    Ok(energy_raw(
        &env1.bonds_2,
        &env2.bonds_2,
        hyps[0],
        hyps[1],
        cutoffs[0],
        cutoff,
    ) / 4.0)
}

/// Two-body kernel between force component `d1` of `env1` and the local
/// energy of `env2`. Divided by 2 for the double count on the energy side.
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
        &env1.bonds_2,
        &env2.bonds_2,
        d1,
        hyps[0],
        hyps[1],
        cutoffs[0],
        cutoff,
    ) / 2.0)
}

pub(crate) fn force_raw(
    bonds1: &[Bond],
    bonds2: &[Bond],
    d1: usize,
    d2: usize,
    sig: f64,
    ls: f64,
    r_cut: f64,
    cutoff: &dyn CutoffFunction,
) -> f64 {
    let k = KernelConstants::new(sig, ls);
    let mut kern = 0.0;

    for bond1 in bonds1 {
        let ci = bond1.component(d1);
        let (fi, fdi) = cutoff.evaluate(r_cut, bond1.r, ci);

        for bond2 in bonds2 {
            let cj = bond2.component(d2);
            let (fj, fdj) = cutoff.evaluate(r_cut, bond2.r, cj);
            let r11 = bond1.r - bond2.r;

            kern += helpers::force_force(
                ci * cj,
                r11 * ci,
                r11 * cj,
                r11 * r11,
                fi,
                fj,
                fdi,
                fdj,
                &k,
            );
        }
    }

    kern
}

pub(crate) fn grad_raw(
    bonds1: &[Bond],
    bonds2: &[Bond],
    d1: usize,
    d2: usize,
    sig: f64,
    ls: f64,
    r_cut: f64,
    cutoff: &dyn CutoffFunction,
) -> (f64, f64, f64) {
    let k = GradConstants::new(sig, ls);
    let mut kern = 0.0;
    let mut sig_derv = 0.0;
    let mut ls_derv = 0.0;

    for bond1 in bonds1 {
        let ci = bond1.component(d1);
        let (fi, fdi) = cutoff.evaluate(r_cut, bond1.r, ci);

        for bond2 in bonds2 {
            let cj = bond2.component(d2);
            let (fj, fdj) = cutoff.evaluate(r_cut, bond2.r, cj);
            let r11 = bond1.r - bond2.r;

            let (kern_term, sig_term, ls_term) = helpers::force_force_grad(
                ci * cj,
                r11 * ci,
                r11 * cj,
                r11 * r11,
                fi,
                fj,
                fdi,
                fdj,
                &k,
            );
            kern += kern_term;
            sig_derv += sig_term;
            ls_derv += ls_term;
        }
    }

    (kern, sig_derv, ls_derv)
}

pub(crate) fn force_energy_raw(
    bonds1: &[Bond],
    bonds2: &[Bond],
    d1: usize,
    sig: f64,
    ls: f64,
    r_cut: f64,
    cutoff: &dyn CutoffFunction,
) -> f64 {
    let k = KernelConstants::new(sig, ls);
    let mut kern = 0.0;

    for bond1 in bonds1 {
        let ci = bond1.component(d1);
        let (fi, fdi) = cutoff.evaluate(r_cut, bond1.r, ci);

        for bond2 in bonds2 {
            let (fj, _) = cutoff.evaluate(r_cut, bond2.r, 0.0);
            let r11 = bond1.r - bond2.r;

            kern += helpers::force_energy(r11 * ci, r11 * r11, fi, fj, fdi, &k);
        }
    }

    kern
}

pub(crate) fn energy_raw(
    bonds1: &[Bond],
    bonds2: &[Bond],
    sig: f64,
    ls: f64,
    r_cut: f64,
    cutoff: &dyn CutoffFunction,
) -> f64 {
    let k = KernelConstants::new(sig, ls);
    let mut kern = 0.0;

    for bond1 in bonds1 {
        let (fi, _) = cutoff.evaluate(r_cut, bond1.r, 0.0);

        for bond2 in bonds2 {
            let (fj, _) = cutoff.evaluate(r_cut, bond2.r, 0.0);
            let r11 = bond1.r - bond2.r;

            kern += helpers::energy_energy(r11 * r11, fi, fj, &k);
        }
    }

    kern
}
