//! Three-body kernel family
//!
//! Each contribution couples a triplet of env1 (central atom plus two
//! mutually-in-cutoff neighbors) with a triplet of env2. A triplet carries
//! three distances: the two bonds and the cross bond between the outer
//! atoms. Because the two outer atoms of a physical triplet have no
//! intrinsic order, each triplet pair sums the kernel over all six
//! matchings of distance slots, making the result invariant under
//! relabeling the neighbors within either triplet.

use crate::core::{LocalEnvironment, Result};
use crate::cutoff::CutoffFunction;
use crate::kernel::dims;
use crate::kernel::helpers::{self, GradConstants, KernelConstants};

const FAMILY: &str = "three-body";
const BODY_ORDERS: usize = 1;

/// The six bijections matching env1's (bond 1, bond 2, cross bond) distance
/// slots to env2's. The table order fixes the floating-point summation
/// order for reproducibility.
const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [2, 0, 1],
    [1, 2, 0],
    [1, 0, 2],
    [2, 1, 0],
    [0, 2, 1],
];

/// One enumerated triplet: the three distances, the direction cosines of
/// the two bonds along the requested force component, and the combined
/// cutoff weight and its derivative. The cross-bond weight carries no
/// derivative with respect to the central atom.
struct TripletTerm {
    r: [f64; 3],
    c: [f64; 2],
    f: f64,
    fd: f64,
}

/// Enumerate the valid triplets of an environment via the cross-bond
/// arrays. `d = 0` means no force derivative is requested (energy side);
/// cosines and cutoff derivatives are then zero.
fn visit_triplets<F: FnMut(&TripletTerm)>(
    env: &LocalEnvironment,
    d: usize,
    r_cut: f64,
    cutoff: &dyn CutoffFunction,
    mut visit: F,
) {
    for (m, bond1) in env.bonds_3.iter().enumerate() {
        let c1 = if d == 0 { 0.0 } else { bond1.component(d) };
        let (f1, fd1) = cutoff.evaluate(r_cut, bond1.r, c1);

        for n in 0..env.triplet_counts[m] {
            let col = m + n + 1;
            let partner = env.cross_bond_inds[m][col];
            let bond2 = &env.bonds_3[partner];
            let c2 = if d == 0 { 0.0 } else { bond2.component(d) };
            let (f2, fd2) = cutoff.evaluate(r_cut, bond2.r, c2);

            let r3 = env.cross_bond_dists[m][col];
            let (f3, _) = cutoff.evaluate(r_cut, r3, 0.0);

            visit(&TripletTerm {
                r: [bond1.r, bond2.r, r3],
                c: [c1, c2],
                f: f1 * f2 * f3,
                fd: fd1 * f2 * f3 + f1 * fd2 * f3,
            });
        }
    }
}

/// Reduce one slot matching to the generalized scalar combinations consumed
/// by the pairwise primitives: the squared-difference sum, the two
/// cosine-contracted difference sums, and the cosine contraction of slots
/// where bonds of both environments meet (the cross bond has no cosine).
#[inline]
fn permutation_sums(ti: &TripletTerm, tj: &TripletTerm, perm: &[usize; 3]) -> (f64, f64, f64, f64) {
    let mut a = 0.0;
    let mut b = 0.0;
    let mut c = 0.0;
    let mut d = 0.0;

    for s1 in 0..3 {
        let s2 = perm[s1];
        let diff = ti.r[s1] - tj.r[s2];
        d += diff * diff;
        if s1 < 2 {
            b += diff * ti.c[s1];
        }
        if s2 < 2 {
            c += diff * tj.c[s2];
        }
        if s1 < 2 && s2 < 2 {
            a += ti.c[s1] * tj.c[s2];
        }
    }

    (a, b, c, d)
}

/// Three-body kernel between force components `d1` of `env1` and `d2` of
/// `env2`. Hyperparameters are `[sig, ls]`; `cutoffs` holds the single
/// three-body radius.
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

/// Three-body force kernel and its gradient `[d/dsig, d/dls]`.
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

/// Three-body kernel between the local energies of the two environments.
/// Divided by 9: every triplet is counted three times per environment.
pub fn energy(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    hyps: &[f64],
    cutoffs: &[f64],
    cutoff: &dyn CutoffFunction,
) -> Result<f64> {
    dims::check_dimensions(FAMILY, BODY_ORDERS, hyps, cutoffs)?;
    Ok(energy_raw(env1, env2, hyps[0], hyps[1], cutoffs[0], cutoff) / 9.0)
}

/// Three-body kernel between force component `d1` of `env1` and the local
/// energy of `env2`. Divided by 3 for the triple count on the energy side.
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
    Ok(force_energy_raw(env1, env2, d1, hyps[0], hyps[1], cutoffs[0], cutoff) / 3.0)
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
    let k = KernelConstants::new(sig, ls);
    let mut kern = 0.0;

    visit_triplets(env1, d1, r_cut, cutoff, |ti| {
        visit_triplets(env2, d2, r_cut, cutoff, |tj| {
            for perm in &PERMUTATIONS {
                let (a, b, c, d) = permutation_sums(ti, tj, perm);
                kern += helpers::force_force(a, b, c, d, ti.f, tj.f, ti.fd, tj.fd, &k);
            }
        });
    });

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
    let k = GradConstants::new(sig, ls);
    let mut kern = 0.0;
    let mut sig_derv = 0.0;
    let mut ls_derv = 0.0;

    visit_triplets(env1, d1, r_cut, cutoff, |ti| {
        visit_triplets(env2, d2, r_cut, cutoff, |tj| {
            for perm in &PERMUTATIONS {
                let (a, b, c, d) = permutation_sums(ti, tj, perm);
                let (kern_term, sig_term, ls_term) =
                    helpers::force_force_grad(a, b, c, d, ti.f, tj.f, ti.fd, tj.fd, &k);
                kern += kern_term;
                sig_derv += sig_term;
                ls_derv += ls_term;
            }
        });
    });

    (kern, sig_derv, ls_derv)
}

pub(crate) fn force_energy_raw(
    env1: &LocalEnvironment,
    env2: &LocalEnvironment,
    d1: usize,
    sig: f64,
    ls: f64,
    r_cut: f64,
    cutoff: &dyn CutoffFunction,
) -> f64 {
    let k = KernelConstants::new(sig, ls);
    let mut kern = 0.0;

    visit_triplets(env1, d1, r_cut, cutoff, |ti| {
        visit_triplets(env2, 0, r_cut, cutoff, |tj| {
            for perm in &PERMUTATIONS {
                let (_, b, _, d) = permutation_sums(ti, tj, perm);
                kern += helpers::force_energy(b, d, ti.f, tj.f, ti.fd, &k);
            }
        });
    });

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
    let k = KernelConstants::new(sig, ls);
    let mut kern = 0.0;

    visit_triplets(env1, 0, r_cut, cutoff, |ti| {
        visit_triplets(env2, 0, r_cut, cutoff, |tj| {
            for perm in &PERMUTATIONS {
                let (_, _, _, d) = permutation_sums(ti, tj, perm);
                kern += helpers::energy_energy(d, ti.f, tj.f, &k);
            }
        });
    });

    kern
}
