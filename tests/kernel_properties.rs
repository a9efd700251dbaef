//! Property tests for the kernel engine
//!
//! These tests verify the mathematical contracts that hold across kernel
//! families: symmetry, permutation invariance, gradient consistency against
//! finite differences, composite additivity and the hand-computed
//! end-to-end scenario.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use gp_atomic_kernels::kernel::{composite, many_body, three_body, two_body};
use gp_atomic_kernels::{Bond, CosineCutoff, CutoffFunction, KernelFamily, LocalEnvironment, QuadraticCutoff};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Environment with two neighbors forming one triplet, populated for all
/// three body orders.
fn full_env(r1: f64, r2: f64, cross: f64) -> LocalEnvironment {
    let bonds = vec![
        Bond::new(r1, [0.6, 0.8, 0.0]),
        Bond::new(r2, [0.0, 0.6, 0.8]),
    ];
    LocalEnvironment::new(
        bonds.clone(),
        bonds.clone(),
        vec![vec![0, 1], vec![0, 0]],
        vec![vec![0.0, cross], vec![0.0, 0.0]],
        vec![1, 0],
        bonds,
        vec![vec![0.9, 1.4], vec![1.1]],
    )
}

fn sample_envs() -> (LocalEnvironment, LocalEnvironment) {
    (full_env(0.7, 0.9, 1.1), full_env(0.8, 1.2, 1.4))
}

#[test]
fn two_body_symmetric_under_environment_swap() {
    init_logger();
    let (env1, env2) = sample_envs();
    let hyps = [1.2, 0.8];
    let cutoffs = [2.0];

    for d in 1..=3 {
        let k12 = two_body::force(&env1, &env2, d, d, &hyps, &cutoffs, &QuadraticCutoff).unwrap();
        let k21 = two_body::force(&env2, &env1, d, d, &hyps, &cutoffs, &QuadraticCutoff).unwrap();
        assert_relative_eq!(k12, k21, epsilon = 1e-13);
    }
}

/// Hand-computed double sum for two single-neighbor environments: the
/// energy kernel has one term, sig^2 fi fj exp(-(r1-r2)^2/2ls^2), divided
/// by 4.
#[test]
fn two_body_energy_hand_computed() {
    let env1 = LocalEnvironment::two_body_only(vec![Bond::new(0.6, [1.0, 0.0, 0.0])]);
    let env2 = LocalEnvironment::two_body_only(vec![Bond::new(1.1, [0.0, 1.0, 0.0])]);
    let sig = 1.2;
    let ls = 0.7;
    let r_cut = 2.0;

    let (f1, _) = QuadraticCutoff.evaluate(r_cut, 0.6, 0.0);
    let (f2, _) = QuadraticCutoff.evaluate(r_cut, 1.1, 0.0);
    let expected = sig * sig * f1 * f2 * (-0.25_f64 / (2.0 * ls * ls)).exp() / 4.0;

    let kern = two_body::energy(&env1, &env2, &[sig, ls], &[r_cut], &QuadraticCutoff).unwrap();
    assert_relative_eq!(kern, expected, epsilon = 1e-12);
}

/// End-to-end scenario: single neighbors at r = 0.5 and 1.5 inside a
/// cutoff of 2.0, sig = ls = 1, d1 = d2 = 1. With the quadratic window,
/// fi = 0.5625, fdi = 0.75, fj = 0.0625, fdj = 0.25 and the closed form
/// gives exp(-1/2) * (fdi fdj - fi fdj + fdi fj).
#[test]
fn two_body_end_to_end_closed_form() {
    let env1 = LocalEnvironment::two_body_only(vec![Bond::new(0.5, [1.0, 0.0, 0.0])]);
    let env2 = LocalEnvironment::two_body_only(vec![Bond::new(1.5, [1.0, 0.0, 0.0])]);

    let kern = two_body::force(&env1, &env2, 1, 1, &[1.0, 1.0], &[2.0], &QuadraticCutoff).unwrap();
    let expected = (-0.5_f64).exp() * (0.75 * 0.25 - 0.5625 * 0.25 + 0.75 * 0.0625);
    assert_abs_diff_eq!(kern, expected, epsilon = 1e-10);
}

#[test]
fn three_body_invariant_under_neighbor_relabeling() {
    let bond_a = Bond::new(0.7, [1.0, 0.0, 0.0]);
    let bond_b = Bond::new(0.9, [0.0, 1.0, 0.0]);

    let make = |first: Bond, second: Bond| {
        LocalEnvironment::two_body_only(vec![]).with_three_body(
            vec![first, second],
            vec![vec![0, 1], vec![0, 0]],
            vec![vec![0.0, 1.1], vec![0.0, 0.0]],
            vec![1, 0],
        )
    };
    let env1 = make(bond_a, bond_b);
    let env1_swapped = make(bond_b, bond_a);
    let (_, env2) = sample_envs();

    let hyps = [1.0, 0.9];
    let cutoffs = [2.0];
    let k = three_body::force(&env1, &env2, 1, 2, &hyps, &cutoffs, &QuadraticCutoff).unwrap();
    let k_swapped =
        three_body::force(&env1_swapped, &env2, 1, 2, &hyps, &cutoffs, &QuadraticCutoff).unwrap();
    assert_relative_eq!(k, k_swapped, epsilon = 1e-12);
}

/// For every family: the gradient's value component equals the plain
/// kernel, d/dsig is exactly 2 value / sig, and d/dls matches a central
/// finite difference to 1e-3 relative tolerance.
#[test]
fn gradients_consistent_across_families() {
    init_logger();
    let (env1, env2) = sample_envs();
    let delta = 1e-3;
    let cutoff = QuadraticCutoff;

    for family in KernelFamily::ALL {
        let orders = family.body_orders();
        let hyps: Vec<f64> = (0..2 * orders)
            .map(|i| if i % 2 == 0 { 1.1 } else { 0.9 })
            .collect();
        let cutoffs = vec![2.0; orders];

        let value = family
            .force(&env1, &env2, 1, 1, &hyps, &cutoffs, &cutoff)
            .unwrap();
        let (value_g, gradient) = family
            .grad(&env1, &env2, 1, 1, &hyps, &cutoffs, &cutoff)
            .unwrap();
        assert_relative_eq!(value, value_g, epsilon = 1e-13);
        assert_eq!(gradient.len(), 2 * orders);

        for order in 0..orders {
            // Perturb each hyperparameter of this block in turn and compare
            // the analytic derivative against the central difference.
            for (slot, derv) in [
                (2 * order, gradient[2 * order]),
                (2 * order + 1, gradient[2 * order + 1]),
            ] {
                let mut up = hyps.clone();
                let mut down = hyps.clone();
                up[slot] += delta;
                down[slot] -= delta;
                let k_up = family
                    .force(&env1, &env2, 1, 1, &up, &cutoffs, &cutoff)
                    .unwrap();
                let k_down = family
                    .force(&env1, &env2, 1, 1, &down, &cutoffs, &cutoff)
                    .unwrap();
                let fd = (k_up - k_down) / (2.0 * delta);
                assert_relative_eq!(derv, fd, max_relative = 1e-3);
            }
        }
    }
}

/// The force/force kernel is quadratic in each block's signal variance, so
/// the sig derivative obeys the exact identity 2 value / sig for the
/// single-order force kernels.
#[test]
fn sig_derivative_identity_two_and_three_body() {
    let (env1, env2) = sample_envs();
    let hyps = [1.3, 0.8];
    let cutoffs = [2.0];

    let value = two_body::force(&env1, &env2, 2, 3, &hyps, &cutoffs, &QuadraticCutoff).unwrap();
    let (_, gradient) = two_body::grad(&env1, &env2, 2, 3, &hyps, &cutoffs, &QuadraticCutoff).unwrap();
    assert_relative_eq!(gradient[0], 2.0 / hyps[0] * value, epsilon = 1e-12);

    let value = three_body::force(&env1, &env2, 2, 3, &hyps, &cutoffs, &QuadraticCutoff).unwrap();
    let (_, gradient) =
        three_body::grad(&env1, &env2, 2, 3, &hyps, &cutoffs, &QuadraticCutoff).unwrap();
    assert_relative_eq!(gradient[0], 2.0 / hyps[0] * value, epsilon = 1e-12);
}

#[test]
fn composite_kernels_are_additive() {
    let (env1, env2) = sample_envs();
    let hyps = [1.0, 0.8, 1.1, 0.9, 0.7, 1.2];
    let cutoffs = [2.0, 1.9, 2.1];

    let two = two_body::force(&env1, &env2, 1, 1, &hyps[..2], &cutoffs[..1], &QuadraticCutoff)
        .unwrap();
    let three =
        three_body::force(&env1, &env2, 1, 1, &hyps[2..4], &cutoffs[1..2], &QuadraticCutoff)
            .unwrap();
    let many = many_body::force(&env1, &env2, 1, 1, &hyps[4..], &cutoffs[2..], &QuadraticCutoff)
        .unwrap();

    let pair = composite::two_plus_three_force(
        &env1,
        &env2,
        1,
        1,
        &hyps[..4],
        &cutoffs[..2],
        &QuadraticCutoff,
    )
    .unwrap();
    assert_relative_eq!(pair, two + three, epsilon = 1e-13);

    let triple = composite::two_plus_three_plus_many_force(
        &env1,
        &env2,
        1,
        1,
        &hyps,
        &cutoffs,
        &QuadraticCutoff,
    )
    .unwrap();
    assert_relative_eq!(triple, two + three + many, epsilon = 1e-13);
}

#[test]
fn force_energy_composites_are_additive() {
    let (env1, env2) = sample_envs();
    let hyps = [1.0, 0.8, 1.1, 0.9, 0.7, 1.2];
    let cutoffs = [2.0, 1.9, 2.1];

    let two =
        two_body::force_energy(&env1, &env2, 2, &hyps[..2], &cutoffs[..1], &QuadraticCutoff)
            .unwrap();
    let three = three_body::force_energy(
        &env1,
        &env2,
        2,
        &hyps[2..4],
        &cutoffs[1..2],
        &QuadraticCutoff,
    )
    .unwrap();
    let many =
        many_body::force_energy(&env1, &env2, 2, &hyps[4..], &cutoffs[2..], &QuadraticCutoff)
            .unwrap();

    let triple = composite::two_plus_three_plus_many_force_energy(
        &env1,
        &env2,
        2,
        &hyps,
        &cutoffs,
        &QuadraticCutoff,
    )
    .unwrap();
    assert_relative_eq!(triple, two + three + many, epsilon = 1e-13);
}

#[test]
fn many_body_descriptor_additive_over_concatenation() {
    let left = [0.5, 0.9];
    let right = [1.3, 1.7, 1.9];
    let all = [0.5, 0.9, 1.3, 1.7, 1.9];
    let r_cut = 2.0;

    for cutoff in [&QuadraticCutoff as &dyn CutoffFunction, &CosineCutoff] {
        let q_all = many_body::q_value(&all, r_cut, cutoff);
        let q_sum =
            many_body::q_value(&left, r_cut, cutoff) + many_body::q_value(&right, r_cut, cutoff);
        assert_relative_eq!(q_all, q_sum, epsilon = 1e-14);
    }
}

/// A neighbor pushed outside the cutoff radius contributes nothing to any
/// kernel family.
#[test]
fn kernels_vanish_smoothly_at_cutoff() {
    let (env1, env2) = sample_envs();
    let mut env2_far = env2.clone();
    env2_far.bonds_2.push(Bond::new(5.0, [1.0, 0.0, 0.0]));
    env2_far.bonds_mb.push(Bond::new(5.0, [1.0, 0.0, 0.0]));
    env2_far.neigh_dists_mb.push(vec![]);

    let hyps = [1.0, 1.0];
    let cutoffs = [2.0];
    let k = two_body::force(&env1, &env2, 1, 1, &hyps, &cutoffs, &QuadraticCutoff).unwrap();
    let k_far = two_body::force(&env1, &env2_far, 1, 1, &hyps, &cutoffs, &QuadraticCutoff).unwrap();
    assert_relative_eq!(k, k_far, epsilon = 1e-14);

    let m = many_body::energy(&env1, &env2, &hyps, &cutoffs, &QuadraticCutoff).unwrap();
    let m_far = many_body::energy(&env1, &env2_far, &hyps, &cutoffs, &QuadraticCutoff).unwrap();
    assert_relative_eq!(m, m_far, epsilon = 1e-14);
}

/// Kernel evaluation shares environments across threads without locking:
/// every call is a pure function of immutable inputs.
#[test]
fn kernels_evaluate_in_parallel() {
    let (env1, env2) = sample_envs();
    let hyps = [1.0, 0.9];
    let cutoffs = [2.0];

    let expected =
        three_body::force(&env1, &env2, 1, 1, &hyps, &cutoffs, &QuadraticCutoff).unwrap();

    let results: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    three_body::force(&env1, &env2, 1, 1, &hyps, &cutoffs, &QuadraticCutoff)
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in results {
        assert_eq!(result, expected);
    }
}
