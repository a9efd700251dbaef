//! Shared algebraic primitives of the exponentiated-quadratic kernel
//!
//! The two-body kernel and every permutation term of the three-body kernel
//! reduce to the same closed-form expressions on four precomputed scalars:
//!
//! - `a`: contraction of the direction cosines of matched bonds,
//! - `b`: distance differences contracted with the first environment's
//!   cosines,
//! - `c`: distance differences contracted with the second environment's
//!   cosines,
//! - `d`: sum of squared distance differences.
//!
//! These are free functions on scalars rather than methods: there is no
//! natural type hierarchy here, only shared algebra. Hyperparameter powers
//! are precomputed once per kernel call so the inner loops stay at O(1)
//! multiplications per pair.

/// Inverse length-scale powers and squared signal variance for value-only
/// kernel evaluations, computed once per call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KernelConstants {
    /// sig^2
    pub sig2: f64,
    /// 1 / (2 ls^2)
    pub ls1: f64,
    /// 1 / ls^2
    pub ls2: f64,
    /// 1 / ls^4
    pub ls3: f64,
}

impl KernelConstants {
    pub fn new(sig: f64, ls: f64) -> Self {
        let ls2 = 1.0 / (ls * ls);
        Self {
            sig2: sig * sig,
            ls1: 0.5 * ls2,
            ls2,
            ls3: ls2 * ls2,
        }
    }
}

/// Constants for gradient evaluations: the value-kernel powers plus the
/// higher inverse powers appearing in the length-scale derivative.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GradConstants {
    /// sig^2
    pub sig2: f64,
    /// 2 sig
    pub sig3: f64,
    /// 1 / (2 ls^2)
    pub ls1: f64,
    /// 1 / ls^2
    pub ls2: f64,
    /// 1 / ls^4
    pub ls3: f64,
    /// 1 / ls^3
    pub ls4: f64,
    /// 1 / ls^5
    pub ls5: f64,
    /// 1 / ls^7
    pub ls6: f64,
}

impl GradConstants {
    pub fn new(sig: f64, ls: f64) -> Self {
        let ls2 = 1.0 / (ls * ls);
        let ls3 = ls2 * ls2;
        let ls4 = ls2 / ls;
        Self {
            sig2: sig * sig,
            sig3: 2.0 * sig,
            ls1: 0.5 * ls2,
            ls2,
            ls3,
            ls4,
            ls5: ls2 * ls4,
            ls6: ls3 * ls4,
        }
    }
}

/// Force/force term of the exponentiated-quadratic kernel between two
/// cutoff-windowed bonds (or matched triplet permutations).
///
/// `fi`/`fj` are the cutoff weights of the two sides, `fdi`/`fdj` their
/// derivatives along the requested force components.
#[inline]
pub(crate) fn force_force(
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    fi: f64,
    fj: f64,
    fdi: f64,
    fdj: f64,
    k: &KernelConstants,
) -> f64 {
    let e = (-d * k.ls1).exp();
    let f = e * b * k.ls2;
    let g = -e * c * k.ls2;
    let h = a * e * k.ls2 - b * c * e * k.ls3;
    k.sig2 * (e * fdi * fdj + f * fi * fdj + g * fdi * fj + h * fi * fj)
}

/// Force/force term together with its derivatives with respect to the
/// signal variance and the length scale.
///
/// The kernel is quadratic in sig, so the sig derivative is exactly
/// `2 value / sig`; the ls derivative is the closed-form derivative of
/// every factor carrying an inverse length-scale power.
#[inline]
pub(crate) fn force_force_grad(
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    fi: f64,
    fj: f64,
    fdi: f64,
    fdj: f64,
    k: &GradConstants,
) -> (f64, f64, f64) {
    let e = (-d * k.ls1).exp();
    let f = e * b * k.ls2;
    let g = -e * c * k.ls2;
    let h = a * e * k.ls2 - b * c * e * k.ls3;
    let base = e * fdi * fdj + f * fi * fdj + g * fdi * fj + h * fi * fj;

    // d/dls of exp(-d / (2 ls^2)), exp * ls^-2 and exp * ls^-4
    let de = e * d * k.ls4;
    let de_ls2 = e * k.ls4 * (d * k.ls2 - 2.0);
    let de_ls3 = e * (d * k.ls6 - 4.0 * k.ls5);

    let ls_derv = k.sig2
        * (de * fdi * fdj + b * de_ls2 * fi * fdj - c * de_ls2 * fdi * fj
            + (a * de_ls2 - b * c * de_ls3) * fi * fj);

    (k.sig2 * base, k.sig3 * base, ls_derv)
}

/// Force/energy term: the derivative of the energy kernel acts on the first
/// environment only, with the force sign convention.
#[inline]
pub(crate) fn force_energy(b: f64, d: f64, fi: f64, fj: f64, fdi: f64, k: &KernelConstants) -> f64 {
    let e = (-d * k.ls1).exp();
    -k.sig2 * (e * fdi * fj + e * b * k.ls2 * fi * fj)
}

/// Energy/energy term: the plain exponentiated quadratic, windowed on both
/// sides.
#[inline]
pub(crate) fn energy_energy(d: f64, fi: f64, fj: f64, k: &KernelConstants) -> f64 {
    k.sig2 * fi * fj * (-d * k.ls1).exp()
}
