//! Kernel family registry
//!
//! Maps a kernel-family name to its four callables (force/force, gradient,
//! energy/energy, force/energy). The families form a closed enumeration
//! dispatched by `match`, so every family has a gradient by construction;
//! the name-based lookup exists only at the configuration boundary.

use std::fmt;
use std::str::FromStr;

use crate::core::{KernelError, LocalEnvironment, Result};
use crate::cutoff::CutoffFunction;
use crate::kernel::{composite, many_body, three_body, two_body};

/// Force/force kernel between components `d1` of env1 and `d2` of env2.
pub type ForceKernelFn = fn(
    &LocalEnvironment,
    &LocalEnvironment,
    usize,
    usize,
    &[f64],
    &[f64],
    &dyn CutoffFunction,
) -> Result<f64>;

/// Force/force kernel with its hyperparameter gradient.
pub type GradKernelFn = fn(
    &LocalEnvironment,
    &LocalEnvironment,
    usize,
    usize,
    &[f64],
    &[f64],
    &dyn CutoffFunction,
) -> Result<(f64, Vec<f64>)>;

/// Energy/energy kernel.
pub type EnergyKernelFn =
    fn(&LocalEnvironment, &LocalEnvironment, &[f64], &[f64], &dyn CutoffFunction) -> Result<f64>;

/// Force/energy kernel; the derivative acts on env1 only.
pub type ForceEnergyKernelFn = fn(
    &LocalEnvironment,
    &LocalEnvironment,
    usize,
    &[f64],
    &[f64],
    &dyn CutoffFunction,
) -> Result<f64>;

/// The four function handles of one kernel family, consumed by the
/// external GP-algebra layer.
#[derive(Clone, Copy)]
pub struct KernelSet {
    pub force: ForceKernelFn,
    pub grad: GradKernelFn,
    pub energy: EnergyKernelFn,
    pub force_energy: ForceEnergyKernelFn,
}

/// Closed enumeration of the supported kernel families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelFamily {
    TwoBody,
    ThreeBody,
    ManyBody,
    TwoPlusThree,
    TwoPlusThreePlusMany,
}

const VALID_NAMES: &str = "two_body (2), three_body (3), many_body (many), \
     two_plus_three_body (2+3), two_plus_three_plus_many_body (2+3+many)";

impl KernelFamily {
    pub const ALL: [KernelFamily; 5] = [
        KernelFamily::TwoBody,
        KernelFamily::ThreeBody,
        KernelFamily::ManyBody,
        KernelFamily::TwoPlusThree,
        KernelFamily::TwoPlusThreePlusMany,
    ];

    /// Canonical name of the family.
    pub fn as_str(&self) -> &'static str {
        match self {
            KernelFamily::TwoBody => "two_body",
            KernelFamily::ThreeBody => "three_body",
            KernelFamily::ManyBody => "many_body",
            KernelFamily::TwoPlusThree => "two_plus_three_body",
            KernelFamily::TwoPlusThreePlusMany => "two_plus_three_plus_many_body",
        }
    }

    /// Number of active body orders: each owns two hyperparameters and one
    /// cutoff radius.
    pub fn body_orders(&self) -> usize {
        match self {
            KernelFamily::TwoBody | KernelFamily::ThreeBody | KernelFamily::ManyBody => 1,
            KernelFamily::TwoPlusThree => 2,
            KernelFamily::TwoPlusThreePlusMany => 3,
        }
    }

    /// Look up a family by canonical name or short alias.
    pub fn resolve(name: &str) -> Result<Self> {
        let family = match name {
            "two_body" | "2" => KernelFamily::TwoBody,
            "three_body" | "3" => KernelFamily::ThreeBody,
            "many_body" | "many" => KernelFamily::ManyBody,
            "two_plus_three_body" | "two_plus_three" | "2+3" => KernelFamily::TwoPlusThree,
            "two_plus_three_plus_many_body" | "2+3+many" => KernelFamily::TwoPlusThreePlusMany,
            _ => {
                return Err(KernelError::UnknownKernel {
                    name: name.to_string(),
                    valid: VALID_NAMES,
                })
            }
        };
        log::debug!("resolved kernel name '{}' to {} family", name, family);
        Ok(family)
    }

    /// The family's four function handles.
    pub fn functions(&self) -> KernelSet {
        match self {
            KernelFamily::TwoBody => KernelSet {
                force: two_body::force,
                grad: two_body::grad,
                energy: two_body::energy,
                force_energy: two_body::force_energy,
            },
            KernelFamily::ThreeBody => KernelSet {
                force: three_body::force,
                grad: three_body::grad,
                energy: three_body::energy,
                force_energy: three_body::force_energy,
            },
            KernelFamily::ManyBody => KernelSet {
                force: many_body::force,
                grad: many_body::grad,
                energy: many_body::energy,
                force_energy: many_body::force_energy,
            },
            KernelFamily::TwoPlusThree => KernelSet {
                force: composite::two_plus_three_force,
                grad: composite::two_plus_three_grad,
                energy: composite::two_plus_three_energy,
                force_energy: composite::two_plus_three_force_energy,
            },
            KernelFamily::TwoPlusThreePlusMany => KernelSet {
                force: composite::two_plus_three_plus_many_force,
                grad: composite::two_plus_three_plus_many_grad,
                energy: composite::two_plus_three_plus_many_energy,
                force_energy: composite::two_plus_three_plus_many_force_energy,
            },
        }
    }

    /// Force/force kernel of this family.
    pub fn force(
        &self,
        env1: &LocalEnvironment,
        env2: &LocalEnvironment,
        d1: usize,
        d2: usize,
        hyps: &[f64],
        cutoffs: &[f64],
        cutoff: &dyn CutoffFunction,
    ) -> Result<f64> {
        (self.functions().force)(env1, env2, d1, d2, hyps, cutoffs, cutoff)
    }

    /// Force/force kernel and its hyperparameter gradient, two entries per
    /// active body order in slice order.
    pub fn grad(
        &self,
        env1: &LocalEnvironment,
        env2: &LocalEnvironment,
        d1: usize,
        d2: usize,
        hyps: &[f64],
        cutoffs: &[f64],
        cutoff: &dyn CutoffFunction,
    ) -> Result<(f64, Vec<f64>)> {
        (self.functions().grad)(env1, env2, d1, d2, hyps, cutoffs, cutoff)
    }

    /// Energy/energy kernel of this family.
    pub fn energy(
        &self,
        env1: &LocalEnvironment,
        env2: &LocalEnvironment,
        hyps: &[f64],
        cutoffs: &[f64],
        cutoff: &dyn CutoffFunction,
    ) -> Result<f64> {
        (self.functions().energy)(env1, env2, hyps, cutoffs, cutoff)
    }

    /// Force/energy kernel of this family.
    pub fn force_energy(
        &self,
        env1: &LocalEnvironment,
        env2: &LocalEnvironment,
        d1: usize,
        hyps: &[f64],
        cutoffs: &[f64],
        cutoff: &dyn CutoffFunction,
    ) -> Result<f64> {
        (self.functions().force_energy)(env1, env2, d1, hyps, cutoffs, cutoff)
    }
}

impl fmt::Display for KernelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KernelFamily {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}
