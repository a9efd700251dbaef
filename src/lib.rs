//! Gaussian-process covariance kernels over local atomic environments
//!
//! This crate evaluates covariance ("kernel") values and their
//! hyperparameter gradients between pairs of local atomic environments for
//! Gaussian-process regression of interatomic forces and energies. Kernel
//! families are provided for two-body, three-body and many-body
//! interactions, plus composites summing them with independent
//! hyperparameter blocks.
//!
//! Every kernel evaluation is a pure function of its inputs: environments
//! are immutable descriptors built by an external collaborator, and callers
//! may parallelize arbitrarily across environment pairs.
//!
//! **Example:**
//!
//! ```
//! use gp_atomic_kernels::{Bond, KernelFamily, LocalEnvironment, QuadraticCutoff};
//!
//! let env1 = LocalEnvironment::two_body_only(vec![Bond::new(0.5, [1.0, 0.0, 0.0])]);
//! let env2 = LocalEnvironment::two_body_only(vec![Bond::new(1.5, [1.0, 0.0, 0.0])]);
//!
//! let family = KernelFamily::resolve("two_body").unwrap();
//! let kern = family
//!     .force(&env1, &env2, 1, 1, &[1.0, 1.0], &[2.0], &QuadraticCutoff)
//!     .unwrap();
//! assert!(kern > 0.0);
//! ```

pub mod core;
pub mod cutoff;
pub mod kernel;

// Re-export main types for convenience
pub use crate::core::error::{KernelError, Result};
pub use crate::core::types::{Bond, LocalEnvironment};
pub use crate::cutoff::{CosineCutoff, CutoffFunction, HardCutoff, QuadraticCutoff};
pub use crate::kernel::registry::{
    EnergyKernelFn, ForceEnergyKernelFn, ForceKernelFn, GradKernelFn, KernelFamily, KernelSet,
};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
