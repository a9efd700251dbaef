//! Core type definitions for local atomic environments
//!
//! A `LocalEnvironment` is the read-only descriptor of the neighborhood of a
//! single central atom. It is built once by an external descriptor builder
//! (neighbor lists, periodic images) and then consumed by many kernel
//! evaluations; nothing in this crate mutates it.

/// A bond from the central atom to one neighbor: the interatomic distance
/// plus the unit vector pointing at the neighbor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    /// Distance from the central atom to the neighbor.
    pub r: f64,
    /// Direction cosines (unit vector) of the bond.
    pub direction: [f64; 3],
}

impl Bond {
    /// Create a new bond.
    pub fn new(r: f64, direction: [f64; 3]) -> Self {
        Self { r, direction }
    }

    /// Direction cosine along force component `d` (1 = x, 2 = y, 3 = z).
    ///
    /// # Panics
    /// Panics if `d` is outside `1..=3`; the public kernel entry points
    /// validate `d` before any bond is touched.
    #[inline]
    pub fn component(&self, d: usize) -> f64 {
        self.direction[d - 1]
    }
}

/// Local environment of a central atom, segmented by body order.
///
/// The three neighbor lists may differ because each body order carries its
/// own cutoff radius. Cross-bond rows use the padded layout of the original
/// descriptor builder: for neighbor `m`, the `n`-th valid cross partner
/// (with `n < triplet_counts[m]`) lives at column `m + n + 1`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocalEnvironment {
    /// Bonds to neighbors within the two-body cutoff.
    pub bonds_2: Vec<Bond>,
    /// Bonds to neighbors within the three-body cutoff.
    pub bonds_3: Vec<Bond>,
    /// Row `m`, column `m + n + 1`: index into `bonds_3` of the `n`-th
    /// neighbor `> m` that is mutually within cutoff of neighbor `m`.
    pub cross_bond_inds: Vec<Vec<usize>>,
    /// Same layout as `cross_bond_inds`, holding the distance between
    /// neighbor `m` and its cross partner.
    pub cross_bond_dists: Vec<Vec<f64>>,
    /// Number of valid cross partners of each three-body neighbor.
    pub triplet_counts: Vec<usize>,
    /// Bonds to neighbors within the many-body cutoff.
    pub bonds_mb: Vec<Bond>,
    /// Row `i`: distances from many-body neighbor `i` to *its own*
    /// neighbors (the second shell), used for its coordination descriptor.
    pub neigh_dists_mb: Vec<Vec<f64>>,
}

impl LocalEnvironment {
    /// Create a full environment, checking that the arrays are mutually
    /// consistent.
    ///
    /// # Panics
    /// Panics if the three-body arrays disagree in length, if a triplet
    /// count exceeds the number of higher-indexed neighbors, or if the
    /// many-body arrays disagree in length. A malformed descriptor is a
    /// builder bug and must fail loudly rather than produce wrong numbers.
    pub fn new(
        bonds_2: Vec<Bond>,
        bonds_3: Vec<Bond>,
        cross_bond_inds: Vec<Vec<usize>>,
        cross_bond_dists: Vec<Vec<f64>>,
        triplet_counts: Vec<usize>,
        bonds_mb: Vec<Bond>,
        neigh_dists_mb: Vec<Vec<f64>>,
    ) -> Self {
        let n3 = bonds_3.len();
        assert_eq!(
            cross_bond_inds.len(),
            n3,
            "Cross-bond index rows must match the three-body neighbor count"
        );
        assert_eq!(
            cross_bond_dists.len(),
            n3,
            "Cross-bond distance rows must match the three-body neighbor count"
        );
        assert_eq!(
            triplet_counts.len(),
            n3,
            "Triplet counts must match the three-body neighbor count"
        );
        for (m, &count) in triplet_counts.iter().enumerate() {
            assert!(
                count <= n3 - m - 1,
                "Neighbor {} claims {} cross partners but only {} higher-indexed \
                 neighbors exist",
                m,
                count,
                n3 - m - 1
            );
            let width = m + count + 1;
            assert!(
                cross_bond_inds[m].len() >= width && cross_bond_dists[m].len() >= width,
                "Cross-bond rows of neighbor {} are too short for {} partners",
                m,
                count
            );
        }
        assert_eq!(
            neigh_dists_mb.len(),
            bonds_mb.len(),
            "Second-shell rows must match the many-body neighbor count"
        );

        Self {
            bonds_2,
            bonds_3,
            cross_bond_inds,
            cross_bond_dists,
            triplet_counts,
            bonds_mb,
            neigh_dists_mb,
        }
    }

    /// Environment with two-body neighbors only; the three- and many-body
    /// sections are empty.
    pub fn two_body_only(bonds_2: Vec<Bond>) -> Self {
        Self {
            bonds_2,
            ..Self::default()
        }
    }

    /// Replace the three-body section.
    pub fn with_three_body(
        mut self,
        bonds_3: Vec<Bond>,
        cross_bond_inds: Vec<Vec<usize>>,
        cross_bond_dists: Vec<Vec<f64>>,
        triplet_counts: Vec<usize>,
    ) -> Self {
        let checked = Self::new(
            std::mem::take(&mut self.bonds_2),
            bonds_3,
            cross_bond_inds,
            cross_bond_dists,
            triplet_counts,
            std::mem::take(&mut self.bonds_mb),
            std::mem::take(&mut self.neigh_dists_mb),
        );
        checked
    }

    /// Replace the many-body section.
    pub fn with_many_body(mut self, bonds_mb: Vec<Bond>, neigh_dists_mb: Vec<Vec<f64>>) -> Self {
        assert_eq!(
            neigh_dists_mb.len(),
            bonds_mb.len(),
            "Second-shell rows must match the many-body neighbor count"
        );
        self.bonds_mb = bonds_mb;
        self.neigh_dists_mb = neigh_dists_mb;
        self
    }

    /// Number of second-shell neighbors of many-body neighbor `i`.
    pub fn num_neighs_mb(&self, i: usize) -> usize {
        self.neigh_dists_mb[i].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_x_bond(r: f64) -> Bond {
        Bond::new(r, [1.0, 0.0, 0.0])
    }

    #[test]
    fn test_bond_component() {
        let bond = Bond::new(1.5, [0.6, 0.0, 0.8]);
        assert_eq!(bond.component(1), 0.6);
        assert_eq!(bond.component(2), 0.0);
        assert_eq!(bond.component(3), 0.8);
    }

    #[test]
    #[should_panic]
    fn test_bond_component_out_of_range() {
        let bond = Bond::new(1.0, [1.0, 0.0, 0.0]);
        bond.component(4);
    }

    #[test]
    fn test_two_body_only() {
        let env = LocalEnvironment::two_body_only(vec![unit_x_bond(1.0), unit_x_bond(2.0)]);
        assert_eq!(env.bonds_2.len(), 2);
        assert!(env.bonds_3.is_empty());
        assert!(env.bonds_mb.is_empty());
    }

    #[test]
    fn test_three_body_layout() {
        // Two neighbors forming one triplet with the central atom.
        let bonds = vec![unit_x_bond(1.0), Bond::new(1.2, [0.0, 1.0, 0.0])];
        let env = LocalEnvironment::two_body_only(bonds.clone()).with_three_body(
            bonds,
            vec![vec![0, 1], vec![0, 0]],
            vec![vec![0.0, 1.6], vec![0.0, 0.0]],
            vec![1, 0],
        );
        assert_eq!(env.triplet_counts, vec![1, 0]);
        assert_eq!(env.cross_bond_inds[0][1], 1);
        assert_eq!(env.cross_bond_dists[0][1], 1.6);
    }

    #[test]
    #[should_panic(expected = "cross partners")]
    fn test_triplet_count_overflow() {
        let bonds = vec![unit_x_bond(1.0)];
        LocalEnvironment::two_body_only(vec![]).with_three_body(
            bonds,
            vec![vec![0]],
            vec![vec![0.0]],
            vec![1],
        );
    }

    #[test]
    #[should_panic(expected = "Second-shell rows")]
    fn test_many_body_row_mismatch() {
        LocalEnvironment::two_body_only(vec![])
            .with_many_body(vec![unit_x_bond(1.0)], vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn test_num_neighs_mb() {
        let env = LocalEnvironment::two_body_only(vec![])
            .with_many_body(vec![unit_x_bond(1.0)], vec![vec![0.8, 1.1, 1.4]]);
        assert_eq!(env.num_neighs_mb(0), 3);
    }
}
