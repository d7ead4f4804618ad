// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_bls12_381::BlsScalar;
use hashbrown::HashMap;
use itertools::izip;
use rayon::prelude::*;

use super::{Gate, WireData, Witness};
use crate::fft::EvaluationDomain;
use crate::util::batch_inversion;

/// Coset shift identifying the right wires: `u = 7`
pub(crate) const K1: BlsScalar = BlsScalar::from_raw([7, 0, 0, 0]);
/// Coset shift identifying the output wires: `u² = 49`
pub(crate) const K2: BlsScalar = BlsScalar::from_raw([49, 0, 0, 0]);

/// Permutation provides the necessary state information and functions
/// to create the permutation polynomial. In the literature, Z(X) is the
/// "accumulator", this is what this codebase calls the permutation
/// polynomial.
#[derive(Debug, Clone, Default)]
pub(crate) struct Permutation {
    /// Maps a witness to the wires that it is associated to
    pub(crate) witness_map: HashMap<Witness, Vec<WireData>>,
}

impl Permutation {
    /// Creates an empty permutation
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Build the wire map of the given rows.
    pub(crate) fn from_rows(rows: &[Gate]) -> Self {
        let mut perm = Self::new();

        rows.iter().enumerate().for_each(|(row, gate)| {
            perm.add_witnesses_to_map(gate.a, gate.b, gate.c, row)
        });

        perm
    }

    /// Maps a set of witnesses (a,b,c) to a set of Wires (left, right, out)
    /// with the corresponding row index
    pub(crate) fn add_witnesses_to_map(
        &mut self,
        a: Witness,
        b: Witness,
        c: Witness,
        row: usize,
    ) {
        self.add_witness_to_map(a, WireData::Left(row));
        self.add_witness_to_map(b, WireData::Right(row));
        self.add_witness_to_map(c, WireData::Output(row));
    }

    fn add_witness_to_map(&mut self, w: Witness, wire_data: WireData) {
        self.witness_map.entry(w).or_default().push(wire_data);
    }

    /// Performs shift by one permutation and computes sigma_1, sigma_2 and
    /// sigma_3 permutations from the witness maps
    pub(crate) fn compute_sigma_permutations(
        &self,
        n: usize,
    ) -> [Vec<WireData>; 3] {
        let sigma_1: Vec<_> = (0..n).map(WireData::Left).collect();
        let sigma_2: Vec<_> = (0..n).map(WireData::Right).collect();
        let sigma_3: Vec<_> = (0..n).map(WireData::Output).collect();

        let mut sigmas = [sigma_1, sigma_2, sigma_3];

        for wire_data in self.witness_map.values() {
            for (wire_index, current_wire) in wire_data.iter().enumerate() {
                // the last wire loops back to the first one
                let next_index = (wire_index + 1) % wire_data.len();
                let next_wire = wire_data[next_index];

                match current_wire {
                    WireData::Left(index) => sigmas[0][*index] = next_wire,
                    WireData::Right(index) => sigmas[1][*index] = next_wire,
                    WireData::Output(index) => sigmas[2][*index] = next_wire,
                };
            }
        }

        sigmas
    }

    /// Evaluations of the sigma polynomials over the domain, labelling the
    /// wires with `ω^i`, `k1·ω^i` and `k2·ω^i`
    pub(crate) fn compute_sigma_evaluations(
        &self,
        domain: &EvaluationDomain,
    ) -> [Vec<BlsScalar>; 3] {
        let roots = domain.elements();
        let [s1, s2, s3] = self.compute_sigma_permutations(domain.size());

        let label = |wires: Vec<WireData>| -> Vec<BlsScalar> {
            wires
                .into_iter()
                .map(|wire| match wire {
                    WireData::Left(i) => roots[i],
                    WireData::Right(i) => K1 * roots[i],
                    WireData::Output(i) => K2 * roots[i],
                })
                .collect()
        };

        [label(s1), label(s2), label(s3)]
    }
}

/// Lagrange evaluations of the grand product accumulator
///
/// `z_0 = 1` and `z_{i+1} = z_i · Π (w_j + β·id_j + γ) / (w_j + β·σ_j + γ)`
pub(crate) fn compute_permutation_evaluations(
    domain: &EvaluationDomain,
    wires: [&[BlsScalar]; 3],
    sigmas: [&[BlsScalar]; 3],
    beta: &BlsScalar,
    gamma: &BlsScalar,
) -> Vec<BlsScalar> {
    let n = domain.size();
    let roots = domain.elements();

    let numerator: Vec<BlsScalar> = (0..n)
        .into_par_iter()
        .map(|i| {
            let x = roots[i];
            (wires[0][i] + beta * x + gamma)
                * (wires[1][i] + beta * K1 * x + gamma)
                * (wires[2][i] + beta * K2 * x + gamma)
        })
        .collect();

    let mut denominator: Vec<BlsScalar> = (0..n)
        .into_par_iter()
        .map(|i| {
            (wires[0][i] + beta * sigmas[0][i] + gamma)
                * (wires[1][i] + beta * sigmas[1][i] + gamma)
                * (wires[2][i] + beta * sigmas[2][i] + gamma)
        })
        .collect();

    batch_inversion(&mut denominator);

    let mut z = Vec::with_capacity(n);
    let mut acc = BlsScalar::one();
    for (num, den_inv) in izip!(numerator.iter(), denominator.iter()) {
        z.push(acc);
        acc *= num * den_inv;
    }

    z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unused_witness_keeps_identity() {
        let perm = Permutation::new();
        let sigmas = perm.compute_sigma_permutations(4);

        assert_eq!(sigmas[0], (0..4).map(WireData::Left).collect::<Vec<_>>());
        assert_eq!(sigmas[2][3], WireData::Output(3));
    }

    #[test]
    fn shared_witness_forms_a_cycle() {
        let x = Witness::new(2);
        let y = Witness::new(3);

        let mut perm = Permutation::new();
        perm.add_witness_to_map(x, WireData::Left(0));
        perm.add_witness_to_map(x, WireData::Right(1));
        perm.add_witness_to_map(x, WireData::Output(2));
        perm.add_witness_to_map(y, WireData::Left(3));

        let sigmas = perm.compute_sigma_permutations(4);

        assert_eq!(sigmas[0][0], WireData::Right(1));
        assert_eq!(sigmas[1][1], WireData::Output(2));
        assert_eq!(sigmas[2][2], WireData::Left(0));
        assert_eq!(sigmas[0][3], WireData::Left(3));
    }

    #[test]
    fn copy_satisfying_wires_close_the_grand_product() {
        let domain = EvaluationDomain::new(4).unwrap();

        let x = Witness::new(2);
        let y = Witness::new(3);
        let rows = [
            Gate {
                a: x,
                b: y,
                c: x,
                ..Gate::padding()
            },
            Gate {
                a: y,
                b: x,
                c: y,
                ..Gate::padding()
            },
            Gate::padding(),
            Gate::padding(),
        ];

        let perm = Permutation::from_rows(&rows);
        let sigmas = perm.compute_sigma_evaluations(&domain);

        let values = |w: Witness| match w {
            w if w == x => BlsScalar::from(5u64),
            w if w == y => BlsScalar::from(9u64),
            _ => BlsScalar::zero(),
        };
        let l: Vec<_> = rows.iter().map(|g| values(g.a)).collect();
        let r: Vec<_> = rows.iter().map(|g| values(g.b)).collect();
        let o: Vec<_> = rows.iter().map(|g| values(g.c)).collect();

        let beta = BlsScalar::from(11u64);
        let gamma = BlsScalar::from(13u64);

        let z = compute_permutation_evaluations(
            &domain,
            [&l, &r, &o],
            [&sigmas[0], &sigmas[1], &sigmas[2]],
            &beta,
            &gamma,
        );
        assert_eq!(z[0], BlsScalar::one());

        // the product over the whole domain wraps around to one
        let roots = domain.elements();
        let last = 3;
        let x3 = roots[last];
        let wrap = z[last]
            * (l[last] + beta * x3 + gamma)
            * (r[last] + beta * K1 * x3 + gamma)
            * (o[last] + beta * K2 * x3 + gamma)
            * ((l[last] + beta * sigmas[0][last] + gamma)
                * (r[last] + beta * sigmas[1][last] + gamma)
                * (o[last] + beta * sigmas[2][last] + gamma))
                .invert()
                .unwrap();
        assert_eq!(wrap, BlsScalar::one());
    }
}
