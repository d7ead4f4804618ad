// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_bls12_381::multiscalar_mul::msm_variable_base;
use dusk_bls12_381::{BlsScalar, G1Affine};
use rayon::prelude::*;

use super::Commitment;
use crate::error::Error;
use crate::fft::Polynomial;
use crate::hash::Hasher;
use crate::transcript::{Transcript, GAMMA};
use crate::util::powers_of;

/// Proof that a polynomial `p` was correctly evaluated at a point `z`
/// producing the evaluated point p(z).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OpeningProof {
    /// Commitment to the witness polynomial `(p(X) - p(z)) / (X - z)`.
    pub witness: Commitment,
    /// This is the result of evaluating a polynomial at the point `z`.
    pub value: BlsScalar,
}

/// Proof that multiple polynomials were correctly evaluated at a point `z`,
/// each producing their respective evaluated points p_i(z).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOpeningProof {
    /// Commitment to the witness of the folded polynomial.
    pub witness: Commitment,
    /// Claimed evaluations, in the order of the opened polynomials.
    pub values: Vec<BlsScalar>,
}

impl BatchOpeningProof {
    /// Fold the batch into a single opening of `Σ γ^i · digests_i` at
    /// `point`, deriving `γ` exactly as the prover did.
    pub fn fold(
        &self,
        hasher: &Hasher,
        digests: &[Commitment],
        point: &BlsScalar,
        data: &[BlsScalar],
    ) -> Result<(Commitment, OpeningProof), Error> {
        if digests.is_empty() || digests.len() != self.values.len() {
            return Err(Error::MismatchedDigests {
                digests: digests.len(),
                polynomials: self.values.len(),
            });
        }

        let gamma =
            folding_challenge(hasher, point, digests, &self.values, data)?;
        let powers = powers_of(&gamma, digests.len() - 1);

        let value = self
            .values
            .iter()
            .zip(powers.iter())
            .fold(BlsScalar::zero(), |acc, (v, g)| acc + v * g);

        let points: Vec<G1Affine> = digests.iter().map(|d| d.0).collect();
        let digest = msm_variable_base(&points, &powers);

        let proof = OpeningProof {
            witness: self.witness,
            value,
        };

        Ok((digest.into(), proof))
    }
}

/// `γ = Sum(CID_GAMMA, point, HashG1(digests)..., values..., data...)`
pub(crate) fn folding_challenge(
    hasher: &Hasher,
    point: &BlsScalar,
    digests: &[Commitment],
    values: &[BlsScalar],
    data: &[BlsScalar],
) -> Result<BlsScalar, Error> {
    let hashed: Vec<BlsScalar> =
        digests.par_iter().map(|d| hasher.hash_g1(&d.0)).collect();

    let mut transcript = Transcript::folding(hasher.clone());

    transcript.bind(GAMMA, &[*point])?;
    transcript.bind(GAMMA, &hashed)?;
    transcript.bind(GAMMA, values)?;
    transcript.bind(GAMMA, data)?;

    transcript.compute_challenge(GAMMA)
}

/// `Σ γ^i · p_i`
pub(crate) fn fold_polynomials(
    polynomials: &[&Polynomial],
    gamma: &BlsScalar,
) -> Polynomial {
    let powers = powers_of(gamma, polynomials.len().saturating_sub(1));

    Polynomial::linear_combination(
        powers.into_iter().zip(polynomials.iter().copied()),
    )
}
