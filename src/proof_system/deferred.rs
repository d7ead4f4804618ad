// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Group work left over once every scalar of a verification is known.

use dusk_bls12_381::{BlsScalar, G1Affine};

use crate::commitment_scheme::{msm, Commitment, OpeningKey, OpeningProof};
use crate::error::Error;
use crate::hash::Hasher;

/// The multi-scalar multiplications and the pairing of a PLONK
/// verification.
///
/// The native verifier builds one from a proof and discharges it right
/// away. The recursive verifier constrains every scalar in-circuit and
/// exports the check, bound to the circuit by [`DeferredCheck::digest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredCheck {
    /// `[BSB, QL, QR, QM, QO, QK, S3, Z, H0, H1, H2]`
    pub(crate) lin_points: Vec<Commitment>,
    /// Linearization scalars
    pub(crate) lin_scalars: Vec<BlsScalar>,
    /// Claimed linearization commitment
    pub(crate) lin_digest: Commitment,
    /// `[L, R, O, S1, S2, QC]`, folded after the linearization commitment
    pub(crate) fold_points: Vec<Commitment>,
    /// Powers of the folding challenge
    pub(crate) fold_scalars: Vec<BlsScalar>,
    /// Folded evaluation at `ζ`
    pub(crate) folded_eval: BlsScalar,
    /// Permutation accumulator commitment
    pub(crate) z_comm: Commitment,
    /// Opening witness at `ζ`
    pub(crate) w_z_chall_comm: Commitment,
    /// Opening witness of the accumulator at `ζ·ω`
    pub(crate) w_z_chall_w_comm: Commitment,
    /// `z(ζ·ω)`
    pub(crate) z_shifted_eval: BlsScalar,
    /// `ζ`
    pub(crate) zeta: BlsScalar,
    /// `ζ·ω`
    pub(crate) shifted_zeta: BlsScalar,
}

impl DeferredCheck {
    /// Run the group operations and the pairing check.
    pub fn discharge(&self, opening_key: &OpeningKey) -> Result<(), Error> {
        if self.lin_points.len() != self.lin_scalars.len() {
            return Err(Error::MismatchedLengths(
                self.lin_points.len(),
                self.lin_scalars.len(),
            ));
        }
        if self.fold_points.len() + 1 != self.fold_scalars.len() {
            return Err(Error::MismatchedLengths(
                self.fold_points.len() + 1,
                self.fold_scalars.len(),
            ));
        }

        let lin_points: Vec<G1Affine> =
            self.lin_points.iter().map(|c| c.0).collect();
        let lin = G1Affine::from(msm(&lin_points, &self.lin_scalars));
        if lin != self.lin_digest.0 {
            return Err(Error::ProofVerificationError);
        }

        let fold_points: Vec<G1Affine> = core::iter::once(lin)
            .chain(self.fold_points.iter().map(|c| c.0))
            .collect();
        let folded = Commitment::from(msm(&fold_points, &self.fold_scalars));

        opening_key.batch_check(
            &[folded, self.z_comm],
            &[
                OpeningProof {
                    witness: self.w_z_chall_comm,
                    value: self.folded_eval,
                },
                OpeningProof {
                    witness: self.w_z_chall_w_comm,
                    value: self.z_shifted_eval,
                },
            ],
            &[self.zeta, self.shifted_zeta],
        )
    }

    /// Hash binding every point and scalar of the check
    pub fn digest(&self, hasher: &Hasher) -> BlsScalar {
        let hashed = |points: &[Commitment]| -> Vec<BlsScalar> {
            points.iter().map(|c| hasher.hash_g1(&c.0)).collect()
        };

        let lin_points = hashed(&self.lin_points);
        let fold_points = hashed(&self.fold_points);
        let tail = [
            self.folded_eval,
            hasher.hash_g1(&self.lin_digest.0),
            hasher.hash_g1(&self.z_comm.0),
            hasher.hash_g1(&self.w_z_chall_comm.0),
            hasher.hash_g1(&self.w_z_chall_w_comm.0),
            self.z_shifted_eval,
            self.zeta,
            self.shifted_zeta,
        ];

        hasher.sum(
            lin_points
                .iter()
                .chain(self.lin_scalars.iter())
                .chain(fold_points.iter())
                .chain(self.fold_scalars.iter())
                .chain(tail.iter()),
        )
    }
}
