// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! A Proof stores the commitments to all of the elements that
//! are needed to univocally identify a prove of some statement.
//!
//! This module contains the implementation of the `Proof` structure and
//! its methods.

use dusk_bls12_381::{BlsScalar, G1Affine};
use dusk_bytes::{DeserializableSlice, Serializable, Write};

use super::deferred::DeferredCheck;
use super::linearization::{self, Challenges, ProofEvaluations};
use super::VerifierKey;
use crate::commitment_scheme::{
    folding_challenge, msm, Commitment, OpeningKey,
};
use crate::error::Error;
use crate::hash::Hasher;
use crate::transcript::{Transcript, ALPHA, BETA, GAMMA, PREFIX_BSB, ZETA};
use crate::util::powers_of;

/// A Proof is a composition of `Commitments` to the witness, permutation,
/// quotient, committed values and opening polynomials as well as the
/// `ProofEvaluations`.
///
/// It's main goal is to have a `verify()` method attached which contains the
/// logic of the operations that the `Verifier` will need to do in order to
/// formally verify the `Proof`.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct Proof {
    /// Commitment to the witness polynomial for the left wires.
    pub a_comm: Commitment,
    /// Commitment to the witness polynomial for the right wires.
    pub b_comm: Commitment,
    /// Commitment to the witness polynomial for the output wires.
    pub c_comm: Commitment,

    /// Commitment to the first shard of the quotient polynomial.
    pub h_0_comm: Commitment,
    /// Commitment to the second shard of the quotient polynomial.
    pub h_1_comm: Commitment,
    /// Commitment to the third shard of the quotient polynomial.
    pub h_2_comm: Commitment,

    /// Commitment to the permutation polynomial.
    pub z_comm: Commitment,
    /// Commitment to the committed values polynomial.
    pub bsb_comm: Commitment,

    /// Commitment to the opening polynomial.
    pub w_z_chall_comm: Commitment,
    /// Commitment to the shifted opening polynomial.
    pub w_z_chall_w_comm: Commitment,

    /// Subset of all of the evaluations added to the proof.
    pub(crate) evaluations: ProofEvaluations,
}

impl Serializable<{ 10 * Commitment::SIZE + 8 * BlsScalar::SIZE }> for Proof {
    type Error = dusk_bytes::Error;

    #[allow(unused_must_use)]
    fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        let mut writer = &mut buf[..];

        for commitment in self.commitments() {
            writer.write(&commitment.to_bytes());
        }
        for eval in self.evaluations.to_array() {
            writer.write(&eval.to_bytes());
        }

        buf
    }

    fn from_bytes(buf: &[u8; Self::SIZE]) -> Result<Self, Self::Error> {
        let mut buffer = &buf[..];

        let a_comm = Commitment::from_reader(&mut buffer)?;
        let b_comm = Commitment::from_reader(&mut buffer)?;
        let c_comm = Commitment::from_reader(&mut buffer)?;
        let h_0_comm = Commitment::from_reader(&mut buffer)?;
        let h_1_comm = Commitment::from_reader(&mut buffer)?;
        let h_2_comm = Commitment::from_reader(&mut buffer)?;
        let z_comm = Commitment::from_reader(&mut buffer)?;
        let bsb_comm = Commitment::from_reader(&mut buffer)?;
        let w_z_chall_comm = Commitment::from_reader(&mut buffer)?;
        let w_z_chall_w_comm = Commitment::from_reader(&mut buffer)?;

        let mut evals = [BlsScalar::zero(); 8];
        for eval in evals.iter_mut() {
            *eval = BlsScalar::from_reader(&mut buffer)?;
        }

        Ok(Proof {
            a_comm,
            b_comm,
            c_comm,
            h_0_comm,
            h_1_comm,
            h_2_comm,
            z_comm,
            bsb_comm,
            w_z_chall_comm,
            w_z_chall_w_comm,
            evaluations: ProofEvaluations::from_array(evals),
        })
    }
}

impl Proof {
    /// `[L, R, O, H0, H1, H2, Z, BSB, W_ζ, W_ζω]`
    pub(crate) fn commitments(&self) -> [Commitment; 10] {
        [
            self.a_comm,
            self.b_comm,
            self.c_comm,
            self.h_0_comm,
            self.h_1_comm,
            self.h_2_comm,
            self.z_comm,
            self.bsb_comm,
            self.w_z_chall_comm,
            self.w_z_chall_w_comm,
        ]
    }

    /// Performs the verification of a [`Proof`].
    pub(crate) fn verify(
        &self,
        verifier_key: &VerifierKey,
        opening_key: &OpeningKey,
        hasher: &Hasher,
        public_inputs: &[BlsScalar],
    ) -> Result<(), Error> {
        self.deferred_check(verifier_key, hasher, public_inputs)?
            .discharge(opening_key)
    }

    /// Check every scalar relation of the proof, leaving the group
    /// operations and the pairing to the returned [`DeferredCheck`].
    pub(crate) fn deferred_check(
        &self,
        verifier_key: &VerifierKey,
        hasher: &Hasher,
        public_inputs: &[BlsScalar],
    ) -> Result<DeferredCheck, Error> {
        if public_inputs.len() != verifier_key.public_inputs {
            return Err(Error::InconsistentPublicInputsLen {
                expected: verifier_key.public_inputs,
                provided: public_inputs.len(),
            });
        }

        let in_subgroup = self.commitments().iter().all(|c| {
            bool::from(c.0.is_on_curve()) && bool::from(c.0.is_torsion_free())
        });
        if !in_subgroup {
            return Err(Error::PointNotInSubgroup);
        }

        let domain = verifier_key.domain()?;
        let challenges = self.challenges(verifier_key, hasher, public_inputs)?;
        let zeta = challenges.zeta;

        let l1 = domain.evaluate_lagrange(0, &zeta);

        // public inputs, then the commitment value row
        let row = verifier_key.public_inputs + verifier_key.commitment_index;
        let bsb_value =
            hasher.compress(&PREFIX_BSB, &hasher.hash_g1(&self.bsb_comm.0));
        let pi = public_inputs
            .iter()
            .enumerate()
            .fold(BlsScalar::zero(), |acc, (i, p)| {
                acc + domain.evaluate_lagrange(i, &zeta) * p
            })
            + domain.evaluate_lagrange(row, &zeta) * bsb_value;

        let evals = &self.evaluations;
        let expected =
            linearization::expected_eval(&challenges, evals, &l1, &pi);
        if expected != evals.lin_eval {
            return Err(Error::ProofVerificationError);
        }

        let lin_scalars =
            linearization::scalars(domain.size(), &challenges, evals, &l1);
        let lin_points = self.linearization_points(verifier_key);
        let lin_digest = linearization_digest(&lin_points, &lin_scalars);

        let fold_points = self.fold_points(verifier_key);
        let values = self.fold_values();

        let mut digests = vec![lin_digest];
        digests.extend(fold_points);

        let gamma = folding_challenge(
            hasher,
            &zeta,
            &digests,
            &values,
            &[evals.z_shifted_eval],
        )?;
        let fold_scalars = powers_of(&gamma, fold_points.len());
        let folded_eval = values
            .iter()
            .zip(fold_scalars.iter())
            .fold(BlsScalar::zero(), |acc, (v, g)| acc + v * g);

        Ok(DeferredCheck {
            lin_points: lin_points.to_vec(),
            lin_scalars: lin_scalars.to_vec(),
            lin_digest,
            fold_points: fold_points.to_vec(),
            fold_scalars,
            folded_eval,
            z_comm: self.z_comm,
            w_z_chall_comm: self.w_z_chall_comm,
            w_z_chall_w_comm: self.w_z_chall_w_comm,
            z_shifted_eval: evals.z_shifted_eval,
            zeta,
            shifted_zeta: zeta * domain.group_gen(),
        })
    }

    /// `[BSB, QL, QR, QM, QO, QK, S3, Z, H0, H1, H2]`
    pub(crate) fn linearization_points(
        &self,
        verifier_key: &VerifierKey,
    ) -> [Commitment; 11] {
        [
            self.bsb_comm,
            verifier_key.q_l,
            verifier_key.q_r,
            verifier_key.q_m,
            verifier_key.q_o,
            verifier_key.q_k,
            verifier_key.s_sigma_3,
            self.z_comm,
            self.h_0_comm,
            self.h_1_comm,
            self.h_2_comm,
        ]
    }

    /// `[L, R, O, S1, S2, QC]`
    pub(crate) fn fold_points(
        &self,
        verifier_key: &VerifierKey,
    ) -> [Commitment; 6] {
        [
            self.a_comm,
            self.b_comm,
            self.c_comm,
            verifier_key.s_sigma_1,
            verifier_key.s_sigma_2,
            verifier_key.q_cp,
        ]
    }

    /// Claimed openings at `ζ`, in folding order
    pub(crate) fn fold_values(&self) -> [BlsScalar; 7] {
        let evals = &self.evaluations;

        [
            evals.lin_eval,
            evals.a_eval,
            evals.b_eval,
            evals.c_eval,
            evals.s_sigma_1_eval,
            evals.s_sigma_2_eval,
            evals.q_cp_eval,
        ]
    }

    /// Replay the transcript of the proof.
    pub(crate) fn challenges(
        &self,
        verifier_key: &VerifierKey,
        hasher: &Hasher,
        public_inputs: &[BlsScalar],
    ) -> Result<Challenges, Error> {
        let hash = |c: &Commitment| hasher.hash_g1(&c.0);
        let mut transcript = Transcript::plonk(hasher.clone());

        transcript.bind(GAMMA, &verifier_key.hashed_commitments(hasher))?;
        transcript.bind(
            GAMMA,
            &[hash(&self.a_comm), hash(&self.b_comm), hash(&self.c_comm)],
        )?;
        transcript.bind(GAMMA, public_inputs)?;
        let gamma = transcript.compute_challenge(GAMMA)?;
        let beta = transcript.compute_challenge(BETA)?;

        transcript
            .bind(ALPHA, &[hash(&self.bsb_comm), hash(&self.z_comm)])?;
        let alpha = transcript.compute_challenge(ALPHA)?;

        transcript.bind(
            ZETA,
            &[
                hash(&self.h_0_comm),
                hash(&self.h_1_comm),
                hash(&self.h_2_comm),
            ],
        )?;
        let zeta = transcript.compute_challenge(ZETA)?;

        Ok(Challenges {
            gamma,
            beta,
            alpha,
            zeta,
        })
    }
}

/// Commitment to the linearization polynomial
pub(crate) fn linearization_digest(
    points: &[Commitment],
    scalars: &[BlsScalar],
) -> Commitment {
    let points: Vec<G1Affine> = points.iter().map(|c| c.0).collect();

    Commitment::from(msm(&points, scalars))
}

#[cfg(test)]
mod tests {
    use super::*;

    use dusk_bls12_381::G1Projective;
    use ff::Field;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_dusk_bytes_serde_proof() {
        let mut rng = StdRng::seed_from_u64(0x9f00f);
        let g = G1Projective::from(G1Affine::generator());
        let mut point = || Commitment::from(g * BlsScalar::random(&mut rng));

        let proof = Proof {
            a_comm: point(),
            b_comm: point(),
            c_comm: point(),
            h_0_comm: point(),
            h_1_comm: point(),
            h_2_comm: point(),
            z_comm: point(),
            bsb_comm: point(),
            w_z_chall_comm: point(),
            w_z_chall_w_comm: point(),
            evaluations: ProofEvaluations::from_array(core::array::from_fn(
                |i| BlsScalar::from(i as u64 + 1),
            )),
        };

        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), 736);
        assert_eq!(&bytes[..48], &proof.a_comm.to_bytes());
        assert_eq!(&bytes[480..512], &BlsScalar::one().to_bytes());

        let got = Proof::from_bytes(&bytes).unwrap();
        assert_eq!(got, proof);
    }
}
