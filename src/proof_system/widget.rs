// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_bls12_381::BlsScalar;
use dusk_bytes::{DeserializableSlice, Serializable, Write};

use crate::commitment_scheme::{CommitKey, Commitment};
use crate::error::Error;
use crate::fft::domain::TWO_ADACITY;
use crate::fft::{EvaluationDomain, Polynomial};
use crate::hash::Hasher;

/// PLONK circuit Verification Key.
///
/// This structure is used by the Verifier in order to verify a
/// [`Proof`](super::Proof).
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct VerifierKey {
    /// Domain size, a power of two
    pub(crate) n: usize,
    /// Number of public rows
    pub(crate) public_inputs: usize,
    /// Gate index of the row hosting the commitment value
    pub(crate) commitment_index: usize,

    /// Commitment to the left wire permutation
    pub(crate) s_sigma_1: Commitment,
    /// Commitment to the right wire permutation
    pub(crate) s_sigma_2: Commitment,
    /// Commitment to the output wire permutation
    pub(crate) s_sigma_3: Commitment,
    /// Commitment to the left selector
    pub(crate) q_l: Commitment,
    /// Commitment to the right selector
    pub(crate) q_r: Commitment,
    /// Commitment to the multiplication selector
    pub(crate) q_m: Commitment,
    /// Commitment to the output selector
    pub(crate) q_o: Commitment,
    /// Commitment to the constant selector, before completion
    pub(crate) q_k: Commitment,
    /// Commitment to the commitment selector
    pub(crate) q_cp: Commitment,
}

impl Serializable<{ 9 * Commitment::SIZE + 9 }> for VerifierKey {
    type Error = dusk_bytes::Error;

    #[allow(unused_must_use)]
    fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        let mut writer = &mut buf[..];

        for commitment in self.commitments() {
            writer.write(&commitment.to_bytes());
        }

        writer.write(&(self.commitment_index as u32).to_be_bytes());
        writer.write(&[self.n.trailing_zeros() as u8]);
        writer.write(&(self.public_inputs as u32).to_be_bytes());

        buf
    }

    fn from_bytes(buf: &[u8; Self::SIZE]) -> Result<Self, Self::Error> {
        let mut buffer = &buf[..];

        let mut commitments = [Commitment::identity(); 9];
        for commitment in commitments.iter_mut() {
            *commitment = Commitment::from_reader(&mut buffer)?;
        }

        let (ci, rest) = buffer.split_at(4);
        let (sz, np) = rest.split_at(1);

        let ci = u32::from_be_bytes([ci[0], ci[1], ci[2], ci[3]]) as usize;
        let np = u32::from_be_bytes([np[0], np[1], np[2], np[3]]) as usize;
        let sz = sz[0] as u32;

        if sz > TWO_ADACITY {
            return Err(dusk_bytes::Error::InvalidData);
        }

        let [s_sigma_1, s_sigma_2, s_sigma_3, q_l, q_r, q_m, q_o, q_k, q_cp] =
            commitments;

        Ok(Self {
            n: 1 << sz,
            public_inputs: np,
            commitment_index: ci,
            s_sigma_1,
            s_sigma_2,
            s_sigma_3,
            q_l,
            q_r,
            q_m,
            q_o,
            q_k,
            q_cp,
        })
    }
}

impl VerifierKey {
    /// Domain size of the circuit
    pub fn size(&self) -> usize {
        self.n
    }

    /// Number of public inputs of the circuit
    pub fn public_inputs(&self) -> usize {
        self.public_inputs
    }

    /// Gate index of the commitment value row
    pub fn commitment_index(&self) -> usize {
        self.commitment_index
    }

    /// `[S1, S2, S3, QL, QR, QM, QO, QK, QC]`
    pub(crate) fn commitments(&self) -> [Commitment; 9] {
        [
            self.s_sigma_1,
            self.s_sigma_2,
            self.s_sigma_3,
            self.q_l,
            self.q_r,
            self.q_m,
            self.q_o,
            self.q_k,
            self.q_cp,
        ]
    }

    /// `HashG1` of every commitment, in encoding order
    pub(crate) fn hashed_commitments(&self, hasher: &Hasher) -> [BlsScalar; 9] {
        self.commitments().map(|c| hasher.hash_g1(&c.0))
    }

    /// Identifier of the key inside a family of keys:
    /// `Sum(sz, ci, Compress(sz, ci), DigestHash(S1..QC))`
    pub fn address(&self, hasher: &Hasher) -> BlsScalar {
        let sz = BlsScalar::from(self.n.trailing_zeros() as u64);
        let ci = BlsScalar::from(self.commitment_index as u64);
        let head = [sz, ci, hasher.compress(&sz, &ci)];

        let digests = self.commitments().map(|c| hasher.digest_hash(&c.0));

        hasher.sum(head.iter().chain(digests.iter()))
    }

    /// Domain of the circuit
    pub(crate) fn domain(&self) -> Result<EvaluationDomain, Error> {
        EvaluationDomain::new(self.n)
    }
}

/// PLONK circuit Proving Key.
///
/// This structure is used by the Prover in order to construct a
/// [`Proof`](crate::proof_system::Proof).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ProverKey {
    /// Key of the matching verifier
    pub(crate) verifier_key: VerifierKey,
    /// Commit key trimmed to the circuit, with the Lagrange basis of its
    /// domain
    pub(crate) commit_key: CommitKey,
    /// Domain of the circuit
    pub(crate) domain: EvaluationDomain,
    /// Gates count, public rows excluded
    pub(crate) constraints: usize,

    pub(crate) q_m: Polynomial,
    pub(crate) q_l: Polynomial,
    pub(crate) q_r: Polynomial,
    pub(crate) q_o: Polynomial,
    pub(crate) q_k: Polynomial,
    pub(crate) q_cp: Polynomial,
    /// Domain evaluations of the constant selector, completed per proof
    pub(crate) q_k_evals: Vec<BlsScalar>,

    pub(crate) s_sigma: [Polynomial; 3],
    pub(crate) s_sigma_evals: [Vec<BlsScalar>; 3],
}

impl ProverKey {
    /// Domain size of the circuit
    pub fn size(&self) -> usize {
        self.domain.size()
    }

    /// Key of the matching verifier
    pub fn verifier_key(&self) -> &VerifierKey {
        &self.verifier_key
    }

    /// Serialize the key.
    ///
    /// Evaluation vectors and the Lagrange basis are derived again on load.
    pub fn to_var_bytes(&self) -> Vec<u8> {
        let n = self.size();
        let commit_key = self.commit_key.to_var_bytes();

        let mut bytes = Vec::with_capacity(
            u64::SIZE * 2
                + VerifierKey::SIZE
                + commit_key.len()
                + 9 * n * BlsScalar::SIZE,
        );

        bytes.extend((self.constraints as u64).to_bytes());
        bytes.extend(self.verifier_key.to_bytes());
        bytes.extend((commit_key.len() as u64).to_bytes());
        bytes.extend(commit_key);

        let selectors = [
            &self.q_m, &self.q_l, &self.q_r, &self.q_o, &self.q_k, &self.q_cp,
        ];
        for poly in selectors {
            (0..n).for_each(|i| {
                let c = poly.coeffs.get(i).copied().unwrap_or_default();
                bytes.extend(c.to_bytes());
            });
        }

        self.s_sigma_evals
            .iter()
            .flatten()
            .for_each(|s| bytes.extend(s.to_bytes()));

        bytes
    }

    /// Deserialize a key created with [`ProverKey::to_var_bytes`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let mut buf = bytes;

        let constraints = u64::from_reader(&mut buf)? as usize;
        let verifier_key = VerifierKey::from_reader(&mut buf)?;
        let len = u64::from_reader(&mut buf)? as usize;

        if buf.len() < len {
            return Err(Error::NotEnoughBytes);
        }
        let (commit_key, mut buf) = buf.split_at(len);

        let domain = verifier_key.domain()?;
        let commit_key =
            CommitKey::from_slice(commit_key)?.with_lagrange_basis(&domain)?;

        let n = domain.size();
        if buf.len() != 9 * n * BlsScalar::SIZE {
            return Err(Error::NotEnoughBytes);
        }

        let mut read = || -> Result<Vec<BlsScalar>, Error> {
            (0..n)
                .map(|_| BlsScalar::from_reader(&mut buf).map_err(Error::from))
                .collect()
        };

        let q_m = Polynomial::from_coefficients_vec(read()?);
        let q_l = Polynomial::from_coefficients_vec(read()?);
        let q_r = Polynomial::from_coefficients_vec(read()?);
        let q_o = Polynomial::from_coefficients_vec(read()?);
        let q_k = Polynomial::from_coefficients_vec(read()?);
        let q_cp = Polynomial::from_coefficients_vec(read()?);
        let s_sigma_evals = [read()?, read()?, read()?];

        let q_k_evals = domain.fft(&q_k);
        let s_sigma = s_sigma_evals.clone().map(|evals| {
            Polynomial::from_coefficients_vec(domain.ifft(&evals))
        });

        Ok(Self {
            verifier_key,
            commit_key,
            domain,
            constraints,
            q_m,
            q_l,
            q_r,
            q_o,
            q_k,
            q_cp,
            q_k_evals,
            s_sigma,
            s_sigma_evals,
        })
    }
}
