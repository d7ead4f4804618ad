// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::sync::Arc;

use dusk_bls12_381::{BlsScalar, G1Affine};

use super::Witness;
use crate::commitment_scheme::{msm, Commitment};
use crate::error::Error;
use crate::hash::Hasher;
use crate::proof_system::ProverKey;
use crate::transcript::PREFIX_BSB;

/// Commitment slot declared by a circuit
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommitmentSlot {
    /// Gate index of the row constraining the commitment value
    pub(crate) index: usize,
    /// Gate indexes of the rows hosting the committed witnesses
    pub(crate) committed: Vec<usize>,
    /// Witness of the commitment value
    pub(crate) value: Witness,
    /// Blinded commitment, computed when proving
    pub(crate) bsb: Option<BsbCommitment>,
}

/// Blinded polynomial of the committed witnesses
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BsbCommitment {
    /// Lagrange evaluations over the domain
    pub(crate) evals: Vec<BlsScalar>,
    /// Commitment to the evaluations
    pub(crate) commitment: Commitment,
}

/// Evaluates the commitment slot while the circuit is synthesized for a
/// proof.
///
/// The committed values are placed on their rows and two blinding values on
/// free rows: the row of the commitment value and the last row of the
/// domain.
#[derive(Debug, Clone)]
pub(crate) struct BsbOracle {
    prover_key: Arc<ProverKey>,
    hasher: Hasher,
    blinding: [BlsScalar; 2],
}

impl BsbOracle {
    pub(crate) fn new(
        prover_key: Arc<ProverKey>,
        hasher: Hasher,
        blinding: [BlsScalar; 2],
    ) -> Self {
        Self {
            prover_key,
            hasher,
            blinding,
        }
    }

    /// Commit to `(gate index, value)` pairs with the value row at gate
    /// `index`, returning the commitment and
    /// `Compress(PREFIX_BSB, HashG1(commitment))`.
    pub(crate) fn commit(
        &self,
        committed: &[(usize, BlsScalar)],
        index: usize,
    ) -> Result<(BsbCommitment, BlsScalar), Error> {
        let n = self.prover_key.size();
        let np = self.prover_key.verifier_key.public_inputs;

        let value_row = np + index;
        if value_row + 1 >= n {
            return Err(Error::InvalidCircuitSize(n - 1, value_row + 1));
        }

        let rows = committed
            .iter()
            .map(|(idx, v)| (np + idx, *v))
            .chain([(value_row, self.blinding[0]), (n - 1, self.blinding[1])]);

        let mut evals = vec![BlsScalar::zero(); n];
        let mut points = Vec::with_capacity(committed.len() + 2);
        let mut scalars = Vec::with_capacity(committed.len() + 2);

        let lagrange = &self.prover_key.commit_key.lagrange_powers_of_g;
        for (row, v) in rows {
            let point: G1Affine = *lagrange
                .get(row)
                .ok_or(Error::InvalidCircuitSize(n, row + 1))?;

            evals[row] = v;
            points.push(point);
            scalars.push(v);
        }

        let commitment = Commitment::from(msm(&points, &scalars));
        let value = self
            .hasher
            .compress(&PREFIX_BSB, &self.hasher.hash_g1(&commitment.0));

        Ok((BsbCommitment { evals, commitment }, value))
    }
}
