// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_bls12_381::BlsScalar;
use tracing::info;

use super::{Circuit, Composer, Gate, Permutation, Prover, Verifier};
use crate::commitment_scheme::PublicParameters;
use crate::config::ProverConfig;
use crate::error::Error;
use crate::fft::{EvaluationDomain, Polynomial};
use crate::hash::Hasher;
use crate::proof_system::{ProverKey, VerifierKey};

/// Smallest domain a circuit is laid out on
const MIN_DOMAIN_SIZE: usize = 4;

/// Generate the arguments to prove and verify a circuit
#[derive(Debug)]
pub struct Compiler;

impl Compiler {
    /// Create a new arguments set from a given circuit instance
    ///
    /// Use the default implementation of the circuit
    pub fn compile<C>(
        pp: &PublicParameters,
        label: &[u8],
    ) -> Result<(Prover, Verifier), Error>
    where
        C: Circuit + Default,
    {
        Self::compile_with_circuit(pp, label, &C::default())
    }

    /// Create a new arguments set from a given circuit instance
    ///
    /// Use the provided circuit instead of the default implementation
    pub fn compile_with_circuit<C>(
        pp: &PublicParameters,
        label: &[u8],
        circuit: &C,
    ) -> Result<(Prover, Verifier), Error>
    where
        C: Circuit,
    {
        Self::compile_with_config(pp, label, circuit, ProverConfig::default())
    }

    /// Create a new arguments set with the hash and prover options of
    /// `config`
    pub fn compile_with_config<C>(
        pp: &PublicParameters,
        label: &[u8],
        circuit: &C,
        config: ProverConfig,
    ) -> Result<(Prover, Verifier), Error>
    where
        C: Circuit,
    {
        let hasher = Hasher::from_config(&config.hash)?;

        let mut composer = Composer::initialized();
        circuit.circuit(&mut composer)?;
        composer.finalize()?;

        let prover_key = Self::preprocess(pp, &composer)?;

        info!(
            label = %String::from_utf8_lossy(label),
            constraints = prover_key.constraints,
            public_inputs = prover_key.verifier_key.public_inputs,
            size = prover_key.size(),
            "circuit compiled"
        );

        let verifier = Verifier::new(
            label.to_vec(),
            prover_key.verifier_key,
            pp.opening_key().clone(),
            config.hash.clone(),
        )?;
        let prover = Prover::new(label.to_vec(), prover_key, hasher, config);

        Ok((prover, verifier))
    }

    /// Domain size of a layout with `rows` rows, keeping the last row free
    pub(crate) fn domain_size(rows: usize) -> usize {
        (rows + 1).next_power_of_two().max(MIN_DOMAIN_SIZE)
    }

    fn preprocess(
        pp: &PublicParameters,
        composer: &Composer,
    ) -> Result<ProverKey, Error> {
        let commitment_index = composer
            .commitment
            .as_ref()
            .map(|slot| slot.index)
            .ok_or(Error::VerifierKeyMismatch)?;

        let mut rows = composer.rows();
        let n = Self::domain_size(rows.len());
        let domain = EvaluationDomain::new(n)?;

        // 1. pad the layout to the domain
        rows.resize(n, Gate::padding());

        // blinded polynomials reach degree n + 2
        let (commit_key, _) = pp.trim(n + 2)?;
        let commit_key = commit_key.with_lagrange_basis(&domain)?;

        let selector = |f: fn(&Gate) -> BlsScalar| -> Vec<BlsScalar> {
            rows.iter().map(f).collect()
        };
        let interpolate = |evals: &[BlsScalar]| {
            Polynomial::from_coefficients_vec(domain.ifft(evals))
        };

        let q_k_evals = selector(|g| g.q_k);

        let q_m = interpolate(&selector(|g| g.q_m));
        let q_l = interpolate(&selector(|g| g.q_l));
        let q_r = interpolate(&selector(|g| g.q_r));
        let q_o = interpolate(&selector(|g| g.q_o));
        let q_k = interpolate(&q_k_evals);
        let q_cp = interpolate(&selector(|g| g.q_cp));

        // 2. compute the sigma polynomials
        let s_sigma_evals =
            Permutation::from_rows(&rows).compute_sigma_evaluations(&domain);
        let s_sigma = [
            interpolate(&s_sigma_evals[0]),
            interpolate(&s_sigma_evals[1]),
            interpolate(&s_sigma_evals[2]),
        ];

        let verifier_key = VerifierKey {
            n,
            public_inputs: composer.public_inputs(),
            commitment_index,
            s_sigma_1: commit_key.commit(&s_sigma[0])?,
            s_sigma_2: commit_key.commit(&s_sigma[1])?,
            s_sigma_3: commit_key.commit(&s_sigma[2])?,
            q_l: commit_key.commit(&q_l)?,
            q_r: commit_key.commit(&q_r)?,
            q_m: commit_key.commit(&q_m)?,
            q_o: commit_key.commit(&q_o)?,
            q_k: commit_key.commit(&q_k)?,
            q_cp: commit_key.commit(&q_cp)?,
        };

        Ok(ProverKey {
            verifier_key,
            commit_key,
            domain,
            constraints: composer.constraints(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_keeps_a_free_row() {
        assert_eq!(Compiler::domain_size(0), 4);
        assert_eq!(Compiler::domain_size(3), 4);
        assert_eq!(Compiler::domain_size(4), 8);
        assert_eq!(Compiler::domain_size(7), 8);
        assert_eq!(Compiler::domain_size(8), 16);
    }
}
