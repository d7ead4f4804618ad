// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Polynomials blinded with a multiple of the vanishing polynomial.

use dusk_bls12_381::BlsScalar;

use crate::accelerator::AcceleratorRouter;
use crate::commitment_scheme::{CommitKey, Commitment};
use crate::error::Error;
use crate::fft::domain::distribute_powers;
use crate::fft::{Basis, EvaluationDomain, Polynomial};
use crate::util::{batch_inversion, pow};

/// `p(X) + b(X)·(X^n - 1)`, with `p` interpolating the domain evaluations.
///
/// The blinding part vanishes on the domain, so it doesn't alter any value
/// the constraints are checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlindedPolynomial {
    /// Evaluations of `p` over the domain
    pub(crate) evals: Vec<BlsScalar>,
    /// Coefficients of `p`
    pub(crate) coeffs: Vec<BlsScalar>,
    /// Coefficients of `b`
    pub(crate) blinding: Vec<BlsScalar>,
}

impl BlindedPolynomial {
    /// Interpolate `evals` and attach `blinding`.
    pub(crate) fn new(
        router: &AcceleratorRouter,
        domain: &EvaluationDomain,
        evals: Vec<BlsScalar>,
        blinding: &[BlsScalar],
    ) -> Result<Self, Error> {
        let coeffs = router.ntt_inverse(&evals, domain)?;

        Ok(Self {
            evals,
            coeffs,
            blinding: blinding.to_vec(),
        })
    }

    /// `Commit(p) + Σ b_k·(G_{n+k} - G_k)`
    pub(crate) fn commit(
        &self,
        router: &AcceleratorRouter,
        key: &CommitKey,
    ) -> Result<Commitment, Error> {
        let p = router.commit(key, &self.evals, Basis::Lagrange)?;
        let b = key.commit_blinding(self.evals.len(), &self.blinding)?;

        Ok(Commitment::from(b + p.0))
    }

    /// Coefficients of the whole blinded polynomial
    pub(crate) fn to_polynomial(&self) -> Polynomial {
        let n = self.coeffs.len();

        let mut coeffs = self.coeffs.clone();
        coeffs.resize(n + self.blinding.len(), BlsScalar::zero());

        self.blinding.iter().enumerate().for_each(|(k, b)| {
            coeffs[k] -= b;
            coeffs[n + k] += b;
        });

        Polynomial::from_coefficients_vec(coeffs)
    }

    /// Evaluations of the blinded polynomial over `shift·H` with a single
    /// size-n transform.
    ///
    /// Over the coset `X^n - 1` is the constant `shift^n - 1`, so the
    /// blinding coefficients are scaled by it and by the powers of `shift`
    /// for the duration of the transform, then scaled back.
    pub(crate) fn coset_evaluations(
        &mut self,
        router: &AcceleratorRouter,
        domain: &EvaluationDomain,
        shift: &BlsScalar,
    ) -> Result<Vec<BlsScalar>, Error> {
        let n = domain.size();

        let mut factors = Vec::with_capacity(self.blinding.len());
        let mut factor = pow(shift, n as u64) - BlsScalar::one();
        for _ in 0..self.blinding.len() {
            factors.push(factor);
            factor *= shift;
        }

        self.scale(&factors);

        let mut values = self.coeffs.clone();
        values.resize(n, BlsScalar::zero());
        distribute_powers(&mut values, shift);
        values
            .iter_mut()
            .zip(self.blinding.iter())
            .for_each(|(v, b)| *v += b);

        let evals = router.ntt_forward(&values, domain);

        // the shift lies outside the domain, so every factor is invertible
        batch_inversion(&mut factors);
        self.scale(&factors);

        evals
    }

    fn scale(&mut self, factors: &[BlsScalar]) {
        self.blinding
            .iter_mut()
            .zip(factors)
            .for_each(|(b, f)| *b *= f);
    }
}

/// Evaluations of `coeffs` over `shift·H`
pub(crate) fn coset_evaluations(
    router: &AcceleratorRouter,
    domain: &EvaluationDomain,
    coeffs: &[BlsScalar],
    shift: &BlsScalar,
) -> Result<Vec<BlsScalar>, Error> {
    let mut values = coeffs.to_vec();
    values.resize(domain.size(), BlsScalar::zero());
    distribute_powers(&mut values, shift);

    router.ntt_forward(&values, domain)
}
