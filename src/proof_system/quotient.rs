// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Quotient polynomial of the gate, permutation and boundary identities.
//!
//! The numerator is evaluated over `ρ` cosets of the domain, which together
//! form the coset `g·H'` of the domain `H'` of size `ρ·n`. Block `i` is the
//! coset `g·ω'^i·H`, so each block takes a single size-n transform.

use dusk_bls12_381::BlsScalar;
use itertools::izip;
use rayon::prelude::*;

use super::blinding::{coset_evaluations, BlindedPolynomial};
use super::linearization::Challenges;
use super::ProverKey;
use crate::accelerator::AcceleratorRouter;
use crate::composer::permutation::{K1, K2};
use crate::error::Error;
use crate::fft::domain::GENERATOR;
use crate::fft::{EvaluationDomain, Evaluations, Form, Polynomial};
use crate::util::{batch_inversion, bit_reverse, pow};

/// Polynomials entering the quotient, besides the prover key
#[derive(Debug)]
pub(crate) struct QuotientInputs<'a> {
    /// Blinded left, right and output wires
    pub(crate) wires: [&'a BlindedPolynomial; 3],
    /// Blinded permutation accumulator
    pub(crate) z: &'a BlindedPolynomial,
    /// Constant selector completed with the public values
    pub(crate) q_k: &'a Polynomial,
    /// Committed values polynomial
    pub(crate) bsb: &'a Polynomial,
}

/// Number of coset blocks for a domain of size `n`
pub(crate) const fn blocks(n: usize) -> usize {
    match n < 8 {
        true => 8,
        false => 4,
    }
}

/// Compute the quotient `t(X)` and split it into 3 shards of `n + 2`
/// coefficients.
///
/// With `carry`, the shards exchange a random value across each boundary:
/// `t_0 + r_0·X^{n+2}`, `t_1 - r_0 + r_1·X^{n+2}`, `t_2 - r_1`, which
/// leaves `t_0 + X^{n+2}·t_1 + X^{2(n+2)}·t_2` unchanged.
pub(crate) fn compute(
    prover_key: &ProverKey,
    router: &AcceleratorRouter,
    inputs: &QuotientInputs,
    challenges: &Challenges,
    carry: Option<[BlsScalar; 2]>,
) -> Result<[Polynomial; 3], Error> {
    let t = compute_quotient(prover_key, router, inputs, challenges)?;

    let n = prover_key.size();
    let shard = n + 2;
    if t.len() > 3 * shard {
        return Err(Error::PolynomialDegreeTooLarge {
            degree: t.degree(),
            max: 3 * shard - 1,
        });
    }

    let mut coeffs = t.coeffs;
    coeffs.resize(3 * shard, BlsScalar::zero());

    let mut shards: [Vec<BlsScalar>; 3] =
        core::array::from_fn(|i| coeffs[i * shard..(i + 1) * shard].to_vec());

    if let Some([r0, r1]) = carry {
        shards[0].push(r0);
        shards[1][0] -= r0;
        shards[1].push(r1);
        shards[2][0] -= r1;
    }

    Ok(shards.map(Polynomial::from_coefficients_vec))
}

fn compute_quotient(
    prover_key: &ProverKey,
    router: &AcceleratorRouter,
    inputs: &QuotientInputs,
    challenges: &Challenges,
) -> Result<Polynomial, Error> {
    let domain = &prover_key.domain;
    let n = domain.size();
    let rho = blocks(n);

    let big_domain = EvaluationDomain::new(rho * n)?;
    let log_big = big_domain.log_size();

    // scoped copies for the in-place rescaling of the blinding
    let mut wires = inputs.wires.map(|w| w.clone());
    let mut z = inputs.z.clone();

    // X^n - 1 over block i is the constant (g·ω'^i)^n - 1
    let shifts: Vec<BlsScalar> = (0..rho)
        .map(|i| GENERATOR * big_domain.element(i))
        .collect();
    let z_h: Vec<BlsScalar> = shifts
        .iter()
        .map(|s| pow(s, n as u64) - BlsScalar::one())
        .collect();
    let mut z_h_inv = z_h.clone();
    batch_inversion(&mut z_h_inv);

    let mut out = vec![BlsScalar::zero(); rho * n];

    for (i, shift) in shifts.iter().enumerate() {
        let block = Block {
            prover_key,
            router,
            domain,
            shift,
        };

        let l = wires[0].coset_evaluations(router, domain, shift)?;
        let r = wires[1].coset_evaluations(router, domain, shift)?;
        let o = wires[2].coset_evaluations(router, domain, shift)?;
        let z_evals = z.coset_evaluations(router, domain, shift)?;

        let gate = block.gate(&l, &r, &o, inputs)?;
        let perm = block.permutation(&l, &r, &o, &z_evals, challenges)?;
        let boundary = block.boundary(&z_evals, &z_h[i]);

        let alpha = challenges.alpha;
        let alpha_sq = alpha.square();
        let quotient: Vec<BlsScalar> =
            izip!(gate.iter(), perm.iter(), boundary.iter())
                .map(|(g, p, b)| (g + alpha * p + alpha_sq * b) * z_h_inv[i])
                .collect();

        quotient.into_iter().enumerate().for_each(|(j, t)| {
            out[bit_reverse(rho * j + i, log_big)] = t;
        });
    }

    Evaluations::new(out, Form::LAGRANGE_COSET_BIT_REVERSED)
        .into_regular()
        .coset_interpolate(&big_domain, &GENERATOR)
}

/// Coset block `shift·H`
struct Block<'a> {
    prover_key: &'a ProverKey,
    router: &'a AcceleratorRouter,
    domain: &'a EvaluationDomain,
    shift: &'a BlsScalar,
}

impl Block<'_> {
    fn evals(&self, coeffs: &[BlsScalar]) -> Result<Vec<BlsScalar>, Error> {
        coset_evaluations(self.router, self.domain, coeffs, self.shift)
    }

    /// `x_j = shift·ω^j`
    fn points(&self) -> Vec<BlsScalar> {
        let mut points = self.domain.elements();
        points.iter_mut().for_each(|x| *x *= self.shift);
        points
    }

    /// `q_m·l·r + q_l·l + q_r·r + q_o·o + q_k + q_cp·bsb`
    fn gate(
        &self,
        l: &[BlsScalar],
        r: &[BlsScalar],
        o: &[BlsScalar],
        inputs: &QuotientInputs,
    ) -> Result<Vec<BlsScalar>, Error> {
        let pk = self.prover_key;

        let q_m = self.evals(&pk.q_m)?;
        let q_l = self.evals(&pk.q_l)?;
        let q_r = self.evals(&pk.q_r)?;
        let q_o = self.evals(&pk.q_o)?;
        let q_k = self.evals(inputs.q_k)?;
        let q_cp = self.evals(&pk.q_cp)?;
        let bsb = self.evals(inputs.bsb)?;

        // l·r through the backend
        let lr = self.router.pointwise_multiply(l, r)?;

        Ok((0..l.len())
            .into_par_iter()
            .map(|j| {
                q_m[j] * lr[j]
                    + q_l[j] * l[j]
                    + q_r[j] * r[j]
                    + q_o[j] * o[j]
                    + q_k[j]
                    + q_cp[j] * bsb[j]
            })
            .collect())
    }

    /// `z(ωx)·Π(w + β·σ + γ) - z(x)·Π(w + β·k·x + γ)`
    fn permutation(
        &self,
        l: &[BlsScalar],
        r: &[BlsScalar],
        o: &[BlsScalar],
        z: &[BlsScalar],
        challenges: &Challenges,
    ) -> Result<Vec<BlsScalar>, Error> {
        let pk = self.prover_key;
        let Challenges { gamma, beta, .. } = challenges;

        let s1 = self.evals(&pk.s_sigma[0])?;
        let s2 = self.evals(&pk.s_sigma[1])?;
        let s3 = self.evals(&pk.s_sigma[2])?;
        let points = self.points();

        let n = z.len();

        Ok((0..n)
            .into_par_iter()
            .map(|j| {
                let x = points[j];
                // the next point of the coset is the next evaluation
                let z_shifted = z[(j + 1) % n];

                let sigma = (l[j] + beta * s1[j] + gamma)
                    * (r[j] + beta * s2[j] + gamma)
                    * (o[j] + beta * s3[j] + gamma);
                let identity = (l[j] + beta * x + gamma)
                    * (r[j] + beta * K1 * x + gamma)
                    * (o[j] + beta * K2 * x + gamma);

                z_shifted * sigma - z[j] * identity
            })
            .collect())
    }

    /// `(z(x) - 1)·L1(x)` with `L1(x) = (x^n - 1) / (n·(x - 1))`
    fn boundary(&self, z: &[BlsScalar], z_h: &BlsScalar) -> Vec<BlsScalar> {
        let n = BlsScalar::from(z.len() as u64);

        let mut den: Vec<BlsScalar> = self
            .points()
            .into_iter()
            .map(|x| n * (x - BlsScalar::one()))
            .collect();
        batch_inversion(&mut den);

        z.iter()
            .zip(den)
            .map(|(z, d)| (z - BlsScalar::one()) * z_h * d)
            .collect()
    }
}
