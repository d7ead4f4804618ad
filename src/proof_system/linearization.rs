// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_bls12_381::BlsScalar;

use crate::composer::permutation::{K1, K2};
use crate::fft::Polynomial;
use crate::proof_system::ProverKey;
use crate::util::pow;

/// Challenges of a PLONK proof
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Challenges {
    pub(crate) gamma: BlsScalar,
    pub(crate) beta: BlsScalar,
    pub(crate) alpha: BlsScalar,
    pub(crate) zeta: BlsScalar,
}

/// Subset of all of the evaluations. These evaluations
/// are added to the [`Proof`](super::Proof).
#[derive(Debug, Eq, PartialEq, Clone, Copy, Default)]
pub(crate) struct ProofEvaluations {
    // (Shifted) Evaluation of the permutation polynomial at `ζ·ω`
    pub(crate) z_shifted_eval: BlsScalar,
    // Evaluation of the linearization polynomial at `ζ`
    pub(crate) lin_eval: BlsScalar,
    // Evaluation of the witness polynomial for the left wire at `ζ`
    pub(crate) a_eval: BlsScalar,
    // Evaluation of the witness polynomial for the right wire at `ζ`
    pub(crate) b_eval: BlsScalar,
    // Evaluation of the witness polynomial for the output wire at `ζ`
    pub(crate) c_eval: BlsScalar,
    // Evaluation of the left sigma polynomial at `ζ`
    pub(crate) s_sigma_1_eval: BlsScalar,
    // Evaluation of the right sigma polynomial at `ζ`
    pub(crate) s_sigma_2_eval: BlsScalar,
    // Evaluation of the commitment selector polynomial at `ζ`
    pub(crate) q_cp_eval: BlsScalar,
}

impl ProofEvaluations {
    /// `[z(ωζ), lin, a, b, c, s1, s2, qcp]`
    pub(crate) fn to_array(self) -> [BlsScalar; 8] {
        [
            self.z_shifted_eval,
            self.lin_eval,
            self.a_eval,
            self.b_eval,
            self.c_eval,
            self.s_sigma_1_eval,
            self.s_sigma_2_eval,
            self.q_cp_eval,
        ]
    }

    pub(crate) fn from_array(evals: [BlsScalar; 8]) -> Self {
        let [
            z_shifted_eval,
            lin_eval,
            a_eval,
            b_eval,
            c_eval,
            s_sigma_1_eval,
            s_sigma_2_eval,
            q_cp_eval,
        ] = evals;

        Self {
            z_shifted_eval,
            lin_eval,
            a_eval,
            b_eval,
            c_eval,
            s_sigma_1_eval,
            s_sigma_2_eval,
            q_cp_eval,
        }
    }
}

/// Scalars of the linearization commitment, paired with
/// `[BSB, QL, QR, QM, QO, QK, S3, Z, H0, H1, H2]`.
///
/// `l1` is the first Lagrange polynomial evaluated at `ζ`.
pub(crate) fn scalars(
    n: usize,
    challenges: &Challenges,
    evals: &ProofEvaluations,
    l1: &BlsScalar,
) -> [BlsScalar; 11] {
    let Challenges {
        gamma,
        beta,
        alpha,
        zeta,
    } = challenges;

    let a = evals.a_eval;
    let b = evals.b_eval;
    let c = evals.c_eval;

    // α·β·z(ωζ)·(a + β·s1 + γ)·(b + β·s2 + γ)
    let sigma = alpha
        * beta
        * evals.z_shifted_eval
        * (a + beta * evals.s_sigma_1_eval + gamma)
        * (b + beta * evals.s_sigma_2_eval + gamma);

    // -α·(a + βζ + γ)·(b + β·k1·ζ + γ)·(c + β·k2·ζ + γ)
    let identity = -alpha
        * (a + beta * zeta + gamma)
        * (b + beta * K1 * zeta + gamma)
        * (c + beta * K2 * zeta + gamma);

    let z_h = pow(zeta, n as u64) - BlsScalar::one();
    let zeta_shard = pow(zeta, n as u64 + 2);

    [
        evals.q_cp_eval,
        a,
        b,
        a * b,
        c,
        BlsScalar::one(),
        sigma,
        alpha.square() * l1 + identity,
        -z_h,
        -z_h * zeta_shard,
        -z_h * zeta_shard.square(),
    ]
}

/// Evaluation the linearization polynomial must open to:
/// `α²·L1(ζ) - PI(ζ) - α·(a + β·s1 + γ)(b + β·s2 + γ)(c + γ)·z(ωζ)`
pub(crate) fn expected_eval(
    challenges: &Challenges,
    evals: &ProofEvaluations,
    l1: &BlsScalar,
    pi: &BlsScalar,
) -> BlsScalar {
    let Challenges {
        gamma, beta, alpha, ..
    } = challenges;

    let permutation = alpha
        * (evals.a_eval + beta * evals.s_sigma_1_eval + gamma)
        * (evals.b_eval + beta * evals.s_sigma_2_eval + gamma)
        * (evals.c_eval + gamma)
        * evals.z_shifted_eval;

    alpha.square() * l1 - pi - permutation
}

/// Compute the linearization polynomial and the evaluations of the proof.
///
/// `z` is the blinded accumulator and `bsb` the committed values
/// polynomial.
#[allow(clippy::too_many_arguments)]
pub(crate) fn compute(
    prover_key: &ProverKey,
    challenges: &Challenges,
    wires: [&Polynomial; 3],
    z: &Polynomial,
    z_shifted_eval: BlsScalar,
    bsb: &Polynomial,
    shards: [&Polynomial; 3],
) -> (Polynomial, ProofEvaluations) {
    let zeta = &challenges.zeta;

    let mut evals = ProofEvaluations {
        z_shifted_eval,
        lin_eval: BlsScalar::zero(),
        a_eval: wires[0].evaluate(zeta),
        b_eval: wires[1].evaluate(zeta),
        c_eval: wires[2].evaluate(zeta),
        s_sigma_1_eval: prover_key.s_sigma[0].evaluate(zeta),
        s_sigma_2_eval: prover_key.s_sigma[1].evaluate(zeta),
        q_cp_eval: prover_key.q_cp.evaluate(zeta),
    };

    let l1 = prover_key.domain.evaluate_lagrange(0, zeta);
    let scalars = scalars(prover_key.size(), challenges, &evals, &l1);

    let polynomials = [
        bsb,
        &prover_key.q_l,
        &prover_key.q_r,
        &prover_key.q_m,
        &prover_key.q_o,
        &prover_key.q_k,
        &prover_key.s_sigma[2],
        z,
        shards[0],
        shards[1],
        shards[2],
    ];

    let lin =
        Polynomial::linear_combination(scalars.into_iter().zip(polynomials));
    evals.lin_eval = lin.evaluate(zeta);

    (lin, evals)
}
