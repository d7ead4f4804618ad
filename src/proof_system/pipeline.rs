// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Proof generation as a graph of stages.
//!
//! Every stage runs on its own scoped thread and publishes its output into
//! a one-shot [`Artifact`]. Stages reading an artifact block until it is
//! published or until a failing stage cancels the whole generation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::thread;

use dusk_bls12_381::BlsScalar;
use ff::Field;
use parking_lot::{Condvar, Mutex};
use rand_core::{CryptoRng, RngCore};
use tracing::debug;

use super::blinding::BlindedPolynomial;
use super::linearization::{self, Challenges, ProofEvaluations};
use super::quotient::{self, QuotientInputs};
use super::{Proof, ProverKey};
use crate::accelerator::AcceleratorRouter;
use crate::commitment_scheme::{
    fold_polynomials, folding_challenge, Commitment, OpeningProof,
};
use crate::composer::{permutation, Composer};
use crate::error::Error;
use crate::fft::{Basis, Polynomial};
use crate::hash::Hasher;
use crate::transcript::{Transcript, ALPHA, BETA, GAMMA, ZETA};

const SOLVE_WITNESS: &str = "solve_witness";
const COMMIT_LRO: &str = "commit_lro";
const COMPLETE_SELECTOR_K: &str = "complete_selector_k";
const DERIVE_GAMMA_BETA: &str = "derive_gamma_beta";
const BUILD_Z: &str = "build_z";
const COMPUTE_QUOTIENT: &str = "compute_quotient";
const OPEN_Z_SHIFTED: &str = "open_z_shifted";
const COMPUTE_LINEARIZATION: &str = "compute_linearization";
const BATCH_OPENING: &str = "batch_opening";

/// Value produced exactly once by a stage
#[derive(Debug)]
pub(crate) struct Artifact<T> {
    name: &'static str,
    value: OnceLock<T>,
}

impl<T> Artifact<T> {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self {
            name,
            value: OnceLock::new(),
        }
    }

    /// Published value, once every stage has returned
    pub(crate) fn get(&self) -> Result<&T, Error> {
        self.value.get().ok_or(Error::PipelineCancelled)
    }
}

/// Synchronization shared by the stages of a single proof generation
#[derive(Debug, Default)]
pub(crate) struct Pipeline {
    lock: Mutex<()>,
    signal: Condvar,
    cancelled: AtomicBool,
}

impl Pipeline {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Publish `value` and wake the readers of the artifact.
    pub(crate) fn publish<T>(
        &self,
        artifact: &Artifact<T>,
        value: T,
    ) -> Result<(), Error> {
        // a cancellation either happens before the check or after the set
        let _guard = self.lock.lock();
        if self.is_cancelled() {
            return Err(Error::PipelineCancelled);
        }

        artifact
            .value
            .set(value)
            .map_err(|_| Error::ArtifactAlreadyPublished(artifact.name))?;
        self.signal.notify_all();

        Ok(())
    }

    /// Block until the artifact is published or the pipeline cancelled.
    pub(crate) fn wait<'a, T>(
        &self,
        artifact: &'a Artifact<T>,
    ) -> Result<&'a T, Error> {
        let mut guard = self.lock.lock();

        loop {
            if let Some(value) = artifact.value.get() {
                return Ok(value);
            }
            if self.is_cancelled() {
                return Err(Error::PipelineCancelled);
            }

            self.signal.wait(&mut guard);
        }
    }

    pub(crate) fn cancel(&self) {
        let _guard = self.lock.lock();
        self.cancelled.store(true, Ordering::SeqCst);
        self.signal.notify_all();
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Run a stage, cancelling the pipeline if it fails.
    pub(crate) fn run<F>(&self, stage: &'static str, f: F) -> Result<(), Error>
    where
        F: FnOnce() -> Result<(), Error>,
    {
        if self.is_cancelled() {
            return Err(Error::PipelineCancelled);
        }

        debug!(stage, "stage started");
        let result = f();

        match &result {
            Ok(()) => debug!(stage, "stage completed"),
            Err(Error::PipelineCancelled) => debug!(stage, "stage cancelled"),
            Err(err) => {
                debug!(stage, %err, "stage failed");
                self.cancel();
            }
        }

        result
    }
}

/// Pick the error that caused the cancellation over the cancellations it
/// triggered.
pub(crate) fn root_error<I>(results: I) -> Result<(), Error>
where
    I: IntoIterator<Item = Result<(), Error>>,
{
    let mut root = None;

    for err in results.into_iter().filter_map(Result::err) {
        if matches!(root, None | Some(Error::PipelineCancelled)) {
            root = Some(err);
        }
    }

    match root {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Randomness of a proof, sampled before any stage runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Blinders {
    /// Degree-1 blinders of the left, right and output wires
    pub(crate) wires: [[BlsScalar; 2]; 3],
    /// Degree-2 blinder of the permutation accumulator
    pub(crate) z: [BlsScalar; 3],
    /// Values hosted by the free rows of the committed polynomial
    pub(crate) bsb: [BlsScalar; 2],
    /// Values carried across the quotient shards
    pub(crate) quotient: Option<[BlsScalar; 2]>,
}

impl Blinders {
    pub(crate) fn random<R: RngCore + CryptoRng>(
        rng: &mut R,
        statistical_zk: bool,
    ) -> Self {
        let mut r = || BlsScalar::random(&mut *rng);

        let wires = [[r(), r()], [r(), r()], [r(), r()]];
        let z = [r(), r(), r()];
        let bsb = [r(), r()];
        let quotient = match statistical_zk {
            true => Some([r(), r()]),
            false => None,
        };

        Self {
            wires,
            z,
            bsb,
            quotient,
        }
    }
}

/// Row values of the wires and the completion of the constant selector
#[derive(Debug)]
struct Solution {
    wires: [Vec<BlsScalar>; 3],
    completion: Vec<BlsScalar>,
}

#[derive(Debug)]
struct Wires {
    blinded: [BlindedPolynomial; 3],
    polynomials: [Polynomial; 3],
    commitments: [Commitment; 3],
}

#[derive(Debug)]
struct Selectors {
    q_k: Polynomial,
    bsb: Polynomial,
}

#[derive(Debug)]
struct GammaBeta {
    transcript: Transcript,
    gamma: BlsScalar,
    beta: BlsScalar,
}

#[derive(Debug)]
struct Accumulator {
    blinded: BlindedPolynomial,
    polynomial: Polynomial,
    commitment: Commitment,
}

#[derive(Debug)]
struct Quotient {
    shards: [Polynomial; 3],
    commitments: [Commitment; 3],
    challenges: Challenges,
}

#[derive(Debug)]
struct Linearization {
    polynomial: Polynomial,
    commitment: Commitment,
    evaluations: ProofEvaluations,
}

/// Generate a proof for the synthesized `composer`.
pub(crate) fn prove(
    prover_key: &ProverKey,
    hasher: &Hasher,
    router: &AcceleratorRouter,
    composer: &Composer,
    blinders: &Blinders,
) -> Result<Proof, Error> {
    let verifier_key = &prover_key.verifier_key;

    if composer.constraints() != prover_key.constraints {
        return Err(Error::InvalidCircuitSize(
            prover_key.constraints,
            composer.constraints(),
        ));
    }
    if composer.public_inputs() != verifier_key.public_inputs {
        return Err(Error::InconsistentPublicInputsLen {
            expected: verifier_key.public_inputs,
            provided: composer.public_inputs(),
        });
    }

    let slot = composer
        .commitment
        .as_ref()
        .filter(|slot| slot.index == verifier_key.commitment_index)
        .ok_or(Error::VerifierKeyMismatch)?;
    let bsb = slot.bsb.as_ref().ok_or(Error::VerifierKeyMismatch)?;

    let public_inputs = composer.public_input_values();
    let domain = &prover_key.domain;
    let key = &prover_key.commit_key;
    let n = domain.size();

    let pipeline = Pipeline::new();

    let solution = Artifact::<Solution>::new(SOLVE_WITNESS);
    let wires = Artifact::<Wires>::new(COMMIT_LRO);
    let selectors = Artifact::<Selectors>::new(COMPLETE_SELECTOR_K);
    let gamma_beta = Artifact::<GammaBeta>::new(DERIVE_GAMMA_BETA);
    let accumulator = Artifact::<Accumulator>::new(BUILD_Z);
    let quotient = Artifact::<Quotient>::new(COMPUTE_QUOTIENT);
    let z_opening = Artifact::<OpeningProof>::new(OPEN_Z_SHIFTED);
    let linearization = Artifact::<Linearization>::new(COMPUTE_LINEARIZATION);
    let opening = Artifact::<OpeningProof>::new(BATCH_OPENING);

    let solve_witness = || -> Result<(), Error> {
        let rows = composer.rows();
        let np = verifier_key.public_inputs;

        let mut l = vec![BlsScalar::zero(); n];
        let mut r = vec![BlsScalar::zero(); n];
        let mut o = vec![BlsScalar::zero(); n];
        let mut completion = vec![BlsScalar::zero(); n];

        public_inputs
            .iter()
            .zip(completion.iter_mut())
            .for_each(|(p, c)| *c = *p);
        completion[np + slot.index] = composer[slot.value];

        for (i, gate) in rows.iter().enumerate() {
            l[i] = composer[gate.a];
            r[i] = composer[gate.b];
            o[i] = composer[gate.c];

            let extra = &completion[i];
            let eval = gate.evaluate(&l[i], &r[i], &o[i], extra, &bsb.evals[i]);
            if eval != BlsScalar::zero() {
                return Err(Error::UnsatisfiedConstraint { gate: i });
            }
        }

        pipeline.publish(
            &solution,
            Solution {
                wires: [l, r, o],
                completion,
            },
        )
    };

    let commit_lro = || -> Result<(), Error> {
        let solution = pipeline.wait(&solution)?;

        let [l, r, o] = &solution.wires;
        let [b_l, b_r, b_o] = &blinders.wires;
        let blinded = [
            BlindedPolynomial::new(router, domain, l.clone(), b_l)?,
            BlindedPolynomial::new(router, domain, r.clone(), b_r)?,
            BlindedPolynomial::new(router, domain, o.clone(), b_o)?,
        ];

        let mut commitments = [Commitment::identity(); 3];
        for (c, p) in commitments.iter_mut().zip(&blinded) {
            *c = p.commit(router, key)?;
        }
        let polynomials = [
            blinded[0].to_polynomial(),
            blinded[1].to_polynomial(),
            blinded[2].to_polynomial(),
        ];

        pipeline.publish(
            &wires,
            Wires {
                blinded,
                polynomials,
                commitments,
            },
        )
    };

    let complete_selector_k = || -> Result<(), Error> {
        let solution = pipeline.wait(&solution)?;

        let q_k: Vec<BlsScalar> = prover_key
            .q_k_evals
            .iter()
            .zip(solution.completion.iter())
            .map(|(q, c)| q + c)
            .collect();
        let q_k = router.ntt_inverse(&q_k, domain)?;
        let bsb = router.ntt_inverse(&bsb.evals, domain)?;

        pipeline.publish(
            &selectors,
            Selectors {
                q_k: Polynomial::from_coefficients_vec(q_k),
                bsb: Polynomial::from_coefficients_vec(bsb),
            },
        )
    };

    let derive_gamma_beta = || -> Result<(), Error> {
        let wires = pipeline.wait(&wires)?;

        let mut transcript = Transcript::plonk(hasher.clone());
        let hashes = wires.commitments.map(|c| hasher.hash_g1(&c.0));

        transcript.bind(GAMMA, &verifier_key.hashed_commitments(hasher))?;
        transcript.bind(GAMMA, &hashes)?;
        transcript.bind(GAMMA, &public_inputs)?;

        let gamma = transcript.compute_challenge(GAMMA)?;
        let beta = transcript.compute_challenge(BETA)?;

        pipeline.publish(
            &gamma_beta,
            GammaBeta {
                transcript,
                gamma,
                beta,
            },
        )
    };

    let build_z = || -> Result<(), Error> {
        let solution = pipeline.wait(&solution)?;
        let challenges = pipeline.wait(&gamma_beta)?;

        let [l, r, o] = &solution.wires;
        let [s1, s2, s3] = &prover_key.s_sigma_evals;
        let evals = permutation::compute_permutation_evaluations(
            domain,
            [l, r, o],
            [s1, s2, s3],
            &challenges.beta,
            &challenges.gamma,
        );

        let blinded =
            BlindedPolynomial::new(router, domain, evals, &blinders.z)?;
        let commitment = blinded.commit(router, key)?;
        let polynomial = blinded.to_polynomial();

        pipeline.publish(
            &accumulator,
            Accumulator {
                blinded,
                polynomial,
                commitment,
            },
        )
    };

    let compute_quotient = || -> Result<(), Error> {
        let wires = pipeline.wait(&wires)?;
        let selectors = pipeline.wait(&selectors)?;
        let gamma_beta = pipeline.wait(&gamma_beta)?;
        let z = pipeline.wait(&accumulator)?;

        let mut transcript = gamma_beta.transcript.clone();
        let bsb_hash = hasher.hash_g1(&bsb.commitment.0);
        let z_hash = hasher.hash_g1(&z.commitment.0);

        transcript.bind(ALPHA, &[bsb_hash, z_hash])?;
        let alpha = transcript.compute_challenge(ALPHA)?;

        let mut challenges = Challenges {
            gamma: gamma_beta.gamma,
            beta: gamma_beta.beta,
            alpha,
            zeta: BlsScalar::zero(),
        };

        let inputs = QuotientInputs {
            wires: [&wires.blinded[0], &wires.blinded[1], &wires.blinded[2]],
            z: &z.blinded,
            q_k: &selectors.q_k,
            bsb: &selectors.bsb,
        };
        let shards = quotient::compute(
            prover_key,
            router,
            &inputs,
            &challenges,
            blinders.quotient,
        )?;

        let mut commitments = [Commitment::identity(); 3];
        for (c, shard) in commitments.iter_mut().zip(&shards) {
            *c = router.commit(key, shard, Basis::Canonical)?;
        }

        let hashes = commitments.map(|c| hasher.hash_g1(&c.0));
        transcript.bind(ZETA, &hashes)?;
        challenges.zeta = transcript.compute_challenge(ZETA)?;

        pipeline.publish(
            &quotient,
            Quotient {
                shards,
                commitments,
                challenges,
            },
        )
    };

    let open_z_shifted = || -> Result<(), Error> {
        let quotient = pipeline.wait(&quotient)?;
        let z = pipeline.wait(&accumulator)?;

        let point = quotient.challenges.zeta * domain.group_gen();
        let proof = router.open(key, &z.polynomial, &point)?;

        pipeline.publish(&z_opening, proof)
    };

    let compute_linearization = || -> Result<(), Error> {
        let wires = pipeline.wait(&wires)?;
        let selectors = pipeline.wait(&selectors)?;
        let z = pipeline.wait(&accumulator)?;
        let quotient = pipeline.wait(&quotient)?;
        let z_opening = pipeline.wait(&z_opening)?;

        let [a, b, c] = &wires.polynomials;
        let [h_0, h_1, h_2] = &quotient.shards;
        let (polynomial, evaluations) = linearization::compute(
            prover_key,
            &quotient.challenges,
            [a, b, c],
            &z.polynomial,
            z_opening.value,
            &selectors.bsb,
            [h_0, h_1, h_2],
        );
        let commitment = router.commit(key, &polynomial, Basis::Canonical)?;

        pipeline.publish(
            &linearization,
            Linearization {
                polynomial,
                commitment,
                evaluations,
            },
        )
    };

    let batch_opening = || -> Result<(), Error> {
        let wires = pipeline.wait(&wires)?;
        let quotient = pipeline.wait(&quotient)?;
        let lin = pipeline.wait(&linearization)?;

        let zeta = quotient.challenges.zeta;
        let evals = &lin.evaluations;

        let polynomials = [
            &lin.polynomial,
            &wires.polynomials[0],
            &wires.polynomials[1],
            &wires.polynomials[2],
            &prover_key.s_sigma[0],
            &prover_key.s_sigma[1],
            &prover_key.q_cp,
        ];
        let digests = [
            lin.commitment,
            wires.commitments[0],
            wires.commitments[1],
            wires.commitments[2],
            verifier_key.s_sigma_1,
            verifier_key.s_sigma_2,
            verifier_key.q_cp,
        ];
        let values = [
            evals.lin_eval,
            evals.a_eval,
            evals.b_eval,
            evals.c_eval,
            evals.s_sigma_1_eval,
            evals.s_sigma_2_eval,
            evals.q_cp_eval,
        ];

        let gamma = folding_challenge(
            hasher,
            &zeta,
            &digests,
            &values,
            &[evals.z_shifted_eval],
        )?;
        let folded = fold_polynomials(&polynomials, &gamma);
        let proof = router.open(key, &folded, &zeta)?;

        pipeline.publish(&opening, proof)
    };

    let results: Vec<Result<(), Error>> = thread::scope(|s| {
        let handles = [
            s.spawn(|| pipeline.run(SOLVE_WITNESS, solve_witness)),
            s.spawn(|| pipeline.run(COMMIT_LRO, commit_lro)),
            s.spawn(|| pipeline.run(COMPLETE_SELECTOR_K, complete_selector_k)),
            s.spawn(|| pipeline.run(DERIVE_GAMMA_BETA, derive_gamma_beta)),
            s.spawn(|| pipeline.run(BUILD_Z, build_z)),
            s.spawn(|| pipeline.run(COMPUTE_QUOTIENT, compute_quotient)),
            s.spawn(|| pipeline.run(OPEN_Z_SHIFTED, open_z_shifted)),
            s.spawn(|| {
                pipeline.run(COMPUTE_LINEARIZATION, compute_linearization)
            }),
            s.spawn(|| pipeline.run(BATCH_OPENING, batch_opening)),
        ];

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(Err(Error::PipelineCancelled)))
            .collect()
    });

    root_error(results)?;

    let wires = wires.get()?;
    let quotient = quotient.get()?;
    let z = accumulator.get()?;

    Ok(Proof {
        a_comm: wires.commitments[0],
        b_comm: wires.commitments[1],
        c_comm: wires.commitments[2],
        h_0_comm: quotient.commitments[0],
        h_1_comm: quotient.commitments[1],
        h_2_comm: quotient.commitments[2],
        z_comm: z.commitment,
        bsb_comm: bsb.commitment,
        w_z_chall_comm: opening.get()?.witness,
        w_z_chall_w_comm: z_opening.get()?.witness,
        evaluations: linearization.get()?.evaluations,
    })
}
