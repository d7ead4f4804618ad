// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::sync::Arc;

use eon_plonk::commitment_scheme::OpeningProof;
use eon_plonk::fft::{Basis, EvaluationDomain};
use eon_plonk::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod common;
use common::{
    check_satisfied_circuit, check_satisfied_circuit_fails,
    check_unsatisfied_circuit,
};

// Implements a circuit that checks:
// 1) x is committed
// 2) x^e = y where y is a PI
// 3) x^e = 1
#[derive(Debug)]
pub struct PowerCircuit<const E: usize> {
    x: BlsScalar,
    y: BlsScalar,
}

impl<const E: usize> PowerCircuit<E> {
    pub fn new(x: BlsScalar) -> Self {
        let y = (1..E).fold(x, |acc, _| acc * x);
        Self { x, y }
    }
}

impl<const E: usize> Default for PowerCircuit<E> {
    fn default() -> Self {
        Self::new(BlsScalar::one())
    }
}

impl<const E: usize> Circuit for PowerCircuit<E> {
    fn circuit(&self, composer: &mut Composer) -> Result<(), Error> {
        let x = composer.append_witness(self.x);
        let y = composer.append_public(self.y);

        composer.commit(&[x])?;

        let mut power = x;
        for _ in 1..E {
            let constraint = Constraint::new().mult(1).a(power).b(x);
            power = composer.gate_mul(constraint);
        }

        composer.assert_equal(power, y);
        composer.assert_equal_constant(power, 1);

        Ok(())
    }
}

type SquareCircuit = PowerCircuit<2>;
type CubeCircuit = PowerCircuit<3>;

#[test]
fn square_circuit() {
    let label = b"square";
    let rng = &mut StdRng::seed_from_u64(0xbead);
    let capacity = 1 << 6;
    let pp = PublicParameters::setup(capacity, rng)
        .expect("Creation of public parameter shouldn't fail");
    let (prover, verifier) = Compiler::compile::<SquareCircuit>(&pp, label)
        .expect("Circuit should compile");

    assert_eq!(prover.label(), label);
    assert_eq!(verifier.verifier_key().public_inputs(), 1);
    assert_eq!(verifier.verifier_key().size(), 16);

    // Test one works
    let msg = "Circuit with x = 1 should pass";
    let pi = vec![BlsScalar::one()];
    let circuit = SquareCircuit::new(BlsScalar::one());
    check_satisfied_circuit(&prover, &verifier, &pi, &circuit, rng, msg);

    // Test minus one works
    let msg = "Circuit with x = -1 should pass";
    let circuit = SquareCircuit::new(-BlsScalar::one());
    check_satisfied_circuit(&prover, &verifier, &pi, &circuit, rng, msg);

    // Test wrong public input fails
    let msg = "Verification with the wrong public input should fail";
    let wrong_pi = vec![BlsScalar::from(2u64)];
    check_satisfied_circuit_fails(
        &prover, &verifier, &wrong_pi, &circuit, rng, msg,
    );

    // Test two fails
    let msg = "Circuit with x = 2 shouldn't pass";
    let circuit = SquareCircuit::new(BlsScalar::from(2u64));
    check_unsatisfied_circuit(&prover, &circuit, rng, msg);
}

#[test]
fn proof_is_bound_to_its_circuit() {
    let rng = &mut StdRng::seed_from_u64(0xc0be);
    let pp = PublicParameters::setup(1 << 6, rng)
        .expect("Creation of public parameter shouldn't fail");

    let (square_prover, square_verifier) =
        Compiler::compile::<SquareCircuit>(&pp, b"square")
            .expect("Circuit should compile");
    let (cube_prover, cube_verifier) =
        Compiler::compile::<CubeCircuit>(&pp, b"cube")
            .expect("Circuit should compile");

    assert_ne!(
        square_verifier.verifier_key(),
        cube_verifier.verifier_key()
    );

    let pi = vec![BlsScalar::one()];

    let (square_proof, _) = square_prover
        .prove(rng, &SquareCircuit::default())
        .expect("Prover for valid circuit shouldn't fail");
    let (cube_proof, _) = cube_prover
        .prove(rng, &CubeCircuit::default())
        .expect("Prover for valid circuit shouldn't fail");

    square_verifier
        .verify(&square_proof, &pi)
        .expect("Square proof should pass");
    cube_verifier
        .verify(&cube_proof, &pi)
        .expect("Cube proof should pass");

    cube_verifier
        .verify(&square_proof, &pi)
        .expect_err("Square proof shouldn't pass the cube verifier");
    square_verifier
        .verify(&cube_proof, &pi)
        .expect_err("Cube proof shouldn't pass the square verifier");
}

#[test]
fn public_inputs_count_is_checked() {
    let rng = &mut StdRng::seed_from_u64(0x1ec);
    let (prover, verifier) =
        common::setup(1 << 6, rng, b"square", &SquareCircuit::default());

    let (proof, _) = prover
        .prove(rng, &SquareCircuit::default())
        .expect("Prover for valid circuit shouldn't fail");

    let err = verifier
        .verify(&proof, &[])
        .expect_err("Missing public inputs should fail");

    assert_eq!(
        err,
        Error::InconsistentPublicInputsLen {
            expected: 1,
            provided: 0
        }
    );
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn statistical_zk_proofs_verify() {
    let rng = &mut StdRng::seed_from_u64(0x57a7);
    let pp = PublicParameters::setup(1 << 6, rng)
        .expect("Creation of public parameter shouldn't fail");

    let config = ProverConfig {
        statistical_zk: true,
        ..Default::default()
    };
    let circuit = SquareCircuit::default();
    let (prover, verifier) =
        Compiler::compile_with_config(&pp, b"square", &circuit, config)
            .expect("Circuit should compile");

    assert!(prover.config().statistical_zk);

    let msg = "Circuit with statistical zk should pass";
    let pi = vec![BlsScalar::one()];
    let circuit = SquareCircuit::new(-BlsScalar::one());
    check_satisfied_circuit(&prover, &verifier, &pi, &circuit, rng, msg);
}

/// Backend whose device is never available
struct OfflineAccelerator;

impl OfflineAccelerator {
    fn unavailable<T>() -> Result<T, Error> {
        Err(Error::AcceleratorUnavailable {
            backend: "offline",
            reason: "no device".into(),
        })
    }
}

impl Accelerator for OfflineAccelerator {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn representation(&self) -> Representation {
        Representation::Montgomery
    }

    fn commit(
        &self,
        _: &CommitKey,
        _: &[BlsScalar],
        _: Basis,
    ) -> Result<Commitment, Error> {
        Self::unavailable()
    }

    fn open(
        &self,
        _: &CommitKey,
        _: &[BlsScalar],
        _: &BlsScalar,
        _: Basis,
    ) -> Result<OpeningProof, Error> {
        Self::unavailable()
    }

    fn ntt_forward(
        &self,
        _: Vec<BlsScalar>,
        _: &EvaluationDomain,
    ) -> Result<Vec<BlsScalar>, Error> {
        Self::unavailable()
    }

    fn ntt_inverse(
        &self,
        _: Vec<BlsScalar>,
        _: &EvaluationDomain,
    ) -> Result<Vec<BlsScalar>, Error> {
        Self::unavailable()
    }

    fn pointwise_multiply(
        &self,
        _: &[BlsScalar],
        _: &[BlsScalar],
    ) -> Result<Vec<BlsScalar>, Error> {
        Self::unavailable()
    }
}

#[test]
fn accelerated_proofs_verify() {
    let rng = &mut StdRng::seed_from_u64(0xacce);
    let (prover, verifier) =
        common::setup(1 << 6, rng, b"square", &SquareCircuit::default());

    let pi = vec![BlsScalar::one()];
    let circuit = SquareCircuit::new(-BlsScalar::one());

    let msg = "Proof of the cpu accelerator should pass";
    let cpu = prover.clone().with_accelerator(Arc::new(CpuAccelerator));
    check_satisfied_circuit(&cpu, &verifier, &pi, &circuit, rng, msg);

    let msg = "Proof falling back to the cpu should pass";
    let offline = prover.with_accelerator(Arc::new(OfflineAccelerator));
    check_satisfied_circuit(&offline, &verifier, &pi, &circuit, rng, msg);
}
