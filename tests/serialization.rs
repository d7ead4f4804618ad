// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_bytes::Serializable;
use eon_plonk::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod common;

// Implements a circuit that checks a + b = c where c is a PI
#[derive(Debug, Default)]
pub struct SumCircuit {
    a: BlsScalar,
    b: BlsScalar,
}

impl Circuit for SumCircuit {
    fn circuit(&self, composer: &mut Composer) -> Result<(), Error> {
        let a = composer.append_witness(self.a);
        let b = composer.append_witness(self.b);
        let c = composer.append_public(self.a + self.b);

        let constraint = Constraint::new().left(1).right(1).a(a).b(b);
        let sum = composer.gate_add(constraint);
        composer.assert_equal(sum, c);

        Ok(())
    }
}

#[test]
fn prover_and_verifier_bytes() {
    let rng = &mut StdRng::seed_from_u64(0xb17e);
    let (prover, verifier) =
        common::setup(1 << 6, rng, b"sum", &SumCircuit::default());

    let prover_bytes = prover.to_bytes();
    let verifier_bytes = verifier.to_bytes();

    let prover_p = Prover::try_from_bytes(&prover_bytes)
        .expect("Prover bytes should deserialize");
    let verifier_p = Verifier::try_from_bytes(&verifier_bytes)
        .expect("Verifier bytes should deserialize");

    assert_eq!(prover_p.label(), b"sum");
    assert_eq!(prover_p.config(), prover.config());
    assert_eq!(prover_p.verifier_key(), prover.verifier_key());
    assert_eq!(prover_p.to_bytes(), prover_bytes);
    assert_eq!(verifier_p.label(), b"sum");
    assert_eq!(verifier_p.verifier_key(), verifier.verifier_key());
    assert_eq!(verifier_p.to_bytes(), verifier_bytes);

    let circuit = SumCircuit {
        a: BlsScalar::from(20u64),
        b: BlsScalar::from(22u64),
    };
    let (proof, pi) = prover_p
        .prove(rng, &circuit)
        .expect("Prover for valid circuit shouldn't fail");
    assert_eq!(pi, vec![BlsScalar::from(42u64)]);

    let bytes = proof.to_bytes();
    assert_eq!(bytes.len(), 736);

    let proof_p = Proof::from_bytes(&bytes).expect("Proof should deserialize");
    assert_eq!(proof_p, proof);

    verifier
        .verify(&proof_p, &pi)
        .expect("Deserialized proof should pass");
    verifier_p
        .verify(&proof, &pi)
        .expect("Deserialized verifier should accept the proof");
}

#[test]
fn malformed_verifier_bytes_are_rejected() {
    let rng = &mut StdRng::seed_from_u64(0xbad);
    let (_, verifier) =
        common::setup(1 << 6, rng, b"sum", &SumCircuit::default());

    let bytes = verifier.to_bytes();

    Verifier::try_from_bytes(&bytes[..bytes.len() - 1])
        .expect_err("Truncated bytes shouldn't deserialize");

    let mut trailing = bytes.clone();
    trailing.push(0);
    Verifier::try_from_bytes(&trailing)
        .expect_err("Trailing bytes shouldn't deserialize");
}

#[test]
fn verifier_key_encoding() {
    let rng = &mut StdRng::seed_from_u64(0x441);
    let (_, verifier) =
        common::setup(1 << 6, rng, b"sum", &SumCircuit::default());

    let vk = verifier.verifier_key();
    let bytes = vk.to_bytes();
    assert_eq!(bytes.len(), 441);
    assert_eq!(VerifierKey::SIZE, 441);

    let vk_p = VerifierKey::from_bytes(&bytes).expect("Key should decode");
    assert_eq!(&vk_p, vk);

    let hasher = Hasher::default();
    assert_eq!(vk_p.address(&hasher), vk.address(&hasher));
}

#[test]
fn public_parameters_checksum() {
    let rng = &mut StdRng::seed_from_u64(0x5a);
    let pp = PublicParameters::setup(1 << 4, rng)
        .expect("Creation of public parameter shouldn't fail");

    let bytes = pp.to_var_bytes();
    let checksum = pp.checksum();

    let pp_p = PublicParameters::from_slice_checked(&bytes, &checksum)
        .expect("Checked bytes should deserialize");
    assert_eq!(pp_p.to_var_bytes(), bytes);

    let mut tampered = bytes.clone();
    let last = tampered.len() - 1;
    tampered[last] ^= 1;

    let err = PublicParameters::from_slice_checked(&tampered, &checksum)
        .expect_err("Tampered bytes shouldn't deserialize");
    assert_eq!(err, Error::SrsChecksumMismatch);
}
