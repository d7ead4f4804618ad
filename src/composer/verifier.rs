// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_bls12_381::BlsScalar;
use dusk_bytes::{DeserializableSlice, Serializable};
use tracing::{debug, info};

use crate::commitment_scheme::OpeningKey;
use crate::config::HashConfig;
use crate::error::Error;
use crate::hash::Hasher;
use crate::proof_system::{DeferredCheck, Proof, VerifierKey};

/// Verify proofs of a given circuit
#[derive(Debug, Clone)]
pub struct Verifier {
    label: Vec<u8>,
    verifier_key: VerifierKey,
    opening_key: OpeningKey,
    hash: HashConfig,
    hasher: Hasher,
}

impl Verifier {
    pub(crate) fn new(
        label: Vec<u8>,
        verifier_key: VerifierKey,
        opening_key: OpeningKey,
        hash: HashConfig,
    ) -> Result<Self, Error> {
        let hasher = Hasher::from_config(&hash)?;

        Ok(Self {
            label,
            verifier_key,
            opening_key,
            hash,
            hasher,
        })
    }

    /// Label of the circuit
    pub fn label(&self) -> &[u8] {
        &self.label
    }

    /// Key of the verified circuit
    pub fn verifier_key(&self) -> &VerifierKey {
        &self.verifier_key
    }

    /// Key checking the openings
    pub fn opening_key(&self) -> &OpeningKey {
        &self.opening_key
    }

    /// Hash of the transcript
    pub fn hasher(&self) -> &Hasher {
        &self.hasher
    }

    /// Serialize the verifier into bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let hash = self.hash.to_var_bytes();

        let mut bytes = Vec::with_capacity(
            u64::SIZE
                + self.label.len()
                + VerifierKey::SIZE
                + OpeningKey::SIZE
                + hash.len(),
        );

        bytes.extend((self.label.len() as u64).to_bytes());
        bytes.extend(self.label.as_slice());
        bytes.extend(self.verifier_key.to_bytes());
        bytes.extend(self.opening_key.to_bytes());
        bytes.extend(hash);

        bytes
    }

    /// Attempt to deserialize the verifier from bytes generated via
    /// [`Self::to_bytes`]
    pub fn try_from_bytes<B>(bytes: B) -> Result<Self, Error>
    where
        B: AsRef<[u8]>,
    {
        let mut bytes = bytes.as_ref();

        let label_len = u64::from_reader(&mut bytes)? as usize;
        if bytes.len() < label_len {
            return Err(Error::NotEnoughBytes);
        }
        let (label, mut bytes) = bytes.split_at(label_len);

        let verifier_key = VerifierKey::from_reader(&mut bytes)?;
        let opening_key = OpeningKey::from_reader(&mut bytes)?;
        let hash = HashConfig::from_reader(&mut bytes)?;

        if !bytes.is_empty() {
            return Err(Error::BytesError(dusk_bytes::Error::InvalidData));
        }

        Self::new(label.to_vec(), verifier_key, opening_key, hash)
    }

    /// Verify a generated proof
    pub fn verify(
        &self,
        proof: &Proof,
        public_inputs: &[BlsScalar],
    ) -> Result<(), Error> {
        let result = proof.verify(
            &self.verifier_key,
            &self.opening_key,
            &self.hasher,
            public_inputs,
        );

        match &result {
            Ok(()) => info!(
                label = %String::from_utf8_lossy(&self.label),
                "proof verified"
            ),
            Err(err) => debug!(%err, "proof rejected"),
        }

        result
    }

    /// Check every scalar relation of `proof`, returning the group work
    /// left to discharge with [`DeferredCheck::discharge`]
    pub fn deferred_check(
        &self,
        proof: &Proof,
        public_inputs: &[BlsScalar],
    ) -> Result<DeferredCheck, Error> {
        proof.deferred_check(&self.verifier_key, &self.hasher, public_inputs)
    }
}
