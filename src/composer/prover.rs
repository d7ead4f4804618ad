// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use core::ops;
use std::sync::Arc;

use dusk_bls12_381::BlsScalar;
use dusk_bytes::{DeserializableSlice, Serializable};
use rand_core::{CryptoRng, RngCore};
use tracing::info;

use super::{BsbOracle, Circuit, Composer};
use crate::accelerator::{Accelerator, AcceleratorRouter};
use crate::config::{HashConfig, ProverConfig};
use crate::error::Error;
use crate::hash::Hasher;
use crate::proof_system::pipeline::{self, Blinders};
use crate::proof_system::{Proof, ProverKey, VerifierKey};

/// Turbo Prover with processed keys
#[derive(Debug, Clone)]
pub struct Prover {
    label: Vec<u8>,
    pub(crate) prover_key: Arc<ProverKey>,
    hasher: Hasher,
    config: ProverConfig,
    router: AcceleratorRouter,
}

impl ops::Deref for Prover {
    type Target = ProverKey;

    fn deref(&self) -> &Self::Target {
        &self.prover_key
    }
}

impl Prover {
    pub(crate) fn new(
        label: Vec<u8>,
        prover_key: ProverKey,
        hasher: Hasher,
        config: ProverConfig,
    ) -> Self {
        Self {
            label,
            prover_key: Arc::new(prover_key),
            hasher,
            config,
            router: AcceleratorRouter::cpu(),
        }
    }

    /// Route the heavy operations of the prover to `accelerator`, falling
    /// back to the CPU when it is unavailable
    pub fn with_accelerator(
        mut self,
        accelerator: Arc<dyn Accelerator>,
    ) -> Self {
        self.router = AcceleratorRouter::with_accelerator(accelerator);
        self
    }

    /// Label of the circuit
    pub fn label(&self) -> &[u8] {
        &self.label
    }

    /// Hash of the transcript
    pub fn hasher(&self) -> &Hasher {
        &self.hasher
    }

    /// Options of the proof generation
    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    /// Verifier key of the circuit
    pub fn verifier_key(&self) -> &VerifierKey {
        &self.prover_key.verifier_key
    }

    /// Prove the circuit, returning the proof and the public inputs
    pub fn prove<C, R>(
        &self,
        rng: &mut R,
        circuit: &C,
    ) -> Result<(Proof, Vec<BlsScalar>), Error>
    where
        C: Circuit,
        R: RngCore + CryptoRng,
    {
        let blinders = Blinders::random(rng, self.config.statistical_zk);

        let oracle = BsbOracle::new(
            self.prover_key.clone(),
            self.hasher.clone(),
            blinders.bsb,
        );
        let mut composer = Composer::proving(oracle);

        circuit.circuit(&mut composer)?;
        composer.finalize()?;

        let proof = pipeline::prove(
            &self.prover_key,
            &self.hasher,
            &self.router,
            &composer,
            &blinders,
        )?;

        info!(
            label = %String::from_utf8_lossy(&self.label),
            constraints = composer.constraints(),
            "proof generated"
        );

        Ok((proof, composer.public_input_values()))
    }

    /// Serialize the prover into bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let prover_key = self.prover_key.to_var_bytes();
        let hash = self.config.hash.to_var_bytes();

        let len = self.label.len() + hash.len() + prover_key.len();
        let mut bytes = Vec::with_capacity(2 * u64::SIZE + 1 + len);

        bytes.extend((self.label.len() as u64).to_bytes());
        bytes.extend(self.label.as_slice());
        bytes.push(self.config.statistical_zk as u8);
        bytes.extend(hash);
        bytes.extend((prover_key.len() as u64).to_bytes());
        bytes.extend(prover_key);

        bytes
    }

    /// Attempt to deserialize the prover from bytes generated via
    /// [`Self::to_bytes`]
    ///
    /// The accelerator isn't serialized, the prover routes to the CPU.
    pub fn try_from_bytes<B>(bytes: B) -> Result<Self, Error>
    where
        B: AsRef<[u8]>,
    {
        let mut bytes = bytes.as_ref();

        let label_len = u64::from_reader(&mut bytes)? as usize;
        if bytes.len() < label_len + 1 {
            return Err(Error::NotEnoughBytes);
        }
        let (label, rest) = bytes.split_at(label_len);
        let (statistical_zk, mut bytes) = rest.split_at(1);

        let hash = HashConfig::from_reader(&mut bytes)?;

        let prover_key_len = u64::from_reader(&mut bytes)? as usize;
        if bytes.len() != prover_key_len {
            return Err(Error::NotEnoughBytes);
        }
        let prover_key = ProverKey::from_slice(bytes)?;

        let config = ProverConfig {
            statistical_zk: statistical_zk[0] != 0,
            hash,
        };
        let hasher = Hasher::from_config(&config.hash)?;

        Ok(Self::new(label.to_vec(), prover_key, hasher, config))
    }
}
