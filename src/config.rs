// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Runtime configuration of the hash and the prover.

use dusk_bytes::{DeserializableSlice, Serializable};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Parameters of the Poseidon2 permutation.
///
/// The round keys are derived from `seed`, so two parties using the same
/// configuration always derive bit-identical permutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// State width `t`
    pub width: usize,
    /// Full rounds `Rf`, split evenly around the partial rounds
    pub full_rounds: usize,
    /// Partial rounds `Rp`
    pub partial_rounds: usize,
    /// Domain separation seed of the round keys
    pub seed: String,
}

impl HashConfig {
    /// Seed of the protocol hash
    pub const SEED: &'static str = "EON_POSEIDON2_HASH_SEED";

    pub(crate) fn to_var_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 * u64::SIZE + self.seed.len());

        bytes.extend((self.width as u64).to_bytes());
        bytes.extend((self.full_rounds as u64).to_bytes());
        bytes.extend((self.partial_rounds as u64).to_bytes());
        bytes.extend((self.seed.len() as u64).to_bytes());
        bytes.extend(self.seed.as_bytes());

        bytes
    }

    /// Read a configuration written by `to_var_bytes`, advancing `buf`.
    pub(crate) fn from_reader(buf: &mut &[u8]) -> Result<Self, Error> {
        let width = u64::from_reader(buf)? as usize;
        let full_rounds = u64::from_reader(buf)? as usize;
        let partial_rounds = u64::from_reader(buf)? as usize;
        let len = u64::from_reader(buf)? as usize;

        if buf.len() < len {
            return Err(Error::NotEnoughBytes);
        }
        let (seed, rest) = buf.split_at(len);
        let seed = String::from_utf8(seed.to_vec())
            .map_err(|_| Error::BytesError(dusk_bytes::Error::InvalidData))?;
        *buf = rest;

        Ok(Self {
            width,
            full_rounds,
            partial_rounds,
            seed,
        })
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            width: 2,
            full_rounds: 8,
            partial_rounds: 56,
            seed: Self::SEED.into(),
        }
    }
}

/// Options of a proof generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// Carry random values across the quotient shards boundaries
    pub statistical_zk: bool,
    /// Hash used by the transcript
    pub hash: HashConfig,
}

impl ProverConfig {
    /// Parse a configuration from its TOML representation.
    ///
    /// Missing keys take their default value.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
