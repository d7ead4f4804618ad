// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Fiat-Shamir transcript built on the algebraic hash.
//!
//! Challenges are declared upfront with a fixed order. Each challenge value
//! is `Sum(id, previous, bindings...)`, where `previous` is the value of the
//! challenge declared right before it (absent for the first one).

use dusk_bls12_381::BlsScalar;
use tracing::error;

use crate::error::Error;
use crate::hash::Hasher;

/// Identifier of the `γ` challenge
pub const CID_GAMMA: BlsScalar = BlsScalar::from_raw([
    0x4860650c61f98fc1,
    0xd4097e072eff8067,
    0xb197428bfba9da76,
    0x1ad4faffbce5b5ea,
]);

/// Identifier of the `β` challenge
pub const CID_BETA: BlsScalar = BlsScalar::from_raw([
    0x477b8fedf8b78475,
    0xd5444cbe8e0aeb11,
    0xbf778f5afd6a488c,
    0x2910666e582b12e1,
]);

/// Identifier of the `α` challenge
pub const CID_ALPHA: BlsScalar = BlsScalar::from_raw([
    0x2275bc05bc004846,
    0x0d35e156f37d5a7e,
    0x36305d8bc6f88763,
    0x6dfc21ac0c8c2db0,
]);

/// Identifier of the `ζ` challenge
pub const CID_ZETA: BlsScalar = BlsScalar::from_raw([
    0xa177b6b3305e166a,
    0x6d410a1bb483b724,
    0x3c90de41e658b5f4,
    0x5659e1c4dc141bfd,
]);

/// Domain separator of the commitment hashed into the public inputs
pub const PREFIX_BSB: BlsScalar = BlsScalar::from_raw([
    0xca6ed46766aca2a8,
    0x318968180fa604b0,
    0xd03d757d9807c1cf,
    0x384b4c6f163168d0,
]);

/// Name of the permutation challenge `γ`
pub const GAMMA: &str = "gamma";
/// Name of the permutation challenge `β`
pub const BETA: &str = "beta";
/// Name of the quotient challenge `α`
pub const ALPHA: &str = "alpha";
/// Name of the evaluation challenge `ζ`
pub const ZETA: &str = "zeta";

#[derive(Debug, Clone)]
struct Challenge {
    name: &'static str,
    id: BlsScalar,
    bindings: Vec<BlsScalar>,
    value: Option<BlsScalar>,
}

/// Ordered set of named challenges.
///
/// A transcript is created for a single proof generation or verification
/// and dropped afterwards.
#[derive(Debug, Clone)]
pub struct Transcript {
    hasher: Hasher,
    challenges: Vec<Challenge>,
}

impl Transcript {
    /// Declare the challenges `(name, id)` in their derivation order.
    pub fn new(hasher: Hasher, declared: &[(&'static str, BlsScalar)]) -> Self {
        let challenges = declared
            .iter()
            .map(|(name, id)| Challenge {
                name: *name,
                id: *id,
                bindings: Vec::new(),
                value: None,
            })
            .collect();

        Self { hasher, challenges }
    }

    /// Transcript of a PLONK proof: `γ, β, α, ζ`.
    pub fn plonk(hasher: Hasher) -> Self {
        Self::new(
            hasher,
            &[
                (GAMMA, CID_GAMMA),
                (BETA, CID_BETA),
                (ALPHA, CID_ALPHA),
                (ZETA, CID_ZETA),
            ],
        )
    }

    /// Transcript with the single folding challenge `γ` of a batch opening.
    pub fn folding(hasher: Hasher) -> Self {
        Self::new(hasher, &[(GAMMA, CID_GAMMA)])
    }

    /// Hasher the challenges are derived with
    pub fn hasher(&self) -> &Hasher {
        &self.hasher
    }

    fn position(&self, name: &str) -> Result<usize, Error> {
        self.challenges
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| violation(Error::UnknownChallenge(name.into())))
    }

    /// Append `values` to the pending inputs of `name`.
    pub fn bind(
        &mut self,
        name: &str,
        values: &[BlsScalar],
    ) -> Result<(), Error> {
        let pos = self.position(name)?;
        let challenge = &mut self.challenges[pos];

        if challenge.value.is_some() {
            return Err(violation(Error::ChallengeAlreadyComputed(
                name.into(),
            )));
        }

        challenge.bindings.extend_from_slice(values);

        Ok(())
    }

    /// Derive and freeze the value of `name`.
    ///
    /// Reading an already computed challenge returns the frozen value.
    pub fn compute_challenge(
        &mut self,
        name: &str,
    ) -> Result<BlsScalar, Error> {
        let pos = self.position(name)?;

        if let Some(value) = self.challenges[pos].value {
            return Ok(value);
        }

        let previous = match pos {
            0 => None,
            _ => match self.challenges[pos - 1].value {
                Some(v) => Some(v),
                None => {
                    return Err(violation(
                        Error::PreviousChallengeNotComputed(name.into()),
                    ))
                }
            },
        };

        let challenge = &self.challenges[pos];
        let inputs = core::iter::once(&challenge.id)
            .chain(previous.iter())
            .chain(challenge.bindings.iter());
        let value = self.hasher.sum(inputs);

        self.challenges[pos].value = Some(value);

        Ok(value)
    }

    /// Frozen value of `name`, if computed
    pub fn challenge(&self, name: &str) -> Option<BlsScalar> {
        self.challenges
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.value)
    }
}

fn violation(err: Error) -> Error {
    error!(%err, "transcript protocol violation");
    err
}
