// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Collection of functions needed to use plonk library.
//!
//! Use this as the only import that you need to interact
//! with the principal data structures of the plonk library.

pub use crate::accelerator::{
    Accelerator, AcceleratorRouter, CpuAccelerator, Representation,
};
pub use crate::commitment_scheme::{
    CommitKey, Commitment, OpeningKey, PublicParameters,
};
pub use crate::composer::{
    Circuit, Compiler, Composer, Constraint, Prover, Verifier, Witness,
};
pub use crate::config::{HashConfig, ProverConfig};
pub use crate::error::{Error, ErrorKind};
pub use crate::hash::Hasher;
pub use crate::proof_system::{DeferredCheck, Proof, ProverKey, VerifierKey};
pub use crate::recursion::{RecursiveVerifier, VerifierCircuit};

/// Re-exported [`dusk_bls12_381::BlsScalar`].
pub use dusk_bls12_381::BlsScalar;

/// Re-exported [`dusk_bls12_381::G1Affine`].
pub use dusk_bls12_381::G1Affine;
