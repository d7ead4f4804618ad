// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Permutations over Lagrange-bases for Oecumenical Noninteractive
//! arguments of Knowledge (PLONK) is a zero knowledge proof system.
//!
//! This crate implements PLONK over BLS12-381 with KZG10 commitments and a
//! Poseidon2 Fiat-Shamir transcript. Proofs can be checked natively by a
//! [`Verifier`](composer::Verifier) or inside another circuit by a
//! [`VerifierCircuit`](recursion::VerifierCircuit), which leaves the group
//! operations to a [`DeferredCheck`](proof_system::DeferredCheck).
//!
//! ```ignore
//! let (prover, verifier) = Compiler::compile::<MyCircuit>(&pp, b"label")?;
//! let (proof, public_inputs) = prover.prove(&mut rng, &circuit)?;
//!
//! verifier.verify(&proof, &public_inputs)?;
//! ```

// Variables have always the same names in respect to wires.
#![allow(clippy::many_single_char_names)]
// Bool expr are usually easier to read with match statements.
#![allow(clippy::match_bool)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod accelerator;
pub mod commitment_scheme;
pub mod composer;
pub mod config;
pub mod decomposition;
pub mod error;
pub mod fft;
pub mod hash;
pub mod prelude;
pub mod proof_system;
pub mod recursion;
pub mod transcript;

mod util;
