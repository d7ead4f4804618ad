// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Implementation of the KZG10 polynomial commitment scheme.

pub(crate) mod commitment;
pub(crate) mod key;
pub(crate) mod proof;
pub(crate) mod srs;

pub use commitment::Commitment;
pub use key::{CommitKey, OpeningKey};
pub use proof::{BatchOpeningProof, OpeningProof};
pub use srs::PublicParameters;

pub(crate) use key::msm;
pub(crate) use proof::{fold_polynomials, folding_challenge};
