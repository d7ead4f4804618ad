// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Proving system

pub(crate) mod blinding;
pub(crate) mod deferred;
pub(crate) mod linearization;
pub(crate) mod pipeline;
pub(crate) mod proof;
pub(crate) mod quotient;
pub(crate) mod widget;

pub use deferred::DeferredCheck;
pub use proof::Proof;
pub use widget::{ProverKey, VerifierKey};
