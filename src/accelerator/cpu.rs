// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_bls12_381::BlsScalar;
use rayon::prelude::*;

use super::{Accelerator, Representation};
use crate::commitment_scheme::{CommitKey, Commitment, OpeningProof};
use crate::error::Error;
use crate::fft::{Basis, EvaluationDomain, Form, Layout, Polynomial};

/// Threaded native backend working on standard scalars.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuAccelerator;

impl Accelerator for CpuAccelerator {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn representation(&self) -> Representation {
        Representation::Standard
    }

    fn commit(
        &self,
        key: &CommitKey,
        scalars: &[BlsScalar],
        basis: Basis,
    ) -> Result<Commitment, Error> {
        key.commit_in(scalars, basis)
    }

    fn open(
        &self,
        key: &CommitKey,
        coeffs: &[BlsScalar],
        point: &BlsScalar,
        basis: Basis,
    ) -> Result<OpeningProof, Error> {
        if basis != Basis::Canonical {
            return Err(Error::InvalidForm {
                expected: Form::CANONICAL,
                found: Form {
                    basis,
                    layout: Layout::Regular,
                },
            });
        }

        key.open(&Polynomial::from_coefficients_slice(coeffs), point)
    }

    fn ntt_forward(
        &self,
        mut values: Vec<BlsScalar>,
        domain: &EvaluationDomain,
    ) -> Result<Vec<BlsScalar>, Error> {
        domain.fft_in_place(&mut values);
        Ok(values)
    }

    fn ntt_inverse(
        &self,
        mut values: Vec<BlsScalar>,
        domain: &EvaluationDomain,
    ) -> Result<Vec<BlsScalar>, Error> {
        domain.ifft_in_place(&mut values);
        Ok(values)
    }

    fn pointwise_multiply(
        &self,
        a: &[BlsScalar],
        b: &[BlsScalar],
    ) -> Result<Vec<BlsScalar>, Error> {
        if a.len() != b.len() {
            return Err(Error::MismatchedLengths(a.len(), b.len()));
        }

        Ok(a.par_iter().zip(b.par_iter()).map(|(a, b)| a * b).collect())
    }
}
