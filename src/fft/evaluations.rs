// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Vectors of field elements tagged with the basis and layout they are
//! expressed in.

use core::ops::Index;

use dusk_bls12_381::BlsScalar;

use super::domain::EvaluationDomain;
use super::polynomial::Polynomial;
use crate::error::Error;
use crate::util::bit_reverse_permutation;

/// Basis a vector is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basis {
    /// Monomial coefficients
    Canonical,
    /// Evaluations over the domain
    Lagrange,
    /// Evaluations over a shifted copy of the domain
    LagrangeCoset,
}

/// Ordering of the entries of a vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Natural order
    Regular,
    /// Index `i` stored at `bitrev(i)`
    BitReversed,
}

/// Basis and layout of a vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Form {
    /// Basis of the values
    pub basis: Basis,
    /// Ordering of the values
    pub layout: Layout,
}

impl Form {
    /// Monomial coefficients, natural order
    pub const CANONICAL: Form = Form {
        basis: Basis::Canonical,
        layout: Layout::Regular,
    };

    /// Domain evaluations, natural order
    pub const LAGRANGE: Form = Form {
        basis: Basis::Lagrange,
        layout: Layout::Regular,
    };

    /// Coset evaluations, natural order
    pub const LAGRANGE_COSET: Form = Form {
        basis: Basis::LagrangeCoset,
        layout: Layout::Regular,
    };

    /// Coset evaluations, bit-reversed order
    pub const LAGRANGE_COSET_BIT_REVERSED: Form = Form {
        basis: Basis::LagrangeCoset,
        layout: Layout::BitReversed,
    };
}

/// Stores a vector together with its [`Form`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Evaluations {
    /// The tagged values
    pub evals: Vec<BlsScalar>,
    form: Form,
}

impl Evaluations {
    /// Tag `evals` with `form`.
    pub fn new(evals: Vec<BlsScalar>, form: Form) -> Self {
        Self { evals, form }
    }

    /// Domain evaluations in natural order
    pub fn lagrange(evals: Vec<BlsScalar>) -> Self {
        Self::new(evals, Form::LAGRANGE)
    }

    /// Form of the values
    pub fn form(&self) -> Form {
        self.form
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.evals.len()
    }

    /// Whether there are no values
    pub fn is_empty(&self) -> bool {
        self.evals.is_empty()
    }

    /// Borrow the values, checking they are in `form`.
    pub fn expect(&self, form: Form) -> Result<&[BlsScalar], Error> {
        match self.form == form {
            true => Ok(&self.evals),
            false => Err(Error::InvalidForm {
                expected: form,
                found: self.form,
            }),
        }
    }

    /// Reorder the values into natural order.
    pub fn into_regular(mut self) -> Self {
        if self.form.layout == Layout::BitReversed {
            bit_reverse_permutation(&mut self.evals);
            self.form.layout = Layout::Regular;
        }
        self
    }

    /// Interpolate domain evaluations into coefficients.
    pub fn interpolate(
        self,
        domain: &EvaluationDomain,
    ) -> Result<Polynomial, Error> {
        self.expect(Form::LAGRANGE)?;

        let mut evals = self.evals;
        domain.ifft_in_place(&mut evals);

        Ok(Polynomial::from_coefficients_vec(evals))
    }

    /// Interpolate evaluations over `shift·H` into coefficients.
    pub fn coset_interpolate(
        self,
        domain: &EvaluationDomain,
        shift: &BlsScalar,
    ) -> Result<Polynomial, Error> {
        let evals = self.expect(Form::LAGRANGE_COSET)?;
        let coeffs = domain.coset_ifft(evals, shift);

        Ok(Polynomial::from_coefficients_vec(coeffs))
    }
}

impl Index<usize> for Evaluations {
    type Output = BlsScalar;

    fn index(&self, index: usize) -> &BlsScalar {
        &self.evals[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_form_is_reported() {
        let evals = Evaluations::new(
            vec![BlsScalar::one(); 4],
            Form::LAGRANGE_COSET_BIT_REVERSED,
        );

        assert_eq!(
            evals.expect(Form::LAGRANGE_COSET),
            Err(Error::InvalidForm {
                expected: Form::LAGRANGE_COSET,
                found: Form::LAGRANGE_COSET_BIT_REVERSED,
            })
        );

        let domain = EvaluationDomain::new(4).unwrap();
        assert!(evals.clone().interpolate(&domain).is_err());

        let regular = evals.into_regular();
        assert_eq!(regular.form(), Form::LAGRANGE_COSET);
    }

    #[test]
    fn interpolation_of_constant_evaluations() {
        let domain = EvaluationDomain::new(8).unwrap();
        let seven = BlsScalar::from(7u64);
        let evals = Evaluations::lagrange(vec![seven; 8]);

        let poly = evals.interpolate(&domain).unwrap();

        assert_eq!(poly.coeffs, vec![seven]);
    }
}
