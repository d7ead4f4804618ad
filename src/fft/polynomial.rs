// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! This module contains an implementation of a polynomial in coefficient form
//! Where each coefficient is represented using a position in the underlying
//! vector.

use core::ops::{Add, AddAssign, Deref, DerefMut, Mul, Neg, Sub, SubAssign};

use dusk_bls12_381::BlsScalar;
use ff::Field;
use rand_core::RngCore;

/// Represents a polynomial in coeffiient form.
#[derive(Debug, Eq, PartialEq, Clone, Default)]
pub struct Polynomial {
    /// The coefficient of `x^i` is stored at location `i` in `self.coeffs`.
    pub coeffs: Vec<BlsScalar>,
}

impl Deref for Polynomial {
    type Target = [BlsScalar];

    fn deref(&self) -> &[BlsScalar] {
        &self.coeffs
    }
}

impl DerefMut for Polynomial {
    fn deref_mut(&mut self) -> &mut [BlsScalar] {
        &mut self.coeffs
    }
}

impl Polynomial {
    /// Returns the zero polynomial.
    pub const fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// Checks if the given polynomial is zero.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
            || self.coeffs.iter().all(|coeff| coeff == &BlsScalar::zero())
    }

    /// Constructs a new polynomial from a list of coefficients.
    pub fn from_coefficients_slice(coeffs: &[BlsScalar]) -> Self {
        Self::from_coefficients_vec(coeffs.to_vec())
    }

    /// Constructs a new polynomial from a list of coefficients.
    pub fn from_coefficients_vec(coeffs: Vec<BlsScalar>) -> Self {
        let mut result = Self { coeffs };
        // While there are zeros at the end of the coefficient vector, pop them
        // off.
        result.truncate_leading_zeros();
        result
    }

    /// Returns the degree of the polynomial.
    pub fn degree(&self) -> usize {
        if self.is_zero() {
            return 0;
        }
        self.coeffs.len() - 1
    }

    fn truncate_leading_zeros(&mut self) {
        while self.coeffs.last().map_or(false, |c| c == &BlsScalar::zero()) {
            self.coeffs.pop();
        }
    }

    /// Evaluates a [`Polynomial`] at a given point in the field.
    pub fn evaluate(&self, point: &BlsScalar) -> BlsScalar {
        // Horners method
        self.coeffs
            .iter()
            .rev()
            .fold(BlsScalar::zero(), |acc, c| acc * point + c)
    }

    /// Outputs a random polynomial of degree `d`
    pub fn rand<R: RngCore>(d: usize, rng: &mut R) -> Self {
        let coeffs = (0..=d).map(|_| BlsScalar::random(&mut *rng)).collect();
        Self::from_coefficients_vec(coeffs)
    }

    /// Divides a [`Polynomial`] by `X - z` using Ruffini's method, dropping
    /// the remainder `p(z)`.
    pub fn ruffini(&self, z: &BlsScalar) -> Self {
        let mut quotient = Vec::with_capacity(self.degree());
        let mut k = BlsScalar::zero();

        // Reverse the results and use Ruffini's method to compute the quotient
        // The coefficients must be reversed as Ruffini's method
        // starts with the leading coefficient, while Polynomials
        // are stored in increasing order i.e. the leading coefficient is the
        // last element
        for coeff in self.coeffs.iter().rev() {
            let t = coeff + k;
            quotient.push(t);
            k = z * t;
        }

        // Pop off the last element, it is the remainder term
        // For PLONK, we only care about perfect factors
        quotient.pop();

        // Reverse the results for storage in the Polynomial struct
        quotient.reverse();
        Polynomial::from_coefficients_vec(quotient)
    }

    /// `Σ scalar_i · p_i`
    pub fn linear_combination<'a, I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (BlsScalar, &'a Polynomial)>,
    {
        let mut acc = Polynomial::zero();
        terms.into_iter().for_each(|(s, p)| acc += (s, p));
        acc
    }
}

impl<'a, 'b> Add<&'a Polynomial> for &'b Polynomial {
    type Output = Polynomial;

    fn add(self, other: &'a Polynomial) -> Polynomial {
        let (long, short) = match self.len() >= other.len() {
            true => (self, other),
            false => (other, self),
        };

        let mut coeffs = long.coeffs.clone();
        coeffs.iter_mut().zip(short.iter()).for_each(|(a, b)| *a += b);

        Polynomial::from_coefficients_vec(coeffs)
    }
}

impl<'a> AddAssign<&'a Polynomial> for Polynomial {
    fn add_assign(&mut self, other: &'a Polynomial) {
        *self += (BlsScalar::one(), other);
    }
}

impl<'a> AddAssign<(BlsScalar, &'a Polynomial)> for Polynomial {
    fn add_assign(&mut self, (f, other): (BlsScalar, &'a Polynomial)) {
        if self.coeffs.len() < other.coeffs.len() {
            self.coeffs.resize(other.coeffs.len(), BlsScalar::zero());
        }
        self.coeffs
            .iter_mut()
            .zip(other.coeffs.iter())
            .for_each(|(a, b)| *a += f * b);
        self.truncate_leading_zeros();
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(mut self) -> Polynomial {
        self.coeffs.iter_mut().for_each(|c| *c = -*c);
        self
    }
}

impl<'a, 'b> Sub<&'a Polynomial> for &'b Polynomial {
    type Output = Polynomial;

    fn sub(self, other: &'a Polynomial) -> Polynomial {
        let mut result = self.clone();
        result -= other;
        result
    }
}

impl<'a> SubAssign<&'a Polynomial> for Polynomial {
    fn sub_assign(&mut self, other: &'a Polynomial) {
        *self += (-BlsScalar::one(), other);
    }
}

impl<'a> Sub<&'a BlsScalar> for &'a Polynomial {
    type Output = Polynomial;

    fn sub(self, constant: &'a BlsScalar) -> Polynomial {
        let mut result = self.clone();
        match result.coeffs.first_mut() {
            Some(c) => *c -= constant,
            None => result.coeffs.push(-constant),
        }
        Polynomial::from_coefficients_vec(result.coeffs)
    }
}

impl<'a, 'b> Mul<&'a BlsScalar> for &'b Polynomial {
    type Output = Polynomial;

    fn mul(self, constant: &'a BlsScalar) -> Polynomial {
        if self.is_zero() || constant == &BlsScalar::zero() {
            return Polynomial::zero();
        }
        let coeffs = self.coeffs.iter().map(|c| c * constant).collect();
        Polynomial::from_coefficients_vec(coeffs)
    }
}
