// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! In pairing-based SNARKs like PLONK, we need to calculate
//! a quotient polynomial over a target polynomial with roots
//! at distinct points associated with each constraint of the
//! constraint system. In order to be efficient, we choose these
//! roots to be the powers of a 2^n root of unity in the field.
//! This allows us to perform polynomial operations in O(n)
//! by performing an O(n log n) FFT over such a domain.

use core::ops::{Add, Mul, Sub};

use dusk_bls12_381::{BlsScalar, G1Projective};
use rayon::prelude::*;

use crate::error::Error;
use crate::util::{batch_inversion, bit_reverse_permutation, pow};

/// Multiplicative generator of `Fr^*`, also the quotient coset shift
pub const GENERATOR: BlsScalar = BlsScalar::from_raw([7, 0, 0, 0]);

/// `r - 1 = 2^S · t` with `t` odd
pub const TWO_ADACITY: u32 = 32;

/// Limbs of the odd factor `t` of `r - 1`
const TWO_ADIC_COFACTOR: [u64; 4] = [
    0xfffe5bfeffffffff,
    0x09a1d80553bda402,
    0x299d7d483339d808,
    0x0000000073eda753,
];

/// Below this size a butterfly stage isn't worth splitting across threads.
const PARALLEL_THRESHOLD: usize = 1 << 10;

/// Values an FFT can run over: scalars, and G1 points for the Lagrange SRS.
pub trait FftElement:
    Copy
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<BlsScalar, Output = Self>
{
}

impl FftElement for BlsScalar {}
impl FftElement for G1Projective {}

/// Defines a domain over which finite field (I)FFTs can be performed. Works
/// only for fields that have a large multiplicative subgroup of size that is
/// a power-of-2.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EvaluationDomain {
    /// The size of the domain.
    pub(crate) size: u64,
    /// `log_2(self.size)`.
    pub(crate) log_size_of_group: u32,
    /// Size of the domain as a field element.
    pub(crate) size_as_field_element: BlsScalar,
    /// Inverse of the size in the field.
    pub(crate) size_inv: BlsScalar,
    /// A generator of the subgroup.
    pub(crate) group_gen: BlsScalar,
    /// Inverse of the generator of the subgroup.
    pub(crate) group_gen_inv: BlsScalar,
}

impl EvaluationDomain {
    /// Construct a domain that is large enough for evaluations of a
    /// polynomial having `num_coeffs` coefficients.
    pub fn new(num_coeffs: usize) -> Result<Self, Error> {
        // Compute the size of our evaluation domain
        let size = num_coeffs.max(1).next_power_of_two() as u64;
        let log_size_of_group = size.trailing_zeros();

        if log_size_of_group > TWO_ADACITY {
            return Err(Error::InvalidEvalDomainSize {
                log_size_of_group,
                adacity: TWO_ADACITY,
            });
        }

        // Compute the generator for the multiplicative subgroup.
        // It should be 2^(log_size_of_group) root of unity.
        let mut group_gen = GENERATOR.pow(&TWO_ADIC_COFACTOR);
        for _ in log_size_of_group..TWO_ADACITY {
            group_gen = group_gen.square();
        }

        // non-zero elements of a prime field
        let size_as_field_element = BlsScalar::from(size);
        let size_inv =
            size_as_field_element.invert().unwrap_or(BlsScalar::zero());
        let group_gen_inv = group_gen.invert().unwrap_or(BlsScalar::zero());

        Ok(EvaluationDomain {
            size,
            log_size_of_group,
            size_as_field_element,
            size_inv,
            group_gen,
            group_gen_inv,
        })
    }

    /// Return the size of `self`.
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// `log_2` of the size
    pub fn log_size(&self) -> u32 {
        self.log_size_of_group
    }

    /// Generator `ω` of the subgroup
    pub fn group_gen(&self) -> BlsScalar {
        self.group_gen
    }

    /// Inverse of `ω`
    pub fn group_gen_inv(&self) -> BlsScalar {
        self.group_gen_inv
    }

    /// `n^{-1}`
    pub fn size_inv(&self) -> BlsScalar {
        self.size_inv
    }

    /// `ω^i`
    pub fn element(&self, i: usize) -> BlsScalar {
        pow(&self.group_gen, i as u64)
    }

    /// All the elements of the group, `ω^0..ω^{n-1}`
    pub fn elements(&self) -> Vec<BlsScalar> {
        let mut elements = Vec::with_capacity(self.size());
        let mut e = BlsScalar::one();
        for _ in 0..self.size() {
            elements.push(e);
            e *= self.group_gen;
        }
        elements
    }

    /// Compute a FFT over `coeffs`, zero padded to the domain size.
    pub fn fft(&self, coeffs: &[BlsScalar]) -> Vec<BlsScalar> {
        let mut evals = coeffs.to_vec();
        self.fft_in_place(&mut evals);
        evals
    }

    /// Compute a FFT in place, resizing `coeffs` to the domain size.
    pub fn fft_in_place<T>(&self, coeffs: &mut Vec<T>)
    where
        T: FftElement + Default,
    {
        coeffs.resize(self.size(), T::default());
        radix2_fft(coeffs, self.group_gen, self.log_size_of_group);
    }

    /// Compute an IFFT over `evals`.
    pub fn ifft(&self, evals: &[BlsScalar]) -> Vec<BlsScalar> {
        let mut coeffs = evals.to_vec();
        self.ifft_in_place(&mut coeffs);
        coeffs
    }

    /// Compute an IFFT in place.
    pub fn ifft_in_place<T>(&self, evals: &mut Vec<T>)
    where
        T: FftElement + Default,
    {
        evals.resize(self.size(), T::default());
        radix2_fft(evals, self.group_gen_inv, self.log_size_of_group);

        let size_inv = self.size_inv;
        if evals.len() >= PARALLEL_THRESHOLD {
            evals.par_iter_mut().for_each(|e| *e = *e * size_inv);
        } else {
            evals.iter_mut().for_each(|e| *e = *e * size_inv);
        }
    }

    /// Evaluate the polynomial over the coset `shift·H`.
    pub fn coset_fft(
        &self,
        coeffs: &[BlsScalar],
        shift: &BlsScalar,
    ) -> Vec<BlsScalar> {
        let mut evals = coeffs.to_vec();
        distribute_powers(&mut evals, shift);
        self.fft_in_place(&mut evals);
        evals
    }

    /// Interpolate evaluations over the coset `shift·H`.
    pub fn coset_ifft(
        &self,
        evals: &[BlsScalar],
        shift: &BlsScalar,
    ) -> Vec<BlsScalar> {
        let mut coeffs = evals.to_vec();
        self.ifft_in_place(&mut coeffs);

        let shift_inv = shift.invert().unwrap_or(BlsScalar::zero());
        distribute_powers(&mut coeffs, &shift_inv);
        coeffs
    }

    /// `τ^n - 1`
    pub fn evaluate_vanishing_polynomial(&self, tau: &BlsScalar) -> BlsScalar {
        pow(tau, self.size) - BlsScalar::one()
    }

    /// `L_i(τ) = ω^i (τ^n - 1) / (n (τ - ω^i))`
    ///
    /// Returns `1` or `0` when `τ` is a domain element.
    pub fn evaluate_lagrange(&self, i: usize, tau: &BlsScalar) -> BlsScalar {
        let omega_i = self.element(i);
        let z_h = self.evaluate_vanishing_polynomial(tau);

        if z_h == BlsScalar::zero() {
            return match tau == &omega_i {
                true => BlsScalar::one(),
                false => BlsScalar::zero(),
            };
        }

        let den = self.size_as_field_element * (tau - omega_i);
        omega_i * z_h * den.invert().unwrap_or(BlsScalar::zero())
    }

    #[allow(clippy::needless_range_loop)]
    /// Evaluate all the lagrange polynomials defined by this domain at the
    /// point `tau`.
    pub fn evaluate_all_lagrange_coefficients(
        &self,
        tau: BlsScalar,
    ) -> Vec<BlsScalar> {
        // Evaluate all Lagrange polynomials
        let size = self.size as usize;
        let t_size = pow(&tau, self.size);
        let one = BlsScalar::one();
        if t_size == BlsScalar::one() {
            let mut u = vec![BlsScalar::zero(); size];
            let mut omega_i = one;
            for i in 0..size {
                if omega_i == tau {
                    u[i] = one;
                    break;
                }
                omega_i *= &self.group_gen;
            }
            u
        } else {
            let mut l = (t_size - one) * self.size_inv;
            let mut r = one;
            let mut u = vec![BlsScalar::zero(); size];
            let mut ls = vec![BlsScalar::zero(); size];
            for i in 0..size {
                u[i] = tau - r;
                ls[i] = l;
                l *= &self.group_gen;
                r *= &self.group_gen;
            }

            batch_inversion(u.as_mut_slice());

            u.iter_mut().zip(ls).for_each(|(tau_minus_r, l)| {
                *tau_minus_r = l * *tau_minus_r;
            });

            u
        }
    }
}

/// Multiply the `i`-th coefficient by `g^i`.
pub(crate) fn distribute_powers(coeffs: &mut [BlsScalar], g: &BlsScalar) {
    let mut pow = BlsScalar::one();
    coeffs.iter_mut().for_each(|c| {
        *c *= pow;
        pow *= g;
    });
}

/// In-place radix-2 Cooley-Tukey transform with `omega` of order `2^log_n`.
pub(crate) fn radix2_fft<T: FftElement>(
    a: &mut [T],
    omega: BlsScalar,
    log_n: u32,
) {
    let n = a.len();
    debug_assert_eq!(n, 1 << log_n);

    bit_reverse_permutation(a);

    let mut m = 1;
    for _ in 0..log_n {
        let w_m = pow(&omega, (n / (2 * m)) as u64);

        let mut twiddles = Vec::with_capacity(m);
        let mut w = BlsScalar::one();
        for _ in 0..m {
            twiddles.push(w);
            w *= w_m;
        }

        let butterfly = |chunk: &mut [T]| {
            let (lo, hi) = chunk.split_at_mut(m);
            lo.iter_mut().zip(hi.iter_mut()).zip(twiddles.iter()).for_each(
                |((u, v), w)| {
                    let t = *v * *w;
                    *v = *u - t;
                    *u = *u + t;
                },
            );
        };

        if n >= PARALLEL_THRESHOLD {
            a.par_chunks_mut(2 * m).for_each(butterfly);
        } else {
            a.chunks_mut(2 * m).for_each(butterfly);
        }

        m *= 2;
    }
}
