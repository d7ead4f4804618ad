// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_bls12_381::BlsScalar;

/// Returns a vector of BlsScalars of increasing powers of x from x^0 to x^d.
pub(crate) fn powers_of(
    scalar: &BlsScalar,
    max_degree: usize,
) -> Vec<BlsScalar> {
    let mut powers = Vec::with_capacity(max_degree + 1);
    powers.push(BlsScalar::one());
    for i in 1..=max_degree {
        powers.push(powers[i - 1] * scalar);
    }
    powers
}

/// `x^e` for a small exponent
pub(crate) fn pow(x: &BlsScalar, e: u64) -> BlsScalar {
    x.pow(&[e, 0, 0, 0])
}

/// Reverse the `log_n` least significant bits of `x`
pub(crate) const fn bit_reverse(x: usize, log_n: u32) -> usize {
    if log_n == 0 {
        return 0;
    }
    x.reverse_bits() >> (usize::BITS - log_n)
}

/// Permute `v` into bit-reversed order in place
pub(crate) fn bit_reverse_permutation<T>(v: &mut [T]) {
    let n = v.len();
    let log_n = n.trailing_zeros();
    for i in 0..n {
        let j = bit_reverse(i, log_n);
        if i < j {
            v.swap(i, j);
        }
    }
}

/// Little endian bits of the canonical representation of a scalar
pub(crate) fn scalar_bits(scalar: &BlsScalar) -> [bool; 256] {
    let bytes = scalar.to_bytes();
    let mut bits = [false; 256];
    bits.iter_mut()
        .enumerate()
        .for_each(|(i, b)| *b = (bytes[i >> 3] >> (i & 7)) & 1 == 1);
    bits
}

/// Invert every non-zero element of `v` with a single field inversion.
///
/// Zero entries are left untouched.
pub(crate) fn batch_inversion(v: &mut [BlsScalar]) {
    // Montgomery’s Trick and Fast Implementation of Masked AES
    // Genelle, Prouff and Quisquater
    // Section 3.2

    // First pass: compute [a, ab, abc, ...]
    let mut prod = Vec::with_capacity(v.len());
    let mut tmp = BlsScalar::one();
    for f in v.iter().filter(|f| f != &&BlsScalar::zero()) {
        tmp *= f;
        prod.push(tmp);
    }

    // the product of non-zero elements is non-zero
    tmp = tmp.invert().unwrap_or(BlsScalar::zero());

    // Second pass: iterate backwards to compute inverses
    for (f, s) in v
        .iter_mut()
        .rev()
        .filter(|f| f != &&BlsScalar::zero())
        .zip(prod.into_iter().rev().skip(1).chain(Some(BlsScalar::one())))
    {
        // tmp := tmp * f; f := tmp * s = 1/f
        let new_tmp = tmp * *f;
        *f = tmp * s;
        tmp = new_tmp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_inversion_skips_zeroes() {
        let original: Vec<_> =
            [1u64, 2, 0, 4, 5].iter().map(|x| BlsScalar::from(*x)).collect();
        let mut inverted = original.clone();

        batch_inversion(&mut inverted);

        for (x, x_inv) in original.iter().zip(inverted.iter()) {
            if x == &BlsScalar::zero() {
                assert_eq!(x_inv, &BlsScalar::zero());
            } else {
                assert_eq!(x.invert().unwrap(), *x_inv);
            }
        }
    }

    #[test]
    fn bit_reverse_is_an_involution() {
        let mut v: Vec<usize> = (0..16).collect();

        bit_reverse_permutation(&mut v);
        assert_eq!(&v[..4], &[0, 8, 4, 12]);

        bit_reverse_permutation(&mut v);
        assert_eq!(v, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn powers_match_pow() {
        let x = BlsScalar::from(10u64);
        let powers = powers_of(&x, 20);

        for (i, x_i) in powers.iter().enumerate() {
            assert_eq!(*x_i, pow(&x, i as u64));
        }
    }

    #[test]
    fn bits_are_little_endian() {
        let bits = scalar_bits(&BlsScalar::from(6u64));

        assert_eq!(&bits[..4], &[false, true, true, false]);
        assert!(bits[4..].iter().all(|b| !b));
    }
}
