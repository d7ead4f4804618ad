// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! The Public Parameters can also be referred to as the Structured Reference
//! String (SRS).

use dusk_bls12_381::{BlsScalar, G1Affine, G1Projective, G2Affine};
use dusk_bytes::Serializable;
use ff::Field;
use rand_core::{CryptoRng, RngCore};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::key::{CommitKey, OpeningKey};
use crate::error::Error;
use crate::util::powers_of;

/// The Public Parameters can also be referred to as the Structured Reference
/// String (SRS). It is available to both the prover and verifier and allows
/// the verifier to efficiently verify and make claims about polynomials up to
/// and including a configured degree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicParameters {
    /// Key used to generate proofs for composed circuits.
    pub(crate) commit_key: CommitKey,
    /// Key used to verify proofs for composed circuits.
    pub(crate) opening_key: OpeningKey,
}

impl PublicParameters {
    /// The maximum degree is the degree of the constraint system + 6,
    /// because adding the blinding factors requires some extra elements
    /// for the SRS: +1 per each wire (we have 3 of them), plus +2 for the
    /// permutation polynomial and +1 for the quotient shards.
    pub const ADDED_BLINDING_DEGREE: usize = 6;

    /// Setup generates the public parameters using a random number
    /// generator. This method will in most cases be used for testing and
    /// exploration. In reality, a `Trusted party` or a `Multiparty
    /// Computation` will be used to generate the SRS. Returns an error if the
    /// configured degree is less than one.
    pub fn setup<R: RngCore + CryptoRng>(
        mut max_degree: usize,
        mut rng: &mut R,
    ) -> Result<PublicParameters, Error> {
        // Cannot commit to constants
        if max_degree < 1 {
            return Err(Error::DegreeIsZero);
        }

        // we update the degree to match the required one (n + 6)
        max_degree += Self::ADDED_BLINDING_DEGREE;

        // Generate the secret scalar x
        let x = BlsScalar::random(&mut rng);

        // Compute powers of x up to and including x^max_degree
        let powers_of_x = powers_of(&x, max_degree);

        // Powers of G1 that will be used to commit to a specified polynomial
        let g = G1Projective::generator();
        let powers_of_g: Vec<G1Projective> =
            powers_of_x.par_iter().map(|s| g * s).collect();

        // Normalise all projective points
        let mut normalised_g = vec![G1Affine::identity(); max_degree + 1];
        G1Projective::batch_normalize(&powers_of_g, &mut normalised_g);

        // Compute x_2 = x*h element and stored cached elements for verifying
        // multiple proofs.
        let h = G2Affine::generator();
        let x_2: G2Affine = (h * x).into();

        debug!(max_degree, "generated public parameters");

        Ok(PublicParameters {
            commit_key: CommitKey::new(normalised_g),
            opening_key: OpeningKey::new(g.into(), h, x_2),
        })
    }

    /// Returns the maximum degree of the public parameters.
    pub fn max_degree(&self) -> usize {
        self.commit_key.max_degree()
    }

    /// Key used to verify openings
    pub fn opening_key(&self) -> &OpeningKey {
        &self.opening_key
    }

    /// Trim truncates the [`PublicParameters`] to allow the prover to commit
    /// to polynomials up to the and including the truncated degree.
    /// Returns the [`CommitKey`] and [`OpeningKey`] used to generate and
    /// verify proofs.
    ///
    /// Returns an error if the truncated degree is larger than the public
    /// parameters configured degree.
    pub fn trim(
        &self,
        truncated_degree: usize,
    ) -> Result<(CommitKey, OpeningKey), Error> {
        let truncated_prover_key =
            self.commit_key.truncate(truncated_degree)?;
        let opening_key = self.opening_key.clone();

        Ok((truncated_prover_key, opening_key))
    }

    /// Serialize the [`PublicParameters`] into bytes.
    ///
    /// The opening key is written first, followed by the monomial basis of
    /// the commit key.
    pub fn to_var_bytes(&self) -> Vec<u8> {
        let mut bytes = self.opening_key.to_bytes().to_vec();
        bytes.extend(self.commit_key.to_var_bytes());

        bytes
    }

    /// Deserialize [`PublicParameters`] from bytes created by
    /// [`PublicParameters::to_var_bytes`].
    pub fn from_slice(bytes: &[u8]) -> Result<PublicParameters, Error> {
        if bytes.len() < OpeningKey::SIZE + G1Affine::SIZE {
            return Err(Error::NotEnoughBytes);
        }

        let (opening_key, commit_key) = bytes.split_at(OpeningKey::SIZE);
        if commit_key.len() % G1Affine::SIZE != 0 {
            return Err(Error::NotEnoughBytes);
        }

        let mut buf = [0u8; OpeningKey::SIZE];
        buf.copy_from_slice(opening_key);

        let opening_key = OpeningKey::from_bytes(&buf)?;
        let commit_key = CommitKey::from_slice(commit_key)?;

        Ok(PublicParameters {
            commit_key,
            opening_key,
        })
    }

    /// SHA-256 of the serialized parameters
    pub fn checksum(&self) -> [u8; 32] {
        checksum(&self.to_var_bytes())
    }

    /// Deserialize [`PublicParameters`] after checking the bytes hash to
    /// `expected`.
    pub fn from_slice_checked(
        bytes: &[u8],
        expected: &[u8; 32],
    ) -> Result<PublicParameters, Error> {
        if &checksum(bytes) != expected {
            return Err(Error::SrsChecksumMismatch);
        }

        Self::from_slice(bytes)
    }
}

fn checksum(bytes: &[u8]) -> [u8; 32] {
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&Sha256::digest(bytes));
    hash
}

#[cfg(test)]
mod test {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_powers_of() {
        let x = BlsScalar::from(10u64);
        let degree = 100u64;

        let powers_of_x = powers_of(&x, degree as usize);

        for (i, x_i) in powers_of_x.iter().enumerate() {
            assert_eq!(*x_i, x.pow(&[i as u64, 0, 0, 0]))
        }

        let last_element = powers_of_x.last().unwrap();
        assert_eq!(*last_element, x.pow(&[degree, 0, 0, 0]))
    }

    #[test]
    fn test_serialize_deserialize_public_parameter() {
        let mut rng = StdRng::seed_from_u64(0xbeef);
        let pp = PublicParameters::setup(1 << 5, &mut rng).unwrap();

        let got_pp = PublicParameters::from_slice(&pp.to_var_bytes())
            .expect("Error on the deserialization");

        assert_eq!(got_pp, pp);
        assert_eq!(got_pp.max_degree(), (1 << 5) + 6);
    }

    #[test]
    fn checksum_guards_the_bytes() {
        let mut rng = StdRng::seed_from_u64(0xfeed);
        let pp = PublicParameters::setup(8, &mut rng).unwrap();
        let sum = pp.checksum();
        let mut bytes = pp.to_var_bytes();

        assert_eq!(
            PublicParameters::from_slice_checked(&bytes, &sum).unwrap(),
            pp
        );

        let last = bytes.len() - 1;
        bytes[last] ^= 1;
        assert_eq!(
            PublicParameters::from_slice_checked(&bytes, &sum),
            Err(Error::SrsChecksumMismatch)
        );
    }

    #[test]
    fn setup_rejects_degree_zero() {
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            PublicParameters::setup(0, &mut rng),
            Err(Error::DegreeIsZero)
        );
    }
}
