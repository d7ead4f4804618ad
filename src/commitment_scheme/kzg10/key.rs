// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Key module contains the utilities and data structures
//! that support the generation and usage of Commit and
//! Opening keys.

use dusk_bls12_381::multiscalar_mul::msm_variable_base;
use dusk_bls12_381::{
    multi_miller_loop, BlsScalar, G1Affine, G1Projective, G2Affine,
    G2Prepared, Gt,
};
use dusk_bytes::{DeserializableSlice, Serializable};
use rayon::prelude::*;

use super::proof::{fold_polynomials, folding_challenge};
use super::{BatchOpeningProof, Commitment, OpeningProof};
use crate::error::Error;
use crate::fft::{Basis, EvaluationDomain, Form, Layout, Polynomial};
use crate::hash::Hasher;
use crate::util::powers_of;

/// CommitKey is used to commit to a polynomial which is bounded by the
/// max_degree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitKey {
    /// Group elements of the form `{ β^i G }`, where `i` ranges from 0 to
    /// `degree`.
    pub(crate) powers_of_g: Vec<G1Affine>,
    /// Commitments to the Lagrange polynomials of a domain, empty until
    /// derived with [`CommitKey::with_lagrange_basis`].
    pub(crate) lagrange_powers_of_g: Vec<G1Affine>,
}

impl CommitKey {
    pub(crate) fn new(powers_of_g: Vec<G1Affine>) -> Self {
        Self {
            powers_of_g,
            lagrange_powers_of_g: Vec::new(),
        }
    }

    /// Serialize the monomial basis into bytes.
    ///
    /// The Lagrange basis is derived again on load.
    pub fn to_var_bytes(&self) -> Vec<u8> {
        self.powers_of_g.iter().flat_map(|g| g.to_bytes()).collect()
    }

    /// Deserialize [`CommitKey`] from a set of bytes created by
    /// [`CommitKey::to_var_bytes`].
    pub fn from_slice(bytes: &[u8]) -> Result<CommitKey, Error> {
        let powers_of_g = bytes
            .chunks(G1Affine::SIZE)
            .map(G1Affine::from_slice)
            .collect::<Result<Vec<G1Affine>, dusk_bytes::Error>>()?;

        Ok(CommitKey::new(powers_of_g))
    }

    /// Returns the maximum degree polynomial that you can commit to.
    pub fn max_degree(&self) -> usize {
        self.powers_of_g.len().saturating_sub(1)
    }

    /// Size of the Lagrange basis, zero if not derived
    pub fn lagrange_size(&self) -> usize {
        self.lagrange_powers_of_g.len()
    }

    /// Truncates the commit key to a lower max degree.
    /// Returns an error if the truncated degree is zero or if the truncated
    /// degree is larger than the max degree of the commit key.
    pub(crate) fn truncate(
        &self,
        mut truncated_degree: usize,
    ) -> Result<CommitKey, Error> {
        if truncated_degree == 1 {
            truncated_degree += 1;
        }
        // Check that the truncated degree is not zero
        if truncated_degree == 0 {
            return Err(Error::TruncatedDegreeIsZero);
        }

        // Check that max degree is less than truncated degree
        if truncated_degree > self.max_degree() {
            return Err(Error::TruncatedDegreeTooLarge);
        }

        Ok(CommitKey::new(self.powers_of_g[..=truncated_degree].to_vec()))
    }

    /// Derive the commitments `L_i(β)·G` to the Lagrange polynomials of
    /// `domain` with an inverse FFT over the group.
    pub fn with_lagrange_basis(
        mut self,
        domain: &EvaluationDomain,
    ) -> Result<Self, Error> {
        let n = domain.size();
        if n > self.powers_of_g.len() {
            return Err(Error::TruncatedDegreeTooLarge);
        }

        let mut points: Vec<G1Projective> = self.powers_of_g[..n]
            .par_iter()
            .map(G1Projective::from)
            .collect();
        domain.ifft_in_place(&mut points);

        let mut lagrange = vec![G1Affine::identity(); n];
        G1Projective::batch_normalize(&points, &mut lagrange);

        self.lagrange_powers_of_g = lagrange;
        Ok(self)
    }

    fn check_commit_degree_is_within_bounds(
        &self,
        len: usize,
    ) -> Result<(), Error> {
        match len > self.powers_of_g.len() {
            true => Err(Error::PolynomialDegreeTooLarge {
                degree: len - 1,
                max: self.max_degree(),
            }),
            false => Ok(()),
        }
    }

    /// Commits to a polynomial bounded by the max degree of the key.
    pub fn commit(&self, polynomial: &Polynomial) -> Result<Commitment, Error> {
        self.commit_coefficients(&polynomial.coeffs)
    }

    pub(crate) fn commit_coefficients(
        &self,
        coeffs: &[BlsScalar],
    ) -> Result<Commitment, Error> {
        self.check_commit_degree_is_within_bounds(coeffs.len())?;

        Ok(msm(&self.powers_of_g[..coeffs.len()], coeffs).into())
    }

    /// Commits to a polynomial given by its evaluations over the domain the
    /// Lagrange basis was derived for.
    pub fn commit_lagrange(
        &self,
        evals: &[BlsScalar],
    ) -> Result<Commitment, Error> {
        if evals.len() > self.lagrange_powers_of_g.len() {
            return Err(Error::MismatchedLengths(
                evals.len(),
                self.lagrange_powers_of_g.len(),
            ));
        }

        Ok(msm(&self.lagrange_powers_of_g[..evals.len()], evals).into())
    }

    /// Commit to `values` interpreted in `basis`.
    pub fn commit_in(
        &self,
        values: &[BlsScalar],
        basis: Basis,
    ) -> Result<Commitment, Error> {
        match basis {
            Basis::Canonical => self.commit_coefficients(values),
            Basis::Lagrange => self.commit_lagrange(values),
            Basis::LagrangeCoset => Err(Error::InvalidForm {
                expected: Form::LAGRANGE,
                found: Form {
                    basis,
                    layout: Layout::Regular,
                },
            }),
        }
    }

    /// Contribution `Σ b_k (G_{n+k} - G_k)` of a blinding polynomial `b`
    /// multiplied by `X^n - 1`.
    pub(crate) fn commit_blinding(
        &self,
        n: usize,
        blinding: &[BlsScalar],
    ) -> Result<G1Projective, Error> {
        let k = blinding.len();
        self.check_commit_degree_is_within_bounds(n + k)?;

        let high = msm(&self.powers_of_g[n..n + k], blinding);
        let low = msm(&self.powers_of_g[..k], blinding);

        Ok(high - low)
    }

    /// Computes a witness that the polynomial was evaluated at the point `z`
    /// and its output was `p(z)`.
    pub fn open(
        &self,
        polynomial: &Polynomial,
        point: &BlsScalar,
    ) -> Result<OpeningProof, Error> {
        let value = polynomial.evaluate(point);
        let witness = self.commit(&polynomial.ruffini(point))?;

        Ok(OpeningProof { witness, value })
    }

    /// Creates a proof that multiple polynomials were evaluated at the same
    /// point.
    ///
    /// The polynomials are folded with powers of a challenge bound to
    /// `point`, the `digests`, the claimed values and `data`.
    pub fn batch_open_single_point(
        &self,
        hasher: &Hasher,
        polynomials: &[&Polynomial],
        digests: &[Commitment],
        point: &BlsScalar,
        data: &[BlsScalar],
    ) -> Result<BatchOpeningProof, Error> {
        if polynomials.is_empty() || polynomials.len() != digests.len() {
            return Err(Error::MismatchedDigests {
                digests: digests.len(),
                polynomials: polynomials.len(),
            });
        }

        let max_len = polynomials.iter().map(|p| p.len()).max().unwrap_or(0);
        self.check_commit_degree_is_within_bounds(max_len)?;

        let values: Vec<BlsScalar> =
            polynomials.par_iter().map(|p| p.evaluate(point)).collect();

        let gamma = folding_challenge(hasher, point, digests, &values, data)?;
        let folded = fold_polynomials(polynomials, &gamma);

        let witness = self.commit(&folded.ruffini(point))?;

        Ok(BatchOpeningProof { witness, values })
    }
}

/// Opening Key is used to verify opening proofs made about a committed
/// polynomial.
#[derive(Clone, Debug)]
pub struct OpeningKey {
    /// The generator of G1.
    pub(crate) g: G1Affine,
    /// The generator of G2.
    pub(crate) h: G2Affine,
    /// `β` times the above generator of G2.
    pub(crate) x_h: G2Affine,
    /// The generator of G2, prepared for use in pairings.
    pub(crate) prepared_h: G2Prepared,
    /// `β` times the above generator of G2, prepared for use in pairings.
    pub(crate) prepared_x_h: G2Prepared,
}

impl PartialEq for OpeningKey {
    fn eq(&self, other: &Self) -> bool {
        self.g == other.g && self.h == other.h && self.x_h == other.x_h
    }
}

impl Eq for OpeningKey {}

impl Serializable<{ G1Affine::SIZE + G2Affine::SIZE * 2 }> for OpeningKey {
    type Error = dusk_bytes::Error;

    fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        let (g, rest) = buf.split_at_mut(G1Affine::SIZE);
        let (h, x_h) = rest.split_at_mut(G2Affine::SIZE);

        g.copy_from_slice(&self.g.to_bytes());
        h.copy_from_slice(&self.h.to_bytes());
        x_h.copy_from_slice(&self.x_h.to_bytes());

        buf
    }

    fn from_bytes(buf: &[u8; Self::SIZE]) -> Result<Self, Self::Error> {
        let mut buffer = &buf[..];
        let g = G1Affine::from_reader(&mut buffer)?;
        let h = G2Affine::from_reader(&mut buffer)?;
        let x_h = G2Affine::from_reader(&mut buffer)?;

        Ok(Self::new(g, h, x_h))
    }
}

impl OpeningKey {
    pub(crate) fn new(g: G1Affine, h: G2Affine, x_h: G2Affine) -> OpeningKey {
        let prepared_h = G2Prepared::from(h);
        let prepared_x_h = G2Prepared::from(x_h);

        OpeningKey {
            g,
            h,
            x_h,
            prepared_h,
            prepared_x_h,
        }
    }

    /// Checks that a polynomial `p` was evaluated at a point `z` and
    /// returned the value specified `v`, i.e. `v = p(z)`.
    pub fn check(
        &self,
        point: &BlsScalar,
        commitment: &Commitment,
        proof: &OpeningProof,
    ) -> Result<(), Error> {
        self.batch_check(&[*commitment], &[*proof], &[*point])
    }

    /// Checks a set of openings, each at its own point, with a single
    /// pairing product.
    ///
    /// The openings are combined with powers of a separator derived from all
    /// of them, so none can compensate for another.
    pub fn batch_check(
        &self,
        commitments: &[Commitment],
        proofs: &[OpeningProof],
        points: &[BlsScalar],
    ) -> Result<(), Error> {
        if commitments.len() != proofs.len() {
            return Err(Error::MismatchedDigests {
                digests: commitments.len(),
                polynomials: proofs.len(),
            });
        }
        if points.len() != proofs.len() {
            return Err(Error::MismatchedLengths(points.len(), proofs.len()));
        }
        if proofs.is_empty() {
            return Ok(());
        }

        let lambda = batch_separator(commitments, proofs, points);
        let powers = powers_of(&lambda, proofs.len() - 1);

        let mut total_c = G1Projective::identity();
        let mut total_w = G1Projective::identity();

        // Instead of multiplying g in each turn, we simply accumulate its
        // coefficient and perform a final multiplication at the end.
        let mut g_multiplier = BlsScalar::zero();

        for (((commitment, proof), point), lambda_i) in commitments
            .iter()
            .zip(proofs)
            .zip(points)
            .zip(powers.iter())
        {
            let w = proof.witness.0;
            let c = G1Projective::from(commitment.0) + w * point;

            g_multiplier += lambda_i * proof.value;
            total_c += c * lambda_i;
            total_w += w * lambda_i;
        }
        total_c -= self.g * g_multiplier;

        let affine_total_w = G1Affine::from(-total_w);
        let affine_total_c = G1Affine::from(total_c);

        let pairing = multi_miller_loop(&[
            (&affine_total_w, &self.prepared_x_h),
            (&affine_total_c, &self.prepared_h),
        ])
        .final_exponentiation();

        match pairing == Gt::identity() {
            true => Ok(()),
            false => Err(Error::PairingCheckFailure),
        }
    }
}

pub(crate) fn msm(points: &[G1Affine], scalars: &[BlsScalar]) -> G1Projective {
    match scalars.is_empty() {
        true => G1Projective::identity(),
        false => msm_variable_base(points, scalars),
    }
}

/// `λ` separating the claims of a pairing batch, bound to the compressed
/// encoding of every claim.
fn batch_separator(
    commitments: &[Commitment],
    proofs: &[OpeningProof],
    points: &[BlsScalar],
) -> BlsScalar {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for ((c, p), z) in commitments.iter().zip(proofs).zip(points) {
        hasher.update(c.0.to_bytes());
        hasher.update(p.witness.0.to_bytes());
        hasher.update(p.value.to_bytes());
        hasher.update(z.to_bytes());
    }

    let mut wide = [0u8; 64];
    wide[..32].copy_from_slice(&hasher.finalize());

    BlsScalar::from_bytes_wide(&wide)
}

#[cfg(test)]
mod tests {
    use super::super::PublicParameters;
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(degree: usize) -> (CommitKey, OpeningKey) {
        let mut rng = StdRng::seed_from_u64(0xdead);
        let pp = PublicParameters::setup(degree, &mut rng)
            .expect("Error on setup");
        pp.trim(degree).expect("Error on trim")
    }

    #[test]
    fn test_basic_commit() {
        let degree = 25;
        let (ck, opening_key) = setup(degree);
        let point = BlsScalar::from(10);

        let poly = Polynomial::rand(degree, &mut StdRng::seed_from_u64(1));
        let commitment = ck.commit(&poly).unwrap();
        let proof = ck.open(&poly, &point).unwrap();

        assert!(opening_key.check(&point, &commitment, &proof).is_ok());

        let tampered = OpeningProof {
            value: proof.value + BlsScalar::one(),
            ..proof
        };
        assert_eq!(
            opening_key.check(&point, &commitment, &tampered),
            Err(Error::PairingCheckFailure)
        );
    }

    #[test]
    fn test_batch_verification() {
        let degree = 25;
        let (ck, opening_key) = setup(degree);
        let mut rng = StdRng::seed_from_u64(2);

        let point_a = BlsScalar::from(10);
        let point_b = BlsScalar::from(11);

        let poly_a = Polynomial::rand(degree, &mut rng);
        let poly_b = Polynomial::rand(degree, &mut rng);

        let commitments =
            [ck.commit(&poly_a).unwrap(), ck.commit(&poly_b).unwrap()];
        let proofs = [
            ck.open(&poly_a, &point_a).unwrap(),
            ck.open(&poly_b, &point_b).unwrap(),
        ];

        assert!(opening_key
            .batch_check(&commitments, &proofs, &[point_a, point_b])
            .is_ok());

        // swapping the points breaks both claims
        assert!(opening_key
            .batch_check(&commitments, &proofs, &[point_b, point_a])
            .is_err());
    }

    #[test]
    fn test_batch_open_and_fold() {
        let (ck, opening_key) = setup(40);
        let hasher = Hasher::default();
        let mut rng = StdRng::seed_from_u64(3);
        let point = BlsScalar::from(10);
        let data = [BlsScalar::from(42)];

        let polys = [
            Polynomial::rand(25, &mut rng),
            Polynomial::rand(26, &mut rng),
            Polynomial::rand(27, &mut rng),
        ];
        let polys: Vec<&Polynomial> = polys.iter().collect();
        let digests: Vec<Commitment> =
            polys.iter().map(|p| ck.commit(p).unwrap()).collect();

        let proof = ck
            .batch_open_single_point(&hasher, &polys, &digests, &point, &data)
            .unwrap();

        let (digest, opening) =
            proof.fold(&hasher, &digests, &point, &data).unwrap();
        assert!(opening_key.check(&point, &digest, &opening).is_ok());

        // a different seed derives a different folding challenge
        let (digest, opening) =
            proof.fold(&hasher, &digests, &point, &[]).unwrap();
        assert!(opening_key.check(&point, &digest, &opening).is_err());

        let mut tampered = proof.clone();
        tampered.values[1] += BlsScalar::one();
        let (digest, opening) =
            tampered.fold(&hasher, &digests, &point, &data).unwrap();
        assert!(opening_key.check(&point, &digest, &opening).is_err());
    }

    #[test]
    fn batch_open_rejects_bad_shapes() {
        let (ck, _) = setup(8);
        let hasher = Hasher::default();
        let poly = Polynomial::rand(4, &mut StdRng::seed_from_u64(4));
        let point = BlsScalar::one();

        assert_eq!(
            ck.batch_open_single_point(&hasher, &[&poly], &[], &point, &[]),
            Err(Error::MismatchedDigests {
                digests: 0,
                polynomials: 1
            })
        );

        let large = Polynomial::rand(12, &mut StdRng::seed_from_u64(5));
        assert_eq!(
            ck.commit(&large),
            Err(Error::PolynomialDegreeTooLarge { degree: 12, max: 8 })
        );
    }

    #[test]
    fn lagrange_commitments_match_monomial_ones() {
        let (ck, _) = setup(16);
        let domain = EvaluationDomain::new(8).unwrap();
        let ck = ck.with_lagrange_basis(&domain).unwrap();

        let poly = Polynomial::rand(7, &mut StdRng::seed_from_u64(6));
        let evals = domain.fft(&poly);

        assert_eq!(ck.lagrange_size(), 8);
        assert_eq!(ck.commit_lagrange(&evals), ck.commit(&poly));
        assert_eq!(ck.commit_in(&evals, Basis::Lagrange), ck.commit(&poly));
        assert!(ck.commit_in(&evals, Basis::LagrangeCoset).is_err());
    }

    #[test]
    fn blinding_commitment_matches_expanded_polynomial() {
        let (ck, _) = setup(16);
        let n = 8;
        let b = [BlsScalar::from(3), BlsScalar::from(5)];

        // b(X)·(X^n - 1)
        let mut coeffs = vec![BlsScalar::zero(); n + b.len()];
        coeffs[0] = -b[0];
        coeffs[1] = -b[1];
        coeffs[n] = b[0];
        coeffs[n + 1] = b[1];
        let expanded = Polynomial::from_coefficients_vec(coeffs);

        let blinding = ck.commit_blinding(n, &b).unwrap();
        assert_eq!(Commitment::from(blinding), ck.commit(&expanded).unwrap());
    }

    #[test]
    fn opening_key_serde() {
        let (_, opening_key) = setup(4);
        let bytes = opening_key.to_bytes();
        let obtained = OpeningKey::from_bytes(&bytes).unwrap();

        assert_eq!(opening_key, obtained);
    }
}
