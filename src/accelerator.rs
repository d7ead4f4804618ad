// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Backends for the heavy operations of the prover.
//!
//! An [`Accelerator`] commits, opens, transforms and multiplies vectors of
//! scalars. Backends may keep scalars in Montgomery form; the
//! [`AcceleratorRouter`] converts every input into the representation the
//! backend declares and every output back into standard form, so callers
//! only ever see standard scalars.

use std::borrow::Cow;
use std::sync::Arc;

use dusk_bls12_381::BlsScalar;
use rayon::prelude::*;
use tracing::warn;

use crate::commitment_scheme::{CommitKey, Commitment, OpeningProof};
use crate::error::Error;
use crate::fft::{Basis, EvaluationDomain};

mod cpu;

pub use cpu::CpuAccelerator;

/// Numeric representation of the scalars exchanged with a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// The canonical value `x`
    Standard,
    /// `x·R mod r` with `R = 2^256`
    Montgomery,
}

impl Representation {
    /// `R = 2^256 mod r`
    pub const MONTGOMERY_R: BlsScalar = BlsScalar::from_raw([
        0x00000001fffffffe,
        0x5884b7fa00034802,
        0x998c4fefecbc4ff5,
        0x1824b159acc5056f,
    ]);

    /// `R^-1 mod r`
    pub const MONTGOMERY_R_INV: BlsScalar = BlsScalar::from_raw([
        0x13f75b69fe75c040,
        0xab6fca8f09dc705f,
        0x7204078a4f77266a,
        0x1bbe869330009d57,
    ]);

    /// `R = 2^256 mod r`
    pub fn montgomery_r() -> BlsScalar {
        Self::MONTGOMERY_R
    }

    /// `R^-1 mod r`
    pub fn montgomery_r_inv() -> BlsScalar {
        Self::MONTGOMERY_R_INV
    }

    /// Convert a standard scalar into this representation.
    pub fn encode(self, x: &BlsScalar) -> BlsScalar {
        match self {
            Self::Standard => *x,
            Self::Montgomery => x * Self::montgomery_r(),
        }
    }

    /// Convert a scalar in this representation back to standard form.
    pub fn decode(self, x: &BlsScalar) -> BlsScalar {
        match self {
            Self::Standard => *x,
            Self::Montgomery => x * Self::montgomery_r_inv(),
        }
    }

    /// Convert standard scalars into this representation, borrowing when
    /// no conversion is needed.
    pub fn encode_all(self, values: &[BlsScalar]) -> Cow<'_, [BlsScalar]> {
        self.scale_all(values, Self::montgomery_r)
    }

    /// Convert scalars in this representation back to standard form,
    /// borrowing when no conversion is needed.
    pub fn decode_all(self, values: &[BlsScalar]) -> Cow<'_, [BlsScalar]> {
        self.scale_all(values, Self::montgomery_r_inv)
    }

    fn scale_all(
        self,
        values: &[BlsScalar],
        factor: fn() -> BlsScalar,
    ) -> Cow<'_, [BlsScalar]> {
        match self {
            Self::Standard => Cow::Borrowed(values),
            Self::Montgomery => {
                let f = factor();
                Cow::Owned(values.par_iter().map(|x| x * f).collect())
            }
        }
    }

    fn decode_in_place(self, values: &mut [BlsScalar]) {
        if self == Self::Montgomery {
            let r_inv = Self::montgomery_r_inv();
            values.par_iter_mut().for_each(|x| *x *= r_inv);
        }
    }
}

/// Capability required from a proving backend.
///
/// Every scalar argument and result is expressed in
/// [`Accelerator::representation`]. Commitments are group elements and do
/// not depend on the representation.
pub trait Accelerator: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Representation of the scalars exchanged with the backend
    fn representation(&self) -> Representation;

    /// MSM of `scalars` against the `basis` slice of the key.
    fn commit(
        &self,
        key: &CommitKey,
        scalars: &[BlsScalar],
        basis: Basis,
    ) -> Result<Commitment, Error>;

    /// Open the polynomial given by `coeffs` at `point`.
    fn open(
        &self,
        key: &CommitKey,
        coeffs: &[BlsScalar],
        point: &BlsScalar,
        basis: Basis,
    ) -> Result<OpeningProof, Error>;

    /// Evaluate coefficients over the domain.
    fn ntt_forward(
        &self,
        values: Vec<BlsScalar>,
        domain: &EvaluationDomain,
    ) -> Result<Vec<BlsScalar>, Error>;

    /// Interpolate evaluations over the domain.
    fn ntt_inverse(
        &self,
        values: Vec<BlsScalar>,
        domain: &EvaluationDomain,
    ) -> Result<Vec<BlsScalar>, Error>;

    /// Entry-wise product of two vectors of the same length.
    fn pointwise_multiply(
        &self,
        a: &[BlsScalar],
        b: &[BlsScalar],
    ) -> Result<Vec<BlsScalar>, Error>;
}

/// Dispatch of the prover operations to a backend.
///
/// Calls go to the configured accelerator when there is one. A call
/// failing with [`Error::AcceleratorUnavailable`] is logged and replayed on
/// the CPU backend; any other error is returned as is.
#[derive(Clone)]
pub struct AcceleratorRouter {
    primary: Option<Arc<dyn Accelerator>>,
    fallback: CpuAccelerator,
}

impl core::fmt::Debug for AcceleratorRouter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AcceleratorRouter")
            .field("primary", &self.primary.as_ref().map(|a| a.name()))
            .finish()
    }
}

impl Default for AcceleratorRouter {
    fn default() -> Self {
        Self::cpu()
    }
}

impl AcceleratorRouter {
    /// Route every call to the CPU backend.
    pub fn cpu() -> Self {
        Self {
            primary: None,
            fallback: CpuAccelerator,
        }
    }

    /// Route calls to `accelerator`, falling back to the CPU backend.
    pub fn with_accelerator(accelerator: Arc<dyn Accelerator>) -> Self {
        Self {
            primary: Some(accelerator),
            fallback: CpuAccelerator,
        }
    }

    fn route<T, F>(&self, op: &'static str, call: F) -> Result<T, Error>
    where
        F: Fn(&dyn Accelerator) -> Result<T, Error>,
    {
        if let Some(primary) = &self.primary {
            match call(primary.as_ref()) {
                Err(Error::AcceleratorUnavailable { backend, reason }) => {
                    warn!(
                        backend,
                        op,
                        %reason,
                        "accelerator unavailable, falling back to cpu"
                    );
                }
                result => return result,
            }
        }

        call(&self.fallback)
    }

    /// Commit to standard `scalars` expressed in `basis`.
    pub fn commit(
        &self,
        key: &CommitKey,
        scalars: &[BlsScalar],
        basis: Basis,
    ) -> Result<Commitment, Error> {
        self.route("commit", |acc| {
            let scalars = acc.representation().encode_all(scalars);
            acc.commit(key, &scalars, basis)
        })
    }

    /// Open the polynomial with standard coefficients `coeffs` at `point`.
    pub fn open(
        &self,
        key: &CommitKey,
        coeffs: &[BlsScalar],
        point: &BlsScalar,
    ) -> Result<OpeningProof, Error> {
        self.route("open", |acc| {
            let repr = acc.representation();
            let coeffs = repr.encode_all(coeffs);
            let proof =
                acc.open(key, &coeffs, &repr.encode(point), Basis::Canonical)?;

            Ok(OpeningProof {
                witness: proof.witness,
                value: repr.decode(&proof.value),
            })
        })
    }

    /// Forward NTT of standard values.
    pub fn ntt_forward(
        &self,
        values: &[BlsScalar],
        domain: &EvaluationDomain,
    ) -> Result<Vec<BlsScalar>, Error> {
        self.route("ntt_forward", |acc| {
            let repr = acc.representation();
            let mut out =
                acc.ntt_forward(repr.encode_all(values).into_owned(), domain)?;
            repr.decode_in_place(&mut out);
            Ok(out)
        })
    }

    /// Inverse NTT of standard values.
    pub fn ntt_inverse(
        &self,
        values: &[BlsScalar],
        domain: &EvaluationDomain,
    ) -> Result<Vec<BlsScalar>, Error> {
        self.route("ntt_inverse", |acc| {
            let repr = acc.representation();
            let mut out =
                acc.ntt_inverse(repr.encode_all(values).into_owned(), domain)?;
            repr.decode_in_place(&mut out);
            Ok(out)
        })
    }

    /// Entry-wise product of standard vectors.
    pub fn pointwise_multiply(
        &self,
        a: &[BlsScalar],
        b: &[BlsScalar],
    ) -> Result<Vec<BlsScalar>, Error> {
        if a.len() != b.len() {
            return Err(Error::MismatchedLengths(a.len(), b.len()));
        }

        self.route("pointwise_multiply", |acc| {
            let repr = acc.representation();
            let mut out = acc.pointwise_multiply(
                &repr.encode_all(a),
                &repr.encode_all(b),
            )?;
            repr.decode_in_place(&mut out);
            Ok(out)
        })
    }

    /// Representation of the primary backend
    pub fn representation(&self) -> Representation {
        self.primary
            .as_ref()
            .map(|p| p.representation())
            .unwrap_or(Representation::Standard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::commitment_scheme::PublicParameters;
    use crate::fft::Polynomial;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Backend computing directly on Montgomery encoded scalars
    struct MontgomeryAccelerator;

    impl Accelerator for MontgomeryAccelerator {
        fn name(&self) -> &'static str {
            "montgomery-mock"
        }

        fn representation(&self) -> Representation {
            Representation::Montgomery
        }

        fn commit(
            &self,
            key: &CommitKey,
            scalars: &[BlsScalar],
            basis: Basis,
        ) -> Result<Commitment, Error> {
            let scalars = Representation::Montgomery.decode_all(scalars);
            key.commit_in(&scalars, basis)
        }

        fn open(
            &self,
            key: &CommitKey,
            coeffs: &[BlsScalar],
            point: &BlsScalar,
            _basis: Basis,
        ) -> Result<OpeningProof, Error> {
            let repr = Representation::Montgomery;
            let coeffs = repr.decode_all(coeffs).into_owned();
            let poly = Polynomial::from_coefficients_vec(coeffs);
            let proof = key.open(&poly, &repr.decode(point))?;

            Ok(OpeningProof {
                witness: proof.witness,
                value: repr.encode(&proof.value),
            })
        }

        fn ntt_forward(
            &self,
            mut values: Vec<BlsScalar>,
            domain: &EvaluationDomain,
        ) -> Result<Vec<BlsScalar>, Error> {
            // the transform is linear, the encoding commutes with it
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
            // (aR)(bR)R^-1 = abR
            let r_inv = Representation::montgomery_r_inv();
            Ok(a.iter().zip(b).map(|(a, b)| a * b * r_inv).collect())
        }
    }

    /// Backend whose device is never available
    struct OfflineAccelerator;

    impl OfflineAccelerator {
        fn unavailable<T>() -> Result<T, Error> {
            Err(Error::AcceleratorUnavailable {
                backend: "offline-mock",
                reason: "no device".into(),
            })
        }
    }

    impl Accelerator for OfflineAccelerator {
        fn name(&self) -> &'static str {
            "offline-mock"
        }

        fn representation(&self) -> Representation {
            Representation::Montgomery
        }

        fn commit(
            &self,
            _: &CommitKey,
            _: &[BlsScalar],
            _: Basis,
        ) -> Result<Commitment, Error> {
            Self::unavailable()
        }

        fn open(
            &self,
            _: &CommitKey,
            _: &[BlsScalar],
            _: &BlsScalar,
            _: Basis,
        ) -> Result<OpeningProof, Error> {
            Self::unavailable()
        }

        fn ntt_forward(
            &self,
            _: Vec<BlsScalar>,
            _: &EvaluationDomain,
        ) -> Result<Vec<BlsScalar>, Error> {
            Self::unavailable()
        }

        fn ntt_inverse(
            &self,
            _: Vec<BlsScalar>,
            _: &EvaluationDomain,
        ) -> Result<Vec<BlsScalar>, Error> {
            Self::unavailable()
        }

        fn pointwise_multiply(
            &self,
            _: &[BlsScalar],
            _: &[BlsScalar],
        ) -> Result<Vec<BlsScalar>, Error> {
            Self::unavailable()
        }
    }

    fn routers() -> [AcceleratorRouter; 3] {
        [
            AcceleratorRouter::cpu(),
            AcceleratorRouter::with_accelerator(Arc::new(
                MontgomeryAccelerator,
            )),
            AcceleratorRouter::with_accelerator(Arc::new(OfflineAccelerator)),
        ]
    }

    #[test]
    fn montgomery_encoding_round_trips() {
        let x = BlsScalar::from(0xdead_beefu64);
        let repr = Representation::Montgomery;

        assert_ne!(repr.encode(&x), x);
        assert_eq!(repr.decode(&repr.encode(&x)), x);
        assert_eq!(
            Representation::montgomery_r() * Representation::montgomery_r_inv(),
            BlsScalar::one()
        );
    }

    #[test]
    fn montgomery_constants_are_inverse() {
        let mut wide = [0u8; 64];
        wide[32] = 1;

        let r = Representation::MONTGOMERY_R;
        assert_eq!(r, BlsScalar::from_bytes_wide(&wide));
        assert_eq!(r * Representation::MONTGOMERY_R_INV, BlsScalar::one());
    }

    #[test]
    fn backends_agree_on_every_operation() {
        let mut rng = StdRng::seed_from_u64(0xacce1);
        let pp = PublicParameters::setup(32, &mut rng).unwrap();
        let domain = EvaluationDomain::new(16).unwrap();
        let (ck, _) = pp.trim(32).unwrap();
        let ck = ck.with_lagrange_basis(&domain).unwrap();

        let poly = Polynomial::rand(15, &mut rng);
        let other = Polynomial::rand(15, &mut rng);
        let point = BlsScalar::from(1234u64);

        let [cpu, montgomery, offline] = routers();

        let evals = cpu.ntt_forward(&poly, &domain).unwrap();
        let product = cpu
            .pointwise_multiply(&evals, &domain.fft(&other))
            .unwrap();
        let commitment = cpu.commit(&ck, &poly, Basis::Canonical).unwrap();
        let opening = cpu.open(&ck, &poly, &point).unwrap();

        for router in [montgomery, offline] {
            assert_eq!(router.ntt_forward(&poly, &domain).unwrap(), evals);
            assert_eq!(
                router.ntt_inverse(&evals, &domain).unwrap(),
                poly.coeffs
            );
            assert_eq!(
                router
                    .pointwise_multiply(&evals, &domain.fft(&other))
                    .unwrap(),
                product
            );
            assert_eq!(
                router.commit(&ck, &poly, Basis::Canonical).unwrap(),
                commitment
            );
            assert_eq!(
                router.commit(&ck, &evals, Basis::Lagrange).unwrap(),
                commitment
            );
            assert_eq!(router.open(&ck, &poly, &point).unwrap(), opening);
        }
    }

    #[test]
    fn mismatched_vectors_are_rejected() {
        let router = AcceleratorRouter::cpu();
        let a = vec![BlsScalar::one(); 4];
        let b = vec![BlsScalar::one(); 3];

        assert_eq!(
            router.pointwise_multiply(&a, &b),
            Err(Error::MismatchedLengths(4, 3))
        );
    }
}
