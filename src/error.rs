// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! A collection of all possible errors encountered in PLONK.

use dusk_bytes::Error as DuskBytesError;
use thiserror::Error;

use crate::fft::Form;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Shape or size mismatch, rejected before any cryptographic work.
    InvalidInput,
    /// The witness does not satisfy the gate system.
    UnsatisfiedConstraints,
    /// Transcript or pipeline misuse; unreachable in a correct build.
    ProtocolViolation,
    /// A pairing or algebraic identity check failed.
    CryptographicRejection,
    /// The accelerator backend is missing or erroring.
    AcceleratorUnavailable,
    /// A peer stage aborted the proof generation.
    Cancelled,
}

/// Defines all possible errors that can be encountered in PLONK.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // FFT errors
    /// The requested domain is larger than the two-adic subgroup of the field.
    #[error(
        "log-size of the evaluation domain group {log_size_of_group} > \
         TWO_ADACITY = {adacity}"
    )]
    InvalidEvalDomainSize {
        /// Log size of the group
        log_size_of_group: u32,
        /// Two adacity generated
        adacity: u32,
    },
    /// A vector is tagged with a different basis/layout than the operation
    /// expects.
    #[error("expected evaluations in form {expected:?}, found {found:?}")]
    InvalidForm {
        /// Form required by the operation
        expected: Form,
        /// Form of the provided vector
        found: Form,
    },
    /// Two vectors that should be paired have different lengths.
    #[error("mismatched vector lengths {0} and {1}")]
    MismatchedLengths(usize, usize),

    // Hash errors
    /// The state handed to the permutation doesn't match its width.
    #[error("permutation state has width {provided}, expected {expected}")]
    InvalidStateWidth {
        /// Width of the permutation
        expected: usize,
        /// Provided state length
        provided: usize,
    },
    /// Only the widths with a defined linear layer are supported.
    #[error("unsupported permutation width {0}")]
    UnsupportedWidth(usize),
    /// Full rounds must be split evenly around the partial rounds.
    #[error("unsupported number of full rounds {0}")]
    UnsupportedFullRounds(usize),

    // Transcript errors
    /// The challenge name was not declared when the transcript was created.
    #[error("challenge {0} is not declared in the transcript")]
    UnknownChallenge(String),
    /// The challenge was already frozen.
    #[error("challenge {0} is already computed")]
    ChallengeAlreadyComputed(String),
    /// The challenge preceding this one by position is still pending.
    #[error("the challenge preceding {0} is not computed yet")]
    PreviousChallengeNotComputed(String),

    // Pipeline errors
    /// An artifact of the proving pipeline was published twice.
    #[error("artifact {0} is already published")]
    ArtifactAlreadyPublished(&'static str),
    /// The proving pipeline was cancelled by a failing stage.
    #[error("proof generation cancelled")]
    PipelineCancelled,
    /// The accelerator backend is missing or failed.
    #[error("accelerator backend {backend} unavailable: {reason}")]
    AcceleratorUnavailable {
        /// Backend name
        backend: &'static str,
        /// Failure description
        reason: String,
    },

    // Prover/Verifier errors
    /// The witness doesn't satisfy the gate at the given row.
    #[error("the witness doesn't satisfy the gate at row {gate}")]
    UnsatisfiedConstraint {
        /// Row of the first unsatisfied gate
        gate: usize,
    },
    /// This error occurs when a proof verification fails.
    #[error("proof verification failed")]
    ProofVerificationError,
    /// This error occurs when the pairing check fails at being equal to the
    /// Identity point.
    #[error("pairing check failed")]
    PairingCheckFailure,
    /// A curve point is not in the prime order subgroup.
    #[error("point is not in the prime order subgroup")]
    PointNotInSubgroup,
    /// The circuit description has a different amount of gates than the
    /// circuit used for the proof creation.
    #[error(
        "circuit description has a different amount of gates than the \
         circuit for the proof creation: description size = {0}, circuit \
         size = {1}"
    )]
    InvalidCircuitSize(usize, usize),
    /// A circuit declared more than one commitment slot.
    #[error("a circuit can declare at most one commitment, found {0}")]
    TooManyCommitments(usize),
    /// The verifier key doesn't describe the circuit the proof is checked
    /// against.
    #[error("the verifier key doesn't match the circuit shape")]
    VerifierKeyMismatch,
    /// The verifier key family handed to the recursive circuit is empty.
    #[error("the verifier key family is empty")]
    EmptyVerifierKeyFamily,
    /// The selected key index is out of the family bounds.
    #[error("verifier key index {index} is out of bounds for {len} keys")]
    InvalidVerifierKeyIndex {
        /// Selected index
        index: usize,
        /// Family size
        len: usize,
    },
    /// The provided public inputs length doesn't match the processed verifier
    #[error(
        "the provided public inputs length {provided} doesn't match the \
         processed verifier {expected}"
    )]
    InconsistentPublicInputsLen {
        /// Expected value
        expected: usize,
        /// Provided value
        provided: usize,
    },

    // KZG10 errors
    /// The user tries to create PublicParameters with max degree zero.
    #[error("cannot create PublicParameters with max degree 0")]
    DegreeIsZero,
    /// The user tries to trim PublicParameters to a degree that is larger
    /// than the maximum degree.
    #[error("cannot trim more than the maximum degree")]
    TruncatedDegreeTooLarge,
    /// The user tries to trim PublicParameters down to a degree that is zero.
    #[error("cannot trim PublicParameters to a maximum size of zero")]
    TruncatedDegreeIsZero,
    /// The polynomial is larger than the supported degree of the key.
    #[error("commit key supports degree {max}, polynomial has degree {degree}")]
    PolynomialDegreeTooLarge {
        /// Degree of the polynomial
        degree: usize,
        /// Maximum supported degree
        max: usize,
    },
    /// The polynomial to commit to has degree zero.
    #[error("cannot commit to polynomial of zero degree")]
    PolynomialDegreeIsZero,
    /// Digests and polynomials of a batch opening don't pair up.
    #[error("{digests} digests provided for {polynomials} polynomials")]
    MismatchedDigests {
        /// Digests count
        digests: usize,
        /// Polynomials count
        polynomials: usize,
    },
    /// The SRS bytes don't hash to the expected checksum.
    #[error("the public parameters checksum doesn't match")]
    SrsChecksumMismatch,

    // Serialization errors
    /// Dusk-bytes serialization error
    #[error("dusk-bytes serialization error: {0:?}")]
    BytesError(DuskBytesError),
    /// There are not enough bytes to read out of a slice during
    /// deserialization.
    #[error("not enough bytes left to read")]
    NotEnoughBytes,
    /// A malformed point is decoded from a byte array.
    #[error("point bytes malformed")]
    PointMalformed,
    /// A malformed BLS scalar is decoded from a byte array.
    #[error("BLS scalar bytes malformed")]
    BlsScalarMalformed,
}

impl Error {
    /// Classify the error according to how the caller should react to it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEvalDomainSize { .. }
            | Self::MismatchedLengths(..)
            | Self::InvalidStateWidth { .. }
            | Self::UnsupportedWidth(_)
            | Self::UnsupportedFullRounds(_)
            | Self::InvalidCircuitSize(..)
            | Self::TooManyCommitments(_)
            | Self::VerifierKeyMismatch
            | Self::EmptyVerifierKeyFamily
            | Self::InvalidVerifierKeyIndex { .. }
            | Self::InconsistentPublicInputsLen { .. }
            | Self::DegreeIsZero
            | Self::TruncatedDegreeTooLarge
            | Self::TruncatedDegreeIsZero
            | Self::PolynomialDegreeTooLarge { .. }
            | Self::PolynomialDegreeIsZero
            | Self::MismatchedDigests { .. }
            | Self::SrsChecksumMismatch
            | Self::BytesError(_)
            | Self::NotEnoughBytes
            | Self::PointMalformed
            | Self::BlsScalarMalformed => ErrorKind::InvalidInput,

            Self::UnsatisfiedConstraint { .. } => {
                ErrorKind::UnsatisfiedConstraints
            }

            Self::InvalidForm { .. }
            | Self::UnknownChallenge(_)
            | Self::ChallengeAlreadyComputed(_)
            | Self::PreviousChallengeNotComputed(_)
            | Self::ArtifactAlreadyPublished(_) => ErrorKind::ProtocolViolation,

            Self::ProofVerificationError
            | Self::PairingCheckFailure
            | Self::PointNotInSubgroup => ErrorKind::CryptographicRejection,

            Self::AcceleratorUnavailable { .. } => {
                ErrorKind::AcceleratorUnavailable
            }

            Self::PipelineCancelled => ErrorKind::Cancelled,
        }
    }
}

impl From<DuskBytesError> for Error {
    fn from(bytes_err: DuskBytesError) -> Self {
        Self::BytesError(bytes_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_reaction_expected_from_the_caller() {
        assert_eq!(
            Error::MismatchedDigests {
                digests: 2,
                polynomials: 3
            }
            .kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            Error::UnsatisfiedConstraint { gate: 4 }.kind(),
            ErrorKind::UnsatisfiedConstraints
        );
        assert_eq!(
            Error::ChallengeAlreadyComputed("gamma".into()).kind(),
            ErrorKind::ProtocolViolation
        );
        assert_eq!(
            Error::PairingCheckFailure.kind(),
            ErrorKind::CryptographicRejection
        );
        assert_eq!(Error::PipelineCancelled.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn display_carries_the_offending_values() {
        let err = Error::InconsistentPublicInputsLen {
            expected: 4,
            provided: 3,
        };
        let msg = format!("{err}");

        assert!(msg.contains('4'));
        assert!(msg.contains('3'));
    }
}
