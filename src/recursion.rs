// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Verification of PLONK proofs inside a circuit.
//!
//! [`VerifierCircuit`] constrains every scalar relation the native verifier
//! checks: the transcript, the public inputs evaluation, the linearization
//! identity and the folding scalars. The multi-scalar multiplications and
//! the pairing are left to a [`DeferredCheck`], bound to the circuit by its
//! digest, which is the last public input of the circuit.
//!
//! A satisfied circuit alone doesn't accept the inner proof: its opening
//! witnesses are only checked by the pairing of the exported check. Proofs
//! of the circuit are accepted by a [`RecursiveVerifier`], which verifies
//! the outer proof and discharges the check it carries.
//!
//! The public inputs of the circuit are, in order, the address of the
//! selected verifier key, the public inputs of the inner proof and the
//! digest of the deferred check.

use dusk_bls12_381::BlsScalar;
use tracing::{debug, info};

use crate::commitment_scheme::OpeningKey;
use crate::composer::permutation::{K1, K2};
use crate::composer::{Circuit, Composer, Constraint, Verifier, Witness};
use crate::error::Error;
use crate::hash::Hasher;
use crate::proof_system::proof::linearization_digest;
use crate::proof_system::{DeferredCheck, Proof, VerifierKey};
use crate::transcript::{CID_ALPHA, CID_BETA, CID_GAMMA, CID_ZETA, PREFIX_BSB};

/// Circuit verifying a proof of one key out of a family of verifier keys.
///
/// The keys of a family share the domain size and the number of public
/// inputs; the key is picked by a one-hot selector over the family so the
/// layout doesn't depend on the index.
#[derive(Debug, Clone)]
pub struct VerifierCircuit {
    hasher: Hasher,
    family: Vec<VerifierKey>,
    index: usize,
    proof: Proof,
    public_inputs: Vec<BlsScalar>,
}

impl VerifierCircuit {
    /// Verify `proof` of the key `family[index]`
    pub fn new(
        hasher: Hasher,
        family: Vec<VerifierKey>,
        index: usize,
        proof: Proof,
        public_inputs: Vec<BlsScalar>,
    ) -> Result<Self, Error> {
        let key = match family.get(index) {
            Some(key) => key,
            None if family.is_empty() => {
                return Err(Error::EmptyVerifierKeyFamily)
            }
            None => {
                return Err(Error::InvalidVerifierKeyIndex {
                    index,
                    len: family.len(),
                })
            }
        };

        let same_shape = family.iter().all(|vk| {
            vk.size() == key.size() && vk.public_inputs() == key.public_inputs()
        });
        if !same_shape {
            return Err(Error::VerifierKeyMismatch);
        }

        if public_inputs.len() != key.public_inputs() {
            return Err(Error::InconsistentPublicInputsLen {
                expected: key.public_inputs(),
                provided: public_inputs.len(),
            });
        }

        Ok(Self {
            hasher,
            family,
            index,
            proof,
            public_inputs,
        })
    }

    /// Keys the circuit selects from
    pub fn family(&self) -> &[VerifierKey] {
        &self.family
    }

    /// Selected key
    pub fn verifier_key(&self) -> &VerifierKey {
        // the index is checked at construction
        &self.family[self.index]
    }

    /// Check exported by the circuit
    pub fn deferred_check(&self) -> Result<DeferredCheck, Error> {
        self.proof.deferred_check(
            self.verifier_key(),
            &self.hasher,
            &self.public_inputs,
        )
    }

    /// Public inputs of the circuit: the key address, the inner public
    /// inputs and the digest of [`Self::deferred_check`]
    pub fn outer_public_inputs(&self) -> Result<Vec<BlsScalar>, Error> {
        let digest = self.deferred_check()?.digest(&self.hasher);

        let mut publics = Vec::with_capacity(self.public_inputs.len() + 2);
        publics.push(self.verifier_key().address(&self.hasher));
        publics.extend(self.public_inputs.iter().copied());
        publics.push(digest);

        Ok(publics)
    }

    /// `Σ s_k · values[k]` over the one-hot selector
    fn select(
        composer: &mut Composer,
        selector: &[Witness],
        values: impl IntoIterator<Item = BlsScalar>,
    ) -> Witness {
        let terms: Vec<_> =
            values.into_iter().zip(selector.iter().copied()).collect();

        composer.component_linear_combination(&terms, BlsScalar::zero())
    }
}

impl Circuit for VerifierCircuit {
    fn circuit(&self, composer: &mut Composer) -> Result<(), Error> {
        let hasher = &self.hasher;
        let key = self.verifier_key();
        let domain = key.domain()?;
        let one = BlsScalar::one();
        let zero = BlsScalar::zero();

        // 1. one-hot selector of the key
        let selector: Vec<Witness> = (0..self.family.len())
            .map(|k| {
                let bit = composer.append_witness(BlsScalar::from(
                    (k == self.index) as u64,
                ));
                composer.component_boolean(bit);
                bit
            })
            .collect();
        let terms: Vec<_> = selector.iter().map(|s| (one, *s)).collect();
        let count = composer.component_linear_combination(&terms, zero);
        composer.assert_equal_constant(count, 1);

        let addresses = self.family.iter().map(|vk| vk.address(hasher));
        let address = Self::select(composer, &selector, addresses);
        let value = composer[address];
        let public = composer.append_public(value);
        composer.assert_equal(public, address);

        // `[S1, S2, S3, QL, QR, QM, QO, QK, QC]`
        let hashed: Vec<[BlsScalar; 9]> = self
            .family
            .iter()
            .map(|vk| vk.hashed_commitments(hasher))
            .collect();
        let vk_hashes: [Witness; 9] = core::array::from_fn(|j| {
            let column = hashed.iter().map(|h| h[j]);
            Self::select(composer, &selector, column)
        });
        let [s1_h, s2_h, s3_h, ql_h, qr_h, qm_h, qo_h, qk_h, qc_h] = vk_hashes;

        // 2. inner public inputs
        let publics: Vec<Witness> = self
            .public_inputs
            .iter()
            .map(|p| composer.append_public(*p))
            .collect();

        // 3. proof
        let [l, r, o, h0, h1, h2, z, bsb, w_z, w_zw] = self
            .proof
            .commitments()
            .map(|c| composer.component_hash_g1(hasher, &c.0));
        let [z_shifted, lin, a, b, c, s1, s2, qcp] = self
            .proof
            .evaluations
            .to_array()
            .map(|e| composer.append_witness(e));

        // 4. transcript
        let cid_gamma = composer.append_constant(CID_GAMMA);
        let mut inputs = vec![cid_gamma];
        inputs.extend(vk_hashes);
        inputs.extend([l, r, o]);
        inputs.extend(publics.iter().copied());
        let gamma = composer.component_sum(hasher, &inputs);

        let cid = composer.append_constant(CID_BETA);
        let beta = composer.component_sum(hasher, &[cid, gamma]);

        let cid = composer.append_constant(CID_ALPHA);
        let alpha = composer.component_sum(hasher, &[cid, beta, bsb, z]);

        let cid = composer.append_constant(CID_ZETA);
        let zeta = composer.component_sum(hasher, &[cid, alpha, h0, h1, h2]);

        debug!(
            gamma = ?composer[gamma],
            zeta = ?composer[zeta],
            "recursive transcript replayed"
        );

        // 5. public inputs evaluation
        let mut zeta_n = zeta;
        for _ in 0..domain.log_size() {
            let constraint = Constraint::new().mult(1).a(zeta_n).b(zeta_n);
            zeta_n = composer.gate_mul(constraint);
        }
        let constraint = Constraint::new().left(1).constant(-one).a(zeta_n);
        let z_h = composer.gate_add(constraint);

        let n_inv = domain.size_inv();
        let lagrange = |composer: &mut Composer, i: usize| {
            let omega_i = domain.element(i);

            let constraint = Constraint::new().left(omega_i * n_inv).a(z_h);
            let num = composer.gate_add(constraint);
            let constraint = Constraint::new().left(1).constant(-omega_i);
            let den = composer.gate_add(constraint.a(zeta));

            composer.component_div(num, den)
        };

        let l1 = lagrange(composer, 0);

        let mut pi_terms = Vec::with_capacity(publics.len() + 1);
        for (i, p) in publics.iter().enumerate() {
            let l_i = lagrange(composer, i);
            let constraint = Constraint::new().mult(1).a(l_i).b(*p);
            pi_terms.push((one, composer.gate_mul(constraint)));
        }

        // row of the commitment value, keyed by the selected key
        let np = key.public_inputs();
        let rows = self
            .family
            .iter()
            .map(|vk| domain.element(np + vk.commitment_index()));
        let omega_cp = Self::select(composer, &selector, rows);
        let constraint = Constraint::new().mult(n_inv).a(z_h).b(omega_cp);
        let num = composer.gate_mul(constraint);
        let constraint = Constraint::new().left(1).right(-one);
        let den = composer.gate_add(constraint.a(zeta).b(omega_cp));
        let l_cp = composer.component_div(num, den);

        let prefix = composer.append_constant(PREFIX_BSB);
        let bsb_value = composer.component_compress(hasher, prefix, bsb);
        let constraint = Constraint::new().mult(1).a(l_cp).b(bsb_value);
        pi_terms.push((one, composer.gate_mul(constraint)));

        let pi = composer.component_linear_combination(&pi_terms, zero);

        // 6. linearization identity
        let constraint = Constraint::new().mult(1).a(beta).b(s1);
        let beta_s1 = composer.gate_mul(constraint);
        let constraint = Constraint::new().mult(1).a(beta).b(s2);
        let beta_s2 = composer.gate_mul(constraint);

        let t_a = composer.component_linear_combination(
            &[(one, a), (one, beta_s1), (one, gamma)],
            zero,
        );
        let t_b = composer.component_linear_combination(
            &[(one, b), (one, beta_s2), (one, gamma)],
            zero,
        );
        let constraint = Constraint::new().left(1).right(1).a(c).b(gamma);
        let t_c = composer.gate_add(constraint);

        let constraint = Constraint::new().mult(1).a(alpha).b(t_a);
        let alpha_t_a = composer.gate_mul(constraint);
        let constraint = Constraint::new().mult(1).a(alpha_t_a).b(t_b);
        let alpha_t_ab = composer.gate_mul(constraint);
        let constraint = Constraint::new().mult(1).a(alpha_t_ab).b(t_c);
        let permutation = composer.gate_mul(constraint);
        let constraint = Constraint::new().mult(1).a(permutation).b(z_shifted);
        let permutation = composer.gate_mul(constraint);

        let constraint = Constraint::new().mult(1).a(alpha).b(alpha);
        let alpha_sq = composer.gate_mul(constraint);
        let constraint = Constraint::new().mult(1).a(alpha_sq).b(l1);
        let alpha_sq_l1 = composer.gate_mul(constraint);

        let expected = composer.component_linear_combination(
            &[(one, alpha_sq_l1), (-one, pi), (-one, permutation)],
            zero,
        );
        composer.assert_equal(expected, lin);

        // 7. linearization scalars
        let constraint = Constraint::new().mult(1).a(a).b(b);
        let ab = composer.gate_mul(constraint);

        let constraint = Constraint::new().mult(1).a(alpha_t_ab).b(beta);
        let sigma = composer.gate_mul(constraint);
        let constraint = Constraint::new().mult(1).a(sigma).b(z_shifted);
        let sigma = composer.gate_mul(constraint);

        let constraint = Constraint::new().mult(1).a(beta).b(zeta);
        let beta_zeta = composer.gate_mul(constraint);
        let shifted = [(a, one), (b, K1), (c, K2)].map(|(w, k)| {
            composer.component_linear_combination(
                &[(one, w), (k, beta_zeta), (one, gamma)],
                zero,
            )
        });
        let identity = shifted.iter().fold(alpha, |acc, t| {
            let constraint = Constraint::new().mult(1).a(acc).b(*t);
            composer.gate_mul(constraint)
        });
        let constraint = Constraint::new().left(1).right(-one);
        let s_perm = composer.gate_add(constraint.a(alpha_sq_l1).b(identity));

        let constraint = Constraint::new().mult(1).a(zeta).b(zeta);
        let zeta_sq = composer.gate_mul(constraint);
        let constraint = Constraint::new().mult(1).a(zeta_n).b(zeta_sq);
        let zeta_shard = composer.gate_mul(constraint);
        let constraint = Constraint::new().mult(1).a(zeta_shard).b(zeta_shard);
        let zeta_shard_sq = composer.gate_mul(constraint);

        let constraint = Constraint::new().left(-one).a(z_h);
        let h0_scalar = composer.gate_add(constraint);
        let constraint = Constraint::new().mult(-one).a(z_h).b(zeta_shard);
        let h1_scalar = composer.gate_mul(constraint);
        let constraint = Constraint::new().mult(-one).a(z_h).b(zeta_shard_sq);
        let h2_scalar = composer.gate_mul(constraint);

        // paired with `[BSB, QL, QR, QM, QO, QK, S3, Z, H0, H1, H2]`
        let lin_scalars = [
            qcp,
            a,
            b,
            ab,
            c,
            Composer::ONE,
            sigma,
            s_perm,
            h0_scalar,
            h1_scalar,
            h2_scalar,
        ];
        let lin_point_hashes =
            [bsb, ql_h, qr_h, qm_h, qo_h, qk_h, s3_h, z, h0, h1, h2];

        // the commitment itself is checked by the deferred check
        let scalars = lin_scalars.map(|s| composer[s]);
        let points = self.proof.linearization_points(key);
        let lin_digest = linearization_digest(&points, &scalars);
        let lin_digest = composer.component_hash_g1(hasher, &lin_digest.0);

        // 8. folding
        let fold_point_hashes = [l, r, o, s1_h, s2_h, qc_h];
        let values = [lin, a, b, c, s1, s2, qcp];

        let mut inputs = vec![cid_gamma, zeta, lin_digest];
        inputs.extend(fold_point_hashes);
        inputs.extend(values);
        inputs.push(z_shifted);
        let fold_gamma = composer.component_sum(hasher, &inputs);

        let mut fold_scalars = vec![Composer::ONE];
        for _ in 0..fold_point_hashes.len() {
            let last = fold_scalars[fold_scalars.len() - 1];
            let constraint = Constraint::new().mult(1).a(last).b(fold_gamma);
            fold_scalars.push(composer.gate_mul(constraint));
        }

        let folded: Vec<_> = values
            .iter()
            .zip(fold_scalars.iter())
            .map(|(v, g)| {
                let constraint = Constraint::new().mult(1).a(*v).b(*g);
                (one, composer.gate_mul(constraint))
            })
            .collect();
        let folded_eval = composer.component_linear_combination(&folded, zero);

        let constraint = Constraint::new().left(domain.group_gen()).a(zeta);
        let shifted_zeta = composer.gate_add(constraint);

        // 9. digest of the exported check
        let mut inputs = lin_point_hashes.to_vec();
        inputs.extend(lin_scalars);
        inputs.extend(fold_point_hashes);
        inputs.extend(fold_scalars);
        inputs.extend([
            folded_eval,
            lin_digest,
            z,
            w_z,
            w_zw,
            z_shifted,
            zeta,
            shifted_zeta,
        ]);
        let digest = composer.component_sum(hasher, &inputs);

        let value = composer[digest];
        let public = composer.append_public(value);
        composer.assert_equal(public, digest);

        Ok(())
    }
}

/// Discharge a check exported by a [`VerifierCircuit`], once the outer
/// proof is verified against `public_inputs`
pub fn discharge(
    check: &DeferredCheck,
    opening_key: &OpeningKey,
    hasher: &Hasher,
    public_inputs: &[BlsScalar],
) -> Result<(), Error> {
    match public_inputs.last() {
        Some(digest) if digest == &check.digest(hasher) => {
            check.discharge(opening_key)
        }
        _ => Err(Error::ProofVerificationError),
    }
}

/// Verifier of proofs of a [`VerifierCircuit`].
///
/// A proof is accepted once the outer proof verifies and the check it
/// exports, matched against the digest closing its public inputs, is
/// discharged with the opening key of the inner proofs.
#[derive(Debug, Clone)]
pub struct RecursiveVerifier {
    outer: Verifier,
    opening_key: OpeningKey,
    hasher: Hasher,
}

impl RecursiveVerifier {
    /// Verify proofs of `outer`, discharging the exported checks with the
    /// `opening_key` and `hasher` of the inner proofs
    pub fn new(
        outer: Verifier,
        opening_key: OpeningKey,
        hasher: Hasher,
    ) -> Self {
        Self {
            outer,
            opening_key,
            hasher,
        }
    }

    /// Verifier of the outer circuit
    pub fn outer(&self) -> &Verifier {
        &self.outer
    }

    /// Verify `proof` of the circuit along with the check it exports
    pub fn verify(
        &self,
        proof: &Proof,
        public_inputs: &[BlsScalar],
        check: &DeferredCheck,
    ) -> Result<(), Error> {
        self.outer.verify(proof, public_inputs)?;

        let result =
            discharge(check, &self.opening_key, &self.hasher, public_inputs);
        match &result {
            Ok(()) => info!("recursive proof accepted"),
            Err(err) => debug!(%err, "exported check rejected"),
        }

        result
    }
}
