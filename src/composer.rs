// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! PLONK composer definitions

use core::ops;

use dusk_bls12_381::BlsScalar;
use num_bigint::BigUint;

use crate::error::Error;
use crate::util::{pow, scalar_bits};

mod circuit;
mod commitment;
mod compiler;
mod constraint_system;
mod decomposition;
mod gate;
mod poseidon2;
mod prover;
mod verifier;

pub(crate) mod permutation;

pub use circuit::Circuit;
pub use compiler::Compiler;
pub use constraint_system::{Constraint, Witness};
pub use gate::Gate;
pub use prover::Prover;
pub use verifier::Verifier;

pub(crate) use commitment::{BsbCommitment, BsbOracle, CommitmentSlot};
pub(crate) use constraint_system::{Selector, WireData, WiredWitness};
pub(crate) use permutation::Permutation;

/// Construct and prove circuits
#[derive(Debug, Clone)]
pub struct Composer {
    /// Constraint system gates
    pub(crate) constraints: Vec<Gate>,

    /// Witnesses hosted by the public rows, in row order
    pub(crate) public_inputs: Vec<Witness>,

    /// Witness values
    pub(crate) witnesses: Vec<BlsScalar>,

    /// Declared commitment slot
    pub(crate) commitment: Option<CommitmentSlot>,

    /// Evaluates the commitment while proving
    oracle: Option<BsbOracle>,
}

impl ops::Index<Witness> for Composer {
    type Output = BlsScalar;

    fn index(&self, w: Witness) -> &Self::Output {
        &self.witnesses[w.index()]
    }
}

impl Composer {
    /// Zero representation inside the constraint system.
    ///
    /// A composer expects the first witness to be always present and to
    /// be zero.
    pub const ZERO: Witness = Witness::ZERO;

    /// `One` representation inside the constraint system.
    ///
    /// A composer expects the 2nd witness to be always present and to
    /// be one.
    pub const ONE: Witness = Witness::ONE;

    /// Constraints count
    pub fn constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Public inputs count
    pub fn public_inputs(&self) -> usize {
        self.public_inputs.len()
    }

    /// Initialize the constraint system with the constants for 0 and 1
    pub fn initialized() -> Self {
        let mut slf = Self::uninitialized();

        let zero = slf.append_witness(0);
        let one = slf.append_witness(1);

        slf.assert_equal_constant(zero, 0);
        slf.assert_equal_constant(one, 1);

        slf
    }

    /// Initialized constraint system evaluating its commitment with
    /// `oracle`
    pub(crate) fn proving(oracle: BsbOracle) -> Self {
        let mut slf = Self::initialized();
        slf.oracle = Some(oracle);
        slf
    }

    fn uninitialized() -> Self {
        Self {
            constraints: Vec::new(),
            public_inputs: Vec::new(),
            witnesses: Vec::new(),
            commitment: None,
            oracle: None,
        }
    }

    /// Allocate a witness value into the composer and return its index.
    pub fn append_witness<W: Into<BlsScalar>>(
        &mut self,
        witness: W,
    ) -> Witness {
        let n = self.witnesses.len();

        self.witnesses.push(witness.into());

        Witness::new(n)
    }

    /// Allocate a witness hosted by a public row.
    ///
    /// Public rows come first in the layout, in allocation order.
    pub fn append_public<P: Into<BlsScalar>>(&mut self, public: P) -> Witness {
        let w = self.append_witness(public);

        self.public_inputs.push(w);

        w
    }

    /// Constrain a scalar into the circuit description and return an
    /// allocated [`Witness`] with its value
    pub fn append_constant<C: Into<BlsScalar>>(
        &mut self,
        constant: C,
    ) -> Witness {
        let constant = constant.into();
        let witness = self.append_witness(constant);

        self.assert_equal_constant(witness, constant);

        witness
    }

    /// Append a new width-3 gate/constraint.
    ///
    /// The constraint added will enforce the following:
    /// `q_M · a · b  + q_L · a + q_R · b + q_O · c + q_K = 0`.
    pub fn append_gate(&mut self, constraint: Constraint) {
        self.constraints.push(Gate::from(constraint));
    }

    /// Evaluate the polynomial and append an output that satisfies the
    /// equation
    ///
    /// Return `None` if the output selector is zero
    pub fn append_evaluated_output(
        &mut self,
        s: Constraint,
    ) -> Option<Witness> {
        let a = self[s.witness(WiredWitness::A)];
        let b = self[s.witness(WiredWitness::B)];

        let qm = s.coeff(Selector::Multiplication);
        let ql = s.coeff(Selector::Left);
        let qr = s.coeff(Selector::Right);
        let qk = s.coeff(Selector::Constant);

        let x = qm * a * b + ql * a + qr * b + qk;

        let y = s.coeff(Selector::Output);

        let c = if y == &-BlsScalar::one() {
            Some(x)
        } else if y == &BlsScalar::one() {
            Some(-x)
        } else {
            Option::from(y.invert()).map(|y: BlsScalar| x * (-y))
        };

        c.map(|c| self.append_witness(c))
    }

    /// Evaluate and return `c` by appending a new constraint into the
    /// circuit.
    ///
    /// Set `q_O = (-1)` and override the output of the constraint with:
    /// `c := q_M · a · b + q_L · a + q_R · b + q_K`
    pub fn gate_add(&mut self, s: Constraint) -> Witness {
        let s = s.output(-BlsScalar::one());

        // the output selector is -1
        let c = self.append_evaluated_output(s).unwrap_or(Self::ZERO);
        let s = s.c(c);

        self.append_gate(s);

        c
    }

    /// Evaluate and return `c` by appending a new constraint into the
    /// circuit.
    ///
    /// Same as [`Self::gate_add`]; reads better for product gates.
    pub fn gate_mul(&mut self, s: Constraint) -> Witness {
        self.gate_add(s)
    }

    /// Asserts `a == b` by appending a gate
    pub fn assert_equal(&mut self, a: Witness, b: Witness) {
        let constraint =
            Constraint::new().left(1).right(-BlsScalar::one()).a(a).b(b);

        self.append_gate(constraint);
    }

    /// Asserts `a == constant` by appending a gate
    pub fn assert_equal_constant<C: Into<BlsScalar>>(
        &mut self,
        a: Witness,
        constant: C,
    ) {
        let constant = constant.into();
        let constraint = Constraint::new().left(1).constant(-constant).a(a);

        self.append_gate(constraint);
    }

    /// Adds a boolean constraint (also known as binary constraint) where the
    /// gate eq. will enforce that the [`Witness`] received is either `0` or
    /// `1` by adding a constraint in the circuit.
    pub fn component_boolean(&mut self, a: Witness) {
        let constraint = Constraint::new()
            .mult(1)
            .left(-BlsScalar::one())
            .a(a)
            .b(a);

        self.append_gate(constraint);
    }

    /// Conditionally selects a [`Witness`] based on an input bit.
    ///
    /// bit == 1 => a,
    /// bit == 0 => b,
    ///
    /// `bit` is expected to be constrained by
    /// [`Composer::component_boolean`]
    pub fn component_select(
        &mut self,
        bit: Witness,
        a: Witness,
        b: Witness,
    ) -> Witness {
        // a - b
        let constraint =
            Constraint::new().left(1).right(-BlsScalar::one()).a(a).b(b);
        let diff = self.gate_add(constraint);

        // bit * (a - b)
        let constraint = Constraint::new().mult(1).a(bit).b(diff);
        let masked = self.gate_mul(constraint);

        // bit * (a - b) + b
        let constraint = Constraint::new().left(1).right(1).a(masked).b(b);
        self.gate_add(constraint)
    }

    /// `Σ q_i · w_i + constant`, chained over two-input gates
    pub fn component_linear_combination(
        &mut self,
        terms: &[(BlsScalar, Witness)],
        constant: BlsScalar,
    ) -> Witness {
        let mut iter = terms.iter();

        let mut acc = match iter.next() {
            Some((q, w)) => {
                let constraint =
                    Constraint::new().left(*q).constant(constant).a(*w);
                self.gate_add(constraint)
            }
            None => return self.append_constant(constant),
        };

        for (q, w) in iter {
            let constraint = Constraint::new().left(1).right(*q).a(acc).b(*w);
            acc = self.gate_add(constraint);
        }

        acc
    }

    /// `num / den`, constrained as `q · den = num`
    ///
    /// A zero denominator leaves the circuit unsatisfied unless `num` is
    /// also zero.
    pub fn component_div(&mut self, num: Witness, den: Witness) -> Witness {
        let value = Option::from(self[den].invert())
            .map(|inv: BlsScalar| self[num] * inv)
            .unwrap_or(BlsScalar::zero());
        let q = self.append_witness(value);

        let constraint = Constraint::new()
            .mult(1)
            .output(-BlsScalar::one())
            .a(q)
            .b(den)
            .c(num);
        self.append_gate(constraint);

        q
    }

    /// Decomposes `scalar` into an array truncated to `N` bits (max 256) in
    /// little endian.
    /// The `scalar` for 4, for example, would be deconstructed into the array
    /// `[0, 0, 1]` for `N = 3` and `[0, 0, 1, 0, 0]` for `N = 5`.
    ///
    /// Asserts the reconstruction of the bits to be equal to `scalar`. So
    /// with the above example, the deconstruction of 4 for `N < 3` would
    /// result in an unsatisfied circuit.
    ///
    /// Consumes `2 · N + 1` gates
    pub fn component_decomposition<const N: usize>(
        &mut self,
        scalar: Witness,
    ) -> [Witness; N] {
        let mut decomposition = [Self::ZERO; N];

        self.component_bits(scalar, N)
            .into_iter()
            .zip(decomposition.iter_mut())
            .for_each(|(bit, w)| *w = bit);

        decomposition
    }

    /// Little endian decomposition of `scalar` into `bits` constrained
    /// booleans, `bits <= 256`.
    pub fn component_bits(
        &mut self,
        scalar: Witness,
        bits: usize,
    ) -> Vec<Witness> {
        let bits = bits.min(256);
        let value = scalar_bits(&self[scalar]);
        let two = BlsScalar::from(2u64);

        let mut decomposition = Vec::with_capacity(bits);
        let mut acc = Self::ZERO;

        for (i, bit) in value.iter().take(bits).enumerate() {
            let w_bit = self.append_witness(BlsScalar::from(*bit as u64));

            self.component_boolean(w_bit);

            let constraint = Constraint::new()
                .left(pow(&two, i as u64))
                .right(1)
                .a(w_bit)
                .b(acc);
            acc = self.gate_add(constraint);

            decomposition.push(w_bit);
        }

        self.assert_equal(acc, scalar);

        decomposition
    }

    /// Asserts the integer represented by the little endian `bits` is
    /// strictly smaller than `bound`.
    ///
    /// The bits are scanned from the most significant with an "equal so
    /// far" flag `eq` and a "smaller" accumulator `lt`. `bits` are expected
    /// to be constrained booleans.
    pub fn assert_less_than_constant(
        &mut self,
        bits: &[Witness],
        bound: &BigUint,
    ) {
        // every value of `bits` is below the bound
        if bound.bits() as usize > bits.len() {
            return;
        }

        let mut eq = Self::ONE;
        let mut lt = Self::ZERO;

        for (i, v) in bits.iter().enumerate().rev() {
            // eq · (1 - v)
            let constraint = Constraint::new()
                .mult(-BlsScalar::one())
                .left(1)
                .a(eq)
                .b(*v);
            let eq_not_v = self.gate_add(constraint);

            if bound.bit(i as u64) {
                let constraint =
                    Constraint::new().left(1).right(1).a(lt).b(eq_not_v);
                lt = self.gate_add(constraint);

                let constraint = Constraint::new().mult(1).a(eq).b(*v);
                eq = self.gate_mul(constraint);
            } else {
                eq = eq_not_v;
            }
        }

        self.assert_equal_constant(lt, 1);
    }

    /// Declare the commitment slot of the circuit over `witnesses` and
    /// return the witness of its value.
    ///
    /// Each committed witness gets a row `-a + q_cp·bsb = 0`; the value is
    /// constrained on the row following them. A circuit declares at most
    /// one commitment.
    pub fn commit(&mut self, witnesses: &[Witness]) -> Result<Witness, Error> {
        if self.commitment.is_some() {
            return Err(Error::TooManyCommitments(2));
        }

        let mut committed = Vec::with_capacity(witnesses.len());
        for w in witnesses {
            committed.push(self.constraints.len());

            let constraint = Constraint::new()
                .left(-BlsScalar::one())
                .set(Selector::Commitment, 1)
                .a(*w);
            self.append_gate(constraint);
        }

        let index = self.constraints.len();
        let (value, bsb) = match &self.oracle {
            Some(oracle) => {
                let values: Vec<_> = committed
                    .iter()
                    .zip(witnesses)
                    .map(|(idx, w)| (*idx, self[*w]))
                    .collect();
                let (bsb, value) = oracle.commit(&values, index)?;

                (value, Some(bsb))
            }
            None => (BlsScalar::zero(), None),
        };

        let value = self.append_witness(value);
        let constraint = Constraint::new().left(-BlsScalar::one()).a(value);
        self.append_gate(constraint);

        self.commitment = Some(CommitmentSlot {
            index,
            committed,
            value,
            bsb,
        });

        Ok(value)
    }

    /// Close the constraint system, injecting an empty commitment when the
    /// circuit declared none.
    pub fn finalize(&mut self) -> Result<(), Error> {
        if self.commitment.is_none() {
            self.commit(&[])?;
        }

        Ok(())
    }

    /// Rows of the layout: the public rows followed by the gates
    pub(crate) fn rows(&self) -> Vec<Gate> {
        self.public_inputs
            .iter()
            .map(|w| Gate::public(*w))
            .chain(self.constraints.iter().copied())
            .collect()
    }

    /// Values of the public inputs, in row order
    pub fn public_input_values(&self) -> Vec<BlsScalar> {
        self.public_inputs.iter().map(|w| self[*w]).collect()
    }

    /// Row of the first constraint the witnesses don't satisfy.
    ///
    /// Committed witnesses and the commitment value are read from the
    /// witnesses themselves, so only the arithmetic of the circuit is
    /// checked.
    pub fn unsatisfied_row(&self) -> Option<usize> {
        let np = self.public_inputs.len();
        let slot_index = self.commitment.as_ref().map(|slot| slot.index);

        self.constraints
            .iter()
            .enumerate()
            .find(|(i, gate)| {
                let a = self[gate.a];
                let extra = match slot_index == Some(*i) {
                    true => a,
                    false => BlsScalar::zero(),
                };

                gate.evaluate(&a, &self[gate.b], &self[gate.c], &extra, &a)
                    != BlsScalar::zero()
            })
            .map(|(i, _)| np + i)
    }
}
