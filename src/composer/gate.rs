// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_bls12_381::BlsScalar;

use super::{Constraint, Selector, WiredWitness, Witness};

/// Represents a gate with its associated wire data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    // Selectors
    /// Multiplier selector
    pub(crate) q_m: BlsScalar,
    /// Left wire selector
    pub(crate) q_l: BlsScalar,
    /// Right wire selector
    pub(crate) q_r: BlsScalar,
    /// Output wire selector
    pub(crate) q_o: BlsScalar,
    /// Constant wire selector
    pub(crate) q_k: BlsScalar,
    /// Commitment selector
    pub(crate) q_cp: BlsScalar,

    /// Left wire witness.
    pub(crate) a: Witness,
    /// Right wire witness.
    pub(crate) b: Witness,
    /// Output wire witness.
    pub(crate) c: Witness,
}

impl From<Constraint> for Gate {
    fn from(constraint: Constraint) -> Self {
        Self {
            q_m: *constraint.coeff(Selector::Multiplication),
            q_l: *constraint.coeff(Selector::Left),
            q_r: *constraint.coeff(Selector::Right),
            q_o: *constraint.coeff(Selector::Output),
            q_k: *constraint.coeff(Selector::Constant),
            q_cp: *constraint.coeff(Selector::Commitment),
            a: constraint.witness(WiredWitness::A),
            b: constraint.witness(WiredWitness::B),
            c: constraint.witness(WiredWitness::C),
        }
    }
}

impl Gate {
    /// Gate with every selector and wire zeroed, used to pad the domain
    pub(crate) const fn padding() -> Self {
        Self {
            q_m: BlsScalar::zero(),
            q_l: BlsScalar::zero(),
            q_r: BlsScalar::zero(),
            q_o: BlsScalar::zero(),
            q_k: BlsScalar::zero(),
            q_cp: BlsScalar::zero(),
            a: Witness::ZERO,
            b: Witness::ZERO,
            c: Witness::ZERO,
        }
    }

    /// Row hosting a public input on its left wire
    pub(crate) fn public(w: Witness) -> Self {
        Self {
            q_l: -BlsScalar::one(),
            a: w,
            ..Self::padding()
        }
    }

    /// `q_m·a·b + q_l·a + q_r·b + q_o·c + q_k + extra + q_cp·bsb`
    ///
    /// `extra` completes the constant selector with the values only known
    /// at proving time.
    pub(crate) fn evaluate(
        &self,
        a: &BlsScalar,
        b: &BlsScalar,
        c: &BlsScalar,
        extra: &BlsScalar,
        bsb: &BlsScalar,
    ) -> BlsScalar {
        self.q_m * a * b
            + self.q_l * a
            + self.q_r * b
            + self.q_o * c
            + self.q_k
            + extra
            + self.q_cp * bsb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_from_constraint_keeps_selectors() {
        let a = Witness::new(2);
        let b = Witness::new(3);
        let constraint = Constraint::new().mult(1).left(2).right(3).a(a).b(b);

        let gate = Gate::from(constraint);

        assert_eq!(gate.q_m, BlsScalar::one());
        assert_eq!(gate.q_l, BlsScalar::from(2u64));
        assert_eq!(gate.q_r, BlsScalar::from(3u64));
        assert_eq!(gate.q_o, BlsScalar::zero());
        assert_eq!(gate.q_cp, BlsScalar::zero());
        assert_eq!((gate.a, gate.b, gate.c), (a, b, Witness::ZERO));
    }

    #[test]
    fn gate_evaluation() {
        // a·b - c = 0
        let gate =
            Gate::from(Constraint::new().mult(1).output(-BlsScalar::one()));

        let two = BlsScalar::from(2u64);
        let three = BlsScalar::from(3u64);
        let six = BlsScalar::from(6u64);
        let zero = BlsScalar::zero();

        assert_eq!(gate.evaluate(&two, &three, &six, &zero, &zero), zero);
        assert_ne!(gate.evaluate(&two, &three, &two, &zero, &zero), zero);

        let public = Gate::public(Witness::new(2));
        assert_eq!(public.evaluate(&six, &zero, &zero, &six, &zero), zero);
    }

    #[test]
    fn padding_gate_is_always_satisfied() {
        let gate = Gate::padding();
        let x = BlsScalar::from(42u64);

        let zero = BlsScalar::zero();

        assert_eq!(gate.evaluate(&x, &x, &x, &zero, &x), zero);
    }
}
