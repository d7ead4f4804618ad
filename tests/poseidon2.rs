// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use eon_plonk::hash::Poseidon2Params;
use eon_plonk::prelude::*;
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = BlsScalar> {
    any::<[u64; 4]>().prop_map(BlsScalar::from_raw)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn compress_gadget_matches_the_hash(a in scalar(), b in scalar()) {
        let hasher = Hasher::default();
        let mut composer = Composer::initialized();

        let w_a = composer.append_witness(a);
        let w_b = composer.append_witness(b);
        let out = composer.component_compress(&hasher, w_a, w_b);

        prop_assert_eq!(composer[out], hasher.compress(&a, &b));
        prop_assert_eq!(composer.unsatisfied_row(), None);
    }

    #[test]
    fn sum_gadget_matches_the_hash(
        values in prop::collection::vec(scalar(), 0..6)
    ) {
        let hasher = Hasher::default();
        let mut composer = Composer::initialized();

        let witnesses: Vec<_> =
            values.iter().map(|v| composer.append_witness(*v)).collect();
        let out = composer.component_sum(&hasher, &witnesses);

        prop_assert_eq!(composer[out], hasher.sum(&values));
        prop_assert_eq!(composer.unsatisfied_row(), None);
    }

    #[test]
    fn wide_permutation_gadget_matches(state in any::<[[u64; 4]; 3]>()) {
        let config = HashConfig {
            width: 3,
            ..Default::default()
        };
        let params = Poseidon2Params::new(&config)
            .expect("Width 3 should be supported");

        let mut expected = state.map(BlsScalar::from_raw);
        let mut composer = Composer::initialized();
        let witnesses: Vec<_> = expected
            .iter()
            .map(|s| composer.append_witness(*s))
            .collect();

        let out = composer
            .component_poseidon2(&params, &witnesses)
            .expect("State width should match");
        params
            .permute(&mut expected)
            .expect("State width should match");

        let got: Vec<_> = out.iter().map(|w| composer[*w]).collect();
        prop_assert_eq!(got, expected.to_vec());
        prop_assert_eq!(composer.unsatisfied_row(), None);
    }
}

#[test]
fn gadget_rejects_mismatched_width() {
    let hasher = Hasher::default();
    let mut composer = Composer::initialized();

    let state = [Composer::ZERO; 3];
    let err = composer
        .component_poseidon2(hasher.params(), &state)
        .expect_err("Width 2 parameters shouldn't permute 3 elements");

    assert_eq!(
        err,
        Error::InvalidStateWidth {
            expected: 2,
            provided: 3
        }
    );
}
