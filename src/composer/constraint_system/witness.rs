// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

/// Stores the data for a specific wire in an arithmetic circuit
/// This data is the row index and the type of wire
/// Left(1) signifies that this wire belongs to the second row and is the left
/// wire
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum WireData {
    /// Left Wire of n'th row
    Left(usize),
    /// Right Wire of n'th row
    Right(usize),
    /// Output Wire of n'th row
    Output(usize),
}

/// Allocated witness in the constraint system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Witness {
    index: usize,
}

impl Default for Witness {
    fn default() -> Self {
        Witness::ZERO
    }
}

impl Witness {
    /// A `0` witness representation.
    pub const ZERO: Witness = Witness::new(0);

    /// A `1` witness representation.
    pub const ONE: Witness = Witness::new(1);

    /// Generate a new [`Witness`]
    pub(crate) const fn new(index: usize) -> Self {
        Self { index }
    }

    /// Index of the allocated witness in the composer
    pub const fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn witness_constants_and_default_are_consistent() {
        assert_eq!(Witness::ZERO.index(), 0);
        assert_eq!(Witness::ONE.index(), 1);

        assert_eq!(Witness::default(), Witness::ZERO);
    }

    #[test]
    fn wire_data_variants_are_distinct() {
        assert_ne!(WireData::Left(0), WireData::Right(0));
        assert_ne!(WireData::Right(0), WireData::Output(0));
        assert_ne!(WireData::Left(0), WireData::Left(1));
    }
}
