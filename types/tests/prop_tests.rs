use proptest::prelude::*;

use stakevote_types::{Epoch, Timestamp, ValidatorAddress};

proptest! {
    /// Any 32 bytes produce an address that parses back to itself.
    #[test]
    fn address_from_bytes_parses(bytes in prop::array::uniform32(0u8..)) {
        let addr = ValidatorAddress::from_bytes(bytes);
        prop_assert_eq!(ValidatorAddress::parse(addr.as_str()).unwrap(), addr);
    }

    /// Address ordering follows byte ordering, since the hex is fixed-width lowercase.
    #[test]
    fn address_ordering_matches_bytes(
        a in prop::array::uniform32(0u8..),
        b in prop::array::uniform32(0u8..),
    ) {
        let (x, y) = (ValidatorAddress::from_bytes(a), ValidatorAddress::from_bytes(b));
        prop_assert_eq!(x.cmp(&y), a.cmp(&b));
    }

    /// Timestamp ordering: from_millis(a) <= from_millis(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in any::<u64>(), b in any::<u64>()) {
        let (ta, tb) = (Timestamp::from_millis(a), Timestamp::from_millis(b));
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Epoch ordering follows the numeric order.
    #[test]
    fn epoch_ordering(a in any::<u64>(), b in any::<u64>()) {
        prop_assert_eq!(Epoch::new(a).cmp(&Epoch::new(b)), a.cmp(&b));
        prop_assert_eq!(Epoch::new(a).as_u64(), a);
    }
}
