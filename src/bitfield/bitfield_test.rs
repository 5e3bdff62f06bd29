use super::*;

#[test]
fn round_trip_simple() {
    for size in 1..=8 {
        let field = Bitfield::simple(size,7).expect("bad field");
        for v in 0..=field.max_value() {
            let storage = field.set_in(0,v).expect("set failed");
            assert_eq!(field.get_from(storage),v);
        }
    }
}

#[test]
fn round_trip_split() {
    // GIME-like split: 2 bits at 8 joined to 3 bits at 2
    let field = Bitfield::split((2,8),(3,2)).expect("bad field");
    assert_eq!(field.max_value(),31);
    for v in 0..=31 {
        let storage = field.set_in(0,v).expect("set failed");
        assert_eq!(field.get_from(storage),v);
    }
}

#[test]
fn split_parts_land_separately() {
    let field = Bitfield::split((2,8),(3,2)).expect("bad field");
    let storage = field.set_in(0,0b10110).expect("set failed");
    assert_eq!(storage,(0b10 << 8) | (0b110 << 2));
}

#[test]
fn surrounding_bits_preserved() {
    let field = Bitfield::simple(4,4).expect("bad field");
    let storage = field.set_in(0xffff_ffff,0).expect("set failed");
    assert_eq!(storage,0xffff_ff0f);
    assert_eq!(field.get_from(storage),0);
}

#[test]
fn value_overflow() {
    let field = Bitfield::simple(3,0).expect("bad field");
    assert!(field.set_in(0,8).is_err());
    assert!(field.set_in(0,7).is_ok());
}

#[test]
fn construction_failures() {
    assert!(matches!(Bitfield::simple(0,0),Err(Error::ZeroWidth)));
    assert!(matches!(Bitfield::simple(33,0),Err(Error::TooLarge)));
    assert!(matches!(Bitfield::simple(8,25),Err(Error::StorageOverflow)));
    assert!(matches!(Bitfield::split((20,0),(20,0)),Err(Error::TooLarge)));
}

#[test]
fn empty_field() {
    let field = Bitfield::empty();
    assert_eq!(field.max_value(),0);
    assert_eq!(field.mask(),0);
    assert_eq!(field.get_from(0xffff_ffff),0);
    assert_eq!(field.set_in(0x1234,0).expect("set failed"),0x1234);
    assert!(field.set_in(0,1).is_err());
}

#[test]
fn full_width_field() {
    let field = Bitfield::simple(32,0).expect("bad field");
    assert_eq!(field.max_value(),u32::MAX);
    let storage = field.set_in(0,0xdead_beef).expect("set failed");
    assert_eq!(field.get_from(storage),0xdead_beef);
}
