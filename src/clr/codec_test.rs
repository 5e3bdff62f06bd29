use super::*;
use crate::bitfield::Bitfield;

fn layout_2bit() -> ColorLayout {
    ColorLayout::new(8,[
        Bitfield::simple(2,6).expect("bad field"),
        Bitfield::simple(2,4).expect("bad field"),
        Bitfield::simple(2,2).expect("bad field"),
        Bitfield::simple(2,0).expect("bad field")
    ]).expect("bad layout")
}

fn layout_rgb332() -> ColorLayout {
    ColorLayout::new(8,[
        Bitfield::simple(3,5).expect("bad field"),
        Bitfield::simple(3,2).expect("bad field"),
        Bitfield::simple(2,0).expect("bad field"),
        Bitfield::empty()
    ]).expect("bad layout")
}

#[test]
fn two_bit_scale() {
    let layout = layout_2bit();
    // channel steps are 0,85,170,255
    let color = codec::to_color(&layout,0b00_01_10_11).expect("decode failed");
    assert_eq!(color,Color::rgba(0,85,170,255));
}

#[test]
fn packed_round_trip() {
    // every representable packed value must survive both directions
    for layout in [layout_2bit(),layout_rgb332(),ColorLayout::gime_rgb()] {
        for packed in 0..=layout.mask() {
            if packed & !layout.mask() != 0 {
                continue;
            }
            let color = codec::to_color(&layout,packed).expect("decode failed");
            assert_eq!(codec::from_color(&layout,&color).expect("encode failed"),packed);
        }
    }
}

#[test]
fn precision_rejected() {
    let layout = layout_2bit();
    // 84 is one step off the 2 bit scale
    assert!(matches!(codec::from_rgba(&layout,84,0,0,255),Err(Error::PrecisionLoss)));
    assert!(codec::from_rgba(&layout,85,0,0,255).is_ok());
    // 3 bit scale has steps 0,36,72,109,145,182,218,255
    let layout = layout_rgb332();
    assert!(codec::from_rgb(&layout,36,0,0).is_ok());
    assert!(matches!(codec::from_rgb(&layout,37,0,0),Err(Error::PrecisionLoss)));
}

#[test]
fn stray_bits_rejected() {
    let layout = layout_rgb332();
    assert!(codec::to_color(&layout,0xff).is_ok());
    let layout = ColorLayout::gime_rgb();
    assert!(matches!(codec::to_color(&layout,0x40),Err(Error::PackedColorFormat)));
}

#[test]
fn absent_alpha() {
    let layout = layout_rgb332();
    // absent channel reads as zero and only accepts zero
    let color = codec::to_color(&layout,0).expect("decode failed");
    assert_eq!(color.a,0);
    assert!(matches!(codec::from_rgba(&layout,0,0,0,255),Err(Error::PrecisionLoss)));
    // from_rgb picks the representable alpha on its own
    assert_eq!(codec::from_rgb(&layout,0,0,0).expect("encode failed"),0);
}

#[test]
fn gime_packing() {
    let layout = ColorLayout::gime_rgb();
    assert_eq!(codec::from_rgb(&layout,85,170,255).expect("encode failed"),0x1d);
    let color = codec::to_color(&layout,0x1d).expect("decode failed");
    assert_eq!((color.r,color.g,color.b),(85,170,255));
}
