// test of cm3 image module
use gimekit::img::ImageFormat;
use gimekit::img::cm3::Cm3;
use gimekit::clr::Color;

const ROW_BYTES: usize = 160;
const PAGE_ROWS: usize = 192;

/// header with no pattern section; bit 0 of flags excludes patterns
fn header(flags: u8,palette: [u8;16]) -> Vec<u8> {
    let mut ans = vec![flags | 0x01];
    ans.extend_from_slice(&palette);
    ans.push(1); // animation rate
    ans.push(1); // cycle rate
    ans.extend_from_slice(&[0;8]);
    ans.push(0); // animation flags
    ans.push(0); // cycling flags
    ans
}

fn raw_row(fill: &[u8]) -> Vec<u8> {
    assert_eq!(fill.len(),ROW_BYTES);
    let mut ans = vec![0x80];
    ans.extend_from_slice(fill);
    ans
}

/// differential row built from the two dictionaries and the literals
fn diff_row(h_dict: [u8;20],v_dict: &[u8],literals: &[u8]) -> Vec<u8> {
    let mut ans = vec![v_dict.len() as u8];
    ans.extend_from_slice(&h_dict);
    ans.extend_from_slice(v_dict);
    ans.extend_from_slice(literals);
    ans
}

fn pad_rows(buf: &mut Vec<u8>,count: usize) {
    for _i in 0..count {
        buf.append(&mut raw_row(&[0;ROW_BYTES]));
    }
}

/// check a decoded row against the packed bytes it came from
fn assert_row_natives(img: &Cm3,row: usize,expected: &[u8;ROW_BYTES]) {
    let colors = img.buffer().row(row).expect("bad row");
    assert_eq!(colors.len(),320);
    for i in 0..ROW_BYTES {
        let left = img.colormap().get((expected[i] >> 4) as usize).expect("bad index");
        let right = img.colormap().get((expected[i] & 0x0f) as usize).expect("bad index");
        assert_eq!(colors[2*i],left);
        assert_eq!(colors[2*i+1],right);
    }
}

#[test]
fn uniform_raw_page() {
    // all-0x3f rows over a black palette decode to a black screen
    let palette = [0u8;16];
    let mut buf = header(0,palette);
    for _row in 0..PAGE_ROWS {
        buf.append(&mut raw_row(&[0x3f;ROW_BYTES]));
    }
    let img = Cm3::from_bytes(&buf).expect("decode failed");
    assert_eq!(img.width(),320);
    assert_eq!(img.height(),192);
    assert_eq!(img.pages(),1);
    let black = Color::rgb(0,0,0);
    for row in 0..PAGE_ROWS {
        for color in img.buffer().row(row).expect("bad row") {
            assert_eq!(*color,black);
        }
    }
}

#[test]
fn zero_horizontal_dictionary_after_uniform_row() {
    // with the horizontal dictionary all zero every byte repeats the
    // running last byte, so a uniform raw row is reproduced exactly
    let palette: [u8;16] = [0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15];
    let mut buf = header(0,palette);
    buf.append(&mut raw_row(&[0x55;ROW_BYTES]));
    buf.append(&mut diff_row([0;20],&[],&[]));
    pad_rows(&mut buf,PAGE_ROWS-2);
    let img = Cm3::from_bytes(&buf).expect("decode failed");
    assert_row_natives(&img,0,&[0x55;ROW_BYTES]);
    assert_row_natives(&img,1,&[0x55;ROW_BYTES]);
}

#[test]
fn zero_horizontal_dictionary_runs_the_last_byte() {
    // after a non-uniform raw row the all-zero horizontal dictionary
    // yields the final byte of that row, 160 times
    let palette: [u8;16] = [0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15];
    let mut fill = [0x11;ROW_BYTES];
    fill[ROW_BYTES-1] = 0x77;
    let mut buf = header(0,palette);
    buf.append(&mut raw_row(&fill));
    buf.append(&mut diff_row([0;20],&[],&[]));
    pad_rows(&mut buf,PAGE_ROWS-2);
    let img = Cm3::from_bytes(&buf).expect("decode failed");
    assert_row_natives(&img,1,&[0x77;ROW_BYTES]);
}

#[test]
fn empty_vertical_dictionary_copies_the_row_above() {
    // horizontal all ones with a zero length vertical dictionary takes
    // every byte from the previous row, non-uniform rows included
    let palette: [u8;16] = [0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15];
    let mut fill = [0u8;ROW_BYTES];
    for i in 0..ROW_BYTES {
        fill[i] = ((i % 16) * 17) as u8; // both nibbles equal i%16
    }
    let mut buf = header(0,palette);
    buf.append(&mut raw_row(&fill));
    buf.append(&mut diff_row([0xff;20],&[],&[]));
    pad_rows(&mut buf,PAGE_ROWS-2);
    let img = Cm3::from_bytes(&buf).expect("decode failed");
    assert_row_natives(&img,0,&fill);
    assert_row_natives(&img,1,&fill);
}

#[test]
fn vertical_dictionary_selects_literals() {
    // horizontal all ones, vertical all ones: the whole row is literal
    let palette: [u8;16] = [0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15];
    let mut literals = [0u8;ROW_BYTES];
    for i in 0..ROW_BYTES {
        literals[i] = ((15 - i % 16) * 17) as u8;
    }
    let mut buf = header(0,palette);
    buf.append(&mut raw_row(&[0x22;ROW_BYTES]));
    buf.append(&mut diff_row([0xff;20],&[0xff;20],&literals));
    pad_rows(&mut buf,PAGE_ROWS-2);
    let img = Cm3::from_bytes(&buf).expect("decode failed");
    assert_row_natives(&img,1,&literals);
}

#[test]
fn mixed_selectors() {
    // first half of the row runs the last byte, second half copies the
    // row above; the vertical dictionary is consulted only where the
    // horizontal bit is set
    let palette: [u8;16] = [0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15];
    let mut buf = header(0,palette);
    buf.append(&mut raw_row(&[0x33;ROW_BYTES]));
    let mut h_dict = [0u8;20];
    for i in 10..20 {
        h_dict[i] = 0xff;
    }
    // 80 vertical reads, all zero, 10 bytes covers them
    buf.append(&mut diff_row(h_dict,&[0;10],&[]));
    pad_rows(&mut buf,PAGE_ROWS-2);
    let img = Cm3::from_bytes(&buf).expect("decode failed");
    assert_row_natives(&img,1,&[0x33;ROW_BYTES]);
}

#[test]
fn double_page_resets_state() {
    // the second page starts over with a zeroed line buffer, so its
    // first row copying "above" yields native 0 everywhere
    let palette: [u8;16] = [0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15];
    let mut buf = header(0x80,palette);
    for _row in 0..PAGE_ROWS {
        buf.append(&mut raw_row(&[0x99;ROW_BYTES]));
    }
    buf.append(&mut diff_row([0xff;20],&[],&[]));
    pad_rows(&mut buf,PAGE_ROWS-1);
    let img = Cm3::from_bytes(&buf).expect("decode failed");
    assert_eq!(img.pages(),2);
    assert_eq!(img.height(),384);
    assert_row_natives(&img,191,&[0x99;ROW_BYTES]);
    assert_row_natives(&img,192,&[0;ROW_BYTES]);
}

#[test]
fn pattern_section() {
    let palette = [0u8;16];
    let mut buf = vec![0x00]; // patterns included
    buf.extend_from_slice(&header(0,palette)[1..]);
    buf.extend_from_slice(&[0;3]);
    for i in 0..24u8 {
        buf.push(i % 16); // background
        buf.push(15 - i % 16); // foreground
        buf.extend_from_slice(&[0xaa;8]);
    }
    for _row in 0..PAGE_ROWS {
        buf.append(&mut raw_row(&[0;ROW_BYTES]));
    }
    let img = Cm3::from_bytes(&buf).expect("decode failed");
    assert_eq!(img.patterns().len(),24);
    assert_eq!(img.patterns()[3].background_index,3);
    assert_eq!(img.patterns()[3].foreground_index,12);
}

#[test]
fn pattern_index_out_of_range() {
    let palette = [0u8;16];
    let mut buf = vec![0x00];
    buf.extend_from_slice(&header(0,palette)[1..]);
    buf.extend_from_slice(&[0;3]);
    for _i in 0..24u8 {
        buf.push(16); // out of range
        buf.push(0);
        buf.extend_from_slice(&[0;8]);
    }
    let err = Cm3::from_bytes(&buf).expect_err("decode should have failed");
    assert!(err.to_string().contains("pattern section"));
}

#[test]
fn truncated_header() {
    let palette = [0u8;16];
    let buf = header(0,palette);
    let err = Cm3::from_bytes(&buf[..10]).expect_err("decode should have failed");
    assert!(err.to_string().contains("CM3 header"));
}

#[test]
fn truncated_pattern_section() {
    let palette = [0u8;16];
    let mut buf = vec![0x00]; // patterns expected
    buf.extend_from_slice(&header(0,palette)[1..]);
    buf.extend_from_slice(&[0;3]);
    buf.extend_from_slice(&[0;30]); // only 3 of 24 patterns
    let err = Cm3::from_bytes(&buf).expect_err("decode should have failed");
    assert!(err.to_string().contains("CM3 pattern section"));
}

#[test]
fn truncated_last_row() {
    let palette = [0u8;16];
    let mut buf = header(0,palette);
    for _row in 0..PAGE_ROWS-1 {
        buf.append(&mut raw_row(&[0;ROW_BYTES]));
    }
    buf.push(0x80);
    buf.extend_from_slice(&[0;ROW_BYTES-1]); // one byte short
    let err = Cm3::from_bytes(&buf).expect_err("decode should have failed");
    assert!(err.to_string().contains("row 191"));
}

#[test]
fn truncated_dictionary() {
    let palette = [0u8;16];
    let mut buf = header(0,palette);
    buf.push(0x00); // differential row, empty vertical dictionary
    buf.extend_from_slice(&[0;10]); // half the horizontal dictionary
    let err = Cm3::from_bytes(&buf).expect_err("decode should have failed");
    assert!(err.to_string().contains("row 0 horizontal dictionary"));
}

#[test]
fn exhausted_vertical_dictionary() {
    // 80 set horizontal bits but only one vertical byte
    let palette = [0u8;16];
    let mut buf = header(0,palette);
    buf.append(&mut raw_row(&[0;ROW_BYTES]));
    let mut h_dict = [0u8;20];
    for i in 10..20 {
        h_dict[i] = 0xff;
    }
    buf.append(&mut diff_row(h_dict,&[0;1],&[]));
    pad_rows(&mut buf,PAGE_ROWS-2);
    let err = Cm3::from_bytes(&buf).expect_err("decode should have failed");
    assert!(err.to_string().contains("row 1 vertical dictionary"));
}
