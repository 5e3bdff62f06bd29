//! ## Support for CM3 images
//!
//! CM3 is the CoCoMax III picture format, 320x192 in 16 colors at 4 bits
//! per pixel, with an optional second page stacked below the first.  The
//! header carries the palette, animation and cycling metadata, and usually
//! a set of brush patterns.  Everything in the file is big-endian.
//!
//! Rows are stored behind a differential scheme with two selector
//! bitstreams per row, see `PageDecoder`.  The scheme is decode-only in
//! this library, nothing ever writes a CM3.

use binrw::BinRead;
use binrw::io::Cursor;
use log::{trace,warn};
use bit_vec::BitVec;
use crate::img;
use crate::img::{get_byte,get_slice,palette_json};
use crate::clr::ColorMap;
use crate::clr::gime::{self,Colorspace};
use crate::pix::{packed,PixelBuffer,PixelView};
use crate::{STDRESULT,DYNERR};

pub const WIDTH: usize = 320;
pub const PAGE_ROWS: usize = 192;
/// bytes in one packed row, two pixels per byte
pub const ROW_BYTES: usize = 160;
pub const COLORS: usize = 16;
const PATTERN_COUNT: usize = 24;
/// horizontal dictionary is one bit per output byte
const H_DICT_BYTES: usize = 20;

const DOUBLE_PAGE_MASK: u8 = 0x80;
const NO_PATTERNS_MASK: u8 = 0x01;
const RAW_ROW_MASK: u8 = 0x80;
const V_DICT_LEN_MASK: u8 = 0x7f;
const MAX_PATTERN_INDEX: u8 = 15;

pub fn file_extensions() -> Vec<String> {
    vec!["cm3".to_string()]
}

#[derive(BinRead)]
#[br(big)]
struct Header {
    flags: u8,
    palette: [u8;COLORS],
    animation_rate: u8,
    cycle_rate: u8,
    cycle_palette: [u8;8],
    animation_flags: u8,
    cycling_flags: u8
}

#[derive(BinRead)]
#[br(big)]
struct PatternSection {
    _reserved: [u8;3],
    #[br(count = PATTERN_COUNT)]
    patterns: Vec<PatternRecord>
}

#[derive(BinRead)]
#[br(big)]
struct PatternRecord {
    background: u8,
    foreground: u8,
    bitmap: [u8;8]
}

/// Brush pattern carried in the header.  These are editor metadata, the
/// row decoder never consumes them.
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub struct Pattern {
    pub background_index: u8,
    pub foreground_index: u8,
    pub bitmap: [u8;8]
}

/// Decodes one page of 192 rows.  The 160 byte line buffer and the running
/// last byte persist across the page's rows, starting at zero.  A fresh
/// decoder is required for each page.
struct PageDecoder {
    line: [u8;ROW_BYTES],
    last: u8
}

impl PageDecoder {
    fn new() -> Self {
        Self {
            line: [0;ROW_BYTES],
            last: 0
        }
    }
    /// Decode rows from `buf` starting at `ptr` until the view is full,
    /// advancing `ptr` past the consumed bytes.  Each completed row is
    /// unpacked through the colormap into the view.
    fn decode_page(&mut self,buf: &[u8],ptr: &mut usize,page: usize,colormap: &ColorMap,view: &mut PixelView) -> STDRESULT {
        if view.height() != PAGE_ROWS {
            return Err(Box::new(img::Error::RowCountMismatch));
        }
        if view.width() != WIDTH {
            return Err(Box::new(img::Error::ImageSizeMismatch));
        }
        let layout = packed::PackedLayout::new(4)?;
        let mut pos = *ptr;
        for row in 0..PAGE_ROWS {
            let ctrl = get_byte!(buf,pos,format!("page {} row {} control",page,row));
            if ctrl & RAW_ROW_MASK > 0 {
                let literal = get_slice!(buf,pos,ROW_BYTES,format!("page {} row {} raw data",page,row));
                self.line.copy_from_slice(literal);
                self.last = self.line[ROW_BYTES-1];
            } else {
                self.decode_differential_row(buf,&mut pos,page,row,(ctrl & V_DICT_LEN_MASK) as usize)?;
            }
            let out = view.row_mut(row)?;
            packed::unpack_slice(&layout,colormap,&self.line,out)?;
        }
        *ptr = pos;
        Ok(())
    }
    /// One differential row.  The horizontal dictionary has one bit per
    /// output byte: 0 repeats the previous byte.  On 1 the vertical
    /// dictionary decides: 1 takes a literal byte from the stream, 0 takes
    /// the byte above, i.e. whatever this column still holds from the
    /// previous row.  A zero-length vertical dictionary means the byte
    /// above is always taken.
    fn decode_differential_row(&mut self,buf: &[u8],ptr: &mut usize,page: usize,row: usize,v_len: usize) -> STDRESULT {
        let mut pos = *ptr;
        let h_dict = BitVec::from_bytes(get_slice!(buf,pos,H_DICT_BYTES,format!("page {} row {} horizontal dictionary",page,row)));
        let v_dict = BitVec::from_bytes(get_slice!(buf,pos,v_len,format!("page {} row {} vertical dictionary",page,row)));
        let mut v_ptr = 0;
        for col in 0..ROW_BYTES {
            let byte = match h_dict[col] {
                false => self.last,
                true => match v_len {
                    0 => self.line[col],
                    _ => {
                        let fresh = match v_dict.get(v_ptr) {
                            Some(bit) => bit,
                            None => {
                                log::debug!("vertical dictionary of {} bytes exhausted",v_len);
                                return Err(Box::new(img::Error::OutOfData(format!("page {} row {} vertical dictionary",page,row))));
                            }
                        };
                        v_ptr += 1;
                        match fresh {
                            true => get_byte!(buf,pos,format!("page {} row {} literals",page,row)),
                            false => self.line[col]
                        }
                    }
                }
            };
            self.line[col] = byte;
            self.last = byte;
        }
        *ptr = pos;
        Ok(())
    }
}

/// Wrapper for a decoded CM3 image.
#[derive(Debug)]
pub struct Cm3 {
    flags: u8,
    palette: [u8;COLORS],
    animation_rate: u8,
    cycle_rate: u8,
    cycle_palette: [u8;8],
    animation_flags: u8,
    cycling_flags: u8,
    patterns: Vec<Pattern>,
    pages: usize,
    map: ColorMap,
    buf: PixelBuffer
}

impl Cm3 {
    pub fn pages(&self) -> usize {
        self.pages
    }
    pub fn patterns(&self) -> &Vec<Pattern> {
        &self.patterns
    }
    /// natives driving the cycling animation, RGB-space
    pub fn cycle_palette(&self) -> &[u8;8] {
        &self.cycle_palette
    }
}

impl img::ImageFormat for Cm3 {
    fn from_bytes(buf: &[u8]) -> Result<Self,DYNERR> {
        let mut cursor = Cursor::new(buf);
        let header = match Header::read(&mut cursor) {
            Ok(header) => header,
            Err(e) => {
                log::debug!("CM3 header could not be read ({})",e);
                return Err(Box::new(img::Error::OutOfData("CM3 header".to_string())));
            }
        };
        let mut patterns = Vec::new();
        if header.flags & NO_PATTERNS_MASK == 0 {
            let section = match PatternSection::read(&mut cursor) {
                Ok(section) => section,
                Err(e) => {
                    log::debug!("CM3 pattern section could not be read ({})",e);
                    return Err(Box::new(img::Error::OutOfData("CM3 pattern section".to_string())));
                }
            };
            for rec in section.patterns {
                if rec.background > MAX_PATTERN_INDEX || rec.foreground > MAX_PATTERN_INDEX {
                    return Err(Box::new(img::Error::FormatViolation("CM3 pattern section".to_string())));
                }
                patterns.push(Pattern {
                    background_index: rec.background,
                    foreground_index: rec.foreground,
                    bitmap: rec.bitmap
                });
            }
        }
        let pages = match header.flags & DOUBLE_PAGE_MASK {
            0 => 1,
            _ => 2
        };
        let map = gime::colormap_from_natives(Colorspace::Rgb,&header.palette)?;
        let mut pixels = PixelBuffer::create(WIDTH,PAGE_ROWS*pages);
        let mut ptr = cursor.position() as usize;
        for page in 0..pages {
            trace!("decoding page {}",page);
            let mut view = pixels.view_mut(0,page*PAGE_ROWS,WIDTH,PAGE_ROWS)?;
            let mut decoder = PageDecoder::new();
            decoder.decode_page(buf,&mut ptr,page,&map,&mut view)?;
        }
        if ptr != buf.len() {
            warn!("CM3 image has {} trailing bytes",buf.len()-ptr);
        }
        Ok(Self {
            flags: header.flags,
            palette: header.palette,
            animation_rate: header.animation_rate,
            cycle_rate: header.cycle_rate,
            cycle_palette: header.cycle_palette,
            animation_flags: header.animation_flags,
            cycling_flags: header.cycling_flags,
            patterns,
            pages,
            map,
            buf: pixels
        })
    }
    fn to_bytes(&self) -> Result<Vec<u8>,DYNERR> {
        warn!("CM3 images are decode-only");
        Err(Box::new(img::Error::ImageTypeMismatch))
    }
    fn what_am_i(&self) -> img::ImageFormatType {
        img::ImageFormatType::CM3
    }
    fn file_extensions(&self) -> Vec<String> {
        file_extensions()
    }
    fn width(&self) -> usize {
        WIDTH
    }
    fn height(&self) -> usize {
        PAGE_ROWS*self.pages
    }
    fn colormap(&self) -> &ColorMap {
        &self.map
    }
    fn buffer(&self) -> &PixelBuffer {
        &self.buf
    }
    fn get_metadata(&self,indent: Option<u16>) -> String {
        let mut root = json::JsonValue::new_object();
        let typ = self.what_am_i().to_string();
        root[&typ] = json::JsonValue::new_object();
        root[&typ]["flags"] = hex::encode_upper([self.flags]).into();
        root[&typ]["pages"] = self.pages.into();
        root[&typ]["palette"] = palette_json(&self.palette);
        root[&typ]["animation_rate"] = self.animation_rate.into();
        root[&typ]["animation_flags"] = hex::encode_upper([self.animation_flags]).into();
        root[&typ]["cycle_rate"] = self.cycle_rate.into();
        root[&typ]["cycling_flags"] = hex::encode_upper([self.cycling_flags]).into();
        root[&typ]["cycle_palette"] = palette_json(&self.cycle_palette);
        root[&typ]["patterns"] = self.patterns.len().into();
        match indent {
            Some(spaces) => json::stringify_pretty(root,spaces),
            None => json::stringify(root)
        }
    }
}
