//! ## Support for VEF images
//!
//! VEF is the OS-9 video exchange format.  A mode byte selects one of five
//! screen geometries, from 640x200 in 2 colors up to 320x200 in 16.  The
//! 16 palette bytes are RGB-space natives; modes with fewer colors simply
//! ignore the tail of the palette.  Pixel data may be squashed with a
//! byte-oriented run scheme: a control byte below 128 is followed by that
//! many literal bytes plus one, anything else repeats the next byte
//! 257 minus the control value times.
//!
//! Writing is supported.  The writer always emits raw data.

use binrw::BinRead;
use binrw::io::Cursor;
use num_traits::FromPrimitive;
use num_derive::FromPrimitive;
use log::warn;
use crate::img;
use crate::img::{get_byte,get_slice,palette_json};
use crate::clr::ColorMap;
use crate::clr::gime::{self,Colorspace};
use crate::pix::{packed,PixelBuffer};
use crate::DYNERR;

pub const HEIGHT: usize = 200;
pub const COLORS: usize = 16;

const SQUASH_MASK: u8 = 0x80;

pub fn file_extensions() -> Vec<String> {
    vec!["vef".to_string()]
}

/// The five screen geometries a VEF can carry.
#[derive(FromPrimitive,PartialEq,Eq,Clone,Copy,Debug)]
pub enum Mode {
    C16W320 = 0,
    C4W640 = 1,
    C16W160 = 2,
    C4W320 = 3,
    C2W640 = 4
}

impl Mode {
    pub fn width(&self) -> usize {
        match self {
            Self::C16W320 => 320,
            Self::C4W640 => 640,
            Self::C16W160 => 160,
            Self::C4W320 => 320,
            Self::C2W640 => 640
        }
    }
    pub fn bits_per_pixel(&self) -> u8 {
        match self {
            Self::C16W320 | Self::C16W160 => 4,
            Self::C4W640 | Self::C4W320 => 2,
            Self::C2W640 => 1
        }
    }
    pub fn row_bytes(&self) -> usize {
        self.width() * self.bits_per_pixel() as usize / 8
    }
}

#[derive(BinRead)]
#[br(big)]
struct Header {
    flags: u8,
    mode: u8,
    palette: [u8;COLORS]
}

/// Wrapper for a decoded VEF image.
#[derive(Debug)]
pub struct Vef {
    mode: Mode,
    palette: [u8;COLORS],
    squashed: bool,
    map: ColorMap,
    buf: PixelBuffer
}

impl Vef {
    pub fn mode(&self) -> Mode {
        self.mode
    }
    fn unsquash(buf: &[u8],ptr: &mut usize,expected: usize) -> Result<Vec<u8>,DYNERR> {
        let mut ans = Vec::new();
        let mut pos = *ptr;
        while ans.len() < expected {
            let ctrl = get_byte!(buf,pos,"VEF pixel data");
            if ctrl & SQUASH_MASK == 0 {
                let count = ctrl as usize + 1;
                let literal = get_slice!(buf,pos,count,"VEF pixel data");
                ans.extend_from_slice(literal);
            } else {
                let count = 257 - ctrl as usize;
                let value = get_byte!(buf,pos,"VEF pixel data");
                for _i in 0..count {
                    ans.push(value);
                }
            }
        }
        if ans.len() > expected {
            return Err(Box::new(img::Error::FormatViolation("VEF run length".to_string())));
        }
        *ptr = pos;
        Ok(ans)
    }
    /// Build a VEF from decoded parts, used by the packer.  The palette
    /// natives are taken to be RGB-space.
    pub fn create(palette: [u8;COLORS],buf: PixelBuffer) -> Result<Self,DYNERR> {
        if buf.width() != 320 || buf.height() != HEIGHT {
            return Err(Box::new(img::Error::ImageSizeMismatch));
        }
        let map = gime::colormap_from_natives(Colorspace::Rgb,&palette)?;
        Ok(Self {
            mode: Mode::C16W320,
            palette,
            squashed: false,
            map,
            buf
        })
    }
}

impl img::ImageFormat for Vef {
    fn from_bytes(buf: &[u8]) -> Result<Self,DYNERR> {
        let mut cursor = Cursor::new(buf);
        let header = match Header::read(&mut cursor) {
            Ok(header) => header,
            Err(e) => {
                log::debug!("VEF header could not be read ({})",e);
                return Err(Box::new(img::Error::OutOfData("VEF header".to_string())));
            }
        };
        let mode = match Mode::from_u8(header.mode) {
            Some(mode) => mode,
            None => {
                log::debug!("VEF mode byte was {}",header.mode);
                return Err(Box::new(img::Error::FormatViolation("VEF header".to_string())));
            }
        };
        if header.flags & !SQUASH_MASK != 0 {
            return Err(Box::new(img::Error::FormatViolation("VEF header".to_string())));
        }
        let layout = packed::PackedLayout::new(mode.bits_per_pixel())?;
        let map = gime::colormap_from_natives(Colorspace::Rgb,&header.palette[..layout.max_colors()])?;
        let expected = mode.row_bytes()*HEIGHT;
        let mut ptr = cursor.position() as usize;
        let packed_rows = match header.flags & SQUASH_MASK {
            0 => get_slice!(buf,ptr,expected,"VEF pixel data").to_vec(),
            _ => Self::unsquash(buf,&mut ptr,expected)?
        };
        if ptr != buf.len() {
            warn!("VEF image has {} trailing bytes",buf.len()-ptr);
        }
        let mut pixels = PixelBuffer::create(mode.width(),HEIGHT);
        let mut view = pixels.view_mut_all();
        for row in 0..HEIGHT {
            let out = view.row_mut(row)?;
            packed::unpack_slice(&layout,&map,&packed_rows[row*mode.row_bytes()..(row+1)*mode.row_bytes()],out)?;
        }
        Ok(Self {
            mode,
            palette: header.palette,
            squashed: header.flags & SQUASH_MASK > 0,
            map,
            buf: pixels
        })
    }
    fn to_bytes(&self) -> Result<Vec<u8>,DYNERR> {
        let layout = packed::PackedLayout::new(self.mode.bits_per_pixel())?;
        let row_bytes = self.mode.row_bytes();
        let mut ans = vec![0,self.mode as u8];
        ans.extend_from_slice(&self.palette);
        let mut packed_rows = vec![0;row_bytes*HEIGHT];
        for row in 0..HEIGHT {
            let colors = self.buf.row(row)?;
            packed::pack_slice(&layout,&self.map,colors,&mut packed_rows[row*row_bytes..(row+1)*row_bytes])?;
        }
        ans.append(&mut packed_rows);
        Ok(ans)
    }
    fn what_am_i(&self) -> img::ImageFormatType {
        img::ImageFormatType::VEF
    }
    fn file_extensions(&self) -> Vec<String> {
        file_extensions()
    }
    fn width(&self) -> usize {
        self.mode.width()
    }
    fn height(&self) -> usize {
        HEIGHT
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
        root[&typ]["mode"] = (self.mode as u8).into();
        root[&typ]["width"] = self.width().into();
        root[&typ]["colors"] = (1 << self.mode.bits_per_pixel()).into();
        root[&typ]["squashed"] = self.squashed.into();
        root[&typ]["palette"] = palette_json(&self.palette);
        match indent {
            Some(spaces) => json::stringify_pretty(root,spaces),
            None => json::stringify(root)
        }
    }
}
