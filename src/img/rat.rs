//! ## Support for RAT images
//!
//! RAT is the Diecom picture format, 320x199 in 16 colors at 4 bits per
//! pixel.  The header is minimal: a compression byte, the background
//! color, and the 16 RGB-space palette bytes.  Compressed pixel data is
//! run length encoded as (value,count) pairs, note the opposite pair
//! order from MGE.
//!
//! Writing is supported.  The writer always emits run length encoded data.

use binrw::BinRead;
use binrw::io::Cursor;
use log::warn;
use crate::img;
use crate::img::{get_byte,get_slice,palette_json};
use crate::clr::ColorMap;
use crate::clr::gime::{self,Colorspace};
use crate::pix::{packed,PixelBuffer};
use crate::DYNERR;

pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 199;
pub const ROW_BYTES: usize = 160;
pub const COLORS: usize = 16;

const COMPRESSION_RAW: u8 = 0;
const COMPRESSION_RLE: u8 = 1;

pub fn file_extensions() -> Vec<String> {
    vec!["rat".to_string()]
}

#[derive(BinRead)]
#[br(big)]
struct Header {
    compression: u8,
    background: u8,
    palette: [u8;COLORS]
}

/// Wrapper for a decoded RAT image.
#[derive(Debug)]
pub struct Rat {
    palette: [u8;COLORS],
    background: u8,
    compressed: bool,
    map: ColorMap,
    buf: PixelBuffer
}

impl Rat {
    /// palette index the editor treated as backdrop
    pub fn background(&self) -> u8 {
        self.background
    }
    fn decode_rle(buf: &[u8],ptr: &mut usize) -> Result<Vec<u8>,DYNERR> {
        let mut ans = Vec::new();
        let mut pos = *ptr;
        while ans.len() < ROW_BYTES*HEIGHT {
            let value = get_byte!(buf,pos,"RAT pixel data");
            let count = get_byte!(buf,pos,"RAT pixel data") as usize;
            if count==0 || ans.len() + count > ROW_BYTES*HEIGHT {
                return Err(Box::new(img::Error::FormatViolation("RAT run length".to_string())));
            }
            for _i in 0..count {
                ans.push(value);
            }
        }
        *ptr = pos;
        Ok(ans)
    }
    fn encode_rle(packed_rows: &[u8]) -> Vec<u8> {
        let mut ans = Vec::new();
        let mut run_start = 0;
        for i in 0..packed_rows.len() {
            let run = i - run_start;
            if run==255 || packed_rows[i] != packed_rows[run_start] {
                ans.push(packed_rows[run_start]);
                ans.push(run as u8);
                run_start = i;
            }
        }
        ans.push(packed_rows[run_start]);
        ans.push((packed_rows.len()-run_start) as u8);
        ans
    }
    /// Build a RAT from decoded parts, used by the packer.  The palette
    /// natives are taken to be RGB-space.
    pub fn create(palette: [u8;COLORS],background: u8,buf: PixelBuffer) -> Result<Self,DYNERR> {
        if buf.width() != WIDTH || buf.height() != HEIGHT {
            return Err(Box::new(img::Error::ImageSizeMismatch));
        }
        let map = gime::colormap_from_natives(Colorspace::Rgb,&palette)?;
        Ok(Self {
            palette,
            background,
            compressed: true,
            map,
            buf
        })
    }
}

impl img::ImageFormat for Rat {
    fn from_bytes(buf: &[u8]) -> Result<Self,DYNERR> {
        let mut cursor = Cursor::new(buf);
        let header = match Header::read(&mut cursor) {
            Ok(header) => header,
            Err(e) => {
                log::debug!("RAT header could not be read ({})",e);
                return Err(Box::new(img::Error::OutOfData("RAT header".to_string())));
            }
        };
        if header.background > 15 {
            return Err(Box::new(img::Error::FormatViolation("RAT header".to_string())));
        }
        let map = gime::colormap_from_natives(Colorspace::Rgb,&header.palette)?;
        let mut ptr = cursor.position() as usize;
        let packed_rows = match header.compression {
            COMPRESSION_RAW => get_slice!(buf,ptr,ROW_BYTES*HEIGHT,"RAT pixel data").to_vec(),
            COMPRESSION_RLE => Self::decode_rle(buf,&mut ptr)?,
            _ => return Err(Box::new(img::Error::FormatViolation("RAT header".to_string())))
        };
        if ptr != buf.len() {
            warn!("RAT image has {} trailing bytes",buf.len()-ptr);
        }
        let layout = packed::PackedLayout::new(4)?;
        let mut pixels = PixelBuffer::create(WIDTH,HEIGHT);
        let mut view = pixels.view_mut_all();
        for row in 0..HEIGHT {
            let out = view.row_mut(row)?;
            packed::unpack_slice(&layout,&map,&packed_rows[row*ROW_BYTES..(row+1)*ROW_BYTES],out)?;
        }
        Ok(Self {
            palette: header.palette,
            background: header.background,
            compressed: header.compression==COMPRESSION_RLE,
            map,
            buf: pixels
        })
    }
    fn to_bytes(&self) -> Result<Vec<u8>,DYNERR> {
        let layout = packed::PackedLayout::new(4)?;
        let mut packed_rows = vec![0;ROW_BYTES*HEIGHT];
        for row in 0..HEIGHT {
            let colors = self.buf.row(row)?;
            packed::pack_slice(&layout,&self.map,colors,&mut packed_rows[row*ROW_BYTES..(row+1)*ROW_BYTES])?;
        }
        let mut ans = vec![COMPRESSION_RLE,self.background];
        ans.extend_from_slice(&self.palette);
        ans.append(&mut Self::encode_rle(&packed_rows));
        Ok(ans)
    }
    fn what_am_i(&self) -> img::ImageFormatType {
        img::ImageFormatType::RAT
    }
    fn file_extensions(&self) -> Vec<String> {
        file_extensions()
    }
    fn width(&self) -> usize {
        WIDTH
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
        root[&typ]["background"] = self.background.into();
        root[&typ]["compressed"] = self.compressed.into();
        root[&typ]["palette"] = palette_json(&self.palette);
        match indent {
            Some(spaces) => json::stringify_pretty(root,spaces),
            None => json::stringify(root)
        }
    }
}
