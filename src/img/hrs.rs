//! ## Support for HRS images
//!
//! HRS is the simplest format here: 16 RGB-space palette bytes followed by
//! a raw 320x192 screen dump at 4 bits per pixel.  There is no header
//! proper, so identification rests entirely on the file size.
//!
//! Writing is supported.

use log::debug;
use crate::img;
use crate::img::palette_json;
use crate::clr::ColorMap;
use crate::clr::gime::{self,Colorspace};
use crate::pix::{packed,PixelBuffer};
use crate::DYNERR;

pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 192;
pub const ROW_BYTES: usize = 160;
pub const COLORS: usize = 16;

pub fn file_extensions() -> Vec<String> {
    vec!["hrs".to_string()]
}

/// Wrapper for a decoded HRS image.
#[derive(Debug)]
pub struct Hrs {
    palette: [u8;COLORS],
    map: ColorMap,
    buf: PixelBuffer
}

impl Hrs {
    /// Build an HRS from decoded parts, used by the packer.  The palette
    /// natives are taken to be RGB-space.
    pub fn create(palette: [u8;COLORS],buf: PixelBuffer) -> Result<Self,DYNERR> {
        if buf.width() != WIDTH || buf.height() != HEIGHT {
            return Err(Box::new(img::Error::ImageSizeMismatch));
        }
        let map = gime::colormap_from_natives(Colorspace::Rgb,&palette)?;
        Ok(Self { palette, map, buf })
    }
}

impl img::ImageFormat for Hrs {
    fn from_bytes(buf: &[u8]) -> Result<Self,DYNERR> {
        if buf.len() != COLORS + ROW_BYTES*HEIGHT {
            debug!("HRS size was {}",buf.len());
            return Err(Box::new(img::Error::ImageSizeMismatch));
        }
        let mut palette = [0;COLORS];
        palette.copy_from_slice(&buf[..COLORS]);
        let map = gime::colormap_from_natives(Colorspace::Rgb,&palette)?;
        let layout = packed::PackedLayout::new(4)?;
        let mut pixels = PixelBuffer::create(WIDTH,HEIGHT);
        let mut view = pixels.view_mut_all();
        for row in 0..HEIGHT {
            let packed_row = &buf[COLORS + row*ROW_BYTES..COLORS + (row+1)*ROW_BYTES];
            let out = view.row_mut(row)?;
            packed::unpack_slice(&layout,&map,packed_row,out)?;
        }
        Ok(Self { palette, map, buf: pixels })
    }
    fn to_bytes(&self) -> Result<Vec<u8>,DYNERR> {
        let layout = packed::PackedLayout::new(4)?;
        let mut ans = self.palette.to_vec();
        let mut packed_rows = vec![0;ROW_BYTES*HEIGHT];
        for row in 0..HEIGHT {
            let colors = self.buf.row(row)?;
            packed::pack_slice(&layout,&self.map,colors,&mut packed_rows[row*ROW_BYTES..(row+1)*ROW_BYTES])?;
        }
        ans.append(&mut packed_rows);
        Ok(ans)
    }
    fn what_am_i(&self) -> img::ImageFormatType {
        img::ImageFormatType::HRS
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
        root[&typ]["palette"] = palette_json(&self.palette);
        match indent {
            Some(spaces) => json::stringify_pretty(root,spaces),
            None => json::stringify(root)
        }
    }
}
