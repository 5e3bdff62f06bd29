//! ## Support for MGE images
//!
//! MGE is the ColorMax 3 picture format, 320x200 in 16 colors at 4 bits
//! per pixel.  The header declares which monitor the palette was composed
//! for; composite palettes are normalized to the RGB colorspace while
//! loading.  Pixel data is usually run length encoded as (count,value)
//! pairs, with raw files flagged in the header.
//!
//! Writing is supported.  The writer always emits an RGB palette and run
//! length encoded data.

use binrw::BinRead;
use binrw::io::Cursor;
use log::{trace,warn};
use crate::img;
use crate::img::{get_byte,get_slice,palette_json};
use crate::clr::ColorMap;
use crate::clr::gime::{self,Colorspace};
use crate::pix::{packed,PixelBuffer};
use crate::DYNERR;

pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 200;
pub const ROW_BYTES: usize = 160;
pub const COLORS: usize = 16;
const TITLE_BYTES: usize = 30;

const COMPRESSION_RLE: u8 = 0;
const COMPRESSION_RAW: u8 = 1;

pub fn file_extensions() -> Vec<String> {
    vec!["mge".to_string()]
}

#[derive(BinRead)]
#[br(big)]
struct Header {
    type_code: u8,
    palette: [u8;COLORS],
    colorspace: u8,
    compression: u8,
    title: [u8;TITLE_BYTES],
    cycle_rate: u8,
    cycle_flags: u8
}

/// Wrapper for a decoded MGE image.
#[derive(Debug)]
pub struct Mge {
    palette: [u8;COLORS],
    colorspace: Colorspace,
    compressed: bool,
    title: String,
    cycle_rate: u8,
    cycle_flags: u8,
    map: ColorMap,
    buf: PixelBuffer
}

impl Mge {
    /// title as stored in the header, trailing padding removed
    pub fn title(&self) -> &str {
        &self.title
    }
    /// colorspace the file was composed for; the decoded palette is
    /// always RGB regardless
    pub fn original_colorspace(&self) -> Colorspace {
        self.colorspace
    }
    fn decode_rle(buf: &[u8],ptr: &mut usize) -> Result<Vec<u8>,DYNERR> {
        let mut ans = Vec::new();
        let mut pos = *ptr;
        while ans.len() < ROW_BYTES*HEIGHT {
            let count = get_byte!(buf,pos,"MGE pixel data") as usize;
            let value = get_byte!(buf,pos,"MGE pixel data");
            if count==0 {
                return Err(Box::new(img::Error::FormatViolation("MGE run length".to_string())));
            }
            if ans.len() + count > ROW_BYTES*HEIGHT {
                return Err(Box::new(img::Error::FormatViolation("MGE run length".to_string())));
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
                ans.push(run as u8);
                ans.push(packed_rows[run_start]);
                run_start = i;
            }
        }
        ans.push((packed_rows.len()-run_start) as u8);
        ans.push(packed_rows[run_start]);
        ans
    }
    /// Build an MGE from decoded parts, used by the packer.  The palette
    /// natives are taken to be RGB-space.
    pub fn create(palette: [u8;COLORS],title: &str,buf: PixelBuffer) -> Result<Self,DYNERR> {
        if buf.width() != WIDTH || buf.height() != HEIGHT {
            return Err(Box::new(img::Error::ImageSizeMismatch));
        }
        let map = gime::colormap_from_natives(Colorspace::Rgb,&palette)?;
        Ok(Self {
            palette,
            colorspace: Colorspace::Rgb,
            compressed: true,
            title: title.to_string(),
            cycle_rate: 0,
            cycle_flags: 0,
            map,
            buf
        })
    }
}

impl img::ImageFormat for Mge {
    fn from_bytes(buf: &[u8]) -> Result<Self,DYNERR> {
        let mut cursor = Cursor::new(buf);
        let header = match Header::read(&mut cursor) {
            Ok(header) => header,
            Err(e) => {
                log::debug!("MGE header could not be read ({})",e);
                return Err(Box::new(img::Error::OutOfData("MGE header".to_string())));
            }
        };
        if header.type_code != 0 {
            log::debug!("MGE type code was {}",header.type_code);
            return Err(Box::new(img::Error::FormatViolation("MGE header".to_string())));
        }
        let colorspace = match Colorspace::from_code(header.colorspace) {
            Ok(cs) => cs,
            Err(_) => return Err(Box::new(img::Error::FormatViolation("MGE header".to_string())))
        };
        let mut palette = header.palette;
        gime::convert_color_to_colorspace(colorspace,Colorspace::Rgb,&mut palette)?;
        let map = gime::colormap_from_natives(Colorspace::Rgb,&palette)?;
        let mut ptr = cursor.position() as usize;
        let packed_rows = match header.compression {
            COMPRESSION_RLE => Self::decode_rle(buf,&mut ptr)?,
            COMPRESSION_RAW => get_slice!(buf,ptr,ROW_BYTES*HEIGHT,"MGE pixel data").to_vec(),
            _ => return Err(Box::new(img::Error::FormatViolation("MGE header".to_string())))
        };
        if ptr != buf.len() {
            warn!("MGE image has {} trailing bytes",buf.len()-ptr);
        }
        let layout = packed::PackedLayout::new(4)?;
        let mut pixels = PixelBuffer::create(WIDTH,HEIGHT);
        let mut view = pixels.view_mut_all();
        for row in 0..HEIGHT {
            trace!("unpacking row {}",row);
            let out = view.row_mut(row)?;
            packed::unpack_slice(&layout,&map,&packed_rows[row*ROW_BYTES..(row+1)*ROW_BYTES],out)?;
        }
        let title = String::from_utf8_lossy(&header.title).trim_end_matches(|c| c=='\0' || c==' ').to_string();
        Ok(Self {
            palette,
            colorspace,
            compressed: header.compression==COMPRESSION_RLE,
            title,
            cycle_rate: header.cycle_rate,
            cycle_flags: header.cycle_flags,
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
        let mut ans = Vec::new();
        ans.push(0); // type code
        ans.extend_from_slice(&self.palette);
        ans.push(Colorspace::Rgb as u8);
        ans.push(COMPRESSION_RLE);
        let mut title = self.title.as_bytes().to_vec();
        title.resize(TITLE_BYTES,0);
        ans.extend_from_slice(&title);
        ans.push(self.cycle_rate);
        ans.push(self.cycle_flags);
        ans.append(&mut Self::encode_rle(&packed_rows));
        Ok(ans)
    }
    fn what_am_i(&self) -> img::ImageFormatType {
        img::ImageFormatType::MGE
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
        root[&typ]["title"] = self.title.clone().into();
        root[&typ]["colorspace"] = self.colorspace.to_string().into();
        root[&typ]["compressed"] = self.compressed.into();
        root[&typ]["palette"] = palette_json(&self.palette);
        root[&typ]["cycle_rate"] = self.cycle_rate.into();
        root[&typ]["cycle_flags"] = hex::encode_upper([self.cycle_flags]).into();
        match indent {
            Some(spaces) => json::stringify_pretty(root,spaces),
            None => json::stringify(root)
        }
    }
}
