//! ## Packed pixel codec
//!
//! A packed pixel byte divides evenly into 1, 2, 4, or 8 palette indices,
//! most significant pixel first.  These functions convert between packed
//! bytes and universal colors through a `ColorMap`.
//!
//! Packing is exact-or-reject, a color that is not in the map is an error,
//! there is no nearest-color fallback.  The multi-element forms report how
//! much input and output they consumed so that callers can chain calls
//! across row boundaries; the counts are the resumption points.

use log::debug;
use crate::bitfield::Bitfield;
use crate::clr::{Color,ColorMap};
use super::Error;

/// Symmetric division of one byte into equal pixel fields.
#[derive(PartialEq,Eq,Clone,Copy)]
pub struct PackedLayout {
    bpp: u8
}

impl PackedLayout {
    /// Only 1, 2, 4, and 8 bits per pixel divide a byte evenly.
    pub fn new(bits_per_pixel: u8) -> Result<Self,Error> {
        match bits_per_pixel {
            1 | 2 | 4 | 8 => Ok(Self { bpp: bits_per_pixel }),
            _ => Err(Error::BppOutOfRange)
        }
    }
    pub fn bits_per_pixel(&self) -> u8 {
        self.bpp
    }
    pub fn pixels_per_byte(&self) -> usize {
        8 / self.bpp as usize
    }
    /// how many colors a pixel index can address
    pub fn max_colors(&self) -> usize {
        1 << self.bpp
    }
    /// The pixel fields within one byte, most significant pixel first.
    pub fn fields(&self) -> Vec<Bitfield> {
        let mut ans = Vec::new();
        let mut pos = 8 - self.bpp;
        for _i in 0..self.pixels_per_byte() {
            ans.push(Bitfield::Simple { size: self.bpp, pos, name: None });
            pos = pos.wrapping_sub(self.bpp);
        }
        ans
    }
    /// Bytes per row for a given pixel width, rounded up to whole bytes and
    /// then to the given alignment.  Alignment 1 means none.
    pub fn pitch(&self,width: usize,align: usize) -> usize {
        let bytes = (width*self.bpp as usize + 7) / 8;
        let align = align.max(1);
        ((bytes + align - 1) / align) * align
    }
}

fn lookup(colormap: &ColorMap,index: u32) -> Result<Color,Error> {
    match colormap.get(index as usize) {
        Ok(color) => Ok(color),
        Err(_) => {
            debug!("pixel index {} exceeds color map of {}",index,colormap.len());
            Err(Error::MapTooSmall)
        }
    }
}

/// Unpack one byte into the head of `output`.  Fails if `output` cannot
/// hold a whole byte's pixels.  Returns the count of colors written, the
/// unused part of `output` is everything after it.
pub fn unpack_byte(layout: &PackedLayout,colormap: &ColorMap,byte: u8,output: &mut [Color]) -> Result<usize,Error> {
    let ppb = layout.pixels_per_byte();
    if output.len() < ppb {
        return Err(Error::OutputTooSmall);
    }
    for (i,field) in layout.fields().iter().enumerate() {
        output[i] = lookup(colormap,field.get_from(byte as u32))?;
    }
    Ok(ppb)
}

/// Unpack the same byte `count` times.  Fails if `output` cannot hold all
/// the repetitions.  Returns the count of colors written.
pub fn unpack_byte_repeat(layout: &PackedLayout,colormap: &ColorMap,byte: u8,count: usize,output: &mut [Color]) -> Result<usize,Error> {
    let ppb = layout.pixels_per_byte();
    if output.len() < count*ppb {
        return Err(Error::OutputTooSmall);
    }
    let mut written = 0;
    for _i in 0..count {
        written += unpack_byte(layout,colormap,byte,&mut output[written..])?;
    }
    Ok(written)
}

/// Unpack a byte sequence.  The output must hold the entire input's pixels
/// up front, this overload does not resume partway through the input.
/// Returns the count of colors written.
pub fn unpack_slice(layout: &PackedLayout,colormap: &ColorMap,input: &[u8],output: &mut [Color]) -> Result<usize,Error> {
    let ppb = layout.pixels_per_byte();
    if output.len() < input.len()*ppb {
        return Err(Error::OutputTooSmall);
    }
    let mut written = 0;
    for byte in input {
        written += unpack_byte(layout,colormap,*byte,&mut output[written..])?;
    }
    Ok(written)
}

/// Pack the head of `colors` into one byte.  Every color must be found in
/// the map at an index a pixel can address; a map may legitimately hold
/// more colors than fit in the bit depth, finding one of those is caller
/// misuse and is detected here.  Returns the byte and the count of colors
/// consumed.
pub fn pack_byte(layout: &PackedLayout,colormap: &ColorMap,colors: &[Color]) -> Result<(u8,usize),Error> {
    let ppb = layout.pixels_per_byte();
    if colors.len() < ppb {
        return Err(Error::PartialByte);
    }
    let mut byte: u32 = 0;
    for (i,field) in layout.fields().iter().enumerate() {
        let index = match colormap.index_of(&colors[i]) {
            Some(index) => index,
            None => {
                debug!("color {} not in map",colors[i]);
                return Err(Error::ColorNotFound);
            }
        };
        if index >= layout.max_colors() {
            debug!("index {} cannot be addressed at {} bpp",index,layout.bits_per_pixel());
            return Err(Error::IndexOutOfRange);
        }
        byte = match field.set_in(byte,index as u32) {
            Ok(byte) => byte,
            Err(_) => return Err(Error::IndexOutOfRange)
        };
    }
    Ok((byte as u8,ppb))
}

/// Pack colors into bytes until either side runs out.  The color count must
/// fill whole bytes.  Returns (colors consumed, bytes written); a caller
/// chaining across rows resumes from those counts.
pub fn pack_slice(layout: &PackedLayout,colormap: &ColorMap,colors: &[Color],output: &mut [u8]) -> Result<(usize,usize),Error> {
    let ppb = layout.pixels_per_byte();
    if colors.len() % ppb != 0 {
        return Err(Error::PartialByte);
    }
    let whole_bytes = (colors.len()/ppb).min(output.len());
    let mut consumed = 0;
    for i in 0..whole_bytes {
        let (byte,count) = pack_byte(layout,colormap,&colors[consumed..])?;
        output[i] = byte;
        consumed += count;
    }
    Ok((consumed,whole_bytes))
}
