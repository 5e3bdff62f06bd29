//! # Pixel Module
//!
//! Decoded images live in a `PixelBuffer`, a rectangle of universal colors.
//! Decoders never write into the buffer directly, they are handed a
//! `PixelView`, a rectangular sub-region that can be walked row by row.
//! A format that splits an image into pages gets one view per page.
//!
//! The `packed` submodule converts between the chip's packed pixel bytes
//! and rows of universal colors.

use crate::clr::Color;

pub mod packed;


/// Enumerates pixel errors.  The `Display` trait will print the equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("bits per pixel out of range")]
    BppOutOfRange,
    #[error("view does not fit inside the buffer")]
    ViewOutOfBounds,
    #[error("row index outside the view")]
    RowOutOfBounds,
    #[error("output buffer is too small")]
    OutputTooSmall,
    #[error("input does not fill whole packed bytes")]
    PartialByte,
    #[error("palette index exceeds the color map")]
    MapTooSmall,
    #[error("color not in map")]
    ColorNotFound,
    #[error("palette index out of range for bits per pixel")]
    IndexOutOfRange
}

/// Owns a rectangle of universal colors.  Storage is row-major with no
/// padding, the packed pixel codec handles any pitch concerns on the
/// native side.
#[derive(Debug)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<Color>
}

impl PixelBuffer {
    /// new buffer filled with transparent black
    pub fn create(width: usize,height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![Color::rgba(0,0,0,0);width*height]
        }
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn row(&self,row: usize) -> Result<&[Color],Error> {
        if row >= self.height {
            return Err(Error::RowOutOfBounds);
        }
        Ok(&self.data[row*self.width..(row+1)*self.width])
    }
    /// View of a rectangular sub-region.  The view borrows the buffer
    /// mutably, only one decode can write at a time.
    pub fn view_mut(&mut self,x: usize,y: usize,width: usize,height: usize) -> Result<PixelView,Error> {
        if x + width > self.width || y + height > self.height {
            return Err(Error::ViewOutOfBounds);
        }
        Ok(PixelView { buf: self, x, y, width, height })
    }
    /// View of the whole buffer
    pub fn view_mut_all(&mut self) -> PixelView {
        let (width,height) = (self.width,self.height);
        PixelView { buf: self, x: 0, y: 0, width, height }
    }
}

/// Mutable rectangular sub-region of a `PixelBuffer`, each row a contiguous
/// color sequence.
pub struct PixelView<'a> {
    buf: &'a mut PixelBuffer,
    x: usize,
    y: usize,
    width: usize,
    height: usize
}

impl<'a> PixelView<'a> {
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    /// Row within the view, indexed from the view's own origin
    pub fn row_mut(&mut self,row: usize) -> Result<&mut [Color],Error> {
        if row >= self.height {
            return Err(Error::RowOutOfBounds);
        }
        let start = (self.y + row)*self.buf.width + self.x;
        Ok(&mut self.buf.data[start..start+self.width])
    }
}
