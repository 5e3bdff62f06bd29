//! # Color Module
//!
//! Colors are represented by objects of three kinds.
//!
//! * `Color` is the universal form, four channels of 0-255 each.
//! * A native color is a chip-specific packed integer, its layout is
//!   described by a `ColorLayout`, which is an ordered set of four bit
//!   fields.  The `codec` submodule converts between the two forms.
//! * A `ColorMap` is an ordered list of universal colors addressed by the
//!   small integers that packed pixels carry.
//!
//! The `gime` submodule handles the GIME chip's own 64 colors, which are
//! mapped through fixed tables rather than bit fields, since the chip's
//! composite output cannot be described by a channel layout.

use std::fmt;
use crate::bitfield::Bitfield;

pub mod codec;
pub mod gime;

#[cfg(test)]
mod codec_test;

/// Enumerates color errors.  The `Display` trait will print the equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("packed color has bits outside the layout")]
    PackedColorFormat,
    #[error("channel value does not land on the packed scale")]
    PrecisionLoss,
    #[error("color map is full")]
    MapFull,
    #[error("color map index out of range")]
    IndexOutOfRange,
    #[error("native color index out of range")]
    NativeOutOfRange,
    #[error("colorspace conversion is not supported")]
    UnsupportedConversion,
    #[error("error while building color layout")]
    BadLayout
}

/// Universal color, four channels of 0-255 each.  Equality is exact,
/// there is no tolerance anywhere in the library.
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8
}

impl Color {
    pub const fn rgba(r: u8,g: u8,b: u8,a: u8) -> Self {
        Self { r, g, b, a }
    }
    /// opaque color from the three visible channels
    pub const fn rgb(r: u8,g: u8,b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl fmt::Display for Color {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"({},{},{},{})",self.r,self.g,self.b,self.a)
    }
}

/// Ordered list of colors addressed by a packed pixel's index.
/// Insertion order is preserved.  The optional maximum size models a
/// hardware palette register file that cannot grow.
#[derive(Debug)]
pub struct ColorMap {
    colors: Vec<Color>,
    max_size: Option<usize>
}

impl ColorMap {
    pub fn new() -> Self {
        Self { colors: Vec::new(), max_size: None }
    }
    pub fn with_max_size(max_size: usize) -> Self {
        Self { colors: Vec::new(), max_size: Some(max_size) }
    }
    pub fn push(&mut self,color: Color) -> Result<(),Error> {
        if let Some(max) = self.max_size {
            if self.colors.len() >= max {
                return Err(Error::MapFull);
            }
        }
        self.colors.push(color);
        Ok(())
    }
    pub fn get(&self,index: usize) -> Result<Color,Error> {
        match self.colors.get(index) {
            Some(color) => Ok(*color),
            None => Err(Error::IndexOutOfRange)
        }
    }
    /// Index of the first exactly equal color, if any.  There is no
    /// nearest-color matching, a miss is a miss.
    pub fn index_of(&self,color: &Color) -> Option<usize> {
        self.colors.iter().position(|c| c==color)
    }
    pub fn len(&self) -> usize {
        self.colors.len()
    }
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_,Color> {
        self.colors.iter()
    }
}

/// Describes how a packed color lays its channels out in storage.
/// Created once per format and shared read-only thereafter.
pub struct ColorLayout {
    width: u8,
    fields: [Bitfield;4]
}

impl ColorLayout {
    /// Fields are given in R,G,B,A order.  Every field must fit inside
    /// `width` bits of storage.
    pub fn new(width: u8,fields: [Bitfield;4]) -> Result<Self,Error> {
        if width==0 || width > crate::bitfield::STORAGE_BITS {
            return Err(Error::BadLayout);
        }
        let storage_mask = match width {
            32 => u32::MAX,
            w => (1u32 << w) - 1
        };
        for field in &fields {
            if field.mask() & !storage_mask != 0 {
                return Err(Error::BadLayout);
            }
        }
        Ok(Self { width, fields })
    }
    /// The GIME's RGB packing, %RGBRGB, each channel split between a high
    /// bit in the upper triple and a low bit in the lower triple.
    pub fn gime_rgb() -> Self {
        Self {
            width: 6,
            fields: [
                Bitfield::Split { ms: (1,5), ls: (1,2) },
                Bitfield::Split { ms: (1,4), ls: (1,1) },
                Bitfield::Split { ms: (1,3), ls: (1,0) },
                Bitfield::Empty
            ]
        }
    }
    pub fn width(&self) -> u8 {
        self.width
    }
    pub fn r(&self) -> &Bitfield {
        &self.fields[0]
    }
    pub fn g(&self) -> &Bitfield {
        &self.fields[1]
    }
    pub fn b(&self) -> &Bitfield {
        &self.fields[2]
    }
    pub fn a(&self) -> &Bitfield {
        &self.fields[3]
    }
    /// Union of all four field masks
    pub fn mask(&self) -> u32 {
        self.fields.iter().fold(0,|acc,f| acc | f.mask())
    }
}
