//! # Image Module
//!
//! Native images are represented by objects implementing the `ImageFormat`
//! trait.  The object type is named for the file format that it handles,
//! e.g., `Cm3`.  Creating one decodes the whole file: the header is
//! interpreted, the palette is rendered through `clr`, and the pixel data
//! is unpacked through `pix` into an RGBA buffer.  The native bytes are not
//! retained, `to_bytes` re-packs from the buffer for the formats that
//! support writing.
//!
//! ## Palettes
//!
//! Every format here stores native 6 bit palette values.  Formats that can
//! carry composite palettes are normalized to the RGB colorspace while
//! loading, so a decoded image always answers with RGB renderings.  The
//! native values retained in the object are likewise RGB-space.
//!
//! ## Failure
//!
//! Running out of file is always re-raised as a format error naming the
//! section that was being read, see the `get_byte!`/`get_slice!` macros.
//! Decoding aborts on the first error, there is no partial recovery.

use std::str::FromStr;
use std::fmt;
use crate::clr::ColorMap;
use crate::pix::PixelBuffer;
use crate::DYNERR;

/// Enumerates image errors.  The `Display` trait will print the equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("unknown image type")]
    UnknownImageType,
    #[error("image format violation in {0}")]
    FormatViolation(String),
    #[error("unexpected end of data in {0}")]
    OutOfData(String),
    #[error("row count did not match the page height")]
    RowCountMismatch,
    #[error("image size did not match the request")]
    ImageSizeMismatch,
    #[error("image type not compatible with request")]
    ImageTypeMismatch
}

/// Bounds-checked sequential byte read, `$loc` names the section for the
/// error message.  Only for use in functions returning `Result<_,DYNERR>`.
macro_rules! get_byte {
    ($buf:expr,$ptr:ident,$loc:expr) => {
        match $ptr < $buf.len() {
            true => {
                $ptr += 1;
                $buf[$ptr-1]
            },
            false => {
                log::debug!("out of data in {}",$loc);
                return Err(Box::new(crate::img::Error::OutOfData($loc.to_string())));
            }
        }
    };
}

/// Bounds-checked sequential slice read, see `get_byte!`.
macro_rules! get_slice {
    ($buf:expr,$ptr:ident,$len:expr,$loc:expr) => {
        match $ptr + $len <= $buf.len() {
            true => {
                $ptr += $len;
                &$buf[$ptr-$len..$ptr]
            },
            false => {
                log::debug!("out of data in {}",$loc);
                return Err(Box::new(crate::img::Error::OutOfData($loc.to_string())));
            }
        }
    };
}

pub(crate) use get_byte;
pub(crate) use get_slice;

pub mod cm3;
pub mod mge;
pub mod vef;
pub mod hrs;
pub mod rat;
pub mod pal;

#[derive(PartialEq,Clone,Copy)]
pub enum ImageFormatType {
    CM3,
    MGE,
    VEF,
    HRS,
    RAT,
    PAL
}

impl FromStr for ImageFormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "cm3" => Ok(Self::CM3),
            "mge" => Ok(Self::MGE),
            "vef" => Ok(Self::VEF),
            "hrs" => Ok(Self::HRS),
            "rat" => Ok(Self::RAT),
            "pal" => Ok(Self::PAL),
            _ => Err(Error::UnknownImageType)
        }
    }
}

impl fmt::Display for ImageFormatType {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CM3 => write!(f,"cm3"),
            Self::MGE => write!(f,"mge"),
            Self::VEF => write!(f,"vef"),
            Self::HRS => write!(f,"hrs"),
            Self::RAT => write!(f,"rat"),
            Self::PAL => write!(f,"pal")
        }
    }
}

/// The main trait for working with any kind of native image.
/// Creating the object decodes the file, so accessors are cheap.
pub trait ImageFormat {
    /// Decode a native file.  Failures follow the taxonomy in `Error`;
    /// the caller attaches the file name at its own boundary.
    fn from_bytes(buf: &[u8]) -> Result<Self,DYNERR> where Self: Sized;
    /// Re-pack the decoded image into native bytes.  Formats that are
    /// decode-only refuse with `ImageTypeMismatch`.
    fn to_bytes(&self) -> Result<Vec<u8>,DYNERR>;
    fn what_am_i(&self) -> ImageFormatType;
    fn file_extensions(&self) -> Vec<String>;
    /// Width in pixels, 0 for a bare palette
    fn width(&self) -> usize;
    /// Height in pixels, 0 for a bare palette
    fn height(&self) -> usize;
    /// The palette this image was decoded with
    fn colormap(&self) -> &ColorMap;
    /// The decoded RGBA pixels
    fn buffer(&self) -> &PixelBuffer;
    /// Get image metadata into a JSON string.
    /// Default contains only the image type.
    fn get_metadata(&self,indent: Option<u16>) -> String {
        let mut root = json::JsonValue::new_object();
        let typ = self.what_am_i().to_string();
        root[typ] = json::JsonValue::new_object();
        match indent {
            Some(spaces) => json::stringify_pretty(root,spaces),
            None => json::stringify(root)
        }
    }
}

/// palette natives as a JSON array of hex strings
pub(crate) fn palette_json(natives: &[u8]) -> json::JsonValue {
    let mut ans = json::JsonValue::new_array();
    for native in natives {
        let _ = ans.push(hex::encode_upper([*native]));
    }
    ans
}
