//! ## GIME chip colors
//!
//! The GIME produces 64 colors.  On an RGB monitor the 6 bit native value
//! is %RGBRGB, two bits per channel, and the rendering follows directly
//! from the bit layout (see `ColorLayout::gime_rgb`).  On the composite
//! output the same 6 bits select 4 intensities and 16 hues, with hue 0
//! giving the grey column, and the rendering cannot be derived from a
//! channel layout.  Both colorspaces are therefore served by fixed
//! 64-entry tables.
//!
//! Files that carry composite palettes are normalized to the RGB space on
//! load.  The reverse direction is never taken, a request for it fails.

use std::str::FromStr;
use std::fmt;
use num_traits::FromPrimitive;
use num_derive::FromPrimitive;
use log::warn;
use super::{Color,ColorMap,Error};

macro_rules! rgb {
    ($r:expr,$g:expr,$b:expr) => {
        Color::rgb($r,$g,$b)
    };
}

/// The two renderings of a native color.  The numeric values match the
/// colorspace codes found in file headers.
#[derive(FromPrimitive,PartialEq,Eq,Clone,Copy,Debug)]
pub enum Colorspace {
    Cmp = 0,
    Rgb = 1
}

impl FromStr for Colorspace {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "cmp" => Ok(Self::Cmp),
            "rgb" => Ok(Self::Rgb),
            _ => Err(Error::UnsupportedConversion)
        }
    }
}

impl fmt::Display for Colorspace {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cmp => write!(f,"cmp"),
            Self::Rgb => write!(f,"rgb")
        }
    }
}

impl Colorspace {
    /// interpret a header's colorspace code
    pub fn from_code(code: u8) -> Result<Self,Error> {
        match Colorspace::from_u8(code) {
            Some(cs) => Ok(cs),
            None => Err(Error::UnsupportedConversion)
        }
    }
}

/// RGB monitor rendering of the 64 native colors, %RGBRGB at 85 per step
pub const RGB_TABLE: [Color;64] = [
    rgb!(  0,  0,  0), rgb!(  0,  0, 85), rgb!(  0, 85,  0), rgb!(  0, 85, 85),
    rgb!( 85,  0,  0), rgb!( 85,  0, 85), rgb!( 85, 85,  0), rgb!( 85, 85, 85),
    rgb!(  0,  0,170), rgb!(  0,  0,255), rgb!(  0, 85,170), rgb!(  0, 85,255),
    rgb!( 85,  0,170), rgb!( 85,  0,255), rgb!( 85, 85,170), rgb!( 85, 85,255),
    rgb!(  0,170,  0), rgb!(  0,170, 85), rgb!(  0,255,  0), rgb!(  0,255, 85),
    rgb!( 85,170,  0), rgb!( 85,170, 85), rgb!( 85,255,  0), rgb!( 85,255, 85),
    rgb!(  0,170,170), rgb!(  0,170,255), rgb!(  0,255,170), rgb!(  0,255,255),
    rgb!( 85,170,170), rgb!( 85,170,255), rgb!( 85,255,170), rgb!( 85,255,255),
    rgb!(170,  0,  0), rgb!(170,  0, 85), rgb!(170, 85,  0), rgb!(170, 85, 85),
    rgb!(255,  0,  0), rgb!(255,  0, 85), rgb!(255, 85,  0), rgb!(255, 85, 85),
    rgb!(170,  0,170), rgb!(170,  0,255), rgb!(170, 85,170), rgb!(170, 85,255),
    rgb!(255,  0,170), rgb!(255,  0,255), rgb!(255, 85,170), rgb!(255, 85,255),
    rgb!(170,170,  0), rgb!(170,170, 85), rgb!(170,255,  0), rgb!(170,255, 85),
    rgb!(255,170,  0), rgb!(255,170, 85), rgb!(255,255,  0), rgb!(255,255, 85),
    rgb!(170,170,170), rgb!(170,170,255), rgb!(170,255,170), rgb!(170,255,255),
    rgb!(255,170,170), rgb!(255,170,255), rgb!(255,255,170), rgb!(255,255,255),
];

/// Composite rendering of the 64 native colors, 16 hues at 4 intensities,
/// hue 0 is the grey column
pub const CMP_TABLE: [Color;64] = [
    rgb!(  0,  0,  0), rgb!(115,  3,  2), rgb!(109, 32,  0), rgb!( 90, 63,  0),
    rgb!( 63, 90,  0), rgb!( 32,109,  0), rgb!(  3,115,  3), rgb!(  0,109, 32),
    rgb!(  0, 90, 63), rgb!(  0, 63, 90), rgb!(  0, 32,109), rgb!(  2,  3,115),
    rgb!( 32,  0,109), rgb!( 63,  0, 90), rgb!( 90,  0, 63), rgb!(109,  0, 32),
    rgb!( 85, 85, 85), rgb!(180, 68, 67), rgb!(174, 97, 44), rgb!(155,128, 32),
    rgb!(128,155, 32), rgb!( 97,174, 44), rgb!( 68,180, 68), rgb!( 44,174, 97),
    rgb!( 32,155,128), rgb!( 32,128,155), rgb!( 44, 97,174), rgb!( 67, 68,180),
    rgb!( 97, 44,174), rgb!(128, 32,155), rgb!(155, 32,128), rgb!(174, 44, 97),
    rgb!(170,170,170), rgb!(245,132,132), rgb!(239,162,109), rgb!(220,193, 97),
    rgb!(193,220, 97), rgb!(162,239,109), rgb!(132,245,132), rgb!(109,239,162),
    rgb!( 97,220,193), rgb!( 97,193,220), rgb!(109,162,239), rgb!(132,132,245),
    rgb!(162,109,239), rgb!(193, 97,220), rgb!(220, 97,193), rgb!(239,109,162),
    rgb!(255,255,255), rgb!(255,198,197), rgb!(255,227,174), rgb!(255,255,162),
    rgb!(255,255,162), rgb!(227,255,174), rgb!(198,255,198), rgb!(174,255,227),
    rgb!(162,255,255), rgb!(162,255,255), rgb!(174,227,255), rgb!(197,198,255),
    rgb!(227,174,255), rgb!(255,162,255), rgb!(255,162,255), rgb!(255,174,227),
];

/// Nearest RGB native index for each composite native index.  The mapping is
/// fixed, nothing is searched at run time.
const CMP_TO_RGB: [u8;64] = [
    0x00,0x04,0x04,0x06,0x06,0x02,0x02,0x02,0x03,0x03,0x01,0x01,0x01,0x05,0x05,0x04,
    0x07,0x23,0x23,0x30,0x30,0x15,0x15,0x15,0x18,0x18,0x0E,0x0E,0x0E,0x28,0x28,0x23,
    0x38,0x3C,0x35,0x35,0x33,0x33,0x3A,0x1E,0x1E,0x1D,0x1D,0x39,0x2B,0x2B,0x2E,0x2E,
    0x3F,0x3C,0x3E,0x3E,0x3E,0x3E,0x3A,0x3B,0x3B,0x3B,0x3B,0x39,0x3D,0x3D,0x3D,0x3D,
];

/// highest native value the chip knows
pub const MAX_NATIVE: u8 = 63;

fn table(space: Colorspace) -> &'static [Color;64] {
    match space {
        Colorspace::Rgb => &RGB_TABLE,
        Colorspace::Cmp => &CMP_TABLE
    }
}

/// Render one native color in the given colorspace
pub fn color_from_native(space: Colorspace,native: u8) -> Result<Color,Error> {
    if native > MAX_NATIVE {
        return Err(Error::NativeOutOfRange);
    }
    Ok(table(space)[native as usize])
}

/// Render a list of native colors in the given colorspace
pub fn colors_from_natives(space: Colorspace,natives: &[u8]) -> Result<Vec<Color>,Error> {
    let mut ans = Vec::new();
    for native in natives {
        ans.push(color_from_native(space,*native)?);
    }
    Ok(ans)
}

/// Render a list of native colors as a `ColorMap` ready for the packed
/// pixel codec.  The map is capped at the list's length.
pub fn colormap_from_natives(space: Colorspace,natives: &[u8]) -> Result<ColorMap,Error> {
    let mut ans = ColorMap::with_max_size(natives.len());
    for native in natives {
        ans.push(color_from_native(space,*native)?)?;
    }
    Ok(ans)
}

/// Re-map a list of native colors from one colorspace to the other, in
/// place.  Equal spaces are a no-op.  Only composite to RGB is supported,
/// the library never re-encodes toward composite.
pub fn convert_color_to_colorspace(from: Colorspace,to: Colorspace,natives: &mut [u8]) -> Result<(),Error> {
    if from==to {
        return Ok(());
    }
    if from==Colorspace::Rgb && to==Colorspace::Cmp {
        warn!("request to re-encode toward composite");
        return Err(Error::UnsupportedConversion);
    }
    for native in natives.iter_mut() {
        if *native > MAX_NATIVE {
            return Err(Error::NativeOutOfRange);
        }
        *native = CMP_TO_RGB[*native as usize];
    }
    Ok(())
}
