//! ## pack subcommand
//!
//! Encodes a portable pixmap into a native image.  Every pixel must match
//! the target palette exactly; a stray color aborts the encode.

use std::str::FromStr;
use log::error;
use super::CommandError;
use crate::img::{ImageFormat,ImageFormatType};
use crate::img::{hrs,mge,vef,rat,pal};
use crate::clr::{codec,Color,ColorLayout};
use crate::clr::gime::Colorspace;
use crate::pix::PixelBuffer;
use crate::{STDRESULT,DYNERR};

/// Palette in order of first appearance.  Every color must be
/// representable on the chip's RGB scale.
fn derive_palette(buf: &PixelBuffer) -> Result<Vec<u8>,DYNERR> {
    let layout = ColorLayout::gime_rgb();
    let mut seen: Vec<Color> = Vec::new();
    let mut ans = Vec::new();
    for row in 0..buf.height() {
        for color in buf.row(row)? {
            if !seen.contains(color) {
                seen.push(*color);
                ans.push(codec::from_rgb(&layout,color.r,color.g,color.b)? as u8);
            }
        }
    }
    Ok(ans)
}

pub fn pack(cmd: &clap::ArgMatches) -> STDRESULT {
    let bytes = super::get_input_bytes(cmd)?;
    let buf = super::buffer_from_ppm(&bytes)?;
    let natives = match cmd.get_one::<String>("palette") {
        Some(path) => {
            let mut palfile = pal::Pal::from_bytes(&std::fs::read(path)?)?;
            if palfile.colorspace()==Colorspace::Cmp {
                palfile.convert(Colorspace::Rgb)?;
            }
            palfile.natives().clone()
        },
        None => derive_palette(&buf)?
    };
    if natives.len() > 16 {
        error!("pixmap needs {} palette entries, the chip has 16",natives.len());
        return Err(Box::new(CommandError::OutOfRange));
    }
    let mut palette = [0u8;16];
    palette[..natives.len()].copy_from_slice(&natives);
    let typ = match cmd.get_one::<String>("type") {
        Some(s) => ImageFormatType::from_str(s)?,
        None => return Err(Box::new(CommandError::InvalidCommand))
    };
    let out = match typ {
        ImageFormatType::HRS => hrs::Hrs::create(palette,buf)?.to_bytes()?,
        ImageFormatType::MGE => mge::Mge::create(palette,"",buf)?.to_bytes()?,
        ImageFormatType::VEF => vef::Vef::create(palette,buf)?.to_bytes()?,
        ImageFormatType::RAT => rat::Rat::create(palette,0,buf)?.to_bytes()?,
        _ => return Err(Box::new(CommandError::UnsupportedFormat))
    };
    super::put_output_bytes(cmd,&out,true)
}
