//! ## palette subcommand
//!
//! Extracts a palette from any native file and writes it as text.  Bare
//! palette files keep their declared colorspace, decoded images are
//! always RGB.

use std::str::FromStr;
use crate::img::{ImageFormat,pal};
use crate::clr::gime::Colorspace;
use crate::STDRESULT;

pub fn palette(cmd: &clap::ArgMatches) -> STDRESULT {
    let bytes = super::get_input_bytes(cmd)?;
    // a bare palette file keeps its colorspace, so try that reading first
    let mut palfile = match pal::Pal::from_bytes(&bytes) {
        Ok(palfile) => palfile,
        Err(_) => {
            let img = crate::create_image_from_bytestream(&bytes,None)?;
            pal::Pal::create(Colorspace::Rgb,super::natives_from_colormap(img.colormap())?)?
        }
    };
    if let Some(space) = cmd.get_one::<String>("colorspace") {
        palfile.convert(Colorspace::from_str(space)?)?;
    }
    super::put_output_bytes(cmd,&palfile.to_bytes()?,false)
}
