//! # `gimekit` main library
//!
//! This library converts images between the native formats of the Color
//! Computer 3's GIME video chip and an engine-neutral RGBA form.
//! Conversions can be done at a level as low as single packed bytes, or as
//! high as whole files.
//!
//! ## Architecture
//!
//! Image operations are built around a few object types:
//! * `img::ImageFormat` decodes/encodes a native file, e.g. `img::cm3::Cm3`
//! * `clr::ColorMap` holds the decoded palette that pixel indices address
//! * `pix::PixelBuffer` holds the decoded RGBA pixels, with `pix::PixelView`
//!   providing rectangular windows for decoders that work in pages
//!
//! When an `ImageFormat` object is created it decodes the whole file at
//! once.  The native palette bytes pass through the `clr` module, which
//! knows the GIME's two colorspaces, and the packed pixel data passes
//! through the `pix::packed` codec.  Composite palettes are normalized to
//! RGB on the way in, and nothing is ever re-encoded toward composite.
//!
//! ## Image Formats
//!
//! As of this writing `gimekit` supports
//! * CM3 (CoCoMax III, read only)
//! * MGE (ColorMax 3)
//! * VEF (OS-9 video exchange)
//! * HRS (raw screen dump)
//! * RAT (Diecom)
//! * PAL (palette text)
//!
//! ## Precision
//!
//! Every conversion is exact-or-reject.  Packing a color that is not in
//! the palette, or a channel value that does not land on the chip's scale,
//! is an error; nothing is clamped or matched to a nearest neighbor.

pub mod bitfield;
pub mod clr;
pub mod pix;
pub mod img;
pub mod commands;
pub mod cli;

use std::io::Read;
use log::{warn,info};
use img::ImageFormat;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const KNOWN_FILE_EXTENSIONS: &str = "cm3,mge,vef,hrs,rat,pal";

/// Save the native image file (make changes permanent)
pub fn save_img(img: &Box<dyn ImageFormat>,img_path: &str) -> STDRESULT {
    std::fs::write(img_path,img.to_bytes()?)?;
    Ok(())
}

/// Given a bytestream return a decoded image, or Err if the bytestream
/// cannot be interpreted.  Optional `maybe_ext` restricts the image types
/// that will be tried based on file extension.
pub fn create_image_from_bytestream(img_data: &Vec<u8>,maybe_ext: Option<&str>) -> Result<Box<dyn ImageFormat>,DYNERR> {
    let ext = match maybe_ext {
        Some(x) => x.to_string().to_lowercase(),
        None => "".to_string()
    };
    if img::cm3::file_extensions().contains(&ext) || ext=="" {
        if let Ok(img) = img::cm3::Cm3::from_bytes(img_data) {
            info!("identified CM3 image");
            return Ok(Box::new(img));
        }
    }
    if img::mge::file_extensions().contains(&ext) || ext=="" {
        if let Ok(img) = img::mge::Mge::from_bytes(img_data) {
            info!("identified MGE image");
            return Ok(Box::new(img));
        }
    }
    if img::vef::file_extensions().contains(&ext) || ext=="" {
        if let Ok(img) = img::vef::Vef::from_bytes(img_data) {
            info!("identified VEF image");
            return Ok(Box::new(img));
        }
    }
    if img::rat::file_extensions().contains(&ext) || ext=="" {
        if let Ok(img) = img::rat::Rat::from_bytes(img_data) {
            info!("identified RAT image");
            return Ok(Box::new(img));
        }
    }
    if img::hrs::file_extensions().contains(&ext) || ext=="" {
        if let Ok(img) = img::hrs::Hrs::from_bytes(img_data) {
            info!("Possible HRS image");
            return Ok(Box::new(img));
        }
    }
    if img::pal::file_extensions().contains(&ext) || ext=="" {
        if let Ok(img) = img::pal::Pal::from_bytes(img_data) {
            info!("identified palette file");
            return Ok(Box::new(img));
        }
    }
    warn!("cannot match any image format");
    return Err(Box::new(img::Error::UnknownImageType));
}

/// Calls `create_image_from_bytestream` getting the bytes from a file.
/// File extension will be used to restrict image types that are tried,
/// unless the extension is unknown, in which case all will be tried.
pub fn create_image_from_file(img_path: &str) -> Result<Box<dyn ImageFormat>,DYNERR> {
    match std::fs::read(img_path) {
        Ok(img_data) => {
            let mut maybe_ext = img_path.split('.').last();
            if let Some(ext) = maybe_ext {
                if !KNOWN_FILE_EXTENSIONS.contains(&ext.to_lowercase()) {
                    maybe_ext = None;
                }
            }
            create_image_from_bytestream(&img_data,maybe_ext)
        },
        Err(e) => Err(Box::new(e))
    }
}

/// Calls `create_image_from_bytestream` getting the bytes from stdin.
/// All image types will be tried heuristically.
pub fn create_image_from_stdin() -> Result<Box<dyn ImageFormat>,DYNERR> {
    let mut img_data = Vec::new();
    match std::io::stdin().read_to_end(&mut img_data) {
        Ok(_n) => create_image_from_bytestream(&img_data,None),
        Err(e) => Err(Box::new(e))
    }
}

/// Display binary to stdout in columns of hex and ascii
pub fn display_block(start_addr: u16,block: &Vec<u8>) {
    let mut slice_start = 0;
    loop {
        let row_label = start_addr as usize + slice_start;
        let mut slice_end = slice_start + 16;
        if slice_end > block.len() {
            slice_end = block.len();
        }
        let slice = block[slice_start..slice_end].to_vec();
        let txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x<32 => '.' as u8,
            x if x<127 => x,
            _ => '.' as u8
        }).collect();
        print!("{:04X} : ",row_label);
        for byte in &slice {
            print!("{:02X} ",byte);
        }
        for _blank in slice_end..slice_start+16 {
            print!("   ");
        }
        println!("|{}|",String::from_utf8_lossy(&txt));
        slice_start += 16;
        if slice_end==block.len() {
            break;
        }
    }
}
