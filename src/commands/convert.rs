//! ## convert subcommand
//!
//! Decodes a native image and writes it out in a universal form.

use log::error;
use super::CommandError;
use crate::STDRESULT;

pub fn convert(cmd: &clap::ArgMatches) -> STDRESULT {
    let img = match cmd.get_one::<String>("file") {
        Some(path) => crate::create_image_from_file(path)?,
        None => crate::create_image_from_stdin()?
    };
    if img.width()==0 {
        error!("input is a bare palette, nothing to convert");
        return Err(Box::new(CommandError::UnsupportedFormat));
    }
    let out = match cmd.get_one::<String>("type").map(|s| s.as_str()) {
        Some("ppm") => super::ppm_from_buffer(img.buffer())?,
        Some("rgba") => super::rgba_from_buffer(img.buffer())?,
        _ => return Err(Box::new(CommandError::InvalidCommand))
    };
    super::put_output_bytes(cmd,&out,true)
}
