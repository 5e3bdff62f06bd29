//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.

pub mod convert;
pub mod pack;
pub mod palette;
pub mod completions;

use std::io::{Read,Write};
use log::debug;
use crate::clr::{codec,ColorLayout,ColorMap,Color};
use crate::pix::PixelBuffer;
use crate::{STDRESULT,DYNERR};

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("One of the parameters was out of range")]
    OutOfRange,
    #[error("Input source is not supported")]
    UnsupportedFormat,
    #[error("Input source could not be interpreted")]
    UnknownFormat,
    #[error("Refusing to write binary to the console")]
    ConsoleBinary
}

/// Read the raw input, from the file argument if given, else from stdin.
pub fn get_input_bytes(cmd: &clap::ArgMatches) -> Result<Vec<u8>,DYNERR> {
    match cmd.get_one::<String>("file") {
        Some(path) => Ok(std::fs::read(path)?),
        None => {
            let mut ans = Vec::new();
            std::io::stdin().read_to_end(&mut ans)?;
            Ok(ans)
        }
    }
}

/// Write the output, to the out argument if given, else to stdout.
/// Binary output to a console is refused.
pub fn put_output_bytes(cmd: &clap::ArgMatches,bytes: &[u8],binary: bool) -> STDRESULT {
    match cmd.get_one::<String>("out") {
        Some(path) => {
            std::fs::write(path,bytes)?;
            Ok(())
        },
        None => {
            if binary && atty::is(atty::Stream::Stdout) {
                return Err(Box::new(CommandError::ConsoleBinary));
            }
            std::io::stdout().write_all(bytes)?;
            Ok(())
        }
    }
}

/// Derive native palette values from decoded palette colors.  Decoded
/// palettes are RGB renderings, so this succeeds for anything that came
/// through the normal load path.
pub fn natives_from_colormap(map: &ColorMap) -> Result<Vec<u8>,DYNERR> {
    let layout = ColorLayout::gime_rgb();
    let mut ans = Vec::new();
    for color in map.iter() {
        ans.push(codec::from_rgb(&layout,color.r,color.g,color.b)? as u8);
    }
    Ok(ans)
}

/// binary portable pixmap from a pixel buffer, alpha is dropped
pub fn ppm_from_buffer(buf: &PixelBuffer) -> Result<Vec<u8>,DYNERR> {
    let mut ans = format!("P6\n{} {}\n255\n",buf.width(),buf.height()).into_bytes();
    for row in 0..buf.height() {
        for color in buf.row(row)? {
            ans.push(color.r);
            ans.push(color.g);
            ans.push(color.b);
        }
    }
    Ok(ans)
}

/// raw RGBA rows from a pixel buffer, no header
pub fn rgba_from_buffer(buf: &PixelBuffer) -> Result<Vec<u8>,DYNERR> {
    let mut ans = Vec::new();
    for row in 0..buf.height() {
        for color in buf.row(row)? {
            ans.push(color.r);
            ans.push(color.g);
            ans.push(color.b);
            ans.push(color.a);
        }
    }
    Ok(ans)
}

/// Parse a binary portable pixmap (P6) into a pixel buffer.  Only maximum
/// value 255 is supported.  Colors come out opaque.
pub fn buffer_from_ppm(bytes: &[u8]) -> Result<PixelBuffer,DYNERR> {
    let mut ptr: usize = 0;
    let magic = ppm_token(bytes,&mut ptr)?;
    if magic != "P6" {
        debug!("pixmap magic was {}",magic);
        return Err(Box::new(CommandError::UnknownFormat));
    }
    let width = usize::from_str_radix(&ppm_token(bytes,&mut ptr)?,10)?;
    let height = usize::from_str_radix(&ppm_token(bytes,&mut ptr)?,10)?;
    let maxval = usize::from_str_radix(&ppm_token(bytes,&mut ptr)?,10)?;
    if maxval != 255 {
        debug!("pixmap maximum value was {}",maxval);
        return Err(Box::new(CommandError::UnsupportedFormat));
    }
    if ptr + 3*width*height > bytes.len() {
        return Err(Box::new(CommandError::UnknownFormat));
    }
    let mut ans = PixelBuffer::create(width,height);
    let mut view = ans.view_mut_all();
    for row in 0..height {
        let out = view.row_mut(row)?;
        for col in 0..width {
            out[col] = Color::rgb(bytes[ptr],bytes[ptr+1],bytes[ptr+2]);
            ptr += 3;
        }
    }
    Ok(ans)
}

/// Next whitespace-delimited pixmap header token, skipping `#` comments.
/// Advances the pointer past the single whitespace byte that ends the token.
fn ppm_token(bytes: &[u8],ptr: &mut usize) -> Result<String,DYNERR> {
    let mut ans = String::new();
    let mut in_comment = false;
    while *ptr < bytes.len() {
        let by = bytes[*ptr];
        *ptr += 1;
        if in_comment {
            in_comment = by != b'\n';
            continue;
        }
        match by {
            b'#' => in_comment = true,
            b' ' | b'\t' | b'\r' | b'\n' => {
                if !ans.is_empty() {
                    return Ok(ans);
                }
            },
            printable => ans.push(printable as char)
        }
    }
    Err(Box::new(CommandError::UnknownFormat))
}
