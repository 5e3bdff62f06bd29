//! ## Support for palette text files
//!
//! A palette file is plain text: comment lines start with `*`, the first
//! significant token names the colorspace (`rgb` or `cmp`), and the
//! remaining tokens are native values 0-63 in decimal, separated by
//! whitespace or commas.  Unlike the image formats, a composite palette
//! file is kept in its own colorspace; conversion is up to the caller, and
//! only the composite to RGB direction will succeed.

use std::str::FromStr;
use regex::Regex;
use crate::img;
use crate::clr::ColorMap;
use crate::clr::gime::{self,Colorspace};
use crate::pix::PixelBuffer;
use crate::DYNERR;

pub fn file_extensions() -> Vec<String> {
    vec!["pal".to_string()]
}

/// Wrapper for a palette file.  This is a degenerate `ImageFormat` with no
/// pixel data, only a colormap.
pub struct Pal {
    colorspace: Colorspace,
    natives: Vec<u8>,
    map: ColorMap,
    buf: PixelBuffer
}

impl Pal {
    pub fn colorspace(&self) -> Colorspace {
        self.colorspace
    }
    pub fn natives(&self) -> &Vec<u8> {
        &self.natives
    }
    /// Re-map the palette into another colorspace, in place.  Only the
    /// composite to RGB direction is supported.
    pub fn convert(&mut self,to: Colorspace) -> Result<(),DYNERR> {
        gime::convert_color_to_colorspace(self.colorspace,to,&mut self.natives)?;
        self.colorspace = to;
        self.map = gime::colormap_from_natives(to,&self.natives)?;
        Ok(())
    }
    /// Build a palette file object from natives, used by the palette command.
    pub fn create(colorspace: Colorspace,natives: Vec<u8>) -> Result<Self,DYNERR> {
        let map = gime::colormap_from_natives(colorspace,&natives)?;
        Ok(Self {
            colorspace,
            natives,
            map,
            buf: PixelBuffer::create(0,0)
        })
    }
}

impl img::ImageFormat for Pal {
    fn from_bytes(buf: &[u8]) -> Result<Self,DYNERR> {
        let text = match std::str::from_utf8(buf) {
            Ok(text) => text,
            Err(_) => return Err(Box::new(img::Error::FormatViolation("palette text".to_string())))
        };
        let separator = Regex::new(r"[,\s]+").expect("regex parsing error");
        let mut colorspace: Option<Colorspace> = None;
        let mut natives: Vec<u8> = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('*') {
                continue;
            }
            for token in separator.split(line).filter(|t| !t.is_empty()) {
                match colorspace {
                    None => {
                        colorspace = match Colorspace::from_str(token) {
                            Ok(cs) => Some(cs),
                            Err(_) => return Err(Box::new(img::Error::FormatViolation("palette colorspace".to_string())))
                        };
                    },
                    Some(_) => {
                        let native = match u8::from_str(token) {
                            Ok(v) if v <= gime::MAX_NATIVE => v,
                            _ => return Err(Box::new(img::Error::FormatViolation("palette values".to_string())))
                        };
                        natives.push(native);
                    }
                }
            }
        }
        let colorspace = match colorspace {
            Some(cs) => cs,
            None => return Err(Box::new(img::Error::OutOfData("palette colorspace".to_string())))
        };
        if natives.is_empty() {
            return Err(Box::new(img::Error::OutOfData("palette values".to_string())));
        }
        let map = gime::colormap_from_natives(colorspace,&natives)?;
        Ok(Self {
            colorspace,
            natives,
            map,
            buf: PixelBuffer::create(0,0)
        })
    }
    fn to_bytes(&self) -> Result<Vec<u8>,DYNERR> {
        let mut text = String::from("* GIME palette\n");
        text += &self.colorspace.to_string();
        text += "\n";
        for chunk in self.natives.chunks(8) {
            let vals: Vec<String> = chunk.iter().map(|v| format!("{:2}",v)).collect();
            text += &vals.join(" ");
            text += "\n";
        }
        Ok(text.into_bytes())
    }
    fn what_am_i(&self) -> img::ImageFormatType {
        img::ImageFormatType::PAL
    }
    fn file_extensions(&self) -> Vec<String> {
        file_extensions()
    }
    fn width(&self) -> usize {
        0
    }
    fn height(&self) -> usize {
        0
    }
    fn colormap(&self) -> &ColorMap {
        &self.map
    }
    fn buffer(&self) -> &PixelBuffer {
        &self.buf
    }
    fn get_metadata(&self,indent: Option<u16>) -> String {
        let mut root = json::JsonValue::new_object();
        let typ = self.what_am_i().to_string();
        root[&typ] = json::JsonValue::new_object();
        root[&typ]["colorspace"] = self.colorspace.to_string().into();
        root[&typ]["entries"] = self.natives.len().into();
        root[&typ]["palette"] = img::palette_json(&self.natives);
        match indent {
            Some(spaces) => json::stringify_pretty(root,spaces),
            None => json::stringify(root)
        }
    }
}
