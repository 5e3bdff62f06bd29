//! ## Generic color codec
//!
//! Converts between packed native colors and universal colors using a
//! `ColorLayout`.  Channel values are rescaled between the field's discrete
//! range and 0-255, e.g. a 2 bit channel maps {0,1,2,3} onto {0,85,170,255}.
//! The reverse direction is exact-or-reject, a channel value that does not
//! land on the discrete scale is a precision error, never a rounding.

use super::{Color,ColorLayout,Error};
use crate::bitfield::Bitfield;

/// scale a field value up to 0-255
fn scale_up(value: u32,max: u32) -> u8 {
    match max {
        0 => 0,
        max => ((value as u64 * 255) / max as u64) as u8
    }
}

/// Exact inverse of `scale_up`, rejecting channel values that did not come
/// from the field's scale.  An empty field only accepts zero.
fn scale_down(channel: u8,max: u32) -> Result<u32,Error> {
    if max==0 {
        return match channel {
            0 => Ok(0),
            _ => Err(Error::PrecisionLoss)
        };
    }
    let value = ((channel as u64 * max as u64 + 127) / 255) as u32;
    match scale_up(value,max)==channel {
        true => Ok(value),
        false => Err(Error::PrecisionLoss)
    }
}

fn get_channel(field: &Bitfield,packed: u32) -> u8 {
    scale_up(field.get_from(packed),field.max_value())
}

fn set_channel(field: &Bitfield,packed: u32,channel: u8) -> Result<u32,Error> {
    let value = scale_down(channel,field.max_value())?;
    match field.set_in(packed,value) {
        Ok(packed) => Ok(packed),
        Err(_) => Err(Error::PrecisionLoss)
    }
}

/// Unpack a native color into the universal form.  Fails if any bit outside
/// the layout's fields is set.
pub fn to_color(layout: &ColorLayout,packed: u32) -> Result<Color,Error> {
    if packed & !layout.mask() != 0 {
        return Err(Error::PackedColorFormat);
    }
    Ok(Color {
        r: get_channel(layout.r(),packed),
        g: get_channel(layout.g(),packed),
        b: get_channel(layout.b(),packed),
        a: get_channel(layout.a(),packed)
    })
}

/// Pack a universal color.  Every channel must land exactly on its field's
/// scale, including zero for an absent channel.
pub fn from_color(layout: &ColorLayout,color: &Color) -> Result<u32,Error> {
    let mut packed = 0;
    packed = set_channel(layout.r(),packed,color.r)?;
    packed = set_channel(layout.g(),packed,color.g)?;
    packed = set_channel(layout.b(),packed,color.b)?;
    packed = set_channel(layout.a(),packed,color.a)?;
    Ok(packed)
}

/// Pack four explicit channel values
pub fn from_rgba(layout: &ColorLayout,r: u8,g: u8,b: u8,a: u8) -> Result<u32,Error> {
    from_color(layout,&Color::rgba(r,g,b,a))
}

/// Pack three channel values, the alpha channel defaults to whatever the
/// layout can represent, 255 for a real alpha field, 0 for an absent one.
pub fn from_rgb(layout: &ColorLayout,r: u8,g: u8,b: u8) -> Result<u32,Error> {
    let a = match layout.a().width() {
        0 => 0,
        _ => 255
    };
    from_color(layout,&Color::rgba(r,g,b,a))
}
