use crate::context::state::BlendFactor;
use crate::foundation::core::Pixel;
use crate::foundation::math::{mul_div255_u8, mul_div255_u16};

fn factor(f: BlendFactor, src: Pixel, dst: Pixel, channel: usize) -> u16 {
    let sa = u16::from(src[3]);
    let da = u16::from(dst[3]);
    match f {
        BlendFactor::Zero => 0,
        BlendFactor::One => 255,
        BlendFactor::SrcColor => u16::from(src[channel]),
        BlendFactor::OneMinusSrcColor => 255 - u16::from(src[channel]),
        BlendFactor::DstColor => u16::from(dst[channel]),
        BlendFactor::OneMinusDstColor => 255 - u16::from(dst[channel]),
        BlendFactor::SrcAlpha => sa,
        BlendFactor::OneMinusSrcAlpha => 255 - sa,
        BlendFactor::DstAlpha => da,
        BlendFactor::OneMinusDstAlpha => 255 - da,
    }
}

/// `src * sfactor + dst * dfactor` per channel, saturating at 255.
pub(crate) fn blend(src: Pixel, dst: Pixel, sfactor: BlendFactor, dfactor: BlendFactor) -> Pixel {
    if sfactor == BlendFactor::One && dfactor == BlendFactor::Zero {
        return src;
    }
    let mut out = [0u8; 4];
    for i in 0..4 {
        let s = mul_div255_u16(u16::from(src[i]), factor(sfactor, src, dst, i));
        let d = mul_div255_u16(u16::from(dst[i]), factor(dfactor, src, dst, i));
        out[i] = (s + d).min(255) as u8;
    }
    out
}

/// Multiply every channel by a float factor in `[0, 1]`.
pub(crate) fn tint(px: Pixel, t: [f32; 4]) -> Pixel {
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = (f32::from(px[i]) * t[i].clamp(0.0, 1.0)).round() as u8;
    }
    out
}

/// Channel-wise product of two pixels, used to modulate texels by the fragment color.
pub(crate) fn modulate(a: Pixel, b: Pixel) -> Pixel {
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = mul_div255_u8(u16::from(a[i]), u16::from(b[i]));
    }
    out
}
