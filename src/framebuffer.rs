//! Framebuffer conversion to packed RGB888.

use crate::backend::FrameView;
use crate::error::{CoreError, RetroFailure};

/// Source pixel layouts the core can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 16-bit, native endian, 5-6-5.
    Rgb565,
    /// 32-bit, native endian, unused top byte.
    Xrgb8888,
}

impl PixelFormat {
    pub fn from_depth(depth: u32) -> Result<Self, RetroFailure> {
        match depth {
            16 => Ok(Self::Rgb565),
            32 => Ok(Self::Xrgb8888),
            other => Err(RetroFailure::UnsupportedPixelFormat(other)),
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb565 => 2,
            Self::Xrgb8888 => 4,
        }
    }
}

/// Required output length for a `width` x `height` RGB888 image, or `None`
/// if it does not fit in `usize`.
pub fn rgb888_len(width: usize, height: usize) -> Option<usize> {
    width.checked_mul(height)?.checked_mul(3)
}

/// Copy the top-left `width` x `height` region of `frame` into `out` as RGB888.
///
/// `out` must be exactly `width * height * 3` bytes; its stride is `width * 3`.
pub fn copy_to_rgb888(
    frame: &FrameView<'_>,
    width: usize,
    height: usize,
    out: &mut [u8],
) -> Result<(), RetroFailure> {
    let format = PixelFormat::from_depth(frame.depth)?;

    let expected = rgb888_len(width, height).unwrap_or(usize::MAX);
    if out.len() != expected {
        return Err(RetroFailure::BufferSize {
            expected,
            actual: out.len(),
        });
    }
    if width > frame.width || height > frame.height {
        return Err(RetroFailure::FrameBounds {
            width,
            height,
            max_width: frame.width,
            max_height: frame.height,
        });
    }
    if width == 0 || height == 0 {
        return Ok(());
    }

    let bpp = format.bytes_per_pixel();
    let row_bytes = width * bpp;
    let needed = frame.pitch * (height - 1) + row_bytes;
    if frame.pitch < row_bytes || frame.data.len() < needed {
        return Err(CoreError::rejected("framebuffer", "pitch or length too small for its size").into());
    }

    for (y, dst_row) in out.chunks_exact_mut(width * 3).enumerate() {
        let src_row = &frame.data[y * frame.pitch..y * frame.pitch + row_bytes];
        for (src, dst) in src_row.chunks_exact(bpp).zip(dst_row.chunks_exact_mut(3)) {
            dst.copy_from_slice(&convert_pixel(format, src));
        }
    }
    Ok(())
}

fn convert_pixel(format: PixelFormat, src: &[u8]) -> [u8; 3] {
    match format {
        PixelFormat::Rgb565 => {
            let p = u16::from_ne_bytes([src[0], src[1]]);
            let r = ((p >> 11) & 0x1f) as u8;
            let g = ((p >> 5) & 0x3f) as u8;
            let b = (p & 0x1f) as u8;
            [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
        }
        PixelFormat::Xrgb8888 => {
            let p = u32::from_ne_bytes([src[0], src[1], src[2], src[3]]);
            [(p >> 16) as u8, (p >> 8) as u8, p as u8]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xrgb(pixels: &[u32], pitch_pad: usize, width: usize) -> Vec<u8> {
        let mut data = Vec::new();
        for row in pixels.chunks(width) {
            for p in row {
                data.extend_from_slice(&p.to_ne_bytes());
            }
            data.extend(std::iter::repeat_n(0xEE, pitch_pad));
        }
        data
    }

    #[test]
    fn converts_xrgb8888_with_padded_pitch() {
        let data = xrgb(&[0x00FF0000, 0x0000FF00, 0xFF0000FF, 0x00102030], 4, 2);
        let frame = FrameView {
            depth: 32,
            width: 2,
            height: 2,
            pitch: 12,
            data: &data,
        };
        let mut out = vec![0u8; 12];
        copy_to_rgb888(&frame, 2, 2, &mut out).unwrap();
        assert_eq!(out, vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 0x10, 0x20, 0x30]);
    }

    #[test]
    fn converts_rgb565_extremes() {
        let pixels: [u16; 3] = [0xF800, 0x07E0, 0xFFFF];
        let data: Vec<u8> = pixels.iter().flat_map(|p| p.to_ne_bytes()).collect();
        let frame = FrameView {
            depth: 16,
            width: 3,
            height: 1,
            pitch: 6,
            data: &data,
        };
        let mut out = vec![0u8; 9];
        copy_to_rgb888(&frame, 3, 1, &mut out).unwrap();
        assert_eq!(out, vec![255, 0, 0, 0, 255, 0, 255, 255, 255]);
    }

    #[test]
    fn crops_to_requested_region() {
        let data = xrgb(&[0x00010101, 0x00020202, 0x00030303, 0x00040404], 0, 2);
        let frame = FrameView {
            depth: 32,
            width: 2,
            height: 2,
            pitch: 8,
            data: &data,
        };
        let mut out = vec![0u8; 3];
        copy_to_rgb888(&frame, 1, 1, &mut out).unwrap();
        assert_eq!(out, vec![1, 1, 1]);
    }

    #[test]
    fn rejects_wrong_buffer_and_size() {
        let data = vec![0u8; 16];
        let frame = FrameView {
            depth: 32,
            width: 2,
            height: 2,
            pitch: 8,
            data: &data,
        };

        let mut short = vec![0u8; 11];
        assert!(matches!(
            copy_to_rgb888(&frame, 2, 2, &mut short),
            Err(RetroFailure::BufferSize {
                expected: 12,
                actual: 11
            })
        ));

        let mut big = vec![0u8; rgb888_len(3, 2).unwrap()];
        assert!(matches!(
            copy_to_rgb888(&frame, 3, 2, &mut big),
            Err(RetroFailure::FrameBounds { .. })
        ));

        let mut empty: Vec<u8> = Vec::new();
        assert!(matches!(
            copy_to_rgb888(&frame, usize::MAX, 2, &mut empty),
            Err(RetroFailure::BufferSize {
                expected: usize::MAX,
                actual: 0
            })
        ));
        assert_eq!(rgb888_len(usize::MAX / 2, 2), None);

        let odd = FrameView { depth: 24, ..frame };
        let mut out = vec![0u8; 12];
        assert!(matches!(
            copy_to_rgb888(&odd, 2, 2, &mut out),
            Err(RetroFailure::UnsupportedPixelFormat(24))
        ));
    }
}
