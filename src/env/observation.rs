//! Frame preprocessing for agents: downscale, grayscale, normalise.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, RgbImage};

use super::EnvError;
use crate::error::RetroFailure;

/// Side of the square observation frame, in pixels.
pub const OBSERVATION_SIDE: u32 = 84;

/// Values per preprocessed frame.
pub const OBSERVATION_LEN: usize = (OBSERVATION_SIDE * OBSERVATION_SIDE) as usize;

/// Turn an RGB888 frame into `OBSERVATION_LEN` grayscale values in `0.0..=1.0`.
///
/// The frame is resized with nearest-neighbour sampling and weighted
/// 0.299 R + 0.587 G + 0.114 B. An empty frame yields all zeros.
pub fn preprocess(rgb: Vec<u8>, width: usize, height: usize) -> Result<Vec<f32>, EnvError> {
    if width == 0 || height == 0 {
        return Ok(vec![0.0; OBSERVATION_LEN]);
    }

    let actual = rgb.len();
    let too_small = || RetroFailure::BufferSize {
        expected: width.saturating_mul(height).saturating_mul(3),
        actual,
    };
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(too_small().into());
    };
    let img: RgbImage = ImageBuffer::from_raw(w, h, rgb).ok_or_else(too_small)?;

    let resized = imageops::resize(&img, OBSERVATION_SIDE, OBSERVATION_SIDE, FilterType::Nearest);
    Ok(resized
        .pixels()
        .map(|p| {
            let gray = (0.299 * p[0] as f32 + 0.587 * p[1] as f32 + 0.114 * p[2] as f32) as u8;
            gray as f32 / 255.0
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_frame_becomes_uniform_gray() {
        let red: Vec<u8> = [255u8, 0, 0].repeat(6 * 4);
        let obs = preprocess(red, 6, 4).unwrap();
        assert_eq!(obs.len(), OBSERVATION_LEN);
        let expected = (0.299f32 * 255.0) as u8 as f32 / 255.0;
        assert!(obs.iter().all(|&v| v == expected));
    }

    #[test]
    fn resize_keeps_left_and_right_apart() {
        // 2x1: black, then red.
        let frame = vec![0, 0, 0, 255, 0, 0];
        let obs = preprocess(frame, 2, 1).unwrap();
        let side = OBSERVATION_SIDE as usize;
        assert_eq!(obs[0], 0.0);
        assert!(obs[side - 1] > 0.0);
        assert_eq!(obs[side * (side - 1)], 0.0);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let err = preprocess(vec![0; 5], 2, 1).unwrap_err();
        assert!(matches!(
            err,
            EnvError::Retro(RetroFailure::BufferSize { expected: 6, actual: 5 })
        ));
        assert_eq!(preprocess(Vec::new(), 0, 0).unwrap(), vec![0.0; OBSERVATION_LEN]);
    }
}
