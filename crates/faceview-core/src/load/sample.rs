//! Downsampling on load.
//!
//! Large photos are reduced by an integer sample size before they reach the
//! viewer: a sample size of `n` keeps roughly one pixel in `n` along each
//! axis.

use super::decode::{apply_orientation, decode_dynamic, get_orientation};
use image::imageops::FilterType;

use super::{DecodeError, DecodedImage};

/// Sample size used when only an upper bound on the pixel count is known.
const MAX_SAMPLE_SIZE: u64 = 128;

/// Load an image and downsample it to fit within `max_width` x `max_height`.
///
/// The sample size is `max(ceil(w / max_width), ceil(h / max_height))`,
/// computed on the stored (pre-orientation) dimensions. A zero bound disables
/// downsampling. EXIF orientation is applied after sampling.
pub fn load_image(
    bytes: &[u8],
    max_width: u32,
    max_height: u32,
) -> Result<DecodedImage, DecodeError> {
    let orientation = get_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    let (width, height) = (img.width(), img.height());

    let sample = if max_width == 0 || max_height == 0 {
        1
    } else {
        width.div_ceil(max_width).max(height.div_ceil(max_height)).max(1)
    };

    let img = if sample > 1 {
        let (w, h) = ((width / sample).max(1), (height / sample).max(1));
        log::debug!("Downsampling {width}x{height} by {sample} to {w}x{h}");
        img.resize_exact(w, h, FilterType::Triangle)
    } else {
        img
    };

    let loaded = DecodedImage::from_rgb_image(apply_orientation(img, orientation).into_rgb8());
    if loaded.is_empty() {
        return Err(DecodeError::ResampleFailed(format!(
            "{width}x{height} image produced no pixels"
        )));
    }
    Ok(loaded)
}

/// Sample size for an image of `width` x `height`.
///
/// Standalone helper for hosts that decode elsewhere and only need the
/// reduction factor; [`load_image`] derives its own factor from its bounds.
///
/// `min_side` caps the reduction so neither side drops below it; `max_pixels`
/// forces enough reduction to stay under that pixel count. When both are
/// given and disagree, the pixel bound wins. The raw factor is rounded up to a
/// power of two when it is at most 8, otherwise up to a multiple of 8.
pub fn compute_sample_size(
    width: u32,
    height: u32,
    min_side: Option<u32>,
    max_pixels: Option<u64>,
) -> u32 {
    let initial = initial_sample_size(
        width as u64,
        height as u64,
        min_side.filter(|&s| s > 0).map(u64::from),
        max_pixels.filter(|&p| p > 0),
    );
    let rounded = if initial <= 8 {
        initial.max(1).next_power_of_two()
    } else {
        initial.div_ceil(8) * 8
    };
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

fn initial_sample_size(
    width: u64,
    height: u64,
    min_side: Option<u64>,
    max_pixels: Option<u64>,
) -> u64 {
    let upper = match min_side {
        Some(side) => (width / side).min(height / side),
        None => MAX_SAMPLE_SIZE,
    };
    let lower = match max_pixels {
        Some(pixels) => ((width * height / pixels) as f64).sqrt().ceil() as u64,
        None => 1,
    };

    if upper < lower {
        return lower;
    }
    match (min_side, max_pixels) {
        (None, None) => 1,
        (None, Some(_)) => lower,
        (Some(_), _) => upper,
    }
}

/// Drop the last column of an odd-width image.
///
/// Face detectors that work on packed pixel pairs reject odd widths.
/// Images one pixel wide are returned unchanged.
pub fn trim_to_even_width(image: DecodedImage) -> DecodedImage {
    if image.width % 2 == 0 || image.width < 2 {
        return image;
    }
    let width = image.width - 1;
    let src_stride = image.width as usize * 3;
    let dst_stride = width as usize * 3;

    let mut pixels = Vec::with_capacity(dst_stride * image.height as usize);
    for row in image.pixels.chunks_exact(src_stride) {
        pixels.extend_from_slice(&row[..dst_stride]);
    }
    DecodedImage::new(width, image.height, pixels)
}

#[cfg(test)]
mod tests {
    use super::super::decode::fixtures;
    use super::*;

    #[test]
    fn test_sample_size_unbounded() {
        assert_eq!(compute_sample_size(4000, 3000, None, None), 1);
    }

    #[test]
    fn test_sample_size_power_of_two() {
        // sqrt(12) rounds up to 4
        assert_eq!(compute_sample_size(4000, 3000, None, Some(1_000_000)), 4);
        // sqrt(6) rounds up to 3, then to the next power of two
        assert_eq!(compute_sample_size(3000, 2000, None, Some(1_000_000)), 4);
    }

    #[test]
    fn test_sample_size_multiple_of_eight() {
        // sqrt(120) rounds up to 11, then to 16
        assert_eq!(compute_sample_size(4000, 3000, None, Some(100_000)), 16);
    }

    #[test]
    fn test_sample_size_min_side() {
        // min(4000/500, 3000/500) = 6, rounded to 8
        assert_eq!(compute_sample_size(4000, 3000, Some(500), None), 8);
    }

    #[test]
    fn test_sample_size_pixel_bound_wins() {
        // min_side allows 2 but the pixel bound requires 11
        assert_eq!(
            compute_sample_size(4000, 3000, Some(1500), Some(100_000)),
            16
        );
    }

    #[test]
    fn test_sample_size_zero_bounds_ignored() {
        assert_eq!(compute_sample_size(4000, 3000, Some(0), Some(0)), 1);
    }

    #[test]
    fn test_load_downsamples() {
        let img = load_image(&fixtures::png(10, 6), 5, 5).unwrap();
        assert_eq!((img.width, img.height), (5, 3));
    }

    #[test]
    fn test_load_uses_larger_ratio() {
        // ceil(12/10) = 2, ceil(40/10) = 4
        let img = load_image(&fixtures::png(12, 40), 10, 10).unwrap();
        assert_eq!((img.width, img.height), (3, 10));
    }

    #[test]
    fn test_load_zero_bound_keeps_size() {
        let img = load_image(&fixtures::png(10, 6), 0, 5).unwrap();
        assert_eq!((img.width, img.height), (10, 6));
    }

    #[test]
    fn test_load_small_image_unchanged() {
        let img = load_image(&fixtures::png(4, 3), 1000, 1000).unwrap();
        assert_eq!((img.width, img.height), (4, 3));
        assert_eq!(img.rgb_at(0, 0), Some([255, 0, 0]));
    }

    #[test]
    fn test_load_invalid_bytes() {
        assert!(load_image(b"not an image", 100, 100).is_err());
    }

    #[test]
    fn test_trim_odd_width() {
        let img = DecodedImage::new(3, 2, (0..18).collect());
        let trimmed = trim_to_even_width(img);
        assert_eq!((trimmed.width, trimmed.height), (2, 2));
        assert_eq!(trimmed.pixels, vec![0, 1, 2, 3, 4, 5, 9, 10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_trim_even_width_unchanged() {
        let img = DecodedImage::new(2, 1, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(trim_to_even_width(img.clone()), img);
    }

    #[test]
    fn test_trim_single_column_unchanged() {
        let img = DecodedImage::new(1, 2, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(trim_to_even_width(img.clone()).width, 1);
    }
}
