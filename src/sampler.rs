use crate::rgb::Rgb;

/// Pixels with an alpha value below this are considered transparent and are not sampled.
pub const ALPHA_THRESHOLD: u8 = 128;

/// How pixels are laid out in a raw row-major byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// Three bytes per pixel.
    Rgb,
    /// Four bytes per pixel, the last one being alpha.
    Rgba,
}

impl PixelLayout {
    pub fn from_alpha(has_alpha: bool) -> Self {
        if has_alpha {
            PixelLayout::Rgba
        } else {
            PixelLayout::Rgb
        }
    }

    pub fn stride(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

/// Collect every opaque pixel in `data` as a sample, in buffer order.
///
/// A trailing partial pixel is ignored. With [`PixelLayout::Rgba`], pixels whose alpha is below [`ALPHA_THRESHOLD`]
/// are skipped and the alpha channel of the rest is dropped.
pub fn sample_pixels(data: &[u8], layout: PixelLayout) -> Vec<Rgb> {
    data.chunks_exact(layout.stride())
        .filter(|pixel| layout == PixelLayout::Rgb || pixel[3] >= ALPHA_THRESHOLD)
        .map(|pixel| Rgb::new(pixel[0], pixel[1], pixel[2]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_every_rgb_pixel() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        let samples = sample_pixels(&data, PixelLayout::Rgb);

        assert_eq!(samples, vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6), Rgb::new(7, 8, 9)]);
    }

    #[test]
    fn ignores_trailing_partial_pixel() {
        assert_eq!(sample_pixels(&[1, 2, 3, 4, 5], PixelLayout::Rgb), vec![Rgb::new(1, 2, 3)]);
        assert_eq!(sample_pixels(&[1, 2, 3, 255, 5, 6, 7], PixelLayout::Rgba), vec![Rgb::new(1, 2, 3)]);
    }

    #[test]
    fn drops_transparent_pixels() {
        let data = [
            10, 20, 30, 127, // dropped
            40, 50, 60, 128, // kept, exactly at the threshold
            70, 80, 90, 255, // kept
            1, 1, 1, 0, // dropped
        ];

        assert_eq!(
            sample_pixels(&data, PixelLayout::Rgba),
            vec![Rgb::new(40, 50, 60), Rgb::new(70, 80, 90)]
        );
    }

    #[test]
    fn alpha_is_not_checked_for_rgb() {
        // the fourth byte here is the red channel of the second pixel
        let data = [0, 0, 0, 0, 0, 0];
        assert_eq!(sample_pixels(&data, PixelLayout::Rgb).len(), 2);
    }

    #[test]
    fn empty_input_yields_no_samples() {
        assert!(sample_pixels(&[], PixelLayout::Rgb).is_empty());
        assert!(sample_pixels(&[], PixelLayout::Rgba).is_empty());
    }

    #[test]
    fn layout_from_alpha_flag() {
        assert_eq!(PixelLayout::from_alpha(true).stride(), 4);
        assert_eq!(PixelLayout::from_alpha(false).stride(), 3);
    }
}
