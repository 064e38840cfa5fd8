//! Sample transforms applied to decoded images.

use image::DynamicImage;
use image::imageops::FilterType;
use ndarray::Array3;

/// Converts a decoded image into a dataset sample.
pub trait Transform {
    type Output;

    fn apply(&self, image: DynamicImage) -> Self::Output;
}

/// Returns the decoded image unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transform for Identity {
    type Output = DynamicImage;

    fn apply(&self, image: DynamicImage) -> DynamicImage {
        image
    }
}

/// RGB tensor in channel-height-width layout with values in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTensor;

impl Transform for ToTensor {
    type Output = Array3<f32>;

    fn apply(&self, image: DynamicImage) -> Array3<f32> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        Array3::from_shape_fn((3, height as usize, width as usize), |(c, y, x)| {
            f32::from(rgb.get_pixel(x as u32, y as u32)[c]) / 255.0
        })
    }
}

/// Resize to exact dimensions, ignoring aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct Resize {
    pub width: u32,
    pub height: u32,
}

impl Transform for Resize {
    type Output = DynamicImage;

    fn apply(&self, image: DynamicImage) -> DynamicImage {
        image.resize_exact(self.width, self.height, FilterType::Triangle)
    }
}

impl<F, O> Transform for F
where
    F: Fn(DynamicImage) -> O,
{
    type Output = O;

    fn apply(&self, image: DynamicImage) -> O {
        self(image)
    }
}
