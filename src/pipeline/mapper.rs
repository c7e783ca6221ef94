//! Display-space to image-space coordinate mapping.
//!
//! The rendered surface can be resized independently of the fixed sensor
//! resolution, so each axis gets its own scale factor.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    /// Source image size in pixels
    pub image_width: u32,
    pub image_height: u32,
    /// Rendered surface size in display units
    pub display_width: f64,
    pub display_height: f64,
}

impl DisplayGeometry {
    pub const fn new(
        image_width: u32,
        image_height: u32,
        display_width: f64,
        display_height: f64,
    ) -> Self {
        Self {
            image_width,
            image_height,
            display_width,
            display_height,
        }
    }

    /// Surface drawn at the image's native size
    pub fn identity(width: u32, height: u32) -> Self {
        Self::new(width, height, f64::from(width), f64::from(height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
}

impl PixelCoord {
    /// Row-major index into a buffer `width` pixels wide
    pub fn index(self, width: u32) -> usize {
        self.y as usize * width as usize + self.x as usize
    }
}

/// Map a pointer position on the display to the source pixel under it.
///
/// `None` for an empty or non-finite display extent and for positions that
/// land outside the image.
pub fn map_to_pixel(px: f64, py: f64, geom: &DisplayGeometry) -> Option<PixelCoord> {
    let x = scale_axis(px, geom.image_width, geom.display_width)?;
    let y = scale_axis(py, geom.image_height, geom.display_height)?;
    Some(PixelCoord { x, y })
}

fn scale_axis(position: f64, image_extent: u32, display_extent: f64) -> Option<u32> {
    if !display_extent.is_finite() || display_extent <= 0.0 {
        return None;
    }
    let scaled = (position * f64::from(image_extent) / display_extent).floor();
    if !scaled.is_finite() || scaled < 0.0 || scaled >= f64::from(image_extent) {
        return None;
    }
    Some(scaled as u32)
}
