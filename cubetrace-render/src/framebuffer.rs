//! The image a frame is rendered into.

use core::sync::atomic::{AtomicU32, Ordering};

use cubetrace::math::{ImageSize, Rgb, area_usize};
use imgref::ImgVec;

use crate::RenderError;

/// RGBA pixels written by the render workers.
///
/// Rows are stored bottom to top, matching the camera's pixel coordinates; use
/// [`Framebuffer::to_rgba_top_down()`] or the conversion to [`ImgVec`] to get the
/// usual image order.
///
/// Each pixel is written by exactly one worker per frame, so stores need no ordering
/// beyond what joining the workers provides.
pub struct Framebuffer {
    size: ImageSize,
    pixels: Box<[AtomicU32]>,
}

impl Framebuffer {
    /// Allocates a framebuffer of transparent black pixels.
    pub fn new(size: ImageSize) -> Result<Self, RenderError> {
        let count = area_usize(size).ok_or(RenderError::OutOfMemory { size })?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| RenderError::OutOfMemory { size })?;
        pixels.extend((0..count).map(|_| AtomicU32::new(0)));
        Ok(Self {
            size,
            pixels: pixels.into_boxed_slice(),
        })
    }

    /// Size in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Returns whether the framebuffer has no pixels. Never true for a framebuffer made
    /// by a [`Renderer`](crate::Renderer).
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Converts `color` to 8-bit opaque RGBA and stores it at `index`, counting from the
    /// bottom-left pixel.
    pub(crate) fn store(&self, index: usize, color: Rgb) {
        if let Some(pixel) = self.pixels.get(index) {
            pixel.store(
                u32::from_le_bytes(color.with_alpha_one().to_u8()),
                Ordering::Relaxed,
            );
        }
    }

    /// Returns the pixel at `x, y`, where `y` counts from the bottom row.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let index = y as usize * self.size.width as usize + x as usize;
        self.pixels
            .get(index)
            .map(|pixel| pixel.load(Ordering::Relaxed).to_le_bytes())
    }

    /// Returns the pixels with rows from top to bottom, 4 bytes per pixel.
    pub fn to_rgba_top_down(&self) -> Vec<u8> {
        let width = self.size.width as usize;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        if width == 0 {
            return bytes;
        }
        for row in self.pixels.chunks_exact(width).rev() {
            for pixel in row {
                bytes.extend_from_slice(&pixel.load(Ordering::Relaxed).to_le_bytes());
            }
        }
        bytes
    }
}

impl From<&Framebuffer> for ImgVec<[u8; 4]> {
    fn from(framebuffer: &Framebuffer) -> Self {
        let width = framebuffer.size.width as usize;
        let mut pixels = Vec::with_capacity(framebuffer.pixels.len());
        if width > 0 {
            for row in framebuffer.pixels.chunks_exact(width).rev() {
                pixels.extend(row.iter().map(|p| p.load(Ordering::Relaxed).to_le_bytes()));
            }
        }
        ImgVec::new(pixels, width, framebuffer.size.height as usize)
    }
}

impl core::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
