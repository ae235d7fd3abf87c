//! Output texture contract.
//!
//! Completed traces are handed to a [`TextureTarget`] as an RGBA8 snapshot.
//! The tracer creates the texture on the first completed image and updates
//! it in place afterwards. [`ImageTextures`] is an in-memory implementation
//! backed by the `image` crate that can write textures out as PNG.

use std::path::Path;

use image::RgbaImage;
use thiserror::Error;

/// Errors that can occur while creating or updating textures.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Invalid texture dimensions: {width}x{height} with {pixels} pixels")]
    InvalidDimensions { width: u32, height: u32, pixels: usize },

    #[error("Unknown texture handle: {0:?}")]
    UnknownHandle(TextureHandle),

    #[error("Texture size mismatch: texture is {expected:?}, update is {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Opaque handle to a texture owned by a [`TextureTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(usize);

/// A snapshot of packed RGBA8 pixels, row-major with the origin at the top left.
///
/// Each `u32` holds one pixel whose in-memory byte order is R, G, B, A.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSource {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl TextureSource {
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// View the pixels as raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Get the RGBA bytes of the pixel at (x, y).
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[(y * self.width + x) as usize].to_ne_bytes()
    }

    fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == self.width as usize * self.height as usize
    }

    fn into_image(self) -> TextureResult<RgbaImage> {
        let (width, height, pixels) = (self.width, self.height, self.pixels.len());
        if !self.is_valid() {
            return Err(TextureError::InvalidDimensions {
                width,
                height,
                pixels,
            });
        }
        let bytes: Vec<u8> = bytemuck::cast_slice(&self.pixels).to_vec();
        RgbaImage::from_raw(width, height, bytes).ok_or(TextureError::InvalidDimensions {
            width,
            height,
            pixels,
        })
    }
}

/// Consumer of completed images.
pub trait TextureTarget {
    /// Create a texture from the first image.
    fn create(&mut self, source: TextureSource) -> TextureResult<TextureHandle>;

    /// Replace the contents of an existing texture.
    fn update(&mut self, handle: TextureHandle, source: TextureSource) -> TextureResult<()>;
}

/// In-memory textures stored as `image::RgbaImage`.
#[derive(Debug, Default)]
pub struct ImageTextures {
    images: Vec<RgbaImage>,
}

impl ImageTextures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the image behind a handle.
    pub fn get(&self, handle: TextureHandle) -> Option<&RgbaImage> {
        self.images.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Write a texture to disk. The format is picked from the extension.
    pub fn save(&self, handle: TextureHandle, path: impl AsRef<Path>) -> TextureResult<()> {
        let image = self.get(handle).ok_or(TextureError::UnknownHandle(handle))?;
        image.save(path.as_ref())?;
        log::info!("Saved {}x{} image to {}", image.width(), image.height(), path.as_ref().display());
        Ok(())
    }
}

impl TextureTarget for ImageTextures {
    fn create(&mut self, source: TextureSource) -> TextureResult<TextureHandle> {
        let image = source.into_image()?;
        self.images.push(image);
        Ok(TextureHandle(self.images.len() - 1))
    }

    fn update(&mut self, handle: TextureHandle, source: TextureSource) -> TextureResult<()> {
        let existing = self
            .images
            .get_mut(handle.0)
            .ok_or(TextureError::UnknownHandle(handle))?;
        if existing.dimensions() != (source.width, source.height) {
            return Err(TextureError::SizeMismatch {
                expected: existing.dimensions(),
                actual: (source.width, source.height),
            });
        }
        *existing = source.into_image()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> TextureSource {
        let pixel = u32::from_ne_bytes(rgba);
        TextureSource::new(width, height, vec![pixel; (width * height) as usize])
    }

    #[test]
    fn test_bytes_are_rgba_order() {
        let source = solid(1, 1, [1, 2, 3, 255]);
        assert_eq!(source.as_bytes(), &[1, 2, 3, 255]);
        assert_eq!(source.rgba(0, 0), [1, 2, 3, 255]);
    }

    #[test]
    fn test_create_and_update() {
        let mut textures = ImageTextures::new();
        let handle = textures.create(solid(2, 2, [10, 20, 30, 255])).unwrap();
        assert_eq!(textures.get(handle).unwrap().get_pixel(1, 1).0, [10, 20, 30, 255]);

        textures.update(handle, solid(2, 2, [40, 50, 60, 255])).unwrap();
        assert_eq!(textures.get(handle).unwrap().get_pixel(0, 1).0, [40, 50, 60, 255]);
        assert_eq!(textures.len(), 1);
    }

    #[test]
    fn test_create_rejects_bad_dimensions() {
        let mut textures = ImageTextures::new();
        let result = textures.create(TextureSource::new(4, 4, vec![0; 3]));
        assert!(matches!(result, Err(TextureError::InvalidDimensions { .. })));

        let result = textures.create(TextureSource::new(0, 0, Vec::new()));
        assert!(matches!(result, Err(TextureError::InvalidDimensions { .. })));
        assert!(textures.is_empty());
    }

    #[test]
    fn test_failed_update_keeps_previous_image() {
        let mut textures = ImageTextures::new();
        let handle = textures.create(solid(2, 2, [1, 1, 1, 255])).unwrap();

        let result = textures.update(handle, solid(3, 3, [9, 9, 9, 255]));
        assert!(matches!(result, Err(TextureError::SizeMismatch { .. })));
        assert_eq!(textures.get(handle).unwrap().get_pixel(0, 0).0, [1, 1, 1, 255]);
    }

    #[test]
    fn test_save_png() {
        let mut textures = ImageTextures::new();
        let handle = textures.create(solid(4, 2, [255, 0, 0, 255])).unwrap();

        let path = std::env::temp_dir().join(format!("glint_texture_{}.png", std::process::id()));
        textures.save(handle, &path).unwrap();
        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (4, 2));
        assert_eq!(reloaded.get_pixel(3, 1).0, [255, 0, 0, 255]);

        std::fs::remove_file(&path).ok();
    }
}
