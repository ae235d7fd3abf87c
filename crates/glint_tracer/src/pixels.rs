//! Shared output buffer written concurrently by strip tasks.

use std::sync::atomic::{AtomicU32, Ordering};

/// Row-major RGBA8 pixels, one packed `u32` per pixel, top row first.
///
/// Every task writes a disjoint set of rows, so relaxed stores are enough;
/// readers synchronise through the trace state's release/acquire status
/// transition before calling [`PixelBuffer::snapshot`].
#[derive(Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Box<[AtomicU32]>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        let pixels = (0..len).map(|_| AtomicU32::new(0)).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Store a packed pixel. Out-of-range coordinates are ignored.
    #[inline]
    pub fn store(&self, x: u32, y: u32, pixel: u32) {
        if x < self.width && y < self.height {
            self.pixels[self.index(x, y)].store(pixel, Ordering::Relaxed);
        }
    }

    pub fn load(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)].load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Copy the whole buffer out.
    pub fn snapshot(&self) -> Vec<u32> {
        self.pixels
            .iter()
            .map(|pixel| pixel.load(Ordering::Relaxed))
            .collect()
    }
}
