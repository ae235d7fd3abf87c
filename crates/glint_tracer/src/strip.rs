//! Row-strip partitioning and the per-strip tracing task.
//!
//! The image is cut into horizontal strips of contiguous rows; each strip is
//! one job on the worker pool and owns its rows of the pixel buffer.

use std::sync::Arc;
use std::time::Instant;

use glint_core::{Scene, ShadingConfig};

use crate::pixels::PixelBuffer;
use crate::projection::Projection;
use crate::shading::{cast_ray, color_to_rgba, pack_rgba};
use crate::state::TraceState;

/// A contiguous band of image rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strip {
    pub first_row: u32,
    pub row_count: u32,
    /// Position of this strip in submission order
    pub index: usize,
}

impl Strip {
    /// One past the last row.
    pub fn end_row(&self) -> u32 {
        self.first_row + self.row_count
    }
}

/// Split `height` rows into `job_count` strips covering `[0, height)`.
///
/// Leftover rows are handed out one each to the first strips. Strips are
/// never empty, so fewer than `job_count` come back when `height` is smaller.
pub fn generate_strips(height: u32, job_count: u32) -> Vec<Strip> {
    if height == 0 || job_count == 0 {
        return Vec::new();
    }
    let job_count = job_count.min(height);
    let base = height / job_count;
    let remainder = height % job_count;

    let mut strips = Vec::with_capacity(job_count as usize);
    let mut row = 0;
    for index in 0..job_count {
        let row_count = base + u32::from(index < remainder);
        strips.push(Strip {
            first_row: row,
            row_count,
            index: index as usize,
        });
        row += row_count;
    }
    strips
}

/// Everything one strip job needs, owned so it can move onto a worker.
pub struct StripTask {
    pub strip: Strip,
    pub scene: Arc<Scene>,
    pub projection: Projection,
    pub shading: ShadingConfig,
    pub pixels: Arc<PixelBuffer>,
    pub state: Arc<TraceState>,
    /// When the whole trace was submitted
    pub started: Instant,
}

impl StripTask {
    /// Shade every pixel of the strip, then report completion.
    pub fn run(self) {
        let width = self.projection.width();
        for y in self.strip.first_row..self.strip.end_row() {
            for x in 0..width {
                let ray = self.projection.primary_ray(x, y);
                let color = cast_ray(&ray, &self.scene, 0, &self.shading);
                self.pixels.store(x, y, pack_rgba(color_to_rgba(color)));
            }
        }

        log::debug!(
            "Strip {} (rows {}..{}) done",
            self.strip.index,
            self.strip.first_row,
            self.strip.end_row()
        );
        self.state.finish_job(self.started);
    }
}
