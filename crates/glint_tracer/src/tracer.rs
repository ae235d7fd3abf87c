//! The asynchronous CPU tracer.
//!
//! A trace is started with [`CpuTracer::try_draw_scene`], which snapshots the
//! scene and camera and submits one job per row strip to the worker pool. The
//! driver then polls [`CpuTracer::tick`] every frame; once the last strip has
//! finished, `tick` uploads the image to the texture target and the tracer is
//! ready for the next request.

use std::sync::Arc;
use std::time::Instant;

use glint_core::{
    Scene, ShadingConfig, TextureError, TextureHandle, TextureSource, TextureTarget, ViewerConfig,
};
use glint_math::Camera;
use rayon::ThreadPool;
use thiserror::Error;

use crate::pixels::PixelBuffer;
use crate::pool::{build_thread_pool, WorkerPool};
use crate::projection::Projection;
use crate::state::{RenderStatus, TraceState};
use crate::strip::{generate_strips, StripTask};

#[derive(Error, Debug)]
pub enum TracerError {
    #[error("Tracer is busy: {0}")]
    Busy(RenderStatus),

    #[error("Invalid image size: {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    #[error("Invalid job count {job_count} for an image {height} rows high")]
    InvalidJobCount { job_count: u32, height: u32 },

    #[error("Thread pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),
}

pub type TracerResult<T> = Result<T, TracerError>;

/// Fixed settings of a tracer instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracerParameters {
    pub width: u32,
    pub height: u32,
    /// Number of row strips submitted per trace
    pub job_count: u32,
    pub shading: ShadingConfig,
}

impl TracerParameters {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            job_count: config.job_count,
            shading: config.shading,
        }
    }

    fn validate(&self) -> TracerResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TracerError::InvalidImageSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.job_count == 0 || self.job_count > self.height {
            return Err(TracerError::InvalidJobCount {
                job_count: self.job_count,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Immutable inputs of one trace, shared by all of its strip jobs.
#[derive(Debug, Clone)]
pub struct TraceRequest {
    pub scene: Arc<Scene>,
    pub projection: Projection,
    pub shading: ShadingConfig,
}

impl TraceRequest {
    pub fn new(scene: &Scene, camera: &Camera, parameters: &TracerParameters) -> Self {
        Self {
            scene: Arc::new(scene.clone()),
            projection: Projection::from_camera(camera, parameters.width, parameters.height),
            shading: parameters.shading,
        }
    }
}

/// Tile-parallel ray tracer driven by a non-blocking begin/poll protocol.
pub struct CpuTracer<P: WorkerPool, T: TextureTarget> {
    parameters: TracerParameters,
    pool: P,
    textures: T,
    texture: Option<TextureHandle>,
    pixels: Arc<PixelBuffer>,
    state: Arc<TraceState>,
}

impl<T: TextureTarget> CpuTracer<ThreadPool, T> {
    /// Create a tracer backed by its own rayon pool.
    pub fn with_thread_pool(
        parameters: TracerParameters,
        threads: Option<usize>,
        textures: T,
    ) -> TracerResult<Self> {
        parameters.validate()?;
        let pool = build_thread_pool(threads)?;
        Self::new(parameters, pool, textures)
    }
}

impl<P: WorkerPool, T: TextureTarget> CpuTracer<P, T> {
    pub fn new(parameters: TracerParameters, pool: P, textures: T) -> TracerResult<Self> {
        parameters.validate()?;
        Ok(Self {
            pixels: Arc::new(PixelBuffer::new(parameters.width, parameters.height)),
            state: Arc::new(TraceState::new()),
            parameters,
            pool,
            textures,
            texture: None,
        })
    }

    /// Start tracing `scene` from `camera` if the tracer is Ready.
    ///
    /// Returns `Busy` without touching any state otherwise. The scene and
    /// camera are copied, so the caller may change them straight away.
    pub fn try_draw_scene(&self, scene: &Scene, camera: &Camera) -> TracerResult<()> {
        if let Err(status) = self.state.try_begin() {
            log::warn!("Ignoring trace request, tracer is {status}");
            return Err(TracerError::Busy(status));
        }

        let request = TraceRequest::new(scene, camera, &self.parameters);
        let strips = generate_strips(self.parameters.height, self.parameters.job_count);
        self.state.arm(strips.len());

        log::info!(
            "Tracing {}x{} image in {} strips ({} primitives, {} lights)",
            self.parameters.width,
            self.parameters.height,
            strips.len(),
            scene.primitives.len(),
            scene.lights.len()
        );

        let started = Instant::now();
        for strip in strips {
            let task = StripTask {
                strip,
                scene: Arc::clone(&request.scene),
                projection: request.projection,
                shading: request.shading,
                pixels: Arc::clone(&self.pixels),
                state: Arc::clone(&self.state),
                started,
            };
            self.pool.submit(Box::new(move || task.run()));
        }
        Ok(())
    }

    /// Publish a finished trace to the texture target.
    ///
    /// Returns `Ok(true)` when a new image was consumed, `Ok(false)` when no
    /// trace had completed. The pixel buffer is only read after a completed
    /// trace has been consumed.
    pub fn tick(&mut self) -> TracerResult<bool> {
        if !self.state.try_consume() {
            return Ok(false);
        }

        let source = TextureSource::new(
            self.parameters.width,
            self.parameters.height,
            self.pixels.snapshot(),
        );
        let uploaded = match self.texture {
            Some(handle) => self.textures.update(handle, source),
            None => self
                .textures
                .create(source)
                .map(|handle| self.texture = Some(handle)),
        };
        if let Err(err) = uploaded {
            log::error!("Failed to upload traced image: {err}");
            return Err(err.into());
        }

        log::info!(
            "Trace complete in {:.3}s",
            self.state.last_trace_duration()
        );
        Ok(true)
    }

    /// Stop accepting trace requests. Only possible while Ready.
    pub fn pause(&self) -> bool {
        self.state.pause()
    }

    pub fn resume(&self) -> bool {
        self.state.resume()
    }

    pub fn status(&self) -> RenderStatus {
        self.state.status()
    }

    pub fn jobs_in_flight(&self) -> isize {
        self.state.jobs_in_flight()
    }

    /// Seconds taken by the most recent completed trace.
    pub fn last_trace_duration(&self) -> f64 {
        self.state.last_trace_duration()
    }

    /// Handle of the output texture, once the first trace has been consumed.
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    pub fn textures(&self) -> &T {
        &self.textures
    }

    pub fn parameters(&self) -> &TracerParameters {
        &self.parameters
    }

    /// Copy of the current pixel buffer, for inspection.
    pub fn pixels(&self) -> Vec<u32> {
        self.pixels.snapshot()
    }
}

impl<P: WorkerPool, T: TextureTarget> Drop for CpuTracer<P, T> {
    fn drop(&mut self) {
        // Jobs hold their own Arcs, but the texture target should outlive them
        self.state.wait_while_in_progress();
    }
}
