//! Glint Tracer - concurrent CPU ray tracing
//!
//! A Whitted-style ray tracer that splits each image into row strips and
//! traces them on a worker pool, driven by a non-blocking begin/poll
//! protocol so a frame loop never waits on it.
//!
//! ```ignore
//! let mut tracer = CpuTracer::with_thread_pool(parameters, None, ImageTextures::new())?;
//! tracer.try_draw_scene(&scene, &camera)?;
//! while !tracer.tick()? {
//!     // keep the frame loop running
//! }
//! ```

mod aabox;
mod hittable;
mod optics;
mod pixels;
mod plane;
mod pool;
mod projection;
mod shading;
mod sphere;
mod state;
mod strip;
mod tracer;
mod triangle;

pub use aabox::intersect_box;
pub use hittable::{closest_hit, intersect_primitive, occluded, Hit, SurfaceHit};
pub use optics::{fresnel, reflect, refract};
pub use pixels::PixelBuffer;
pub use plane::{intersect_plane, MAX_PLANE_DISTANCE};
pub use pool::{build_thread_pool, InlinePool, Job, WorkerPool};
pub use rayon::ThreadPool;
pub use projection::Projection;
pub use shading::{cast_ray, color_to_rgba, pack_rgba, quantize, unpack_rgba};
pub use sphere::intersect_sphere;
pub use state::{RenderStatus, TraceState};
pub use strip::{generate_strips, Strip, StripTask};
pub use tracer::{CpuTracer, TraceRequest, TracerError, TracerParameters, TracerResult};
pub use triangle::{intersect_mesh, intersect_triangle};
