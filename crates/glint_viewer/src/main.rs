use anyhow::{bail, Context, Result};
use glint_core::{load_scene, ImageTextures, Scene, ViewerConfig};
use glint_math::Camera;
use glint_tracer::{CpuTracer, ThreadPool, TracerError, TracerParameters};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const USAGE: &str = "usage: glint_viewer <scene.json> [config.json] [--watch]";

/// Command line arguments
struct Args {
    scene_path: PathBuf,
    config_path: Option<PathBuf>,
    watch: bool,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut positional = Vec::new();
        let mut watch = false;
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--watch" | "-w" => watch = true,
                "--help" | "-h" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                flag if flag.starts_with('-') => bail!("unknown flag {flag}\n{USAGE}"),
                _ => positional.push(PathBuf::from(arg)),
            }
        }

        let mut positional = positional.into_iter();
        let Some(scene_path) = positional.next() else {
            bail!("missing scene path\n{USAGE}");
        };
        let config_path = positional.next();
        if positional.next().is_some() {
            bail!("too many arguments\n{USAGE}");
        }

        Ok(Self {
            scene_path,
            config_path,
            watch,
        })
    }
}

/// Application state
struct App {
    config: ViewerConfig,
    tracer: CpuTracer<ThreadPool, ImageTextures>,
    scene: Scene,
    camera: Camera,
    scene_path: PathBuf,
    /// Modification time of the scene file when it was last loaded
    scene_mtime: Option<SystemTime>,
    /// Scene changed since the last trace was submitted
    dirty: bool,
    images_written: usize,
}

impl App {
    fn new(args: &Args, config: ViewerConfig) -> Result<Self> {
        let scene = load_scene(&args.scene_path)
            .with_context(|| format!("loading scene {}", args.scene_path.display()))?;
        let tracer = CpuTracer::with_thread_pool(
            TracerParameters::from_config(&config),
            config.worker_threads,
            ImageTextures::new(),
        )?;

        Ok(Self {
            camera: config.camera.to_camera(),
            config,
            tracer,
            scene,
            scene_mtime: modified(&args.scene_path),
            scene_path: args.scene_path.clone(),
            dirty: true,
            images_written: 0,
        })
    }

    /// One iteration of the frame loop. Returns true when a new image was written.
    fn frame(&mut self) -> Result<bool> {
        if self.dirty {
            match self.tracer.try_draw_scene(&self.scene, &self.camera) {
                Ok(()) => self.dirty = false,
                // Still tracing the previous version, try again next frame
                Err(TracerError::Busy(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        if !self.tracer.tick()? {
            return Ok(false);
        }

        if let Some(handle) = self.tracer.texture() {
            self.tracer.textures().save(handle, &self.config.output)?;
        }
        self.images_written += 1;
        log::info!(
            "Image {} written in {:.3}s, tracer {}",
            self.images_written,
            self.tracer.last_trace_duration(),
            self.tracer.status()
        );
        Ok(true)
    }

    /// Reload the scene if its file changed on disk.
    fn poll_scene_file(&mut self) {
        let mtime = modified(&self.scene_path);
        if mtime == self.scene_mtime {
            return;
        }
        self.scene_mtime = mtime;

        match load_scene(&self.scene_path) {
            Ok(scene) => {
                log::info!("Scene file changed, re-tracing");
                self.scene = scene;
                self.dirty = true;
            }
            Err(err) => log::warn!("Keeping previous scene, reload failed: {err}"),
        }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting Glint Viewer");

    let args = Args::parse()?;
    let config = match &args.config_path {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    log::info!(
        "{}x{} image, {} strips, output {}",
        config.width,
        config.height,
        config.job_count,
        config.output.display()
    );

    let frame_interval = Duration::from_millis(config.frame_interval_ms.max(1));
    let mut app = App::new(&args, config)?;

    loop {
        let wrote_image = app.frame()?;
        if wrote_image && !args.watch {
            break;
        }
        if args.watch {
            app.poll_scene_file();
        }
        std::thread::sleep(frame_interval);
    }

    Ok(())
}
