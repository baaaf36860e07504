//! Headless warpfield demo: renders the starfield into an indexed buffer at
//! the configured frame rate and optionally captures frames as PNG.

use std::process::ExitCode;

use tracing::{error, info, warn};
use warpfield_app::capture::{capture_frame, frame_path};
use warpfield_app::frame_pacer::FramePacer;
use warpfield_app::platform::{PlatformDirs, PlatformError};
use warpfield_app::ticker::{Ticker, TickerError};
use warpfield_config::{Config, ConfigError};
use warpfield_starfield::{IndexedBuffer, Session, StarfieldError};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Starfield(#[from] StarfieldError),
    #[error(transparent)]
    Ticker(#[from] TickerError),
}

fn main() -> ExitCode {
    let dirs = match PlatformDirs::resolve_and_create() {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to initialize platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Logging is configured from the file, so a broken file is reported on
    // stderr and the defaults are used.
    let config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Falling back to default config: {e}");
        Config::default()
    });
    warpfield_log::init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!("config: {}", dirs.config_dir.display());
    info!("captures: {}", dirs.capture_dir().display());

    match run(&config, &dirs) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, dirs: &PlatformDirs) -> Result<(), AppError> {
    config.validate()?;

    let palette = config.palette.build()?;
    let display = &config.display;
    let mut session = Session::new(
        &config.starfield,
        &config.palette,
        display.width,
        display.height,
    )?;
    let mut buffer = IndexedBuffer::new(display.width, display.height);

    let tick_handle = session.tick_handle();
    let mut ticker = Ticker::start(display.tick_hz, move || tick_handle.tick())?;
    let mut pacer = FramePacer::new(display.target_fps);

    let capture = &config.capture;
    let capture_every = u64::from(capture.every_n_frames.max(1));
    let mut capturing = capture.enabled;
    let capture_dir = dirs.capture_dir();

    info!(
        "rendering {} frames at {} fps, ticks at {} Hz",
        if capture.frames == 0 {
            "unbounded".to_string()
        } else {
            capture.frames.to_string()
        },
        config.display.target_fps,
        config.display.tick_hz
    );

    let mut frame: u64 = 0;
    while capture.frames == 0 || frame < capture.frames {
        buffer.clear(0);
        session.advance_frame(&mut buffer)?;

        if capturing && frame % capture_every == 0 {
            let path = frame_path(&capture_dir, frame);
            if let Err(e) = capture_frame(&buffer, &palette, &path) {
                warn!("frame capture failed, disabling capture: {e}");
                capturing = false;
            }
        }

        frame += 1;
        pacer.wait();
    }

    ticker.stop();
    info!(
        "done: {} frames, generator {}, {} pacing resyncs",
        pacer.frame_count(),
        session.active_generator().name(),
        pacer.resync_count()
    );
    Ok(())
}
