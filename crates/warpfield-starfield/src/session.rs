//! The simulation session: owns the star collection and the scheduler and
//! exposes the per-tick and per-frame entry points.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, StarfieldError};
use crate::generators::{GeneratorKind, Phase, Registry};
use crate::palette::PaletteSpec;
use crate::render::{PixelTarget, draw_stars};
use crate::rng::StarRng;
use crate::scheduler::{Scheduler, TickHandle};
use crate::star::{Motion, Star, StarField, Viewport};

/// Reference buffer size.
pub const DEFAULT_WIDTH: u32 = 320;
pub const DEFAULT_HEIGHT: u32 = 200;

/// Constants a session is created from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionParams {
    /// Must equal `multiplier * max_dist`.
    pub star_count: usize,
    /// Depth at which stars are reseeded.
    pub max_dist: i32,
    /// Number of depth buckets.
    pub multiplier: i32,
    /// Ticks each generator stays active.
    pub phase_period: u32,
    pub speed: i32,
    pub boost: bool,
    pub boost_threshold: i32,
    pub hue_bias: f32,
    pub seed: u64,
    /// Generators in rotation order.
    pub rotation: Vec<GeneratorKind>,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            star_count: 1152,
            max_dist: 144,
            multiplier: 8,
            phase_period: 360,
            speed: 1,
            boost: true,
            boost_threshold: 96,
            hue_bias: 0.1,
            seed: 0x5EED_57A2,
            rotation: GeneratorKind::DEFAULT_ROTATION.to_vec(),
        }
    }
}

/// One running starfield.
#[derive(Debug)]
pub struct Session {
    field: StarField,
    scheduler: Scheduler,
    registry: Registry,
    rng: StarRng,
}

impl Session {
    /// Validates `params`, lays out the stars for a `width` x `height` buffer
    /// shaded with `palette`, and seeds them with the first generator.
    pub fn new(
        params: &SessionParams,
        palette: &PaletteSpec,
        width: u32,
        height: u32,
    ) -> Result<Self, StarfieldError> {
        palette.validate()?;
        if params.phase_period == 0 {
            return Err(ConfigurationError::ZeroPhasePeriod.into());
        }
        let registry = Registry::new(params.rotation.clone())?;
        let viewport = Viewport::new(width, height, palette.luminance_count())?;
        let motion = Motion {
            speed: params.speed,
            boost: params.boost,
            boost_threshold: params.boost_threshold,
            hue_bias: params.hue_bias,
        };
        let mut field = StarField::new(
            params.star_count,
            params.max_dist,
            params.multiplier,
            motion,
            viewport,
            palette.layout(),
        )?;

        let mut scheduler = Scheduler::new(params.phase_period, registry.len());
        let mut rng = StarRng::new(params.seed);
        let first = registry.get(scheduler.select_generator());
        field.seed_all(first, scheduler.phase(), &mut rng);

        log::info!(
            "starfield session: {} stars ({} buckets x {} depths), {}x{}, period {} ticks, first generator {}",
            params.star_count,
            params.multiplier,
            params.max_dist,
            width,
            height,
            params.phase_period,
            first.name()
        );

        Ok(Self {
            field,
            scheduler,
            registry,
            rng,
        })
    }

    /// Advances the scheduler by one tick. Usually driven through a
    /// [`TickHandle`] from the tick source's own thread instead.
    pub fn on_tick(&self) {
        self.scheduler.tick();
    }

    pub fn tick_handle(&self) -> TickHandle {
        self.scheduler.tick_handle()
    }

    /// Selects the generator for this frame and moves every star.
    pub fn update(&mut self) {
        let generator = self.registry.get(self.scheduler.select_generator());
        let phase = self.scheduler.phase();
        self.field.update(generator, phase, &mut self.rng);
    }

    /// Draws the visible stars into `target`, which must be at least as large
    /// as the session's viewport.
    pub fn draw<T: PixelTarget + ?Sized>(&self, target: &mut T) -> Result<(), StarfieldError> {
        self.check_target(target)?;
        draw_stars(
            target,
            self.field.stars(),
            self.field.swatches().luminance_count,
        );
        Ok(())
    }

    /// One render frame: [`update`](Self::update) then [`draw`](Self::draw).
    /// An undersized target is rejected before any star moves.
    pub fn advance_frame<T: PixelTarget + ?Sized>(
        &mut self,
        target: &mut T,
    ) -> Result<(), StarfieldError> {
        self.check_target(target)?;
        self.update();
        self.draw(target)
    }

    fn check_target<T: PixelTarget + ?Sized>(&self, target: &T) -> Result<(), StarfieldError> {
        let viewport = self.field.viewport();
        if target.width() < viewport.width || target.height() < viewport.height {
            return Err(StarfieldError::TargetTooSmall {
                width: target.width(),
                height: target.height(),
                required_width: viewport.width,
                required_height: viewport.height,
            });
        }
        Ok(())
    }

    pub fn stars(&self) -> &[Star] {
        self.field.stars()
    }

    pub fn active_generator(&self) -> GeneratorKind {
        self.registry.get(self.scheduler.active_index())
    }

    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    pub fn viewport(&self) -> &Viewport {
        self.field.viewport()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Creates a session with the reference buffer size, palette and motion
/// settings, overriding only the partitioning constants and phase period.
pub fn init_session(
    star_count: usize,
    max_dist: i32,
    multiplier: i32,
    phase_period: u32,
) -> Result<Session, StarfieldError> {
    let params = SessionParams {
        star_count,
        max_dist,
        multiplier,
        phase_period,
        ..SessionParams::default()
    };
    Session::new(
        &params,
        &PaletteSpec::default(),
        DEFAULT_WIDTH,
        DEFAULT_HEIGHT,
    )
}
