//! Star motion model: depth stepping, reseeding and perspective projection.
//!
//! Stars are laid out once in `multiplier` buckets of `max_dist` stars, one
//! star per depth per bucket. Every star keeps its bucket for life, and since
//! all stars move at the same speed and reseed at the same far depth, each
//! depth stays equally populated for the whole run. Without this layout the
//! field would expire and reseed in lockstep and visibly pulse.

use glam::{IVec2, Vec2};

use crate::error::ConfigurationError;
use crate::generators::{GeneratorKind, Phase};
use crate::palette::SwatchLayout;
use crate::rng::StarRng;

/// One simulated particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    /// Unprojected position assigned by the generator at the last reseed.
    pub base: Vec2,
    /// Remaining distance to the viewer, in `[1, max_dist]` between frames.
    pub depth: i32,
    /// Fixed partition index in `[0, multiplier)`.
    pub bucket: i32,
    /// Projected pixel position; meaningful only while `visible`.
    pub screen: IVec2,
    /// First palette index of this star's swatch; meaningful only while `visible`.
    pub color_index: u8,
    pub visible: bool,
}

/// Drawable area derived from the buffer size and the glow radius.
///
/// Stars are projected into `[0, limit]` and drawn offset by `glow_radius`,
/// so every glow pixel lands inside the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub limit: IVec2,
    pub center: IVec2,
    pub glow_radius: i32,
}

impl Viewport {
    pub fn new(
        width: u32,
        height: u32,
        luminance_count: u32,
    ) -> Result<Self, ConfigurationError> {
        let radius = luminance_count.max(1);
        let span = (radius * 2 - 1) as i64;
        let x_limit = width as i64 - span;
        let y_limit = height as i64 - span;
        if x_limit < 1 || y_limit < 1 {
            return Err(ConfigurationError::ViewportTooSmall {
                width,
                height,
                radius,
            });
        }
        let limit = IVec2::new(x_limit as i32, y_limit as i32);
        Ok(Self {
            width,
            height,
            limit,
            center: limit / 2,
            glow_radius: radius as i32 - 1,
        })
    }
}

/// Outcome of projecting one star.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    Visible(IVec2),
    OutOfBounds,
    /// `depth == bucket`; the perspective divide is undefined.
    Degenerate,
}

/// Perspective-projects `base` at `depth`, staggered by `bucket`.
pub fn project(base: Vec2, depth: i32, bucket: i32, viewport: &Viewport) -> Projection {
    let divisor = depth - bucket;
    if divisor == 0 {
        return Projection::Degenerate;
    }
    let divisor = divisor as f32;
    let limit = viewport.limit.as_vec2();
    let center = viewport.center.as_vec2();
    // Truncation toward zero, matching integer pixel addressing.
    let x = (base.x * limit.x / divisor + center.x) as i32;
    let y = (base.y * limit.y / divisor + center.y) as i32;

    if x < 0 || x > viewport.limit.x || y < 0 || y > viewport.limit.y {
        Projection::OutOfBounds
    } else {
        Projection::Visible(IVec2::new(x, y))
    }
}

/// Per-frame movement settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Depth units removed per frame.
    pub speed: i32,
    /// Apply a second decrement to stars nearer than `boost_threshold`.
    pub boost: bool,
    pub boost_threshold: i32,
    /// Subtracted from `depth / max_dist` before picking a hue.
    pub hue_bias: f32,
}

/// The fixed-size star collection.
#[derive(Clone, Debug)]
pub struct StarField {
    stars: Vec<Star>,
    max_dist: i32,
    multiplier: i32,
    motion: Motion,
    viewport: Viewport,
    swatches: SwatchLayout,
}

impl StarField {
    /// Lays out `star_count` stars; the count must be exactly
    /// `multiplier * max_dist`.
    pub fn new(
        star_count: usize,
        max_dist: i32,
        multiplier: i32,
        motion: Motion,
        viewport: Viewport,
        swatches: SwatchLayout,
    ) -> Result<Self, ConfigurationError> {
        if max_dist < 1 {
            return Err(ConfigurationError::InvalidMaxDistance(max_dist));
        }
        if multiplier < 1 {
            return Err(ConfigurationError::InvalidMultiplier(multiplier));
        }
        if !(1..=max_dist).contains(&motion.speed) {
            return Err(ConfigurationError::InvalidSpeed {
                speed: motion.speed,
                max_dist,
            });
        }
        let expected = multiplier as i64 * max_dist as i64;
        if star_count as i64 != expected {
            return Err(ConfigurationError::StarCountMismatch {
                star_count,
                multiplier,
                max_dist,
                expected,
            });
        }

        let stars = (0..star_count)
            .map(|index| {
                let index = index as i32;
                Star {
                    base: Vec2::ZERO,
                    depth: index % max_dist + 1,
                    bucket: index / max_dist,
                    screen: IVec2::ZERO,
                    color_index: 0,
                    visible: true,
                }
            })
            .collect();

        Ok(Self {
            stars,
            max_dist,
            multiplier,
            motion,
            viewport,
            swatches,
        })
    }

    /// Places every star with `generator` and computes its first projection.
    /// Depths are left untouched.
    pub fn seed_all(&mut self, generator: GeneratorKind, phase: Phase, rng: &mut StarRng) {
        for star in &mut self.stars {
            star.base = generator.generate(phase, star.bucket, rng);
            star.visible = true;
            resolve(
                star,
                &self.viewport,
                &self.swatches,
                self.motion.hue_bias,
                self.max_dist,
            );
        }
    }

    /// Advances every star by one frame, reseeding expired stars with
    /// `generator`.
    pub fn update(&mut self, generator: GeneratorKind, phase: Phase, rng: &mut StarRng) {
        let motion = self.motion;
        for star in &mut self.stars {
            star.depth = star.depth.saturating_sub(motion.speed);
            if motion.boost && star.depth < motion.boost_threshold {
                star.depth = star.depth.saturating_sub(motion.speed);
            }

            if star.depth < 1 {
                star.base = generator.generate(phase, star.bucket, rng);
                star.depth = self.max_dist;
                star.visible = true;
            }

            resolve(
                star,
                &self.viewport,
                &self.swatches,
                motion.hue_bias,
                self.max_dist,
            );
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    #[cfg(test)]
    pub(crate) fn stars_mut(&mut self) -> &mut [Star] {
        &mut self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn max_dist(&self) -> i32 {
        self.max_dist
    }

    pub fn multiplier(&self) -> i32 {
        self.multiplier
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn swatches(&self) -> &SwatchLayout {
        &self.swatches
    }
}

/// Projects `star` and picks its colour. Hidden stars are re-evaluated every
/// frame, so a star skipped for one frame can reappear on the next.
fn resolve(
    star: &mut Star,
    viewport: &Viewport,
    swatches: &SwatchLayout,
    hue_bias: f32,
    max_dist: i32,
) {
    match project(star.base, star.depth, star.bucket, viewport) {
        Projection::Visible(screen) => {
            star.visible = true;
            star.screen = screen;
            star.color_index = depth_color(star.depth, max_dist, hue_bias, swatches);
        }
        Projection::OutOfBounds => star.visible = false,
        Projection::Degenerate => {
            log::trace!(
                "degenerate projection at depth {} bucket {}, hiding star",
                star.depth,
                star.bucket
            );
            star.visible = false;
        }
    }
}

/// Palette index for a star at `depth`: far stars take the last hue, near
/// stars the first.
pub fn depth_color(depth: i32, max_dist: i32, hue_bias: f32, swatches: &SwatchLayout) -> u8 {
    let hue = (depth as f32 / max_dist as f32 - hue_bias).clamp(0.0, 1.0);
    let steps = swatches.shades.saturating_sub(1) as f32;
    swatches.hue_to_color_index((hue * steps).ceil() as u32)
}
