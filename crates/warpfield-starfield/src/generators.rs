//! Star placement algorithms and the ordered registry they rotate through.
//!
//! Every generator maps the current [`Phase`] and a star's bucket to a base
//! coordinate in unprojected world space. All generators except
//! [`GeneratorKind::Random`] are pure functions of their inputs; the random
//! scatter draws from the session's [`StarRng`].

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::rng::StarRng;

/// Side length of the square the random scatter draws from.
pub const RANDOM_RADIUS: f32 = 64.0;
/// Full revolutions a circle generator completes over one phase period.
pub const CIRCLE_LOOPS: f32 = 8.0;
pub const CIRCLE_X_RADIUS: f32 = 24.0;
pub const CIRCLE_Y_RADIUS: f32 = 40.0;
/// Angular stagger between buckets on the plain circle.
const CIRCLE_BUCKET_OFFSET: f32 = 0.11;
/// Interlocking circles scale their speed by `0.25 * position`; position 4
/// would cancel the phase term entirely.
const INTERLOCK_STEP: f32 = 0.25;
const INTERLOCK_DEGENERATE_POSITION: i32 = 4;
const INTERLOCK_SUBSTITUTE_POSITION: i32 = 9;
pub const NET_RADIUS: f32 = 40.0;
const NET_BUCKET_OFFSET: f32 = 0.14;
pub const ZIGZAG_RADIUS: f32 = 100.0;
/// Zigzag legs per phase period (six legs, three full teeth).
const ZIGZAG_LEGS: u32 = 6;

/// Position within the active generator's phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Phase {
    /// Ticks elapsed since the generator became active.
    pub counter: u32,
    /// Ticks a generator stays active.
    pub period: u32,
}

impl Phase {
    pub fn new(counter: u32, period: u32) -> Self {
        Self { counter, period }
    }

    /// `counter / period`. May briefly exceed 1.0 before the scheduler rotates.
    pub fn fraction(&self) -> f32 {
        self.counter as f32 / self.period.max(1) as f32
    }
}

/// The closed set of placement algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorKind {
    /// Uniform scatter over a square centred on the vanishing point.
    Random,
    /// Points along an ellipse, staggered per bucket.
    Circle,
    /// Crossing lattice of a bucket-offset cosine and a shared sine.
    Net,
    /// Circles whose angular speed depends on the bucket.
    InterlockingCircles,
    /// Linear sweep in X against a triangle wave in Y.
    Zigzag,
}

impl GeneratorKind {
    /// The reference rotation order.
    pub const DEFAULT_ROTATION: [GeneratorKind; 4] = [
        GeneratorKind::Random,
        GeneratorKind::Circle,
        GeneratorKind::Net,
        GeneratorKind::InterlockingCircles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Circle => "circle",
            Self::Net => "net",
            Self::InterlockingCircles => "interlocking-circles",
            Self::Zigzag => "zigzag",
        }
    }

    /// Computes a base coordinate for a star in `bucket`.
    pub fn generate(self, phase: Phase, bucket: i32, rng: &mut StarRng) -> Vec2 {
        match self {
            Self::Random => random_scatter(rng),
            Self::Circle => circle(phase.fraction(), bucket),
            Self::Net => net(phase.fraction(), bucket),
            Self::InterlockingCircles => interlocking_circles(phase.fraction(), bucket),
            Self::Zigzag => zigzag(phase),
        }
    }
}

fn random_scatter(rng: &mut StarRng) -> Vec2 {
    let half = RANDOM_RADIUS / 2.0;
    let x = rng.unit() * RANDOM_RADIUS - half;
    let y = rng.unit() * RANDOM_RADIUS - half;
    Vec2::new(x, y)
}

fn ellipse(angle: f32) -> Vec2 {
    Vec2::new(CIRCLE_X_RADIUS * angle.cos(), CIRCLE_Y_RADIUS * angle.sin())
}

fn circle(fraction: f32, bucket: i32) -> Vec2 {
    let angle = (fraction - CIRCLE_BUCKET_OFFSET * bucket as f32) * CIRCLE_LOOPS * PI;
    ellipse(angle)
}

fn interlocking_circles(fraction: f32, bucket: i32) -> Vec2 {
    let mut position = bucket + 1;
    if position == INTERLOCK_DEGENERATE_POSITION {
        position = INTERLOCK_SUBSTITUTE_POSITION;
    }
    let angle = (fraction - INTERLOCK_STEP * fraction * position as f32) * CIRCLE_LOOPS * PI;
    ellipse(angle)
}

fn net(fraction: f32, bucket: i32) -> Vec2 {
    let position = (bucket + 1) as f32;
    let angle = (fraction * 2.0 - NET_BUCKET_OFFSET * position) * 2.0 * PI;
    Vec2::new(
        NET_RADIUS * angle.cos(),
        NET_RADIUS * (fraction * 2.0 * PI).sin(),
    )
}

fn zigzag(phase: Phase) -> Vec2 {
    let leg = (phase.period / ZIGZAG_LEGS).max(1);
    let along = phase.counter % leg;
    let tooth = phase.counter % (leg * 2);
    let rise = if tooth >= leg {
        (leg - along) as f32 / leg as f32
    } else {
        along as f32 / leg as f32
    };
    let half = ZIGZAG_RADIUS / 2.0;
    Vec2::new(
        ZIGZAG_RADIUS * phase.fraction() - half,
        ZIGZAG_RADIUS * rise - half,
    )
}

/// Ordered, non-empty list of generators. Order is rotation order.
#[derive(Clone, Debug, PartialEq)]
pub struct Registry {
    kinds: Vec<GeneratorKind>,
}

impl Registry {
    pub fn new(kinds: Vec<GeneratorKind>) -> Result<Self, ConfigurationError> {
        if kinds.is_empty() {
            return Err(ConfigurationError::EmptyRotation);
        }
        Ok(Self { kinds })
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Generator at `index`, wrapping modulo the registry size.
    pub fn get(&self, index: usize) -> GeneratorKind {
        self.kinds[index % self.kinds.len()]
    }

    pub fn kinds(&self) -> &[GeneratorKind] {
        &self.kinds
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            kinds: GeneratorKind::DEFAULT_ROTATION.to_vec(),
        }
    }
}
