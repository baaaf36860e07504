//! Perspective starfield: stars stream out of a vanishing point, shaded by
//! depth, and are reseeded by placement algorithms that rotate on a fixed
//! tick period.
//!
//! A [`Session`] owns the stars and the rotation scheduler. Drive it with
//! [`Session::on_tick`] (or a [`TickHandle`] from another thread) at the tick
//! rate, and with [`Session::advance_frame`] once per rendered frame. Build
//! the colour table separately with [`build_palette`] or [`PaletteSpec::build`].

mod error;
pub mod generators;
pub mod palette;
pub mod render;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod star;

pub use error::{ConfigurationError, PaletteError, StarfieldError};
pub use generators::{GeneratorKind, Phase, Registry};
pub use palette::{
    PALETTE_SIZE, Palette, PaletteSpec, ReservedColor, Rgb, SwatchLayout, build_palette,
};
pub use render::{IndexedBuffer, PixelTarget, draw_star, draw_stars};
pub use rng::StarRng;
pub use scheduler::{Scheduler, TickHandle};
pub use session::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Session, SessionParams, init_session};
pub use star::{Projection, Star, StarField, Viewport};
