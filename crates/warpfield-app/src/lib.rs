//! Host glue for the warpfield starfield: a periodic tick source, frame
//! pacing, platform directories, and PNG capture of rendered frames.

pub mod capture;
pub mod frame_pacer;
pub mod platform;
pub mod ticker;
