pub mod config;
pub mod error;
pub mod gfx;
pub mod shader;
pub mod util;

#[cfg(windows)]
pub mod d3d11;
#[cfg(windows)]
pub mod os;
