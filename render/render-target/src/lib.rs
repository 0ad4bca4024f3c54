//! The in-memory framebuffer the plane renderer draws in to, and a way to
//! get frames out of it on to disk.

mod buffers;

pub use buffers::*;
