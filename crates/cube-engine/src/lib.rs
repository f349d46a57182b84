//! Cube engine crate.
//!
//! This crate owns the resource scopes, GPU context, scene construction and
//! frame loop used by the `hello-cube` binary.

pub mod device;
pub mod logging;
pub mod render;
pub mod resource;
pub mod scene;
pub mod time;
pub mod window;
