//! Tessera engine crate.
//!
//! The render-command layer of the engine: a [`Draw`](draw::Draw) dispatcher
//! that turns draw-state requests and immediate polygons into a minimal,
//! correctly ordered stream of calls on a pluggable [`DrawBackend`](backend::DrawBackend).

pub mod backend;
pub mod batch;
pub mod draw;
pub mod resource;
pub mod state;

pub mod coords;
pub mod logging;
pub mod paint;
