//! Pipeline state model and change tracking.
//!
//! - [`DrawState`] is a plain value; callers replace or edit it wholesale.
//! - [`StateTracker`] owns the requested and the last-applied state and pushes
//!   only the aspects that differ to the backend.

mod aspect;
mod draw_state;
mod tracker;

pub use aspect::{AspectSet, StateAspect};
pub use draw_state::{
    BlendMode, CullMode, DepthTestMode, DrawState, PolygonFillMode, StencilOp, StencilState,
};
pub use tracker::StateTracker;
