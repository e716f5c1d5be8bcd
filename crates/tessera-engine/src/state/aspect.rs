use super::DrawState;

/// Independently applied slice of [`DrawState`].
///
/// Declaration order is the application order: the program binding first,
/// then geometry, rasterizer and finally depth/stencil.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StateAspect {
    Shader,
    PolygonFillMode,
    BlendMode,
    CullMode,
    DepthTest,
    DepthWrite,
    Stencil,
}

impl StateAspect {
    pub const ALL: [StateAspect; 7] = [
        StateAspect::Shader,
        StateAspect::PolygonFillMode,
        StateAspect::BlendMode,
        StateAspect::CullMode,
        StateAspect::DepthTest,
        StateAspect::DepthWrite,
        StateAspect::Stencil,
    ];

    /// Returns true if `a` and `b` disagree on this aspect.
    pub fn differs(self, a: &DrawState, b: &DrawState) -> bool {
        match self {
            StateAspect::Shader => a.shader != b.shader,
            StateAspect::PolygonFillMode => a.polygon_fill_mode != b.polygon_fill_mode,
            StateAspect::BlendMode => a.blend_mode != b.blend_mode,
            StateAspect::CullMode => a.cull_mode != b.cull_mode,
            StateAspect::DepthTest => a.depth_test != b.depth_test,
            StateAspect::DepthWrite => a.depth_write != b.depth_write,
            StateAspect::Stencil => a.stencil != b.stencil,
        }
    }

    /// Copies this aspect's fields from `src` into `dst`.
    pub fn copy(self, src: &DrawState, dst: &mut DrawState) {
        match self {
            StateAspect::Shader => dst.shader = src.shader,
            StateAspect::PolygonFillMode => dst.polygon_fill_mode = src.polygon_fill_mode,
            StateAspect::BlendMode => dst.blend_mode = src.blend_mode,
            StateAspect::CullMode => dst.cull_mode = src.cull_mode,
            StateAspect::DepthTest => dst.depth_test = src.depth_test,
            StateAspect::DepthWrite => dst.depth_write = src.depth_write,
            StateAspect::Stencil => dst.stencil = src.stencil,
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Small set of aspects, e.g. the ones a commit pushed to the backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct AspectSet(u8);

impl AspectSet {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub fn insert(&mut self, aspect: StateAspect) {
        self.0 |= aspect.bit();
    }

    #[inline]
    pub fn contains(self, aspect: StateAspect) -> bool {
        self.0 & aspect.bit() != 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates members in application order.
    pub fn iter(self) -> impl Iterator<Item = StateAspect> {
        StateAspect::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl FromIterator<StateAspect> for AspectSet {
    fn from_iter<I: IntoIterator<Item = StateAspect>>(iter: I) -> Self {
        let mut set = AspectSet::EMPTY;
        for aspect in iter {
            set.insert(aspect);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BlendMode, CullMode, DepthTestMode, StencilOp};

    #[test]
    fn copying_every_differing_aspect_equalizes_states() {
        let src = DrawState::default()
            .with_blend(BlendMode::Multiply)
            .with_cull(CullMode::Front)
            .with_depth(DepthTestMode::Less, true);
        let mut dst = DrawState::default();

        for aspect in StateAspect::ALL {
            if aspect.differs(&src, &dst) {
                aspect.copy(&src, &mut dst);
            }
        }
        assert_eq!(src, dst);
    }

    #[test]
    fn stencil_is_one_aspect() {
        let mut a = DrawState::default();
        let b = DrawState::default();
        a.stencil.op_pass = StencilOp::Replace;
        a.stencil.reference = 1;

        let diff: AspectSet = StateAspect::ALL
            .into_iter()
            .filter(|s| s.differs(&a, &b))
            .collect();
        assert_eq!(diff.len(), 1);
        assert!(diff.contains(StateAspect::Stencil));
    }

    #[test]
    fn set_iterates_in_application_order() {
        let mut set = AspectSet::EMPTY;
        set.insert(StateAspect::Stencil);
        set.insert(StateAspect::Shader);
        set.insert(StateAspect::BlendMode);
        let order: Vec<_> = set.iter().collect();
        assert_eq!(
            order,
            vec![StateAspect::Shader, StateAspect::BlendMode, StateAspect::Stencil]
        );
        assert!(!set.is_empty());
        assert!(AspectSet::EMPTY.is_empty());
    }
}
