use crate::backend::DrawBackend;

/// Capability proving that pending immediate geometry has been drawn and the
/// current draw state committed.
///
/// Returned by [`Draw::flush`](super::Draw::flush). It is the only way to get
/// mutable access to the backend, so backend work issued through it can never
/// overtake buffered polygons.
///
/// Pipeline setters called directly on the backend bypass the state tracker;
/// follow them with [`Draw::invalidate_draw_state`](super::Draw::invalidate_draw_state).
#[derive(Debug)]
pub struct Flushed<'a, B: DrawBackend> {
    backend: &'a mut B,
}

impl<'a, B: DrawBackend> Flushed<'a, B> {
    pub(super) fn new(backend: &'a mut B) -> Self {
        Self { backend }
    }

    #[inline]
    pub fn backend(&mut self) -> &mut B {
        self.backend
    }

    #[inline]
    pub fn into_backend(self) -> &'a mut B {
        self.backend
    }
}
