use crate::backend::DrawBackend;

use super::{AspectSet, DrawState, StateAspect};

/// Requested vs. applied pipeline state.
///
/// `applied` mirrors what the backend last received. A commit pushes the
/// aspects where `current` and `applied` disagree, or every aspect while the
/// force-full flag is set (fresh session, unknown backend state).
#[derive(Debug, Clone)]
pub struct StateTracker {
    current: DrawState,
    applied: DrawState,
    force_full: bool,
    marked_dirty: bool,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTracker {
    /// Creates a tracker whose first commit applies everything.
    pub fn new() -> Self {
        Self {
            current: DrawState::default(),
            applied: DrawState::default(),
            force_full: true,
            marked_dirty: false,
        }
    }

    #[inline]
    pub fn current(&self) -> &DrawState {
        &self.current
    }

    /// Mutable access to the requested state.
    ///
    /// Dirtiness is derived from `current != applied`, so edits made through
    /// this reference are picked up by the next commit.
    #[inline]
    pub fn current_mut(&mut self) -> &mut DrawState {
        &mut self.current
    }

    #[inline]
    pub fn applied(&self) -> &DrawState {
        &self.applied
    }

    /// Replaces the requested state. Returns true if it changed.
    pub fn set(&mut self, state: DrawState) -> bool {
        let changed = self.current != state;
        self.current = state;
        changed
    }

    /// True if the next commit has work to do.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.force_full || self.marked_dirty || self.current != self.applied
    }

    /// Forces the next commit to run its diff even if nothing looks changed.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.marked_dirty = true;
    }

    /// Forces the next commit to apply every aspect.
    #[inline]
    pub fn force_full(&mut self) {
        self.force_full = true;
    }

    #[inline]
    pub fn is_force_full(&self) -> bool {
        self.force_full
    }

    /// Pushes pending state to `backend`; returns the aspects applied.
    ///
    /// With `debug_checks`, a mismatch between `applied` and `current`
    /// afterwards is an internal consistency failure and panics.
    pub fn commit<B>(&mut self, backend: &mut B, debug_checks: bool) -> AspectSet
    where
        B: DrawBackend + ?Sized,
    {
        if !self.is_dirty() {
            return AspectSet::EMPTY;
        }

        let force = self.force_full;
        let mut applied = AspectSet::EMPTY;

        for aspect in StateAspect::ALL {
            if force || aspect.differs(&self.current, &self.applied) {
                log::trace!("applying {aspect:?} (forced: {force})");
                backend.apply_aspect(aspect, &self.current);
                aspect.copy(&self.current, &mut self.applied);
                applied.insert(aspect);
            }
        }

        self.force_full = false;
        self.marked_dirty = false;

        if debug_checks {
            assert_eq!(
                self.applied, self.current,
                "draw state mismatch after commit"
            );
        }

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, RecordingBackend};
    use crate::state::{BlendMode, CullMode, DepthTestMode};

    fn state_calls(backend: &RecordingBackend) -> usize {
        backend.calls().iter().filter(|c| c.is_state_change()).count()
    }

    #[test]
    fn first_commit_applies_everything() {
        let mut backend = RecordingBackend::new();
        let mut tracker = StateTracker::new();

        let applied = tracker.commit(&mut backend, true);
        assert_eq!(applied.len(), StateAspect::ALL.len());
        assert_eq!(state_calls(&backend), StateAspect::ALL.len());
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn second_commit_is_a_no_op() {
        let mut backend = RecordingBackend::new();
        let mut tracker = StateTracker::new();
        tracker.commit(&mut backend, true);
        backend.clear_calls();

        assert!(tracker.commit(&mut backend, true).is_empty());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn only_differing_aspects_are_applied() {
        let mut backend = RecordingBackend::new();
        let mut tracker = StateTracker::new();
        tracker.commit(&mut backend, true);
        backend.clear_calls();

        tracker.set(
            DrawState::default()
                .with_blend(BlendMode::Alpha)
                .with_cull(CullMode::Back),
        );
        let applied = tracker.commit(&mut backend, true);

        assert_eq!(applied.len(), 2);
        assert_eq!(
            backend.calls(),
            &[
                BackendCall::SetBlendMode(BlendMode::Alpha),
                BackendCall::SetCullMode(CullMode::Back),
            ]
        );
    }

    #[test]
    fn reverting_an_edit_leaves_nothing_to_apply() {
        let mut backend = RecordingBackend::new();
        let mut tracker = StateTracker::new();
        tracker.commit(&mut backend, true);

        tracker.current_mut().depth_test = DepthTestMode::Less;
        assert!(tracker.is_dirty());
        tracker.current_mut().depth_test = DepthTestMode::None;
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn marked_dirty_commit_still_diffs() {
        let mut backend = RecordingBackend::new();
        let mut tracker = StateTracker::new();
        tracker.commit(&mut backend, true);
        backend.clear_calls();

        tracker.mark_dirty();
        assert!(tracker.is_dirty());
        assert!(tracker.commit(&mut backend, true).is_empty());
        assert!(!tracker.is_dirty());
        assert_eq!(state_calls(&backend), 0);
    }

    #[test]
    fn force_full_reapplies_unchanged_state() {
        let mut backend = RecordingBackend::new();
        let mut tracker = StateTracker::new();
        tracker.commit(&mut backend, true);
        backend.clear_calls();

        tracker.force_full();
        let applied = tracker.commit(&mut backend, true);
        assert_eq!(applied.len(), StateAspect::ALL.len());
    }

    #[test]
    fn set_reports_change() {
        let mut tracker = StateTracker::new();
        assert!(!tracker.set(DrawState::default()));
        assert!(tracker.set(DrawState::default().with_blend(BlendMode::Add)));
        assert_eq!(tracker.current().blend_mode, BlendMode::Add);
    }
}
