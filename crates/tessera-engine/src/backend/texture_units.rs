/// Rolling texture-unit assignment for texture uniforms.
///
/// Units come from the upper half of the available range, `[max / 2, max - 1)`,
/// and wrap back to `max / 2`. The lower half is left to code that pins units
/// explicitly. The top unit is reserved as the scratch unit a backend leaves
/// active so that later texture binds cannot disturb an assigned unit.
///
/// A unit is only stable until the rolling index wraps, so a frame must not
/// bind more textures than [`rolling_len`](Self::rolling_len) per draw.
#[derive(Debug, Clone)]
pub struct TextureUnits {
    max_units: u32,
    next: u32,
}

impl TextureUnits {
    /// # Panics
    /// Panics if `max_units < 3` (no room for a rolling range plus scratch).
    pub fn new(max_units: u32) -> Self {
        assert!(max_units >= 3, "need at least 3 texture units, got {max_units}");
        Self {
            max_units,
            next: max_units / 2,
        }
    }

    /// Returns the unit to bind the next texture to and advances.
    pub fn next_unit(&mut self) -> u32 {
        let unit = self.next;
        self.next += 1;
        if self.next >= self.max_units - 1 {
            self.next = self.max_units / 2;
        }
        unit
    }

    /// Unit left active after binding.
    #[inline]
    pub fn scratch_unit(&self) -> u32 {
        self.max_units - 1
    }

    /// Number of distinct units handed out before wrapping.
    #[inline]
    pub fn rolling_len(&self) -> u32 {
        self.max_units - 1 - self.max_units / 2
    }

    pub fn reset(&mut self) {
        self.next = self.max_units / 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolls_through_upper_half_and_skips_scratch() {
        let mut units = TextureUnits::new(8);
        let got: Vec<u32> = (0..5).map(|_| units.next_unit()).collect();
        assert_eq!(got, vec![4, 5, 6, 4, 5]);
        assert_eq!(units.scratch_unit(), 7);
        assert_eq!(units.rolling_len(), 3);
    }

    #[test]
    fn reset_restarts_at_half() {
        let mut units = TextureUnits::new(16);
        units.next_unit();
        units.next_unit();
        units.reset();
        assert_eq!(units.next_unit(), 8);
    }

    #[test]
    #[should_panic(expected = "at least 3")]
    fn too_few_units_panics() {
        let _ = TextureUnits::new(2);
    }
}
