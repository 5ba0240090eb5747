//! Sprite-sheet cell cycling

/// Cycles through a contiguous range of sprite-sheet cells
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimation {
    duration: f32,
    start_cell: u32,
    end_cell: u32,
    current_cell: u32,
}

impl SpriteAnimation {
    /// Create an animation over cells `start_cell..=end_cell` lasting
    /// `duration` seconds per cycle
    pub fn new(start_cell: u32, end_cell: u32, duration: f32) -> Self {
        let (start_cell, end_cell) = if start_cell <= end_cell {
            (start_cell, end_cell)
        } else {
            (end_cell, start_cell)
        };
        Self {
            duration,
            start_cell,
            end_cell,
            current_cell: start_cell,
        }
    }

    /// Number of cells in one cycle
    pub fn cell_count(&self) -> u32 {
        self.end_cell - self.start_cell + 1
    }

    /// Seconds per cycle
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Cell shown at scene time `t`
    pub fn cell_at(&self, t: f32) -> u32 {
        if self.duration <= 0.0 {
            return self.start_cell;
        }
        let fraction = t.rem_euclid(self.duration) / self.duration;
        let offset = (fraction * self.cell_count() as f32).floor() as u32;
        self.start_cell + offset.min(self.cell_count() - 1)
    }

    /// Advance to scene time `t`
    pub fn update(&mut self, t: f32) {
        self.current_cell = self.cell_at(t);
    }

    /// Cell selected by the last update
    pub fn current_cell(&self) -> u32 {
        self.current_cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_cycle_over_duration() {
        let anim = SpriteAnimation::new(4, 7, 2.0);
        assert_eq!(anim.cell_at(0.0), 4);
        assert_eq!(anim.cell_at(0.6), 5);
        assert_eq!(anim.cell_at(1.9), 7);
        assert_eq!(anim.cell_at(2.0), 4);
    }

    #[test]
    fn test_update_tracks_current_cell() {
        let mut anim = SpriteAnimation::new(0, 1, 1.0);
        anim.update(0.75);
        assert_eq!(anim.current_cell(), 1);
    }

    #[test]
    fn test_zero_duration_holds_first_cell() {
        let anim = SpriteAnimation::new(2, 5, 0.0);
        assert_eq!(anim.cell_at(10.0), 2);
    }
}
