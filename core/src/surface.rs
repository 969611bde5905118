use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle phase of one scratch surface. The only legal transition is
/// `Concealed -> Revealed`; every operation is a no-op outside that edge.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SurfacePhase {
    Concealed,
    Revealed,
}

impl SurfacePhase {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }
}

impl Default for SurfacePhase {
    fn default() -> Self {
        Self::Concealed
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScratchOutcome {
    NoChange,
    Scratched,
    Revealed,
}

impl ScratchOutcome {
    pub const fn has_update(self) -> bool {
        use ScratchOutcome::*;
        match self {
            NoChange => false,
            Scratched => true,
            Revealed => true,
        }
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }
}

/// State machine behind one reward card's scratch overlay.
///
/// Owns the authoritative erasure mask; the canvas layer on top of it is
/// purely cosmetic. Coverage is estimated by sampling the mask on a coarse
/// grid, and the `Revealed` outcome is produced exactly once per surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScratchSurface {
    spec: SurfaceSpec,
    erased: Array2<bool>,
    erased_count: PxCount,
    phase: SurfacePhase,
    drawing: bool,
}

impl ScratchSurface {
    pub fn new(spec: SurfaceSpec) -> Self {
        let (w, h) = spec.size;
        Self {
            spec,
            erased: Array2::default([w as usize, h as usize]),
            erased_count: 0,
            phase: Default::default(),
            drawing: false,
        }
    }

    /// Surface for a reward that arrives already scratched: the latch starts
    /// set and there is never any interactive state.
    pub fn pre_revealed(spec: SurfaceSpec) -> Self {
        let (w, h) = spec.size;
        Self {
            spec,
            erased: Array2::from_elem([w as usize, h as usize], true),
            erased_count: spec.total_px(),
            phase: SurfacePhase::Revealed,
            drawing: false,
        }
    }

    pub fn spec(&self) -> SurfaceSpec {
        self.spec
    }

    pub fn phase(&self) -> SurfacePhase {
        self.phase
    }

    pub fn is_revealed(&self) -> bool {
        self.phase.is_revealed()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Exact count of erased units, maintained incrementally by the brush.
    /// Exact counterpart to the sampled `coverage()` estimate.
    pub fn erased_px(&self) -> PxCount {
        self.erased_count
    }

    /// Starts a gesture and punches the first brush circle.
    pub fn begin_stroke(&mut self, pos: Point) -> Result<ScratchOutcome> {
        self.check_concealed()?;
        self.drawing = true;
        Ok(self.erase_circle(pos))
    }

    /// Extends the gesture. A move without a preceding `begin_stroke` (or
    /// after the gesture ended) paints nothing.
    pub fn continue_stroke(&mut self, pos: Point) -> Result<ScratchOutcome> {
        self.check_concealed()?;
        if !self.drawing {
            return Ok(ScratchOutcome::NoChange);
        }
        Ok(self.erase_circle(pos))
    }

    pub fn end_stroke(&mut self) -> Result<ScratchOutcome> {
        self.check_concealed()?;
        let was_drawing = self.drawing;
        self.drawing = false;
        Ok(if was_drawing {
            ScratchOutcome::Scratched
        } else {
            ScratchOutcome::NoChange
        })
    }

    /// Erased fraction of the surface, sampled every `sample_stride` units
    /// per axis. A zero-area surface reports 0 instead of dividing by zero.
    pub fn coverage(&self) -> f32 {
        let (w, h) = self.spec.size;
        let stride = self.spec.sample_stride.max(1) as usize;

        let mut erased: PxCount = 0;
        let mut total: PxCount = 0;
        for x in (0..w as usize).step_by(stride) {
            for y in (0..h as usize).step_by(stride) {
                if self.erased[[x, y]] {
                    erased += 1;
                }
                total += 1;
            }
        }

        if total == 0 {
            0.0
        } else {
            erased as f32 / total as f32
        }
    }

    /// Debounced coverage check. Idempotent: once the latch is set this is a
    /// guaranteed no-op, so overlapping scheduled checks cannot produce a
    /// second `Revealed`.
    pub fn check_coverage(&mut self) -> ScratchOutcome {
        if self.phase.is_revealed() {
            return ScratchOutcome::NoChange;
        }

        if self.coverage() >= self.spec.reveal_threshold {
            self.latch_revealed()
        } else {
            ScratchOutcome::NoChange
        }
    }

    /// Keyboard reveal path: clears the whole overlay in one step and sets
    /// the latch. Same `Revealed`-exactly-once contract as gesture reveal.
    pub fn reveal(&mut self) -> ScratchOutcome {
        if self.phase.is_revealed() {
            return ScratchOutcome::NoChange;
        }

        self.erased.fill(true);
        self.erased_count = self.spec.total_px();
        self.latch_revealed()
    }

    fn latch_revealed(&mut self) -> ScratchOutcome {
        if self.phase.is_revealed() {
            return ScratchOutcome::NoChange;
        }

        self.phase = SurfacePhase::Revealed;
        self.drawing = false;
        log::debug!("surface revealed at {:.0}% coverage", self.coverage() * 100.0);
        ScratchOutcome::Revealed
    }

    /// Rasterizes one filled brush circle into the mask. Already-erased
    /// units stay erased, so re-scratching a clear region is `NoChange`.
    fn erase_circle(&mut self, (cx, cy): Point) -> ScratchOutcome {
        let (w, h) = self.spec.size;
        if w == 0 || h == 0 {
            return ScratchOutcome::NoChange;
        }

        // Truncating casts are enough for the bounding box: any unit the
        // truncation could disagree with floor/ceil about fails the distance
        // test below anyway.
        let r = self.spec.brush_radius as f64;
        let x_min = ((cx - r) as i64).max(0) as usize;
        let y_min = ((cy - r) as i64).max(0) as usize;
        let x_max = (((cx + r) as i64).max(0) as usize).min(w as usize - 1);
        let y_max = (((cy + r) as i64).max(0) as usize).min(h as usize - 1);

        let mut changed = false;
        for x in x_min..=x_max {
            for y in y_min..=y_max {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                if !self.erased[[x, y]] {
                    self.erased[[x, y]] = true;
                    self.erased_count += 1;
                    changed = true;
                }
            }
        }

        if changed {
            ScratchOutcome::Scratched
        } else {
            ScratchOutcome::NoChange
        }
    }

    fn check_concealed(&self) -> Result<()> {
        if self.phase.is_revealed() {
            Err(SurfaceError::AlreadyRevealed)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10x10 surface sampled at every unit with a single-unit brush, so
    /// coverage moves in exact 1% steps.
    fn unit_spec() -> SurfaceSpec {
        SurfaceSpec::new((10, 10), 0, 0.60, 1)
    }

    fn scratch_units(surface: &mut ScratchSurface, n: usize) {
        let mut points = (0..10u16).flat_map(|x| (0..10u16).map(move |y| (x, y)));
        let (x, y) = points.next().unwrap();
        surface.begin_stroke((x as f64, y as f64)).unwrap();
        for (x, y) in points.take(n.saturating_sub(1)) {
            surface.continue_stroke((x as f64, y as f64)).unwrap();
        }
        surface.end_stroke().unwrap();
    }

    #[test]
    fn coverage_below_threshold_does_not_reveal() {
        let mut surface = ScratchSurface::new(unit_spec());

        scratch_units(&mut surface, 59);

        assert_eq!(surface.coverage(), 0.59);
        assert_eq!(surface.check_coverage(), ScratchOutcome::NoChange);
        assert_eq!(surface.phase(), SurfacePhase::Concealed);
    }

    #[test]
    fn coverage_exactly_at_threshold_reveals() {
        let mut surface = ScratchSurface::new(unit_spec());

        scratch_units(&mut surface, 60);

        assert_eq!(surface.coverage(), 0.60);
        assert_eq!(surface.check_coverage(), ScratchOutcome::Revealed);
        assert_eq!(surface.phase(), SurfacePhase::Revealed);
    }

    #[test]
    fn reveal_fires_exactly_once_regardless_of_further_input() {
        let mut surface = ScratchSurface::new(unit_spec());
        scratch_units(&mut surface, 80);

        assert_eq!(surface.check_coverage(), ScratchOutcome::Revealed);

        // overlapping debounced checks and late gestures all no-op
        assert_eq!(surface.check_coverage(), ScratchOutcome::NoChange);
        assert_eq!(surface.reveal(), ScratchOutcome::NoChange);
        assert_eq!(
            surface.begin_stroke((5.0, 5.0)),
            Err(SurfaceError::AlreadyRevealed)
        );
        assert_eq!(
            surface.continue_stroke((5.0, 5.0)),
            Err(SurfaceError::AlreadyRevealed)
        );
        assert_eq!(surface.end_stroke(), Err(SurfaceError::AlreadyRevealed));
    }

    #[test]
    fn erasing_cleared_region_is_idempotent() {
        let mut surface = ScratchSurface::new(unit_spec());

        assert_eq!(
            surface.begin_stroke((3.0, 3.0)).unwrap(),
            ScratchOutcome::Scratched
        );
        let coverage = surface.coverage();
        assert_eq!(surface.erased_px(), 1);

        assert_eq!(
            surface.continue_stroke((3.0, 3.0)).unwrap(),
            ScratchOutcome::NoChange
        );
        assert_eq!(surface.coverage(), coverage);
        assert_eq!(surface.erased_px(), 1);
    }

    #[test]
    fn erased_px_counts_each_unit_exactly_once() {
        let mut surface = ScratchSurface::new(unit_spec());
        scratch_units(&mut surface, 7);
        assert_eq!(surface.erased_px(), 7);

        surface.reveal();
        assert_eq!(surface.erased_px(), surface.spec().total_px());

        let pre = ScratchSurface::pre_revealed(unit_spec());
        assert_eq!(pre.erased_px(), pre.spec().total_px());
    }

    #[test]
    fn move_without_begin_paints_nothing() {
        let mut surface = ScratchSurface::new(unit_spec());

        assert_eq!(
            surface.continue_stroke((5.0, 5.0)).unwrap(),
            ScratchOutcome::NoChange
        );
        assert_eq!(surface.coverage(), 0.0);
        assert!(!surface.is_drawing());
    }

    #[test]
    fn keyboard_reveal_clears_everything_in_one_step() {
        let mut surface = ScratchSurface::new(unit_spec());

        assert_eq!(surface.reveal(), ScratchOutcome::Revealed);
        assert_eq!(surface.coverage(), 1.0);
        assert!(surface.is_revealed());
        assert_eq!(surface.reveal(), ScratchOutcome::NoChange);
    }

    #[test]
    fn pre_revealed_surface_never_fires() {
        let mut surface = ScratchSurface::pre_revealed(unit_spec());

        assert!(surface.is_revealed());
        assert_eq!(surface.check_coverage(), ScratchOutcome::NoChange);
        assert_eq!(surface.reveal(), ScratchOutcome::NoChange);
        assert_eq!(
            surface.begin_stroke((0.0, 0.0)),
            Err(SurfaceError::AlreadyRevealed)
        );
    }

    #[test]
    fn zero_area_surface_reports_zero_coverage() {
        let mut surface = ScratchSurface::new(SurfaceSpec::new((0, 165), 24, 0.60, 8));

        assert_eq!(surface.coverage(), 0.0);
        assert_eq!(surface.check_coverage(), ScratchOutcome::NoChange);
        assert_eq!(
            surface.begin_stroke((10.0, 10.0)).unwrap(),
            ScratchOutcome::NoChange
        );
    }

    #[test]
    fn strokes_outside_the_surface_are_clamped() {
        let mut surface = ScratchSurface::new(unit_spec());

        assert_eq!(
            surface.begin_stroke((-50.0, -50.0)).unwrap(),
            ScratchOutcome::NoChange
        );
        assert_eq!(surface.coverage(), 0.0);
    }

    #[test]
    fn default_card_spec_samples_a_coarse_grid() {
        let surface = ScratchSurface::new(SurfaceSpec::card());

        // 278x165 at stride 8 samples 35x21 points
        assert_eq!(surface.coverage(), 0.0);
        assert_eq!(surface.spec().total_px(), 278 * 165);
    }
}
