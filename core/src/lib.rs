#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use error::*;
pub use messages::*;
pub use progress::*;
pub use reward::*;
pub use surface::*;
pub use types::*;

mod error;
mod messages;
mod progress;
mod reward;
mod surface;
mod types;

/// Geometry and tuning of one scratch surface.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpec {
    pub size: Size2,
    pub brush_radius: Px,
    pub reveal_threshold: f32,
    pub sample_stride: Px,
}

impl SurfaceSpec {
    pub const CARD_SIZE: Size2 = (278, 165);
    pub const BRUSH_RADIUS: Px = 24;
    /// Larger brush on touch-primary viewports to compensate for imprecise contact.
    pub const BRUSH_RADIUS_TOUCH: Px = 28;
    pub const REVEAL_THRESHOLD: f32 = 0.60;
    pub const SAMPLE_STRIDE: Px = 8;

    pub const fn new_unchecked(
        size: Size2,
        brush_radius: Px,
        reveal_threshold: f32,
        sample_stride: Px,
    ) -> Self {
        Self {
            size,
            brush_radius,
            reveal_threshold,
            sample_stride,
        }
    }

    pub fn new(size: Size2, brush_radius: Px, reveal_threshold: f32, sample_stride: Px) -> Self {
        let reveal_threshold = reveal_threshold.clamp(0.0, 1.0);
        let sample_stride = sample_stride.max(1);
        Self::new_unchecked(size, brush_radius, reveal_threshold, sample_stride)
    }

    /// Default card surface for mouse input.
    pub const fn card() -> Self {
        Self::new_unchecked(
            Self::CARD_SIZE,
            Self::BRUSH_RADIUS,
            Self::REVEAL_THRESHOLD,
            Self::SAMPLE_STRIDE,
        )
    }

    /// Default card surface for touch input.
    pub const fn card_touch() -> Self {
        Self::new_unchecked(
            Self::CARD_SIZE,
            Self::BRUSH_RADIUS_TOUCH,
            Self::REVEAL_THRESHOLD,
            Self::SAMPLE_STRIDE,
        )
    }

    pub const fn total_px(&self) -> PxCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self::card()
    }
}
