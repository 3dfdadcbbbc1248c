/// Backdrop: the animated page background as a single reusable unit.
///
/// Pages and the timer only see the [`Backdrop`] capability; the oscillator
/// and color mapper behind it stay private.

use crate::config::BackdropConfig;
use crate::oscillator::{Direction, Oscillator};
use crate::palette::{self, GradientColors};

/// Capability handed to each mounted page.
pub trait Backdrop {
    /// Gradient for the current state. Pure read.
    fn current_colors(&self) -> GradientColors;
    /// Advance one animation step. Returns the new direction when the
    /// animation reversed on this step.
    fn tick(&mut self) -> Option<Direction>;
}

/// Oscillator-driven triadic gradient.
#[derive(Debug, Clone)]
pub struct AnimatedBackdrop {
    oscillator: Oscillator,
    config: BackdropConfig,
}

impl AnimatedBackdrop {
    pub fn new(config: BackdropConfig) -> Self {
        Self {
            oscillator: Oscillator::new(config),
            config,
        }
    }

    #[cfg(test)]
    pub fn value(&self) -> i32 {
        self.oscillator.value()
    }
}

impl Default for AnimatedBackdrop {
    fn default() -> Self {
        Self::new(BackdropConfig::default())
    }
}

impl Backdrop for AnimatedBackdrop {
    fn current_colors(&self) -> GradientColors {
        palette::colors_for(self.oscillator.value(), &self.config)
    }

    fn tick(&mut self) -> Option<Direction> {
        self.oscillator.tick()
    }
}
