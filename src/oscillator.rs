/// Oscillator: bounded counter that climbs to the upper bound, turns around,
/// falls to the lower threshold and turns around again, forever.
///
/// With the default constants:
///   Ascending  51 → 900, next candidate 901 reverses to 899
///   Descending 899 → 50, next candidate 49 reverses to 51
///
/// The two turnarounds are not symmetric. That asymmetry is part of the
/// observable animation and is kept as-is.

use crate::config::BackdropConfig;

/// Travel direction of the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Ascending => f.write_str("ascending"),
            Direction::Descending => f.write_str("descending"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OscillatorState {
    pub value: i32,
    pub direction: Direction,
}

impl OscillatorState {
    /// State of a freshly mounted page.
    pub fn initial(config: &BackdropConfig) -> Self {
        Self {
            value: config.restart_at,
            direction: Direction::Ascending,
        }
    }
}

/// Pure transition: the state one tick later.
pub fn advance(state: OscillatorState, config: &BackdropConfig) -> OscillatorState {
    match state.direction {
        Direction::Ascending => {
            let candidate = state.value.saturating_add(config.step);
            if candidate > config.upper_bound {
                OscillatorState {
                    value: config.upper_bound - config.step,
                    direction: Direction::Descending,
                }
            } else {
                OscillatorState { value: candidate, ..state }
            }
        }
        Direction::Descending => {
            let candidate = state.value.saturating_sub(config.step);
            if candidate < config.reverse_below {
                OscillatorState {
                    value: config.restart_at,
                    direction: Direction::Ascending,
                }
            } else {
                OscillatorState { value: candidate, ..state }
            }
        }
    }
}

/// Stateful wrapper owned by a single backdrop.
#[derive(Debug, Clone)]
pub struct Oscillator {
    state: OscillatorState,
    config: BackdropConfig,
}

impl Oscillator {
    pub fn new(config: BackdropConfig) -> Self {
        Self {
            state: OscillatorState::initial(&config),
            config,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> OscillatorState {
        self.state
    }

    pub fn value(&self) -> i32 {
        self.state.value
    }

    /// Advance one tick. Returns the new direction only when it changed.
    pub fn tick(&mut self) -> Option<Direction> {
        let prev = self.state;
        self.state = advance(prev, &self.config);
        (self.state.direction != prev.direction).then_some(self.state.direction)
    }
}
