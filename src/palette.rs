/// Color mapper: oscillator value → three HSL gradient stops.
///
/// The value is mapped linearly onto the hue range 150 (emerald) → 260 (indigo).
/// The second and third stops rotate that hue by +120° and +240°, giving a
/// triadic scheme that always runs light → mid → dark:
///   Stop 1: base hue,       S 80%, L 70%
///   Stop 2: base hue + 120, S 70%, L 50%
///   Stop 3: base hue + 240, S 50%, L 15%

use serde::Serialize;

use crate::config::BackdropConfig;

/// One gradient stop. Hue in degrees [0, 360), saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

/// Three stops of the diagonal background gradient, lightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradientColors {
    pub primary: Hsl,
    pub secondary: Hsl,
    pub tertiary: Hsl,
}

/// Compute the gradient for an oscillator value.
/// Values outside the oscillator's range are clamped first.
pub fn colors_for(value: i32, config: &BackdropConfig) -> GradientColors {
    let lo = config.restart_at;
    let hi = config.upper_bound;
    let clamped = value.clamp(lo, hi);
    let ratio = f64::from(clamped - lo) / f64::from(hi - lo);
    let hue = (config.hue_from + (config.hue_to - config.hue_from) * ratio).round() as u16 % 360;

    let stop = |rotation: u16, (saturation, lightness): (u8, u8)| Hsl {
        hue: (hue + rotation) % 360,
        saturation,
        lightness,
    };
    let [s1, s2, s3] = config.stops;
    let [r2, r3] = config.rotations;

    GradientColors {
        primary: stop(0, s1),
        secondary: stop(r2, s2),
        tertiary: stop(r3, s3),
    }
}

impl Hsl {
    /// Convert to 8-bit sRGB.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let h = f64::from(self.hue) / 360.0;
        let s = f64::from(self.saturation) / 100.0;
        let l = f64::from(self.lightness) / 100.0;

        if s == 0.0 {
            let v = channel(l);
            return (v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        (
            channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, h)),
            channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

impl std::fmt::Display for Hsl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

impl GradientColors {
    pub fn stops(&self) -> [Hsl; 3] {
        [self.primary, self.secondary, self.tertiary]
    }

    /// CSS `background-image` value, top-left to bottom-right.
    pub fn css_gradient(&self) -> String {
        format!(
            "linear-gradient(to bottom right, {}, {}, {})",
            self.primary, self.secondary, self.tertiary
        )
    }
}
