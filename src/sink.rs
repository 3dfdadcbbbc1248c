/// Render sink: turns sampled frames into page backgrounds.
///
/// Every background is a diagonal linear gradient (top-left → bottom-right)
/// through the three stops, with a short linear transition so consecutive
/// per-tick values blend instead of stepping.
///
/// Output modes:
///   css  → `<route> { background-image: …; transition: …; }`
///   ansi → page title followed by three 24-bit color swatches
///   json → one object per line (page, tick, stops, background)

use std::io::{self, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::palette::GradientColors;
use crate::site::Page;
use crate::ticker::Frame;

/// Anything that can paint a page background.
pub trait RenderSink {
    fn paint(&mut self, frame: &Frame) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Css,
    Ansi,
    Json,
}

/// CSS property values for one background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssBackground {
    pub background_image: String,
    pub transition: String,
}

impl CssBackground {
    pub fn from_colors(colors: &GradientColors, transition: Duration) -> Self {
        Self {
            background_image: colors.css_gradient(),
            transition: format!("background-image {}s linear", transition.as_secs_f64()),
        }
    }
}

impl std::fmt::Display for CssBackground {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "background-image: {}; transition: {};",
            self.background_image, self.transition
        )
    }
}

#[derive(Serialize)]
struct JsonFrame<'a> {
    page: Page,
    tick: u64,
    colors: &'a GradientColors,
    background: String,
}

/// Writes sampled frames to a byte stream.
pub struct StyleSink<W: Write> {
    out: W,
    mode: RenderMode,
    transition: Duration,
    sample_every: u64,
}

impl<W: Write> StyleSink<W> {
    pub fn new(out: W, mode: RenderMode, transition: Duration, sample_every: u64) -> Self {
        Self {
            out,
            mode,
            transition,
            sample_every: sample_every.max(1),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn is_sampled(&self, frame: &Frame) -> bool {
        frame.tick % self.sample_every == 0
    }

    fn write_css(&mut self, frame: &Frame) -> io::Result<()> {
        let css = CssBackground::from_colors(&frame.colors, self.transition);
        writeln!(self.out, "{} {{ {css} }}", frame.page.route())
    }

    fn write_ansi(&mut self, frame: &Frame) -> io::Result<()> {
        write!(self.out, "{:<10}", frame.page.title())?;
        for stop in frame.colors.stops() {
            let (r, g, b) = stop.to_rgb();
            write!(self.out, " \x1b[48;2;{r};{g};{b}m      \x1b[0m")?;
        }
        let [a, b, c] = frame.colors.stops().map(|s| s.hue);
        writeln!(self.out, "  hue {a:>3}/{b:>3}/{c:>3}  tick {}", frame.tick)
    }

    fn write_json(&mut self, frame: &Frame) -> io::Result<()> {
        let line = JsonFrame {
            page: frame.page,
            tick: frame.tick,
            colors: &frame.colors,
            background: frame.colors.css_gradient(),
        };
        serde_json::to_writer(&mut self.out, &line)?;
        writeln!(self.out)
    }
}

impl<W: Write> RenderSink for StyleSink<W> {
    fn paint(&mut self, frame: &Frame) -> io::Result<()> {
        if !self.is_sampled(frame) {
            return Ok(());
        }
        match self.mode {
            RenderMode::Css => self.write_css(frame)?,
            RenderMode::Ansi => self.write_ansi(frame)?,
            RenderMode::Json => self.write_json(frame)?,
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackdropConfig;
    use crate::palette::colors_for;

    fn frame(page: Page, tick: u64) -> Frame {
        Frame {
            page,
            tick,
            colors: colors_for(51, &BackdropConfig::default()),
        }
    }

    fn render(mode: RenderMode, sample_every: u64, frames: &[Frame]) -> String {
        let mut sink = StyleSink::new(Vec::new(), mode, Duration::from_millis(100), sample_every);
        for f in frames {
            sink.paint(f).unwrap();
        }
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn css_background_properties() {
        let css = CssBackground::from_colors(&frame(Page::Info, 1).colors, Duration::from_millis(100));
        assert_eq!(css.transition, "background-image 0.1s linear");
        assert!(css.background_image.starts_with("linear-gradient(to bottom right, hsl(150, 80%, 70%)"));
    }

    #[test]
    fn css_mode() {
        let out = render(RenderMode::Css, 1, &[frame(Page::Contact, 1)]);
        assert_eq!(
            out,
            "/contact { background-image: linear-gradient(to bottom right, hsl(150, 80%, 70%), \
             hsl(270, 70%, 50%), hsl(30, 50%, 15%)); transition: background-image 0.1s linear; }\n"
        );
    }

    #[test]
    fn json_mode() {
        let out = render(RenderMode::Json, 1, &[frame(Page::Info, 7)]);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["page"], "info");
        assert_eq!(value["tick"], 7);
        assert_eq!(value["colors"]["primary"]["hue"], 150);
        assert_eq!(value["colors"]["tertiary"]["lightness"], 15);
        assert_eq!(
            value["background"].as_str().unwrap(),
            frame(Page::Info, 7).colors.css_gradient()
        );
    }

    #[test]
    fn ansi_mode() {
        let out = render(RenderMode::Ansi, 1, &[frame(Page::Home, 3)]);
        assert!(out.starts_with("Home      "));
        assert_eq!(out.matches("\x1b[48;2;").count(), 3);
        assert!(out.contains("hue 150/270/ 30"));
        assert!(out.ends_with("tick 3\n"));
    }

    #[test]
    fn paints_only_sampled_ticks() {
        let frames: Vec<Frame> = (1..=10).map(|t| frame(Page::Projects, t)).collect();
        let out = render(RenderMode::Json, 5, &frames);
        let ticks: Vec<u64> = out
            .lines()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["tick"].as_u64().unwrap())
            .collect();
        assert_eq!(ticks, vec![5, 10]);
    }

    #[test]
    fn mode_names_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: RenderMode,
        }
        let w: Wrapper = toml::from_str("mode = \"css\"").unwrap();
        assert_eq!(w.mode, RenderMode::Css);
        assert!(toml::from_str::<Wrapper>("mode = \"svg\"").is_err());
    }
}
