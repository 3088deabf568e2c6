//! Encapsulated PostScript rendering of a motion log.
//!
//! The page origin is moved to the center so plotter coordinates are used
//! as-is. Strokes are emitted as one path per uninterrupted run of inked
//! motion. Inside a fill bracket strokes are held back and written after
//! the fill, so the outline stays on top; pen-up moves there start a new
//! fill subpath.

use std::fmt::{self, Write as _};

use penstroke_core::geometry::Point;

use super::pen::{Ink, Motion};

/// Formats a coordinate with at most two decimals.
fn num(value: f32) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "-0" => "0".to_string(),
        _ => text.to_string(),
    }
}

fn rgb([r, g, b]: [f32; 3]) -> String {
    format!("{} {} {} setrgbcolor", num(r), num(g), num(b))
}

/// Escapes a PostScript string literal body.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            _ if u32::from(ch) <= 0xff => {
                escaped.push('\\');
                escaped.push_str(&format!("{:03o}", u32::from(ch)));
            }
            _ => escaped.push('?'),
        }
    }
    escaped
}

#[derive(Debug, Clone, Copy)]
enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    Arc { center: Point, radius: f32, start: f32 },
}

impl PathOp {
    fn write(&self, out: &mut String) -> fmt::Result {
        match self {
            Self::MoveTo(p) => writeln!(out, "{} {} moveto", num(p.x()), num(p.y())),
            Self::LineTo(p) => writeln!(out, "{} {} lineto", num(p.x()), num(p.y())),
            Self::Arc {
                center,
                radius,
                start,
            } => writeln!(
                out,
                "{} {} {} {} {} arc",
                num(center.x()),
                num(center.y()),
                num(*radius),
                num(*start),
                num(start + 360.0)
            ),
        }
    }
}

#[derive(Debug)]
struct Renderer {
    out: String,
    position: Point,
    down: bool,
    ink: Ink,
    width: f32,
    fill_color: [f32; 3],
    /// Fill outline while inside a fill bracket.
    fill: Option<Vec<PathOp>>,
    deferred: String,
    run: Vec<PathOp>,
}

impl Renderer {
    fn new(out: String) -> Self {
        Self {
            out,
            position: Point::default(),
            down: false,
            ink: Some([0.0, 0.0, 0.0]),
            width: 1.0,
            fill_color: [0.0, 0.0, 0.0],
            fill: None,
            deferred: String::new(),
            run: Vec::new(),
        }
    }

    fn inking(&self) -> bool {
        self.down && self.ink.is_some()
    }

    fn flush_run(&mut self) -> fmt::Result {
        if self.run.len() < 2 {
            self.run.clear();
            return Ok(());
        }
        let Some(ink) = self.ink else {
            self.run.clear();
            return Ok(());
        };

        let mut stroke = String::new();
        writeln!(stroke, "{}\n{} setlinewidth\nnewpath", rgb(ink), num(self.width))?;
        for op in self.run.drain(..) {
            op.write(&mut stroke)?;
        }
        stroke.push_str("stroke\n");

        if self.fill.is_some() {
            self.deferred.push_str(&stroke);
        } else {
            self.out.push_str(&stroke);
        }
        Ok(())
    }

    fn extend(&mut self, op: PathOp) {
        if let Some(fill) = self.fill.as_mut() {
            fill.push(op);
        }
        if self.inking() {
            if self.run.is_empty() {
                self.run.push(PathOp::MoveTo(self.position));
            }
            self.run.push(op);
        }
    }

    fn apply(&mut self, motion: &Motion) -> fmt::Result {
        match motion {
            Motion::PenUp => {
                self.flush_run()?;
                self.down = false;
            }
            Motion::PenDown => self.down = true,
            Motion::Goto(to) => {
                if self.down {
                    self.extend(PathOp::LineTo(*to));
                } else if let Some(fill) = self.fill.as_mut() {
                    fill.push(PathOp::MoveTo(*to));
                }
                self.position = *to;
            }
            Motion::Sweep { center, radius } => {
                let offset = self.position.sub_point(*center);
                let start = offset.y().atan2(offset.x()).to_degrees();
                self.extend(PathOp::Arc {
                    center: *center,
                    radius: *radius,
                    start,
                });
            }
            Motion::PenColor(ink) => {
                self.flush_run()?;
                self.ink = *ink;
            }
            Motion::PenWidth(width) => {
                self.flush_run()?;
                self.width = *width;
            }
            Motion::FillColor(color) => self.fill_color = *color,
            Motion::BeginFill => {
                self.flush_run()?;
                self.fill = Some(vec![PathOp::MoveTo(self.position)]);
            }
            Motion::EndFill => {
                self.flush_run()?;
                if let Some(ops) = self.fill.take().filter(|ops| ops.len() > 1) {
                    writeln!(self.out, "{}\nnewpath", rgb(self.fill_color))?;
                    for op in &ops {
                        op.write(&mut self.out)?;
                    }
                    self.out.push_str("closepath fill\n");
                }
                let deferred = std::mem::take(&mut self.deferred);
                self.out.push_str(&deferred);
            }
            Motion::Write { text, size } => {
                self.flush_run()?;
                writeln!(
                    self.out,
                    "{}\n/Helvetica findfont {} scalefont setfont\n{} {} moveto ({}) show",
                    rgb(self.ink.unwrap_or([0.0, 0.0, 0.0])),
                    size,
                    num(self.position.x()),
                    num(self.position.y()),
                    escape(text)
                )?;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<String, fmt::Error> {
        self.flush_run()?;
        if self.fill.take().is_some() {
            let deferred = std::mem::take(&mut self.deferred);
            self.out.push_str(&deferred);
        }
        self.out.push_str("showpage\n%%EOF\n");
        Ok(self.out)
    }
}

/// Renders `motions` onto a `width` x `height` page painted `background`.
///
/// # Errors
///
/// Returns [`fmt::Error`] if formatting a command fails.
pub fn render(
    width: u32,
    height: u32,
    background: [f32; 3],
    motions: &[Motion],
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(
        out,
        "%!PS-Adobe-3.0 EPSF-3.0\n\
         %%BoundingBox: 0 0 {width} {height}\n\
         %%Creator: penstroke\n\
         %%Pages: 1\n\
         %%EndComments\n\
         {} {} translate\n\
         1 setlinecap 1 setlinejoin\n\
         {}\n\
         {} {} {width} {height} rectfill\n",
        num(width as f32 / 2.0),
        num(height as f32 / 2.0),
        rgb(background),
        num(-(width as f32) / 2.0),
        num(-(height as f32) / 2.0),
    )?;

    let mut renderer = Renderer::new(out);
    for motion in motions {
        renderer.apply(motion)?;
    }
    renderer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

    #[test]
    fn test_num_trims() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(1.236), "1.24");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r"a(b)\c"), r"a\(b\)\\c");
        assert_eq!(escape("é"), r"\351");
        assert_eq!(escape("日"), "?");
    }

    #[test]
    fn test_header_and_background() {
        let eps = render(800, 600, WHITE, &[]).unwrap();
        assert!(eps.starts_with("%!PS-Adobe-3.0 EPSF-3.0\n"));
        assert!(eps.contains("%%BoundingBox: 0 0 800 600\n"));
        assert!(eps.contains("400 300 translate\n"));
        assert!(eps.contains("-400 -300 800 600 rectfill\n"));
        assert!(eps.ends_with("showpage\n%%EOF\n"));
    }

    #[test]
    fn test_inked_run_is_one_stroke() {
        let eps = render(
            100,
            100,
            WHITE,
            &[
                Motion::PenColor(Some([1.0, 0.0, 0.0])),
                Motion::PenWidth(2.0),
                Motion::Goto(Point::new(-10.0, 0.0)),
                Motion::PenDown,
                Motion::Goto(Point::new(10.0, 0.0)),
                Motion::Goto(Point::new(10.0, 10.0)),
                Motion::PenUp,
            ],
        )
        .unwrap();
        assert_eq!(eps.matches("stroke\n").count(), 1);
        assert!(eps.contains("1 0 0 setrgbcolor\n2 setlinewidth\nnewpath\n-10 0 moveto\n10 0 lineto\n10 10 lineto\nstroke\n"));
    }

    #[test]
    fn test_pen_up_motion_leaves_no_stroke() {
        let eps = render(100, 100, WHITE, &[Motion::Goto(Point::new(5.0, 5.0))]).unwrap();
        assert!(!eps.contains("stroke"));
    }

    #[test]
    fn test_invisible_ink_bounds_fill_without_stroke() {
        let eps = render(
            100,
            100,
            WHITE,
            &[
                Motion::PenColor(None),
                Motion::FillColor([0.0, 0.0, 1.0]),
                Motion::Goto(Point::new(0.0, 0.0)),
                Motion::PenDown,
                Motion::BeginFill,
                Motion::Goto(Point::new(10.0, 0.0)),
                Motion::Goto(Point::new(10.0, 10.0)),
                Motion::Goto(Point::new(0.0, 0.0)),
                Motion::EndFill,
                Motion::PenUp,
            ],
        )
        .unwrap();
        assert!(eps.contains("0 0 1 setrgbcolor\nnewpath\n0 0 moveto\n10 0 lineto\n10 10 lineto\n0 0 lineto\nclosepath fill\n"));
        assert!(!eps.contains("stroke"));
    }

    #[test]
    fn test_outline_follows_fill() {
        let eps = render(
            100,
            100,
            WHITE,
            &[
                Motion::PenColor(Some([0.0, 0.0, 0.0])),
                Motion::FillColor([1.0, 0.0, 0.0]),
                Motion::Goto(Point::new(0.0, -10.0)),
                Motion::PenDown,
                Motion::BeginFill,
                Motion::Sweep {
                    center: Point::new(0.0, 0.0),
                    radius: 10.0,
                },
                Motion::EndFill,
                Motion::PenUp,
            ],
        )
        .unwrap();
        let fill = eps.find("closepath fill").unwrap();
        let stroke = eps.find("stroke\n").unwrap();
        assert!(fill < stroke);
        assert!(eps.contains("0 0 10 -90 270 arc\n"));
    }

    #[test]
    fn test_write_text() {
        let eps = render(
            100,
            100,
            WHITE,
            &[
                Motion::Goto(Point::new(-40.0, 20.0)),
                Motion::PenColor(Some([0.0, 0.5, 0.0])),
                Motion::Write {
                    text: "Hi (there)".to_string(),
                    size: 18,
                },
            ],
        )
        .unwrap();
        assert!(eps.contains("0 0.5 0 setrgbcolor\n/Helvetica findfont 18 scalefont setfont\n-40 20 moveto (Hi \\(there\\)) show\n"));
    }
}
