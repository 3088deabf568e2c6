//! Path data interpreter.
//!
//! [`trace`] walks the SVG path mini-language and reports straight-line
//! motion to a [`PathSink`]. Backends implement the sink to draw directly;
//! [`Outline`] is a sink that just collects the visited points.
//!
//! Curves are not interpolated: `C`, `S`, `Q` and `T` move straight to their
//! end point. Arcs (`A`) are consumed without moving the cursor. Parameter
//! groups repeat implicitly, so `L 0 0 10 10` draws two segments, and an
//! incomplete trailing group is dropped. Numbers appearing before the first
//! command are ignored.

use penstroke_core::geometry::Point;

use crate::lexer::{self, Token};

/// Receiver for the motion produced by [`trace`].
pub trait PathSink {
    /// Starts a new subpath at `to`. Any pending subpath is finished.
    fn move_to(&mut self, to: Point);

    /// Extends the current subpath with a straight segment to `to`.
    fn line_to(&mut self, to: Point);

    /// Closes the current subpath with a segment back to `start`.
    fn close(&mut self, start: Point);
}

/// What happened while tracing a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceReport {
    /// Segments emitted to the sink, closing segments included.
    pub segments: usize,
    /// Commands (or trailing parameter groups) dropped as truncated.
    pub abandoned: usize,
    /// Arc parameter groups consumed without drawing.
    pub arcs: usize,
}

/// Number of parameters in one group of `command` (upper case).
fn arity(command: char) -> usize {
    match command {
        'M' | 'L' | 'T' => 2,
        'H' | 'V' => 1,
        'S' | 'Q' => 4,
        'C' => 6,
        'A' => 7,
        _ => 0,
    }
}

#[derive(Debug, Default)]
struct Cursor {
    current: Point,
    start: Point,
    open: bool,
}

impl Cursor {
    fn resolve(&self, relative: bool, x: f32, y: f32) -> Point {
        if relative {
            self.current.add_point(Point::new(x, y))
        } else {
            Point::new(x, y)
        }
    }

    fn move_to<S: PathSink + ?Sized>(&mut self, sink: &mut S, to: Point) {
        sink.move_to(to);
        self.current = to;
        self.start = to;
        self.open = true;
    }

    fn line_to<S: PathSink + ?Sized>(&mut self, sink: &mut S, to: Point, report: &mut TraceReport) {
        if !self.open {
            let here = self.current;
            self.move_to(sink, here);
        }
        sink.line_to(to);
        self.current = to;
        report.segments += 1;
    }

    fn apply<S: PathSink + ?Sized>(
        &mut self,
        command: char,
        params: &[f32],
        sink: &mut S,
        report: &mut TraceReport,
    ) {
        let relative = command.is_ascii_lowercase();
        let upper = command.to_ascii_uppercase();

        if upper == 'Z' {
            if self.open {
                sink.close(self.start);
                self.current = self.start;
                report.segments += 1;
            }
            return;
        }

        let arity = arity(upper);
        if params.len() < arity {
            log::trace!(command = command, params = params.len(); "Abandoning truncated path command");
            report.abandoned += 1;
            return;
        }

        let groups = params.chunks_exact(arity);
        if !groups.remainder().is_empty() {
            report.abandoned += 1;
        }

        for (index, group) in groups.enumerate() {
            match upper {
                'M' => {
                    let to = self.resolve(relative, group[0], group[1]);
                    if index == 0 {
                        self.move_to(sink, to);
                    } else {
                        self.line_to(sink, to, report);
                    }
                }
                'L' | 'T' => {
                    let to = self.resolve(relative, group[0], group[1]);
                    self.line_to(sink, to, report);
                }
                'H' => {
                    let x = if relative { self.current.x() + group[0] } else { group[0] };
                    let to = self.current.with_x(x);
                    self.line_to(sink, to, report);
                }
                'V' => {
                    let y = if relative { self.current.y() + group[0] } else { group[0] };
                    let to = self.current.with_y(y);
                    self.line_to(sink, to, report);
                }
                'S' | 'Q' => {
                    let to = self.resolve(relative, group[2], group[3]);
                    self.line_to(sink, to, report);
                }
                'C' => {
                    let to = self.resolve(relative, group[4], group[5]);
                    self.line_to(sink, to, report);
                }
                _ => report.arcs += 1,
            }
        }
    }
}

/// Interprets path `data`, feeding straight-line motion to `sink`.
///
/// A drawing command issued before any `M` starts a subpath at the current
/// point, which is the origin at the beginning of the path. `Z` draws back to
/// the subpath start and leaves the subpath open for further segments.
///
/// # Examples
///
/// ```
/// # use penstroke_parser::path::{trace, Outline};
/// let mut outline = Outline::default();
/// let report = trace("M10 10 h 20 v 20 Z", &mut outline);
/// assert_eq!(report.segments, 3);
/// assert_eq!(outline.subpaths().len(), 1);
/// assert!(outline.subpaths()[0].is_closed());
/// ```
pub fn trace<S: PathSink + ?Sized>(data: &str, sink: &mut S) -> TraceReport {
    let mut tokens = lexer::tokenize_path(data).into_iter().peekable();
    let mut cursor = Cursor::default();
    let mut report = TraceReport::default();
    let mut params = Vec::new();

    while let Some(token) = tokens.next() {
        let Token::Command(command) = token else {
            continue;
        };

        params.clear();
        while let Some(Token::Number(value)) = tokens.next_if(|t| matches!(t, Token::Number(_))) {
            params.push(value);
        }

        cursor.apply(command, &params, sink, &mut report);
    }

    report
}

/// One connected run of points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subpath {
    points: Vec<Point>,
    closed: bool,
}

impl Subpath {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns `true` when a `Z` closed this subpath.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// A [`PathSink`] that records every subpath as a list of points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    subpaths: Vec<Subpath>,
}

impl Outline {
    /// Traces `data` into a fresh outline.
    pub fn from_data(data: &str) -> Self {
        let mut outline = Self::default();
        trace(data, &mut outline);
        outline
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    /// Returns `true` when at least one subpath has a segment to draw.
    pub fn has_segments(&self) -> bool {
        self.subpaths.iter().any(|s| s.points.len() >= 2)
    }

    /// Returns `true` when no traced point overflowed to infinity or NaN.
    pub fn is_finite(&self) -> bool {
        self.subpaths
            .iter()
            .flat_map(|s| s.points.iter())
            .all(|p| p.is_finite())
    }
}

impl PathSink for Outline {
    fn move_to(&mut self, to: Point) {
        self.subpaths.push(Subpath {
            points: vec![to],
            closed: false,
        });
    }

    fn line_to(&mut self, to: Point) {
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.points.push(to),
            None => self.move_to(to),
        }
    }

    fn close(&mut self, start: Point) {
        if let Some(subpath) = self.subpaths.last_mut() {
            subpath.points.push(start);
            subpath.closed = true;
        }
    }
}
