//! A recording pen.
//!
//! [`Pen`] moves in plotter space (origin at the page center, y up) and
//! appends every state change to a [`Motion`] log instead of drawing.

use penstroke_core::geometry::Point;

/// Ink as unit-range RGB. `None` is invisible ink: the pen still moves with
/// its tip down, so fill regions are bounded, but leaves no line.
pub type Ink = Option<[f32; 3]>;

/// One recorded pen instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    PenUp,
    PenDown,
    /// Straight move to an absolute position.
    Goto(Point),
    /// Full counter-clockwise turn around `center`, ending where it began.
    Sweep { center: Point, radius: f32 },
    PenColor(Ink),
    PenWidth(f32),
    FillColor([f32; 3]),
    BeginFill,
    EndFill,
    /// Text with its baseline starting at the current position.
    Write { text: String, size: u16 },
}

#[derive(Debug, Clone, Default)]
pub struct Pen {
    position: Point,
    /// Degrees counter-clockwise from east.
    heading: f32,
    down: bool,
    motions: Vec<Motion>,
}

impl Pen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn motions(&self) -> &[Motion] {
        &self.motions
    }

    pub fn pen_up(&mut self) {
        if self.down {
            self.down = false;
            self.motions.push(Motion::PenUp);
        }
    }

    pub fn pen_down(&mut self) {
        if !self.down {
            self.down = true;
            self.motions.push(Motion::PenDown);
        }
    }

    pub fn set_heading(&mut self, degrees: f32) {
        self.heading = degrees.rem_euclid(360.0);
    }

    pub fn goto(&mut self, to: Point) {
        self.position = to;
        self.motions.push(Motion::Goto(to));
    }

    /// Lifts the pen, moves to `to` and lowers it again.
    pub fn jump(&mut self, to: Point) {
        self.pen_up();
        self.goto(to);
        self.pen_down();
    }

    /// Turns a full circle of `radius` whose center lies to the left of the
    /// current heading.
    pub fn circle(&mut self, radius: f32) {
        let left = (self.heading + 90.0).to_radians();
        let center = self
            .position
            .add_point(Point::new(left.cos(), left.sin()).scale(radius));
        self.motions.push(Motion::Sweep { center, radius });
    }

    pub fn pen_color(&mut self, ink: Ink) {
        self.motions.push(Motion::PenColor(ink));
    }

    pub fn pen_width(&mut self, width: f32) {
        self.motions.push(Motion::PenWidth(width));
    }

    pub fn fill_color(&mut self, color: [f32; 3]) {
        self.motions.push(Motion::FillColor(color));
    }

    pub fn begin_fill(&mut self) {
        self.motions.push(Motion::BeginFill);
    }

    pub fn end_fill(&mut self) {
        self.motions.push(Motion::EndFill);
    }

    pub fn write(&mut self, text: &str, size: u16) {
        self.motions.push(Motion::Write {
            text: text.to_string(),
            size,
        });
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_pen_state_changes_are_recorded_once() {
        let mut pen = Pen::new();
        pen.pen_up();
        pen.pen_down();
        pen.pen_down();
        pen.pen_up();
        assert_eq!(pen.motions(), &[Motion::PenDown, Motion::PenUp]);
    }

    #[test]
    fn test_jump_lifts_pen() {
        let mut pen = Pen::new();
        pen.pen_down();
        pen.jump(Point::new(3.0, 4.0));
        assert_eq!(
            pen.motions(),
            &[
                Motion::PenDown,
                Motion::PenUp,
                Motion::Goto(Point::new(3.0, 4.0)),
                Motion::PenDown,
            ]
        );
        pen.pen_down();
        assert_eq!(pen.motions().len(), 4);
    }

    #[test]
    fn test_circle_center_is_left_of_heading() {
        let mut pen = Pen::new();
        pen.goto(Point::new(10.0, -5.0));
        pen.circle(5.0);

        let Some(Motion::Sweep { center, radius }) = pen.motions().last() else {
            panic!("expected a sweep");
        };
        assert!(approx_eq!(f32, center.x(), 10.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, center.y(), 0.0, epsilon = 1e-4));
        assert_eq!(*radius, 5.0);
    }

    #[test]
    fn test_heading_wraps() {
        let mut pen = Pen::new();
        pen.set_heading(-90.0);
        pen.circle(2.0);
        let Some(Motion::Sweep { center, .. }) = pen.motions().last() else {
            panic!("expected a sweep");
        };
        assert!(approx_eq!(f32, center.x(), 2.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, center.y(), 0.0, epsilon = 1e-4));
    }
}
