//! Conversion of primitives into SVG nodes.

use svg::node::{Value, element as svg_element};

use penstroke_core::{
    color::Paint,
    geometry::Point,
    shape::{Circle, Ellipse, Line, Path, Polygon, Polyline, Rect, Text},
    style::Style,
};

use super::groups::SvgNode;

fn paint_value(paint: Option<&Paint>) -> Value {
    paint.map_or_else(|| Value::from("none"), Value::from)
}

/// Shape nodes that take fill and stroke attributes.
trait StyleTarget: Sized {
    fn paint(self, style: &Style) -> Self;
}

macro_rules! impl_style_target {
    ($($node:ty),* $(,)?) => {
        $(
            impl StyleTarget for $node {
                fn paint(self, style: &Style) -> Self {
                    self.set("fill", paint_value(style.fill()))
                        .set("stroke", paint_value(style.stroke()))
                        .set("stroke-width", style.stroke_width())
                }
            }
        )*
    };
}

impl_style_target!(
    svg_element::Circle,
    svg_element::Ellipse,
    svg_element::Rectangle,
    svg_element::Line,
    svg_element::Polyline,
    svg_element::Polygon,
    svg_element::Path,
);

fn points_value(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x(), p.y()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn circle(circle: &Circle, style: &Style) -> SvgNode {
    let node = svg_element::Circle::new()
        .set("cx", circle.center().x())
        .set("cy", circle.center().y())
        .set("r", circle.radius());
    Box::new(node.paint(style))
}

pub fn ellipse(ellipse: &Ellipse, style: &Style) -> SvgNode {
    let node = svg_element::Ellipse::new()
        .set("cx", ellipse.center().x())
        .set("cy", ellipse.center().y())
        .set("rx", ellipse.rx())
        .set("ry", ellipse.ry());
    Box::new(node.paint(style))
}

pub fn rect(rect: &Rect, style: &Style) -> SvgNode {
    let mut node = svg_element::Rectangle::new()
        .set("x", rect.origin().x())
        .set("y", rect.origin().y())
        .set("width", rect.width())
        .set("height", rect.height());
    if let Some(rx) = rect.rx() {
        node = node.set("rx", rx);
    }
    if let Some(ry) = rect.ry() {
        node = node.set("ry", ry);
    }
    Box::new(node.paint(style))
}

pub fn line(line: &Line, style: &Style) -> SvgNode {
    let node = svg_element::Line::new()
        .set("x1", line.start().x())
        .set("y1", line.start().y())
        .set("x2", line.end().x())
        .set("y2", line.end().y());
    Box::new(node.paint(style))
}

pub fn polyline(polyline: &Polyline, style: &Style) -> SvgNode {
    let node = svg_element::Polyline::new().set("points", points_value(polyline.points()));
    Box::new(node.paint(style))
}

pub fn polygon(polygon: &Polygon, style: &Style) -> SvgNode {
    let node = svg_element::Polygon::new().set("points", points_value(polygon.points()));
    Box::new(node.paint(style))
}

/// Path data is emitted verbatim, so curves and arcs stay exact.
pub fn path(path: &Path, style: &Style) -> SvgNode {
    let node = svg_element::Path::new().set("d", path.data());
    Box::new(node.paint(style))
}

pub fn text(text: &Text, style: &Style) -> SvgNode {
    let node = svg_element::Text::new(text.content())
        .set("x", text.position().x())
        .set("y", text.position().y())
        .set("fill", paint_value(style.fill()))
        .set("font-size", text.font_size());
    Box::new(node)
}
