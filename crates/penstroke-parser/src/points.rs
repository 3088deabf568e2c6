//! Point list tokenizer for `<polyline>` and `<polygon>`.

use penstroke_core::geometry::Point;

use crate::lexer;

/// Parses a `points` attribute into coordinate pairs.
///
/// Commas and whitespace are interchangeable separators. A trailing odd
/// number is dropped, and input with no numbers yields an empty list.
///
/// # Examples
///
/// ```
/// # use penstroke_parser::points::parse_points;
/// # use penstroke_core::geometry::Point;
/// assert_eq!(
///     parse_points("0,0 10,10 20"),
///     vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]
/// );
/// assert!(parse_points("").is_empty());
/// ```
pub fn parse_points(source: &str) -> Vec<Point> {
    lexer::numbers(source)
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}
