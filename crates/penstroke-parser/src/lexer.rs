//! Lexical analyzer for path data and point lists.
//!
//! Both the `d` attribute of `<path>` and the `points` attribute of
//! `<polyline>`/`<polygon>` are flat streams of numbers separated by anything
//! at all. The lexer pulls out command letters and numbers and silently skips
//! every other character, so `"10,20 30,40"`, `"10 20 30 40"` and
//! `"10-5"` (two numbers) all tokenize the way a browser would read them.

use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, opt},
    error::ModalResult,
    stream::Stream,
    token::{one_of, take_while},
};

/// Path command letters understood by the interpreter.
pub const PATH_COMMANDS: &str = "MmLlHhVvCcSsQqTtAaZz";

/// A single lexical unit of path data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// A command letter such as `M` or `c`.
    Command(char),
    /// A numeric literal.
    Number(f32),
}

type Input<'a> = &'a str;

/// Parse a numeric literal: optional minus sign, digits with an optional
/// fraction, or a bare fraction such as `.5`.
fn number<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    (
        opt('-'),
        alt((
            (digit1, opt(('.', take_while(0.., |c: char| c.is_ascii_digit())))).void(),
            ('.', digit1).void(),
        )),
    )
        .take()
        .parse_next(input)
}

/// Parse a path command letter
fn command(input: &mut Input<'_>) -> ModalResult<char> {
    one_of(|c: char| PATH_COMMANDS.contains(c)).parse_next(input)
}

/// Parse a number token, dropping literals that do not fit an `f32`
fn number_token(input: &mut Input<'_>) -> ModalResult<Option<Token>> {
    number
        .map(|literal: &str| literal.parse::<f32>().ok().map(Token::Number))
        .parse_next(input)
}

/// Scan `source` with `parser`, skipping one character whenever it fails.
fn scan<T>(source: &str, mut parser: impl FnMut(&mut Input<'_>) -> ModalResult<Option<T>>) -> Vec<T> {
    let mut input = source;
    let mut items = Vec::new();

    while !input.is_empty() {
        let start = input.checkpoint();
        match parser(&mut input) {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(_) => {
                input.reset(&start);
                input.next_token();
            }
        }
    }

    items
}

/// Tokenize path data into command letters and numbers.
///
/// # Examples
///
/// ```
/// # use penstroke_parser::lexer::{tokenize_path, Token};
/// let tokens = tokenize_path("M0,0 l10-5");
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Command('M'),
///         Token::Number(0.0),
///         Token::Number(0.0),
///         Token::Command('l'),
///         Token::Number(10.0),
///         Token::Number(-5.0),
///     ]
/// );
/// ```
pub fn tokenize_path(source: &str) -> Vec<Token> {
    scan(source, |input| {
        alt((command.map(|c| Some(Token::Command(c))), number_token)).parse_next(input)
    })
}

/// Extract every number in `source`, in order, ignoring all other text.
///
/// # Examples
///
/// ```
/// # use penstroke_parser::lexer::numbers;
/// assert_eq!(numbers("1.5, -2 x .25"), vec![1.5, -2.0, 0.25]);
/// assert!(numbers("no digits here").is_empty());
/// ```
pub fn numbers(source: &str) -> Vec<f32> {
    scan(source, |input| {
        number_token
            .map(|token| match token {
                Some(Token::Number(value)) => Some(value),
                _ => None,
            })
            .parse_next(input)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_forms() {
        assert_eq!(numbers("10"), vec![10.0]);
        assert_eq!(numbers("-3.5"), vec![-3.5]);
        assert_eq!(numbers("-.5"), vec![-0.5]);
        assert_eq!(numbers("7."), vec![7.0]);
    }

    #[test]
    fn test_adjacent_numbers_split() {
        assert_eq!(numbers("10-5"), vec![10.0, -5.0]);
        assert_eq!(numbers("1.2.3"), vec![1.2, 0.3]);
    }

    #[test]
    fn test_lone_sign_and_dot_are_separators() {
        assert_eq!(numbers("- . 4"), vec![4.0]);
    }

    #[test]
    fn test_tokenize_path_commands() {
        let tokens = tokenize_path("M 1 2 Z");
        assert_eq!(
            tokens,
            vec![
                Token::Command('M'),
                Token::Number(1.0),
                Token::Number(2.0),
                Token::Command('Z'),
            ]
        );
    }

    #[test]
    fn test_tokenize_path_ignores_unknown_letters() {
        let tokens = tokenize_path("M0 0 X 5 5");
        assert_eq!(tokens.len(), 5);
        assert!(!tokens.contains(&Token::Command('X')));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn numbers_never_panics(source in ".{0,64}") {
            let _ = numbers(&source);
            let _ = tokenize_path(&source);
        }

        #[test]
        fn separators_do_not_change_numbers(
            values in prop::collection::vec(-1000i32..1000, 0..16),
            sep in prop::sample::select(vec![" ", ",", ", ", "\n", "\t,"]),
        ) {
            let source = values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(sep);
            let expected: Vec<f32> = values.iter().map(|v| *v as f32).collect();
            prop_assert_eq!(numbers(&source), expected);
        }
    }
}
