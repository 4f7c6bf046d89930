//! Native SQL type text parser.
//!
//! ```text
//! timestamp(6) with time zone
//! numeric(10, 2)[]
//! character varying(64) ARRAY
//! ```
//!
//! Only the shape matters here: the words of the type name, the argument
//! list of the first parenthesized group, and the array depth.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit0, multispace0},
    combinator::{all_consuming, map},
    multi::{many0, many1},
    sequence::{delimited, preceded, tuple},
};

use crate::error::{GenError, GenResult};

/// Parsed native type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeType {
    /// Lowercased words of the type name, modifiers included.
    pub words: Vec<String>,
    /// Arguments of the first `( ... )` group.
    pub args: Vec<String>,
    /// Array depth, from `[]` suffixes or a trailing `ARRAY`.
    pub dims: usize,
}

impl NativeType {
    pub fn head(&self) -> &str {
        self.words.first().map(String::as_str).unwrap_or("")
    }

    /// Words joined by a single space.
    pub fn name(&self) -> String {
        self.words.join(" ")
    }

    /// Element type of an array, i.e. the same type with one dimension less.
    pub fn element(&self) -> NativeType {
        NativeType {
            words: self.words.clone(),
            args: self.args.clone(),
            dims: self.dims.saturating_sub(1),
        }
    }
}

enum Part<'a> {
    Word(&'a str),
    Args(Vec<String>),
}

/// Parse native type text.
pub fn parse(input: &str) -> GenResult<NativeType> {
    match all_consuming(native_type)(input) {
        Ok((_, ty)) => Ok(ty),
        Err(_) => Err(GenError::UnknownType(input.trim().to_string())),
    }
}

fn native_type(input: &str) -> IResult<&str, NativeType> {
    let (input, parts) = many1(preceded(multispace0, part))(input)?;
    let (input, suffixes) = many0(array_suffix)(input)?;
    let (input, _) = multispace0(input)?;

    let mut words = Vec::new();
    let mut args = None;
    for p in parts {
        match p {
            Part::Word(w) => words.push(w.to_ascii_lowercase()),
            Part::Args(a) => {
                if args.is_none() {
                    args = Some(a);
                }
            }
        }
    }

    let mut dims = suffixes.len();
    while words.len() > 1 && words.last().is_some_and(|w| w == "array") {
        words.pop();
        dims += 1;
    }

    Ok((
        input,
        NativeType {
            words,
            args: args.unwrap_or_default(),
            dims,
        },
    ))
}

fn part(input: &str) -> IResult<&str, Part<'_>> {
    alt((map(word, Part::Word), map(args, Part::Args)))(input)
}

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn args(input: &str) -> IResult<&str, Vec<String>> {
    map(
        delimited(char('('), take_while(|c: char| c != ')'), char(')')),
        |s: &str| {
            s.split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect()
        },
    )(input)
}

fn array_suffix(input: &str) -> IResult<&str, ()> {
    map(
        tuple((multispace0, char('['), multispace0, digit0, multispace0, char(']'))),
        |_| (),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let ty = parse("INTEGER").unwrap();
        assert_eq!(ty.words, vec!["integer"]);
        assert!(ty.args.is_empty());
        assert_eq!(ty.dims, 0);
    }

    #[test]
    fn test_parse_args_and_modifiers() {
        let ty = parse("timestamp(6) with time zone").unwrap();
        assert_eq!(ty.name(), "timestamp with time zone");
        assert_eq!(ty.args, vec!["6"]);

        let ty = parse("numeric(10, 2)").unwrap();
        assert_eq!(ty.args, vec!["10", "2"]);
    }

    #[test]
    fn test_parse_arrays() {
        assert_eq!(parse("text[]").unwrap().dims, 1);
        assert_eq!(parse("int[3][]").unwrap().dims, 2);

        let ty = parse("character varying(64) ARRAY").unwrap();
        assert_eq!(ty.name(), "character varying");
        assert_eq!(ty.dims, 1);
        assert_eq!(ty.element().dims, 0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse("").is_err());
        assert!(parse("int) ").is_err());
    }
}
