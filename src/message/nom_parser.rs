//! Nom-based line splitter.
//!
//! Splits a raw line into borrowed tag block, source, command and
//! parameters. Interpretation (tag unescaping, source decomposition,
//! command normalisation, CTCP re-tagging) happens in `parse.rs`.

use nom::{
    branch::alt,
    bytes::complete::{take_until, take_while, take_while1},
    character::complete::{char, space0},
    combinator::{opt, rest},
    error::{context, VerboseError},
    sequence::preceded,
    IResult,
};

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// RFC 2812 allows at most 14 middle parameters; anything after them is
/// the trailing parameter.
pub const MAX_MIDDLE_PARAMS: usize = 14;

/// Parse the IRCv3 tag block (the part after `@` and before the first space).
fn parse_tags(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing IRCv3 message tags",
        preceded(char('@'), alt((take_until(" "), rest))),
    )(input)
}

/// Parse the source prefix (the part after `:` and before the first space).
fn parse_source(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing message source",
        preceded(char(':'), take_while(|c| c != ' ')),
    )(input)
}

/// Parse the command token.
fn parse_command(input: &str) -> ParseResult<&str, &str> {
    context("parsing IRC command", take_while1(|c| c != ' '))(input)
}

/// Split a complete line into its components.
///
/// IRC line format:
/// ```text
/// [@tags ][:source ]<command>[ params...][ :trailing]
/// ```
pub fn parse_line(input: &str) -> ParseResult<&str, ParsedLine<'_>> {
    let (input, tags) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;

    let (input, source) = opt(parse_source)(input)?;
    let (input, _) = space0(input)?;

    let (input, command) = context("parsing required command", parse_command)(input)?;

    let mut params: Vec<&str> = Vec::new();
    let mut trailing = false;
    let mut rest = input;

    while rest.starts_with(' ') {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(after_colon) = rest.strip_prefix(':') {
            params.push(after_colon);
            trailing = true;
            rest = "";
            break;
        }

        if params.len() == MAX_MIDDLE_PARAMS {
            params.push(rest);
            rest = "";
            break;
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    Ok((
        rest,
        ParsedLine {
            tags,
            source,
            command,
            params,
            trailing,
        },
    ))
}

/// A split line holding slices of the original input.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine<'a> {
    /// Raw tag block (without the leading `@`), if present.
    pub tags: Option<&'a str>,
    /// Raw source (without the leading `:`), if present.
    pub source: Option<&'a str>,
    /// The command token as received.
    pub command: &'a str,
    /// Parameters, including the trailing one.
    pub params: Vec<&'a str>,
    /// Whether the last parameter was written in `:` trailing form.
    pub trailing: bool,
}

impl<'a> ParsedLine<'a> {
    /// Split a line, reporting the byte position of a failure.
    ///
    /// The only failure is a missing command token.
    pub fn parse(input: &'a str) -> Result<Self, usize> {
        match parse_line(input) {
            Ok((_remaining, line)) => Ok(line),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e
                .errors
                .first()
                .map_or(input.len(), |(at, _)| input.len() - at.len())),
            Err(nom::Err::Incomplete(_)) => Err(input.len()),
        }
    }
}
