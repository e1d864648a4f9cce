//! Command line tokenizer
//!
//! Splits a shell-style command line into an argument vector: whitespace
//! separates words, single quotes are literal, double quotes honour `\\`,
//! `\"`, `\$` and `` \` `` escapes, and a bare backslash escapes the next
//! character. No expansion, globbing or redirection is performed.

use crate::domain::DomainError;
use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{anychar, char, multispace0, multispace1},
    combinator::{all_consuming, map},
    multi::{fold_many0, fold_many1, separated_list0},
    sequence::{delimited, preceded},
    IResult, Parser,
};

/// Parse a command line into its argument vector.
///
/// An empty or all-whitespace line yields an empty vector; callers decide
/// whether that is acceptable.
pub fn parse_command(line: &str) -> Result<Vec<String>, DomainError> {
    match all_consuming(words).parse(line) {
        Ok((_, argv)) => Ok(argv),
        Err(_) => Err(DomainError::InvalidCommand(format!(
            "unterminated quote or dangling escape in '{}'",
            line
        ))),
    }
}

fn words(input: &str) -> IResult<&str, Vec<String>> {
    delimited(multispace0, separated_list0(multispace1, word), multispace0).parse(input)
}

/// One word: adjacent quoted and unquoted pieces are concatenated
fn word(input: &str) -> IResult<&str, String> {
    fold_many1(
        alt((single_quoted, double_quoted, escaped_char, bare)),
        String::new,
        |mut acc, piece| {
            acc.push_str(&piece);
            acc
        },
    )
    .parse(input)
}

fn single_quoted(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

fn double_quoted(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        fold_many0(
            alt((
                map(preceded(char('\\'), anychar), |c| match c {
                    '\\' | '"' | '$' | '`' => c.to_string(),
                    other => format!("\\{}", other),
                }),
                map(take_while1(|c: char| c != '"' && c != '\\'), |s: &str| {
                    s.to_string()
                }),
            )),
            String::new,
            |mut acc, piece| {
                acc.push_str(&piece);
                acc
            },
        ),
        char('"'),
    )
    .parse(input)
}

fn escaped_char(input: &str) -> IResult<&str, String> {
    map(preceded(char('\\'), anychar), |c| c.to_string()).parse(input)
}

fn bare(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| !c.is_whitespace() && !matches!(c, '\'' | '"' | '\\')),
        |s: &str| s.to_string(),
    )
    .parse(input)
}
