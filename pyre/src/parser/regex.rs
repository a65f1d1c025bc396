use crate::parser::{ClassItem, ParsedRegex};
use nom::branch::alt;
use nom::character::complete;
use nom::character::complete::{anychar, none_of, one_of};
use nom::combinator::{map, opt, value, verify};
use nom::multi::{many0, many1, separated_list1};
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;

pub(crate) fn full_regex(input: &str) -> IResult<&str, ParsedRegex> {
    alternation(input.trim()) //trim instead of delimited since otherwise trailing w.s. can be counted as tokens
}

fn alternation(input: &str) -> IResult<&str, ParsedRegex> {
    map(
        separated_list1(complete::char('|'), intersection),
        wrap_multiple(ParsedRegex::Alt),
    )(input)
}

fn intersection(input: &str) -> IResult<&str, ParsedRegex> {
    map(
        separated_list1(complete::char('&'), complement),
        wrap_multiple(ParsedRegex::And),
    )(input)
}

// `~` binds looser than concatenation: `~ab` complements the whole of `ab`
fn complement(input: &str) -> IResult<&str, ParsedRegex> {
    alt((
        map(preceded(complete::char('~'), complement), |inner| {
            ParsedRegex::Not(Box::new(inner))
        }),
        sequence,
    ))(input)
}

fn sequence(input: &str) -> IResult<&str, ParsedRegex> {
    map(many1(repeat), wrap_multiple(ParsedRegex::Seq))(input)
}

fn wrap_multiple(
    f: impl Fn(Vec<ParsedRegex>) -> ParsedRegex,
) -> impl Fn(Vec<ParsedRegex>) -> ParsedRegex {
    move |mut items| {
        if items.len() > 1 {
            f(items)
        } else {
            items.remove(0)
        }
    }
}

fn repeat(input: &str) -> IResult<&str, ParsedRegex> {
    map(pair(atom, many0(one_of("*+?"))), |(atom, ops)| {
        ops.into_iter().fold(atom, |inner, op| match op {
            '*' => ParsedRegex::Star(Box::new(inner)),
            '+' => ParsedRegex::Plus(Box::new(inner)),
            '?' => ParsedRegex::Opt(Box::new(inner)),
            _ => unreachable!("one_of should only yield repetition operators"),
        })
    })(input)
}

fn atom(input: &str) -> IResult<&str, ParsedRegex> {
    alt((group, class, dot, escaped_char, normal_char))(input)
}

fn group(input: &str) -> IResult<&str, ParsedRegex> {
    map(
        delimited(complete::char('('), alternation, complete::char(')')),
        |inner| ParsedRegex::Group(Box::new(inner)),
    )(input)
}

fn class(input: &str) -> IResult<&str, ParsedRegex> {
    map(
        delimited(
            complete::char('['),
            pair(opt(complete::char('^')), many1(class_item)),
            complete::char(']'),
        ),
        |(negated, items)| ParsedRegex::Class {
            negated: negated.is_some(),
            items,
        },
    )(input)
}

fn class_item(input: &str) -> IResult<&str, ClassItem> {
    map(
        verify(
            pair(
                class_char,
                opt(preceded(complete::char('-'), class_char)),
            ),
            // An inverted range is an error, not two characters and a dash
            |(low, high)| match high {
                Some(high) => low <= high,
                None => true,
            },
        ),
        |(low, high)| match high {
            Some(high) => ClassItem::Range(low, high),
            None => ClassItem::Single(low),
        },
    )(input)
}

fn class_char(input: &str) -> IResult<&str, char> {
    alt((
        preceded(complete::char('\\'), map(anychar, unescape)),
        none_of("]\\"),
    ))(input)
}

fn dot(input: &str) -> IResult<&str, ParsedRegex> {
    value(ParsedRegex::Dot, complete::char('.'))(input)
}

fn escaped_char(input: &str) -> IResult<&str, ParsedRegex> {
    map(
        preceded(complete::char('\\'), map(anychar, unescape)),
        ParsedRegex::Char,
    )(input)
}

fn normal_char(input: &str) -> IResult<&str, ParsedRegex> {
    map(verify(anychar, |c| !is_reserved_char(*c)), ParsedRegex::Char)(input)
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}

fn is_reserved_char(c: char) -> bool {
    [
        '(', ')', '[', ']', '|', '&', '~', '*', '+', '?', '.', '\\',
    ]
    .contains(&c)
}
