//! Minimal BibTeX entry parser for DOI-resolver responses.
//!
//! Handles a single `@type{key, field = value, ...}` entry with braced
//! (nested), quoted, and bare values. The dx.doi.org content negotiation
//! contract is exactly one entry per response; anything else is an error.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::map,
};

use crate::error::{ResolveError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    pub entry_type: String,
    pub cite_key: String,
    pub fields: Vec<(String, String)>,
}

impl BibEntry {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Parse exactly one BibTeX entry out of `input`.
pub fn parse_entry(input: &str) -> Result<BibEntry> {
    let start = input
        .find('@')
        .ok_or_else(|| ResolveError::Parse("no BibTeX entry in response".to_string()))?;

    let (rest, entry) = entry(&input[start..])
        .map_err(|err| ResolveError::Parse(format!("malformed BibTeX entry: {err}")))?;

    if rest.contains('@') {
        return Err(ResolveError::Parse(
            "expected exactly one BibTeX entry".to_string(),
        ));
    }

    Ok(entry)
}

fn entry(input: &str) -> IResult<&str, BibEntry> {
    let (rest, _) = char('@')(input)?;
    let (rest, entry_type) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, cite_key) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || "_-:./+".contains(c))(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(',')(rest)?;
    let (rest, fields) = fields(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('}')(rest)?;

    Ok((
        rest,
        BibEntry {
            entry_type: entry_type.to_lowercase(),
            cite_key: cite_key.to_string(),
            fields,
        },
    ))
}

fn fields(input: &str) -> IResult<&str, Vec<(String, String)>> {
    let mut fields = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;
        if rest.starts_with('}') {
            return Ok((rest, fields));
        }

        match field(rest) {
            Ok((rest, entry)) => {
                fields.push(entry);
                let (rest, _) = multispace0(rest)?;
                remaining = rest.strip_prefix(',').unwrap_or(rest);
            }
            Err(_) => return Ok((remaining, fields)),
        }
    }
}

fn field(input: &str) -> IResult<&str, (String, String)> {
    let (rest, key) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = field_value(rest)?;

    Ok((rest, (key.to_lowercase(), value)))
}

fn field_value(input: &str) -> IResult<&str, String> {
    alt((
        braced_value,
        quoted_value,
        map(
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'),
            |s: &str| s.to_string(),
        ),
    ))(input)
}

/// Braced value with nested braces: `{Attention {I}s All You Need}`.
fn braced_value(input: &str) -> IResult<&str, String> {
    if !input.starts_with('{') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    let mut depth = 0usize;
    for (pos, byte) in input.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], input[1..pos].to_string()));
                }
            }
            _ => {}
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

fn quoted_value(input: &str) -> IResult<&str, String> {
    let (rest, _) = char('"')(input)?;
    let end = rest.find('"').ok_or_else(|| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Char))
    })?;
    Ok((&rest[end + 1..], rest[..end].to_string()))
}
