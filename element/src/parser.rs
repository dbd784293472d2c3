use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::recognize,
    multi::many0,
    sequence::{delimited, pair, preceded},
};

use crate::Element;
use crate::error::Error;

/// Parses a whole document: an optional prolog, exactly one root element and
/// trailing comments or whitespace.
pub(crate) fn parse_document(src: &str) -> Result<Element, Error> {
    let reader = Reader { src };

    let (rest, _) = misc(src).map_err(|e| reader.nom_error(e))?;
    if rest.is_empty() {
        return Err(Error::Empty);
    }
    let (rest, element) = reader.element(rest)?;
    let (rest, _) = misc(rest).map_err(|e| reader.nom_error(e))?;
    if !rest.is_empty() {
        return Err(Error::TrailingContent(reader.offset(rest)));
    }
    Ok(element)
}

struct Reader<'a> {
    src: &'a str,
}

impl<'a> Reader<'a> {
    fn offset(&self, rest: &str) -> usize {
        self.src.len() - rest.len()
    }

    fn nom_error(&self, err: nom::Err<nom::error::Error<&str>>) -> Error {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => Error::Parser {
                kind: e.code,
                offset: self.offset(e.input),
            },
            // complete parsers never report Incomplete
            nom::Err::Incomplete(_) => Error::Parser {
                kind: nom::error::ErrorKind::Eof,
                offset: self.src.len(),
            },
        }
    }

    fn element(&self, input: &'a str) -> Result<(&'a str, Element), Error> {
        let (input, element_name) = preceded(char('<'), name)
            .parse(input)
            .map_err(|e| self.nom_error(e))?;
        let mut element = Element::new(element_name);

        let (input, attributes) = many0(attribute)
            .parse(input)
            .map_err(|e| self.nom_error(e))?;
        for (key, raw) in attributes {
            if element.attribute(key).is_some() {
                return Err(Error::DuplicateAttribute {
                    element: element_name.to_string(),
                    attribute: key.to_string(),
                });
            }
            element.set_attribute(key, unescape(raw)?);
        }

        let (input, _) = multispace0(input).map_err(|e| self.nom_error(e))?;
        if let Ok((rest, _)) = empty_element_end(input) {
            return Ok((rest, element));
        }
        let (mut input, _) = char('>')
            .parse(input)
            .map_err(|e| self.nom_error(e))?;

        loop {
            let (rest, _) = content(input).map_err(|e| self.nom_error(e))?;
            input = rest;

            if input.is_empty() {
                return Err(Error::UnexpectedEnd(element_name.to_string()));
            }
            if input.starts_with("</") {
                let (rest, closing) = end_tag(input).map_err(|e| self.nom_error(e))?;
                if closing != element_name {
                    return Err(Error::MismatchedTag {
                        expected: element_name.to_string(),
                        found: closing.to_string(),
                        offset: self.offset(input),
                    });
                }
                return Ok((rest, element));
            }

            let (rest, child) = self.element(input)?;
            element.push_child(child);
            input = rest;
        }
    }
}

fn name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_' || c == ':'),
        take_while(|c: char| c.is_alphanumeric() || matches!(c, '_' | ':' | '.' | '-')),
    ))
    .parse(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
    ))
    .parse(input)
}

fn attribute(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, _) = multispace1(input)?;
    let (input, key) = name(input)?;
    let (input, _) = (multispace0, char('='), multispace0).parse(input)?;
    let (input, value) = quoted(input)?;
    Ok((input, (key, value)))
}

fn empty_element_end(input: &str) -> IResult<&str, &str> {
    tag("/>").parse(input)
}

fn end_tag(input: &str) -> IResult<&str, &str> {
    delimited(tag("</"), name, pair(multispace0, char('>'))).parse(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("<!--"), take_until("-->"), tag("-->")).parse(input)
}

fn processing_instruction(input: &str) -> IResult<&str, &str> {
    delimited(tag("<?"), take_until("?>"), tag("?>")).parse(input)
}

fn doctype(input: &str) -> IResult<&str, &str> {
    delimited(tag("<!DOCTYPE"), take_until(">"), char('>')).parse(input)
}

fn cdata(input: &str) -> IResult<&str, &str> {
    delimited(tag("<![CDATA["), take_until("]]>"), tag("]]>")).parse(input)
}

fn text(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != '<').parse(input)
}

/// Whitespace, comments and declarations around the root element.
fn misc(input: &str) -> IResult<&str, ()> {
    let (input, _) =
        many0(alt((multispace1, comment, processing_instruction, doctype))).parse(input)?;
    Ok((input, ()))
}

/// Everything inside an element that is not a child element or an end tag.
/// Character data is not part of the element model and is dropped.
fn content(input: &str) -> IResult<&str, ()> {
    let (input, _) = many0(alt((comment, processing_instruction, cdata, text))).parse(input)?;
    Ok((input, ()))
}

fn unescape(raw: &str) -> Result<String, Error> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let end = after
            .find(';')
            .ok_or_else(|| Error::InvalidEntity(after.chars().take(8).collect()))?;
        let entity = &after[..end];
        let c = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => numeric_reference(entity).ok_or_else(|| Error::InvalidEntity(entity.to_string()))?,
        };
        out.push(c);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn numeric_reference(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}
