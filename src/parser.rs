//! Small parsers built with nom.
//!
//! - command text → code and opaque segments (quoted text, comments)
//! - binding specs: `name[:type]=value`
//! - field specs: `Name:type[(size[,precision])]`

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{is_not, tag, take_till, take_until, take_while1},
    character::complete::{anychar, char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize, rest},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{CritError, CritResult};
use crate::field::FieldDescriptor;
use crate::types::{TypeMap, TypeTag};
use crate::value::{BoundValue, DATETIME_FORMAT, Value};

/// A piece of command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain SQL where placeholders may appear
    Code(&'a str),
    /// String literal, quoted identifier or comment; never substituted
    Opaque(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Code(s) | Segment::Opaque(s) => s,
        }
    }
}

/// Characters that may continue a parameter name.
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Split command text into code and opaque segments.
///
/// Adjacent code pieces are merged, so the output alternates between the
/// two kinds. Concatenating all segments yields the input unchanged.
pub fn segments(input: &str) -> Vec<Segment<'_>> {
    let (remaining, pieces) = match many0(segment)(input) {
        Ok(parsed) => parsed,
        Err(_) => (input, Vec::new()),
    };

    let mut out: Vec<Segment<'_>> = Vec::new();
    let mut code_start: Option<usize> = None;
    let mut offset = 0;
    for piece in pieces {
        let len = piece.as_str().len();
        match piece {
            Segment::Code(_) => {
                code_start.get_or_insert(offset);
            }
            Segment::Opaque(s) => {
                if let Some(start) = code_start.take() {
                    out.push(Segment::Code(&input[start..offset]));
                }
                out.push(Segment::Opaque(s));
            }
        }
        offset += len;
    }
    if let Some(start) = code_start {
        out.push(Segment::Code(&input[start..offset]));
    }
    if !remaining.is_empty() {
        out.push(Segment::Code(remaining));
    }
    out
}

fn segment(input: &str) -> IResult<&str, Segment<'_>> {
    alt((
        map(string_literal, Segment::Opaque),
        map(quoted_identifier, Segment::Opaque),
        map(block_comment, Segment::Opaque),
        map(line_comment, Segment::Opaque),
        map(take_while1(|c: char| !matches!(c, '\'' | '"' | '/' | '-')), Segment::Code),
        map(recognize(anychar), Segment::Code),
    ))(input)
}

/// `'...'` with `''` escapes; an unterminated literal runs to the end.
fn string_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        char('\''),
        many0(alt((tag("''"), is_not("'")))),
        opt(char('\'')),
    )))(input)
}

fn quoted_identifier(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        char('"'),
        alt((take_until("\""), rest)),
        opt(char('"')),
    )))(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        tag("/*"),
        alt((take_until("*/"), rest)),
        opt(tag("*/")),
    )))(input)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("--"), take_till(|c: char| c == '\n')))(input)
}

// ============================================================================
// Binding specs
// ============================================================================

/// A named value given on the command line: `Age_1:int32=18`.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingSpec {
    pub name: String,
    pub bound: BoundValue,
}

/// Parse `name[:type]=value`. Without a type, one is inferred from the text.
pub fn parse_binding(input: &str) -> CritResult<BindingSpec> {
    let spec = input.trim();
    let (value_text, (name, type_name)) = binding_head(spec)
        .map_err(|_| CritError::parse(0, format!("Expected 'name[:type]=value', got '{}'", spec)))?;

    let position = spec.len() - value_text.len();
    let name = name.trim_start_matches('@').to_string();
    let bound = match type_name {
        Some(type_name) => {
            let tag = TypeMap::tag_of_name(type_name);
            BoundValue::new(parse_value(tag, value_text, position)?, tag)
        }
        None => infer_value(value_text),
    };

    Ok(BindingSpec { name, bound })
}

fn binding_head(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (input, name) = take_while1(|c: char| c != ':' && c != '=' && !c.is_whitespace())(input)?;
    let (input, type_name) = opt(preceded(char(':'), take_while1(|c: char| c.is_alphanumeric())))(input)?;
    let (input, _) = char('=')(input)?;
    Ok((input, (name, type_name)))
}

/// Convert text to a value of the given tag. `null` is accepted for any tag.
pub fn parse_value(tag: TypeTag, text: &str, position: usize) -> CritResult<Value> {
    if text.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }
    let invalid = |what: &str| CritError::parse(position, format!("Invalid {} value: '{}'", what, text));

    let value = match tag {
        TypeTag::Bool => match text.to_ascii_lowercase().as_str() {
            "true" | "1" => Value::Bool(true),
            "false" | "0" => Value::Bool(false),
            _ => return Err(invalid("boolean")),
        },
        TypeTag::Int8 | TypeTag::Int16 | TypeTag::Int32 | TypeTag::Int64 => {
            Value::Int(text.parse().map_err(|_| invalid("integer"))?)
        }
        TypeTag::Float | TypeTag::Double => {
            Value::Float(text.parse().map_err(|_| invalid("floating point"))?)
        }
        TypeTag::Decimal => Value::Decimal(Decimal::from_str(text).map_err(|_| invalid("decimal"))?),
        TypeTag::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Value::Char(c),
                _ => return Err(invalid("char")),
            }
        }
        TypeTag::String => Value::String(text.to_string()),
        TypeTag::DateTime => Value::DateTime(parse_datetime(text).ok_or_else(|| invalid("datetime"))?),
        TypeTag::Guid => Value::Guid(Uuid::parse_str(text).map_err(|_| invalid("guid"))?),
        TypeTag::Binary => Value::Bytes(parse_hex(text).ok_or_else(|| invalid("hex"))?),
    };
    Ok(value)
}

fn infer_value(text: &str) -> BoundValue {
    if let Ok(n) = text.parse::<i64>() {
        BoundValue::new(n, TypeTag::Int64)
    } else if let Some(f) = text
        .parse::<f64>()
        .ok()
        .filter(|_| text.chars().any(|c| c.is_ascii_digit()))
    {
        BoundValue::new(f, TypeTag::Double)
    } else if text == "true" || text == "false" {
        BoundValue::new(text == "true", TypeTag::Bool)
    } else {
        BoundValue::new(text, TypeTag::String)
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    if digits.len() % 2 != 0 {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| digits.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}

// ============================================================================
// Field specs
// ============================================================================

/// Parse `Name:type`, `Name:type(size)` or `Name:type(size,precision)`.
pub fn parse_field(input: &str) -> CritResult<FieldDescriptor> {
    let spec = input.trim();
    match field_spec(spec) {
        Ok(("", field)) => Ok(field),
        Ok((remaining, _)) => Err(CritError::parse(
            spec.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(_) => Err(CritError::parse(
            0,
            format!("Expected 'Name:type[(size[,precision])]', got '{}'", spec),
        )),
    }
}

fn field_spec(input: &str) -> IResult<&str, FieldDescriptor> {
    let (input, name) = take_while1(|c: char| c != ':' && !c.is_whitespace())(input)?;
    let (input, _) = char(':')(input)?;
    let (input, type_name) = take_while1(|c: char| c.is_alphanumeric())(input)?;
    let (input, dims) = opt(delimited(
        pair(char('('), multispace0),
        pair(number, opt(preceded(tuple((multispace0, char(','), multispace0)), number))),
        pair(multispace0, char(')')),
    ))(input)?;

    let mut field = FieldDescriptor::new(name, TypeMap::tag_of_name(type_name));
    if let Some((size, precision)) = dims {
        field.size = Some(size);
        field.precision = precision;
    }
    Ok((input, field))
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>())(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_segments_round_trip() {
        let sql = "SELECT 'a''@x' AS \"@q\" /* @c */ FROM T -- @d\nWHERE id = @id";
        let segs = segments(sql);
        let joined: String = segs.iter().map(|s| s.as_str()).collect();
        assert_eq!(joined, sql);
    }

    #[test]
    fn test_segments_split_opaque_parts() {
        let segs = segments("a = @a AND b = 'x@b' /* @c */");
        assert_eq!(
            segs,
            vec![
                Segment::Code("a = @a AND b = "),
                Segment::Opaque("'x@b'"),
                Segment::Code(" "),
                Segment::Opaque("/* @c */"),
            ]
        );
    }

    #[test]
    fn test_segments_unterminated_literal() {
        let segs = segments("x = 'open @p");
        assert_eq!(segs, vec![Segment::Code("x = "), Segment::Opaque("'open @p")]);
    }

    #[test]
    fn test_segments_minus_and_slash_are_code() {
        let segs = segments("a - 1 / 2");
        assert_eq!(segs, vec![Segment::Code("a - 1 / 2")]);
    }

    #[test]
    fn test_parse_binding_with_type() {
        let b = parse_binding("@Age_1:int32=18").unwrap();
        assert_eq!(b.name, "Age_1");
        assert_eq!(b.bound, BoundValue::new(18i64, TypeTag::Int32));
    }

    #[test]
    fn test_parse_binding_inferred() {
        assert_eq!(parse_binding("id=5").unwrap().bound, BoundValue::new(5i64, TypeTag::Int64));
        assert_eq!(
            parse_binding("name=O'Brien").unwrap().bound,
            BoundValue::new("O'Brien", TypeTag::String)
        );
        assert_eq!(parse_binding("ok=true").unwrap().bound, BoundValue::new(true, TypeTag::Bool));
    }

    #[test]
    fn test_parse_binding_datetime_and_null() {
        let b = parse_binding("When:datetime=2024-03-05 14:07:09").unwrap();
        assert_eq!(b.bound.value.to_string(), "2024-03-05 14:07:09");
        let n = parse_binding("When:timestamp=NULL").unwrap();
        assert_eq!(n.bound, BoundValue::new(Value::Null, TypeTag::DateTime));
    }

    #[test]
    fn test_parse_binding_errors() {
        assert!(parse_binding("no-equals").is_err());
        match parse_binding("n:int32=abc") {
            Err(CritError::Parse { position, .. }) => assert_eq!(position, 8),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(parse_binding("c:char=ab").is_err());
    }

    #[test]
    fn test_parse_binary_hex() {
        let b = parse_binding("blob:binary=0xCAFE").unwrap();
        assert_eq!(b.bound.value, Value::Bytes(vec![0xCA, 0xFE]));
        assert!(parse_binding("blob:binary=ABC").is_err());
    }

    #[test]
    fn test_parse_field() {
        let f = parse_field("Price:decimal(15, 4)").unwrap();
        assert_eq!(f.host_type, TypeTag::Decimal);
        assert_eq!((f.size, f.precision), (Some(15), Some(4)));

        let f = parse_field("Name:varchar(40)").unwrap();
        assert_eq!(f.host_type, TypeTag::String);
        assert_eq!((f.size, f.precision), (Some(40), None));

        let f = parse_field("Active:bool").unwrap();
        assert_eq!(f.host_type, TypeTag::Bool);
    }

    #[test]
    fn test_parse_field_errors() {
        assert!(parse_field("NoType").is_err());
        match parse_field("Name:varchar(40) junk") {
            Err(CritError::Parse { position, .. }) => assert_eq!(position, 16),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
