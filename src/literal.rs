//! Literal rendering of parameterized commands.
//!
//! Replaces every `@name` placeholder with the formatted value it is bound
//! to, keeping the name in a trailing comment:
//!
//! ```text
//! Age >= @Age_1   ──▶   Age >= 18 /* @Age_1 */
//! ```
//!
//! The output is meant for logs and audits; it is never executed.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::parser::{Segment, is_ident_char, segments};
use crate::transpiler::escape_string;
use crate::types::LiteralCategory;
use crate::value::{BoundValue, DATETIME_FORMAT, Value};

/// Renders commands with bound parameters substituted as literals.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralRenderer;

impl LiteralRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Literal text of one bound value.
    ///
    /// Tags without a formatting rule are written as quoted text.
    pub fn literal(&self, bound: &BoundValue) -> String {
        let category = match bound.type_tag.literal_category() {
            Some(category) => category,
            None => {
                tracing::debug!(tag = %bound.type_tag, "no literal rule for tag, quoting as text");
                LiteralCategory::QuotedEscaped
            }
        };
        format_literal(category, &bound.value)
    }

    /// Substitute every bound parameter into `command_text`.
    ///
    /// Names may be given with or without the leading `@`. A placeholder
    /// only matches a whole name, so `@id` never rewrites part of `@id2`.
    /// Placeholders inside string literals, quoted identifiers and comments
    /// are left alone, as are placeholders with no bound value.
    pub fn render<'a, K, I>(&self, command_text: &str, parameters: I) -> String
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, &'a BoundValue)>,
    {
        let mut bindings: Vec<(String, String)> = Vec::new();
        for (name, bound) in parameters {
            let name = name.as_ref().trim_start_matches('@');
            if name.is_empty() || bindings.iter().any(|(n, _)| n == name) {
                continue;
            }
            bindings.push((name.to_string(), self.literal(bound)));
        }
        // Longest names first, so a prefix never shadows a longer name.
        bindings.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut out = String::with_capacity(command_text.len());
        let mut substituted = 0usize;
        for segment in segments(command_text) {
            match segment {
                Segment::Opaque(text) => out.push_str(text),
                Segment::Code(code) => substituted += substitute(code, &bindings, &mut out),
            }
        }

        tracing::debug!(substituted, bound = bindings.len(), "rendered literal command");
        out
    }
}

/// Render with the default renderer.
pub fn render<'a, K, I>(command_text: &str, parameters: I) -> String
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, &'a BoundValue)>,
{
    LiteralRenderer::new().render(command_text, parameters)
}

fn substitute(code: &str, bindings: &[(String, String)], out: &mut String) -> usize {
    let mut count = 0;
    let mut rest = code;
    while let Some(at) = rest.find('@') {
        out.push_str(&rest[..at]);
        let after = &rest[at + 1..];

        // `me@id` is part of a word, not a placeholder.
        let glued = out.chars().next_back().is_some_and(is_ident_char);
        let matched = if glued {
            None
        } else {
            bindings.iter().find(|(name, _)| {
                after.starts_with(name.as_str())
                    && !after[name.len()..].chars().next().is_some_and(is_ident_char)
            })
        };

        match matched {
            Some((name, literal)) => {
                out.push_str(literal);
                out.push_str(" /* @");
                out.push_str(name);
                out.push_str(" */");
                rest = &after[name.len()..];
                count += 1;
            }
            None => {
                if after.starts_with(is_ident_char) {
                    let len = after.find(|c: char| !is_ident_char(c)).unwrap_or(after.len());
                    tracing::trace!(placeholder = &after[..len], "no bound value for placeholder");
                }
                out.push('@');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    count
}

/// Format a value according to a literal category.
///
/// `NULL` is written as-is in every category. A value that does not fit the
/// category (text bound to a number tag, for instance) is written as quoted
/// text.
pub fn format_literal(category: LiteralCategory, value: &Value) -> String {
    if value.is_null() {
        return "NULL".to_string();
    }

    let formatted = match category {
        LiteralCategory::QuotedEscaped => Some(escape_string(&value.to_string())),
        LiteralCategory::QuotedDateTime => match value {
            Value::DateTime(dt) => Some(format!("'{}'", dt.format(DATETIME_FORMAT))),
            _ => None,
        },
        LiteralCategory::FixedDecimal2 => match value {
            Value::Float(f) if f.is_finite() => Some(
                Decimal::from_f64(*f)
                    .map(fixed2)
                    .unwrap_or_else(|| format!("{:.2}", f)),
            ),
            Value::Decimal(d) => Some(fixed2(*d)),
            Value::Int(n) => Some(format!("{}.00", n)),
            _ => None,
        },
        LiteralCategory::RawNumber => match value {
            Value::Int(n) => Some(n.to_string()),
            Value::Decimal(d) => Some(d.to_string()),
            Value::Float(f) if f.is_finite() => Some(f.to_string()),
            Value::Bool(b) => Some(bool_digit(*b)),
            _ => None,
        },
        LiteralCategory::BoolDigit => match value {
            Value::Bool(b) => Some(bool_digit(*b)),
            Value::Int(n) => Some(bool_digit(*n != 0)),
            _ => None,
        },
    };

    formatted.unwrap_or_else(|| {
        tracing::warn!(%category, value = %value, "value does not fit literal category, quoting as text");
        escape_string(&value.to_string())
    })
}

fn fixed2(d: Decimal) -> String {
    format!("{:.2}", d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

fn bool_digit(b: bool) -> String {
    if b { "1" } else { "0" }.to_string()
}
