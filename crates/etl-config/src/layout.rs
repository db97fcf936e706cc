//! Log line layouts named by `logs_formatter`.
//!
//! The value is either one of the built-in keywords (`full`, `compact`,
//! `json`) or a line template. Templates take `%(field)s` placeholders
//! with an optional `-` and width (`%(levelname)-8s`), or `{field}`
//! placeholders with an optional `<`/`>` width (`{levelname:<8}`).
//! `%%`, `{{` and `}}` escape the markers.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout is empty")]
    Empty,

    #[error("unknown placeholder '{name}'")]
    UnknownField { name: String },

    #[error("unterminated placeholder at byte {position}")]
    Unterminated { position: usize },

    #[error("unsupported conversion '%{found}' at byte {position}")]
    BadConversion { found: char, position: usize },

    #[error("invalid width '{spec}' at byte {position}")]
    BadWidth { spec: String, position: usize },

    #[error("unmatched '}}' at byte {position}")]
    UnmatchedBrace { position: usize },
}

/// Event data a template can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    /// `asctime`: timestamp rendered with `time_formatter`.
    Time,
    /// `levelname`: `ERROR`, `WARNING`, `INFO`, `DEBUG` or `TRACE`.
    Level,
    /// `name`: the event target.
    Target,
    /// `message`: the message followed by the event's fields.
    Message,
    Module,
    File,
    Line,
}

impl LineField {
    fn from_name(name: &str) -> Result<Self, LayoutError> {
        match name.trim() {
            "asctime" | "time" => Ok(LineField::Time),
            "levelname" | "level" => Ok(LineField::Level),
            "name" | "target" => Ok(LineField::Target),
            "message" => Ok(LineField::Message),
            "module" => Ok(LineField::Module),
            "filename" => Ok(LineField::File),
            "lineno" => Ok(LineField::Line),
            other => Err(LayoutError::UnknownField {
                name: other.to_string(),
            }),
        }
    }
}

/// Minimum width of a rendered field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub width: usize,
    /// Pad on the right instead of the left.
    pub left_align: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field {
        field: LineField,
        padding: Option<Padding>,
    },
}

/// A parsed line template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTemplate {
    segments: Vec<Segment>,
}

impl LineTemplate {
    pub fn parse(template: &str) -> Result<Self, LayoutError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((position, c)) = chars.next() {
            match c {
                '%' => match chars.next() {
                    Some((_, '%')) => literal.push('%'),
                    Some((_, '(')) => {
                        let name = take_until(&mut chars, ')')
                            .ok_or(LayoutError::Unterminated { position })?;
                        let padding = take_percent_padding(&mut chars);
                        match chars.next() {
                            Some((_, 's' | 'd')) => {}
                            Some((_, found)) => {
                                return Err(LayoutError::BadConversion { found, position });
                            }
                            None => return Err(LayoutError::Unterminated { position }),
                        }
                        flush_literal(&mut literal, &mut segments);
                        segments.push(Segment::Field {
                            field: LineField::from_name(&name)?,
                            padding,
                        });
                    }
                    Some((_, found)) => {
                        return Err(LayoutError::BadConversion { found, position });
                    }
                    None => return Err(LayoutError::Unterminated { position }),
                },
                '{' => {
                    if chars.next_if(|&(_, next)| next == '{').is_some() {
                        literal.push('{');
                        continue;
                    }
                    let spec = take_until(&mut chars, '}')
                        .ok_or(LayoutError::Unterminated { position })?;
                    flush_literal(&mut literal, &mut segments);
                    segments.push(brace_field(&spec, position)?);
                }
                '}' => {
                    if chars.next_if(|&(_, next)| next == '}').is_none() {
                        return Err(LayoutError::UnmatchedBrace { position });
                    }
                    literal.push('}');
                }
                other => literal.push(other),
            }
        }
        flush_literal(&mut literal, &mut segments);
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

fn flush_literal(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn take_until(chars: &mut Peekable<CharIndices<'_>>, end: char) -> Option<String> {
    let mut taken = String::new();
    for (_, c) in chars.by_ref() {
        if c == end {
            return Some(taken);
        }
        taken.push(c);
    }
    None
}

// `%(name)-8s` pads on the right, `%(name)8s` on the left.
fn take_percent_padding(chars: &mut Peekable<CharIndices<'_>>) -> Option<Padding> {
    let left_align = chars.next_if(|&(_, c)| c == '-').is_some();
    let mut width = None;
    while let Some((_, digit)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
        let value = usize::from(digit as u8 - b'0');
        width = Some(width.unwrap_or(0usize).saturating_mul(10).saturating_add(value));
    }
    width.map(|width| Padding { width, left_align })
}

// `{name:<8}` and `{name:8}` pad on the right, `{name:>8}` on the left.
fn brace_field(spec: &str, position: usize) -> Result<Segment, LayoutError> {
    let (name, format) = spec.split_once(':').unwrap_or((spec, ""));
    let field = LineField::from_name(name)?;
    if format.is_empty() {
        return Ok(Segment::Field {
            field,
            padding: None,
        });
    }
    let (left_align, digits) = match format.strip_prefix('>') {
        Some(rest) => (false, rest),
        None => (true, format.strip_prefix('<').unwrap_or(format)),
    };
    let width = digits.parse().map_err(|_| LayoutError::BadWidth {
        spec: format.to_string(),
        position,
    })?;
    Ok(Segment::Field {
        field,
        padding: Some(Padding { width, left_align }),
    })
}

/// What `logs_formatter` selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLayout {
    /// Timestamp, level, span context, target and message.
    Full,
    /// Shorter single-line layout.
    Compact,
    /// One JSON object per line.
    Json,
    Template(LineTemplate),
}

impl LogLayout {
    pub fn parse(value: &str) -> Result<Self, LayoutError> {
        match value.trim() {
            "" => Err(LayoutError::Empty),
            "full" => Ok(LogLayout::Full),
            "compact" => Ok(LogLayout::Compact),
            "json" => Ok(LogLayout::Json),
            _ => LineTemplate::parse(value).map(LogLayout::Template),
        }
    }
}
