//! Vector source extraction
//!
//! Turns raw vector file text into canonical [`PathSegment`] sequences.
//! SVG sources are scanned in a single pass over the document so that
//! output segment order always matches the order primitives appear in the
//! source. Supported elements: `<path>`, `<rect>`, `<circle>`,
//! `<ellipse>`.
//!
//! Extraction is best-effort: when structural parsing cannot proceed the
//! result still carries every segment recovered up to that point, with the
//! error alongside it.
//!
//! DXF is recognized as a format but extraction of its entities is a stub.

use crate::path::PathSegment;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use vinylkit_core::ExtractError;

/// Supported vector source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    /// SVG (Scalable Vector Graphics)
    Svg,
    /// DXF (Drawing Exchange Format)
    Dxf,
}

impl FileFormat {
    /// Resolve a format from a file-extension hint.
    ///
    /// Accepts the extension with or without a leading dot, in any case.
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "svg" => Some(FileFormat::Svg),
            "dxf" => Some(FileFormat::Dxf),
            _ => None,
        }
    }
}

/// Tunable extraction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Number of line samples used to approximate a circle or ellipse.
    /// Trades fidelity for instruction count.
    pub circle_segments: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            circle_segments: 36,
        }
    }
}

/// Result of one extraction pass.
///
/// Malformed input does not discard progress: `segments` holds everything
/// recovered before the parser stopped, and `error` says why it stopped.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Recovered path segments, in source order.
    pub segments: Vec<PathSegment>,
    /// Set when structural parsing could not complete.
    pub error: Option<ExtractError>,
}

impl Extraction {
    /// True when the whole source parsed cleanly.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Extract path segments from vector source text.
///
/// Fails with [`ExtractError::UnsupportedFormat`] when the hint names no
/// supported format. Malformed sources are reported through
/// [`Extraction::error`] instead, so partial progress survives.
pub fn extract(
    source: &str,
    format_hint: &str,
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let format = FileFormat::from_hint(format_hint).ok_or_else(|| {
        ExtractError::UnsupportedFormat {
            hint: format_hint.to_string(),
        }
    })?;

    match format {
        FileFormat::Svg => Ok(extract_svg(source, options)),
        FileFormat::Dxf => Ok(extract_dxf(source)),
    }
}

fn extract_dxf(_source: &str) -> Extraction {
    // TODO: wire up a real DXF entity reader; only the format hint is
    // recognized today and sources extract to nothing.
    tracing::warn!("DXF extraction is a stub; no entities converted");
    Extraction {
        segments: Vec::new(),
        error: None,
    }
}

/// Walk SVG tags in document order and emit segments for each supported
/// element as it is encountered.
fn extract_svg(source: &str, options: &ExtractOptions) -> Extraction {
    if !source.contains("<svg") {
        return Extraction {
            segments: Vec::new(),
            error: Some(ExtractError::MalformedSource {
                reason: "missing <svg> element".to_string(),
            }),
        };
    }

    let mut segments = Vec::new();
    let mut pos = 0usize;

    while let Some(offset) = source[pos..].find('<') {
        let tag_start = pos + offset;
        let rest = &source[tag_start..];
        let Some(tag_end) = rest.find('>') else {
            return Extraction {
                segments,
                error: Some(ExtractError::MalformedSource {
                    reason: format!("unterminated tag at byte {}", tag_start),
                }),
            };
        };
        let tag = &rest[..tag_end];

        match tag_name(tag) {
            "path" => match attr_str(tag, "d") {
                Some(d) => {
                    if let Err(reason) = parse_path_data(d, &mut segments) {
                        return Extraction {
                            segments,
                            error: Some(ExtractError::MalformedSource { reason }),
                        };
                    }
                }
                None if tag.contains(" d=\"") => {
                    return Extraction {
                        segments,
                        error: Some(ExtractError::MalformedSource {
                            reason: "unterminated d attribute on <path>".to_string(),
                        }),
                    };
                }
                None => {}
            },
            "rect" => {
                let x = attr_f64(tag, "x").unwrap_or(0.0);
                let y = attr_f64(tag, "y").unwrap_or(0.0);
                let width = attr_f64(tag, "width").unwrap_or(0.0);
                let height = attr_f64(tag, "height").unwrap_or(0.0);
                if width > 0.0 && height > 0.0 {
                    segments.extend(rect_segments(x, y, width, height));
                }
            }
            "circle" => {
                let cx = attr_f64(tag, "cx").unwrap_or(0.0);
                let cy = attr_f64(tag, "cy").unwrap_or(0.0);
                let r = attr_f64(tag, "r").unwrap_or(0.0);
                if r > 0.0 {
                    segments.extend(ellipse_segments(cx, cy, r, r, options.circle_segments));
                }
            }
            "ellipse" => {
                let cx = attr_f64(tag, "cx").unwrap_or(0.0);
                let cy = attr_f64(tag, "cy").unwrap_or(0.0);
                let rx = attr_f64(tag, "rx").unwrap_or(0.0);
                let ry = attr_f64(tag, "ry").unwrap_or(0.0);
                if rx > 0.0 && ry > 0.0 {
                    segments.extend(ellipse_segments(cx, cy, rx, ry, options.circle_segments));
                }
            }
            _ => {}
        }

        pos = tag_start + tag_end + 1;
    }

    Extraction {
        segments,
        error: None,
    }
}

/// Element name of a tag slice that starts with `<` (closing `>` excluded).
fn tag_name(tag: &str) -> &str {
    let body = &tag[1..];
    let end = body
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(body.len());
    &body[..end]
}

/// Extract a double-quoted attribute value from a tag slice.
fn attr_str<'a>(tag: &'a str, attr: &str) -> Option<&'a str> {
    let pattern = format!(" {}=\"", attr);
    let start = tag.find(&pattern)?;
    let value_start = start + pattern.len();
    let end = tag[value_start..].find('"')?;
    Some(&tag[value_start..value_start + end])
}

fn attr_f64(tag: &str, attr: &str) -> Option<f64> {
    attr_str(tag, attr).and_then(|s| s.trim().parse().ok())
}

/// Four corners, closing implicitly back to the start.
fn rect_segments(x: f64, y: f64, width: f64, height: f64) -> [PathSegment; 5] {
    [
        PathSegment::MoveTo { x, y },
        PathSegment::LineTo { x: x + width, y },
        PathSegment::LineTo {
            x: x + width,
            y: y + height,
        },
        PathSegment::LineTo { x, y: y + height },
        PathSegment::ClosePath,
    ]
}

/// Polygonal approximation starting at angle 0, sampled at `i/n * 2π` so
/// the final sample lands back on the start point.
fn ellipse_segments(cx: f64, cy: f64, rx: f64, ry: f64, n: usize) -> Vec<PathSegment> {
    let n = n.max(3);
    let mut segments = Vec::with_capacity(n + 2);
    segments.push(PathSegment::MoveTo { x: cx + rx, y: cy });
    for i in 1..=n {
        let angle = (i as f64 / n as f64) * TAU;
        segments.push(PathSegment::LineTo {
            x: cx + rx * angle.cos(),
            y: cy + ry * angle.sin(),
        });
    }
    segments.push(PathSegment::ClosePath);
    segments
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PathToken {
    Command(char),
    Number(f64),
}

fn flush_number(buffer: &mut String, tokens: &mut Vec<PathToken>) -> Result<(), String> {
    if buffer.is_empty() {
        return Ok(());
    }
    let value: f64 = buffer
        .parse()
        .map_err(|_| format!("invalid number '{}' in path data", buffer))?;
    tokens.push(PathToken::Number(value));
    buffer.clear();
    Ok(())
}

/// Split SVG path data into command letters and numbers.
///
/// Handles the compact forms the grammar allows: comma or whitespace
/// separators, a sign or a second decimal point starting a new number, and
/// exponents.
fn tokenize_path_data(data: &str) -> Result<Vec<PathToken>, String> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();

    for c in data.chars() {
        match c {
            '0'..='9' => buffer.push(c),
            '.' => {
                if buffer.contains('.') {
                    flush_number(&mut buffer, &mut tokens)?;
                }
                buffer.push(c);
            }
            '+' | '-' => {
                if buffer.ends_with('e') || buffer.ends_with('E') {
                    buffer.push(c);
                } else {
                    flush_number(&mut buffer, &mut tokens)?;
                    buffer.push(c);
                }
            }
            'e' | 'E' if !buffer.is_empty() => buffer.push(c),
            c if c.is_ascii_alphabetic() => {
                flush_number(&mut buffer, &mut tokens)?;
                tokens.push(PathToken::Command(c));
            }
            ',' | ' ' | '\t' | '\n' | '\r' => flush_number(&mut buffer, &mut tokens)?,
            other => return Err(format!("unexpected character '{}' in path data", other)),
        }
    }
    flush_number(&mut buffer, &mut tokens)?;

    Ok(tokens)
}

/// Decode path data token-by-token into canonical segments.
///
/// Relative coordinate forms and the H/V shorthands normalize to absolute
/// `MoveTo`/`LineTo` against a tracked current point. Segments are pushed
/// into `out` as they decode, so partial progress survives an error.
fn parse_path_data(data: &str, out: &mut Vec<PathSegment>) -> Result<(), String> {
    let tokens = tokenize_path_data(data)?;
    let mut index = 0usize;

    // Current point, subpath start, and the previous control point for the
    // smooth S/T forms.
    let mut current = (0.0f64, 0.0f64);
    let mut subpath_start = (0.0f64, 0.0f64);
    let mut prev_cubic_ctrl: Option<(f64, f64)> = None;
    let mut prev_quad_ctrl: Option<(f64, f64)> = None;

    fn next_number(tokens: &[PathToken], index: &mut usize) -> Option<f64> {
        match tokens.get(*index) {
            Some(PathToken::Number(value)) => {
                *index += 1;
                Some(*value)
            }
            _ => None,
        }
    }

    fn peek_number(tokens: &[PathToken], index: usize) -> bool {
        matches!(tokens.get(index), Some(PathToken::Number(_)))
    }

    while index < tokens.len() {
        let PathToken::Command(command) = tokens[index] else {
            return Err("expected path command, found a bare number".to_string());
        };
        index += 1;
        let relative = command.is_ascii_lowercase();

        match command.to_ascii_uppercase() {
            'M' => {
                let mut first = true;
                while peek_number(&tokens, index) {
                    let x = next_number(&tokens, &mut index)
                        .ok_or_else(|| "incomplete parameters for 'M'".to_string())?;
                    let y = next_number(&tokens, &mut index)
                        .ok_or_else(|| "incomplete parameters for 'M'".to_string())?;
                    let (x, y) = if relative {
                        (current.0 + x, current.1 + y)
                    } else {
                        (x, y)
                    };
                    if first {
                        out.push(PathSegment::MoveTo { x, y });
                        subpath_start = (x, y);
                        first = false;
                    } else {
                        // Extra coordinate pairs after a moveto are implicit
                        // linetos.
                        out.push(PathSegment::LineTo { x, y });
                    }
                    current = (x, y);
                }
                if first {
                    return Err("missing coordinates after 'M'".to_string());
                }
                prev_cubic_ctrl = None;
                prev_quad_ctrl = None;
            }
            'L' => {
                let mut any = false;
                while peek_number(&tokens, index) {
                    let x = next_number(&tokens, &mut index)
                        .ok_or_else(|| "incomplete parameters for 'L'".to_string())?;
                    let y = next_number(&tokens, &mut index)
                        .ok_or_else(|| "incomplete parameters for 'L'".to_string())?;
                    let (x, y) = if relative {
                        (current.0 + x, current.1 + y)
                    } else {
                        (x, y)
                    };
                    out.push(PathSegment::LineTo { x, y });
                    current = (x, y);
                    any = true;
                }
                if !any {
                    return Err("missing coordinates after 'L'".to_string());
                }
                prev_cubic_ctrl = None;
                prev_quad_ctrl = None;
            }
            'H' => {
                let mut any = false;
                while let Some(value) = next_number(&tokens, &mut index) {
                    let x = if relative { current.0 + value } else { value };
                    out.push(PathSegment::LineTo { x, y: current.1 });
                    current.0 = x;
                    any = true;
                }
                if !any {
                    return Err("missing coordinate after 'H'".to_string());
                }
                prev_cubic_ctrl = None;
                prev_quad_ctrl = None;
            }
            'V' => {
                let mut any = false;
                while let Some(value) = next_number(&tokens, &mut index) {
                    let y = if relative { current.1 + value } else { value };
                    out.push(PathSegment::LineTo { x: current.0, y });
                    current.1 = y;
                    any = true;
                }
                if !any {
                    return Err("missing coordinate after 'V'".to_string());
                }
                prev_cubic_ctrl = None;
                prev_quad_ctrl = None;
            }
            'C' => {
                let mut any = false;
                while peek_number(&tokens, index) {
                    let mut params = [0.0f64; 6];
                    for slot in params.iter_mut() {
                        *slot = next_number(&tokens, &mut index)
                            .ok_or_else(|| "incomplete parameters for 'C'".to_string())?;
                    }
                    let [cp1x, cp1y, cp2x, cp2y, x, y] = if relative {
                        [
                            current.0 + params[0],
                            current.1 + params[1],
                            current.0 + params[2],
                            current.1 + params[3],
                            current.0 + params[4],
                            current.1 + params[5],
                        ]
                    } else {
                        params
                    };
                    out.push(PathSegment::CubicCurveTo {
                        cp1x,
                        cp1y,
                        cp2x,
                        cp2y,
                        x,
                        y,
                    });
                    prev_cubic_ctrl = Some((cp2x, cp2y));
                    current = (x, y);
                    any = true;
                }
                if !any {
                    return Err("missing coordinates after 'C'".to_string());
                }
                prev_quad_ctrl = None;
            }
            'S' => {
                let mut any = false;
                while peek_number(&tokens, index) {
                    let mut params = [0.0f64; 4];
                    for slot in params.iter_mut() {
                        *slot = next_number(&tokens, &mut index)
                            .ok_or_else(|| "incomplete parameters for 'S'".to_string())?;
                    }
                    let [cp2x, cp2y, x, y] = if relative {
                        [
                            current.0 + params[0],
                            current.1 + params[1],
                            current.0 + params[2],
                            current.1 + params[3],
                        ]
                    } else {
                        params
                    };
                    // First control point reflects the previous one, or
                    // degenerates to the current point.
                    let (cp1x, cp1y) = match prev_cubic_ctrl {
                        Some((px, py)) => (2.0 * current.0 - px, 2.0 * current.1 - py),
                        None => current,
                    };
                    out.push(PathSegment::CubicCurveTo {
                        cp1x,
                        cp1y,
                        cp2x,
                        cp2y,
                        x,
                        y,
                    });
                    prev_cubic_ctrl = Some((cp2x, cp2y));
                    current = (x, y);
                    any = true;
                }
                if !any {
                    return Err("missing coordinates after 'S'".to_string());
                }
                prev_quad_ctrl = None;
            }
            'Q' => {
                let mut any = false;
                while peek_number(&tokens, index) {
                    let mut params = [0.0f64; 4];
                    for slot in params.iter_mut() {
                        *slot = next_number(&tokens, &mut index)
                            .ok_or_else(|| "incomplete parameters for 'Q'".to_string())?;
                    }
                    let [cpx, cpy, x, y] = if relative {
                        [
                            current.0 + params[0],
                            current.1 + params[1],
                            current.0 + params[2],
                            current.1 + params[3],
                        ]
                    } else {
                        params
                    };
                    out.push(PathSegment::QuadCurveTo { cpx, cpy, x, y });
                    prev_quad_ctrl = Some((cpx, cpy));
                    current = (x, y);
                    any = true;
                }
                if !any {
                    return Err("missing coordinates after 'Q'".to_string());
                }
                prev_cubic_ctrl = None;
            }
            'T' => {
                let mut any = false;
                while peek_number(&tokens, index) {
                    let x = next_number(&tokens, &mut index)
                        .ok_or_else(|| "incomplete parameters for 'T'".to_string())?;
                    let y = next_number(&tokens, &mut index)
                        .ok_or_else(|| "incomplete parameters for 'T'".to_string())?;
                    let (x, y) = if relative {
                        (current.0 + x, current.1 + y)
                    } else {
                        (x, y)
                    };
                    let (cpx, cpy) = match prev_quad_ctrl {
                        Some((px, py)) => (2.0 * current.0 - px, 2.0 * current.1 - py),
                        None => current,
                    };
                    out.push(PathSegment::QuadCurveTo { cpx, cpy, x, y });
                    prev_quad_ctrl = Some((cpx, cpy));
                    current = (x, y);
                    any = true;
                }
                if !any {
                    return Err("missing coordinates after 'T'".to_string());
                }
                prev_cubic_ctrl = None;
            }
            'Z' => {
                out.push(PathSegment::ClosePath);
                current = subpath_start;
                prev_cubic_ctrl = None;
                prev_quad_ctrl = None;
            }
            other => {
                return Err(format!("unsupported path command '{}'", other));
            }
        }
    }

    Ok(())
}
