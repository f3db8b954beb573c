//! Loosely-structured JSON extraction from provider text.
//!
//! Providers wrap JSON in prose, markdown fences, comments and trailing
//! commas. [`parse_structured_response`] tries increasingly lenient
//! strategies until one yields a value that deserializes into `T`:
//!
//! ```text
//! 1. Direct      the whole (trimmed) text
//! 2. Fenced      each ```json / ```plan / bare ``` block
//! 3. BraceScan   each balanced {...} or [...] span, string-aware
//! 4. Repair      heuristic fix-ups of the most likely span, then 1 and 3 again
//! ```

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Strategy that produced (or last failed to produce) a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Direct,
    Fenced,
    BraceScan,
    Repair,
}

impl ParseStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            ParseStrategy::Direct => "direct",
            ParseStrategy::Fenced => "fenced",
            ParseStrategy::BraceScan => "brace_scan",
            ParseStrategy::Repair => "repair",
        }
    }
}

impl std::fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Response was empty")]
    Empty,

    #[error("No structured value found in response ({strategy}: {message})")]
    Unparseable {
        strategy: ParseStrategy,
        message: String,
    },
}

/// Parse `text` into `T` using the layered strategies described above.
pub fn parse_structured_response<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut last = (ParseStrategy::Direct, String::from("no candidate"));

    match serde_json::from_str::<T>(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => last = (ParseStrategy::Direct, e.to_string()),
    }

    for block in fenced_blocks(trimmed) {
        match serde_json::from_str::<T>(block.trim()) {
            Ok(value) => return Ok(value),
            Err(e) => last = (ParseStrategy::Fenced, e.to_string()),
        }
    }

    if let Some(result) = try_brace_scan::<T>(trimmed, &mut last, ParseStrategy::BraceScan) {
        return Ok(result);
    }

    let repaired = repair_json(repair_candidate(trimmed));
    match serde_json::from_str::<T>(repaired.trim()) {
        Ok(value) => return Ok(value),
        Err(e) => last = (ParseStrategy::Repair, e.to_string()),
    }
    if let Some(result) = try_brace_scan::<T>(&repaired, &mut last, ParseStrategy::Repair) {
        return Ok(result);
    }

    Err(ParseError::Unparseable {
        strategy: last.0,
        message: last.1,
    })
}

fn try_brace_scan<T: DeserializeOwned>(
    text: &str,
    last: &mut (ParseStrategy, String),
    strategy: ParseStrategy,
) -> Option<T> {
    for span in balanced_spans(text) {
        match serde_json::from_str::<T>(span) {
            Ok(value) => return Some(value),
            Err(e) => *last = (strategy, e.to_string()),
        }
    }
    None
}

/// Remove a surrounding markdown fence, if any.
///
/// Returns the content of the first fenced block, or the trimmed input when
/// there is none.
pub fn strip_code_fences(text: &str) -> String {
    match fenced_blocks(text).into_iter().next() {
        Some(block) => block.trim_matches('\n').to_string(),
        None => text.trim().to_string(),
    }
}

/// Contents of every ``` fenced block, with the info string dropped.
///
/// An unterminated final fence runs to the end of the text.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("```") {
        let after_ticks = &rest[open + 3..];
        // Info string (json, plan, js...) ends at the first newline
        let body_start = after_ticks.find('\n').map(|i| i + 1).unwrap_or(after_ticks.len());
        let body = &after_ticks[body_start..];
        match body.find("```") {
            Some(close) => {
                blocks.push(&body[..close]);
                rest = &body[close + 3..];
            }
            None => {
                if !body.trim().is_empty() {
                    blocks.push(body);
                }
                break;
            }
        }
    }

    blocks
}

/// Index of the bracket closing the one at `start`, ignoring brackets inside
/// string literals.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Every balanced `{...}`/`[...]` span, in order of its opening bracket.
fn balanced_spans(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| matches!(b, b'{' | b'['))
        .filter_map(|(start, _)| balanced_end(bytes, start).map(|end| &text[start..=end]))
        .collect()
}

/// The part of the text most likely to be the intended JSON.
fn repair_candidate(text: &str) -> &str {
    if let Some(block) = fenced_blocks(text).into_iter().next() {
        return block;
    }
    match text.find(['{', '[']) {
        Some(start) => &text[start..],
        None => text,
    }
}

fn drop_trailing_comma(out: &mut String) {
    let len = out.trim_end().len();
    if out[..len].ends_with(',') {
        out.truncate(len - 1);
    }
}

/// Heuristic fix-ups for almost-JSON.
///
/// Normalizes smart quotes, strips `//` and `/* */` comments outside strings,
/// removes trailing commas, drops unmatched closers and appends missing ones.
pub fn repair_json(input: &str) -> String {
    let chars: Vec<char> = input
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            _ => c,
        })
        .collect();

    let mut out = String::with_capacity(input.len());
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
                continue;
            }
            '{' => {
                closers.push('}');
                out.push(c);
            }
            '[' => {
                closers.push(']');
                out.push(c);
            }
            '}' | ']' => {
                if closers.last() == Some(&c) {
                    drop_trailing_comma(&mut out);
                    closers.pop();
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }

    if in_string {
        out.push('"');
    }
    while let Some(closer) = closers.pop() {
        drop_trailing_comma(&mut out);
        out.push(closer);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{Value, json};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_direct() {
        let v: Value = parse_structured_response(r#"{"a": 1}"#).unwrap();
        assert_eq!(v, json!({"a": 1}));
    }

    #[test]
    fn test_fenced_block() {
        let text = "Here you go:\n```json\n{\"name\": \"todo\"}\n```\nEnjoy!";
        let n: Named = parse_structured_response(text).unwrap();
        assert_eq!(n.name, "todo");

        let plan = "```plan\n{\"steps\": []}\n```";
        let v: Value = parse_structured_response(plan).unwrap();
        assert_eq!(v, json!({"steps": []}));
    }

    #[test]
    fn test_brace_scan_skips_non_matching_spans() {
        let text = r#"I considered {this} but the answer is {"name": "notes"} okay"#;
        let n: Named = parse_structured_response(text).unwrap();
        assert_eq!(n.name, "notes");
    }

    #[test]
    fn test_brace_scan_ignores_braces_in_strings() {
        let text = r#"result: {"name": "a } tricky { name"} trailing"#;
        let n: Named = parse_structured_response(text).unwrap();
        assert_eq!(n.name, "a } tricky { name");
    }

    #[test]
    fn test_repair_trailing_commas_and_comments() {
        let text = "{\n  \"name\": \"calc\", // the name\n  \"tags\": [\"a\", \"b\",],\n}";
        let v: Value = parse_structured_response(text).unwrap();
        assert_eq!(v, json!({"name": "calc", "tags": ["a", "b"]}));
    }

    #[test]
    fn test_repair_smart_quotes() {
        let text = "{\u{201C}name\u{201D}: \u{201C}weather\u{201D}}";
        let n: Named = parse_structured_response(text).unwrap();
        assert_eq!(n.name, "weather");
    }

    #[test]
    fn test_repair_truncated_output() {
        let text = r#"Sure! {"name": "todo", "files": [{"path": "a.js""#;
        let v: Value = parse_structured_response(text).unwrap();
        assert_eq!(v["name"], "todo");
        assert_eq!(v["files"][0]["path"], "a.js");
    }

    #[test]
    fn test_repair_drops_stray_closer() {
        assert_eq!(repair_json(r#"{"a": 1}}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn test_type_mismatch_reports_error() {
        let err = parse_structured_response::<Named>(r#"{"title": "x"}"#).unwrap_err();
        assert!(matches!(err, ParseError::Unparseable { .. }));
    }

    #[test]
    fn test_empty_and_prose() {
        assert_eq!(parse_structured_response::<Value>("   ").unwrap_err(), ParseError::Empty);
        assert!(parse_structured_response::<Named>("no json here at all").is_err());
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(
            strip_code_fences("```python\nprint('hi')\n```"),
            "print('hi')"
        );
        assert_eq!(strip_code_fences("  console.log(1)\n"), "console.log(1)");
        assert_eq!(strip_code_fences("```js\nlet x = 1;"), "let x = 1;");
    }
}
