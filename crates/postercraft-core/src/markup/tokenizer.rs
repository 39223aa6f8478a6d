//! Lenient HTML tokenizer.
//!
//! Produces a flat token stream from arbitrary markup. It never fails:
//! anything that does not form a well-formed tag is kept as text.

use super::{RAW_TEXT_ELEMENTS, decode_entities};

/// A single token of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An opening tag. Names are lowercased, attribute values decoded.
    StartTag {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    /// A closing tag.
    EndTag { name: String },
    /// Character data with entities decoded.
    Text(String),
    /// A `<!-- -->` comment or `<? ?>` processing instruction.
    Comment(String),
    /// A `<!DOCTYPE ...>` or other `<!...>` declaration.
    Doctype(String),
}

/// Split markup into tokens.
pub fn tokenize(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'<' {
            pos += 1;
            continue;
        }

        let Some((token, end)) = parse_markup(input, pos) else {
            pos += 1;
            continue;
        };

        push_text(&mut tokens, &input[text_start..pos]);

        let raw_text_name = match &token {
            Token::StartTag { name, self_closing: false, .. }
                if RAW_TEXT_ELEMENTS.contains(&name.as_str()) =>
            {
                Some(name.clone())
            }
            _ => None,
        };
        tokens.push(token);
        pos = end;

        if let Some(name) = raw_text_name {
            let (content_end, after_close) = find_raw_text_end(input, pos, &name);
            if content_end > pos {
                tokens.push(Token::Text(input[pos..content_end].to_string()));
            }
            if after_close > content_end {
                tokens.push(Token::EndTag { name });
            }
            pos = after_close;
        }
        text_start = pos;
    }

    push_text(&mut tokens, &input[text_start..]);
    tokens
}

fn push_text(tokens: &mut Vec<Token>, raw: &str) {
    if !raw.is_empty() {
        tokens.push(Token::Text(decode_entities(raw)));
    }
}

/// Find the end of a raw-text element's content.
/// Returns (end of content, position after the closing tag).
fn find_raw_text_end(input: &str, from: usize, name: &str) -> (usize, usize) {
    let lower = input[from..].to_ascii_lowercase();
    let needle = format!("</{}", name);
    let mut search = 0;
    while let Some(found) = lower[search..].find(&needle) {
        let start = search + found;
        let after_name = start + needle.len();
        let next = lower.as_bytes().get(after_name).copied();
        if matches!(next, None | Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'/')) {
            let close = lower[after_name..]
                .find('>')
                .map(|i| after_name + i + 1)
                .unwrap_or(lower.len());
            return (from + start, from + close);
        }
        search = after_name;
    }
    (input.len(), input.len())
}

/// Try to parse a tag, comment or declaration starting at `start` (which
/// points at `<`). Returns the token and the byte offset just past it.
fn parse_markup(input: &str, start: usize) -> Option<(Token, usize)> {
    let rest = &input[start..];
    let bytes = rest.as_bytes();

    if rest.starts_with("<!--") {
        return Some(match rest[4..].find("-->") {
            Some(end) => (Token::Comment(rest[4..4 + end].to_string()), start + 4 + end + 3),
            None => (Token::Comment(rest[4..].to_string()), input.len()),
        });
    }

    if rest.starts_with("<!") || rest.starts_with("<?") {
        let end = rest.find('>')?;
        let body = rest[2..end].to_string();
        let token = if rest.starts_with("<?") {
            Token::Comment(body)
        } else {
            Token::Doctype(body)
        };
        return Some((token, start + end + 1));
    }

    if rest.starts_with("</") {
        if !bytes.get(2).is_some_and(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        let name_end = scan_name(bytes, 2);
        let close = rest[name_end..].find('>')? + name_end;
        let name = rest[2..name_end].to_ascii_lowercase();
        return Some((Token::EndTag { name }, start + close + 1));
    }

    if !bytes.get(1).is_some_and(|b| b.is_ascii_alphabetic()) {
        return None;
    }

    let name_end = scan_name(bytes, 1);
    let name = rest[1..name_end].to_ascii_lowercase();
    let mut attributes = Vec::new();
    let mut i = name_end;

    loop {
        i = skip_whitespace(bytes, i);
        match *bytes.get(i)? {
            b'>' => {
                return Some((
                    Token::StartTag { name, attributes, self_closing: false },
                    start + i + 1,
                ));
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                return Some((
                    Token::StartTag { name, attributes, self_closing: true },
                    start + i + 2,
                ));
            }
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let attr_start = i;
        while i < bytes.len() && !is_attr_name_terminator(bytes[i]) {
            i += 1;
        }
        let attr_name = rest[attr_start..i].to_ascii_lowercase();

        i = skip_whitespace(bytes, i);
        let mut value = String::new();
        if bytes.get(i) == Some(&b'=') {
            i = skip_whitespace(bytes, i + 1);
            match *bytes.get(i)? {
                quote @ (b'"' | b'\'') => {
                    let close = rest[i + 1..].find(quote as char)? + i + 1;
                    value = decode_entities(&rest[i + 1..close]);
                    i = close + 1;
                }
                _ => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = decode_entities(&rest[value_start..i]);
                }
            }
        }

        if !attr_name.is_empty() && !attributes.iter().any(|(n, _)| *n == attr_name) {
            attributes.push((attr_name, value));
        }
    }
}

fn scan_name(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-' || bytes[i] == b':') {
        i += 1;
    }
    i
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn is_attr_name_terminator(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/')
}
