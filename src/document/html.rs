//! Start-tag scanner for pre-rendered catalog pages.
//!
//! Only what the catalog needs is recognized: element names and their
//! attributes. Comments, doctype/processing instructions, end tags and the
//! bodies of `<script>`/`<style>` are skipped. Text content is ignored.

/// An opening tag with its attributes in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl StartTag {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Advance past the next occurrence of `end`, or to the end of input
    fn skip_past(&mut self, end: &str) {
        match self.rest().find(end) {
            Some(i) => self.pos += i + end.len(),
            None => self.pos = self.src.len(),
        }
    }

    /// Advance past the next case-insensitive occurrence of `end`
    fn skip_past_ignore_case(&mut self, end: &str) {
        let lowered = self.rest().to_ascii_lowercase();
        match lowered.find(end) {
            Some(i) => self.pos += i + end.len(),
            None => self.pos = self.src.len(),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
        &self.src[start..self.pos]
    }
}

fn is_name_end(c: char) -> bool {
    c.is_whitespace() || c == '>' || c == '/' || c == '='
}

/// Scan every start tag in document order
pub fn start_tags(html: &str) -> Vec<StartTag> {
    let mut cursor = Cursor { src: html, pos: 0 };
    let mut tags = Vec::new();

    while cursor.peek().is_some() {
        cursor.skip_past("<");
        if cursor.peek().is_none() {
            break;
        }

        if cursor.starts_with("!--") {
            cursor.skip_past("-->");
            continue;
        }
        if cursor.starts_with("!") || cursor.starts_with("?") || cursor.starts_with("/") {
            cursor.skip_past(">");
            continue;
        }
        if !matches!(cursor.peek(), Some(c) if c.is_ascii_alphabetic()) {
            continue;
        }

        let name = cursor.take_while(|c| !is_name_end(c)).to_ascii_lowercase();
        let attributes = read_attributes(&mut cursor);

        let raw_text = name == "script" || name == "style";
        let closing = format!("</{}", name);
        tags.push(StartTag { name, attributes });

        if raw_text {
            cursor.skip_past_ignore_case(&closing);
        }
    }

    tags
}

fn read_attributes(cursor: &mut Cursor<'_>) -> Vec<(String, String)> {
    let mut attributes = Vec::new();

    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            None => break,
            Some('>') => {
                cursor.bump();
                break;
            }
            Some('/') => {
                cursor.bump();
                continue;
            }
            _ => {}
        }

        let name = cursor.take_while(|c| !is_name_end(c)).to_ascii_lowercase();
        if name.is_empty() {
            // stray '=' with no name
            cursor.bump();
            continue;
        }

        cursor.skip_whitespace();
        let value = if cursor.peek() == Some('=') {
            cursor.bump();
            cursor.skip_whitespace();
            match cursor.peek() {
                Some(quote @ ('"' | '\'')) => {
                    cursor.bump();
                    let value = cursor.take_while(|c| c != quote);
                    cursor.bump();
                    value
                }
                _ => cursor.take_while(|c| !c.is_whitespace() && c != '>'),
            }
        } else {
            ""
        };

        attributes.push((name, decode_entities(value)));
    }

    attributes
}

/// Decode the character references that show up in attribute values.
/// Unknown references are kept verbatim.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity.strip_prefix('#').and_then(|num| {
                    let code = match num.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => num.parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }),
            };
            c.map(|c| (c, semi + 1))
        });

        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
