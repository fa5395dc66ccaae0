//! Comment stripping that preserves byte offsets.
//!
//! Comment bodies are overwritten with spaces while newlines survive, so a
//! match offset in the stripped text maps to the same line in the original.
//! String and template literals are skipped so `"http://x"` is left alone.

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    Quoted(u8),
    Template,
    LineComment,
    BlockComment,
}

/// Replace `//` and `/* */` comments with whitespace.
///
/// Tolerant of malformed input: an unterminated block comment blanks the rest
/// of the file and a quote left open at end of line is closed there.
pub fn strip_comments(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut state = State::Code;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            State::Code => match (b, next) {
                (b'/', Some(b'/')) => {
                    state = State::LineComment;
                    out.extend_from_slice(b"  ");
                    i += 2;
                    continue;
                }
                (b'/', Some(b'*')) => {
                    state = State::BlockComment;
                    out.extend_from_slice(b"  ");
                    i += 2;
                    continue;
                }
                (b'\'' | b'"', _) => {
                    state = State::Quoted(b);
                    out.push(b);
                }
                (b'`', _) => {
                    state = State::Template;
                    out.push(b);
                }
                _ => out.push(b),
            },
            State::Quoted(quote) => {
                if b == b'\\' && next.is_some_and(|n| n != b'\n') {
                    out.push(b);
                    out.push(bytes[i + 1]);
                    i += 2;
                    continue;
                }
                if b == quote || b == b'\n' {
                    state = State::Code;
                }
                out.push(b);
            }
            State::Template => {
                if b == b'\\' && next.is_some() {
                    out.push(b);
                    out.push(bytes[i + 1]);
                    i += 2;
                    continue;
                }
                if b == b'`' {
                    state = State::Code;
                }
                out.push(b);
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Code;
                    out.push(b);
                } else {
                    out.push(blank(b));
                }
            }
            State::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = State::Code;
                    out.extend_from_slice(b"  ");
                    i += 2;
                    continue;
                }
                out.push(blank(b));
            }
        }
        i += 1;
    }

    // Only ASCII bytes were replaced, and each multi-byte sequence was either
    // copied whole or blanked byte-for-byte, so the output is valid UTF-8.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn blank(b: u8) -> u8 {
    match b {
        b'\n' | b'\r' => b,
        _ => b' ',
    }
}
