//! Field annotation parsing.
//!
//! An annotation is a space-separated list of `key:"value"` pairs, e.g.
//! `id:"port" short:"p" default:"8080"`. Values are double-quoted and may use
//! backslash escapes (`\"`, `\\`, `\n`, `\t`, `\xNN`, `\uNNNN`).
//!
//! Malformed input never produces an error. Scanning stops at the first pair
//! that does not parse, so that pair and everything after it reads as absent.

/// Look up `key` in an annotation string.
///
/// Returns `Some(value)` (possibly empty) when the key is present with a
/// well-formed quoted value, `None` otherwise. The first occurrence wins.
pub fn lookup(tag: &str, key: &str) -> Option<String> {
    let bytes = tag.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        while pos < bytes.len() && bytes[pos] == b' ' {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        let name_start = pos;
        while pos < bytes.len() && is_name_byte(bytes[pos]) {
            pos += 1;
        }
        if pos == name_start
            || pos + 1 >= bytes.len()
            || bytes[pos] != b':'
            || bytes[pos + 1] != b'"'
        {
            break;
        }
        let name = &tag[name_start..pos];

        // Opening quote of the value.
        pos += 1;
        let quoted_start = pos;
        pos += 1;
        while pos < bytes.len() && bytes[pos] != b'"' {
            if bytes[pos] == b'\\' {
                pos += 1;
            }
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }
        let quoted = &tag[quoted_start..=pos];
        pos += 1;

        if name == key {
            return unquote(quoted);
        }
    }

    None
}

fn is_name_byte(b: u8) -> bool {
    b > b' ' && b != b':' && b != b'"' && b != 0x7f
}

/// Strip the surrounding quotes from `quoted` and resolve escapes.
///
/// Returns `None` for anything that is not a well-formed double-quoted string.
fn unquote(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => out.push(unescape(&mut chars)?),
            other => out.push(other),
        }
    }
    Some(out)
}

fn unescape(chars: &mut std::str::Chars<'_>) -> Option<char> {
    let c = match chars.next()? {
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0b}',
        '\\' => '\\',
        '"' => '"',
        'x' => hex_char(chars, 2)?,
        'u' => hex_char(chars, 4)?,
        'U' => hex_char(chars, 8)?,
        d @ '0'..='7' => {
            let mut code = d.to_digit(8)?;
            for _ in 0..2 {
                code = code * 8 + chars.next()?.to_digit(8)?;
            }
            if code > 0xff {
                return None;
            }
            char::from_u32(code)?
        }
        _ => return None,
    };
    Some(c)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(code)
}
