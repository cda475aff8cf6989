// Percent-encoding codec
//
// Appends one elementary string unit to the output buffer. Truncation to a
// character count happens before encoding and never splits a codepoint.
//
// Two modes: the default escapes every character outside the RFC 3986
// unreserved set (space is always `%20`, a bare `%` becomes `%25`); the
// reserved-preserving mode used by the `+` and `#` operators passes
// characters through raw, except that a `%` opens a three-character window
// which is copied through only when it forms a valid percent-triplet.

/// Appends `value` to `out`, truncated to `max_len` characters and
/// percent-encoded per `allow_reserved`.
pub(crate) fn append_encoded(
    value: &str,
    max_len: Option<usize>,
    allow_reserved: bool,
    out: &mut String,
) {
    let limit = max_len.unwrap_or(usize::MAX);
    // Up to two characters buffered after a `%` while deciding whether the
    // window is a valid triplet. Only used in reserved-preserving mode.
    let mut window: Option<Vec<char>> = None;

    for ch in value.chars().take(limit) {
        if let Some(buf) = window.as_mut() {
            buf.push(ch);
            if buf.len() == 2 {
                flush_window(buf, out);
                window = None;
            }
            continue;
        }

        if allow_reserved && ch == '%' {
            window = Some(Vec::with_capacity(2));
            continue;
        }

        append_char(ch, allow_reserved, out);
    }

    // A window cut short by end of value resolves the same way as an
    // invalid one: escape the `%`, emit the tail as-is.
    if let Some(buf) = window {
        out.push_str("%25");
        for ch in buf {
            out.push(ch);
        }
    }
}

/// Resolves a full three-character window: a valid triplet is copied
/// through unchanged, anything else escapes the leading `%` and emits the
/// buffered tail raw.
fn flush_window(buf: &[char], out: &mut String) {
    if buf.iter().all(|c| c.is_ascii_hexdigit()) {
        out.push('%');
        for ch in buf {
            out.push(*ch);
        }
    } else {
        out.push_str("%25");
        for ch in buf {
            out.push(*ch);
        }
    }
}

fn append_char(ch: char, allow_reserved: bool, out: &mut String) {
    if ch == ' ' {
        out.push_str("%20");
    } else if ch == '%' {
        // Only reachable in the default mode; reserved-preserving `%`
        // handling goes through the window above.
        out.push_str("%25");
    } else if allow_reserved {
        out.push(ch);
    } else {
        let mut utf8 = [0u8; 4];
        out.push_str(&urlencoding::encode(ch.encode_utf8(&mut utf8)));
    }
}
