//! Escaping host text into script string literals.
//!
//! Printable ASCII other than `< > \ ' "` is copied through; every other
//! byte becomes a `\xNN` escape with lower-case hex digits. The output can
//! sit between single or double quotes and cannot close the literal or
//! open a `</script>` tag.

const HEX: &[u8; 16] = b"0123456789abcdef";
const RESERVED: &[u8] = b"<>\\'\"";

fn passes_through(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte) && !RESERVED.contains(&byte)
}

/// Two-pass encoder. With `out == None` nothing is written and the return
/// value is the exact buffer size needed, terminator byte included. With a
/// buffer, bytes are written up to its capacity followed by a `0`
/// terminator if room remains; the return value is the same required size.
pub fn encode_into(text: &[u8], mut out: Option<&mut [u8]>) -> usize {
    let mut pos = 0usize;
    let mut put = |byte: u8, pos: &mut usize| {
        if let Some(slot) = out.as_deref_mut().and_then(|buf| buf.get_mut(*pos)) {
            *slot = byte;
        }
        *pos += 1;
    };

    for &byte in text {
        if passes_through(byte) {
            put(byte, &mut pos);
        } else {
            put(b'\\', &mut pos);
            put(b'x', &mut pos);
            put(HEX[usize::from(byte >> 4)], &mut pos);
            put(HEX[usize::from(byte & 0x0f)], &mut pos);
        }
    }
    put(0, &mut pos);
    pos
}

/// Measure, allocate exactly, fill.
pub fn encode(text: &str) -> String {
    let needed = encode_into(text.as_bytes(), None);
    let mut buf = vec![0u8; needed];
    encode_into(text.as_bytes(), Some(&mut buf));
    buf.pop();
    // Every output byte is ASCII.
    String::from_utf8_lossy(&buf).into_owned()
}

/// A script expression that evaluates to exactly `text`.
///
/// Byte escapes alone turn multi-byte UTF-8 into one code unit per byte, so
/// the literal is passed through `decodeURIComponent` after mapping `%` and
/// the high bytes back to percent escapes.
pub fn js_string_expr(text: &str) -> String {
    let literal = encode(text);
    if text.is_ascii() && !text.contains('%') {
        return format!("\"{literal}\"");
    }
    format!(
        "decodeURIComponent(\"{literal}\".replace(/[%\\x80-\\xff]/g,function(c){{return '%'+c.charCodeAt(0).toString(16);}}))"
    )
}

const CSS_INJECT_FUNCTION: &str = "(function(e){var t=document.createElement('style'),d=document.head||document.getElementsByTagName('head')[0];t.setAttribute('type','text/css');t.styleSheet?t.styleSheet.cssText=e:t.appendChild(document.createTextNode(e));d.appendChild(t)})";

/// Script that appends one `<style>` element holding `css` to the head.
pub fn css_injection_script(css: &str) -> String {
    format!("{CSS_INJECT_FUNCTION}({})", js_string_expr(css))
}
