use std::borrow::Cow;

pub const SECTION_SIGN: char = '§';

const ALTERNATE_CODE: char = '&';

fn is_format_code(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), '0'..='9' | 'a'..='f' | 'k'..='o' | 'r')
}

/// Turns `&a`-style color codes into the `§a` form clients understand.
///
/// An `&` that isn't followed by a valid code is kept as it is.
pub fn translate_color_codes(text: &str) -> Cow<'_, str> {
    if !text.contains(ALTERNATE_CODE) {
        return Cow::Borrowed(text);
    }

    let mut translated = String::with_capacity(text.len() + 1);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&code) if c == ALTERNATE_CODE && is_format_code(code) => {
                translated.push(SECTION_SIGN);
                translated.push(code.to_ascii_lowercase());
                chars.next();
            }
            _ => translated.push(c),
        }
    }
    Cow::Owned(translated)
}
