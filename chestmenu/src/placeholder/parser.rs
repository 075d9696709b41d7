use std::borrow::Cow;

use chestmenu_api::placeholder::validate_identifier;

const OPEN: char = '{';
const CLOSE: char = '}';
const ARGUMENT_SEPARATOR: char = ':';
const PLUGIN_SEPARATOR: char = '/';

/// The parts of one `{[plugin/]identifier[: argument]}` occurrence.
#[derive(Debug, PartialEq, Eq)]
pub struct PlaceholderMatch<'a> {
    pub plugin: Option<&'a str>,
    pub identifier: &'a str,
    pub argument: Option<&'a str>,
}

impl<'a> PlaceholderMatch<'a> {
    /// Parses the text between the braces.
    pub fn parse(content: &'a str) -> Option<Self> {
        let (head, argument) = match content.split_once(ARGUMENT_SEPARATOR) {
            Some((head, argument)) => (head, Some(argument.trim())),
            None => (content, None),
        };
        let (plugin, identifier) = match head.trim().split_once(PLUGIN_SEPARATOR) {
            Some((plugin, identifier)) => (Some(plugin), identifier),
            None => (None, head.trim()),
        };

        if plugin.is_some_and(|plugin| plugin.is_empty() || plugin.contains(char::is_whitespace)) {
            return None;
        }
        validate_identifier(identifier).ok()?;

        Some(Self {
            plugin,
            identifier,
            argument,
        })
    }
}

/// Replaces every placeholder in `text` that `resolve` has a value for.
///
/// Placeholders `resolve` declines, malformed ones and unterminated braces are
/// copied through unchanged.
pub fn replace_placeholders<'t, F>(text: &'t str, mut resolve: F) -> Cow<'t, str>
where
    F: FnMut(&PlaceholderMatch<'_>) -> Option<String>,
{
    if !text.contains(OPEN) {
        return Cow::Borrowed(text);
    }

    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    let mut replaced_any = false;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len_utf8()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };
        let content = &after_open[..end];

        // `{{name}` opens the placeholder at the innermost brace
        if let Some(inner) = content.rfind(OPEN) {
            let skip = start + OPEN.len_utf8() + inner;
            output.push_str(&rest[..skip]);
            rest = &rest[skip..];
            continue;
        }

        let replacement = PlaceholderMatch::parse(content).and_then(|found| resolve(&found));
        output.push_str(&rest[..start]);
        match replacement {
            Some(value) => {
                output.push_str(&value);
                replaced_any = true;
            }
            None => output.push_str(&rest[start..start + OPEN.len_utf8() + end + CLOSE.len_utf8()]),
        }
        rest = &after_open[end + CLOSE.len_utf8()..];
    }

    if !replaced_any {
        return Cow::Borrowed(text);
    }
    output.push_str(rest);
    Cow::Owned(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(found: &PlaceholderMatch<'_>) -> Option<String> {
        Some(match (found.plugin, found.argument) {
            (Some(plugin), Some(argument)) => format!("[{plugin}/{}={argument}]", found.identifier),
            (Some(plugin), None) => format!("[{plugin}/{}]", found.identifier),
            (None, Some(argument)) => format!("[{}={argument}]", found.identifier),
            (None, None) => format!("[{}]", found.identifier),
        })
    }

    #[test]
    fn parses_forms() {
        assert_eq!(
            PlaceholderMatch::parse("test"),
            Some(PlaceholderMatch {
                plugin: None,
                identifier: "test",
                argument: None
            })
        );
        assert_eq!(
            PlaceholderMatch::parse("test: hello world "),
            Some(PlaceholderMatch {
                plugin: None,
                identifier: "test",
                argument: Some("hello world")
            })
        );
        assert_eq!(
            PlaceholderMatch::parse(" economy/money:123"),
            Some(PlaceholderMatch {
                plugin: Some("economy"),
                identifier: "money",
                argument: Some("123")
            })
        );
        // the argument is free-form
        assert_eq!(
            PlaceholderMatch::parse("time: 12:30").unwrap().argument,
            Some("12:30")
        );
        assert!(PlaceholderMatch::parse("").is_none());
        assert!(PlaceholderMatch::parse("two words").is_none());
        assert!(PlaceholderMatch::parse("/money").is_none());
        assert!(PlaceholderMatch::parse(": arg").is_none());
    }

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(
            replace_placeholders("Hi {player}, you have {money: gold}!", echo),
            "Hi [player], you have [money=gold]!"
        );
        assert_eq!(
            replace_placeholders("{a}{b}{economy/c: 1}", echo),
            "[a][b][economy/c=1]"
        );
    }

    #[test]
    fn declined_placeholders_are_kept() {
        let text = "Balance: {money} and {rank: x}";
        let result = replace_placeholders(text, |found| {
            (found.identifier == "rank").then(|| "VIP".to_string())
        });
        assert_eq!(result, "Balance: {money} and VIP");

        let untouched = replace_placeholders(text, |_| None);
        assert!(matches!(untouched, Cow::Borrowed(_)));
        assert_eq!(untouched, text);
    }

    #[test]
    fn malformed_text_passes_through() {
        assert_eq!(replace_placeholders("no braces", echo), "no braces");
        assert_eq!(replace_placeholders("open {player", echo), "open {player");
        assert_eq!(replace_placeholders("{two words} {x}", echo), "{two words} [x]");
        assert_eq!(replace_placeholders("{{player}}", echo), "{[player]}");
        assert_eq!(replace_placeholders("{} {player} }", echo), "{} [player] }");
    }
}
