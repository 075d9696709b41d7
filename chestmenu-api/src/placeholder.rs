use crate::{error::ApiError, player::Player};

/// Supplies the value of a placeholder.
///
/// `{test}` is resolved with no argument and `{test: hello world}` with the
/// argument `"hello world"`. Returning `None` leaves the placeholder text as
/// it is, since some placeholders only make sense with (or without) an
/// argument.
///
/// Any `Fn(&dyn Player, Option<&str>) -> Option<String>` closure is a replacer.
pub trait PlaceholderReplacer: Send + Sync {
    fn replacement(&self, player: &dyn Player, argument: Option<&str>) -> Option<String>;
}

impl<F> PlaceholderReplacer for F
where
    F: Fn(&dyn Player, Option<&str>) -> Option<String> + Send + Sync,
{
    fn replacement(&self, player: &dyn Player, argument: Option<&str>) -> Option<String> {
        self(player, argument)
    }
}

/// Checks that `identifier` can appear inside `{...}` without ambiguity.
pub fn validate_identifier(identifier: &str) -> Result<(), ApiError> {
    let valid = !identifier.is_empty()
        && !identifier
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | ':' | '/'));
    if valid {
        Ok(())
    } else {
        Err(ApiError::InvalidPlaceholderIdentifier(identifier.to_string()))
    }
}
