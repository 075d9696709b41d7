use std::{borrow::Cow, collections::HashMap, sync::Arc};

use chestmenu_api::{ApiError, PlaceholderReplacer, Player, placeholder::validate_identifier};
use parking_lot::RwLock;

mod parser;

pub use parser::{PlaceholderMatch, replace_placeholders};

/// Plugin name the built-in placeholders are registered under.
pub const BUILTIN_PLUGIN: &str = "chestmenu";

struct Registration {
    plugin: String,
    replacer: Arc<dyn PlaceholderReplacer>,
}

/// All placeholders known to a backend, keyed by lowercase identifier.
///
/// Several plugins may register the same identifier. `{identifier}` goes to
/// the earliest registration, `{plugin/identifier}` to that plugin's.
#[derive(Default)]
pub struct PlaceholderRegistry {
    entries: RwLock<HashMap<String, Vec<Registration>>>,
}

impl PlaceholderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `replacer`, replacing an earlier one from the same plugin.
    pub fn register(
        &self,
        plugin: &str,
        identifier: &str,
        replacer: Arc<dyn PlaceholderReplacer>,
    ) -> Result<(), ApiError> {
        validate_identifier(identifier)?;
        let identifier = identifier.to_ascii_lowercase();

        let mut entries = self.entries.write();
        let registrations = entries.entry(identifier.clone()).or_default();
        match registrations
            .iter_mut()
            .find(|registration| registration.plugin.eq_ignore_ascii_case(plugin))
        {
            Some(existing) => {
                log::debug!("Plugin {plugin} replaced its placeholder {{{identifier}}}");
                existing.replacer = replacer;
            }
            None => {
                if let Some(first) = registrations.first() {
                    log::debug!(
                        "Placeholder {{{identifier}}} of {plugin} is shadowed by {}, use {{{plugin}/{identifier}}}",
                        first.plugin
                    );
                } else {
                    log::debug!("Registered placeholder {{{identifier}}} for {plugin}");
                }
                registrations.push(Registration {
                    plugin: plugin.to_string(),
                    replacer,
                });
            }
        }
        Ok(())
    }

    /// Removes every placeholder `plugin` registered, returning how many.
    pub fn unregister_plugin(&self, plugin: &str) -> usize {
        let mut entries = self.entries.write();
        let mut removed = 0;
        entries.retain(|_, registrations| {
            let before = registrations.len();
            registrations.retain(|registration| !registration.plugin.eq_ignore_ascii_case(plugin));
            removed += before - registrations.len();
            !registrations.is_empty()
        });
        removed
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries
            .read()
            .contains_key(&identifier.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn find(&self, found: &PlaceholderMatch<'_>) -> Option<Arc<dyn PlaceholderReplacer>> {
        let entries = self.entries.read();
        let registrations = entries.get(&found.identifier.to_ascii_lowercase())?;
        let registration = match found.plugin {
            Some(plugin) => registrations
                .iter()
                .find(|registration| registration.plugin.eq_ignore_ascii_case(plugin))?,
            None => registrations.first()?,
        };
        Some(registration.replacer.clone())
    }

    /// Replaces the placeholders in `text` for `player`.
    ///
    /// Replacers run without the registry locked, so they may register
    /// placeholders themselves.
    pub fn replace<'t>(&self, text: &'t str, player: &dyn Player) -> Cow<'t, str> {
        replace_placeholders(text, |found| {
            let replacer = self.find(found)?;
            replacer.replacement(player, found.argument)
        })
    }

    pub(crate) fn register_builtin(&self) -> Result<(), ApiError> {
        self.register(
            BUILTIN_PLUGIN,
            "player",
            Arc::new(|player: &dyn Player, _: Option<&str>| Some(player.name().to_string())),
        )?;
        self.register(
            BUILTIN_PLUGIN,
            "player_uuid",
            Arc::new(|player: &dyn Player, _: Option<&str>| Some(player.uuid().to_string())),
        )
    }
}
