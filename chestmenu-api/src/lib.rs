//! Contracts for building chest menus from server plugins.
//!
//! Plugins talk to a [`ChestMenus`] handle. It forwards every call to the
//! [`Backend`] it was created with, so the implementation is chosen by
//! whoever builds the handle instead of being looked up globally.

use std::sync::Arc;

pub mod backend;
pub mod click;
pub mod configurable;
mod error;
pub mod icon;
pub mod item;
pub mod menu;
pub mod placeholder;
pub mod player;
#[cfg(any(test, feature = "test_helper"))]
pub mod test_support;

pub use backend::Backend;
pub use click::{ClickHandler, ClickResult};
pub use configurable::{ConfigurableIcon, ConfiguredAppearance, IconAttributes, ItemRenderer};
pub use error::ApiError;
pub use icon::{Appearance, ClickableIcon, Icon, StaticIcon};
pub use item::{Color, DyeColor, Enchantment, ItemStack, Material, Pattern, PatternType};
pub use menu::{Menu, MenuView};
pub use placeholder::PlaceholderReplacer;
pub use player::Player;

/// Increased every time the API changes, so plugins can check whether a
/// feature they need is present. The first version is 1.
pub const API_VERSION: u32 = 1;

pub const fn api_version() -> u32 {
    API_VERSION
}

/// Entry point for plugins.
#[derive(Clone)]
pub struct ChestMenus {
    backend: Arc<dyn Backend>,
}

impl ChestMenus {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub const fn api_version(&self) -> u32 {
        API_VERSION
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Registers a placeholder replaced in icon names and lore.
    ///
    /// Given the identifier `test`, the replacer resolves `{test}`,
    /// `{test: 123}` and `{test: hello world}`. `{plugin/test}` picks this
    /// plugin's replacer when several plugins use the same identifier.
    pub fn register_placeholder(
        &self,
        plugin: &str,
        identifier: &str,
        replacer: impl PlaceholderReplacer + 'static,
    ) -> Result<(), ApiError> {
        if let Err(err) = placeholder::validate_identifier(identifier) {
            log::warn!("Plugin {plugin} tried to register a placeholder: {err}");
            return Err(err);
        }
        self.backend
            .register_placeholder(plugin, identifier, Arc::new(replacer))
    }

    /// Whether a menu was registered under `file_name`.
    pub fn plugin_menu_exists(&self, file_name: &str) -> bool {
        self.backend.plugin_menu_exists(file_name)
    }

    /// Opens the menu registered under `file_name`.
    ///
    /// This doesn't check any permission of the player. Returns whether the
    /// menu was found and opened.
    pub fn open_plugin_menu(&self, player: Arc<dyn Player>, file_name: &str) -> bool {
        self.backend.open_plugin_menu(player, file_name)
    }

    pub fn create_configurable_icon(&self, material: Material) -> ConfigurableIcon {
        self.backend.create_configurable_icon(material)
    }

    pub fn create_menu(
        &self,
        plugin: &str,
        title: &str,
        rows: usize,
    ) -> Result<Arc<dyn Menu>, ApiError> {
        self.backend.create_menu(plugin, title, rows)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::test_support::{PlainRenderer, TestMenu, TestPlayer};

    #[derive(Default)]
    struct RecordingBackend {
        placeholders: Mutex<Vec<(String, String)>>,
        opened: Mutex<Vec<(String, String)>>,
    }

    impl Backend for RecordingBackend {
        fn register_placeholder(
            &self,
            plugin: &str,
            identifier: &str,
            _replacer: Arc<dyn PlaceholderReplacer>,
        ) -> Result<(), ApiError> {
            self.placeholders
                .lock()
                .unwrap()
                .push((plugin.to_string(), identifier.to_string()));
            Ok(())
        }

        fn plugin_menu_exists(&self, file_name: &str) -> bool {
            file_name == "shop.yml"
        }

        fn open_plugin_menu(&self, player: Arc<dyn Player>, file_name: &str) -> bool {
            self.opened
                .lock()
                .unwrap()
                .push((player.name().to_string(), file_name.to_string()));
            self.plugin_menu_exists(file_name)
        }

        fn create_configurable_icon(&self, material: Material) -> ConfigurableIcon {
            ConfigurableIcon::with_renderer(material, Arc::new(PlainRenderer))
        }

        fn create_menu(
            &self,
            _plugin: &str,
            _title: &str,
            rows: usize,
        ) -> Result<Arc<dyn Menu>, ApiError> {
            Ok(Arc::new(TestMenu::new(rows)?))
        }
    }

    fn api() -> (ChestMenus, Arc<RecordingBackend>) {
        let backend = Arc::new(RecordingBackend::default());
        (ChestMenus::new(backend.clone()), backend)
    }

    #[test]
    fn version() {
        let (api, _) = api();
        assert_eq!(api.api_version(), 1);
        assert_eq!(api_version(), API_VERSION);
    }

    #[test]
    fn delegates_to_backend() {
        let (api, backend) = api();
        let player: Arc<dyn Player> = Arc::new(TestPlayer::new("Steve"));

        api.register_placeholder("economy", "money", |_: &dyn Player, _: Option<&str>| {
            Some("100".to_string())
        })
        .unwrap();
        assert!(api.plugin_menu_exists("shop.yml"));
        assert!(!api.plugin_menu_exists("missing.yml"));
        assert!(api.open_plugin_menu(player.clone(), "shop.yml"));
        assert!(!api.open_plugin_menu(player, "missing.yml"));

        assert_eq!(
            *backend.placeholders.lock().unwrap(),
            vec![("economy".to_string(), "money".to_string())]
        );
        assert_eq!(backend.opened.lock().unwrap().len(), 2);

        let icon = ConfigurableIcon::create(api.backend().as_ref(), Material::new("apple"));
        assert_eq!(icon.material().path(), "apple");
        assert_eq!(api.create_menu("test", "Test", 3).unwrap().rows(), 3);
        assert!(matches!(
            api.create_menu("test", "Test", 7),
            Err(ApiError::InvalidRowCount(7))
        ));
    }

    #[test]
    fn rejects_bad_identifiers_before_the_backend() {
        let (api, backend) = api();
        let result = api.register_placeholder(
            "economy",
            "bad id",
            |_: &dyn Player, _: Option<&str>| -> Option<String> { None },
        );

        assert!(matches!(result, Err(ApiError::InvalidPlaceholderIdentifier(_))));
        assert!(backend.placeholders.lock().unwrap().is_empty());
    }
}
