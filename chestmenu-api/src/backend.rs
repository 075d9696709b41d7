use std::sync::Arc;

use crate::{
    configurable::ConfigurableIcon, error::ApiError, item::Material, menu::Menu,
    placeholder::PlaceholderReplacer, player::Player,
};

/// The implementation behind [`crate::ChestMenus`].
pub trait Backend: Send + Sync {
    fn register_placeholder(
        &self,
        plugin: &str,
        identifier: &str,
        replacer: Arc<dyn PlaceholderReplacer>,
    ) -> Result<(), ApiError>;

    fn plugin_menu_exists(&self, file_name: &str) -> bool;

    fn open_plugin_menu(&self, player: Arc<dyn Player>, file_name: &str) -> bool;

    fn create_configurable_icon(&self, material: Material) -> ConfigurableIcon;

    fn create_menu(
        &self,
        plugin: &str,
        title: &str,
        rows: usize,
    ) -> Result<Arc<dyn Menu>, ApiError>;
}
