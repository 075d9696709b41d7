//! Reference backend for the chest menu API.
//!
//! [`ChestMenuBackend`] keeps the placeholders, plugin menus and open views
//! of a server. The host forwards inventory clicks and closes to it and
//! hands plugins a [`ChestMenus`] handle from [`ChestMenuBackend::api`].

use std::sync::Arc;

use chestmenu_api::{
    ApiError, Backend, ChestMenus, ClickResult, ConfigurableIcon, Material, Menu, MenuView,
    PlaceholderReplacer, Player,
};
use chestmenu_config::{ChestMenuConfig, LoggingConfig};
use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use uuid::Uuid;

pub mod menu;
pub mod placeholder;
pub mod refresh;
pub mod render;
pub mod text;

use menu::{ChestMenu, OpenViews, PluginMenus};
use placeholder::PlaceholderRegistry;
use refresh::AutoRefresher;
use render::DefaultItemRenderer;

/// Sets up the global logger. Does nothing when logging is disabled.
pub fn init_log(config: &LoggingConfig) -> Result<(), SetLoggerError> {
    if !config.enabled {
        return Ok(());
    }
    let level = if config.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = ConfigBuilder::new();
    builder.set_time_level(if config.timestamp {
        LevelFilter::Error
    } else {
        LevelFilter::Off
    });
    builder.set_thread_level(if config.threads {
        LevelFilter::Info
    } else {
        LevelFilter::Off
    });
    let color = if config.color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };

    TermLogger::init(level, builder.build(), TerminalMode::Mixed, color)
}

pub struct ChestMenuBackend {
    config: ChestMenuConfig,
    placeholders: Arc<PlaceholderRegistry>,
    renderer: Arc<DefaultItemRenderer>,
    plugin_menus: PluginMenus,
    views: Arc<OpenViews>,
}

impl ChestMenuBackend {
    pub fn new(config: ChestMenuConfig) -> Self {
        let placeholders = Arc::new(PlaceholderRegistry::new());
        if config.placeholders.builtin {
            if let Err(err) = placeholders.register_builtin() {
                log::warn!("Couldn't register the built-in placeholders: {err}");
            }
        }
        let renderer = Arc::new(DefaultItemRenderer::new(
            placeholders.clone(),
            config.placeholders.enabled,
            config.menus.translate_colors,
        ));

        Self {
            config,
            placeholders,
            renderer,
            plugin_menus: PluginMenus::default(),
            views: Arc::new(OpenViews::default()),
        }
    }

    /// A handle for plugins, backed by this backend.
    pub fn api(self: &Arc<Self>) -> ChestMenus {
        ChestMenus::new(self.clone())
    }

    pub fn config(&self) -> &ChestMenuConfig {
        &self.config
    }

    pub fn placeholders(&self) -> &Arc<PlaceholderRegistry> {
        &self.placeholders
    }

    pub fn renderer(&self) -> &Arc<DefaultItemRenderer> {
        &self.renderer
    }

    pub fn plugin_menus(&self) -> &PluginMenus {
        &self.plugin_menus
    }

    pub fn views(&self) -> &Arc<OpenViews> {
        &self.views
    }

    /// Like [`Backend::create_menu`], without erasing the menu type.
    pub fn menu(&self, plugin: &str, title: &str, rows: usize) -> Result<ChestMenu, ApiError> {
        ChestMenu::new(plugin, title, rows, &self.views)
    }

    /// Makes `menu` openable through [`Backend::open_plugin_menu`].
    pub fn register_plugin_menu(
        &self,
        file_name: &str,
        menu: Arc<dyn Menu>,
    ) -> Option<Arc<dyn Menu>> {
        log::debug!("Registered menu file {file_name} of {}", menu.plugin());
        self.plugin_menus.register(file_name, menu)
    }

    pub fn unregister_plugin_menu(&self, file_name: &str) -> Option<Arc<dyn Menu>> {
        self.plugin_menus.unregister(file_name)
    }

    /// Drops everything `plugin` registered and closes its open menus.
    pub fn unregister_plugin(&self, plugin: &str) {
        let placeholders = self.placeholders.unregister_plugin(plugin);
        let menus = self.plugin_menus.unregister_plugin(plugin);

        let mut closed = 0;
        for view in self.views.all() {
            if view.chest_menu().plugin().eq_ignore_ascii_case(plugin)
                && self.views.close_if_current(&view)
            {
                view.viewer().close_inventory();
                closed += 1;
            }
        }
        log::info!(
            "Unregistered {placeholders} placeholders and {menus} menus of {plugin}, closed {closed} open menus"
        );
    }

    /// Routes a click of `player` on `slot` of their open menu.
    ///
    /// Returns `None` if the player has no menu open. When the icon asks to
    /// close the menu, the inventory is closed unless the click handler
    /// already opened another menu.
    pub fn handle_click(&self, player: &Uuid, slot: usize) -> Option<ClickResult> {
        let view = self.views.get(player)?;
        let result = view.handle_click(slot);
        if result == ClickResult::Close && self.views.close_if_current(&view) {
            view.viewer().close_inventory();
        }
        Some(result)
    }

    /// Called when the client closed its inventory. Returns whether a menu
    /// was open.
    pub fn handle_close(&self, player: &Uuid) -> bool {
        self.views.close(player).is_some()
    }

    /// The refresher for menus with a refresh period, unless disabled.
    pub fn auto_refresher(&self) -> Option<AutoRefresher> {
        self.config
            .menus
            .auto_refresh
            .then(|| AutoRefresher::new(self.views.clone(), self.config.menus.tps))
    }
}

impl Default for ChestMenuBackend {
    fn default() -> Self {
        Self::new(ChestMenuConfig::default())
    }
}

impl Backend for ChestMenuBackend {
    fn register_placeholder(
        &self,
        plugin: &str,
        identifier: &str,
        replacer: Arc<dyn PlaceholderReplacer>,
    ) -> Result<(), ApiError> {
        self.placeholders.register(plugin, identifier, replacer)
    }

    fn plugin_menu_exists(&self, file_name: &str) -> bool {
        self.plugin_menus.contains(file_name)
    }

    fn open_plugin_menu(&self, player: Arc<dyn Player>, file_name: &str) -> bool {
        let Some(menu) = self.plugin_menus.get(file_name) else {
            log::debug!("{} tried to open unknown menu file {file_name}", player.name());
            return false;
        };
        menu.open(player);
        true
    }

    fn create_configurable_icon(&self, material: Material) -> ConfigurableIcon {
        ConfigurableIcon::with_renderer(material, self.renderer.clone())
    }

    fn create_menu(
        &self,
        plugin: &str,
        title: &str,
        rows: usize,
    ) -> Result<Arc<dyn Menu>, ApiError> {
        Ok(Arc::new(self.menu(plugin, title, rows)?))
    }
}

#[cfg(test)]
mod tests {
    use chestmenu_api::{
        Icon, ItemStack, StaticIcon,
        test_support::{TestMenu, TestPlayer},
    };

    use super::*;

    fn backend() -> Arc<ChestMenuBackend> {
        Arc::new(ChestMenuBackend::default())
    }

    fn closing_icon() -> Arc<dyn Icon> {
        Arc::new(
            StaticIcon::new(ItemStack::new(1, Material::new("barrier"))).with_click_handler(
                |_view: &dyn MenuView, _clicker: &dyn Player| ClickResult::Close,
            ),
        )
    }

    #[test]
    fn opens_and_refreshes_through_api() {
        let backend = backend();
        let api = backend.api();
        let player = TestPlayer::new("Steve");

        let menu = api.create_menu("shop", "Shop", 3).unwrap();
        let mut icon = api.create_configurable_icon(Material::new("emerald"));
        icon.set_name(Some("&aHello {player}"));
        icon.set_placeholders_enabled(true);
        menu.set_icon(1, 4, Some(Arc::new(icon))).unwrap();

        let view = menu.open(Arc::new(player.clone()));
        assert!(view.is_open());
        assert_eq!(view.viewer().uuid(), player.uuid());
        let (title, contents) = player.last_shown().unwrap();
        assert_eq!(title, "Shop");
        assert_eq!(contents.len(), 27);
        assert_eq!(contents[13].as_ref().unwrap().display_name(), Some("§aHello Steve"));

        view.refresh();
        assert_eq!(player.shown_count(), 2);
        menu.refresh_open_views();
        assert_eq!(player.shown_count(), 3);
    }

    #[test]
    fn invalid_menus_are_rejected() {
        let backend = backend();
        let api = backend.api();
        assert_eq!(
            api.create_menu("shop", "Nothing", 0).err(),
            Some(ApiError::InvalidRowCount(0))
        );
        assert_eq!(
            api.create_menu("shop", "Too big", 7).err(),
            Some(ApiError::InvalidRowCount(7))
        );
    }

    #[test]
    fn click_routing() {
        let backend = backend();
        let player = TestPlayer::new("Steve");
        let menu = backend.menu("test", "Clicks", 1).unwrap();
        menu.set_icon(0, 0, Some(closing_icon())).unwrap();
        menu.set_icon(
            0,
            1,
            Some(Arc::new(StaticIcon::new(ItemStack::new(1, Material::new("stone"))))),
        )
        .unwrap();

        assert_eq!(backend.handle_click(&player.uuid(), 0), None);

        let view = menu.open_view(Arc::new(player.clone()));
        assert_eq!(backend.handle_click(&player.uuid(), 1), Some(ClickResult::KeepOpen));
        assert_eq!(backend.handle_click(&player.uuid(), 5), Some(ClickResult::KeepOpen));
        assert_eq!(backend.handle_click(&player.uuid(), 60), Some(ClickResult::KeepOpen));
        assert_eq!(player.close_count(), 0);

        assert_eq!(backend.handle_click(&player.uuid(), 0), Some(ClickResult::Close));
        assert_eq!(player.close_count(), 1);
        assert!(!view.is_open());
        assert!(backend.views().is_empty());
    }

    #[test]
    fn close_result_ignored_after_menu_switch() {
        let backend = backend();
        let player = Arc::new(TestPlayer::new("Steve"));
        let next = backend.menu("test", "Next", 1).unwrap();
        let first = backend.menu("test", "First", 1).unwrap();

        let target = next.clone();
        let clicker = player.clone();
        first
            .set_icon(
                0,
                0,
                Some(Arc::new(
                    StaticIcon::new(ItemStack::new(1, Material::new("arrow"))).with_click_handler(
                        move |_view: &dyn MenuView, _clicker: &dyn Player| {
                            target.open(clicker.clone());
                            ClickResult::Close
                        },
                    ),
                )),
            )
            .unwrap();
        first.open_view(player.clone());

        assert_eq!(backend.handle_click(&player.uuid(), 0), Some(ClickResult::Close));
        assert_eq!(player.close_count(), 0);
        let current = backend.views().get(&player.uuid()).unwrap();
        assert!(current.chest_menu().same_menu(&next));
        assert_eq!(player.last_shown().unwrap().0, "Next");
    }

    #[test]
    fn client_close_forgets_view() {
        let backend = backend();
        let player = TestPlayer::new("Steve");
        let menu = backend.menu("test", "Menu", 1).unwrap();
        menu.set_icon(0, 0, Some(closing_icon())).unwrap();

        let view = menu.open_view(Arc::new(player.clone()));
        assert!(backend.handle_close(&player.uuid()));
        assert!(!view.is_open());
        assert!(!backend.handle_close(&player.uuid()));
        assert_eq!(backend.handle_click(&player.uuid(), 0), None);
        // plugins may still hold the view, refreshing it does nothing
        view.refresh();
        assert_eq!(player.shown_count(), 1);
    }

    #[test]
    fn plugin_menus() {
        let backend = backend();
        let api = backend.api();
        let player = TestPlayer::new("Steve");

        assert!(!api.plugin_menu_exists("shop.yml"));
        assert!(!api.open_plugin_menu(Arc::new(player.clone()), "shop.yml"));

        let menu = api.create_menu("shop", "Shop", 1).unwrap();
        assert!(backend.register_plugin_menu("Shop.yml", menu).is_none());
        assert!(api.plugin_menu_exists("shop.yml"));
        assert!(api.open_plugin_menu(Arc::new(player.clone()), "SHOP.YML"));
        assert_eq!(player.last_shown().unwrap().0, "Shop");
        assert!(backend.views().get(&player.uuid()).is_some());

        assert!(backend.unregister_plugin_menu("shop.yml").is_some());
        assert!(!api.plugin_menu_exists("shop.yml"));
    }

    #[test]
    fn foreign_plugin_menus_open() {
        let backend = backend();
        let player = TestPlayer::new("Steve");
        backend.register_plugin_menu("stub.yml", Arc::new(TestMenu::new(2).unwrap()));

        assert!(backend.open_plugin_menu(Arc::new(player.clone()), "stub.yml"));
        let (title, contents) = player.last_shown().unwrap();
        assert_eq!(title, "Test");
        assert_eq!(contents.len(), 18);
        // only menus built by the backend are tracked
        assert!(backend.views().is_empty());
    }

    #[test]
    fn placeholders_through_api() {
        let backend = backend();
        let api = backend.api();
        api.register_placeholder("economy", "money", |_: &dyn Player, argument: Option<&str>| {
            Some(format!("{}$", argument.unwrap_or("0")))
        })
        .unwrap();
        assert_eq!(
            api.register_placeholder("economy", "bad id", |_: &dyn Player, _: Option<&str>| {
                Some(String::new())
            }),
            Err(ApiError::InvalidPlaceholderIdentifier("bad id".to_string()))
        );

        let mut icon = api.create_configurable_icon(Material::new("gold_ingot"));
        icon.set_lore_lines(["{money: 10}", "{economy/money}", "{player}"]);
        icon.set_placeholders_enabled(true);
        let player = TestPlayer::new("Steve");
        let item = Icon::render(&icon, &player).unwrap();
        assert_eq!(item.lore(), Some(vec!["10$", "0$", "Steve"]));
    }

    #[test]
    fn builtin_placeholders_can_be_disabled() {
        let mut config = ChestMenuConfig::default();
        config.placeholders.builtin = false;
        let backend = ChestMenuBackend::new(config);
        assert!(backend.placeholders().is_empty());
        assert!(ChestMenuBackend::default().placeholders().contains("player"));
    }

    #[test]
    fn unregister_plugin_cleans_up() {
        let backend = backend();
        let steve = TestPlayer::new("Steve");
        let alex = TestPlayer::new("Alex");
        backend
            .register_placeholder(
                "shop",
                "price",
                Arc::new(|_: &dyn Player, _: Option<&str>| Some("1".to_string())),
            )
            .unwrap();
        let shop = backend.menu("shop", "Shop", 1).unwrap();
        let other = backend.menu("other", "Other", 1).unwrap();
        backend.register_plugin_menu("shop.yml", Arc::new(shop.clone()));
        shop.open_view(Arc::new(steve.clone()));
        other.open_view(Arc::new(alex.clone()));

        backend.unregister_plugin("shop");
        assert!(!backend.placeholders().contains("price"));
        assert!(!backend.plugin_menu_exists("shop.yml"));
        assert_eq!(steve.close_count(), 1);
        assert_eq!(alex.close_count(), 0);
        assert_eq!(backend.views().len(), 1);
    }

    #[test]
    fn auto_refresher_follows_config() {
        assert!(backend().auto_refresher().is_some());

        let mut config = ChestMenuConfig::default();
        config.menus.auto_refresh = false;
        assert!(ChestMenuBackend::new(config).auto_refresher().is_none());
    }
}
