use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use chestmenu_api::{ClickResult, ItemStack, Menu, MenuView, Player};
use parking_lot::{ReentrantMutex, RwLock};

use super::ChestMenu;

/// What one player currently sees of a [`ChestMenu`].
pub struct ChestMenuView {
    menu: ChestMenu,
    viewer: Arc<dyn Player>,
    contents: RwLock<Vec<Option<ItemStack>>>,
    open: AtomicBool,
    /// Held across render and show, and by `invalidate`, so a replaced view
    /// never shows after its successor. Renders may reenter through opening
    /// another menu.
    show_lock: ReentrantMutex<()>,
}

impl ChestMenuView {
    pub(crate) fn new(menu: ChestMenu, viewer: Arc<dyn Player>) -> Self {
        let size = menu.size();
        Self {
            menu,
            viewer,
            contents: RwLock::new(vec![None; size]),
            open: AtomicBool::new(true),
            show_lock: ReentrantMutex::new(()),
        }
    }

    pub fn chest_menu(&self) -> &ChestMenu {
        &self.menu
    }

    /// The items shown after the last refresh.
    pub fn contents(&self) -> Vec<Option<ItemStack>> {
        self.contents.read().clone()
    }

    /// Routes a click on `slot` to the icon there.
    ///
    /// Slots without an icon, slots outside the menu (the player's own
    /// inventory) and clicks on a closed view keep the menu open.
    pub fn handle_click(&self, slot: usize) -> ClickResult {
        if !self.is_open() {
            return ClickResult::KeepOpen;
        }
        match self.menu.icon_at(slot) {
            Some(icon) => icon.on_click(self, self.viewer.as_ref()),
            None => ClickResult::KeepOpen,
        }
    }

    pub(crate) fn invalidate(&self) {
        let _guard = self.show_lock.lock();
        self.open.store(false, Ordering::Relaxed);
    }
}

impl MenuView for ChestMenuView {
    fn refresh(&self) {
        let _guard = self.show_lock.lock();
        if !self.is_open() {
            return;
        }
        let contents = self.menu.render_for(self.viewer.as_ref());
        // a render may have opened another menu for the viewer
        if !self.is_open() {
            return;
        }
        self.viewer.show_inventory(self.menu.title(), &contents);
        *self.contents.write() = contents;
    }

    fn viewer(&self) -> Arc<dyn Player> {
        self.viewer.clone()
    }

    fn menu(&self) -> Arc<dyn Menu> {
        Arc::new(self.menu.clone())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use chestmenu_api::{Icon, Material, StaticIcon, test_support::TestPlayer};

    use super::*;
    use crate::menu::OpenViews;

    struct CountingIcon {
        renders: AtomicUsize,
    }

    impl Icon for CountingIcon {
        fn render(&self, _viewer: &dyn Player) -> Option<ItemStack> {
            let count = self.renders.fetch_add(1, Ordering::Relaxed) + 1;
            Some(ItemStack::new(count as u8, Material::new("clock")))
        }

        fn on_click(&self, _menu_view: &dyn MenuView, _clicker: &dyn Player) -> ClickResult {
            ClickResult::KeepOpen
        }
    }

    fn setup() -> (Arc<OpenViews>, ChestMenu, TestPlayer) {
        let views = Arc::new(OpenViews::default());
        let menu = ChestMenu::new("test", "View", 1, &views).unwrap();
        (views, menu, TestPlayer::new("Steve"))
    }

    #[test]
    fn refresh_rerenders_and_shows() {
        let (_views, menu, player) = setup();
        let icon = Arc::new(CountingIcon {
            renders: AtomicUsize::new(0),
        });
        menu.set_icon(0, 0, Some(icon.clone())).unwrap();

        let view = ChestMenuView::new(menu.clone(), Arc::new(player.clone()));
        view.refresh();
        view.refresh();

        assert_eq!(icon.renders.load(Ordering::Relaxed), 2);
        assert_eq!(player.shown_count(), 2);
        let (title, contents) = player.last_shown().unwrap();
        assert_eq!(title, "View");
        assert_eq!(contents, view.contents());
        assert_eq!(contents[0].as_ref().unwrap().count, 2);
    }

    #[test]
    fn repeated_refresh_is_stable() {
        let (_views, menu, player) = setup();
        menu.set_icon(
            0,
            3,
            Some(Arc::new(StaticIcon::new(ItemStack::new(1, Material::new("stone"))))),
        )
        .unwrap();
        let view = ChestMenuView::new(menu, Arc::new(player.clone()));

        view.refresh();
        let first = view.contents();
        view.refresh();
        assert_eq!(view.contents(), first);
    }

    #[test]
    fn refresh_picks_up_new_icons() {
        let (_views, menu, player) = setup();
        let view = ChestMenuView::new(menu.clone(), Arc::new(player.clone()));
        view.refresh();
        assert!(view.contents().iter().all(Option::is_none));

        menu.set_icon(
            0,
            1,
            Some(Arc::new(StaticIcon::new(ItemStack::new(1, Material::new("apple"))))),
        )
        .unwrap();
        view.refresh();
        assert!(view.contents()[1].is_some());
    }

    #[test]
    fn closed_views_ignore_refresh_and_clicks() {
        let (_views, menu, player) = setup();
        menu.set_icon(
            0,
            0,
            Some(Arc::new(
                StaticIcon::new(ItemStack::new(1, Material::new("barrier"))).with_click_handler(
                    |_view: &dyn MenuView, _clicker: &dyn Player| ClickResult::Close,
                ),
            )),
        )
        .unwrap();
        let view = ChestMenuView::new(menu, Arc::new(player.clone()));
        assert_eq!(view.handle_click(0), ClickResult::Close);

        view.invalidate();
        view.refresh();
        assert_eq!(player.shown_count(), 0);
        assert_eq!(view.handle_click(0), ClickResult::KeepOpen);
    }

    #[test]
    fn accessors() {
        let (_views, menu, player) = setup();
        let view = ChestMenuView::new(menu.clone(), Arc::new(player.clone()));

        assert_eq!(view.viewer().uuid(), player.uuid());
        assert_eq!(view.menu().title(), "View");
        assert!(view.chest_menu().same_menu(&menu));
        assert_eq!(view.handle_click(40), ClickResult::KeepOpen);
    }
}
