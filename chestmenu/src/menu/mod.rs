use std::{
    num::NonZeroU32,
    sync::{
        Arc, Weak,
        atomic::{AtomicU32, Ordering},
    },
};

use chestmenu_api::{
    ApiError, Icon, ItemStack, Menu, MenuView, Player,
    menu::{MAX_MENU_ROWS, MENU_COLUMNS, slot_index},
};
use parking_lot::RwLock;

mod registry;
mod tracker;
mod view;

pub use registry::PluginMenus;
pub use tracker::OpenViews;
pub use view::ChestMenuView;

struct MenuState {
    plugin: String,
    title: String,
    rows: usize,
    icons: RwLock<Vec<Option<Arc<dyn Icon>>>>,
    /// Zero means no auto-refresh.
    refresh_ticks: AtomicU32,
    views: Weak<OpenViews>,
}

/// A chest menu with 1 to 6 rows of 9 slots.
///
/// Cloning is cheap and yields a handle to the same menu.
#[derive(Clone)]
pub struct ChestMenu {
    state: Arc<MenuState>,
}

impl ChestMenu {
    pub(crate) fn new(
        plugin: &str,
        title: &str,
        rows: usize,
        views: &Arc<OpenViews>,
    ) -> Result<Self, ApiError> {
        if rows == 0 || rows > MAX_MENU_ROWS {
            return Err(ApiError::InvalidRowCount(rows));
        }
        Ok(Self {
            state: Arc::new(MenuState {
                plugin: plugin.to_string(),
                title: title.to_string(),
                rows,
                icons: RwLock::new(vec![None; rows * MENU_COLUMNS]),
                refresh_ticks: AtomicU32::new(0),
                views: Arc::downgrade(views),
            }),
        })
    }

    pub fn size(&self) -> usize {
        self.state.rows * MENU_COLUMNS
    }

    /// Whether both handles point to the same menu.
    pub fn same_menu(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    pub fn icon_at(&self, slot: usize) -> Option<Arc<dyn Icon>> {
        self.state.icons.read().get(slot).cloned().flatten()
    }

    /// Renders every slot for `viewer`.
    pub fn render_for(&self, viewer: &dyn Player) -> Vec<Option<ItemStack>> {
        // icons render without the grid locked, they may edit the menu
        let icons = self.state.icons.read().clone();
        icons
            .iter()
            .map(|icon| icon.as_ref().and_then(|icon| icon.render(viewer)))
            .collect()
    }

    /// Opens the menu and returns the concrete view.
    pub fn open_view(&self, player: Arc<dyn Player>) -> Arc<ChestMenuView> {
        match self.state.views.upgrade() {
            Some(views) => views.open(self, player),
            None => {
                log::warn!(
                    "Opening menu {:?} for {} after its backend was dropped, clicks won't be routed",
                    self.state.title,
                    player.name()
                );
                let view = Arc::new(ChestMenuView::new(self.clone(), player));
                view.refresh();
                view
            }
        }
    }
}

impl Menu for ChestMenu {
    fn plugin(&self) -> &str {
        &self.state.plugin
    }

    fn title(&self) -> &str {
        &self.state.title
    }

    fn rows(&self) -> usize {
        self.state.rows
    }

    fn set_icon(
        &self,
        row: usize,
        column: usize,
        icon: Option<Arc<dyn Icon>>,
    ) -> Result<(), ApiError> {
        if row >= self.state.rows || column >= MENU_COLUMNS {
            return Err(ApiError::SlotOutOfBounds { row, column });
        }
        self.state.icons.write()[slot_index(row, column)] = icon;
        Ok(())
    }

    fn icon(&self, row: usize, column: usize) -> Option<Arc<dyn Icon>> {
        if row >= self.state.rows || column >= MENU_COLUMNS {
            return None;
        }
        self.icon_at(slot_index(row, column))
    }

    fn open(&self, player: Arc<dyn Player>) -> Arc<dyn MenuView> {
        self.open_view(player)
    }

    fn refresh_open_views(&self) {
        let Some(views) = self.state.views.upgrade() else {
            return;
        };
        for view in views.views_of(self) {
            view.refresh();
        }
    }

    fn refresh_ticks(&self) -> Option<NonZeroU32> {
        NonZeroU32::new(self.state.refresh_ticks.load(Ordering::Relaxed))
    }

    fn set_refresh_ticks(&self, ticks: Option<NonZeroU32>) {
        self.state
            .refresh_ticks
            .store(ticks.map_or(0, NonZeroU32::get), Ordering::Relaxed);
    }
}
