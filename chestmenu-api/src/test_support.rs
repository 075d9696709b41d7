//! Stand-ins for host types, for testing code built on the menu API.

use std::{num::NonZeroU32, sync::Arc};

use parking_lot::Mutex;
use uuid::Uuid;

use crate::{
    configurable::{IconAttributes, ItemRenderer},
    error::ApiError,
    icon::Icon,
    item::ItemStack,
    menu::{MAX_MENU_ROWS, MENU_COLUMNS, Menu, MenuView},
    player::Player,
};

type ShownInventory = (String, Vec<Option<ItemStack>>);

#[derive(Default)]
struct PlayerRecord {
    shown: Vec<ShownInventory>,
    closed: usize,
}

/// A player that remembers every inventory it was shown.
#[derive(Clone)]
pub struct TestPlayer {
    uuid: Uuid,
    name: String,
    record: Arc<Mutex<PlayerRecord>>,
}

impl TestPlayer {
    pub fn new(name: &str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            record: Arc::default(),
        }
    }

    pub fn shown_count(&self) -> usize {
        self.record.lock().shown.len()
    }

    pub fn last_shown(&self) -> Option<ShownInventory> {
        self.record.lock().shown.last().cloned()
    }

    pub fn close_count(&self) -> usize {
        self.record.lock().closed
    }
}

impl Player for TestPlayer {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn show_inventory(&self, title: &str, contents: &[Option<ItemStack>]) {
        self.record
            .lock()
            .shown
            .push((title.to_string(), contents.to_vec()));
    }

    fn close_inventory(&self) {
        self.record.lock().closed += 1;
    }
}

/// Renders material, amount and durability, nothing else.
pub struct PlainRenderer;

impl ItemRenderer for PlainRenderer {
    fn render_item(&self, attributes: &IconAttributes, _viewer: &dyn Player) -> Option<ItemStack> {
        let mut item = ItemStack::new(attributes.amount(), attributes.material().clone());
        item.durability = attributes.durability();
        Some(item)
    }
}

/// A menu that only stores icons. Clones share the icons.
#[derive(Clone)]
pub struct TestMenu {
    rows: usize,
    icons: Arc<Mutex<Vec<Option<Arc<dyn Icon>>>>>,
}

impl TestMenu {
    pub fn new(rows: usize) -> Result<Self, ApiError> {
        if rows == 0 || rows > MAX_MENU_ROWS {
            return Err(ApiError::InvalidRowCount(rows));
        }
        Ok(Self {
            rows,
            icons: Arc::new(Mutex::new(vec![None; rows * MENU_COLUMNS])),
        })
    }
}

impl Menu for TestMenu {
    fn plugin(&self) -> &str {
        "test"
    }

    fn title(&self) -> &str {
        "Test"
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn set_icon(
        &self,
        row: usize,
        column: usize,
        icon: Option<Arc<dyn Icon>>,
    ) -> Result<(), ApiError> {
        if row >= self.rows || column >= MENU_COLUMNS {
            return Err(ApiError::SlotOutOfBounds { row, column });
        }
        self.icons.lock()[row * MENU_COLUMNS + column] = icon;
        Ok(())
    }

    fn icon(&self, row: usize, column: usize) -> Option<Arc<dyn Icon>> {
        if row >= self.rows || column >= MENU_COLUMNS {
            return None;
        }
        self.icons.lock()[row * MENU_COLUMNS + column].clone()
    }

    /// Shows the icons once and returns a view no backend tracks.
    fn open(&self, player: Arc<dyn Player>) -> Arc<dyn MenuView> {
        let icons = self.icons.lock().clone();
        let contents: Vec<Option<ItemStack>> = icons
            .iter()
            .map(|icon| icon.as_ref().and_then(|icon| icon.render(player.as_ref())))
            .collect();
        player.show_inventory(self.title(), &contents);
        Arc::new(DetachedView {
            viewer: player,
            menu: Arc::new(self.clone()),
        })
    }

    fn refresh_open_views(&self) {}

    fn refresh_ticks(&self) -> Option<NonZeroU32> {
        None
    }

    fn set_refresh_ticks(&self, _ticks: Option<NonZeroU32>) {}
}

/// A view that isn't attached to any backend.
pub struct DetachedView {
    viewer: Arc<dyn Player>,
    menu: Arc<dyn Menu>,
}

impl DetachedView {
    pub fn new(viewer: &TestPlayer) -> Self {
        let menu: Arc<dyn Menu> = match TestMenu::new(1) {
            Ok(menu) => Arc::new(menu),
            Err(err) => unreachable!("{err}"),
        };
        Self {
            viewer: Arc::new(viewer.clone()),
            menu,
        }
    }
}

impl MenuView for DetachedView {
    fn refresh(&self) {}

    fn viewer(&self) -> Arc<dyn Player> {
        self.viewer.clone()
    }

    fn menu(&self) -> Arc<dyn Menu> {
        self.menu.clone()
    }

    fn is_open(&self) -> bool {
        true
    }
}
