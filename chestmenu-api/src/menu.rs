use std::{num::NonZeroU32, sync::Arc};

use crate::{error::ApiError, icon::Icon, player::Player};

pub const MENU_COLUMNS: usize = 9;
pub const MAX_MENU_ROWS: usize = 6;

/// Index of a slot in the row-major contents of a menu.
pub const fn slot_index(row: usize, column: usize) -> usize {
    row * MENU_COLUMNS + column
}

/// A grid of icons that can be opened by any number of players at once.
pub trait Menu: Send + Sync {
    /// Name of the plugin that created the menu.
    fn plugin(&self) -> &str;

    fn title(&self) -> &str;

    fn rows(&self) -> usize;

    fn columns(&self) -> usize {
        MENU_COLUMNS
    }

    /// Places `icon` at the given position, `None` clears it. Open views show
    /// the change on their next refresh.
    fn set_icon(
        &self,
        row: usize,
        column: usize,
        icon: Option<Arc<dyn Icon>>,
    ) -> Result<(), ApiError>;

    /// The icon at the given position. Positions outside the grid hold nothing.
    fn icon(&self, row: usize, column: usize) -> Option<Arc<dyn Icon>>;

    /// Opens the menu for `player` and renders it.
    fn open(&self, player: Arc<dyn Player>) -> Arc<dyn MenuView>;

    /// Refreshes every view of this menu that is still open.
    fn refresh_open_views(&self);

    /// How often open views are refreshed on their own, in ticks.
    fn refresh_ticks(&self) -> Option<NonZeroU32>;

    fn set_refresh_ticks(&self, ticks: Option<NonZeroU32>);
}

/// One player's live rendering of an open menu.
pub trait MenuView: Send + Sync {
    /// Renders every slot again for the viewer, re-evaluating placeholders.
    ///
    /// Call it after something the icons depend on has changed. Refreshing a
    /// closed view does nothing.
    fn refresh(&self);

    fn viewer(&self) -> Arc<dyn Player>;

    fn menu(&self) -> Arc<dyn Menu>;

    /// `false` once the viewer closed the inventory or opened another menu.
    fn is_open(&self) -> bool;
}
