use uuid::Uuid;

use crate::item::ItemStack;

/// The host server's view of a connected player.
///
/// Menus never talk to the network themselves; they hand rendered contents
/// to the player and let the host turn them into packets.
pub trait Player: Send + Sync {
    fn uuid(&self) -> Uuid;

    fn name(&self) -> &str;

    /// Shows a chest inventory with `contents`, one entry per slot in row-major
    /// order. Called on open and again after every refresh, so the host should
    /// update the window in place when the same one is already shown.
    fn show_inventory(&self, title: &str, contents: &[Option<ItemStack>]);

    fn close_inventory(&self);
}
