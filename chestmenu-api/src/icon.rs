use std::{
    ops::{Deref, DerefMut},
    sync::Arc,
};

use crate::{
    click::{ClickHandler, ClickResult},
    item::ItemStack,
    menu::MenuView,
    player::Player,
};

/// Something that can be placed in a menu slot.
pub trait Icon: Send + Sync {
    /// Creates the item shown for `viewer`, or `None` to leave the slot empty.
    ///
    /// Runs every time a view is refreshed, so it must not block.
    fn render(&self, viewer: &dyn Player) -> Option<ItemStack>;

    /// Called once per click on the icon; the result decides whether the
    /// menu stays open.
    fn on_click(&self, menu_view: &dyn MenuView, clicker: &dyn Player) -> ClickResult;
}

/// The rendering half of an icon.
pub trait Appearance: Send + Sync {
    fn render(&self, viewer: &dyn Player) -> Option<ItemStack>;
}

/// A fixed item is its own appearance.
impl Appearance for ItemStack {
    fn render(&self, _viewer: &dyn Player) -> Option<ItemStack> {
        Some(self.clone())
    }
}

/// An icon with an optional click handler.
///
/// Clicks always go to the handler when one is set and keep the menu open
/// otherwise; that behaviour belongs to this type and can't be replaced.
/// The appearance is reachable through `Deref`.
pub struct ClickableIcon<A> {
    appearance: A,
    click_handler: Option<Arc<dyn ClickHandler>>,
}

/// An icon that always shows the same item.
pub type StaticIcon = ClickableIcon<ItemStack>;

impl<A: Appearance> ClickableIcon<A> {
    pub fn new(appearance: A) -> Self {
        Self {
            appearance,
            click_handler: None,
        }
    }

    pub fn with_click_handler(mut self, handler: impl ClickHandler + 'static) -> Self {
        self.click_handler = Some(Arc::new(handler));
        self
    }

    /// Sets the click handler, `None` removes it.
    pub fn set_click_handler(&mut self, handler: Option<Arc<dyn ClickHandler>>) {
        self.click_handler = handler;
    }

    pub fn click_handler(&self) -> Option<&Arc<dyn ClickHandler>> {
        self.click_handler.as_ref()
    }

    pub fn appearance(&self) -> &A {
        &self.appearance
    }

    pub fn appearance_mut(&mut self) -> &mut A {
        &mut self.appearance
    }

    pub fn into_appearance(self) -> A {
        self.appearance
    }
}

impl<A: Appearance> Icon for ClickableIcon<A> {
    fn render(&self, viewer: &dyn Player) -> Option<ItemStack> {
        self.appearance.render(viewer)
    }

    fn on_click(&self, menu_view: &dyn MenuView, clicker: &dyn Player) -> ClickResult {
        match &self.click_handler {
            Some(handler) => handler.on_click(menu_view, clicker),
            None => ClickResult::KeepOpen,
        }
    }
}

impl<A> Deref for ClickableIcon<A> {
    type Target = A;

    fn deref(&self) -> &Self::Target {
        &self.appearance
    }
}

impl<A> DerefMut for ClickableIcon<A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.appearance
    }
}
