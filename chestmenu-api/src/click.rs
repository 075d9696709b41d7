use crate::{menu::MenuView, player::Player};

/// What happens to the menu after an icon was clicked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClickResult {
    #[default]
    KeepOpen,
    Close,
}

/// Reacts to a click on an icon.
///
/// Any `Fn(&dyn MenuView, &dyn Player) -> ClickResult` closure is a handler.
pub trait ClickHandler: Send + Sync {
    fn on_click(&self, menu_view: &dyn MenuView, clicker: &dyn Player) -> ClickResult;
}

impl<F> ClickHandler for F
where
    F: Fn(&dyn MenuView, &dyn Player) -> ClickResult + Send + Sync,
{
    fn on_click(&self, menu_view: &dyn MenuView, clicker: &dyn Player) -> ClickResult {
        self(menu_view, clicker)
    }
}
