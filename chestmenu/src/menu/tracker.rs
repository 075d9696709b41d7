use std::{collections::HashMap, sync::Arc};

use chestmenu_api::{Menu, MenuView, Player};
use parking_lot::RwLock;
use uuid::Uuid;

use super::{ChestMenu, ChestMenuView};

/// The menu view each online player has open, at most one per player.
#[derive(Default)]
pub struct OpenViews {
    views: RwLock<HashMap<Uuid, Arc<ChestMenuView>>>,
}

impl OpenViews {
    /// Opens `menu` for `player`, replacing whatever view they had before.
    pub fn open(&self, menu: &ChestMenu, player: Arc<dyn Player>) -> Arc<ChestMenuView> {
        let uuid = player.uuid();
        let view = Arc::new(ChestMenuView::new(menu.clone(), player));
        let previous = self.views.write().insert(uuid, view.clone());
        if let Some(previous) = previous {
            previous.invalidate();
        }

        view.refresh();
        log::debug!(
            "Opened menu {:?} of {} for {}",
            menu.title(),
            menu.plugin(),
            view.viewer().name()
        );
        view
    }

    pub fn get(&self, uuid: &Uuid) -> Option<Arc<ChestMenuView>> {
        self.views.read().get(uuid).cloned()
    }

    /// Forgets the view of `uuid`. The player's client is not touched.
    pub fn close(&self, uuid: &Uuid) -> Option<Arc<ChestMenuView>> {
        let view = self.views.write().remove(uuid)?;
        view.invalidate();
        log::debug!(
            "{} closed menu {:?}",
            view.viewer().name(),
            view.chest_menu().title()
        );
        Some(view)
    }

    /// Closes `view` unless another menu replaced it in the meantime.
    pub fn close_if_current(&self, view: &Arc<ChestMenuView>) -> bool {
        let uuid = view.viewer().uuid();
        let mut views = self.views.write();
        if !views
            .get(&uuid)
            .is_some_and(|current| Arc::ptr_eq(current, view))
        {
            return false;
        }
        views.remove(&uuid);
        drop(views);
        view.invalidate();
        true
    }

    /// Every open view of `menu`.
    pub fn views_of(&self, menu: &ChestMenu) -> Vec<Arc<ChestMenuView>> {
        self.views
            .read()
            .values()
            .filter(|view| view.chest_menu().same_menu(menu))
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<Arc<ChestMenuView>> {
        self.views.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.views.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.read().is_empty()
    }
}
