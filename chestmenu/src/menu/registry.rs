use std::{collections::HashMap, sync::Arc};

use chestmenu_api::Menu;
use parking_lot::RwLock;

/// Menus other plugins can open by file name, matched case-insensitively.
#[derive(Default)]
pub struct PluginMenus {
    menus: RwLock<HashMap<String, Arc<dyn Menu>>>,
}

impl PluginMenus {
    /// Registers `menu` under `file_name`, returning the menu it replaced.
    pub fn register(&self, file_name: &str, menu: Arc<dyn Menu>) -> Option<Arc<dyn Menu>> {
        let previous = self.menus.write().insert(file_name.to_lowercase(), menu);
        if previous.is_some() {
            log::warn!("Menu file {file_name} was registered twice, keeping the newer menu");
        }
        previous
    }

    pub fn unregister(&self, file_name: &str) -> Option<Arc<dyn Menu>> {
        self.menus.write().remove(&file_name.to_lowercase())
    }

    /// Removes every menu created by `plugin`, returning how many.
    pub fn unregister_plugin(&self, plugin: &str) -> usize {
        let mut menus = self.menus.write();
        let before = menus.len();
        menus.retain(|_, menu| !menu.plugin().eq_ignore_ascii_case(plugin));
        before - menus.len()
    }

    pub fn get(&self, file_name: &str) -> Option<Arc<dyn Menu>> {
        self.menus.read().get(&file_name.to_lowercase()).cloned()
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.menus.read().contains_key(&file_name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.menus.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chestmenu_api::test_support::TestMenu;

    use super::*;

    #[test]
    fn case_insensitive_lookup() {
        let menus = PluginMenus::default();
        assert!(menus.is_empty());
        assert!(menus.register("Shop.yml", Arc::new(TestMenu::new(3).unwrap())).is_none());

        assert!(menus.contains("shop.yml"));
        assert!(menus.contains("SHOP.YML"));
        assert!(!menus.contains("shop"));
        assert_eq!(menus.get("shop.yml").unwrap().rows(), 3);

        let previous = menus.register("shop.yml", Arc::new(TestMenu::new(1).unwrap()));
        assert_eq!(previous.unwrap().rows(), 3);
        assert_eq!(menus.len(), 1);

        assert!(menus.unregister("Shop.YML").is_some());
        assert!(!menus.contains("shop.yml"));
    }

    #[test]
    fn unregisters_by_plugin() {
        let menus = PluginMenus::default();
        menus.register("a.yml", Arc::new(TestMenu::new(1).unwrap()));
        menus.register("b.yml", Arc::new(TestMenu::new(2).unwrap()));

        assert_eq!(menus.unregister_plugin("other"), 0);
        assert_eq!(menus.unregister_plugin("TEST"), 2);
        assert!(menus.is_empty());
    }
}
