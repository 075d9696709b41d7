use std::{borrow::Cow, sync::Arc};

use chestmenu_api::{Enchantment, IconAttributes, ItemRenderer, ItemStack, Player};
use serde_json::{Map, Value, json};

use crate::{placeholder::PlaceholderRegistry, text::translate_color_codes};

/// Returns the compound stored under `key`, replacing anything else there.
fn compound_mut<'a>(tag: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = tag
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    let Value::Object(compound) = entry else {
        unreachable!("the entry was just made a compound");
    };
    compound
}

/// Renders icon attributes the way item NBT lays them out, starting from the
/// icon's own NBT data and overriding it with every explicit attribute.
pub struct DefaultItemRenderer {
    placeholders: Arc<PlaceholderRegistry>,
    placeholders_enabled: bool,
    translate_colors: bool,
}

impl DefaultItemRenderer {
    pub fn new(
        placeholders: Arc<PlaceholderRegistry>,
        placeholders_enabled: bool,
        translate_colors: bool,
    ) -> Self {
        Self {
            placeholders,
            placeholders_enabled,
            translate_colors,
        }
    }

    fn render_text(&self, text: &str, attributes: &IconAttributes, viewer: &dyn Player) -> String {
        let colored = if self.translate_colors {
            translate_color_codes(text)
        } else {
            Cow::Borrowed(text)
        };
        if self.placeholders_enabled && attributes.placeholders_enabled() {
            self.placeholders.replace(&colored, viewer).into_owned()
        } else {
            colored.into_owned()
        }
    }

    fn apply_enchantments(attributes: &IconAttributes, tag: &mut Map<String, Value>) {
        let Some(enchantments) = attributes.enchantments() else {
            return;
        };
        let mut list: Vec<Value> = match tag.remove("Enchantments") {
            Some(Value::Array(existing)) => existing
                .into_iter()
                .filter(|entry| {
                    let id = entry.get("id").and_then(Value::as_str);
                    !id.is_some_and(|id| {
                        enchantments
                            .keys()
                            .any(|enchantment| *enchantment == Enchantment::new(id))
                    })
                })
                .collect(),
            _ => Vec::new(),
        };
        list.extend(
            enchantments
                .iter()
                .map(|(enchantment, level)| json!({ "id": enchantment.as_str(), "lvl": level })),
        );
        tag.insert("Enchantments".to_string(), Value::Array(list));
    }

    fn apply_banner(attributes: &IconAttributes, tag: &mut Map<String, Value>) {
        if attributes.banner_color().is_none() && attributes.banner_patterns().is_none() {
            return;
        }
        let block_entity = compound_mut(tag, "BlockEntityTag");
        if let Some(color) = attributes.banner_color() {
            block_entity.insert("Base".to_string(), Value::from(color.id()));
        }
        if let Some(patterns) = attributes.banner_patterns() {
            let patterns = patterns
                .iter()
                .map(|pattern| json!({ "Pattern": pattern.pattern.id(), "Color": pattern.color.id() }))
                .collect();
            block_entity.insert("Patterns".to_string(), Value::Array(patterns));
        }
    }
}

impl ItemRenderer for DefaultItemRenderer {
    fn render_item(&self, attributes: &IconAttributes, viewer: &dyn Player) -> Option<ItemStack> {
        let material = attributes.material();
        if material.is_air() {
            return None;
        }

        let mut item = ItemStack::new(attributes.amount(), material.clone());
        item.durability = attributes.durability();
        if let Some(compound) = attributes.nbt_compound() {
            item.tag = compound.clone();
        }

        if let Some(name) = attributes.name() {
            let name = self.render_text(name, attributes, viewer);
            compound_mut(&mut item.tag, "display").insert("Name".to_string(), Value::String(name));
        }
        if let Some(lore) = attributes.lore() {
            let lore = lore
                .iter()
                .map(|line| Value::String(self.render_text(line, attributes, viewer)))
                .collect();
            compound_mut(&mut item.tag, "display").insert("Lore".to_string(), Value::Array(lore));
        }

        Self::apply_enchantments(attributes, &mut item.tag);

        if let Some(color) = attributes.leather_color() {
            if material.is_leather_armor() {
                compound_mut(&mut item.tag, "display")
                    .insert("color".to_string(), Value::from(color.rgb()));
            }
        }
        if let Some(owner) = attributes.skull_owner() {
            if material.is_player_head() {
                item.tag
                    .insert("SkullOwner".to_string(), Value::String(owner.to_string()));
            }
        }
        if material.is_banner() {
            Self::apply_banner(attributes, &mut item.tag);
        }

        Some(item)
    }
}
