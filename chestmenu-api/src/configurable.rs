use std::{
    collections::BTreeMap,
    fmt,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use serde_json::{Map, Value};

use crate::{
    backend::Backend,
    error::ApiError,
    icon::{Appearance, ClickableIcon},
    item::{Color, DyeColor, Enchantment, ItemStack, Material, Pattern},
    player::Player,
};

/// Turns a set of icon attributes into an item for one viewer.
///
/// Implemented by the backend, which knows how placeholders and colors are
/// resolved.
pub trait ItemRenderer: Send + Sync {
    fn render_item(&self, attributes: &IconAttributes, viewer: &dyn Player) -> Option<ItemStack>;
}

/// Raw NBT data, kept both as the text it was set from and as parsed JSON.
#[derive(Clone, Debug, PartialEq)]
struct NbtData {
    raw: String,
    compound: Map<String, Value>,
}

impl NbtData {
    fn parse(raw: &str) -> Result<Self, ApiError> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(compound)) => Ok(Self {
                raw: raw.to_string(),
                compound,
            }),
            Ok(other) => Err(ApiError::InvalidNbtData(format!(
                "expected a compound, found {other}"
            ))),
            Err(err) => Err(ApiError::InvalidNbtData(err.to_string())),
        }
    }

    fn display_entry(&self, key: &str) -> Option<&Value> {
        self.compound.get("display")?.as_object()?.get(key)
    }
}

/// Everything that decides how a configurable icon looks.
///
/// Unset attributes are `None` and leave the item (or its NBT data)
/// untouched. Explicit attributes always win over the same values inside
/// the NBT data.
#[derive(Clone, Debug, PartialEq)]
pub struct IconAttributes {
    material: Material,
    amount: u8,
    durability: u16,
    nbt_data: Option<NbtData>,
    name: Option<String>,
    lore: Option<Vec<String>>,
    enchantments: Option<BTreeMap<Enchantment, u32>>,
    leather_color: Option<Color>,
    skull_owner: Option<String>,
    banner_color: Option<DyeColor>,
    banner_patterns: Option<Vec<Pattern>>,
    placeholders_enabled: bool,
}

impl IconAttributes {
    pub fn new(material: Material) -> Self {
        Self {
            material,
            amount: 1,
            durability: 0,
            nbt_data: None,
            name: None,
            lore: None,
            enchantments: None,
            leather_color: None,
            skull_owner: None,
            banner_color: None,
            banner_patterns: None,
            placeholders_enabled: false,
        }
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn set_amount(&mut self, amount: u8) {
        self.amount = amount;
    }

    pub fn amount(&self) -> u8 {
        self.amount
    }

    pub fn set_durability(&mut self, durability: u16) {
        self.durability = durability;
    }

    pub fn durability(&self) -> u16 {
        self.durability
    }

    /// Sets the NBT data as a JSON object, `None` removes it.
    ///
    /// Invalid data is rejected right away and the previous value is kept.
    pub fn set_nbt_data(&mut self, nbt_data: Option<&str>) -> Result<(), ApiError> {
        self.nbt_data = nbt_data.map(NbtData::parse).transpose()?;
        Ok(())
    }

    pub fn nbt_data(&self) -> Option<&str> {
        self.nbt_data.as_ref().map(|nbt| nbt.raw.as_str())
    }

    /// The parsed NBT data.
    pub fn nbt_compound(&self) -> Option<&Map<String, Value>> {
        self.nbt_data.as_ref().map(|nbt| &nbt.compound)
    }

    /// Sets the first tooltip line. May contain `&` color codes.
    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_lore(&mut self, lore: Option<Vec<String>>) {
        self.lore = lore;
    }

    pub fn set_lore_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lore = Some(lines.into_iter().map(Into::into).collect());
    }

    pub fn lore(&self) -> Option<&[String]> {
        self.lore.as_deref()
    }

    /// The name the rendered item ends up with: the explicit name, or the one
    /// from the NBT data.
    pub fn effective_name(&self) -> Option<&str> {
        self.name().or_else(|| {
            self.nbt_data
                .as_ref()?
                .display_entry("Name")?
                .as_str()
        })
    }

    /// The lore the rendered item ends up with: the explicit lore, or the one
    /// from the NBT data.
    pub fn effective_lore(&self) -> Option<Vec<&str>> {
        if let Some(lore) = &self.lore {
            return Some(lore.iter().map(String::as_str).collect());
        }
        let lines = self.nbt_data.as_ref()?.display_entry("Lore")?.as_array()?;
        Some(lines.iter().filter_map(Value::as_str).collect())
    }

    pub fn set_enchantments(&mut self, enchantments: Option<BTreeMap<Enchantment, u32>>) {
        self.enchantments = enchantments;
    }

    pub fn enchantments(&self) -> Option<&BTreeMap<Enchantment, u32>> {
        self.enchantments.as_ref()
    }

    /// Adds a level 1 enchantment.
    pub fn add_enchantment(&mut self, enchantment: Enchantment) {
        self.add_enchantment_level(enchantment, 1);
    }

    pub fn add_enchantment_level(&mut self, enchantment: Enchantment, level: u32) {
        self.enchantments
            .get_or_insert_with(BTreeMap::new)
            .insert(enchantment, level);
    }

    pub fn remove_enchantment(&mut self, enchantment: &Enchantment) {
        if let Some(enchantments) = &mut self.enchantments {
            enchantments.remove(enchantment);
        }
    }

    pub fn set_leather_color(&mut self, leather_color: Option<Color>) {
        self.leather_color = leather_color;
    }

    pub fn leather_color(&self) -> Option<Color> {
        self.leather_color
    }

    pub fn set_skull_owner(&mut self, skull_owner: Option<&str>) {
        self.skull_owner = skull_owner.map(str::to_string);
    }

    pub fn skull_owner(&self) -> Option<&str> {
        self.skull_owner.as_deref()
    }

    pub fn set_banner_color(&mut self, banner_color: Option<DyeColor>) {
        self.banner_color = banner_color;
    }

    pub fn banner_color(&self) -> Option<DyeColor> {
        self.banner_color
    }

    pub fn set_banner_patterns(&mut self, banner_patterns: Option<Vec<Pattern>>) {
        self.banner_patterns = banner_patterns;
    }

    pub fn banner_patterns(&self) -> Option<&[Pattern]> {
        self.banner_patterns.as_deref()
    }

    pub fn set_placeholders_enabled(&mut self, enabled: bool) {
        self.placeholders_enabled = enabled;
    }

    pub fn placeholders_enabled(&self) -> bool {
        self.placeholders_enabled
    }
}

/// Icon attributes paired with the renderer that draws them.
pub struct ConfiguredAppearance {
    attributes: IconAttributes,
    renderer: Arc<dyn ItemRenderer>,
}

impl ConfiguredAppearance {
    pub fn new(attributes: IconAttributes, renderer: Arc<dyn ItemRenderer>) -> Self {
        Self {
            attributes,
            renderer,
        }
    }

    pub fn attributes(&self) -> &IconAttributes {
        &self.attributes
    }
}

impl fmt::Debug for ConfiguredAppearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredAppearance")
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl Appearance for ConfiguredAppearance {
    fn render(&self, viewer: &dyn Player) -> Option<ItemStack> {
        self.renderer.render_item(&self.attributes, viewer)
    }
}

impl Deref for ConfiguredAppearance {
    type Target = IconAttributes;

    fn deref(&self) -> &Self::Target {
        &self.attributes
    }
}

impl DerefMut for ConfiguredAppearance {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.attributes
    }
}

/// A clickable icon whose look is described attribute by attribute.
pub type ConfigurableIcon = ClickableIcon<ConfiguredAppearance>;

impl ConfigurableIcon {
    /// Creates an icon through the backend, so it renders the backend's way.
    pub fn create(backend: &dyn Backend, material: Material) -> Self {
        backend.create_configurable_icon(material)
    }

    pub fn with_renderer(material: Material, renderer: Arc<dyn ItemRenderer>) -> Self {
        Self::new(ConfiguredAppearance::new(
            IconAttributes::new(material),
            renderer,
        ))
    }
}
