use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DEFAULT_NAMESPACE: &str = "minecraft";

fn normalize_id(id: &str) -> String {
    let id = id.trim().to_ascii_lowercase();
    if id.contains(':') {
        id
    } else {
        format!("{DEFAULT_NAMESPACE}:{id}")
    }
}

macro_rules! namespaced_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Lowercases the id and adds the `minecraft` namespace if it has none.
            pub fn new(id: impl AsRef<str>) -> Self {
                Self(normalize_id(id.as_ref()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The id without its namespace.
            pub fn path(&self) -> &str {
                self.0.split_once(':').map_or(self.0.as_str(), |(_, path)| path)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self::new(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

namespaced_id!(
    /// The item type an icon is displayed as.
    Material
);

namespaced_id!(
    /// An enchantment id such as `minecraft:sharpness`.
    Enchantment
);

impl Material {
    pub fn is_air(&self) -> bool {
        matches!(self.path(), "air" | "cave_air" | "void_air")
    }

    pub fn is_leather_armor(&self) -> bool {
        matches!(
            self.path(),
            "leather_helmet"
                | "leather_chestplate"
                | "leather_leggings"
                | "leather_boots"
                | "leather_horse_armor"
        )
    }

    pub fn is_player_head(&self) -> bool {
        matches!(self.path(), "player_head" | "skull")
    }

    pub fn is_banner(&self) -> bool {
        let path = self.path();
        path.ends_with("banner") || path == "shield"
    }
}

/// An RGB color, used for dyed leather armor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Builds a color from a packed `0xRRGGBB` value, ignoring the upper byte.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            red: (rgb >> 16) as u8,
            green: (rgb >> 8) as u8,
            blue: rgb as u8,
        }
    }

    pub const fn rgb(&self) -> u32 {
        ((self.red as u32) << 16) | ((self.green as u32) << 8) | self.blue as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DyeColor {
    White,
    Orange,
    Magenta,
    LightBlue,
    Yellow,
    Lime,
    Pink,
    Gray,
    LightGray,
    Cyan,
    Purple,
    Blue,
    Brown,
    Green,
    Red,
    Black,
}

impl DyeColor {
    pub fn id(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Orange => "orange",
            Self::Magenta => "magenta",
            Self::LightBlue => "light_blue",
            Self::Yellow => "yellow",
            Self::Lime => "lime",
            Self::Pink => "pink",
            Self::Gray => "gray",
            Self::LightGray => "light_gray",
            Self::Cyan => "cyan",
            Self::Purple => "purple",
            Self::Blue => "blue",
            Self::Brown => "brown",
            Self::Green => "green",
            Self::Red => "red",
            Self::Black => "black",
        }
    }
}

/// The shape of one banner layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Base,
    SquareBottomLeft,
    SquareBottomRight,
    SquareTopLeft,
    SquareTopRight,
    StripeBottom,
    StripeTop,
    StripeLeft,
    StripeRight,
    StripeCenter,
    StripeMiddle,
    StripeDownright,
    StripeDownleft,
    SmallStripes,
    Cross,
    StraightCross,
    TriangleBottom,
    TriangleTop,
    TrianglesBottom,
    TrianglesTop,
    DiagonalLeft,
    DiagonalUpRight,
    DiagonalUpLeft,
    DiagonalRight,
    Circle,
    Rhombus,
    HalfVertical,
    HalfHorizontal,
    HalfVerticalRight,
    HalfHorizontalBottom,
    Border,
    CurlyBorder,
    Gradient,
    GradientUp,
    Bricks,
    Globe,
    Creeper,
    Skull,
    Flower,
    Mojang,
    Piglin,
}

impl PatternType {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::SquareBottomLeft => "square_bottom_left",
            Self::SquareBottomRight => "square_bottom_right",
            Self::SquareTopLeft => "square_top_left",
            Self::SquareTopRight => "square_top_right",
            Self::StripeBottom => "stripe_bottom",
            Self::StripeTop => "stripe_top",
            Self::StripeLeft => "stripe_left",
            Self::StripeRight => "stripe_right",
            Self::StripeCenter => "stripe_center",
            Self::StripeMiddle => "stripe_middle",
            Self::StripeDownright => "stripe_downright",
            Self::StripeDownleft => "stripe_downleft",
            Self::SmallStripes => "small_stripes",
            Self::Cross => "cross",
            Self::StraightCross => "straight_cross",
            Self::TriangleBottom => "triangle_bottom",
            Self::TriangleTop => "triangle_top",
            Self::TrianglesBottom => "triangles_bottom",
            Self::TrianglesTop => "triangles_top",
            Self::DiagonalLeft => "diagonal_left",
            Self::DiagonalUpRight => "diagonal_up_right",
            Self::DiagonalUpLeft => "diagonal_up_left",
            Self::DiagonalRight => "diagonal_right",
            Self::Circle => "circle",
            Self::Rhombus => "rhombus",
            Self::HalfVertical => "half_vertical",
            Self::HalfHorizontal => "half_horizontal",
            Self::HalfVerticalRight => "half_vertical_right",
            Self::HalfHorizontalBottom => "half_horizontal_bottom",
            Self::Border => "border",
            Self::CurlyBorder => "curly_border",
            Self::Gradient => "gradient",
            Self::GradientUp => "gradient_up",
            Self::Bricks => "bricks",
            Self::Globe => "globe",
            Self::Creeper => "creeper",
            Self::Skull => "skull",
            Self::Flower => "flower",
            Self::Mojang => "mojang",
            Self::Piglin => "piglin",
        }
    }
}

/// One layer of a banner: a shape drawn in a dye color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    pub color: DyeColor,
    pub pattern: PatternType,
}

impl Pattern {
    pub const fn new(color: DyeColor, pattern: PatternType) -> Self {
        Self { color, pattern }
    }
}

/// A rendered item, ready to be put into an inventory slot.
///
/// Display data lives in `tag`, laid out the way item NBT is:
/// `display.Name`, `display.Lore`, `display.color`, `Enchantments`,
/// `SkullOwner` and `BlockEntityTag`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: Material,
    pub count: u8,
    #[serde(default)]
    pub durability: u16,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub tag: Map<String, Value>,
}

impl ItemStack {
    pub fn new(count: u8, material: Material) -> Self {
        Self {
            material,
            count,
            durability: 0,
            tag: Map::new(),
        }
    }

    fn display(&self) -> Option<&Map<String, Value>> {
        self.tag.get("display")?.as_object()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display()?.get("Name")?.as_str()
    }

    pub fn lore(&self) -> Option<Vec<&str>> {
        let lines = self.display()?.get("Lore")?.as_array()?;
        Some(lines.iter().filter_map(Value::as_str).collect())
    }

    pub fn leather_color(&self) -> Option<Color> {
        let rgb = self.display()?.get("color")?.as_u64()?;
        Some(Color::from_rgb(rgb as u32))
    }

    pub fn enchantment_level(&self, enchantment: &Enchantment) -> Option<u32> {
        self.tag
            .get("Enchantments")?
            .as_array()?
            .iter()
            .find(|entry| {
                entry
                    .get("id")
                    .and_then(Value::as_str)
                    .is_some_and(|id| Enchantment::new(id) == *enchantment)
            })?
            .get("lvl")?
            .as_u64()
            .map(|level| level as u32)
    }

    pub fn skull_owner(&self) -> Option<&str> {
        self.tag.get("SkullOwner")?.as_str()
    }
}
