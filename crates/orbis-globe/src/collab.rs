//! Types and traits shared with the collaborators around the globe: the
//! item data layer, the selection store, the loading screen and the window
//! cursor.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use orbis_geo::GeoCoordinate;
use serde::{Deserialize, Serialize};

/// Stable identifier of an item, unique within the data set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Which collection is on the globe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Instruments,
    Radio,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Instruments, Category::Radio];

    /// The other category.
    pub fn toggled(self) -> Self {
        match self {
            Category::Instruments => Category::Radio,
            Category::Radio => Category::Instruments,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Instruments => "instruments",
            Category::Radio => "radio",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown category `{0}` (expected `instruments` or `radio`)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instruments" | "instrument" => Ok(Category::Instruments),
            "radio" => Ok(Category::Radio),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// One geo-located record from the data layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub coordinate: GeoCoordinate,
    pub category: Category,
}

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// The item list shown on the globe.
///
/// Every new or replaced list gets a revision no other list has had, so
/// the globe can skip marker sync while neither the list nor the category
/// changes.
#[derive(Clone, Debug)]
pub struct ItemCatalog {
    items: Vec<Item>,
    revision: u64,
}

impl ItemCatalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            revision: next_revision(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn replace(&mut self, items: Vec<Item>) {
        self.items = items;
        self.revision = next_revision();
    }

    /// Items shown for `category`.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(move |i| i.category == category)
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Receives marker clicks.
pub trait SelectionSink {
    fn select(&mut self, id: ItemId);
}

/// Told once when the globe's textures have resolved and settled.
pub trait LoadingSink {
    fn set_globe_loaded(&mut self, loaded: bool);
}

/// Cursor shape requested by the globe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorHint {
    #[default]
    Default,
    /// Over a clickable marker.
    Pointer,
}

pub trait CursorSink {
    fn set_cursor(&mut self, hint: CursorHint);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_and_toggle() {
        assert_eq!("Radio".parse::<Category>(), Ok(Category::Radio));
        assert_eq!(" instruments ".parse::<Category>(), Ok(Category::Instruments));
        assert!("jazz".parse::<Category>().is_err());
        assert_eq!(Category::Radio.toggled(), Category::Instruments);
        assert_eq!(Category::Instruments.to_string(), "instruments");
    }

    #[test]
    fn test_item_from_ron() {
        let src = r#"(
            id: "koto",
            name: "Koto",
            country: "Japan",
            coordinate: (lat: 35.6762, lng: 139.6503),
            category: instruments,
        )"#;
        let item: Item = ron::from_str(src).unwrap();
        assert_eq!(item.id, ItemId::from("koto"));
        assert_eq!(item.category, Category::Instruments);
        assert!((item.coordinate.longitude - 139.6503).abs() < 1e-4);
    }

    #[test]
    fn test_catalog_revision_changes_on_replace() {
        let item = |id: &str, category| Item {
            id: ItemId::from(id),
            name: id.to_string(),
            country: String::new(),
            coordinate: GeoCoordinate::new(0.0, 0.0),
            category,
        };
        let mut catalog = ItemCatalog::new(vec![item("koto", Category::Instruments), item("fado", Category::Radio)]);
        let other = ItemCatalog::default();
        assert_ne!(catalog.revision(), other.revision());
        assert_eq!(catalog.in_category(Category::Radio).count(), 1);

        let before = catalog.revision();
        catalog.replace(vec![item("qawwali", Category::Radio)]);
        assert_ne!(catalog.revision(), before);
        assert_eq!(catalog.items().len(), 1);
        assert_eq!(catalog.in_category(Category::Instruments).count(), 0);
    }
}
