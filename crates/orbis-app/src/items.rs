//! Item data: a RON list on disk, with built-in samples as fallback.

use std::path::{Path, PathBuf};

use orbis_geo::GeoCoordinate;
use orbis_globe::{Category, Item, ItemId};
use rustc_hash::FxHashSet;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ItemsError {
    #[error("failed to read items from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse items in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Parse a RON list of items. Later duplicates of an id are dropped and
/// out-of-range coordinates are clamped onto the globe.
pub fn load_items(path: &Path) -> Result<Vec<Item>, ItemsError> {
    let text = std::fs::read_to_string(path).map_err(|source| ItemsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let items: Vec<Item> = ron::from_str(&text).map_err(|source| ItemsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(dedup_by_id(items).into_iter().map(clamp_coordinate).collect())
}

/// Load `path`, falling back to [`builtin_items`] if it is missing or bad.
pub fn load_or_builtin(path: &Path) -> Vec<Item> {
    match load_items(path) {
        Ok(items) => {
            info!(path = %path.display(), count = items.len(), "items loaded");
            items
        }
        Err(ItemsError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no item file, using built-in samples");
            builtin_items()
        }
        Err(err) => {
            warn!(error = %err, "using built-in samples");
            builtin_items()
        }
    }
}

fn clamp_coordinate(mut item: Item) -> Item {
    let clamped = item.coordinate.clamped();
    if clamped != item.coordinate {
        warn!(
            item = %item.id,
            lat = item.coordinate.latitude,
            lng = item.coordinate.longitude,
            "coordinate out of range, clamped"
        );
        item.coordinate = clamped;
    }
    item
}

fn dedup_by_id(items: Vec<Item>) -> Vec<Item> {
    let mut seen = FxHashSet::default();
    items
        .into_iter()
        .filter(|item| {
            let fresh = seen.insert(item.id.clone());
            if !fresh {
                warn!(item = %item.id, "duplicate item id ignored");
            }
            fresh
        })
        .collect()
}

pub fn builtin_items() -> Vec<Item> {
    const SAMPLES: &[(&str, &str, &str, f32, f32, Category)] = &[
        ("flamenco-guitar", "Flamenco Guitar", "Spain", 37.3891, -5.9845, Category::Instruments),
        ("koto", "Koto", "Japan", 35.6762, 139.6503, Category::Instruments),
        ("djembe", "Djembe", "Mali", 12.6392, -8.0029, Category::Instruments),
        ("sitar", "Sitar", "India", 28.6139, 77.2090, Category::Instruments),
        ("morin-khuur", "Morin Khuur", "Mongolia", 47.8864, 106.9057, Category::Instruments),
        ("didgeridoo", "Didgeridoo", "Australia", -12.4634, 130.8456, Category::Instruments),
        ("balalaika", "Balalaika", "Russia", 55.7558, 37.6173, Category::Instruments),
        ("charango", "Charango", "Bolivia", -19.5834, -65.7531, Category::Instruments),
        ("throat-singing", "Tuvan Throat Singing", "Tuva", 51.7191, 94.4378, Category::Radio),
        ("fado", "Fado", "Portugal", 38.7223, -9.1393, Category::Radio),
        ("gamelan", "Gamelan", "Indonesia", -7.7956, 110.3695, Category::Radio),
        ("mbira-music", "Mbira Music", "Zimbabwe", -17.8292, 31.0522, Category::Radio),
        ("qawwali", "Qawwali", "Pakistan", 31.5204, 74.3587, Category::Radio),
        ("mariachi", "Mariachi", "Mexico", 20.6597, -103.3496, Category::Radio),
        ("highlife", "Highlife", "Ghana", 5.6037, -0.1870, Category::Radio),
    ];

    SAMPLES
        .iter()
        .map(|&(id, name, country, lat, lng, category)| Item {
            id: ItemId::from(id),
            name: name.to_string(),
            country: country.to_string(),
            coordinate: GeoCoordinate::new(lat, lng),
            category,
        })
        .collect()
}
