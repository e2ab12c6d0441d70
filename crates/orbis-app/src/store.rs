//! In-process application store: the state the globe reads from and
//! reports into.

use orbis_globe::{Category, CursorHint, CursorSink, ItemId, LoadingSink, SelectionSink};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct AppStore {
    category: Category,
    selected: Option<ItemId>,
    globe_loaded: bool,
}

impl AppStore {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            ..Self::default()
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Switch category. The selection belongs to the old list, so it is
    /// cleared on an actual change.
    pub fn set_category(&mut self, category: Category) {
        if category == self.category {
            return;
        }
        info!(from = %self.category, to = %category, "category changed");
        self.category = category;
        self.selected = None;
    }

    pub fn toggle_category(&mut self) {
        self.set_category(self.category.toggled());
    }

    pub fn selected(&self) -> Option<&ItemId> {
        self.selected.as_ref()
    }

    pub fn deselect(&mut self) {
        if let Some(id) = self.selected.take() {
            debug!(item = %id, "selection cleared");
        }
    }

    pub fn is_globe_loaded(&self) -> bool {
        self.globe_loaded
    }
}

impl SelectionSink for AppStore {
    fn select(&mut self, id: ItemId) {
        self.selected = Some(id);
    }
}

impl LoadingSink for AppStore {
    fn set_globe_loaded(&mut self, loaded: bool) {
        if loaded && !self.globe_loaded {
            info!("globe ready");
        }
        self.globe_loaded = loaded;
    }
}

/// Cursor shape requested by the globe, applied to the window on change.
#[derive(Debug, Default)]
pub struct CursorTracker {
    cursor: CursorHint,
    dirty: bool,
}

impl CursorTracker {
    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    /// The cursor hint if it changed since the last call.
    pub fn take_change(&mut self) -> Option<CursorHint> {
        std::mem::take(&mut self.dirty).then_some(self.cursor)
    }
}

impl CursorSink for CursorTracker {
    fn set_cursor(&mut self, hint: CursorHint) {
        if hint != self.cursor {
            self.cursor = hint;
            self.dirty = true;
        }
    }
}
