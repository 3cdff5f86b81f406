use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a timeline item for the lifetime of the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw item as handed over by the input-construction collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemDescriptor {
    pub id: Option<String>,
    pub title: Option<String>,
    pub card_title: Option<String>,
    pub card_subtitle: Option<String>,
    pub card_detailed_text: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub items: Vec<ItemDescriptor>,
}

impl ItemDescriptor {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

/// Normalised item consumed by every renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineItem {
    pub id: ItemId,
    pub title: String,
    pub card_title: Option<String>,
    pub card_subtitle: Option<String>,
    pub card_detailed_text: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub active: bool,
    pub visible: bool,
    pub is_nested: bool,
    pub nested_items: Vec<TimelineItem>,
}

impl TimelineItem {
    fn from_descriptor(descriptor: &ItemDescriptor, is_nested: bool) -> Self {
        Self {
            id: descriptor
                .id
                .as_deref()
                .map(ItemId::from)
                .unwrap_or_else(ItemId::generate),
            title: descriptor.title.clone().unwrap_or_default(),
            card_title: descriptor.card_title.clone(),
            card_subtitle: descriptor.card_subtitle.clone(),
            card_detailed_text: descriptor.card_detailed_text.clone(),
            date: descriptor.date,
            active: false,
            visible: true,
            is_nested,
            nested_items: descriptor
                .items
                .iter()
                .map(|nested| Self::from_descriptor(nested, true))
                .collect(),
        }
    }

    fn placeholder() -> Self {
        Self::from_descriptor(&ItemDescriptor::default(), false)
    }
}

/// Canonical ordered item collection.
///
/// Exactly one item is active whenever the store is non-empty, except after
/// an explicit [`ItemStore::set_active`] with `None`, which blanks every item.
#[derive(Debug, Default, Clone)]
pub struct ItemStore {
    items: Vec<TimelineItem>,
    active: Option<usize>,
    from_children: bool,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection with fresh items. The item at `initial`
    /// (clamped) becomes active.
    pub fn replace(&mut self, descriptors: &[ItemDescriptor], initial: usize) -> Option<usize> {
        self.items = descriptors
            .iter()
            .map(|descriptor| TimelineItem::from_descriptor(descriptor, false))
            .collect();
        self.from_children = false;
        self.set_active(Some(initial))
    }

    /// Rebuilds every item from the longer collection. Items at positions
    /// `0..previous_len` keep their id unless the descriptor names one or the
    /// store only held child placeholders. The first appended item becomes
    /// active.
    pub fn grow(&mut self, descriptors: &[ItemDescriptor], previous_len: usize) -> Option<usize> {
        let previous_len = previous_len.min(self.items.len());
        let keep_ids = !self.from_children;
        let items: Vec<TimelineItem> = descriptors
            .iter()
            .enumerate()
            .map(|(position, descriptor)| {
                let mut item = TimelineItem::from_descriptor(descriptor, false);
                if keep_ids && position < previous_len && descriptor.id.is_none() {
                    item.id = self.items[position].id.clone();
                }
                item
            })
            .collect();
        self.items = items;
        self.from_children = false;
        self.set_active(Some(previous_len))
    }

    /// Synthesises placeholder items when the host supplies content as
    /// children instead of structured descriptors.
    pub fn derive_from_children(&mut self, child_count: usize, initial: usize) -> Option<usize> {
        self.items = (0..child_count).map(|_| TimelineItem::placeholder()).collect();
        self.from_children = true;
        self.set_active(Some(initial))
    }

    /// Marks the item at `index` active, clamping to the last item. `None`
    /// deactivates and hides every item.
    pub fn set_active(&mut self, index: Option<usize>) -> Option<usize> {
        let resolved = match index {
            Some(_) if self.items.is_empty() => None,
            Some(index) => Some(index.min(self.items.len() - 1)),
            None => None,
        };

        for (position, item) in self.items.iter_mut().enumerate() {
            item.active = Some(position) == resolved;
            item.visible = index.is_some();
        }

        self.active = resolved;
        resolved
    }

    pub fn items(&self) -> &[TimelineItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&TimelineItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_item(&self) -> Option<&TimelineItem> {
        self.active.and_then(|index| self.items.get(index))
    }

    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.items.iter().map(|item| &item.id)
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| item.active).count()
    }
}
