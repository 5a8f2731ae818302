use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Opaque identity of a menu item, stable across reorders.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemId(String);

crate::impl_string_newtype!(ItemId);

impl ItemId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Key resolved by the external icon service.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct IconKey(String);

crate::impl_string_newtype!(IconKey);

/// Key combination such as `Ctrl+C`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct KeyCombo(String);

crate::impl_string_newtype!(KeyCombo);

/// Handle to an in-process callback. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct CallbackHandle(u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Shortcut(KeyCombo),
    Command(String),
    LaunchPath(PathBuf),
    #[serde(skip)]
    Callback(CallbackHandle),
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A node of the menu tree. An item without an action and with children only opens its
/// submenu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default = "ItemId::generate")]
    pub id: ItemId,
    pub label: String,
    #[serde(default)]
    pub icon: IconKey,
    #[serde(default, skip_serializing_if = "is_false")]
    pub toggled: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub keep_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: ItemId::generate(),
            label: label.into(),
            icon: IconKey::default(),
            toggled: false,
            keep_open: false,
            action: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = ItemId::new(id);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = IconKey::new(icon);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children;
        self
    }

    pub fn keeping_open(mut self) -> Self {
        self.keep_open = true;
        self
    }

    pub fn has_submenu(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_submenu_only(&self) -> bool {
        self.has_submenu() && self.action.is_none()
    }
}

/// Ids of `items`, in order.
pub fn item_ids(items: &[MenuItem]) -> Vec<ItemId> {
    items.iter().map(|item| item.id.clone()).collect()
}
