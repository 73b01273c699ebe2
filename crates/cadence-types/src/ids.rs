//! Type-safe identifier wrappers.
//!
//! Catalog content (achievements, missions, quests, monsters, pets,
//! furniture, NPCs, items) is keyed by stable, human-readable string ids
//! that never change between releases. Save data references catalog
//! entries by these ids only, never by copying the definition.
//!
//! Runtime-generated records (notifications) use UUID v7 (time-ordered)
//! so consumers can order and de-duplicate them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around a stable catalog key string.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
        )]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from any string-like key.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the underlying key.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }
    };
}

define_key! {
    /// Identifier of an achievement definition in the catalog.
    AchievementId
}

define_key! {
    /// Identifier of a mission definition in the catalog.
    MissionId
}

define_key! {
    /// Identifier of a narrative quest definition in the catalog.
    QuestId
}

define_key! {
    /// Identifier of a monster definition (arena battles).
    MonsterId
}

define_key! {
    /// Identifier of a pet definition. Evolved forms have their own id.
    PetId
}

define_key! {
    /// Identifier of a furniture definition.
    FurnitureId
}

define_key! {
    /// Identifier of a non-player character.
    NpcId
}

define_key! {
    /// Identifier of a training item, shop item, gift, or key item.
    ItemId
}

define_key! {
    /// Identifier of a family activity definition.
    ActivityId
}

/// Unique identifier for an emitted notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_is_raw_key() {
        let id = PetId::new("melody_cat");
        assert_eq!(id.to_string(), "melody_cat");
        assert_eq!(id.as_str(), "melody_cat");
    }

    #[test]
    fn key_serializes_as_plain_string() {
        let id = ItemId::from("major_third");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"major_third\""));
    }

    #[test]
    fn keys_work_as_json_map_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(NpcId::from("aria"), 3_u32);
        let json = serde_json::to_string(&map).unwrap_or_default();
        assert_eq!(json, "{\"aria\":3}");
    }

    #[test]
    fn notification_ids_are_unique() {
        let a = NotificationId::new();
        let b = NotificationId::new();
        assert_ne!(a, b);
        assert_ne!(a.into_inner(), Uuid::nil());
    }
}
