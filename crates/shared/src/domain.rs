use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }
    };
}

id_newtype!(ListId);
id_newtype!(ItemId);

/// Activity marker shared by the global status record and per-list entity status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Client-only display filter attached to every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDiscriminant {
    pub kind: &'static str,
    pub value: u8,
}

impl fmt::Display for UnknownDiscriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownDiscriminant {}

/// Completion status. Travels over the wire as its integer discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ItemStatus {
    #[default]
    New,
    InProgress,
    Done,
    UnderReview,
}

impl TryFrom<u8> for ItemStatus {
    type Error = UnknownDiscriminant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ItemStatus::New),
            1 => Ok(ItemStatus::InProgress),
            2 => Ok(ItemStatus::Done),
            3 => Ok(ItemStatus::UnderReview),
            value => Err(UnknownDiscriminant {
                kind: "item status",
                value,
            }),
        }
    }
}

impl From<ItemStatus> for u8 {
    fn from(value: ItemStatus) -> Self {
        match value {
            ItemStatus::New => 0,
            ItemStatus::InProgress => 1,
            ItemStatus::Done => 2,
            ItemStatus::UnderReview => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ItemPriority {
    #[default]
    Low,
    Middle,
    High,
    Urgent,
    Later,
}

impl TryFrom<u8> for ItemPriority {
    type Error = UnknownDiscriminant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ItemPriority::Low),
            1 => Ok(ItemPriority::Middle),
            2 => Ok(ItemPriority::High),
            3 => Ok(ItemPriority::Urgent),
            4 => Ok(ItemPriority::Later),
            value => Err(UnknownDiscriminant {
                kind: "item priority",
                value,
            }),
        }
    }
}

impl From<ItemPriority> for u8 {
    fn from(value: ItemPriority) -> Self {
        match value {
            ItemPriority::Low => 0,
            ItemPriority::Middle => 1,
            ItemPriority::High => 2,
            ItemPriority::Urgent => 3,
            ItemPriority::Later => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_status_uses_integer_discriminants_on_the_wire() {
        assert_eq!(serde_json::to_string(&ItemStatus::Done).expect("encode"), "2");
        let decoded: ItemStatus = serde_json::from_str("3").expect("decode");
        assert_eq!(decoded, ItemStatus::UnderReview);
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let err = serde_json::from_str::<ItemPriority>("9").expect_err("must fail");
        assert!(err.to_string().contains("unknown item priority value 9"));
    }
}
