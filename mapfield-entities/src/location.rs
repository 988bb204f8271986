use strum::{Display, EnumString};

use crate::search::SearchOption;

/// What a location button does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ActionType {
    Add,
    Remove,
}

/// A labelled place shown next to a location button.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Location {
    pub label: String,
}

impl From<&SearchOption> for Location {
    fn from(from: &SearchOption) -> Self {
        Self {
            label: from.label.clone(),
        }
    }
}
