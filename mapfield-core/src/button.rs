use strum::{AsRefStr, Display};

use crate::entities::location::{ActionType, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ButtonStyle {
    Green,
    Red,
}

/// An add or remove button with the label of a place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationButton {
    pub action: ActionType,
    pub location: Option<Location>,
}

impl LocationButton {
    pub const fn new(action: ActionType, location: Option<Location>) -> Self {
        Self { action, location }
    }

    pub const fn text(&self) -> &'static str {
        match self.action {
            ActionType::Add => "Add",
            ActionType::Remove => "Remove",
        }
    }

    pub const fn style(&self) -> ButtonStyle {
        match self.action {
            ActionType::Add => ButtonStyle::Green,
            ActionType::Remove => ButtonStyle::Red,
        }
    }

    /// Nothing is rendered next to the button without a location.
    pub fn label(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.label.as_str())
    }
}
