use serde::{Deserialize, Serialize};

/// A player decision, as indices into the current hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AutoAction {
    Play { indices: Vec<usize> },
    Discard { indices: Vec<usize> },
}

impl AutoAction {
    pub fn indices(&self) -> &[usize] {
        match self {
            Self::Play { indices } | Self::Discard { indices } => indices,
        }
    }

    pub fn stable_key(&self) -> String {
        match self {
            Self::Play { indices } => format!("play:{indices:?}"),
            Self::Discard { indices } => format!("discard:{indices:?}"),
        }
    }

    pub fn short_label(&self) -> String {
        match self {
            Self::Play { indices } => format!("play {indices:?}"),
            Self::Discard { indices } => format!("discard {indices:?}"),
        }
    }
}
