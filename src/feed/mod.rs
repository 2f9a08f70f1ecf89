pub mod cursor;
pub mod gesture;

use serde::{Deserialize, Serialize};

pub use cursor::{FeedCursor, FeedState};
pub use gesture::{DragGesture, DragVisual, GestureClassifier, SwipeHint, HINT_DEADZONE, SWIPE_THRESHOLD};

/// The user's outcome for the current movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Like,
    Skip,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Like => "like",
            Decision::Skip => "skip",
        }
    }
}
