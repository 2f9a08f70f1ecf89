//! Drag gesture interpretation for the swipe card.
//!
//! A drag runs `idle -> dragging -> idle`. When it ends more than the
//! threshold away from where it started, the end of the drag yields a
//! [`Decision`]: right is a like, left is a skip. Anything shorter is a
//! cancelled drag. Events that arrive in the wrong state are ignored, so
//! overlapping mouse and touch input cannot wedge the classifier.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Decision;

/// Horizontal distance a drag must exceed to commit.
pub const SWIPE_THRESHOLD: f64 = 100.0;

/// Distance inside which no direction hint is shown.
pub const HINT_DEADZONE: f64 = 50.0;

/// Card rotation per 100 units of displacement, in degrees.
const ROTATION_PER_100: f64 = 5.0;

/// Displacement at which the card is fully faded out.
const FADE_DISTANCE: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub start_x: f64,
    pub current_x: f64,
}

impl DragGesture {
    pub fn delta(&self) -> f64 {
        self.current_x - self.start_x
    }
}

/// Which way the card leans while dragging. Purely visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeHint {
    #[default]
    None,
    Left,
    Right,
}

/// What the card should look like right now.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragVisual {
    pub offset: f64,
    pub rotation_deg: f64,
    pub opacity: f64,
    pub hint: SwipeHint,
}

#[derive(Debug, Clone)]
pub struct GestureClassifier {
    threshold: f64,
    deadzone: f64,
    drag: Option<DragGesture>,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD, HINT_DEADZONE)
    }
}

impl GestureClassifier {
    pub fn new(threshold: f64, deadzone: f64) -> Self {
        Self {
            threshold: threshold.abs(),
            deadzone: deadzone.abs(),
            drag: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag(&self) -> Option<&DragGesture> {
        self.drag.as_ref()
    }

    /// Begin a drag at `x`. Returns false, and changes nothing, if a drag
    /// is already in progress.
    pub fn on_drag_start(&mut self, x: f64) -> bool {
        if self.drag.is_some() || !x.is_finite() {
            return false;
        }
        self.drag = Some(DragGesture {
            start_x: x,
            current_x: x,
        });
        true
    }

    /// Track the pointer. Returns the direction hint for the new position.
    pub fn on_drag_move(&mut self, x: f64) -> SwipeHint {
        let Some(drag) = self.drag.as_mut() else {
            return SwipeHint::None;
        };
        if x.is_finite() {
            drag.current_x = x;
        }
        self.hint()
    }

    /// Release the drag. Yields a decision only when the displacement is
    /// strictly greater than the threshold.
    pub fn on_drag_end(&mut self) -> Option<Decision> {
        let drag = self.drag.take()?;
        let delta = drag.delta();

        if delta.abs() > self.threshold {
            let decision = if delta > 0.0 {
                Decision::Like
            } else {
                Decision::Skip
            };
            debug!(delta, decision = decision.as_str(), "swipe committed");
            Some(decision)
        } else {
            debug!(delta, "swipe cancelled");
            None
        }
    }

    pub fn hint(&self) -> SwipeHint {
        match self.drag {
            Some(drag) if drag.delta() > self.deadzone => SwipeHint::Right,
            Some(drag) if drag.delta() < -self.deadzone => SwipeHint::Left,
            _ => SwipeHint::None,
        }
    }

    pub fn visual(&self) -> DragVisual {
        let Some(drag) = self.drag else {
            return DragVisual {
                opacity: 1.0,
                ..DragVisual::default()
            };
        };
        let delta = drag.delta();
        DragVisual {
            offset: delta,
            rotation_deg: delta / 100.0 * ROTATION_PER_100,
            opacity: (1.0 - delta.abs() / FADE_DISTANCE).max(0.0),
            hint: self.hint(),
        }
    }
}
