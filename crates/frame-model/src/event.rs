//! Detected actions: the pipeline's output unit.

use serde::{Deserialize, Serialize};

use crate::grid::GridError;

/// One detected action at a column of the rotated frame
/// (equivalently a row, i.e. a video frame, of the raw input).
///
/// Serialized as a `[position, category]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, i32)", into = "(usize, i32)")]
pub struct ActionEvent {
    pub position: usize,
    pub category: i32,
}

impl ActionEvent {
    pub fn new(position: usize, category: i32) -> Self {
        Self { position, category }
    }

    /// `[position, category]` as 32-bit integers.
    pub fn to_pair(self) -> Result<[i32; 2], GridError> {
        let position = i32::try_from(self.position).map_err(|_| GridError::PositionOverflow {
            position: self.position,
        })?;
        Ok([position, self.category])
    }
}

impl From<(usize, i32)> for ActionEvent {
    fn from((position, category): (usize, i32)) -> Self {
        Self { position, category }
    }
}

impl From<ActionEvent> for (usize, i32) {
    fn from(event: ActionEvent) -> Self {
        (event.position, event.category)
    }
}

/// Flatten events into an `N × 2` integer table.
///
/// Fails if any position exceeds `i32::MAX`.
pub fn events_to_table(events: &[ActionEvent]) -> Result<Vec<[i32; 2]>, GridError> {
    events.iter().map(|e| e.to_pair()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_pairs() {
        let events = vec![ActionEvent::new(2, 90), ActionEvent::new(6, 10)];
        let json = serde_json::to_string(&events).unwrap();
        assert_eq!(json, "[[2,90],[6,10]]");

        let parsed: Vec<ActionEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, events);
    }

    #[test]
    fn table_keeps_order() {
        let events = vec![ActionEvent::new(3, 10), ActionEvent::new(17, 90)];
        assert_eq!(events_to_table(&events).unwrap(), vec![[3, 10], [17, 90]]);
    }

    #[test]
    fn oversized_position_is_rejected() {
        let position = i32::MAX as usize + 1;
        let events = vec![ActionEvent::new(4, 90), ActionEvent::new(position, 10)];
        assert!(matches!(
            events_to_table(&events),
            Err(GridError::PositionOverflow { position: p }) if p == position
        ));
        assert_eq!(
            ActionEvent::new(i32::MAX as usize, 90).to_pair().unwrap(),
            [i32::MAX, 90]
        );
    }
}
