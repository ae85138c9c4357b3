//! Event creation and sign-up bookkeeping.
//!
//! Events live only in process memory, keyed by the message that renders
//! them. There is no waitlist and no way to leave an event once joined.

use std::collections::HashMap;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: u64,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct CommunityEvent {
    pub creator: u64,
    pub kind: String,
    /// Free text, rendered as given.
    pub start_time: String,
    pub capacity: usize,
    pub description: String,
    pub participants: Vec<Participant>,
}

impl CommunityEvent {
    pub fn new(
        creator: u64,
        kind: String,
        start_time: String,
        capacity: usize,
        description: String,
    ) -> Self {
        Self {
            creator,
            kind,
            start_time,
            capacity,
            description,
            participants: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.participants.len())
    }

    /// Append a participant, returning the remaining capacity.
    pub fn join(&mut self, user_id: u64, display_name: String) -> Result<usize, Error> {
        if self.participants.iter().any(|p| p.user_id == user_id) {
            return Err(Error::AlreadyJoined);
        }
        if self.participants.len() >= self.capacity {
            return Err(Error::Full);
        }
        self.participants.push(Participant {
            user_id,
            display_name,
        });
        Ok(self.remaining())
    }
}

/// Open events keyed by the id of the message that renders them.
#[derive(Debug, Default)]
pub struct EventBoard {
    events: HashMap<u64, CommunityEvent>,
}

impl EventBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, message_id: u64, event: CommunityEvent) {
        self.events.insert(message_id, event);
    }

    pub fn get(&self, message_id: u64) -> Option<&CommunityEvent> {
        self.events.get(&message_id)
    }

    /// Sign a user up for the event rendered by `message_id`.
    pub fn join(
        &mut self,
        message_id: u64,
        user_id: u64,
        display_name: String,
    ) -> Result<&CommunityEvent, Error> {
        let event = self
            .events
            .get_mut(&message_id)
            .ok_or_else(|| Error::NotFound("event".into()))?;
        event.join(user_id, display_name)?;
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(capacity: usize) -> CommunityEvent {
        CommunityEvent::new(
            99,
            "Arrastão".into(),
            "21h".into(),
            capacity,
            "Ponto de encontro na base.".into(),
        )
    }

    #[test]
    fn join_fills_up_to_capacity() {
        let mut event = sample(2);
        assert_eq!(event.join(1, "um".into()).unwrap(), 1);
        assert_eq!(event.join(2, "dois".into()).unwrap(), 0);
        assert!(matches!(event.join(3, "três".into()), Err(Error::Full)));
        assert_eq!(event.remaining(), 0);
    }

    #[test]
    fn duplicate_join_is_rejected_before_capacity() {
        let mut event = sample(1);
        event.join(1, "um".into()).unwrap();
        // Duplicate by id even though the event is also full.
        assert!(matches!(event.join(1, "um".into()), Err(Error::AlreadyJoined)));
    }

    #[test]
    fn join_unknown_event_is_not_found() {
        let mut board = EventBoard::new();
        assert!(matches!(
            board.join(123, 1, "um".into()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn board_tracks_events_by_message() {
        let mut board = EventBoard::new();
        board.insert(10, sample(3));
        board.insert(20, sample(1));
        board.join(10, 1, "um".into()).unwrap();
        assert_eq!(board.get(10).unwrap().remaining(), 2);
        assert_eq!(board.get(20).unwrap().remaining(), 1);
    }
}
