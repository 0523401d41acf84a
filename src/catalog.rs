//! The event catalogue: an ordered id → event mapping, seeded once at
//! startup and mutated only by reservation creation and expiry.

use std::collections::BTreeMap;

/// A ticketed event.
///
/// Immutable except for `tickets_available`, which the ledger adjusts as
/// reservations are created and released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Opaque description bytes, 1-80 bytes, not necessarily UTF-8.
    pub description: Vec<u8>,
    /// Seats currently available for reservation.
    pub tickets_available: u16,
}

impl Event {
    /// The `description_length` field transmitted alongside this event.
    #[must_use]
    pub fn description_length(&self) -> u8 {
        self.description.len() as u8
    }
}

/// Failure releasing or reserving seats against an unknown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown event: {0}")]
pub struct UnknownEvent(pub u32);

/// The seeded, ordered set of events this server offers.
///
/// Built once from the seed file at startup and never grows or shrinks
/// afterward; only `tickets_available` on existing entries changes.
#[derive(Debug, Default)]
pub struct Catalog {
    events: BTreeMap<u32, Event>,
}

impl Catalog {
    /// Build a catalogue from seed pairs, assigning ids 0, 1, 2, … in the
    /// order given.
    #[must_use]
    pub fn from_seed(seed: Vec<(Vec<u8>, u16)>) -> Self {
        let events = seed
            .into_iter()
            .enumerate()
            .map(|(i, (description, tickets_available))| {
                (
                    i as u32,
                    Event {
                        description,
                        tickets_available,
                    },
                )
            })
            .collect();
        Self { events }
    }

    /// Iterate all events in ascending event-id order, for `EVENTS` encoding.
    pub fn iter_in_id_order(&self) -> impl Iterator<Item = (u32, &Event)> {
        self.events.iter().map(|(id, event)| (*id, event))
    }

    /// Look up an event by id.
    #[must_use]
    pub fn get(&self, event_id: u32) -> Option<&Event> {
        self.events.get(&event_id)
    }

    /// Decrement `tickets_available` by `count` seats.
    ///
    /// Callers must have already checked `count <= tickets_available`; this
    /// mirrors the ledger's precondition check in `create` and never
    /// underflows in practice.
    pub fn reserve(&mut self, event_id: u32, count: u16) -> Result<(), UnknownEvent> {
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(UnknownEvent(event_id))?;
        event.tickets_available -= count;
        Ok(())
    }

    /// Re-increment `tickets_available` by `count` seats (an expired,
    /// unachieved reservation's seats returning to the pool).
    pub fn release(&mut self, event_id: u32, count: u16) -> Result<(), UnknownEvent> {
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(UnknownEvent(event_id))?;
        event.tickets_available += count;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::from_seed(vec![(b"Concert".to_vec(), 100), (b"Play".to_vec(), 2)])
    }

    #[test]
    fn test_ids_assigned_in_file_order() {
        let cat = sample();
        let ids: Vec<u32> = cat.iter_in_id_order().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_get_unknown_returns_none() {
        let cat = sample();
        assert!(cat.get(99).is_none());
    }

    #[test]
    fn test_reserve_then_release_round_trips_seats() {
        let mut cat = sample();
        cat.reserve(1, 2).unwrap();
        assert_eq!(cat.get(1).unwrap().tickets_available, 0);
        cat.release(1, 2).unwrap();
        assert_eq!(cat.get(1).unwrap().tickets_available, 2);
    }

    #[test]
    fn test_reserve_unknown_event_errors() {
        let mut cat = sample();
        assert_eq!(cat.reserve(42, 1), Err(UnknownEvent(42)));
    }

    #[test]
    fn test_description_length_matches_bytes() {
        let cat = sample();
        let (_, concert) = cat.iter_in_id_order().next().unwrap();
        assert_eq!(concert.description_length() as usize, concert.description.len());
    }
}
