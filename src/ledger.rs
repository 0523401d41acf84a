//! The reservation ledger: id/cookie assignment, redemption, and the lazy
//! expiry sweep that reclaims seats from abandoned reservations.

use std::collections::BTreeMap;

use rand::Rng;

use crate::catalog::Catalog;
use crate::protocol::{COOKIE_LEN, MAX_DATAGRAM, TICKET_LEN};

/// First id handed out to a reservation, kept disjoint from event ids
/// for catalogues under 1,000,000 events.
pub const FIRST_RESERVATION_ID: u32 = 1_000_000;

const TICKET_CHARSET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A live or historical reservation.
#[derive(Debug, Clone)]
pub struct Reservation {
    /// The event this reservation holds seats against.
    pub event_id: u32,
    /// Number of seats held.
    pub ticket_count: u16,
    /// Absolute expiry, in seconds since the epoch.
    pub expiration_time: u64,
    /// Secret required to redeem this reservation's tickets.
    pub cookie: [u8; COOKIE_LEN],
    /// Whether tickets have been generated for this reservation yet.
    pub achieved: bool,
    /// Generated ticket codes, populated on first successful redemption.
    pub tickets: Vec<[u8; TICKET_LEN]>,
}

/// Why a `GET_RESERVATION` request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CreateError {
    /// `ticket_count` was zero.
    #[error("ticket_count must be positive")]
    ZeroTickets,
    /// The referenced event does not exist.
    #[error("unknown event")]
    UnknownEvent,
    /// The event does not have enough seats available.
    #[error("insufficient seats")]
    InsufficientSeats,
    /// The resulting `TICKETS` reply would exceed the datagram cap.
    #[error("reply would exceed the datagram size limit")]
    ResponseTooLarge,
}

/// Why a `GET_TICKETS` request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RedeemError {
    /// No reservation exists with that id.
    #[error("unknown reservation")]
    UnknownReservation,
    /// The presented cookie does not match the stored one.
    #[error("wrong cookie")]
    WrongCookie,
    /// The reservation expired before being redeemed.
    #[error("reservation expired")]
    Expired,
}

/// Owns every reservation and the two monotonic counters (reservation id,
/// ticket id) that must never repeat for the life of the process.
#[derive(Debug)]
pub struct Ledger {
    reservations: BTreeMap<u32, Reservation>,
    next_reservation_id: u32,
    next_ticket_id: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            reservations: BTreeMap::new(),
            next_reservation_id: FIRST_RESERVATION_ID,
            next_ticket_id: 0,
        }
    }
}

impl Ledger {
    /// Construct an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reservation for `ticket_count` seats of `event_id`.
    ///
    /// Preconditions are checked in a fixed order, so the first one
    /// violated determines the rejection reason.
    pub fn create<R: Rng>(
        &mut self,
        catalog: &mut Catalog,
        event_id: u32,
        ticket_count: u16,
        now: u64,
        timeout_seconds: u64,
        rng: &mut R,
    ) -> Result<(u32, &Reservation), CreateError> {
        if ticket_count == 0 {
            return Err(CreateError::ZeroTickets);
        }
        let event = catalog.get(event_id).ok_or(CreateError::UnknownEvent)?;
        if event.tickets_available < ticket_count {
            return Err(CreateError::InsufficientSeats);
        }
        if 7 + 7 * ticket_count as usize > MAX_DATAGRAM {
            return Err(CreateError::ResponseTooLarge);
        }

        let reservation_id = self.next_reservation_id;
        self.next_reservation_id += 1;

        let cookie = generate_cookie(rng);
        let reservation = Reservation {
            event_id,
            ticket_count,
            expiration_time: now + timeout_seconds,
            cookie,
            achieved: false,
            tickets: Vec::new(),
        };

        catalog
            .reserve(event_id, ticket_count)
            .expect("event existence already checked above");
        self.reservations.insert(reservation_id, reservation);

        Ok((
            reservation_id,
            self.reservations.get(&reservation_id).unwrap(),
        ))
    }

    /// Redeem a reservation's tickets, generating them on first success.
    pub fn redeem(
        &mut self,
        reservation_id: u32,
        cookie: &[u8; COOKIE_LEN],
        now: u64,
    ) -> Result<&Reservation, RedeemError> {
        let reservation = self
            .reservations
            .get_mut(&reservation_id)
            .ok_or(RedeemError::UnknownReservation)?;

        if &reservation.cookie != cookie {
            return Err(RedeemError::WrongCookie);
        }
        if !reservation.achieved && reservation.expiration_time < now {
            return Err(RedeemError::Expired);
        }

        if !reservation.achieved {
            let count = reservation.ticket_count;
            let mut tickets = Vec::with_capacity(count as usize);
            for _ in 0..count {
                tickets.push(self.next_ticket());
            }
            let reservation = self.reservations.get_mut(&reservation_id).unwrap();
            reservation.tickets = tickets;
            reservation.achieved = true;
        }

        Ok(self.reservations.get(&reservation_id).unwrap())
    }

    /// Reclaim seats from every non-achieved reservation whose expiry has
    /// passed (`expiration_time < now`), removing them from the ledger.
    /// Returns the number of reservations swept.
    pub fn sweep(&mut self, catalog: &mut Catalog, now: u64) -> u64 {
        let expired: Vec<u32> = self
            .reservations
            .iter()
            .filter(|(_, r)| !r.achieved && r.expiration_time < now)
            .map(|(id, _)| *id)
            .collect();

        for id in &expired {
            let reservation = self.reservations.remove(id).expect("collected above");
            catalog
                .release(reservation.event_id, reservation.ticket_count)
                .expect("events are never removed from the catalogue");
        }

        expired.len() as u64
    }

    fn next_ticket(&mut self) -> [u8; TICKET_LEN] {
        let id = self.next_ticket_id;
        self.next_ticket_id += 1;
        encode_ticket(id)
    }
}

fn generate_cookie<R: Rng>(rng: &mut R) -> [u8; COOKIE_LEN] {
    let mut cookie = [0u8; COOKIE_LEN];
    for byte in &mut cookie {
        *byte = rng.gen_range(33..=126);
    }
    cookie
}

fn encode_ticket(mut id: u64) -> [u8; TICKET_LEN] {
    let mut out = [b'0'; TICKET_LEN];
    for slot in out.iter_mut().rev() {
        *slot = TICKET_CHARSET[(id % 36) as usize];
        id /= 36;
    }
    out
}
