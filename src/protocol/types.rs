//! Wire message type codes and datagram size limits.

use std::fmt;

/// Maximum UDP payload this server will ever produce or accept (the IPv4
/// practical datagram limit).
pub const MAX_DATAGRAM: usize = 65_507;

/// Exact length of a `GET_EVENTS` request.
pub const GET_EVENTS_LEN: usize = 1;
/// Exact length of a `GET_RESERVATION` request.
pub const GET_RESERVATION_LEN: usize = 7;
/// Exact length of a `GET_TICKETS` request.
pub const GET_TICKETS_LEN: usize = 53;
/// Exact length of a `RESERVATION` response.
pub const RESERVATION_LEN: usize = 67;
/// Exact length of a `BAD_REQUEST` response.
pub const BAD_REQUEST_LEN: usize = 5;

/// Width in bytes of a reservation cookie.
pub const COOKIE_LEN: usize = 48;
/// Width in bytes of a single ticket code.
pub const TICKET_LEN: usize = 7;

/// One octet identifying the shape of a request or response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Client asks for the full event catalogue.
    GetEvents = 1,
    /// Server replies with the event catalogue.
    Events = 2,
    /// Client asks to reserve tickets for an event.
    GetReservation = 3,
    /// Server replies with a reservation and its cookie.
    Reservation = 4,
    /// Client redeems a reservation for ticket codes.
    GetTickets = 5,
    /// Server replies with generated ticket codes.
    Tickets = 6,
    /// Server rejects a semantically invalid request.
    BadRequest = 255,
}

impl MessageType {
    /// Convert from the leading byte of a datagram.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::GetEvents),
            2 => Some(Self::Events),
            3 => Some(Self::GetReservation),
            4 => Some(Self::Reservation),
            5 => Some(Self::GetTickets),
            6 => Some(Self::Tickets),
            255 => Some(Self::BadRequest),
            _ => None,
        }
    }

    /// Convert to the wire byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GetEvents => "GET_EVENTS",
            Self::Events => "EVENTS",
            Self::GetReservation => "GET_RESERVATION",
            Self::Reservation => "RESERVATION",
            Self::GetTickets => "GET_TICKETS",
            Self::Tickets => "TICKETS",
            Self::BadRequest => "BAD_REQUEST",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_known_codes() {
        for mt in [
            MessageType::GetEvents,
            MessageType::Events,
            MessageType::GetReservation,
            MessageType::Reservation,
            MessageType::GetTickets,
            MessageType::Tickets,
            MessageType::BadRequest,
        ] {
            assert_eq!(MessageType::from_u8(mt.as_u8()), Some(mt));
        }
    }

    #[test]
    fn test_unknown_code_is_none() {
        assert_eq!(MessageType::from_u8(0), None);
        assert_eq!(MessageType::from_u8(7), None);
        assert_eq!(MessageType::from_u8(254), None);
    }
}
