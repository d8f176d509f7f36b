// ── Server-reported connection status ──
//
// The platform answers `connection_handler.connect` with a bare integer.
// The code table below is the contract with the server; anything outside
// it is rejected at the boundary.

use strum::{Display, EnumIter, IntoStaticStr};
use thiserror::Error;

/// Outcome of a connect call, as reported by the server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    /// Not connected. Also the result of any failed call.
    #[default]
    NotConnected,
    /// The server accepted the name.
    Success,
    /// The server rejected the name.
    InvalidName,
}

const STATUS_CODES: [(i32, ConnectionStatus); 3] = [
    (0, ConnectionStatus::NotConnected),
    (1, ConnectionStatus::Success),
    (2, ConnectionStatus::InvalidName),
];

/// The server sent a status code outside [`STATUS_CODES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("server returned unknown connection status {0}")]
pub struct InvalidStatusValue(pub i32);

impl ConnectionStatus {
    /// Wire code for this status.
    pub fn code(self) -> i32 {
        STATUS_CODES
            .iter()
            .find_map(|&(code, status)| (status == self).then_some(code))
            .unwrap_or_default()
    }

    /// Human-readable description, suitable for a status line.
    pub fn description(self) -> &'static str {
        match self {
            Self::NotConnected => "not connected",
            Self::Success => "successfully connected",
            Self::InvalidName => "error invalid name",
        }
    }
}

impl TryFrom<i32> for ConnectionStatus {
    type Error = InvalidStatusValue;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        STATUS_CODES
            .iter()
            .find_map(|&(c, status)| (c == code).then_some(status))
            .ok_or(InvalidStatusValue(code))
    }
}
