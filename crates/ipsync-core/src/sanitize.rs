//! Sanitizing address parser
//!
//! The lookup service and the persisted record both deliver a bare textual
//! address that may carry a trailing newline or other control byte. Both
//! readers funnel through [`parse_address`], which truncates at the first
//! control byte before parsing.

use std::net::IpAddr;

use crate::error::{Error, Result};

/// Longest textual form of an address (IPv4-mapped IPv6, 45 bytes).
/// Readers of the persisted record never need more than this.
pub const MAX_ADDRESS_TEXT_LEN: usize = 45;

/// Truncate a byte slice at its first ASCII control byte.
pub fn strip_control_bytes(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|b| b.is_ascii_control()) {
        Some(i) => &bytes[..i],
        None => bytes,
    }
}

/// Parse a sanitized byte sequence as a network address.
///
/// Returns `Error::Parse` when the remainder is empty, not UTF-8, or not a
/// valid IPv4/IPv6 textual form.
pub fn parse_address(bytes: &[u8]) -> Result<IpAddr> {
    let text = std::str::from_utf8(strip_control_bytes(bytes))
        .map_err(|_| Error::parse("address is not valid UTF-8"))?;

    text.parse::<IpAddr>()
        .map_err(|_| Error::parse(format!("failed to parse address: {:?}", text)))
}
