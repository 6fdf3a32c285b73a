// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Exposed port specifications.
//!
//! The API has sent a service's ports in two shapes over time:
//!
//! ```text
//! [{"protocol": "tcp", "number": 80}, {"protocol": "udp", "number": 34197}]   // structured
//! ["80", "443/tcp", "34197/udp"]                                              // compact
//! ```
//!
//! [`Port`] decodes from either, one element at a time, by looking at the JSON
//! kind of the element (object or string). Both normalize to the same value.
//! Ports always serialize in the structured shape.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, SdkError};

/// TCP protocol name.
pub const PROTOCOL_TCP: &str = "tcp";
/// UDP protocol name.
pub const PROTOCOL_UDP: &str = "udp";
/// Protocols accepted by the API.
pub const VALID_PROTOCOLS: &[&str] = &[PROTOCOL_TCP, PROTOCOL_UDP];

/// Lowest valid port number.
pub const MIN_PORT_NUMBER: u32 = 1;
/// Highest valid port number.
pub const MAX_PORT_NUMBER: u32 = 65535;

/// A single exposed port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Port {
    /// `tcp` or `udp`. Decoded ports are always lowercase.
    pub protocol: String,
    /// Port number, 1..=65535.
    pub number: u32,
}

impl Port {
    /// Create a port with an arbitrary protocol. See [`Port::validate`].
    pub fn new(protocol: impl Into<String>, number: u32) -> Self {
        Self {
            protocol: protocol.into(),
            number,
        }
    }

    /// Create a TCP port.
    pub fn tcp(number: u32) -> Self {
        Self::new(PROTOCOL_TCP, number)
    }

    /// Create a UDP port.
    pub fn udp(number: u32) -> Self {
        Self::new(PROTOCOL_UDP, number)
    }

    /// Check protocol (tcp/udp, any case) and number range.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_protocol(&self.protocol) {
            return Err(SdkError::validation(
                "ports",
                format!(
                    "unsupported protocol {:?} (expected one of {:?})",
                    self.protocol, VALID_PROTOCOLS
                ),
            ));
        }
        if !(MIN_PORT_NUMBER..=MAX_PORT_NUMBER).contains(&self.number) {
            return Err(SdkError::validation(
                "ports",
                format!(
                    "port number {} out of range {}..={}",
                    self.number, MIN_PORT_NUMBER, MAX_PORT_NUMBER
                ),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.protocol)
    }
}

/// Why a port element could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortParseError {
    /// Number part is not an unsigned integer.
    #[error("port number {0:?} is not numeric")]
    InvalidNumber(String),

    /// Number is outside 1..=65535.
    #[error("port number {0} out of range")]
    OutOfRange(i64),

    /// Protocol is neither tcp nor udp.
    #[error("unsupported protocol {0:?}")]
    UnsupportedProtocol(String),
}

/// Parses the compact form: `"80"` (tcp) or `"<number>/<protocol>"`.
impl FromStr for Port {
    type Err = PortParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (number, protocol) = s.split_once('/').unwrap_or((s, PROTOCOL_TCP));

        let parsed: u32 = number
            .parse()
            .map_err(|_| PortParseError::InvalidNumber(number.to_string()))?;

        Ok(Port {
            protocol: normalize_protocol(protocol)?,
            number: check_range(i64::from(parsed))?,
        })
    }
}

impl<'de> Deserialize<'de> for Port {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(PortVisitor)
    }
}

struct PortVisitor;

impl<'de> Visitor<'de> for PortVisitor {
    type Value = Port;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#"a port object {"protocol", "number"} or a string like "80" or "443/tcp""#)
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Port, E>
    where
        E: de::Error,
    {
        v.parse()
            .map_err(|e: PortParseError| E::custom(format!("invalid port {:?}: {}", v, e)))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Port, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut protocol: Option<String> = None;
        let mut number: Option<i64> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "protocol" => {
                    if protocol.is_some() {
                        return Err(de::Error::duplicate_field("protocol"));
                    }
                    protocol = Some(map.next_value()?);
                }
                "number" => {
                    if number.is_some() {
                        return Err(de::Error::duplicate_field("number"));
                    }
                    number = Some(map.next_value()?);
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        let protocol = protocol.ok_or_else(|| de::Error::missing_field("protocol"))?;
        let number = number.ok_or_else(|| de::Error::missing_field("number"))?;

        Ok(Port {
            protocol: normalize_protocol(&protocol).map_err(de::Error::custom)?,
            number: check_range(number).map_err(de::Error::custom)?,
        })
    }
}

fn is_valid_protocol(protocol: &str) -> bool {
    VALID_PROTOCOLS
        .iter()
        .any(|valid| valid.eq_ignore_ascii_case(protocol))
}

fn normalize_protocol(protocol: &str) -> std::result::Result<String, PortParseError> {
    if is_valid_protocol(protocol) {
        Ok(protocol.to_ascii_lowercase())
    } else {
        Err(PortParseError::UnsupportedProtocol(protocol.to_string()))
    }
}

fn check_range(number: i64) -> std::result::Result<u32, PortParseError> {
    u32::try_from(number)
        .ok()
        .filter(|n| (MIN_PORT_NUMBER..=MAX_PORT_NUMBER).contains(n))
        .ok_or(PortParseError::OutOfRange(number))
}
