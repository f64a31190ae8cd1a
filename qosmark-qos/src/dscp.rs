//! Differentiated Services Code Points (RFC 2474, RFC 4594).
//!
//! | Class | DSCP | Typical use |
//! |-------|------|-------------|
//! | CS0   | 0    | Best effort |
//! | CS1   | 8    | Scavenger / bulk |
//! | AF11  | 10   | High-throughput data |
//! | AF21  | 18   | Low-latency data |
//! | AF31  | 26   | Multimedia streaming |
//! | AF41  | 34   | Interactive video |
//! | CS5   | 40   | Signaling |
//! | EF    | 46   | Telephony |
//! | CS6   | 48   | Network control |
//! | CS7   | 56   | Reserved |

use std::fmt;

use qosmark_common::{keys, EndpointConfig};

/// Returned by [`adjust_value`] when no usable DSCP is configured.
pub const DSCP_NOT_SET: i32 = -1;

/// Returns `actual` if it is present and within `[min, max]`, otherwise `default`.
#[inline]
pub const fn adjust_value(default: i32, min: i32, max: i32, actual: Option<i32>) -> i32 {
    match actual {
        Some(v) if v >= min && v <= max => v,
        _ => default,
    }
}

/// A validated 6-bit DSCP value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Dscp(u8);

impl Dscp {
    pub const MAX: u8 = 63;

    /// Returns `None` if `value` doesn't fit in 6 bits.
    #[inline]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Reads [`keys::DSCP`] from `config`.
    ///
    /// Absent, negative and out-of-range values all mean "not configured".
    pub fn from_config(config: &impl EndpointConfig) -> Option<Self> {
        let dscp = adjust_value(DSCP_NOT_SET, 0, Self::MAX as i32, config.get_int(keys::DSCP));
        if dscp == DSCP_NOT_SET {
            return None;
        }

        Self::new(dscp as u8)
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// The value as it appears in the IPv4 TOS / IPv6 traffic class byte.
    ///
    /// Layout: `DSCP (6 bits) | ECN (2 bits)`.
    #[inline]
    pub const fn to_tos(self) -> u8 {
        self.0 << 2
    }
}

impl From<DscpClass> for Dscp {
    fn from(class: DscpClass) -> Self {
        Self(class as u8)
    }
}

impl fmt::Display for Dscp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DscpClass {
    #[default]
    Cs0 = 0,
    Cs1 = 8,
    Af11 = 10,
    Af12 = 12,
    Af13 = 14,
    Cs2 = 16,
    Af21 = 18,
    Af22 = 20,
    Af23 = 22,
    Cs3 = 24,
    Af31 = 26,
    Af32 = 28,
    Af33 = 30,
    Cs4 = 32,
    Af41 = 34,
    Af42 = 36,
    Af43 = 38,
    Cs5 = 40,
    /// Expedited Forwarding.
    Ef = 46,
    Cs6 = 48,
    Cs7 = 56,
}

impl DscpClass {
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Looks up the named class of a raw value, if there is one.
    pub const fn from_raw(value: u8) -> Option<Self> {
        let class = match value {
            0 => Self::Cs0,
            8 => Self::Cs1,
            10 => Self::Af11,
            12 => Self::Af12,
            14 => Self::Af13,
            16 => Self::Cs2,
            18 => Self::Af21,
            20 => Self::Af22,
            22 => Self::Af23,
            24 => Self::Cs3,
            26 => Self::Af31,
            28 => Self::Af32,
            30 => Self::Af33,
            32 => Self::Cs4,
            34 => Self::Af41,
            36 => Self::Af42,
            38 => Self::Af43,
            40 => Self::Cs5,
            46 => Self::Ef,
            48 => Self::Cs6,
            56 => Self::Cs7,
            _ => return None,
        };

        Some(class)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Cs0 => "CS0",
            Self::Cs1 => "CS1",
            Self::Af11 => "AF11",
            Self::Af12 => "AF12",
            Self::Af13 => "AF13",
            Self::Cs2 => "CS2",
            Self::Af21 => "AF21",
            Self::Af22 => "AF22",
            Self::Af23 => "AF23",
            Self::Cs3 => "CS3",
            Self::Af31 => "AF31",
            Self::Af32 => "AF32",
            Self::Af33 => "AF33",
            Self::Cs4 => "CS4",
            Self::Af41 => "AF41",
            Self::Af42 => "AF42",
            Self::Af43 => "AF43",
            Self::Cs5 => "CS5",
            Self::Ef => "EF",
            Self::Cs6 => "CS6",
            Self::Cs7 => "CS7",
        }
    }
}
