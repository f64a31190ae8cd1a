use std::fmt;

use crate::{Dscp, DscpClass};

/// The traffic categories understood by the host traffic-control subsystem.
///
/// The subsystem provisions a flow with a representative DSCP for its category, so the mapping
/// from an exact code point is deliberately coarse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrafficCategory {
    #[default]
    BestEffort,
    Background,
    AudioVideo,
    Control,
}

impl TrafficCategory {
    /// Classifies `dscp` by half-open ranges of class selectors:
    ///
    /// - `[CS1, CS5)` is background,
    /// - `[CS5, CS7)` is audio/video,
    /// - `[CS7, 63]` is control,
    /// - anything below CS1 is best effort.
    pub const fn from_dscp(dscp: Dscp) -> Self {
        const CS1: u8 = DscpClass::Cs1.value();
        const CS5: u8 = DscpClass::Cs5.value();
        const CS7: u8 = DscpClass::Cs7.value();

        match dscp.value() {
            v if v >= CS1 && v < CS5 => Self::Background,
            v if v >= CS5 && v < CS7 => Self::AudioVideo,
            v if v >= CS7 => Self::Control,
            _ => Self::BestEffort,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BestEffort => "best-effort",
            Self::Background => "background",
            Self::AudioVideo => "audio-video",
            Self::Control => "control",
        }
    }
}

impl From<Dscp> for TrafficCategory {
    fn from(dscp: Dscp) -> Self {
        Self::from_dscp(dscp)
    }
}

impl fmt::Display for TrafficCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
