//! Time-zone offset providers.
//!
//! The engine only asks a zone for its raw and daylight offsets at an
//! instant. Rules and databases live outside this crate.

use std::fmt::Debug;

use almanac_time::HOUR_MS;

use crate::error::CalendarError;

/// Zone offset pair at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneOffsets {
    pub raw: i32,
    pub dst: i32,
}

impl ZoneOffsets {
    pub fn total(self) -> i64 {
        i64::from(self.raw) + i64::from(self.dst)
    }
}

/// Source of UTC offsets.
pub trait TimeZone: Debug + Send + Sync {
    /// Zone identifier.
    fn id(&self) -> &str;

    /// Raw and daylight offsets in effect at a UTC instant.
    fn offsets(&self, millis: i64) -> ZoneOffsets;
}

/// A zone with constant offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedZone {
    id: String,
    offsets: ZoneOffsets,
}

impl FixedZone {
    pub fn new(id: impl Into<String>, raw: i32, dst: i32) -> Self {
        Self {
            id: id.into(),
            offsets: ZoneOffsets { raw, dst },
        }
    }

    pub fn utc() -> Self {
        Self::new("UTC", 0, 0)
    }

    /// `UTC+hours` style zone.
    pub fn from_hours(hours: i32) -> Self {
        Self::new(format!("UTC{hours:+}"), hours * HOUR_MS as i32, 0)
    }
}

impl TimeZone for FixedZone {
    fn id(&self) -> &str {
        &self.id
    }

    fn offsets(&self, _millis: i64) -> ZoneOffsets {
        self.offsets
    }
}

/// One offset change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// First instant with the new offsets.
    pub at: i64,
    pub offsets: ZoneOffsets,
}

/// A zone defined by an explicit list of transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionZone {
    id: String,
    initial: ZoneOffsets,
    transitions: Vec<Transition>,
}

impl TransitionZone {
    /// Transitions must be strictly increasing in time.
    pub fn new(
        id: impl Into<String>,
        initial: ZoneOffsets,
        transitions: Vec<Transition>,
    ) -> Result<Self, CalendarError> {
        if transitions.windows(2).any(|w| w[0].at >= w[1].at) {
            return Err(CalendarError::Configuration(
                "zone transitions must be strictly increasing".into(),
            ));
        }
        Ok(Self {
            id: id.into(),
            initial,
            transitions,
        })
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Samoa skipping 30 December 2011 when it moved across the date line.
    pub fn pacific_apia() -> Self {
        let h = HOUR_MS as i32;
        Self {
            id: "Pacific/Apia".into(),
            initial: ZoneOffsets { raw: -11 * h, dst: h },
            transitions: vec![Transition {
                at: 1_325_239_200_000,
                offsets: ZoneOffsets { raw: 13 * h, dst: h },
            }],
        }
    }

    /// US Eastern time for 2023: EDT from 12 March 07:00 UTC until
    /// 5 November 06:00 UTC.
    pub fn us_eastern_2023() -> Self {
        let h = HOUR_MS as i32;
        let est = ZoneOffsets { raw: -5 * h, dst: 0 };
        Self {
            id: "America/New_York".into(),
            initial: est,
            transitions: vec![
                Transition {
                    at: 1_678_604_400_000,
                    offsets: ZoneOffsets { raw: -5 * h, dst: h },
                },
                Transition {
                    at: 1_699_164_000_000,
                    offsets: est,
                },
            ],
        }
    }
}

impl TimeZone for TransitionZone {
    fn id(&self) -> &str {
        &self.id
    }

    fn offsets(&self, millis: i64) -> ZoneOffsets {
        let idx = self.transitions.partition_point(|t| t.at <= millis);
        match idx.checked_sub(1) {
            Some(i) => self.transitions[i].offsets,
            None => self.initial,
        }
    }
}

/// First instant in `(before, after]` whose offset differs from the
/// offset at `before`. Both ends must straddle a single offset change.
pub(crate) fn find_transition(zone: &dyn TimeZone, mut before: i64, mut after: i64) -> i64 {
    let start = zone.offsets(before).total();
    while after - before > 1 {
        let mid = before + (after - before) / 2;
        if zone.offsets(mid).total() == start {
            before = mid;
        } else {
            after = mid;
        }
    }
    after
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apia_jumps_a_day() {
        let apia = TransitionZone::pacific_apia();
        assert_eq!(apia.offsets(1_325_239_199_999).total(), -10 * HOUR_MS);
        assert_eq!(apia.offsets(1_325_239_200_000).total(), 14 * HOUR_MS);
    }

    #[test]
    fn eastern_daylight_saving() {
        let ny = TransitionZone::us_eastern_2023();
        assert_eq!(ny.offsets(1_678_604_399_999).total(), -5 * HOUR_MS);
        assert_eq!(ny.offsets(1_678_604_400_000).total(), -4 * HOUR_MS);
        assert_eq!(ny.offsets(1_699_164_000_000).total(), -5 * HOUR_MS);
        assert_eq!(ny.transitions().len(), 2);
    }

    #[test]
    fn bisection_finds_exact_instant() {
        let apia = TransitionZone::pacific_apia();
        let t = find_transition(&apia, 1_325_200_000_000, 1_325_300_000_000);
        assert_eq!(t, 1_325_239_200_000);
    }

    #[test]
    fn unsorted_transitions_rejected() {
        let t = Transition {
            at: 5,
            offsets: ZoneOffsets::default(),
        };
        let r = TransitionZone::new("x", ZoneOffsets::default(), vec![t, t]);
        assert!(r.is_err());
    }

    #[test]
    fn fixed_zone_ids() {
        assert_eq!(FixedZone::from_hours(8).id(), "UTC+8");
        assert_eq!(FixedZone::from_hours(-5).offsets(0).raw, -5 * HOUR_MS as i32);
    }
}
