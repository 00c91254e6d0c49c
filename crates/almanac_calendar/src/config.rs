//! Calendar selection and per-instance options.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use almanac_time::DEFAULT_CUTOVER_MILLIS;

use crate::error::CalendarError;
use crate::week::WeekRule;

/// Calendar system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarKind {
    Gregorian,
    Chinese,
    Dangi,
    Hebrew,
    /// Islamic months from the observed moon age.
    Islamic,
    IslamicCivil,
    IslamicTbla,
    IslamicUmalqura,
    Coptic,
    Ethiopic,
    EthiopicAmeteAlem,
    Japanese,
    Buddhist,
    Roc,
}

impl CalendarKind {
    pub const ALL: [CalendarKind; 14] = [
        Self::Gregorian,
        Self::Chinese,
        Self::Dangi,
        Self::Hebrew,
        Self::Islamic,
        Self::IslamicCivil,
        Self::IslamicTbla,
        Self::IslamicUmalqura,
        Self::Coptic,
        Self::Ethiopic,
        Self::EthiopicAmeteAlem,
        Self::Japanese,
        Self::Buddhist,
        Self::Roc,
    ];

    /// Canonical identifier.
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Gregorian => "gregorian",
            Self::Chinese => "chinese",
            Self::Dangi => "dangi",
            Self::Hebrew => "hebrew",
            Self::Islamic => "islamic",
            Self::IslamicCivil => "islamic-civil",
            Self::IslamicTbla => "islamic-tbla",
            Self::IslamicUmalqura => "islamic-umalqura",
            Self::Coptic => "coptic",
            Self::Ethiopic => "ethiopic",
            Self::EthiopicAmeteAlem => "ethiopic-amete-alem",
            Self::Japanese => "japanese",
            Self::Buddhist => "buddhist",
            Self::Roc => "roc",
        }
    }

    /// Whether era 0 counts years backwards (BC-style).
    pub fn era_zero_runs_backward(self) -> bool {
        matches!(self, Self::Gregorian | Self::Roc | Self::Coptic)
    }
}

impl Display for CalendarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for CalendarKind {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        let kind = match id.as_str() {
            "gregory" => Self::Gregorian,
            "ethioaa" => Self::EthiopicAmeteAlem,
            other => Self::ALL
                .into_iter()
                .find(|k| k.identifier() == other)
                .ok_or_else(|| CalendarError::Configuration(format!("unknown calendar '{s}'")))?,
        };
        Ok(kind)
    }
}

/// How to interpret a wall time that is repeated or skipped by a zone
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WallTimeOption {
    /// The earlier interpretation.
    First,
    /// The later interpretation.
    #[default]
    Last,
    /// The first valid instant after a skipped range.
    NextValid,
}

/// Options for constructing a [`Calendar`](crate::Calendar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarConfig {
    pub kind: CalendarKind,
    pub week_rule: WeekRule,
    pub lenient: bool,
    pub repeated_wall_time: WallTimeOption,
    pub skipped_wall_time: WallTimeOption,
    /// Julian/Gregorian switch for the Gregorian family.
    pub gregorian_cutover: i64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            kind: CalendarKind::Gregorian,
            week_rule: WeekRule::default(),
            lenient: true,
            repeated_wall_time: WallTimeOption::Last,
            skipped_wall_time: WallTimeOption::Last,
            gregorian_cutover: DEFAULT_CUTOVER_MILLIS,
        }
    }
}

impl CalendarConfig {
    pub fn new(kind: CalendarKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CalendarError> {
        WeekRule::new(
            self.week_rule.first_day_of_week(),
            self.week_rule.minimal_days_in_first_week(),
        )?;
        if self.repeated_wall_time == WallTimeOption::NextValid {
            return Err(CalendarError::Configuration(
                "repeated wall time accepts First or Last only".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_roundtrip() {
        for kind in CalendarKind::ALL {
            assert_eq!(kind.identifier().parse::<CalendarKind>(), Ok(kind));
        }
    }

    #[test]
    fn aliases() {
        assert_eq!("gregory".parse(), Ok(CalendarKind::Gregorian));
        assert_eq!("ethioaa".parse(), Ok(CalendarKind::EthiopicAmeteAlem));
        assert_eq!(" Islamic-Civil ".parse(), Ok(CalendarKind::IslamicCivil));
    }

    #[test]
    fn unknown_identifier_is_configuration_error() {
        let err = "persian".parse::<CalendarKind>().unwrap_err();
        assert!(matches!(err, CalendarError::Configuration(_)));
    }

    #[test]
    fn repeated_next_valid_rejected() {
        let cfg = CalendarConfig {
            repeated_wall_time: WallTimeOption::NextValid,
            ..CalendarConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert!(CalendarConfig::default().validate().is_ok());
    }
}
