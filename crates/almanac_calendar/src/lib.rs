//! Multi-calendar date engine.
//!
//! This crate provides:
//! - A [`Calendar`] façade mapping instants to calendar fields and back
//! - Field resolution by recency, with lenient and strict validation
//! - `add`, `roll` and `field_difference` arithmetic
//! - Calendar families: Gregorian (with Julian cutover), Buddhist, ROC,
//!   Japanese, Chinese, Dangi, Hebrew, Islamic (four rules), Coptic and
//!   Ethiopic
//! - Zone transitions with configurable repeated/skipped wall times
//!
//! Lunisolar and astronomical Islamic months come from `almanac_astro`.

pub mod calendar;
pub mod config;
pub mod error;
pub mod family;
pub mod field;
pub mod resolve;
pub mod week;
pub mod zone;

pub use calendar::Calendar;
pub use config::{CalendarConfig, CalendarKind, WallTimeOption};
pub use error::CalendarError;
pub use family::{CalendarFamily, IslamicMethod, LimitType, LunisolarVariant};
pub use field::{Field, FieldSet, month, weekday};
pub use week::WeekRule;
pub use zone::{FixedZone, TimeZone, Transition, TransitionZone, ZoneOffsets};
