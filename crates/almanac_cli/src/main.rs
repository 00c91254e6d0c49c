use std::process;
use std::sync::Arc;

use almanac_astro::{
    GeoLocation, NEW_MOON, RiseSetEvent, SYNODIC_MONTH, WINTER_SOLSTICE, moon_age, moon_rise_set,
    moon_time, nearest_new_moon, sun_longitude, sun_rise_set, sun_time,
};
use almanac_calendar::{
    Calendar, CalendarConfig, CalendarKind, Field, FixedZone, TimeZone,
    TransitionZone, WeekRule,
};
use almanac_time::{HOUR_MS, gregorian_to_jd, julian_day_to_millis};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "almanac", about = "Multi-calendar date and astronomy CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported calendar identifiers
    Calendars,
    /// Print every calendar field for an instant
    Fields {
        /// Calendar identifier (gregorian, chinese, hebrew, islamic-civil, ...)
        #[arg(long, default_value = "gregorian")]
        calendar: String,
        /// UTC datetime (YYYY-MM-DD or YYYY-MM-DDThh:mm:ssZ); defaults to now
        #[arg(long)]
        date: Option<String>,
        /// Fixed zone offset in hours, "apia" for Pacific/Apia or "new-york" for 2023 US Eastern time
        #[arg(long, default_value = "0")]
        zone: String,
        /// Use ISO 8601 week numbering
        #[arg(long)]
        iso: bool,
    },
    /// Add to (or roll) a field and print the result
    Add {
        #[arg(long, default_value = "gregorian")]
        calendar: String,
        /// UTC datetime (YYYY-MM-DD or YYYY-MM-DDThh:mm:ssZ)
        #[arg(long)]
        date: String,
        /// Field name, e.g. MONTH or day_of_month
        field: String,
        /// Signed amount
        #[arg(allow_hyphen_values = true)]
        amount: i32,
        /// Roll instead of add (no carry into larger fields)
        #[arg(long)]
        roll: bool,
        #[arg(long, default_value = "0")]
        zone: String,
    },
    /// Count whole units of a field between two dates
    Diff {
        #[arg(long, default_value = "gregorian")]
        calendar: String,
        /// Start datetime (UTC)
        from: String,
        /// End datetime (UTC)
        to: String,
        /// Field name, e.g. YEAR or DAY_OF_MONTH
        #[arg(long, default_value = "DAY_OF_MONTH")]
        field: String,
    },
    /// Sun longitude and moon age at an instant
    Astro {
        /// UTC datetime (YYYY-MM-DD or YYYY-MM-DDThh:mm:ssZ)
        #[arg(long)]
        date: String,
    },
    /// Next (or previous) new moon and winter solstice
    Lunation {
        #[arg(long)]
        date: String,
        /// Search backward in time
        #[arg(long)]
        backward: bool,
    },
    /// Sunrise, sunset, moonrise and moonset for a location
    RiseSet {
        #[arg(long)]
        date: String,
        /// Latitude in degrees (north positive)
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees (east positive)
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Calendars => {
            for kind in CalendarKind::ALL {
                println!("{}", kind.identifier());
            }
        }

        Commands::Fields {
            calendar,
            date,
            zone,
            iso,
        } => {
            let millis = match date {
                Some(d) => or_exit(parse_utc(&d)),
                None => or_exit(Calendar::new(CalendarKind::Gregorian).and_then(|mut c| c.time_in_millis())),
            };
            let mut config = CalendarConfig::new(or_exit(calendar.parse()));
            if iso {
                config.week_rule = WeekRule::ISO;
            }
            let mut cal = or_exit(Calendar::at(config, or_exit(parse_zone(&zone)), millis));
            print_fields(&mut cal);
        }

        Commands::Add {
            calendar,
            date,
            field,
            amount,
            roll,
            zone,
        } => {
            let field = or_exit(parse_field(&field));
            let config = CalendarConfig::new(or_exit(calendar.parse()));
            let millis = or_exit(parse_utc(&date));
            let mut cal = or_exit(Calendar::at(config, or_exit(parse_zone(&zone)), millis));
            let result = if roll {
                cal.roll(field, amount)
            } else {
                cal.add(field, amount)
            };
            or_exit(result);
            print_fields(&mut cal);
        }

        Commands::Diff {
            calendar,
            from,
            to,
            field,
        } => {
            let field = or_exit(parse_field(&field));
            let config = CalendarConfig::new(or_exit(calendar.parse()));
            let start = or_exit(parse_utc(&from));
            let end = or_exit(parse_utc(&to));
            let mut cal = or_exit(Calendar::at(config, Arc::new(FixedZone::utc()), start));
            let n = or_exit(cal.field_difference(end, field));
            println!("{n} {field}");
        }

        Commands::Astro { date } => {
            let millis = or_exit(parse_utc(&date));
            println!("Sun longitude : {:.6} deg", sun_longitude(millis).to_degrees());
            let age = moon_age(millis);
            println!(
                "Moon age      : {:.6} deg ({:.2} days)",
                age.to_degrees(),
                age / std::f64::consts::TAU * SYNODIC_MONTH / 86_400_000.0
            );
        }

        Commands::Lunation { date, backward } => {
            let millis = or_exit(parse_utc(&date));
            let forward = !backward;
            print_instant("New moon", nearest_new_moon(millis, forward));
            print_instant("New moon (phase search)", moon_time(millis, NEW_MOON, forward));
            print_instant("Winter solstice", sun_time(millis, WINTER_SOLSTICE, forward));
        }

        Commands::RiseSet { date, lat, lon } => {
            let millis = or_exit(parse_utc(&date));
            let loc = GeoLocation::new(lat, lon);
            print_instant("Sunrise", sun_rise_set(millis, RiseSetEvent::Rise, &loc));
            print_instant("Sunset", sun_rise_set(millis, RiseSetEvent::Set, &loc));
            print_instant("Moonrise", moon_rise_set(millis, RiseSetEvent::Rise, &loc));
            print_instant("Moonset", moon_rise_set(millis, RiseSetEvent::Set, &loc));
        }
    }
}

fn or_exit<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    })
}

fn print_fields(cal: &mut Calendar) {
    println!("calendar: {}", cal.kind());
    for field in Field::ALL {
        let value = or_exit(cal.get(field));
        println!("{:<22} {value}", field.name());
    }
    println!("{:<22} {}", "MILLIS", or_exit(cal.time_in_millis()));
}

fn print_instant(label: &str, millis: Option<i64>) {
    match millis {
        Some(ms) => println!("{label:<24} {} ({ms})", format_utc(ms)),
        None => println!("{label:<24} none"),
    }
}

fn format_utc(millis: i64) -> String {
    let mut cal = or_exit(Calendar::at(
        CalendarConfig::default(),
        Arc::new(FixedZone::utc()),
        millis,
    ));
    let [year, month, day, hour, minute, second] = [
        Field::ExtendedYear,
        Field::Month,
        Field::DayOfMonth,
        Field::HourOfDay,
        Field::Minute,
        Field::Second,
    ]
    .map(|f| or_exit(cal.get(f)));
    format!(
        "{year:04}-{:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z",
        month + 1
    )
}

fn parse_field(name: &str) -> Result<Field, String> {
    Field::from_name(name).ok_or_else(|| format!("unknown field '{name}'"))
}

fn parse_zone(s: &str) -> Result<Arc<dyn TimeZone>, String> {
    if s.eq_ignore_ascii_case("apia") {
        return Ok(Arc::new(TransitionZone::pacific_apia()));
    }
    if s.eq_ignore_ascii_case("new-york") {
        return Ok(Arc::new(TransitionZone::us_eastern_2023()));
    }
    let hours: i32 = s.parse().map_err(|e| format!("zone '{s}': {e}"))?;
    if !(-18..=18).contains(&hours) {
        return Err(format!("zone offset {hours}h out of range"));
    }
    Ok(Arc::new(FixedZone::from_hours(hours)))
}

/// Parse "YYYY-MM-DD", "YYYY-MM-DDThh:mm" or "YYYY-MM-DDThh:mm:ss[Z]" as
/// proleptic Gregorian UTC.
fn parse_utc(s: &str) -> Result<i64, String> {
    let s = s.trim_end_matches('Z');
    let (date, time) = s.split_once('T').unwrap_or((s, "00:00:00"));
    let (negative, date) = match date.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, date),
    };
    let date_parts: Vec<&str> = date.split('-').collect();
    let time_parts: Vec<&str> = time.split(':').collect();
    if date_parts.len() != 3 || !(2..=3).contains(&time_parts.len()) {
        return Err(format!("expected YYYY-MM-DDThh:mm:ssZ, got {s}"));
    }
    let num = |p: &str| p.parse::<i64>().map_err(|e| format!("'{p}': {e}"));
    let mut year = num(date_parts[0])?;
    if negative {
        year = -year;
    }
    let month = num(date_parts[1])?;
    let day = num(date_parts[2])?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(format!("invalid date {date}"));
    }
    let hour = num(time_parts[0])?;
    let minute = num(time_parts[1])?;
    let second = time_parts.get(2).map_or(Ok(0), |p| num(p))?;
    let jd = gregorian_to_jd(year, month - 1, day);
    let in_day = hour * HOUR_MS + minute * 60_000 + second * 1_000;
    julian_day_to_millis(jd, in_day).map_err(|e| e.to_string())
}
