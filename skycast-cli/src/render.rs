//! Terminal rendering of a [`DisplayFrame`].
//!
//! Values arrive already converted into the active units; this module only
//! formats them.

use chrono::NaiveDateTime;
use skycast_core::DisplayFrame;
use skycast_core::app::HourlyView;

/// How many upcoming hours to show.
const HOURLY_HOURS: usize = 12;

pub fn print_frame(frame: &DisplayFrame) {
    let temp = frame.units.temperature.symbol();

    println!();
    println!("{}", frame.place);
    println!(
        "  {}  {:.0}{temp} (feels like {:.0}{temp})",
        frame.current.category.label(),
        frame.current.temperature,
        frame.current.apparent_temperature,
    );
    println!(
        "  humidity {}%  wind {:.0} {}  precipitation {:.2} {}",
        frame.current.humidity_pct,
        frame.current.wind_speed,
        frame.units.wind.symbol(),
        frame.current.precipitation,
        frame.units.precipitation.symbol(),
    );
    println!("  updated {} UTC", frame.fetched_at.format("%H:%M"));

    let upcoming: Vec<&HourlyView> = upcoming_hours(&frame.hourly, frame.current.time).collect();
    if !upcoming.is_empty() {
        println!();
        for hour in upcoming {
            println!(
                "  {}  {:>5.1}{temp}  {}",
                hour.time.format("%H:%M"),
                hour.temperature,
                hour.category.label(),
            );
        }
    }

    if !frame.daily.is_empty() {
        println!();
        for day in &frame.daily {
            println!(
                "  {}  {:>5.1}{temp} / {:>5.1}{temp}  {}",
                day.date.format("%a %d %b"),
                day.high,
                day.low,
                day.category.label(),
            );
        }
    }
}

/// The hourly series covers the whole forecast range; show only the hours
/// from the current observation onward.
fn upcoming_hours(
    hourly: &[HourlyView],
    now: NaiveDateTime,
) -> impl Iterator<Item = &HourlyView> {
    hourly
        .iter()
        .filter(move |hour| hour.time >= now)
        .take(HOURLY_HOURS)
}
