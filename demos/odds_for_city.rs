use chrono::{Local, NaiveDate};
use cronoweath::{
    build_calendar, CalendarCell, CalendarCursor, ConditionQueryResult, Cronoweath,
    CronoweathError,
};
use std::env;

/// Usage: `cargo run --example odds_for_city -- "Arequipa" 2025-12-24`
#[tokio::main]
async fn main() -> Result<(), CronoweathError> {
    // Set RUST_LOG=info (or debug) to follow the jobs.
    env_logger::init();

    let mut args = env::args().skip(1);
    let city = args.next().unwrap_or_else(|| "Lima".to_string());
    let date = args
        .next()
        .and_then(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok())
        .unwrap_or_else(|| Local::now().date_naive());

    let client = Cronoweath::new()?;
    let places = client.search_places().query(&city).call().await?;
    let Some(place) = places.into_iter().next() else {
        println!("No place found for '{city}'");
        return Ok(());
    };
    println!("{} ({})", place.label, place.location);

    let cursor = CalendarCursor::from_date(date);
    println!("\n{}", cursor.label());
    for week in build_calendar(cursor) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                CalendarCell::Day(day) if cursor.date_for_day(*day) == Some(date) => {
                    format!("[{day:>2}]")
                }
                CalendarCell::Day(day) => format!(" {day:>2} "),
                CalendarCell::Empty => "    ".to_string(),
            })
            .collect();
        println!("{}", row.join(""));
    }

    let report = client
        .condition_odds()
        .location(place)
        .date(date)
        .call()
        .await?;

    println!();
    for (condition, result) in &report.results {
        match result {
            ConditionQueryResult::Ok(view) => {
                let card = &view.card;
                println!(
                    "{:<11} {:>6}  median {} {}  ({})",
                    card.condition_label,
                    card.probability
                        .map_or_else(|| "--".to_string(), |p| format!("{p:.1}%")),
                    card.statistic
                        .value
                        .map_or_else(|| "--".to_string(), |v| v.to_string()),
                    card.statistic.unit,
                    card.threshold_summary,
                );
                let bars: Vec<String> = view
                    .timeline_focus
                    .iter()
                    .map(|entry| {
                        let probability = entry
                            .probability_pct
                            .map_or_else(|| "--".to_string(), |p| format!("{p:.0}"));
                        format!("{} {}", entry.weekday_short, probability)
                    })
                    .collect();
                println!("            {}", bars.join(" | "));
            }
            ConditionQueryResult::Insufficient(payload) => println!(
                "{:<11} not enough data: {}",
                condition.label(),
                payload.message.as_deref().unwrap_or("--")
            ),
            ConditionQueryResult::Error { message } => {
                println!("{:<11} failed: {}", condition.label(), message)
            }
            ConditionQueryResult::Aborted => println!("{:<11} aborted", condition.label()),
        }
    }
    if let Some(error) = report.error {
        println!("\n{error}");
    }

    Ok(())
}
