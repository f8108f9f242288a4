//! Terminal output formatting.

use colored::Colorize;

use gdelt_graph::queries::HighIntensityEvent;
use gdelt_graph::LoadReport;

/// Print the per-run load summary plus one diagnostic line per failed row.
pub fn print_load_report(report: &LoadReport) {
    println!("\n{}", "Load complete:".green().bold());
    println!("  Source file:  {}", report.source.display());
    println!("  Rows attempted: {}", report.attempted);
    println!("  Rows loaded:    {}", report.loaded);

    if report.failures.is_empty() {
        return;
    }
    println!(
        "\n{} {}",
        "Skipped rows:".yellow().bold(),
        report.failures.len()
    );
    for failure in &report.failures {
        println!(
            "  {} {} {}",
            format!("row {}", failure.index).yellow(),
            failure.error,
            if failure.raw.is_empty() {
                String::new()
            } else {
                format!("[{}]", failure.raw).dimmed().to_string()
            }
        );
    }
}

/// Print high-intensity query results as a table.
pub fn print_high_intensity_events(events: &[HighIntensityEvent]) {
    println!(
        "{:<12} {:<10} {:<8} {:<10} {:<8} {}",
        "Event", "Goldstein", "Code", "Date", "Actor", "Location"
    );
    println!("{}", "-".repeat(80));

    for event in events {
        let goldstein = event
            .goldstein_scale
            .map(|g| format!("{g:.1}"))
            .unwrap_or_default();
        let location = match &event.location {
            Some(loc) => format!(
                "{} ({:?})",
                loc.fullname.as_deref().unwrap_or("?"),
                loc.coordinates
            ),
            None => "-".to_string(),
        };
        println!(
            "{:<12} {:<10} {:<8} {:<10} {:<8} {}",
            event.event_id.cyan(),
            goldstein.red(),
            event.event_code.as_deref().unwrap_or("-"),
            event
                .event_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            event.actor.country_code.as_deref().unwrap_or("-"),
            location
        );
    }
    println!("\n{} events", events.len().to_string().bold());
}
