// Colored terminal output for term rankings, similar words and schedules.
//
// main.rs delegates all display work here so the core modules stay free of
// printing.

use colored::Colorize;

use crate::pipeline::analysis::AnalysisReport;
use crate::schedule::UploadSchedule;

/// Display the top ranked terms and the suggested title.
pub fn display_report(report: &AnalysisReport, top: usize) {
    println!(
        "\n{}",
        format!(
            "=== Top Terms for View Count ({} videos, {} terms) ===",
            report.documents, report.vocabulary
        )
        .bold()
    );
    println!();

    println!(
        "  {:>4}  {:<28} {:>16}",
        "Rank".dimmed(),
        "Term".dimmed(),
        "Coefficient".dimmed(),
    );
    println!("  {}", "-".repeat(50).dimmed());

    for (i, term) in report.top_terms(top).iter().enumerate() {
        let coefficient = format!("{:>16.2}", term.coefficient);
        let colored_coefficient = if term.coefficient > 0.0 {
            coefficient.green()
        } else if term.coefficient < 0.0 {
            coefficient.red()
        } else {
            coefficient.dimmed()
        };
        println!(
            "  {:>4}. {:<28} {}",
            i + 1,
            super::truncate_chars(&term.term, 28),
            colored_coefficient
        );
    }

    println!();
    println!(
        "  {}",
        format!("R² on training rows: {:.3}", report.r_squared).dimmed()
    );
    println!(
        "  {}",
        "Coefficients are correlational: they describe this sample, not what will earn views."
            .dimmed()
    );

    println!("\n{} {}", "Suggested title:".bold(), report.suggested_title);
}

/// Display nearest neighbours of a seed token.
pub fn display_similar(seed: &str, neighbours: &[(String, f32)]) {
    println!(
        "\n{}",
        format!("=== Words similar to '{seed}' ===").bold()
    );
    println!();

    if neighbours.is_empty() {
        println!("  No other words in the vocabulary.");
        return;
    }

    for (i, (word, score)) in neighbours.iter().enumerate() {
        let bar_width: usize = 20;
        let filled = (score.max(0.0) * bar_width as f32).round() as usize;
        let bar = format!(
            "[{}{}]",
            "=".repeat(filled.min(bar_width)),
            " ".repeat(bar_width.saturating_sub(filled))
        );
        println!("  {:>2}. {:<24} {} {:.3}", i + 1, word.bold(), bar.bright_blue(), score);
    }
}

/// Display the upload-timing recommendation and per-hour means.
pub fn display_schedule(schedule: &UploadSchedule) {
    println!(
        "\n{}",
        format!(
            "=== Upload Timing ({} timestamped videos) ===",
            schedule.videos
        )
        .bold()
    );
    println!();

    let best = schedule
        .hourly
        .iter()
        .map(|h| h.mean_views)
        .fold(0.0_f64, f64::max);

    for hour in &schedule.hourly {
        let line = format!(
            "  {:02}:00  {:>14.1} avg views  ({} videos)",
            hour.hour, hour.mean_views, hour.videos
        );
        if best > 0.0 && hour.mean_views >= best {
            println!("{}", line.bright_green());
        } else {
            println!("{line}");
        }
    }

    println!();
    for day in &schedule.daily {
        println!(
            "  {:<4} {:>14.1} avg views  ({} videos)",
            day.day.to_string(),
            day.mean_views,
            day.videos
        );
    }

    // Upload frequency for the most recent two weeks of dates
    println!();
    let skip = schedule.by_date.len().saturating_sub(14);
    for date in schedule.by_date.iter().skip(skip) {
        println!(
            "  {}  {:>3} uploads  {:>14.1} avg views",
            date.date, date.uploads, date.mean_views
        );
    }

    println!(
        "\n{} {:02}:00 UTC on {}",
        "Recommended upload time:".bold(),
        schedule.optimal_hour,
        schedule.optimal_day
    );
}
