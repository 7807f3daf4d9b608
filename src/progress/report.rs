use std::fmt::Write;

use chrono::{DateTime, TimeZone};

use crate::core::format_count;
use crate::progress::ProgressTracker;

const BAR_WIDTH: usize = 30;

/// `[█████░░░░░]`-style bar body, `width` cells wide
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((width as f64 * percentage / 100.0) as usize).min(width);
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(width - filled));
    bar
}

/// Shortest form of an already rounded percentage: `68.3`, `33.33`, `100.0`
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Full text report: summary, per-console details, missing consoles
pub fn render_report<Tz>(tracker: &ProgressTracker, generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, tracker, generated_at);
    out
}

fn write_report<Tz>(out: &mut String, tracker: &ProgressTracker, generated_at: &DateTime<Tz>) -> std::fmt::Result
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let summary = tracker.summary();
    let progress = tracker.calculate_progress();

    writeln!(out)?;
    writeln!(out, "🎮 GAMING DATABASE PROGRESS TRACKER")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "📊 Total Dead Consoles: {}", summary.total_consoles)?;
    writeln!(out, "🗃️  Databases Created: {}", summary.databases_created)?;
    writeln!(out, "📈 Coverage: {:.1}% of consoles", summary.coverage_percent)?;
    writeln!(out)?;

    if !progress.is_empty() {
        writeln!(
            out,
            "🎯 Overall Game Progress: {} / {} games ({:.1}%)",
            format_count(summary.games_current),
            format_count(summary.games_target),
            summary.overall_percent
        )?;
        writeln!(out)?;
    }

    if progress.is_empty() {
        writeln!(out, "❌ No console databases found!")?;
    } else {
        writeln!(out, "📋 DETAILED PROGRESS BY CONSOLE")?;
        writeln!(out, "{}", "=".repeat(80))?;

        for console in &progress {
            writeln!(out)?;
            writeln!(out, "🎮 {}", console.console)?;
            writeln!(out, "   Manufacturer: {}", console.manufacturer)?;
            writeln!(
                out,
                "   Generation: {} ({}-{})",
                console.generation, console.release_year, console.discontinuation_year
            )?;
            writeln!(
                out,
                "   Progress: {} / {} games ({}%)",
                format_count(console.current_games),
                format_count(console.total_official_games),
                format_percent(console.percentage_complete)
            )?;
            writeln!(out, "   Status: {}", console.status)?;
            writeln!(out, "   File: {}", console.filename)?;
            writeln!(out, "   Last Updated: {}", console.last_updated)?;
            writeln!(
                out,
                "   [{}] {}%",
                progress_bar(console.percentage_complete, BAR_WIDTH),
                format_percent(console.percentage_complete)
            )?;
        }
    }

    let missing = tracker.missing_consoles();
    if !missing.is_empty() {
        writeln!(out)?;
        writeln!(out, "🔍 MISSING CONSOLE DATABASES")?;
        writeln!(out, "{}", "=".repeat(50))?;

        for console in missing {
            writeln!(out, "⚫ {} ({})", console.console, console.manufacturer)?;
            writeln!(
                out,
                "   {} games | Gen {} | {}-{}",
                format_count(console.total_official_games),
                console.generation,
                console.release_year,
                console.discontinuation_year
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "📅 Report generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;

    Ok(())
}
