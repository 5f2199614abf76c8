//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable text.

use anyhow::Result;
use campus_concierge::{Answer, DatasetSummary, Intent};

/// Print a pipeline answer.
pub fn print_answer(answer: &Answer, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(answer)?);
    } else {
        println!("{}", answer.content);
        eprintln!("\n[intent: {}, source: {:?}]", answer.intent, answer.source);
    }
    Ok(())
}

/// Print a classified intent.
pub fn print_intent(intent: Intent, strategy: &str, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({ "intent": intent, "strategy": strategy });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{} ({})", intent, intent.display_name());
    }
    Ok(())
}

/// Print dataset counts.
pub fn print_summary(summary: &DatasetSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("Data directory: {}", summary.root);
    println!("Datasets ({}):", summary.datasets.len());
    for name in &summary.datasets {
        println!("  - {}", name);
    }
    println!("Calendar events: {}", summary.calendar_count);
    println!("Faculty records: {}", summary.faculty_count);
    println!("Club records:    {}", summary.club_count);
    if summary.skipped_files > 0 {
        println!("Skipped files:   {}", summary.skipped_files);
    }
    Ok(())
}
