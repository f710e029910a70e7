//! bookbind - Merge chapter PDFs into a single book with a linked TOC.
//!
//! CLI entry point: parses arguments (or prompts for them), plans the
//! layout, and drives the build pipeline.

use clap::Parser;
use std::process;

use bookbind::cli::Cli;
use bookbind::config::Config;
use bookbind::error::BookbindError;
use bookbind::merge::{build_book, plan_book};
use bookbind::output::{OutputFormatter, display_scan_summary};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), BookbindError> {
    let config = cli.into_config()?;

    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", bookbind::NAME, bookbind::VERSION));
        formatter.blank_line();
    }

    // Handle output file existence before doing any work
    if !config.dry_run {
        handle_output_overwrite(&config, &formatter).await?;
    }

    // Dry run mode - show the planned layout and stop
    if config.dry_run {
        let book_plan = plan_book(&config).await?;
        display_scan_summary(&formatter, &book_plan.summary);

        formatter.section("Planned layout");
        if book_plan.plan.cover_offset == 1 {
            formatter.detail("Cover", "page 1");
        }
        formatter.detail(
            "TOC pages",
            &book_plan.plan.toc_page_count.to_string(),
        );
        for entry in &book_plan.plan.entries {
            formatter.detail(
                &entry.title,
                &format!("page {}", entry.destination_page),
            );
        }

        if formatter.is_verbose() {
            let json = serde_json::to_string_pretty(&book_plan.summary)
                .map_err(|e| BookbindError::other(e.to_string()))?;
            formatter.blank_line();
            println!("{json}");
        }

        formatter.blank_line();
        formatter.success("Dry run completed successfully");
        formatter.info(&format!("  Output would be: {}", config.output.display()));
        formatter.info("  Run without --dry-run to create the merged book");
        return Ok(());
    }

    formatter.info("Building book...");
    formatter.blank_line();

    let result = build_book(&config).await?;

    display_scan_summary(&formatter, &result.summary);

    if result.statistics.links_skipped > 0 {
        formatter.warning(&format!(
            "Warning: {} TOC link(s) point past the end of the book and were skipped",
            result.statistics.links_skipped
        ));
    }
    if result.statistics.overlapping_rects > 0 {
        formatter.warning(&format!(
            "Warning: {} overlapping TOC link region(s) detected",
            result.statistics.overlapping_rects
        ));
    }

    formatter.blank_line();
    formatter.success(&format!(
        "Successfully created {} ({} pages)",
        result.output.display(),
        result.statistics.total_pages
    ));

    if formatter.is_verbose() {
        formatter.blank_line();
        formatter.section("Statistics");
        formatter.detail(
            "Chapters merged",
            &result.statistics.chapters_merged.to_string(),
        );
        formatter.detail(
            "Chapters skipped",
            &result.statistics.chapters_skipped.to_string(),
        );
        formatter.detail("TOC pages", &result.statistics.toc_pages.to_string());
        formatter.detail("Total pages", &result.statistics.total_pages.to_string());
        formatter.detail(
            "Bookmarks",
            &result.statistics.bookmarks_added.to_string(),
        );
        formatter.detail("Links", &result.statistics.links_added.to_string());
        formatter.detail(
            "Load time",
            &format!("{:.2}s", result.statistics.load_time.as_secs_f64()),
        );
        formatter.detail(
            "Build time",
            &format!("{:.2}s", result.statistics.build_time.as_secs_f64()),
        );
    }

    Ok(())
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), BookbindError> {
    use bookbind::config::OverwriteMode;

    // Check if output exists
    if !config.output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => {
            // Just overwrite, no questions asked
            Ok(())
        }
        OverwriteMode::NoClobber => {
            // Error if file exists
            Err(BookbindError::output_exists(config.output.clone()))
        }
        OverwriteMode::Prompt => {
            // Ask user for confirmation
            if formatter.is_quiet() {
                // In quiet mode, treat as no-clobber
                return Err(BookbindError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            // Simple yes/no prompt
            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| BookbindError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(BookbindError::Cancelled)
            }
        }
    }
}
