// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod cli;
mod config;
mod console_format;
mod diff;
mod error;
mod error_extract;
mod exit_codes;
mod exit_status;
mod github;
mod normalize;
mod parser;
mod report;
mod types;
mod ui;
mod webhook;

use config::{CompareConfig, NotifyConfig, RunConfig, SummarizeConfig};
use error::{LaneError, Result};
use std::fs;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();

    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    let file_config = match config::load_file_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => fail(e),
    };

    let run_config = match config::build_run_config(&args, file_config) {
        Ok(c) => c,
        Err(e) => fail(e),
    };

    let result = match run_config {
        RunConfig::Summarize(c) => run_summarize(&c),
        RunConfig::Compare(c) => run_compare(&c),
        RunConfig::Notify(c) => run_notify(&c),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => fail(e),
    }
}

fn fail(e: LaneError) -> ! {
    ui::print_error(&e.to_string());
    std::process::exit(e.exit_code());
}

/// Parse one log, print its table and write the snapshot file
fn run_summarize(config: &SummarizeConfig) -> Result<i32> {
    let bytes = fs::read(&config.log_path).map_err(|e| LaneError::io(&config.log_path, e))?;
    let raw = String::from_utf8_lossy(&bytes);

    let parsed = parser::parse_log(&config.platform, &raw, &config.parse);

    if config.show_table {
        console_format::print_diagnostics_table(&parsed.info, &parsed.exit);
    }

    let summary = report::SummaryFile::new(&parsed);
    report::write_summary(&config.output_path, &summary)?;

    ui::status(&report::headline(&report::platform_stats(&parsed.info)));
    ui::status(&format!("Snapshot saved to: {}", config.output_path.display()));

    if parsed.exit.is_failure() {
        ui::print_warning(&format!("{} build failed ({}, code {})", config.platform, parsed.exit, parsed.exit.code()));
        return Ok(exit_codes::BUILD_FAILED);
    }
    Ok(exit_codes::SUCCESS)
}

fn read_summaries(paths: &[PathBuf]) -> Result<Vec<report::SummaryFile>> {
    paths.iter().map(|p| report::read_summary(p)).collect()
}

/// Compare two snapshots: print the counts table and the rendered diff
fn run_compare(config: &CompareConfig) -> Result<i32> {
    let summaries = read_summaries(&config.reports)?;
    let infos: Vec<_> = summaries.iter().map(|s| s.build.clone()).collect();
    let outcome = diff::split_common(&infos);

    console_format::print_platform_table(&report::summarize_infos(&infos));
    println!("{}", report::render_infos(outcome.common.iter().chain(outcome.residual.iter())));

    if let Some(ref path) = config.markdown_path {
        report::export_markdown_report(path, &summaries, &outcome)?;
        ui::status(&format!("Markdown report saved to: {}", path.display()));
    }

    Ok(exit_codes::SUCCESS)
}

/// Post the rendered comparison to the webhook (or print it for a dry run)
fn run_notify(config: &NotifyConfig) -> Result<i32> {
    let summaries = read_summaries(&config.reports)?;
    let infos: Vec<_> = summaries.iter().map(|s| s.build.clone()).collect();
    let outcome = diff::split_common(&infos);

    let title = match config.github {
        Some(ref gh) => {
            let lookup = github::GitHubClient::new(&gh.api_url, &gh.organisation, &gh.repository, gh.token.clone());
            webhook::notification_title(&config.title, config.branch.as_deref(), &lookup)?
        }
        None => config.title.clone(),
    };

    match config.webhook_url {
        Some(ref url) if !config.dry_run => {
            let client = webhook::WebhookClient::new(url.as_str());
            webhook::notify(&client, &title, &summaries, &outcome)?;
            ui::status("Report posted to webhook");
        }
        _ => println!("{}", webhook::format_notification(&title, &summaries, &outcome)),
    }

    Ok(exit_codes::SUCCESS)
}
