//! Status command - one pull of each endpoint, printed once.

use crate::config::DashConfig;
use crate::errors::{EXIT_GENERAL_ERROR, EXIT_INVALID_RESPONSE, EXIT_SERVER_UNAVAILABLE, EXIT_SUCCESS};
use crate::poller::{HttpSnapshotSource, SnapshotSource};
use crate::view::{FEED_PLACEHOLDER, LEADERBOARD_PLACEHOLDER};
use anyhow::Result;
use owo_colors::OwoColorize;
use rassh_shared::{ActivityRecord, RasshError, StatsResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    server: &'a str,
    #[serde(flatten)]
    stats: StatsResponse,
    recent_activity: Vec<ActivityRecord>,
}

/// Exit code for a failed pull
pub fn exit_code_for(error: &RasshError) -> i32 {
    match error {
        RasshError::Unreachable(_) => EXIT_SERVER_UNAVAILABLE,
        RasshError::Status(_) | RasshError::Malformed(_) | RasshError::Json(_) => {
            EXIT_INVALID_RESPONSE
        }
        _ => EXIT_GENERAL_ERROR,
    }
}

/// Run the status command; returns the process exit code
pub async fn run(config: &DashConfig, json: bool) -> Result<i32> {
    let source = HttpSnapshotSource::new(&config.server, config.poll.request_timeout())?;
    let base_url = config.server.base_url.as_str();

    let pulled = match source.fetch_stats().await {
        Ok(stats) => source.fetch_activity().await.map(|activity| (stats, activity)),
        Err(e) => Err(e),
    };

    let (stats, recent_activity) = match pulled {
        Ok(pulled) => pulled,
        Err(e) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "server": base_url, "error": e.to_string() })
                );
            } else {
                eprintln!("{} {}: {}", "✗".red(), base_url, e);
            }
            return Ok(exit_code_for(&e));
        }
    };

    if json {
        let report = StatusReport {
            server: base_url,
            stats,
            recent_activity,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(EXIT_SUCCESS);
    }

    print_report(base_url, &stats, &recent_activity);
    Ok(EXIT_SUCCESS)
}

fn print_report(base_url: &str, response: &StatsResponse, activity: &[ActivityRecord]) {
    println!();
    println!("{}", "  RASSH Honeypot".bold());
    println!("  {} {}", "✓".green(), base_url);
    println!();

    if let (Some(face), Some(mood)) = (&response.face, &response.mood) {
        println!("  {}  {}", face.bold(), mood.description().cyan());
    }
    if let Some(at) = &response.last_activity {
        println!("  Last activity: {}", at.dimmed());
    }
    println!();

    match &response.stats {
        Some(stats) => {
            println!("  Total sessions   {}", stats.total_sessions.yellow());
            println!("  Active sessions  {}", stats.active_sessions.yellow());
            println!("  Commands today   {}", stats.commands_today.yellow());
            println!("  Total commands   {}", stats.total_commands.yellow());
            println!();
            println!("{}", "  Top attackers".bold());
            if stats.top_addresses.is_empty() {
                println!("    {}", LEADERBOARD_PLACEHOLDER.dimmed());
            }
            for line in stats.leaderboard() {
                println!("    {}", line);
            }
        }
        None => println!("  {}", "No stats reported".dimmed()),
    }
    println!();

    println!("{}", "  Recent activity".bold());
    if activity.is_empty() {
        println!("    {}", FEED_PLACEHOLDER.dimmed());
    }
    for record in activity {
        let (r, g, b) = record.action.color();
        println!(
            "    {}  {:<15} {}  {} (Reward: {})",
            record.time_label().dimmed(),
            record.client_address,
            record.command,
            record.action.label().truecolor(r, g, b),
            record.reward
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&RasshError::Unreachable("refused".into())),
            EXIT_SERVER_UNAVAILABLE
        );
        assert_eq!(exit_code_for(&RasshError::Status(500)), EXIT_INVALID_RESPONSE);
        assert_eq!(
            exit_code_for(&RasshError::Malformed("eof".into())),
            EXIT_INVALID_RESPONSE
        );
        assert_eq!(exit_code_for(&RasshError::Http("tls".into())), EXIT_GENERAL_ERROR);
    }
}
