//! apsync - mirrors open tickets into the Microsoft Graph approvals workflow
//!
//! One invocation performs one batch run:
//! - Authenticate against Microsoft Graph (silent when a cached session
//!   exists, device-code flow otherwise)
//! - Resolve the configured approver once
//! - Fetch the ticket list from the configured source
//! - For each actionable, policy-mapped ticket: create an approval, locate
//!   the record it produced, submit the configured decision
//!
//! There is no processed-ticket ledger: re-running the batch recreates
//! approvals for tickets that are still actionable and mapped.

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod output;

use apsync_engine::{SyncEngine, TicketOutcome};
use apsync_graph::{resolve_approver, ApprovalsClient, DeviceAuthenticator, GraphClient};
use apsync_source::{TicketFeedSource, TicketSource, WorkOrderSource};

use config::{ConfigError, RunConfig, SourceKind};
use error::{AppError, AppResult};
use output::{print_info, print_success, print_warning};

/// Mirror tickets into the Graph approvals workflow and auto-decide them.
#[derive(Parser)]
#[command(name = "apsync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Don't automatically open the browser for device-flow sign-in
    #[arg(long)]
    no_browser: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(cli).await {
        Ok(()) => {}
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let mut config = RunConfig::from_env()?;

    let authenticator = Arc::new(
        DeviceAuthenticator::new(&config.graph_client_id, &config.graph_tenant_id)
            .map_err(AppError::from_startup_graph_error)?
            .open_browser(!cli.no_browser),
    );
    let graph = GraphClient::with_base_url(authenticator, &config.graph_base_url)
        .map_err(AppError::from_startup_graph_error)?;

    // First Graph call; credential acquisition happens here.
    print_info(&format!("Resolving approver {}", config.approver_email));
    let approver = resolve_approver(&graph, &config.approver_email)
        .await
        .map_err(AppError::from_startup_graph_error)?;
    print_success(&format!(
        "Approver: {} ({})",
        approver.display_name, approver.id
    ));

    let source: Box<dyn TicketSource> = match config.source {
        SourceKind::Feed => {
            let url = config
                .ticket_feed_url
                .take()
                .ok_or_else(|| ConfigError::MissingVar("TICKET_FEED_URL".into()))?;
            Box::new(TicketFeedSource::new(url)?)
        }
        SourceKind::WorkOrder => {
            let settings = config
                .workorder
                .take()
                .ok_or_else(|| ConfigError::MissingVar("WORKORDER_BASE_URL".into()))?;
            Box::new(WorkOrderSource::new(
                settings.base_url,
                settings.username,
                settings.password,
            )?)
        }
    };

    print_info(&format!("Fetching tickets from {}", source.name()));
    let tickets = source.fetch_tickets().await?;
    if tickets.is_empty() {
        print_info("No tickets found.");
        return Ok(());
    }
    print_info(&format!("Fetched {} ticket(s)", tickets.len()));

    let engine = SyncEngine::new(
        ApprovalsClient::new(graph),
        approver,
        config.policy,
        config.engine,
    );
    let summary = engine.run(&tickets).await;

    println!();
    for result in &summary.results {
        let label = format!("ticket {} ({})", result.ticket_id, result.title);
        match &result.outcome {
            TicketOutcome::Completed { approval_id } => {
                print_success(&format!("{label}: decided as approval {approval_id}"));
            }
            TicketOutcome::CompletedSubmitFailed { approval_id, error } => {
                print_warning(&format!(
                    "{label}: approval {approval_id} located but the decision was not \
                     submitted ({error}); it remains open in the approvals app"
                ));
            }
            TicketOutcome::SubmitFailed { approval_id, error } => {
                print_warning(&format!(
                    "{label}: decision submission failed for approval {approval_id}: {error}"
                ));
            }
            TicketOutcome::CreateFailed { error } => {
                print_warning(&format!("{label}: approval creation failed: {error}"));
            }
            TicketOutcome::ManualActionRequired => {
                print_warning(&format!(
                    "{label}: created approval could not be located; act on it manually \
                     in the approvals app"
                ));
            }
            TicketOutcome::SkippedStatus { status } => {
                print_info(&format!("{label}: skipped (status '{status}')"));
            }
            TicketOutcome::SkippedUnmapped => {
                print_info(&format!("{label}: skipped (no policy entry)"));
            }
        }
    }

    println!();
    print_success(&format!(
        "All tickets processed: {} total, {} decided, {} skipped, {} failed ({} need manual action)",
        summary.total(),
        summary.processed(),
        summary.skipped(),
        summary.failed(),
        summary.manual_action_required(),
    ));

    Ok(())
}
