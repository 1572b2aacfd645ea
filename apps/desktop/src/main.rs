use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    ConfirmOutcome, FilterChange, HttpParticipantService, PaymentOutcome, ReportScope,
    RosterEvent, RosterView,
};
use shared::domain::{AttendanceStatus, ParticipantId, PaymentStatus};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, normalize_base_url, DEFAULT_CONFIG_PATH};
use render::TableRow;

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Participant attendance and payment desk")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides the participant service base url from config/env.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the roster, optionally filtered.
    List(FilterArgs),
    /// Confirm attendance for one or more participants, one request at a time.
    Confirm {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Set a participant's payment status.
    Pay {
        id: String,
        #[arg(long, value_enum)]
        status: PaymentArg,
    },
    /// Print the attendance summary document.
    Report {
        #[command(flatten)]
        filters: FilterArgs,
        /// Summarize the whole roster instead of the filtered rows.
        #[arg(long)]
        all: bool,
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    #[arg(long, value_enum)]
    payment: Option<PaymentArg>,
    /// `hadir`/`present`, or any other attendance label as sent by the service.
    #[arg(long)]
    attendance: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PaymentArg {
    Paid,
    Unpaid,
}

impl From<PaymentArg> for PaymentStatus {
    fn from(value: PaymentArg) -> Self {
        match value {
            PaymentArg::Paid => PaymentStatus::Paid,
            PaymentArg::Unpaid => PaymentStatus::Unpaid,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ReportFormat {
    Text,
    Json,
}

fn parse_attendance(raw: &str) -> AttendanceStatus {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("present") || trimmed.eq_ignore_ascii_case("hadir") {
        AttendanceStatus::Present
    } else {
        AttendanceStatus::from(trimmed)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(api_url) = &args.api_url {
        settings.api_base_url = normalize_base_url(api_url)?;
    }

    let service = match settings.request_timeout {
        Some(timeout) => HttpParticipantService::with_timeout(&settings.api_base_url, timeout)?,
        None => HttpParticipantService::new(&settings.api_base_url)?,
    };
    let view = RosterView::new(Arc::new(service), settings.payment_sync);
    tokio::spawn(log_events(view.subscribe()));

    view.load()
        .await
        .with_context(|| format!("could not load roster from {}", settings.api_base_url))?;

    match args.command {
        Command::List(filters) => {
            apply_filters(&view, &filters).await;
            print_table(&view).await;
        }
        Command::Confirm { ids } => {
            for raw in ids {
                let id = ParticipantId::new(raw);
                let outcome = view.confirm_attendance(&id).await;
                println!("{id}: {}", describe_confirm(&outcome));
            }
            print_table(&view).await;
        }
        Command::Pay { id, status } => {
            let id = ParticipantId::new(id);
            let outcome = view.toggle_payment(&id, status.into()).await;
            println!("{id}: {}", describe_payment(&outcome));
            print_table(&view).await;
        }
        Command::Report {
            filters,
            all,
            format,
        } => {
            apply_filters(&view, &filters).await;
            let scope = if all {
                ReportScope::Full
            } else {
                ReportScope::Filtered
            };
            let document = view.summary(scope).await;
            match format {
                ReportFormat::Text => print!("{}", render::summary_text(&document)),
                ReportFormat::Json => println!("{}", render::summary_json(&document)?),
            }
        }
    }

    Ok(())
}

async fn apply_filters(view: &RosterView, filters: &FilterArgs) {
    if let Some(payment) = filters.payment {
        view.set_filter(FilterChange::Payment(Some(payment.into())))
            .await;
    }
    if let Some(attendance) = &filters.attendance {
        view.set_filter(FilterChange::Attendance(Some(parse_attendance(attendance))))
            .await;
    }
}

async fn print_table(view: &RosterView) {
    let filtered = view.filtered().await;
    let mut flags = Vec::with_capacity(filtered.len());
    for participant in &filtered {
        flags.push((
            view.can_confirm(&participant.id).await,
            view.is_tentative(&participant.id).await,
        ));
    }

    let rows: Vec<TableRow<'_>> = filtered
        .iter()
        .zip(flags)
        .map(|(participant, (can_confirm, tentative))| TableRow {
            participant,
            can_confirm,
            tentative,
        })
        .collect();
    print!("{}", render::roster_table(&rows));
}

fn describe_confirm(outcome: &ConfirmOutcome) -> String {
    match outcome {
        ConfirmOutcome::Confirmed { tentative: false } => "confirmed".to_string(),
        ConfirmOutcome::Confirmed { tentative: true } => {
            "confirmed (pending reload from service)".to_string()
        }
        ConfirmOutcome::NotRecorded(attendance) => {
            format!("service did not record attendance (now {attendance})")
        }
        ConfirmOutcome::Rejected(reason) => format!("not confirmed: {reason}"),
        ConfirmOutcome::Failed(message) => format!("confirmation failed: {message}"),
        ConfirmOutcome::Discarded => "discarded".to_string(),
    }
}

fn describe_payment(outcome: &PaymentOutcome) -> String {
    match outcome {
        PaymentOutcome::Applied { rows: 0, .. } => "no such participant".to_string(),
        PaymentOutcome::Applied { synced: true, .. } => "payment updated and synced".to_string(),
        PaymentOutcome::Applied { synced: false, .. } => "payment updated locally".to_string(),
        PaymentOutcome::Reverted(message) => format!("payment sync failed, reverted: {message}"),
        PaymentOutcome::Superseded(message) => {
            format!("payment sync failed, row changed since and was kept: {message}")
        }
        PaymentOutcome::Discarded => "discarded".to_string(),
    }
}

async fn log_events(mut events: broadcast::Receiver<RosterEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => tracing::debug!(?event, "roster event"),
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "roster event log lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
