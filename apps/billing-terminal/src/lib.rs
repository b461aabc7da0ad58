//! # Billing Terminal Library
//!
//! Core library for the billing counter terminal application.
//!
//! ## Module Organization
//! ```text
//! billing_terminal_lib/
//! ├── lib.rs          ◄─── You are here (start-up & command loop)
//! ├── commands.rs     ◄─── Line parser: text → Command / Action
//! ├── render.rs       ◄─── Plain-text form and bill views
//! └── error.rs        ◄─── App error type
//! ```
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  stdin line ──► parse_command ──► Command::Form(action)                │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                           BillingSession::dispatch(action)             │
//! │                                        │                                │
//! │                                        ▼                                │
//! │  stdout ◄── render_form ◄── form state (rows, totals, errors)           │
//! │                                                                         │
//! │  The loop ends on `quit`, end of input, or once the bill exists.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod render;

use billing_client::{BillingBackend, BillingSession, ClientConfig, HttpBackend};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use commands::{parse_command, Command, HELP_TEXT};
use error::AppError;
use render::{render_bill, render_form};

/// Command-line flags.
#[derive(Debug, Parser)]
#[command(name = "billing-terminal", version, about = "Billing counter for the billing server")]
pub struct Cli {
    /// Config file (default: platform config dir, billing.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Billing server root, overriding config and environment
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Runs the terminal application.
///
/// ## Startup Sequence
/// 1. Load config (defaults → file → environment → `--base-url`)
/// 2. Connect the HTTP backend (CSRF token obtained here)
/// 3. Build the palette (server list or configured fallback)
/// 4. Read commands until quit or the bill is generated
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = ClientConfig::load(cli.config)?;
    if let Some(base_url) = cli.base_url {
        config.server.base_url = base_url;
        config.validate()?;
    }

    let backend = HttpBackend::connect(&config).await?;
    let mut session = BillingSession::start(backend, &config.denominations).await;
    info!(session_id = %session.id(), "Billing counter open");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let location = run_loop(&mut session, stdin, &mut stdout).await?;

    match location {
        Some(url) => info!(url = %url, "Billing complete"),
        None => info!("Left without billing"),
    }
    Ok(())
}

/// Reads commands from `input` and renders to `output`.
///
/// Returns the bill page once a bill has been generated, or `None` when
/// input ends or the cashier quits first.
pub async fn run_loop<B, R, W>(
    session: &mut BillingSession<B>,
    input: R,
    output: &mut W,
) -> Result<Option<Url>, AppError>
where
    B: BillingBackend,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    write_out(output, &render_form(session.form())).await?;
    write_out(output, "> ").await?;

    while let Some(line) = lines.next_line().await? {
        match handle_line(session, &line).await {
            Ok(Step::Continue(text)) => write_out(output, &text).await?,
            Ok(Step::Quit) => return Ok(None),
            Ok(Step::Billed(url)) => {
                let receipt = session.form().receipt();
                write_out(output, &render_bill(&url, receipt)).await?;
                return Ok(Some(url));
            }
            Err(e) if !e.is_fatal() => {
                warn!(line = %line, error = %e, "Bad command");
                write_out(output, &format!("{}\n", e)).await?;
            }
            Err(e) => return Err(e),
        }
        write_out(output, "> ").await?;
    }

    Ok(None)
}

/// What one input line led to.
enum Step {
    Continue(String),
    Quit,
    Billed(Url),
}

async fn handle_line<B: BillingBackend>(
    session: &mut BillingSession<B>,
    line: &str,
) -> Result<Step, AppError> {
    let step = match parse_command(line)? {
        Command::Quit => Step::Quit,
        Command::Help => Step::Continue(HELP_TEXT.to_string()),
        Command::Show => Step::Continue(render_form(session.form())),
        Command::Form(action) => match session.dispatch(action).await? {
            Some(url) => Step::Billed(url),
            None => Step::Continue(render_form(session.form())),
        },
    };
    Ok(step)
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), AppError> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=billing_client=trace` - Show trace for one crate only
/// - Default: INFO, DEBUG for the billing crates
///
/// Logs go to stderr so they never interleave with the rendered form.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,billing=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use billing_client::{ClientError, ClientResult};
    use billing_core::{
        BillReceipt, CalculateTotalRequest, DisplayAmount, GenerateBillRequest, OrderCode,
        TotalsResult,
    };

    /// Answers every request for order `O1` with a 110 total.
    struct CounterBackend {
        addressable: bool,
    }

    #[async_trait]
    impl BillingBackend for CounterBackend {
        async fn calculate_total(
            &self,
            _request: &CalculateTotalRequest,
        ) -> ClientResult<TotalsResult> {
            Ok(TotalsResult {
                order_code: OrderCode::new("O1"),
                total_before_tax: DisplayAmount::new("100"),
                total_tax: DisplayAmount::new("10"),
                total_amount: DisplayAmount::new("110"),
            })
        }

        async fn generate_bill(&self, request: &GenerateBillRequest) -> ClientResult<BillReceipt> {
            Ok(BillReceipt::for_order(request.order_code.clone()))
        }

        async fn fetch_denominations(&self) -> ClientResult<Vec<i64>> {
            Err(ClientError::ConnectionFailed("offline".into()))
        }

        fn resolve(&self, path: &str) -> ClientResult<Url> {
            if !self.addressable {
                return Err(ClientError::InvalidUrl(path.to_string()));
            }
            Ok(Url::parse("http://counter.test/")?.join(path.trim_start_matches('/'))?)
        }
    }

    async fn run_script(script: &str) -> (Option<Url>, String) {
        let mut session = BillingSession::new(CounterBackend { addressable: true }, &[100, 50]);
        let mut output = Vec::new();
        let location = run_loop(&mut session, script.as_bytes(), &mut output)
            .await
            .unwrap();
        (location, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn test_script_to_bill() {
        let (location, output) = run_script(
            "email a@b.com\ncode 1 P001\nqty 1 2\ncalc\ndenom 100 1\nbill\ndenom 50 1\nbill\nquit\n",
        )
        .await;

        assert_eq!(
            location.map(String::from),
            Some("http://counter.test/bill/O1/".to_string())
        );
        assert!(output.contains("Total amount:     110"));
        assert!(output.contains("! Paid amount (100) is less than total amount (110)."));
        assert!(output.contains("Bill generated: http://counter.test/bill/O1/"));
    }

    #[tokio::test]
    async fn test_bad_command_keeps_going() {
        let (location, output) = run_script("frobnicate\nremove 1\nquit\n").await;

        assert_eq!(location, None);
        assert!(output.contains("Unknown command 'frobnicate'"));
        assert!(output.contains("! At least one product is required."));
    }

    #[tokio::test]
    async fn test_end_of_input_leaves_without_bill() {
        let (location, output) = run_script("add\n").await;

        assert_eq!(location, None);
        assert!(output.contains(&format!("{:>3}  {:<16} {}\n", 2, "", 1)));
    }

    #[tokio::test]
    async fn test_unaddressable_bill_page_stops_loop() {
        let mut session = BillingSession::new(CounterBackend { addressable: false }, &[100, 50]);
        let script = "email a@b.com\ncode 1 P001\ncalc\ndenom 100 2\nbill\nshow\n";
        let mut output = Vec::new();

        let result = run_loop(&mut session, script.as_bytes(), &mut output).await;

        assert!(matches!(result, Err(AppError::Client(ClientError::InvalidUrl(_)))));
        assert_eq!(session.form().phase(), billing_core::FormPhase::Navigated);
    }
}
