//! acs-messages CLI entry point.
//!
//! Provides `demo` (text, button, and list sample sends) and `text` (one
//! plain message) subcommands.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use acs_messages::config::AppConfig;
use acs_messages::logging::{self, LogFormat};
use acs_messages::samples;
use acs_messages::whatsapp::{ApiResponse, ChannelAddress, MessageSender, SendError};

/// Send WhatsApp messages through Azure Communication Services.
#[derive(Parser)]
#[command(name = "acs-messages", version, about)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,

    /// Path to the TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sender address, overrides config (`whatsapp:+<number>`).
    #[arg(long, global = true)]
    from: Option<String>,

    /// Recipient address, overrides config (`whatsapp:+<number>`).
    #[arg(long, global = true)]
    to: Option<String>,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Send the sample text, button, and list messages in order.
    Demo,
    /// Send one plain text message.
    Text {
        /// Message text, sent verbatim.
        message: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    // `.env` may set RUST_LOG, so it is read before the subscriber.
    let dotenv = dotenvy::dotenv();
    logging::init(cli.log_format);
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "failed to load .env"),
    }

    println!("Azure Communication Services - Advanced Messages quickstart samples.");

    let code = match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    };

    wait_for_acknowledgement();
    code
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(from) = cli.from {
        config.whatsapp.from = from;
    }
    if let Some(to) = cli.to {
        config.whatsapp.to = to;
    }
    debug!(?config, "configuration resolved");

    let sender = MessageSender::new(config.sender_config()?)
        .context("failed to configure HTTP client")?;
    let from = config.from_address();
    let to = config.to_address();

    match cli.command {
        Command::Demo => run_demo(&sender, &from, &to).await,
        Command::Text { message } => {
            println!("Sending text message...");
            let response = sender.send_text(&from, &to, &message).await?;
            print_response("Text message", &response);
            Ok(())
        }
    }
}

/// Send the three sample messages; the first failure stops the rest.
async fn run_demo(
    sender: &MessageSender,
    from: &ChannelAddress,
    to: &ChannelAddress,
) -> anyhow::Result<()> {
    println!("Sending simple text message...");
    let response = sender.send_text(from, to, samples::TEXT_MESSAGE).await?;
    print_response("Message", &response);

    println!("Sending interactive button message...");
    let response = sender
        .send_button_message(
            from,
            to,
            samples::BUTTON_HEADER,
            samples::BUTTON_BODY,
            &samples::reply_buttons(),
        )
        .await?;
    print_response("Interactive button message", &response);

    println!("Sending interactive list message...");
    let response = sender
        .send_list_message(
            from,
            to,
            samples::LIST_HEADER,
            samples::LIST_BODY,
            samples::LIST_BUTTON_LABEL,
            &samples::list_sections(),
        )
        .await?;
    print_response("Interactive list message", &response);

    println!("Messages sent successfully!");
    Ok(())
}

fn print_response(label: &str, response: &ApiResponse) {
    println!("{label} sent. Status code: {}", response.status);
    println!("Response: {}", response.body);
}

fn report_error(err: &anyhow::Error) {
    let on_the_wire = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<SendError>())
        .any(SendError::is_transport);
    if on_the_wire {
        println!("HTTP error while sending messages: {err:#}");
    } else {
        println!("Unexpected error: {err:#}");
    }
}

/// Keep the console open until the user presses Enter, when interactive.
fn wait_for_acknowledgement() {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return;
    }
    println!("Press Enter to exit...");
    let mut line = String::new();
    if let Err(e) = stdin.lock().read_line(&mut line) {
        debug!(error = %e, "failed to read acknowledgement");
    }
}
