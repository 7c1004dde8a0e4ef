use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, Text};
use log::{error, info};
use weather_notify_core::{
    Config, Notifier, RunError, RunOptions, RunReport,
    config::ENV_VARS,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-notify", version, about = "Send today's weather to WhatsApp")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the weather and send it (default).
    Send {
        /// City to report on; overrides CITY and the config file.
        #[arg(long)]
        city: Option<String>,

        /// Print the message instead of sending it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Interactively write the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        let command = self.command.unwrap_or(Command::Send {
            city: None,
            dry_run: false,
        });
        match command {
            Command::Send { city, dry_run } => send(RunOptions { city, dry_run }).await,
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

async fn send(options: RunOptions) -> Result<ExitCode> {
    info!("Loading configuration...");
    let config = Config::load()?;

    let outcome = match Notifier::from_config(&config) {
        Ok(notifier) => notifier.run(&config, &options).await,
        Err(err) => Err(err),
    };

    if let Ok(report) = &outcome {
        if options.dry_run {
            println!("{}", report.message);
        }
    }
    Ok(exit_code(&outcome))
}

/// Report a failed run and map it to the process exit status.
fn exit_code(outcome: &Result<RunReport, RunError>) -> ExitCode {
    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(RunError::Config(err)) => {
            error!("Error: {err}");
            error!(
                "Hint: run `weather-notify configure` or set the missing environment variables."
            );
            ExitCode::FAILURE
        }
        Err(RunError::Weather(err)) => {
            error!("Error: {err}");
            ExitCode::FAILURE
        }
        Err(RunError::Delivery { message, .. }) => {
            // Already logged by the pipeline; keep the composed text visible.
            if !message.is_empty() {
                info!("Undelivered message:\n{message}");
            }
            ExitCode::FAILURE
        }
    }
}

fn configure() -> Result<()> {
    println!("WhatsApp Weather Notification - Setup");
    println!("--------------------------------------");

    let current = Config::load_file()?;
    let mut cfg = Config {
        twilio_account_sid: Some(ask("Twilio Account SID:", &current.twilio_account_sid)?),
        twilio_auth_token: Some(
            Password::new("Twilio Auth Token:")
                .without_confirmation()
                .prompt()?,
        ),
        ..Config::default()
    };

    let use_service = Confirm::new("Use a Twilio Messaging Service for a custom business name?")
        .with_default(current.twilio_messaging_sid.is_some())
        .prompt()?;

    if use_service {
        cfg.twilio_messaging_sid = Some(ask(
            "Messaging Service SID:",
            &current.twilio_messaging_sid,
        )?);
        println!();
        println!("To customize the business name shown in WhatsApp:");
        println!("1. Open Twilio Console -> Messaging -> Services");
        println!("2. Select the Messaging Service");
        println!("3. Add your WhatsApp number to its Sender Pool");
        println!("4. Set the business name and logo on the WhatsApp profile");
    } else {
        cfg.twilio_from_number = Some(ask(
            "Twilio WhatsApp number (without 'whatsapp:'):",
            &current.twilio_from_number,
        )?);
    }

    cfg.to_whatsapp_number = Some(ask(
        "WhatsApp number to receive messages (e.g. +1234567890):",
        &current.to_whatsapp_number,
    )?);
    cfg.openweather_api_key = Some(ask("OpenWeatherMap API key:", &current.openweather_api_key)?);

    let city = ask("City (leave empty to detect by IP):", &current.city)?;
    cfg.city = Some(city).filter(|c| !c.trim().is_empty());

    let path = cfg.save()?;
    println!();
    println!("Configuration saved to {}", path.display());
    println!();
    println!("For CI scheduling, provide these as secrets/environment variables:");
    for name in ENV_VARS {
        println!("  - {name}");
    }

    Ok(())
}

fn ask(prompt: &str, current: &Option<String>) -> Result<String> {
    let mut text = Text::new(prompt);
    if let Some(value) = current.as_deref() {
        text = text.with_default(value);
    }
    Ok(text.prompt()?.trim().to_string())
}
