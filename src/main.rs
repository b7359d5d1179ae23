use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carelytics_core::{ClientConfig, JsonFilePreferences, ThemeToggle};

mod session;

use session::{Command, Session};

#[derive(Parser)]
#[command(name = "carelytics")]
#[command(about = "Interactive Carelytics patient table")]
struct Cli {
    /// Patient server base URL (overrides CARELYTICS_API_URL)
    #[arg(long)]
    api_url: Option<String>,
    /// Preference file (overrides CARELYTICS_PREFERENCES)
    #[arg(long)]
    preferences: Option<String>,
}

/// Main entry point for the interactive patient table
///
/// Loads the table once at startup, applies the stored theme, then executes one action per
/// line read from stdin until `quit` or end of input.
///
/// # Environment Variables
/// - `CARELYTICS_API_URL`: Patient server base URL (default: "http://127.0.0.1:8000")
/// - `CARELYTICS_PREFERENCES`: Preference file (default: ".carelytics/preferences.json")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid, or
/// - stdin cannot be read.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carelytics=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_values(
        cli.api_url
            .or_else(|| std::env::var("CARELYTICS_API_URL").ok()),
        cli.preferences
            .or_else(|| std::env::var("CARELYTICS_PREFERENCES").ok()),
    )?;

    tracing::info!("++ Starting Carelytics against {}", config.api_base_url());

    let controller = carelytics_core::terminal_controller(&config)?;
    let theme = ThemeToggle::init(JsonFilePreferences::new(config.preferences_path()));
    let mut session = Session::new(controller, theme);

    print!("{}", session.start().await.output);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let reply = session.execute(command).await;
        if !reply.output.is_empty() {
            println!("{}", reply.output.trim_end());
        }
        if reply.quit {
            break;
        }
    }

    Ok(())
}
