use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carelytics_core::{
    render, ClientConfig, FieldId, FormFields, FormState, JsonFilePreferences, TerminalController,
    ThemeToggle,
};

#[derive(Parser)]
#[command(name = "carelytics-cli")]
#[command(about = "Carelytics patient table, one action per invocation")]
struct Cli {
    /// Patient server base URL (overrides CARELYTICS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Preference file (overrides CARELYTICS_PREFERENCES)
    #[arg(long, global = true)]
    preferences: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Raw form input; validation happens in the controller, exactly as for the page.
#[derive(Args, Default)]
struct PatientFields {
    /// Patient name
    #[arg(long)]
    name: Option<String>,
    /// City
    #[arg(long)]
    city: Option<String>,
    /// Age in years
    #[arg(long)]
    age: Option<String>,
    /// Gender
    #[arg(long)]
    gender: Option<String>,
    /// Height
    #[arg(long)]
    height: Option<String>,
    /// Weight
    #[arg(long)]
    weight: Option<String>,
}

impl PatientFields {
    fn into_form(self, id: Option<String>) -> FormState {
        let mut form = FormState::new();
        let values = [
            (FieldId::Pid, id),
            (FieldId::Name, self.name),
            (FieldId::City, self.city),
            (FieldId::Age, self.age),
            (FieldId::Gender, self.gender),
            (FieldId::Height, self.height),
            (FieldId::Weight, self.weight),
        ];
        for (field, value) in values {
            form.set_value(field, value.unwrap_or_default());
        }
        form
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Show one patient as the edit form would hold it
    Show {
        /// Patient ID
        id: String,
    },
    /// Create a patient (every field is required)
    Add {
        /// Patient ID
        #[arg(long)]
        id: Option<String>,
        #[command(flatten)]
        fields: PatientFields,
    },
    /// Edit the given fields of a patient
    Update {
        /// Patient ID
        id: String,
        #[command(flatten)]
        fields: PatientFields,
    },
    /// Delete a patient
    Delete {
        /// Patient ID
        id: String,
    },
    /// Show the stored theme, or toggle it
    Theme {
        /// Flip between light and dark and save
        #[arg(long)]
        toggle: bool,
    },
    /// Print the patient page as HTML
    Html,
}

fn print_alerts(controller: &mut TerminalController) -> bool {
    let alerts = controller.page_mut().notifier.drain();
    for alert in &alerts {
        eprintln!("Error: {}", alert);
    }
    !alerts.is_empty()
}

fn print_form(form: &FormState) {
    for field in FieldId::ALL {
        println!("{:<7} {}", field.element_id(), form.value(field));
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carelytics=warn".parse()?),
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

    let Some(command) = cli.command else {
        println!("Use 'carelytics-cli --help' for commands");
        return Ok(ExitCode::SUCCESS);
    };

    let mut controller = carelytics_core::terminal_controller(&config)?;

    let ok = match command {
        Commands::List => match controller.load_patients().await {
            Ok(_) => {
                print!("{}", controller.page().table.to_text());
                true
            }
            Err(e) => {
                eprintln!("Error listing patients: {}", e);
                false
            }
        },
        Commands::Show { id } => {
            let shown = match controller.load_patients().await {
                Ok(_) => controller.select_row(&id).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            match shown {
                Ok(()) => {
                    print_form(&controller.page().form);
                    true
                }
                Err(e) => {
                    eprintln!("Error showing patient {}: {}", id, e);
                    false
                }
            }
        }
        Commands::Add { id, fields } => {
            controller.page_mut().form = fields.into_form(id);
            let result = controller.add_patient().await;
            let alerted = print_alerts(&mut controller);
            if result.is_ok() {
                print!("{}", controller.page().table.to_text());
            } else if !alerted {
                // Created, but the reload failed.
                eprintln!("Patient created; could not reload the table");
            }
            result.is_ok()
        }
        Commands::Update { id, fields } => {
            controller.page_mut().form = fields.into_form(Some(id));
            let result = controller.update_patient().await;
            let alerted = print_alerts(&mut controller);
            if result.is_ok() {
                print!("{}", controller.page().table.to_text());
            } else if !alerted {
                eprintln!("Patient updated; could not reload the table");
            }
            result.is_ok()
        }
        Commands::Delete { id } => match controller.delete_patient(&id).await {
            Ok(status) => {
                println!("Delete {}: HTTP {}", id, status);
                print!("{}", controller.page().table.to_text());
                true
            }
            Err(e) => {
                eprintln!("Error deleting patient {}: {}", id, e);
                false
            }
        },
        Commands::Theme { toggle } => {
            let mut theme = ThemeToggle::init(JsonFilePreferences::new(config.preferences_path()));
            if toggle {
                if let Err(e) = theme.toggle() {
                    eprintln!("Error saving theme: {}", e);
                    return Ok(ExitCode::FAILURE);
                }
            }
            println!("{}", theme.applied());
            true
        }
        Commands::Html => {
            let theme = ThemeToggle::init(JsonFilePreferences::new(config.preferences_path()));
            if let Err(e) = controller.load_patients().await {
                eprintln!("Error listing patients: {}", e);
            }
            let page = controller.page();
            print!(
                "{}",
                render::page_document(page.table.rows(), &page.form, theme.applied())
            );
            true
        }
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
