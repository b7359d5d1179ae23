//! Line-oriented stand-in for the patient page.
//!
//! Each input line is one user action. Form contents survive between actions, so a row can be
//! selected, edited field by field and then submitted, as on the page.

use carelytics_api::PatientApi;
use carelytics_core::{
    render, AlertLog, FieldId, FormFields, FormState, PatientTableController, PreferenceStore,
    RenderedTable, ThemeToggle,
};

pub type PageController<A> = PatientTableController<A, RenderedTable, FormState, AlertLog>;

pub const HELP: &str = "\
commands:
  list                 reload the table from the server
  select <id>          copy a row into the form
  set <field> <value>  type into a form field (pid, name, city, age, gender, height, weight)
  clear                empty the form
  form                 show the form
  add                  create a patient from the form
  update               send the filled-in fields as an edit
  delete <id>          delete a patient
  theme                toggle light/dark
  html                 print the page as HTML
  help                 show this message
  quit                 leave";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    List,
    Select(String),
    Set(FieldId, String),
    Clear,
    ShowForm,
    Add,
    Update,
    Delete(String),
    Theme,
    Html,
    Help,
    Quit,
}

impl std::str::FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let argument = |name: &str| {
            if rest.is_empty() {
                Err(format!("usage: {word} <{name}>"))
            } else {
                Ok(rest.to_string())
            }
        };

        match word {
            "list" | "reload" => Ok(Command::List),
            "select" => argument("id").map(Command::Select),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err("usage: set <field> <value>".into());
                }
                Ok(Command::Set(field.parse()?, value.trim().to_string()))
            }
            "clear" => Ok(Command::Clear),
            "form" => Ok(Command::ShowForm),
            "add" => Ok(Command::Add),
            "update" => Ok(Command::Update),
            "delete" => argument("id").map(Command::Delete),
            "theme" => Ok(Command::Theme),
            "html" => Ok(Command::Html),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err("empty command".into()),
            other => Err(format!("unknown command: {other} (try 'help')")),
        }
    }
}

/// Text to show after an action, and whether the session should end.
#[derive(Debug, Default)]
pub struct Reply {
    pub output: String,
    pub quit: bool,
}

impl Reply {
    fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

pub struct Session<A, S> {
    controller: PageController<A>,
    theme: ThemeToggle<S>,
    /// Whether any listing has been received yet.
    loaded: bool,
}

impl<A: PatientApi, S: PreferenceStore> Session<A, S> {
    pub fn new(controller: PageController<A>, theme: ThemeToggle<S>) -> Self {
        Self {
            controller,
            theme,
            loaded: false,
        }
    }

    /// What the page shows before the first action: the loaded table.
    pub async fn start(&mut self) -> Reply {
        tracing::info!("{} theme applied", self.theme.applied());
        self.execute(Command::List).await
    }

    pub async fn execute(&mut self, command: Command) -> Reply {
        let mut reply = match command {
            Command::List => {
                // Load failures are only logged; the previous table stays on screen.
                let loaded = self.controller.load_patients().await.is_ok();
                self.table_after(loaded)
            }
            Command::Select(id) => match self.controller.select_row(&id) {
                Ok(()) => self.form(),
                Err(e) => Reply::text(e.to_string()),
            },
            Command::Set(field, value) => {
                self.controller.page_mut().form.set_value(field, value);
                Reply::default()
            }
            Command::Clear => {
                self.controller.page_mut().form.clear();
                Reply::default()
            }
            Command::ShowForm => self.form(),
            Command::Add => {
                let loaded = self.controller.add_patient().await.is_ok();
                self.table_after(loaded)
            }
            Command::Update => {
                let loaded = self.controller.update_patient().await.is_ok();
                self.table_after(loaded)
            }
            Command::Delete(id) => {
                let loaded = self.controller.delete_patient(&id).await.is_ok();
                self.table_after(loaded)
            }
            Command::Theme => match self.theme.toggle() {
                Ok(theme) => Reply::text(format!("theme: {theme}")),
                Err(e) => Reply::text(format!("theme: {} (not saved: {e})", self.theme.applied())),
            },
            Command::Html => {
                let page = self.controller.page();
                Reply::text(render::page_document(
                    page.table.rows(),
                    &page.form,
                    self.theme.applied(),
                ))
            }
            Command::Help => Reply::text(HELP),
            Command::Quit => Reply {
                output: String::new(),
                quit: true,
            },
        };

        let alerts = self.controller.page_mut().notifier.drain();
        if !alerts.is_empty() {
            let mut shown: String = alerts.iter().map(|a| format!("! {a}\n")).collect();
            shown.push_str(&reply.output);
            reply.output = shown;
        }
        reply
    }

    /// The table as last received. Nothing is shown until a listing has arrived, so an
    /// unreachable server does not read as an empty one.
    fn table_after(&mut self, loaded: bool) -> Reply {
        self.loaded |= loaded;
        if !self.loaded {
            return Reply::default();
        }
        Reply::text(self.controller.page().table.to_text())
    }

    fn form(&self) -> Reply {
        let form = &self.controller.page().form;
        let lines: Vec<String> = FieldId::ALL
            .into_iter()
            .map(|field| format!("{:<7} {}", field.element_id(), form.value(field)))
            .collect();
        Reply::text(lines.join("\n"))
    }
}
