//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use pureextracts_shared::{
    AppConfig, ContactForm, ContactRecord, WebhookEndpoints, init_config, load_config,
};
use pureextracts_storage::Storage;
use pureextracts_webhook::WebhookClient;
use serde_json::Value;
use tracing::{info, warn};

use crate::products::{self, ProductAction, StorageTarget};

/// Shown when the chat workflow cannot be reached.
const CHAT_TROUBLE: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again in a moment.";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Pure Extracts: catalog administration and website workflows.
#[derive(Parser)]
#[command(
    name = "pureextracts",
    version,
    about = "Manage the Pure Extracts product catalog and talk to the website workflows.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Catalog database path (overrides `storage.database_path`).
    #[arg(long, global = true, env = "PUREEXTRACTS_DB")]
    pub db: Option<PathBuf>,

    /// Keep the catalog in memory for this invocation only.
    #[arg(long, global = true, conflicts_with = "db")]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Manage catalog products.
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },

    /// Check a product description against the built-in rule table.
    Lint {
        /// Text to check (reads --file when omitted).
        text: Option<String>,

        /// Read the text from a file.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print the corrected text instead of the suggestions.
        #[arg(long)]
        apply: bool,

        /// Emit suggestions as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Send a message to the chat assistant.
    Chat {
        /// Message words (joined with spaces).
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Submit the contact / feedback form, or list recorded submissions.
    Contact {
        /// Show submissions recorded in the local database.
        #[arg(long, conflicts_with_all = ["name", "email", "phone", "message"])]
        list: bool,

        /// Maximum number of submissions to show with --list.
        #[arg(long, default_value_t = 20)]
        limit: u32,

        #[arg(long, required_unless_present = "list")]
        name: Option<String>,

        #[arg(long, required_unless_present = "list")]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long, required_unless_present = "list")]
        message: Option<String>,
    },

    /// Correct a product description with the remote grammar workflow.
    Grammar {
        /// Text to correct (reads --file when omitted).
        text: Option<String>,

        /// Read the text from a file.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so that
/// command output on stdout stays machine-readable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pureextracts=info",
        1 => "pureextracts=debug",
        _ => "pureextracts=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = load_config()?;

    match cli.command {
        Command::Products { action } => {
            let target = StorageTarget::resolve(&config, cli.db, cli.memory)?;
            products::run(&config, target, action).await
        }
        Command::Lint {
            text,
            file,
            apply,
            json,
        } => cmd_lint(&read_input(text, file.as_deref())?, apply, json),
        Command::Chat { message } => cmd_chat(&config, &message.join(" ")).await,
        Command::Contact {
            list,
            limit,
            name,
            email,
            phone,
            message,
        } => {
            let target = StorageTarget::resolve(&config, cli.db, cli.memory)?;
            if list {
                return cmd_contact_list(&target, limit).await;
            }
            let form = ContactForm {
                name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
                phone_number: phone.unwrap_or_default(),
                message: message.unwrap_or_default(),
            };
            cmd_contact(&config, &target, &form).await
        }
        Command::Grammar { text, file } => {
            cmd_grammar(&config, &read_input(text, file.as_deref())?).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

/// Positional text, or the contents of `--file`.
fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("cannot read '{}'", path.display())),
        (None, None) => Err(eyre!("provide the text as an argument or with --file")),
    }
}

// ---------------------------------------------------------------------------
// Lint
// ---------------------------------------------------------------------------

fn cmd_lint(text: &str, apply: bool, json: bool) -> Result<()> {
    if apply {
        let (fixed, count) = pureextracts_linter::apply_all(text)?;
        info!(applied = count, "lint suggestions applied");
        println!("{fixed}");
        return Ok(());
    }

    let suggestions = pureextracts_linter::check(text);
    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("Looks good!");
        return Ok(());
    }

    println!("Grammar & style suggestions:");
    for s in &suggestions {
        println!(
            "  {:>4}..{:<4} replace \"{}\" with \"{}\"  [{}]",
            s.range.start, s.range.end, s.text, s.suggestion, s.kind
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Webhook commands
// ---------------------------------------------------------------------------

fn webhook_client(config: &AppConfig) -> Result<WebhookClient> {
    let endpoints = WebhookEndpoints::try_from(&config.webhooks)?;
    Ok(WebhookClient::new(endpoints)?)
}

async fn cmd_chat(config: &AppConfig, message: &str) -> Result<()> {
    let client = webhook_client(config)?;
    let spinner = Spinner::start("Waiting for the assistant…");
    let result = client.chat(message).await;
    spinner.finish();

    match result {
        Ok(reply) => {
            println!("{}", reply.text);
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "chat request failed");
            Err(e).wrap_err(CHAT_TROUBLE)
        }
    }
}

async fn cmd_contact(config: &AppConfig, target: &StorageTarget, form: &ContactForm) -> Result<()> {
    let client = webhook_client(config)?;
    let spinner = Spinner::start("Sending your message…");
    let result = client.submit_contact(form).await;
    spinner.finish();

    let response = result
        .wrap_err("Sorry, there was an error sending your message. Please try again.")?;
    info!(%response, "contact workflow answered");
    println!("Thank you! Your message has been sent successfully.");

    // Recording failures are logged, not returned.
    if let StorageTarget::Database(path) = target {
        if let Err(e) = record_contact(path, form, &response).await {
            warn!(error = %e, "contact was sent but could not be recorded locally");
        }
    }
    Ok(())
}

async fn record_contact(path: &Path, form: &ContactForm, response: &Value) -> Result<()> {
    let raw = match response {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    let storage = Storage::open(path).await?;
    let record = storage.save_contact(form, Some(&raw)).await?;
    info!(id = record.id, "contact recorded");
    Ok(())
}

async fn cmd_contact_list(target: &StorageTarget, limit: u32) -> Result<()> {
    let contacts = match target {
        StorageTarget::Database(path) if path.exists() => {
            Storage::open_readonly(path).await?.list_contacts(limit).await?
        }
        _ => Vec::new(),
    };
    print_contacts(&contacts);
    Ok(())
}

fn print_contacts(contacts: &[ContactRecord]) {
    if contacts.is_empty() {
        println!("No contact submissions recorded.");
        return;
    }
    for c in contacts {
        println!(
            "#{} {} {} <{}>{}",
            c.id,
            c.submitted_at,
            c.form.name,
            c.form.email,
            if c.form.phone_number.is_empty() {
                String::new()
            } else {
                format!(" {}", c.form.phone_number)
            }
        );
        println!("    {}", c.form.message.replace('\n', "\n    "));
    }
}

async fn cmd_grammar(config: &AppConfig, text: &str) -> Result<()> {
    let client = webhook_client(config)?;
    let spinner = Spinner::start("Checking grammar…");
    let result = client.check_grammar(text).await;
    spinner.finish();

    let corrected = result.wrap_err("Failed to check grammar. Please try again.")?;
    println!("{corrected}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Spinner
// ---------------------------------------------------------------------------

/// Stderr spinner shown while a webhook request is in flight.
struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            bar.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }

    fn finish(self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_product_add() {
        let cli = Cli::try_parse_from([
            "pureextracts",
            "--memory",
            "products",
            "add",
            "--name",
            "Vanilla Extract",
            "--category",
            "Flavor Extract",
            "--description",
            "Bourbon vanilla",
            "--applications",
            "Food & Beverage, Cosmetics",
            "--purity",
            "97%",
            "--price",
            "349",
        ])
        .expect("parse");
        assert!(cli.memory);
        assert!(matches!(
            cli.command,
            Command::Products {
                action: ProductAction::Add(_)
            }
        ));
    }

    #[test]
    fn memory_conflicts_with_db() {
        let result = Cli::try_parse_from([
            "pureextracts",
            "--memory",
            "--db",
            "/tmp/x.db",
            "products",
            "list",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn read_input_prefers_argument() {
        assert_eq!(read_input(Some("abc".into()), None).unwrap(), "abc");
        assert!(read_input(None, None).is_err());
    }

    #[test]
    fn contact_list_needs_no_fields() {
        let cli = Cli::try_parse_from(["pureextracts", "contact", "--list", "--limit", "5"]).unwrap();
        match cli.command {
            Command::Contact {
                list, limit, name, ..
            } => {
                assert!(list);
                assert_eq!(limit, 5);
                assert!(name.is_none());
            }
            _ => panic!("expected contact"),
        }

        assert!(Cli::try_parse_from(["pureextracts", "contact", "--name", "Asha"]).is_err());
        assert!(
            Cli::try_parse_from(["pureextracts", "contact", "--list", "--name", "Asha"]).is_err()
        );
    }

    #[tokio::test]
    async fn submitted_contact_is_recorded() {
        let path = std::env::temp_dir().join(format!(
            "pureextracts_cli_contacts_{}.db",
            uuid::Uuid::now_v7()
        ));
        let form = ContactForm {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone_number: String::new(),
            message: "Sample request".into(),
        };
        record_contact(&path, &form, &serde_json::json!({"received": true}))
            .await
            .unwrap();
        record_contact(&path, &form, &Value::String("Workflow was started".into()))
            .await
            .unwrap();

        let stored = Storage::open_readonly(&path)
            .await
            .unwrap()
            .list_contacts(10)
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].response.as_deref(), Some("Workflow was started"));
        assert_eq!(stored[1].response.as_deref(), Some(r#"{"received":true}"#));
        assert_eq!(stored[1].form, form);
    }

    #[test]
    fn chat_joins_words() {
        let cli = Cli::try_parse_from(["pureextracts", "chat", "hello", "there"]).unwrap();
        match cli.command {
            Command::Chat { message } => assert_eq!(message.join(" "), "hello there"),
            _ => panic!("expected chat"),
        }
    }
}
