#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use helpdesk_client_core::auth::{AuthFlowError, RegisterForm, register_error_message};
use helpdesk_client_core::config::DEFAULT_REQUEST_TIMEOUT_MS;
use helpdesk_client_core::models::CreateTicketRequest;
use helpdesk_client_core::native::{FileSessionStore, ReqwestTransport};
use helpdesk_client_core::{ApiClient, ApiError, ClientConfig, FilePart, TicketFilter};
use tracing_subscriber::EnvFilter;

mod output;

const SESSION_FILE_NAME: &str = "session.json";
const COOKIE_FILE_NAME: &str = "cookies";

type Client = ApiClient<ReqwestTransport, FileSessionStore>;

#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(about = "Support ticket client for the helpdesk API")]
pub struct HelpdeskCli {
    /// API base URL (defaults to HELPDESK_API_BASE_URL, then the local server)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Where the access token and user record are kept
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    pub timeout_ms: u64,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and store the session
    Register(RegisterArgs),
    /// Sign out and forget the stored session
    Logout,
    /// List your tickets
    Tickets {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// List your orders
    Orders,
    /// Show a ticket with its messages, attachments and activity
    Show { ticket_id: String },
    /// Open a new ticket
    Create {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        description: String,
        /// Related order id
        #[arg(long)]
        order: Option<String>,
        /// Files to attach after the ticket is created
        #[arg(long = "attach", value_name = "FILE")]
        attach: Vec<PathBuf>,
    },
    /// Add a message to a ticket
    Reply { ticket_id: String, message: String },
    /// Upload files to a ticket
    Attach {
        ticket_id: String,
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// Delete an attachment from a ticket
    Detach {
        ticket_id: String,
        attachment_id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    /// Prompted for (twice) when omitted
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long, requires = "password")]
    pub password_confirmation: Option<String>,
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();
    let cli = HelpdeskCli::parse();

    let config = match cli.base_url.as_deref() {
        Some(base_url) => ClientConfig::new(base_url)?,
        None => {
            let (config, source) = ClientConfig::from_env()?;
            tracing::debug!(base_url = %config.base_url, source, "resolved api base url");
            config
        }
    }
    .with_timeout_ms(cli.timeout_ms);

    let session_file = match cli.session_file {
        Some(path) => path,
        None => default_session_file()?,
    };
    let cookie_file = session_file.with_file_name(COOKIE_FILE_NAME);

    let transport = ReqwestTransport::new(&config)?;
    transport.load_cookies(&cookie_file)?;
    let client = ApiClient::new(&config, transport, FileSessionStore::new(&session_file));

    let result = execute(&client, cli.command).await;
    if let Err(error) = client.transport().save_cookies(&cookie_file) {
        tracing::warn!(error = %error, "failed to persist cookies");
    }
    result
}

async fn execute(client: &Client, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password: ")?,
            };
            match client.login(&email, &password).await {
                Ok(user) => {
                    println!("Login successful! Signed in as {}", user.display_name().unwrap_or(email.as_str()));
                    Ok(())
                }
                Err(AuthFlowError::Api(ApiError::Http { .. })) => bail!("Invalid email or password"),
                Err(error) => Err(error.into()),
            }
        }
        Commands::Register(args) => register(client, args).await,
        Commands::Logout => {
            client.logout().await;
            println!("Logged out successfully");
            Ok(())
        }
        Commands::Tickets { status, priority } => {
            let filter = TicketFilter { status, priority };
            let tickets = client.list_tickets(&filter).await.map_err(explain)?;
            print!("{}", output::ticket_list(&tickets));
            Ok(())
        }
        Commands::Orders => {
            let orders = client.list_orders().await.map_err(explain)?;
            print!("{}", output::order_list(&orders));
            Ok(())
        }
        Commands::Show { ticket_id } => {
            let detail = client
                .fetch_ticket_detail(&ticket_id)
                .await
                .map_err(explain)?;
            print!("{}", output::ticket_detail(&detail));
            Ok(())
        }
        Commands::Create {
            topic,
            description,
            order,
            attach,
        } => {
            let files = read_files(&attach)?;
            let request = CreateTicketRequest {
                topic,
                description,
                order: order.filter(|order| !order.trim().is_empty()),
            };
            let ticket = client.create_ticket(&request).await.map_err(explain)?;
            println!("Ticket created successfully! id={}", ticket.id);
            if !files.is_empty() {
                let report = client.upload_attachments(&ticket.id, files).await;
                print!("{}", output::upload_report(&report));
                if !report.all_succeeded() {
                    bail!("Some files failed to upload");
                }
            }
            Ok(())
        }
        Commands::Reply { ticket_id, message } => {
            if client
                .add_message(&ticket_id, &message)
                .await
                .map_err(explain)?
            {
                println!("Message sent successfully!");
                Ok(())
            } else {
                bail!("message must not be empty")
            }
        }
        Commands::Attach { ticket_id, files } => {
            let files = read_files(&files)?;
            let report = client.upload_attachments(&ticket_id, files).await;
            print!("{}", output::upload_report(&report));
            if report.all_succeeded() {
                println!("Files uploaded successfully!");
                Ok(())
            } else if report.succeeded() == 0 {
                bail!("Failed to upload files")
            } else {
                bail!("Some files failed to upload")
            }
        }
        Commands::Detach {
            ticket_id,
            attachment_id,
            yes,
        } => {
            if !yes && !confirm("Are you sure you want to delete this attachment? [y/N] ")? {
                println!("Cancelled");
                return Ok(());
            }
            client
                .delete_attachment(&ticket_id, &attachment_id)
                .await
                .map_err(explain)?;
            println!("Attachment deleted successfully!");
            Ok(())
        }
    }
}

async fn register(client: &Client, args: RegisterArgs) -> anyhow::Result<()> {
    let (password, password_confirmation) = match (args.password, args.password_confirmation) {
        (Some(password), Some(confirmation)) => (password, confirmation),
        (Some(password), None) => (password.clone(), password),
        (None, _) => (prompt("Password: ")?, prompt("Confirm password: ")?),
    };
    let form = RegisterForm {
        email: args.email,
        username: args.username.unwrap_or_default(),
        first_name: args.first_name,
        last_name: args.last_name,
        password,
        password_confirmation,
    };
    match client.register(form).await {
        Ok(user) => {
            println!(
                "Registration successful! Signed in as {}",
                user.display_name().unwrap_or("new user")
            );
            Ok(())
        }
        Err(AuthFlowError::Api(ApiError::Http { body, .. })) => {
            bail!("{}", register_error_message(&body))
        }
        Err(error) => Err(error.into()),
    }
}

fn explain(error: ApiError) -> anyhow::Error {
    match error {
        ApiError::AuthExpired => anyhow::anyhow!("Session expired. Run `helpdesk login` again."),
        ApiError::Network { message } => {
            anyhow::anyhow!("Network error. Please try again. ({message})")
        }
        other => other.into(),
    }
}

fn read_files(paths: &[PathBuf]) -> anyhow::Result<Vec<FilePart>> {
    paths.iter().map(|path| read_file(path)).collect()
}

fn read_file(path: &Path) -> anyhow::Result<FilePart> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    let content_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());
    Ok(FilePart::attachment(filename, content_type, bytes))
}

fn default_session_file() -> anyhow::Result<PathBuf> {
    let base = dirs::config_dir().context("no config directory for this platform; pass --session-file")?;
    Ok(base.join("helpdesk").join(SESSION_FILE_NAME))
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{label}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(label: &str) -> anyhow::Result<bool> {
    let answer = prompt(label)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use clap::error::ErrorKind;

    use super::{Commands, HelpdeskCli, read_file};

    #[test]
    fn cli_requires_subcommand() {
        let err = match HelpdeskCli::try_parse_from(["helpdesk"]) {
            Ok(_) => panic!("expected missing subcommand parse error"),
            Err(err) => err,
        };
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn create_collects_repeated_attachments() {
        let cli = HelpdeskCli::try_parse_from([
            "helpdesk",
            "create",
            "--topic",
            "Printer issue",
            "--description",
            "Won't power on",
            "--attach",
            "a.png",
            "--attach",
            "b.log",
        ])
        .expect("parse");
        match cli.command {
            Commands::Create { attach, order, .. } => {
                assert_eq!(attach.len(), 2);
                assert_eq!(order, None);
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn detach_defaults_to_confirmation() {
        let cli = HelpdeskCli::try_parse_from(["helpdesk", "detach", "t-1", "9"]).expect("parse");
        assert!(matches!(cli.command, Commands::Detach { yes: false, .. }));
        assert_eq!(cli.timeout_ms, helpdesk_client_core::config::DEFAULT_REQUEST_TIMEOUT_MS);
    }

    #[test]
    fn attach_requires_files() {
        let err = match HelpdeskCli::try_parse_from(["helpdesk", "attach", "t-1"]) {
            Ok(_) => panic!("expected missing files error"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn read_file_guesses_content_type() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("screenshot.png");
        std::fs::write(&path, [0_u8, 1, 2]).expect("write");
        let part = read_file(&path).expect("file part");
        assert_eq!(part.filename, "screenshot.png");
        assert_eq!(part.field, "file");
        assert_eq!(part.content_type.as_deref(), Some("image/png"));
        assert_eq!(part.bytes, vec![0, 1, 2]);
    }
}
