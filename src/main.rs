mod actions;
mod api;
mod cli_messages;
mod config;
mod consts;
mod credentials;
mod error_classifier;
mod events;
mod feedback;
mod lists;
mod logging;
mod profile;
mod session;
#[cfg(test)]
mod test_support;

use crate::actions::{BroadcastTarget, TaskDraft};
use crate::api::error::ApiResult;
use crate::config::{LocalStorage, get_storage_path};
use crate::credentials::{CredentialStore, Credentials, mask_token};
use crate::lists::resources::{Broadcasts, Tasks, Users, Withdrawals};
use crate::lists::{Filters, ListController, ReloadOutcome, Resource};
use crate::profile::{ApiProfile, BaseUrlSource};
use crate::session::render::{render_analytics, render_list, render_payouts, render_stats};
use crate::session::{SessionData, run_console, setup_session};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::error::Error;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store the API base URL and tokens. Fields not given are left untouched.
    Configure {
        /// Base URL of the console API, e.g. https://api.example.com
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Bearer token for the console API
        #[arg(long)]
        token: Option<String>,

        /// Bearer token for the legacy admin API
        #[arg(long)]
        legacy_token: Option<String>,
    },
    /// Show the stored configuration with tokens masked.
    ShowConfig,
    /// Clear stored credentials of one profile, or of both.
    Logout {
        /// `legacy` or `console`; both when omitted
        #[arg(long)]
        profile: Option<ApiProfile>,
    },
    /// Start the interactive console.
    Console,
    #[command(flatten)]
    Admin(AdminCommand),
}

/// One-shot commands that talk to the admin API.
#[derive(Subcommand)]
enum AdminCommand {
    /// Manage tasks.
    #[command(subcommand)]
    Tasks(TaskCommand),
    /// Manage users.
    #[command(subcommand)]
    Users(UserCommand),
    /// Review withdrawal requests.
    #[command(subcommand)]
    Withdrawals(WithdrawalCommand),
    /// Send and review broadcasts.
    #[command(subcommand)]
    Broadcasts(BroadcastCommand),
    /// Manage payout requests.
    #[command(subcommand)]
    Payouts(PayoutCommand),
    /// Show dashboard statistics.
    Stats,
    /// Show platform KPIs.
    Analytics,
}

#[derive(ClapArgs)]
struct TaskFields {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    reward: f64,
    /// Task category, e.g. social or survey
    #[arg(long = "type", value_name = "TYPE")]
    category: String,
    #[arg(long)]
    target_url: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    /// Create the task switched off
    #[arg(long)]
    inactive: bool,
}

impl From<TaskFields> for TaskDraft {
    fn from(fields: TaskFields) -> Self {
        TaskDraft {
            title: fields.title,
            description: fields.description,
            reward: fields.reward,
            category: fields.category,
            target_url: fields.target_url,
            image_url: fields.image_url,
            is_active: !fields.inactive,
        }
    }
}

#[derive(Subcommand)]
enum TaskCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Create(TaskFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Switch a task on or off.
    Toggle {
        id: String,
        #[arg(long, action = clap::ArgAction::Set, value_name = "true|false")]
        active: bool,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum UserCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Case-insensitive match on name or e-mail
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    SetStatus { id: String, status: String },
    /// Suspend a user through the console API.
    Suspend {
        id: String,
        /// Lift the suspension instead
        #[arg(long)]
        undo: bool,
    },
}

#[derive(Subcommand)]
enum WithdrawalCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        status: Option<String>,
    },
    Approve { id: String },
}

#[derive(Subcommand)]
enum BroadcastCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<String>,
    },
    /// Send an in-app notification.
    Send {
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        #[arg(long = "type", value_name = "TYPE", default_value = "system")]
        kind: String,
        /// Recipient; everyone when omitted
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Queue a broadcast e-mail through the console API.
    Email {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        to_all: bool,
    },
}

#[derive(Subcommand)]
enum PayoutCommand {
    List,
    Approve {
        id: String,
    },
    Reject {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logger();

    match run(Args::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Installs the log backend. Nothing is logged unless `RUST_LOG` asks for it,
/// since toasts already reach the terminal.
fn init_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "off".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Failed admin commands have already shown their error toast, so they only
/// turn into a failing exit code here.
async fn run(args: Args) -> Result<ExitCode, Box<dyn Error>> {
    let storage = LocalStorage::new(get_storage_path()?);
    match args.command {
        Command::Configure {
            base_url,
            token,
            legacy_token,
        } => configure(&storage, base_url, token, legacy_token)?,
        Command::ShowConfig => show_config(&storage)?,
        Command::Logout { profile } => logout(&storage, profile)?,
        Command::Console => run_console(setup_session(storage)?).await?,
        Command::Admin(command) => {
            let mut session = setup_session(storage)?;
            let result = run_command(&session, command).await;
            session.flush_feedback();
            if result.is_err() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn configure(
    storage: &LocalStorage,
    base_url: Option<String>,
    token: Option<String>,
    legacy_token: Option<String>,
) -> Result<(), Box<dyn Error>> {
    if base_url.is_none() && token.is_none() && legacy_token.is_none() {
        crate::print_cmd_warn!(
            "Nothing to configure",
            "pass --base-url, --token or --legacy-token"
        );
        return Ok(());
    }

    let update = Credentials {
        base_url: base_url.map(|url| url.trim().trim_end_matches('/').to_string()),
        token,
    };
    CredentialStore::new(storage.clone(), ApiProfile::Console).set(&update)?;
    if let Some(token) = legacy_token {
        CredentialStore::new(storage.clone(), ApiProfile::Legacy)
            .set(&Credentials::default().with_token(token))?;
    }

    crate::print_cmd_success!("API configured", "{}", storage.path().display());
    Ok(())
}

fn show_config(storage: &LocalStorage) -> Result<(), Box<dyn Error>> {
    for profile in ApiProfile::ALL {
        let credentials = CredentialStore::new(storage.clone(), profile).get()?;
        let base_url = match profile.base_url_source() {
            BaseUrlSource::Fixed(url) => format!("{} (fixed)", url),
            BaseUrlSource::Stored(_) => credentials
                .base_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| "(not configured)".to_string()),
        };
        let token = credentials
            .bearer_token()
            .map(mask_token)
            .unwrap_or_else(|| "(not set)".to_string());
        crate::print_cmd_info!(
            &format!("{} API", profile),
            "base URL: {}, token: {}",
            base_url,
            token
        );
    }
    Ok(())
}

fn logout(storage: &LocalStorage, profile: Option<ApiProfile>) -> Result<(), Box<dyn Error>> {
    match profile {
        Some(profile) => {
            CredentialStore::new(storage.clone(), profile).clear()?;
            crate::print_cmd_success!("Logged out", "{} API credentials cleared", profile);
        }
        None => {
            storage.clear()?;
            crate::print_cmd_success!("Logged out", "all stored credentials cleared");
        }
    }
    Ok(())
}

fn filters(pairs: Vec<(&str, Option<String>)>) -> Filters {
    pairs
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name.to_string(), value)))
        .collect()
}

/// Loads one page of a list and prints it.
async fn show_list<R: Resource>(
    controller: &ListController<R>,
    page: u32,
    filters: Filters,
) -> ApiResult<()> {
    controller.set_view(page, filters).await;
    match controller.reload().await {
        ReloadOutcome::Failed(error) => Err(error),
        _ => {
            println!("{}", render_list::<R>(&controller.state().await));
            Ok(())
        }
    }
}

async fn run_command(session: &SessionData, command: AdminCommand) -> ApiResult<()> {
    let lists = &session.lists;
    let actions = &session.actions;
    match command {
        AdminCommand::Tasks(TaskCommand::List {
            page,
            category,
            active,
        }) => {
            let filters = filters(vec![
                ("category", category),
                ("active", active.map(|active| active.to_string())),
            ]);
            show_list::<Tasks>(&lists.tasks, page, filters).await
        }
        AdminCommand::Tasks(TaskCommand::Create(fields)) => {
            actions.create_task(&fields.into()).await
        }
        AdminCommand::Tasks(TaskCommand::Update { id, fields }) => {
            actions.update_task(&id, &fields.into()).await
        }
        AdminCommand::Tasks(TaskCommand::Toggle { id, active }) => {
            actions.toggle_task(&id, active).await
        }
        AdminCommand::Tasks(TaskCommand::Delete { id }) => actions.delete_task(&id).await,

        AdminCommand::Users(UserCommand::List {
            page,
            search,
            status,
        }) => {
            let filters = filters(vec![("search", search), ("status", status)]);
            show_list::<Users>(&lists.users, page, filters).await
        }
        AdminCommand::Users(UserCommand::SetStatus { id, status }) => {
            actions.set_user_status(&id, &status).await
        }
        AdminCommand::Users(UserCommand::Suspend { id, undo }) => {
            actions.suspend_user(&id, !undo).await
        }

        AdminCommand::Withdrawals(WithdrawalCommand::List { page, status }) => {
            let filters = filters(vec![("status", status)]);
            show_list::<Withdrawals>(&lists.withdrawals, page, filters).await
        }
        AdminCommand::Withdrawals(WithdrawalCommand::Approve { id }) => {
            actions.approve_withdrawal(&id).await
        }

        AdminCommand::Broadcasts(BroadcastCommand::List { page, kind }) => {
            let filters = filters(vec![("type", kind)]);
            show_list::<Broadcasts>(&lists.broadcasts, page, filters).await
        }
        AdminCommand::Broadcasts(BroadcastCommand::Send {
            title,
            message,
            kind,
            user_id,
        }) => {
            let target = user_id.map_or(BroadcastTarget::AllUsers, BroadcastTarget::User);
            actions
                .send_broadcast(&title, &message, &kind, &target)
                .await
        }
        AdminCommand::Broadcasts(BroadcastCommand::Email {
            subject,
            body,
            to_all,
        }) => actions.send_email(&subject, &body, to_all).await,

        AdminCommand::Payouts(PayoutCommand::List) => {
            let payouts = actions.list_payouts().await?;
            println!("{}", render_payouts(&payouts));
            Ok(())
        }
        AdminCommand::Payouts(PayoutCommand::Approve { id }) => {
            actions.approve_payout(&id).await
        }
        AdminCommand::Payouts(PayoutCommand::Reject { id, reason }) => {
            actions.reject_payout(&id, reason.as_deref()).await
        }

        AdminCommand::Stats => {
            let stats = actions.load_stats().await?;
            println!("{}", render_stats(&stats));
            Ok(())
        }
        AdminCommand::Analytics => {
            let analytics = actions.load_analytics().await?;
            println!("{}", render_analytics(&analytics));
            Ok(())
        }
    }
}
