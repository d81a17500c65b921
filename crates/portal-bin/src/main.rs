use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use cpec_common::RegisterRequest;
use portal_lib::{
    auth::{AuthService, RegisterOutcome},
    config::Settings,
    error::Operation,
    resources::{
        load_dashboard, load_home_summary, user_counts, EventFilter, EventShow, ListFilter,
        ProgramFilter, ProgramShow, UserFilter,
    },
    routes::{Navigation, Navigator, Route},
    view::{track, ViewSlot, ViewState},
    Portal,
};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portal", about = "Command-line client for the CPEC community portal")]
struct Cli {
    /// TOML config file (defaults to portal.toml / portal.json / PORTAL_* env)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in. Without --remember the session ends with this process.
    Login {
        username: String,
        #[arg(long, env = "CPEC_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        remember: bool,
    },
    /// Create an account and sign in
    Register {
        username: String,
        email: String,
        #[arg(long, env = "CPEC_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm_password: Option<String>,
    },
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Public counters, plus dashboard figures for administrators
    Home,
    Events {
        /// Case-insensitive match on title or description
        #[arg(long)]
        search: Option<String>,
        /// all, upcoming, past, ongoing, or a category name
        #[arg(long, default_value = "all")]
        status: String,
    },
    Programs {
        #[arg(long)]
        search: Option<String>,
        /// all, active, enrollment_open, or a category name
        #[arg(long, default_value = "all")]
        show: String,
    },
    /// Registered users (administrators only)
    Users {
        /// Case-insensitive match on username or email
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        role: Option<String>,
        /// Keep only verified (true) or unverified (false) users
        #[arg(long)]
        verified: Option<bool>,
    },
    Dashboard,
    /// Show where navigating to PATH would land
    Open { path: String },
}

/// A CLI invocation is one page load, so a hard reload just reports where
/// the next invocation starts.
struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn hard_reload(&self, route: Route) {
        println!("-> {route}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let portal = Portal::open(settings, Arc::new(ConsoleNavigator))?;
    info!(base_url = %portal.api.base_url(), "portal ready");

    match cli.command {
        Command::Login {
            username,
            password,
            remember,
        } => {
            let user = portal
                .auth
                .login(&username, &password, remember)
                .await
                .map_err(|e| anyhow!(e.user_message(Operation::Login)))?;
            println!("Welcome back, {}!", user.username);
        }
        Command::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let request = RegisterRequest {
                username,
                email,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
            };
            let outcome = portal
                .auth
                .register(request)
                .await
                .map_err(|e| anyhow!(e.user_message(Operation::Register)))?;
            match outcome {
                RegisterOutcome::SignedIn(_) => {
                    println!("Registration successful! Welcome to CPEC.")
                }
                RegisterOutcome::LoginRequired => {
                    println!("Account created! Please login with your credentials.");
                    println!("-> {}", Route::Login);
                }
            }
        }
        Command::Logout => portal.auth.logout().await,
        Command::Whoami => match portal.oracle.get_user() {
            Some(user) => {
                let role = if portal.oracle.is_admin() { "admin" } else { "member" };
                println!("{} ({role})", portal.oracle.display_name());
                if let Some(email) = user.email {
                    println!("{email}");
                }
            }
            None => println!("Not signed in"),
        },
        Command::Home => {
            let summary = load_home_summary(&portal.api, &portal.oracle).await;
            for error in &summary.errors {
                eprintln!("{error}");
            }
            println!("events: {}", summary.events);
            println!("programs: {}", summary.programs);
            if let Some(stats) = summary.admin_stats {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
        }
        Command::Events { search, status } => {
            guarded(&portal, Route::Events)?;
            let slot = ViewSlot::new();
            track(&slot.handle(), Operation::Action("loading events"), portal.events.list()).await;
            let filter = EventFilter {
                search,
                show: EventShow::parse(&status),
            };
            render(slot.state(), &filter)?;
        }
        Command::Programs { search, show } => {
            guarded(&portal, Route::Programs)?;
            let slot = ViewSlot::new();
            track(&slot.handle(), Operation::Action("loading programs"), portal.programs.list()).await;
            let filter = ProgramFilter {
                search,
                show: ProgramShow::parse(&show),
            };
            render(slot.state(), &filter)?;
        }
        Command::Users {
            search,
            role,
            verified,
        } => {
            guarded(&portal, Route::AdminUsers)?;
            let slot = ViewSlot::new();
            track(&slot.handle(), Operation::Action("loading users"), portal.users.list()).await;
            if let ViewState::Loaded(records) = slot.state() {
                let counts = user_counts(&records);
                println!(
                    "total: {}  admins: {}  verified: {}",
                    counts.total, counts.admins, counts.verified
                );
            }
            let filter = UserFilter {
                search,
                role,
                verified,
            };
            render(slot.state(), &filter)?;
        }
        Command::Dashboard => {
            guarded(&portal, Route::AdminDashboard)?;
            let view = load_dashboard(&portal.api).await;
            for error in &view.errors {
                eprintln!("{error}");
            }
            println!("{}", serde_json::to_string_pretty(&view.stats)?);
            for (title, records) in [
                ("Recent events", &view.events),
                ("Recent programs", &view.programs),
                ("Recent users", &view.users),
            ] {
                println!("{title} ({})", records.len());
                print_records(records)?;
            }
        }
        Command::Open { path } => match portal.guard.navigate(&path) {
            Navigation::Render(route) => println!("render {route}"),
            Navigation::Redirect(route) => println!("redirect {route}"),
        },
    }

    Ok(())
}

fn guarded(portal: &Portal, route: Route) -> Result<()> {
    match portal.guard.check(route) {
        Navigation::Render(_) => Ok(()),
        Navigation::Redirect(to) => Err(anyhow!("not permitted, redirected to {to}")),
    }
}

fn render(state: ViewState<Vec<Value>>, filter: &impl ListFilter) -> Result<()> {
    match state {
        ViewState::Loaded(records) => print_records(&filter.apply(records)),
        ViewState::Failed(message) => Err(anyhow!(message)),
        ViewState::Idle | ViewState::Loading => Ok(()),
    }
}

fn print_records(records: &[Value]) -> Result<()> {
    for record in records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}
