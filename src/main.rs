use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use reqwest::Url;
use serde::Serialize;

use ventureboard::app::AppContext;
use ventureboard::config::{ClientConfig, ConfigError, normalize_base_url};
use ventureboard::net::api::DEFAULT_GENERATE_COUNT;
use ventureboard::net::error::ApiError;
use ventureboard::pages::{LoadOutcome, dashboard, login, venture_list};
use ventureboard::util::auth::guard_navigation;
use ventureboard::util::navigate::HistoryNavigator;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(ApiError),
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("not signed in; run `ventureboard login` first")]
    NotSignedIn,
    #[error("session expired; run `ventureboard login` again")]
    SessionExpired,
    #[error("invalid route URL: {0}")]
    Route(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        if err.status() == Some(401) { Self::SessionExpired } else { Self::Api(err) }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ventureboard", about = "Venture portfolio API client")]
struct Cli {
    /// Overrides `VENTUREBOARD_API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides `VENTUREBOARD_TOKEN_FILE`.
    #[arg(long)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "VENTUREBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, env = "VENTUREBOARD_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        email: String,
    },
    Logout,
    Refresh {
        #[arg(long)]
        refresh: String,
    },
    Status,
    Dashboard,
    Ventures(VenturesArgs),
    Metrics,
    Chat {
        question: String,
    },
    Generate {
        #[arg(long, default_value_t = DEFAULT_GENERATE_COUNT)]
        count: u32,
    },
}

#[derive(Args, Debug)]
struct VenturesArgs {
    #[arg(long)]
    page: Option<u64>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    pod: Option<String>,
    #[arg(long)]
    stage: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    ordering: Option<String>,
}

impl VenturesArgs {
    /// The `/venture-list` route URL these flags describe.
    fn route_url(&self) -> Result<Url, CliError> {
        let mut url = Url::parse("app://local/venture-list").map_err(|e| CliError::Route(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(page) = self.page {
                query.append_pair("page", &page.to_string());
            }
            for (key, value) in [
                ("search", &self.search),
                ("pod", &self.pod),
                ("stage", &self.stage),
                ("status", &self.status),
                ("ordering", &self.ordering),
            ] {
                if let Some(value) = value {
                    query.append_pair(key, value);
                }
            }
        }
        Ok(url)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config.api_base_url = normalize_base_url(base_url)?;
    }
    if let Some(token_file) = cli.token_file {
        config.token_file = token_file;
    }

    let ctx = AppContext::from_config(&config, Arc::new(HistoryNavigator::new()))?;

    match cli.command {
        Command::Login { username, password } => {
            let (username, password) = login::validate_credentials(&username, &password).map_err(CliError::InvalidInput)?;
            login::sign_in(&ctx, &username, &password)
                .await
                .map_err(CliError::Api)?;
            println!("signed in as {username}");
        }
        Command::Register { username, password, email } => {
            let (username, password) = login::validate_credentials(&username, &password).map_err(CliError::InvalidInput)?;
            let user = login::sign_up(&ctx, &username, &password, &email)
                .await
                .map_err(CliError::Api)?;
            print_json(&user)?;
        }
        Command::Logout => {
            login::sign_out(&ctx);
            println!("signed out");
        }
        Command::Refresh { refresh } => {
            login::refresh_session(&ctx, &refresh)
                .await
                .map_err(CliError::Api)?;
            println!("session refreshed");
        }
        Command::Status => print_json(&ctx.session.snapshot())?,
        Command::Dashboard => {
            enter(&ctx, "/dashboard")?;
            let outcome = dashboard::load(&ctx, ctx.fetch.clone()).await;
            render(outcome)?;
        }
        Command::Ventures(args) => {
            enter(&ctx, "/venture-list")?;
            let url = args.route_url()?;
            let outcome = venture_list::load(&ctx, ctx.fetch.clone(), &url).await;
            render(outcome)?;
        }
        Command::Metrics => {
            enter(&ctx, "/dashboard")?;
            print_json(&ctx.api().get_metrics().await?)?;
        }
        Command::Chat { question } => {
            enter(&ctx, "/dashboard")?;
            print_json(&ctx.api().chat(&question).await?)?;
        }
        Command::Generate { count } => {
            enter(&ctx, "/venture-list")?;
            print_json(&ctx.api().generate_random(count).await?)?;
        }
    }
    Ok(())
}

/// Run the navigation hook for `path`.
fn enter(ctx: &AppContext, path: &str) -> Result<(), CliError> {
    match guard_navigation(&ctx.session, path) {
        Some(_) => Err(CliError::NotSignedIn),
        None => Ok(()),
    }
}

fn render<T: Serialize>(outcome: LoadOutcome<T>) -> Result<(), CliError> {
    match outcome {
        LoadOutcome::Render(data) => print_json(&data),
        LoadOutcome::Redirect(_) => Err(CliError::NotSignedIn),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
