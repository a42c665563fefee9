use anyhow::Result;
use clap::{Parser, Subcommand};
use msalive_auth::{Endpoints, ReqwestTransport, TerminalBrowser, flow::FlowReport};
use msalive_config::{Config, LogConfig};
use msalive_types::{FlowOutcome, RefreshToken};
use std::{path::PathBuf, time::Duration};

#[derive(Parser, Debug)]
#[command(name = "msalive", about = "msalive — Microsoft Account sign-in from the terminal")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Print URLs instead of launching the system browser.
    #[arg(long, global = true)]
    no_open: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and obtain an access token.
    Login,
    /// Exchange a refresh token for a new access token.
    Refresh {
        /// Refresh token from a previous login.
        refresh_token: String,
    },
    /// Sign out of the Microsoft Account session.
    Signout,
    /// Print the authorize, sign-out and token URLs for the loaded config.
    Urls,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("config error: {e}"))?;
    init_tracing(&config.log);

    let browser = TerminalBrowser {
        print_only: cli.no_open,
    };
    match cli.command {
        Commands::Login => cmd_login(&config, browser).await,
        Commands::Refresh { refresh_token } => cmd_refresh(&config, browser, refresh_token).await,
        Commands::Signout => cmd_signout(&config, browser).await,
        Commands::Urls => cmd_urls(&config),
    }
}

async fn cmd_login(config: &Config, browser: TerminalBrowser) -> Result<()> {
    let report = msalive_auth::flow::login(
        &config.flow,
        browser,
        transport(config)?,
        msalive_auth::browser::stdin_navigations(),
    )
    .await
    .map_err(|e| anyhow::anyhow!("login failed: {e}"))?;
    print_report(report)
}

async fn cmd_refresh(config: &Config, browser: TerminalBrowser, token: String) -> Result<()> {
    let report = msalive_auth::flow::refresh(
        &config.flow,
        browser,
        transport(config)?,
        RefreshToken::new(token),
    )
    .await
    .map_err(|e| anyhow::anyhow!("refresh failed: {e}"))?;
    print_report(report)
}

async fn cmd_signout(config: &Config, browser: TerminalBrowser) -> Result<()> {
    let report = msalive_auth::flow::sign_out(
        &config.flow,
        browser,
        transport(config)?,
        msalive_auth::browser::stdin_navigations(),
    )
    .await
    .map_err(|e| anyhow::anyhow!("sign-out failed: {e}"))?;
    match report.outcome {
        FlowOutcome::SignedOut => {
            eprintln!("Successfully signed out");
            Ok(())
        }
        other => Err(anyhow::anyhow!("sign-out did not complete: {other:?}")),
    }
}

fn cmd_urls(config: &Config) -> Result<()> {
    let endpoints =
        Endpoints::new(&config.flow).map_err(|e| anyhow::anyhow!("config error: {e}"))?;
    println!("authorize: {}", endpoints.authorize_url());
    println!("sign-out:  {}", endpoints.sign_out_url());
    println!("token:     {}", endpoints.token_url());
    println!("redirect:  {}", endpoints.redirect_url());
    Ok(())
}

fn print_report(report: FlowReport) -> Result<()> {
    let Some(result) = report.result else {
        return Err(match report.outcome {
            FlowOutcome::Failed(e) => anyhow::anyhow!(e),
            other => anyhow::anyhow!("flow ended without a token: {other:?}"),
        });
    };
    let out = serde_json::json!({
        "access_token": result.access_token,
        "user_id": result.user_id,
        "expires_at": result.expires_at_unix(),
        "refresh_token": report.refresh_token.as_str(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn transport(config: &Config) -> Result<ReqwestTransport> {
    ReqwestTransport::new(config.http.timeout_secs.map(Duration::from_secs))
        .map_err(|e| anyhow::anyhow!("http client error: {e}"))
}

fn init_tracing(log: &LogConfig) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
