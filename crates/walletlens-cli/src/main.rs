// WalletLens CLI — transaction table, income/expenditure summary, top
// counterparties and portfolio for one wallet, from the terminal.

mod render;

use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use walletlens::engine::{SessionEvent, WalletSession};
use walletlens::{LensConfig, LensResult};

#[derive(Debug, Parser)]
#[command(name = "walletlens", version, about = "Wallet history and portfolio views for AirDAO", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/walletlens/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Wallet address to inspect
    #[arg(long, global = true, env = "WALLETLENS_ADDRESS")]
    address: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Every transaction as a table row
    Transactions,
    /// Credited / debited totals per token
    Summary,
    /// Top beneficiaries and benefactors by USD value
    Top {
        /// Entries per list (overrides display.top_n)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Current balances valued in USD
    Portfolio,
    /// Poll and print every refresh until Ctrl-C
    Watch,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> LensResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> LensResult<()> {
    let mut config = LensConfig::load(cli.config.as_deref())?;
    if let Command::Top { limit: Some(limit) } = cli.command {
        config.display.top_n = limit;
        config.validate()?;
    }

    let address = cli.address.as_deref().ok_or("No wallet address; pass --address or set WALLETLENS_ADDRESS")?;
    let session = Arc::new(WalletSession::from_config(&config)?);
    let wallet = session.connect(address)?;

    match cli.command {
        Command::Transactions => {
            let view = session.dashboard().await?;
            if cli.json {
                print_json(&view.rows)?;
            } else {
                print!("{}", render::rows(&view.rows));
            }
        }
        Command::Summary => {
            let view = session.dashboard().await?;
            if cli.json {
                print_json(&view.totals)?;
            } else {
                print!("{}", render::totals(&view.totals));
            }
        }
        Command::Top { .. } => {
            let view = session.dashboard().await?;
            if cli.json {
                print_json(&serde_json::json!({
                    "top_beneficiaries": view.top_beneficiaries,
                    "top_benefactors": view.top_benefactors,
                }))?;
            } else {
                print!("{}", render::ranked("Top Beneficiaries", &view.top_beneficiaries));
                println!();
                print!("{}", render::ranked("Top Benefactors", &view.top_benefactors));
            }
        }
        Command::Portfolio => {
            let snapshot = session.portfolio().await?;
            if cli.json {
                print_json(&snapshot)?;
            } else {
                print!("{}", render::portfolio(wallet.as_str(), &snapshot));
            }
        }
        Command::Watch => watch_loop(session, cli.json).await?,
    }

    Ok(())
}

async fn watch_loop(session: Arc<WalletSession>, json: bool) -> LensResult<()> {
    let (events_tx, mut events_rx) = mpsc::channel(16);
    let (stop_tx, stop_rx) = watch::channel(false);

    let poller = {
        let session = session.clone();
        tokio::spawn(async move { session.run(events_tx, stop_rx).await })
    };

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events_rx.recv() => match event {
                Some(SessionEvent::Dashboard(view)) => {
                    if json {
                        print_json(&view)?;
                    } else {
                        print!("{}", render::rows(&view.rows));
                        println!();
                        print!("{}", render::totals(&view.totals));
                        println!();
                        print!("{}", render::ranked("Top Beneficiaries", &view.top_beneficiaries));
                        print!("{}", render::ranked("Top Benefactors", &view.top_benefactors));
                        println!();
                    }
                }
                Some(SessionEvent::Portfolio(snapshot)) => {
                    if json {
                        print_json(&snapshot)?;
                    } else {
                        print!("{}", render::portfolio(&view_wallet(&session), &snapshot));
                        println!();
                    }
                }
                Some(SessionEvent::Error(e)) => eprintln!("refresh failed: {}", e),
                None => break,
            }
        }
    }

    let _ = stop_tx.send(true);
    session.disconnect();
    poller.await.map_err(|e| e.to_string())?;
    Ok(())
}

fn view_wallet(session: &WalletSession) -> String {
    session.wallet().map(|w| w.to_string()).unwrap_or_default()
}
