//! Main entry point for the readiness binary
//!
//! Loads a cart page snapshot, wires the page-backed probes and the HTTP
//! quotation probe into a controller, replays an optional script of user
//! actions through the event loop and prints the final proceed state.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tokio::sync::mpsc;

use readiness::{
    page::shared_page,
    services::{HttpQuotationProbe, PageFormProbe, PageItemProbe, PagePaymentProbe, PageProceedControl},
    ControllerConfig, EvaluationStats, OrderingPolicy, Page, PageAction, ReadinessController, ReadinessError,
    ReadinessResult,
};
use shared::{logging, ReadinessDecision, SharedError};

const COMPONENT: &str = "readiness";

/// Checkout readiness check for a cart page snapshot
#[derive(Parser)]
#[command(name = "readiness")]
#[command(about = "Evaluates whether a cart page may proceed to checkout")]
pub struct Args {
    /// Cart page snapshot (JSON)
    #[arg(long)]
    pub page: PathBuf,

    /// Controller configuration (JSON); defaults match the storefront cart page
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// User actions to replay after the initial evaluation (JSON list)
    #[arg(long)]
    pub actions: Option<PathBuf>,

    /// Storefront base URL for the quotation status check
    #[arg(long)]
    pub base_url: Option<String>,

    /// Cookie header value carrying the storefront session
    #[arg(long)]
    pub session_cookie: Option<String>,

    /// How results of overlapping evaluations are applied
    #[arg(long, value_enum)]
    pub ordering: Option<OrderingPolicy>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Serialize)]
struct Report {
    initial: ReadinessDecision,
    last_applied: Option<ReadinessDecision>,
    proceed_disabled: Option<bool>,
    stats: EvaluationStats,
}

fn build_config(args: &Args) -> ReadinessResult<ControllerConfig> {
    let mut config = match &args.config {
        Some(path) => ControllerConfig::load(path)?,
        None => ControllerConfig::default(),
    };

    if let Some(base_url) = &args.base_url {
        config.quotation.base_url = base_url.clone();
    }
    if let Some(cookie) = &args.session_cookie {
        config.quotation.session_cookie = Some(cookie.clone());
    }
    if let Some(ordering) = args.ordering {
        config.ordering = ordering;
    }

    config.validate()?;
    Ok(config)
}

fn load_actions(path: Option<&PathBuf>) -> ReadinessResult<Vec<PageAction>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&json).map_err(SharedError::from)?)
        }
        None => Ok(Vec::new()),
    }
}

/// Evaluate the page at startup, replay the actions through the event loop
/// and report the final proceed state
async fn check(args: &Args) -> ReadinessResult<Report> {
    let config = build_config(args)?;
    let actions = load_actions(args.actions.as_ref())?;
    let page = shared_page(Page::load(&args.page)?);

    let selectors = config.selectors.clone();
    let proceed = PageProceedControl::new(page.clone(), selectors.clone());
    let controller = ReadinessController::new(
        PageFormProbe::new(page.clone(), selectors.clone()),
        PagePaymentProbe::new(page.clone(), selectors.clone()),
        PageItemProbe::new(page.clone(), selectors.clone()),
        HttpQuotationProbe::new(&config.quotation)?,
        PageProceedControl::new(page.clone(), selectors),
        config,
    );

    let initial = controller.initialize().await;

    let (sender, receiver) = mpsc::channel(64);
    let runner = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.run_to_completion(receiver).await })
    };

    for action in &actions {
        let events = {
            let mut page = page.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            page.apply(action)
        };
        let events = match events {
            Ok(events) => events,
            Err(err) => {
                logging::log_error(COMPONENT, "Replaying page action", &err);
                continue;
            }
        };
        for event in events {
            sender.send(event).await.map_err(|_| ReadinessError::ChannelClosed)?;
        }
    }
    drop(sender);

    let stats = runner.await??;
    Ok(Report {
        initial,
        last_applied: controller.state().last_decision().await,
        proceed_disabled: proceed.is_disabled(),
        stats,
    })
}

#[tokio::main]
async fn main() -> ReadinessResult<()> {
    let args = Args::parse();
    logging::init_tracing_with_level(Some(&args.log_level));
    logging::log_startup(COMPONENT, &format!("readiness check for {}", args.page.display()));

    let report = check(&args).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    logging::log_shutdown(COMPONENT, "all page actions replayed");
    Ok(())
}
