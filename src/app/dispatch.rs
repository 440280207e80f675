use super::commands::{Cli, Commands};
use super::status::render_status;
use crate::config::Config;
use crate::delivery::DeliveryPolicy;
use crate::download::{DownloadDispatcher, ExtractionOptions, Extractor, YtDlpExtractor};
use crate::error::{FetchError, Result};
use crate::links::LinkClassifier;
use crate::membership::{InMemoryMembershipStore, MembershipGate, MembershipLookup};
use crate::pipeline::{Pipeline, PipelineParts};
use crate::status::UsageStats;
use crate::transport::health::{TransportHealth, check_bot};
use crate::transport::runtime::{ListenerBackoff, spawn_supervised_listener};
use crate::transport::{ChatTransport, InboundEvent, TelegramChannel};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const EVENT_QUEUE_CAPACITY: usize = 100;
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Run => run(config).await,
        Commands::Doctor => doctor(&config).await,
    }
}

fn telegram_channel(config: &Config) -> TelegramChannel {
    TelegramChannel::with_api_base(
        config.telegram.bot_token.clone(),
        config.telegram.api_base.clone(),
    )
    .with_poll_timeout(config.telegram.poll_timeout_secs)
}

/// Wire the pipeline from config. The transport doubles as the membership lookup.
pub fn build_pipeline<T>(
    config: &Config,
    transport: Arc<T>,
    extractor: Arc<dyn Extractor>,
) -> Pipeline
where
    T: ChatTransport + MembershipLookup + 'static,
{
    let stats = Arc::new(UsageStats::new());
    let admin_id = config.membership.admin_id;

    let store = Arc::new(InMemoryMembershipStore::with_users(admin_id));
    let lookup: Arc<dyn MembershipLookup> = transport.clone();
    let gate = MembershipGate::new(store, lookup, config.membership.required_channel.clone());

    let options = ExtractionOptions::new(config.download.resolved_dir())
        .with_format(config.download.format.clone());
    let dispatcher = DownloadDispatcher::new(extractor, options, config.download.workers);

    Pipeline::new(PipelineParts {
        transport: transport as Arc<dyn ChatTransport>,
        gate,
        dispatcher,
        classifier: LinkClassifier::default(),
        policy: DeliveryPolicy::from_megabytes(config.delivery.inline_limit_mb),
        stats,
        admin_id,
    })
}

async fn run(mut config: Config) -> Result<()> {
    config.apply_env_overrides();
    config.validate()?;

    let telegram = Arc::new(telegram_channel(&config));
    let username = telegram
        .get_me()
        .await
        .context("Telegram getMe failed; check telegram.bot_token")?;
    info!(bot = %username, "connected to Telegram");

    let extractor: Arc<dyn Extractor> =
        Arc::new(YtDlpExtractor::new(config.download.ytdlp_path.clone()));
    let pipeline = Arc::new(build_pipeline(&config, Arc::clone(&telegram), extractor));
    info!(
        channel = %config.membership.required_channel,
        dir = %config.download.resolved_dir().display(),
        workers = config.download.workers,
        "fetchbot ready"
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel::<InboundEvent>(EVENT_QUEUE_CAPACITY);
    let listener = spawn_supervised_listener(
        telegram as Arc<dyn ChatTransport>,
        tx,
        ListenerBackoff::from_config(&config.reliability),
    );

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                let pipeline = Arc::clone(&pipeline);
                tokio::spawn(async move {
                    let outcome = pipeline.handle_event(event).await;
                    tracing::debug!(?outcome, "event handled");
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        }
    }

    listener.abort();
    let snapshot = pipeline.stats().snapshot();
    info!(
        requests = snapshot.requests,
        delivered = snapshot.delivered,
        retained = snapshot.retained,
        failed = snapshot.failed,
        rejected = snapshot.rejected,
        "fetchbot stopped"
    );
    Ok(())
}

async fn doctor(config: &Config) -> Result<()> {
    let mut config = config.clone();
    config.apply_env_overrides();
    println!("{}", render_status(&config));
    println!();

    let mut healthy = true;

    let telegram = telegram_channel(&config);
    let health = check_bot(&telegram, HEALTH_CHECK_TIMEOUT).await;
    healthy &= health.is_healthy();
    println!("  {:<18} {}", t!("doctor.telegram"), health_label(&health));

    let extractor = YtDlpExtractor::new(config.download.ytdlp_path.clone());
    let probe = tokio::task::spawn_blocking(move || extractor.probe())
        .await
        .map_err(|e| FetchError::Other(anyhow::anyhow!("probe worker crashed: {e}")))?;
    match probe {
        Ok(version) => println!(
            "  {:<18} {} ({version})",
            t!("doctor.downloader"),
            t!("doctor.healthy")
        ),
        Err(failure) => {
            healthy = false;
            println!(
                "  {:<18} {} ({failure})",
                t!("doctor.downloader"),
                t!("doctor.unhealthy")
            );
        }
    }

    if let Err(e) = config.validate() {
        healthy = false;
        println!("\n  {e}");
    }

    if healthy {
        Ok(())
    } else {
        Err(anyhow::anyhow!("doctor found problems").into())
    }
}

fn health_label(health: &TransportHealth) -> String {
    match health {
        TransportHealth::Healthy { bot } => format!("{} (@{bot})", t!("doctor.healthy")),
        TransportHealth::Unhealthy { reason } => format!("{} ({reason})", t!("doctor.unhealthy")),
        TransportHealth::Timeout => t!("doctor.timeout").into_owned(),
    }
}
