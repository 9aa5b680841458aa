//! Send mode CLI logic
//!
//! One in-tree example of the per-action handler layer: builds a single
//! request from command-line fields, runs it through the pipeline, and
//! persists the rotated tokens afterwards.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::ConfigLoader,
    session::{PacedReadiness, Pipeline},
    types::{RequestOptions, parse_form_fields},
    utils::{TokenFile, get_token_path},
};

/// Arguments for send mode
#[derive(Debug)]
pub struct SendArgs {
    pub path: String,
    pub fields: Vec<String>,
    pub raw: bool,
    pub user: Option<String>,
    pub host: Option<String>,
    pub config: Option<String>,
    pub verbose: bool,
}

/// Run send mode with the given arguments
pub async fn run_send_mode(args: SendArgs) -> Result<()> {
    init_logging(args.verbose);

    let loader = ConfigLoader::new();
    let mut settings = loader.load(args.config.as_deref().map(std::path::Path::new))?;
    if let Some(user) = args.user {
        settings.service.user = user;
    }
    match args.host.as_deref() {
        Some("primary") => settings.service.use_mirror = false,
        Some("mirror") => settings.service.use_mirror = true,
        // Anything else is a custom base URL; the pipeline validates it
        Some(custom) => settings.service.custom_url = Some(custom.to_string()),
        None => {}
    }

    let fields = parse_form_fields(&args.fields).map_err(anyhow::Error::msg)?;

    debug!(
        path = %args.path,
        raw = args.raw,
        host = settings.service.base_url(),
        "starting send mode"
    );

    let pacer = PacedReadiness::new(Duration::from_millis(settings.pacing.min_interval_ms));
    let pipeline = Pipeline::new(settings, Arc::new(pacer))?;

    let token_file = TokenFile::new(get_token_path()?);
    pipeline.token_store().replace(token_file.load().await).await;

    let outcome = if args.raw {
        let options = RequestOptions::new().with_follow_redirects(false);
        let exchange = pipeline.send_raw(&args.path, &fields, options).await?;
        println!("{} {}", exchange.status().as_u16(), exchange.final_url());
        if let Some(target) = exchange.redirect_target() {
            println!("{}", target);
        }
        Ok(())
    } else {
        match pipeline.send_page(&args.path, &fields).await {
            Ok(body) => {
                println!("{}", body);
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e)),
        }
    };

    // Persist whatever the exchange rotated, even when it failed afterwards
    if let Err(e) = token_file.save(&pipeline.token_store().current().await).await {
        tracing::warn!("failed to persist session tokens: {}", e);
    }

    outcome
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "error" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
