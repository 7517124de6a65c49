use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    EngineConfig, EngineDependencies, EngineEvent, FragmentProvider, HttpFragmentProvider,
    InMemoryHistory, InputBindings, NavigationChrome, NavigationObserver, PageContainer,
    TransitionEngine,
};
use shared::{
    domain::{PageSet, TransitionKind},
    protocol::HistoryEntry,
};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod script;

use script::{parse_initial_page, Gesture};

/// Drives the transition engine against a running site from the terminal.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server_url: String,
    /// Page index, identifier or route the session starts on.
    #[arg(long, default_value = "0")]
    initial_page: String,
    #[arg(long)]
    transition: Option<TransitionKind>,
    /// TOML engine configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Gestures to replay: right, left, space, home, end, back, forward,
    /// swipe:DX:DY, click:N, link:N, transition:KIND.
    gestures: Vec<Gesture>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(kind) = args.transition {
        config.transition_kind = kind;
    }

    let pages = PageSet::demo();
    let initial = parse_initial_page(&args.initial_page, &pages)?;
    let start = pages
        .get(initial)
        .or_else(|| pages.get(0))
        .context("page set is empty")?
        .clone();

    let provider = Arc::new(
        HttpFragmentProvider::new(&args.server_url, config.fetch_timeout())
            .with_context(|| format!("invalid server url '{}'", args.server_url))?,
    );
    let surface = match provider.fetch(&start.id).await {
        Ok(fragment) => Arc::new(PageContainer::with_active(start.id.clone(), fragment.html)),
        Err(err) => {
            warn!(%err, "could not load the initial page; starting with an empty container");
            Arc::new(PageContainer::new())
        }
    };
    let history = Arc::new(InMemoryHistory::new(HistoryEntry::new(
        initial,
        start.route.clone(),
    )));
    let chrome = Arc::new(NavigationChrome::new(pages.len()));

    let settle_window =
        config.fetch_timeout() + config.animation_duration() + Duration::from_secs(1);
    let engine = TransitionEngine::new(
        pages,
        initial,
        config,
        EngineDependencies {
            provider,
            history: history.clone(),
            surface,
            observers: vec![chrome.clone() as Arc<dyn NavigationObserver>],
        },
    );
    engine.sync_ui().await;
    let listener = engine.spawn_history_listener();
    let mut events = engine.subscribe_events();
    info!(server_url = %args.server_url, initial, "navigator session started");
    print_state(&engine, &chrome).await;

    let bindings = InputBindings::new(engine.clone());
    for gesture in &args.gestures {
        match gesture {
            Gesture::Back | Gesture::Forward => {
                let moved = if *gesture == Gesture::Back {
                    history.back().await
                } else {
                    history.forward().await
                };
                if moved.is_none() {
                    println!("{gesture:?}: no history entry");
                    continue;
                }
                wait_for_restore(&mut events, settle_window).await;
            }
            _ => {
                for event in gesture.events(engine.pages()) {
                    let response = bindings.handle(event).await;
                    if let Some(outcome) = response.outcome {
                        println!("{gesture:?}: {outcome:?}");
                    }
                }
            }
        }
        print_state(&engine, &chrome).await;
    }

    listener.abort();
    Ok(())
}

async fn wait_for_restore(events: &mut broadcast::Receiver<EngineEvent>, window: Duration) {
    let restored = tokio::time::timeout(window, async {
        loop {
            match events.recv().await {
                Ok(EngineEvent::Restored { index, outcome }) => break Some((index, outcome)),
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break None,
            }
        }
    })
    .await;

    match restored {
        Ok(Some((index, outcome))) => println!("restored page {index}: {outcome:?}"),
        Ok(None) => warn!("engine event stream closed"),
        Err(_) => warn!("history restore did not finish in time"),
    }
}

async fn print_state(engine: &TransitionEngine, chrome: &NavigationChrome) {
    let state = engine.state();
    let page = engine
        .pages()
        .get(state.current_index)
        .map(|page| page.title.as_str())
        .unwrap_or("?");
    let dots: String = chrome
        .indicators()
        .await
        .into_iter()
        .map(|active| if active { '●' } else { '○' })
        .collect();
    println!(
        "page {} \"{}\" {} transition={}",
        state.current_index, page, dots, state.transition_kind
    );
}
