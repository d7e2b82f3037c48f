//! `abacus run`: drives the bridge and tutorial from scripted input.

use abacus_core::{
    AbacusConfig, MessageRouter, RuntimeBridge, RuntimeSink, TutorialHandle, TutorialService,
};
use abacus_proto::{EventBus, MESSAGE_EVENT, listener};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::console::{ConsoleSurface, SimulatedSpeech, StdoutRuntime};
use crate::host::{HostAction, InputLine};

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read input from a file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Run without a speech engine (narration completes after the fallback delay)
    #[arg(long)]
    pub silent: bool,

    /// Simulated speaking time per word, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 120)]
    pub word_ms: u64,
}

/// Loads `path`, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<AbacusConfig> {
    match path {
        Some(path) => AbacusConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(AbacusConfig::default()),
    }
}

/// The pieces a host page owns.
struct Host {
    router: MessageRouter,
    bridge: RuntimeBridge,
    tutorial: TutorialHandle,
    runtime: Arc<dyn RuntimeSink>,
}

impl Host {
    async fn apply(&self, action: HostAction) -> Result<()> {
        match action {
            HostAction::Start => self.tutorial.start(),
            HostAction::Quit => self.tutorial.quit(),
            HostAction::Value(value) => {
                self.bridge.set_current_value(value);
            }
            HostAction::Goals(list) => {
                self.bridge.set_goal_list(list);
            }
            HostAction::Lock { roll, locked } => {
                self.bridge.lock_roll(roll, locked);
            }
            HostAction::Attach => self.bridge.attach(Arc::clone(&self.runtime)),
            HostAction::Detach => self.bridge.detach(),
            HostAction::Status => {
                println!("{}", serde_json::to_string(&self.tutorial.status())?);
            }
            HostAction::Wait(delay) => tokio::time::sleep(delay).await,
        }
        Ok(())
    }
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let runtime: Arc<dyn RuntimeSink> = Arc::new(StdoutRuntime::new(config.runtime.clone()));
    let bridge = RuntimeBridge::attached(Arc::clone(&runtime));

    let mut service = TutorialService::new(config)
        .with_bridge(bridge.clone())
        .with_surface(Arc::new(ConsoleSurface));
    if !args.silent {
        service = service.with_speech(Arc::new(SimulatedSpeech::new(Duration::from_millis(
            args.word_ms,
        ))));
    }
    let (tutorial, task) = service.spawn();

    let bus = Arc::new(EventBus::new());
    bus.on(
        MESSAGE_EVENT,
        listener(|data| {
            debug!(message = data.unwrap_or_default(), "Runtime message on bus");
            Ok(())
        }),
    );

    let host = Host {
        router: MessageRouter::new(bus).with_tutorial(Arc::new(tutorial.clone())),
        bridge,
        tutorial,
        runtime,
    };

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let mut lines = reader.lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        match InputLine::parse(&line) {
            Ok(InputLine::Skip) => {}
            Ok(InputLine::Message(raw)) => {
                let message = host.router.route(&raw);
                info!(%message, "Routed");
            }
            Ok(InputLine::Action(action)) => host.apply(action).await?,
            Err(e) => warn!(line = line_no, error = %e, "Skipping input line"),
        }
    }

    info!("End of input");
    drop(host);
    task.await.context("Tutorial task failed")?;
    Ok(())
}
