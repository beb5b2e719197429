//! Replay a JSONL event log through the router and print the final state.
//!
//! Each input line is one serialized `Event`. Events are dispatched in file
//! order and the queue settles between lines, so continuations land exactly
//! where they would in a live session with instant bridge answers.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use usersignal_core::{Collaborators, CoreConfig, Event, EventLoop, FixedBridge};

#[derive(Args)]
pub struct ReplayArgs {
    /// JSONL event log ("-" for stdin)
    pub input: PathBuf,

    /// TOML config path (defaults otherwise)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the final state
    #[arg(long)]
    pub pretty: bool,

    /// Answer native "configured" queries with true
    #[arg(long)]
    pub bridge_configured: bool,

    /// Answer native "allowed" queries with true
    #[arg(long)]
    pub bridge_allowed: bool,
}

pub fn run(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    let bridge = Arc::new(FixedBridge {
        configured: args.bridge_configured,
        enabled: args.bridge_allowed,
    });

    let reader: Box<dyn BufRead> = if args.input.as_os_str() == "-" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(&args.input)?))
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let state = runtime.block_on(async {
        let mut event_loop = EventLoop::new(config, Collaborators::detached(bridge));
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let event: Event = serde_json::from_str(&line)?;
            event_loop.dispatch(event);
            event_loop.settle().await;
        }
        Ok::<_, Box<dyn std::error::Error>>(event_loop.into_state())
    })?;

    let out = if args.pretty {
        serde_json::to_string_pretty(&state)?
    } else {
        serde_json::to_string(&state)?
    };
    println!("{out}");
    Ok(())
}
