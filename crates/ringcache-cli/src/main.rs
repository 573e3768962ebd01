//! rcache - interactive shell over a ringcache instance

mod handler;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use ringcache::SharedCache;
use tracing::{debug, info};

use crate::handler::{CommandHandler, Reply};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of items)
    #[arg(short, long, env = "RCACHE_CAPACITY", default_value_t = 4)]
    capacity: usize,

    /// Run the built-in demo script and exit
    #[arg(long)]
    demo: bool,
}

/// Walkthrough of promotion, update and eviction on a four-slot cache
const DEMO_SCRIPT: &[&str] = &[
    "SET Key_1 1",
    "SET Key_2 2",
    "SET Key_3 3",
    "SET Key_4 4",
    "GET Key_2",
    "SET Key_2 NewValue",
    "GET Key_2",
    "SET Key_5 5",
    "GET Key_5",
    "GET Key_1",
    "KEYS",
    "STATS",
];

fn main() -> Result<()> {
    // Logs go to stderr so replies on stdout stay clean
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let cache = SharedCache::new(args.capacity)?;
    info!("Cache capacity: {}", args.capacity);
    let handler = CommandHandler::new(cache);

    let mut out = io::stdout().lock();

    if args.demo {
        for line in DEMO_SCRIPT {
            writeln!(out, "> {}", line)?;
            if let Some(reply) = handler.handle(line) {
                writeln!(out, "{}", reply)?;
            }
        }
        return Ok(());
    }

    info!("Reading commands from stdin (HELP for a list)");
    for line in io::stdin().lock().lines() {
        let line = line?;
        let Some(reply) = handler.handle(&line) else {
            continue;
        };
        debug!(command = %line.trim(), "handled");

        writeln!(out, "{}", reply)?;
        out.flush()?;
        if reply == Reply::Quit {
            break;
        }
    }

    Ok(())
}
