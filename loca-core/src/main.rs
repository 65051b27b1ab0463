#![windows_subsystem = "windows"]
use std::io::{self, BufRead, Write};
use std::panic::{self, AssertUnwindSafe};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use loca_core::protocol::{self, Context};

fn init_logging() {
    let filter = EnvFilter::try_from_env("LOCA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let mut ctx = Context::load();
    info!(dictionary = %ctx.settings.dictionary_path.display(), "loca-core started");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if line.trim().is_empty() {
            continue;
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| protocol::handle(&mut ctx, &line)));

        let response = match result {
            Ok(resp) => resp,
            Err(_) => {
                error!("handler panicked");
                serde_json::json!({
                    "status": "error",
                    "message": "internal core error"
                })
                .to_string()
            }
        };

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }
}
