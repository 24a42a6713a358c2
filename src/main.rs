use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use blind_bridge::cli::Args;
use blind_bridge::config::Settings;
use blind_bridge::engine::EventKind;
use blind_bridge::hardware::{AntennaHandler, CardLibrary, SimulatedHandler, TcpAntennaHandler};
use blind_bridge::session::{describe, parse_keypad, KeypadCommand, Session, SessionHandle};

/// Read keypad lines from stdin until EOF or `quit`.
async fn read_keypad(handle: SessionHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match parse_keypad(&line) {
                    Ok(command) => {
                        let quit = command == KeypadCommand::Quit;
                        if !handle.keypad(command) || quit {
                            return;
                        }
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            Ok(None) => {
                handle.shutdown();
                return;
            }
            Err(e) => {
                log::error!("Failed to read keypad input: {}", e);
                handle.shutdown();
                return;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    let settings = Settings::from_args(&args).context("Invalid arguments")?;

    let handler: Box<dyn AntennaHandler> = if settings.simulate {
        Box::new(SimulatedHandler::new())
    } else {
        let path = settings
            .library
            .as_ref()
            .context("A card library is required")?;
        let library = CardLibrary::load(path)
            .with_context(|| format!("Failed to load card library: {}", path.display()))?;
        Box::new(
            TcpAntennaHandler::new(settings.server_addr(), Arc::new(library))
                .with_id_cycling(settings.cycle_id_antenna)
                .with_request_pause(settings.request_pause),
        )
    };

    let (session, handle) = Session::new(settings.blind, settings.hand_rules(), handler);
    let session = match settings.seed {
        Some(seed) => session.with_seed(seed),
        None => session,
    };

    // Diagnostics only with -v
    let mut events = if args.verbose > 0 {
        handle.subscribe()
    } else {
        let kinds: Vec<EventKind> = EventKind::ALL
            .into_iter()
            .filter(|kind| *kind != EventKind::Debug)
            .collect();
        handle.subscribe_to(&kinds)
    };
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            println!("{}", describe(&event));
        }
    });
    tokio::spawn(read_keypad(handle));

    log::info!("Blind player sits {}", settings.blind);
    let summary = session.run().await.context("Session failed")?;

    println!("Hands completed: {}", summary.hands_completed);
    Ok(())
}
