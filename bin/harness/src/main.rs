//! Text-query harness for the lectern dispatch pipeline.
//!
//! Drives the same resolve → fetch → record path the voice bridge uses,
//! but from stdin, against the built-in demo schedule. Useful for
//! exercising reference resolution without a phone line.

mod config;
mod repl;

use config::HarnessConfig;
use lectern_context::ContextStore;
use lectern_dispatch::Dispatcher;
use lectern_schedule::StaticSchedule;
use repl::{Command, parse_line};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = HarnessConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let store = Arc::new(ContextStore::new(config.context));
    store.start_sweeper();

    let dispatcher = Dispatcher::new(Arc::new(StaticSchedule::sample()), Arc::clone(&store));

    println!("lectern harness. One query per line; /quit to exit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Ok(Some(line)) = line else { break };

        match parse_line(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Sessions) => {
                for snapshot in store.snapshot_all() {
                    println!(
                        "{}  interactions={} topic={} last_active={}",
                        snapshot.session_id,
                        snapshot.interaction_count,
                        snapshot.current_topic.as_deref().unwrap_or("-"),
                        snapshot.last_activity_at.format("%H:%M:%S"),
                    );
                }
                println!("{} tracked conversation(s)", store.count());
            }
            Ok(Command::Summary(session)) => match store.summarize(&session) {
                Some(summary) => {
                    println!("session:   {}", summary.session_id);
                    println!("duration:  {}s", summary.duration_seconds);
                    println!("queries:   {}", summary.interaction_count);
                    println!(
                        "topic:     {}",
                        summary.current_topic.as_deref().unwrap_or("-")
                    );
                    println!("speakers:  {}", summary.mentioned_speakers.join(", "));
                    println!("sessions:  {}", summary.mentioned_sessions.join(", "));
                    for suggestion in &summary.suggestions {
                        println!("try:       {suggestion}");
                    }
                }
                None => println!("no conversation: {session}"),
            },
            Ok(Command::Clear(session)) => {
                if store.clear(&session) {
                    println!("cleared {session}");
                } else {
                    println!("no conversation: {session}");
                }
            }
            Ok(Command::Call(call)) => match dispatcher.handle(call).await {
                Ok(reply) => {
                    println!("{}", reply.spoken_message());
                    for row in &reply.rows {
                        println!(
                            "  - {} ({})",
                            row.title.as_deref().unwrap_or("untitled"),
                            row.speaker_name().unwrap_or("speaker tba"),
                        );
                    }
                    for suggestion in &reply.suggestions {
                        println!("  try: {suggestion}");
                    }
                }
                Err(report) => {
                    tracing::error!(error = %report, "dispatch failed");
                    println!("something went wrong with that lookup");
                }
            },
            Err(err) => println!("{err}"),
        }
    }

    store.shutdown();
    tracing::info!("Harness shut down");
}
