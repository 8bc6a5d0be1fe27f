//! signspell - fingerspelling to words
//!
//! Main entry point for the CLI application.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use signspell::{
    classifier::PacketClassifier,
    config::Config,
    gesture::GestureEngine,
    output::{dispatch, BroadcastSink, JsonLinesSink, TracingSink, Transcript, WordSink},
    tracking::{is_hand_open, HandFrame, HandPacket, HandReceiver},
    AppState,
};

/// signspell - turn fingerspelled letters from a hand tracker into words
#[derive(Parser, Debug)]
#[command(name = "signspell", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Hand tracker UDP port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Hand tracker listen address (overrides config)
    #[arg(long)]
    listen: Option<String>,

    /// Do not print word events to stdout
    #[arg(long)]
    no_json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for JSON events
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", signspell::NAME, signspell::VERSION);

    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        let state = setup_and_spawn_services(&args).await?;

        shutdown_signal().await;
        info!("Shutdown signal received");
        state.shutdown();

        // Give tasks a moment to clean up
        tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;
        anyhow::Ok(())
    })?;

    info!("signspell stopped");
    Ok(())
}

/// Setup config, create AppState, and spawn all background services.
async fn setup_and_spawn_services(args: &Args) -> anyhow::Result<Arc<AppState>> {
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.tracking.port = port;
    }
    if let Some(ref listen) = args.listen {
        config.tracking.listen_address = listen.clone();
    }
    if args.no_json {
        config.output.json_events = false;
    }

    config.validate()?;

    info!(
        "Gesture timing: cooldown {}ms, grace {}ms, window {} @ {:.0}% consensus",
        config.gesture.letter_cooldown_ms,
        config.gesture.no_hand_reset_ms,
        config.gesture.buffer_size,
        config.gesture.required_consensus * 100.0
    );

    let state = AppState::new(config.clone());

    if config.output.json_events {
        let printer_state = Arc::clone(&state);
        tokio::spawn(async move {
            run_event_printer(printer_state).await;
        });
    }

    let tracking_state = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(e) = run_hand_tracking(tracking_state).await {
            error!("Hand tracking error: {}", e);
        }
    });

    Ok(state)
}

/// Receive hand packets and drive the gesture engine
async fn run_hand_tracking(state: Arc<AppState>) -> anyhow::Result<()> {
    let config = state.config.read().await;
    let tracking_config = config.tracking.clone();
    let gesture_config = config.gesture.clone();
    let transcript_words = config.output.transcript_words;
    drop(config);

    let mut shutdown_rx = state.subscribe_shutdown();

    let mut receiver = HandReceiver::new(&tracking_config);
    receiver.start().await?;

    let mut engine = GestureEngine::with_system_clock(&gesture_config);
    let mut classifier = PacketClassifier::new();

    let mut log_sink = TracingSink;
    let mut broadcast_sink = BroadcastSink::new(state.event_tx.clone());
    let mut transcript = Transcript::new(transcript_words);

    let mut ticker = tokio::time::interval(gesture_config.tick_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    info!(
        "Hand tracking started (port: {}, tick: {}ms)",
        tracking_config.port, gesture_config.tick_interval_ms
    );

    loop {
        let events = tokio::select! {
            result = receiver.recv() => {
                match result {
                    Ok(packet) => handle_packet(packet, &mut engine, &mut classifier),
                    Err(e) => {
                        warn!("Hand receive error: {}", e);
                        Vec::new()
                    }
                }
            }
            _ = ticker.tick() => engine.tick().into_iter().collect(),
            _ = shutdown_rx.recv() => {
                info!("Hand tracking shutting down");
                break;
            }
        };

        if events.is_empty() {
            continue;
        }

        let sinks: &mut [&mut dyn WordSink] =
            &mut [&mut log_sink, &mut broadcast_sink, &mut transcript];
        dispatch(&events, sinks);

        if !transcript.sentence().is_empty() || !transcript.partial().is_empty() {
            debug!(
                "Transcript: \"{}\" + \"{}\"",
                transcript.sentence(),
                transcript.partial()
            );
        }
    }

    if !engine.word().is_empty() {
        info!("Discarding unfinished word: {}", engine.word());
    }
    receiver.stop();

    Ok(())
}

/// Feed one packet through the classifier and engine
fn handle_packet(
    packet: HandPacket,
    engine: &mut GestureEngine,
    classifier: &mut PacketClassifier,
) -> Vec<signspell::output::WordEvent> {
    let (frame, model_ready, prediction) = packet.into_frame();
    classifier.set_model_ready(model_ready);
    classifier.submit(prediction);

    let result = match frame {
        HandFrame::Absent => engine.process_frame(false, None, classifier),
        HandFrame::Present(points) => {
            if tracing::enabled!(Level::TRACE) {
                if let Ok(open) = is_hand_open(&points) {
                    tracing::trace!("Hand open: {}", open);
                }
            }
            engine.process_frame(true, Some(points.as_slice()), classifier)
        }
        HandFrame::Ambiguous(count) => {
            debug!("{} hands in frame, dropping", count);
            return Vec::new();
        }
    };

    match result {
        Ok(output) => {
            debug!("Frame: {:?} ({})", output.status, engine.state());
            output.events
        }
        Err(e) => {
            warn!("Dropped frame: {}", e);
            Vec::new()
        }
    }
}

/// Print word events to stdout as JSON lines
async fn run_event_printer(state: Arc<AppState>) {
    let mut events = state.subscribe_events();
    let mut shutdown_rx = state.subscribe_shutdown();
    let mut sink = JsonLinesSink::new(std::io::stdout());

    loop {
        tokio::select! {
            result = events.recv() => match result {
                Ok(event) => sink.handle(&event),
                Err(RecvError::Lagged(n)) => warn!("Event printer lagged, skipped {} events", n),
                Err(RecvError::Closed) => break,
            },
            _ = shutdown_rx.recv() => break,
        }
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
