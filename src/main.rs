//! Handshake Tour - terminal front-end.
//!
//! Reads one command per line from stdin and prints stage cards, deep dives
//! and chat turns to stdout as the tour runtime publishes them. Logs go to
//! stderr.

use std::io::{self, Write};

use handshake_tour::adapters::build_provider;
use handshake_tour::application::{TourError, TourHandle, TourRuntime, TourSnapshot};
use handshake_tour::config::AppConfig;
use handshake_tour::domain::chat::{ChatTurn, TurnRole};
use handshake_tour::domain::enrichment::EnrichmentDisplay;
use handshake_tour::domain::stage::{Direction, Stage};
use handshake_tour::telemetry::init_tracing;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

const HELP: &str = "commands: n/next  p/prev  r/reset  t/play  ask <question>  q/quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Next,
    Previous,
    Reset,
    TogglePlay,
    Ask(String),
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word.to_ascii_lowercase().as_str() {
            "n" | "next" => Some(Command::Next),
            "p" | "prev" => Some(Command::Previous),
            "r" | "reset" => Some(Command::Reset),
            "t" | "play" => Some(Command::TogglePlay),
            "ask" => Some(Command::Ask(rest.to_string())),
            "q" | "quit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Remembers what has already been printed so each publish only shows news.
#[derive(Debug, Default)]
struct TerminalView {
    stage: Option<Stage>,
    playing: bool,
    enrichment: Option<EnrichmentDisplay>,
    turns_shown: usize,
    chat_pending: bool,
}

impl TerminalView {
    fn render(&mut self, snapshot: &TourSnapshot, out: &mut impl Write) -> io::Result<()> {
        let stage = snapshot.playback.stage();
        let playing = snapshot.playback.is_auto_advancing();

        if self.stage != Some(stage) {
            write_card(snapshot, out)?;
        } else if self.playing != playing {
            writeln!(out, "  [{}]", if playing { "playing" } else { "paused" })?;
        }
        self.stage = Some(stage);
        self.playing = playing;

        if self.enrichment.as_ref() != Some(&snapshot.enrichment) {
            writeln!(out, "  deep dive: {}", snapshot.enrichment.text)?;
            self.enrichment = Some(snapshot.enrichment.clone());
        }

        for turn in snapshot.transcript.iter().skip(self.turns_shown) {
            writeln!(out, "{}", turn_line(turn))?;
        }
        self.turns_shown = snapshot.transcript.len();

        if snapshot.chat_pending && !self.chat_pending {
            writeln!(out, "  guide is thinking...")?;
        }
        self.chat_pending = snapshot.chat_pending;

        out.flush()
    }
}

fn write_card(snapshot: &TourSnapshot, out: &mut impl Write) -> io::Result<()> {
    let metadata = snapshot.metadata;
    let render = &snapshot.render;
    let arrow = match render.direction {
        Direction::ToPeer => "client -> server",
        Direction::ToClient => "server -> client",
        Direction::Bidirectional => "client <-> server",
        Direction::NoTraffic => "no traffic",
    };
    let state = if snapshot.playback.is_auto_advancing() {
        "playing"
    } else {
        "paused"
    };

    writeln!(out)?;
    writeln!(
        out,
        "[{}/{}] {} ({}) [{}]",
        snapshot.playback.current_index() + 1,
        Stage::COUNT,
        metadata.title,
        arrow,
        state
    )?;
    writeln!(out, "  {}", metadata.description)?;
    for fact in metadata.facts {
        writeln!(out, "   - {fact}")?;
    }
    writeln!(out, "  analogy: {}", metadata.analogy)?;
    writeln!(out, "  why: {}", metadata.rationale)?;
    writeln!(
        out,
        "  client key: {}  server key: {}  certificate: {}  session keys: {}  tunnel: {}",
        flag(render.client_key_visible),
        flag(render.server_key_visible),
        flag(render.certificate_presented),
        flag(render.keys_established),
        flag(render.tunnel_active),
    )
}

fn turn_line(turn: &ChatTurn) -> String {
    let speaker = match (turn.role(), turn.failed()) {
        (TurnRole::Asker, _) => "you",
        (TurnRole::Responder, false) => "guide",
        (TurnRole::Responder, true) => "guide (unavailable)",
    };
    let time = turn.created_at().as_datetime().format("%H:%M:%S");
    format!("  {time} {speaker}: {}", turn.text())
}

fn flag(on: bool) -> &'static str {
    if on {
        "yes"
    } else {
        "no"
    }
}

async fn dispatch(handle: &TourHandle, command: Command) -> Result<(), TourError> {
    match command {
        Command::Next => handle.advance().await.map(drop),
        Command::Previous => handle.retreat().await.map(drop),
        Command::Reset => handle.reset().await.map(drop),
        Command::TogglePlay => handle.toggle_play().await.map(drop),
        Command::Ask(question) => handle.ask(question).await,
        Command::Quit => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging)?;

    let provider = build_provider(&config.ai)?;
    let handle = TourRuntime::spawn(provider, &config.playback);
    info!(session_id = %handle.snapshot().session_id, "Starting handshake tour");

    let mut snapshots = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut view = TerminalView::default();
    let mut stdout = io::stdout();

    println!("{HELP}");
    view.render(&snapshots.borrow_and_update().clone(), &mut stdout)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Some(Command::Quit) => break,
                    Some(command) => {
                        if let Err(e) = dispatch(&handle, command).await {
                            println!("  {e}");
                        }
                    }
                    None => println!("{HELP}"),
                }
            }

            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                view.render(&snapshot, &mut stdout)?;
            }
        }
    }

    handle.shutdown().await?;
    Ok(())
}
