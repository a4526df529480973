use crate::config::CliConfig;
use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use reveal_core::{Address, GameKind, OutcomeView};
use reveal_session::{RevealEffect, RevealInput, RevealSession, SessionConfig, SessionDriver};
use std::path::Path;

/// Read a JSON array of timestamped inputs.
pub fn load_inputs(path: &Path) -> Result<Vec<RevealInput>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn session_config(
    config: &CliConfig,
    player: Option<Address>,
    game: Option<GameKind>,
) -> Result<SessionConfig> {
    let player = player
        .or(config.player)
        .context("no player given; pass --player or set it in the config file")?;

    let mut session = SessionConfig::new(player, game.unwrap_or(config.game));
    session.acceptance_timeout = config.acceptance_timeout;
    session.settlement_timeout = config.settlement_timeout;
    session.reveal = config.reveal.clone();
    Ok(session)
}

/// Run every input through a session on its own task and collect the effects.
pub async fn run(
    session: RevealSession,
    inputs: Vec<RevealInput>,
) -> Result<(RevealSession, Vec<RevealEffect>)> {
    let (driver, mut effects) = SessionDriver::spawn(session, 64);
    let collector = tokio::spawn(async move {
        let mut out = Vec::new();
        while let Some(effect) = effects.recv().await {
            out.push(effect);
        }
        out
    });

    for input in inputs {
        driver.send(input).await?;
    }
    let session = driver.shutdown().await?;
    let effects = collector.await?;
    Ok((session, effects))
}

pub async fn handle_replay(
    log: &Path,
    player: Option<Address>,
    game: Option<GameKind>,
    config: &CliConfig,
) -> Result<()> {
    let inputs = load_inputs(log)?;
    let session = RevealSession::new(session_config(config, player, game)?)?;
    println!(
        "Replaying {} inputs from {} ({} session {})",
        inputs.len(),
        log.display(),
        session.config().game,
        session.id()
    );

    let (session, effects) = run(session, inputs).await?;
    if effects.is_empty() {
        println!("No effects produced.");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["#", "Effect", "Detail"]);
        for (i, effect) in effects.iter().enumerate() {
            let (name, detail) = describe(effect);
            table.add_row(vec![(i + 1).to_string(), name.to_string(), detail]);
        }
        println!("{table}");
    }

    let snapshot = session.snapshot();
    println!(
        "Final phase: {} (rotation {:.4}°)",
        snapshot.phase, snapshot.rotation
    );
    Ok(())
}

fn describe(effect: &RevealEffect) -> (&'static str, String) {
    match effect {
        RevealEffect::Submitted { stake_wei, fee_wei } => (
            "submitted",
            format!("stake {} wei, fee {} wei", stake_wei, fee_wei),
        ),
        RevealEffect::Accepted {
            sequence_number,
            replaced,
        } => match replaced {
            Some(old) => ("accepted", format!("seq {} (replaces {})", sequence_number, old)),
            None => ("accepted", format!("seq {}", sequence_number)),
        },
        RevealEffect::Reveal {
            sequence_number,
            view,
            summary,
        } => {
            let shown = match view {
                OutcomeView::Deal { deal, .. } => {
                    let hands: Vec<String> = deal
                        .hands
                        .iter()
                        .map(|h| h.iter().map(|c| c.code()).collect::<Vec<_>>().join(" "))
                        .collect();
                    let community: Vec<String> = deal.community.iter().map(|c| c.code()).collect();
                    format!("hands [{}] board [{}]", hands.join(" | "), community.join(" "))
                }
                OutcomeView::Wheel {
                    segment,
                    target_angle,
                    ..
                } => format!("segment {} at {:.4}°", segment, target_angle),
                OutcomeView::Grid { board, .. } => {
                    let gems: Vec<String> = board.gems().iter().map(|t| t.to_string()).collect();
                    format!("gems [{}] of {}", gems.join(" "), board.grid_size())
                }
            };
            (
                "reveal",
                format!(
                    "seq {}: {}, x{:.4}",
                    sequence_number, shown, summary.multiplier
                ),
            )
        }
        RevealEffect::Completed { sequence_number } => {
            ("completed", format!("seq {}", sequence_number))
        }
        RevealEffect::Fault { fault } => ("fault", fault.to_string()),
    }
}
