use crate::config::CliConfig;
use anyhow::Result;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use reveal_core::{
    derive_seed, format_ether, parse_ether, parse_wei, Address, Card, GameKind, HashAlgorithm,
    MinesBoard, OutcomeRenderer, OutcomeView, RevealConfig, SeedInput, SettledEvent,
    SettlementSummary, U256,
};
use std::time::Duration;

/// Fields of a settled event, as typed on the command line.
#[derive(Args, Debug, Clone)]
pub struct EventArgs {
    /// Sequence number assigned by the Entropy contract
    #[arg(long)]
    pub seq: u64,
    /// Outcome index (bin) from the settled event
    #[arg(long)]
    pub outcome: u8,
    /// Stake in wei, or with an `eth` suffix (e.g. 0.01eth)
    #[arg(long, value_parser = parse_amount)]
    pub stake: U256,
    /// Payout in wei, or with an `eth` suffix
    #[arg(long, value_parser = parse_amount)]
    pub payout: U256,
    /// Entropy fee paid on top of the stake
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub fee: U256,
    /// Override the configured salt
    #[arg(long)]
    pub salt: Option<u64>,
    /// Override the configured hash (keccak256, sha256)
    #[arg(long)]
    pub hash: Option<HashAlgorithm>,
}

impl EventArgs {
    fn settled(&self) -> SettledEvent {
        SettledEvent {
            sequence_number: self.seq,
            player: Address::ZERO,
            stake_wei: self.stake,
            outcome_index: self.outcome,
            payout_wei: self.payout,
        }
    }

    fn reveal_config(&self, base: &RevealConfig) -> RevealConfig {
        let mut config = base.clone();
        if let Some(salt) = self.salt {
            config.salt = salt;
        }
        if let Some(hash) = self.hash {
            config.hash = hash;
        }
        config
    }
}

pub fn parse_amount(s: &str) -> std::result::Result<U256, String> {
    let s = s.trim().to_ascii_lowercase();
    let parsed = match s.strip_suffix("eth") {
        Some(eth) => parse_ether(eth),
        None => parse_wei(s.strip_suffix("wei").unwrap_or(&s)),
    };
    parsed.map_err(|e| e.to_string())
}

pub fn handle_seed(args: &EventArgs, config: &CliConfig) -> Result<()> {
    let reveal = args.reveal_config(&config.reveal);
    let input = SeedInput::from_event(&args.settled(), U256::from(reveal.salt));
    let seed = derive_seed(&input, reveal.hash);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    let rows = [
        ("Sequence", args.seq.to_string()),
        ("Outcome", args.outcome.to_string()),
        ("Stake (wei)", args.stake.to_string()),
        ("Payout (wei)", args.payout.to_string()),
        ("Salt", reveal.salt.to_string()),
        ("Hash", format!("{:?}", reveal.hash)),
        ("Preimage", format!("0x{}", hex::encode(input.to_bytes()))),
        ("Seed", seed.to_hex()),
    ];
    for (field, value) in rows {
        table.add_row(vec![field.to_string(), value]);
    }
    println!("{table}");

    Ok(())
}

pub fn handle_deal(args: &EventArgs, config: &CliConfig) -> Result<()> {
    let renderer = OutcomeRenderer::new(args.reveal_config(&config.reveal))?;
    let event = args.settled();
    let OutcomeView::Deal { seed, deal } = renderer.render(GameKind::Poker, &event, 0.0)? else {
        anyhow::bail!("renderer returned a non-deal view");
    };

    println!("Seed: {}", seed);
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Seat", "Cards"]);
    for (i, hand) in deal.hands.iter().enumerate() {
        table.add_row(vec![format!("Player {}", i + 1), cards(hand)]);
    }
    table.add_row(vec!["Community".to_string(), cards(&deal.community)]);
    println!("{table}");

    print_summary(&event, args.fee, &renderer);
    Ok(())
}

pub fn handle_wheel(
    args: &EventArgs,
    segments: Option<u16>,
    from: f64,
    config: &CliConfig,
) -> Result<()> {
    let mut reveal = args.reveal_config(&config.reveal);
    if let Some(segments) = segments {
        reveal.wheel_segments = segments;
        if reveal.paytable.bins() != segments as usize {
            tracing::warn!(
                "Paytable has {} bins, ignoring it for a {}-segment wheel",
                reveal.paytable.bins(),
                segments
            );
            reveal.paytable.0.clear();
        }
    }
    let renderer = OutcomeRenderer::new(reveal)?;
    let event = args.settled();
    let OutcomeView::Wheel {
        segment,
        target_angle,
        plan,
    } = renderer.render(GameKind::Wheel, &event, from)?
    else {
        anyhow::bail!("renderer returned a non-wheel view");
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Segments".to_string(), renderer.wheel().segments().to_string()]);
    table.add_row(vec![
        "Segment angle".to_string(),
        format!("{:.4}°", renderer.wheel().segment_angle()),
    ]);
    table.add_row(vec!["Segment".to_string(), segment.to_string()]);
    table.add_row(vec!["Target angle".to_string(), format!("{:.4}°", target_angle)]);
    table.add_row(vec!["Start".to_string(), format!("{:.4}°", plan.start)]);
    table.add_row(vec![
        "Total rotation".to_string(),
        format!("{:.4}°", plan.total_rotation),
    ]);
    table.add_row(vec![
        "Duration".to_string(),
        format!("{} ms", plan.duration.as_millis()),
    ]);
    println!("{table}");

    let mut frames = Table::new();
    frames.load_preset(UTF8_FULL);
    frames.set_header(vec!["t (ms)", "Angle", "Under pointer"]);
    let total_ms = plan.duration.as_millis() as u64;
    for step in 0..=4u64 {
        let t = Duration::from_millis(total_ms * step / 4);
        let angle = plan.angle_at(t);
        frames.add_row(vec![
            t.as_millis().to_string(),
            format!("{:.4}°", angle),
            renderer.wheel().segment_under_pointer(angle).to_string(),
        ]);
    }
    println!("{frames}");

    print_summary(&event, args.fee, &renderer);
    Ok(())
}

pub fn handle_mines(args: &EventArgs, config: &CliConfig) -> Result<()> {
    let renderer = OutcomeRenderer::new(args.reveal_config(&config.reveal))?;
    let event = args.settled();
    let OutcomeView::Grid { seed, board } = renderer.render(GameKind::Mines, &event, 0.0)? else {
        anyhow::bail!("renderer returned a non-grid view");
    };

    println!("Seed: {} (unsalted)", seed);
    println!("{}", grid(&board));

    let interval = renderer.config().mines.reveal_interval;
    let order: Vec<String> = board.order.iter().map(|t| t.to_string()).collect();
    println!(
        "{} gems, {} mines. Flip order every {} ms: {}",
        board.gem_count,
        board.grid_size() - board.gem_count,
        interval.as_millis(),
        order.join(" ")
    );

    print_summary(&event, args.fee, &renderer);
    Ok(())
}

/// Square-ish table of tiles, gems marked with `◆`.
fn grid(board: &MinesBoard) -> Table {
    let n = board.grid_size();
    let cols = ((n as f64).sqrt().ceil() as usize).max(1);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    for row in (0..n).collect::<Vec<_>>().chunks(cols) {
        table.add_row(
            row.iter()
                .map(|&tile| {
                    let mark = if board.is_gem(tile) { "◆" } else { "·" };
                    format!("{} {:>2}", mark, tile)
                })
                .collect::<Vec<_>>(),
        );
    }
    table
}

fn print_summary(event: &SettledEvent, fee: U256, renderer: &OutcomeRenderer) {
    let summary = SettlementSummary::new(event, fee, &renderer.config().paytable);
    println!(
        "{}: paid {} ETH on {} ETH at x{:.4} (net {} ETH)",
        if summary.is_win() { "Win" } else { "Loss" },
        format_ether(summary.payout_wei),
        format_ether(summary.stake_wei),
        summary.multiplier,
        summary.pnl_net.format_ether()
    );
    if let Some(advertised) = summary.advertised_multiplier {
        if (advertised - summary.multiplier).abs() > 1e-9 {
            tracing::warn!(
                "Bin {} advertises x{} but the event pays x{:.4}",
                summary.outcome_index,
                advertised,
                summary.multiplier
            );
        }
    }
}

fn cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_units() {
        assert_eq!(
            parse_amount("0.01eth").unwrap(),
            U256::from(10_000_000_000_000_000u128)
        );
        assert_eq!(parse_amount("1500").unwrap(), U256::from(1500u64));
        assert_eq!(parse_amount("1500 wei").unwrap(), U256::from(1500u64));
        assert_eq!(parse_amount("0x10").unwrap(), U256::from(16u64));
        assert!(parse_amount("lots").is_err());
    }

    #[test]
    fn test_grid_marks_gems() {
        let renderer = OutcomeRenderer::new(RevealConfig::default()).unwrap();
        let args = EventArgs {
            seq: 42,
            outcome: 3,
            stake: U256::from(10_000_000_000_000_000u128),
            payout: U256::from(13_000_000_000_000_000u128),
            fee: U256::ZERO,
            salt: None,
            hash: None,
        };
        let OutcomeView::Grid { board, .. } = renderer
            .render(GameKind::Mines, &args.settled(), 0.0)
            .unwrap()
        else {
            panic!("expected a grid");
        };
        let rendered = grid(&board).to_string();
        assert_eq!(rendered.matches('◆').count(), 9);
        assert_eq!(rendered.matches('·').count(), 16);
    }

    #[test]
    fn test_overrides_apply() {
        let args = EventArgs {
            seq: 1,
            outcome: 0,
            stake: U256::ZERO,
            payout: U256::ZERO,
            fee: U256::ZERO,
            salt: Some(7),
            hash: Some(HashAlgorithm::Sha256),
        };
        let config = args.reveal_config(&RevealConfig::default());
        assert_eq!(config.salt, 7);
        assert_eq!(config.hash, HashAlgorithm::Sha256);
    }
}
