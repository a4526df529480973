use rand::RngCore;
use reveal_core::{
    chained_shuffle, derive_seed, derive_unsalted_seed, shuffle_with_seed, standard_deck, Address,
    Card, GameKind, HashAlgorithm, OutcomeRenderer, OutcomeView, RevealConfig, Seed, SeedInput,
    SettledEvent, WheelGeometry, U256,
};
use std::collections::HashSet;

const GOLDEN_ORDER: [&str; 52] = [
    "5D", "JH", "TS", "4D", "JS", "9S", "6S", "9D", "2H", "3D", "2S", "8H", "AH", "TH", "3C", "AD",
    "AS", "7D", "2D", "5H", "7C", "KH", "KC", "8D", "QS", "4S", "AC", "9C", "TC", "6D", "KS", "TD",
    "4C", "JC", "QC", "8C", "8S", "6C", "3H", "6H", "3S", "7H", "JD", "QH", "7S", "9H", "4H", "2C",
    "QD", "KD", "5S", "5C",
];

fn golden_event() -> SettledEvent {
    SettledEvent {
        sequence_number: 42,
        player: "0x00000000000000000000000000000000000000aa".parse().unwrap(),
        stake_wei: U256::from(10_000_000_000_000_000u128),
        outcome_index: 3,
        payout_wei: U256::from(13_000_000_000_000_000u128),
    }
}

fn codes(cards: &[Card]) -> Vec<String> {
    cards.iter().map(|c| c.code()).collect()
}

#[test]
fn golden_deck_ordering() {
    let input = SeedInput::from_event(&golden_event(), U256::from(1u64));
    let seed = derive_seed(&input, HashAlgorithm::Keccak256);
    let shuffled = shuffle_with_seed(&seed, &standard_deck(), HashAlgorithm::Keccak256);
    assert_eq!(codes(&shuffled), GOLDEN_ORDER);
}

#[test]
fn golden_deal() {
    let renderer = OutcomeRenderer::new(RevealConfig::default()).unwrap();
    let view = renderer.render(GameKind::Poker, &golden_event(), 0.0).unwrap();
    let OutcomeView::Deal { seed, deal } = view else {
        panic!("expected a deal");
    };

    assert_eq!(
        seed.to_hex(),
        "0x71c3a4694857ac291d2951fb331e8cd22632e9fb3110e5de23a3e00d01b5bcc0"
    );
    assert_eq!(codes(&deal.hands[0]), ["5C", "5S"]);
    assert_eq!(codes(&deal.hands[1]), ["KD", "QD"]);
    assert_eq!(codes(&deal.community), ["2C", "4H", "9H", "7S", "QH"]);
}

#[test]
fn zero_event_vector() {
    let input = SeedInput {
        sequence_number: 0,
        outcome_index: 0,
        stake_wei: U256::ZERO,
        payout_wei: U256::ZERO,
        salt: U256::ZERO,
    };
    let seed = derive_seed(&input, HashAlgorithm::Keccak256);
    assert_eq!(
        seed.to_hex(),
        "0x3a5912a7c5faa06ee4fe906253e339467a9ce87d533c65be3c15cb231cdb25f9"
    );
    let shuffled = shuffle_with_seed(&seed, &standard_deck(), HashAlgorithm::Keccak256);
    assert_eq!(codes(&shuffled[..5]), ["3S", "6H", "7C", "5C", "4C"]);
}

#[test]
fn golden_mines_board() {
    let renderer = OutcomeRenderer::new(RevealConfig::default()).unwrap();
    let view = renderer.render(GameKind::Mines, &golden_event(), 0.0).unwrap();
    let OutcomeView::Grid { seed, board } = view else {
        panic!("expected a grid");
    };

    assert_eq!(
        seed.to_hex(),
        "0xcf1c8930c9bb72b969392a3f721188742fe0655fc9e6baf32bfa303a5c6554cd"
    );
    assert_eq!(
        board.order,
        [11, 0, 9, 2, 10, 13, 1, 14, 24, 21, 8, 6, 19, 12, 15, 23, 17, 20, 4, 16, 22, 5, 7, 18, 3]
    );
    assert_eq!(board.gems(), [0, 1, 2, 9, 10, 11, 13, 14, 24]);
    assert_eq!(board.mines().len(), 16);
}

#[test]
fn zero_event_mines_order() {
    let input = SeedInput {
        sequence_number: 0,
        outcome_index: 0,
        stake_wei: U256::ZERO,
        payout_wei: U256::ZERO,
        salt: U256::ZERO,
    };
    let seed = derive_unsalted_seed(&input, HashAlgorithm::Keccak256);
    assert_eq!(
        seed.to_hex(),
        "0xc24cd7564e291016870aca25c634ca9ab560c07c935b6c0fe3b559cbd3de7501"
    );
    assert_eq!(
        chained_shuffle(&seed, 25, HashAlgorithm::Keccak256),
        [14, 8, 10, 16, 13, 2, 22, 11, 17, 6, 5, 19, 3, 24, 9, 18, 7, 15, 0, 4, 1, 20, 21, 23, 12]
    );
}

#[test]
fn shuffle_is_always_a_permutation() {
    let deck = standard_deck();
    let source: HashSet<Card> = deck.iter().cloned().collect();
    let mut rng = rand::thread_rng();

    for _ in 0..200 {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        let seed = Seed::from_bytes(bytes);

        for hash in [HashAlgorithm::Keccak256, HashAlgorithm::Sha256] {
            let shuffled = shuffle_with_seed(&seed, &deck, hash);
            assert_eq!(shuffled.len(), 52);
            let seen: HashSet<Card> = shuffled.iter().cloned().collect();
            assert_eq!(seen, source);

            let mut order = chained_shuffle(&seed, 25, hash);
            order.sort_unstable();
            assert_eq!(order, (0..25).collect::<Vec<_>>());
        }
    }
}

#[test]
fn reload_reproduces_view() {
    // A page reload builds a fresh renderer from the same config.
    let first = OutcomeRenderer::new(RevealConfig::default()).unwrap();
    let second = OutcomeRenderer::new(RevealConfig::default()).unwrap();

    for game in [GameKind::Poker, GameKind::Wheel, GameKind::Mines] {
        let a = first.render(game, &golden_event(), 33.0).unwrap();
        let b = second.render(game, &golden_event(), 33.0).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn wheel_pointer_centers_every_segment() {
    let wheel = WheelGeometry::new(13).unwrap();
    let a = wheel.segment_angle();
    for i in 0..13u64 {
        let target = wheel.target_angle(i).unwrap();
        let pointer = (360.0 - target).rem_euclid(360.0);
        assert!((pointer - (i as f64 * a + a / 2.0)).abs() < 1e-9);
    }
}

#[test]
fn player_address_parsing_ignores_case() {
    let upper: Address = "0xABCDEF0000000000000000000000000000000001".parse().unwrap();
    let lower: Address = "0xabcdef0000000000000000000000000000000001".parse().unwrap();
    assert_eq!(upper, lower);
}
