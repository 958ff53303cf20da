//! Game integration tests.

use twentyone::{
    ActionError, BetError, Card, Game, GameOptions, GameRound, Hand, HitMode, MemoryStore, Outcome,
    Phase, Rank, RoundStore, StartedRound, StoreError, Suit,
};

const fn card(rank: Rank) -> Card {
    Card::new(rank, Suit::Spades)
}

fn rig<S: RoundStore>(game: &mut Game<S>, ranks: &[Rank]) {
    let cards: Vec<Card> = ranks.iter().map(|&rank| card(rank)).collect();
    game.shoe.stack(&cards);
}

fn new_game(balance: u64) -> Game<MemoryStore> {
    Game::new(GameOptions::default(), MemoryStore::new(balance), 1)
}

/// Store wrapper that fails a configurable number of settlement writes.
struct FlakyStore {
    inner: MemoryStore,
    finish_failures: u32,
}

impl RoundStore for FlakyStore {
    async fn start_round(&mut self, bet: u64) -> Result<StartedRound, StoreError> {
        self.inner.start_round(bet).await
    }

    async fn update_round(&mut self, round: &GameRound) -> Result<(), StoreError> {
        self.inner.update_round(round).await
    }

    async fn finish_round(&mut self, round: &GameRound) -> Result<u64, StoreError> {
        if self.finish_failures > 0 {
            self.finish_failures -= 1;
            return Err(StoreError::Backend("injected failure".into()));
        }
        self.inner.finish_round(round).await
    }

    async fn active_round(&self) -> Result<Option<GameRound>, StoreError> {
        self.inner.active_round().await
    }

    async fn history_page(&self, page: usize, size: usize) -> Result<Vec<GameRound>, StoreError> {
        self.inner.history_page(page, size).await
    }

    async fn balance(&self) -> Result<u64, StoreError> {
        self.inner.balance().await
    }
}

#[tokio::test]
async fn bet_validation_failures_leave_state_untouched() {
    let mut game = new_game(1_000);

    assert!(matches!(
        game.place_bet(0).await.unwrap_err(),
        BetError::InvalidAmount
    ));
    assert!(matches!(
        game.place_bet(2_000).await.unwrap_err(),
        BetError::InsufficientBalance
    ));

    assert_eq!(game.phase(), Phase::Idle);
    assert!(game.round().is_none());
    assert_eq!(game.balance().await.unwrap(), 1_000);
    assert!(game.history_page(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn bet_debits_balance_and_deals_opening_hands() {
    let mut game = new_game(1_000);
    rig(&mut game, &[Rank::Ten, Rank::Six, Rank::Nine, Rank::Seven]);

    game.place_bet(100).await.unwrap();

    assert_eq!(game.balance().await.unwrap(), 900);
    assert_eq!(game.phase(), Phase::PlayerTurn);

    let round = game.round().unwrap();
    assert_eq!(round.bet, 100);
    assert_eq!(round.player_hand.len(), 2);
    assert_eq!(round.dealer_hand.len(), 2);

    // Exactly one concealed dealer card: the hole card.
    let hidden: Vec<&Card> = round
        .dealer_hand
        .cards()
        .iter()
        .filter(|c| !c.revealed)
        .collect();
    assert_eq!(hidden.len(), 1);
    assert_eq!(round.dealer_hand.visible_value(), 9);
    assert_eq!(round.dealer_hand.value(), 16);
}

#[tokio::test]
async fn busting_hit_loses_without_credit() {
    let mut game = new_game(1_000);
    rig(
        &mut game,
        &[Rank::Ten, Rank::Nine, Rank::Seven, Rank::Eight, Rank::Five],
    );

    game.place_bet(100).await.unwrap();
    assert_eq!(game.round().unwrap().player_hand.value(), 19);

    let drawn = game.hit().await.unwrap();
    assert_eq!(drawn.rank, Rank::Five);

    let round = game.round().unwrap();
    assert_eq!(round.player_hand.value(), 24);
    assert_eq!(round.phase, Phase::Finished);
    assert_eq!(round.result, Some(Outcome::Lose));
    assert_eq!(round.payout, Some(-100));
    assert!(game.is_settled());

    // Bet already debited; no credit on a loss.
    assert_eq!(game.balance().await.unwrap(), 900);
}

#[tokio::test]
async fn dealer_draws_to_seventeen_and_stops() {
    let mut game = new_game(1_000);
    rig(
        &mut game,
        &[Rank::Ten, Rank::Ten, Rank::Nine, Rank::Seven, Rank::Two],
    );

    game.place_bet(100).await.unwrap();
    let outcome = game.stand().await.unwrap();

    let round = game.round().unwrap();
    // 9 + 7 = 16 draws exactly one card to reach 18, then stands.
    assert_eq!(round.dealer_hand.len(), 3);
    assert_eq!(round.dealer_hand.value(), 18);
    assert!(round.dealer_hand.cards().iter().all(|c| c.revealed));

    assert_eq!(outcome, Outcome::Win);
    assert_eq!(round.payout, Some(100));
    assert_eq!(game.balance().await.unwrap(), 1_100);
}

#[tokio::test]
async fn twenty_beats_dealer_nineteen_for_double_credit() {
    let mut game = new_game(1_000);
    rig(&mut game, &[Rank::Ten, Rank::Ten, Rank::Nine, Rank::Ten]);

    game.place_bet(100).await.unwrap();
    let outcome = game.stand().await.unwrap();

    assert_eq!(outcome, Outcome::Win);
    // 2x the bet comes back: 1000 - 100 + 200.
    assert_eq!(game.balance().await.unwrap(), 1_100);
}

#[tokio::test]
async fn equal_totals_push_and_return_the_bet() {
    let mut game = new_game(1_000);
    rig(&mut game, &[Rank::Ten, Rank::Nine, Rank::Nine, Rank::Ten]);

    game.place_bet(100).await.unwrap();
    let outcome = game.stand().await.unwrap();

    assert_eq!(outcome, Outcome::Push);
    assert_eq!(game.round().unwrap().payout, Some(0));
    assert_eq!(game.balance().await.unwrap(), 1_000);
}

#[tokio::test]
async fn player_natural_resolves_before_the_player_turn() {
    let mut game = new_game(1_000);
    rig(&mut game, &[Rank::Ace, Rank::King, Rank::Nine, Rank::Seven]);

    game.place_bet(100).await.unwrap();

    let round = game.round().unwrap();
    assert_eq!(round.phase, Phase::Finished);
    assert_eq!(round.result, Some(Outcome::Blackjack));
    // Bonus: floor(100 * 1.5); credit is bet + bonus.
    assert_eq!(round.payout, Some(150));
    assert!(round.dealer_hand.cards().iter().all(|c| c.revealed));
    assert_eq!(game.balance().await.unwrap(), 1_150);

    assert!(matches!(
        game.hit().await.unwrap_err(),
        ActionError::InvalidState {
            phase: Phase::Finished,
            ..
        }
    ));
}

#[tokio::test]
async fn mutual_naturals_push() {
    let mut game = new_game(1_000);
    rig(&mut game, &[Rank::Ace, Rank::King, Rank::Ace, Rank::Queen]);

    game.place_bet(100).await.unwrap();

    let round = game.round().unwrap();
    assert_eq!(round.result, Some(Outcome::Push));
    assert_eq!(round.payout, Some(0));
    assert_eq!(game.balance().await.unwrap(), 1_000);
}

#[tokio::test]
async fn multi_hit_mode_allows_repeated_hits() {
    let mut game = new_game(1_000);
    rig(
        &mut game,
        &[
            Rank::Two,
            Rank::Three,
            Rank::Ten,
            Rank::Nine,
            Rank::Four,
            Rank::Five,
        ],
    );

    game.place_bet(100).await.unwrap();

    game.hit().await.unwrap();
    assert_eq!(game.phase(), Phase::PlayerTurn);
    game.hit().await.unwrap();
    assert_eq!(game.phase(), Phase::PlayerTurn);
    assert_eq!(game.round().unwrap().player_hand.value(), 14);

    let outcome = game.stand().await.unwrap();
    assert_eq!(outcome, Outcome::Lose);
}

#[tokio::test]
async fn single_hit_mode_hands_the_round_to_the_dealer() {
    let options = GameOptions::default().with_hit_mode(HitMode::Single);
    let mut game = Game::new(options, MemoryStore::new(1_000), 1);
    rig(
        &mut game,
        &[
            Rank::Two,
            Rank::Three,
            Rank::Ten,
            Rank::Six,
            Rank::Five,
            Rank::Four,
        ],
    );

    game.place_bet(100).await.unwrap();
    game.hit().await.unwrap();

    let round = game.round().unwrap();
    assert_eq!(round.phase, Phase::Finished);
    assert_eq!(round.result, Some(Outcome::Lose));
    assert_eq!(round.dealer_hand.value(), 20);
}

#[tokio::test]
async fn illegal_transitions_are_rejected_without_mutation() {
    let mut game = new_game(1_000);

    assert!(matches!(game.hit().await.unwrap_err(), ActionError::NoRound));
    assert!(matches!(
        game.stand().await.unwrap_err(),
        ActionError::NoRound
    ));
    assert!(matches!(game.new_round().unwrap_err(), ActionError::NoRound));

    rig(&mut game, &[Rank::Ten, Rank::Six, Rank::Nine, Rank::Ten]);
    game.place_bet(100).await.unwrap();

    assert!(matches!(
        game.place_bet(50).await.unwrap_err(),
        BetError::InvalidState(Phase::PlayerTurn)
    ));
    assert!(matches!(
        game.new_round().unwrap_err(),
        ActionError::InvalidState {
            phase: Phase::PlayerTurn,
            ..
        }
    ));
    assert_eq!(game.round().unwrap().player_hand.len(), 2);

    game.stand().await.unwrap();
    assert!(matches!(
        game.place_bet(50).await.unwrap_err(),
        BetError::InvalidState(Phase::Finished)
    ));
    assert!(matches!(
        game.stand().await.unwrap_err(),
        ActionError::InvalidState {
            phase: Phase::Finished,
            ..
        }
    ));

    game.new_round().unwrap();
    assert_eq!(game.phase(), Phase::Idle);
    assert!(game.round().is_none());
}

#[tokio::test]
async fn finished_round_survives_the_store_round_trip() {
    let mut game = new_game(1_000);
    rig(&mut game, &[Rank::Ten, Rank::Ten, Rank::Nine, Rank::Ten]);

    game.place_bet(100).await.unwrap();
    game.stand().await.unwrap();

    let in_memory = game.round().unwrap().clone();
    let from_store = game.history_page(0).await.unwrap();
    assert_eq!(from_store.len(), 1);
    // Full tuple fidelity: bet, hands, phase, result, payout.
    assert_eq!(from_store[0], in_memory);

    // The same record survives another serialization pass unchanged.
    let json = serde_json::to_string(&in_memory).unwrap();
    let reparsed: GameRound = serde_json::from_str(&json).unwrap();
    assert_eq!(reparsed, in_memory);
}

#[tokio::test]
async fn cards_serialize_with_glyph_suits_and_short_ranks() {
    let json = serde_json::to_string(&card(Rank::Ace)).unwrap();
    assert!(json.contains("\"A\""));
    assert!(json.contains("♠"));

    let hand: Hand = serde_json::from_str(r#"[{"rank":"10","suit":"♥","revealed":true}]"#).unwrap();
    assert_eq!(hand.value(), 10);
}

#[tokio::test]
async fn resume_adopts_the_stored_active_round() {
    let mut store = MemoryStore::new(1_000);
    let started = store.start_round(100).await.unwrap();

    let mut active = store.active_round().await.unwrap().unwrap();
    assert_eq!(active.id, started.id);
    active.player_hand.push(card(Rank::Ten));
    active.player_hand.push(card(Rank::Five));
    active.dealer_hand.push(card(Rank::Nine));
    active.dealer_hand.push(card(Rank::Seven).face_down());
    store.update_round(&active).await.unwrap();

    let mut game = Game::new(GameOptions::default(), store, 1);
    let resumed = game.resume().await.unwrap().unwrap();
    assert_eq!(resumed.id, started.id);
    assert_eq!(resumed.player_hand.value(), 15);
    assert_eq!(game.phase(), Phase::PlayerTurn);

    // The adopted round plays out normally.
    rig(&mut game, &[Rank::Two]);
    game.stand().await.unwrap();
    assert_eq!(game.phase(), Phase::Finished);
}

#[tokio::test]
async fn resume_surfaces_malformed_stored_records() {
    let mut store = MemoryStore::new(1_000);
    store.insert_raw_row("{ this is not a round }");

    let mut game = Game::new(GameOptions::default(), store, 1);
    assert!(matches!(
        game.resume().await.unwrap_err(),
        ActionError::Store(StoreError::MalformedRecord(_))
    ));
}

#[tokio::test]
async fn store_rejects_a_second_concurrent_round() {
    let mut store = MemoryStore::new(1_000);
    let started = store.start_round(100).await.unwrap();
    assert_eq!(started.balance_after, 900);

    let mut game = Game::new(GameOptions::default(), store, 1);
    assert!(matches!(
        game.place_bet(50).await.unwrap_err(),
        BetError::Store(StoreError::ActiveRoundExists(id)) if id == started.id
    ));
}

#[tokio::test]
async fn failed_settlement_is_surfaced_and_retryable() {
    let store = FlakyStore {
        inner: MemoryStore::new(1_000),
        finish_failures: 1,
    };
    let mut game = Game::new(GameOptions::default(), store, 1);
    rig(&mut game, &[Rank::Ten, Rank::Ten, Rank::Nine, Rank::Ten]);

    game.place_bet(100).await.unwrap();
    assert!(matches!(
        game.stand().await.unwrap_err(),
        ActionError::Store(StoreError::Backend(_))
    ));

    // Outcome computed and kept in memory, but not yet paid out.
    let round = game.round().unwrap();
    assert_eq!(round.phase, Phase::Finished);
    assert_eq!(round.result, Some(Outcome::Win));
    assert_eq!(round.payout, Some(100));
    assert!(!game.is_settled());
    assert_eq!(game.balance().await.unwrap(), 900);

    assert!(matches!(
        game.new_round().unwrap_err(),
        ActionError::Unsettled
    ));

    game.retry_settle().await.unwrap();
    assert!(game.is_settled());
    assert_eq!(game.balance().await.unwrap(), 1_100);

    // Retrying a settled round is a no-op; the credit is never doubled.
    game.retry_settle().await.unwrap();
    assert_eq!(game.balance().await.unwrap(), 1_100);

    game.new_round().unwrap();
    assert_eq!(game.phase(), Phase::Idle);
}

#[tokio::test]
async fn history_pages_are_newest_first() {
    let options = GameOptions::default().with_history_page_size(2);
    let mut game = Game::new(options, MemoryStore::new(10_000), 1);

    for _ in 0..3 {
        rig(&mut game, &[Rank::Ten, Rank::Ten, Rank::Nine, Rank::Ten]);
        game.place_bet(100).await.unwrap();
        game.stand().await.unwrap();
        game.new_round().unwrap();
    }

    let page0 = game.history_page(0).await.unwrap();
    let page1 = game.history_page(1).await.unwrap();
    assert_eq!(page0.len(), 2);
    assert_eq!(page1.len(), 1);
    assert!(page0[0].id > page0[1].id);
    assert!(page0[1].id > page1[0].id);
}
