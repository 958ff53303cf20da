//! CLI blackjack demo.

#![allow(clippy::missing_docs_in_private_items)]

use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use twentyone::{Advisor, BasicStrategyAdvisor, Game, GameOptions, MemoryStore, Outcome, Phase};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    println!("Blackjack demo (type 'q' to quit)");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let store = MemoryStore::new(1_000);
    let mut game = Game::new(GameOptions::default(), store, seed);
    let advisor = BasicStrategyAdvisor;

    loop {
        let balance = game.balance().await.unwrap_or(0);
        if balance == 0 {
            println!("You are out of chips. Game over.");
            break;
        }

        let Some(bet) = prompt_u64(&format!("Bet amount (1-{balance}, 0 to quit): ")) else {
            break;
        };
        if bet == 0 {
            println!("Goodbye.");
            break;
        }

        if let Err(err) = game.place_bet(bet).await {
            println!("Bet error: {err}");
            continue;
        }

        while game.phase() == Phase::PlayerTurn {
            print_table(&game);

            if let Some(round) = game.round() {
                if let Some(up) = round.dealer_hand.up_card() {
                    if let Ok(advice) = advisor.advise(&round.player_hand, up).await {
                        let call = if advice.should_hit { "hit" } else { "stand" };
                        println!("  (advisor says {call}: {})", advice.explanation);
                    }
                }
            }

            match prompt_line("Hit or stand? (h/s): ").as_str() {
                "h" | "hit" => {
                    if let Err(err) = game.hit().await {
                        println!("Hit error: {err}");
                    }
                }
                "s" | "stand" => {
                    if let Err(err) = game.stand().await {
                        println!("Stand error: {err}");
                    }
                }
                "q" => return,
                other => println!("Unknown input: {other}"),
            }
        }

        print_table(&game);
        if let Some(result) = game.result() {
            let label = match result {
                Outcome::Win => "You win!",
                Outcome::Blackjack => "Blackjack!",
                Outcome::Push => "Push.",
                Outcome::Lose => "You lose.",
            };
            let payout = game.round().and_then(|r| r.payout).unwrap_or(0);
            println!("{label} Net: {payout:+}");
        }

        if let Err(err) = game.new_round() {
            println!("Round error: {err}");
            break;
        }
    }
}

fn print_table<S: twentyone::RoundStore>(game: &Game<S>) {
    let Some(round) = game.round() else {
        return;
    };

    let dealer_done = round.phase != Phase::PlayerTurn;
    print!("Dealer: ");
    for card in round.dealer_hand.cards() {
        if card.revealed || dealer_done {
            print!("{card} ");
        } else {
            print!("?? ");
        }
    }
    if dealer_done {
        print!("({})", round.dealer_hand.value());
    } else {
        print!("({}+)", round.dealer_hand.visible_value());
    }
    println!();

    print!("You:    ");
    for card in round.player_hand.cards() {
        print!("{card} ");
    }
    println!("({})", round.player_hand.value());
}

fn prompt_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return "q".to_string();
    }
    line.trim().to_lowercase()
}

fn prompt_u64(prompt: &str) -> Option<u64> {
    loop {
        let line = prompt_line(prompt);
        if line == "q" {
            return None;
        }
        match line.parse() {
            Ok(value) => return Some(value),
            Err(_) => println!("Please enter a number."),
        }
    }
}
