use hotseat_core::{
    Category, CategoryCatalog, CountdownState, DeckError, Event, Game, GameError, GamePhase,
    OrchestrationError, RoundNumber, Settings, Theme, TimerEventKind, ValidationError,
};

fn catalog() -> CategoryCatalog {
    let names = ["Animals", "Food", "Movies"];
    CategoryCatalog::new(
        names
            .iter()
            .map(|name| Category {
                category: name.to_string(),
                color: String::new(),
                themes: (0..12)
                    .map(|idx| Theme::new(*name, format!("{name} {idx}")))
                    .collect(),
            })
            .collect(),
    )
}

fn new_game(players: &[&str]) -> Game {
    let mut game = Game::new(catalog(), Settings::default(), 7);
    for name in players {
        game.add_player(name).expect("add player");
    }
    game
}

fn started_game(players: &[&str]) -> Game {
    let mut game = new_game(players);
    game.start_game().expect("start game");
    game
}

fn err<T: std::fmt::Debug>(result: Result<T, GameError>) -> GameError {
    result.expect_err("action must fail")
}

/// Ends every turn immediately until the round result is shown.
fn play_out_round(game: &mut Game) {
    loop {
        match game.phase() {
            GamePhase::RoundInstruction { needs_setup: false } => {
                game.set_phase(GamePhase::PlayerInstruction)
                    .expect("to player instruction");
            }
            GamePhase::PlayerInstruction => game.start_turn().expect("start turn"),
            GamePhase::Playing => game.end_turn().expect("end turn"),
            GamePhase::PlayerTurnResult => game.advance_to_next_player().expect("next player"),
            GamePhase::RoundResult => break,
            other => panic!("unexpected phase {other:?}"),
        }
    }
}

fn deal_personal_cards(game: &mut Game) {
    while game.personal_card_candidate().is_some() {
        game.generate_personal_card("Animals")
            .expect("personal card");
    }
    assert_eq!(
        game.phase(),
        GamePhase::RoundInstruction { needs_setup: false }
    );
}

#[test]
fn rejects_invalid_names() {
    let mut game = new_game(&[]);
    assert_eq!(game.add_player(""), Err(ValidationError::EmptyName));
    assert_eq!(game.add_player("   "), Err(ValidationError::EmptyName));
    assert_eq!(
        game.add_player(&"a".repeat(21)),
        Err(ValidationError::NameTooLong { max: 20 })
    );
    game.add_player(&"b".repeat(20)).expect("twenty chars fit");
    game.add_player("Alice").expect("add alice");
    assert_eq!(
        game.add_player("alice"),
        Err(ValidationError::DuplicateName("alice".to_string()))
    );
    assert_eq!(game.players().len(), 2);
}

#[test]
fn roster_is_capped_at_nine_players() {
    let mut game = new_game(&[]);
    for idx in 0..8 {
        game.add_player(&format!("Player {idx}")).expect("add");
    }
    game.add_player("Ninth").expect("ninth player fits");
    assert_eq!(
        game.add_player("Tenth"),
        Err(ValidationError::RosterFull { max: 9 })
    );
}

#[test]
fn names_are_trimmed() {
    let mut game = new_game(&["  Bob  "]);
    assert_eq!(game.players()[0].name, "Bob");
    assert_eq!(game.players()[0].icon, "person");
    assert_eq!(game.players()[0].score, 0);
}

#[test]
fn removing_players_clamps_the_pointer() {
    let mut game = new_game(&["A", "B", "C"]);
    game.table_mut().set_current(2);
    assert_eq!(
        game.remove_player(5).expect_err("out of range"),
        OrchestrationError::PlayerIndexOutOfRange(5)
    );
    let removed = game.remove_player(2).expect("remove");
    assert_eq!(removed.name, "C");
    assert_eq!(game.current_index(), 1);
    game.remove_player(0).expect("remove");
    game.remove_player(0).expect("remove");
    assert_eq!(
        game.current_player().expect_err("empty roster"),
        OrchestrationError::NoPlayers
    );
}

#[test]
fn start_requires_two_players() {
    let mut game = new_game(&[]);
    assert_eq!(
        err(game.start_game()),
        GameError::Orchestration(OrchestrationError::NoPlayers)
    );
    game.add_player("Solo").expect("add");
    assert_eq!(
        err(game.start_game()),
        GameError::Orchestration(OrchestrationError::NotEnoughPlayers { min: 2 })
    );
    game.add_player("Duo").expect("add");
    game.start_game().expect("start");
    assert_eq!(game.round(), RoundNumber::One);
    assert_eq!(
        game.phase(),
        GamePhase::RoundInstruction { needs_setup: false }
    );
    assert!(game.players().iter().all(|player| player.remaining_turns == 1));
    assert_eq!(
        game.add_player("Late"),
        Err(ValidationError::RosterLocked)
    );
}

#[test]
fn start_fails_without_cards() {
    let mut game = Game::new(CategoryCatalog::default(), Settings::default(), 1);
    game.add_player("A").expect("add");
    game.add_player("B").expect("add");
    assert_eq!(
        err(game.start_game()),
        GameError::Deck(DeckError::NoCardsAvailable)
    );
    assert_eq!(game.phase(), GamePhase::PlayersSetup);
}

#[test]
fn actions_outside_playing_are_rejected() {
    let mut game = started_game(&["A", "B"]);
    let before = game.snapshot();
    assert_eq!(
        err(game.validate_card()),
        GameError::Orchestration(OrchestrationError::InvalidPhase(
            GamePhase::RoundInstruction { needs_setup: false }
        ))
    );
    assert!(game.pass_card().is_err());
    assert!(game.advance_to_next_player().is_err());
    assert_eq!(game.snapshot(), before);
    assert_eq!(
        err(game.set_phase(GamePhase::RoundResult)),
        GameError::Orchestration(OrchestrationError::InvalidTransition {
            from: GamePhase::RoundInstruction { needs_setup: false },
            to: GamePhase::RoundResult,
        })
    );
}

#[test]
fn speed_round_scoring() {
    let mut game = started_game(&["A", "B"]);
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");
    game.start_turn().expect("start turn");
    let first = game.current_card().cloned().expect("card drawn");
    assert_eq!(game.countdown_state(), CountdownState::Idle);

    game.validate_card().expect("validate");
    assert_eq!(game.players()[0].turn_score, 1);
    assert_ne!(game.current_card(), Some(&first));

    game.pass_card().expect("pass");
    assert_eq!(game.players()[0].turn_score, 1);
    assert_eq!(game.players()[0].passed_count, 1);

    game.end_turn().expect("end turn");
    assert_eq!(game.phase(), GamePhase::PlayerTurnResult);
    assert_eq!(game.players()[0].remaining_turns, 0);
    assert!(!game.players()[0].is_main_player);

    game.advance_to_next_player().expect("next");
    assert_eq!(game.phase(), GamePhase::PlayerInstruction);
    assert_eq!(game.current_index(), 1);
    assert_eq!(game.players()[0].round_score, 1);
    assert_eq!(game.players()[0].turn_score, 0);

    game.start_turn().expect("start turn");
    game.end_turn().expect("end turn");
    game.advance_to_next_player().expect("round over");
    assert_eq!(game.phase(), GamePhase::RoundResult);
    assert_eq!(game.players()[0].score, 1);
    assert_eq!(game.ranking()[0].name, "A");
}

#[test]
fn next_player_skips_eliminated_and_exhausted() {
    let mut game = started_game(&["A", "B", "C"]);
    {
        let roster = &mut game.table_mut().roster;
        roster.get_mut(1).expect("B").is_eliminated = true;
        roster.get_mut(2).expect("C").remaining_turns = 0;
    }
    assert_eq!(game.current_index(), 0);
    assert_eq!(game.next_player(), Some(0));

    game.table_mut().roster.get_mut(0).expect("A").remaining_turns = 0;
    assert_eq!(game.next_player(), None);
}

#[test]
fn next_player_wraps_around() {
    let mut game = started_game(&["A", "B", "C"]);
    game.table_mut().set_current(2);
    assert_eq!(game.next_player(), Some(0));
    game.table_mut().roster.get_mut(0).expect("A").remaining_turns = 0;
    assert_eq!(game.next_player(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn no_round_after_the_third() {
    let mut game = started_game(&["A", "B"]);
    assert!(game.advance_to_next_round().is_err());
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round two");
    assert_eq!(game.round(), RoundNumber::Two);
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round three");
    assert_eq!(
        game.phase(),
        GamePhase::RoundInstruction { needs_setup: true }
    );
    assert_eq!(
        err(game.set_phase(GamePhase::PlayerInstruction)),
        GameError::Orchestration(OrchestrationError::PersonalCardsMissing)
    );
    deal_personal_cards(&mut game);
    play_out_round(&mut game);

    assert_eq!(
        err(game.advance_to_next_round()),
        GameError::Orchestration(OrchestrationError::NoNextRound)
    );
    assert_eq!(game.round(), RoundNumber::Three);
    game.finish_game().expect("finish");
    assert_eq!(game.phase(), GamePhase::GameResult);
}

#[tokio::test(start_paused = true)]
async fn timed_round_scores_remaining_seconds() {
    let mut game = started_game(&["A", "B"]);
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round two");
    assert!(game.players().iter().all(|player| player.remaining_turns == 3));
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");
    game.start_turn().expect("start turn");
    assert_eq!(game.countdown_state(), CountdownState::Running);
    assert_eq!(game.countdown_remaining(), 30);

    loop {
        let event = game.next_timer_event().await.expect("timer event");
        if event.kind == TimerEventKind::Tick(12) {
            break;
        }
    }
    game.validate_card().expect("validate");
    assert_eq!(game.players()[0].turn_score, 12);
    assert_eq!(game.phase(), GamePhase::PlayerTurnResult);
    assert_eq!(game.players()[0].remaining_turns, 2);
    assert_eq!(game.countdown_state(), CountdownState::Idle);
}

#[tokio::test(start_paused = true)]
async fn timed_round_penalties_grow_with_later_turns() {
    let mut game = started_game(&["A", "B"]);
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round two");
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");

    game.start_turn().expect("start turn");
    assert_eq!(game.expected_response_count(), 3);
    let card = game.current_card().cloned();
    game.pass_card().expect("pass");
    assert_eq!(game.players()[0].turn_score, -3);
    assert_eq!(game.players()[0].passed_count, 1);
    assert_ne!(game.current_card().cloned(), card);
    assert_eq!(game.phase(), GamePhase::Playing);

    game.table_mut().roster.get_mut(0).expect("A").remaining_turns = 2;
    assert_eq!(game.expected_response_count(), 4);
    game.table_mut().roster.get_mut(0).expect("A").remaining_turns = 1;
    assert_eq!(game.expected_response_count(), 5);
    game.table_mut().roster.get_mut(0).expect("A").remaining_turns = 7;
    assert_eq!(game.expected_response_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn timed_round_timeout_costs_a_turn() {
    let mut game = started_game(&["A", "B"]);
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round two");
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");
    game.start_turn().expect("start turn");

    while game.phase() == GamePhase::Playing {
        game.next_timer_event().await.expect("timer event");
    }
    assert_eq!(game.phase(), GamePhase::PlayerTurnResult);
    assert_eq!(game.players()[0].turn_score, -3);
    assert_eq!(game.players()[0].remaining_turns, 2);
    assert!(!game.players()[0].is_main_player);
    let events = game.drain_events();
    assert!(events.contains(&Event::TimerTick { remaining: 0 }));
    assert!(events.contains(&Event::TimerFinished));
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_the_timed_round() {
    let mut game = started_game(&["A", "B"]);
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round two");
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");
    game.start_turn().expect("start turn");
    game.next_timer_event().await.expect("first tick");
    assert_eq!(game.countdown_remaining(), 29);

    game.pause().expect("pause");
    tokio::time::sleep(std::time::Duration::from_secs(60)).await;
    assert_eq!(game.poll_timer_events().expect("poll"), 0);
    assert_eq!(game.countdown_remaining(), 29);
    assert_eq!(game.phase(), GamePhase::Playing);

    game.resume().expect("resume");
    let event = game.next_timer_event().await.expect("tick after resume");
    assert_eq!(event.kind, TimerEventKind::Tick(28));
}

#[tokio::test(start_paused = true)]
async fn stale_timer_reports_are_ignored() {
    let mut game = started_game(&["A", "B"]);
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round two");
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");
    game.start_turn().expect("start turn");
    game.end_turn().expect("end turn");
    tokio::time::sleep(std::time::Duration::from_secs(45)).await;
    assert_eq!(game.poll_timer_events().expect("poll"), 0);
    assert_eq!(game.players()[0].turn_score, 0);
    assert_eq!(game.phase(), GamePhase::PlayerTurnResult);
}

#[tokio::test(start_paused = true)]
async fn hot_seat_victory_bonus() {
    let mut game = started_game(&["A", "B", "C", "D"]);
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round two");
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round three");
    deal_personal_cards(&mut game);
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");
    game.start_turn().expect("start turn");

    assert!(game.players()[0].is_main_player);
    assert_eq!(
        game.current_card(),
        game.players()[0].personal_card.as_ref()
    );
    assert_eq!(game.current_index(), 1);

    game.pass_card().expect("B misses");
    assert!(game.players()[1].is_eliminated);
    assert_eq!(game.players()[0].turn_score, 1);
    assert_eq!(game.current_index(), 2);

    game.pass_card().expect("C misses");
    assert_eq!(game.players()[0].turn_score, 2);
    assert_eq!(game.current_index(), 3);

    game.pass_card().expect("D misses");
    assert_eq!(game.players()[0].turn_score, 3 + 8);
    assert_eq!(game.phase(), GamePhase::PlayerTurnResult);
    assert_eq!(game.current_index(), 0);
    assert!(game.players().iter().all(|player| !player.is_eliminated));
    assert!(game.players().iter().all(|player| !player.is_main_player));
    assert!(game
        .drain_events()
        .contains(&Event::HotSeatWon {
            player: game.players()[0].id,
            bonus: 8
        }));
}

#[tokio::test(start_paused = true)]
async fn hot_seat_rotation_and_main_player_giving_up() {
    let mut game = started_game(&["A", "B", "C"]);
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round two");
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round three");
    deal_personal_cards(&mut game);
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");
    game.start_turn().expect("start turn");
    assert_eq!(game.current_index(), 1);

    game.validate_card().expect("B guesses right");
    assert_eq!(game.current_index(), 2);
    assert_eq!(game.countdown_remaining(), 20);
    game.validate_card().expect("C guesses right");
    assert_eq!(game.current_index(), 0);

    game.pass_card().expect("A gives up");
    assert_eq!(game.phase(), GamePhase::PlayerTurnResult);
    assert_eq!(game.players()[0].turn_score, 0);
    assert!(game.players()[0].has_been_main_player);

    game.advance_to_next_player().expect("next main player");
    assert_eq!(game.phase(), GamePhase::PlayerInstruction);
    assert_eq!(game.current_index(), 1);
    game.start_turn().expect("B in the hot seat");
    assert!(game.players()[1].is_main_player);
    assert_eq!(game.current_index(), 2);
}

#[tokio::test(start_paused = true)]
async fn hot_seat_timeout_eliminates_the_guesser() {
    let mut game = started_game(&["A", "B", "C"]);
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round two");
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round three");
    deal_personal_cards(&mut game);
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");
    game.start_turn().expect("start turn");

    while !game.players()[1].is_eliminated {
        game.next_timer_event().await.expect("timer event");
    }
    assert_eq!(game.players()[0].turn_score, 1);
    assert_eq!(game.current_index(), 2);
    assert_eq!(game.phase(), GamePhase::Playing);
    assert_eq!(game.countdown_remaining(), 20);
}

#[tokio::test(start_paused = true)]
async fn reset_keeps_players_and_clears_progress() {
    let mut game = started_game(&["A", "B"]);
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");
    game.start_turn().expect("start turn");
    game.validate_card().expect("validate");
    game.end_turn().expect("end");
    game.advance_to_next_player().expect("next");

    game.reset_game();
    assert_eq!(game.phase(), GamePhase::PlayersSetup);
    assert_eq!(game.round(), RoundNumber::One);
    assert_eq!(game.players().len(), 2);
    assert!(game.players().iter().all(|player| player.score == 0
        && player.round_score == 0
        && player.personal_card.is_none()
        && !player.has_been_main_player));
    assert!(game.current_card().is_none());
    assert!(game.drain_events().contains(&Event::GameReset));
    game.add_player("C").expect("roster unlocked again");
}

#[test]
fn snapshot_reflects_state() {
    let mut game = started_game(&["A", "B"]);
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");
    game.start_turn().expect("start turn");
    let snapshot = game.snapshot();
    assert_eq!(snapshot.phase, GamePhase::Playing);
    assert_eq!(snapshot.round_title, "Speed");
    assert_eq!(snapshot.current_index, Some(0));
    assert!(snapshot.current_card.is_some());
    assert!(!snapshot.deck_exhausted);
    assert_eq!(snapshot.countdown_state, CountdownState::Idle);
}

#[test]
fn failed_draws_leave_scores_and_flags_untouched() {
    let catalog = CategoryCatalog::new(vec![Category {
        category: "Solo".to_string(),
        color: String::new(),
        themes: vec![Theme::new("Solo", "Only")],
    }]);
    let mut game = Game::new(catalog, Settings::default(), 5);
    game.add_player("A").expect("add");
    game.add_player("B").expect("add");
    game.start_game().expect("start");
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");
    game.start_turn().expect("start turn");
    assert!(game.deck_exhausted());

    for _ in 0..2 {
        assert_eq!(
            err(game.validate_card()),
            GameError::Deck(DeckError::NoCardsAvailable)
        );
        assert_eq!(
            err(game.pass_card()),
            GameError::Deck(DeckError::NoCardsAvailable)
        );
    }
    assert_eq!(game.players()[0].turn_score, 0);
    assert_eq!(game.players()[0].passed_count, 0);
    assert_eq!(game.phase(), GamePhase::Playing);

    game.end_turn().expect("end turn");
    game.advance_to_next_player().expect("next");
    let card = game.current_card().cloned();
    assert_eq!(
        err(game.start_turn()),
        GameError::Deck(DeckError::NoCardsAvailable)
    );
    assert_eq!(game.phase(), GamePhase::PlayerInstruction);
    assert_eq!(game.current_index(), 1);
    assert!(!game.players()[1].is_main_player);
    assert!(!game.players()[1].has_been_main_player);
    assert_eq!(game.current_card().cloned(), card);
}

#[tokio::test(start_paused = true)]
async fn hot_seat_timeout_on_the_main_player_ends_the_segment() {
    let mut game = started_game(&["A", "B", "C"]);
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round two");
    play_out_round(&mut game);
    game.advance_to_next_round().expect("round three");
    deal_personal_cards(&mut game);
    game.set_phase(GamePhase::PlayerInstruction).expect("instruction");
    game.start_turn().expect("start turn");

    game.validate_card().expect("B guesses right");
    game.validate_card().expect("C guesses right");
    assert_eq!(game.current_index(), 0);
    assert!(game.players()[0].is_main_player);

    while game.phase() == GamePhase::Playing {
        game.next_timer_event().await.expect("timer event");
    }
    assert_eq!(game.phase(), GamePhase::PlayerTurnResult);
    assert_eq!(game.current_index(), 0);
    assert_eq!(game.players()[0].turn_score, 0);
    assert!(game.players()[0].has_been_main_player);
    assert!(game.players().iter().all(|player| !player.is_eliminated));
    assert!(game.players().iter().all(|player| !player.is_main_player));
    assert!(!game
        .drain_events()
        .iter()
        .any(|event| matches!(event, Event::PlayerEliminated { .. })));
}
