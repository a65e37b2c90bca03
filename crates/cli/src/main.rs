use anyhow::Context;
use hotseat_core::{Event, Feedback, Game, GameError, GamePhase, PlayerId, Settings, TimerEventKind};
use hotseat_data::{default_settings_path, load_catalog, JsonSettingsStore};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_ASSETS_DIR: &str = "assets/categories";
const DEFAULT_SEED: u64 = 0xC0FFEE;

#[derive(Debug, Clone)]
struct CliOptions {
    assets: PathBuf,
    settings: Option<PathBuf>,
    seed: u64,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut assets = PathBuf::from(DEFAULT_ASSETS_DIR);
    let mut settings = None;
    let mut seed = None;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    assets = PathBuf::from(value);
                    idx += 1;
                }
            }
            "--settings" => {
                if let Some(value) = args.get(idx + 1) {
                    settings = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    CliOptions {
        assets,
        settings: settings.or_else(default_settings_path),
        seed: seed.unwrap_or_else(time_seed),
    }
}

fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(DEFAULT_SEED)
}

/// HOTSEAT_LOG, then RUST_LOG, then "warn". Output goes to stderr so it
/// never mixes with the game text.
fn init_logging() {
    let filter = std::env::var("HOTSEAT_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init()
        .ok();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build runtime")?;
    runtime.block_on(run(options))
}

async fn run(options: CliOptions) -> anyhow::Result<()> {
    let catalog = load_catalog(&options.assets)
        .with_context(|| format!("load categories from {}", options.assets.display()))?;
    if catalog.is_empty() {
        anyhow::bail!("no categories found in {}", options.assets.display());
    }
    info!(
        categories = catalog.categories().len(),
        seed = options.seed,
        "starting"
    );
    let mut game = match &options.settings {
        Some(path) => {
            debug!(path = %path.display(), "settings file");
            Game::new(catalog, JsonSettingsStore::new(path), options.seed)
        }
        None => Game::new(catalog, Settings::default(), options.seed),
    };

    print_help();
    print_hint(&game);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("read stdin")? else {
                    break;
                };
                let before = game.phase();
                match execute(&mut game, line.trim()) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(err) => println!("error: {err}"),
                }
                print_events(&mut game);
                if game.phase() != before {
                    print_hint(&game);
                }
            }
            event = game.next_timer_event() => {
                let before = game.phase();
                match event {
                    Ok(event) => {
                        if let TimerEventKind::Tick(remaining) = event.kind {
                            if remaining % 5 == 0 || remaining <= 3 {
                                println!("  {remaining}s");
                            }
                        }
                    }
                    Err(err) => println!("error: {err}"),
                }
                print_events(&mut game);
                if game.phase() != before {
                    print_hint(&game);
                }
            }
        }
    }
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

fn execute(game: &mut Game, input: &str) -> Result<Flow, GameError> {
    let mut parts = input.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Ok(Flow::Continue);
    };
    let args: Vec<&str> = parts.collect();
    match cmd {
        "help" | "h" | "?" => print_help(),
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        "add" => {
            let name = args.join(" ");
            game.add_player(&name)?;
        }
        "remove" | "rm" => match args.first().and_then(|value| value.parse::<usize>().ok()) {
            Some(number) if number > 0 => {
                game.remove_player(number - 1)?;
            }
            _ => println!("usage: remove <number>"),
        },
        "players" | "p" => print_players(game),
        "start" => game.start_game()?,
        "next" => game.set_phase(GamePhase::PlayerInstruction)?,
        "go" => game.start_turn()?,
        "ok" | "y" => game.validate_card()?,
        "pass" | "n" => game.pass_card()?,
        "stop" => game.end_turn()?,
        "pause" => game.pause()?,
        "resume" => game.resume()?,
        "secret" => {
            if args.is_empty() {
                println!("usage: secret <category>");
                print_categories(game);
            } else {
                game.generate_personal_card(&args.join(" "))?;
            }
        }
        "continue" | "c" => game.advance_to_next_player()?,
        "round" => game.advance_to_next_round()?,
        "finish" => game.finish_game()?,
        "reset" => game.reset_game(),
        "status" | "s" => {
            if args.first() == Some(&"--json") {
                match serde_json::to_string_pretty(&game.snapshot()) {
                    Ok(json) => println!("{json}"),
                    Err(err) => println!("error: {err}"),
                }
            } else {
                print_status(game);
            }
        }
        other => println!("unknown command: {other} (try `help`)"),
    }
    Ok(Flow::Continue)
}

fn print_help() {
    println!("== Hotseat ==");
    println!("  add <name>         add a player");
    println!("  remove <number>    remove a player");
    println!("  players            list players and scores");
    println!("  start              start the game");
    println!("  secret <category>  draw a secret card (round 3)");
    println!("  next               leave the round instructions");
    println!("  go                 start the turn");
    println!("  ok / pass          card found / skipped");
    println!("  stop               end the turn");
    println!("  pause / resume     hold the countdown");
    println!("  continue           next player");
    println!("  round              next round");
    println!("  finish             show the final ranking");
    println!("  reset              start over with the same players");
    println!("  status [--json]    show the table");
    println!("  help / quit");
}

fn print_hint(game: &Game) {
    match game.phase() {
        GamePhase::PlayersSetup => println!("-- add players, then `start`"),
        GamePhase::RoundInstruction { needs_setup } => {
            let config = game.round_config();
            println!(
                "-- round {}: {} ({} turn(s) each, {}s timer)",
                config.round, config.title, config.turns_per_player, config.timer_seconds
            );
            if needs_setup {
                if let Some(player) = game
                    .personal_card_candidate()
                    .and_then(|index| game.players().get(index))
                {
                    println!("-- {}: pick a secret card with `secret <category>`", player.name);
                    print_categories(game);
                }
            } else {
                println!("-- `next` when everyone is ready");
            }
        }
        GamePhase::PlayerInstruction => {
            if let Ok(player) = game.current_player() {
                println!("-- pass the device to {}, then `go`", player.name);
            }
        }
        GamePhase::Playing => {
            if let Some(card) = game.current_card() {
                println!(">> {card}");
            }
            if let Ok(player) = game.current_player() {
                println!("-- {} plays: `ok`, `pass` or `stop`", player.name);
            }
        }
        GamePhase::PlayerTurnResult => {
            if let Ok(player) = game.current_player() {
                println!("-- {} scored {} this turn; `continue`", player.name, player.turn_score);
            }
        }
        GamePhase::RoundResult => {
            let config = game.round_config();
            println!("-- round {} over", config.round);
            for player in game.players() {
                println!(
                    "   {:<20} {:>4}  {}",
                    player.name,
                    player.round_score,
                    feedback_label(config.feedback(player.round_score))
                );
            }
            if config.round.is_last() {
                println!("-- `finish` for the final ranking");
            } else {
                println!("-- `round` for the next round");
            }
        }
        GamePhase::GameResult => {
            println!("-- final ranking");
            for (place, player) in game.ranking().iter().enumerate() {
                println!("   {}. {:<20} {:>4}", place + 1, player.name, player.score);
            }
            println!("-- `reset` to play again");
        }
    }
}

fn feedback_label(feedback: Feedback) -> &'static str {
    match feedback {
        Feedback::Poor => "poor",
        Feedback::Fair => "fair",
        Feedback::Good => "good",
        Feedback::Excellent => "excellent",
    }
}

fn print_players(game: &Game) {
    if game.players().is_empty() {
        println!("no players yet");
        return;
    }
    for (idx, player) in game.players().iter().enumerate() {
        let marker = if idx == game.current_index() { '*' } else { ' ' };
        let mut flags = Vec::new();
        if player.is_main_player {
            flags.push("hot seat");
        }
        if player.is_eliminated {
            flags.push("out");
        }
        println!(
            "{marker}{}. {:<20} score {:>4} | round {:>4} | turns left {} {}",
            idx + 1,
            player.name,
            player.score,
            player.round_score,
            player.remaining_turns,
            flags.join(", ")
        );
    }
}

fn print_categories(game: &Game) {
    println!("   categories: {}", game.table().catalog.category_names().join(", "));
}

fn print_status(game: &Game) {
    let snapshot = game.snapshot();
    println!(
        "round {} ({}) | phase {}",
        snapshot.round, snapshot.round_title, snapshot.phase
    );
    if let Some(card) = &snapshot.current_card {
        println!("card: {card}");
    }
    if game.table().countdown().is_active() {
        println!(
            "timer: {}s ({:.0}%)",
            snapshot.countdown_remaining,
            snapshot.countdown_progress * 100.0
        );
    }
    if snapshot.deck_exhausted {
        println!("deck exhausted");
    }
    print_players(game);
}

fn print_events(game: &mut Game) {
    for event in game.drain_events() {
        if let Some(line) = format_event(game, &event) {
            println!("  {line}");
        }
    }
}

fn player_name(game: &Game, id: PlayerId) -> String {
    game.players()
        .iter()
        .find(|player| player.id == id)
        .map(|player| player.name.clone())
        .unwrap_or_else(|| format!("player {}", id.0))
}

fn format_event(game: &Game, event: &Event) -> Option<String> {
    let line = match event {
        Event::PlayerAdded { name, .. } => format!("{name} joined"),
        Event::PlayerRemoved { name, .. } => format!("{name} left"),
        Event::GameStarted { players } => format!("game started with {players} players"),
        Event::RoundStarted { round, cards } => format!("round {round}: {cards} cards in the deck"),
        Event::CardDrawn { title, category } => format!(">> {title} ({category})"),
        Event::CardValidated { player, points } => {
            format!("{} +{points}", player_name(game, *player))
        }
        Event::CardPassed { player, penalty } if *penalty > 0 => {
            format!("{} passed, -{penalty}", player_name(game, *player))
        }
        Event::CardPassed { player, .. } => format!("{} passed", player_name(game, *player)),
        Event::PlayerEliminated { player, by } => format!(
            "{} is out, +1 for {}",
            player_name(game, *player),
            player_name(game, *by)
        ),
        Event::HotSeatWon { player, bonus } => {
            format!("{} wins the hot seat, +{bonus}", player_name(game, *player))
        }
        Event::PersonalCardAssigned { player } => {
            format!("{} has a secret card", player_name(game, *player))
        }
        Event::TimerFinished => "time is up".to_string(),
        Event::TimerPaused { remaining } => format!("paused at {remaining}s"),
        Event::TimerResumed { remaining } => format!("resumed at {remaining}s"),
        Event::GameReset => "game reset".to_string(),
        Event::PhaseChanged { .. } | Event::CurrentPlayerChanged { .. } | Event::TimerTick { .. } => {
            return None
        }
    };
    Some(line)
}
