//! Line-oriented scorekeeper's table.
//!
//! Seeds a demo game on first run, opens a scoring session on one player,
//! and drives the stat buffer, confirm pipeline, and game clock from stdin
//! commands. Type `help` at the prompt for the command list.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use runtime::{ClockHandle, ClockTicker, Gateway, PrefsStore, ScoringSession, SortSpec, box_score};
use score_core::{
    FoulKind, Game, Player, Position, RecordId, ShotOutcome, StatEntry, TeamInfo, TeamSide,
};

const TICK_PERIOD: Duration = Duration::from_secs(1);
const PERIOD_SECONDS: u32 = 480;

struct CliConfig {
    in_memory: bool,
    data_dir: Option<PathBuf>,
    reseed: bool,
}

impl CliConfig {
    fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut config = Self {
            in_memory: false,
            reseed: false,
            data_dir: None,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--memory" => config.in_memory = true,
                "--data-dir" => {
                    let dir = args
                        .next()
                        .ok_or_else(|| anyhow!("--data-dir needs a path"))?;
                    config.data_dir = Some(PathBuf::from(dir));
                }
                "--reseed" => config.reseed = true,
                other => bail!("unknown argument: {other}"),
            }
        }
        Ok(config)
    }

    fn gateway(&self) -> Result<Gateway> {
        if self.in_memory {
            return Ok(Gateway::in_memory());
        }
        let base_dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => ProjectDirs::from("", "", "courtside")
                .context("cannot resolve a data directory; pass --data-dir or --memory")?
                .data_local_dir()
                .join("store"),
        };
        Gateway::json(&base_dir).with_context(|| format!("opening store at {base_dir:?}"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = CliConfig::from_args(env::args().skip(1))?;
    let gateway = config.gateway()?;

    if config.reseed {
        clear_store(&gateway).await?;
    }
    let game = find_or_seed_game(&gateway).await?;
    println!(
        "{} vs {} | period {}, {} on the clock",
        game.home.name,
        game.away.name,
        game.period,
        format_clock(game.clock_seconds)
    );

    let roster = load_roster(&gateway, &game.id).await?;
    print_roster(&roster);
    let first = roster
        .first()
        .context("seeded game has an empty roster")?
        .clone();

    let session = ScoringSession::open(gateway.clone(), &first.id, &game.id).await?;
    println!(
        "scoring for {} (#{}); `player <jersey>` to switch, `help` for commands",
        first.name, first.jersey
    );
    let session = Arc::new(Mutex::new(session));
    let clock = ClockTicker::spawn(session.clone(), PrefsStore::open_default(), TICK_PERIOD);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match handle_line(line.trim(), &gateway, &game.id, &session, &clock).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(error) => println!("error: {error:#}"),
        }
    }

    clock.shutdown().await;
    if let Ok(mutex) = Arc::try_unwrap(session) {
        mutex.into_inner().close();
    }
    Ok(())
}

/// Returns `Ok(true)` when the scorer asked to quit.
async fn handle_line(
    line: &str,
    gateway: &Gateway,
    game_id: &RecordId,
    session: &Arc<Mutex<ScoringSession>>,
    clock: &ClockHandle,
) -> Result<bool> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [] => {}
        ["help"] => print_help(),
        ["quit"] | ["exit"] => return Ok(true),

        ["2", outcome] => record(session, StatEntry::Two(parse_outcome(outcome)?)).await,
        ["3", outcome] => record(session, StatEntry::Three(parse_outcome(outcome)?)).await,
        ["ft", outcome] => record(session, StatEntry::FreeThrow(parse_outcome(outcome)?)).await,
        ["undo-ft"] => {
            let undone = session.lock().await.undo_last_free_throw();
            match undone {
                Some(outcome) => println!("removed free throw ({outcome:?})"),
                None => println!("no free throws in this trip"),
            }
        }
        ["ast"] => record(session, StatEntry::Assist).await,
        ["stl"] => record(session, StatEntry::Steal).await,
        ["blk"] => record(session, StatEntry::Block).await,
        ["to"] => record(session, StatEntry::Turnover).await,
        ["orb"] => record(session, StatEntry::OffensiveRebound).await,
        ["drb"] => record(session, StatEntry::DefensiveRebound).await,
        ["foul"] => record(session, StatEntry::Foul(FoulKind::Personal)).await,
        ["foul", kind] => record(session, StatEntry::Foul(parse_foul(kind)?)).await,

        ["confirm"] => {
            let mut session = session.lock().await;
            match session.confirm().await? {
                Some(receipt) => {
                    for event in &receipt.events {
                        println!("  {}", event.description);
                    }
                    println!(
                        "committed {} event(s); {} now has {} points",
                        receipt.events.len(),
                        receipt.player.name,
                        receipt.player.stats.points
                    );
                }
                None => println!("nothing pending"),
            }
        }

        ["clock", "start"] => clock.resume().await,
        ["clock", "stop"] => clock.pause().await,
        ["clock", "set", seconds] => {
            let seconds: u32 = seconds.parse().context("clock set takes seconds")?;
            session.lock().await.set_game_clock(seconds).await?;
        }
        ["shot"] => clock.reset_shot_clock().await,
        ["period"] => {
            let mut session = session.lock().await;
            let period = session.advance_period().await?;
            session.set_game_clock(PERIOD_SECONDS).await?;
            println!("period {period}");
        }

        ["status"] => {
            let session = session.lock().await;
            let game = session.game();
            let player = session.player();
            println!(
                "{} {} - {} {} | period {} | {} / shot {} | clock {}",
                game.home.name,
                game.home_score,
                game.away.name,
                game.away_score,
                game.period,
                format_clock(session.clocks().game_seconds),
                session.clocks().shot_seconds,
                if session.clock_running() {
                    "running"
                } else {
                    "stopped"
                }
            );
            println!(
                "{} (#{}): {} pts, {}/{} fg, {}/{} 3pt, {}/{} ft, {} reb, {} ast, {} pf{}",
                player.name,
                player.jersey,
                player.stats.points,
                player.stats.fgm,
                player.stats.fga,
                player.stats.tpm,
                player.stats.tpa,
                player.stats.ftm,
                player.stats.fta,
                player.stats.rebounds(),
                player.stats.assists,
                player.stats.fouls,
                if session.has_pending() {
                    " (pending entries)"
                } else {
                    ""
                }
            );
        }

        ["box"] => {
            let box_score = box_score(gateway, game_id).await?;
            println!(
                "home {} ({} from events) - away {} ({} from events), {} event(s){}",
                box_score.home_score,
                box_score.home.points,
                box_score.away_score,
                box_score.away.points,
                box_score.event_count,
                if box_score.ledger_consistent() {
                    ""
                } else {
                    " - LEDGER MISMATCH"
                }
            );
        }

        ["roster"] => {
            let roster = load_roster(gateway, game_id).await?;
            print_roster(&roster);
        }

        ["player", jersey] => {
            let jersey: u8 = jersey.parse().context("player takes a jersey number")?;
            let roster = load_roster(gateway, game_id).await?;
            let target = roster
                .iter()
                .find(|player| player.jersey == jersey)
                .with_context(|| format!("no player wears #{jersey}"))?;
            let replacement =
                ScoringSession::open(gateway.clone(), &target.id, game_id).await?;
            let mut guard = session.lock().await;
            let previous = std::mem::replace(&mut *guard, replacement);
            previous.close();
            println!("scoring for {} (#{})", target.name, target.jersey);
        }

        _ => println!("unrecognized command; type `help`"),
    }
    Ok(false)
}

async fn record(session: &Arc<Mutex<ScoringSession>>, entry: StatEntry) {
    if !session.lock().await.record(entry) {
        println!("free-throw trip is full (3); `undo-ft` or `confirm` first");
    }
}

fn parse_outcome(token: &str) -> Result<ShotOutcome> {
    match token {
        "m" | "made" => Ok(ShotOutcome::Made),
        "x" | "miss" | "missed" => Ok(ShotOutcome::Missed),
        other => bail!("expected m or x, got {other}"),
    }
}

fn parse_foul(token: &str) -> Result<FoulKind> {
    match token {
        "p" => Ok(FoulKind::Personal),
        "o" => Ok(FoulKind::Offensive),
        "t" => Ok(FoulKind::Technical),
        "u" => Ok(FoulKind::Unsportsmanlike),
        other => bail!("expected p, o, t, or u, got {other}"),
    }
}

async fn load_roster(gateway: &Gateway, game_id: &RecordId) -> Result<Vec<Player>> {
    let mut predicate = runtime::Predicate::new();
    predicate.insert("game_id".to_owned(), serde_json::json!(game_id));
    Ok(gateway
        .players
        .filter(&predicate, Some(SortSpec::ascending("jersey")), None)
        .await?)
}

fn print_roster(roster: &[Player]) {
    for player in roster {
        println!(
            "  #{:<2} {:<16} {:<2} ({})",
            player.jersey,
            player.name,
            player.position.as_str(),
            player.side
        );
    }
}

fn print_help() {
    println!("  2 m|x, 3 m|x, ft m|x   record a shot (made/missed)");
    println!("  undo-ft                remove the last free throw of the trip");
    println!("  ast stl blk to orb drb record a possession stat");
    println!("  foul [p|o|t|u]         record a foul (default personal)");
    println!("  confirm                commit pending entries");
    println!("  clock start|stop       run or stop the game clock");
    println!("  clock set <seconds>    correct the game clock");
    println!("  shot                   reset the shot clock");
    println!("  period                 advance to the next period");
    println!("  status | box | roster  show state");
    println!("  player <jersey>        switch the active player");
    println!("  quit");
}

async fn clear_store(gateway: &Gateway) -> Result<()> {
    for game in gateway.games.list(None, None).await? {
        gateway.games.delete(&game.id).await?;
    }
    for player in gateway.players.list(None, None).await? {
        gateway.players.delete(&player.id).await?;
    }
    for event in gateway.events.list(None, None).await? {
        gateway.events.delete(&event.id).await?;
    }
    info!("store cleared for reseed");
    Ok(())
}

async fn find_or_seed_game(gateway: &Gateway) -> Result<Game> {
    if let Some(game) = gateway.games.list(None, Some(1)).await?.into_iter().next() {
        return Ok(game);
    }

    let game = gateway
        .games
        .create(Game::new(
            TeamInfo::new("Ridgeview Hawks", "#1d4ed8"),
            TeamInfo::new("Lakeside Tigers", "#b91c1c"),
            PERIOD_SECONDS,
        ))
        .await?;

    let home = [
        ("Jordan Avery", 23, Position::ShootingGuard),
        ("Sam Ito", 4, Position::PointGuard),
        ("Dre Wallace", 15, Position::SmallForward),
        ("Quinn Harper", 32, Position::PowerForward),
        ("Malik Osei", 50, Position::Center),
    ];
    let away = [
        ("Riley Chen", 7, Position::PointGuard),
        ("Casey Romero", 11, Position::ShootingGuard),
        ("Devon Clarke", 21, Position::SmallForward),
        ("Ari Feldman", 34, Position::PowerForward),
        ("Noah Bright", 44, Position::Center),
    ];
    let mut roster = Vec::new();
    for (name, jersey, position) in home {
        roster.push(Player::new(
            game.id.clone(),
            name,
            jersey,
            position,
            TeamSide::Home,
        ));
    }
    for (name, jersey, position) in away {
        roster.push(Player::new(
            game.id.clone(),
            name,
            jersey,
            position,
            TeamSide::Away,
        ));
    }
    gateway.players.bulk_create(roster).await?;

    info!(game = %game.id, "seeded demo game");
    Ok(game)
}

fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
