#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::sync::Arc;

#[cfg(feature = "std")]
use broadside::{
    init_logging, Config, Coordinate, FireOutcome, GameHub, PlayerId, Seat,
    DEFAULT_PLACEMENT_ATTEMPTS,
};
#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::seq::SliceRandom;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Play two random bots against each other and print the finished game as JSON.
    Sim {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = DEFAULT_PLACEMENT_ATTEMPTS)]
        placement_attempts: usize,
        #[arg(long, default_value_t = 200)]
        max_rounds: u32,
    },
    /// Walk two players through request, decline and accept while an observer long-polls.
    LobbyDemo {
        #[arg(long, default_value_t = 2_000, help = "Observer long-poll timeout in milliseconds")]
        poll_timeout_ms: u64,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sim {
            seed,
            placement_attempts,
            max_rounds,
        } => {
            let config = Config {
                placement_attempts,
                seed,
                ..Config::default()
            };
            let record = run_sim(Arc::new(GameHub::new(config)), max_rounds)?;
            println!("{}", serde_json::to_string(&record)?);
        }
        Commands::LobbyDemo { poll_timeout_ms } => {
            let config = Config {
                poll_timeout: Duration::from_millis(poll_timeout_ms),
                ..Config::default()
            };
            run_lobby_demo(Arc::new(GameHub::new(config))).await?;
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

/// Aim every available shot at random cells not fired at before.
#[cfg(feature = "std")]
fn aim_randomly(hub: &GameHub, player: &PlayerId, rng: &mut SmallRng) -> anyhow::Result<()> {
    let fired: Vec<Coordinate> = hub.fired_shots(player)?.into_iter().map(|(c, _)| c).collect();
    let mut open: Vec<Coordinate> = Coordinate::all().filter(|c| !fired.contains(c)).collect();
    open.shuffle(rng);
    let available = hub.shots_available(player)?;
    for coord in open.into_iter().take(available) {
        hub.aim_at(player, coord)?;
    }
    Ok(())
}

#[cfg(feature = "std")]
fn run_sim(hub: Arc<GameHub>, max_rounds: u32) -> anyhow::Result<broadside::FinishedGame> {
    let seed = hub.config().seed;
    let mut rng1 = make_rng(seed);
    let mut rng2 = make_rng(seed.map(|s| s.wrapping_add(1)));
    let p1 = PlayerId::from("player1");
    let p2 = PlayerId::from("player2");

    let lobby = hub.lobby();
    lobby.add_player(p1.clone(), "Bot One");
    lobby.add_player(p2.clone(), "Bot Two");
    lobby.send_game_request(&p1, &p2)?;
    lobby.accept_game_request(&p2)?;

    hub.auto_place(&p1, &mut rng1)?;
    hub.auto_place(&p2, &mut rng2)?;
    hub.ready(&p1)?;
    let game_id = hub
        .ready(&p2)?
        .ok_or_else(|| anyhow::anyhow!("game did not start"))?;

    for _ in 0..max_rounds {
        aim_randomly(&hub, &p1, &mut rng1)?;
        aim_randomly(&hub, &p2, &mut rng2)?;
        hub.fire_shots(&p1)?;
        if let FireOutcome::Resolved(result) = hub.fire_shots(&p2)? {
            for seat in Seat::ALL {
                let report = result.report(seat);
                log::info!(
                    "round {}: {} hit {} of {} shots, sank {:?}",
                    result.number,
                    report.player,
                    report.hits.len(),
                    report.shots.len(),
                    report.sunk
                );
            }
            if result.is_game_over() {
                return Ok(hub.finished_game(game_id)?);
            }
        }
    }
    hub.abandon(&p1)?;
    Ok(hub.finished_game(game_id)?)
}

#[cfg(feature = "std")]
async fn run_lobby_demo(hub: Arc<GameHub>) -> anyhow::Result<()> {
    let alice = PlayerId::from("alice");
    let bob = PlayerId::from("bob");
    let timeout = hub.config().poll_timeout;

    let observer_hub = hub.clone();
    let observer = tokio::spawn(async move {
        let mut version = observer_hub.lobby().get_version();
        loop {
            let snapshot = observer_hub.lobby().wait_for_change(version, timeout).await;
            if snapshot.version == version {
                log::info!("observer: no change since version {}, done", version);
                break;
            }
            version = snapshot.version;
            let statuses: Vec<String> = snapshot
                .players
                .iter()
                .map(|p| format!("{}={:?}", p.id, p.status))
                .collect();
            println!("v{}: {}", version, statuses.join(" "));
        }
    });

    let lobby = hub.lobby();
    lobby.add_player(alice.clone(), "Alice");
    lobby.add_player(bob.clone(), "Bob");
    lobby.send_game_request(&alice, &bob)?;
    lobby.decline_game_request(&bob)?;
    if let Some(by) = lobby.get_decline_notification(&alice) {
        println!("{} declined {}", by, alice);
    }
    lobby.send_game_request(&alice, &bob)?;
    let (sender, receiver) = lobby.accept_game_request(&bob)?;
    println!("{} vs {}", sender, receiver);

    observer.await?;
    Ok(())
}
