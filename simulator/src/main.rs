use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use neovegas_execution::casino::dice::{DiceConfig, RollDirection};
use neovegas_execution::casino::dragon_tower::TowerConfig;
use neovegas_execution::casino::hilo::HiLoConfig;
use neovegas_execution::casino::mines::{AutoOrder, MinesConfig};
use neovegas_execution::casino::registry::{GameConfig, GameRegistry};
use neovegas_execution::casino::wheel::WheelConfig;
use neovegas_execution::{BalanceStore, FileState, Ledger};
use neovegas_simulator::{simulate, SimulatorConfig, Strategy, MAX_HILO_GUESSES};
use neovegas_types::casino::{
    Difficulty, GameType, DICE_MAX_TARGET, DICE_MIN_TARGET, MINES_GRID_SIZE, TOWER_ROWS,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

fn init_tracing(level: &str) -> Result<()> {
    let level: tracing::Level = level
        .parse()
        .with_context(|| format!("invalid log level: {level}"))?;
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the persisted balance.
    #[arg(long, global = true, default_value = ".neovegas")]
    data_dir: PathBuf,

    /// Maximum log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show or change the persisted coin balance.
    Balance {
        #[command(subcommand)]
        action: BalanceAction,
    },
    /// List games with their default configuration.
    Games,
    /// Play many automated rounds of one game and print a JSON summary.
    Simulate(SimulateArgs),
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum BalanceAction {
    Show,
    Reset,
    Set { amount: u64 },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum DirectionArg {
    Over,
    Under,
}

impl From<DirectionArg> for RollDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Over => RollDirection::Over,
            DirectionArg::Under => RollDirection::Under,
        }
    }
}

#[derive(clap::Args, Debug)]
struct SimulateArgs {
    /// dice, mines, dragon_tower, wheel or hilo.
    game: GameType,

    #[arg(long, default_value_t = neovegas_simulator::DEFAULT_ROUNDS)]
    rounds: u64,

    #[arg(long, default_value_t = neovegas_simulator::DEFAULT_WAGER)]
    wager: u64,

    /// Seed for the table and player random streams.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Play against an in-memory balance instead of the persisted one.
    #[arg(long)]
    bankroll: Option<u64>,

    /// Load the game configuration from a JSON file instead of flags.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dice: target in [1, 99].
    #[arg(long)]
    target: Option<u8>,

    /// Dice: roll over or under the target.
    #[arg(long, value_enum)]
    direction: Option<DirectionArg>,

    /// Dice preset, Dragon Tower or Wheel difficulty.
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Mines: number of mines in [1, 24].
    #[arg(long)]
    mines: Option<u8>,

    /// Mines: safe cells to open before cashing out.
    #[arg(long)]
    reveals: Option<u8>,

    /// Mines: open cells in grid order instead of at random.
    #[arg(long)]
    sequential: bool,

    /// Wheel: number of segments (20, 25, 30, 35 or 40).
    #[arg(long)]
    segments: Option<u8>,

    /// Dragon Tower: rows to clear before cashing out.
    #[arg(long)]
    climb: Option<u8>,

    /// Hi-Lo: correct guesses before cashing out.
    #[arg(long)]
    guesses: Option<u8>,
}

impl SimulateArgs {
    fn has_game_flags(&self) -> bool {
        self.target.is_some()
            || self.direction.is_some()
            || self.difficulty.is_some()
            || self.mines.is_some()
            || self.segments.is_some()
    }
}

fn ensure_flag_applies(
    flag: &str,
    present: bool,
    game: GameType,
    games: &[GameType],
) -> Result<()> {
    if present && !games.contains(&game) {
        anyhow::bail!("--{flag} does not apply to {game}");
    }
    Ok(())
}

fn game_config_from_flags(args: &SimulateArgs) -> Result<GameConfig> {
    let config = match args.game {
        GameType::Dice => {
            let direction = args.direction.map(RollDirection::from).unwrap_or_default();
            let mut config = match args.difficulty {
                Some(difficulty) => DiceConfig::preset(difficulty, direction),
                None => DiceConfig {
                    direction,
                    ..DiceConfig::default()
                },
            };
            if let Some(target) = args.target {
                if !(DICE_MIN_TARGET..=DICE_MAX_TARGET).contains(&target) {
                    anyhow::bail!(
                        "target must be between {DICE_MIN_TARGET} and {DICE_MAX_TARGET}, got {target}"
                    );
                }
                config.target = target;
            }
            GameConfig::Dice(config)
        }
        GameType::Mines => GameConfig::Mines(MinesConfig {
            mines: args.mines.unwrap_or(MinesConfig::default().mines),
        }),
        GameType::DragonTower => GameConfig::DragonTower(TowerConfig {
            difficulty: args.difficulty.unwrap_or_default(),
        }),
        GameType::Wheel => {
            let defaults = WheelConfig::default();
            GameConfig::Wheel(WheelConfig {
                difficulty: args.difficulty.unwrap_or(defaults.difficulty),
                segments: args.segments.unwrap_or(defaults.segments),
            })
        }
        GameType::HiLo => GameConfig::HiLo(HiLoConfig {}),
    };
    Ok(config)
}

fn build_config(args: &SimulateArgs) -> Result<SimulatorConfig> {
    if args.rounds == 0 {
        anyhow::bail!("rounds must be > 0");
    }
    if args.wager == 0 {
        anyhow::bail!("wager must be > 0");
    }

    let game = args.game;
    ensure_flag_applies("target", args.target.is_some(), game, &[GameType::Dice])?;
    ensure_flag_applies("direction", args.direction.is_some(), game, &[GameType::Dice])?;
    ensure_flag_applies(
        "difficulty",
        args.difficulty.is_some(),
        game,
        &[GameType::Dice, GameType::DragonTower, GameType::Wheel],
    )?;
    ensure_flag_applies("mines", args.mines.is_some(), game, &[GameType::Mines])?;
    ensure_flag_applies("reveals", args.reveals.is_some(), game, &[GameType::Mines])?;
    ensure_flag_applies("sequential", args.sequential, game, &[GameType::Mines])?;
    ensure_flag_applies("segments", args.segments.is_some(), game, &[GameType::Wheel])?;
    ensure_flag_applies("climb", args.climb.is_some(), game, &[GameType::DragonTower])?;
    ensure_flag_applies("guesses", args.guesses.is_some(), game, &[GameType::HiLo])?;

    let game_config = match &args.config {
        Some(path) => {
            if args.has_game_flags() {
                anyhow::bail!("--config cannot be combined with game option flags");
            }
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let config = GameConfig::from_json(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?;
            if config.game_type() != game {
                anyhow::bail!(
                    "config {} is for {}, not {game}",
                    path.display(),
                    config.game_type()
                );
            }
            config
        }
        None => game_config_from_flags(args)?,
    };
    game_config
        .validate()
        .map_err(|err| anyhow::anyhow!("invalid {game} config: {err}"))?;

    let mut strategy = Strategy::default();
    if let GameConfig::Mines(mines) = &game_config {
        let safe = MINES_GRID_SIZE - mines.mines;
        let reveals = args.reveals.unwrap_or(strategy.mines_reveals.min(safe));
        if reveals == 0 || reveals > safe {
            anyhow::bail!("reveals must be between 1 and {safe} with {} mines", mines.mines);
        }
        strategy.mines_reveals = reveals;
    }
    if args.sequential {
        strategy.mines_order = AutoOrder::Sequential;
    }
    if let Some(climb) = args.climb {
        if climb == 0 || climb > TOWER_ROWS {
            anyhow::bail!("climb must be between 1 and {TOWER_ROWS}, got {climb}");
        }
        strategy.tower_climb = climb;
    }
    if let Some(guesses) = args.guesses {
        if guesses == 0 || guesses > MAX_HILO_GUESSES {
            anyhow::bail!("guesses must be between 1 and {MAX_HILO_GUESSES}, got {guesses}");
        }
        strategy.hilo_guesses = guesses;
    }

    Ok(SimulatorConfig {
        game: game_config,
        rounds: args.rounds,
        wager: args.wager,
        seed: args.seed,
        bankroll: args.bankroll,
        strategy,
    })
}

fn open_ledger(data_dir: &Path) -> Result<Ledger<FileState>> {
    let state = FileState::open(data_dir)
        .with_context(|| format!("failed to open data dir {}", data_dir.display()))?;
    Ok(Ledger::new(state))
}

fn run_balance(data_dir: &Path, action: BalanceAction) -> Result<u64> {
    let mut ledger = open_ledger(data_dir)?;
    let balance = match action {
        BalanceAction::Show => ledger.get(),
        BalanceAction::Reset => ledger.reset(),
        BalanceAction::Set { amount } => {
            ledger.set(amount);
            ledger.get()
        }
    };
    Ok(balance)
}

fn run_simulate(data_dir: &Path, args: &SimulateArgs) -> Result<serde_json::Value> {
    let config = build_config(args)?;
    info!(
        game = %config.game_type(),
        rounds = config.rounds,
        wager = config.wager,
        seed = config.seed,
        "starting simulation"
    );
    let summary = match config.bankroll {
        Some(amount) => simulate(&config, &mut Ledger::with_balance(amount)),
        None => simulate(&config, &mut open_ledger(data_dir)?),
    }
    .context("simulation failed")?;
    Ok(json!({ "config": config, "summary": summary }))
}

fn list_games() -> serde_json::Value {
    let registry = GameRegistry::new();
    let games: Vec<_> = registry
        .all_games_info()
        .into_iter()
        .map(|info| {
            let config = registry.get_config(info.game_type);
            json!({
                "info": info,
                "config": config,
                "expected_return": config.and_then(GameConfig::expected_return),
            })
        })
        .collect();
    json!(games)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let output = match &args.command {
        Command::Balance { action } => json!({ "balance": run_balance(&args.data_dir, *action)? }),
        Command::Games => list_games(),
        Command::Simulate(simulate_args) => run_simulate(&args.data_dir, simulate_args)?,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed to encode output")?
    );
    Ok(())
}
