use clap::{Parser, Subcommand, ValueEnum};
use engine::api::{build_payload, resolve, ResolveConfig};
use engine::{Ability, AdvantageState, Character, CheckRequest, Dice, Outcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum Adv {
    Normal,
    Advantage,
    Disadvantage,
}

#[derive(Subcommand)]
enum Cmd {
    /// Roll a d20 multiple times with optional advantage/disadvantage
    Roll {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Advantage source; repeat to combine (advantage + disadvantage cancel)
        #[arg(long, value_enum)]
        adv: Vec<Adv>,
        /// Number of rolls
        #[arg(long, default_value_t = 5)]
        rolls: u32,
    },
    /// Perform a check against a DC using a flat modifier and (dis)advantage
    Check {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Advantage source; repeat to combine (advantage + disadvantage cancel)
        #[arg(long, value_enum)]
        adv: Vec<Adv>,
        /// Difficulty Class to beat (>=)
        #[arg(long)]
        dc: i32,
        /// Ability/skill modifier to add to the d20
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        modifier: i32,
        /// Use a physical die result (1-20) instead of rolling
        #[arg(long, allow_hyphen_values = true)]
        manual: Option<i32>,
    },
    /// Resolve a check request for a character snapshot (JSON or YAML files)
    Resolve {
        #[command(flatten)]
        input: ResolveArgs,
        /// Print {player_roll, resolution} as JSON instead of the log
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve and print the body for the backend's resolve-check endpoint
    Payload {
        #[command(flatten)]
        input: ResolveArgs,
        #[arg(long)]
        character_id: String,
        #[arg(long)]
        campaign_id: String,
    },
    /// Estimate outcome tier odds for a request over many seeded trials
    Odds {
        /// Path to the character snapshot
        #[arg(long)]
        character: PathBuf,
        /// Path to the check request
        #[arg(long)]
        request: PathBuf,
        /// Number of trials
        #[arg(long, default_value_t = 1000)]
        trials: u32,
        /// RNG base seed (trial i uses seed+i)
        #[arg(long, default_value_t = 12345)]
        seed: u64,
    },
    /// Serialize the sample character snapshot to JSON (stdout)
    SampleCharacter {
        /// Pretty-print JSON
        #[arg(long, default_value_t = true)]
        pretty: bool,
    },
}

#[derive(clap::Args)]
struct ResolveArgs {
    /// Path to the character snapshot
    #[arg(long)]
    character: PathBuf,
    /// Path to the check request
    #[arg(long)]
    request: PathBuf,
    /// RNG seed (0 = OS entropy)
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Use a physical die result (1-20) instead of rolling
    #[arg(long, allow_hyphen_values = true)]
    manual: Option<i32>,
}

impl ResolveArgs {
    fn into_config(self) -> ResolveConfig {
        ResolveConfig {
            character_path: Some(self.character.to_string_lossy().into_owned()),
            request_path: Some(self.request.to_string_lossy().into_owned()),
            seed: self.seed,
            manual_roll: self.manual,
            ..Default::default()
        }
    }
}

#[derive(Parser)]
#[command(name = "check-cli")]
#[command(about = "Ability check resolver harness")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn to_mode(sources: &[Adv]) -> AdvantageState {
    AdvantageState::combine_all(sources.iter().map(|a| match a {
        Adv::Normal => AdvantageState::Normal,
        Adv::Advantage => AdvantageState::Advantage,
        Adv::Disadvantage => AdvantageState::Disadvantage,
    }))
}

fn sample_character() -> Character {
    // L3 rogue: PB +2; Stealth & Sleight of Hand proficient
    Character::new(3)
        .with_stat(Ability::Strength, 10)
        .with_stat(Ability::Dexterity, 16)
        .with_stat(Ability::Constitution, 12)
        .with_stat(Ability::Intelligence, 13)
        .with_stat(Ability::Wisdom, 11)
        .with_stat(Ability::Charisma, 9)
        .with_skill("Stealth")
        .with_skill("Sleight of Hand")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Roll { seed, adv, rolls } => {
            let mode = to_mode(&adv);
            let mut dice = Dice::from_seed(seed);
            for _ in 0..rolls {
                let r = engine::roll_d20(&mut dice, mode, None)?;
                match r.advantage_rolls {
                    Some([a, b]) => println!("{} ({} / {})", r.d20_roll, a, b),
                    None => println!("{}", r.d20_roll),
                }
            }
        }
        Cmd::Check {
            seed,
            adv,
            dc,
            modifier,
            manual,
        } => {
            let mode = to_mode(&adv);
            let mut dice = Dice::from_seed(seed);
            let res = engine::check(&mut dice, engine::CheckInput { dc, modifier, mode }, manual)?;
            println!(
                "roll={} mod={:+} total={} dc={} margin={:+} => {}",
                res.roll.d20_roll,
                modifier,
                res.total,
                res.dc,
                res.resolution.margin,
                res.resolution.outcome
            );
        }
        Cmd::Resolve { input, json } => {
            let report = resolve(input.into_config())?;
            if json {
                let body = serde_json::json!({
                    "player_roll": report.player_roll,
                    "resolution": report.resolution,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                for line in &report.log {
                    println!("{}", line);
                }
            }
        }
        Cmd::Payload {
            input,
            character_id,
            campaign_id,
        } => {
            let payload = build_payload(input.into_config(), &character_id, &campaign_id)?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Cmd::Odds {
            character,
            request,
            trials,
            seed,
        } => {
            let character = engine::api::load_character(&character)?;
            let request = engine::api::load_request(&request)?;
            print_odds(&character, &request, trials, seed)?;
        }
        Cmd::SampleCharacter { pretty } => {
            let character = sample_character();
            if pretty {
                println!("{}", serde_json::to_string_pretty(&character)?);
            } else {
                println!("{}", serde_json::to_string(&character)?);
            }
        }
    }
    Ok(())
}

fn print_odds(
    character: &Character,
    request: &CheckRequest,
    trials: u32,
    seed: u64,
) -> anyhow::Result<()> {
    if trials == 0 {
        anyhow::bail!("--trials must be at least 1");
    }
    tracing::debug!(trials, seed, "estimating outcome odds");
    let mut counts = [0u32; 6];
    let mut successes = 0u32;
    for i in 0..trials {
        let mut dice = Dice::from_seed(seed.wrapping_add(i as u64));
        let out = engine::resolve_check(&mut dice, character, request, None)?;
        if out.resolution.success {
            successes += 1;
        }
        if let Some(idx) = Outcome::ALL
            .iter()
            .position(|o| *o == out.resolution.outcome)
        {
            counts[idx] += 1;
        }
    }
    let pct = |n: u32| 100.0 * n as f64 / trials as f64;
    println!(
        "{} DC {} ({}) over {} trials",
        request.ability, request.dc, request.advantage_state, trials
    );
    for (outcome, n) in Outcome::ALL.iter().zip(counts) {
        println!("  {:<17} {:>6} ({:5.1}%)", outcome.as_str(), n, pct(n));
    }
    println!("  success rate      {:5.1}%", pct(successes));
    Ok(())
}
