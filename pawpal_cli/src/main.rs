use clap::{Parser, Subcommand};
use pawpal_core::config::GeneratorConfig;
use pawpal_core::logging;
use pawpal_core::shop::{can_afford, CosmeticKind};
use pawpal_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pawpal")]
#[command(about = "Habit tracker with a virtual pet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Play {
        /// Use the built-in messages even if an API key is configured
        #[arg(long)]
        offline: bool,
    },

    /// List tracked habits and their goals
    Habits,

    /// List cosmetics for sale
    Shop,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_with_level(logging::level_for_verbosity(cli.verbose));

    let config = match cli.config {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };

    let mut out = io::stdout().lock();
    match cli.command {
        Some(Commands::Play { offline }) => cmd_play(&config, offline, io::stdin().lock(), &mut out),
        Some(Commands::Habits) => {
            print_habits(&mut out, &config.goals.build_habits()?)?;
            Ok(())
        }
        Some(Commands::Shop) => {
            print_shop(&mut out, config.session.initial_coins, &PetProfile::default())?;
            Ok(())
        }
        None => cmd_play(&config, false, io::stdin().lock(), &mut out),
    }
}

fn cmd_play(config: &Config, offline: bool, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    let generator: Box<dyn MessageGenerator> = if offline {
        Box::new(OfflineGenerator)
    } else {
        build_generator(&config.generator, GeneratorConfig::api_key_from_env())?
    };
    tracing::info!("Using {} message generator", generator.name());

    let dispatcher = MessageDispatcher::spawn(generator)?;
    let mut session = Session {
        engine: HabitStateEngine::from_config(config, dispatcher)?,
        profile: PetProfile::from_config(config),
        shown_seq: 0,
    };

    writeln!(
        out,
        "{} the {} is waiting for you. Type 'help' for commands.",
        session.profile.name(),
        session.profile.pet_type
    )?;
    session.print_mood(out)?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match session.handle(line, out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => writeln!(out, "Error: {}", e)?,
        }
        session.print_new_message(out)?;
    }

    // Let in-flight messages settle before the session ends
    session.engine.sink_mut().shutdown();
    session.print_new_message(out)?;
    writeln!(
        out,
        "Goodbye! Final streak {}, coins {}.",
        session.engine.streak(),
        session.engine.coins()
    )?;
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

struct Session {
    engine: HabitStateEngine<MessageDispatcher>,
    profile: PetProfile,
    shown_seq: u64,
}

impl Session {
    fn handle(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();

        match command.as_str() {
            "log" => {
                let habit: HabitId = arg(&args, 0, "log <habit> [amount]")?.parse()?;
                let delta = match args.get(1) {
                    Some(text) => text
                        .parse::<f64>()
                        .map_err(|_| Error::Other(format!("Invalid amount: {}", text)))?,
                    None => 1.0,
                };
                let outcome = self.engine.adjust_progress(habit, delta);
                self.print_outcome(&outcome, out)?;
            }
            "set" => {
                let habit: HabitId = arg(&args, 0, "set <habit> <value>")?.parse()?;
                // Unreadable totals count as zero
                let value = args
                    .get(1)
                    .and_then(|text| text.parse::<f64>().ok())
                    .unwrap_or(0.0);
                let outcome = self.engine.set_progress(habit, value);
                self.print_outcome(&outcome, out)?;
            }
            "status" => {
                if args.first() == Some(&"json") {
                    self.print_status_json(out)?;
                } else {
                    self.print_status(out)?;
                }
            }
            "habits" => print_habits(out, self.engine.habits())?,
            "shop" => print_shop(out, self.engine.coins(), &self.profile)?,
            "buy" => {
                let key = args.join(" ");
                if key.is_empty() {
                    return Err(Error::Other("Usage: buy <cosmetic>".into()));
                }
                let receipt = purchase(&mut self.engine, &mut self.profile, &key)?;
                writeln!(
                    out,
                    "Bought {} for {} coins. {} coins left.",
                    receipt.cosmetic.name, receipt.cosmetic.cost, receipt.remaining_coins
                )?;
            }
            "name" => {
                self.profile.rename(&args.join(" "))?;
                writeln!(out, "Your pet is now called {}.", self.profile.name())?;
            }
            "pet" => {
                self.profile.pet_type = arg(&args, 0, "pet <dog|cat|dragon>")?.parse()?;
                self.print_mood(out)?;
            }
            "win" => {
                let coins = self.engine.reward_minigame_win();
                writeln!(out, "You won the minigame! Coins: {}", coins)?;
                self.print_mood(out)?;
            }
            "message" => {
                let board = self.engine.sink().snapshot();
                match board.message() {
                    Some(message) => writeln!(out, "\"{}\"", message)?,
                    None if board.is_pending() => writeln!(out, "Thinking of something nice...")?,
                    None => writeln!(out, "No message yet. Complete a habit!")?,
                }
            }
            "help" => print_help(out)?,
            "quit" | "exit" => return Ok(Flow::Quit),
            other => writeln!(out, "Unknown command '{}'. Type 'help' for commands.", other)?,
        }

        Ok(Flow::Continue)
    }

    fn print_outcome(&self, outcome: &ProgressOutcome, out: &mut impl Write) -> Result<()> {
        let habit = self.engine.habits().get(outcome.habit);
        writeln!(
            out,
            "{}: {} / {} {}",
            habit.name, outcome.progress, habit.goal, habit.unit
        )?;
        if outcome.completed {
            writeln!(
                out,
                "Goal reached! Streak {}, coins {}.",
                self.engine.streak(),
                self.engine.coins()
            )?;
        }
        self.print_mood(out)
    }

    fn print_mood(&self, out: &mut impl Write) -> Result<()> {
        let mood = self.engine.mood();
        writeln!(
            out,
            "{} is {} ({}).",
            self.profile.name(),
            mood,
            illustration(self.profile.pet_type, mood)
        )?;
        Ok(())
    }

    fn print_status(&self, out: &mut impl Write) -> Result<()> {
        writeln!(
            out,
            "Streak: {}  Coins: {}  Mood: {}",
            self.engine.streak(),
            self.engine.coins(),
            self.engine.mood()
        )?;
        print_habits(out, self.engine.habits())
    }

    fn print_status_json(&self, out: &mut impl Write) -> Result<()> {
        let owned: Vec<&str> = self.profile.owned().collect();
        let status = serde_json::json!({
            "streak": self.engine.streak(),
            "coins": self.engine.coins(),
            "mood": self.engine.mood(),
            "pet": {
                "name": self.profile.name(),
                "type": self.profile.pet_type,
                "owned": owned,
            },
            "habits": self.engine.habits(),
            "completions": self.engine.completions(),
        });
        writeln!(out, "{}", serde_json::to_string(&status)?)?;
        Ok(())
    }

    fn print_new_message(&mut self, out: &mut impl Write) -> Result<()> {
        let board = self.engine.sink().snapshot();
        if let (Some(seq), Some(message)) = (board.displayed_seq(), board.message()) {
            if seq > self.shown_seq {
                self.shown_seq = seq;
                writeln!(out, "{} says: \"{}\"", self.profile.name(), message)?;
            }
        }
        Ok(())
    }
}

fn arg<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str> {
    args.get(index)
        .copied()
        .ok_or_else(|| Error::Other(format!("Usage: {}", usage)))
}

fn print_habits(out: &mut impl Write, habits: &HabitCollection) -> Result<()> {
    for habit in habits.iter() {
        let mark = if habit.is_completed() { "x" } else { " " };
        writeln!(
            out,
            "  [{}] {:<10} {:<14} {} / {} {}",
            mark,
            habit.id,
            habit.name,
            habit.progress,
            habit.goal,
            habit.unit
        )?;
    }
    Ok(())
}

fn print_shop(out: &mut impl Write, coins: u32, profile: &PetProfile) -> Result<()> {
    writeln!(out, "Coins: {}", coins)?;
    for cosmetic in get_default_cosmetics() {
        let kind = match cosmetic.kind {
            CosmeticKind::Skin => "skin",
            CosmeticKind::Outfit => "outfit",
        };
        let status = if profile.owns(&cosmetic.id) {
            "owned"
        } else if can_afford(cosmetic, coins) {
            "available"
        } else {
            "locked"
        };
        writeln!(
            out,
            "  {:<15} {:<15} {:<7} {:>4}  {}",
            cosmetic.id, cosmetic.name, kind, cosmetic.cost, status
        )?;
    }
    Ok(())
}

fn print_help(out: &mut impl Write) -> Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  log <habit> [amount]   add to a habit (amount may be negative)")?;
    writeln!(out, "  set <habit> <value>    set a habit's total")?;
    writeln!(out, "  status [json]          show streak, coins, mood and habits")?;
    writeln!(out, "  habits                 list habits")?;
    writeln!(out, "  shop                   list cosmetics")?;
    writeln!(out, "  buy <cosmetic>         buy a cosmetic")?;
    writeln!(out, "  name <name>            rename your pet")?;
    writeln!(out, "  pet <dog|cat|dragon>   change pet type")?;
    writeln!(out, "  win                    claim a minigame win")?;
    writeln!(out, "  message                show the latest encouragement")?;
    writeln!(out, "  quit                   end the session")?;
    writeln!(out, "Habits: water, sleep, steps, meals, screenTime")?;
    Ok(())
}
