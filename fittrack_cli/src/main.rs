use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use fittrack_core::progress::as_percent;
use fittrack_core::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fittrack")]
#[command(about = "Log workouts, meals, goals and progress; view your daily summary", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the remote service base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override the bearer token
    #[arg(long, global = true)]
    token: Option<String>,

    /// Override data directory (holds stashed drafts)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log at info level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's macros, recent activity and goal progress
    Dashboard,

    /// Log a new record
    Log {
        #[command(subcommand)]
        record: LogCommand,
    },

    /// Search the food database
    Foods {
        /// Food name to look for
        query: String,
    },

    /// Ask for advice based on recent activity
    Insights {
        /// workout_recommendation, nutrition_advice or progress_analysis
        #[arg(long, default_value = "workout_recommendation")]
        category: String,
    },

    /// Re-submit drafts saved after a failed submission
    Retry {
        /// Only list the saved drafts
        #[arg(long)]
        list: bool,
    },

    /// Write a default config file
    InitConfig {
        /// Write here instead of the standard location
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum LogCommand {
    /// Log an exercise
    Exercise(ExerciseArgs),
    /// Log a meal or snack
    Meal(MealArgs),
    /// Set a goal
    Goal(GoalArgs),
    /// Log a body measurement
    Progress(ProgressArgs),
}

#[derive(Args)]
struct ExerciseArgs {
    #[arg(long)]
    name: Option<String>,
    /// strength, cardio or flexibility
    #[arg(long)]
    kind: Option<String>,
    #[arg(long)]
    sets: Option<String>,
    #[arg(long)]
    reps: Option<String>,
    #[arg(long)]
    weight: Option<String>,
    /// Minutes
    #[arg(long)]
    duration: Option<String>,
    /// Kilometres
    #[arg(long)]
    distance: Option<String>,
    #[arg(long)]
    calories: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args)]
struct MealArgs {
    #[arg(long)]
    food: Option<String>,
    #[arg(long)]
    serving_size: Option<String>,
    /// g, oz, cup or piece
    #[arg(long)]
    unit: Option<String>,
    /// breakfast, lunch, dinner or snack
    #[arg(long)]
    meal: Option<String>,
    #[arg(long)]
    calories: Option<String>,
    #[arg(long)]
    protein: Option<String>,
    #[arg(long)]
    carbs: Option<String>,
    #[arg(long)]
    fat: Option<String>,
    /// Pre-fill name and per-100g macros from the first search match
    #[arg(long)]
    from_search: Option<String>,
}

#[derive(Args)]
struct GoalArgs {
    /// weight_loss, muscle_gain, endurance or strength
    #[arg(long)]
    kind: Option<String>,
    #[arg(long)]
    current: Option<String>,
    #[arg(long)]
    target: Option<String>,
    #[arg(long)]
    unit: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    target_date: Option<String>,
}

#[derive(Args)]
struct ProgressArgs {
    /// weight, body_fat or muscle_mass
    #[arg(long)]
    metric: Option<String>,
    #[arg(long)]
    value: Option<String>,
    #[arg(long)]
    unit: Option<String>,
}

impl From<ExerciseArgs> for ExerciseDraft {
    fn from(a: ExerciseArgs) -> Self {
        ExerciseDraft {
            name: a.name,
            kind: a.kind,
            sets: a.sets,
            reps: a.reps,
            weight: a.weight,
            duration_minutes: a.duration,
            distance_km: a.distance,
            calories_burned: a.calories,
            notes: a.notes,
        }
    }
}

impl From<GoalArgs> for GoalDraft {
    fn from(a: GoalArgs) -> Self {
        GoalDraft {
            kind: a.kind,
            current_value: a.current,
            target_value: a.target,
            unit: a.unit,
            target_date: a.target_date,
        }
    }
}

impl From<ProgressArgs> for ProgressDraft {
    fn from(a: ProgressArgs) -> Self {
        ProgressDraft {
            metric_kind: a.metric,
            value: a.value,
            unit: a.unit,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    fittrack_core::logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = cli.base_url {
        config.remote.base_url = url;
    }
    if let Some(token) = cli.token {
        config.remote.token = Some(token);
    }
    if let Some(dir) = cli.data_dir {
        config.data.data_dir = dir;
    }

    tracing::debug!("Remote service at {}", config.remote.base_url);
    let out = Output { json: cli.json };

    match cli.command {
        Commands::Dashboard => cmd_dashboard(&config, &out).await,
        Commands::Log { record } => cmd_log(&config, &out, record).await,
        Commands::Foods { query } => cmd_foods(&config, &out, &query).await,
        Commands::Insights { category } => cmd_insights(&config, &out, &category).await,
        Commands::Retry { list } => cmd_retry(&config, &out, list).await,
        Commands::InitConfig { path, force } => cmd_init_config(&config, path, force),
    }
}

fn tracker(config: &Config) -> Result<Tracker<ReqwestRemoteStore>> {
    let store = ReqwestRemoteStore::from_config(&config.remote)?;
    Ok(Tracker::new(store)
        .with_limits(config.dashboard.limits())
        .with_fallback_advice(config.insights.fallback_advice.clone()))
}

async fn cmd_dashboard(config: &Config, out: &Output) -> Result<()> {
    let snapshot = tracker(config)?.load_dashboard().await?;
    out.snapshot(&snapshot)
}

async fn cmd_log(config: &Config, out: &Output, command: LogCommand) -> Result<()> {
    let draft = match command {
        LogCommand::Exercise(args) => Draft::Exercise(args.into()),
        LogCommand::Goal(args) => Draft::Goal(args.into()),
        LogCommand::Progress(args) => Draft::Progress(args.into()),
        LogCommand::Meal(args) => Draft::Nutrition(meal_draft(config, args).await?),
    };

    // Reject bad input before credentials or the network are involved
    normalize(&draft, Utc::now())?;

    let tracker = tracker(config)?;
    match tracker.submit(&draft).await {
        Ok(snapshot) => {
            if !out.json {
                println!("✓ {} logged", capitalize(draft.label()));
                println!();
            }
            out.snapshot(&snapshot)
        }
        Err(e @ Error::RefreshFailed(_)) => {
            // Stored remotely; sending the draft again would duplicate it
            if !out.json {
                println!("✓ {} logged", capitalize(draft.label()));
            }
            Err(e)
        }
        Err(e) if e.is_transport() => {
            let stash = DraftStash::in_dir(&config.data.data_dir);
            let id = stash.push(&draft)?;
            eprintln!("Could not reach the FitTrack service: {}", e);
            eprintln!(
                "Your {} was kept as draft {}. Run `fittrack retry` to submit it again.",
                draft.label(),
                id
            );
            Err(e)
        }
        Err(e) => Err(e),
    }
}

async fn meal_draft(config: &Config, args: MealArgs) -> Result<NutritionDraft> {
    let mut draft = NutritionDraft {
        food_name: args.food,
        serving_size: args.serving_size,
        serving_unit: args.unit,
        meal_type: args.meal,
        macros: MacrosDraft {
            calories: args.calories,
            protein: args.protein,
            carbohydrates: args.carbs,
            fat: args.fat,
        },
    };

    if let Some(query) = args.from_search {
        let foods = tracker(config)?.search_foods(&query).await?;
        match foods.first() {
            Some(food) => {
                eprintln!("Using \"{}\" (values per 100g)", food.name);
                apply_food_candidate(&mut draft, food);
            }
            None => eprintln!("No food matched \"{}\"; using the values given", query),
        }
    }

    Ok(draft)
}

async fn cmd_foods(config: &Config, out: &Output, query: &str) -> Result<()> {
    let foods = tracker(config)?.search_foods(query).await?;

    if out.json {
        println!("{}", serde_json::to_string_pretty(&foods)?);
        return Ok(());
    }

    if foods.is_empty() {
        println!("No foods found.");
        return Ok(());
    }

    for food in &foods {
        println!(
            "  {:<20} {:>6.0} kcal  P {:>5.1}g  C {:>5.1}g  F {:>5.1}g  (per 100g)",
            food.name, food.calories_per_100g, food.protein, food.carbs, food.fat
        );
    }
    Ok(())
}

async fn cmd_insights(config: &Config, out: &Output, category: &str) -> Result<()> {
    let category = InsightCategory::parse(category)
        .ok_or_else(|| ValidationError::new("category", ValidationReason::UnknownVariant(category.into())))?;

    let tracker = tracker(config)?;
    let snapshot = tracker.load_dashboard().await?;
    let advice = tracker.insights(&snapshot, category).await;

    if out.json {
        let value = serde_json::json!({
            "category": category,
            "advice": advice.text(),
            "fallback": advice.is_fallback(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", advice.text());
    }
    Ok(())
}

async fn cmd_retry(config: &Config, out: &Output, list_only: bool) -> Result<()> {
    let stash = DraftStash::in_dir(&config.data.data_dir);
    let pending = stash.list()?;

    if pending.is_empty() {
        println!("No saved drafts.");
        return Ok(());
    }

    if list_only {
        if out.json {
            println!("{}", serde_json::to_string_pretty(&pending)?);
        } else {
            for entry in &pending {
                println!(
                    "  {}  {}  {}",
                    entry.id,
                    entry.stashed_at.format("%Y-%m-%d %H:%M"),
                    entry.draft.label()
                );
            }
        }
        return Ok(());
    }

    let tracker = tracker(config)?;
    let mut done: Vec<uuid::Uuid> = Vec::new();
    let mut last_snapshot = None;
    let mut refresh_error = None;
    let mut outcome = Ok(());

    for entry in &pending {
        match tracker.submit(&entry.draft).await {
            Ok(snapshot) => {
                println!("✓ Submitted {} {}", entry.draft.label(), entry.id);
                done.push(entry.id);
                last_snapshot = Some(snapshot);
            }
            Err(e @ Error::RefreshFailed(_)) => {
                println!("✓ Submitted {} {}", entry.draft.label(), entry.id);
                done.push(entry.id);
                refresh_error = Some(e);
            }
            Err(Error::Validation(e)) => {
                eprintln!("✗ Dropping {} {}: {}", entry.draft.label(), entry.id, e);
                done.push(entry.id);
            }
            Err(e) => {
                // Service still unreachable; keep this and the rest for later
                outcome = Err(e);
                break;
            }
        }
    }

    stash.remove(&done)?;
    let left = pending.len() - done.len();
    if left > 0 {
        eprintln!("{} draft(s) still waiting", left);
    }

    match (last_snapshot, refresh_error) {
        (Some(snapshot), _) => {
            println!();
            out.snapshot(&snapshot)?;
        }
        (None, Some(e)) => outcome = outcome.and(Err(e)),
        (None, None) => {}
    }
    outcome
}

fn cmd_init_config(config: &Config, path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(Config::default_config_path);
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    config.save_to(&path)?;
    println!("✓ Wrote {}", path.display());
    Ok(())
}

struct Output {
    json: bool,
}

impl Output {
    fn snapshot(&self, snapshot: &DashboardSnapshot) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(snapshot)?);
        } else {
            display_snapshot(snapshot);
        }
        Ok(())
    }
}

fn display_snapshot(snapshot: &DashboardSnapshot) {
    let m = &snapshot.daily_macros;
    println!("╭─────────────────────────────────────────╮");
    println!("│  TODAY");
    println!("╰─────────────────────────────────────────╯");
    let rows = [
        ("Calories", m.calories, DAILY_TARGETS.calories, "kcal"),
        ("Protein", m.protein, DAILY_TARGETS.protein, "g"),
        ("Carbs", m.carbs, DAILY_TARGETS.carbs, "g"),
        ("Fat", m.fat, DAILY_TARGETS.fat, "g"),
    ];
    for (label, value, target, unit) in rows {
        let ratio = progress_ratio(value, target);
        println!(
            "  {:<9} {:>6.0} / {:<5.0}{:<5} {} {:>3.0}%",
            label,
            value,
            target,
            unit,
            bar(ratio),
            as_percent(ratio)
        );
    }
    println!();

    println!("  Recent exercises:");
    if snapshot.recent_exercises.is_empty() {
        println!("    (none)");
    }
    for e in &snapshot.recent_exercises {
        println!("    {} ({})", e.name, describe_exercise(e));
    }
    println!();

    println!("  Goals:");
    if snapshot.active_goals.is_empty() {
        println!("    (none)");
    }
    for g in &snapshot.active_goals {
        println!(
            "    {:?}: {} / {} {}  [{:.0}%]",
            g.goal.kind,
            g.goal.current_value,
            g.goal.target_value,
            g.goal.unit,
            as_percent(g.progress_ratio)
        );
    }
    println!();

    println!("  Recent progress:");
    if snapshot.recent_progress.is_empty() {
        println!("    (none)");
    }
    for p in &snapshot.recent_progress {
        println!(
            "    {}  {:?} {} {}",
            p.logged_at.format("%Y-%m-%d"),
            p.metric_kind,
            p.value,
            p.unit
        );
    }
}

/// Fixed daily targets the totals are shown against
const DAILY_TARGETS: DailyMacros = DailyMacros {
    calories: 2000.0,
    protein: 150.0,
    carbs: 250.0,
    fat: 65.0,
};

const BAR_WIDTH: usize = 20;

fn bar(ratio: f64) -> String {
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn describe_exercise(e: &Exercise) -> String {
    let mut parts = Vec::new();
    match &e.details {
        ExerciseDetails::Strength { sets, reps, weight } => {
            parts.push("strength".to_string());
            if let (Some(s), Some(r)) = (sets, reps) {
                parts.push(format!("{}x{}", s, r));
            }
            if let Some(w) = weight {
                parts.push(format!("{}kg", w));
            }
        }
        ExerciseDetails::Cardio {
            duration_minutes,
            distance_km,
        } => {
            parts.push("cardio".to_string());
            if let Some(d) = duration_minutes {
                parts.push(format!("{} min", d));
            }
            if let Some(km) = distance_km {
                parts.push(format!("{} km", km));
            }
        }
        ExerciseDetails::Flexibility => parts.push("flexibility".to_string()),
    }
    parts.join(", ")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
