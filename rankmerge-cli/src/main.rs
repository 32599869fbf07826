mod config;
mod output;
mod prompt;
mod rotate;
mod worker;

use clap::Parser;
use rankmerge_core::constants::{
    DEFAULT_BENCH_ITEMS, DEFAULT_BENCH_TRIALS, DEFAULT_CRITERION, DEFAULT_PENDING_PATH,
    DEFAULT_RANKED_PATH,
};
use rankmerge_core::{
    AnswerVocabulary, BenchOptions, FileStore, MergeError, MergeSession, Store, UnrecognizedPolicy,
    run_bench,
};
use reqwest::Client;
use std::io;
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::config::RankmergeConfig;
use crate::prompt::ConsoleOracle;
use crate::rotate::{Credentials, Endpoints, Rotator};
use crate::worker::WorkerVars;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "rankmerge", version, about = "Merge new items into a ranked list by answering pairwise questions")]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (default: ~/.config/rankmerge/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Insert every pending item into the ranked list, asking one question at a time
    Merge(MergeArgs),
    /// Print the ranked list
    Show(ShowArgs),
    /// Measure how many questions merges cost, using a simulated judge
    Bench(BenchArgs),
    /// Create a default config file (at --config, or ~/.config/rankmerge/config.toml)
    Init,
    /// Issue a fresh storage download token and redeploy the edge worker with it
    RotateToken(RotateArgs),
}

#[derive(Parser)]
struct MergeArgs {
    /// File of new items, one per line (cleared after a successful merge)
    #[arg(long)]
    pending: Option<PathBuf>,

    /// File holding the ranked list, one item per line
    #[arg(long)]
    ranked: Option<PathBuf>,

    /// Question shown above each comparison
    #[arg(long)]
    criterion: Option<String>,

    /// How to treat answers outside the vocabulary: "right", "left" or "reprompt"
    #[arg(long)]
    unrecognized: Option<String>,

    /// Treat a missing pending or ranked file as empty
    #[arg(long)]
    allow_missing: bool,

    /// Print the merged list without saving anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Parser)]
struct ShowArgs {
    /// File holding the ranked list
    #[arg(long)]
    ranked: Option<PathBuf>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct BenchArgs {
    /// Items merged per trial
    #[arg(long, default_value_t = DEFAULT_BENCH_ITEMS)]
    items: usize,

    /// Number of trials
    #[arg(long, default_value_t = DEFAULT_BENCH_TRIALS)]
    trials: usize,

    /// Probability that the simulated judge flips an answer (0.0 to 1.0)
    #[arg(long, default_value_t = 0.0)]
    noise: f64,

    /// Seed for shuffles and noise. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct RotateArgs {
    /// Worker script name to overwrite
    #[arg(long)]
    worker: Option<String>,

    /// Token lifetime in seconds (max one week)
    #[arg(long)]
    valid_secs: Option<u64>,

    /// Path to a custom worker template containing $download_token
    #[arg(long)]
    template: Option<PathBuf>,

    /// Public CDN host substituted for $public_host
    #[arg(long)]
    public_host: Option<String>,

    /// Bucket name substituted for $bucket_name
    #[arg(long)]
    bucket_name: Option<String>,

    /// Max retries per HTTP call. Default: 3. Set to 0 to disable.
    #[arg(long)]
    retries: Option<usize>,

    /// Fetch the token and print the worker script (token redacted) without deploying
    #[arg(long)]
    dry_run: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Resolved lazily; `bench` never touches the config.
    let config_path = || cli.config.clone().unwrap_or_else(config::config_path);

    match cli.command {
        Commands::Merge(ref args) => run_merge(args, &config::load_config(&config_path())),
        Commands::Show(ref args) => run_show(args, &config::load_config(&config_path())),
        Commands::Bench(ref args) => run_bench_command(args),
        Commands::Init => {
            let path = config_path();
            config::create_default_config(&path)
                .unwrap_or_else(|e| bail(format!("Failed to create config at {}: {e}", path.display())));
            println!("Created config at {}", path.display());
            println!("Edit it to set your default files, criterion, etc.");
        }
        Commands::RotateToken(ref args) => {
            run_rotate(args, &config::load_config(&config_path())).await
        }
    }
}

fn ranked_path(arg: Option<PathBuf>, cfg: &RankmergeConfig) -> PathBuf {
    arg.or_else(|| cfg.ranked.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RANKED_PATH))
}

/// Refuse to merge a file into itself, however either path is spelled.
fn check_distinct_stores(pending: &FileStore, ranked: &FileStore) -> Result<(), String> {
    if pending.is_same_file(ranked) {
        return Err(format!(
            "Pending and ranked files are the same: {} and {}",
            pending.describe(),
            ranked.describe()
        ));
    }
    Ok(())
}

fn merge_failure_message(err: &MergeError, pending: &Path, ranked: &Path) -> String {
    match err {
        MergeError::PendingNotCleared { source } => format!(
            "Ranked list was saved to {}, but {} could not be cleared: {source}\n\
             Empty {} by hand before the next merge, or its items will be inserted twice.",
            ranked.display(),
            pending.display(),
            pending.display()
        ),
        other => format!("Merge failed, nothing was saved: {other}"),
    }
}

fn run_merge(args: &MergeArgs, cfg: &RankmergeConfig) {
    let pending_path = args.pending.clone()
        .or_else(|| cfg.pending.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PENDING_PATH));
    let ranked_path = ranked_path(args.ranked.clone(), cfg);
    let criterion = args.criterion.clone()
        .or_else(|| cfg.criterion.clone())
        .unwrap_or_else(|| DEFAULT_CRITERION.to_string());

    let policy = match args.unrecognized.as_deref().or(cfg.unrecognized.as_deref()) {
        None => UnrecognizedPolicy::default(),
        Some(value) => UnrecognizedPolicy::parse(value).unwrap_or_else(|| {
            bail(format!("Unknown policy \"{value}\". Use \"right\", \"left\" or \"reprompt\"."))
        }),
    };

    let pending = FileStore::new(&pending_path).allow_missing(args.allow_missing);
    let ranked = FileStore::new(&ranked_path).allow_missing(args.allow_missing);
    check_distinct_stores(&pending, &ranked).unwrap_or_else(|e| bail(e));

    let stdin = io::stdin();
    let mut oracle = ConsoleOracle::new(
        stdin.lock(),
        io::stdout(),
        criterion,
        AnswerVocabulary::new(policy),
    );

    let report = MergeSession::new(&pending, &ranked)
        .dry_run(args.dry_run)
        .run(&mut oracle)
        .unwrap_or_else(|e| bail(merge_failure_message(&e, &pending_path, &ranked_path)));

    if args.dry_run {
        println!();
        output::print_table(&report.ranked);
    }
    output::print_merge_summary(&report, args.dry_run);
}

fn run_show(args: &ShowArgs, cfg: &RankmergeConfig) {
    let store = FileStore::new(ranked_path(args.ranked.clone(), cfg));
    let items = store
        .load()
        .unwrap_or_else(|e| bail(format!("Failed to load {}: {e}", store.describe())));

    if args.json {
        output::print_json(&items);
    } else {
        output::print_table(&items);
    }
}

fn run_bench_command(args: &BenchArgs) {
    if !(0.0..=1.0).contains(&args.noise) {
        bail(format!("--noise must be between 0.0 and 1.0, got {}", args.noise));
    }
    let seed = args.seed.unwrap_or_else(rand::random);

    let summary = run_bench(&BenchOptions {
        items: args.items,
        trials: args.trials,
        noise: args.noise,
        seed,
    })
    .unwrap_or_else(|e| bail(format!("Benchmark failed: {e}")));

    if args.json {
        output::print_bench_json(&summary);
    } else {
        eprintln!("Seed: {seed}");
        output::print_bench_table(&summary);
    }
}

async fn run_rotate(args: &RotateArgs, cfg: &RankmergeConfig) {
    let section = &cfg.rotate;

    let creds = Credentials::from_env().unwrap_or_else(|e| bail(e));
    let valid_secs = rotate::validate_duration(
        args.valid_secs.or(section.valid_secs).unwrap_or(rotate::MAX_VALID_SECS),
    )
    .unwrap_or_else(|e| bail(e));
    let worker_name = args.worker.clone()
        .or_else(|| section.worker_name.clone())
        .unwrap_or_else(|| rotate::DEFAULT_WORKER_NAME.to_string());
    let max_retries = args.retries.or(section.retries).unwrap_or(3);

    // Worker template: CLI arg > config file > built-in default
    let template = {
        let template_path = args.template.clone()
            .or_else(|| section.worker_template.as_ref().map(PathBuf::from));
        match template_path {
            Some(path) => worker::load_template(&path),
            None => worker::DEFAULT_TEMPLATE.to_string(),
        }
    };
    let public_host = args.public_host.as_deref().or(section.public_host.as_deref());
    let bucket_name = args.bucket_name.as_deref().or(section.bucket_name.as_deref());

    // Catch missing template values before spending any API calls.
    worker::render(&template, &WorkerVars { download_token: "", public_host, bucket_name })
        .unwrap_or_else(|e| bail(e));

    let rotator = Rotator::new(Client::new(), Endpoints::default(), max_retries);

    let account = rotator
        .authorize_account(&creds)
        .await
        .unwrap_or_else(|e| bail(e));
    let token = rotator
        .download_authorization(&account, &creds.bucket_id, valid_secs)
        .await
        .unwrap_or_else(|e| bail(e));

    if args.dry_run {
        let preview = worker::render(
            &template,
            &WorkerVars { download_token: "<redacted>", public_host, bucket_name },
        )
        .unwrap_or_else(|e| bail(e));
        println!("{preview}");
        eprintln!("Dry run: worker \"{worker_name}\" not deployed.");
        return;
    }

    let script = worker::render(&template, &WorkerVars { download_token: &token, public_host, bucket_name })
        .unwrap_or_else(|e| bail(e));
    rotator
        .deploy_worker(&creds.account_id, &worker_name, &creds.worker_api_token, &script)
        .await
        .unwrap_or_else(|e| bail(e));

    println!("Deployed worker \"{worker_name}\" with a token valid for {valid_secs} seconds.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankmerge_core::StoreError;

    #[test]
    fn test_same_file_under_another_spelling_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("d")).unwrap();
        std::fs::create_dir(dir.path().join("d").join("sub")).unwrap();
        std::fs::write(dir.path().join("d").join("out.txt"), "b.txt\nc.txt\n").unwrap();

        let pending = FileStore::new(dir.path().join("d").join("sub").join("..").join("out.txt"));
        let ranked = FileStore::new(dir.path().join("d").join("out.txt"));
        let err = check_distinct_stores(&pending, &ranked).unwrap_err();
        assert!(err.contains("the same"));

        let pending = FileStore::new(dir.path().join("d").join("in.txt"));
        assert!(check_distinct_stores(&pending, &ranked).is_ok());
    }

    #[test]
    fn test_uncleared_pending_message_says_ranked_was_saved() {
        let err = MergeError::PendingNotCleared {
            source: StoreError::Io {
                path: "in.txt".into(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            },
        };
        let msg = merge_failure_message(&err, Path::new("in.txt"), Path::new("out.txt"));
        assert!(msg.contains("saved to out.txt"));
        assert!(msg.contains("Empty in.txt by hand"));
        assert!(!msg.contains("nothing was saved"));
    }

    #[test]
    fn test_other_merge_failures_say_nothing_was_saved() {
        let err = MergeError::Store(StoreError::Missing { path: "in.txt".into() });
        let msg = merge_failure_message(&err, Path::new("in.txt"), Path::new("out.txt"));
        assert!(msg.starts_with("Merge failed, nothing was saved"));
    }
}
