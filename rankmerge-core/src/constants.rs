/// Answers that pick the existing (left) item, placing the new item before it.
///
/// `<` and `,` share a key on most keyboards, as do `>` and `.`, so either
/// form of each is accepted.
pub const LEFT_ANSWERS: [&str; 4] = ["<", ",", "l", "left"];

/// Answers that pick the new (right) item, placing it after the existing one.
pub const RIGHT_ANSWERS: [&str; 4] = [">", ".", "r", "right"];

/// Default file holding items waiting to be merged.
pub const DEFAULT_PENDING_PATH: &str = "input.txt";

/// Default file holding the ranked list.
pub const DEFAULT_RANKED_PATH: &str = "output.txt";

/// Default question shown above each comparison.
pub const DEFAULT_CRITERION: &str = "Choose the MORE DIFFICULT file";

/// Default number of synthetic items per benchmark trial.
pub const DEFAULT_BENCH_ITEMS: usize = 100;

/// Default number of benchmark trials.
pub const DEFAULT_BENCH_TRIALS: usize = 50;
