/// Output formatting: terminal tables and JSON.
use rankmerge_core::{BenchSummary, Item, MergeReport};
use serde::Serialize;

#[derive(Serialize)]
struct JsonRankedItem<'a> {
    rank: usize,
    name: &'a str,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    items: Vec<JsonRankedItem<'a>>,
    total: usize,
}

/// Render a ranked list as a numbered table.
pub fn render_table(items: &[Item]) -> String {
    let rank_width = items.len().to_string().len().max(1);
    let name_width = items.iter().map(|i| i.as_str().len()).max().unwrap_or(4).max(4);

    let mut out = String::new();
    out.push_str(&format!("{:>rank_width$} | {:<name_width$}\n", "#", "Item"));
    out.push_str(&format!("{}-|-{}\n", "-".repeat(rank_width), "-".repeat(name_width)));
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{:>rank_width$} | {:<name_width$}\n", i + 1, item.as_str()));
    }
    out.push_str(&format!("\n{} items ranked\n", items.len()));
    out
}

/// Print a ranked list as a formatted terminal table.
pub fn print_table(items: &[Item]) {
    print!("{}", render_table(items));
}

pub fn render_json(items: &[Item]) -> Result<String, serde_json::Error> {
    let output = JsonOutput {
        items: items
            .iter()
            .enumerate()
            .map(|(i, item)| JsonRankedItem { rank: i + 1, name: item.as_str() })
            .collect(),
        total: items.len(),
    };
    serde_json::to_string_pretty(&output)
}

/// Print a ranked list as JSON.
pub fn print_json(items: &[Item]) {
    match render_json(items) {
        Ok(json) => println!("{json}"),
        Err(e) => crate::bail(format!("Failed to serialize rankings: {e}")),
    }
}

/// One-line summary after a merge.
pub fn print_merge_summary(report: &MergeReport, dry_run: bool) {
    if report.is_noop() {
        println!("Nothing to merge. Ranked list unchanged ({} items).", report.ranked.len());
        return;
    }
    let suffix = if dry_run { " (dry run, nothing saved)" } else { "" };
    println!(
        "\nMerged {} items with {} comparisons. Ranked list now has {} items{suffix}.",
        report.inserted,
        report.comparisons,
        report.ranked.len(),
    );
}

pub fn print_bench_table(summary: &BenchSummary) {
    println!("Items per trial        | {}", summary.items);
    println!("Trials                 | {}", summary.trials);
    println!("Answer noise           | {:.3}", summary.noise);
    println!("Mean comparisons       | {:.1}", summary.mean_comparisons);
    println!("Max comparisons        | {}", summary.max_comparisons);
    println!("Worst-case bound       | {}", summary.comparison_bound);
    println!("Exact order recovered  | {:.1}%", summary.exact_rate * 100.0);
    println!("Adjacent inversions    | {:.2}", summary.mean_adjacent_inversions);
}

pub fn print_bench_json(summary: &BenchSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{json}"),
        Err(e) => crate::bail(format!("Failed to serialize benchmark summary: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(names: &[&str]) -> Vec<Item> {
        names.iter().map(|n| Item::new(*n)).collect()
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&items(&["b.txt", "c.txt", "a-long-name.txt"]));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "# | Item           ");
        assert_eq!(lines[2], "1 | b.txt          ");
        assert_eq!(lines[4], "3 | a-long-name.txt");
        assert!(table.ends_with("3 items ranked\n"));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&items(&["x", "y"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["items"][1]["rank"], 2);
        assert_eq!(value["items"][1]["name"], "y");
    }
}
