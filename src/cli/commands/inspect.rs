//! Inspect command - Summarize a saved table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::App,
    cli::output::{format_number, print_kv, print_section, print_subsection},
    types::Action,
};

#[derive(Parser, Debug)]
#[command(about = "Summarize a saved table")]
pub struct InspectArgs {
    /// MessagePack table written by `run --output`
    pub path: PathBuf,

    /// Number of entries to list (0 lists all)
    #[arg(long, short = 'l', default_value_t = 20)]
    pub limit: usize,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let app = App::new();
    let table = app
        .load_table(&args.path)
        .with_context(|| format!("Failed to load table from {}", args.path.display()))?;

    let mut entries: Vec<_> = table.export().collect();
    entries.sort_by(|a, b| b.2.total_cmp(&a.2));

    let states: std::collections::HashSet<_> = entries.iter().map(|(s, _, _)| *s).collect();

    print_section(&format!("Table: {}", args.path.display()));
    print_kv("Entries", &format_number(entries.len()));
    print_kv("States", &format_number(states.len()));
    for action in Action::ALL {
        let count = entries.iter().filter(|(_, a, _)| **a == action).count();
        print_kv(&format!("Action {action}"), &format_number(count));
    }

    if entries.is_empty() {
        return Ok(());
    }

    let shown = if args.limit == 0 {
        entries.len()
    } else {
        args.limit.min(entries.len())
    };
    print_subsection(&format!("Top {shown} entries"));
    for (state, action, value) in entries.iter().take(shown) {
        println!("  {value:>8.3}  {action:<8} {state}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::MsgPackRepository,
        ports::{DriveSnapshot, SnapshotRepository},
        q_learning::QEntry,
        types::{DriveState, Light},
    };

    #[test]
    fn test_inspect_saved_table() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("table.msgpack");

        let state = DriveState {
            light: Light::Red,
            oncoming: None,
            left: Some(Action::Forward),
            waypoint: Some(Action::Right),
        };
        let snapshot = DriveSnapshot::new(vec![QEntry {
            state,
            action: Action::Idle,
            value: 0.0,
        }]);
        MsgPackRepository::new().save(&snapshot, &path).unwrap();

        execute(InspectArgs { path, limit: 0 }).unwrap();
    }

    #[test]
    fn test_inspect_missing_file_fails() {
        let args = InspectArgs {
            path: PathBuf::from("/nonexistent/table.msgpack"),
            limit: 5,
        };
        assert!(execute(args).is_err());
    }
}
