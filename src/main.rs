//! Interactive demo over a small in-memory user table.
//!
//! Reads commands from stdin, applies them as [`TableEvent`]s and prints the
//! relayed actions followed by the re-rendered table.
//!
//! # Usage
//!
//! ```text
//! tablestate [CONFIG.toml]
//! ```
//!
//! Column preferences are stored in the JSON file named by the config's
//! `preferences_file`, or in the default data directory.
//!
//! # Commands
//!
//! - `filter <key>`: toggle a quick filter (`active`, `admins`, `locked`)
//! - `only <key>`: activate a quick filter
//! - `clear`: clear quick filters
//! - `range <24h|7d|30d|all>`: change the date range
//! - `page <n>`: go to page `n` (1-based)
//! - `size <n>`: change the page size
//! - `col <key>` / `cols reset`: toggle a column / reset columns
//! - `select <id>` / `all` / `none`: row selection
//! - `search <text>`: set the search query (`search` alone clears it)
//! - `help`, `quit`

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use tablestate::domain::{
    serialized_cell, BadgeColor, ColumnDef, ColumnType, DateRangePreset, QuickFilter, TableRow,
};
use tablestate::observability::init_tracing;
use tablestate::reactive::Signal;
use tablestate::storage::JsonFileStore;
use tablestate::table::PageEvent;
use tablestate::{handle_event, Config, DataTable, TableAction, TableEvent};

const DEFAULT_PREFERENCES_KEY: &str = "demo.users.columns";

const HELP: &str = "commands: filter <key> | only <key> | clear | range <24h|7d|30d|all> | \
page <n> | size <n> | col <key> | cols reset | select <id> | all | none | search [text] | quit";

#[derive(Debug, Serialize)]
struct User {
    id: i64,
    name: String,
    email: String,
    role: String,
    status: String,
    last_login: DateTime<Utc>,
}

impl TableRow for User {
    fn id(&self) -> i64 {
        self.id
    }

    fn cell(&self, key: &str) -> serde_json::Value {
        serialized_cell(self, key)
    }
}

enum Command {
    Event(TableEvent),
    Help,
    Quit,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> tablestate::Result<()> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.enable_date_range = true;
    if config.preferences_key.is_none() {
        config.preferences_key = Some(DEFAULT_PREFERENCES_KEY.to_string());
    }

    init_tracing(&config);

    let preferences_path = config.preferences_path();
    tracing::info!(path = %preferences_path.display(), "opening preferences store");
    let store = Rc::new(JsonFileStore::new(preferences_path)?);

    let mut table = DataTable::from_config(&config, columns(), quick_filters(), store);
    table.set_rows(sample_users(Utc::now()), None);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let actions = table.initialize();
    print_actions(&mut out, &actions)?;
    write!(out, "{}", tablestate::ui::render(&table.compute_viewmodel()))?;
    writeln!(out, "{HELP}")?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Help) => writeln!(out, "{HELP}")?,
            Some(Command::Event(event)) => {
                let actions = handle_event(&mut table, &event);
                print_actions(&mut out, &actions)?;
                if actions.contains(&TableAction::Render) {
                    write!(out, "{}", tablestate::ui::render(&table.compute_viewmodel()))?;
                }
            }
            None => writeln!(out, "unrecognised command: {}", line.trim())?,
        }
        out.flush()?;
    }

    Ok(())
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (command, arg) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, a)| (c, a.trim()));

    let event = match (command, arg) {
        ("quit" | "q" | "exit", _) => return Some(Command::Quit),
        ("help" | "?", _) => return Some(Command::Help),
        ("filter", key) if !key.is_empty() => TableEvent::ToggleFilter(key.to_string()),
        ("only", key) if !key.is_empty() => TableEvent::ActivateFilter(key.to_string()),
        ("clear", _) => TableEvent::ClearFilters,
        ("range", preset) => TableEvent::ChangeDateRange(preset.parse::<DateRangePreset>().ok()?),
        ("page", n) => {
            let page = n.parse::<usize>().ok()?.checked_sub(1)?;
            TableEvent::PageChanged(PageEvent {
                page_index: page,
                page_size: 0,
            })
        }
        ("size", n) => TableEvent::SetPageSize(n.parse().ok()?),
        ("cols", "reset") => TableEvent::ResetColumns,
        ("col", key) if !key.is_empty() => TableEvent::ToggleColumn(key.to_string()),
        ("select", id) => TableEvent::ToggleRow(id.parse().ok()?),
        ("all", _) => TableEvent::ToggleAll,
        ("none", _) => TableEvent::ClearSelection,
        ("search", query) => TableEvent::Search(query.to_string()),
        _ => return None,
    };
    Some(Command::Event(event))
}

fn print_actions(out: &mut impl Write, actions: &[TableAction]) -> io::Result<()> {
    for action in actions {
        match action {
            TableAction::Render => {}
            TableAction::Notify { message } => writeln!(out, "! {message}")?,
            TableAction::ApplyFilter(change) => writeln!(
                out,
                "-> filter {}",
                serde_json::to_string(change).unwrap_or_default()
            )?,
            TableAction::ApplyDateRange(selection) => writeln!(
                out,
                "-> date range {}",
                serde_json::to_string(selection).unwrap_or_default()
            )?,
            other => writeln!(out, "-> {other:?}")?,
        }
    }
    Ok(())
}

fn columns() -> Signal<Vec<ColumnDef<User>>> {
    Signal::new(vec![
        ColumnDef::new("id", "ID"),
        ColumnDef::new("name", "Name"),
        ColumnDef::new("email", "Email").hidden(),
        ColumnDef::new("role", "Role").column_type(ColumnType::Badge).badge_color(|value, _| {
            match value.as_str() {
                Some("admin") => BadgeColor::Primary,
                Some("editor") => BadgeColor::Success,
                _ => BadgeColor::Neutral,
            }
        }),
        ColumnDef::new("status", "Status")
            .column_type(ColumnType::Badge)
            .badge_color(|value, _| {
                if value == "locked" {
                    BadgeColor::Danger
                } else {
                    BadgeColor::Success
                }
            }),
        ColumnDef::new("last_login", "Last login").column_type(ColumnType::Date),
    ])
}

fn quick_filters() -> Vec<QuickFilter<User>> {
    vec![
        QuickFilter::new("active", "Active")
            .icon("check_circle")
            .predicate(|user: &User| user.status == "active"),
        QuickFilter::new("admins", "Admins")
            .icon("shield")
            .predicate(|user: &User| user.role == "admin"),
        QuickFilter::new("locked", "Locked")
            .icon("lock")
            .predicate(|user: &User| user.status == "locked"),
    ]
}

fn sample_users(now: DateTime<Utc>) -> Vec<Rc<User>> {
    const NAMES: [&str; 12] = [
        "Ada Lovelace",
        "Alan Turing",
        "Barbara Liskov",
        "Dennis Ritchie",
        "Edsger Dijkstra",
        "Frances Allen",
        "Grace Hopper",
        "Hedy Lamarr",
        "Ken Thompson",
        "Leslie Lamport",
        "Margaret Hamilton",
        "Niklaus Wirth",
    ];
    const ROLES: [&str; 3] = ["admin", "editor", "viewer"];

    (0_i64..36)
        .map(|i| {
            let idx = usize::try_from(i).unwrap_or_default();
            let name = NAMES[idx % NAMES.len()];
            let handle = name.to_lowercase().replace(' ', ".");
            Rc::new(User {
                id: i + 1,
                name: name.to_string(),
                email: format!("{handle}{}@example.com", i / 12),
                role: ROLES[idx % ROLES.len()].to_string(),
                status: if i % 5 == 4 { "locked" } else { "active" }.to_string(),
                last_login: now - Duration::hours(i * 7),
            })
        })
        .collect()
}
