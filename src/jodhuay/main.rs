use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use jodhuay::api::{
    CmdMessage, CmdResult, ConfigAction, GovernmentEdit, GovernmentEntry, InfoReport, ListFilter,
    LotteryApi, MessageLevel, Totals, UndergroundEdit, UndergroundEntry,
};
use jodhuay::commands::Confirm;
use jodhuay::config::AppConfig;
use jodhuay::error::{JodHuayError, Result};
use jodhuay::index::DisplayRecord;
use jodhuay::model::{GovernmentRecord, GovernmentType, Kind, UndergroundRecord, UndergroundType};
use jodhuay::store::fs_backend::FsBackend;
use jodhuay::store::LotteryStore;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

mod args;
mod logging;
use args::{AddEntry, Cli, Commands, EditEntry};

const HOME_ENV: &str = "JODHUAY_HOME";

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

struct AppContext {
    api: LotteryApi<FsBackend>,
    data_dir: PathBuf,
}

/// Returns `false` when a command reported an error message.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    logging::init_logging(
        &logging::LogConfig::from_verbosity(cli.verbose).with_ansi(io::stderr().is_terminal()),
    );

    let mut ctx = init_context()?;
    print_messages(&ctx.api.startup_messages());

    let result = match cli.command {
        Some(Commands::Add { entry }) => handle_add(&mut ctx, entry)?,
        Some(Commands::List {
            kind,
            bet_type,
            search,
        }) => handle_list(&ctx, kind, bet_type, search)?,
        Some(Commands::Edit { edit }) => handle_edit(&mut ctx, edit)?,
        Some(Commands::Delete { kind, selectors }) => ctx.api.delete(kind, &selectors)?,
        Some(Commands::Clear { kind }) => ctx.api.clear(kind)?,
        Some(Commands::Summary { kind, selectors }) => {
            let result = ctx.api.summary(kind, &selectors)?;
            if let Some(text) = &result.text {
                println!("{}", text);
            }
            result
        }
        Some(Commands::Totals) => {
            let result = ctx.api.list(&ListFilter::default())?;
            if let Some(totals) = &result.totals {
                print_totals(totals);
            }
            result
        }
        Some(Commands::Export { output }) => {
            let cwd = std::env::current_dir().map_err(JodHuayError::Io)?;
            ctx.api.export(output.as_deref(), &cwd)?
        }
        Some(Commands::Import { file, yes }) => {
            ctx.api.import(&file, &mut PromptConfirm { assume_yes: yes })?
        }
        Some(Commands::Repair) => ctx.api.repair()?,
        Some(Commands::Info) => {
            let result = ctx.api.info()?;
            if let Some(info) = &result.info {
                print_info(info, &ctx.data_dir);
            }
            result
        }
        Some(Commands::Reset { yes }) => ctx.api.reset(&mut PromptConfirm { assume_yes: yes })?,
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value)?,
        None => handle_list(&ctx, None, None, None)?,
    };

    print_messages(&result.messages);
    Ok(!result.has_errors())
}

fn init_context() -> Result<AppContext> {
    let data_dir = match std::env::var_os(HOME_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => ProjectDirs::from("com", "jodhuay", "jodhuay")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| JodHuayError::Store("Could not determine data directory".into()))?,
    };

    let config = AppConfig::load(&data_dir)?;
    let backend = FsBackend::new(data_dir.join("storage")).with_quota(config.storage_quota_bytes);
    let store = LotteryStore::new(backend, &config);
    let api = LotteryApi::open(store, &config, data_dir.clone())?;

    Ok(AppContext { api, data_dir })
}

fn handle_add(ctx: &mut AppContext, entry: AddEntry) -> Result<CmdResult> {
    match entry {
        AddEntry::Underground {
            bet_type,
            number,
            price,
            tod,
            reverse,
        } => ctx.api.add_underground(UndergroundEntry {
            bet_type,
            number,
            direct: price,
            tod,
            reversal: reverse,
        }),
        AddEntry::Government {
            bet_type,
            number,
            qty,
        } => ctx.api.add_government(GovernmentEntry {
            bet_type,
            number,
            qty,
        }),
    }
}

fn handle_edit(ctx: &mut AppContext, edit: EditEntry) -> Result<CmdResult> {
    match edit {
        EditEntry::Underground {
            selector,
            bet_type,
            number,
            price,
            tod,
            reverse,
        } => ctx.api.edit_underground(
            &selector,
            UndergroundEdit {
                bet_type,
                number,
                direct: price,
                tod,
                reversal: reverse,
            },
        ),
        EditEntry::Government {
            selector,
            bet_type,
            number,
            qty,
        } => ctx.api.edit_government(
            &selector,
            GovernmentEdit {
                bet_type,
                number,
                qty,
            },
        ),
    }
}

fn handle_list(
    ctx: &AppContext,
    kind: Option<Kind>,
    bet_type: Option<String>,
    search: Option<String>,
) -> Result<CmdResult> {
    let mut filter = ListFilter {
        kind,
        text: search,
        ..Default::default()
    };

    // A type code narrows the listing to the collection that defines it.
    if let Some(code) = bet_type {
        let ug = code.parse::<UndergroundType>().ok();
        let gov = code.parse::<GovernmentType>().ok();
        match (ug, gov, kind) {
            (Some(t), _, None | Some(Kind::Underground)) => {
                filter.kind = Some(Kind::Underground);
                filter.underground_type = Some(t);
            }
            (_, Some(t), None | Some(Kind::Government)) => {
                filter.kind = Some(Kind::Government);
                filter.government_type = Some(t);
            }
            _ => {
                return Err(JodHuayError::Api(format!("Unknown bet type: {}", code)));
            }
        }
    }

    let result = ctx.api.list(&filter)?;
    if filter.kind != Some(Kind::Government) {
        print_underground(&result.listed_underground);
    }
    if filter.kind != Some(Kind::Underground) {
        print_government(&result.listed_government);
    }
    if let Some(totals) = &result.totals {
        print_totals(totals);
    }
    Ok(result)
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<CmdResult> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let (Some(config), true) = (&result.config, result.messages.is_empty()) {
        for key in AppConfig::KEYS {
            println!("{} = {}", key, config.get(key).unwrap_or_default());
        }
    }
    Ok(result)
}

/// Confirms through stdin unless `--yes` was given. A closed stdin answers no.
struct PromptConfirm {
    assume_yes: bool,
}

impl Confirm for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt);
        let _ = io::stdout().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        }
    }
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

const POSITION_WIDTH: usize = 5;
const TYPE_WIDTH: usize = 16;
const NUMBER_WIDTH: usize = 8;

/// Left-aligns by display width; Thai combining marks take no columns.
fn pad(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

fn print_underground(rows: &[DisplayRecord<UndergroundRecord>]) {
    println!("{}", Kind::Underground.label().bold());
    if rows.is_empty() {
        println!("{}", "  No records.".dimmed());
        return;
    }
    for row in rows {
        let r = &row.record;
        println!(
            "{}{}{}{} {}",
            pad(&format!("{}.", row.position), POSITION_WIDTH).yellow(),
            pad(&r.bet_type.to_string(), TYPE_WIDTH),
            pad(&r.number, NUMBER_WIDTH).bold(),
            r.price,
            format!("({} บาท)", r.amount).dimmed()
        );
    }
}

fn print_government(rows: &[DisplayRecord<GovernmentRecord>]) {
    println!("{}", Kind::Government.label().bold());
    if rows.is_empty() {
        println!("{}", "  No records.".dimmed());
        return;
    }
    for row in rows {
        let r = &row.record;
        println!(
            "{}{}{}{}",
            pad(&format!("{}.", row.position), POSITION_WIDTH).yellow(),
            pad(&r.bet_type.to_string(), TYPE_WIDTH),
            pad(&r.number, NUMBER_WIDTH).bold(),
            format!("{} ใบ", r.qty)
        );
    }
}

fn print_totals(totals: &Totals) {
    println!(
        "{} {} รายการ, {} บาท",
        pad(Kind::Underground.label(), TYPE_WIDTH).bold(),
        totals.underground_count,
        jodhuay::commands::summary::group_thousands(totals.underground_amount)
    );
    println!(
        "{} {} รายการ, {} ใบ",
        pad(Kind::Government.label(), TYPE_WIDTH).bold(),
        totals.government_count,
        totals.government_tickets
    );
}

fn print_info(info: &InfoReport, data_dir: &std::path::Path) {
    println!("data dir     = {}", data_dir.display());
    println!(
        "version      = {}",
        info.store.version.as_deref().unwrap_or("(none)")
    );
    println!("records      = {} underground, {} government", info.underground_count, info.government_count);
    println!("bytes used   = {}", info.store.bytes_used);
    println!("keys         = {}", info.store.keys.join(", "));
    println!("backups      = {}", info.store.backups.len());
}
