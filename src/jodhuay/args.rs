use clap::{ArgAction, Parser, Subcommand};
use jodhuay::model::{GovernmentType, Kind, UndergroundType};
use jodhuay::price::Reversal;
use std::path::PathBuf;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

#[derive(Parser, Debug)]
#[command(name = "jodhuay")]
#[command(version = VERSION)]
#[command(about = "Write down lottery bets and keep the totals", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a bet
    #[command(alias = "a")]
    Add {
        #[command(subcommand)]
        entry: AddEntry,
    },

    /// List records with positions and totals
    #[command(alias = "ls")]
    List {
        /// Only this collection (underground|ug, government|gov)
        #[arg(short, long)]
        kind: Option<Kind>,

        /// Only this bet type code (e.g. 2bon, back2)
        #[arg(short = 't', long = "type")]
        bet_type: Option<String>,

        /// Text to look for in number, type name or price
        search: Option<String>,
    },

    /// Edit one record
    #[command(alias = "e")]
    Edit {
        #[command(subcommand)]
        edit: EditEntry,
    },

    /// Delete records by position or id
    #[command(alias = "rm")]
    Delete {
        kind: Kind,

        /// Positions (1 2 3), ids, or id:<id> for short numeric ids
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Delete every record of one collection
    Clear { kind: Kind },

    /// Text summary for sharing
    Summary {
        kind: Kind,

        /// Positions or ids to include (all when omitted)
        selectors: Vec<String>,
    },

    /// Show totals only
    Totals,

    /// Write all records to a JSON backup file
    Export {
        /// Output file (default: JodHuay_Backup_<millis>.json in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace all records with the contents of a backup file
    Import {
        file: PathBuf,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Re-check stored data and fix what can be fixed
    Repair,

    /// Show storage details
    Info,

    /// Delete all stored data, including backups
    Reset {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g. edit-moves-to-end)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AddEntry {
    /// Underground bet: TYPE NUMBER PRICE
    #[command(alias = "ug")]
    Underground {
        /// 3bon, 2bon, 2lang, runBon, runLang
        bet_type: UndergroundType,
        number: String,
        /// Direct stake
        price: String,

        /// Tod stake
        #[arg(long, allow_hyphen_values = true)]
        tod: Option<String>,

        /// Reversed stake multiplier (3 or 6)
        #[arg(short, long)]
        reverse: Option<Reversal>,
    },

    /// Government ticket: TYPE NUMBER
    #[command(alias = "gov")]
    Government {
        /// 6, front3, back3, back2
        bet_type: GovernmentType,
        number: String,

        /// Number of tickets (default 1)
        #[arg(short, long, allow_hyphen_values = true)]
        qty: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum EditEntry {
    /// Change an underground bet
    #[command(alias = "ug")]
    Underground {
        /// Position or id
        selector: String,

        #[arg(short = 't', long = "type")]
        bet_type: Option<UndergroundType>,

        #[arg(short, long)]
        number: Option<String>,

        /// New direct stake
        #[arg(short, long)]
        price: Option<String>,

        /// New tod stake ("" removes it)
        #[arg(long, allow_hyphen_values = true)]
        tod: Option<String>,

        #[arg(short, long)]
        reverse: Option<Reversal>,
    },

    /// Change a government ticket
    #[command(alias = "gov")]
    Government {
        /// Position or id
        selector: String,

        #[arg(short = 't', long = "type")]
        bet_type: Option<GovernmentType>,

        #[arg(short, long)]
        number: Option<String>,

        #[arg(short, long, allow_hyphen_values = true)]
        qty: Option<i64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_underground_add() {
        let cli = Cli::parse_from(["jodhuay", "add", "ug", "3bon", "123", "100", "-r", "3"]);
        let Some(Commands::Add {
            entry: AddEntry::Underground {
                bet_type, reverse, ..
            },
        }) = cli.command
        else {
            panic!("expected an underground add");
        };
        assert_eq!(bet_type, UndergroundType::ThreeTop);
        assert_eq!(reverse, Some(Reversal::Three));
    }

    #[test]
    fn counts_verbosity() {
        let cli = Cli::parse_from(["jodhuay", "-vv", "info"]);
        assert_eq!(cli.verbose, 2);
    }
}
