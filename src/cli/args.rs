//! CLI argument definitions using clap
//!
//! The chain commands get their arguments from the command's field
//! declarations: one flag per field, one positional list for the fields that
//! bind in order, plus `-j/--json`, `--json-file` and `--raw`. The parsed
//! values are turned back into a canonical token list for the options driver,
//! so positional and JSON input share one validation path.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};

use crate::application::CommandKind;
use crate::domain::{CommandSpec, FieldType};

/// Arg id of the JSON literal
const JSON: &str = "json";
/// Arg id of the JSON file
const JSON_FILE: &str = "json-file";
/// Arg id of the raw output switch
const RAW: &str = "raw";
/// Arg id of the unnamed values bound to positional fields
const POSITIONAL: &str = "positional";

/// Blockchain command-line client: positional or JSON requests, formatted or raw JSON output
#[derive(Parser, Debug)]
#[command(name = "teos")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding a local .teos.toml (default: cwd)
    #[arg(short = 'C', long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create accounts and keys
    Create {
        #[command(subcommand)]
        command: CreateCommands,
    },

    /// Query the blockchain
    Get {
        #[command(subcommand)]
        command: GetCommands,
    },

    /// List available commands
    List,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Canonical tokens of a chain command, rebuilt from clap's matches.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    #[arg(skip)]
    pub tokens: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum CreateCommands {
    /// Create a new account on the blockchain
    Account(CommandArgs),
    /// Create a new keypair
    Key(CommandArgs),
}

#[derive(Subcommand, Debug)]
pub enum GetCommands {
    /// Current blockchain information
    Info(CommandArgs),
    /// Retrieve a full block
    Block(CommandArgs),
    /// Accounts associated with a public key
    Accounts(CommandArgs),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create the local .teos.toml instead of the global config
        #[arg(short, long)]
        local: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}

impl CreateCommands {
    pub fn target(&self) -> (CommandKind, &CommandArgs) {
        match self {
            CreateCommands::Account(args) => (CommandKind::CreateAccount, args),
            CreateCommands::Key(args) => (CommandKind::CreateKey, args),
        }
    }

    fn target_mut(&mut self) -> (CommandKind, &mut CommandArgs) {
        match self {
            CreateCommands::Account(args) => (CommandKind::CreateAccount, args),
            CreateCommands::Key(args) => (CommandKind::CreateKey, args),
        }
    }
}

impl GetCommands {
    pub fn target(&self) -> (CommandKind, &CommandArgs) {
        match self {
            GetCommands::Info(args) => (CommandKind::GetInfo, args),
            GetCommands::Block(args) => (CommandKind::GetBlock, args),
            GetCommands::Accounts(args) => (CommandKind::GetAccounts, args),
        }
    }

    fn target_mut(&mut self) -> (CommandKind, &mut CommandArgs) {
        match self {
            GetCommands::Info(args) => (CommandKind::GetInfo, args),
            GetCommands::Block(args) => (CommandKind::GetBlock, args),
            GetCommands::Accounts(args) => (CommandKind::GetAccounts, args),
        }
    }
}

impl Cli {
    /// Build the CLI from matches of [`build_cli`], filling the chain
    /// command's canonical tokens.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut cli = Self::from_arg_matches(matches)?;
        let target = match &mut cli.command {
            Some(Commands::Create { command }) => Some(command.target_mut()),
            Some(Commands::Get { command }) => Some(command.target_mut()),
            _ => None,
        };
        if let Some((kind, args)) = target {
            let spec = kind.spec();
            if let Some(sub) = matches
                .subcommand_matches(spec.verb)
                .and_then(|m| m.subcommand_matches(spec.noun))
            {
                args.tokens = canonical_tokens(spec, sub);
            }
        }
        Ok(cli)
    }
}

/// Clap arguments of a chain command, one per declared field.
fn field_args(spec: &CommandSpec) -> Vec<Arg> {
    let mut args = vec![
        Arg::new(JSON)
            .short('j')
            .long(JSON)
            .value_name("JSON")
            .help("Request as a JSON object; other arguments are ignored"),
        Arg::new(JSON_FILE)
            .long(JSON_FILE)
            .value_name("PATH")
            .help("Read the request from a JSON file"),
        Arg::new(RAW)
            .long(RAW)
            .action(ArgAction::SetTrue)
            .help("Print the response as raw JSON"),
    ];

    for field in spec.fields {
        let mut arg = Arg::new(field.name)
            .long(field.name)
            .help(field.help)
            .value_name(field.kind.name());
        if let Some(short) = field.short {
            arg = arg.short(short);
        }
        arg = match field.kind {
            FieldType::Boolean => arg
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true"),
            FieldType::Integer => arg.allow_negative_numbers(true),
            FieldType::String => arg,
        };
        args.push(arg);
    }

    let positional: Vec<&str> = spec.positional_fields().map(|f| f.name).collect();
    if !positional.is_empty() {
        args.push(
            Arg::new(POSITIONAL)
                .num_args(1..)
                .action(ArgAction::Append)
                .allow_negative_numbers(true)
                .value_name("VALUE")
                .help(format!("Values for {}, in this order", positional.join(", "))),
        );
    }
    args
}

fn get_string<'a>(matches: &'a ArgMatches, id: &str) -> Option<&'a String> {
    matches.try_get_one::<String>(id).ok().flatten()
}

/// Token list the options driver binds: JSON and raw switches, then
/// `--field=value` per given field in declaration order, then `--` and the
/// unnamed values.
pub fn canonical_tokens(spec: &CommandSpec, matches: &ArgMatches) -> Vec<String> {
    let mut tokens = Vec::new();
    if let Some(json) = get_string(matches, JSON) {
        tokens.extend(["--json".to_string(), json.clone()]);
    }
    if let Some(path) = get_string(matches, JSON_FILE) {
        tokens.extend(["--json-file".to_string(), path.clone()]);
    }
    if matches.try_get_one::<bool>(RAW).ok().flatten() == Some(&true) {
        tokens.push("--raw".into());
    }
    for field in spec.fields {
        if let Some(value) = get_string(matches, field.name) {
            tokens.push(format!("--{}={}", field.name, value));
        }
    }
    if let Ok(Some(values)) = matches.try_get_many::<String>(POSITIONAL) {
        tokens.push("--".into());
        tokens.extend(values.cloned());
    }
    tokens
}

/// The clap command with each chain command's arguments and field usage attached.
pub fn build_cli() -> clap::Command {
    let mut cmd = Cli::command();
    let program = cmd.get_name().to_string();
    for kind in CommandKind::ALL {
        let spec = kind.spec();
        let usage = spec.usage(&program);
        let args = field_args(spec);
        cmd = cmd.mut_subcommand(spec.verb, |verb| {
            verb.mut_subcommand(spec.noun, |noun| noun.args(args).after_help(usage))
        });
    }
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Cli {
        let matches = build_cli().try_get_matches_from(argv).unwrap();
        Cli::from_matches(&matches).unwrap()
    }

    fn chain_tokens(cli: &Cli) -> (CommandKind, Vec<String>) {
        let (kind, args) = match &cli.command {
            Some(Commands::Create { command }) => command.target(),
            Some(Commands::Get { command }) => command.target(),
            other => panic!("expected a chain command, got {other:?}"),
        };
        (kind, args.tokens.clone())
    }

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_flags_and_values_become_canonical_tokens() {
        let cli = parse(&[
            "teos", "create", "account", "alice", "bob", "-x", "60", "--skip", "--raw",
        ]);
        let (kind, tokens) = chain_tokens(&cli);
        assert_eq!(kind, CommandKind::CreateAccount);
        assert_eq!(
            tokens,
            vec!["--raw", "--skip=true", "--expiration=60", "--", "alice", "bob"]
        );
    }

    #[test]
    fn test_short_field_flag() {
        let cli = parse(&["teos", "create", "key", "-n", "owner"]);
        assert_eq!(chain_tokens(&cli).1, vec!["--name=owner"]);
    }

    #[test]
    fn test_trailing_global_flag_is_not_a_token() {
        let cli = parse(&["teos", "create", "key", "alice", "-v"]);
        assert_eq!(cli.verbose, 1);
        assert_eq!(chain_tokens(&cli).1, vec!["--", "alice"]);
    }

    #[test]
    fn test_help_after_values_shows_help() {
        let err = build_cli()
            .try_get_matches_from(["teos", "create", "account", "alice", "--help"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_bare_boolean_does_not_take_next_value() {
        let cli = parse(&["teos", "create", "account", "--skip", "no", "bob", "O", "A"]);
        assert_eq!(
            chain_tokens(&cli).1,
            vec!["--skip=true", "--", "no", "bob", "O", "A"]
        );

        let cli = parse(&["teos", "create", "account", "-s=no", "eosio", "bob", "O", "A"]);
        assert_eq!(chain_tokens(&cli).1[0], "--skip=no");
    }

    #[test]
    fn test_usage_attached_to_chain_commands() {
        let mut cmd = build_cli();
        let help = cmd
            .find_subcommand_mut("create")
            .and_then(|c| c.find_subcommand_mut("key"))
            .map(|c| c.render_long_help().to_string())
            .unwrap();
        assert!(help.contains("Usage: teos create key [name] [OPTIONS]"));
        assert!(help.contains("--json-file"));
    }
}
