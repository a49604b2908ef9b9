//! Command dispatch: settings, container, driver, output

use std::io;
use std::path::{Path, PathBuf};

use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{CommandKind, IoResultExt};
use crate::cli::args::{build_cli, Cli, CommandArgs, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{config_template, global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Create { command }) => {
            let (kind, args) = command.target();
            _chain(cli, kind, args)
        }
        Some(Commands::Get { command }) => {
            let (kind, args) = command.target();
            _chain(cli, kind, args)
        }
        Some(Commands::List) => _list(),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => _config_show(cli),
            ConfigCommands::Path => _config_path(cli),
            ConfigCommands::Init { local, force } => _config_init(cli, *local, *force),
        },
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => {
            build_cli()
                .print_help()
                .map_err(|e| CliError::Usage(e.to_string()))?;
            Ok(())
        }
    }
}

/// Directory searched for the local config.
fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::from(InfraError::io("determine current directory", e))),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = project_dir(cli)?;
    Ok(Settings::load(Some(&dir))?)
}

#[instrument(skip(cli, args), fields(command = %kind))]
fn _chain(cli: &Cli, kind: CommandKind, args: &CommandArgs) -> CliResult<()> {
    debug!("tokens: {:?}", args.tokens);
    let settings = load_settings(cli)?;
    let container = ServiceContainer::new(settings);
    let rendered = container.driver().run(kind, &args.tokens)?;
    output::info(&rendered.text);
    Ok(())
}

fn _list() -> CliResult<()> {
    output::header("Commands:");
    for kind in CommandKind::ALL {
        output::labeled(&kind.to_string(), kind.spec().about);
    }
    Ok(())
}

fn _config_show(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    print!("{}", settings.to_toml()?);
    Ok(())
}

fn _config_path(cli: &Cli) -> CliResult<()> {
    let dir = project_dir(cli)?;
    let global = global_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unavailable>".into());
    output::labeled("global:", &global);
    output::labeled("local:", &local_config_path(&dir).display());
    Ok(())
}

#[instrument(skip(cli))]
fn _config_init(cli: &Cli, local: bool, force: bool) -> CliResult<()> {
    let path = if local {
        local_config_path(&project_dir(cli)?)
    } else {
        global_config_path()
            .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?
    };
    if force && path.exists() {
        output::warning(&format!("overwriting {}", path.display()));
    }
    write_template(&RealFileSystem, &path, force)?;
    output::success(&format!("Created {}", path.display()));
    Ok(())
}

/// Write the config template, refusing to overwrite unless forced.
pub fn write_template(fs: &dyn FileSystem, path: &Path, force: bool) -> CliResult<()> {
    if fs.exists(path) && !force {
        return Err(CliError::Usage(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    fs.ensure_parent(path).with_path_context("create dir", path)?;
    fs.write(path, &config_template())
        .with_path_context("write", path)?;
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = build_cli();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
