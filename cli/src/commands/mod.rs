pub mod instance_array;
pub mod os_asset;
pub mod os_template;
pub mod secret;

use crate::cli::Commands;
use crate::error::{CliError, Result};
use crate::terminal::Terminal;
use crate::ui;
use clap::Args;
use metalcloud::{IdOrLabel, MetalCloudClient, User};
use tableformatter::OutputFormat;

/// Everything a command needs besides its own arguments
pub struct Context<'a> {
    pub client: &'a dyn MetalCloudClient,
    pub terminal: &'a dyn Terminal,
}

impl Context<'_> {
    /// Succeed when `autoconfirm` is set or the user answers `yes` to `prompt`
    pub fn confirm(&self, autoconfirm: bool, prompt: &str) -> Result<()> {
        if autoconfirm {
            tracing::debug!("confirmation skipped with --autoconfirm");
            return Ok(());
        }
        if self.terminal.confirm(prompt)? {
            Ok(())
        } else {
            Err(CliError::NotConfirmed)
        }
    }

    /// Users are referenced either by ID or by email
    pub fn resolve_user(&self, reference: &IdOrLabel) -> Result<User> {
        let user = match reference {
            IdOrLabel::Id(id) => self.client.user_get(*id)?,
            IdOrLabel::Label(email) => self.client.user_get_by_email(email)?,
        };
        Ok(user)
    }
}

/// Shared `--format` flag of list and get commands
#[derive(Args, Debug, Clone, Default)]
pub struct FormatArg {
    /// Output format: 'json' or 'csv'. Anything else prints a table
    #[arg(long)]
    pub format: Option<String>,
}

impl FormatArg {
    pub fn output(&self) -> OutputFormat {
        OutputFormat::from_selector(self.format.as_deref().unwrap_or_default())
    }
}

pub fn execute(ctx: &Context<'_>, command: Commands) -> Result<String> {
    match command {
        Commands::InstanceArray { command } => instance_array::execute(ctx, command),
        Commands::OsTemplate { command } => os_template::execute(ctx, command),
        Commands::OsAsset { command } => os_asset::execute(ctx, command),
        Commands::Secret { command } => secret::execute(ctx, command),
    }
}

/// Pick the single record whose label equals `reference`
pub(crate) fn find_unique<T>(
    kind: &'static str,
    reference: &str,
    records: Vec<T>,
    label: impl Fn(&T) -> &str,
) -> Result<T> {
    let mut matches: Vec<T> = records
        .into_iter()
        .filter(|record| label(record) == reference)
        .collect();
    match matches.len() {
        0 => Err(CliError::NotFound {
            kind,
            reference: reference.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(CliError::Ambiguous {
            kind,
            reference: reference.to_string(),
            count,
        }),
    }
}

/// Output of a create command: the bare ID with `--return-id`, nothing otherwise
pub(crate) fn created_output(kind: &str, id: i64, return_id: bool) -> String {
    if return_id {
        id.to_string()
    } else {
        ui::success_message(&format!("{kind} {id} created"));
        String::new()
    }
}

pub(crate) fn deletion_prompt(description: &str) -> String {
    format!("Deleting {description}.  Are you sure? Type \"yes\" to continue:")
}

/// Parse `args` as a command line and run it, as `main` does
#[cfg(test)]
pub(crate) fn run_command_line(
    client: &dyn MetalCloudClient,
    terminal: &dyn Terminal,
    args: &[&str],
) -> Result<String> {
    use clap::Parser;

    let cli = crate::cli::Cli::try_parse_from(
        std::iter::once("metalcloud-cli").chain(args.iter().copied()),
    )
    .map_err(|e| CliError::validation(e.to_string()))?;
    execute(&Context { client, terminal }, cli.command)
}
