use super::{Context, FormatArg, created_output, deletion_prompt, find_unique};
use crate::error::{CliError, Result};
use crate::ui;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use clap::{Args, Subcommand};
use metalcloud::{IdOrLabel, Secret};
use tableformatter::{Column, Table, Value};

#[derive(Subcommand, Debug)]
pub enum SecretCommand {
    /// List secrets
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a secret from piped content
    #[command(visible_alias = "new")]
    Create(CreateArgs),

    /// Delete a secret
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list secrets with this usage
    #[arg(long)]
    pub usage: Option<String>,

    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the secret
    #[arg(long)]
    pub name: String,

    /// Usage of the secret
    #[arg(long)]
    pub usage: Option<String>,

    /// Read the secret from stdin
    #[arg(long, default_value_t = false)]
    pub pipe: bool,

    /// Print only the ID of the created secret
    #[arg(long, default_value_t = false)]
    pub return_id: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Secret ID or name
    #[arg(long)]
    pub id: IdOrLabel,

    /// Do not ask for confirmation
    #[arg(long, default_value_t = false)]
    pub autoconfirm: bool,
}

pub fn execute(ctx: &Context<'_>, command: SecretCommand) -> Result<String> {
    match command {
        SecretCommand::List(args) => list(ctx, args),
        SecretCommand::Create(args) => create(ctx, args),
        SecretCommand::Delete(args) => delete(ctx, args),
    }
}

pub fn list(ctx: &Context<'_>, args: ListArgs) -> Result<String> {
    let secrets = ctx.client.secrets(args.usage.as_deref())?;

    let mut table = Table::new(vec![
        Column::int("ID", 2),
        Column::string("NAME", 5),
        Column::string("USAGE", 5),
        Column::date("CREATED", 5),
        Column::date("UPDATED", 5),
    ]);
    for secret in &secrets {
        table.push_row(vec![
            secret.secret_id.into(),
            secret.secret_name.as_str().into(),
            secret.secret_usage.as_str().into(),
            Value::timestamp(&secret.secret_created_timestamp),
            Value::timestamp(&secret.secret_updated_timestamp),
        ])?;
    }

    Ok(table.sort_by(&["ID"]).render("Secrets", args.format.output())?)
}

pub fn create(ctx: &Context<'_>, args: CreateArgs) -> Result<String> {
    if !args.pipe {
        return Err(CliError::validation(
            "the secret content must be piped in with --pipe",
        ));
    }
    let content = ctx.terminal.read_pipe()?;

    let secret = Secret {
        secret_name: args.name,
        secret_usage: args.usage.unwrap_or_default(),
        secret_base64: Some(STANDARD.encode(content)),
        ..Default::default()
    };
    let created = ctx.client.secret_create(&secret)?;
    Ok(created_output("Secret", created.secret_id, args.return_id))
}

pub fn delete(ctx: &Context<'_>, args: DeleteArgs) -> Result<String> {
    let secret = match &args.id {
        IdOrLabel::Id(id) => ctx.client.secret_get(*id)?,
        IdOrLabel::Label(name) => {
            find_unique("Secret", name, ctx.client.secrets(None)?, |s| {
                s.secret_name.as_str()
            })?
        }
    };

    let prompt = deletion_prompt(&format!("secret {} ({})", secret.secret_name, secret.secret_id));
    ctx.confirm(args.autoconfirm, &prompt)?;

    ctx.client.secret_delete(secret.secret_id)?;
    ui::success_message(&format!("Secret {} deleted", secret.secret_id));
    Ok(String::new())
}
