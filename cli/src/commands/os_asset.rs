use super::{Context, FormatArg, created_output, deletion_prompt, find_unique, os_template};
use crate::error::{CliError, Result};
use crate::ui;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use clap::{Args, Subcommand};
use metalcloud::{IdOrLabel, OsAsset, OsTemplate};
use tableformatter::{Column, Table, Value};

const ENTITY: &str = "OS Assets";

#[derive(Subcommand, Debug)]
pub enum OsAssetCommand {
    /// List OS assets
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show a single OS asset
    #[command(visible_alias = "show")]
    Get(GetArgs),

    /// Upload a new OS asset
    #[command(visible_alias = "new")]
    Create(CreateArgs),

    /// Change an existing OS asset
    #[command(visible_alias = "update")]
    Edit(EditArgs),

    /// Delete an OS asset
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),

    /// Attach an OS asset to a template
    #[command(visible_alias = "assign")]
    Associate(AssociateArgs),

    /// Make an OS asset visible to every user
    #[command(visible_alias = "public")]
    MakePublic(MakePublicArgs),

    /// Give an OS asset to a single user
    #[command(visible_alias = "private")]
    MakePrivate(MakePrivateArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list assets with this usage
    #[arg(long)]
    pub usage: Option<String>,

    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Asset ID or file name
    #[arg(long)]
    pub id: IdOrLabel,

    #[command(flatten)]
    pub format: FormatArg,
}

/// Asset fields and template association shared by create and edit
#[derive(Args, Debug, Default)]
pub struct AssetFields {
    /// Asset usage, for example 'bootloader'
    #[arg(long)]
    pub usage: Option<String>,

    /// MIME type of the contents
    #[arg(long)]
    pub mime: Option<String>,

    /// Template type of the contents, for example 'liquid'
    #[arg(long)]
    pub template_type: Option<String>,

    /// URL the contents are downloaded from
    #[arg(long)]
    pub url: Option<String>,

    /// Read the contents from stdin
    #[arg(long, default_value_t = false)]
    pub pipe: bool,

    /// Template ID or label to attach the asset to
    #[arg(long)]
    pub template_id: Option<IdOrLabel>,

    /// Path of the asset inside the template
    #[arg(long, requires = "template_id")]
    pub path: Option<String>,

    /// Variables of the association as a JSON array
    #[arg(long, default_value = "[]")]
    pub variables_json: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// File name of the asset
    #[arg(long)]
    pub filename: String,

    #[command(flatten)]
    pub fields: AssetFields,

    /// Delete an existing asset with the same file name first
    #[arg(long, default_value_t = false)]
    pub delete_if_exists: bool,

    /// Print only the ID of the created asset
    #[arg(long, default_value_t = false)]
    pub return_id: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Asset ID or file name
    #[arg(long)]
    pub id: IdOrLabel,

    /// New file name
    #[arg(long)]
    pub filename: Option<String>,

    #[command(flatten)]
    pub fields: AssetFields,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Asset ID or file name
    #[arg(long)]
    pub id: IdOrLabel,

    /// Do not ask for confirmation
    #[arg(long, default_value_t = false)]
    pub autoconfirm: bool,
}

#[derive(Args, Debug)]
pub struct AssociateArgs {
    /// Asset ID or file name
    #[arg(long)]
    pub id: IdOrLabel,

    /// Template ID or label
    #[arg(long)]
    pub template_id: IdOrLabel,

    /// Path of the asset inside the template
    #[arg(long)]
    pub path: String,

    /// Variables of the association as a JSON array
    #[arg(long, default_value = "[]")]
    pub variables_json: String,
}

#[derive(Args, Debug)]
pub struct MakePublicArgs {
    /// Asset ID or file name
    #[arg(long)]
    pub id: IdOrLabel,
}

#[derive(Args, Debug)]
pub struct MakePrivateArgs {
    /// Asset ID or file name
    #[arg(long)]
    pub id: IdOrLabel,

    /// New owner, user ID or email
    #[arg(long)]
    pub user_id: IdOrLabel,
}

pub fn execute(ctx: &Context<'_>, command: OsAssetCommand) -> Result<String> {
    match command {
        OsAssetCommand::List(args) => list(ctx, args),
        OsAssetCommand::Get(args) => get(ctx, args),
        OsAssetCommand::Create(args) => create(ctx, args),
        OsAssetCommand::Edit(args) => edit(ctx, args),
        OsAssetCommand::Delete(args) => delete(ctx, args),
        OsAssetCommand::Associate(args) => associate(ctx, args),
        OsAssetCommand::MakePublic(args) => make_public(ctx, args),
        OsAssetCommand::MakePrivate(args) => make_private(ctx, args),
    }
}

/// Find an asset by ID, or by file name among the visible assets
pub(crate) fn resolve(ctx: &Context<'_>, reference: &IdOrLabel) -> Result<OsAsset> {
    match reference {
        IdOrLabel::Id(id) => Ok(ctx.client.os_asset_get(*id)?),
        IdOrLabel::Label(filename) => find_unique("OS asset", filename, ctx.client.os_assets()?, |a| {
            a.os_asset_filename.as_str()
        }),
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::int("ID", 2),
        Column::string("FILENAME", 8),
        Column::int("FILE_SIZE_BYTES", 5),
        Column::string("FILE_MIME", 5),
        Column::string("TEMPLATE_TYPE", 5),
        Column::string("USAGE", 5),
        Column::string("SOURCE_URL", 5),
        Column::int("USER_ID", 5),
        Column::date("CREATED", 5),
        Column::date("UPDATED", 5),
    ]
}

fn row(asset: &OsAsset) -> Vec<Value> {
    vec![
        asset.os_asset_id.into(),
        asset.os_asset_filename.as_str().into(),
        asset.os_asset_file_size_bytes.into(),
        asset.os_asset_file_mime.as_str().into(),
        asset.os_asset_template_type.as_str().into(),
        asset.os_asset_usage.as_str().into(),
        asset.os_asset_source_url.as_str().into(),
        asset.user_id_owner.into(),
        Value::timestamp(&asset.os_asset_created_timestamp),
        Value::timestamp(&asset.os_asset_updated_timestamp),
    ]
}

pub fn list(ctx: &Context<'_>, args: ListArgs) -> Result<String> {
    let assets = ctx.client.os_assets()?;
    let usage = args.usage.as_deref().filter(|u| !u.is_empty());

    let mut table = Table::new(columns());
    for asset in assets
        .iter()
        .filter(|a| usage.is_none_or(|u| a.os_asset_usage == u))
    {
        table.push_row(row(asset))?;
    }

    Ok(table.sort_by(&["ID"]).render(ENTITY, args.format.output())?)
}

pub fn get(ctx: &Context<'_>, args: GetArgs) -> Result<String> {
    let asset = resolve(ctx, &args.id)?;

    let mut table = Table::new(columns()).with_subtitle(format!(
        "Asset {} ({})",
        asset.os_asset_filename, asset.os_asset_id
    ));
    table.push_row(row(&asset))?;

    Ok(table.render(ENTITY, args.format.output())?)
}

pub fn create(ctx: &Context<'_>, args: CreateArgs) -> Result<String> {
    let template = association_target(ctx, &args.fields)?;

    if args.delete_if_exists {
        let existing: Vec<OsAsset> = ctx
            .client
            .os_assets()?
            .into_iter()
            .filter(|a| a.os_asset_filename == args.filename)
            .collect();
        for asset in existing {
            ctx.client.os_asset_delete(asset.os_asset_id)?;
            ui::warning_message(&format!(
                "Deleted existing asset {} ({})",
                asset.os_asset_filename, asset.os_asset_id
            ));
        }
    }

    let mut asset = OsAsset {
        os_asset_filename: args.filename,
        ..Default::default()
    };
    apply_fields(ctx, &mut asset, &args.fields)?;

    let created = ctx.client.os_asset_create(&asset)?;
    ctx.client.os_asset_make_public(created.os_asset_id)?;
    if let Some(template) = template {
        attach(ctx, &template, &created, &args.fields)?;
    }

    Ok(created_output("OS asset", created.os_asset_id, args.return_id))
}

pub fn edit(ctx: &Context<'_>, args: EditArgs) -> Result<String> {
    let template = association_target(ctx, &args.fields)?;
    let mut asset = resolve(ctx, &args.id)?;

    if let Some(filename) = args.filename {
        asset.os_asset_filename = filename;
    }
    apply_fields(ctx, &mut asset, &args.fields)?;

    let updated = ctx.client.os_asset_update(asset.os_asset_id, &asset)?;
    ctx.client.os_asset_make_public(updated.os_asset_id)?;
    if let Some(template) = template {
        attach(ctx, &template, &updated, &args.fields)?;
    }

    ui::success_message(&format!("OS asset {} updated", updated.os_asset_id));
    Ok(String::new())
}

pub fn delete(ctx: &Context<'_>, args: DeleteArgs) -> Result<String> {
    let asset = resolve(ctx, &args.id)?;

    let prompt = deletion_prompt(&format!(
        "asset {} ({})",
        asset.os_asset_filename, asset.os_asset_id
    ));
    ctx.confirm(args.autoconfirm, &prompt)?;

    ctx.client.os_asset_delete(asset.os_asset_id)?;
    ui::success_message(&format!("OS asset {} deleted", asset.os_asset_id));
    Ok(String::new())
}

pub fn associate(ctx: &Context<'_>, args: AssociateArgs) -> Result<String> {
    if args.path.trim().is_empty() {
        return Err(CliError::validation("--path is required"));
    }
    let asset = resolve(ctx, &args.id)?;
    let template = os_template::resolve(ctx, &args.template_id, false)?;

    ctx.client.os_template_add_os_asset(
        template.volume_template_id,
        asset.os_asset_id,
        &args.path,
        &args.variables_json,
    )?;
    ui::success_message(&format!(
        "OS asset {} attached to template {} at {}",
        asset.os_asset_id, template.volume_template_id, args.path
    ));
    Ok(String::new())
}

pub fn make_public(ctx: &Context<'_>, args: MakePublicArgs) -> Result<String> {
    let asset = resolve(ctx, &args.id)?;
    ctx.client.os_asset_make_public(asset.os_asset_id)?;
    Ok(String::new())
}

pub fn make_private(ctx: &Context<'_>, args: MakePrivateArgs) -> Result<String> {
    let asset = resolve(ctx, &args.id)?;
    let user = ctx.resolve_user(&args.user_id)?;
    ctx.client.os_asset_make_private(asset.os_asset_id, user.user_id)?;
    Ok(String::new())
}

/// Template the asset is attached to, checked before anything is uploaded
fn association_target(ctx: &Context<'_>, fields: &AssetFields) -> Result<Option<OsTemplate>> {
    let Some(reference) = &fields.template_id else {
        return Ok(None);
    };
    if fields.path.as_deref().is_none_or(|p| p.trim().is_empty()) {
        return Err(CliError::validation(
            "--path is required when --template-id is given",
        ));
    }
    os_template::resolve(ctx, reference, false).map(Some)
}

fn attach(
    ctx: &Context<'_>,
    template: &OsTemplate,
    asset: &OsAsset,
    fields: &AssetFields,
) -> Result<()> {
    let path = fields.path.as_deref().unwrap_or_default();
    ctx.client.os_template_add_os_asset(
        template.volume_template_id,
        asset.os_asset_id,
        path,
        &fields.variables_json,
    )?;
    Ok(())
}

fn apply_fields(ctx: &Context<'_>, asset: &mut OsAsset, fields: &AssetFields) -> Result<()> {
    if let Some(usage) = &fields.usage {
        asset.os_asset_usage = usage.clone();
    }
    if let Some(mime) = &fields.mime {
        asset.os_asset_file_mime = mime.clone();
    }
    if let Some(template_type) = &fields.template_type {
        asset.os_asset_template_type = template_type.clone();
    }
    if let Some(url) = &fields.url {
        asset.os_asset_source_url = url.clone();
    }
    if fields.pipe {
        let content = ctx.terminal.read_pipe()?;
        asset.os_asset_file_size_bytes = i64::try_from(content.len()).unwrap_or(i64::MAX);
        asset.os_asset_contents_base64 = Some(STANDARD.encode(content));
    }
    Ok(())
}
