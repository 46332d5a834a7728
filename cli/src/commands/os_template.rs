use super::{Context, FormatArg, created_output, deletion_prompt, find_unique, os_asset};
use crate::error::{CliError, Result};
use crate::ui;
use clap::{Args, Subcommand};
use metalcloud::{IdOrLabel, OsTemplate};
use std::collections::HashMap;
use tableformatter::{Column, Table, Value};

const ENTITY: &str = "Templates";

#[derive(Subcommand, Debug)]
pub enum OsTemplateCommand {
    /// List OS templates
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create an OS template
    #[command(visible_alias = "new")]
    Create(CreateArgs),

    /// Change an OS template
    #[command(visible_alias = "edit")]
    Update(UpdateArgs),

    /// Show a single OS template
    #[command(visible_alias = "show")]
    Get(GetArgs),

    /// Delete an OS template
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),

    /// Make an OS template visible to every user
    #[command(visible_alias = "public")]
    MakePublic(MakePublicArgs),

    /// Give an OS template to a single user
    #[command(visible_alias = "private")]
    MakePrivate(MakePrivateArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub format: FormatArg,
}

/// Template properties accepted by create and update.
///
/// Nothing is required at parse time: create checks its mandatory fields
/// itself so every missing one is reported the same way.
#[derive(Args, Debug, Default)]
pub struct TemplateFields {
    /// Template label
    #[arg(long)]
    pub label: Option<String>,

    /// Template display name
    #[arg(long)]
    pub display_name: Option<String>,

    /// Template size (MB)
    #[arg(long)]
    pub size: Option<i64>,

    /// The template can be installed on local disks
    #[arg(long, default_value_t = false)]
    pub local_disk_supported: bool,

    /// Boot methods supported, defaults to pxe_iscsi
    #[arg(long)]
    pub boot_methods_supported: Option<String>,

    /// Boot type: 'uefi_only', 'legacy_only' or 'hybrid'
    #[arg(long)]
    pub boot_type: Option<String>,

    /// Template description
    #[arg(long)]
    pub description: Option<String>,

    /// Operating system type, for example Ubuntu or CentOS
    #[arg(long)]
    pub os_type: Option<String>,

    /// Operating system version
    #[arg(long)]
    pub os_version: Option<String>,

    /// Operating system architecture: none, unknown, x86 or x86_64
    #[arg(long)]
    pub os_architecture: Option<String>,

    /// Initial user, used to verify the install
    #[arg(long)]
    pub initial_user: Option<String>,

    /// Initial password, used to verify the install
    #[arg(long)]
    pub initial_password: Option<String>,

    /// Generate the initial password during install
    #[arg(long, default_value_t = false, conflicts_with = "initial_password")]
    pub use_autogenerated_initial_password: bool,

    /// Initial SSH port, used to verify the install
    #[arg(long)]
    pub initial_ssh_port: Option<i64>,

    /// Change the initial user's password after deploy
    #[arg(long, default_value_t = false)]
    pub change_password_after_deploy: bool,

    /// Repository URL of the template
    #[arg(long)]
    pub repo_url: Option<String>,

    /// Bootloader asset (ID or file name) used during install
    #[arg(long)]
    pub install_bootloader_asset: Option<IdOrLabel>,

    /// Bootloader asset (ID or file name) used during regular boots
    #[arg(long)]
    pub os_boot_bootloader_asset: Option<IdOrLabel>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub fields: TemplateFields,

    /// Print only the ID of the created template
    #[arg(long, default_value_t = false)]
    pub return_id: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Template ID or label
    #[arg(long)]
    pub id: IdOrLabel,

    #[command(flatten)]
    pub fields: TemplateFields,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Template ID or label
    #[arg(long)]
    pub id: IdOrLabel,

    #[command(flatten)]
    pub format: FormatArg,

    /// Include the initial SSH credentials
    #[arg(long, default_value_t = false)]
    pub show_credentials: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Template ID or label
    #[arg(long)]
    pub id: IdOrLabel,

    /// Do not ask for confirmation
    #[arg(long, default_value_t = false)]
    pub autoconfirm: bool,
}

#[derive(Args, Debug)]
pub struct MakePublicArgs {
    /// Template ID or label
    #[arg(long)]
    pub id: IdOrLabel,
}

#[derive(Args, Debug)]
pub struct MakePrivateArgs {
    /// Template ID or label
    #[arg(long)]
    pub id: IdOrLabel,

    /// New owner, user ID or email
    #[arg(long)]
    pub user_id: IdOrLabel,
}

pub fn execute(ctx: &Context<'_>, command: OsTemplateCommand) -> Result<String> {
    match command {
        OsTemplateCommand::List(args) => list(ctx, args),
        OsTemplateCommand::Create(args) => create(ctx, args),
        OsTemplateCommand::Update(args) => update(ctx, args),
        OsTemplateCommand::Get(args) => get(ctx, args),
        OsTemplateCommand::Delete(args) => delete(ctx, args),
        OsTemplateCommand::MakePublic(args) => make_public(ctx, args),
        OsTemplateCommand::MakePrivate(args) => make_private(ctx, args),
    }
}

/// Find a template by ID, or by label among the visible templates.
///
/// Credentials only come back decrypted from a direct get, so a label match
/// is fetched again when `decrypt_password` is set.
pub(crate) fn resolve(
    ctx: &Context<'_>,
    reference: &IdOrLabel,
    decrypt_password: bool,
) -> Result<OsTemplate> {
    match reference {
        IdOrLabel::Id(id) => Ok(ctx.client.os_template_get(*id, decrypt_password)?),
        IdOrLabel::Label(label) => {
            let template = find_unique("Template", label, ctx.client.os_templates()?, |t| {
                t.volume_template_label.as_str()
            })?;
            if decrypt_password {
                Ok(ctx
                    .client
                    .os_template_get(template.volume_template_id, true)?)
            } else {
                Ok(template)
            }
        }
    }
}

pub fn list(ctx: &Context<'_>, args: ListArgs) -> Result<String> {
    let templates = ctx.client.os_templates()?;
    let mut bootloaders = HashMap::new();

    let mut table = Table::new(vec![
        Column::int("ID", 2),
        Column::string("LABEL", 5),
        Column::string("NAME", 5),
        Column::string("DESCRIPTION", 5),
        Column::int("SIZE_MBYTES", 5),
        Column::string("BOOT_METHODS", 5),
        Column::string("OS", 5),
        Column::string("INSTALL_BOOTLOADER", 5),
        Column::string("OS_BOOTLOADER", 5),
        Column::int("USER_ID", 5),
        Column::date("CREATED", 5),
        Column::date("UPDATED", 5),
    ]);
    for t in &templates {
        let install_bootloader =
            bootloader_name(ctx, &mut bootloaders, t.os_asset_id_bootloader_local_install)?;
        let os_bootloader =
            bootloader_name(ctx, &mut bootloaders, t.os_asset_id_bootloader_os_boot)?;
        table.push_row(vec![
            t.volume_template_id.into(),
            t.volume_template_label.as_str().into(),
            t.volume_template_display_name.as_str().into(),
            t.volume_template_description.as_str().into(),
            t.volume_template_size_mbytes.into(),
            t.volume_template_boot_methods_supported.as_str().into(),
            os_summary(t).into(),
            install_bootloader.into(),
            os_bootloader.into(),
            t.user_id.into(),
            Value::timestamp(&t.volume_template_created_timestamp),
            Value::timestamp(&t.volume_template_updated_timestamp),
        ])?;
    }

    Ok(table.sort_by(&["ID"]).render(ENTITY, args.format.output())?)
}

pub fn get(ctx: &Context<'_>, args: GetArgs) -> Result<String> {
    let template = resolve(ctx, &args.id, args.show_credentials)?;
    let mut bootloaders = HashMap::new();

    let mut table = Table::new(vec![
        Column::int("ID", 2),
        Column::string("LABEL", 5),
        Column::string("NAME", 5),
        Column::string("DESCRIPTION", 5),
        Column::int("SIZE_MBYTES", 5),
        Column::string("BOOT_METHODS", 5),
        Column::string("OS", 5),
        Column::int("USER_ID", 5),
        Column::string("INSTALL_BOOTLOADER", 5),
        Column::string("OS_BOOTLOADER", 5),
        Column::date("CREATED", 5),
        Column::date("UPDATED", 5),
    ])
    .with_subtitle(format!(
        "Template {} ({})",
        template.volume_template_label, template.volume_template_id
    ));

    let mut row: Vec<Value> = vec![
        template.volume_template_id.into(),
        template.volume_template_label.as_str().into(),
        template.volume_template_display_name.as_str().into(),
        template.volume_template_description.as_str().into(),
        template.volume_template_size_mbytes.into(),
        template.volume_template_boot_methods_supported.as_str().into(),
        os_summary(&template).into(),
        template.user_id.into(),
        bootloader_name(
            ctx,
            &mut bootloaders,
            template.os_asset_id_bootloader_local_install,
        )?
        .into(),
        bootloader_name(ctx, &mut bootloaders, template.os_asset_id_bootloader_os_boot)?.into(),
        Value::timestamp(&template.volume_template_created_timestamp),
        Value::timestamp(&template.volume_template_updated_timestamp),
    ];
    if args.show_credentials {
        table.add_column(Column::string("CREDENTIALS", 5));
        row.push(credentials_summary(&template).into());
    }
    table.push_row(row)?;

    Ok(table
        .sort_by(&["ID", "LABEL"])
        .render(ENTITY, args.format.output())?)
}

pub fn create(ctx: &Context<'_>, args: CreateArgs) -> Result<String> {
    check_required(&args.fields)?;
    check_password_flags(&args.fields)?;

    let mut template = OsTemplate::default();
    apply_fields(ctx, &mut template, &args.fields)?;

    let created = ctx.client.os_template_create(&template)?;
    Ok(created_output(
        "Template",
        created.volume_template_id,
        args.return_id,
    ))
}

pub fn update(ctx: &Context<'_>, args: UpdateArgs) -> Result<String> {
    check_password_flags(&args.fields)?;

    let mut template = resolve(ctx, &args.id, false)?;
    apply_fields(ctx, &mut template, &args.fields)?;

    ctx.client
        .os_template_update(template.volume_template_id, &template)?;
    ui::success_message(&format!(
        "Template {} ({}) updated",
        template.volume_template_label, template.volume_template_id
    ));
    Ok(String::new())
}

pub fn delete(ctx: &Context<'_>, args: DeleteArgs) -> Result<String> {
    let template = resolve(ctx, &args.id, false)?;

    let prompt = deletion_prompt(&format!(
        "template {} ({})",
        template.volume_template_display_name, template.volume_template_id
    ));
    ctx.confirm(args.autoconfirm, &prompt)?;

    ctx.client.os_template_delete(template.volume_template_id)?;
    ui::success_message(&format!("Template {} deleted", template.volume_template_id));
    Ok(String::new())
}

pub fn make_public(ctx: &Context<'_>, args: MakePublicArgs) -> Result<String> {
    let template = resolve(ctx, &args.id, false)?;
    ctx.client
        .os_template_make_public(template.volume_template_id)?;
    Ok(String::new())
}

pub fn make_private(ctx: &Context<'_>, args: MakePrivateArgs) -> Result<String> {
    let template = resolve(ctx, &args.id, false)?;
    let user = ctx.resolve_user(&args.user_id)?;
    ctx.client
        .os_template_make_private(template.volume_template_id, user.user_id)?;
    Ok(String::new())
}

fn os_summary(template: &OsTemplate) -> String {
    template
        .volume_template_operating_system
        .as_ref()
        .map(|os| os.summary())
        .unwrap_or_default()
}

fn credentials_summary(template: &OsTemplate) -> String {
    template
        .os_template_credentials
        .as_ref()
        .map(|c| {
            format!(
                "user:{} (port {}) passwd:{} (change_password_after_install:{})",
                c.os_template_initial_user,
                c.os_template_initial_ssh_port,
                c.os_template_initial_password.as_deref().unwrap_or_default(),
                c.os_template_change_password_after_deploy
            )
        })
        .unwrap_or_default()
}

/// File name of a bootloader asset, empty when none is set
fn bootloader_name(
    ctx: &Context<'_>,
    cache: &mut HashMap<i64, String>,
    asset_id: i64,
) -> Result<String> {
    if asset_id == 0 {
        return Ok(String::new());
    }
    if let Some(name) = cache.get(&asset_id) {
        return Ok(name.clone());
    }
    let name = ctx.client.os_asset_get(asset_id)?.os_asset_filename;
    cache.insert(asset_id, name.clone());
    Ok(name)
}

fn check_required(fields: &TemplateFields) -> Result<()> {
    let required = [
        ("--label", fields.label.is_some()),
        ("--display-name", fields.display_name.is_some()),
        ("--boot-type", fields.boot_type.is_some()),
        ("--os-type", fields.os_type.is_some()),
        ("--os-version", fields.os_version.is_some()),
        ("--os-architecture", fields.os_architecture.is_some()),
    ];
    if let Some((flag, _)) = required.iter().find(|(_, present)| !present) {
        return Err(CliError::validation(format!("{flag} is required")));
    }
    if fields.initial_password.is_none() && !fields.use_autogenerated_initial_password {
        return Err(CliError::validation(
            "either --initial-password or --use-autogenerated-initial-password is required",
        ));
    }
    if fields.initial_user.is_none() {
        return Err(CliError::validation("--initial-user is required"));
    }
    if fields.initial_ssh_port.is_none() {
        return Err(CliError::validation("--initial-ssh-port is required"));
    }
    Ok(())
}

fn check_password_flags(fields: &TemplateFields) -> Result<()> {
    if fields.use_autogenerated_initial_password && fields.initial_password.is_some() {
        return Err(CliError::validation(
            "--initial-password cannot be used with --use-autogenerated-initial-password",
        ));
    }
    Ok(())
}

fn apply_fields(ctx: &Context<'_>, template: &mut OsTemplate, fields: &TemplateFields) -> Result<()> {
    template.volume_template_is_os_template = true;

    if let Some(label) = &fields.label {
        template.volume_template_label = label.clone();
    }
    if let Some(display_name) = &fields.display_name {
        template.volume_template_display_name = display_name.clone();
    }
    if let Some(size) = fields.size {
        template.volume_template_size_mbytes = size;
    }
    if fields.local_disk_supported {
        template.volume_template_local_disk_supported = true;
    }
    if let Some(methods) = &fields.boot_methods_supported {
        template.volume_template_boot_methods_supported = methods.clone();
    }
    if let Some(boot_type) = &fields.boot_type {
        template.volume_template_boot_type = boot_type.clone();
    }
    if let Some(description) = &fields.description {
        template.volume_template_description = description.clone();
    }
    if let Some(repo_url) = &fields.repo_url {
        template.volume_template_repo_url = repo_url.clone();
    }

    if fields.os_type.is_some() || fields.os_version.is_some() || fields.os_architecture.is_some()
    {
        let os = template
            .volume_template_operating_system
            .get_or_insert_with(Default::default);
        if let Some(os_type) = &fields.os_type {
            os.operating_system_type = os_type.clone();
        }
        if let Some(version) = &fields.os_version {
            os.operating_system_version = version.clone();
        }
        if let Some(architecture) = &fields.os_architecture {
            os.operating_system_architecture = architecture.clone();
        }
    }

    if let Some(reference) = &fields.install_bootloader_asset {
        template.os_asset_id_bootloader_local_install = os_asset::resolve(ctx, reference)?.os_asset_id;
    }
    if let Some(reference) = &fields.os_boot_bootloader_asset {
        template.os_asset_id_bootloader_os_boot = os_asset::resolve(ctx, reference)?.os_asset_id;
    }

    let touches_credentials = fields.initial_user.is_some()
        || fields.initial_password.is_some()
        || fields.use_autogenerated_initial_password
        || fields.initial_ssh_port.is_some()
        || fields.change_password_after_deploy;
    if touches_credentials {
        let credentials = template
            .os_template_credentials
            .get_or_insert_with(Default::default);
        if fields.use_autogenerated_initial_password {
            credentials.os_template_use_autogenerated_initial_password = true;
            credentials.os_template_initial_password = None;
        } else if let Some(password) = &fields.initial_password {
            credentials.os_template_use_autogenerated_initial_password = false;
            credentials.os_template_initial_password = Some(password.clone());
        }
        if let Some(user) = &fields.initial_user {
            credentials.os_template_initial_user = user.clone();
        }
        if let Some(port) = fields.initial_ssh_port {
            credentials.os_template_initial_ssh_port = port;
        }
        if fields.change_password_after_deploy {
            credentials.os_template_change_password_after_deploy = true;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::run_command_line;
    use crate::terminal::scripted::Scripted;
    use metalcloud::testing::MockClient;
    use metalcloud::{OperatingSystem, OsAsset, OsTemplateCredentials, User};

    fn ubuntu() -> OsTemplate {
        OsTemplate {
            volume_template_id: 10,
            volume_template_label: "ubuntu-22".to_string(),
            volume_template_display_name: "Ubuntu 22.04".to_string(),
            volume_template_size_mbytes: 40960,
            volume_template_boot_methods_supported: "pxe_iscsi".to_string(),
            volume_template_operating_system: Some(OperatingSystem {
                operating_system_type: "Ubuntu".to_string(),
                operating_system_version: "22.04".to_string(),
                operating_system_architecture: "x86_64".to_string(),
            }),
            os_template_credentials: Some(OsTemplateCredentials {
                os_template_initial_user: "root".to_string(),
                os_template_initial_password: Some("s3cret".to_string()),
                os_template_initial_ssh_port: 22,
                ..Default::default()
            }),
            os_asset_id_bootloader_local_install: 100,
            user_id: 1,
            volume_template_created_timestamp: "2023-01-02T03:04:05Z".to_string(),
            ..Default::default()
        }
    }

    fn client() -> MockClient {
        MockClient::new()
            .with_template(ubuntu())
            .with_template(OsTemplate {
                volume_template_id: 4,
                volume_template_label: "centos".to_string(),
                ..Default::default()
            })
            .with_asset(OsAsset {
                os_asset_id: 100,
                os_asset_filename: "grub.efi".to_string(),
                ..Default::default()
            })
            .with_user(User {
                user_id: 42,
                user_email: "owner@example.com".to_string(),
                ..Default::default()
            })
    }

    fn complete_fields() -> TemplateFields {
        TemplateFields {
            label: Some("debian-12".to_string()),
            display_name: Some("Debian 12".to_string()),
            boot_type: Some("uefi_only".to_string()),
            os_type: Some("Debian".to_string()),
            os_version: Some("12".to_string()),
            os_architecture: Some("x86_64".to_string()),
            initial_user: Some("admin".to_string()),
            initial_password: Some("pass".to_string()),
            initial_ssh_port: Some(22),
            ..Default::default()
        }
    }

    #[test]
    fn test_list_resolves_bootloader_names() {
        let client = client();
        let terminal = Scripted::answering("yes");
        let ctx = Context {
            client: &client,
            terminal: &terminal,
        };
        let out = list(
            &ctx,
            ListArgs {
                format: FormatArg {
                    format: Some("json".to_string()),
                },
            },
        )
        .unwrap();

        let rows: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ID"], 4);
        assert_eq!(rows[0]["INSTALL_BOOTLOADER"], "");
        assert_eq!(rows[1]["LABEL"], "ubuntu-22");
        assert_eq!(rows[1]["OS"], "Ubuntu 22.04 x86_64");
        assert_eq!(rows[1]["INSTALL_BOOTLOADER"], "grub.efi");
        assert_eq!(rows[1]["SIZE_MBYTES"], 40960);
        assert_eq!(rows[1]["CREATED"], "2023-01-02T03:04:05Z");
        assert_eq!(rows[1]["UPDATED"], serde_json::Value::Null);
        assert_eq!(client.call_count("os_asset_get"), 1);
    }

    #[test]
    fn test_list_text_summary() {
        let client = client();
        let terminal = Scripted::answering("yes");
        let ctx = Context {
            client: &client,
            terminal: &terminal,
        };
        let out = list(
            &ctx,
            ListArgs {
                format: FormatArg::default(),
            },
        )
        .unwrap();
        assert!(out.starts_with("Templates\n"));
        assert!(out.contains("Total: 2 Templates"));
    }

    #[test]
    fn test_get_with_credentials() {
        let client = client();
        let terminal = Scripted::answering("yes");
        let ctx = Context {
            client: &client,
            terminal: &terminal,
        };
        let out = get(
            &ctx,
            GetArgs {
                id: IdOrLabel::Label("ubuntu-22".to_string()),
                format: FormatArg {
                    format: Some("csv".to_string()),
                },
                show_credentials: true,
            },
        )
        .unwrap();

        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 13);
        assert_eq!(&headers[12], "CREDENTIALS");
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(
            &record[12],
            "user:root (port 22) passwd:s3cret (change_password_after_install:false)"
        );
    }

    #[test]
    fn test_get_hides_credentials_by_default() {
        let client = client();
        let terminal = Scripted::answering("yes");
        let ctx = Context {
            client: &client,
            terminal: &terminal,
        };
        let out = get(
            &ctx,
            GetArgs {
                id: IdOrLabel::Id(10),
                format: FormatArg::default(),
                show_credentials: false,
            },
        )
        .unwrap();
        assert!(out.contains("Template ubuntu-22 (10)"));
        assert!(!out.contains("CREDENTIALS"));
        assert!(!out.contains("s3cret"));
    }

    #[test]
    fn test_create_validates_before_remote_calls() {
        let client = client();
        let terminal = Scripted::answering("yes");
        let ctx = Context {
            client: &client,
            terminal: &terminal,
        };
        let err = create(
            &ctx,
            CreateArgs {
                fields: TemplateFields {
                    boot_type: None,
                    install_bootloader_asset: Some(IdOrLabel::Id(100)),
                    ..complete_fields()
                },
                return_id: false,
            },
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "--boot-type is required");
        assert!(client.calls().is_empty());

        let err = create(
            &ctx,
            CreateArgs {
                fields: TemplateFields {
                    initial_password: None,
                    ..complete_fields()
                },
                return_id: false,
            },
        )
        .unwrap_err();
        assert_eq!(
            err.user_message(),
            "either --initial-password or --use-autogenerated-initial-password is required"
        );
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_create_returns_id() {
        let client = client();
        let terminal = Scripted::answering("yes");
        let ctx = Context {
            client: &client,
            terminal: &terminal,
        };
        let out = create(
            &ctx,
            CreateArgs {
                fields: TemplateFields {
                    initial_password: None,
                    use_autogenerated_initial_password: true,
                    install_bootloader_asset: Some(IdOrLabel::Label("grub.efi".to_string())),
                    ..complete_fields()
                },
                return_id: true,
            },
        )
        .unwrap();

        let created = client
            .template_records()
            .into_iter()
            .find(|t| t.volume_template_label == "debian-12")
            .unwrap();
        assert_eq!(out, created.volume_template_id.to_string());
        assert!(created.volume_template_is_os_template);
        assert_eq!(created.os_asset_id_bootloader_local_install, 100);
        let credentials = created.os_template_credentials.unwrap();
        assert!(credentials.os_template_use_autogenerated_initial_password);
        assert_eq!(credentials.os_template_initial_password, None);
        assert_eq!(credentials.os_template_initial_user, "admin");
        assert_eq!(
            created.volume_template_operating_system.unwrap().summary(),
            "Debian 12 x86_64"
        );
    }

    #[test]
    fn test_update_applies_onto_fetched_template() {
        let client = client();
        let terminal = Scripted::answering("yes");
        let ctx = Context {
            client: &client,
            terminal: &terminal,
        };
        update(
            &ctx,
            UpdateArgs {
                id: IdOrLabel::Id(10),
                fields: TemplateFields {
                    description: Some("LTS".to_string()),
                    os_version: Some("22.04.3".to_string()),
                    ..Default::default()
                },
            },
        )
        .unwrap();

        let updated = client
            .template_records()
            .into_iter()
            .find(|t| t.volume_template_id == 10)
            .unwrap();
        assert_eq!(updated.volume_template_description, "LTS");
        assert_eq!(updated.volume_template_label, "ubuntu-22");
        assert_eq!(
            updated.volume_template_operating_system.unwrap().summary(),
            "Ubuntu 22.04.3 x86_64"
        );
        assert_eq!(updated.os_asset_id_bootloader_local_install, 100);
    }

    #[test]
    fn test_update_rejects_conflicting_password_flags() {
        let client = client();
        let terminal = Scripted::answering("yes");
        let ctx = Context {
            client: &client,
            terminal: &terminal,
        };
        let err = update(
            &ctx,
            UpdateArgs {
                id: IdOrLabel::Id(10),
                fields: TemplateFields {
                    initial_password: Some("x".to_string()),
                    use_autogenerated_initial_password: true,
                    ..Default::default()
                },
            },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
        assert!(!client.was_called("os_template_update"));
    }

    #[test]
    fn test_delete_prompt_uses_display_name() {
        let client = client();
        let terminal = Scripted::answering("yes");
        let ctx = Context {
            client: &client,
            terminal: &terminal,
        };
        delete(
            &ctx,
            DeleteArgs {
                id: IdOrLabel::Label("ubuntu-22".to_string()),
                autoconfirm: false,
            },
        )
        .unwrap();
        assert_eq!(
            terminal.prompts(),
            vec![
                "Deleting template Ubuntu 22.04 (10).  Are you sure? Type \"yes\" to continue:"
                    .to_string()
            ]
        );
        assert_eq!(client.template_records().len(), 1);
    }

    #[test]
    fn test_ambiguous_label() {
        let client = client().with_template(OsTemplate {
            volume_template_id: 11,
            volume_template_label: "centos".to_string(),
            ..Default::default()
        });
        let terminal = Scripted::answering("yes");
        let ctx = Context {
            client: &client,
            terminal: &terminal,
        };
        let err = make_public(
            &ctx,
            MakePublicArgs {
                id: IdOrLabel::Label("centos".to_string()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Ambiguous { count: 2, .. }));
        assert!(client.public_templates().is_empty());
    }

    #[test]
    fn test_make_private_resolves_user() {
        let client = client();
        let terminal = Scripted::answering("yes");
        let ctx = Context {
            client: &client,
            terminal: &terminal,
        };
        make_private(
            &ctx,
            MakePrivateArgs {
                id: IdOrLabel::Id(4),
                user_id: IdOrLabel::Id(42),
            },
        )
        .unwrap();
        assert_eq!(client.private_owners(), vec![(4, 42)]);
        assert!(client.was_called("user_get"));
    }

    #[test]
    fn test_numeric_id_on_command_line_fetches_by_id() {
        let client = client();
        let terminal = Scripted::answering("yes");
        let out = run_command_line(
            &client,
            &terminal,
            &["template", "show", "--id", "10", "--format", "json"],
        )
        .unwrap();

        let rows: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(rows[0]["ID"], 10);
        assert!(client.was_called("os_template_get"));
        assert!(!client.was_called("os_templates"));
    }
}
