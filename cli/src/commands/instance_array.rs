use super::{Context, FormatArg, created_output, deletion_prompt};
use crate::error::Result;
use crate::ui;
use clap::{Args, Subcommand, ValueEnum};
use metalcloud::{IdOrLabel, InstanceArray, InstanceArrayOperation};
use tableformatter::{Column, Table};

const ENTITY: &str = "Instance Arrays";

#[derive(Subcommand, Debug)]
pub enum InstanceArrayCommand {
    /// Create an instance array in an infrastructure
    #[command(visible_alias = "new")]
    Create(CreateArgs),

    /// List the instance arrays of an infrastructure
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show a single instance array
    #[command(visible_alias = "show")]
    Get(GetArgs),

    /// Edit an instance array
    #[command(visible_alias = "alter")]
    Edit(EditArgs),

    /// Delete an instance array
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootMethod {
    #[value(name = "pxe_iscsi")]
    PxeIscsi,
    #[value(name = "local_drives")]
    LocalDrives,
}

impl BootMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            BootMethod::PxeIscsi => "pxe_iscsi",
            BootMethod::LocalDrives => "local_drives",
        }
    }
}

/// Hardware requirements shared by create and edit
#[derive(Args, Debug, Default)]
pub struct SizingArgs {
    /// Minimum RAM (GB)
    #[arg(long)]
    pub ram: Option<i64>,

    /// Minimum processor count
    #[arg(long = "proc")]
    pub proc_count: Option<i64>,

    /// Minimum processor frequency (MHz)
    #[arg(long)]
    pub proc_freq: Option<i64>,

    /// Minimum processor core count
    #[arg(long)]
    pub proc_core_count: Option<i64>,

    /// Number of local drives
    #[arg(long)]
    pub disks: Option<i64>,

    /// Size of the local drives (MB)
    #[arg(long)]
    pub disk_size: Option<i64>,

    /// Boot type
    #[arg(long, value_enum)]
    pub boot: Option<BootMethod>,

    /// Turn off firewall management
    #[arg(long, default_value_t = false)]
    pub firewall_management_disabled: bool,

    /// Volume template used when booting from local drives
    #[arg(long)]
    pub template: Option<i64>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Infrastructure ID or label
    #[arg(long)]
    pub infra: IdOrLabel,

    /// Number of instances in the array
    #[arg(long)]
    pub instance_count: i64,

    /// Label of the instance array
    #[arg(long)]
    pub label: String,

    #[command(flatten)]
    pub sizing: SizingArgs,

    /// Print only the ID of the created instance array
    #[arg(long, default_value_t = false)]
    pub return_id: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Infrastructure ID or label
    #[arg(long)]
    pub infra: IdOrLabel,

    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Instance array ID or label
    #[arg(long)]
    pub id: IdOrLabel,

    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Instance array ID or label
    #[arg(long)]
    pub id: IdOrLabel,

    /// Number of instances in the array
    #[arg(long)]
    pub instance_count: Option<i64>,

    /// New label of the instance array
    #[arg(long)]
    pub label: Option<String>,

    #[command(flatten)]
    pub sizing: SizingArgs,

    /// Swap the hardware of existing instances to match the new requirements
    #[arg(long, default_value_t = false)]
    pub swap_existing_hardware: bool,

    /// Delete the drives detached when the instance count goes down
    #[arg(long, default_value_t = false)]
    pub do_not_keep_detaching_drives: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Instance array ID or label
    #[arg(long)]
    pub id: IdOrLabel,

    /// Do not ask for confirmation
    #[arg(long, default_value_t = false)]
    pub autoconfirm: bool,
}

pub fn execute(ctx: &Context<'_>, command: InstanceArrayCommand) -> Result<String> {
    match command {
        InstanceArrayCommand::Create(args) => create(ctx, args),
        InstanceArrayCommand::List(args) => list(ctx, args),
        InstanceArrayCommand::Get(args) => get(ctx, args),
        InstanceArrayCommand::Edit(args) => edit(ctx, args),
        InstanceArrayCommand::Delete(args) => delete(ctx, args),
    }
}

pub fn create(ctx: &Context<'_>, args: CreateArgs) -> Result<String> {
    let infrastructure = ctx.client.infrastructure_get(&args.infra)?;

    let mut instance_array = InstanceArray {
        instance_array_label: args.label,
        instance_array_instance_count: args.instance_count,
        instance_array_firewall_managed: true,
        ..Default::default()
    };
    let sizing = &args.sizing;
    set_if(&mut instance_array.instance_array_ram_gbytes, sizing.ram);
    set_if(&mut instance_array.instance_array_processor_count, sizing.proc_count);
    set_if(&mut instance_array.instance_array_processor_core_mhz, sizing.proc_freq);
    set_if(
        &mut instance_array.instance_array_processor_core_count,
        sizing.proc_core_count,
    );
    set_if(&mut instance_array.instance_array_disk_count, sizing.disks);
    set_if(&mut instance_array.instance_array_disk_size_mbytes, sizing.disk_size);
    if let Some(boot) = sizing.boot {
        instance_array.instance_array_boot_method = boot.as_str().to_string();
    }
    if sizing.firewall_management_disabled {
        instance_array.instance_array_firewall_managed = false;
    }
    instance_array.volume_template_id = sizing.template;

    let created = ctx
        .client
        .instance_array_create(infrastructure.infrastructure_id, &instance_array)?;
    tracing::debug!(
        id = created.instance_array_id,
        infrastructure = infrastructure.infrastructure_id,
        "instance array created"
    );
    Ok(created_output(
        "Instance array",
        created.instance_array_id,
        args.return_id,
    ))
}

pub fn list(ctx: &Context<'_>, args: ListArgs) -> Result<String> {
    let infrastructure = ctx.client.infrastructure_get(&args.infra)?;
    let arrays = ctx
        .client
        .instance_arrays(infrastructure.infrastructure_id)?;

    let mut table = Table::new(vec![
        Column::int("ID", 6),
        Column::string("LABEL", 15),
        Column::string("STATUS", 10),
        Column::int("INST_CNT", 10),
    ]);
    for ia in &arrays {
        let operation = ia.operation_or_current();
        table.push_row(vec![
            ia.instance_array_id.into(),
            operation.instance_array_label.into(),
            display_status(ia).into(),
            operation.instance_array_instance_count.into(),
        ])?;
    }

    Ok(table.sort_by(&["ID"]).render(ENTITY, args.format.output())?)
}

pub fn get(ctx: &Context<'_>, args: GetArgs) -> Result<String> {
    let ia = ctx.client.instance_array_get(&args.id)?;
    let operation = ia.operation_or_current();

    let mut table = Table::new(vec![
        Column::int("ID", 6),
        Column::string("LABEL", 15),
        Column::string("STATUS", 10),
        Column::int("INST_CNT", 10),
        Column::int("RAM_GB", 6),
        Column::int("PROCS", 5),
        Column::int("PROC_MHZ", 8),
        Column::int("CORES", 5),
        Column::int("DISKS", 5),
        Column::int("DISK_SIZE_MB", 8),
        Column::string("BOOT", 10),
        Column::bool("FIREWALL_MANAGED", 5),
        Column::int("TEMPLATE_ID", 6),
    ])
    .with_subtitle(format!(
        "Instance array {} ({})",
        operation.instance_array_label, ia.instance_array_id
    ));
    table.push_row(vec![
        ia.instance_array_id.into(),
        operation.instance_array_label.clone().into(),
        display_status(&ia).into(),
        operation.instance_array_instance_count.into(),
        operation.instance_array_ram_gbytes.into(),
        operation.instance_array_processor_count.into(),
        operation.instance_array_processor_core_mhz.into(),
        operation.instance_array_processor_core_count.into(),
        operation.instance_array_disk_count.into(),
        operation.instance_array_disk_size_mbytes.into(),
        operation.instance_array_boot_method.clone().into(),
        operation.instance_array_firewall_managed.into(),
        operation.volume_template_id.into(),
    ])?;

    Ok(table.render(ENTITY, args.format.output())?)
}

pub fn edit(ctx: &Context<'_>, args: EditArgs) -> Result<String> {
    let ia = ctx.client.instance_array_get(&args.id)?;
    let mut operation = ia.operation_or_current();
    apply_edit(&mut operation, &args);

    let swap_hardware = Some(args.swap_existing_hardware);
    let keep_detaching_drives = args.do_not_keep_detaching_drives.then_some(false);

    ctx.client.instance_array_edit(
        ia.instance_array_id,
        &operation,
        swap_hardware,
        keep_detaching_drives,
    )?;
    ui::success_message(&format!(
        "Instance array {} ({}) edited",
        operation.instance_array_label, ia.instance_array_id
    ));
    Ok(String::new())
}

pub fn delete(ctx: &Context<'_>, args: DeleteArgs) -> Result<String> {
    let ia = ctx.client.instance_array_get(&args.id)?;
    let infrastructure = ctx
        .client
        .infrastructure_get(&IdOrLabel::Id(ia.infrastructure_id))?;

    let prompt = deletion_prompt(&format!(
        "instance array {} ({}) - from infrastructure {} ({})",
        ia.instance_array_label,
        ia.instance_array_id,
        infrastructure.infrastructure_label,
        infrastructure.infrastructure_id
    ));
    ctx.confirm(args.autoconfirm, &prompt)?;

    ctx.client.instance_array_delete(ia.instance_array_id)?;
    ui::success_message(&format!("Instance array {} deleted", ia.instance_array_id));
    Ok(String::new())
}

/// Service status, or `edited` while an edit waits to be deployed
fn display_status(ia: &InstanceArray) -> String {
    match &ia.instance_array_operation {
        Some(op)
            if ia.instance_array_service_status != "ordered"
                && op.instance_array_deploy_type == "edit"
                && op.instance_array_deploy_status == "not_started" =>
        {
            "edited".to_string()
        }
        _ => ia.instance_array_service_status.clone(),
    }
}

fn apply_edit(operation: &mut InstanceArrayOperation, args: &EditArgs) {
    if let Some(label) = &args.label {
        operation.instance_array_label = label.clone();
    }
    set_if(&mut operation.instance_array_instance_count, args.instance_count);

    let sizing = &args.sizing;
    set_if(&mut operation.instance_array_ram_gbytes, sizing.ram);
    set_if(&mut operation.instance_array_processor_count, sizing.proc_count);
    set_if(&mut operation.instance_array_processor_core_mhz, sizing.proc_freq);
    set_if(
        &mut operation.instance_array_processor_core_count,
        sizing.proc_core_count,
    );
    set_if(&mut operation.instance_array_disk_count, sizing.disks);
    set_if(&mut operation.instance_array_disk_size_mbytes, sizing.disk_size);
    if let Some(boot) = sizing.boot {
        operation.instance_array_boot_method = boot.as_str().to_string();
    }
    if sizing.firewall_management_disabled {
        operation.instance_array_firewall_managed = false;
    }
    if sizing.template.is_some() {
        operation.volume_template_id = sizing.template;
    }
}

fn set_if(field: &mut i64, value: Option<i64>) {
    if let Some(value) = value {
        *field = value;
    }
}
