//! Records exchanged with the API. Field names follow the wire format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Infrastructure {
    pub infrastructure_id: i64,
    pub infrastructure_label: String,
    pub user_id_owner: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceArray {
    pub instance_array_id: i64,
    pub infrastructure_id: i64,
    pub instance_array_label: String,
    pub instance_array_instance_count: i64,
    pub instance_array_ram_gbytes: i64,
    pub instance_array_processor_count: i64,
    pub instance_array_processor_core_mhz: i64,
    pub instance_array_processor_core_count: i64,
    pub instance_array_disk_count: i64,
    pub instance_array_disk_size_mbytes: i64,
    pub instance_array_boot_method: String,
    pub instance_array_firewall_managed: bool,
    pub instance_array_service_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_template_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_array_operation: Option<InstanceArrayOperation>,
}

impl InstanceArray {
    /// Pending operation of the array, or one seeded from its current state
    pub fn operation_or_current(&self) -> InstanceArrayOperation {
        self.instance_array_operation
            .clone()
            .unwrap_or_else(|| InstanceArrayOperation::from(self))
    }
}

/// Pending change set of an instance array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceArrayOperation {
    pub instance_array_id: i64,
    pub instance_array_label: String,
    pub instance_array_instance_count: i64,
    pub instance_array_ram_gbytes: i64,
    pub instance_array_processor_count: i64,
    pub instance_array_processor_core_mhz: i64,
    pub instance_array_processor_core_count: i64,
    pub instance_array_disk_count: i64,
    pub instance_array_disk_size_mbytes: i64,
    pub instance_array_boot_method: String,
    pub instance_array_firewall_managed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_template_id: Option<i64>,
    pub instance_array_deploy_type: String,
    pub instance_array_deploy_status: String,
    pub instance_array_change_id: i64,
}

impl From<&InstanceArray> for InstanceArrayOperation {
    fn from(ia: &InstanceArray) -> Self {
        Self {
            instance_array_id: ia.instance_array_id,
            instance_array_label: ia.instance_array_label.clone(),
            instance_array_instance_count: ia.instance_array_instance_count,
            instance_array_ram_gbytes: ia.instance_array_ram_gbytes,
            instance_array_processor_count: ia.instance_array_processor_count,
            instance_array_processor_core_mhz: ia.instance_array_processor_core_mhz,
            instance_array_processor_core_count: ia.instance_array_processor_core_count,
            instance_array_disk_count: ia.instance_array_disk_count,
            instance_array_disk_size_mbytes: ia.instance_array_disk_size_mbytes,
            instance_array_boot_method: ia.instance_array_boot_method.clone(),
            instance_array_firewall_managed: ia.instance_array_firewall_managed,
            volume_template_id: ia.volume_template_id,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingSystem {
    pub operating_system_type: String,
    pub operating_system_version: String,
    pub operating_system_architecture: String,
}

impl OperatingSystem {
    /// One-line description such as `Ubuntu 22.04 x86_64`
    pub fn summary(&self) -> String {
        format!(
            "{} {} {}",
            self.operating_system_type,
            self.operating_system_version,
            self.operating_system_architecture
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsTemplateCredentials {
    pub os_template_initial_user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_template_initial_password: Option<String>,
    pub os_template_initial_ssh_port: i64,
    pub os_template_change_password_after_deploy: bool,
    pub os_template_use_autogenerated_initial_password: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsTemplate {
    pub volume_template_id: i64,
    pub volume_template_label: String,
    pub volume_template_display_name: String,
    pub volume_template_description: String,
    pub volume_template_size_mbytes: i64,
    pub volume_template_local_disk_supported: bool,
    pub volume_template_is_os_template: bool,
    pub volume_template_boot_methods_supported: String,
    pub volume_template_boot_type: String,
    pub volume_template_repo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_template_operating_system: Option<OperatingSystem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_template_credentials: Option<OsTemplateCredentials>,
    pub os_asset_id_bootloader_local_install: i64,
    pub os_asset_id_bootloader_os_boot: i64,
    pub user_id: i64,
    pub volume_template_created_timestamp: String,
    pub volume_template_updated_timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsAsset {
    pub os_asset_id: i64,
    pub os_asset_filename: String,
    pub os_asset_file_size_bytes: i64,
    pub os_asset_file_mime: String,
    pub os_asset_template_type: String,
    pub os_asset_usage: String,
    pub os_asset_source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_asset_contents_base64: Option<String>,
    pub user_id_owner: i64,
    pub os_asset_created_timestamp: String,
    pub os_asset_updated_timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Secret {
    pub secret_id: i64,
    pub user_id_owner: i64,
    pub secret_name: String,
    pub secret_usage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_base64: Option<String>,
    pub secret_created_timestamp: String,
    pub secret_updated_timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub user_id: i64,
    pub user_email: String,
    pub user_display_name: String,
}
