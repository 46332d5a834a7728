use crate::error::Result;
use crate::id::IdOrLabel;
use crate::types::{
    Infrastructure, InstanceArray, InstanceArrayOperation, OsAsset, OsTemplate, Secret, User,
};

/// Remote procedures used by the command line client.
///
/// List calls return every record visible to the configured user. Calls taking
/// an [`IdOrLabel`] let the API resolve labels itself.
pub trait MetalCloudClient {
    fn infrastructure_get(&self, infrastructure: &IdOrLabel) -> Result<Infrastructure>;

    fn instance_arrays(&self, infrastructure_id: i64) -> Result<Vec<InstanceArray>>;
    fn instance_array_get(&self, instance_array: &IdOrLabel) -> Result<InstanceArray>;
    fn instance_array_create(
        &self,
        infrastructure_id: i64,
        instance_array: &InstanceArray,
    ) -> Result<InstanceArray>;
    fn instance_array_edit(
        &self,
        instance_array_id: i64,
        operation: &InstanceArrayOperation,
        swap_existing_instances_hardware: Option<bool>,
        keep_detaching_drives: Option<bool>,
    ) -> Result<InstanceArray>;
    fn instance_array_delete(&self, instance_array_id: i64) -> Result<()>;

    fn os_templates(&self) -> Result<Vec<OsTemplate>>;
    fn os_template_get(&self, template_id: i64, decrypt_password: bool) -> Result<OsTemplate>;
    fn os_template_create(&self, template: &OsTemplate) -> Result<OsTemplate>;
    fn os_template_update(&self, template_id: i64, template: &OsTemplate) -> Result<OsTemplate>;
    fn os_template_delete(&self, template_id: i64) -> Result<()>;
    fn os_template_make_public(&self, template_id: i64) -> Result<()>;
    fn os_template_make_private(&self, template_id: i64, user_id: i64) -> Result<()>;
    fn os_template_add_os_asset(
        &self,
        template_id: i64,
        asset_id: i64,
        path: &str,
        variables_json: &str,
    ) -> Result<()>;

    fn os_assets(&self) -> Result<Vec<OsAsset>>;
    fn os_asset_get(&self, asset_id: i64) -> Result<OsAsset>;
    fn os_asset_create(&self, asset: &OsAsset) -> Result<OsAsset>;
    fn os_asset_update(&self, asset_id: i64, asset: &OsAsset) -> Result<OsAsset>;
    fn os_asset_delete(&self, asset_id: i64) -> Result<()>;
    fn os_asset_make_public(&self, asset_id: i64) -> Result<OsAsset>;
    fn os_asset_make_private(&self, asset_id: i64, user_id: i64) -> Result<OsAsset>;

    fn secrets(&self, usage: Option<&str>) -> Result<Vec<Secret>>;
    fn secret_get(&self, secret_id: i64) -> Result<Secret>;
    fn secret_create(&self, secret: &Secret) -> Result<Secret>;
    fn secret_delete(&self, secret_id: i64) -> Result<()>;

    fn user_get(&self, user_id: i64) -> Result<User>;
    fn user_get_by_email(&self, email: &str) -> Result<User>;
}
