//! In-memory [`MetalCloudClient`] used by command tests

use crate::client::MetalCloudClient;
use crate::error::{ApiError, Result};
use crate::id::IdOrLabel;
use crate::types::{
    Infrastructure, InstanceArray, InstanceArrayOperation, OsAsset, OsTemplate, Secret, User,
};
use std::cell::RefCell;
use std::collections::HashMap;

/// A template to asset association recorded by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLink {
    pub template_id: i64,
    pub asset_id: i64,
    pub path: String,
    pub variables_json: String,
}

/// An instance array edit recorded by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayEdit {
    pub instance_array_id: i64,
    pub operation: InstanceArrayOperation,
    pub swap_existing_instances_hardware: Option<bool>,
    pub keep_detaching_drives: Option<bool>,
}

#[derive(Default)]
struct State {
    infrastructures: Vec<Infrastructure>,
    instance_arrays: Vec<InstanceArray>,
    templates: Vec<OsTemplate>,
    assets: Vec<OsAsset>,
    secrets: Vec<Secret>,
    users: Vec<User>,
    links: Vec<AssetLink>,
    edits: Vec<ArrayEdit>,
    public_templates: Vec<i64>,
    public_assets: Vec<i64>,
    private_owners: Vec<(i64, i64)>,
    next_id: i64,
}

impl State {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Mock API client keeping records in memory and recording every call
#[derive(Default)]
pub struct MockClient {
    state: RefCell<State>,
    calls: RefCell<Vec<String>>,
    failures: RefCell<HashMap<String, String>>,
}

impl MockClient {
    pub fn new() -> Self {
        let client = Self::default();
        client.state.borrow_mut().next_id = 1000;
        client
    }

    pub fn with_infrastructure(self, infrastructure: Infrastructure) -> Self {
        self.state.borrow_mut().infrastructures.push(infrastructure);
        self
    }

    pub fn with_instance_array(self, instance_array: InstanceArray) -> Self {
        self.state.borrow_mut().instance_arrays.push(instance_array);
        self
    }

    pub fn with_template(self, template: OsTemplate) -> Self {
        self.state.borrow_mut().templates.push(template);
        self
    }

    pub fn with_asset(self, asset: OsAsset) -> Self {
        self.state.borrow_mut().assets.push(asset);
        self
    }

    pub fn with_secret(self, secret: Secret) -> Self {
        self.state.borrow_mut().secrets.push(secret);
        self
    }

    pub fn with_user(self, user: User) -> Self {
        self.state.borrow_mut().users.push(user);
        self
    }

    /// Make every call to `method` fail with a remote error
    pub fn with_failure(self, method: &str, message: &str) -> Self {
        self.failures
            .borrow_mut()
            .insert(method.to_string(), message.to_string());
        self
    }

    /// Names of the remote procedures called so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == method)
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == method).count()
    }

    pub fn instance_array_records(&self) -> Vec<InstanceArray> {
        self.state.borrow().instance_arrays.clone()
    }

    pub fn template_records(&self) -> Vec<OsTemplate> {
        self.state.borrow().templates.clone()
    }

    pub fn asset_records(&self) -> Vec<OsAsset> {
        self.state.borrow().assets.clone()
    }

    pub fn secret_records(&self) -> Vec<Secret> {
        self.state.borrow().secrets.clone()
    }

    pub fn asset_links(&self) -> Vec<AssetLink> {
        self.state.borrow().links.clone()
    }

    pub fn array_edits(&self) -> Vec<ArrayEdit> {
        self.state.borrow().edits.clone()
    }

    pub fn public_templates(&self) -> Vec<i64> {
        self.state.borrow().public_templates.clone()
    }

    pub fn public_assets(&self) -> Vec<i64> {
        self.state.borrow().public_assets.clone()
    }

    /// `(record_id, owner_user_id)` pairs set through make-private calls
    pub fn private_owners(&self) -> Vec<(i64, i64)> {
        self.state.borrow().private_owners.clone()
    }

    fn record(&self, method: &str) -> Result<()> {
        self.calls.borrow_mut().push(method.to_string());
        match self.failures.borrow().get(method) {
            Some(message) => Err(ApiError::Remote {
                method: method.to_string(),
                code: -1,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn matches(reference: &IdOrLabel, id: i64, label: &str) -> bool {
    match reference {
        IdOrLabel::Id(wanted) => *wanted == id,
        IdOrLabel::Label(wanted) => wanted == label,
    }
}

impl MetalCloudClient for MockClient {
    fn infrastructure_get(&self, infrastructure: &IdOrLabel) -> Result<Infrastructure> {
        self.record("infrastructure_get")?;
        self.state
            .borrow()
            .infrastructures
            .iter()
            .find(|i| matches(infrastructure, i.infrastructure_id, &i.infrastructure_label))
            .cloned()
            .ok_or_else(|| ApiError::not_found("Infrastructure", infrastructure))
    }

    fn instance_arrays(&self, infrastructure_id: i64) -> Result<Vec<InstanceArray>> {
        self.record("instance_arrays")?;
        Ok(self
            .state
            .borrow()
            .instance_arrays
            .iter()
            .filter(|ia| ia.infrastructure_id == infrastructure_id)
            .cloned()
            .collect())
    }

    fn instance_array_get(&self, instance_array: &IdOrLabel) -> Result<InstanceArray> {
        self.record("instance_array_get")?;
        self.state
            .borrow()
            .instance_arrays
            .iter()
            .find(|ia| {
                matches(
                    instance_array,
                    ia.instance_array_id,
                    &ia.instance_array_label,
                )
            })
            .cloned()
            .ok_or_else(|| ApiError::not_found("Instance array", instance_array))
    }

    fn instance_array_create(
        &self,
        infrastructure_id: i64,
        instance_array: &InstanceArray,
    ) -> Result<InstanceArray> {
        self.record("instance_array_create")?;
        let mut state = self.state.borrow_mut();
        let mut created = instance_array.clone();
        created.instance_array_id = state.allocate_id();
        created.infrastructure_id = infrastructure_id;
        created.instance_array_service_status = "ordered".to_string();
        state.instance_arrays.push(created.clone());
        Ok(created)
    }

    fn instance_array_edit(
        &self,
        instance_array_id: i64,
        operation: &InstanceArrayOperation,
        swap_existing_instances_hardware: Option<bool>,
        keep_detaching_drives: Option<bool>,
    ) -> Result<InstanceArray> {
        self.record("instance_array_edit")?;
        let mut state = self.state.borrow_mut();
        state.edits.push(ArrayEdit {
            instance_array_id,
            operation: operation.clone(),
            swap_existing_instances_hardware,
            keep_detaching_drives,
        });
        let ia = state
            .instance_arrays
            .iter_mut()
            .find(|ia| ia.instance_array_id == instance_array_id)
            .ok_or_else(|| ApiError::not_found("Instance array", instance_array_id))?;
        ia.instance_array_operation = Some(operation.clone());
        Ok(ia.clone())
    }

    fn instance_array_delete(&self, instance_array_id: i64) -> Result<()> {
        self.record("instance_array_delete")?;
        self.state
            .borrow_mut()
            .instance_arrays
            .retain(|ia| ia.instance_array_id != instance_array_id);
        Ok(())
    }

    fn os_templates(&self) -> Result<Vec<OsTemplate>> {
        self.record("os_templates")?;
        Ok(self.state.borrow().templates.clone())
    }

    fn os_template_get(&self, template_id: i64, decrypt_password: bool) -> Result<OsTemplate> {
        self.record("os_template_get")?;
        let mut template = self
            .state
            .borrow()
            .templates
            .iter()
            .find(|t| t.volume_template_id == template_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Template", template_id))?;
        if !decrypt_password {
            if let Some(credentials) = template.os_template_credentials.as_mut() {
                credentials.os_template_initial_password = None;
            }
        }
        Ok(template)
    }

    fn os_template_create(&self, template: &OsTemplate) -> Result<OsTemplate> {
        self.record("os_template_create")?;
        let mut state = self.state.borrow_mut();
        let mut created = template.clone();
        created.volume_template_id = state.allocate_id();
        state.templates.push(created.clone());
        Ok(created)
    }

    fn os_template_update(&self, template_id: i64, template: &OsTemplate) -> Result<OsTemplate> {
        self.record("os_template_update")?;
        let mut state = self.state.borrow_mut();
        let existing = state
            .templates
            .iter_mut()
            .find(|t| t.volume_template_id == template_id)
            .ok_or_else(|| ApiError::not_found("Template", template_id))?;
        *existing = template.clone();
        existing.volume_template_id = template_id;
        Ok(existing.clone())
    }

    fn os_template_delete(&self, template_id: i64) -> Result<()> {
        self.record("os_template_delete")?;
        self.state
            .borrow_mut()
            .templates
            .retain(|t| t.volume_template_id != template_id);
        Ok(())
    }

    fn os_template_make_public(&self, template_id: i64) -> Result<()> {
        self.record("os_template_make_public")?;
        self.state.borrow_mut().public_templates.push(template_id);
        Ok(())
    }

    fn os_template_make_private(&self, template_id: i64, user_id: i64) -> Result<()> {
        self.record("os_template_make_private")?;
        self.state
            .borrow_mut()
            .private_owners
            .push((template_id, user_id));
        Ok(())
    }

    fn os_template_add_os_asset(
        &self,
        template_id: i64,
        asset_id: i64,
        path: &str,
        variables_json: &str,
    ) -> Result<()> {
        self.record("os_template_add_os_asset")?;
        self.state.borrow_mut().links.push(AssetLink {
            template_id,
            asset_id,
            path: path.to_string(),
            variables_json: variables_json.to_string(),
        });
        Ok(())
    }

    fn os_assets(&self) -> Result<Vec<OsAsset>> {
        self.record("os_assets")?;
        Ok(self.state.borrow().assets.clone())
    }

    fn os_asset_get(&self, asset_id: i64) -> Result<OsAsset> {
        self.record("os_asset_get")?;
        self.state
            .borrow()
            .assets
            .iter()
            .find(|a| a.os_asset_id == asset_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("OS asset", asset_id))
    }

    fn os_asset_create(&self, asset: &OsAsset) -> Result<OsAsset> {
        self.record("os_asset_create")?;
        let mut state = self.state.borrow_mut();
        let mut created = asset.clone();
        created.os_asset_id = state.allocate_id();
        state.assets.push(created.clone());
        Ok(created)
    }

    fn os_asset_update(&self, asset_id: i64, asset: &OsAsset) -> Result<OsAsset> {
        self.record("os_asset_update")?;
        let mut state = self.state.borrow_mut();
        let existing = state
            .assets
            .iter_mut()
            .find(|a| a.os_asset_id == asset_id)
            .ok_or_else(|| ApiError::not_found("OS asset", asset_id))?;
        *existing = asset.clone();
        existing.os_asset_id = asset_id;
        Ok(existing.clone())
    }

    fn os_asset_delete(&self, asset_id: i64) -> Result<()> {
        self.record("os_asset_delete")?;
        self.state
            .borrow_mut()
            .assets
            .retain(|a| a.os_asset_id != asset_id);
        Ok(())
    }

    fn os_asset_make_public(&self, asset_id: i64) -> Result<OsAsset> {
        self.record("os_asset_make_public")?;
        self.state.borrow_mut().public_assets.push(asset_id);
        self.os_asset_get(asset_id)
    }

    fn os_asset_make_private(&self, asset_id: i64, user_id: i64) -> Result<OsAsset> {
        self.record("os_asset_make_private")?;
        self.state.borrow_mut().private_owners.push((asset_id, user_id));
        self.os_asset_get(asset_id)
    }

    fn secrets(&self, usage: Option<&str>) -> Result<Vec<Secret>> {
        self.record("secrets")?;
        Ok(self
            .state
            .borrow()
            .secrets
            .iter()
            .filter(|s| usage.is_none_or(|u| u.is_empty() || s.secret_usage == u))
            .cloned()
            .collect())
    }

    fn secret_get(&self, secret_id: i64) -> Result<Secret> {
        self.record("secret_get")?;
        self.state
            .borrow()
            .secrets
            .iter()
            .find(|s| s.secret_id == secret_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Secret", secret_id))
    }

    fn secret_create(&self, secret: &Secret) -> Result<Secret> {
        self.record("secret_create")?;
        let mut state = self.state.borrow_mut();
        let mut created = secret.clone();
        created.secret_id = state.allocate_id();
        state.secrets.push(created.clone());
        Ok(created)
    }

    fn secret_delete(&self, secret_id: i64) -> Result<()> {
        self.record("secret_delete")?;
        self.state
            .borrow_mut()
            .secrets
            .retain(|s| s.secret_id != secret_id);
        Ok(())
    }

    fn user_get(&self, user_id: i64) -> Result<User> {
        self.record("user_get")?;
        self.state
            .borrow()
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("User", user_id))
    }

    fn user_get_by_email(&self, email: &str) -> Result<User> {
        self.record("user_get_by_email")?;
        self.state
            .borrow()
            .users
            .iter()
            .find(|u| u.user_email == email)
            .cloned()
            .ok_or_else(|| ApiError::not_found("User", email))
    }
}
