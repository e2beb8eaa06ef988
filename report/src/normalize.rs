//! Flattens resource report records into per-VM usage records.

use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeMap;
use zerto_usage_api::models::{
    ResourceRecord,
    VmSummary,
};

/// Usage of one protected VM on the reporting day. Every field is populated; values the platform did not report
/// are zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VmRecord {
    pub organization: String,
    pub vpg_name: String,
    pub vm_name: String,
    pub vcpus: u32,
    pub cpu_used_mhz: f64,
    pub active_memory_mb: f64,
    pub consumed_memory_mb: f64,
    pub provisioned_memory_mb: f64,
    pub provisioned_storage_gb: f64,
    pub used_storage_gb: f64,
}

impl VmRecord {
    /// Fills a record from one raw resource entry, defaulting whatever is missing.
    pub fn from_resource(organization: &str, record: &ResourceRecord) -> Self {
        let site = record.protected_site.as_ref();
        let vm_info = site.and_then(|site| site.vm_info.as_ref());
        let cpu = vm_info.and_then(|vm| vm.cpu.as_ref());
        let memory = vm_info.and_then(|vm| vm.memory.as_ref());
        let storage = site.and_then(|site| site.storage.as_ref());

        Self {
            organization: organization.to_string(),
            vpg_name: record
                .vpg
                .as_ref()
                .and_then(|vpg| vpg.vpg_name.clone())
                .unwrap_or_default(),
            vm_name: vm_info.and_then(|vm| vm.vm_name.clone()).unwrap_or_default(),
            vcpus: cpu.and_then(|cpu| cpu.number_of_vcpus).unwrap_or_default(),
            cpu_used_mhz: cpu.and_then(|cpu| cpu.cpu_used_in_mhz).unwrap_or_default(),
            active_memory_mb: memory
                .and_then(|memory| memory.active_guest_memory_in_mb)
                .unwrap_or_default(),
            consumed_memory_mb: memory
                .and_then(|memory| memory.consumed_host_memory_in_mb)
                .unwrap_or_default(),
            provisioned_memory_mb: memory.and_then(|memory| memory.memory_in_mb).unwrap_or_default(),
            provisioned_storage_gb: storage
                .and_then(|storage| storage.volumes_provisioned_storage_in_gb)
                .unwrap_or_default(),
            used_storage_gb: storage
                .and_then(|storage| storage.volumes_used_storage_in_gb)
                .unwrap_or_default(),
        }
    }
}

/// One VM record per raw record, in report order.
pub fn normalize(organization: &str, records: &[ResourceRecord]) -> Vec<VmRecord> {
    records
        .iter()
        .map(|record| VmRecord::from_resource(organization, record))
        .collect()
}

/// The VMs of one VPG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpgUsage {
    pub organization: String,
    pub vpg_name: String,
    pub vms: Vec<VmRecord>,
}

/// Re-keys VM records by organization and VPG name. Groups are sorted by organization then VPG; VMs keep their
/// input order.
pub fn group_by_vpg(records: &[VmRecord]) -> Vec<VpgUsage> {
    let mut groups: BTreeMap<(&str, &str), Vec<VmRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.organization.as_str(), record.vpg_name.as_str()))
            .or_default()
            .push(record.clone());
    }
    groups
        .into_iter()
        .map(|((organization, vpg_name), vms)| VpgUsage {
            organization: organization.to_string(),
            vpg_name: vpg_name.to_string(),
            vms,
        })
        .collect()
}

/// VPG name and the names of its member VMs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpgInventory {
    pub vpg_name: String,
    pub vm_names: Vec<String>,
}

/// Lists each VPG of an organization with its VMs, in order of first appearance. VMs without a VPG are listed
/// under an empty name.
pub fn vpg_inventory(vms: &[VmSummary]) -> Vec<VpgInventory> {
    let mut inventory: Vec<VpgInventory> = Vec::new();
    for vm in vms {
        let vpg_name = vm.vpg_name.clone().unwrap_or_default();
        match inventory.iter_mut().find(|entry| entry.vpg_name == vpg_name) {
            Some(entry) => entry.vm_names.push(vm.vm_name.clone()),
            None => inventory.push(VpgInventory {
                vpg_name,
                vm_names: vec![vm.vm_name.clone()],
            }),
        }
    }
    inventory
}
