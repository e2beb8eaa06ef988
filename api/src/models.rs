//! Response bodies of the management API.
//!
//! The platform omits or nulls fields freely, so most fields are optional. Unknown fields are ignored.

use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};

/// An entry of `GET /v1/vpgs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VpgSummary {
    pub vpg_name: String,
    pub vpg_identifier: Option<String>,
    pub organization_name: Option<String>,
    pub protected_site_name: Option<String>,
    pub recovery_site_name: Option<String>,
    /// Index into `GET /v1/vpgs/statuses`.
    pub status: Option<u32>,
    /// Index into `GET /v1/vpgs/substatuses`.
    pub sub_status: Option<u32>,
    #[serde(rename = "ThroughputInMB")]
    pub throughput_in_mb: Option<f64>,
    pub vms_count: Option<u32>,
}

/// An entry of `GET /v1/peersites`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Site {
    pub peer_site_name: String,
    pub site_identifier: Option<String>,
    pub location: Option<String>,
    pub host_name: Option<String>,
    pub port: Option<u16>,
}

/// A virtual replication appliance from `GET /v1/vras`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Agent {
    pub vra_name: String,
    pub vra_identifier: Option<String>,
    pub host_display_name: Option<String>,
    pub vra_version: Option<String>,
    pub status: Option<u32>,
}

/// An entry of `GET /v1/vms`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VmSummary {
    pub vm_name: String,
    pub vm_identifier: Option<String>,
    pub vpg_name: Option<String>,
    pub organization_name: Option<String>,
    #[serde(rename = "ProvisionedStorageInMB")]
    pub provisioned_storage_in_mb: Option<f64>,
    #[serde(rename = "UsedStorageInMB")]
    pub used_storage_in_mb: Option<f64>,
}

/// One VM's daily utilization snapshot from `GET /v1/reports/resources`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResourceRecord {
    pub vpg: Option<ResourceVpg>,
    pub protected_site: Option<ResourceSite>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResourceVpg {
    pub vpg_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResourceSite {
    pub vm_info: Option<ResourceVmInfo>,
    pub storage: Option<ResourceStorage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResourceVmInfo {
    pub vm_name: Option<String>,
    pub cpu: Option<ResourceCpu>,
    pub memory: Option<ResourceMemory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceCpu {
    /// Sometimes sent as a float; rounded to the nearest count.
    #[serde(rename = "NumberOfvCpus", deserialize_with = "lenient_count")]
    pub number_of_vcpus: Option<u32>,
    #[serde(rename = "CpuUsedInMhz")]
    pub cpu_used_in_mhz: Option<f64>,
}

/// Accepts any JSON number. Negative and non-finite values count as zero.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|count| {
        if count.is_finite() && count > 0.0 {
            count.round().min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceMemory {
    #[serde(rename = "ActiveGuestMemoryInMB")]
    pub active_guest_memory_in_mb: Option<f64>,
    #[serde(rename = "ConsumedHostMemoryInMB")]
    pub consumed_host_memory_in_mb: Option<f64>,
    #[serde(rename = "MemoryInMB")]
    pub memory_in_mb: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceStorage {
    #[serde(rename = "VolumesProvisionedStorageInGB")]
    pub volumes_provisioned_storage_in_gb: Option<f64>,
    #[serde(rename = "VolumesUsedStorageInGB")]
    pub volumes_used_storage_in_gb: Option<f64>,
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_resource_record() {
        let record: ResourceRecord = serde_json::from_value(serde_json::json!({
            "Vpg": { "VpgName": "riverside-test", "VpgIdentifier": "b7c1" },
            "ProtectedSite": {
                "SiteName": "SGU",
                "VmInfo": {
                    "VmName": "api-test01",
                    "Cpu": { "NumberOfvCpus": 4, "CpuUsedInMhz": 269 },
                    "Memory": {
                        "ActiveGuestMemoryInMB": 737,
                        "ConsumedHostMemoryInMB": 8297,
                        "MemoryInMB": 8192
                    }
                },
                "Storage": {
                    "NumberOfVolumes": 1,
                    "VolumesProvisionedStorageInGB": 88.15,
                    "VolumesUsedStorageInGB": 71.499
                }
            }
        }))
        .unwrap();

        let site = record.protected_site.unwrap();
        let vm = site.vm_info.unwrap();
        assert_eq!(vm.vm_name.as_deref(), Some("api-test01"));
        assert_eq!(vm.cpu.unwrap().number_of_vcpus, Some(4));
        assert_eq!(vm.memory.unwrap().memory_in_mb, Some(8192.0));
        assert_eq!(site.storage.unwrap().volumes_used_storage_in_gb, Some(71.499));
        assert_eq!(record.vpg.unwrap().vpg_name.as_deref(), Some("riverside-test"));
    }

    #[test]
    fn tolerates_nulls_and_missing_sections() {
        let record: ResourceRecord = serde_json::from_value(serde_json::json!({
            "Vpg": null,
            "ProtectedSite": { "VmInfo": { "VmName": "db01", "Cpu": { "NumberOfvCpus": null } } }
        }))
        .unwrap();
        let vm = record.protected_site.unwrap().vm_info.unwrap();
        assert_eq!(vm.cpu.unwrap().number_of_vcpus, None);
        assert_eq!(vm.memory, None);
    }

    #[test]
    fn vcpu_count_sent_as_float_is_rounded() {
        let cpu = |value: serde_json::Value| -> ResourceCpu {
            serde_json::from_value(serde_json::json!({ "NumberOfvCpus": value })).unwrap()
        };
        assert_eq!(cpu(serde_json::json!(4.0)).number_of_vcpus, Some(4));
        assert_eq!(cpu(serde_json::json!(2.6)).number_of_vcpus, Some(3));
        assert_eq!(cpu(serde_json::json!(8)).number_of_vcpus, Some(8));
        assert_eq!(cpu(serde_json::json!(-1)).number_of_vcpus, Some(0));
        assert_eq!(cpu(serde_json::json!(null)).number_of_vcpus, None);

        let missing: ResourceCpu = serde_json::from_value(serde_json::json!({ "CpuUsedInMhz": 12 })).unwrap();
        assert_eq!(missing.number_of_vcpus, None);
    }

    #[test]
    fn parses_a_vpg_summary() {
        let vpg: VpgSummary = serde_json::from_value(serde_json::json!({
            "VpgName": "3FORM-web",
            "OrganizationName": "3FORM",
            "ProtectedSiteName": "SGU",
            "Status": 1,
            "SubStatus": 0,
            "ThroughputInMB": 1.5,
            "VmsCount": 3,
            "ActualRPO": 7
        }))
        .unwrap();
        assert_eq!(vpg.organization_name.as_deref(), Some("3FORM"));
        assert_eq!(vpg.throughput_in_mb, Some(1.5));
        assert_eq!(vpg.vms_count, Some(3));
    }
}
