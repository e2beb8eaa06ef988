//! Rolls VM records up into per-organization totals.

use crate::VmRecord;
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeMap;
use zerto_usage_api::models::VpgSummary;

const MB_PER_GB: f64 = 1024.0;

/// Summed usage of one organization. Memory is kept in GB, storage in GB as reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationTotals {
    pub vms: u64,
    pub vcpus: u64,
    pub cpu_used_mhz: f64,
    pub active_memory_gb: f64,
    pub consumed_memory_gb: f64,
    pub provisioned_memory_gb: f64,
    pub provisioned_storage_gb: f64,
    pub used_storage_gb: f64,
}

impl OrganizationTotals {
    pub fn add_vm(&mut self, vm: &VmRecord) {
        self.vms += 1;
        self.vcpus += u64::from(vm.vcpus);
        self.cpu_used_mhz += vm.cpu_used_mhz;
        self.active_memory_gb += vm.active_memory_mb / MB_PER_GB;
        self.consumed_memory_gb += vm.consumed_memory_mb / MB_PER_GB;
        self.provisioned_memory_gb += vm.provisioned_memory_mb / MB_PER_GB;
        self.provisioned_storage_gb += vm.provisioned_storage_gb;
        self.used_storage_gb += vm.used_storage_gb;
    }

    pub fn merge(&mut self, other: &OrganizationTotals) {
        self.vms += other.vms;
        self.vcpus += other.vcpus;
        self.cpu_used_mhz += other.cpu_used_mhz;
        self.active_memory_gb += other.active_memory_gb;
        self.consumed_memory_gb += other.consumed_memory_gb;
        self.provisioned_memory_gb += other.provisioned_memory_gb;
        self.provisioned_storage_gb += other.provisioned_storage_gb;
        self.used_storage_gb += other.used_storage_gb;
    }

    /// True when every total is zero.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Totals keyed by organization name, iterated in name order.
pub type UsageByOrganization = BTreeMap<String, OrganizationTotals>;

/// Sums VM records per organization. Organizations without usage are left out.
pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a VmRecord>) -> UsageByOrganization {
    let mut usage = UsageByOrganization::new();
    for record in records {
        usage.entry(record.organization.clone()).or_default().add_vm(record);
    }
    usage.retain(|organization, totals| {
        let keep = !totals.is_empty();
        if !keep {
            debug!(%organization, "Dropping organization without usage");
        }
        keep
    });
    usage
}

/// Sum over all organizations.
pub fn grand_total(usage: &UsageByOrganization) -> OrganizationTotals {
    usage.values().fold(OrganizationTotals::default(), |mut total, totals| {
        total.merge(totals);
        total
    })
}

/// Distinct organization names of the given VPGs in order of first appearance. VPGs outside any organization are
/// skipped.
pub fn organizations_from_vpgs(vpgs: &[VpgSummary]) -> Vec<String> {
    let mut organizations: Vec<String> = Vec::new();
    for vpg in vpgs {
        match vpg.organization_name.as_deref() {
            Some(name) if !name.is_empty() => {
                if !organizations.iter().any(|known| known == name) {
                    organizations.push(name.to_string());
                }
            }
            _ => trace!(vpg = %vpg.vpg_name, "VPG belongs to no organization"),
        }
    }
    organizations
}

/// Summed VPG throughput (MB) per protected site.
pub fn throughput_by_site(vpgs: &[VpgSummary]) -> BTreeMap<String, f64> {
    let mut throughput = BTreeMap::new();
    for vpg in vpgs {
        let site = vpg.protected_site_name.clone().unwrap_or_default();
        *throughput.entry(site).or_insert(0.0) += vpg.throughput_in_mb.unwrap_or_default();
    }
    throughput
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vm(organization: &str, vcpus: u32, provisioned_storage_gb: f64) -> VmRecord {
        VmRecord {
            organization: organization.to_string(),
            vpg_name: "vpg".to_string(),
            vm_name: format!("{organization}-{vcpus}"),
            vcpus,
            cpu_used_mhz: 100.0,
            active_memory_mb: 512.0,
            consumed_memory_mb: 1024.0,
            provisioned_memory_mb: 2048.0,
            provisioned_storage_gb,
            used_storage_gb: provisioned_storage_gb / 2.0,
        }
    }

    #[test]
    fn sums_each_metric_per_organization() {
        let records = vec![vm("Acme", 2, 100.0), vm("Acme", 4, 50.0), vm("Acme", 8, 10.0)];
        let usage = aggregate(&records);

        assert_eq!(
            usage.get("Acme"),
            Some(&OrganizationTotals {
                vms: 3,
                vcpus: 14,
                cpu_used_mhz: 300.0,
                active_memory_gb: 1.5,
                consumed_memory_gb: 3.0,
                provisioned_memory_gb: 6.0,
                provisioned_storage_gb: 160.0,
                used_storage_gb: 80.0,
            })
        );
    }

    #[test]
    fn organizations_without_vms_are_absent() {
        let usage = aggregate(&[vm("Acme", 2, 10.0)]);
        assert_eq!(usage.keys().collect::<Vec<_>>(), vec!["Acme"]);
        assert!(aggregate(std::iter::empty::<&VmRecord>()).is_empty());
    }

    #[test]
    fn aggregation_is_deterministic_and_order_independent() {
        let records = vec![
            vm("Globex", 1, 0.5),
            vm("Acme", 2, 100.0),
            vm("Globex", 3, 1.25),
            vm("Acme", 4, 50.0),
        ];
        let first = aggregate(&records);
        let second = aggregate(&records);
        let reversed = aggregate(records.iter().rev());

        assert_eq!(first, second);
        assert_eq!(first, reversed);
        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["Acme", "Globex"]);
    }

    #[test]
    fn grand_total_sums_all_organizations() {
        let usage = aggregate(&[vm("Acme", 2, 100.0), vm("Globex", 6, 20.0)]);
        let total = grand_total(&usage);
        assert_eq!(total.vms, 2);
        assert_eq!(total.vcpus, 8);
        assert_eq!(total.provisioned_storage_gb, 120.0);
        assert!(OrganizationTotals::default().is_empty());
        assert!(!total.is_empty());
    }

    #[test]
    fn discovers_organizations_and_site_throughput() {
        let vpg = |name: &str, organization: Option<&str>, site: &str, throughput: f64| VpgSummary {
            vpg_name: name.to_string(),
            organization_name: organization.map(str::to_string),
            protected_site_name: Some(site.to_string()),
            throughput_in_mb: Some(throughput),
            ..Default::default()
        };
        let vpgs = vec![
            vpg("web", Some("Globex"), "SGU", 1.5),
            vpg("db", Some("Acme"), "SGU", 2.0),
            vpg("mail", Some("Globex"), "BOI", 0.25),
            vpg("lab", None, "BOI", 1.0),
            vpg("legacy", Some(""), "BOI", 0.0),
        ];

        assert_eq!(organizations_from_vpgs(&vpgs), vec!["Globex", "Acme"]);
        assert_eq!(
            throughput_by_site(&vpgs),
            BTreeMap::from([("BOI".to_string(), 1.25), ("SGU".to_string(), 3.5)])
        );
    }
}
