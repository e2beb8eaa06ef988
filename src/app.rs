use color_eyre::Result;
use eyre::{
    bail,
    eyre,
    WrapErr,
};
use std::path::Path;
use zerto_usage_config::{
    Args,
    Command,
    Config,
    DeploymentId,
};
use zerto_usage_report::{
    connect,
    inventory_table,
    overview_table,
    throughput_table,
    vm_table,
    vpg_inventory,
    Collector,
    DeploymentCollector,
    Orchestrator,
};

pub struct App {
    args: Args,
    config: Config,
}

impl App {
    pub fn new(args: Args) -> Result<Self> {
        let config = Config::new(&args).wrap_err("Failed to load configuration")?;
        Ok(Self { args, config })
    }

    pub async fn run(self) -> Result<()> {
        match &self.args.command {
            Command::Report {
                deployments,
                output_file,
                table,
                vms,
            } => self.report(deployments, output_file.as_deref(), *table, *vms).await,
            Command::Inventory {
                deployment,
                organization,
            } => self.inventory(*deployment, organization).await,
            Command::Config => self.print_config(),
        }
    }

    /// Selected deployments, or every configured one when none were named.
    fn selected_deployments(&self, requested: &[DeploymentId]) -> Result<Vec<DeploymentId>> {
        let mut selected = if requested.is_empty() {
            self.config.deployment_ids()
        } else {
            requested.to_vec()
        };
        selected.sort();
        selected.dedup();

        if selected.is_empty() {
            bail!("No deployments configured, add them under `deployments` in the configuration file");
        }
        Ok(selected)
    }

    async fn report(
        &self,
        deployments: &[DeploymentId],
        output_file: Option<&Path>,
        table: bool,
        vms: bool,
    ) -> Result<()> {
        let collectors = self
            .selected_deployments(deployments)?
            .into_iter()
            .map(|id| -> Result<DeploymentCollector> {
                let deployment = self.config.deployment(id)?;
                Ok(DeploymentCollector::new(
                    deployment,
                    self.config.http.clone(),
                    self.config.report.title.clone(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(deployments = collectors.len(), "Starting usage collection");
        let mut orchestrator = Orchestrator::new(collectors);
        orchestrator.collect().await?;

        println!("{}", orchestrator.format());

        for report in orchestrator.reports() {
            if table {
                println!("{}", overview_table(&report.usage));
                println!("{}", throughput_table(&report.throughput_by_site));
            }
            if vms {
                println!("{}", vm_table(report.report_date, &report.vms));
            }
        }

        if let Some(output_file) = output_file {
            let json_string = serde_json::to_string_pretty(&orchestrator.summary())?;
            tokio::fs::write(output_file, json_string)
                .await
                .wrap_err_with(|| format!("Failed to write {}", output_file.display()))?;
            info!(path = %output_file.display(), "Data exported successfully");
        }

        let failures = orchestrator.failures();
        if !failures.is_empty() {
            return Err(eyre!(
                "{} of {} deployments failed",
                failures.len(),
                orchestrator.deployments()
            ));
        }

        info!("Usage collection completed successfully");
        Ok(())
    }

    async fn inventory(&self, id: DeploymentId, organization: &str) -> Result<()> {
        let deployment = self.config.deployment(id)?;
        let client = connect(&deployment, &self.config.http).await?;
        let vms = client.list_vms_for_organization(organization).await?;
        let inventory = vpg_inventory(&vms);
        info!(%organization, vpgs = inventory.len(), vms = vms.len(), "Listed protected VMs");

        if inventory.is_empty() {
            println!("Organization {organization:?} has no protected VMs on {}.", id.to_string().to_uppercase());
        } else {
            println!("{}", inventory_table(&inventory));
        }
        Ok(())
    }

    fn print_config(&self) -> Result<()> {
        print!("{}", serde_yml::to_string(&self.config)?);
        Ok(())
    }
}
