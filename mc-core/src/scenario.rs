use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tracing::*;

use crate::client::ClusterClients;
use crate::errors::*;
use crate::prelude::*;
use crate::wait::{
    PollSettings,
    WaitError,
    wait_for_available_replicas,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scenario {
    pub description: String,
    pub target_size: i32,
}

impl Scenario {
    pub fn request_replicas(target_size: i32) -> Scenario {
        Scenario {
            description: format!("Request {target_size} replicas"),
            target_size,
        }
    }
}

pub fn default_scenarios() -> Vec<Scenario> {
    scenarios_for_sizes(&DEFAULT_SCENARIO_SIZES)
}

pub fn scenarios_for_sizes(sizes: &[i32]) -> Vec<Scenario> {
    sizes.iter().map(|size| Scenario::request_replicas(*size)).collect()
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("could not fetch memcached {0}: {1}")]
    FetchFailed(String, kube::Error),

    #[error("could not set size on memcached {0}: {1}")]
    MalformedSpec(String, String),

    #[error("memcached {0} update was rejected: {1}")]
    UpdateFailed(String, kube::Error),

    #[error("could not re-fetch memcached {0} after update: {1}")]
    RefetchFailed(String, kube::Error),

    #[error("deployment {0} never reached {1} available replicas: {2}")]
    NotConverged(String, i32, WaitError),
}

#[instrument(skip_all, fields(scenario = %scenario.description))]
pub async fn run_scenario(
    clients: &ClusterClients,
    name: &str,
    scenario: &Scenario,
    settings: &PollSettings,
) -> Result<(), ScenarioError> {
    let target = scenario.target_size;
    let ns_name = format!("{}/{name}", clients.namespace);
    info!("Request {target} replicas");

    let mut memcached = clients
        .memcacheds
        .get(name)
        .await
        .map_err(|err| ScenarioError::FetchFailed(ns_name.clone(), err))?;

    match memcached.set_memcached_size(target) {
        Ok(true) => debug!("setting spec.size = {target} on {ns_name}"),
        Ok(false) => debug!("{ns_name} has no spec, submitting it unchanged"),
        Err(err) => return Err(ScenarioError::MalformedSpec(ns_name, format!("{err:#}"))),
    }

    clients
        .memcacheds
        .replace(name, &Default::default(), &memcached)
        .await
        .map_err(|err| ScenarioError::UpdateFailed(ns_name.clone(), err))?;

    let updated = clients
        .memcacheds
        .get(name)
        .await
        .map_err(|err| ScenarioError::RefetchFailed(ns_name.clone(), err))?;
    log_observed_state(&updated);

    wait_for_available_replicas(&clients.deployments, name, target, settings)
        .await
        .map_err(|err| ScenarioError::NotConverged(ns_name, target, err))?;

    info!("Got {target} replicas");
    Ok(())
}

fn log_observed_state(memcached: &DynamicObject) {
    match memcached.memcached_fields() {
        Ok(fields) => debug!(
            "{} now has spec.size = {:?}, status.nodes = {:?}",
            memcached.namespaced_name(),
            fields.spec.and_then(|s| s.size),
            fields.status.map(|s| s.nodes).unwrap_or_default()
        ),
        Err(err) => debug!("could not read fields of {}: {err}", memcached.namespaced_name()),
    }
}

#[derive(Debug)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub elapsed: Duration,
    pub result: Result<(), ScenarioError>,
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub reports: Vec<ScenarioReport>,
}

impl SuiteReport {
    pub fn num_passed(&self) -> usize {
        self.reports.iter().filter(|r| r.result.is_ok()).count()
    }

    pub fn num_failed(&self) -> usize {
        self.reports.len() - self.num_passed()
    }

    pub fn passed(&self) -> bool {
        self.num_failed() == 0
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // sub-second precision is just noise in the summary
        let elapsed = humantime::format_duration(Duration::from_secs(self.elapsed.as_secs()));
        match &self.result {
            Ok(()) => write!(f, "[PASS] {} ({elapsed})", self.scenario.description),
            Err(err) => write!(f, "[FAIL] {} ({elapsed}): {err}", self.scenario.description),
        }
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for report in &self.reports {
            writeln!(f, "{report}")?;
        }

        let outcome = if self.passed() { "SUCCESS" } else { "FAIL" };
        write!(
            f,
            "{outcome}! Ran {} scenarios: {} passed, {} failed",
            self.reports.len(),
            self.num_passed(),
            self.num_failed()
        )
    }
}

// Scenarios share the same Memcached and Deployment and are order-dependent, so they run one
// after another; a failure is recorded and the remaining scenarios still run.
pub async fn run_suite(
    clients: &ClusterClients,
    name: &str,
    scenarios: &[Scenario],
    settings: &PollSettings,
) -> SuiteReport {
    let mut suite = SuiteReport::default();
    for scenario in scenarios {
        let start = Instant::now();
        let result = run_scenario(clients, name, scenario, settings).await;
        if let Err(err) = &result {
            error!("{} failed: {err}", scenario.description);
        }

        suite.reports.push(ScenarioReport {
            scenario: scenario.clone(),
            elapsed: start.elapsed(),
            result,
        });
    }
    suite
}
