use std::cmp::min;
use std::future::Future;
use std::time::Duration;

use tokio::time::{
    Instant,
    sleep,
};
use tracing::*;

use crate::errors::*;
use crate::prelude::*;

// Stand-in deadline for timeouts too large to add to the current instant
const UNBOUNDED_TIMEOUT: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollSettings {
    pub fn new(interval: Duration, timeout: Duration) -> PollSettings {
        PollSettings { interval, timeout }
    }
}

impl Default for PollSettings {
    fn default() -> PollSettings {
        PollSettings::new(
            Duration::from_secs(DEFAULT_POLL_INTERVAL_SECONDS),
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        )
    }
}

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("timed out after {timeout:?} ({attempts} attempts), last error: {last}")]
    Timeout {
        timeout: Duration,
        attempts: u32,
        last: String,
    },
}

// Call `check` right away and then every `interval` until it returns Ok or `timeout` has
// elapsed.  An Err from `check` just means "not yet"; API errors and unmet conditions are treated
// the same way, and whichever one came last is what gets reported on timeout.
pub async fn poll_until<T, F, Fut>(settings: &PollSettings, mut check: F) -> Result<T, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let start = Instant::now();
    let deadline = start.checked_add(settings.timeout).unwrap_or_else(|| start + UNBOUNDED_TIMEOUT);
    let mut attempts = 0;
    loop {
        attempts += 1;
        let last = match check().await {
            Ok(res) => return Ok(res),
            Err(err) => format!("{err:#}"),
        };
        debug!("attempt {attempts} failed: {last}");

        let now = Instant::now();
        if now >= deadline {
            return Err(WaitError::Timeout { timeout: settings.timeout, attempts, last });
        }
        sleep(min(settings.interval, deadline - now)).await;
    }
}

pub async fn wait_for_available_replicas(
    api: &kube::Api<appsv1::Deployment>,
    name: &str,
    target: i32,
    settings: &PollSettings,
) -> Result<appsv1::Deployment, WaitError> {
    poll_until(settings, || check_available_replicas(api, name, target)).await
}

async fn check_available_replicas(
    api: &kube::Api<appsv1::Deployment>,
    name: &str,
    target: i32,
) -> anyhow::Result<appsv1::Deployment> {
    let depl = api.get(name).await?;
    let available = depl.available_replicas();
    ensure!(available == target, "not yet {target} replicas available (currently {available})");
    Ok(depl)
}
