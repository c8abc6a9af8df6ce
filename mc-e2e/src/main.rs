#![cfg_attr(coverage, feature(coverage_attribute))]
use std::time::Duration;

use clap::Parser;
use mc_core::client::ClusterClients;
use mc_core::config::load_config;
use mc_core::logging;
use mc_core::prelude::*;
use mc_core::scenario::{
    Scenario,
    SuiteReport,
    run_suite,
    scenarios_for_sizes,
};
use mc_core::wait::PollSettings;
use tracing::*;

#[derive(Clone, Debug, Parser)]
#[command(about = "end-to-end scaling checks for the memcached operator", version)]
struct Options {
    #[arg(
        long,
        long_help = "the cluster master url (empty: use the server from ~/.kube/config)",
        default_value = ""
    )]
    master_url: String,

    #[arg(
        short,
        long,
        long_help = "namespace containing the memcached resource and its deployment",
        default_value = DEFAULT_NAMESPACE
    )]
    namespace: String,

    #[arg(
        long,
        long_help = "name shared by the memcached resource and its deployment",
        default_value = DEFAULT_MEMCACHED_NAME
    )]
    name: String,

    #[arg(
        long,
        long_help = "how often to check the deployment status",
        default_value = "10s",
        value_parser = humantime::parse_duration
    )]
    poll_interval: Duration,

    #[arg(
        long,
        long_help = "how long to wait for each scenario to converge",
        default_value = "10m",
        value_parser = humantime::parse_duration
    )]
    timeout: Duration,

    #[arg(
        long,
        long_help = "comma-separated list of sizes to request, in order",
        value_delimiter = ',',
        default_value = "2,3,2",
        value_parser = clap::value_parser!(i32).range(0..)
    )]
    sizes: Vec<i32>,

    #[arg(short, long, default_value = "info")]
    verbosity: String,
}

impl Options {
    fn poll_settings(&self) -> PollSettings {
        PollSettings::new(self.poll_interval, self.timeout)
    }

    fn scenarios(&self) -> Vec<Scenario> {
        scenarios_for_sizes(&self.sizes)
    }
}

#[instrument(skip_all)]
async fn run(opts: Options) -> anyhow::Result<SuiteReport> {
    let config = load_config(&opts.master_url).await?;
    let clients = ClusterClients::new(config, &opts.namespace)?;

    let settings = opts.poll_settings();
    info!(
        "checking memcached {}/{} (poll every {}, timeout {})",
        opts.namespace,
        opts.name,
        humantime::format_duration(settings.interval),
        humantime::format_duration(settings.timeout)
    );
    Ok(run_suite(&clients, &opts.name, &opts.scenarios(), &settings).await)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let opts = Options::parse();
    logging::setup_for_cli(&opts.verbosity);

    match run(opts).await {
        Ok(report) => {
            println!("{report}");
            if !report.passed() {
                std::process::exit(1);
            }
        },
        Err(err) => {
            error!("could not set up the memcached e2e suite: {err:?}");
            std::process::exit(1);
        },
    }
}

#[cfg(test)]
mod tests;
