use std::sync::Arc;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::time::Duration;

use assertables::*;
use httpmock::Method::*;
use mc_testutils::*;
use serde_json::json;

use super::*;
use crate::client::ClusterClients;
use crate::scenario::*;
use crate::wait::*;

#[fixture]
fn fast_settings() -> PollSettings {
    PollSettings::new(Duration::from_millis(10), Duration::from_millis(50))
}

fn handle_memcached_get(fake_apiserver: &mut MockServerBuilder, hits: usize, obj: DynamicObject) {
    fake_apiserver.handle_multiple(hits, move |when, then| {
        when.method(GET).path(memcached_path(TEST_NAMESPACE, TEST_MEMCACHED_NAME));
        then.json_body_obj(&obj);
    });
}

// The update has to carry the requested size and the resourceVersion we fetched
fn handle_memcached_put(fake_apiserver: &mut MockServerBuilder, hits: usize, size: i32, obj: DynamicObject) {
    let expected = json!({"spec": {"size": size}, "metadata": {"resourceVersion": TEST_RESOURCE_VERSION}});
    fake_apiserver.handle_multiple(hits, move |when, then| {
        when.method(PUT)
            .path(memcached_path(TEST_NAMESPACE, TEST_MEMCACHED_NAME))
            .json_body_includes(expected.to_string());
        then.json_body_obj(&obj);
    });
}

fn handle_memcached(fake_apiserver: &mut MockServerBuilder, size: i32, obj: DynamicObject) {
    handle_memcached_get(fake_apiserver, 2, obj.clone());
    handle_memcached_put(fake_apiserver, 1, size, obj);
}

fn handle_deployment(fake_apiserver: &mut MockServerBuilder, available: i32) {
    let depl = build_deployment(TEST_MEMCACHED_NAME, Some(available));
    fake_apiserver.handle_repeated(move |when, then| {
        when.method(GET).path(deployment_path(TEST_NAMESPACE, TEST_MEMCACHED_NAME));
        then.json_body_obj(&depl);
    });
}

#[rstest]
fn test_default_scenarios() {
    let scenarios = default_scenarios();
    assert_eq!(scenarios.iter().map(|s| s.target_size).collect::<Vec<_>>(), vec![2, 3, 2]);
    assert_eq!(scenarios[0].description, "Request 2 replicas");
    assert_eq!(scenarios[1].description, "Request 3 replicas");
}

#[rstest]
#[tokio::test]
async fn test_run_scenario(test_memcached: DynamicObject, fast_settings: PollSettings) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    handle_memcached(&mut fake_apiserver, 2, test_memcached);
    handle_deployment(&mut fake_apiserver, 2);
    fake_apiserver.build();

    let clients = ClusterClients::from_client(client, TEST_NAMESPACE);
    run_scenario(&clients, TEST_MEMCACHED_NAME, &Scenario::request_replicas(2), &fast_settings)
        .await
        .unwrap();
    fake_apiserver.assert();
}

#[rstest]
#[tokio::test]
async fn test_run_scenario_already_at_size(#[with(2)] test_memcached: DynamicObject, fast_settings: PollSettings) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    handle_memcached(&mut fake_apiserver, 2, test_memcached);
    handle_deployment(&mut fake_apiserver, 2);
    fake_apiserver.build();

    let clients = ClusterClients::from_client(client, TEST_NAMESPACE);
    run_scenario(&clients, TEST_MEMCACHED_NAME, &Scenario::request_replicas(2), &fast_settings)
        .await
        .unwrap();
    fake_apiserver.assert();
}

#[rstest]
#[tokio::test]
async fn test_run_scenario_no_spec(test_memcached_no_spec: DynamicObject, fast_settings: PollSettings) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    handle_memcached_get(&mut fake_apiserver, 2, test_memcached_no_spec.clone());
    fake_apiserver.handle(move |when, then| {
        when.method(PUT)
            .path(memcached_path(TEST_NAMESPACE, TEST_MEMCACHED_NAME))
            .json_body_obj(&test_memcached_no_spec);
        then.json_body_obj(&test_memcached_no_spec);
    });
    handle_deployment(&mut fake_apiserver, 3);
    fake_apiserver.build();

    let clients = ClusterClients::from_client(client, TEST_NAMESPACE);
    run_scenario(&clients, TEST_MEMCACHED_NAME, &Scenario::request_replicas(3), &fast_settings)
        .await
        .unwrap();
    fake_apiserver.assert();
}

#[rstest]
#[tokio::test]
async fn test_run_scenario_fetch_failed(fast_settings: PollSettings) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    fake_apiserver
        .handle_not_found(memcached_path(TEST_NAMESPACE, TEST_MEMCACHED_NAME))
        .build();

    let clients = ClusterClients::from_client(client, TEST_NAMESPACE);
    let err = run_scenario(&clients, TEST_MEMCACHED_NAME, &Scenario::request_replicas(2), &fast_settings)
        .await
        .unwrap_err();
    assert!(matches!(err, ScenarioError::FetchFailed(..)));
    assert_contains!(err.to_string(), &format!("{TEST_NAMESPACE}/{TEST_MEMCACHED_NAME}"));
    fake_apiserver.assert();
}

#[rstest]
#[tokio::test]
async fn test_run_scenario_malformed_spec(fast_settings: PollSettings) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let obj = build_memcached(serde_json::json!({"spec": "size=2"}));
    fake_apiserver
        .handle(move |when, then| {
            when.method(GET).path(memcached_path(TEST_NAMESPACE, TEST_MEMCACHED_NAME));
            then.json_body_obj(&obj);
        })
        .build();

    let clients = ClusterClients::from_client(client, TEST_NAMESPACE);
    let err = run_scenario(&clients, TEST_MEMCACHED_NAME, &Scenario::request_replicas(2), &fast_settings)
        .await
        .unwrap_err();
    assert!(matches!(err, ScenarioError::MalformedSpec(..)));
    fake_apiserver.assert();
}

#[rstest]
#[tokio::test]
async fn test_run_scenario_update_conflict(test_memcached: DynamicObject, fast_settings: PollSettings) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    fake_apiserver
        .handle(move |when, then| {
            when.method(GET).path(memcached_path(TEST_NAMESPACE, TEST_MEMCACHED_NAME));
            then.json_body_obj(&test_memcached);
        })
        .handle(move |when, then| {
            when.method(PUT).path(memcached_path(TEST_NAMESPACE, TEST_MEMCACHED_NAME));
            then.status(409).json_body(status_conflict());
        })
        .build();

    let clients = ClusterClients::from_client(client, TEST_NAMESPACE);
    let err = run_scenario(&clients, TEST_MEMCACHED_NAME, &Scenario::request_replicas(2), &fast_settings)
        .await
        .unwrap_err();
    assert!(matches!(err, ScenarioError::UpdateFailed(..)));
    fake_apiserver.assert();
}

#[rstest]
#[tokio::test]
async fn test_run_scenario_refetch_failed(test_memcached: DynamicObject, fast_settings: PollSettings) {
    let (mut fake_apiserver, client) = make_fake_apiserver();

    // The object disappears once the update has gone through
    let updated = Arc::new(AtomicBool::new(false));
    let (put_flag, get_flag, gone_flag) = (updated.clone(), updated.clone(), updated);
    let obj = test_memcached.clone();
    fake_apiserver
        .handle(move |when, then| {
            let put_flag = put_flag.clone();
            when.method(PUT)
                .path(memcached_path(TEST_NAMESPACE, TEST_MEMCACHED_NAME))
                .json_body_includes(json!({"spec": {"size": 2}}).to_string())
                .matches(move |req| {
                    if req.method_str() == "PUT" {
                        put_flag.store(true, Ordering::SeqCst);
                    }
                    true
                });
            then.json_body_obj(&obj);
        })
        .handle(move |when, then| {
            let get_flag = get_flag.clone();
            when.method(GET)
                .path(memcached_path(TEST_NAMESPACE, TEST_MEMCACHED_NAME))
                .matches(move |_| !get_flag.load(Ordering::SeqCst));
            then.json_body_obj(&test_memcached);
        })
        .handle(move |when, then| {
            let gone_flag = gone_flag.clone();
            when.method(GET)
                .path(memcached_path(TEST_NAMESPACE, TEST_MEMCACHED_NAME))
                .matches(move |_| gone_flag.load(Ordering::SeqCst));
            then.status(404).json_body(status_not_found());
        })
        .build();

    let clients = ClusterClients::from_client(client, TEST_NAMESPACE);
    let err = run_scenario(&clients, TEST_MEMCACHED_NAME, &Scenario::request_replicas(2), &fast_settings)
        .await
        .unwrap_err();
    assert!(matches!(err, ScenarioError::RefetchFailed(..)));
    assert_contains!(err.to_string(), "could not re-fetch memcached");
    fake_apiserver.assert();
}

#[rstest]
#[tokio::test]
async fn test_run_scenario_not_converged(test_memcached: DynamicObject, fast_settings: PollSettings) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    handle_memcached(&mut fake_apiserver, 2, test_memcached);
    handle_deployment(&mut fake_apiserver, 1);
    fake_apiserver.build();

    let clients = ClusterClients::from_client(client, TEST_NAMESPACE);
    let err = run_scenario(&clients, TEST_MEMCACHED_NAME, &Scenario::request_replicas(2), &fast_settings)
        .await
        .unwrap_err();
    match err {
        ScenarioError::NotConverged(_, target, WaitError::Timeout { last, .. }) => {
            assert_eq!(target, 2);
            assert_eq!(last, "not yet 2 replicas available (currently 1)");
        },
        _ => panic!("unexpected error: {err}"),
    }
    fake_apiserver.assert();
}

#[rstest]
#[tokio::test]
async fn test_run_suite_continues_after_failure(test_memcached: DynamicObject, fast_settings: PollSettings) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    handle_memcached_get(&mut fake_apiserver, 6, test_memcached.clone());
    handle_memcached_put(&mut fake_apiserver, 2, 2, test_memcached.clone());
    handle_memcached_put(&mut fake_apiserver, 1, 3, test_memcached);
    handle_deployment(&mut fake_apiserver, 2);
    fake_apiserver.build();

    let clients = ClusterClients::from_client(client, TEST_NAMESPACE);
    let report = run_suite(&clients, TEST_MEMCACHED_NAME, &default_scenarios(), &fast_settings).await;

    assert!(!report.passed());
    assert_eq!(report.num_passed(), 2);
    assert_eq!(report.num_failed(), 1);
    assert!(report.reports[0].result.is_ok());
    assert!(report.reports[1].result.is_err());
    assert!(report.reports[2].result.is_ok());

    let summary = report.to_string();
    assert_contains!(summary, "[PASS] Request 2 replicas");
    assert_contains!(summary, "[FAIL] Request 3 replicas");
    assert_contains!(summary, "FAIL! Ran 3 scenarios: 2 passed, 1 failed");
    fake_apiserver.assert();
}

#[rstest]
fn test_empty_suite_report_passes() {
    let report = SuiteReport::default();
    assert!(report.passed());
    assert_eq!(report.to_string(), "SUCCESS! Ran 0 scenarios: 0 passed, 0 failed");
}
