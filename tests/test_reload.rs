use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use lattice_flags::test_utils::population;
use lattice_flags::{Configuration, FeatureConfig, FeatureFlagClient, UserIdentity};

fn all_on() -> Configuration {
    Configuration::from_features([
        FeatureConfig::new("ledger", true),
        FeatureConfig::new("forecast", true),
        FeatureConfig::new("export", true),
    ])
}

fn all_off() -> Configuration {
    Configuration::from_features([
        FeatureConfig::new("ledger", false),
        FeatureConfig::new("forecast", false),
        FeatureConfig::new("export", false),
    ])
}

#[test]
fn readers_never_see_a_partial_configuration() {
    let client = Arc::new(FeatureFlagClient::new(all_on()));
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let client = client.clone();
        let done = done.clone();
        thread::spawn(move || {
            for i in 0..500 {
                let configuration = if i % 2 == 0 { all_off() } else { all_on() };
                client.reload(configuration).unwrap();
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            let done = done.clone();
            thread::spawn(move || {
                let user = UserIdentity::new("user-1");
                while !done.load(Ordering::SeqCst) {
                    let configuration = client.configuration().unwrap();
                    let answers: Vec<bool> = ["ledger", "forecast", "export"]
                        .iter()
                        .map(|feature_id| configuration.is_enabled(feature_id, &user))
                        .collect();
                    assert!(
                        answers.iter().all(|a| *a) || answers.iter().all(|a| !*a),
                        "mixed answers {answers:?}"
                    );
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    // The last reload published all_on
    assert!(client.is_enabled("ledger", &UserIdentity::new("user-1")));
}

#[test]
fn evaluation_is_deterministic_across_threads() {
    let client = Arc::new(FeatureFlagClient::new(Configuration::from_features([
        FeatureConfig::new("forecast", true)
            .with_rollout_percentage(37)
            .unwrap(),
    ])));
    let users = Arc::new(population(1_000));

    let expected: Vec<bool> = users
        .iter()
        .map(|user| client.is_enabled("forecast", user))
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            let users = users.clone();
            thread::spawn(move || {
                users
                    .iter()
                    .map(|user| client.is_enabled("forecast", user))
                    .collect::<Vec<bool>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
