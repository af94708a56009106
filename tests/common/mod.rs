use lattice_flags::test_utils::data_path;
use lattice_flags::FeatureFlagClient;

pub fn client_for_environment(environment_id: Option<&str>) -> FeatureFlagClient {
    FeatureFlagClient::from_file(&data_path("lattice-features.yaml"), environment_id).unwrap()
}

pub fn json_client_for_environment(environment_id: Option<&str>) -> FeatureFlagClient {
    FeatureFlagClient::from_file(&data_path("lattice-features.json"), environment_id).unwrap()
}
