/*!
 * Environment Configuration Tests
 * Serialized because they mutate the process environment
 */

use contiguous_memsim::config::{
    ConfigError, SimulatorConfig, ENV_ALGORITHM, ENV_PARTITIONS, ENV_SNAPSHOT_DIR,
    ENV_TOTAL_MEMORY, ENV_TRACE_JSON,
};
use contiguous_memsim::memory::AllocationAlgorithm;
use contiguous_memsim::simulation::Simulation;
use serial_test::serial;

fn clear_env() {
    for var in [
        ENV_TOTAL_MEMORY,
        ENV_PARTITIONS,
        ENV_ALGORITHM,
        ENV_SNAPSHOT_DIR,
        ENV_TRACE_JSON,
    ] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_env_overrides_layout_and_algorithm() {
    clear_env();
    std::env::set_var(ENV_PARTITIONS, "100,200,300");
    std::env::set_var(ENV_ALGORITHM, "best-fit");

    let config = SimulatorConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.total_memory, 600);
    assert_eq!(config.partitions, vec![100, 200, 300]);
    assert_eq!(config.algorithm, AllocationAlgorithm::BestFit);

    let sim = Simulation::from_config(&config).unwrap();
    assert_eq!(sim.blocks().len(), 3);
    assert_eq!(sim.blocks()[2].start, 300);
    assert_eq!(sim.total_memory(), 600);
}

#[test]
#[serial]
fn test_env_rejects_invalid_total() {
    clear_env();
    std::env::set_var(ENV_TOTAL_MEMORY, "-5");

    let result = SimulatorConfig::from_env();
    clear_env();

    assert_eq!(
        result,
        Err(ConfigError::InvalidSize {
            var: ENV_TOTAL_MEMORY,
            value: "-5".to_string()
        })
    );
}

#[test]
#[serial]
fn test_env_defaults() {
    clear_env();
    assert_eq!(SimulatorConfig::from_env().unwrap(), SimulatorConfig::default());
}
