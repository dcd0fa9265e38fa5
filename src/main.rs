/*!
 * Memory Simulator - Main Entry Point
 *
 * Replays allocation commands from a script file (first argument) or stdin
 * against a fresh simulation and prints each command's result.
 */

use anyhow::Context;
use std::io::{self, BufRead, BufReader};
use tracing::{error, info};

use contiguous_memsim::{
    init_tracing, InMemoryRepository, JsonFileRepository, Shell, Simulation, SimulatorConfig,
    SnapshotRepository,
};

fn main() -> anyhow::Result<()> {
    let config = SimulatorConfig::from_env().context("Invalid simulator configuration")?;
    init_tracing(config.trace_json);

    let simulation = Simulation::from_config(&config).context("Invalid initial memory layout")?;
    info!(
        total_memory = config.total_memory,
        algorithm = %config.algorithm,
        "Memory simulator starting"
    );

    let input: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => {
            let file = std::fs::File::open(&path)
                .with_context(|| format!("Failed to open script {}", path))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    match config.snapshot_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;
            let repository = JsonFileRepository::new(dir);
            info!(dir = %repository.root().display(), "Storing snapshots on disk");
            run(Shell::new(simulation, repository), input)
        }
        None => run(Shell::new(simulation, InMemoryRepository::new()), input),
    }
}

/// Execute every line; command errors are reported and the run continues
fn run<R: SnapshotRepository>(mut shell: Shell<R>, input: Box<dyn BufRead>) -> anyhow::Result<()> {
    for (index, line) in input.lines().enumerate() {
        let line = line.context("Failed to read command")?;
        match shell.run_line(&line, index + 1) {
            Ok(Some(output)) => println!("{}", output),
            Ok(None) => {}
            Err(e) => {
                error!(line = index + 1, error = %e, "Command failed");
                eprintln!("line {}: {}", index + 1, e);
            }
        }
    }
    Ok(())
}
