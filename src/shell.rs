/*!
 * Command Shell
 * Line-oriented commands driving a simulation and a snapshot repository
 */

use crate::core::errors::{SimulatorError, SimulatorResult};
use crate::core::limits::DEFAULT_MAP_COLUMNS;
use crate::core::types::{ProcessId, Size};
use crate::memory::AllocationAlgorithm;
use crate::monitoring::command_span;
use crate::simulation::{MemoryMap, Simulation};
use crate::snapshot::{Identity, SnapshotRepository};
use std::fmt::Write;
use std::str::FromStr;
use uuid::Uuid;

pub const HELP: &str = "\
Commands:
  alloc NAME SIZE     add a process of SIZE KB and place it
  free NAME|ID        deallocate a process
  algo POLICY         first-fit | best-fit | worst-fit
  stats               memory statistics
  map [COLUMNS]       proportional memory bar
  blocks              block table
  processes           process list
  reset               back to the initial partitions
  save WHO NAME       save a named snapshot for WHO
  list WHO            WHO's snapshots, most recent first
  load WHO ID         restore a snapshot
  delete WHO ID       delete a snapshot
  help                this text";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Alloc { name: String, size: Size },
    Free { target: String },
    Algo(AllocationAlgorithm),
    Stats,
    Map { columns: usize },
    Blocks,
    Processes,
    Reset,
    Save { owner: String, name: String },
    List { owner: String },
    Load { owner: String, id: Uuid },
    Delete { owner: String, id: Uuid },
    Help,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Alloc { .. } => "alloc",
            Command::Free { .. } => "free",
            Command::Algo(_) => "algo",
            Command::Stats => "stats",
            Command::Map { .. } => "map",
            Command::Blocks => "blocks",
            Command::Processes => "processes",
            Command::Reset => "reset",
            Command::Save { .. } => "save",
            Command::List { .. } => "list",
            Command::Load { .. } => "load",
            Command::Delete { .. } => "delete",
            Command::Help => "help",
        }
    }
}

fn invalid(message: impl Into<String>) -> SimulatorError {
    SimulatorError::InvalidCommand(message.into())
}

fn parse_uuid(raw: Option<&str>, usage: &str) -> SimulatorResult<Uuid> {
    let raw = raw.ok_or_else(|| invalid(usage))?;
    Uuid::parse_str(raw).map_err(|e| invalid(format!("{}: {}", raw, e)))
}

impl FromStr for Command {
    type Err = SimulatorError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let keyword = words.next().ok_or_else(|| invalid("empty line"))?;
        let args: Vec<&str> = words.collect();

        let command = match (keyword.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("alloc", [name, size]) => Command::Alloc {
                name: name.to_string(),
                size: size
                    .parse()
                    .map_err(|_| invalid(format!("size must be a number of KB, got {:?}", size)))?,
            },
            ("alloc", _) => return Err(invalid("usage: alloc NAME SIZE")),
            ("free", [target]) => Command::Free {
                target: target.to_string(),
            },
            ("free", _) => return Err(invalid("usage: free NAME|ID")),
            ("algo", [policy]) => Command::Algo(policy.parse()?),
            ("algo", _) => return Err(invalid("usage: algo first-fit|best-fit|worst-fit")),
            ("stats", []) => Command::Stats,
            ("map", []) => Command::Map {
                columns: DEFAULT_MAP_COLUMNS,
            },
            ("map", [columns]) => Command::Map {
                columns: columns
                    .parse()
                    .map_err(|_| invalid(format!("columns must be a number, got {:?}", columns)))?,
            },
            ("blocks", []) => Command::Blocks,
            ("processes", []) => Command::Processes,
            ("reset", []) => Command::Reset,
            ("save", [owner, name @ ..]) if !name.is_empty() => Command::Save {
                owner: owner.to_string(),
                name: name.join(" "),
            },
            ("save", _) => return Err(invalid("usage: save WHO NAME")),
            ("list", [owner]) => Command::List {
                owner: owner.to_string(),
            },
            ("list", _) => return Err(invalid("usage: list WHO")),
            ("load", [owner, rest @ ..]) => Command::Load {
                owner: owner.to_string(),
                id: parse_uuid(rest.first().copied(), "usage: load WHO ID")?,
            },
            ("load", _) => return Err(invalid("usage: load WHO ID")),
            ("delete", [owner, rest @ ..]) => Command::Delete {
                owner: owner.to_string(),
                id: parse_uuid(rest.first().copied(), "usage: delete WHO ID")?,
            },
            ("delete", _) => return Err(invalid("usage: delete WHO ID")),
            ("help", _) => Command::Help,
            (other, _) => return Err(invalid(format!("unknown command {:?}", other))),
        };

        Ok(command)
    }
}

/// Interactive front end over a simulation
pub struct Shell<R: SnapshotRepository> {
    simulation: Simulation,
    repository: R,
}

impl<R: SnapshotRepository> Shell<R> {
    pub fn new(simulation: Simulation, repository: R) -> Self {
        Self {
            simulation,
            repository,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Parse and run one line; blank lines and `#` comments produce no output
    pub fn run_line(&mut self, line: &str, line_number: usize) -> SimulatorResult<Option<String>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let command: Command = trimmed.parse()?;
        let span = command_span(command.name(), line_number);
        let _enter = span.enter();
        self.execute(command).map(Some)
    }

    pub fn execute(&mut self, command: Command) -> SimulatorResult<String> {
        let output = match command {
            Command::Alloc { name, size } => {
                let report = self.simulation.add_process(&name, size)?;
                match report.failure {
                    None => format!(
                        "Process {} ({}) allocated {} KB using {}",
                        report.process.name, report.process.id, size, report.algorithm
                    ),
                    Some(reason) => format!(
                        "Failed to allocate process {} ({}): {}",
                        report.process.name, report.process.id, reason
                    ),
                }
            }
            Command::Free { target } => match self.resolve(&target) {
                Some(id) => {
                    let report = self.simulation.deallocate(id);
                    match report.process {
                        Some(process) => format!(
                            "Process {} ({}) deallocated, {} KB freed",
                            process.name, process.id, report.freed
                        ),
                        None => format!("No process {}", id),
                    }
                }
                None => format!("No process named {:?}", target),
            },
            Command::Algo(algorithm) => {
                self.simulation.set_algorithm(algorithm);
                format!("Algorithm set to {}", algorithm)
            }
            Command::Stats => self.render_stats(),
            Command::Map { columns } => {
                MemoryMap::from_blocks(self.simulation.blocks(), self.simulation.total_memory())
                    .render_bar(columns)
            }
            Command::Blocks => {
                MemoryMap::from_blocks(self.simulation.blocks(), self.simulation.total_memory())
                    .render_table()
            }
            Command::Processes => self.render_processes(),
            Command::Reset => {
                self.simulation.reset();
                "Memory reset, all processes cleared".to_string()
            }
            Command::Save { owner, name } => {
                let owner = Identity::new(owner)?;
                let summary = self.repository.save(&owner, self.simulation.snapshot(name))?;
                format!("Saved {:?} as {}", summary.name, summary.id)
            }
            Command::List { owner } => {
                let owner = Identity::new(owner)?;
                let summaries = self.repository.list(&owner)?;
                if summaries.is_empty() {
                    "No saved simulations".to_string()
                } else {
                    let mut out = String::new();
                    for summary in summaries {
                        let _ = writeln!(
                            out,
                            "{}  {:<24} {:<9} {:>6} KB  {}",
                            summary.id,
                            summary.name,
                            summary.algorithm,
                            summary.total_memory,
                            summary.created_at
                        );
                    }
                    out.trim_end().to_string()
                }
            }
            Command::Load { owner, id } => {
                let owner = Identity::new(owner)?;
                let snapshot = self.repository.load(&owner, id)?;
                let name = snapshot.name.clone();
                self.simulation.restore(snapshot)?;
                format!("Loaded {:?}", name)
            }
            Command::Delete { owner, id } => {
                let owner = Identity::new(owner)?;
                self.repository.delete(&owner, id)?;
                "Simulation deleted".to_string()
            }
            Command::Help => HELP.to_string(),
        };

        Ok(output)
    }

    /// Process id (`process-3` or `3`) first, then display name
    /// Display names win over ids; an id only resolves to a live process
    fn resolve(&self, target: &str) -> Option<ProcessId> {
        if let Some(process) = self.simulation.find_process_by_name(target) {
            return Some(process.id);
        }
        target
            .parse::<ProcessId>()
            .ok()
            .and_then(|id| self.simulation.process(id))
            .map(|process| process.id)
    }

    fn render_stats(&self) -> String {
        let stats = self.simulation.stats();
        let mut out = String::new();
        let _ = writeln!(out, "Algorithm:              {}", self.simulation.algorithm());
        let _ = writeln!(
            out,
            "Memory utilization:     {:.1}% ({})",
            stats.utilization_percentage(),
            stats.memory_pressure()
        );
        let _ = writeln!(out, "Used memory:            {} KB", stats.used_memory);
        let _ = writeln!(out, "Free memory:            {} KB", stats.free_memory);
        let _ = writeln!(
            out,
            "External fragmentation: {} KB ({:.1}%)",
            stats.external_fragmentation,
            stats.external_fragmentation_percentage()
        );
        let _ = writeln!(out, "Internal fragmentation: {} KB", stats.internal_fragmentation);
        let _ = write!(out, "Allocated processes:    {}", stats.allocated_processes);
        out
    }

    fn render_processes(&self) -> String {
        let processes = self.simulation.processes();
        if processes.is_empty() {
            return "No processes".to_string();
        }
        let mut out = String::new();
        for process in processes {
            let status = match process.block_id {
                Some(block) if process.allocated => format!("allocated in {}", block),
                _ => "pending".to_string(),
            };
            let _ = writeln!(
                out,
                "{:<12} {:<16} {:>6} KB  {}",
                process.id.to_string(),
                process.name,
                process.size,
                status
            );
        }
        out.trim_end().to_string()
    }
}
