/*!
 * Shell Tests
 * Scripted sessions through the command interpreter
 */

use contiguous_memsim::shell::Shell;
use contiguous_memsim::simulation::Simulation;
use contiguous_memsim::snapshot::{Identity, InMemoryRepository, SnapshotRepository};
use contiguous_memsim::SimulatorError;

fn shell() -> Shell<InMemoryRepository> {
    Shell::new(Simulation::new(), InMemoryRepository::new())
}

fn run(shell: &mut Shell<InMemoryRepository>, line: &str) -> String {
    shell
        .run_line(line, 1)
        .unwrap_or_else(|e| panic!("{:?} failed: {}", line, e))
        .unwrap_or_default()
}

#[test]
fn test_scripted_session() {
    let mut shell = shell();

    assert!(run(&mut shell, "alloc P1 100").contains("allocated 100 KB using first-fit"));
    assert!(run(&mut shell, "algo worst-fit").contains("worst-fit"));
    assert!(run(&mut shell, "alloc P2 200").contains("allocated"));
    assert!(run(&mut shell, "alloc Huge 900").starts_with("Failed to allocate process Huge"));

    let stats = run(&mut shell, "stats");
    assert!(stats.contains("Used memory:            300 KB"));
    assert!(stats.contains("Allocated processes:    2"));

    let processes = run(&mut shell, "processes");
    assert!(processes.contains("pending"));

    assert!(run(&mut shell, "free P1").contains("100 KB freed"));
    assert!(run(&mut shell, "free nobody").contains("No process named"));

    let bar = run(&mut shell, "map 32");
    assert_eq!(bar.chars().count(), 34);
    assert!(bar.contains('P'));

    assert_eq!(shell.simulation().stats().used_memory, 200);
}

#[test]
fn test_comments_and_blank_lines_are_ignored() {
    let mut shell = shell();
    assert_eq!(shell.run_line("", 1).unwrap(), None);
    assert_eq!(shell.run_line("   # setup", 2).unwrap(), None);
}

#[test]
fn test_save_list_load_through_shell() {
    let mut shell = shell();
    run(&mut shell, "alloc A 128");
    assert!(run(&mut shell, "save alice before reset").contains("before reset"));

    run(&mut shell, "reset");
    assert_eq!(shell.simulation().stats().used_memory, 0);

    let owner = Identity::new("alice").unwrap();
    let id = shell.repository().list(&owner).unwrap()[0].id;
    assert!(run(&mut shell, "list alice").contains(&id.to_string()));

    run(&mut shell, &format!("load alice {}", id));
    assert_eq!(shell.simulation().stats().used_memory, 128);

    assert!(matches!(
        shell.run_line(&format!("load bob {}", id), 9),
        Err(SimulatorError::Snapshot(_))
    ));

    run(&mut shell, &format!("delete alice {}", id));
    assert_eq!(run(&mut shell, "list alice"), "No saved simulations");
}

#[test]
fn test_invalid_request_is_an_error() {
    let mut shell = shell();
    assert!(matches!(
        shell.run_line("alloc P1 0", 1),
        Err(SimulatorError::Simulation(_))
    ));
    assert!(matches!(
        shell.run_line("alloc P1 5000", 2),
        Err(SimulatorError::Simulation(_))
    ));
}

#[test]
fn test_numeric_process_name_wins_over_id() {
    let mut shell = shell();
    run(&mut shell, "alloc A 100");
    run(&mut shell, "alloc 1 50");

    assert!(run(&mut shell, "free 1").contains("Process 1 (process-2)"));
    let names: Vec<&str> = shell
        .simulation()
        .processes()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["A"]);

    assert!(run(&mut shell, "free process-1").contains("100 KB freed"));
    assert!(run(&mut shell, "free 7").contains("No process named"));
}
