// tests/integration/project_loading.rs

use std::io::Write;

use pyority::config::load_and_validate;
use pyority::{print_dry_run, write_schedule};
use pyority_test_utils::builders::{ProjectFileBuilder, TaskConfigBuilder};
use tempfile::NamedTempFile;

use crate::common::{init_tracing, schedule_lines};

fn project_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn render(lines: &[u8]) -> Vec<String> {
    String::from_utf8(lines.to_vec())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn ab_project_schedules_like_the_api() {
    init_tracing();
    let file = project_file(
        r#"
[task.A]
subtasks = ["A1", "A2"]

[task.A1]

[task.A2]
after = ["A1"]

[task.B]
subtasks = ["B1", "B2"]
after = ["A1"]

[task.B1]

[task.B2]
after = ["B1"]
"#,
    );

    let project = load_and_validate(file.path()).unwrap();
    let (mut scheduler, ids) = project.build_scheduler().unwrap();
    assert_eq!(ids.len(), 6);
    assert_eq!(scheduler.point_count(), 12);

    let mut out = Vec::new();
    let written = write_schedule(&mut out, &mut scheduler, false).unwrap();
    assert_eq!(written, 12);
    assert_eq!(
        render(&out),
        [
            "Start: A", "Start: A1", "End  : A1", "Start: B", "Start: B1", "End  : B1",
            "Start: A2", "Start: B2", "End  : A2", "End  : B2", "End  : A", "End  : B",
        ]
    );
}

#[test]
fn details_show_totals_and_counts() {
    let file = project_file(
        r#"
[task.X]
pyority = 2.0
"#,
    );

    let project = load_and_validate(file.path()).unwrap();
    let (mut scheduler, _) = project.build_scheduler().unwrap();

    let mut out = Vec::new();
    write_schedule(&mut out, &mut scheduler, true).unwrap();
    assert_eq!(
        render(&out),
        [
            "Start: X  (total 2, dependents 1)",
            "End  : X  (total 0, dependents 0)",
        ]
    );
}

#[test]
fn defaults_fill_missing_pyorities() {
    let file = project_file(
        r#"
[default]
pyority = 1.0
end_pyority = 0.5

[task.light]

[task.heavy]
pyority = 10.0
end_pyority = 3.0
"#,
    );

    let project = load_and_validate(file.path()).unwrap();
    assert_eq!(project.start_pyority_of("light"), 1.0);
    assert_eq!(project.end_pyority_of("light"), 0.5);
    assert_eq!(project.end_pyority_of("heavy"), 3.0);

    let (mut scheduler, ids) = project.build_scheduler().unwrap();
    let start_heavy = scheduler.start(ids["heavy"]).unwrap();
    assert_eq!(scheduler.total_pyority(start_heavy).unwrap(), 13.0);

    let lines = schedule_lines(&mut scheduler).unwrap();
    assert_eq!(lines[0], "Start: heavy");
}

#[test]
fn builder_project_matches_file_project() {
    let project = ProjectFileBuilder::new()
        .with_default_pyority(1.0)
        .with_task("build", TaskConfigBuilder::new().subtask("compile").build())
        .with_task("compile", TaskConfigBuilder::new().pyority(4.0).build())
        .with_task("ship", TaskConfigBuilder::new().after("build").build())
        .build();

    assert_eq!(project.root_tasks(), vec!["build", "ship"]);

    let (mut scheduler, ids) = project.build_scheduler().unwrap();
    assert_eq!(scheduler.parent(ids["compile"]).unwrap(), Some(ids["build"]));

    let lines = schedule_lines(&mut scheduler).unwrap();
    assert_eq!(
        lines,
        [
            "Start: build",
            "Start: compile",
            "End  : compile",
            "End  : build",
            "Start: ship",
            "End  : ship",
        ]
    );
}

#[test]
fn dry_run_lists_tasks() {
    let project = ProjectFileBuilder::new()
        .with_task("A", TaskConfigBuilder::new().pyority(2.0).build())
        .with_task("B", TaskConfigBuilder::new().after("A").build())
        .build();

    let mut out = Vec::new();
    print_dry_run(&mut out, &project).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("pyority dry-run"));
    assert!(text.contains("tasks (2):"));
    assert!(text.contains("  - A"));
    assert!(text.contains("pyority: 2 / end 0"));
    assert!(!text.contains("subtasks:"));
    assert!(text.contains(r#"after: ["A"]"#));
}
