// tests/property/scheduler.rs

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::has_path_connecting;
use petgraph::graph::NodeIndex;
use proptest::prelude::*;
use proptest::sample::Index;
use pyority::errors::PyorityError;
use pyority::{PointId, PyorityPolicy, Role, Scheduler, TaskId};

#[derive(Debug, Clone)]
struct Job {
    start: u32,
    end: u32,
}

struct JobPolicy;

impl PyorityPolicy<Job, u32> for JobPolicy {
    fn start_pyority(&self, data: &Job) -> u32 {
        data.start
    }

    fn end_pyority(&self, data: &Job) -> u32 {
        data.end
    }
}

type JobScheduler = Scheduler<Job, u32, JobPolicy>;

/// Raw material for a random project: tasks (with an optional parent among
/// earlier tasks) and candidate point-level dependencies.
#[derive(Debug, Clone)]
struct ProjectSpec {
    tasks: Vec<(Option<usize>, Job)>,
    deps: Vec<(usize, Role, usize, Role)>,
}

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Start), Just(Role::End)]
}

// Parents always come earlier so nesting is a forest. Pyorities are strictly
// positive so "total == own" pins down "no dependents".
fn project_strategy(max_tasks: usize) -> impl Strategy<Value = ProjectSpec> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        let tasks = proptest::collection::vec(
            (any::<Option<Index>>(), 1..10u32, 1..10u32),
            num_tasks,
        );
        let deps = proptest::collection::vec(
            (any::<Index>(), role(), any::<Index>(), role()),
            0..num_tasks * 2,
        );

        (tasks, deps).prop_map(move |(raw_tasks, raw_deps)| {
            let tasks = raw_tasks
                .into_iter()
                .enumerate()
                .map(|(i, (parent, start, end))| {
                    let parent = match parent {
                        Some(idx) if i > 0 => Some(idx.index(i)),
                        _ => None,
                    };
                    (parent, Job { start, end })
                })
                .collect();
            let deps = raw_deps
                .into_iter()
                .map(|(from, from_role, to, to_role)| {
                    (from.index(num_tasks), from_role, to.index(num_tasks), to_role)
                })
                .collect();
            ProjectSpec { tasks, deps }
        })
    })
}

/// Build the scheduler, skipping any dependency that would close a cycle.
fn build(spec: &ProjectSpec) -> JobScheduler {
    let mut scheduler = Scheduler::with_policy(JobPolicy);
    let mut ids: Vec<TaskId> = Vec::new();

    for (parent, job) in spec.tasks.iter() {
        let id = match parent {
            Some(p) => scheduler.add_subtasks(ids[*p], [job.clone()]).unwrap()[0],
            None => scheduler.add_task(job.clone(), []).unwrap().0,
        };
        ids.push(id);
    }

    for (from, from_role, to, to_role) in spec.deps.iter() {
        let from = ids[*from].point(*from_role);
        let to = ids[*to].point(*to_role);
        if from == to {
            continue;
        }
        let graph = scheduler.graph().to_petgraph();
        let closes_cycle = has_path_connecting(
            &graph,
            NodeIndex::new(to.index()),
            NodeIndex::new(from.index()),
            None,
        );
        if !closes_cycle {
            scheduler.add_dependency(to, from).unwrap();
        }
    }
    scheduler
}

fn visit_order(scheduler: &mut JobScheduler) -> Vec<(PointId, u32, usize)> {
    scheduler
        .traverse()
        .map(|v| {
            let v = v.unwrap();
            (v.point(), v.total_pyority(), v.dependent_count())
        })
        .collect()
}

proptest! {
    #[test]
    fn every_point_is_visited_once(spec in project_strategy(12)) {
        let mut scheduler = build(&spec);
        let order = visit_order(&mut scheduler);

        prop_assert_eq!(order.len(), 2 * spec.tasks.len());
        let unique: BTreeSet<PointId> = order.iter().map(|(p, _, _)| *p).collect();
        prop_assert_eq!(unique.len(), order.len());
        prop_assert_eq!(scheduler.remaining(), 0);
    }

    #[test]
    fn dependencies_precede_dependents(spec in project_strategy(12)) {
        let mut scheduler = build(&spec);
        let order = visit_order(&mut scheduler);
        let position: HashMap<PointId, usize> =
            order.iter().enumerate().map(|(i, (p, _, _))| (*p, i)).collect();

        for point in scheduler.graph().points() {
            for dep in scheduler.direct_dependencies(point).unwrap() {
                prop_assert!(position[dep] < position[&point]);
            }
        }

        let tasks: Vec<TaskId> = scheduler.tasks().collect();
        for task in tasks {
            prop_assert!(position[&task.start()] < position[&task.end()]);
            for sub in scheduler.subtasks(task).unwrap() {
                prop_assert!(position[&task.start()] < position[&sub.start()]);
                prop_assert!(position[&sub.end()] < position[&task.end()]);
            }
        }
    }

    #[test]
    fn totals_sum_over_reachable_points(spec in project_strategy(10)) {
        let mut scheduler = build(&spec);
        let points: Vec<PointId> = scheduler.graph().points().collect();

        for point in points.iter().copied() {
            let own = scheduler.pyority(point).unwrap();
            let total = scheduler.total_pyority(point).unwrap();
            let dependents = scheduler.transitive_dependents(point).unwrap();

            let mut expected = own;
            for q in dependents.iter() {
                expected += scheduler.pyority(*q).unwrap();
            }
            prop_assert_eq!(total, expected);
            prop_assert_eq!(scheduler.dependent_count(point).unwrap(), dependents.len());
            prop_assert!(total >= own);
            prop_assert_eq!(total == own, dependents.is_empty());

            for q in dependents {
                let deps_of_q = scheduler.transitive_dependencies(q).unwrap();
                prop_assert!(deps_of_q.contains(&point));
            }
        }
    }

    #[test]
    fn each_step_picks_a_best_ready_point(spec in project_strategy(10)) {
        let mut scheduler = build(&spec);
        let order = visit_order(&mut scheduler);
        let points: Vec<PointId> = scheduler.graph().points().collect();

        let mut key: HashMap<PointId, (u32, usize)> = HashMap::new();
        let mut pending: HashMap<PointId, usize> = HashMap::new();
        let mut ready: BTreeSet<PointId> = BTreeSet::new();
        for point in points.iter().copied() {
            key.insert(
                point,
                (
                    scheduler.total_pyority(point).unwrap(),
                    scheduler.dependent_count(point).unwrap(),
                ),
            );
            let deps = scheduler.direct_dependencies(point).unwrap().len();
            pending.insert(point, deps);
            if deps == 0 {
                ready.insert(point);
            }
        }

        for (point, total, count) in order {
            prop_assert!(ready.contains(&point), "{} visited before it was ready", point);
            prop_assert_eq!(key[&point], (total, count));
            for other in ready.iter() {
                prop_assert!(key[other] <= (total, count), "{} outranks {}", other, point);
            }

            ready.remove(&point);
            for dependent in scheduler.direct_dependents(point).unwrap() {
                let left = pending.get_mut(dependent).unwrap();
                *left -= 1;
                if *left == 0 {
                    ready.insert(*dependent);
                }
            }
        }
        prop_assert!(ready.is_empty());
    }

    #[test]
    fn closing_a_loop_yields_no_points(spec in project_strategy(8)) {
        let mut scheduler = build(&spec);
        let first = scheduler.tasks().next().unwrap();

        // End(first) is reachable from Start(first); make Start wait on End.
        scheduler.add_dependency(first.start(), first.end()).unwrap();

        let items: Vec<_> = scheduler.traverse().collect();
        prop_assert_eq!(items.len(), 1);
        let is_cycle = matches!(items[0], Err(PyorityError::CyclicDependency { .. }));
        prop_assert!(is_cycle, "expected a cycle error, got {:?}", items[0]);
    }
}
