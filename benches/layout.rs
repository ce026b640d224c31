use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use astflow::{Graph, LayoutConfig, RawEdge, RawNode, Theme, compose, compute_layout};

/// Chain of decisions, each splitting into a branch that rejoins two ranks
/// later. Shape-wise this matches what the code parser emits for a long
/// if/else ladder.
fn decision_ladder(decisions: usize) -> (Vec<RawNode>, Vec<RawEdge>) {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let node = |id: &str, kind: &str| RawNode {
        id: id.to_string(),
        kind: kind.to_string(),
        label: id.to_string(),
    };
    let edge = |source: &str, target: &str, branch: Option<&str>| RawEdge {
        source: source.to_string(),
        target: target.to_string(),
        branch_id: branch.map(str::to_string),
        label: None,
    };

    nodes.push(node("start", "assignment"));
    let mut prev = "start".to_string();
    for i in 0..decisions {
        let d = format!("d{i}");
        let yes = format!("y{i}");
        let no = format!("n{i}");
        let join = format!("j{i}");
        nodes.push(node(&d, "decision"));
        nodes.push(node(&yes, "io"));
        nodes.push(node(&no, "assignment"));
        nodes.push(node(&join, "assignment"));
        edges.push(edge(&prev, &d, None));
        edges.push(edge(&d, &yes, Some("yes")));
        edges.push(edge(&d, &no, Some("no")));
        edges.push(edge(&yes, &join, None));
        edges.push(edge(&no, &join, None));
        prev = join;
    }
    (nodes, edges)
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for decisions in [4usize, 16, 64] {
        let (nodes, edges) = decision_ladder(decisions);
        let graph = Graph::build(&nodes, &edges).expect("ladder builds");
        let config = LayoutConfig::default();
        group.bench_with_input(
            BenchmarkId::new("decision_ladder", decisions),
            &graph,
            |b, graph| b.iter(|| black_box(compute_layout(graph, &config).unwrap())),
        );
    }
    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    let (nodes, edges) = decision_ladder(16);
    let graph = Graph::build(&nodes, &edges).expect("ladder builds");
    let layout = compute_layout(&graph, &LayoutConfig::default()).unwrap();
    let theme = Theme::default();
    c.bench_function("compose/decision_ladder_16", |b| {
        b.iter(|| black_box(compose(&layout, &theme)))
    });
}

criterion_group!(benches, bench_layout, bench_compose);
criterion_main!(benches);
