use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use path_accel_core::{
    AutomatonBuilder, BindingIter, BindingRow, Direction, EdgeStore, ExecutionContext, Identifier,
    LabelMatch, NodeId, PathAutomaton, PathCheck, PathOptions, Step,
};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args: Vec<String> = std::env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(200_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: path-accel-bench [mode] [node_count] [options.json] [--json]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  lsystem     Fractal branching tree (deep paths)");
        println!("  cycle       Single ring (worst case for dedup)");
        println!("  random      Erdos-Renyi uniform random edges");
        println!("  barbell     Two dense cliques connected by a thin bridge");
        println!("  dla         Diffusion-limited aggregation (organic branching)");
        println!();
        println!("Default node_count: 200000");
        println!("--json prints one JSON object per query instead of a table row");
        return;
    }

    let options = match args.get(3) {
        Some(path) => match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| PathOptions::from_json(&text).map_err(|e| e.to_string()))
        {
            Ok(opts) => opts,
            Err(e) => {
                eprintln!("Cannot load options from {}: {}", path, e);
                return;
            }
        },
        None => PathOptions::default(),
    };

    println!("path-accel-bench");
    println!("================");
    println!();

    let generators: Vec<(&str, fn(u64) -> EdgeStore)> = match mode {
        "lsystem" => vec![("L-system tree", gen_lsystem)],
        "cycle" => vec![("Ring", gen_cycle)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "barbell" => vec![("Barbell (clique-bridge-clique)", gen_barbell)],
        "dla" => vec![("DLA (organic branching)", gen_dla)],
        "all" => vec![
            ("L-system tree", gen_lsystem as fn(u64) -> EdgeStore),
            ("Ring", gen_cycle),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (clique-bridge-clique)", gen_barbell),
            ("DLA (organic branching)", gen_dla),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count, &options, json);
    }
}

/// Path expressions exercised against every generated graph.
fn queries() -> path_accel_core::Result<Vec<(&'static str, PathAutomaton)>> {
    let (a, b) = (LABELS[0].1, LABELS[1].1);

    let mut a_or_b_star = AutomatonBuilder::new();
    let s = a_or_b_star.add_state();
    a_or_b_star
        .set_start(s)
        .set_accepting(s)
        .add_transition(s, s, LabelMatch::Label(a), Direction::Outgoing)
        .add_transition(s, s, LabelMatch::Label(b), Direction::Outgoing);
    let a_or_b_star = a_or_b_star.build()?;

    Ok(vec![
        (":a+", PathAutomaton::one_or_more(Step::forward(a))),
        ("(:a|:b)*", a_or_b_star),
        ("<*>+", PathAutomaton::one_or_more(Step::any(Direction::Outgoing))),
        ("^<*>+", PathAutomaton::one_or_more(Step::any(Direction::Incoming))),
        (
            ":a/^:b",
            PathAutomaton::sequence(&[Step::forward(a), Step::backward(b)]),
        ),
    ])
}

fn run_benchmark(
    name: &str,
    generator: fn(u64) -> EdgeStore,
    node_count: u64,
    options: &PathOptions,
    json: bool,
) {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let store = generator(node_count);
    let gen_time = t.elapsed();
    println!(
        "Generated in {:.2}s: {} nodes, {} edges, ~{:.0}MB",
        gen_time.as_secs_f64(),
        store.node_count(),
        store.edge_count(),
        store.memory_usage() as f64 / 1_048_576.0
    );
    tracing::info!(generator = name, nodes = store.node_count(), "graph ready");

    let ctx = ExecutionContext::new(&store, options);
    let far_node = store.node_count().saturating_sub(1) as NodeId;

    println!();
    if !json {
        println!(
            "{:>10} {:>8} {:>8} {:>10} {:>12} {:>10}",
            "query", "pair", "found", "scans", "visited", "time"
        );
        println!(
            "{:->10} {:->8} {:->8} {:->10} {:->12} {:->10}",
            "", "", "", "", "", ""
        );
    }

    let queries = match queries() {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Cannot build queries: {}", e);
            return;
        }
    };

    for (text, automaton) in queries {
        let automaton = Arc::new(automaton.with_source(text));
        for (label, start, end) in [("0→far", 0, far_node), ("far→0", far_node, 0)] {
            let mut check = PathCheck::new(
                Arc::clone(&automaton),
                Identifier::Node(start),
                Identifier::Node(end),
            );

            let t = Instant::now();
            let outcome = BindingIter::<EdgeStore>::initialize(&mut check, &BindingRow::new(0))
                .and_then(|_| check.next(&ctx));
            let elapsed = t.elapsed();

            let found = match outcome {
                Ok(found) => found.to_string(),
                Err(e) => {
                    tracing::warn!(query = text, error = %e, "check failed");
                    "error".to_string()
                }
            };
            let stats = check.cycle_stats();

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "generator": name,
                        "query": text,
                        "start": start,
                        "end": end,
                        "found": found,
                        "scans": stats.scans,
                        "visited": check.visited_count(),
                        "time_ms": elapsed.as_secs_f64() * 1000.0,
                    })
                );
            } else {
                println!(
                    "{:>10} {:>8} {:>8} {:>10} {:>12} {:>8.1}ms",
                    text,
                    label,
                    found,
                    stats.scans,
                    check.visited_count(),
                    elapsed.as_secs_f64() * 1000.0
                );
            }
        }
    }
    println!();
}

// ---------------------------------------------------------------------------
// Generators: all O(n) or O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
}

/// Labels are interned first, in this order, so their ids are fixed.
const LABELS: [(&str, u16); 3] = [("a", 0), ("b", 1), ("c", 2)];

fn new_store() -> EdgeStore {
    let mut store = EdgeStore::new();
    for (name, id) in LABELS {
        let interned = store.intern_label(name);
        debug_assert_eq!(interned.ok(), Some(id));
    }
    store
}

fn random_label(rng: &mut FastRng) -> u16 {
    LABELS[rng.next(LABELS.len() as u64) as usize].1
}

/// L-system fractal tree: every node spawns three children.
///
/// Deep paths (log depth) with exponential width; a forward search from the
/// root fans out, a backward search from a leaf walks a single spine.
fn gen_lsystem(node_count: u64) -> EdgeStore {
    let mut store = new_store();
    let mut rng = FastRng::new(42);

    let branching = 3u64;
    store.add_node(0);

    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                let child = next_id;
                next_id += 1;
                store.add_edge(parent, child, random_label(&mut rng));
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    store
}

/// Single directed ring labeled `a`, with every 7th edge relabeled `b`.
///
/// Forces the dedup set to stop `(:a|:b)*` from looping forever.
fn gen_cycle(node_count: u64) -> EdgeStore {
    let mut store = new_store();
    for i in 0..node_count {
        let label = if i % 7 == 6 { LABELS[1].1 } else { LABELS[0].1 };
        store.add_edge(i, (i + 1) % node_count, label);
    }
    store
}

/// Erdos-Renyi: uniformly random edges, 5 per node on average.
fn gen_random(node_count: u64) -> EdgeStore {
    let mut store = new_store();
    let mut rng = FastRng::new(11111);
    let target_edges = node_count * 5;

    for i in 0..node_count {
        store.add_node(i);
    }

    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            store.add_edge(from, to, random_label(&mut rng));
        }
    }

    store
}

/// Barbell: two dense cliques connected by a single thin bridge.
///
/// The far clique is reachable only through a chain labeled `c`, so `:a+`
/// exhausts the first clique while wildcard queries cross the bridge.
fn gen_barbell(node_count: u64) -> EdgeStore {
    let bridge_len = 10u64;
    let clique_size = node_count.saturating_sub(bridge_len).max(2) / 2;
    let mut store = new_store();
    let mut rng = FastRng::new(99999);
    let bridge = LABELS[2].1;

    let mut clique = |store: &mut EdgeStore, base: u64| {
        for i in 0..clique_size {
            store.add_node(base + i);
            for _ in 0..20u64.min(clique_size - 1) {
                let target = rng.next(clique_size);
                if target != i {
                    store.add_edge(base + i, base + target, random_label(&mut rng));
                }
            }
        }
    };

    // Clique A: 0..clique_size
    clique(&mut store, 0);

    // Bridge: chain from last node of A to first node of B
    let bridge_start = clique_size;
    store.add_edge(clique_size - 1, bridge_start, bridge);
    for i in 1..bridge_len {
        store.add_edge(bridge_start + i - 1, bridge_start + i, bridge);
    }

    // Clique B: nodes after the bridge
    let b_start = bridge_start + bridge_len;
    store.add_edge(b_start - 1, b_start, bridge);
    clique(&mut store, b_start);

    store
}

/// DLA (Diffusion-Limited Aggregation): organic branching growth.
///
/// Each new node attaches to a recent "surface" node, with occasional
/// long-range shortcuts that create loops.
fn gen_dla(node_count: u64) -> EdgeStore {
    let mut store = new_store();
    let mut rng = FastRng::new(77777);

    store.add_node(0);

    let mut surface: VecDeque<u64> = VecDeque::with_capacity(10001);
    surface.push_back(0);
    let surface_max = 10000usize;

    for new_node in 1..node_count {
        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        store.add_edge(new_node, attach_to, random_label(&mut rng));

        // 10% chance of a second connection
        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node);
            if other != attach_to {
                store.add_edge(new_node, other, random_label(&mut rng));
            }
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }

    store
}
