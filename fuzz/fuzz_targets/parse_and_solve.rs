#![no_main]

use libfuzzer_sys::fuzz_target;

use pathsearch::algorithms::astar::astar;
use pathsearch::algorithms::dijkstra::dijkstra;
use pathsearch::problem::Problem;
use pathsearch::problem::ZeroHeuristic;
use pathsearch::problems::graph::LabeledGraph;
use pathsearch::problems::graph::NodeId;
use pathsearch::problems::grid::GridProblem;
use pathsearch::problems::grid::ManhattanHeuristic;
use pathsearch::space::Space;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(graph) = LabeledGraph::<u32>::try_from(s) {
        let n = graph.num_nodes() as u32;
        for (start, goal) in [(0, n.saturating_sub(1)), (n / 2, 0)] {
            let (start, goal) = (NodeId::new(start), NodeId::new(goal));
            let found = astar(&graph, start, goal, ZeroHeuristic);
            assert_eq!(found, dijkstra(&graph, start, goal));
            if let Ok(Some(path)) = found {
                assert!(graph.valid_path(&path));
            }
        }
    }

    if let Ok(problem) = GridProblem::try_from(s) {
        let (start, goal) = (*problem.start(), *problem.goal());
        let found = astar(problem.space(), start, goal, ManhattanHeuristic);
        let expected = dijkstra(problem.space(), start, goal);
        assert_eq!(
            found.as_ref().map(|p| p.as_ref().map(|p| p.cost)),
            expected.as_ref().map(|p| p.as_ref().map(|p| p.cost))
        );
        if let Ok(Some(path)) = found {
            assert!(problem.space().valid_path(&path));
        }
    }
});
