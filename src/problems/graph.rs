use std::str::FromStr;

use derive_more::Display;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::algorithms::astar::astar;
use crate::float_cost::FloatCost;
use crate::problem::Endpoint;
use crate::problem::Heuristic;
use crate::problem::SearchError;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Neighbours;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;
use crate::walk::Point;

const MAX_ELEMENTS_DISPLAYED: usize = 20;

/// Distances on the plane.
pub type EuclideanCost = FloatCost<f64>;

/// An interned node label.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("#{_0}")]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}
impl State for NodeId {}

/// Following an edge.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
#[display("→{to}")]
pub struct GraphAction<C: Cost> {
    pub to: NodeId,
    pub weight: C,
}
impl<C: Cost> Action for GraphAction<C> {}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Invalid weight {weight} on edge {from:?} -> {to:?}")]
    InvalidWeight {
        from: String,
        to: String,
        weight: String,
    },
    /// The weights of the graph add up past what the cost type can hold, so
    /// some path costs would not be representable.
    #[error("Edge {from:?} -> {to:?} with weight {weight} makes the total weight overflow")]
    WeightOverflow {
        from: String,
        to: String,
        weight: String,
    },
    #[error("Unknown node {0:?}")]
    UnknownNode(String),
    #[error("Node {0:?} has no position")]
    MissingPosition(String),
}

/// Accumulates nodes and edges for a [`LabeledGraph`].
///
/// Nodes are created the first time a label shows up. Adding an edge twice
/// replaces its weight but keeps its original place among the neighbours.
///
/// The sum of all weights must stay below the cost's upper bound. Every path
/// the searches build is simple, so its cost can't overflow either.
#[derive(Clone, Debug)]
pub struct GraphBuilder<C: Cost> {
    labels: Vec<String>,
    ids: FxHashMap<String, NodeId>,
    adjacency: Vec<Vec<(NodeId, C)>>,
    positions: Vec<Option<Point>>,
    num_edges: usize,
    total_weight: C,
}

impl<C: Cost> Default for GraphBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Cost> GraphBuilder<C> {
    pub fn new() -> Self {
        Self {
            labels: vec![],
            ids: FxHashMap::default(),
            adjacency: vec![],
            positions: vec![],
            num_edges: 0,
            total_weight: C::zero(),
        }
    }

    /// Declares a node, returning its id. Existing labels keep their id.
    pub fn add_node(&mut self, label: &str) -> NodeId {
        if let Some(id) = self.ids.get(label) {
            return *id;
        }
        debug_assert!(self.labels.len() < u32::MAX as usize);
        let id = NodeId(self.labels.len() as u32);
        self.labels.push(label.to_owned());
        self.ids.insert(label.to_owned(), id);
        self.adjacency.push(vec![]);
        self.positions.push(None);
        id
    }

    /// Adds a directed edge.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: C) -> Result<&mut Self, GraphError> {
        if !weight.valid_weight() {
            return Err(GraphError::InvalidWeight {
                from: from.to_owned(),
                to: to.to_owned(),
                weight: weight.to_string(),
            });
        }

        let replaced = match (self.ids.get(from), self.ids.get(to)) {
            (Some(f), Some(t)) => self.adjacency[f.index()]
                .iter()
                .find(|(n, _)| n == t)
                .map_or(C::zero(), |(_, w)| *w),
            _ => C::zero(),
        };
        let total = (self.total_weight - replaced).saturating_add(&weight);
        if !total.valid() {
            return Err(GraphError::WeightOverflow {
                from: from.to_owned(),
                to: to.to_owned(),
                weight: weight.to_string(),
            });
        }
        self.total_weight = total;

        let from = self.add_node(from);
        let to = self.add_node(to);
        self.insert_edge(from, to, weight);
        Ok(self)
    }

    /// Adds an edge both ways.
    pub fn add_undirected_edge(
        &mut self,
        a: &str,
        b: &str,
        weight: C,
    ) -> Result<&mut Self, GraphError> {
        self.add_edge(a, b, weight)?;
        self.add_edge(b, a, weight)
    }

    pub fn set_position(&mut self, label: &str, position: impl Into<Point>) -> &mut Self {
        let id = self.add_node(label);
        self.positions[id.index()] = Some(position.into());
        self
    }

    pub fn build(self) -> LabeledGraph<C> {
        log::trace!(
            "Built graph with {} nodes and {} edges",
            self.labels.len(),
            self.num_edges
        );
        LabeledGraph {
            labels: self.labels,
            ids: self.ids,
            adjacency: self.adjacency,
            positions: self.positions,
            num_edges: self.num_edges,
        }
    }

    fn insert_edge(&mut self, from: NodeId, to: NodeId, weight: C) {
        let edges = &mut self.adjacency[from.index()];
        match edges.iter_mut().find(|(n, _)| *n == to) {
            Some(edge) => edge.1 = weight,
            None => {
                edges.push((to, weight));
                self.num_edges += 1;
            }
        }
    }

    fn position_of(&self, label: &str) -> Result<Point, GraphError> {
        let id = self
            .ids
            .get(label)
            .ok_or_else(|| GraphError::UnknownNode(label.to_owned()))?;
        self.positions[id.index()].ok_or_else(|| GraphError::MissingPosition(label.to_owned()))
    }
}

impl GraphBuilder<EuclideanCost> {
    /// Connects two positioned nodes both ways, weighted by their distance.
    pub fn add_euclidean_edge(&mut self, a: &str, b: &str) -> Result<&mut Self, GraphError> {
        let d = self.position_of(a)?.distance(&self.position_of(b)?);
        self.add_undirected_edge(a, b, FloatCost::new(d))
    }
}

/// A directed graph of labeled nodes with weighted edges.
///
/// Nodes may also have a position, which lets [`EuclideanHeuristic`] estimate
/// distances between them.
#[derive(Clone)]
pub struct LabeledGraph<C: Cost> {
    labels: Vec<String>,
    ids: FxHashMap<String, NodeId>,
    /// Outgoing edges in insertion order.
    adjacency: Vec<Vec<(NodeId, C)>>,
    positions: Vec<Option<Point>>,
    num_edges: usize,
}

impl<C: Cost> LabeledGraph<C> {
    pub fn builder() -> GraphBuilder<C> {
        GraphBuilder::new()
    }

    pub fn node(&self, label: &str) -> Option<NodeId> {
        self.ids.get(label).copied()
    }
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.labels.get(id.index()).map(String::as_str)
    }
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.positions.get(id.index()).copied().flatten()
    }

    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Outgoing edges of a node, in insertion order.
    pub fn edges(&self, id: NodeId) -> &[(NodeId, C)] {
        self.adjacency
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Labels of a sequence of nodes, like the states of a path.
    pub fn labels_of(&self, states: &[NodeId]) -> Vec<&str> {
        states
            .iter()
            .map(|id| self.label(*id).unwrap_or("?"))
            .collect()
    }

    /// Positions of a sequence of nodes, if all of them have one.
    pub fn waypoints(&self, states: &[NodeId]) -> Option<Vec<Point>> {
        states.iter().map(|id| self.position(*id)).collect()
    }

    /// Finds a cheapest path between two labels.
    ///
    /// Labels that are not part of the graph give [`SearchError::NotFound`].
    pub fn find_path<H>(
        &self,
        from: &str,
        to: &str,
        heuristic: H,
    ) -> Result<Option<Path<NodeId, GraphAction<C>, C>>, SearchError>
    where
        H: Heuristic<NodeId, C>,
    {
        let start = self
            .node(from)
            .ok_or_else(|| SearchError::not_found(Endpoint::Start, from))?;
        let goal = self
            .node(to)
            .ok_or_else(|| SearchError::not_found(Endpoint::Goal, to))?;
        astar(self, start, goal, heuristic)
    }
}

impl LabeledGraph<EuclideanCost> {
    /// Builds an undirected graph of positioned nodes weighted by the
    /// distance between them.
    pub fn euclidean<'a>(
        positions: impl IntoIterator<Item = (&'a str, Point)>,
        edges: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, GraphError> {
        let mut builder = GraphBuilder::<EuclideanCost>::new();
        for (label, position) in positions {
            builder.set_position(label, position);
        }
        for (a, b) in edges {
            builder.add_euclidean_edge(a, b)?;
        }
        Ok(builder.build())
    }

    /// The campus map: four key points joined by footpaths.
    pub fn campus() -> Self {
        const KEY_POINTS: [(&str, Point); 4] = [
            ("Library", Point::new(913.067, 675.260)),
            ("Clinic", Point::new(318.605, 642.0)),
            ("Classroom A", Point::new(1337.014, 564.125)),
            ("Main Gate", Point::new(1123.918, -235.594)),
        ];
        const FOOTPATHS: [(usize, usize); 4] = [(0, 1), (0, 2), (1, 3), (2, 3)];

        let mut builder = GraphBuilder::<EuclideanCost>::new();
        for (label, position) in KEY_POINTS {
            builder.set_position(label, position);
        }
        for (a, b) in FOOTPATHS {
            let d = FloatCost::new(KEY_POINTS[a].1.distance(&KEY_POINTS[b].1));
            let (a, b) = (NodeId(a as u32), NodeId(b as u32));
            builder.insert_edge(a, b, d);
            builder.insert_edge(b, a, d);
        }
        builder.build()
    }

    /// Straight-line distances as a heuristic, when they never overestimate.
    ///
    /// That needs every edge to join two positioned nodes and weigh at least
    /// the distance between them. Otherwise there's no admissible Euclidean
    /// estimate and this gives `None`.
    pub fn euclidean_heuristic(&self) -> Option<EuclideanHeuristic<'_>> {
        for (from, edges) in self.adjacency.iter().enumerate() {
            for (to, w) in edges {
                let (a, b) = (&self.labels[from], &self.labels[to.index()]);
                let (Some(pa), Some(pb)) = (self.positions[from], self.positions[to.index()])
                else {
                    log::debug!("No Euclidean heuristic, {a:?} -> {b:?} has an unpositioned end");
                    return None;
                };
                let d = pa.distance(&pb);
                if w.get() < d {
                    log::debug!("No Euclidean heuristic, {a:?} -> {b:?} weighs {w} < {d:.3}");
                    return None;
                }
            }
        }
        Some(EuclideanHeuristic { graph: self })
    }
}

impl<C: Cost> Space<NodeId, GraphAction<C>, C> for LabeledGraph<C> {
    #[inline(always)]
    fn apply(&self, s: &NodeId, a: &GraphAction<C>) -> Option<NodeId> {
        self.edges(*s)
            .iter()
            .any(|(to, w)| *to == a.to && *w == a.weight)
            .then_some(a.to)
    }

    #[inline(always)]
    fn cost(&self, _s: &NodeId, a: &GraphAction<C>) -> C {
        a.weight
    }

    fn neighbours(&self, s: &NodeId) -> Neighbours<NodeId, GraphAction<C>> {
        self.edges(*s)
            .iter()
            .map(|&(to, weight)| (to, GraphAction { to, weight }))
            .collect()
    }

    #[inline(always)]
    fn valid(&self, s: &NodeId) -> bool {
        s.index() < self.labels.len()
    }

    fn size(&self) -> Option<usize> {
        Some(self.num_nodes())
    }
}

impl<C: Cost> std::fmt::Display for LabeledGraph<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "LabeledGraph({} nodes, {} edges):",
            self.num_nodes(),
            self.num_edges
        )?;
        for (i, label) in self.labels.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
            write!(f, "  {label}")?;
            if let Some(p) = self.positions[i] {
                write!(f, " @ {p}")?;
            }
            write!(f, ":")?;
            for (to, w) in self.adjacency[i].iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, " {}({w})", self.labels[to.index()])?;
            }
            writeln!(f)?;
        }
        if self.labels.len() > MAX_ELEMENTS_DISPLAYED {
            writeln!(f, "  ...")?;
        }
        Ok(())
    }
}

impl<C: Cost> std::fmt::Debug for LabeledGraph<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "LabeledGraph{{{} nodes, {} edges}}",
            self.num_nodes(),
            self.num_edges
        )
    }
}

/// Straight-line distance between node positions.
///
/// Only handed out by [`LabeledGraph::euclidean_heuristic`], which checks that
/// no edge is shorter than the distance between its ends. Graphs built with
/// [`LabeledGraph::euclidean`] always pass.
#[derive(Copy, Clone, Debug)]
pub struct EuclideanHeuristic<'g> {
    graph: &'g LabeledGraph<EuclideanCost>,
}

impl Heuristic<NodeId, EuclideanCost> for EuclideanHeuristic<'_> {
    #[inline(always)]
    fn h(&self, s: &NodeId, goal: &NodeId) -> EuclideanCost {
        match (self.graph.position(*s), self.graph.position(*goal)) {
            (Some(a), Some(b)) => FloatCost::new(a.distance(&b)),
            _ => FloatCost::new(0.0),
        }
    }
}

#[derive(Debug, Error)]
pub enum GraphParseError {
    #[error("Unterminated quote at line {line}, column {column}")]
    UnterminatedQuote { line: usize, column: usize },
    #[error("Invalid number {token:?} at line {line}")]
    InvalidNumber { token: String, line: usize },
    #[error("Expected `from to weight`, `label` or `@ label x y` at line {line}, found {fields} fields")]
    InvalidLine { line: usize, fields: usize },
    #[error("{e} at line {line}")]
    Graph { e: GraphError, line: usize },
    #[error("I/O error when loading '{p}': {e}")]
    IOError {
        p: std::path::PathBuf,
        e: std::io::Error,
    },
    #[error("Invalid JSON: {reason}")]
    Json { reason: String },
    #[error("Unexpected JSON shape: {reason}")]
    JsonShape { reason: String },
}

/// Splits a line into fields, honouring double quotes and `#` comments.
fn tokenize(line: &str, line_no: usize) -> Result<Vec<&str>, GraphParseError> {
    let mut tokens = vec![];
    let mut chars = line.char_indices().peekable();

    while let Some(&(i, ch)) = chars.peek() {
        if ch == '#' {
            break;
        }
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch == '"' {
            chars.next();
            let end = chars.by_ref().find(|(_, c)| *c == '"').map(|(j, _)| j);
            match end {
                Some(j) => tokens.push(&line[i + 1..j]),
                None => {
                    return Err(GraphParseError::UnterminatedQuote {
                        line: line_no,
                        column: i + 1,
                    });
                }
            }
        } else {
            let mut end = line.len();
            while let Some(&(j, c)) = chars.peek() {
                if c.is_whitespace() || c == '"' || c == '#' {
                    end = j;
                    break;
                }
                chars.next();
            }
            tokens.push(&line[i..end]);
        }
    }

    Ok(tokens)
}

fn parse_number<T: FromStr>(token: &str, line: usize) -> Result<T, GraphParseError> {
    token
        .parse::<T>()
        .map_err(|_| GraphParseError::InvalidNumber {
            token: token.to_owned(),
            line,
        })
}

/// Parses one edge per line.
///
/// ```text
/// # Comments start with '#'
/// Library Clinic 595.39        # from to weight
/// "Classroom A" Library 438.27 # quotes allow spaces in labels
/// Cafeteria                    # declares an isolated node
/// @ Library 913.067 675.260    # sets a position
/// ```
impl<C> std::convert::TryFrom<&str> for LabeledGraph<C>
where
    C: Cost + FromStr,
{
    type Error = GraphParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut builder = GraphBuilder::<C>::new();

        for (i, line) in s.lines().enumerate() {
            let line_no = i + 1;
            match tokenize(line, line_no)?.as_slice() {
                [] => {}
                ["@", label, x, y] => {
                    let x: f64 = parse_number(x, line_no)?;
                    let y: f64 = parse_number(y, line_no)?;
                    builder.set_position(label, (x, y));
                }
                [label] => {
                    builder.add_node(label);
                }
                [from, to, weight] => {
                    let weight: C = parse_number(weight, line_no)?;
                    builder
                        .add_edge(from, to, weight)
                        .map_err(|e| GraphParseError::Graph { e, line: line_no })?;
                }
                fields => {
                    return Err(GraphParseError::InvalidLine {
                        line: line_no,
                        fields: fields.len(),
                    });
                }
            }
        }

        Ok(builder.build())
    }
}

#[cfg(feature = "json")]
impl<C> LabeledGraph<C>
where
    C: Cost + FromStr,
{
    /// Parses an adjacency map, `{"A": {"B": 1, "C": 4}, "B": {}}`.
    pub fn from_json(s: &str) -> Result<Self, GraphParseError> {
        use serde_json::Value;

        let shape = |reason: String| GraphParseError::JsonShape { reason };

        let root: Value = serde_json::from_str(s).map_err(|e| GraphParseError::Json {
            reason: e.to_string(),
        })?;
        let Value::Object(nodes) = root else {
            return Err(shape("the root must be an object".to_owned()));
        };

        let mut builder = GraphBuilder::<C>::new();
        for (from, neighbours) in &nodes {
            builder.add_node(from);
            let Value::Object(neighbours) = neighbours else {
                return Err(shape(format!("neighbours of {from:?} must be an object")));
            };
            for (to, weight) in neighbours {
                let Value::Number(weight) = weight else {
                    return Err(shape(format!("weight of {from:?} -> {to:?} must be a number")));
                };
                let weight: C = weight.to_string().parse().map_err(|_| {
                    shape(format!("weight {weight} of {from:?} -> {to:?} is out of range"))
                })?;
                builder
                    .add_edge(from, to, weight)
                    .map_err(|e| shape(e.to_string()))?;
            }
        }

        Ok(builder.build())
    }
}

/// Loads a graph file, JSON when the extension says so.
impl<C> std::convert::TryFrom<&std::path::Path> for LabeledGraph<C>
where
    C: Cost + FromStr,
{
    type Error = GraphParseError;

    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        let s = std::fs::read_to_string(p).map_err(|e| GraphParseError::IOError {
            p: p.to_path_buf(),
            e,
        })?;

        #[cfg(feature = "json")]
        if p.extension().is_some_and(|ext| ext == "json") {
            return Self::from_json(&s);
        }

        Self::try_from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    use crate::algorithms::dijkstra::dijkstra;
    use crate::problem::ZeroHeuristic;

    fn abcd() -> LabeledGraph<u32> {
        LabeledGraph::try_from(indoc! {"
            A B 1
            A C 4
            B C 1
            B D 5
            C D 1
            D
        "})
        .unwrap()
    }

    #[test]
    fn finds_cheapest_path() {
        let graph = abcd();
        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_edges(), 5);

        let path = graph.find_path("A", "D", ZeroHeuristic).unwrap().unwrap();
        assert_eq!(graph.labels_of(&path.states), vec!["A", "B", "C", "D"]);
        assert_eq!(path.cost, 3);
        assert!(graph.valid_path(&path));

        let a = graph.node("A").unwrap();
        let d = graph.node("D").unwrap();
        assert_eq!(dijkstra(&graph, a, d).unwrap(), Some(path));
    }

    #[test]
    fn edges_are_directed() {
        let graph = abcd();
        assert_eq!(graph.find_path("D", "A", ZeroHeuristic), Ok(None));
    }

    #[test]
    fn start_is_goal() {
        let graph = abcd();
        let path = graph.find_path("C", "C", ZeroHeuristic).unwrap().unwrap();
        assert_eq!(graph.labels_of(&path.states), vec!["C"]);
        assert!(path.actions.is_empty());
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn unknown_labels() {
        let graph = abcd();
        assert_eq!(
            graph.find_path("A", "Cafeteria", ZeroHeuristic),
            Err(SearchError::NotFound {
                endpoint: Endpoint::Goal,
                node: "\"Cafeteria\"".to_owned()
            })
        );
        assert!(matches!(
            graph.find_path("Cafeteria", "A", ZeroHeuristic),
            Err(SearchError::NotFound {
                endpoint: Endpoint::Start,
                ..
            })
        ));
    }

    #[test]
    fn builder_rejects_bad_weights() {
        let mut builder = GraphBuilder::<EuclideanCost>::new();
        for w in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                builder.add_edge("A", "B", FloatCost::new(w)),
                Err(GraphError::InvalidWeight { .. })
            ));
        }
        assert!(builder.add_edge("A", "B", FloatCost::new(0.0)).is_ok());
        assert!(matches!(
            GraphBuilder::<u32>::new().add_edge("A", "B", u32::MAX),
            Err(GraphError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn repeated_edges_override() {
        let mut builder = GraphBuilder::<u32>::new();
        builder.add_edge("A", "B", 7).unwrap();
        builder.add_edge("A", "C", 1).unwrap();
        builder.add_edge("A", "B", 2).unwrap();
        let graph = builder.build();

        let a = graph.node("A").unwrap();
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(
            graph.edges(a),
            &[(graph.node("B").unwrap(), 2), (graph.node("C").unwrap(), 1)]
        );
    }

    #[test]
    fn total_weight_overflow() {
        // Both routes to D cost more than a u32 can hold.
        let parsed = LabeledGraph::<u32>::try_from(indoc! {"
            A B 3000000000
            B D 3000000000
            A C 4294967294
            C D 2
        "});
        assert!(matches!(
            parsed,
            Err(GraphParseError::Graph {
                e: GraphError::WeightOverflow { .. },
                line: 2
            })
        ));

        // Replacing a weight frees its share of the total.
        let mut builder = GraphBuilder::<u32>::new();
        builder.add_edge("A", "B", u32::MAX - 1).unwrap();
        assert!(matches!(
            builder.add_edge("B", "C", 1),
            Err(GraphError::WeightOverflow { .. })
        ));
        assert_eq!(builder.clone().build().num_nodes(), 2);
        builder.add_edge("A", "B", 1).unwrap();
        builder.add_edge("B", "C", 1).unwrap();
        let graph = builder.build();
        assert_eq!(graph.find_path("A", "C", ZeroHeuristic).unwrap().unwrap().cost, 2);
    }

    #[test]
    fn euclidean_heuristic_needs_long_enough_edges() {
        // A -> G is 1 apart but costs 5; going around through B costs 2.
        let graph = LabeledGraph::<EuclideanCost>::try_from(indoc! {"
            @ A 0 0
            @ B 100 0
            @ G 0 1
            A B 1
            B G 1
            A G 5
        "})
        .unwrap();
        assert!(graph.euclidean_heuristic().is_none());

        let path = graph.find_path("A", "G", ZeroHeuristic).unwrap().unwrap();
        assert_eq!(graph.labels_of(&path.states), vec!["A", "B", "G"]);
        assert_eq!(path.cost, FloatCost::new(2.0));

        let unpositioned = LabeledGraph::<EuclideanCost>::try_from("@ A 0 0\nA B 1").unwrap();
        assert!(unpositioned.euclidean_heuristic().is_none());

        let campus = LabeledGraph::<EuclideanCost>::campus();
        assert!(campus.euclidean_heuristic().is_some());
    }

    #[test]
    fn parses_quotes_comments_and_positions() {
        let graph = LabeledGraph::<EuclideanCost>::try_from(indoc! {r#"
            # Campus
            "Classroom A" Library 438.27   # footpath
            @ "Classroom A" 1337.014 564.125
            Cafeteria
        "#})
        .unwrap();

        let classroom = graph.node("Classroom A").unwrap();
        assert_eq!(graph.label(classroom), Some("Classroom A"));
        assert_eq!(graph.position(classroom), Some(Point::new(1337.014, 564.125)));
        assert_eq!(graph.edges(classroom).len(), 1);
        assert_eq!(graph.position(graph.node("Library").unwrap()), None);
        assert!(graph.node("Cafeteria").is_some());
        assert_eq!(graph.num_nodes(), 3);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            LabeledGraph::<u32>::try_from("A B 1\nA \"B 1"),
            Err(GraphParseError::UnterminatedQuote { line: 2, column: 3 })
        ));
        assert!(matches!(
            LabeledGraph::<u32>::try_from("A B one"),
            Err(GraphParseError::InvalidNumber { line: 1, .. })
        ));
        assert!(matches!(
            LabeledGraph::<u32>::try_from("A B -1"),
            Err(GraphParseError::InvalidNumber { line: 1, .. })
        ));
        assert!(matches!(
            LabeledGraph::<u32>::try_from("\nA B 1 2"),
            Err(GraphParseError::InvalidLine { line: 2, fields: 4 })
        ));
        assert!(matches!(
            LabeledGraph::<EuclideanCost>::try_from("A B -0.5"),
            Err(GraphParseError::Graph {
                e: GraphError::InvalidWeight { .. },
                line: 1
            })
        ));
    }

    #[test]
    fn campus_prefers_the_classroom() {
        let campus = LabeledGraph::<EuclideanCost>::campus();
        assert_eq!(campus.num_nodes(), 4);
        assert_eq!(campus.num_edges(), 8);

        let h = campus.euclidean_heuristic().unwrap();
        let path = campus.find_path("Library", "Main Gate", h).unwrap().unwrap();
        assert_eq!(
            campus.labels_of(&path.states),
            vec!["Library", "Classroom A", "Main Gate"]
        );
        assert!((path.cost.get() - 1265.895).abs() < 1e-3);

        let waypoints = campus.waypoints(&path.states).unwrap();
        assert_eq!(waypoints[0], Point::new(913.067, 675.260));
        assert_eq!(waypoints[2], Point::new(1123.918, -235.594));
    }

    #[test]
    fn euclidean_matches_campus() {
        let campus = LabeledGraph::<EuclideanCost>::campus();
        let rebuilt = LabeledGraph::<EuclideanCost>::euclidean(
            ["Library", "Clinic", "Classroom A", "Main Gate"].map(|label| {
                let id = campus.node(label).unwrap();
                (label, campus.position(id).unwrap())
            }),
            [
                ("Library", "Clinic"),
                ("Library", "Classroom A"),
                ("Clinic", "Main Gate"),
                ("Classroom A", "Main Gate"),
            ],
        )
        .unwrap();

        for label in ["Library", "Clinic", "Classroom A", "Main Gate"] {
            assert_eq!(
                campus.edges(campus.node(label).unwrap()),
                rebuilt.edges(rebuilt.node(label).unwrap())
            );
        }

        assert_eq!(
            LabeledGraph::<EuclideanCost>::euclidean([("A", Point::new(0.0, 0.0))], [("A", "B")])
                .err(),
            Some(GraphError::UnknownNode("B".to_owned()))
        );
        let mut builder = GraphBuilder::<EuclideanCost>::new();
        builder.set_position("A", (0.0, 0.0)).add_node("B");
        assert_eq!(
            builder.add_euclidean_edge("A", "B").err(),
            Some(GraphError::MissingPosition("B".to_owned()))
        );
    }

    #[test]
    fn display() {
        let graph = LabeledGraph::<u32>::try_from("A B 1\n@ A 0 1").unwrap();
        assert_eq!(
            graph.to_string(),
            "LabeledGraph(2 nodes, 1 edges):\n  A @ (0.000, 1.000): B(1)\n  B:\n"
        );
        assert_eq!(format!("{graph:?}"), "LabeledGraph{2 nodes, 1 edges}");
    }

    #[test]
    fn loads_campus_file() {
        let path = std::path::Path::new("data/graphs/campus.txt");
        let campus = LabeledGraph::<EuclideanCost>::try_from(path).unwrap();
        assert_eq!(campus.num_nodes(), 4);
        assert_eq!(campus.num_edges(), 8);

        let path = campus
            .find_path("Library", "Main Gate", campus.euclidean_heuristic().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(
            campus.labels_of(&path.states),
            vec!["Library", "Classroom A", "Main Gate"]
        );

        assert!(matches!(
            LabeledGraph::<u32>::try_from(std::path::Path::new("data/graphs/missing.txt")),
            Err(GraphParseError::IOError { .. })
        ));
    }

    #[cfg(feature = "json")]
    #[test]
    fn loads_json_file() {
        let graph =
            LabeledGraph::<u32>::try_from(std::path::Path::new("data/graphs/abcd.json")).unwrap();
        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_edges(), 5);
    }

    #[cfg(feature = "json")]
    #[test]
    fn parses_json_adjacency() {
        let graph = LabeledGraph::<u32>::from_json(
            r#"{"A": {"B": 1, "C": 4}, "B": {"C": 1, "D": 5}, "C": {"D": 1}, "D": {}}"#,
        )
        .unwrap();
        let path = graph.find_path("A", "D", ZeroHeuristic).unwrap().unwrap();
        assert_eq!(graph.labels_of(&path.states), vec!["A", "B", "C", "D"]);
        assert_eq!(path.cost, 3);

        assert!(matches!(
            LabeledGraph::<u32>::from_json("[1]"),
            Err(GraphParseError::JsonShape { .. })
        ));
        assert!(matches!(
            LabeledGraph::<u32>::from_json(r#"{"A": {"B": "far"}}"#),
            Err(GraphParseError::JsonShape { .. })
        ));
        assert!(matches!(
            LabeledGraph::<u32>::from_json(r#"{"A": {"B": -1}}"#),
            Err(GraphParseError::JsonShape { .. })
        ));
        assert!(matches!(
            LabeledGraph::<u32>::from_json("{"),
            Err(GraphParseError::Json { .. })
        ));
    }
}
