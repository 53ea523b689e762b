use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use anstream::eprintln;
use anstream::print;
use anstream::println;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use owo_colors::OwoColorize;
use thiserror::Error;

use pathsearch::algorithms::astar::AStarSearch;
use pathsearch::algorithms::dijkstra::DijkstraSearch;
use pathsearch::problem::Heuristic;
use pathsearch::problem::Problem;
use pathsearch::problem::Query;
use pathsearch::problem::SearchError;
use pathsearch::problem::ZeroHeuristic;
use pathsearch::problems::graph::EuclideanCost;
use pathsearch::problems::graph::GraphParseError;
use pathsearch::problems::graph::LabeledGraph;
use pathsearch::problems::graph::NodeId;
use pathsearch::problems::grid::GridParseError;
use pathsearch::problems::grid::GridProblem;
use pathsearch::problems::grid::GridState;
use pathsearch::problems::grid::ManhattanHeuristic;
use pathsearch::space::Action;
use pathsearch::space::Cost;
use pathsearch::space::Path as SearchPath;
use pathsearch::space::Space;
use pathsearch::space::State;
use pathsearch::walk::Point;
use pathsearch::walk::Walker;

#[cfg(feature = "mem_profile")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;
#[cfg(all(not(feature = "mem_profile"), not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Finds cheapest paths on labeled graphs and grids
#[derive(Parser, Debug)]
#[clap(long_version = pathsearch::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Org-mode log of the run
    #[arg(short, long, global = true, env = "PATHSEARCH_LOG")]
    pub output: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = HeuristicChoice::Default)]
    pub heuristic: HeuristicChoice,

    #[arg(long, global = true, value_enum, default_value_t = Algorithm::Astar)]
    pub algorithm: Algorithm,

    /// Prints the positions of a marker walking the path
    #[arg(long, global = true)]
    pub walk: bool,

    /// Distance walked per axis on each step
    #[arg(long, global = true, default_value_t = 1.0)]
    pub step: f64,

    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Searches a graph file (`from to weight` lines, or JSON adjacency)
    Graph {
        file: PathBuf,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Searches a grid drawn with text (`#`, `.`, `S`, `G`) or an image
    Grid { file: PathBuf },
    /// Searches the built-in campus map
    Campus {
        #[arg(long, default_value = "Library")]
        from: String,
        #[arg(long, default_value = "Main Gate")]
        to: String,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum HeuristicChoice {
    /// No estimate at all
    Zero,
    /// Euclidean distance on graphs, Manhattan distance on grids
    Default,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    Astar,
    Dijkstra,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Graph(#[from] GraphParseError),
    #[error(transparent)]
    Grid(#[from] GridParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Solves a single query, logging the searcher's state.
fn solve<Sp, St, A, C, H>(
    out: &mut dyn Write,
    space: &Sp,
    start: St,
    goal: St,
    heuristic: H,
    algorithm: Algorithm,
) -> Result<Option<SearchPath<St, A, C>>, CliError>
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
    H: Heuristic<St, C>,
{
    let problem = Query::new(space, start, goal);
    writeln!(out, "** Problem\n#+begin_src ron\n{problem:?}\n#+end_src")?;

    let path = match algorithm {
        Algorithm::Astar => {
            let mut search = AStarSearch::<_, _, Sp, St, A, C>::new(problem, heuristic)?;
            let path = search.find_path();
            writeln!(out, "** A* data\n#+begin_src ron\n{search:?}\n#+end_src")?;
            writeln!(out, "#+begin_example")?;
            search.write_memory_stats(&mut *out)?;
            writeln!(out, "#+end_example")?;
            path
        }
        Algorithm::Dijkstra => {
            let mut search = DijkstraSearch::<_, Sp, St, A, C>::new(problem)?;
            let path = search.find_path();
            writeln!(out, "** Dijkstra data\n#+begin_src ron\n{search:?}\n#+end_src")?;
            path
        }
    };

    match &path {
        Some(path) => writeln!(out, "** Path\n{path}")?,
        None => writeln!(out, "** Path\nNone")?,
    }
    Ok(path)
}

fn walk(waypoints: Vec<Point>, step: f64) {
    let Some(walker) = Walker::new(waypoints, step) else {
        log::warn!("Can't walk with a step of {step}");
        return;
    };
    let start = walker.position();
    println!("{} {start}", "walk".dimmed());
    for p in walker {
        println!("{} {p}", "walk".dimmed());
    }
}

fn solve_graph(
    out: &mut dyn Write,
    args: &Args,
    graph: &LabeledGraph<EuclideanCost>,
    from: &str,
    to: &str,
) -> Result<bool, CliError> {
    use pathsearch::problem::Endpoint;

    writeln!(out, "* Graph\n#+begin_example\n{graph}#+end_example")?;
    let start: NodeId = graph
        .node(from)
        .ok_or_else(|| SearchError::not_found(Endpoint::Start, from))?;
    let goal: NodeId = graph
        .node(to)
        .ok_or_else(|| SearchError::not_found(Endpoint::Goal, to))?;

    let path = match args.heuristic {
        HeuristicChoice::Zero => solve(out, graph, start, goal, ZeroHeuristic, args.algorithm)?,
        HeuristicChoice::Default => match graph.euclidean_heuristic() {
            Some(h) => solve(out, graph, start, goal, h, args.algorithm)?,
            None => {
                log::warn!(
                    "Edge weights undercut straight-line distances, searching without a heuristic"
                );
                solve(out, graph, start, goal, ZeroHeuristic, args.algorithm)?
            }
        },
    };
    let Some(path) = path else {
        println!("{} from {from:?} to {to:?}", "No path".red().bold());
        return Ok(false);
    };

    let labels = graph.labels_of(&path.states).join(" → ");
    println!("{} {}", "Path".green().bold(), labels);
    println!("{} {:.3}", "Cost".green().bold(), path.cost.get());

    if args.walk {
        match graph.waypoints(&path.states) {
            Some(waypoints) => walk(waypoints, args.step),
            None => log::warn!("Some nodes on the path have no position, not walking it"),
        }
    }
    Ok(true)
}

fn load_grid(p: &Path) -> Result<GridProblem, CliError> {
    let is_text = p
        .extension()
        .is_none_or(|ext| ext == "txt" || ext == "grid");
    if !is_text {
        return Ok(GridProblem::try_from(p)?);
    }
    let s = std::fs::read_to_string(p)?;
    Ok(GridProblem::try_from(s.as_str())?)
}

fn solve_grid(out: &mut dyn Write, args: &Args, problem: &GridProblem) -> Result<bool, CliError> {
    writeln!(out, "* Grid\n#+begin_quote\n{problem}#+end_quote")?;

    let (start, goal): (GridState, GridState) = (*problem.start(), *problem.goal());
    let space = problem.space();
    let path = match args.heuristic {
        HeuristicChoice::Zero => solve(out, space, start, goal, ZeroHeuristic, args.algorithm)?,
        HeuristicChoice::Default => {
            solve(out, space, start, goal, ManhattanHeuristic, args.algorithm)?
        }
    };
    let Some(path) = path else {
        println!("{} from {start} to {goal}", "No path".red().bold());
        return Ok(false);
    };

    print!("{}", problem.render_path(&path));
    println!("{} {}", "Cost".green().bold(), path.cost);

    if args.walk {
        let waypoints = path
            .states
            .iter()
            .map(|s| Point::new(s.x() as f64, s.y() as f64))
            .collect();
        walk(waypoints, args.step);
    }
    Ok(true)
}

fn run(args: &Args) -> Result<bool, CliError> {
    let mut out: Box<dyn Write> = match &args.output {
        Some(p) => {
            println!("Logging to {:?}", p.yellow());
            Box::new(BufWriter::new(File::create(p)?))
        }
        None => Box::new(std::io::sink()),
    };
    writeln!(out, ":PROPERTIES:")?;
    writeln!(out, ":VERSION: {:?}", pathsearch::build::PKG_VERSION)?;
    writeln!(out, ":END:")?;
    writeln!(out, "#+title: pathsearch run")?;

    let found = match &args.command {
        Command::Graph { file, from, to } => {
            let graph = LabeledGraph::<EuclideanCost>::try_from(file.as_path())?;
            log::info!("Loaded {file:?}: {graph:?}");
            solve_graph(&mut out, args, &graph, from, to)?
        }
        Command::Grid { file } => {
            let problem = load_grid(file)?;
            log::info!("Loaded {file:?}: {:?}", problem.space());
            solve_grid(&mut out, args, &problem)?
        }
        Command::Campus { from, to } => {
            let campus = LabeledGraph::<EuclideanCost>::campus();
            solve_graph(&mut out, args, &campus, from, to)?
        }
    };

    out.flush()?;
    Ok(found)
}

fn main() -> ExitCode {
    #[cfg(feature = "mem_profile")]
    let _profiler = dhat::Profiler::new_heap();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    args.color.write_global();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}
