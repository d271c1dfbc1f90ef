use std::path::PathBuf;

use anyhow::{Context, bail};
use catalog::InMemoryPreferenceStore;
use clap::{Args, Parser, Subcommand};
use formats::export::DEFAULT_EXPORT_FILE_NAME;
use formats::package::{DatasetDir, LoadOutcome};
use foundation::geo::MapView;
use foundation::ids::{EntityKind, EntityRef};
use foundation::time::YearRange;
use layers::{RecordingSurface, RenderCoordinator};
use scene::filter::{FilterState, compute_visible};
use scene::search::SearchIndex;
use scene::store::DataStore;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::{App, ViewerConfig, deeplink};

#[derive(Debug, Parser)]
#[command(name = "journeys", about = "Inspect and query a missionary-journeys dataset")]
struct Cli {
    /// Directory holding the seven JSON resources. Defaults to
    /// `JOURNEYS_DATA_DIR`, then `./data`.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record counts and load failures.
    Inspect,
    /// Visible events, places and drawn routes under a filter.
    Filter(FilterArgs),
    /// Ranked search hits.
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Steps of a tour with their highlights resolved.
    Tour { tour_id: String },
    /// Encode or decode a deep-link fragment.
    #[command(subcommand)]
    Link(LinkCommand),
    /// Write the export snapshot.
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct FilterArgs {
    #[arg(long)]
    from: Option<i32>,
    #[arg(long)]
    to: Option<i32>,
    /// Restrict to events involving any of these people.
    #[arg(long = "person")]
    people: Vec<String>,
    /// Event types to show. Defaults to every type in the dataset.
    #[arg(long = "type")]
    types: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum LinkCommand {
    Encode {
        #[arg(long)]
        kind: Option<EntityKind>,
        #[arg(long)]
        id: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long)]
        zoom: u8,
    },
    Decode { fragment: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    let config = ViewerConfig::from_env();
    let data_dir = DatasetDir::new(cli.data.clone().unwrap_or_else(|| config.data_dir.clone()));

    match cli.command {
        Command::Inspect => print_json(&inspect(&data_dir, &load(&data_dir)?)),
        Command::Filter(args) => {
            let store = DataStore::new(load(&data_dir)?.dataset);
            print_json(&filter_report(&store, &config, &args)?)
        }
        Command::Search { query, limit } => {
            let store = DataStore::new(load(&data_dir)?.dataset);
            let index = SearchIndex::new(&store).with_limit(limit.unwrap_or(config.search_max_results));
            print_json(&index.search(&query).into_iter().map(HitRow::from).collect::<Vec<_>>())
        }
        Command::Tour { tour_id } => {
            let store = DataStore::new(load(&data_dir)?.dataset);
            print_json(&tour_report(&store, &tour_id)?)
        }
        Command::Link(LinkCommand::Encode {
            kind,
            id,
            lat,
            lng,
            zoom,
        }) => {
            let selection = match (kind, id) {
                (Some(kind), Some(id)) => Some(EntityRef::new(kind, id)),
                (None, None) => None,
                _ => bail!("--kind and --id go together"),
            };
            println!("{}", deeplink::encode(selection.as_ref(), MapView::new(lat, lng, zoom)));
            Ok(())
        }
        Command::Link(LinkCommand::Decode { fragment }) => print_json(&LinkRow::from(deeplink::decode(&fragment))),
        Command::Export { out } => {
            let outcome = load(&data_dir)?;
            let surface = RecordingSurface::new(config.initial_view);
            let app = App::start(config, outcome, surface, InMemoryPreferenceStore::new(), None);
            let out = out.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE_NAME));
            app.export_snapshot()
                .write_to(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            eprintln!("wrote {}", out.display());
            Ok(())
        }
    }
}

fn load(dir: &DatasetDir) -> anyhow::Result<LoadOutcome> {
    if !dir.root().is_dir() {
        bail!("data directory {} does not exist", dir.root().display());
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("starting runtime")?;
    let outcome = runtime.block_on(dir.load_async());
    info!(root = %dir.root().display(), failures = outcome.failures.len(), "dataset loaded");
    Ok(outcome)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("json")?);
    Ok(())
}

#[derive(Debug, Serialize)]
struct InspectReport {
    root: String,
    counts: Vec<(String, usize)>,
    failures: Vec<String>,
    duplicate_ids_dropped: usize,
}

fn inspect(dir: &DatasetDir, outcome: &LoadOutcome) -> InspectReport {
    let d = &outcome.dataset;
    let raw = [
        ("places", d.places.len()),
        ("people", d.people.len()),
        ("events", d.events.len()),
        ("passages", d.passages.len()),
        ("journeys", d.journeys.len()),
        ("routes", d.routes.len()),
        ("tours", d.tours.len()),
    ];
    let store = DataStore::new(d.clone());
    let kept = [
        store.places.len(),
        store.people.len(),
        store.events.len(),
        store.passages.len(),
        store.journeys.len(),
        store.routes.len(),
        store.tours.len(),
    ];
    InspectReport {
        root: dir.root().display().to_string(),
        counts: raw.iter().zip(kept).map(|((name, _), n)| (name.to_string(), n)).collect(),
        failures: outcome.failures.iter().map(|f| f.to_string()).collect(),
        duplicate_ids_dropped: raw.iter().zip(kept).map(|((_, total), n)| total - n).sum(),
    }
}

#[derive(Debug, Serialize)]
struct FilterReport {
    timeline: YearRange,
    events: Vec<String>,
    places: Vec<String>,
    routes: Vec<RouteRow>,
}

#[derive(Debug, Serialize)]
struct RouteRow {
    journey: String,
    color: String,
    points: usize,
}

fn filter_window(config: &ViewerConfig, args: &FilterArgs) -> anyhow::Result<YearRange> {
    let window = match (args.from, args.to) {
        (None, None) => config.timeline,
        (Some(from), None) => YearRange::starting_at(from, config.timeline_window_years),
        (None, Some(to)) => YearRange::new(config.timeline.start, to),
        (Some(from), Some(to)) => YearRange::new(from, to),
    };
    if window.start > window.end {
        bail!("--from {} is after --to {}", window.start, window.end);
    }
    Ok(window)
}

fn filter_report(store: &DataStore, config: &ViewerConfig, args: &FilterArgs) -> anyhow::Result<FilterReport> {
    let mut filter = FilterState::for_store(store, filter_window(config, args)?);
    for person in &args.people {
        filter.set_person(person, true);
    }
    if !args.types.is_empty() {
        filter.event_types = args.types.iter().cloned().collect();
    }

    let visible = compute_visible(store.events.as_slice(), &store.places, &filter);
    let mut surface = RecordingSurface::new(config.initial_view);
    RenderCoordinator::new().render(&mut surface, store, &filter);

    Ok(FilterReport {
        timeline: filter.timeline,
        events: visible.events.iter().map(|e| e.id.clone()).collect(),
        places: visible.places_in(&store.places).map(|p| p.id.clone()).collect(),
        routes: surface
            .polylines()
            .map(|p| RouteRow {
                journey: p.target.id.clone(),
                color: p.style.color.to_string(),
                points: p.points.len(),
            })
            .collect(),
    })
}

#[derive(Debug, Serialize)]
struct HitRow {
    kind: EntityKind,
    id: String,
    title: String,
    subtitle: String,
}

impl From<scene::search::SearchHit> for HitRow {
    fn from(hit: scene::search::SearchHit) -> Self {
        Self {
            kind: hit.target.kind,
            id: hit.target.id,
            title: hit.title,
            subtitle: hit.subtitle,
        }
    }
}

#[derive(Debug, Serialize)]
struct TourReport {
    id: String,
    title: String,
    steps: Vec<StepRow>,
}

#[derive(Debug, Serialize)]
struct StepRow {
    step: String,
    view: MapView,
    note: String,
    highlights: Vec<String>,
    unresolved: Vec<String>,
}

fn tour_report(store: &DataStore, tour_id: &str) -> anyhow::Result<TourReport> {
    let Some(tour) = store.tours.get(tour_id) else {
        bail!("no tour with id {tour_id}");
    };
    let total = tour.steps.len();
    let steps = tour
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let (highlights, unresolved): (Vec<String>, Vec<String>) = step
                .highlights
                .iter()
                .cloned()
                .partition(|id| store.places.contains(id));
            StepRow {
                step: format!("Step {} of {}", i + 1, total),
                view: step.view.into(),
                note: step.note.clone(),
                highlights,
                unresolved,
            }
        })
        .collect();
    Ok(TourReport {
        id: tour.id.clone(),
        title: tour.title.clone(),
        steps,
    })
}

#[derive(Debug, Serialize)]
struct LinkRow {
    selection: Option<EntityRef>,
    lat: Option<f64>,
    lng: Option<f64>,
    zoom: Option<u8>,
}

impl From<deeplink::DeepLink> for LinkRow {
    fn from(link: deeplink::DeepLink) -> Self {
        Self {
            selection: link.selection,
            lat: link.lat,
            lng: link.lng,
            zoom: link.zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{Cli, Command, FilterArgs, LinkCommand, filter_report, filter_window, inspect, tour_report};
    use clap::Parser;
    use formats::package::DatasetDir;
    use foundation::ids::EntityKind;
    use foundation::time::YearRange;
    use pretty_assertions::assert_eq;
    use scene::store::DataStore;
    use viewer::ViewerConfig;

    fn data_dir() -> DatasetDir {
        DatasetDir::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../apps/viewer/assets/data"))
    }

    fn args(from: Option<i32>, to: Option<i32>) -> FilterArgs {
        FilterArgs {
            from,
            to,
            people: Vec::new(),
            types: Vec::new(),
        }
    }

    #[test]
    fn parses_filter_flags() {
        let cli = Cli::try_parse_from([
            "journeys", "--data", "x", "filter", "--from", "44", "--person", "person.paul", "--type", "preaching",
            "--type", "miracle",
        ])
        .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("x")));
        let Command::Filter(f) = cli.command else {
            panic!("expected filter");
        };
        assert_eq!(f.from, Some(44));
        assert_eq!(f.people, vec!["person.paul"]);
        assert_eq!(f.types, vec!["preaching", "miracle"]);
    }

    #[test]
    fn parses_link_encode() {
        let cli = Cli::try_parse_from([
            "journeys", "link", "encode", "--kind", "place", "--id", "place.rome", "--lat", "-41.9", "--lng", "12.5",
            "--zoom", "7",
        ])
        .unwrap();
        let Command::Link(LinkCommand::Encode { kind, lat, .. }) = cli.command else {
            panic!("expected link encode");
        };
        assert_eq!(kind, Some(EntityKind::Place));
        assert_eq!(lat, -41.9);
    }

    #[test]
    fn window_from_flags() {
        let config = ViewerConfig::default();
        assert_eq!(filter_window(&config, &args(None, None)).unwrap(), YearRange::new(30, 70));
        assert_eq!(filter_window(&config, &args(Some(46), None)).unwrap(), YearRange::new(46, 56));
        assert!(filter_window(&config, &args(Some(60), Some(50))).is_err());
    }

    #[test]
    fn filter_report_lists_visible_items() {
        let store = DataStore::new(data_dir().load().dataset);
        let mut a = args(Some(44), Some(49));
        a.types = vec!["preaching".into()];
        let report = filter_report(&store, &ViewerConfig::default(), &a).unwrap();
        assert_eq!(report.events, vec!["event.salamis-synagogue", "event.pisidian-sermon"]);
        assert_eq!(report.places, vec!["place.salamis", "place.antioch-pisidia"]);
        let journeys: Vec<&str> = report.routes.iter().map(|r| r.journey.as_str()).collect();
        assert_eq!(journeys, vec!["journey.1", "journey.2"]);
    }

    #[test]
    fn tour_report_splits_unresolved_highlights() {
        let store = DataStore::new(data_dir().load().dataset);
        let report = tour_report(&store, "tour.rome").unwrap();
        assert_eq!(report.steps.len(), 3);
        assert_eq!(report.steps[1].unresolved, vec!["place.fair-havens"]);
        assert!(report.steps[1].highlights.is_empty());
        assert!(tour_report(&store, "tour.none").is_err());
    }

    #[test]
    fn inspect_counts_every_resource() {
        let dir = data_dir();
        let report = inspect(&dir, &dir.load());
        assert_eq!(report.counts[0], ("places".to_string(), 21));
        assert!(report.failures.is_empty());
        assert_eq!(report.duplicate_ids_dropped, 0);
    }
}
