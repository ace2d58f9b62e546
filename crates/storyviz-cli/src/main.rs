//! Storyviz CLI - render, validate, and inspect scenes headlessly.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use storyviz::widgets::coverage_tree::NodePath;
use storyviz::widgets::CoverageTree;
use storyviz::{Scene, Size};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "storyviz")]
#[command(about = "Render and check coverage-tree scenes")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which nodes to open before rendering or inspecting.
#[derive(clap::Args, Debug, Default)]
struct Expansion {
    /// Expand the node at PATH (e.g. `0/2`); repeatable, applied in order
    #[arg(long = "expand", value_name = "PATH")]
    paths: Vec<String>,

    /// Expand every node
    #[arg(long)]
    expand_all: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene manifest or tree dataset to SVG
    Render {
        /// `*.scene.yaml` manifest or `.json` dataset
        input: PathBuf,

        /// Container width in pixels
        #[arg(long, default_value = "1024")]
        width: f32,

        /// Container height in pixels (a manifest height takes precedence)
        #[arg(long, default_value = "600")]
        height: f32,

        #[command(flatten)]
        expansion: Expansion,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check manifests and the datasets they name
    Validate {
        /// Manifests to check
        #[arg(required = true)]
        manifests: Vec<PathBuf>,
    },

    /// List the visible nodes with their paths, tags, and depth
    Inspect {
        /// `*.scene.yaml` manifest or `.json` dataset
        input: PathBuf,

        #[command(flatten)]
        expansion: Expansion,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Render {
            input,
            width,
            height,
            expansion,
            output,
        } => {
            let svg = render(&input, Size::new(width, height), &expansion)?;
            match output {
                Some(path) => {
                    fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?;
                    eprintln!("wrote {}", path.display());
                }
                None => println!("{svg}"),
            }
            Ok(())
        }
        Commands::Validate { manifests } => validate(&manifests),
        Commands::Inspect { input, expansion } => {
            print!("{}", inspect(&input, &expansion)?);
            Ok(())
        }
    }
}

fn load(input: &Path) -> Result<Scene> {
    Scene::load(input).with_context(|| format!("loading {}", input.display()))
}

/// Open the requested nodes. Paths already expanded stay expanded.
fn apply_expansion(tree: &mut CoverageTree, expansion: &Expansion) -> Result<()> {
    if expansion.expand_all {
        tree.expand_all();
    }
    for text in &expansion.paths {
        let path: NodePath = text
            .parse()
            .with_context(|| format!("invalid node path '{text}'"))?;
        let Some(id) = tree.index().find(&path) else {
            bail!("no node at path {path}");
        };
        if tree.expansion().is_expanded(id) {
            continue;
        }
        let outcome = tree.toggle(id);
        if !outcome.changed() {
            warn!(%path, ?outcome, "node cannot be expanded");
        }
    }
    Ok(())
}

fn render(input: &Path, container: Size, expansion: &Expansion) -> Result<String> {
    let scene = load(input)?;
    let mut tree = scene.widget();
    tree.set_container_size(container);
    apply_expansion(&mut tree, expansion)?;
    debug!(
        visible = tree.visible().len(),
        width = tree.size().width,
        height = tree.size().height,
        "rendering scene"
    );
    Ok(tree.to_svg())
}

fn validate(manifests: &[PathBuf]) -> Result<()> {
    let mut failures = 0usize;
    for path in manifests {
        match Scene::load(path) {
            Ok(scene) => println!(
                "ok    {} ({} nodes)",
                path.display(),
                scene.tree().node_count()
            ),
            Err(e) => {
                warn!(manifest = %path.display(), error = %e, "invalid scene");
                println!("FAIL  {}: {e}", path.display());
                failures += 1;
            }
        }
    }
    if failures > 0 {
        bail!("{failures} of {} scenes failed validation", manifests.len());
    }
    Ok(())
}

fn inspect(input: &Path, expansion: &Expansion) -> Result<String> {
    let scene = load(input)?;
    let mut tree = scene.widget();
    apply_expansion(&mut tree, expansion)?;

    let index = tree.index();
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:>5}  {:<12} LABEL", "PATH", "DEPTH", "TAG");
    for &id in tree.visible().ids() {
        let Some(node) = index.get(id) else {
            continue;
        };
        let marker = match (node.has_children(), tree.expansion().is_expanded(id)) {
            (false, _) => ' ',
            (true, true) => '-',
            (true, false) => '+',
        };
        let _ = writeln!(
            out,
            "{:<10} {:>5}  {:<12} {}{marker} {}",
            index.path_of(id).to_string(),
            node.depth,
            node.tag.as_str(),
            "  ".repeat(node.depth),
            node.label
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn scene(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../scenes")
            .join(name)
    }

    fn expand(paths: &[&str]) -> Expansion {
        Expansion {
            paths: paths.iter().map(ToString::to_string).collect(),
            expand_all: false,
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_args() {
        let cli = Cli::try_parse_from([
            "storyviz", "render", "a.scene.yaml", "--expand", "0/1", "--expand", "0/1/0",
            "--width", "800", "-o", "out.svg",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                width,
                expansion,
                output,
                ..
            } => {
                assert_eq!(width, 800.0);
                assert_eq!(expansion.paths, ["0/1", "0/1/0"]);
                assert_eq!(output, Some(PathBuf::from("out.svg")));
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_validate_requires_a_manifest() {
        assert!(Cli::try_parse_from(["storyviz", "validate"]).is_err());
    }

    #[test]
    fn test_render_with_expansion() {
        let collapsed = render(
            &scene("scene13-limitations.scene.yaml"),
            Size::new(900.0, 460.0),
            &Expansion::default(),
        )
        .unwrap();
        let expanded = render(
            &scene("scene13-limitations.scene.yaml"),
            Size::new(900.0, 460.0),
            &expand(&["0/0"]),
        )
        .unwrap();
        assert!(!collapsed.contains("Visit, not"));
        assert!(expanded.contains("Visit, not"));
    }

    #[test]
    fn test_expand_is_idempotent() {
        let listing = inspect(
            &scene("scene10-respiratory.scene.yaml"),
            &expand(&["0/0", "0/0"]),
        )
        .unwrap();
        assert!(listing.contains("Children under 15"));
    }

    #[test]
    fn test_bad_expand_path() {
        let err = render(
            &scene("scene10-respiratory.scene.yaml"),
            Size::new(900.0, 460.0),
            &expand(&["0/9"]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("no node at path 0/9"));

        let err = inspect(&scene("scene10-respiratory.scene.yaml"), &expand(&["x/y"])).unwrap_err();
        assert!(err.to_string().contains("invalid node path"));
    }

    #[test]
    fn test_inspect_lists_visible_nodes() {
        let listing = inspect(&scene("scene07-data-coverage.scene.yaml"), &Expansion::default()).unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        // Header, root, four categories.
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("0 "));
        assert!(lines[1].contains("root"));
        assert!(lines[2].starts_with("0/0"));
        assert!(lines[2].contains("+ Patient Demographics"));
    }

    #[test]
    fn test_validate_shipped_scenes() {
        let manifests = [
            scene("scene07-data-coverage.scene.yaml"),
            scene("scene10-respiratory.scene.yaml"),
            scene("scene13-limitations.scene.yaml"),
        ];
        assert!(validate(&manifests).is_ok());
        assert!(validate(&[scene("missing.scene.yaml")]).is_err());
    }
}
