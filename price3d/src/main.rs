//! `price3d` - weight and cost estimates for STL, OBJ and 3MF files.
//!
//! # Usage
//!
//! ```text
//! price3d bracket.stl lid.3mf --material petg --infill 20 --price-per-kg 25
//! price3d parts/*.obj --json
//! price3d part.stl --params settings.json --preview-dir previews/
//! ```
//!
//! Exits with status 1 if any file could not be loaded.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use price3d::estimate::{Material, PrintParams};
use price3d::job::{BackgroundLoader, EntryId, JobBoard, LoaderConfig};
use price3d::preview::PreviewOptions;
use price3d::report::{render_table, ReportRow};
use tracing::{debug, info, Level};

/// Estimate filament weight and price for 3D-printable parts
#[derive(Parser, Debug)]
#[command(name = "price3d")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Mesh files to estimate (.stl, .obj, .3mf)
    #[arg(name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// JSON file with print parameters; flags override its values
    #[arg(long, value_name = "JSON")]
    params: Option<PathBuf>,

    /// Number of copies of each part
    #[arg(long)]
    amount: Option<u32>,

    /// Infill density in percent
    #[arg(long)]
    infill: Option<f64>,

    /// Number of perimeter walls
    #[arg(long)]
    walls: Option<u32>,

    /// Nozzle diameter in mm
    #[arg(long)]
    nozzle: Option<f64>,

    /// Material preset (pla, petg, abs, asa, tpu, nylon, pc, custom)
    #[arg(long)]
    material: Option<Material>,

    /// Material density in g/cm³; overrides the material preset
    #[arg(long)]
    density: Option<f64>,

    /// Filament price per kilogram
    #[arg(long)]
    price_per_kg: Option<f64>,

    /// Print a JSON array instead of a table
    #[arg(long)]
    json: bool,

    /// Group thousands in table output
    #[arg(long)]
    group: bool,

    /// Write a PNG preview per part into this directory
    #[arg(long, value_name = "DIR")]
    preview_dir: Option<PathBuf>,

    /// Preview width and height in pixels
    #[arg(long, default_value_t = 512)]
    preview_size: u32,

    /// Loader threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Defaults, then the `--params` file, then individual flags.
    fn print_params(&self) -> Result<PrintParams> {
        let mut params = match &self.params {
            Some(path) => read_params(path)?,
            None => PrintParams::default(),
        };

        if let Some(material) = self.material {
            params = params.with_material(material);
        }
        if let Some(density) = self.density {
            params = params.with_density(density);
        }
        if let Some(amount) = self.amount {
            params = params.with_amount(amount);
        }
        if let Some(infill) = self.infill {
            params = params.with_infill_percent(infill);
        }
        if let Some(walls) = self.walls {
            params = params.with_wall_count(walls);
        }
        if let Some(nozzle) = self.nozzle {
            params = params.with_nozzle_diameter(nozzle);
        }
        if let Some(price) = self.price_per_kg {
            params = params.with_price_per_kg(price);
        }
        Ok(params)
    }

    fn loader_config(&self) -> LoaderConfig {
        if self.preview_dir.is_some() {
            LoaderConfig::default().with_preview(
                PreviewOptions::default().with_size(self.preview_size, self.preview_size),
            )
        } else {
            LoaderConfig::default().without_preview()
        }
    }
}

fn read_params(path: &Path) -> Result<PrintParams> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameters from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid parameters in {}", path.display()))
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// `<stem>.png` per file; stems shared by several inputs get `-<id>` appended.
fn preview_names(files: &[(EntryId, PathBuf)]) -> Vec<String> {
    let stems: Vec<String> = files
        .iter()
        .map(|(id, path)| {
            path.file_stem().map_or_else(
                || format!("part-{}", id.0),
                |s| s.to_string_lossy().into_owned(),
            )
        })
        .collect();

    stems
        .iter()
        .zip(files)
        .map(|(stem, (id, _))| {
            if stems.iter().filter(|other| *other == stem).count() > 1 {
                format!("{stem}-{}.png", id.0)
            } else {
                format!("{stem}.png")
            }
        })
        .collect()
}

fn write_previews(board: &JobBoard, files: &[(EntryId, PathBuf)], dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create preview directory {}", dir.display()))?;

    for ((id, _), name) in files.iter().zip(preview_names(files)) {
        let Some(png) = board.get(*id).and_then(|e| e.ready()).and_then(|p| p.preview.as_ref())
        else {
            continue;
        };
        let out = dir.join(name);
        std::fs::write(&out, png)
            .with_context(|| format!("Failed to write preview {}", out.display()))?;
        debug!(path = %out.display(), "Wrote preview");
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<bool> {
    let params = cli.print_params()?;
    debug!(?params, "Print parameters");

    let mut loader = BackgroundLoader::with_config(cli.threads, cli.loader_config())
        .context("Failed to start loader")?;
    let mut board = JobBoard::with_defaults(params);

    let mut files = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path.display().to_string();
        let id = board.import(name.clone());
        loader.submit(id, name, bytes);
        files.push((id, path.clone()));
    }
    info!(files = files.len(), threads = loader.num_threads(), "Loading");

    for done in loader.wait_all() {
        board.complete(done.id, done.outcome);
    }

    if let Some(dir) = &cli.preview_dir {
        write_previews(&board, &files, dir)?;
    }

    let rows = ReportRow::collect(&board);
    if cli.json {
        let json = serde_json::to_string_pretty(&rows).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        print!("{}", render_table(&rows, &board.totals(), cli.group));
    }

    Ok(board.totals().failed == 0)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let all_loaded = run(&cli)?;
    Ok(if all_loaded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("price3d").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn files_are_required() {
        assert!(Cli::try_parse_from(["price3d"]).is_err());
    }

    #[test]
    fn defaults_without_flags() {
        let cli = parse(&["cube.stl"]);
        assert_eq!(cli.print_params().unwrap(), PrintParams::default());
        assert_eq!(cli.log_level(), Level::WARN);
        assert!(cli.loader_config().preview.is_none());
    }

    #[test]
    fn flags_override_material_density() {
        let cli = parse(&[
            "a.stl", "--material", "petg", "--density", "1.5", "--walls", "3", "--amount", "2",
        ]);
        let params = cli.print_params().unwrap();
        assert!((params.density - 1.5).abs() < f64::EPSILON);
        assert_eq!(params.wall_count, 3);
        assert_eq!(params.amount, 2);

        let cli = parse(&["a.stl", "--material", "abs"]);
        assert!((cli.print_params().unwrap().density - 1.04).abs() < f64::EPSILON);
    }

    #[test]
    fn params_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"infill": 40, "pricePerKg": 30, "walls": 1}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&["a.stl", "--params", &path, "--walls", "4"]);
        let params = cli.print_params().unwrap();
        assert!((params.infill_percent - 40.0).abs() < f64::EPSILON);
        assert!((params.price_per_kg - 30.0).abs() < f64::EPSILON);
        assert_eq!(params.wall_count, 4);
        assert_eq!(params.amount, 1);
    }

    #[test]
    fn bad_params_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert!(parse(&["a.stl", "--params", &path]).print_params().is_err());
    }

    #[test]
    fn verbosity() {
        assert_eq!(parse(&["a.stl", "-vv"]).log_level(), Level::DEBUG);
        assert_eq!(parse(&["a.stl", "-q"]).log_level(), Level::ERROR);
        assert!(Cli::try_parse_from(["price3d", "a.stl", "-q", "-v"]).is_err());
    }

    #[test]
    fn preview_names_split_shared_stems() {
        let files = [
            (EntryId(0), PathBuf::from("a/part.stl")),
            (EntryId(1), PathBuf::from("b/part.obj")),
            (EntryId(2), PathBuf::from("lid.3mf")),
        ];
        assert_eq!(preview_names(&files), ["part-0.png", "part-1.png", "lid.png"]);
    }

    #[test]
    fn previews_for_same_stem_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = JobBoard::new();
        let config = LoaderConfig::default().with_preview(PreviewOptions::thumbnail());
        let tetra = b"v 0 0 0\nv 10 0 0\nv 0 10 0\nv 0 0 10\nf 1 3 2\nf 1 2 4\nf 1 4 3\nf 2 3 4\n";

        let mut files = Vec::new();
        for path in ["a/part.obj", "b/part.obj"] {
            let id = board.import(path);
            board.complete(id, price3d::job::process_file(path, tetra, &config));
            files.push((id, PathBuf::from(path)));
        }
        write_previews(&board, &files, dir.path()).unwrap();

        assert!(dir.path().join("part-0.png").is_file());
        assert!(dir.path().join("part-1.png").is_file());
        assert!(!dir.path().join("part.png").exists());
    }

    #[test]
    fn preview_dir_enables_previews() {
        let cli = parse(&["a.stl", "--preview-dir", "out", "--preview-size", "64"]);
        let preview = cli.loader_config().preview.unwrap();
        assert_eq!((preview.width, preview.height), (64, 64));
    }
}
