use clap::Parser;
use design_feedback::{
    AnalysisConfig, DetectedRegions, ExportError, FeedbackReport, FixedTextBlocks, InputImage,
    InvalidConfigError, InvalidImageError, TextDetector, TextRegion, UnavailableDetector,
};
use snafu::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Level, info};

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Parser)]
#[command(version, about = "Score a design image and suggest improvements")]
struct Args {
    /// Images to analyze; folders are searched for jpg/jpeg/png files
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Number of text blocks an external detector found in each image
    #[arg(long, conflicts_with = "text_regions")]
    text_blocks: Option<usize>,

    /// JSON file with the text regions an external detector found
    #[arg(long)]
    text_regions: Option<PathBuf>,

    /// Where to write `<name>_feedback.txt` (defaults to the image's folder)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// JSON file overriding the analysis settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Snafu)]
enum CliError {
    #[snafu(display("failed to read {}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to parse {}", path.display()))]
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("invalid settings in {}", path.display()))]
    InvalidConfig {
        path: PathBuf,
        source: InvalidConfigError,
    },

    #[snafu(display("failed to decode {}", path.display()))]
    DecodeImage {
        path: PathBuf,
        source: image::ImageError,
    },

    #[snafu(display("{} cannot be analyzed", path.display()))]
    Analyze {
        path: PathBuf,
        source: InvalidImageError,
    },

    #[snafu(display("failed to serialize the report"))]
    Serialize { source: serde_json::Error },

    #[snafu(transparent)]
    Export { source: ExportError },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).context(ReadFileSnafu { path })?;
    serde_json::from_str(&text).context(ParseJsonSnafu { path })
}

fn is_image(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

fn expand_folders(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in fs::read_dir(path).context(ReadFileSnafu { path })? {
            let entry_path = entry.context(ReadFileSnafu { path })?.path();
            if is_image(&entry_path) && !entry_path.is_dir() {
                found.push(entry_path);
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

fn analyze_file(
    path: &Path,
    detector: &dyn TextDetector,
    config: &AnalysisConfig,
) -> Result<FeedbackReport, CliError> {
    let img = image::open(path).context(DecodeImageSnafu { path })?;

    let result = if img.color().has_color() {
        let rgb = img.to_rgb8();
        InputImage::try_from(&rgb)
            .and_then(|input| design_feedback::analyze_with_config(input, detector, config))
    } else {
        let gray = img.to_luma8();
        InputImage::try_from(&gray)
            .and_then(|input| design_feedback::analyze_with_config(input, detector, config))
    };

    result.context(AnalyzeSnafu { path })
}

#[snafu::report]
fn main() -> Result<(), CliError> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => {
            let config: AnalysisConfig = read_json(path)?;
            config.validate().context(InvalidConfigSnafu { path })?;
            config
        }
        None => AnalysisConfig::default(),
    };

    let detector: Box<dyn TextDetector> = match (args.text_blocks, &args.text_regions) {
        (Some(count), _) => Box::new(FixedTextBlocks(count)),
        (None, Some(path)) => Box::new(DetectedRegions(read_json::<Vec<TextRegion>>(path)?)),
        (None, None) => Box::new(UnavailableDetector::new("no text detector configured")),
    };

    for path in expand_folders(&args.images)? {
        let t = Instant::now();
        let report = analyze_file(&path, detector.as_ref(), &config)?;
        let elapsed = t.elapsed();

        if args.json {
            println!("{}", report.to_json().context(SerializeSnafu)?);
        } else {
            print!("{report}");
        }

        let out_dir = match &args.out_dir {
            Some(dir) => dir.clone(),
            None => path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        };
        let written = report.export(&out_dir, &path)?;

        info!(
            image = %path.display(),
            report = %written.display(),
            score = report.composite,
            verdict = %report.verdict,
            ?elapsed,
            "analyzed"
        );
    }

    Ok(())
}
