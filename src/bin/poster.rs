use std::{
    fs::File,
    io::{BufReader, Read as _},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "poster", version)]
struct Cli {
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one poster from command-line arguments.
    Generate(GenerateArgs),
    /// Read a JSON request from stdin and write a JSON response to stdout.
    Handle(EngineArgs),
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// Directory holding `background.{png,jpg}` and a `.ttf`/`.otf` font (defaults to bundled assets).
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Generator configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Name drawn under the avatar.
    #[arg(long)]
    name: String,

    /// URL of the avatar image.
    #[arg(long)]
    avatar_url: String,

    /// Write PNG bytes here instead of printing base64.
    #[arg(long, conflicts_with = "json")]
    out: Option<PathBuf>,

    /// Print `{"image": ...}` / `{"error": ...}` JSON instead of bare base64.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct Request {
    name: String,
    avatar_url: String,
}

#[derive(serde::Serialize, Debug)]
#[serde(untagged)]
enum Response {
    Image { image: String },
    Error { error: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Handle(args) => cmd_handle(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: &Path) -> anyhow::Result<poster::GeneratorConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let cfg = poster::GeneratorConfig::from_reader(BufReader::new(f))
        .with_context(|| format!("load config '{}'", path.display()))?;
    Ok(cfg)
}

fn build_generator(args: &EngineArgs) -> anyhow::Result<poster::Generator> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => poster::GeneratorConfig::default(),
    };
    let assets = match &args.assets_dir {
        Some(dir) => poster::AssetStore::from_dir(dir)
            .with_context(|| format!("load assets from '{}'", dir.display()))?,
        None => poster::AssetStore::bundled().context("load bundled assets")?,
    };
    Ok(poster::Generator::new(Arc::new(assets), &config)?)
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let generator = build_generator(&args.engine)?;

    if let Some(out) = &args.out {
        let png = generator.generate_png(&args.name, &args.avatar_url)?;
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(out, &png).with_context(|| format!("write png '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
        return Ok(());
    }

    if args.json {
        let response = respond(&generator, &args.name, &args.avatar_url);
        let failed = matches!(response, Response::Error { .. });
        println!("{}", serde_json::to_string(&response)?);
        if failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    let encoded = generator.generate(&args.name, &args.avatar_url)?;
    println!("{encoded}");
    Ok(())
}

fn cmd_handle(args: EngineArgs) -> anyhow::Result<()> {
    let generator = build_generator(&args)?;

    let mut body = String::new();
    std::io::stdin()
        .read_to_string(&mut body)
        .context("read request from stdin")?;

    let response = match serde_json::from_str::<Request>(&body) {
        Err(e) => {
            tracing::warn!(error = %e, "invalid request body");
            Response::Error {
                error: "invalid request body".to_string(),
            }
        }
        Ok(req) if req.name.is_empty() => Response::Error {
            error: "name is required".to_string(),
        },
        Ok(req) if req.avatar_url.is_empty() => Response::Error {
            error: "avatarUrl is required".to_string(),
        },
        Ok(req) => respond(&generator, &req.name, &req.avatar_url),
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

fn respond(generator: &poster::Generator, name: &str, avatar_url: &str) -> Response {
    match generator.generate(name, avatar_url) {
        Ok(image) => Response::Image { image },
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind(), "generation error");
            Response::Error {
                error: "failed to generate poster".to_string(),
            }
        }
    }
}
