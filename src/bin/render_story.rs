use std::fs;
use std::path::PathBuf;

use three_point_story::api::{Presentation, PresentationConfig};
use three_point_story::data::CsvDirectorySource;
use three_point_story::render::SvgRenderer;
use three_point_story::telemetry::init_default_tracing;
use tracing::info;

const DEFAULT_OUTPUT_ROOT: &str = "target/story";

struct CliArgs {
    config: PresentationConfig,
    output_root: PathBuf,
    animate: bool,
    interactive: bool,
}

fn main() {
    let _ = init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    if args.interactive {
        return run_interactive(args.config);
    }

    fs::create_dir_all(&args.output_root).map_err(|err| {
        format!(
            "failed to create output dir `{}`: {err}",
            args.output_root.display()
        )
    })?;

    let source = CsvDirectorySource::new(args.config.data_dir.clone());
    let renderer = SvgRenderer::new().with_animations(args.animate);
    let mut presentation = Presentation::new(renderer, source, args.config)
        .map_err(|err| format!("failed to create presentation: {err}"))?;

    presentation
        .start()
        .map_err(|err| format!("failed to enter first scene: {err}"))?;
    loop {
        let snapshot = presentation.snapshot();
        let index = snapshot.scene_index + 1;
        presentation
            .render()
            .map_err(|err| format!("failed to render scene {index}: {err}"))?;

        let svg_path = args.output_root.join(format!("scene_{index}.svg"));
        let svg = presentation.renderer_mut().take_document();
        fs::write(&svg_path, svg)
            .map_err(|err| format!("failed to write `{}`: {err}", svg_path.display()))?;

        let json_path = args.output_root.join(format!("scene_{index}.json"));
        let json = snapshot
            .to_json_pretty()
            .map_err(|err| format!("failed to serialize snapshot: {err}"))?;
        fs::write(&json_path, json)
            .map_err(|err| format!("failed to write `{}`: {err}", json_path.display()))?;

        info!(
            scene = index,
            title = snapshot.title.as_str(),
            primitives = snapshot.primitives.total(),
            path = %svg_path.display(),
            "scene written"
        );

        match presentation.next() {
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(err) => return Err(format!("failed to advance past scene {index}: {err}")),
        }
    }
    Ok(())
}

#[cfg(feature = "gtk4-adapter")]
fn run_interactive(config: PresentationConfig) -> Result<(), String> {
    let code = three_point_story::platform_gtk::run(config);
    if code == gtk4::glib::ExitCode::SUCCESS {
        Ok(())
    } else {
        Err("gtk application exited with failure".to_owned())
    }
}

#[cfg(not(feature = "gtk4-adapter"))]
fn run_interactive(_config: PresentationConfig) -> Result<(), String> {
    tracing::warn!("interactive mode requested without the `gtk4-adapter` feature");
    Err("--interactive requires feature `gtk4-adapter`".to_owned())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut config = PresentationConfig::default();
    let mut data_dir: Option<PathBuf> = None;
    let mut output_root = PathBuf::from(DEFAULT_OUTPUT_ROOT);
    let mut animate = true;
    let mut interactive = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                let raw = fs::read_to_string(&value)
                    .map_err(|err| format!("failed to read config `{value}`: {err}"))?;
                config = PresentationConfig::from_json_str(&raw)
                    .map_err(|err| format!("invalid config `{value}`: {err}"))?;
            }
            "--data-dir" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --data-dir".to_owned())?;
                data_dir = Some(PathBuf::from(value));
            }
            "--output-root" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output-root".to_owned())?;
                output_root = PathBuf::from(value);
            }
            "--static" => animate = false,
            "--interactive" => interactive = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument: {arg}"));
            }
        }
    }

    // An explicit --data-dir wins over the config file.
    if let Some(data_dir) = data_dir {
        config = config.with_data_dir(data_dir);
    }
    config
        .validate()
        .map_err(|err| format!("invalid config: {err}"))?;

    Ok(CliArgs {
        config,
        output_root,
        animate,
        interactive,
    })
}

fn print_usage() {
    println!(
        "usage: render_story [--config <file.json>] [--data-dir <dir>] [--output-root <dir>] [--static] [--interactive]"
    );
    println!("  writes scene_N.svg and scene_N.json for every scene of the presentation");
}
