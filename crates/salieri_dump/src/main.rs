use clap::Parser;
use log::*;
use salieri_scene::Scene;
use salieri_utils::{ok, AnyResult};
use std::{fs::File, io::BufReader, process::ExitCode};

mod cli;

fn main() -> ExitCode {
    let args = cli::Args::parse();

    pretty_env_logger::formatted_builder()
        .format_indent(None)
        .format_timestamp(None)
        .filter_level(if args.verbose {
            LevelFilter::Trace
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    match dump_scene(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}: {e:#}", args.input.display());
            ExitCode::FAILURE
        }
    }
}

fn dump_scene(args: &cli::Args) -> AnyResult {
    let mut reader = BufReader::new(File::open(&args.input)?);
    let scene = Scene::from_reader(&mut reader)?;

    info!("view distance: {}", scene.view_distance);
    info!(
        "clipping planes: {} .. {}",
        scene.clipping_planes.x, scene.clipping_planes.y
    );
    info!("field of view: {}", scene.field_of_view);
    info!("{} object(s)", scene.objects.len());

    let mut names = scene.objects.keys().collect::<Vec<_>>();
    names.sort();

    for name in names {
        let object = &scene.objects[name];
        info!(
            "[{name}] {:?} ({:?}) at {}",
            object.kind, object.special_kind, object.position
        );
        if let Some(model) = &object.model {
            info!("    model {model}");
        }
        if let Some(parent) = &object.parent_name {
            info!("    parent {parent}");
        }
        if let Some(light) = &object.light {
            match light.kind {
                Some(kind) => info!("    {kind} light, power {}", light.power),
                None => info!("    light without a type, power {}", light.power),
            }
        }
        if let Some(physical) = &object.physical {
            info!(
                "    physical: weight {}, friction {}, sound {}",
                physical.weight, physical.friction, physical.sound
            );
        }
    }

    if !scene.orphan_specials.is_empty() {
        warn!(
            "{} special chunk(s) without a plain definition: {:?}",
            scene.orphan_specials.len(),
            scene.orphan_specials
        );
    }
    ok()
}
