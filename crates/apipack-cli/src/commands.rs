use std::io::{self, Write};

use anyhow::{Context, Result};
use apipack_build::{render_plan, render_pom};
use apipack_cli::pipeline::{self, BuildOptions};
use apipack_cli::types::{BuildResult, NormalizeResult};
use apipack_model::Phase;

use crate::cli::{BuildArgs, NormalizeArgs, PlanArgs, PomArgs, SwitchArgs, ValidateArgs};

pub fn run_build(args: &BuildArgs) -> Result<BuildResult> {
    let options = BuildOptions::new(&args.project_dir)
        .with_until(args.until.into())
        .with_dependencies_dir(args.dependencies_dir.clone())
        .with_build_dir(args.build_dir.clone())
        .with_switches(args.switches.to_switches());
    pipeline::run_build(&options)
}

pub fn run_validate(args: &ValidateArgs) -> Result<BuildResult> {
    let switches = SwitchArgs {
        group_id: args.group_id.clone(),
        ..SwitchArgs::default()
    }
    .to_switches();
    let options = BuildOptions::new(&args.project_dir)
        .with_until(Phase::Compile)
        .with_dependencies_dir(args.dependencies_dir.clone())
        .with_switches(switches);
    pipeline::run_build(&options)
}

pub fn run_pom(args: &PomArgs) -> Result<()> {
    let switches = args.switches.to_switches();
    if let Some(path) = &args.output {
        return pipeline::export_pom(&args.project_dir, &switches, path);
    }
    let (_, build) = pipeline::plan_project(&args.project_dir, &switches)?;
    io::stdout()
        .write_all(render_pom(&build)?.as_bytes())
        .context("write POM to stdout")
}

pub fn run_plan(args: &PlanArgs) -> Result<()> {
    let (resolution, build) =
        pipeline::plan_project(&args.project_dir, &args.switches.to_switches())?;
    println!("{}", resolution.descriptor.coordinates());
    print!("{}", render_plan(&build));
    Ok(())
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<NormalizeResult> {
    pipeline::run_normalize(&args.source, &args.dest)
}
