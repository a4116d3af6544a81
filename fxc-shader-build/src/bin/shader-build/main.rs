//! Shader 编译工具
//!
//! 定位 fxc，把 shader 目录中的 HLSL 按 `shaders.toml`（或内置的 egui 配置）逐个编译为 Direct3D10 字节码。
//! 全部成功时退出码为 0，任何失败都为 1。

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use fxc_crate_tools::{init_log::init_log, resource::FxcPath};
use fxc_shader_build::{BuildConfig, OptLevel, manifest::BuildManifest, run_build};

#[derive(Debug, Parser)]
#[clap(name = "shader-build", about = "Compile HLSL shaders with fxc.exe")]
struct Args {
    /// 构建清单，缺省时使用当前目录下存在的 shaders.toml
    #[clap(long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// shader 源码目录，编译期间的工作目录
    #[clap(long, value_name = "DIR")]
    shader_dir: Option<PathBuf>,

    /// PATH 中找不到 fxc 时搜索的 SDK 目录
    #[clap(long, value_name = "DIR")]
    sdk_root: Option<PathBuf>,

    /// 优先选择的架构目录
    #[clap(long, value_name = "TAG")]
    arch: Option<String>,

    /// 优化等级 0-3
    #[clap(long = "opt", value_name = "LEVEL")]
    optimization: Option<u8>,

    /// 只打印命令，不执行
    #[clap(long)]
    dry_run: bool,

    #[clap(short, long)]
    verbose: bool,
}

fn load_manifest(path: Option<PathBuf>) -> anyhow::Result<BuildManifest> {
    let path = match path {
        Some(path) => path,
        None => {
            let default_path = FxcPath::manifest_path();
            if !default_path.is_file() {
                log::debug!("No {:?} found, using built-in egui shader jobs", default_path);
                return Ok(BuildManifest::default());
            }
            default_path
        }
    };

    log::info!("Loading manifest {:?}", path);
    Ok(BuildManifest::from_file(&path)?)
}

fn build_config(manifest: &BuildManifest, args: Args) -> anyhow::Result<BuildConfig> {
    let mut config = manifest.build_config();

    if let Some(shader_dir) = args.shader_dir {
        config.shader_dir = shader_dir;
    }
    if let Some(sdk_root) = args.sdk_root {
        config.locator = config.locator.with_sdk_root(sdk_root);
    }
    if let Some(arch) = args.arch {
        config.locator = config.locator.with_preferred_arch(arch);
    }
    if let Some(level) = args.optimization {
        config.optimization = OptLevel::new(level)
            .with_context(|| format!("--opt must be within 0..={}, got {level}", OptLevel::MAX))?;
    }
    config.dry_run = args.dry_run;

    Ok(config)
}

fn run(args: Args) -> anyhow::Result<()> {
    let manifest = load_manifest(args.manifest.clone())?;
    let jobs = manifest.jobs();
    let config = build_config(&manifest, args)?;

    log::info!("Shader dir: {:?}", config.shader_dir);
    log::info!("SDK root: {:?}", config.locator.sdk_root());

    let summary = run_build(&jobs, config).context("shader build failed")?;
    for output in &summary.outputs {
        log::info!("Output: {:?}", output);
    }

    Ok(())
}

fn main() -> ExitCode {
    // 参数错误也按普通失败处理，退出码为 1；--help/--version 正常退出
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            err.print().ok();
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };
    init_log(if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info });

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
