//! 构建流程
//!
//! 校验全部任务 -> 定位编译器 -> 切换到 shader 目录 -> 逐个编译，遇到第一个失败立即停止。

use std::path::{Path, PathBuf};

use fxc_crate_tools::resource::FxcPath;

use crate::{
    compiler::{FxcCompiler, ShaderCompiler},
    error::BuildError,
    job::{OptLevel, ShaderJob},
    locator::CompilerLocator,
    working_dir::WorkingDirGuard,
};

/// 一次构建的配置
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub locator: CompilerLocator,
    /// 编译期间的工作目录，任务中的相对路径都基于此目录
    pub shader_dir: PathBuf,
    pub optimization: OptLevel,
    /// 只打印将要执行的命令，不启动编译器
    pub dry_run: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            locator: CompilerLocator::fxc(),
            shader_dir: FxcPath::shader_dir(),
            optimization: OptLevel::default(),
            dry_run: false,
        }
    }
}

/// 构建成功后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// 实际使用的编译器
    pub compiler: PathBuf,
    /// 按任务顺序排列的编译产物，相对于 shader 目录
    pub outputs: Vec<PathBuf>,
}

pub struct BuildDriver<C: ShaderCompiler> {
    config: BuildConfig,
    compiler: C,
}

impl<C: ShaderCompiler> BuildDriver<C> {
    pub fn new(config: BuildConfig, compiler: C) -> Self {
        Self { config, compiler }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    pub fn run_build(&self, jobs: &[ShaderJob]) -> Result<BuildSummary, BuildError> {
        for (index, job) in jobs.iter().enumerate() {
            job.validate(index + 1)?;
        }

        let compiler = self.config.locator.locate()?;

        if self.config.dry_run {
            self.print_commands(&compiler, jobs);
            return Ok(BuildSummary {
                compiler,
                outputs: Vec::new(),
            });
        }

        let cwd = WorkingDirGuard::enter(&self.config.shader_dir)?;
        log::info!("Compiling {} shader(s) in {:?}", jobs.len(), self.config.shader_dir);

        // 编译失败时 cwd 在 drop 中恢复，编译错误优先于恢复错误
        let outputs = self.compile_all(&compiler, jobs)?;
        cwd.leave()?;

        log::info!("Shader compilation completed.");
        Ok(BuildSummary { compiler, outputs })
    }

    fn compile_all(&self, compiler: &Path, jobs: &[ShaderJob]) -> Result<Vec<PathBuf>, BuildError> {
        let total = jobs.len();
        let mut outputs = Vec::with_capacity(total);

        for (i, job) in jobs.iter().enumerate() {
            let index = i + 1;
            log::info!(
                "[{index}/{total}] Compiling {:?} ({} {}) -> {:?}",
                job.source,
                job.profile,
                job.entry_point,
                job.output
            );

            let status = self
                .compiler
                .compile(compiler, job, self.config.optimization)
                .map_err(|source| BuildError::Spawn { index, source })?;

            if !status.success() {
                return Err(BuildError::CompilationFailed {
                    index,
                    entry_point: job.entry_point.clone(),
                    code: status.code,
                });
            }

            log::info!("{} compiled successfully -> {:?}", job.entry_point, job.output);
            outputs.push(job.output.clone());
        }

        Ok(outputs)
    }

    fn print_commands(&self, compiler: &Path, jobs: &[ShaderJob]) {
        for (i, job) in jobs.iter().enumerate() {
            let args = job
                .compiler_args(self.config.optimization)
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(" ");
            log::info!("[dry run {}/{}] (in {:?}) {:?} {args}", i + 1, jobs.len(), self.config.shader_dir, compiler);
        }
    }
}

/// 用 fxc 执行一次构建
pub fn run_build(jobs: &[ShaderJob], config: BuildConfig) -> Result<BuildSummary, BuildError> {
    BuildDriver::new(config, FxcCompiler::new()).run_build(jobs)
}
