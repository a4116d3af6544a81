//! 外部编译器进程
//!
//! fxc 本身是闭源的外部工具，这里只负责拼参数、启动进程、转发输出。

use std::{
    io,
    path::Path,
    process::{Command, ExitStatus, Output},
};

use crate::job::{OptLevel, ShaderJob};

/// 编译器进程的退出状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileStatus {
    /// 进程被信号终止时为 None
    pub code: Option<i32>,
}

impl CompileStatus {
    pub const fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

impl From<ExitStatus> for CompileStatus {
    fn from(status: ExitStatus) -> Self {
        Self { code: status.code() }
    }
}

/// 着色器编译器 Trait
pub trait ShaderCompiler {
    /// 用 `compiler` 编译一个任务，阻塞直到进程退出
    ///
    /// 只有进程无法启动时才返回 `Err`，非 0 退出码通过 [`CompileStatus`] 返回。
    fn compile(&self, compiler: &Path, job: &ShaderJob, optimization: OptLevel) -> io::Result<CompileStatus>;

    /// 根据 cmd 执行的结果，处理输出信息
    fn process_cmd_output(&self, output: &Output) {
        if !output.stdout.is_empty() {
            log::info!("stdout: {}", String::from_utf8_lossy(&output.stdout).trim_end());
        }
        if !output.stderr.is_empty() {
            log::error!("stderr: {}", String::from_utf8_lossy(&output.stderr).trim_end());
        }
    }
}

/// 使用 fxc 把 HLSL 编译为 Direct3D10 字节码
#[derive(Debug, Default)]
pub struct FxcCompiler;

impl FxcCompiler {
    pub const fn new() -> Self {
        Self
    }
}

impl ShaderCompiler for FxcCompiler {
    fn compile(&self, compiler: &Path, job: &ShaderJob, optimization: OptLevel) -> io::Result<CompileStatus> {
        let output = Command::new(compiler).args(job.compiler_args(optimization)).output()?;
        self.process_cmd_output(&output);

        Ok(output.status.into())
    }
}
