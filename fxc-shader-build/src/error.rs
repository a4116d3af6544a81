use std::{io, path::PathBuf};

use crate::job::JobField;

/// 构建过程中所有可能出现的错误，任何一个都会终止本次构建
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// `PATH` 和 SDK 目录都找不到编译器
    #[error("{executable} not found under {sdk_root:?} ({} PATH entries checked): {hint}", .search_dirs.len())]
    CompilerNotFound {
        executable: String,
        /// 检查过的 `PATH` 目录
        search_dirs: Vec<PathBuf>,
        sdk_root: PathBuf,
        hint: String,
    },

    /// 编译任务缺少必要字段，在启动任何进程之前发现
    #[error("shader job #{index} is invalid: `{field}` is empty")]
    InvalidJob { index: usize, field: JobField },

    /// 编译器以非 0 状态退出
    #[error(
        "shader job #{index} ({entry_point}) failed to compile, exit code: {}",
        .code.map_or_else(|| "none (terminated by signal)".to_string(), |code| code.to_string())
    )]
    CompilationFailed {
        index: usize,
        entry_point: String,
        code: Option<i32>,
    },

    /// 编译器进程无法启动
    #[error("failed to start the shader compiler for job #{index}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    /// 切换或恢复工作目录失败
    #[error("failed to {action} working directory {path:?}")]
    UnexpectedIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 构建清单无法读取或内容非法
    #[error("invalid manifest {path:?}: {message}")]
    Manifest { path: PathBuf, message: String },
}
