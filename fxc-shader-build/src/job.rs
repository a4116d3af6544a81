//! 编译任务
//!
//! 一个 [`ShaderJob`] 对应一次 fxc 调用：同一个源文件的一个入口点编译成一个输出文件。

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::BuildError;

/// [`ShaderJob`] 中必须填写的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobField {
    Source,
    Profile,
    EntryPoint,
    Output,
}

impl fmt::Display for JobField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobField::Source => "source",
            JobField::Profile => "profile",
            JobField::EntryPoint => "entry_point",
            JobField::Output => "output",
        };
        f.write_str(name)
    }
}

/// fxc 的优化等级，对应 `/O0` ~ `/O3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OptLevel(u8);

impl OptLevel {
    pub const MAX: u8 = 3;

    /// 超出 `0..=3` 时返回 None
    pub const fn new(level: u8) -> Option<Self> {
        if level <= Self::MAX { Some(Self(level)) } else { None }
    }

    pub const fn level(self) -> u8 {
        self.0
    }

    /// 命令行参数形式，例如 `/O3`
    pub fn flag(self) -> String {
        format!("/O{}", self.0)
    }
}

impl Default for OptLevel {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

/// 一个具体的编译任务
///
/// 路径都相对于 shader 目录，构建时工作目录会切换到那里。
/// 反序列化时缺失的字段保持为空，交给 [`ShaderJob::validate`] 报告。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShaderJob {
    /// shader 源文件
    pub source: PathBuf,
    /// 目标 profile，例如 `vs_4_0`
    pub profile: String,
    /// 入口函数名
    pub entry_point: String,
    /// 编译产物
    pub output: PathBuf,
}

impl ShaderJob {
    pub fn new(
        source: impl Into<PathBuf>,
        profile: impl Into<String>,
        entry_point: impl Into<String>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            profile: profile.into(),
            entry_point: entry_point.into(),
            output: output.into(),
        }
    }

    /// 检查所有字段均非空
    ///
    /// # Arguments
    /// * `index` - 任务在列表中的序号，从 1 开始，仅用于报错
    pub fn validate(&self, index: usize) -> Result<(), BuildError> {
        let empty_field = if is_empty_path(&self.source) {
            Some(JobField::Source)
        } else if self.profile.trim().is_empty() {
            Some(JobField::Profile)
        } else if self.entry_point.trim().is_empty() {
            Some(JobField::EntryPoint)
        } else if is_empty_path(&self.output) {
            Some(JobField::Output)
        } else {
            None
        };

        match empty_field {
            Some(field) => Err(BuildError::InvalidJob { index, field }),
            None => Ok(()),
        }
    }

    /// fxc 的命令行参数
    ///
    /// `<source> /nologo /O<level> /T <profile> /E <entry_point> /Fo <output>`
    pub fn compiler_args(&self, optimization: OptLevel) -> Vec<OsString> {
        vec![
            self.source.clone().into_os_string(),
            "/nologo".into(),
            optimization.flag().into(),
            "/T".into(),
            self.profile.clone().into(),
            "/E".into(),
            self.entry_point.clone().into(),
            "/Fo".into(),
            self.output.clone().into_os_string(),
        ]
    }
}

fn is_empty_path(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

/// egui Direct3D10 渲染器需要的两个 shader：同一个 `egui.hlsl` 的顶点与像素阶段
pub fn egui_jobs() -> Vec<ShaderJob> {
    vec![
        ShaderJob::new("egui.hlsl", "vs_4_0", "vs_egui", "vs_egui.bin"),
        ShaderJob::new("egui.hlsl", "ps_4_0", "ps_egui", "ps_egui.bin"),
    ]
}
