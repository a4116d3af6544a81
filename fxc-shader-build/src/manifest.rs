//! 构建清单 `shaders.toml`
//!
//! ```toml
//! shader_dir = "shaders"
//! optimization = 3
//!
//! [compiler]
//! executable = "fxc.exe"
//! sdk_root = "C:/Program Files (x86)/Windows Kits/10/bin"
//! preferred_arch = "x64"
//!
//! [[jobs]]
//! source = "egui.hlsl"
//! profile = "vs_4_0"
//! entry_point = "vs_egui"
//! output = "vs_egui.bin"
//! ```
//!
//! 所有字段都可以省略，缺省值与内置的 egui 配置一致。

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    driver::BuildConfig,
    error::BuildError,
    job::{OptLevel, ShaderJob, egui_jobs},
    locator::CompilerLocator,
};

/// `[compiler]` 段
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerSection {
    pub executable: Option<String>,
    pub sdk_root: Option<PathBuf>,
    pub preferred_arch: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildManifest {
    /// 相对路径在加载时基于 manifest 所在目录展开
    pub shader_dir: Option<PathBuf>,
    pub optimization: Option<u8>,
    pub compiler: CompilerSection,
    pub jobs: Option<Vec<ShaderJob>>,
}

impl BuildManifest {
    /// 从 TOML 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BuildError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| BuildError::Manifest {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&content, base_dir).map_err(|message| BuildError::Manifest {
            path: path.to_path_buf(),
            message,
        })
    }

    /// 解析 TOML 文本，`base_dir` 用于展开相对的 `shader_dir` 与 `compiler.sdk_root`
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self, String> {
        let mut manifest: BuildManifest = toml::from_str(content).map_err(|err| err.to_string())?;

        if let Some(level) = manifest.optimization {
            if OptLevel::new(level).is_none() {
                return Err(format!("optimization must be within 0..={}, got {level}", OptLevel::MAX));
            }
        }
        if let Some(sdk_root) = manifest.compiler.sdk_root.as_mut() {
            if sdk_root.is_relative() {
                *sdk_root = base_dir.join(&*sdk_root);
            }
        }
        if let Some(shader_dir) = manifest.shader_dir.as_mut() {
            if shader_dir.is_relative() {
                *shader_dir = base_dir.join(&*shader_dir);
            }
        }

        Ok(manifest)
    }

    /// 未配置任务时使用 egui 的两个 shader
    pub fn jobs(&self) -> Vec<ShaderJob> {
        self.jobs.clone().unwrap_or_else(egui_jobs)
    }

    pub fn locator(&self) -> CompilerLocator {
        let mut locator = CompilerLocator::fxc();
        let section = &self.compiler;
        if let Some(executable) = &section.executable {
            locator = locator.with_executable(executable.clone());
        }
        if let Some(sdk_root) = &section.sdk_root {
            locator = locator.with_sdk_root(sdk_root.clone());
        }
        if let Some(arch) = &section.preferred_arch {
            locator = locator.with_preferred_arch(arch.clone());
        }
        locator
    }

    pub fn build_config(&self) -> BuildConfig {
        let defaults = BuildConfig::default();
        BuildConfig {
            locator: self.locator(),
            shader_dir: self.shader_dir.clone().unwrap_or(defaults.shader_dir),
            optimization: self.optimization.and_then(OptLevel::new).unwrap_or(defaults.optimization),
            dry_run: false,
        }
    }
}
