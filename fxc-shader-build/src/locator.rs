//! 编译器定位
//!
//! 查找顺序：
//! 1. `PATH` 中能直接找到的可执行文件，找到就立即返回，不会访问 SDK 目录
//! 2. 递归扫描 SDK 目录，优先返回位于偏好架构目录（默认 `x64`）下的文件
//! 3. 没有偏好架构的匹配时，返回扫描到的第一个匹配

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use fxc_crate_tools::resource::FxcPath;

use crate::error::BuildError;

/// 候选编译器的优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateRank {
    /// 父目录名等于偏好架构
    PreferredArch,
    /// 其他任意位置
    Any,
}

/// 扫描 SDK 目录时找到的一个编译器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerCandidate {
    pub path: PathBuf,
    pub rank: CandidateRank,
}

impl CompilerCandidate {
    fn new(path: PathBuf, preferred_arch: &str) -> Self {
        let in_preferred_dir = path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|dir| dir.to_string_lossy().eq_ignore_ascii_case(preferred_arch));
        let rank = if in_preferred_dir { CandidateRank::PreferredArch } else { CandidateRank::Any };

        Self { path, rank }
    }
}

#[derive(Debug, Clone)]
pub struct CompilerLocator {
    executable: String,
    sdk_root: PathBuf,
    preferred_arch: String,
    /// `PATH` 格式的目录列表，None 表示跳过这一步
    search_path: Option<OsString>,
}

impl CompilerLocator {
    pub fn new(executable: impl Into<String>, sdk_root: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            sdk_root: sdk_root.into(),
            preferred_arch: FxcPath::PREFERRED_ARCH.to_string(),
            search_path: env::var_os("PATH"),
        }
    }

    /// Windows SDK 自带的 fxc
    pub fn fxc() -> Self {
        Self::new(FxcPath::FXC_EXECUTABLE, FxcPath::windows_sdk_bin_path())
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_sdk_root(mut self, sdk_root: impl Into<PathBuf>) -> Self {
        self.sdk_root = sdk_root.into();
        self
    }

    pub fn with_preferred_arch(mut self, arch: impl Into<String>) -> Self {
        self.preferred_arch = arch.into();
        self
    }

    pub fn with_search_path(mut self, search_path: Option<OsString>) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn sdk_root(&self) -> &Path {
        &self.sdk_root
    }

    pub fn preferred_arch(&self) -> &str {
        &self.preferred_arch
    }
}

impl CompilerLocator {
    /// 找到编译器的路径，找不到时返回 [`BuildError::CompilerNotFound`]
    pub fn locate(&self) -> Result<PathBuf, BuildError> {
        if let Some(path) = self.find_on_search_path() {
            log::info!("Using {} from PATH: {:?}", self.executable, path);
            return Ok(path);
        }

        log::info!("{} is not on PATH, searching {:?}", self.executable, self.sdk_root);
        let candidates = self.scan_sdk_root();
        log::debug!("Found {} candidate(s) under {:?}", candidates.len(), self.sdk_root);

        match Self::select(candidates) {
            Some(candidate) => {
                if candidate.rank != CandidateRank::PreferredArch {
                    log::warn!("No {} build of {} found, falling back to {:?}", self.preferred_arch, self.executable, candidate.path);
                }
                log::info!("Using {:?}", candidate.path);
                Ok(candidate.path)
            }
            None => Err(self.not_found()),
        }
    }

    /// `PATH` 中会被检查的目录，按顺序
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        self.search_path
            .as_ref()
            .map(|search_path| env::split_paths(search_path).filter(|dir| !dir.as_os_str().is_empty()).collect())
            .unwrap_or_default()
    }

    /// 在 `PATH` 的每个目录中查找，返回第一个存在的文件
    ///
    /// 返回绝对路径，构建过程中工作目录会被切换。
    pub fn find_on_search_path(&self) -> Option<PathBuf> {
        self.search_dirs()
            .into_iter()
            .map(|dir| dir.join(&self.executable))
            .find(|path| path.is_file())
            .map(|path| std::path::absolute(&path).unwrap_or(path))
    }

    /// 递归扫描 SDK 目录，按遍历顺序返回所有同名文件
    ///
    /// 同级目录按名称降序遍历，新版本的 SDK（`10.0.22621.0`）排在旧版本（`10.0.19041.0`）之前。
    /// 无法读取的目录会被跳过，不影响其他目录的结果。
    pub fn scan_sdk_root(&self) -> Vec<CompilerCandidate> {
        if !self.sdk_root.is_dir() {
            log::debug!("SDK root {:?} does not exist", self.sdk_root);
            return Vec::new();
        }

        // 构建时会切换工作目录，候选路径必须是绝对路径
        let sdk_root = std::path::absolute(&self.sdk_root).unwrap_or_else(|_| self.sdk_root.clone());
        walkdir::WalkDir::new(sdk_root)
            .sort_by(|a, b| b.file_name().cmp(a.file_name()))
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::debug!("Skipping unreadable entry: {err}");
                    None
                }
            })
            .filter(|entry| entry.file_name().to_string_lossy().eq_ignore_ascii_case(&self.executable))
            .filter(|entry| entry.path().is_file())
            .map(|entry| CompilerCandidate::new(entry.into_path(), &self.preferred_arch))
            .collect()
    }

    /// 第一个偏好架构的候选，没有则取第一个候选
    fn select(candidates: Vec<CompilerCandidate>) -> Option<CompilerCandidate> {
        let mut fallback = None;
        for candidate in candidates {
            match candidate.rank {
                CandidateRank::PreferredArch => return Some(candidate),
                CandidateRank::Any => {
                    fallback.get_or_insert(candidate);
                }
            }
        }
        fallback
    }

    fn not_found(&self) -> BuildError {
        let search_dirs = self.search_dirs();
        log::debug!("Searched PATH entries: {:?}", search_dirs);
        BuildError::CompilerNotFound {
            executable: self.executable.clone(),
            search_dirs,
            sdk_root: self.sdk_root.clone(),
            hint: format!("install the Windows 10 SDK or add {} to PATH", self.executable),
        }
    }
}
