#![allow(dead_code)]

use std::{
    cell::RefCell,
    env,
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use fxc_shader_build::{
    CompilerLocator, OptLevel, ShaderJob,
    compiler::{CompileStatus, ShaderCompiler},
};

/// 工作目录是进程级状态，会切换目录的测试需要串行执行
static CWD_LOCK: Mutex<()> = Mutex::new(());

pub fn lock_cwd() -> MutexGuard<'static, ()> {
    CWD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 测试结束时自动删除的临时目录
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn new(tag: &str) -> Self {
        let path = env::temp_dir().join(format!("fxc-shader-build-{tag}-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&path).unwrap();
        // macOS 的 temp_dir 是符号链接，统一成真实路径便于比较
        let path = path.canonicalize().unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 创建一个空文件（以及所需的父目录）
    pub fn touch(&self, relative: impl AsRef<Path>) -> PathBuf {
        let path = self.path.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"").unwrap();
        path
    }

    pub fn mkdir(&self, relative: impl AsRef<Path>) -> PathBuf {
        let path = self.path.join(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.path).ok();
    }
}

pub fn search_path(dirs: &[&Path]) -> Option<OsString> {
    Some(env::join_paths(dirs).unwrap())
}

/// 只在指定目录中查找 `fxc.exe` 的定位器，SDK 目录不存在
pub fn locator_on_path(dir: &Path) -> CompilerLocator {
    CompilerLocator::new("fxc.exe", dir.join("no-sdk-here")).with_search_path(search_path(&[dir]))
}

/// 一次被记录的编译器调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub compiler: PathBuf,
    pub entry_point: String,
    pub cwd: PathBuf,
    pub optimization: OptLevel,
}

/// 按预设退出码返回结果、并记录每次调用的编译器
pub struct RecordingCompiler {
    exit_codes: Vec<io::Result<i32>>,
    invocations: RefCell<Vec<Invocation>>,
}

impl RecordingCompiler {
    /// 每个调用都返回 0
    pub fn succeeding() -> Self {
        Self::with_results(Vec::new())
    }

    pub fn with_exit_codes(codes: &[i32]) -> Self {
        Self::with_results(codes.iter().copied().map(Ok).collect())
    }

    /// 第 i 次调用返回 `results[i]`，超出部分返回 0
    pub fn with_results(results: Vec<io::Result<i32>>) -> Self {
        Self {
            exit_codes: results,
            invocations: RefCell::new(Vec::new()),
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    pub fn entry_points(&self) -> Vec<String> {
        self.invocations.borrow().iter().map(|call| call.entry_point.clone()).collect()
    }
}

impl ShaderCompiler for RecordingCompiler {
    fn compile(&self, compiler: &Path, job: &ShaderJob, optimization: OptLevel) -> io::Result<CompileStatus> {
        let mut invocations = self.invocations.borrow_mut();
        let call = invocations.len();
        invocations.push(Invocation {
            compiler: compiler.to_path_buf(),
            entry_point: job.entry_point.clone(),
            cwd: env::current_dir()?,
            optimization,
        });

        match self.exit_codes.get(call) {
            Some(Ok(code)) => Ok(CompileStatus::from_code(*code)),
            Some(Err(err)) => Err(io::Error::new(err.kind(), err.to_string())),
            None => Ok(CompileStatus::from_code(0)),
        }
    }
}

/// 收集日志消息，用于检查构建过程中的提示
struct CapturingLogger {
    messages: Mutex<Vec<String>>,
}

impl log::Log for CapturingLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Info
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let mut messages = self.messages.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            messages.push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    messages: Mutex::new(Vec::new()),
};

/// 安装收集日志的 logger（每个测试进程只安装一次），并清空已收集的消息
pub fn capture_log() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
    take_log();
}

/// 取出目前收集到的所有消息
pub fn take_log() -> Vec<String> {
    let mut messages = LOGGER.messages.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    std::mem::take(&mut *messages)
}
