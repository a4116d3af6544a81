//! 工作目录切换
//!
//! 工作目录是进程级的共享状态，切换后必须在所有退出路径上恢复。

use std::{
    env,
    path::{Path, PathBuf},
};

use scopeguard::ScopeGuard;

use crate::error::BuildError;

/// 切换工作目录，drop 时恢复原目录
///
/// 恢复动作在 [`WorkingDirGuard::enter`] 成功时就注册好，提前 return 或 panic 都会执行。
/// drop 中的恢复失败只能记日志；需要知道恢复结果时调用 [`WorkingDirGuard::leave`]。
pub struct WorkingDirGuard {
    previous: ScopeGuard<PathBuf, fn(PathBuf)>,
}

impl WorkingDirGuard {
    pub fn enter(dir: &Path) -> Result<Self, BuildError> {
        let previous = env::current_dir().map_err(|source| BuildError::UnexpectedIo {
            action: "read current",
            path: dir.to_path_buf(),
            source,
        })?;

        env::set_current_dir(dir).map_err(|source| BuildError::UnexpectedIo {
            action: "enter",
            path: dir.to_path_buf(),
            source,
        })?;
        log::debug!("Entered working directory {:?} (was {:?})", dir, previous);

        Ok(Self {
            previous: scopeguard::guard(previous, restore as fn(PathBuf)),
        })
    }

    /// 进入前的工作目录
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    /// 恢复原目录并返回结果
    pub fn leave(self) -> Result<(), BuildError> {
        let previous = ScopeGuard::into_inner(self.previous);
        env::set_current_dir(&previous).map_err(|source| BuildError::UnexpectedIo {
            action: "restore",
            path: previous.clone(),
            source,
        })?;
        log::debug!("Restored working directory {:?}", previous);
        Ok(())
    }
}

fn restore(previous: PathBuf) {
    match env::set_current_dir(&previous) {
        Ok(()) => log::debug!("Restored working directory {:?}", previous),
        Err(err) => log::error!("Failed to restore working directory {:?}: {err}", previous),
    }
}
