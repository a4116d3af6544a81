//! HLSL shader 构建工具
//!
//! 定位 Windows SDK 中的 `fxc.exe`，然后按顺序为每个入口点调用一次，
//! 把同一个 `.hlsl` 源文件编译成多个 Direct3D10 字节码文件。
//!
//! - [`locator`]: 在 `PATH` 与 SDK 目录中查找编译器
//! - [`job`]: 单个编译任务的描述与校验
//! - [`compiler`]: 启动外部编译器进程
//! - [`driver`]: 串联以上步骤，遇到第一个失败即停止
//! - [`manifest`]: 从 `shaders.toml` 读取构建配置

pub mod compiler;
pub mod driver;
pub mod error;
pub mod job;
pub mod locator;
pub mod manifest;
pub mod working_dir;

pub use driver::{BuildConfig, BuildDriver, BuildSummary, run_build};
pub use error::BuildError;
pub use job::{OptLevel, ShaderJob};
pub use locator::CompilerLocator;
