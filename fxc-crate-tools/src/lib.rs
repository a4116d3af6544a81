//! fxc 构建工具集
//!
//! 提供日志初始化、约定路径等通用工具。
//!
//! # FxcPath
//! Windows SDK、shader 目录、manifest 文件名等约定位置的统一管理，避免硬编码散落各处。

pub mod init_log;
pub mod resource;
