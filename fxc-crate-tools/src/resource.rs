use std::{env, ffi::OsString, path::PathBuf};

/// 约定路径管理
///
/// fxc 随 Windows 10 SDK 一起安装，典型位置：
/// `C:\Program Files (x86)\Windows Kits\10\bin\10.0.22621.0\x64\fxc.exe`
///
/// # 使用示例
/// ```ignore
/// let sdk_bin = FxcPath::windows_sdk_bin_path(); // <ProgramFiles(x86)>/Windows Kits/10/bin
/// let manifest = FxcPath::manifest_path();       // ./shaders.toml
/// ```
pub struct FxcPath;

// 约定名称
impl FxcPath {
    /// shader 编译器的可执行文件名
    pub const FXC_EXECUTABLE: &'static str = "fxc.exe";

    /// 优先选择的编译器架构目录
    pub const PREFERRED_ARCH: &'static str = "x64";

    /// 构建清单的默认文件名
    pub const MANIFEST_FILE: &'static str = "shaders.toml";

    /// shader 源码所在目录（相对于当前目录或 manifest 所在目录）
    pub const SHADER_DIR: &'static str = "shaders";
}

// 具体路径
impl FxcPath {
    /// Windows 10 SDK 的 `bin` 目录，各个版本号子目录都在这里
    pub fn windows_sdk_bin_path() -> PathBuf {
        Self::sdk_bin_path_from(env::var_os("ProgramFiles(x86)"))
    }

    fn sdk_bin_path_from(program_files: Option<OsString>) -> PathBuf {
        let mut path = program_files.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(r"C:\Program Files (x86)"));
        path.extend(["Windows Kits", "10", "bin"]);
        path
    }

    /// 当前目录下的默认构建清单
    pub fn manifest_path() -> PathBuf {
        PathBuf::from(Self::MANIFEST_FILE)
    }

    /// 当前目录下的默认 shader 目录
    pub fn shader_dir() -> PathBuf {
        PathBuf::from(Self::SHADER_DIR)
    }
}
