//! 用 shell 脚本代替 fxc，验证真实的进程调用

#![cfg(unix)]

mod common;

use std::{env, fs, os::unix::fs::PermissionsExt};

use common::{ScratchDir, lock_cwd, locator_on_path};
use fxc_shader_build::{BuildConfig, BuildError, CompilerLocator, OptLevel, job::egui_jobs, run_build};

/// 写入一个可执行的假 fxc
fn fake_fxc(dir: &ScratchDir, script: &str) {
    fake_fxc_at(dir, "bin/fxc.exe", script);
}

fn fake_fxc_at(dir: &ScratchDir, relative: &str, script: &str) {
    let path = dir.touch(relative);
    fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn config(root: &ScratchDir) -> BuildConfig {
    BuildConfig {
        locator: locator_on_path(&root.path().join("bin")),
        shader_dir: root.mkdir("shaders"),
        optimization: OptLevel::default(),
        dry_run: false,
    }
}

#[test]
fn test_fake_fxc_writes_outputs() {
    let _lock = lock_cwd();
    let root = ScratchDir::new("fxc-ok");
    // 记录参数并写出 /Fo 之后的文件
    fake_fxc(
        &root,
        r#"echo "$@" >> invocations.log
for arg; do out="$arg"; done
printf 'DXBC' > "$out""#,
    );
    let before = env::current_dir().unwrap();

    let summary = run_build(&egui_jobs(), config(&root)).unwrap();

    let shader_dir = root.path().join("shaders");
    for output in &summary.outputs {
        assert_eq!(fs::read(shader_dir.join(output)).unwrap(), b"DXBC");
    }
    let log = fs::read_to_string(shader_dir.join("invocations.log")).unwrap();
    assert_eq!(
        log.lines().collect::<Vec<_>>(),
        [
            "egui.hlsl /nologo /O3 /T vs_4_0 /E vs_egui /Fo vs_egui.bin",
            "egui.hlsl /nologo /O3 /T ps_4_0 /E ps_egui /Fo ps_egui.bin",
        ]
    );
    assert_eq!(env::current_dir().unwrap(), before);
}

#[test]
fn test_fake_fxc_exit_code_is_reported() {
    let _lock = lock_cwd();
    let root = ScratchDir::new("fxc-fail");
    fake_fxc(&root, "echo \"$7\" >> invocations.log\necho 'error X3000: syntax error' >&2\nexit 3");
    let before = env::current_dir().unwrap();

    let err = run_build(&egui_jobs(), config(&root)).unwrap_err();

    assert!(matches!(err, BuildError::CompilationFailed { index: 1, code: Some(3), .. }));
    let log = fs::read_to_string(root.path().join("shaders/invocations.log")).unwrap();
    assert_eq!(log.lines().collect::<Vec<_>>(), ["vs_egui"]);
    assert!(!root.path().join("shaders/ps_egui.bin").exists());
    assert_eq!(env::current_dir().unwrap(), before);
}

#[test]
fn test_fake_fxc_under_relative_sdk_root() {
    let _lock = lock_cwd();
    let root = ScratchDir::new("fxc-relative-sdk");
    fake_fxc_at(&root, "sdk/10.0.22621.0/x64/fxc.exe", r#"for arg; do out="$arg"; done
printf 'DXBC' > "$out""#);
    root.mkdir("shaders");
    let before = env::current_dir().unwrap();
    env::set_current_dir(root.path()).unwrap();

    let config = BuildConfig {
        locator: CompilerLocator::new("fxc.exe", "sdk").with_search_path(None),
        shader_dir: "shaders".into(),
        optimization: OptLevel::default(),
        dry_run: false,
    };
    let result = run_build(&egui_jobs(), config);
    env::set_current_dir(&before).unwrap();

    let summary = result.unwrap();
    assert_eq!(summary.compiler, root.path().join("sdk/10.0.22621.0/x64/fxc.exe"));
    assert_eq!(fs::read(root.path().join("shaders/vs_egui.bin")).unwrap(), b"DXBC");
    assert_eq!(fs::read(root.path().join("shaders/ps_egui.bin")).unwrap(), b"DXBC");
}
