//! # xtask
//!
//! 本地门禁与开发命令，用 `cargo xtask <command>` 调用。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-core`: 运行 nav-transition 覆盖率
//! - `demo`: 运行转场演示
//! - `config-check`: 检查转场配置文件

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use nav_transition::TransitionConfig;
use walkdir::WalkDir;

/// `check-all` 依次执行的 cargo 子命令
const GATES: &[&[&str]] = &[
    &["fmt", "--all", "--", "--check"],
    &["clippy", "--workspace", "--all-targets"],
    &["test", "--workspace"],
];

/// 以 `cargo <args>` 执行一步，非零退出即失败
fn cargo<S: AsRef<str>>(args: &[S]) -> anyhow::Result<()> {
    let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
    let step = format!("cargo {}", args.join(" "));
    eprintln!("\n==> {step}");

    let status = Command::new("cargo").args(&args).status()?;
    anyhow::ensure!(status.success(), "{step} 失败（{status}）");
    Ok(())
}

fn llvm_cov_installed() -> bool {
    Command::new("cargo")
        .args(["llvm-cov", "--version"])
        .output()
        .is_ok_and(|out| out.status.success())
}

fn main() -> ExitCode {
    match dispatch(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xtask error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(args: Vec<String>) -> anyhow::Result<()> {
    let (sub, rest) = match args.split_first() {
        Some((sub, rest)) => (sub.as_str(), rest),
        None => ("help", &[][..]),
    };

    match sub {
        "check-all" => GATES.iter().try_for_each(|gate| cargo(*gate)),
        "cov-core" => {
            anyhow::ensure!(
                llvm_cov_installed(),
                "找不到 cargo llvm-cov，先执行 `cargo install cargo-llvm-cov` \
                 与 `rustup component add llvm-tools-preview`"
            );
            cargo(&["llvm-cov", "-p", "nav-transition", "--all-features", "--html"])?;
            eprintln!("\n覆盖率报告: target/llvm-cov/html/index.html");
            Ok(())
        }
        "demo" => {
            // 其余参数原样传给 nav-demo
            let mut args = vec!["run", "-p", "nav-demo", "--"];
            args.extend(rest.iter().map(String::as_str));
            cargo(&args)
        }
        "config-check" => config_check(rest.first().map(String::as_str)),
        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        other => anyhow::bail!("未知子命令: {other}（见 `cargo xtask help`）"),
    }
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-core        运行 nav-transition 覆盖率报告
  demo [args]     运行转场演示（参数传给 nav-demo）
  config-check    检查转场配置文件

CONFIG-CHECK:
  cargo xtask config-check [path]

  不带参数：检查 config/ 下所有 .json 文件
  带路径参数：检查指定文件或目录
"#
    );
}

// ---------- config-check ----------

const DEFAULT_CONFIG_DIR: &str = "config";

fn config_check(path: Option<&str>) -> anyhow::Result<()> {
    let root = Path::new(path.unwrap_or(DEFAULT_CONFIG_DIR));
    anyhow::ensure!(
        root.exists(),
        "{} 不存在，请在 workspace 根目录运行或显式给出路径",
        root.display()
    );

    let files = json_files(root)?;
    if files.is_empty() {
        eprintln!("{} 下没有 .json 文件", root.display());
        return Ok(());
    }

    let mut invalid = 0usize;
    for file in &files {
        match TransitionConfig::try_load(file) {
            Ok(config) => {
                eprintln!("[OK] {}", file.display());
                eprintln!("{}", serde_json::to_string_pretty(&config)?);
            }
            Err(e) => {
                eprintln!("[ERROR] {}: {e}", file.display());
                invalid += 1;
            }
        }
    }

    anyhow::ensure!(invalid == 0, "{invalid}/{} 个配置文件无效", files.len());
    eprintln!("\n{} 个配置文件全部有效", files.len());
    Ok(())
}

fn json_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => {
                let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
                is_json.then(|| Ok(entry.into_path()))
            }
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();
    Ok(files)
}
