use clap::CommandFactory;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

#[allow(dead_code)]
#[path = "src/cli/args.rs"]
mod args;

fn main() -> std::io::Result<()> {
    emit_build_metadata();

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap_or_else(|_| "target".to_string()));
    let man_dir = out_dir.join("man1");
    fs::create_dir_all(&man_dir)?;
    render_man_pages(&args::Cli::command(), &man_dir, "")?;

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=src/cli/args.rs");
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}

fn emit_build_metadata() {
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let build_date = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=BUILD_DATE={}", build_date);
}

/// One page per command, named `ballot-<sub>.1` for subcommands.
fn render_man_pages(cmd: &clap::Command, dir: &Path, prefix: &str) -> std::io::Result<()> {
    let name = match prefix {
        "" => cmd.get_name().to_string(),
        _ => format!("{}-{}", prefix, cmd.get_name()),
    };

    let mut page = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut page)?;
    fs::write(dir.join(format!("{}.1", name)), page)?;

    for sub in cmd.get_subcommands().filter(|sub| !sub.is_hide_set()) {
        render_man_pages(sub, dir, &name)?;
    }
    Ok(())
}
