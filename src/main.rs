use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;

use update_commit::cli::{run_update, Args};
use update_commit::clock::SystemClock;
use update_commit::{config, ui};

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            e.print()?;
            std::process::exit(1);
        }
    };

    // Load configuration
    let mut config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };
    args.apply_overrides(&mut config);

    let update_args = match args.update_args() {
        Ok(update_args) => update_args,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    ui::display_status(&format!(
        "Updating {} ({} scheme) to kernel {} at commit {}",
        update_args.debian_dir.display(),
        update_args.scheme,
        update_args.kernel_version,
        update_args.commit_id
    ));

    let report = match run_update(&update_args, &config, &SystemClock) {
        Ok(report) => report,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    ui::display_report(&report);
    Ok(())
}
