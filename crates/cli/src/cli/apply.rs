use std::fs::File;
use std::io::BufReader;

use anyhow::Context;

use crate::cli::{ApplyArgs, GlobalArgs, finish_update, open_for_update};
use crate::config::AppConfig;

pub fn execute(global: &GlobalArgs, cfg: &AppConfig, args: ApplyArgs) -> anyhow::Result<()> {
    let settings = global.resolve(cfg);

    // Open the list first so a missing list never triggers a backup copy.
    let durations = File::open(&args.durations)
        .with_context(|| format!("failed to open {}", args.durations.display()))?;
    let mut file = open_for_update(&args.file, settings.backup)?;

    let outcome = gif_delay::set_durations_from_lines(
        &mut file,
        BufReader::new(durations),
        settings.abort_count,
    );
    finish_update(outcome)
}
