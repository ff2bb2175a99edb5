use gif_delay::AbortCount;

use crate::cli::ConfigArgs;
use crate::config::AppConfig;

pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.action {
        crate::cli::ConfigAction::Show => {
            let cfg = AppConfig::load_or_default()?;
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
        crate::cli::ConfigAction::Set { key, value } => {
            let mut cfg = AppConfig::load_or_default()?;
            apply_setting(&mut cfg, &key, &value)?;
            cfg.save()?;
            println!("Configuration updated.");
        }
    }
    Ok(())
}

fn apply_setting(cfg: &mut AppConfig, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "abort_count" => {
            cfg.abort_count = match value {
                "discard" => AbortCount::Discard,
                "preserve" => AbortCount::Preserve,
                _ => anyhow::bail!("abort_count must be 'discard' or 'preserve'"),
            }
        }
        "backup" => cfg.backup = value.parse()?,
        "user_friendly_report" => cfg.user_friendly_report = value.parse()?,
        _ => anyhow::bail!("Unknown config key: {key}"),
    }
    Ok(())
}
