use crate::config::Config;

/// Summary of the effective configuration, printed by `fetchbot doctor`.
pub fn render_status(config: &Config) -> String {
    let admin = config
        .membership
        .admin_id
        .map_or_else(|| "(none)".to_string(), |id| id.to_string());

    [
        format!("◆ {}", t!("doctor.title")),
        String::new(),
        format!("  {:<18} {}", t!("doctor.version"), env!("CARGO_PKG_VERSION")),
        format!("  {:<18} {}", t!("doctor.config"), config.config_path.display()),
        format!("  {:<18} {}", t!("doctor.api_base"), config.telegram.api_base),
        format!(
            "  {:<18} {}",
            t!("doctor.channel"),
            config.membership.required_channel
        ),
        format!("  {:<18} {admin}", t!("doctor.admin")),
        format!(
            "  {:<18} {}",
            t!("doctor.download_dir"),
            config.download.resolved_dir().display()
        ),
        format!("  {:<18} {}", t!("doctor.workers"), config.download.workers),
        format!(
            "  {:<18} {} MiB",
            t!("doctor.inline_limit"),
            config.delivery.inline_limit_mb
        ),
    ]
    .join("\n")
}
