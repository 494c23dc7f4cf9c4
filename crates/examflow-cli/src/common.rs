use examflow_core::storage::Config;
use examflow_core::{ConsoleNotifier, Notifier, WebhookNotifier};

/// Delivery channel per config: the webhook when one is configured,
/// the console otherwise. Disabled notifications deny permission
/// outright, so evaluation marks nothing.
pub fn build_notifier(config: &Config) -> Result<Box<dyn Notifier>, Box<dyn std::error::Error>> {
    if !config.notifications.enabled {
        return Ok(Box::new(ConsoleNotifier::disabled()));
    }
    if let Some(url) = &config.notifications.webhook_url {
        return Ok(Box::new(WebhookNotifier::new(url)?));
    }
    Ok(Box::new(ConsoleNotifier::new()))
}

/// Runtime for the commands that drive async core calls.
pub fn runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}
