//! Notification sink collaborator: transient user-facing messages.
//!
//! Fire-and-forget; the core never consumes a return value.

use bevy_ecs::prelude::Resource;

pub trait NotificationSink: Send + Sync {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// ECS resource wrapping a boxed notification sink.
#[derive(Resource)]
pub struct NotificationSinkResource(pub Box<dyn NotificationSink>);

/// Routes notifications to the `log` facade.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn success(&self, message: &str) {
        log::info!("{message}");
    }

    fn error(&self, message: &str) {
        log::warn!("{message}");
    }
}
