use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::{Layer, layer::Context};

use super::{LogEntry, LogState};
use std::time::SystemTime;

/// Le message passe en tête, les champs structurés suivent en `nom=valeur`
#[derive(Default)]
struct LogVisitor {
    message: String,
    fields: Vec<String>,
}

impl LogVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }
        let fields = self.fields.join(" ");
        if self.message.is_empty() {
            fields
        } else {
            format!("{} {}", self.message, fields)
        }
    }
}

impl Visit for LogVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

/// Layer de tracing qui copie chaque évènement dans le buffer circulaire
pub struct BufferLayer {
    state: LogState,
}

impl BufferLayer {
    pub fn new(state: LogState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for BufferLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LogVisitor::default();
        event.record(&mut visitor);

        let entry = LogEntry {
            timestamp: SystemTime::now(),
            level: event.metadata().level().to_string(),
            target: event.metadata().target().to_string(),
            message: visitor.finish(),
        };

        self.state.push(entry);
    }
}
