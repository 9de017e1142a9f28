use sourceforge_harvest::cli::{run, Cli, Commands};
use std::fmt::Debug;
use std::fs::write;
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, NamedTempFile};
use tracing::field::{Field, Visit};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer collecting the `message` of every emitted event.
struct EventCollector {
    messages: Arc<Mutex<Vec<String>>>,
}

struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        if let Some(message) = visitor.0 {
            self.messages.lock().unwrap().push(message);
        }
    }
}

#[tokio::test]
async fn fetch_narrates_listing_failure_through_tracing() {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        messages: messages.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    let root = tempdir().unwrap();
    let target = root.path().join("mirror");
    let config = NamedTempFile::new().unwrap();
    write(
        config.path(),
        "settings:\n  api_base_url: \"http://127.0.0.1:9\"\n  request_timeout_secs: 5\n",
    )
    .unwrap();

    let cli = Cli {
        command: Commands::Fetch {
            config: Some(config.path().to_path_buf()),
            username: Some("alice".into()),
            target_directory: Some(target.clone()),
        },
    };

    run(cli).await.expect("listing failures are not fatal");

    let messages = messages.lock().unwrap();
    assert!(
        messages.iter().any(|m| m.starts_with(
            "Starting fetch process for SourceForge user 'alice'"
        )),
        "missing start event: {messages:?}"
    );
    assert!(
        messages
            .iter()
            .any(|m| m.starts_with("Error fetching repositories from SourceForge for user 'alice'")),
        "missing listing failure event: {messages:?}"
    );
}
