use anyhow::Result;
use dotenvy::dotenv;
use log::{info, warn};
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use command_invoker::bindings::{BindingConfig, BindingHost, ConverterRegistry};
use command_invoker::commands::{
    BoundTarget, Command, CommandTable, Member, Payload, RelayCommand,
};
use command_invoker::core::Config;

/// Demo target exposing a few editor commands
struct Editor {
    title: Arc<Mutex<String>>,
    zoom: Arc<AtomicI64>,
    save: Arc<dyn Command>,
    rename: Arc<dyn Command>,
    set_zoom: Arc<dyn Command>,
}

impl Editor {
    fn new() -> Self {
        let title = Arc::new(Mutex::new("untitled".to_string()));
        let zoom = Arc::new(AtomicI64::new(100));

        let save_title = Arc::clone(&title);
        let save = Arc::new(RelayCommand::new(move |_| {
            let title = save_title
                .lock()
                .map_err(|_| anyhow::anyhow!("title lock poisoned"))?;
            info!("💾 Saved '{title}'");
            Ok(())
        }));

        let rename_title = Arc::clone(&title);
        let rename = Arc::new(
            RelayCommand::new(move |p| {
                let new_title = json_str(p).unwrap_or_default().to_string();
                let mut title = rename_title
                    .lock()
                    .map_err(|_| anyhow::anyhow!("title lock poisoned"))?;
                info!("✏️ Renamed '{title}' to '{new_title}'");
                *title = new_title;
                Ok(())
            })
            .with_can_execute(|p| Ok(json_str(p).is_some_and(|s| !s.trim().is_empty()))),
        );

        let zoom_level = Arc::clone(&zoom);
        let set_zoom = Arc::new(
            RelayCommand::new(move |p| {
                let level = json_i64(p).unwrap_or(100);
                zoom_level.store(level, Ordering::SeqCst);
                info!("🔍 Zoom set to {level}%");
                Ok(())
            })
            .with_can_execute(|p| Ok(json_i64(p).is_some_and(|n| (10..=400).contains(&n)))),
        );

        Self {
            title,
            zoom,
            save,
            rename,
            set_zoom,
        }
    }

    fn title(&self) -> String {
        self.title.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl BoundTarget for Editor {
    fn type_name(&self) -> &str {
        "Editor"
    }

    fn members(&self) -> Vec<Member> {
        vec![
            Member::command("Save", Arc::clone(&self.save)),
            Member::command("Rename", Arc::clone(&self.rename)),
            Member::command("Zoom", Arc::clone(&self.set_zoom)),
            Member::value("Title", Some(Payload::new(Value::String(self.title())))),
            Member::value(
                "ZoomLevel",
                Some(Payload::new(Value::from(self.zoom.load(Ordering::SeqCst)))),
            ),
        ]
    }
}

fn json_str(p: Option<&Payload>) -> Option<&str> {
    p.and_then(|p| p.downcast_ref::<Value>()).and_then(Value::as_str)
}

fn json_i64(p: Option<&Payload>) -> Option<i64> {
    p.and_then(|p| p.downcast_ref::<Value>()).and_then(Value::as_i64)
}

/// Commands bindings can reference with `command_ref`
fn command_library() -> CommandTable {
    CommandTable::new("Library").with_command(
        "Audit",
        Arc::new(RelayCommand::new(|p| {
            let detail = p
                .and_then(|p| p.downcast_ref::<Value>())
                .map(Value::to_string)
                .unwrap_or_else(|| "null".to_string());
            info!("📋 Audit: {detail}");
            Ok(())
        })),
    )
}

/// Event payloads are JSON; anything that does not parse is taken as a string
fn parse_payload(raw: &str) -> Payload {
    let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Payload::new(value)
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(event) = args.next() else {
        eprintln!("usage: invoke <event> [payload-json]");
        std::process::exit(2);
    };
    let payload = args.next().map(|raw| parse_payload(&raw));

    let converters = ConverterRegistry::with_builtins();
    let bindings = BindingConfig::load(&config.bindings_path, &converters)?;
    info!(
        "📄 Loaded {} binding(s) from {}",
        bindings.bindings.len(),
        config.bindings_path
    );

    let editor = Arc::new(Editor::new());
    let target: Arc<dyn BoundTarget> = editor.clone();
    let host = BindingHost::build(&bindings, &converters, &command_library(), target)?;

    let outcomes = host.fire(&event, payload.as_ref())?;
    if outcomes.is_empty() {
        warn!("No bindings for event '{event}'");
    }
    for (index, outcome) in outcomes.iter().enumerate() {
        println!("#{index} {event}: {outcome}");
    }

    info!(
        "Editor state: title='{}' zoom={}%",
        editor.title(),
        editor.zoom.load(Ordering::SeqCst)
    );

    Ok(())
}
