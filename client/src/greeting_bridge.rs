//! Fetches the holiday greeting off the main thread.
//!
//! The request runs once at startup on its own thread with a current-thread
//! Tokio runtime; a system polls the channel until the text arrives.

use bevy::prelude::*;
use greeting::{GreetingClient, GreetingConfig, GreetingSource, StaticGreeting};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex};

use crate::settings::GreetingSettings;

/// The greeting collaborator. Insert one before [`GreetingPlugin`] to override it.
#[derive(Resource, Clone)]
pub struct GreetingSourceHandle(pub Arc<dyn GreetingSource>);

#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct GreetingText {
    pub text: String,
    pub pending: bool,
}

#[derive(Resource, Clone, Debug)]
struct GreetingTheme(String);

#[derive(Resource)]
struct GreetingInbox(Mutex<Receiver<String>>);

pub struct GreetingPlugin {
    enabled: bool,
    theme: String,
}

impl GreetingPlugin {
    pub fn from_settings(settings: &GreetingSettings) -> Self {
        Self {
            enabled: settings.enabled,
            theme: settings.theme.clone(),
        }
    }
}

impl Plugin for GreetingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GreetingText>();
        if !self.enabled {
            info!("Greeting generation disabled");
            return;
        }

        if !app.world().contains_resource::<GreetingSourceHandle>() {
            app.insert_resource(default_source());
        }

        app.insert_resource(GreetingTheme(self.theme.clone()))
            .add_systems(Startup, request_greeting)
            .add_systems(Update, receive_greeting);
    }
}

fn default_source() -> GreetingSourceHandle {
    let client = GreetingConfig::load().and_then(GreetingClient::new);
    match client {
        Ok(client) => GreetingSourceHandle(Arc::new(client)),
        Err(error) => {
            warn!("Greeting client unavailable: {}", error);
            GreetingSourceHandle(Arc::new(StaticGreeting::default()))
        }
    }
}

fn request_greeting(
    mut commands: Commands,
    source: Res<GreetingSourceHandle>,
    theme: Res<GreetingTheme>,
    mut greeting: ResMut<GreetingText>,
) {
    let (sender, receiver) = mpsc::channel();
    let source = Arc::clone(&source.0);
    let theme = theme.0.clone();

    let spawned = std::thread::Builder::new()
        .name("greeting".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(error) => {
                    warn!("Failed to start greeting runtime: {}", error);
                    let _ = sender.send(String::new());
                    return;
                }
            };
            let text = runtime.block_on(source.request_greeting(&theme));
            let _ = sender.send(text);
        });

    if let Err(error) = spawned {
        warn!("Failed to spawn greeting thread: {}", error);
        return;
    }

    commands.insert_resource(GreetingInbox(Mutex::new(receiver)));
    greeting.pending = true;
}

fn receive_greeting(
    mut commands: Commands,
    inbox: Option<Res<GreetingInbox>>,
    mut greeting: ResMut<GreetingText>,
) {
    let Some(inbox) = inbox else {
        return;
    };

    let received = match inbox.0.lock() {
        Ok(receiver) => receiver.try_recv(),
        Err(_) => Err(TryRecvError::Disconnected),
    };

    match received {
        Ok(text) => {
            if text.is_empty() {
                info!("Greeting unavailable; showing the title only");
            } else {
                info!("Greeting received ({} words)", text.split_whitespace().count());
            }
            greeting.text = text;
        }
        Err(TryRecvError::Empty) => return,
        Err(TryRecvError::Disconnected) => {
            warn!("Greeting thread ended without a result");
        }
    }

    greeting.pending = false;
    commands.remove_resource::<GreetingInbox>();
}
