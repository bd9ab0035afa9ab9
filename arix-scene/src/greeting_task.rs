//! This module runs greeting requests off the render thread.

use arix_greeting::GreetingService;
use async_channel::{Receiver, Sender};
use bevy::prelude::Resource;
use std::{io, sync::Arc};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, error, instrument};

/// Runs [`GreetingService`] calls on a small async runtime and hands the results back to the
/// render loop through a channel.
#[derive(Resource)]
pub struct GreetingRuntime {
    /// The runtime that the requests run on.
    runtime: Runtime,

    /// The service that writes the greetings.
    service: Arc<GreetingService>,

    /// The tone to ask for.
    tone: String,

    /// The sending end of the channel, cloned into every request.
    tx: Sender<String>,

    /// The receiving end of the channel, polled every frame.
    rx: Receiver<String>,
}

impl GreetingRuntime {
    /// Start the runtime.
    pub fn new(service: Arc<GreetingService>, tone: String) -> io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("greeting-worker")
            .enable_all()
            .build()?;
        let (tx, rx) = async_channel::unbounded();

        Ok(Self {
            runtime,
            service,
            tone,
            tx,
            rx,
        })
    }

    /// Ask for a greeting to `recipient`. The result will come out of [`Self::try_recv`] later.
    ///
    /// Nothing stops several requests from being in flight at once, and a request can't be
    /// cancelled once it's been made.
    #[instrument(skip(self))]
    pub fn request(&self, recipient: String) {
        let service = Arc::clone(&self.service);
        let tone = self.tone.clone();
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let text = service.generate(&recipient, &tone).await;
            debug!(?text, "Greeting ready");

            if let Err(e) = tx.send(text).await {
                error!(?e, "Error sending greeting down channel");
            }
        });
    }

    /// Take a finished greeting, if there is one.
    pub fn try_recv(&self) -> Option<String> {
        self.rx.try_recv().ok()
    }
}
