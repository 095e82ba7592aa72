//! # Carousel Driver
//!
//! Runs a [`Carousel`] on the tokio clock. The carousel itself never reads
//! time; the driver feeds it one `tick` per frame and forwards commands.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Carousel Driver                                 │
//! │                                                                         │
//! │   CarouselHandle (Clone)                 CarouselDriver::run()          │
//! │   ──────────────────────                 ──────────────────────         │
//! │   send(CarouselCommand) ──── mpsc ────►  select! {                      │
//! │                                            frame.tick()  → tick(now)    │
//! │   view() / watch()      ◄─── watch ────    command       → apply        │
//! │                                          }                              │
//! │   subscribe()           ◄── broadcast ─  every CarouselEvent            │
//! │                                                                         │
//! │   unmount() ──► Unmount command ──► carousel.unmount(), loop exits      │
//! │   (last handle dropped has the same effect)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use designo_core::{Carousel, CarouselEvent, CarouselView, Slide, SlideKey};

use crate::error::{MediaError, MediaResult};

/// Default frame interval (~60 fps).
pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);

/// Capacity of the command and event channels.
const CHANNEL_CAPACITY: usize = 64;

/// Current time on the tokio clock, as the carousel expects it.
///
/// Follows the paused clock in tests.
pub fn clock_now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Input forwarded to the carousel.
#[derive(Debug, Clone)]
pub enum CarouselCommand {
    PointerEnter(SlideKey),
    PointerLeave,
    Select(SlideKey),
    Resize(u32),
    Append(Vec<Slide>),
    Replace(Vec<Slide>),
    AssetLoaded(SlideKey),
    AssetFailed(SlideKey),
    Suspend,
    Resume,
    Unmount,
}

/// Handle for controlling a running driver.
#[derive(Clone)]
pub struct CarouselHandle {
    commands: mpsc::Sender<CarouselCommand>,
    view: watch::Receiver<CarouselView>,
    events: broadcast::Sender<CarouselEvent>,
}

impl CarouselHandle {
    /// Forwards a command to the carousel.
    pub async fn send(&self, command: CarouselCommand) -> MediaResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| MediaError::ShuttingDown)
    }

    /// Latest published snapshot.
    pub fn view(&self) -> CarouselView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every snapshot change.
    pub fn watch(&self) -> watch::Receiver<CarouselView> {
        self.view.clone()
    }

    /// Stream of carousel events.
    pub fn subscribe(&self) -> broadcast::Receiver<CarouselEvent> {
        self.events.subscribe()
    }

    /// Tears the carousel down. No tick runs afterwards.
    pub async fn unmount(&self) -> MediaResult<()> {
        self.commands
            .send(CarouselCommand::Unmount)
            .await
            .map_err(|e| MediaError::ChannelError(e.to_string()))
    }

    /// Returns true once the driver loop has exited.
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

/// Background loop that owns the carousel.
pub struct CarouselDriver {
    carousel: Carousel,
    frame: Duration,
    rng: StdRng,
    commands: mpsc::Receiver<CarouselCommand>,
    view: watch::Sender<CarouselView>,
    events: broadcast::Sender<CarouselEvent>,
}

impl CarouselDriver {
    /// Wraps an already mounted carousel.
    pub fn new(carousel: Carousel, frame: Duration) -> (Self, CarouselHandle) {
        Self::with_rng(carousel, frame, StdRng::from_os_rng())
    }

    /// Same as [`new`](Self::new) with a fixed RNG for shuffled appends.
    pub fn with_rng(carousel: Carousel, frame: Duration, rng: StdRng) -> (Self, CarouselHandle) {
        let (command_tx, command_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (view_tx, view_rx) = watch::channel(carousel.view());
        let (event_tx, _) = broadcast::channel(CHANNEL_CAPACITY);

        let driver = CarouselDriver {
            carousel,
            frame,
            rng,
            commands: command_rx,
            view: view_tx,
            events: event_tx.clone(),
        };
        let handle = CarouselHandle {
            commands: command_tx,
            view: view_rx,
            events: event_tx,
        };

        (driver, handle)
    }

    /// Creates a driver and runs it on a new task.
    pub fn spawn(carousel: Carousel, frame: Duration) -> (CarouselHandle, JoinHandle<()>) {
        let (driver, handle) = Self::new(carousel, frame);
        (handle, tokio::spawn(driver.run()))
    }

    /// Runs the frame loop until unmounted.
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) {
        info!(slides = self.carousel.slides().len(), "Carousel driver starting");

        let mut frame = tokio::time::interval(self.frame);
        frame.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = frame.tick() => {
                    let events = self.carousel.tick(clock_now());
                    self.publish(events);
                }

                command = self.commands.recv() => {
                    match command {
                        Some(CarouselCommand::Unmount) | None => {
                            self.carousel.unmount();
                            self.publish(Vec::new());
                            break;
                        }
                        Some(command) => {
                            self.apply(command);
                            let events = self.carousel.take_events();
                            self.publish(events);
                        }
                    }
                }
            }
        }

        self.commands.close();
        info!("Carousel driver stopped");
    }

    fn apply(&mut self, command: CarouselCommand) {
        let now = clock_now();
        debug!(?command, "Carousel command");
        match command {
            CarouselCommand::PointerEnter(key) => self.carousel.pointer_enter(&key),
            CarouselCommand::PointerLeave => self.carousel.pointer_leave(now),
            CarouselCommand::Select(key) => {
                self.carousel.select(&key, now);
            }
            CarouselCommand::Resize(width) => self.carousel.set_viewport_width(width),
            CarouselCommand::Append(slides) => {
                self.carousel.append_slides(slides, now, &mut self.rng)
            }
            CarouselCommand::Replace(slides) => {
                self.carousel.replace_slides(slides, now, &mut self.rng)
            }
            CarouselCommand::AssetLoaded(key) => self.carousel.asset_loaded(&key),
            CarouselCommand::AssetFailed(key) => self.carousel.asset_failed(&key),
            CarouselCommand::Suspend => self.carousel.suspend(),
            CarouselCommand::Resume => self.carousel.resume_from_clean(now),
            CarouselCommand::Unmount => self.carousel.unmount(),
        }
    }

    fn publish(&self, events: Vec<CarouselEvent>) {
        for event in events {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
        let view = self.carousel.view();
        self.view.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}
