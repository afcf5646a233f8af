//! The cart state container.
//!
//! A mounted [`CartContainer`] owns one background task that holds the
//! current [`Cart`]. Every operation is a message on a bounded queue, and the
//! task handles messages strictly one at a time:
//!
//! 1. Hydrate from storage (always the first thing the task does)
//! 2. For each mutation: compute the next cart from the current one, persist
//!    it, then publish it to subscribers
//!
//! Because the task owns the only copy that mutations read from, two
//! operations fired back to back can never compute from the same stale
//! snapshot. Operations sent before hydration finishes run after it.
//!
//! A mutation whose persist fails is discarded: the caller gets the error
//! and the published cart stays at the last successfully saved state.

use go_marketplace_core::{Cart, CartItem, NewCartItem, ProductId};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::storage::CartStorage;

/// Progress of the one-time load of the persisted cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Hydration has not finished yet; the cart reads as empty.
    Loading,
    /// Hydration finished (with or without a persisted cart).
    Ready,
    /// Hydration failed; the cart started empty.
    Failed(String),
}

/// Snapshot published to subscribers after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartState {
    pub cart: Cart,
    pub status: LoadStatus,
}

impl CartState {
    /// Whether hydration is still in progress.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

enum Mutation {
    Add(NewCartItem),
    Increment(ProductId),
    Decrement(ProductId),
    Clear,
}

struct Command {
    mutation: Mutation,
    reply: oneshot::Sender<Result<Cart>>,
}

/// A mounted cart. Dropping it (or calling [`unmount`](Self::unmount)) stops
/// the background task; persisted data is left in place.
#[derive(Debug)]
pub struct CartContainer {
    handle: CartHandle,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl CartContainer {
    /// Mount a container over `storage` and start hydrating it.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn mount(storage: CartStorage, config: &CartConfig) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(config.queue_capacity.max(1));
        let (state_tx, state_rx) = watch::channel(CartState {
            cart: Cart::new(),
            status: LoadStatus::Loading,
        });
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let worker = CartWorker {
            storage,
            cart: Cart::new(),
            state: state_tx,
        };
        let task = tokio::spawn(worker.run(commands_rx, shutdown_rx));

        Self {
            handle: CartHandle {
                commands: commands_tx,
                state: state_rx,
            },
            shutdown: shutdown_tx,
            task,
        }
    }

    /// Get a handle for consumers.
    #[must_use]
    pub fn handle(&self) -> CartHandle {
        self.handle.clone()
    }

    /// Stop accepting operations, finish the ones already queued, and wait
    /// for the background task to exit.
    pub async fn unmount(self) {
        let Self {
            handle,
            shutdown,
            task,
        } = self;
        drop(handle);
        // The worker also stops if the receiver is gone, so a failed send is fine.
        let _ = shutdown.send(());

        if let Err(e) = task.await {
            error!(error = %e, "Cart container task failed");
        }
    }
}

/// Cloneable access to a mounted cart.
#[derive(Debug, Clone)]
pub struct CartHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<CartState>,
}

impl CartHandle {
    /// The current items, in the order they were first added.
    #[must_use]
    pub fn products(&self) -> Vec<CartItem> {
        self.state.borrow().cart.items().to_vec()
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.state.borrow().cart.clone()
    }

    /// The current cart and hydration status.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Subscribe to changes. The receiver is notified after hydration and
    /// after every successful mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.clone()
    }

    /// Wait until the persisted cart has been loaded.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Hydration`] if loading failed (the cart is still
    /// usable and starts empty) and [`CartError::Unmounted`] if the container
    /// stopped before hydration finished.
    pub async fn initialized(&self) -> Result<()> {
        let mut state = self.state.clone();
        let status = state
            .wait_for(|s| !s.is_loading())
            .await
            .map_err(|_| CartError::Unmounted)?
            .status
            .clone();

        match status {
            LoadStatus::Failed(reason) => Err(CartError::Hydration(reason)),
            LoadStatus::Loading | LoadStatus::Ready => Ok(()),
        }
    }

    /// Add one unit of `product`.
    ///
    /// Appends it with quantity 1 if absent, otherwise increments the
    /// existing line. Not idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails or the container is unmounted.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: NewCartItem) -> Result<Vec<CartItem>> {
        self.send(Mutation::Add(product)).await
    }

    /// Add one unit to an existing line. Unknown IDs are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails or the container is unmounted.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn increment(&self, id: &ProductId) -> Result<Vec<CartItem>> {
        self.send(Mutation::Increment(id.clone())).await
    }

    /// Remove one unit from an existing line, dropping the line at zero.
    /// Unknown IDs are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails or the container is unmounted.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn decrement(&self, id: &ProductId) -> Result<Vec<CartItem>> {
        self.send(Mutation::Decrement(id.clone())).await
    }

    /// Empty the cart and remove it from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails or the container is unmounted.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        self.send(Mutation::Clear).await.map(|_| ())
    }

    async fn send(&self, mutation: Mutation) -> Result<Vec<CartItem>> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command { mutation, reply })
            .await
            .map_err(|_| CartError::Unmounted)?;

        let cart = response.await.map_err(|_| CartError::Unmounted)??;
        Ok(cart.into_items())
    }
}

struct CartWorker {
    storage: CartStorage,
    cart: Cart,
    state: watch::Sender<CartState>,
}

impl CartWorker {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        self.hydrate().await;

        loop {
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
                _ = &mut shutdown => {
                    commands.close();
                    while let Some(command) = commands.recv().await {
                        self.handle(command).await;
                    }
                    break;
                }
            }
        }

        debug!(key = %self.storage.key(), "Cart container stopped");
    }

    async fn hydrate(&mut self) {
        let status = match self.storage.load().await {
            Ok(Some(cart)) => {
                info!(items = cart.len(), "Hydrated cart from storage");
                self.cart = cart;
                LoadStatus::Ready
            }
            Ok(None) => {
                info!("No persisted cart, starting empty");
                LoadStatus::Ready
            }
            Err(e) => {
                error!(error = %e, "Failed to hydrate cart");
                LoadStatus::Failed(e.to_string())
            }
        };

        let cart = self.cart.clone();
        self.state.send_modify(|state| {
            state.cart = cart;
            state.status = status;
        });
    }

    async fn handle(&mut self, command: Command) {
        let result = self.apply(command.mutation).await;
        // The caller may have stopped waiting; the mutation still counts.
        let _ = command.reply.send(result);
    }

    async fn apply(&mut self, mutation: Mutation) -> Result<Cart> {
        let mut next = self.cart.clone();
        let clearing = matches!(mutation, Mutation::Clear);

        let changed = match mutation {
            Mutation::Add(product) => next.add(product),
            Mutation::Increment(id) => next.increment(&id),
            Mutation::Decrement(id) => next.decrement(&id),
            Mutation::Clear => {
                next.clear();
                true
            }
        };

        if !changed {
            debug!("Product not in cart or quantity at maximum, nothing to do");
            return Ok(self.cart.clone());
        }

        let persisted = if clearing {
            self.storage.clear().await
        } else {
            self.storage.save(&next).await
        };
        if let Err(e) = persisted {
            error!(error = %e, "Failed to persist cart, change discarded");
            return Err(e);
        }

        self.cart = next;
        let cart = self.cart.clone();
        self.state.send_modify(|state| state.cart = cart);
        Ok(self.cart.clone())
    }
}
