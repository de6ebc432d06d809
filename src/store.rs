//! Collection store: the one owner of the in-memory author list.
//!
//! Each operation delegates to the gateway, then applies the result at a
//! fixed commit point: list replaces wholesale, create appends, update
//! replaces in place, and delete removes only after the backend confirmed
//! success. Failures never touch the list: they land in `last_error` and
//! go to the notifier exactly once, then return to the caller.
//!
//! The state lock is never held across a suspension point, so overlapping
//! operations interleave at operation granularity. Operations on the same
//! id are not serialized: the last response to resolve wins.

use crate::gateway::{AuthorGateway, GatewayError};
use crate::model::{Author, AuthorUpdate, NewAuthor};
use crate::notify::Notifier;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct StoreState {
    items: Vec<Author>,
    is_loading: bool,
    last_error: Option<String>,
}

pub struct AuthorStore<G, N> {
    gateway: G,
    notifier: N,
    state: RwLock<StoreState>,
}

impl<G: AuthorGateway, N: Notifier> AuthorStore<G, N> {
    pub fn new(gateway: G, notifier: N) -> Self {
        Self {
            gateway,
            notifier,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Snapshot of the current list, in server-returned order.
    #[must_use]
    pub fn authors(&self) -> Vec<Author> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .clone()
    }

    /// True only while a list fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_loading
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last_error
            .clone()
    }

    pub fn clear_error(&self) {
        self.write().last_error = None;
    }

    /// Fetch the full collection and replace the list wholesale. On failure
    /// the previous list is kept, so a transient error cannot blank out an
    /// already-loaded view.
    pub async fn refresh(&self) -> Result<(), GatewayError> {
        {
            let mut state = self.write();
            state.is_loading = true;
            state.last_error = None;
        }

        let result = self.gateway.find_all_authors().await;

        let mut state = self.write();
        state.is_loading = false;
        match result {
            Ok(authors) => {
                debug!(count = authors.len(), "author list replaced");
                state.items = authors;
                Ok(())
            }
            Err(err) => {
                state.last_error = Some(err.message().to_string());
                drop(state);
                self.notifier.error(err.message());
                Err(err)
            }
        }
    }

    /// Fetch a single author. Never mutates the list; callers branch on
    /// `NotFound` to decide navigation.
    pub async fn find_author(&self, id: i64) -> Result<Author, GatewayError> {
        self.write().last_error = None;

        match self.gateway.find_author(id).await {
            Ok(author) => Ok(author),
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    pub async fn create_author(&self, draft: &NewAuthor) -> Result<Author, GatewayError> {
        self.write().last_error = None;

        match self.gateway.create_author(draft).await {
            Ok(author) => {
                self.write().items.push(author.clone());
                self.notifier
                    .success(&format!("Autor \"{}\" creado exitosamente", author.name));
                Ok(author)
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    pub async fn update_author(
        &self,
        id: i64,
        update: &AuthorUpdate,
    ) -> Result<Author, GatewayError> {
        self.write().last_error = None;

        match self.gateway.update_author(id, update).await {
            Ok(author) => {
                {
                    let mut state = self.write();
                    match state.items.iter().position(|a| a.id == id) {
                        Some(index) => state.items[index] = author.clone(),
                        None => debug!(id, "updated author is not in the local list"),
                    }
                }
                self.notifier.success(&format!(
                    "Autor \"{}\" actualizado exitosamente",
                    author.name
                ));
                Ok(author)
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Delete an author. The list entry is removed only after a success
    /// response; a 404 or server failure leaves it in place.
    pub async fn delete_author(&self, id: i64) -> Result<(), GatewayError> {
        let label = {
            let mut state = self.write();
            state.last_error = None;
            state
                .items
                .iter()
                .find(|a| a.id == id)
                .map_or_else(|| format!("ID {id}"), |a| a.name.clone())
        };

        match self.gateway.delete_author(id).await {
            Ok(()) => {
                self.write().items.retain(|a| a.id != id);
                self.notifier
                    .success(&format!("Autor \"{label}\" eliminado exitosamente"));
                Ok(())
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn fail(&self, err: &GatewayError) {
        self.write().last_error = Some(err.message().to_string());
        self.notifier.error(err.message());
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
