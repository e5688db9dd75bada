//! Application state store
//!
//! `AppStore` owns the `AppState`, funnels every mutation through
//! `AppState::apply` and writes the touched snapshots to a `PersistencePort`.

pub mod persistence;
pub mod session;
pub mod state;

pub use persistence::{FilePersistence, MemoryPersistence, PersistencePort, StorageEvent};
pub use session::{AuthError, AuthMethod, AuthMode, ProfileUpdate, UserProfile, UserRole};
pub use state::{AppState, Command, StateKey};

use crossbeam_channel::Receiver;
use serde::de::DeserializeOwned;

use crate::{
    core::{config::StoreOptions, constants::DONATIONS_KEY},
    data::{donation::Donation, seed},
    Result,
};

pub struct AppStore<P: PersistencePort> {
    state: AppState,
    options: StoreOptions,
    persistence: P,
    events: Receiver<StorageEvent>,
}

impl<P: PersistencePort> AppStore<P> {
    /// Loads the saved snapshots, seeding demo data for missing lists
    pub fn open(persistence: P, options: StoreOptions) -> Result<Self> {
        let events = persistence.subscribe();

        let donations: Option<Vec<Donation>> = load_json(&persistence, StateKey::Donations)?;
        let registered_users = load_json(&persistence, StateKey::Users)?;
        let role = load_json(&persistence, StateKey::Role)?;
        let profile = load_json(&persistence, StateKey::Profile)?;

        let seeded = options.seed_demo_data;
        let state = AppState {
            role,
            profile,
            donations: donations
                .unwrap_or_else(|| if seeded { seed::demo_donations() } else { Vec::new() }),
            registered_users: registered_users
                .unwrap_or_else(|| if seeded { seed::demo_users() } else { Vec::new() }),
            user_location: None,
        };
        log::debug!(
            "store opened with {} donations, {} accounts",
            state.donations.len(),
            state.registered_users.len()
        );

        let store = Self {
            state,
            options,
            persistence,
            events,
        };
        store.persist(&[StateKey::Donations, StateKey::Users])?;
        Ok(store)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Applies a command and saves whatever it changed
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        let changed = self.state.apply(command, &self.options)?;
        self.persist(&changed)
    }

    /// Applies donation lists written by other handles since the last call
    ///
    /// Returns how many external updates were applied. Own writes and other
    /// keys are ignored.
    pub fn sync_external(&mut self) -> Result<usize> {
        let origin = self.persistence.origin();
        let mut applied = 0;

        while let Ok(event) = self.events.try_recv() {
            if event.origin == origin || event.key != DONATIONS_KEY {
                continue;
            }
            let Some(value) = event.new_value else {
                continue;
            };
            match serde_json::from_str::<Vec<Donation>>(&value) {
                Ok(donations) => {
                    log::info!("syncing {} donations from another handle", donations.len());
                    self.state.apply(Command::ReplaceDonations(donations), &self.options)?;
                    applied += 1;
                }
                Err(e) => log::warn!("ignoring unreadable donation snapshot: {}", e),
            }
        }

        Ok(applied)
    }

    fn persist(&self, keys: &[StateKey]) -> Result<()> {
        for key in keys {
            let storage_key = key.storage_key();
            let value = match key {
                StateKey::Donations => Some(serde_json::to_string(&self.state.donations)?),
                StateKey::Users => Some(serde_json::to_string(&self.state.registered_users)?),
                StateKey::Role => self.state.role.as_ref().map(serde_json::to_string).transpose()?,
                StateKey::Profile => self
                    .state
                    .profile
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
            };
            match value {
                Some(value) => self.persistence.save(storage_key, &value)?,
                None => self.persistence.remove(storage_key)?,
            }
        }
        Ok(())
    }
}

/// Reads one snapshot; unreadable documents are logged and treated as missing
fn load_json<T: DeserializeOwned>(
    persistence: &impl PersistencePort,
    key: StateKey,
) -> Result<Option<T>> {
    let Some(raw) = persistence.load(key.storage_key())? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("discarding unreadable {} snapshot: {}", key.storage_key(), e);
            Ok(None)
        }
    }
}
