#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use store_locator_core::AppError;
use store_locator_core::domain::entities::{StoreWithDistance, User, UserLocation};
use store_locator_core::domain::repositories::{
    LocationRepository, StoreSearchRepository, UserRepository,
};

/// In-memory location repository with call counters.
///
/// `update_by_user` deliberately writes latitude and longitude in two steps
/// with a pause in between: unsynchronized concurrent updates would produce
/// a record mixing coordinates from different calls, which is exactly what
/// the distributed lock must prevent.
#[derive(Default)]
pub struct FakeLocationRepository {
    records: Mutex<HashMap<String, UserLocation>>,
    pub find_calls: AtomicUsize,
    pub insert_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub write_step_delay: Duration,
}

impl FakeLocationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_write_step_delay(delay: Duration) -> Self {
        Self {
            write_step_delay: delay,
            ..Self::default()
        }
    }

    pub fn stored(&self, user_id: &str) -> Option<UserLocation> {
        self.records.lock().get(user_id).cloned()
    }
}

#[async_trait]
impl LocationRepository for FakeLocationRepository {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<UserLocation>, AppError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().get(user_id).cloned())
    }

    async fn insert(
        &self,
        user_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<UserLocation, AppError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.write_step_delay).await;

        let record = UserLocation::new(user_id, latitude, longitude, Utc::now());
        self.records.lock().insert(user_id.to_string(), record.clone());
        Ok(record)
    }

    async fn update_by_user(
        &self,
        user_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<UserLocation, AppError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        {
            let mut records = self.records.lock();
            let record = records.get_mut(user_id).ok_or_else(|| {
                AppError::internal("update for missing record", json!({ "user_id": user_id }))
            })?;
            record.latitude = latitude;
        }

        tokio::time::sleep(self.write_step_delay).await;

        let mut records = self.records.lock();
        let record = records.get_mut(user_id).ok_or_else(|| {
            AppError::internal("update for missing record", json!({ "user_id": user_id }))
        })?;
        record.longitude = longitude;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

/// Store-search repository serving a canned result and recording its inputs.
#[derive(Default)]
pub struct FakeStoreSearchRepository {
    pub results: Mutex<Vec<StoreWithDistance>>,
    pub search_calls: AtomicUsize,
    pub last_center: Mutex<Option<(f64, f64)>>,
}

impl FakeStoreSearchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: Vec<StoreWithDistance>) -> Self {
        Self {
            results: Mutex::new(results),
            ..Self::default()
        }
    }
}

#[async_trait]
impl StoreSearchRepository for FakeStoreSearchRepository {
    async fn radius_search(
        &self,
        center_latitude: f64,
        center_longitude: f64,
        _radius_m: f64,
        _name_filter: Option<String>,
        _type_filter: Option<String>,
        _page_index: u32,
        _page_size: u32,
    ) -> Result<(Vec<StoreWithDistance>, u64), AppError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_center.lock() = Some((center_latitude, center_longitude));

        let results = self.results.lock().clone();
        let total = results.len() as u64;
        Ok((results, total))
    }
}

/// User repository over a fixed email set, with lookup counters.
#[derive(Default)]
pub struct FakeUserRepository {
    users: Mutex<HashMap<String, User>>,
    pub find_calls: AtomicUsize,
}

impl FakeUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_emails(emails: &[&str]) -> Self {
        let users = emails
            .iter()
            .enumerate()
            .map(|(i, email)| {
                (
                    email.to_string(),
                    User {
                        id: format!("user-{}", i),
                        email: email.to_string(),
                        is_active: true,
                        created_at: Utc::now(),
                    },
                )
            })
            .collect();
        Self {
            users: Mutex::new(users),
            find_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.lock().get(email).cloned())
    }

    async fn list_active_emails(&self) -> Result<Vec<String>, AppError> {
        Ok(self.users.lock().keys().cloned().collect())
    }
}
