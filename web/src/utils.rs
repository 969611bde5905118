use chrono::prelude::*;
use gloo::storage::{LocalStorage, Storage};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Versioned local-storage slot for a value.
pub(crate) trait StorageKey: Serialize + DeserializeOwned + Sized {
    const KEY: &'static str;

    fn local_load() -> Option<Self> {
        LocalStorage::get(Self::KEY).ok()
    }

    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(Self::KEY, self) {
            log::error!("could not save {} to local storage: {:?}", Self::KEY, err);
        }
    }
}

pub(crate) fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap()
}

/// Touch-primary heuristic: narrow viewports get the larger brush.
pub(crate) fn is_narrow_viewport() -> bool {
    gloo::utils::window()
        .inner_width()
        .ok()
        .and_then(|width| width.as_f64())
        .map_or(false, |width| width <= 480.0)
}
