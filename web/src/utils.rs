use gloo::storage::{LocalStorage, Storage};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Namespaced local-storage key for a persisted type.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault: Sized {
    fn local_or_default() -> Self;
    fn local_save(&self);
}

impl<T: StorageKey + Serialize + DeserializeOwned + Default> LocalOrDefault for T {
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).unwrap_or_default()
    }

    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("Could not save {} to local storage: {:?}", T::KEY, err);
        }
    }
}

/// Helper function to fold JavaScript's Math.random into a 64-bit seed.
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    let mut bytes = [0u8; 8];
    for byte in bytes.iter_mut() {
        *byte = (256. * random()) as u8;
    }
    u64::from_be_bytes(bytes)
}

/// Fixed-width rendering for the LED-style counters.
pub(crate) fn format_for_counter(num: u32) -> String {
    if num > 999 {
        "999".to_string()
    } else {
        format!("{:03}", num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_three_digits_and_clamped() {
        assert_eq!(format_for_counter(0), "000");
        assert_eq!(format_for_counter(42), "042");
        assert_eq!(format_for_counter(999), "999");
        assert_eq!(format_for_counter(1234), "999");
    }
}
