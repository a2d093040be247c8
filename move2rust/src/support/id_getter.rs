use std::sync::{LazyLock, Mutex};

/// Hands out object ids in allocation order, starting from one.
pub struct IdGetter {
    current_id: Mutex<u8>,
}

impl IdGetter {
    pub fn new() -> IdGetter {
        IdGetter {
            current_id: Mutex::new(0),
        }
    }

    pub fn get_new_id(&self) -> u8 {
        let mut current_id = self
            .current_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current_id += 1;
        *current_id
    }
}

pub static ID_GETTER: LazyLock<IdGetter> = LazyLock::new(IdGetter::new);
