//! Installation ids and by-id list maintenance.

use uuid::Uuid;

/// Generate a unique id such as `engine-3f2b...`.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Records addressed by a generated id.
pub trait HasId {
    fn id(&self) -> &str;
}

/// Replace the record with the same id in place, or append it.
pub fn upsert_by_id<T: HasId>(list: &mut Vec<T>, item: T) {
    match list.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item,
        None => list.push(item),
    }
}

/// Remove the record with `id`, returning it when present.
pub fn remove_by_id<T: HasId>(list: &mut Vec<T>, id: &str) -> Option<T> {
    let index = list.iter().position(|item| item.id() == id)?;
    Some(list.remove(index))
}

macro_rules! has_id {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::ids::HasId for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

pub(crate) use has_id;
