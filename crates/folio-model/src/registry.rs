use std::sync::Arc;

use folio_codec::JsonSerializer;
use folio_store::{ModelRegistry, StoreOptions, StoreResult};

use crate::{Community, Friend, Meetup, Speaker, Talk, Venue};

/// Registry of every community model, each stored as pretty JSON.
pub fn registry(options: &StoreOptions) -> StoreResult<ModelRegistry> {
    let mut registry = ModelRegistry::with_options(options);
    registry
        .register::<Community>(Arc::new(JsonSerializer::<Community>::new()))?
        .register::<Meetup>(Arc::new(JsonSerializer::<Meetup>::new()))?
        .register::<Speaker>(Arc::new(JsonSerializer::<Speaker>::new()))?
        .register::<Talk>(Arc::new(JsonSerializer::<Talk>::new()))?
        .register::<Venue>(Arc::new(JsonSerializer::<Venue>::new()))?
        .register::<Friend>(Arc::new(JsonSerializer::<Friend>::new()))?;
    Ok(registry)
}
