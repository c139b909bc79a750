use anyhow::anyhow;
use std::{error::Error, fmt::Display};

use crate::AnyResult;

/// Attaches a message to a failed `Result` or an empty `Option`, producing an [`anyhow::Error`].
///
/// ## Example
/// ```
/// use apollo_utils::AnyhowResultExt;
///
/// let missing: Option<u32> = None;
/// let err = missing.otherwise("no value").unwrap_err();
/// assert_eq!(err.to_string(), "no value");
/// ```
pub trait AnyhowResultExt<T> {
    fn otherwise(self, message: impl Display) -> AnyResult<T>;
}

impl<T, E: Error + Send + Sync + 'static> AnyhowResultExt<T> for Result<T, E> {
    fn otherwise(self, message: impl Display) -> AnyResult<T> {
        self.map_err(|err| anyhow::Error::new(err).context(message.to_string()))
    }
}

impl<T> AnyhowResultExt<T> for Option<T> {
    fn otherwise(self, message: impl Display) -> AnyResult<T> {
        self.ok_or_else(|| anyhow!("{message}"))
    }
}
