pub mod parts;
pub mod providers;
pub mod uploads;

pub use providers::{GenerativePart, ProviderError, TextGenerator};
pub use uploads::{UploadStore, UploadedFile};
