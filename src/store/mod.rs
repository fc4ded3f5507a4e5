//! State owned outside the dispatch pipeline: conversation history and credentials.

pub mod conversations;
pub mod credentials;
pub mod traits;

pub use conversations::InMemoryConversationLog;
pub use credentials::{EnvFileCredentialStore, MemoryCredentialStore};
pub use traits::{ConversationLog, ConversationRecord, CredentialStore};
