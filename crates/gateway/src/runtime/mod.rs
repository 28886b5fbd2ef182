//! Chat runtime: the registries, the run state machine, and the relay,
//! composed into a single turn by [`run_turn`].

pub mod assistants;
pub mod identity;
pub mod orchestrator;
pub mod relay;
pub mod submit;
pub mod threads;
pub mod turn;
pub mod user_lock;

pub use assistants::{AssistantProfile, AssistantRegistry};
pub use identity::IdentityCache;
pub use orchestrator::{run_to_completion, PollPolicy, RunOutcome};
pub use relay::{relay_new_messages, RelayedMessage};
pub use submit::submit_message;
pub use threads::{ThreadRegistry, ThreadSource};
pub use turn::{run_turn, CompletedTurn, TurnInput};
pub use user_lock::UserLockMap;
