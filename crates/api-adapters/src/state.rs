use std::sync::Arc;

use domains::{AddressPolicy, NoticeSigner};
use services::PromptService;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub prompts: Arc<PromptService>,
    pub signer: Arc<dyn NoticeSigner>,
    pub address_policy: AddressPolicy,
}
