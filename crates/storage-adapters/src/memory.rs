//! In-process `PromptRepository` backed by a `DashMap`.
//!
//! Contents vanish with the process. Listing returns prompts by creation time
//! so pages render in a stable order.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{NewPrompt, Prompt, PromptChanges, PromptRepository};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryPromptRepository {
    prompts: DashMap<Uuid, Prompt>,
}

impl MemoryPromptRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromptRepository for MemoryPromptRepository {
    async fn list_prompts(&self) -> anyhow::Result<Vec<Prompt>> {
        let mut prompts: Vec<Prompt> = self
            .prompts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        prompts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(prompts)
    }

    async fn get_prompt(&self, id: Uuid) -> anyhow::Result<Option<Prompt>> {
        Ok(self.prompts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create_prompt(&self, prompt: NewPrompt) -> anyhow::Result<Uuid> {
        let id = Uuid::now_v7();
        self.prompts.insert(
            id,
            Prompt {
                id,
                title: prompt.title,
                content: prompt.content,
                category: prompt.category,
                creator_ip: prompt.creator_ip,
                created_at: prompt.created_at,
            },
        );
        Ok(id)
    }

    async fn update_prompt(&self, id: Uuid, changes: PromptChanges) -> anyhow::Result<bool> {
        match self.prompts.get_mut(&id) {
            Some(mut entry) => {
                let prompt = entry.value_mut();
                prompt.title = changes.title;
                prompt.content = changes.content;
                prompt.category = changes.category;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_prompt(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.prompts.remove(&id).is_some())
    }

    async fn count_prompts(&self) -> anyhow::Result<u64> {
        Ok(self.prompts.len() as u64)
    }
}
