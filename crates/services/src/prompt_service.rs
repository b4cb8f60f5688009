//! # PromptService
//!
//! Coordinates the prompt lifecycle between the HTTP layer and the storage port.
//! Every mutation follows the same sequence: look the prompt up, check
//! ownership, then write.

use std::sync::Arc;

use anyhow::Context;
use domains::{
    catalog_now, Action, AdminSet, DomainError, NewPrompt, Prompt, PromptDraft,
    PromptRepository, Result,
};
use uuid::Uuid;

use crate::categories::CategoryIndex;
use crate::ownership;

/// Everything the list page needs for one viewer.
#[derive(Debug)]
pub struct Catalog {
    pub prompts: Vec<Prompt>,
    pub viewer: String,
    pub is_admin: bool,
    admins: AdminSet,
}

impl Catalog {
    pub fn index(&self) -> CategoryIndex<'_> {
        CategoryIndex::build(&self.prompts)
    }

    pub fn can_edit(&self, prompt: &Prompt) -> bool {
        ownership::can_edit(prompt, &self.viewer, &self.admins)
    }
}

pub struct PromptService {
    repo: Arc<dyn PromptRepository>,
    admins: AdminSet,
}

impl PromptService {
    pub fn new(repo: Arc<dyn PromptRepository>, admins: AdminSet) -> Self {
        Self { repo, admins }
    }

    /// Loads every prompt for display to `viewer`.
    pub async fn catalog(&self, viewer: &str) -> Result<Catalog> {
        let prompts = self
            .repo
            .list_prompts()
            .await
            .context("listing prompts")
            .map_err(DomainError::StorageUnavailable)?;

        Ok(Catalog {
            prompts,
            viewer: viewer.to_string(),
            is_admin: ownership::is_admin(viewer, &self.admins),
            admins: self.admins.clone(),
        })
    }

    /// Validates and stores a new prompt owned by `creator_ip`.
    pub async fn create(&self, draft: PromptDraft, creator_ip: &str) -> Result<Prompt> {
        let fields = draft.validate()?;
        let new_prompt = NewPrompt {
            title: fields.title,
            content: fields.content,
            category: fields.category,
            creator_ip: creator_ip.to_string(),
            created_at: catalog_now(),
        };

        let id = self
            .repo
            .create_prompt(new_prompt.clone())
            .await
            .context("inserting prompt")
            .map_err(DomainError::StorageUnavailable)?;

        tracing::info!(prompt_id = %id, creator_ip, "prompt created");

        Ok(Prompt {
            id,
            title: new_prompt.title,
            content: new_prompt.content,
            category: new_prompt.category,
            creator_ip: new_prompt.creator_ip,
            created_at: new_prompt.created_at,
        })
    }

    /// Fetches a prompt the requester is allowed to edit.
    pub async fn fetch_for_edit(&self, id: &str, requester: &str) -> Result<Prompt> {
        self.authorized(id, requester, Action::Edit).await
    }

    /// Overwrites title, content and category. Id, creator and timestamp are never touched.
    pub async fn update(&self, id: &str, draft: PromptDraft, requester: &str) -> Result<Prompt> {
        let prompt = self.authorized(id, requester, Action::Edit).await?;
        let changes = draft.validate()?;

        let found = self
            .repo
            .update_prompt(prompt.id, changes.clone())
            .await
            .context("updating prompt")
            .map_err(DomainError::StorageUnavailable)?;
        if !found {
            // Deleted between the lookup and the write
            return Err(DomainError::NotFound(id.to_string()));
        }

        tracing::info!(prompt_id = %prompt.id, requester, "prompt updated");

        Ok(Prompt {
            title: changes.title,
            content: changes.content,
            category: changes.category,
            ..prompt
        })
    }

    pub async fn delete(&self, id: &str, requester: &str) -> Result<()> {
        let prompt = self.authorized(id, requester, Action::Delete).await?;

        let found = self
            .repo
            .delete_prompt(prompt.id)
            .await
            .context("deleting prompt")
            .map_err(DomainError::StorageUnavailable)?;
        if !found {
            return Err(DomainError::NotFound(id.to_string()));
        }

        tracing::info!(prompt_id = %prompt.id, requester, "prompt deleted");
        Ok(())
    }

    async fn authorized(&self, id: &str, requester: &str, action: Action) -> Result<Prompt> {
        let prompt = self.find(id).await?;
        if !ownership::can_edit(&prompt, requester, &self.admins) {
            tracing::warn!(prompt_id = %prompt.id, requester, %action, "ownership check denied");
            return Err(DomainError::Forbidden(action));
        }
        Ok(prompt)
    }

    async fn find(&self, id: &str) -> Result<Prompt> {
        // A malformed id can't name any prompt
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Err(DomainError::NotFound(id.to_string()));
        };

        self.repo
            .get_prompt(uuid)
            .await
            .context("fetching prompt")
            .map_err(DomainError::StorageUnavailable)?
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::MockPromptRepository;
    use storage_adapters::MemoryPromptRepository;

    const OWNER: &str = "10.0.0.5";
    const STRANGER: &str = "10.0.0.6";
    const ADMIN: &str = "127.0.0.1";

    fn service() -> (PromptService, Arc<MemoryPromptRepository>) {
        let repo = Arc::new(MemoryPromptRepository::new());
        let service = PromptService::new(repo.clone(), AdminSet::from_csv(ADMIN));
        (service, repo)
    }

    fn draft(title: &str, content: &str, category: &str) -> PromptDraft {
        PromptDraft {
            title: Some(title.into()),
            content: Some(content.into()),
            category: Some(category.into()),
        }
    }

    #[tokio::test]
    async fn created_prompt_shows_under_each_label() {
        let (service, _) = service();
        let created = service.create(draft("T", "C", "x,y"), OWNER).await.unwrap();

        let catalog = service.catalog(OWNER).await.unwrap();
        let index = catalog.index();
        assert_eq!(index.sorted_categories(), vec!["x", "y"]);
        for label in ["x", "y"] {
            let listed = index.prompts_in(label)[0];
            assert_eq!(listed.id, created.id);
            assert_eq!(listed.creator_ip, OWNER);
            assert_eq!(listed.created_at, created.created_at);
        }
        assert!(catalog.can_edit(&catalog.prompts[0]));
        assert!(!catalog.is_admin);
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let (service, repo) = service();
        let err = service.create(draft(" ", "C", "x"), OWNER).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
        assert_eq!(repo.count_prompts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stranger_cannot_edit() {
        let (service, repo) = service();
        let created = service.create(draft("T", "C", "x"), OWNER).await.unwrap();

        let err = service
            .update(&created.id.to_string(), draft("hijacked", "C", "x"), STRANGER)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(Action::Edit)));

        let stored = repo.get_prompt(created.id).await.unwrap().unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn admin_edit_keeps_creator() {
        let (service, repo) = service();
        let created = service.create(draft("T", "C", "x"), OWNER).await.unwrap();

        let updated = service
            .update(&created.id.to_string(), draft("T2", "C2", "y"), ADMIN)
            .await
            .unwrap();
        assert_eq!(updated.title, "T2");
        assert_eq!(updated.creator_ip, OWNER);

        let stored = repo.get_prompt(created.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
        assert_eq!(stored.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_validates_after_authorizing() {
        let (service, _) = service();
        let created = service.create(draft("T", "C", "x"), OWNER).await.unwrap();
        let id = created.id.to_string();

        let err = service.update(&id, draft("T", "", "x"), STRANGER).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = service.update(&id, draft("T", "", "x"), OWNER).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn deleting_missing_prompt_is_not_found() {
        let (service, repo) = service();
        service.create(draft("T", "C", "x"), OWNER).await.unwrap();

        let err = service.delete(&Uuid::now_v7().to_string(), ADMIN).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = service.delete("not-a-uuid", ADMIN).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        assert_eq!(repo.count_prompts().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn owner_can_delete() {
        let (service, repo) = service();
        let created = service.create(draft("T", "C", "x"), OWNER).await.unwrap();

        let err = service.delete(&created.id.to_string(), STRANGER).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(Action::Delete)));

        service.delete(&created.id.to_string(), OWNER).await.unwrap();
        assert_eq!(repo.count_prompts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn admin_flag_follows_viewer() {
        let (service, _) = service();
        assert!(service.catalog(ADMIN).await.unwrap().is_admin);
        assert!(!service.catalog(OWNER).await.unwrap().is_admin);
    }

    #[tokio::test]
    async fn storage_failure_surfaces_as_unavailable() {
        let mut repo = MockPromptRepository::new();
        repo.expect_list_prompts()
            .returning(|| Err(anyhow::anyhow!("database is locked")));
        repo.expect_get_prompt()
            .returning(|_| Err(anyhow::anyhow!("database is locked")));

        let service = PromptService::new(Arc::new(repo), AdminSet::default());

        let err = service.catalog(OWNER).await.unwrap_err();
        assert!(matches!(err, DomainError::StorageUnavailable(_)));

        let err = service
            .fetch_for_edit(&Uuid::now_v7().to_string(), OWNER)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::StorageUnavailable(_)));
    }
}
