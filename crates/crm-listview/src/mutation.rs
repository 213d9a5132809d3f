//! Mutation Coordinator
//!
//! Validate, write through to the backend, then reload the whole collection.
//! The reload is the only source of truth; nothing is patched locally.

use serde::Serialize;

use crate::backend::{ApiClient, Backend, Method};
use crate::draft::{AssignmentPatch, ConversionRequest, ConversionReview, StatusPatch};
use crate::entity::{Lead, Role};
use crate::error::ApiResult;
use crate::loader::load_all;
use crate::resource::Resource;
use crate::validate::Validate;

/// A delete the user has asked for but not yet confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    id: i64,
}

impl PendingDelete {
    pub fn request(id: i64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// The explicit confirmation step; only a confirmed delete can be sent
    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }
}

/// Proof that the user confirmed the delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: i64,
}

impl ConfirmedDelete {
    pub fn id(&self) -> i64 {
        self.id
    }
}

/// Role-scoped writer that reloads after every successful mutation
pub struct MutationCoordinator<'a, B> {
    api: &'a ApiClient<B>,
    role: Role,
    fetch_page_size: u32,
}

impl<'a, B: Backend> MutationCoordinator<'a, B> {
    pub fn new(api: &'a ApiClient<B>, role: Role, fetch_page_size: u32) -> Self {
        Self {
            api,
            role,
            fetch_page_size,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Full collection reload
    pub async fn reload<T: Resource>(&self) -> ApiResult<Vec<T>> {
        load_all(self.api, &T::collection_path(self.role), self.fetch_page_size).await
    }

    pub async fn create<T, D>(&self, draft: &D) -> ApiResult<Vec<T>>
    where
        T: Resource,
        D: Validate + Serialize,
    {
        draft.validate()?;
        let path = T::collection_path(self.role);
        self.api
            .send_json(Method::Post, &path, draft)
            .await?;
        log::info!("created {} via {}", T::LABEL, path);
        self.reload().await
    }

    pub async fn update<T, D>(&self, id: i64, draft: &D) -> ApiResult<Vec<T>>
    where
        T: Resource,
        D: Validate + Serialize,
    {
        draft.validate()?;
        let path = T::item_path(self.role, id);
        self.api
            .send_json(Method::Put, &path, draft)
            .await?;
        log::info!("updated {} {}", T::LABEL, id);
        self.reload().await
    }

    pub async fn delete<T: Resource>(&self, confirmed: ConfirmedDelete) -> ApiResult<Vec<T>> {
        let path = T::item_path(self.role, confirmed.id());
        self.api.delete(&path, T::REFERENTIAL_MESSAGE).await?;
        log::info!("deleted {} {}", T::LABEL, confirmed.id());
        self.reload().await
    }

    /// PUT to a sub-resource of one record, e.g. `/leads/4/status`
    async fn put_action<T, P>(&self, id: i64, action: &str, payload: &P) -> ApiResult<Vec<T>>
    where
        T: Resource,
        P: Serialize,
    {
        let path = format!("{}/{}", T::item_path(self.role, id), action);
        self.api
            .send_json(Method::Put, &path, payload)
            .await?;
        log::info!("{} {} {}", action, T::LABEL, id);
        self.reload().await
    }

    pub async fn change_status<T: Resource>(&self, id: i64, patch: &StatusPatch) -> ApiResult<Vec<T>> {
        self.put_action(id, "status", patch).await
    }

    pub async fn reassign<T: Resource>(&self, id: i64, patch: &AssignmentPatch) -> ApiResult<Vec<T>> {
        self.put_action(id, "assign", patch).await
    }

    pub async fn request_conversion(&self, lead_id: i64, request: &ConversionRequest) -> ApiResult<Vec<Lead>> {
        request.validate()?;
        self.put_action(lead_id, "conversion-request", request).await
    }

    pub async fn review_conversion(&self, lead_id: i64, review: &ConversionReview) -> ApiResult<Vec<Lead>> {
        self.put_action(lead_id, "conversion-review", review).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RawResponse;
    use crate::draft::LeadDraft;
    use crate::entity::{Task, TASK_STATUSES};
    use crate::error::{ApiError, GENERIC_REFERENTIAL};
    use crate::testing::{lead_json, page, scripted_client};
    use serde_json::json;

    fn valid_lead() -> LeadDraft {
        LeadDraft {
            name: "Acme".to_string(),
            email: "sales@acme.com".to_string(),
            ..LeadDraft::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_draft_sends_nothing() {
        let api = scripted_client(vec![]);
        let coordinator = MutationCoordinator::new(&api, Role::Manager, 50);

        let err = coordinator
            .create::<Lead, _>(&LeadDraft::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(api.backend().requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_posts_then_reloads() {
        let api = scripted_client(vec![
            RawResponse::json(201, &lead_json(10, "Acme")),
            page(json!([lead_json(10, "Acme")]), 0, 1),
        ]);
        let coordinator = MutationCoordinator::new(&api, Role::Manager, 50);

        let leads = coordinator.create::<Lead, _>(&valid_lead()).await.unwrap();

        let sent = api.backend().requests();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].path, "/api/manager/leads");
        assert_eq!(sent[0].body.as_ref().unwrap()["name"], json!("Acme"));
        assert_eq!(sent[1].method, Method::Get);
        assert_eq!(leads.len(), 1);
    }

    #[tokio::test]
    async fn test_update_puts_to_item_path() {
        let api = scripted_client(vec![
            RawResponse::new(200, "updated"),
            page(json!([]), 0, 1),
        ]);
        let coordinator = MutationCoordinator::new(&api, Role::Employee, 50);

        coordinator.update::<Lead, _>(4, &valid_lead()).await.unwrap();

        let sent = api.backend().requests();
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].path, "/api/employee/leads/4");
    }

    #[tokio::test]
    async fn test_foreign_key_delete_is_translated_and_not_reloaded() {
        let api = scripted_client(vec![RawResponse::new(
            500,
            "could not execute statement; update or delete on table \"lead\" violates foreign key constraint",
        )]);
        let coordinator = MutationCoordinator::new(&api, Role::Manager, 50);

        let confirmed = PendingDelete::request(3).confirm();
        let err = coordinator.delete::<Lead>(confirmed).await.unwrap_err();

        assert_eq!(
            err.user_message(),
            "Cannot delete lead because it has associated tasks"
        );
        assert_eq!(api.backend().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_foreign_key_update_keeps_backend_text() {
        let body = "insert or update on table \"lead\" violates foreign key constraint \"fk_assignee\"";
        let api = scripted_client(vec![RawResponse::new(500, body)]);
        let coordinator = MutationCoordinator::new(&api, Role::Manager, 50);

        let err = coordinator
            .update::<Lead, _>(4, &valid_lead())
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), body);
        assert!(!matches!(err, ApiError::Referential(_)));
    }

    #[tokio::test]
    async fn test_foreign_key_delete_without_own_wording_uses_generic() {
        let api = scripted_client(vec![RawResponse::new(
            409,
            "Cannot delete or update a parent row: a foreign key constraint fails",
        )]);
        let coordinator = MutationCoordinator::new(&api, Role::Manager, 50);

        let err = coordinator
            .delete::<Task>(PendingDelete::request(8).confirm())
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::Referential(GENERIC_REFERENTIAL.to_string()));
    }

    #[tokio::test]
    async fn test_delete_reloads_on_success() {
        let api = scripted_client(vec![
            RawResponse::new(204, ""),
            page(json!([lead_json(1, "left")]), 0, 1),
        ]);
        let coordinator = MutationCoordinator::new(&api, Role::Manager, 50);

        let leads = coordinator
            .delete::<Lead>(PendingDelete::request(2).confirm())
            .await
            .unwrap();

        assert_eq!(api.backend().requests()[0].path, "/api/manager/leads/2");
        assert_eq!(leads.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn test_forbidden_mutation_reports_permission() {
        let api = scripted_client(vec![RawResponse::new(403, "")]);
        let coordinator = MutationCoordinator::new(&api, Role::Employee, 50);

        let err = coordinator
            .change_status::<Task>(5, &StatusPatch::checked("COMPLETED", TASK_STATUSES).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Authorization(_)));
        assert_eq!(api.backend().requests()[0].path, "/api/employee/tasks/5/status");
        assert!(api.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_conversion_request_requires_message() {
        let api = scripted_client(vec![]);
        let coordinator = MutationCoordinator::new(&api, Role::Employee, 50);

        let err = coordinator
            .request_conversion(1, &ConversionRequest { conversion_message: " ".to_string() })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(api.backend().requests().is_empty());
    }
}
