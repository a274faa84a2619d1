use async_trait::async_trait;
use inquire::Confirm;

/// Second step of a destructive action. Nothing is deleted unless this
/// returns `true`.
#[async_trait]
pub trait DeleteConfirmation: Send + Sync {
    async fn confirm(&self, what: &str) -> bool;
}

pub struct InquireConfirmation;

#[async_trait]
impl DeleteConfirmation for InquireConfirmation {
    async fn confirm(&self, what: &str) -> bool {
        let prompt = format!("Excluir {what}? Esta ação não pode ser desfeita.");
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::new(&prompt).with_default(false).prompt()
        })
        .await;
        // A closed terminal or Ctrl-C counts as "no".
        matches!(answer, Ok(Ok(true)))
    }
}

/// Used for `--yes`.
pub struct AlwaysConfirm;

#[async_trait]
impl DeleteConfirmation for AlwaysConfirm {
    async fn confirm(&self, _what: &str) -> bool {
        true
    }
}
