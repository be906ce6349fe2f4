use crate::error::Result;
use crate::llm::prompts::summary_prompt;
use crate::llm::{describe_failure, TextModel};
use crate::render::to_markdown;
use crate::schema::AnalyzedTable;
use log::{info, warn};

/// One-shot narrative assessment of an analyzed statement.
pub struct Narrator<M> {
    model: M,
}

impl<M: TextModel> Narrator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Returns the model's text verbatim, or the underlying error.
    pub async fn try_summarize(&self, table: &AnalyzedTable) -> Result<String> {
        self.model.ensure_ready()?;
        let prompt = summary_prompt(&to_markdown(table));
        info!("Requesting summary for {} line items", table.len());
        self.model.generate(&prompt).await
    }

    /// Like [`Narrator::try_summarize`], but failures come back as a readable
    /// message instead of an error.
    pub async fn summarize(&self, table: &AnalyzedTable) -> String {
        match self.try_summarize(table).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Summary request failed: {}", e);
                describe_failure("the summary", &e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::compute_ratios;
    use crate::error::AnalysisError;
    use crate::llm::test_support::ScriptedModel;
    use crate::schema::LineItem;

    fn table() -> AnalyzedTable {
        compute_ratios(&[
            LineItem::new("TỔNG CỘNG TÀI SẢN", 1000.0, 1200.0),
            LineItem::new("TÀI SẢN NGẮN HẠN", 400.0, 600.0),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_summary_is_returned_verbatim() {
        let narrator = Narrator::new(ScriptedModel::new(vec![Ok("  Solid growth.\n".to_string())]));
        let text = narrator.summarize(&table()).await;
        assert_eq!(text, "  Solid growth.\n");

        let prompts = narrator.model().prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("TÀI SẢN NGẮN HẠN | 400 | 600 | 50.00"));
    }

    #[tokio::test]
    async fn test_service_failure_becomes_message() {
        let narrator = Narrator::new(ScriptedModel::new(vec![Err(
            AnalysisError::ExternalService("quota exceeded".to_string()),
        )]));
        let text = narrator.summarize(&table()).await;
        assert!(text.contains("Gemini API call failed"));
        assert!(text.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_missing_credential_skips_the_call() {
        let narrator = Narrator::new(ScriptedModel::without_credential());
        let text = narrator.summarize(&table()).await;
        assert!(text.starts_with("Error: no usable API key"));
        assert!(narrator.model().prompts().is_empty());
    }
}
