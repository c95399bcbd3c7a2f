/// Arrow schema for the flattened review table: one row per aspect verdict.
pub mod review {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Float32Builder, StringBuilder};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::error::ArrowError;
    use arrow::record_batch::RecordBatch;

    use crate::AspectSentimentResult;

    pub const COLUMNS: [&str; 5] = ["text", "aspect", "category", "sentiment", "confidence"];

    pub fn aspect_sentiment_schema() -> Schema {
        Schema::new(vec![
            Field::new("text", DataType::Utf8, false),
            Field::new("aspect", DataType::Utf8, false),
            Field::new("category", DataType::Utf8, true),
            Field::new("sentiment", DataType::Utf8, false),
            Field::new("confidence", DataType::Float32, true),
        ])
    }

    /// Flatten results into one batch. Comments without aspects contribute no rows.
    pub fn aspect_sentiment_batch(
        results: &[AspectSentimentResult],
    ) -> Result<RecordBatch, ArrowError> {
        let mut text = StringBuilder::new();
        let mut aspect = StringBuilder::new();
        let mut category = StringBuilder::new();
        let mut sentiment = StringBuilder::new();
        let mut confidence = Float32Builder::new();

        for result in results {
            for a in &result.aspects {
                text.append_value(&result.text);
                aspect.append_value(&a.aspect_match.text);
                category.append_option(a.aspect_match.category.as_deref());
                sentiment.append_value(a.sentiment.as_str());
                confidence.append_option(a.confidence);
            }
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(text.finish()),
            Arc::new(aspect.finish()),
            Arc::new(category.finish()),
            Arc::new(sentiment.finish()),
            Arc::new(confidence.finish()),
        ];
        RecordBatch::try_new(Arc::new(aspect_sentiment_schema()), columns)
    }
}

#[cfg(test)]
mod tests {
    use super::review;
    use crate::{AspectMatch, AspectSentiment, AspectSentimentResult, SentimentLabel};
    use arrow::array::{Array, Float32Array, StringArray};

    fn verdict(
        matched: &str,
        aspect: &str,
        category: Option<&str>,
        label: SentimentLabel,
    ) -> AspectSentiment {
        AspectSentiment {
            aspect_match: AspectMatch {
                text: matched.into(),
                aspect: aspect.into(),
                start: 0,
                end: matched.len(),
                token_start: 0,
                token_end: 1,
                category: category.map(Into::into),
            },
            sentiment: label,
            confidence: Some(0.8),
            context_used: None,
        }
    }

    #[test]
    fn schema_has_review_columns() {
        let schema = review::aspect_sentiment_schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, review::COLUMNS);
        assert!(schema.field_with_name("category").unwrap().is_nullable());
    }

    #[test]
    fn batch_has_one_row_per_aspect() {
        let results = vec![
            AspectSentimentResult::new(
                "i love the lens but hate the battery",
                vec![
                    verdict("lens", "camera", Some("hardware"), SentimentLabel::Positive),
                    verdict("battery", "battery", None, SentimentLabel::Negative),
                ],
            ),
            AspectSentimentResult::new("nothing to see", vec![]),
        ];

        let batch = review::aspect_sentiment_batch(&results).unwrap();
        assert_eq!(batch.num_rows(), 2);

        let aspects = batch
            .column_by_name("aspect")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        // Surface text of the match, not the aspect identifier.
        assert_eq!(aspects.value(0), "lens");
        assert_eq!(aspects.value(1), "battery");

        let categories = batch.column_by_name("category").unwrap();
        assert!(!categories.is_null(0));
        assert!(categories.is_null(1));

        let confidence = batch
            .column_by_name("confidence")
            .unwrap()
            .as_any()
            .downcast_ref::<Float32Array>()
            .unwrap();
        assert!((confidence.value(0) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn empty_results_give_empty_batch() {
        let batch = review::aspect_sentiment_batch(&[]).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 5);
    }
}
