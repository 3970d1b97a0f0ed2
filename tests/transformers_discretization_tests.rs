use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Decimal128Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use datafusion::datasource::memory::MemTable;
use datafusion::prelude::*;

use quantile_discretizer::exceptions::{DiscretizerError, DiscretizerResult};
use quantile_discretizer::transformer::Transformer;
use quantile_discretizer::transformers::discretization::QuantileDiscretizer;
use quantile_discretizer::{apply, ColumnData, DiscretizeConfig, QuantileOptions};

/// Helper: create a DataFrame with a nullable Float64 column "value" and an Int64 column "id".
async fn create_df(values: &[Option<f64>]) -> DataFrame {
    let schema = Arc::new(Schema::new(vec![
        Field::new("value", DataType::Float64, true),
        Field::new("id", DataType::Int64, false),
    ]));
    let value: ArrayRef = Arc::new(Float64Array::from(values.to_vec()));
    let id: ArrayRef = Arc::new(Int64Array::from(
        (0..values.len() as i64).collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(schema.clone(), vec![value, id]).unwrap();
    let mem_table = MemTable::try_new(schema, vec![vec![batch]]).unwrap();
    let ctx = SessionContext::new();
    ctx.register_table("t", Arc::new(mem_table)).unwrap();
    ctx.table("t").await.unwrap()
}

/// Helper: collect the "value" column as optional strings, ordered by "id".
async fn collect_labels(df: DataFrame) -> DiscretizerResult<Vec<Option<String>>> {
    let batches = df.sort(vec![col("id").sort(true, false)])?.collect().await?;
    let mut labels = Vec::new();
    for batch in batches {
        let schema = batch.schema();
        let column = batch
            .column(schema.index_of("value").unwrap())
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("Expected StringArray for discretized column");
        for i in 0..column.len() {
            labels.push((!column.is_null(i)).then(|| column.value(i).to_string()));
        }
    }
    Ok(labels)
}

fn one_to_hundred() -> Vec<Option<f64>> {
    (1..=100).map(|v| Some(f64::from(v))).collect()
}

#[tokio::test]
async fn test_quantile_discretizer_matches_core_rules() -> DiscretizerResult<()> {
    let train = create_df(&one_to_hundred()).await;
    let config = DiscretizeConfig::new(4).with_unbounded_ends(false);
    let mut discretizer = QuantileDiscretizer::new(vec!["value".to_string()], config);
    discretizer.fit(&train).await?;
    let model = discretizer.model("value").expect("Expected a fitted model");
    assert_eq!(model.breakpoints(), &[1.0, 25.75, 50.5, 75.25, 100.0]);

    let test = create_df(&[
        Some(1.0),
        Some(25.75),
        Some(60.0),
        Some(0.0),
        Some(1000.0),
        None,
        Some(f64::NAN),
    ])
    .await;
    let labels = collect_labels(discretizer.transform(test)?).await?;
    let expected = vec![
        Some("bin1"),
        Some("bin1"),
        Some("bin3"),
        None,
        None,
        Some("bin_missing"),
        Some("bin_missing"),
    ];
    assert_eq!(labels, expected.into_iter().map(|l| l.map(String::from)).collect::<Vec<_>>());
    Ok(())
}

#[tokio::test]
async fn test_quantile_discretizer_unbounded_ends() -> DiscretizerResult<()> {
    let train = create_df(&one_to_hundred()).await;
    let config = DiscretizeConfig::new(4).with_keep_missing(false);
    let mut discretizer = QuantileDiscretizer::new(vec!["value".to_string()], config);
    discretizer.fit(&train).await?;

    let test = create_df(&[Some(-1e9), Some(1e9), None]).await;
    let labels = collect_labels(discretizer.transform(test)?).await?;
    assert_eq!(
        labels,
        vec![Some("bin1".to_string()), Some("bin4".to_string()), None]
    );
    Ok(())
}

#[tokio::test]
async fn test_quantile_discretizer_needs_missing_opt_in() -> DiscretizerResult<()> {
    let mut values = one_to_hundred();
    values[0] = None;
    let train = create_df(&values).await;

    let mut strict = QuantileDiscretizer::new(vec!["value".to_string()], DiscretizeConfig::default());
    let err = strict.fit(&train).await.unwrap_err();
    assert!(matches!(err, DiscretizerError::MissingValueInSample));

    let config = DiscretizeConfig::default()
        .with_quantile_options(QuantileOptions::new().with_exclude_missing(true));
    let mut lenient = QuantileDiscretizer::new(vec!["value".to_string()], config);
    lenient.fit(&train).await?;
    assert_eq!(lenient.model("value").map(|m| m.bin_count()), Some(4));
    Ok(())
}

#[tokio::test]
async fn test_degenerate_column_passes_through() -> DiscretizerResult<()> {
    let train = create_df(&[Some(1.0), Some(2.0), Some(1.0), Some(2.0)]).await;
    let mut discretizer =
        QuantileDiscretizer::new(vec!["value".to_string()], DiscretizeConfig::default());
    discretizer.fit(&train).await?;
    assert!(discretizer.model("value").unwrap().is_degenerate());

    let batches = discretizer.transform(train)?.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");
    let schema = batch.schema();
    let field = schema.field_with_name("value").unwrap();
    assert_eq!(field.data_type(), &DataType::Float64);
    Ok(())
}

#[tokio::test]
async fn test_transform_before_fit_fails() {
    let df = create_df(&one_to_hundred()).await;
    let discretizer = QuantileDiscretizer::new(vec!["value".to_string()], DiscretizeConfig::default());
    assert!(matches!(
        discretizer.transform(df),
        Err(DiscretizerError::FitNotCalled)
    ));
}

#[tokio::test]
async fn test_unknown_column_fails() {
    let df = create_df(&one_to_hundred()).await;
    let mut discretizer =
        QuantileDiscretizer::new(vec!["missing".to_string()], DiscretizeConfig::default());
    let err = discretizer.fit(&df).await.unwrap_err();
    assert!(matches!(err, DiscretizerError::MissingColumn(_)));
}

#[tokio::test]
async fn test_through_transformer_trait() -> DiscretizerResult<()> {
    let train = create_df(&one_to_hundred()).await;
    let mut step: Box<dyn Transformer + Send + Sync> = Box::new(QuantileDiscretizer::new(
        vec!["value".to_string()],
        DiscretizeConfig::new(2),
    ));
    assert!(step.is_stateful());
    step.fit(&train).await?;
    let labels = collect_labels(step.transform(train)?).await?;
    assert_eq!(labels.len(), 100);
    assert_eq!(labels[0].as_deref(), Some("bin1"));
    assert_eq!(labels[99].as_deref(), Some("bin2"));
    Ok(())
}

#[tokio::test]
async fn test_nan_handled_like_core_apply() -> DiscretizerResult<()> {
    let train = create_df(&one_to_hundred()).await;
    for keep_missing in [true, false] {
        let config = DiscretizeConfig::default().with_keep_missing(keep_missing);
        let mut discretizer = QuantileDiscretizer::new(vec!["value".to_string()], config);
        discretizer.fit(&train).await?;
        let model = discretizer.model("value").expect("Expected a fitted model");

        let core = apply(model, &ColumnData::from(vec![f64::NAN]))?;
        let core_label = core.as_categorical().unwrap().get(0).map(String::from);

        let test = create_df(&[Some(f64::NAN)]).await;
        let lazy = collect_labels(discretizer.transform(test)?).await?;
        assert_eq!(lazy, vec![core_label], "keep_missing = {}", keep_missing);
    }
    Ok(())
}

#[tokio::test]
async fn test_domain_of_transformed_column() -> DiscretizerResult<()> {
    let train = create_df(&one_to_hundred()).await;
    let mut discretizer =
        QuantileDiscretizer::new(vec!["value".to_string()], DiscretizeConfig::new(2));
    assert_eq!(discretizer.domain("value"), None);
    discretizer.fit(&train).await?;
    assert_eq!(
        discretizer.domain("value"),
        Some(vec![
            "bin_missing".to_string(),
            "bin1".to_string(),
            "bin2".to_string()
        ])
    );
    assert_eq!(discretizer.domain("id"), None);
    Ok(())
}

#[tokio::test]
async fn test_fit_on_decimal_column() -> DiscretizerResult<()> {
    let schema = Arc::new(Schema::new(vec![Field::new(
        "price",
        DataType::Decimal128(10, 2),
        true,
    )]));
    // 1.00, 2.00, ..., 100.00
    let price: ArrayRef = Arc::new(
        Decimal128Array::from((1..=100).map(|v| Some(v * 100)).collect::<Vec<_>>())
            .with_precision_and_scale(10, 2)?,
    );
    let batch = RecordBatch::try_new(schema.clone(), vec![price])?;
    let ctx = SessionContext::new();
    ctx.register_table("p", Arc::new(MemTable::try_new(schema, vec![vec![batch]])?))?;
    let df = ctx.table("p").await?;

    let config = DiscretizeConfig::new(4).with_unbounded_ends(false);
    let mut discretizer = QuantileDiscretizer::new(vec!["price".to_string()], config);
    discretizer.fit(&df).await?;
    let model = discretizer.model("price").expect("Expected a fitted model");
    assert_eq!(model.bin_count(), 4);
    assert_eq!(model.breakpoints(), &[1.0, 25.75, 50.5, 75.25, 100.0]);
    Ok(())
}
