use tracing::{info, instrument};

use crate::{
    aggregate::summarize,
    error::AnalysisError,
    model::{ClimateAnalysisResult, DateRange, LocationInfo, PowerResponse},
    probability::hazard_probabilities,
    provider::ClimateDataSource,
    transform::transform,
};

/// Runs transform, summary and hazard probabilities over an already fetched
/// response. Either returns a complete result or fails on a malformed payload.
pub fn analyze(
    location: &LocationInfo,
    range: &DateRange,
    response: &PowerResponse,
) -> Result<ClimateAnalysisResult, AnalysisError> {
    let metrics = transform(response, &location.name)?;
    let summary = summarize(&metrics);
    let probabilities = hazard_probabilities(&metrics);

    info!(
        location = %location.name,
        %range,
        data_points = summary.data_points,
        "Climate analysis complete"
    );

    Ok(ClimateAnalysisResult { location: location.clone(), metrics, summary, probabilities })
}

/// Fetches a window from a data source and analyzes it.
#[derive(Debug)]
pub struct ClimateAnalyzer<S> {
    source: S,
}

impl<S: ClimateDataSource> ClimateAnalyzer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    #[instrument(skip(self, location), fields(location = %location.name))]
    pub async fn analyze_location(
        &self,
        location: &LocationInfo,
        range: &DateRange,
    ) -> anyhow::Result<ClimateAnalysisResult> {
        let response = self
            .source
            .fetch_daily(location.latitude, location.longitude, range)
            .await?;

        Ok(analyze(location, range, &response)?)
    }
}
