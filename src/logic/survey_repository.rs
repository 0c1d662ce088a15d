use std::sync::Arc;

use crate::logic::error::SurveyError;
use crate::logic::predicate::build_predicate;
use crate::model::{FilterSet, NewSurvey, Survey, SurveyPatch};
use crate::store::{Gateway, GatewayTransaction};

const SURVEY_COLUMNS: &str = "survey_ref, short_name, long_name, legal_basis, survey_mode";

/// Owns every read and write of the survey table.
pub struct SurveyRepository<G: Gateway> {
    gateway: Arc<G>,
    table: String,
}

impl<G: Gateway> SurveyRepository<G> {
    /// `schema` must already be a validated SQL identifier.
    pub fn new(gateway: Arc<G>, schema: &str) -> Self {
        Self {
            gateway,
            table: format!("{}.survey", schema),
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Surveys matching every filter, in the order the store returns them.
    /// An empty result is not an error.
    pub async fn search(&self, filters: &FilterSet) -> Result<Vec<Survey>, SurveyError> {
        if filters.is_empty() {
            return Err(SurveyError::NoFilterProvided);
        }
        let (sql, args) = self.select_sql(filters)?;
        Ok(self.gateway.query(&sql, &args).await?)
    }

    pub async fn fetch_by_reference(&self, reference: &str) -> Result<Vec<Survey>, SurveyError> {
        self.search(&FilterSet::by_reference(reference)).await
    }

    pub async fn create(&self, new_survey: NewSurvey) -> Result<Survey, SurveyError> {
        let survey = new_survey.into_survey();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5)",
            self.table, SURVEY_COLUMNS
        );
        let args = vec![
            survey.reference.clone(),
            survey.short_name.clone(),
            survey.long_name.clone(),
            survey.legal_basis.clone(),
            survey.survey_mode.clone(),
        ];

        let mut tx = self.gateway.begin().await?;
        tx.execute(&sql, &args).await?;
        tx.commit().await?;

        Ok(survey)
    }

    /// Merge `patch` onto the stored survey and return the row as stored
    /// after commit.
    pub async fn update_by_reference(
        &self,
        reference: &str,
        patch: &SurveyPatch,
    ) -> Result<Survey, SurveyError> {
        let mut tx = self.gateway.begin().await?;

        let existing = self.existing(&mut tx, reference).await?;
        if patch.is_empty() {
            return Err(SurveyError::NoFieldsToUpdate);
        }
        let merged = patch.merge_into(existing);

        let sql = format!(
            "UPDATE {} SET short_name = $1, long_name = $2, legal_basis = $3, survey_mode = $4 WHERE survey_ref = $5",
            self.table
        );
        let args = vec![
            merged.short_name,
            merged.long_name,
            merged.legal_basis,
            merged.survey_mode,
            merged.reference,
        ];
        tx.execute(&sql, &args).await?;
        tx.commit().await?;

        self.fetch_by_reference(reference)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SurveyError::NotFound(reference.to_string()))
    }

    pub async fn delete_by_reference(&self, reference: &str) -> Result<(), SurveyError> {
        let mut tx = self.gateway.begin().await?;

        self.existing(&mut tx, reference).await?;

        let sql = format!("DELETE FROM {} WHERE survey_ref = $1", self.table);
        tx.execute(&sql, &[reference.to_string()]).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn existing(
        &self,
        tx: &mut Box<dyn GatewayTransaction>,
        reference: &str,
    ) -> Result<Survey, SurveyError> {
        let (sql, args) = self.select_sql(&FilterSet::by_reference(reference))?;
        tx.query(&sql, &args)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SurveyError::NotFound(reference.to_string()))
    }

    fn select_sql(&self, filters: &FilterSet) -> Result<(String, Vec<String>), SurveyError> {
        let predicate = build_predicate(filters)?;
        let sql = format!(
            "SELECT {} FROM {} {}",
            SURVEY_COLUMNS, self.table, predicate.clause
        );
        Ok((sql, predicate.args))
    }
}
