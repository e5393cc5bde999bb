//! Location lookups: Wikidata coordinates and nearby train stations

use crate::error::{ExploreError, ExploreResult};
use crate::sparql::{params, Params, QueryExecutor, Record, TabularResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{nearby, NearbyRecord};

/// Endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "wikidata-qlever";

/// Coordinates and labels of a Wikidata item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikidataGeoItem {
    pub qid: String,
    pub lat: f64,
    pub lon: f64,
    pub label: Option<String>,
    pub description: Option<String>,
}

impl WikidataGeoItem {
    /// Build from a `WikidataGeo` result row; `None` when coordinates are missing
    pub fn from_record(qid: &str, record: &Record) -> Option<Self> {
        Some(Self {
            qid: qid.to_string(),
            lat: record.get_f64("lat")?,
            lon: record.get_f64("lon")?,
            label: record.get("label").map(str::to_string),
            description: record.get("description").map(str::to_string),
        })
    }

    pub fn wikidata_url(&self) -> String {
        format!("https://www.wikidata.org/wiki/{}", self.qid)
    }
}

/// Looks up locations of different kinds
#[derive(Clone)]
pub struct LocFinder {
    executor: QueryExecutor,
    endpoint_name: String,
}

impl LocFinder {
    pub fn new(executor: QueryExecutor) -> Self {
        Self {
            executor,
            endpoint_name: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint_name: impl Into<String>) -> Self {
        self.endpoint_name = endpoint_name.into();
        self
    }

    /// Coordinates, label and description of a Wikidata item, if it has any
    pub async fn wikidata_geo(&self, qid: &str) -> ExploreResult<Option<WikidataGeoItem>> {
        let result = self
            .executor
            .query_by_name(&self.endpoint_name, "WikidataGeo", &params([("qid", qid)]))
            .await?;
        match result.first() {
            None => Ok(None),
            Some(record) => WikidataGeoItem::from_record(qid, record)
                .map(Some)
                .ok_or_else(|| ExploreError::EmptyResult(format!("no coordinates for {}", qid))),
        }
    }

    /// Every train station with coordinates (`item`, `label`, `lat`, `long`)
    pub async fn all_train_stations(&self) -> ExploreResult<TabularResult> {
        self.executor
            .query_by_name(&self.endpoint_name, "AllTrainStations", &Params::new())
            .await
    }

    /// Train stations within `radius_km` of the given point, nearest first
    pub async fn train_stations_near(
        &self,
        lat: f64,
        lon: f64,
        radius_km: f64,
    ) -> ExploreResult<Vec<NearbyRecord>> {
        let stations = self.all_train_stations().await?;
        let result = nearby(&stations.records, lat, lon, radius_km);
        info!(
            "{} of {} train stations within {} km of {},{}",
            result.len(),
            stations.len(),
            radius_km,
            lat,
            lon
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Catalog, Endpoint};
    use crate::sparql::SparqlTransport;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedRows(Vec<Record>);

    #[async_trait]
    impl SparqlTransport for FixedRows {
        async fn select(&self, _endpoint: &Endpoint, _query: &str) -> ExploreResult<TabularResult> {
            Ok(TabularResult::from_records(self.0.clone()))
        }
    }

    fn finder(rows: Vec<Record>) -> LocFinder {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        LocFinder::new(QueryExecutor::new(catalog, Arc::new(FixedRows(rows))))
    }

    fn station(label: &str, lat: &str, long: &str) -> Record {
        [("item", "wd:Q1"), ("label", label), ("lat", lat), ("long", long)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_geo_item_from_record() {
        let record: Record = [
            ("lat", "43.4592"),
            ("lon", "-1.5459"),
            ("label", "Gare de Biarritz"),
            ("description", "railway station in Biarritz, France"),
        ]
        .into_iter()
        .collect();
        let item = WikidataGeoItem::from_record("Q1959795", &record).unwrap();
        assert_eq!(item.label.as_deref(), Some("Gare de Biarritz"));
        assert!((item.lat - 43.4592).abs() < 1e-9);
        assert_eq!(item.wikidata_url(), "https://www.wikidata.org/wiki/Q1959795");

        let no_coords: Record = [("label", "x")].into_iter().collect();
        assert!(WikidataGeoItem::from_record("Q1", &no_coords).is_none());
    }

    #[tokio::test]
    async fn test_wikidata_geo() {
        let row: Record = [("lat", "43.3183"), ("lon", "-1.9812"), ("label", "Donostia")]
            .into_iter()
            .collect();
        let item = finder(vec![row]).wikidata_geo("Q10313").await.unwrap().unwrap();
        assert_eq!(item.qid, "Q10313");
        assert_eq!(item.description, None);

        assert!(finder(vec![]).wikidata_geo("Q0").await.unwrap().is_none());

        let bad: Record = [("lat", "x"), ("lon", "1")].into_iter().collect();
        let err = finder(vec![bad]).wikidata_geo("Q2").await.unwrap_err();
        assert!(matches!(err, ExploreError::EmptyResult(_)));
    }

    #[tokio::test]
    async fn test_train_stations_near() {
        let rows = vec![
            station("San Sebastián", "43.3183", "-1.9812"),
            station("Biarritz", "43.4592", "-1.5459"),
            station("Irun", "43.3390", "-1.7893"),
        ];
        let near = finder(rows)
            .train_stations_near(43.3183, -1.9812, 20.0)
            .await
            .unwrap();
        let labels: Vec<&str> = near.iter().map(|n| n.record.get("label").unwrap()).collect();
        assert_eq!(labels, vec!["San Sebastián", "Irun"]);
    }
}
