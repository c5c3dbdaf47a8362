//! Gemeinsame Test-Harness: Controller + State + protokollierende Oberfläche.

use matsim_webmap::core::geojson::Feature;
use matsim_webmap::{
    AppController, AppIntent, AppState, DatasetKey, RecordingSurface, SyncReport,
};
use serde_json::json;

/// Treibt den Controller gegen eine protokollierende Oberfläche.
pub struct Harness {
    pub controller: AppController,
    pub state: AppState,
    pub surface: RecordingSurface,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            controller: AppController::new(),
            state: AppState::new(),
            surface: RecordingSurface::new(),
        }
    }

    /// Verarbeitet einen Intent; Fehler lassen den Test scheitern.
    pub fn intent(&mut self, intent: AppIntent) -> SyncReport {
        self.controller
            .handle_intent(&mut self.state, &mut self.surface, intent)
            .expect("Intent sollte ohne Fehler durchlaufen")
    }

    /// Beantwortet alle offenen Fetch-Aufträge über den Responder
    /// (None = Fetch schlägt fehl), bis die Outbox leer bleibt.
    pub fn deliver_fetches(&mut self, responder: impl Fn(&DatasetKey) -> Option<String>) {
        loop {
            let requests = self.state.take_pending_fetches();
            if requests.is_empty() {
                break;
            }
            for request in requests {
                match responder(&request.key) {
                    Some(body) => {
                        self.intent(AppIntent::DatasetFetchCompleted {
                            key: request.key,
                            body,
                        });
                    }
                    None => {
                        self.intent(AppIntent::DatasetFetchFailed {
                            key: request.key,
                            error: "HTTP 404".to_string(),
                        });
                    }
                }
            }
        }
    }

    /// Startet die Anwendung und lädt die Kantonsgrenzen.
    pub fn started_with_boundaries(mut self) -> Self {
        self.intent(AppIntent::Started);
        self.deliver_fetches(|key| match key {
            DatasetKey::CantonBoundaries => Some(boundaries_body()),
            _ => None,
        });
        self.surface.take_ops();
        self
    }

    /// Konfiguriert einen Kanton-Hit unter dem Mauszeiger.
    pub fn stage_canton_hit(&mut self, name: &str) {
        self.surface
            .set_hit_result("canton-fill", vec![canton_feature(name)]);
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

pub fn canton_feature(name: &str) -> Feature {
    serde_json::from_value(json!({
        "type": "Feature",
        "properties": { "NAME": name },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[8.4, 47.2], [8.8, 47.2], [8.8, 47.7], [8.4, 47.7], [8.4, 47.2]]]
        }
    }))
    .expect("Fixture sollte parsbar sein")
}

pub fn boundaries_body() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "NAME": "Zürich" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[8.4, 47.2], [8.8, 47.2], [8.8, 47.7], [8.4, 47.7], [8.4, 47.2]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Bern" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[7.0, 46.3], [8.5, 46.3], [8.5, 47.3], [7.0, 47.3], [7.0, 46.3]]]
                }
            }
        ]
    })
    .to_string()
}

pub fn segment_feature(id: &str, modes: &str) -> serde_json::Value {
    json!({
        "type": "Feature",
        "properties": {
            "id": id,
            "modes": modes,
            "capacity": 1200.0,
            "freespeed": 13.89,
            "daily_avg_volume": 120.0
        },
        "geometry": {
            "type": "LineString",
            "coordinates": [[8.50, 47.35], [8.55, 47.37]]
        }
    })
}

pub fn network_body() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [
            segment_feature("41", "car,bike"),
            segment_feature("42", "car"),
            segment_feature("43", "bike")
        ]
    })
    .to_string()
}

pub fn stops_body() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {
                "name": "Hauptbahnhof",
                "stop_id": "a,b",
                "lines": "[{\"line_id\":\"S3\",\"route_id\":\"S3_1\"},{\"line_id\":\"S3\",\"route_id\":\"S3_2\"}]",
                "modes_list": "rail,bus"
            },
            "geometry": { "type": "Point", "coordinates": [8.54, 47.38] }
        }]
    })
    .to_string()
}

pub fn passenger_counts_body() -> String {
    json!([
        { "stop_id": "a", "data": [ { "time": "07:00", "boardings": 30.0, "alightings": 10.0 } ] },
        { "stop_id": "b", "data": [ { "time": "07:00", "boardings": 5.0, "alightings": 5.0 } ] }
    ])
    .to_string()
}

pub fn transit_routes_body() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "line_id": "S3", "route_id": "S3_1" },
                "geometry": { "type": "LineString", "coordinates": [[8.5, 47.3], [8.6, 47.4]] }
            },
            {
                "type": "Feature",
                "properties": { "line_id": "S3", "route_id": "S3_2" },
                "geometry": { "type": "LineString", "coordinates": [[8.5, 47.3], [8.4, 47.4]] }
            },
            {
                "type": "Feature",
                "properties": { "line_id": "S9", "route_id": "S9_1" },
                "geometry": { "type": "LineString", "coordinates": [[8.5, 47.3], [8.5, 47.5]] }
            }
        ]
    })
    .to_string()
}
