//! End-to-End-Flows: Intents → Commands → Szenen-Abgleich.

mod common;

use common::{
    boundaries_body, network_body, passenger_counts_body, segment_feature, stops_body,
    transit_routes_body, Harness,
};
use glam::DVec2;
use matsim_webmap::{
    ActiveModule, AppIntent, DatasetKey, Mode, ModeFilter, RenderSurface, SurfaceOp,
};

fn click_point() -> DVec2 {
    DVec2::new(400.0, 300.0)
}

/// Konfiguriert einen Segment-Hit auf der Klickfläche.
fn stage_segment_hit(harness: &mut Harness, id: &str, modes: &str) {
    let feature = serde_json::from_value(segment_feature(id, modes))
        .expect("Fixture sollte parsbar sein");
    harness
        .surface
        .set_hit_result("click-network-layer", vec![feature]);
}

/// Harness mit Netzwerk-Modul und geladenem Zürcher Netz.
fn network_harness() -> Harness {
    let mut harness = Harness::new().started_with_boundaries();
    harness.intent(AppIntent::ModuleSelected {
        module: Some(ActiveModule::Network),
    });
    harness.intent(AppIntent::CantonSearchSubmitted {
        query: "Zürich".to_string(),
    });
    harness.deliver_fetches(|key| match key {
        DatasetKey::Network(canton) if canton == "Zürich" => Some(network_body()),
        _ => None,
    });
    harness.surface.take_ops();
    harness
}

/// Harness mit Transit-Modul und geladenen Zürcher Haltestellen.
fn transit_harness() -> Harness {
    let mut harness = Harness::new().started_with_boundaries();
    harness.intent(AppIntent::ModuleSelected {
        module: Some(ActiveModule::Transit),
    });
    harness.intent(AppIntent::CantonSearchSubmitted {
        query: "Zürich".to_string(),
    });
    harness.deliver_fetches(|key| match key {
        DatasetKey::TransitStops(canton) if canton == "Zürich" => Some(stops_body()),
        _ => None,
    });
    harness.surface.take_ops();
    harness
}

#[test]
fn test_startup_requests_boundaries_and_builds_base_scene() {
    let mut harness = Harness::new();

    let report = harness.intent(AppIntent::Started);
    assert_eq!(report.fetches.len(), 1);
    assert_eq!(report.fetches[0].key, DatasetKey::CantonBoundaries);
    assert!(harness.state.ui.is_loading());

    harness.deliver_fetches(|key| match key {
        DatasetKey::CantonBoundaries => Some(boundaries_body()),
        _ => None,
    });

    assert_eq!(
        harness.surface.layer_names(),
        vec![
            "canton-fill",
            "canton-borders",
            "selected-canton-border",
            "canton-highlight"
        ]
    );
    assert_eq!(harness.state.registry.len(), 2);
    assert!(!harness.state.ui.is_loading());
}

#[test]
fn test_search_selects_canton_updates_border_and_fits_camera() {
    let mut harness = Harness::new().started_with_boundaries();

    harness.intent(AppIntent::CantonSearchSubmitted {
        query: "zurich".to_string(),
    });
    assert_eq!(harness.state.selection.active_canton.as_deref(), Some("Zürich"));

    let ops = harness.surface.take_ops();
    // Der Auswahlrahmen wird per Filter-Update nachgeführt, nie neu angelegt.
    assert!(ops.iter().any(|op| matches!(
        op,
        SurfaceOp::SetFilter { layer, .. } if layer == "selected-canton-border"
    )));
    assert!(!ops.iter().any(|op| matches!(op, SurfaceOp::AddLayer { .. })));
    match ops.last().expect("Kamera-Fahrt sollte ausgelöst sein") {
        SurfaceOp::EaseCamera(request) => {
            assert_eq!(request.duration_ms, 1000);
            assert_eq!(request.max_zoom, Some(10.0));
            assert_eq!(request.padding.right, 350.0);
        }
        other => panic!("Unerwartete letzte Operation: {other:?}"),
    }

    // Erneute Suche nach dem aktiven Kanton: kompletter No-op.
    harness.intent(AppIntent::CantonSearchSubmitted {
        query: "Zürich".to_string(),
    });
    assert!(harness.surface.ops().is_empty());
}

#[test]
fn test_network_scenario_zurich_add_then_filter_in_place() {
    let mut harness = Harness::new().started_with_boundaries();
    harness.intent(AppIntent::ModuleSelected {
        module: Some(ActiveModule::Network),
    });
    harness.intent(AppIntent::CantonSearchSubmitted {
        query: "Zürich".to_string(),
    });

    // Netz noch nicht geladen: Layer aufgeschoben, Lade-Indikator an.
    assert!(harness.state.ui.is_loading());
    assert!(!harness.surface.has_layer("network-layer"));

    harness.deliver_fetches(|key| match key {
        DatasetKey::Network(canton) if canton == "Zürich" => Some(network_body()),
        _ => None,
    });

    assert!(harness.surface.has_source("network-source"));
    assert!(harness.surface.has_layer("click-network-layer"));
    assert!(harness.surface.has_layer("network-layer"));
    // `all`-Auswahl heißt: kein Filter gesetzt.
    assert_eq!(
        harness.surface.layer_spec("network-layer").unwrap().filter,
        None
    );

    // Moduswechsel auf {car}: Filter-Update in place, kein Add/Remove,
    // Quelle unangetastet.
    harness.surface.take_ops();
    harness.intent(AppIntent::NetworkModesChanged {
        filter: ModeFilter::single(Mode::Car),
    });
    let ops = harness.surface.take_ops();
    let filter_updates = ops
        .iter()
        .filter(|op| matches!(op, SurfaceOp::SetFilter { .. }))
        .count();
    assert_eq!(filter_updates, 2);
    assert!(!ops.iter().any(|op| matches!(
        op,
        SurfaceOp::AddLayer { .. }
            | SurfaceOp::RemoveLayer { .. }
            | SurfaceOp::AddSource { .. }
            | SurfaceOp::RemoveSource { .. }
    )));
}

#[test]
fn test_segment_click_highlight_idempotent_and_atomic_replace() {
    let mut harness = network_harness();
    harness.stage_canton_hit("Zürich");
    stage_segment_hit(&mut harness, "42", "car");

    harness.intent(AppIntent::MapClicked { point: click_point() });
    assert_eq!(
        harness
            .state
            .selection
            .selected_segment_ids
            .iter()
            .collect::<Vec<_>>(),
        vec!["42"]
    );
    let ops = harness.surface.take_ops();
    match ops
        .iter()
        .find(|op| matches!(op, SurfaceOp::AddLayer { name, .. } if name == "network-highlight"))
    {
        Some(SurfaceOp::AddLayer { insert_before, .. }) => {
            assert_eq!(insert_before.as_deref(), Some("network-layer"));
        }
        other => panic!("Highlight-Layer fehlt: {other:?}"),
    }
    // Die Highlight-Quelle enthält genau das geklickte Segment.
    let highlight = harness.surface.source_data("network-highlight").unwrap();
    assert_eq!(highlight.features.len(), 1);

    // Gleicher Klick nochmal: kompletter No-op.
    harness.intent(AppIntent::MapClicked { point: click_point() });
    assert!(harness.surface.ops().is_empty());

    // Anderes Segment: alter Highlight raus, neuer rein — im selben Pass.
    stage_segment_hit(&mut harness, "41", "car,bike");
    harness.intent(AppIntent::MapClicked { point: click_point() });
    let ops = harness.surface.take_ops();
    let removed = ops
        .iter()
        .position(|op| matches!(op, SurfaceOp::RemoveLayer { name } if name == "network-highlight"));
    let added = ops
        .iter()
        .position(|op| matches!(op, SurfaceOp::AddLayer { name, .. } if name == "network-highlight"));
    assert!(removed.expect("alter Highlight sollte entfernt sein") < added.expect("neuer Highlight sollte angelegt sein"));
}

#[test]
fn test_module_switch_to_transit_is_atomic() {
    let mut harness = network_harness();
    harness.stage_canton_hit("Zürich");
    stage_segment_hit(&mut harness, "42", "car");
    harness.intent(AppIntent::MapClicked { point: click_point() });

    harness.intent(AppIntent::ModuleSelected {
        module: Some(ActiveModule::Transit),
    });

    // Kein Zwischenzustand: Netzwerk-Layer weg UND Segment-Selektion leer,
    // bevor irgendein Transit-Datensatz eingetroffen ist.
    assert!(!harness.surface.has_layer("network-layer"));
    assert!(!harness.surface.has_layer("click-network-layer"));
    assert!(!harness.surface.has_layer("network-highlight"));
    assert!(!harness.surface.has_source("network-source"));
    assert!(harness.state.selection.selected_segment_ids.is_empty());
    assert!(harness.state.selection.flow_segment_id.is_none());
}

#[test]
fn test_transit_removal_order_overlays_before_base_layers_before_sources() {
    let mut harness = transit_harness();
    harness.stage_canton_hit("Zürich");
    let stop: matsim_webmap::core::geojson::Feature = {
        let collection: matsim_webmap::FeatureCollection =
            serde_json::from_str(&stops_body()).unwrap();
        collection.features[0].clone()
    };
    harness.surface.set_hit_result("transit-stops-hitbox", vec![stop]);
    harness.intent(AppIntent::MapClicked { point: click_point() });
    harness.surface.take_ops();

    // Modul verlassen: Overlays müssen vor ihrer Basis fallen, Layer vor Quellen.
    harness.intent(AppIntent::ModuleSelected { module: None });
    let ops = harness.surface.take_ops();
    let position = |pred: &dyn Fn(&SurfaceOp) -> bool| ops.iter().position(|op| pred(op));

    let highlight_removed = position(&|op| {
        matches!(op, SurfaceOp::RemoveLayer { name } if name == "transit-highlight-layer")
    })
    .expect("Highlight sollte entfernt sein");
    let base_removed = position(&|op| {
        matches!(op, SurfaceOp::RemoveLayer { name } if name == "transit-stops-layer")
    })
    .expect("Basis-Layer sollte entfernt sein");
    let source_removed = position(&|op| {
        matches!(op, SurfaceOp::RemoveSource { name } if name == "transit-stops")
    })
    .expect("Quelle sollte entfernt sein");

    assert!(highlight_removed < base_removed);
    assert!(base_removed < source_removed);
}

#[test]
fn test_stop_selection_and_volume_symbology() {
    let mut harness = transit_harness();
    harness.stage_canton_hit("Zürich");
    let stop: matsim_webmap::core::geojson::Feature = {
        let collection: matsim_webmap::FeatureCollection =
            serde_json::from_str(&stops_body()).unwrap();
        collection.features[0].clone()
    };
    harness.surface.set_hit_result("transit-stops-hitbox", vec![stop]);

    harness.intent(AppIntent::MapClicked { point: click_point() });
    let selected = harness.state.selection.selected_stop.as_ref().unwrap();
    assert_eq!(selected.name, "Hauptbahnhof");
    assert_eq!(selected.stop_ids, vec!["a", "b"]);
    match harness
        .surface
        .layer_spec("transit-highlight-layer")
        .map(|spec| spec.insert_before)
    {
        Some(Some("transit-stops-layer")) => {}
        other => panic!("Highlight-Anker falsch: {other:?}"),
    }

    // Volumen-Symbologie: Passagierzahlen laden, Quelle neu mit injiziertem
    // Gesamtvolumen (30+10 + 5+5 = 50).
    harness.intent(AppIntent::StopVolumeSymbologyToggled { enabled: true });
    harness.deliver_fetches(|key| match key {
        DatasetKey::TransitPassengerCounts(canton) if canton == "Zürich" => {
            Some(passenger_counts_body())
        }
        _ => None,
    });
    let stops_source = harness.surface.source_data("transit-stops").unwrap();
    assert_eq!(
        stops_source.features[0].number_property("volume"),
        Some(50.0)
    );
}

#[test]
fn test_line_highlight_respects_route_hover() {
    let mut harness = transit_harness();
    harness.stage_canton_hit("Zürich");
    let stop: matsim_webmap::core::geojson::Feature = {
        let collection: matsim_webmap::FeatureCollection =
            serde_json::from_str(&stops_body()).unwrap();
        collection.features[0].clone()
    };
    harness.surface.set_hit_result("transit-stops-hitbox", vec![stop]);
    harness.intent(AppIntent::MapClicked { point: click_point() });

    harness.intent(AppIntent::TransitLineHighlighted {
        line_id: "S3".to_string(),
    });
    harness.deliver_fetches(|key| match key {
        DatasetKey::TransitRoutes => Some(transit_routes_body()),
        _ => None,
    });
    let routes = harness.surface.source_data("transit-line-highlight").unwrap();
    assert_eq!(routes.features.len(), 2);

    // Hover schränkt auf eine Route ein, Hover-Ende stellt alle wieder her.
    harness.intent(AppIntent::RouteHovered {
        route_id: Some("S3_1".to_string()),
    });
    let routes = harness.surface.source_data("transit-line-highlight").unwrap();
    assert_eq!(routes.features.len(), 1);
    assert_eq!(
        routes.features[0].string_property("route_id"),
        Some("S3_1")
    );

    harness.intent(AppIntent::RouteHovered { route_id: None });
    let routes = harness.surface.source_data("transit-line-highlight").unwrap();
    assert_eq!(routes.features.len(), 2);
}

#[test]
fn test_stale_network_result_is_cached_but_not_applied() {
    let mut harness = Harness::new().started_with_boundaries();
    harness.intent(AppIntent::ModuleSelected {
        module: Some(ActiveModule::Network),
    });
    harness.intent(AppIntent::CantonSearchSubmitted {
        query: "Zürich".to_string(),
    });
    let requests = harness.state.take_pending_fetches();
    let network_key = DatasetKey::Network("Zürich".to_string());
    assert!(requests.iter().any(|r| r.key == network_key));

    // Generation überholt, bevor der Fetch zurückkommt.
    harness.intent(AppIntent::ModuleSelected {
        module: Some(ActiveModule::Choropleth),
    });
    harness.surface.take_ops();

    harness.intent(AppIntent::DatasetFetchCompleted {
        key: network_key.clone(),
        body: network_body(),
    });

    // Cache ist befüllt (für spätere Wiederverwendung), aber die Oberfläche
    // bleibt unangetastet.
    assert!(harness.state.cache.is_resident(&network_key));
    assert!(!harness.surface.has_layer("network-layer"));
    assert!(harness.surface.ops().is_empty());
}

#[test]
fn test_missing_network_degrades_without_retry_loop() {
    let mut harness = Harness::new().started_with_boundaries();
    harness.intent(AppIntent::ModuleSelected {
        module: Some(ActiveModule::Network),
    });
    harness.intent(AppIntent::CantonSearchSubmitted {
        query: "Bern".to_string(),
    });
    harness.deliver_fetches(|key| match key {
        DatasetKey::Network(canton) if canton == "Bern" => None,
        _ => None,
    });

    let key = DatasetKey::Network("Bern".to_string());
    assert!(harness.state.ui.unavailable_datasets.contains(&key));
    // Grundszene bleibt intakt, nur das Netz fehlt.
    assert!(harness.surface.has_layer("canton-fill"));
    assert!(!harness.surface.has_layer("network-layer"));

    // Unverwandte Intents stoßen keinen neuen Versuch an.
    harness.stage_canton_hit("Bern");
    harness.intent(AppIntent::MapPointerMoved { point: click_point() });
    assert!(harness.state.take_pending_fetches().is_empty());

    // Ein Kantonswechsel (neue Szene) darf wieder laden.
    harness.intent(AppIntent::CantonSearchSubmitted {
        query: "Zürich".to_string(),
    });
    let requests = harness.state.take_pending_fetches();
    assert!(requests
        .iter()
        .any(|r| r.key == DatasetKey::Network("Zürich".to_string())));
}

#[test]
fn test_volumes_switch_keeps_only_car_segments() {
    let mut harness = network_harness();
    harness.stage_canton_hit("Zürich");

    // Segment ohne Auto-Modus geht beim Wechsel auf Volumen verloren.
    stage_segment_hit(&mut harness, "43", "bike");
    harness.intent(AppIntent::MapClicked { point: click_point() });
    harness.intent(AppIntent::ModuleSelected {
        module: Some(ActiveModule::Volumes),
    });
    assert!(harness.state.selection.selected_segment_ids.is_empty());

    // Auto-Segment überlebt den Wechsel zurück und hin.
    harness.intent(AppIntent::ModuleSelected {
        module: Some(ActiveModule::Network),
    });
    stage_segment_hit(&mut harness, "42", "car");
    harness.intent(AppIntent::MapClicked { point: click_point() });
    harness.intent(AppIntent::ModuleSelected {
        module: Some(ActiveModule::Volumes),
    });
    assert_eq!(
        harness
            .state
            .selection
            .selected_segment_ids
            .iter()
            .collect::<Vec<_>>(),
        vec!["42"]
    );
}

#[test]
fn test_flow_animation_lifecycle() {
    let mut harness = network_harness();
    harness.intent(AppIntent::ModuleSelected {
        module: Some(ActiveModule::Volumes),
    });

    harness.intent(AppIntent::FlowSegmentSelected {
        segment_id: Some("42".to_string()),
    });
    assert!(harness.surface.has_layer("flow-line"));
    assert!(harness.controller.flow_active());

    harness.surface.take_ops();
    let advanced = harness
        .controller
        .tick(&harness.state, &mut harness.surface, 1000.0);
    assert!(advanced);
    assert!(matches!(
        harness.surface.ops().first(),
        Some(SurfaceOp::SetPaint { layer, .. }) if layer == "flow-line"
    ));

    // Abwahl räumt Layer und Quelle; kein Tick wirkt mehr.
    harness.intent(AppIntent::FlowSegmentSelected { segment_id: None });
    assert!(!harness.surface.has_layer("flow-line"));
    assert!(!harness.surface.has_source("flow-path"));
    assert!(!harness.controller.flow_active());
    harness.surface.take_ops();
    assert!(!harness
        .controller
        .tick(&harness.state, &mut harness.surface, 2000.0));
    assert!(harness.surface.ops().is_empty());
}

#[test]
fn test_choropleth_demand_is_coalesced_to_one_fetch() {
    let mut harness = Harness::new().started_with_boundaries();
    harness.intent(AppIntent::ModuleSelected {
        module: Some(ActiveModule::Choropleth),
    });

    harness.intent(AppIntent::ChoroplethSymbologyChanged {
        mode: Some(Mode::Car),
        dataset: matsim_webmap::SurveyDataset::Microcensus,
    });
    harness.intent(AppIntent::ChoroplethSymbologyChanged {
        mode: Some(Mode::Bike),
        dataset: matsim_webmap::SurveyDataset::Microcensus,
    });

    let mode_share_requests = harness
        .state
        .take_pending_fetches()
        .into_iter()
        .filter(|r| r.key == DatasetKey::ModeShare)
        .count();
    assert_eq!(mode_share_requests, 1);
}

#[test]
fn test_sidebar_toggle_eases_padding_only() {
    let mut harness = Harness::new().started_with_boundaries();
    harness.intent(AppIntent::CantonSearchSubmitted {
        query: "Zürich".to_string(),
    });
    harness.surface.take_ops();

    harness.intent(AppIntent::SidebarToggled);
    let ops = harness.surface.take_ops();
    match ops.as_slice() {
        [SurfaceOp::EaseCamera(request)] => {
            assert_eq!(request.duration_ms, 600);
            assert_eq!(request.padding.right, 50.0);
            assert_eq!(request.max_zoom, None);
        }
        other => panic!("Erwartet war genau eine Kamera-Fahrt: {other:?}"),
    }
}

#[test]
fn test_reset_returns_to_home_framing() {
    let mut harness = Harness::new().started_with_boundaries();
    harness.intent(AppIntent::CantonSearchSubmitted {
        query: "Zürich".to_string(),
    });
    harness.surface.take_ops();

    harness.intent(AppIntent::ResetViewRequested);
    assert!(harness.state.selection.active_canton.is_none());
    let ops = harness.surface.take_ops();
    match ops.last() {
        Some(SurfaceOp::EaseCamera(request)) => {
            // Home-Ausschnitt: ganze Schweiz.
            assert!((request.bounds.min.x - 5.9559).abs() < 1e-9);
            assert!((request.bounds.max.y - 47.8084).abs() < 1e-9);
        }
        other => panic!("Kamera-Fahrt fehlt: {other:?}"),
    }
}

#[test]
fn test_data_root_override_adds_fallback_candidates() {
    let mut harness = Harness::new();
    harness.intent(AppIntent::DataRootChanged {
        url: "http://localhost:8080/data/".to_string(),
    });
    harness.intent(AppIntent::Started);

    let requests = harness.state.take_pending_fetches();
    let boundaries = requests
        .iter()
        .find(|r| r.key == DatasetKey::CantonBoundaries)
        .expect("Grenzen-Fetch sollte angefordert sein");
    assert_eq!(boundaries.candidates.len(), 2);
    assert_eq!(
        boundaries.candidates[0],
        "http://localhost:8080/data/TLM_KANTONSGEBIET.geojson"
    );
    assert!(boundaries.candidates[1].starts_with("https://matsim-eth.github.io/"));
}
