//! Builder für Szenen-Deskriptoren aus dem AppState.
//!
//! Reine Funktion: gleicher Zustand + gleicher Cache-Snapshot ergeben
//! denselben Deskriptor. Die gesamte modulspezifische Verzweigung
//! (Choropleth vs. Netzwerk vs. Volumen vs. Transit) liegt hier; der
//! Reconciler kennt nur noch den fertigen Deskriptor.

use crate::app::state::{ActiveModule, AppState};
use crate::core::canton::CANTON_NAME_ATTRIBUTE;
use crate::core::{Color, Mode, ModeFilter, SurveyDataset};
use crate::data::DatasetKey;
use crate::shared::scene_spec::{
    FeatureSubset, CANTON_BORDERS, CANTON_FILL, CANTON_HIGHLIGHT, CANTON_SOURCE,
    CLICK_NETWORK_LAYER, FLOW_LINE, FLOW_SOURCE, NETWORK_HIGHLIGHT, NETWORK_LAYER, NETWORK_SOURCE,
    SELECTED_CANTON_BORDER, TRANSIT_HIGHLIGHT_LAYER, TRANSIT_HIGHLIGHT_SOURCE,
    TRANSIT_LINE_HIGHLIGHT, TRANSIT_STOPS_HITBOX, TRANSIT_STOPS_LABEL, TRANSIT_STOPS_LAYER,
    TRANSIT_STOPS_SOURCE,
};
use crate::shared::{
    FilterExpr, LayerKind, LayerSpec, PaintKey, PaintValue, SceneDescriptor, SourceData, TextStyle,
};

// ── Basis-Styling ───────────────────────────────────────────────────

/// Neutrale Kantonsfüllung ohne Choropleth.
const IDLE_FILL_COLOR: Color = Color::rgb(0xa0, 0x7c, 0xc5);
const IDLE_FILL_OPACITY: f64 = 0.15;
const CANTON_BORDER_COLOR: Color = Color::rgb(0x00, 0x00, 0x00);
const SELECTED_BORDER_COLOR: Color = Color::rgb(0xff, 0x00, 0x00);
const HOVER_BORDER_COLOR: Color = Color::rgb(0xff, 0xff, 0xff);

// ── Netzwerk-Styling ────────────────────────────────────────────────

/// Linienfarbe nach freier Geschwindigkeit (m/s), 0 bis 150 km/h.
const FREESPEED_RAMP: [(f64, Color); 7] = [
    (0.0, Color::rgb(0xff, 0xff, 0xb2)),
    (6.94, Color::rgb(0xfe, 0xd9, 0x76)),
    (13.89, Color::rgb(0xfe, 0xb2, 0x4c)),
    (20.83, Color::rgb(0xfd, 0x8d, 0x3c)),
    (27.78, Color::rgb(0xfc, 0x4e, 0x2a)),
    (34.72, Color::rgb(0xe3, 0x1a, 0x1c)),
    (41.67, Color::rgb(0xb1, 0x00, 0x26)),
];

/// Linienfarbe nach simuliertem Tagesvolumen.
const VOLUME_RAMP: [(f64, Color); 5] = [
    (0.0, Color::rgb(0xff, 0xff, 0xcc)),
    (50.0, Color::rgb(0xc2, 0xe6, 0x99)),
    (100.0, Color::rgb(0x78, 0xc6, 0x79)),
    (250.0, Color::rgb(0x31, 0xa3, 0x54)),
    (500.0, Color::rgb(0x00, 0x68, 0x37)),
];

const SEGMENT_HIGHLIGHT_COLOR: Color = Color::rgb(0x8a, 0xff, 0xff);
const FLOW_COLOR: Color = Color::rgb(0xff, 0x00, 0xff);

// ── Transit-Styling ─────────────────────────────────────────────────

const STOP_COLOR: Color = Color::rgb(0xff, 0x88, 0x00);
const STOP_STROKE_COLOR: Color = Color::rgb(0x33, 0x33, 0x33);
const STOP_HIGHLIGHT_COLOR: Color = Color::rgb(0x00, 0xff, 0xff);
const ROUTE_HIGHLIGHT_COLOR: Color = Color::rgb(0x00, 0x7a, 0xff);
const STOP_LABEL_COLOR: Color = Color::rgb(0x22, 0x22, 0x22);

/// Haltestellen-Radius nach Passagiervolumen.
const STOP_RADIUS_RAMP: [(f64, f64); 5] =
    [(0.0, 3.0), (100.0, 6.0), (500.0, 10.0), (1000.0, 18.0), (2000.0, 25.0)];
/// Radius der hervorgehobenen Haltestelle.
const STOP_HIGHLIGHT_RADIUS_RAMP: [(f64, f64); 5] =
    [(0.0, 6.0), (100.0, 10.0), (500.0, 14.0), (1000.0, 22.0), (2000.0, 29.0)];
/// Klick-Hitbox, großzügiger als die sichtbaren Kreise.
const STOP_HITBOX_RADIUS_RAMP: [(f64, f64); 5] =
    [(0.0, 15.0), (100.0, 15.0), (500.0, 15.0), (1000.0, 18.0), (2000.0, 25.0)];

/// Baut den Szenen-Deskriptor aus dem aktuellen AppState.
pub fn build(state: &AppState) -> SceneDescriptor {
    let mut scene = SceneDescriptor::default();

    base_canton_scene(state, &mut scene);

    match state.selection.active_module {
        Some(module) if module.is_network_family() => network_scene(state, &mut scene, module),
        Some(ActiveModule::Transit) => transit_scene(state, &mut scene),
        Some(ActiveModule::Destination) => {
            // Kartenseitig nur die Grundszene; der Zielverkehr wird für das
            // Panel über denselben Cache vorgeladen.
            if let Some(canton) = state.selection.active_canton.clone() {
                scene.require_dataset(DatasetKey::DestinationFlows(canton));
            }
        }
        _ => {}
    }

    scene
}

// ── Grundszene: Kantonsgrenzen ──────────────────────────────────────

fn base_canton_scene(state: &AppState, scene: &mut SceneDescriptor) {
    scene.add_source(CANTON_SOURCE, SourceData::Dataset(DatasetKey::CantonBoundaries));

    let (fill_color, fill_opacity) = choropleth_fill(state, scene);
    scene.add_layer(
        LayerSpec::new(CANTON_FILL, LayerKind::Fill, CANTON_SOURCE)
            .paint(PaintKey::FillColor, fill_color)
            .paint(PaintKey::FillOpacity, PaintValue::Number(fill_opacity)),
    );
    scene.add_layer(
        LayerSpec::new(CANTON_BORDERS, LayerKind::Line, CANTON_SOURCE)
            .paint(PaintKey::LineColor, PaintValue::Color(CANTON_BORDER_COLOR))
            .paint(PaintKey::LineWidth, PaintValue::Number(1.0)),
    );
    scene.add_layer(
        LayerSpec::new(SELECTED_CANTON_BORDER, LayerKind::Line, CANTON_SOURCE)
            .paint(PaintKey::LineColor, PaintValue::Color(SELECTED_BORDER_COLOR))
            .paint(PaintKey::LineWidth, PaintValue::Number(2.0))
            .filter(canton_name_filter(state.selection.active_canton.as_deref())),
    );
    scene.add_layer(
        LayerSpec::new(CANTON_HIGHLIGHT, LayerKind::Line, CANTON_SOURCE)
            .paint(PaintKey::LineColor, PaintValue::Color(HOVER_BORDER_COLOR))
            .paint(PaintKey::LineWidth, PaintValue::Number(3.0))
            .filter(canton_name_filter(state.selection.hovered_canton.as_deref())),
    );
}

/// Filter "NAME == Kanton"; der leere Wert matcht nie (nichts markiert).
fn canton_name_filter(canton: Option<&str>) -> FilterExpr {
    FilterExpr::Equals {
        attribute: CANTON_NAME_ATTRIBUTE,
        value: canton.unwrap_or_default().to_string(),
    }
}

/// Choropleth-Füllung: Interpolation Weiß→Modusfarbe, normalisiert über
/// das Modus-Maximum; die Differenz-Ansicht interpoliert Weiß→Rot gegen
/// die feste 10%-Obergrenze. Ohne geladene Tabelle bleibt die neutrale
/// Füllung stehen, bis der Datensatz eintrifft.
fn choropleth_fill(state: &AppState, scene: &mut SceneDescriptor) -> (PaintValue, f64) {
    let Some(mode) = state.selection.choropleth_mode else {
        return (PaintValue::Color(IDLE_FILL_COLOR), IDLE_FILL_OPACITY);
    };

    scene.require_dataset(DatasetKey::ModeShare);
    let Some(table) = state.cache.mode_share() else {
        return (PaintValue::Color(IDLE_FILL_COLOR), IDLE_FILL_OPACITY);
    };

    let dataset = state.selection.choropleth_dataset;
    let target = match dataset {
        SurveyDataset::Difference => Color::RED,
        _ => mode.base_color(),
    };
    let cases = table
        .normalized_factors(dataset, mode)
        .into_iter()
        .map(|(canton, factor)| (canton.to_string(), Color::WHITE.lerp(target, factor)))
        .collect();

    (
        PaintValue::ColorByCategory {
            attribute: CANTON_NAME_ATTRIBUTE,
            cases,
            fallback: Color::WHITE,
        },
        1.0,
    )
}

// ── Netzwerk-Szene ──────────────────────────────────────────────────

fn network_scene(state: &AppState, scene: &mut SceneDescriptor, module: ActiveModule) {
    let Some(canton) = state.selection.active_canton.clone() else {
        return;
    };
    let network = DatasetKey::Network(canton);
    let filter = mode_filter_expr(&state.selection.network_modes, "modes");

    scene.add_source(NETWORK_SOURCE, SourceData::Dataset(network.clone()));

    // Unsichtbare, breitere Klickfläche über denselben Segmenten.
    let mut click_layer = LayerSpec::new(CLICK_NETWORK_LAYER, LayerKind::Line, NETWORK_SOURCE)
        .paint(
            PaintKey::LineWidth,
            capacity_ramp(&[(300.0, 7.0), (4000.0, 14.0)]),
        )
        .paint(PaintKey::LineOpacity, PaintValue::Number(0.0));
    click_layer.filter = filter.clone();
    scene.add_layer(click_layer);

    let color = match module {
        ActiveModule::Volumes => PaintValue::ColorRamp {
            attribute: "daily_avg_volume",
            stops: VOLUME_RAMP.to_vec(),
        },
        _ => PaintValue::ColorRamp {
            attribute: "freespeed",
            stops: FREESPEED_RAMP.to_vec(),
        },
    };
    let mut network_layer = LayerSpec::new(NETWORK_LAYER, LayerKind::Line, NETWORK_SOURCE)
        .paint(
            PaintKey::LineWidth,
            capacity_ramp(&[(300.0, 1.0), (4000.0, 8.0)]),
        )
        .paint(PaintKey::LineColor, color);
    network_layer.filter = filter.clone();
    scene.add_layer(network_layer);

    if !state.selection.selected_segment_ids.is_empty() {
        scene.add_source(
            NETWORK_HIGHLIGHT,
            SourceData::Subset {
                dataset: network.clone(),
                subset: FeatureSubset::ByPropertyValue {
                    attribute: "id",
                    values: state
                        .selection
                        .selected_segment_ids
                        .iter()
                        .cloned()
                        .collect(),
                },
            },
        );
        let mut highlight = LayerSpec::new(NETWORK_HIGHLIGHT, LayerKind::Line, NETWORK_HIGHLIGHT)
            .paint(
                PaintKey::LineWidth,
                capacity_ramp(&[(300.0, 5.0), (4000.0, 14.0)]),
            )
            .paint(PaintKey::LineColor, PaintValue::Color(SEGMENT_HIGHLIGHT_COLOR))
            .paint(PaintKey::LineOpacity, PaintValue::Number(1.0))
            .before(NETWORK_LAYER);
        highlight.filter = filter;
        scene.add_layer(highlight);
    }

    if let Some(segment_id) = state.selection.flow_segment_id.clone() {
        scene.add_source(
            FLOW_SOURCE,
            SourceData::FlowPath {
                dataset: network,
                segment_id,
            },
        );
        scene.add_layer(
            LayerSpec::new(FLOW_LINE, LayerKind::Line, FLOW_SOURCE)
                .paint(PaintKey::LineColor, PaintValue::Color(FLOW_COLOR))
                .paint(PaintKey::LineWidth, PaintValue::Number(4.0))
                .paint(PaintKey::LineDashArray, PaintValue::DashArray(vec![3.0, 3.0])),
        );
    }
}

fn capacity_ramp(stops: &[(f64, f64)]) -> PaintValue {
    PaintValue::NumberRamp {
        attribute: "capacity",
        stops: stops.to_vec(),
    }
}

// ── Transit-Szene ───────────────────────────────────────────────────

fn transit_scene(state: &AppState, scene: &mut SceneDescriptor) {
    let Some(canton) = state.selection.active_canton.clone() else {
        return;
    };
    let stops = DatasetKey::TransitStops(canton.clone());
    let counts = state
        .selection
        .stop_volume_symbology
        .then(|| DatasetKey::TransitPassengerCounts(canton));
    let filter = mode_filter_expr(&state.selection.transit_modes, "modes_list");
    let with_volume = state.selection.stop_volume_symbology;

    scene.add_source(
        TRANSIT_STOPS_SOURCE,
        SourceData::StopsWithVolume {
            stops: stops.clone(),
            counts: counts.clone(),
            subset: None,
        },
    );

    let mut stops_layer = LayerSpec::new(TRANSIT_STOPS_LAYER, LayerKind::Circle, TRANSIT_STOPS_SOURCE)
        .paint(PaintKey::CircleRadius, stop_radius(with_volume, &STOP_RADIUS_RAMP, 3.0))
        .paint(PaintKey::CircleColor, PaintValue::Color(STOP_COLOR))
        .paint(PaintKey::CircleStrokeColor, PaintValue::Color(STOP_STROKE_COLOR))
        .paint(PaintKey::CircleStrokeWidth, PaintValue::Number(1.0));
    stops_layer.filter = filter.clone();
    scene.add_layer(stops_layer);

    if let Some(stop) = &state.selection.selected_stop {
        scene.add_source(
            TRANSIT_HIGHLIGHT_SOURCE,
            SourceData::StopsWithVolume {
                stops,
                counts,
                subset: Some(FeatureSubset::ByPropertyValue {
                    attribute: "name",
                    values: vec![stop.name.clone()],
                }),
            },
        );
        let mut highlight =
            LayerSpec::new(TRANSIT_HIGHLIGHT_LAYER, LayerKind::Circle, TRANSIT_HIGHLIGHT_SOURCE)
                .paint(
                    PaintKey::CircleRadius,
                    stop_radius(with_volume, &STOP_HIGHLIGHT_RADIUS_RAMP, 6.0),
                )
                .paint(PaintKey::CircleColor, PaintValue::Color(STOP_HIGHLIGHT_COLOR))
                .before(TRANSIT_STOPS_LAYER);
        highlight.filter = filter.clone();
        scene.add_layer(highlight);
    }

    // Routen-Hervorhebung: Hover im Panel übersteuert den Routen-Satz.
    if let Some(line_id) = state.selection.highlighted_line_id.clone() {
        let route_ids = match &state.selection.hovered_route_id {
            Some(hovered) => vec![hovered.clone()],
            None => state.selection.highlighted_route_ids.clone(),
        };
        if !route_ids.is_empty() {
            scene.add_source(
                TRANSIT_LINE_HIGHLIGHT,
                SourceData::Subset {
                    dataset: DatasetKey::TransitRoutes,
                    subset: FeatureSubset::ByLineRoutes { line_id, route_ids },
                },
            );
            let mut line_layer =
                LayerSpec::new(TRANSIT_LINE_HIGHLIGHT, LayerKind::Line, TRANSIT_LINE_HIGHLIGHT)
                    .paint(PaintKey::LineColor, PaintValue::Color(ROUTE_HIGHLIGHT_COLOR))
                    .paint(PaintKey::LineWidth, PaintValue::Number(2.0))
                    .before(TRANSIT_STOPS_LAYER);
            line_layer.rounded_line_joins = true;
            scene.add_layer(line_layer);
        }
    }

    let mut label_layer = LayerSpec::new(TRANSIT_STOPS_LABEL, LayerKind::Symbol, TRANSIT_STOPS_SOURCE)
        .paint(PaintKey::TextColor, PaintValue::Color(STOP_LABEL_COLOR))
        .paint(PaintKey::TextHaloColor, PaintValue::Color(Color::WHITE))
        .paint(PaintKey::TextHaloWidth, PaintValue::Number(1.0));
    label_layer.text = Some(TextStyle {
        attribute: "name",
        size: 12.0,
        offset: [0.0, -0.8],
        anchor: "bottom-left",
    });
    label_layer.min_zoom = Some(14.0);
    label_layer.filter = filter.clone();
    scene.add_layer(label_layer);

    let mut hitbox = LayerSpec::new(TRANSIT_STOPS_HITBOX, LayerKind::Circle, TRANSIT_STOPS_SOURCE)
        .paint(
            PaintKey::CircleRadius,
            PaintValue::NumberRamp {
                attribute: "volume",
                stops: STOP_HITBOX_RADIUS_RAMP.to_vec(),
            },
        )
        .paint(PaintKey::CircleOpacity, PaintValue::Number(0.0));
    hitbox.filter = filter;
    scene.add_layer(hitbox);
}

fn stop_radius(with_volume: bool, ramp: &[(f64, f64)], constant: f64) -> PaintValue {
    if with_volume {
        PaintValue::NumberRamp {
            attribute: "volume",
            stops: ramp.to_vec(),
        }
    } else {
        PaintValue::Number(constant)
    }
}

// ── Filter ──────────────────────────────────────────────────────────

/// Modus-Filter über ein Listen-Attribut; `All` bedeutet kein Filter.
fn mode_filter_expr(filter: &ModeFilter, attribute: &'static str) -> Option<FilterExpr> {
    let contains = |mode: Mode| FilterExpr::ListContains {
        attribute,
        value: mode.as_str().to_string(),
    };
    match filter.modes().as_slice() {
        [] => None,
        [single] => Some(contains(*single)),
        modes => Some(FilterExpr::AnyOf(modes.iter().copied().map(contains).collect())),
    }
}
