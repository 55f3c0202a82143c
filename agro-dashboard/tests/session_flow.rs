use agro_core::filter::{Choice, FilterField};
use agro_core::metric::Metric;
use agro_data::field_summary::FieldSummary;
use agro_dashboard::config::DashboardConfig;
use agro_dashboard::state::{Event, SessionState, Tab};
use agro_dashboard::views::analytics::{RainRiskView, SimilarityView};
use agro_dashboard::views::constructor::ConstructorView;
use agro_dashboard::views::precipitation::DailyPrecipitation;
use agro_dashboard::views::tables::FieldsView;
use agro_dashboard::views::{DashboardView, ReadyView};
use agro_dashboard::Dashboard;
use agro_db::Database;

const DAILY_CSV: &str = "\
year,date,Cluster,Block,Culture,Sum_T_active,Sum_Precipitation,precipitation,min,max,mean,field_count
2023,2023-06-11,North,B1,Wheat,400.0,90.0,5.0,8.0,21.0,14.0,6
2023,2023-06-12,North,B1,Wheat,410.0,95.0,2.0,9.0,22.0,15.0,6
2023,2023-06-13,North,B1,Wheat,420.0,100.0,0.0,10.0,23.0,16.0,6
2024,2024-06-11,North,B1,Wheat,480.0,110.0,0.0,11.0,25.0,18.0,7
2024,2024-06-12,North,B1,Wheat,490.0,115.0,1.0,12.0,26.0,19.0,7
2024,2024-06-13,North,B1,Wheat,500.0,120.0,4.0,12.0,27.0,19.5,7
2024,2024-06-13,South,B2,Corn,520.0,60.0,0.0,13.0,29.0,21.0,3
";

const FIELDS_CSV: &str = "\
Field,Cluster,Block,Culture,Year,Frost days,Area
F-01,North,B1,Wheat,2024,1,120
F-02,South,B2,Corn,2024,0,80
F-01,North,B1,Wheat,2023,3,120
";

fn dashboard() -> Dashboard {
    let db = Database::new().unwrap();
    db.load_daily_records(DAILY_CSV).unwrap();
    let config = DashboardConfig {
        passphrase: Some("harvest".to_string()),
        ..DashboardConfig::default()
    };
    let fields = FieldSummary::from_csv(FIELDS_CSV).unwrap();
    Dashboard::from_database(db, config, Some(fields)).unwrap()
}

fn unlocked(dash: &Dashboard) -> SessionState {
    dash.dispatch(&dash.new_session(), &Event::SubmitPassphrase("harvest".to_string()))
}

fn select(field: FilterField, values: &[&str]) -> Event {
    Event::SelectFilter {
        field,
        choices: values.iter().map(|v| Choice::Value(v.to_string())).collect(),
    }
}

fn ready(view: DashboardView) -> ReadyView {
    match view {
        DashboardView::Ready(view) => *view,
        other => panic!("expected a ready dashboard, got {:?}", other),
    }
}

#[test]
fn wrong_passphrase_keeps_dashboard_locked() {
    let dash = dashboard();
    let state = dash.dispatch(&dash.new_session(), &Event::SubmitPassphrase("wheat".to_string()));
    assert!(matches!(dash.render(&state), DashboardView::Locked { notice: Some(_) }));
    let state = dash.dispatch(&state, &Event::SwitchTab(Tab::Tables));
    assert_eq!(state.tab, Tab::Temperature);
}

#[test]
fn filters_cascade_into_the_sidebar_and_ribbon() {
    let dash = dashboard();
    let state = unlocked(&dash);
    let view = ready(dash.render(&state));
    assert_eq!(view.sidebar.options.years, vec![2024, 2023]);
    assert_eq!(view.sidebar.options.clusters, vec!["North", "South"]);
    // 2024: 7 + 3 fields on 13 June; 2023: 6
    assert_eq!(view.ribbon.total_scale, 16);
    assert_eq!(view.ribbon.avg_fields, 8);
    assert_eq!(view.ribbon.clusters, "All clusters");

    let state = dash.dispatch(&state, &select(FilterField::Cluster, &["North"]));
    let view = ready(dash.render(&state));
    assert_eq!(view.sidebar.options.blocks, vec!["B1"]);
    assert_eq!(view.ribbon.total_scale, 13);
    assert_eq!(view.ribbon.clusters, "North");
}

#[test]
fn similarity_scores_against_the_reference_year() {
    let dash = dashboard();
    let state = dash.dispatch(&unlocked(&dash), &select(FilterField::Cluster, &["North"]));
    let state = dash.dispatch(&state, &Event::SetSimilarityMetrics(vec![Metric::SumPrecipitation]));
    let state = dash.dispatch(&state, &Event::SetReferenceYear(2024));

    let view = ready(dash.render(&state));
    match view.pages.analytics.similarity {
        SimilarityView::Ready { reference, rows, labels } => {
            assert_eq!(reference, 2024);
            assert_eq!(labels, vec!["Accumulated precipitation"]);
            assert_eq!(rows[0].year, 2024);
            assert!((rows[0].score - 100.0).abs() < 1e-9);
            assert!((rows[1].score - 83.333).abs() < 0.01);
        }
        other => panic!("unexpected similarity view {:?}", other),
    }
}

#[test]
fn absent_reference_year_yields_no_result() {
    let dash = dashboard();
    let state = dash.dispatch(&unlocked(&dash), &Event::SetReferenceYear(2024));
    let state = dash.dispatch(&state, &select(FilterField::Year, &["2023"]));
    let view = ready(dash.render(&state));
    assert!(matches!(
        view.pages.analytics.similarity,
        SimilarityView::NoResult { reference: Some(2024), .. }
    ));

    let state = dash.dispatch(&state, &Event::SetSimilarityMetrics(vec![]));
    let view = ready(dash.render(&state));
    assert!(matches!(view.pages.analytics.similarity, SimilarityView::SelectMetrics { .. }));
}

#[test]
fn pickers_offer_only_metrics_present_in_the_dataset() {
    let dash = dashboard();
    let state = unlocked(&dash);
    let view = ready(dash.render(&state));

    let offered: Vec<Metric> = view.pages.analytics.metric_options.iter().map(|o| o.metric).collect();
    assert!(!offered.contains(&Metric::SumTEff0));
    assert!(!offered.contains(&Metric::SumTEff10));
    assert!(offered.contains(&Metric::SumTActive));
    assert_eq!(offered.len(), 6);

    let accumulation: Vec<Metric> = view
        .pages
        .temperature
        .accumulation_options
        .iter()
        .map(|o| o.metric)
        .collect();
    assert_eq!(accumulation, vec![Metric::SumTActive]);

    match &view.pages.constructor {
        ConstructorView::Ready { left_options, .. } => assert_eq!(left_options.len(), 6),
        other => panic!("expected a ready constructor, got {:?}", other),
    }

    let state = dash.dispatch(
        &state,
        &Event::SetSimilarityMetrics(vec![Metric::SumTEff0, Metric::SumTActive]),
    );
    match ready(dash.render(&state)).pages.analytics.similarity {
        SimilarityView::Ready { labels, .. } => assert_eq!(labels, vec!["GDD (effective T>10)"]),
        other => panic!("expected similarity scores, got {:?}", other),
    }

    let state = dash.dispatch(&state, &Event::SetSimilarityMetrics(vec![Metric::SumTEff10]));
    assert!(matches!(
        ready(dash.render(&state)).pages.analytics.similarity,
        SimilarityView::SelectMetrics { .. }
    ));
}

#[test]
fn rain_risk_matrices_cover_every_period() {
    let dash = dashboard();
    let state = dash.dispatch(&unlocked(&dash), &select(FilterField::Cluster, &["North"]));
    let view = ready(dash.render(&state));
    let RainRiskView::Ready(matrices) = view.pages.analytics.rain_risk else {
        panic!("rain risk should be available");
    };
    assert_eq!(matrices.rainy_days.years, vec![2023, 2024]);
    assert_eq!(matrices.rainy_days.cells, vec![vec![2], vec![2]]);
    assert_eq!(matrices.heavy_rain_days.cells, vec![vec![1], vec![1]]);
    assert_eq!(matrices.longest_rainy_streak.cells, vec![vec![2], vec![2]]);
}

#[test]
fn empty_filter_result_renders_no_data() {
    let dash = dashboard();
    let state = dash.dispatch(&unlocked(&dash), &select(FilterField::Cluster, &["South"]));
    let state = dash.dispatch(&state, &select(FilterField::Culture, &["Wheat"]));
    match dash.render(&state) {
        DashboardView::NoData { sidebar, .. } => assert_eq!(sidebar.options.cultures, vec!["Corn"]),
        other => panic!("expected NoData, got {:?}", other),
    }
}

#[test]
fn constructor_follows_the_year_filter() {
    let dash = dashboard();
    let state = unlocked(&dash);
    assert_eq!(state.constructor.years, vec![2024]);

    let state = dash.dispatch(&state, &select(FilterField::Year, &["2023"]));
    assert_eq!(state.constructor.years, vec![2023]);
    let view = ready(dash.render(&state));
    match view.pages.constructor {
        ConstructorView::Ready { chart, years, .. } => {
            assert_eq!(years, vec![2023]);
            assert_eq!(chart.series.len(), 2);
            assert!(chart.y_range.is_some());
        }
        other => panic!("unexpected constructor view {:?}", other),
    }

    let state = dash.dispatch(&state, &Event::SetConstructorYears(vec![]));
    let view = ready(dash.render(&state));
    assert!(matches!(view.pages.constructor, ConstructorView::SelectYears { .. }));
}

#[test]
fn precipitation_month_range_without_rows() {
    let dash = dashboard();
    let state = unlocked(&dash);
    let view = ready(dash.render(&state));
    // default range is September only; fixtures cover June
    assert!(matches!(
        view.pages.precipitation.daily,
        DailyPrecipitation::NoDataForMonths { first: 9, last: 9 }
    ));
    let state = dash.dispatch(&state, &Event::SetPrecipitationMonths(6, 6));
    let view = ready(dash.render(&state));
    assert!(matches!(view.pages.precipitation.daily, DailyPrecipitation::Chart(_)));
}

#[test]
fn field_summary_table_and_export() {
    let dash = dashboard();
    let state = dash.dispatch(&unlocked(&dash), &select(FilterField::Culture, &["Wheat"]));
    let view = ready(dash.render(&state));
    match view.pages.tables.fields {
        FieldsView::Table { count, summary } => {
            assert_eq!(count, 2);
            assert_eq!(summary.headers.last().map(String::as_str), Some("Frost days"));
        }
        other => panic!("unexpected fields view {:?}", other),
    }

    let bytes = dash.export_fields(&state).unwrap().unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert!(text.starts_with("Field,Cluster,Block,Culture,Year,Area,Frost days\n"));
}

#[test]
fn full_view_serializes_to_json() {
    let dash = dashboard();
    let view = dash.render(&unlocked(&dash));
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["state"], "ready");
    assert_eq!(json["colors"]["2024"], "rgb(204, 102, 119)");
}
