use crate::helpers::{
    daily_series, mock_telemetry, production, test_logger, weather_service, MockWeatherApi,
};
use etl::{run_pipeline, DailySeries, DateRange, Error, WeatherEndpoint};
use mockall::predicate::{always, eq};
use time::macros::date;

#[tokio::test]
async fn can_build_daily_metrics_with_partial_sources() {
    let d1 = date!(2024 - 01 - 01);
    let d2 = date!(2024 - 01 - 02);
    let production_rows = vec![
        production(d2, "MINE-01", "day", 250.0, Some(62.0)),
        production(d1, "MINE-01", "day", 300.0, Some(60.0)),
        production(d1, "MINE-02", "night", -20.0, Some(58.0)),
    ];

    let mut api = MockWeatherApi::new();
    api.expect_fetch_daily()
        .with(eq(WeatherEndpoint::Archive), eq(DateRange::new(d1, d2).unwrap()))
        .times(1)
        .returning(|_, _| {
            Ok(DailySeries {
                time: vec![String::from("2024-01-01")],
                temperature_2m_mean: vec![Some(26.9)],
                precipitation_sum: vec![Some(11.4)],
            })
        });
    let weather = weather_service(api);

    let output = run_pipeline(
        &test_logger(),
        &production_rows,
        &mock_telemetry(),
        &weather,
        date!(2030 - 01 - 01),
    )
    .await
    .unwrap();

    assert_eq!(output.production.len(), 2);
    assert_eq!(output.telemetry.len(), 1);
    assert_eq!(output.weather.len(), 1);
    assert_eq!(output.anomalies.len(), 1);
    assert_eq!(output.anomalies[0].mine_id, "MINE-02");

    let metrics = &output.metrics;
    assert_eq!(metrics.len(), 2);

    let first = &metrics[0];
    assert_eq!(first.date, d1);
    assert_eq!(first.total_production_daily, 300.0);
    assert_eq!(first.average_quality_grade, Some(59.0));
    assert_eq!(first.equipment_utilization, Some(3.0 / 48.0));
    assert_eq!(first.total_fuel_consumption, Some(103.0));
    assert_eq!(first.mean_temperature, Some(26.9));
    assert_eq!(first.total_precipitation, Some(11.4));
    assert_eq!(first.fuel_efficiency, Some(103.0 / 300.0));

    let second = &metrics[1];
    assert_eq!(second.date, d2);
    assert_eq!(second.total_production_daily, 250.0);
    assert_eq!(second.equipment_utilization, None);
    assert_eq!(second.total_fuel_consumption, None);
    assert_eq!(second.mean_temperature, None);
    assert_eq!(second.total_precipitation, None);
    assert_eq!(second.fuel_efficiency, None);
}

#[tokio::test]
async fn zero_production_day_has_missing_fuel_efficiency() {
    let d1 = date!(2024 - 01 - 01);
    let production_rows = vec![production(d1, "MINE-01", "day", -7.5, Some(55.0))];

    let mut api = MockWeatherApi::new();
    api.expect_fetch_daily()
        .returning(|_, range| Ok(daily_series(range, 27.0, 0.0)));
    let weather = weather_service(api);

    let output = run_pipeline(
        &test_logger(),
        &production_rows,
        &mock_telemetry(),
        &weather,
        date!(2030 - 01 - 01),
    )
    .await
    .unwrap();

    let day = &output.metrics[0];
    assert_eq!(day.total_production_daily, 0.0);
    assert_eq!(day.total_fuel_consumption, Some(103.0));
    assert_eq!(day.fuel_efficiency, None);
    assert_eq!(output.anomalies.len(), 1);
}

#[tokio::test]
async fn range_across_freshness_boundary_queries_both_endpoints() {
    // 90 days before 2024-04-10 is 2024-01-11
    let today = date!(2024 - 04 - 10);
    let production_rows = vec![
        production(date!(2024 - 01 - 08), "MINE-01", "day", 100.0, Some(60.0)),
        production(date!(2024 - 01 - 14), "MINE-01", "day", 120.0, Some(61.0)),
    ];

    let mut api = MockWeatherApi::new();
    api.expect_fetch_daily()
        .with(
            eq(WeatherEndpoint::Archive),
            eq(DateRange::new(date!(2024 - 01 - 08), date!(2024 - 01 - 10)).unwrap()),
        )
        .times(1)
        .returning(|_, range| Ok(daily_series(range, 25.0, 3.0)));
    api.expect_fetch_daily()
        .with(
            eq(WeatherEndpoint::Forecast),
            eq(DateRange::new(date!(2024 - 01 - 11), date!(2024 - 01 - 14)).unwrap()),
        )
        .times(1)
        .returning(|_, range| Ok(daily_series(range, 28.0, 0.5)));
    let weather = weather_service(api);

    let output = run_pipeline(
        &test_logger(),
        &production_rows,
        &mock_telemetry(),
        &weather,
        today,
    )
    .await
    .unwrap();

    assert_eq!(output.weather.len(), 7);
    assert!(output.weather.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(output.metrics[0].mean_temperature, Some(25.0));
    assert_eq!(output.metrics[1].mean_temperature, Some(28.0));
}

#[tokio::test]
async fn upstream_failure_aborts_the_run() {
    let production_rows = vec![production(
        date!(2024 - 01 - 01),
        "MINE-01",
        "day",
        100.0,
        Some(60.0),
    )];

    let mut api = MockWeatherApi::new();
    api.expect_fetch_daily().returning(|endpoint, _| {
        Err(Error::UpstreamUnavailable {
            endpoint: format!("https://{}.example/v1", endpoint),
            reason: String::from("500 Internal Server Error"),
        })
    });
    let weather = weather_service(api);

    let err = run_pipeline(
        &test_logger(),
        &production_rows,
        &mock_telemetry(),
        &weather,
        date!(2030 - 01 - 01),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::UpstreamUnavailable { .. }));
}

#[tokio::test]
async fn empty_production_fails_before_any_request() {
    let mut api = MockWeatherApi::new();
    api.expect_fetch_daily().with(always(), always()).times(0);
    let weather = weather_service(api);

    let err = run_pipeline(
        &test_logger(),
        &[],
        &mock_telemetry(),
        &weather,
        date!(2030 - 01 - 01),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::EmptyInput("production")));
}

#[tokio::test]
async fn empty_telemetry_fails_the_run() {
    let production_rows = vec![production(
        date!(2024 - 01 - 01),
        "MINE-01",
        "day",
        100.0,
        Some(60.0),
    )];
    let mut api = MockWeatherApi::new();
    api.expect_fetch_daily()
        .returning(|_, range| Ok(daily_series(range, 27.0, 0.0)));
    let weather = weather_service(api);

    let err = run_pipeline(
        &test_logger(),
        &production_rows,
        &[],
        &weather,
        date!(2030 - 01 - 01),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::EmptyInput("telemetry")));
}

#[tokio::test]
async fn empty_weather_response_fails_the_run() {
    let production_rows = vec![production(
        date!(2024 - 01 - 01),
        "MINE-01",
        "day",
        100.0,
        Some(60.0),
    )];
    let mut api = MockWeatherApi::new();
    api.expect_fetch_daily()
        .returning(|_, _| Ok(DailySeries::default()));
    let weather = weather_service(api);

    let err = run_pipeline(
        &test_logger(),
        &production_rows,
        &mock_telemetry(),
        &weather,
        date!(2030 - 01 - 01),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::EmptyInput("weather")));
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let production_rows = vec![
        production(date!(2024 - 01 - 02), "MINE-01", "day", 0.1, Some(60.0)),
        production(date!(2024 - 01 - 01), "MINE-01", "day", 0.2, Some(60.3)),
        production(date!(2024 - 01 - 01), "MINE-02", "day", 0.7, None),
        production(date!(2024 - 01 - 02), "MINE-02", "night", -3.0, Some(59.9)),
    ];

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let mut api = MockWeatherApi::new();
        api.expect_fetch_daily()
            .returning(|_, range| Ok(daily_series(range, 26.0, 1.0)));
        let weather = weather_service(api);
        let output = run_pipeline(
            &test_logger(),
            &production_rows,
            &mock_telemetry(),
            &weather,
            date!(2030 - 01 - 01),
        )
        .await
        .unwrap();
        outputs.push(format!("{:?}", output));
    }
    assert_eq!(outputs[0], outputs[1]);
}
